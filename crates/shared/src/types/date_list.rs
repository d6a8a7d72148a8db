use std::ops::{Deref, DerefMut};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "exemplar-model")]
use rusqlite::{
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
    ToSql,
};

/// Ordered list of calendar dates. Persisted as a json array in a single column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateList(Vec<NaiveDate>);

impl DateList {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self(dates)
    }

    pub fn into_inner(self) -> Vec<NaiveDate> {
        self.0
    }

    /// Dates are kept in the order they were supplied, this reports whether that
    /// order is also chronological
    pub fn is_sorted(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }
}

impl From<Vec<NaiveDate>> for DateList {
    fn from(value: Vec<NaiveDate>) -> Self {
        Self(value)
    }
}

impl Deref for DateList {
    type Target = Vec<NaiveDate>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DateList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(feature = "exemplar-model")]
impl ToSql for DateList {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        serde_json::to_string(self)
            .map(ToSqlOutput::from)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }
}

#[cfg(feature = "exemplar-model")]
impl FromSql for DateList {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        <serde_json::Value as FromSql>::column_result(value)
            .and_then(|v| serde_json::from_value(v).map_err(|e| FromSqlError::Other(Box::new(e))))
    }
}

#[cfg(feature = "sea-query-enum")]
impl From<&DateList> for sea_query::Value {
    fn from(value: &DateList) -> Self {
        // Serializing a Vec<NaiveDate> can't fail
        serde_json::to_string(value).unwrap_or_else(|_| "[]".to_owned()).into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let list = DateList::new(vec![date(2024, 3, 1), date(2024, 3, 8)]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"["2024-03-01","2024-03-08"]"#);
    }

    #[test]
    fn test_is_sorted() {
        assert!(DateList::default().is_sorted());
        assert!(DateList::new(vec![date(2024, 3, 1), date(2024, 3, 1)]).is_sorted());
        assert!(!DateList::new(vec![date(2024, 3, 8), date(2024, 3, 1)]).is_sorted());
    }
}
