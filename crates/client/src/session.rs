use chrono::{DateTime, Utc};
use shared::{model::Profile, types::Uuid};

/// The logged in user as the server reported it when the session was
/// established. It's a snapshot, call `ApiClient::fetch_session` again to see
/// changes made elsewhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub user_id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl From<Profile> for UserSession {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: profile.user_id,
            username: profile.username,
            avatar_url: profile.avatar_url,
            fetched_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_session_from_profile() {
        let now = Utc::now();
        let profile = Profile {
            user_id: Uuid::new_v4(),
            username: "runner".to_owned(),
            avatar_url: None,
            created_at: now,
            updated_at: now,
        };
        let session = UserSession::from(profile.clone());
        assert_eq!(session.user_id, profile.user_id);
        assert_eq!(session.username, "runner");
        assert!(session.fetched_at >= now);
    }
}
