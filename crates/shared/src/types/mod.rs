mod uuid;
pub use self::uuid::*;

mod date_list;
pub use date_list::*;
