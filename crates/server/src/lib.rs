pub mod cli;

pub mod db;

mod extract;
pub use extract::*;

mod session;
pub use session::*;

mod state;
pub use state::*;

pub mod routes;

pub mod session_store;

mod app;
pub use app::*;
