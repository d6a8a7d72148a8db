//! Native client for the yojuro api and the multi-step challenge builder that
//! drives it

mod api;
pub use api::*;

mod error;
pub use error::*;

mod session;
pub use session::*;

mod form;
pub use form::*;
