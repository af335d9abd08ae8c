//! Account management against the remote identity service: credential
//! policies, the REST client, the local session file and the flows that
//! tie them together.

pub mod identity;
pub mod service;
pub mod session;
pub mod validate;

pub use service::AuthService;
pub use session::{Session, SessionStore};
