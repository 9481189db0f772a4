//! Upload signature verification and login attempt tracking for the
//! Reception photo-gallery backend.

pub mod config;
pub mod lifecycle;
pub mod login;
pub mod observability;
pub mod upload;

pub use config::schema::GuardConfig;
pub use lifecycle::Shutdown;
pub use login::{AttemptRecord, AttemptTracker};
pub use upload::Verifier;
