//! Lifecycle management.
//!
//! ```text
//! Startup:  load config → build Verifier + AttemptTracker → spawn sweeper
//! Shutdown: Shutdown::trigger → sweeper exits → tracker dropped
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
