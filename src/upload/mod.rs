//! Upload content verification.
//!
//! # Data Flow
//! ```text
//! Uploaded file (filename, claimed extension, byte stream):
//!     → verifier.rs (suffix check, table lookup)
//!     → signatures.rs (offset + candidate magic numbers)
//!     → seek + bounded read of the stream
//!     → bool (any candidate matched)
//! ```
//!
//! # Design Decisions
//! - The signature table is a static, read-only slice: no lazy init, no locks
//! - Short streams never error, they simply do not match
//! - Non-EOF I/O failures are surfaced to the caller unchanged

pub mod signatures;
pub mod types;
pub mod verifier;

pub use signatures::{lookup, supported_extensions, SignatureEntry};
pub use types::{SignatureError, SignatureResult};
pub use verifier::{extension_of, validate, Verifier};
