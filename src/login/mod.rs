//! Login attempt tracking.
//!
//! # Data Flow
//! ```text
//! Login POST (username, remote address, user agent):
//!     → record.rs (validate input, derive Fingerprint)
//!     → tracker.rs (per-key read-modify-write in a sharded map)
//!     → AttemptRecord (attempt count within the TTL window)
//!
//! Background (optional):
//!     sweeper.rs → tracker.purge_expired() every interval until shutdown
//! ```
//!
//! # Design Decisions
//! - The tracker is an owned value passed to whoever needs it; no statics
//! - Expiry is checked on every read, the sweeper only reclaims memory
//! - Per-key atomicity comes from the map's shard locks; no global mutex
//! - Time comes from an injectable `Clock`

pub mod clock;
pub mod record;
pub mod sweeper;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use record::{AttemptRecord, Fingerprint, TrackerError, TrackerResult};
pub use sweeper::spawn_sweeper;
pub use tracker::AttemptTracker;
