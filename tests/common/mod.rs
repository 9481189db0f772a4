//! Shared helpers for integration tests.

use std::io::Cursor;
use std::sync::Arc;

use reception_guard::config::LoginConfig;
use reception_guard::login::{AttemptTracker, ManualClock};
use reception_guard::upload::SignatureEntry;

/// A stream holding the entry's container tag and `signature` at its
/// offset, padded with `fill`.
#[allow(dead_code)]
pub fn stream_with(entry: &SignatureEntry, signature: &[u8], fill: u8) -> Cursor<Vec<u8>> {
    let offset = entry.offset as usize;
    let mut data = vec![fill; offset + entry.max_len() + 16];
    data[..entry.container.len()].copy_from_slice(entry.container);
    data[offset..offset + signature.len()].copy_from_slice(signature);
    Cursor::new(data)
}

/// An all-zero stream long enough for any row of the table.
#[allow(dead_code)]
pub fn zero_stream(entry: &SignatureEntry) -> Cursor<Vec<u8>> {
    Cursor::new(vec![0u8; entry.offset as usize + entry.max_len() + 16])
}

/// A tracker with default settings driven by a manual clock.
#[allow(dead_code)]
pub fn manual_tracker() -> (AttemptTracker, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let tracker = AttemptTracker::with_clock(&LoginConfig::default(), clock.clone());
    (tracker, clock)
}
