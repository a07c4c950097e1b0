//! Placeholder GUIDs for assets that have not been persisted yet
//!
//! The catalog assigns the authoritative GUID on write. Until then a client
//! marks new objects with a negative-looking temporary GUID so that objects
//! in the same request can refer to each other.

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of placeholder GUIDs
#[cfg_attr(test, mockall::automock)]
pub trait GuidGenerator: Send + Sync {
    /// Produce the next placeholder GUID
    fn next_guid(&self) -> String;
}

/// Random placeholders: `-` followed by a non-negative random 63-bit integer
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGuidGenerator;

impl RandomGuidGenerator {
    /// Create a new random generator
    pub fn new() -> Self {
        Self
    }
}

impl GuidGenerator for RandomGuidGenerator {
    fn next_guid(&self) -> String {
        let value: i64 = rand::thread_rng().gen();
        format!("-{}", value.unsigned_abs())
    }
}

/// Deterministic placeholders: `-1`, `-2`, `-3`, ...
#[derive(Debug, Default)]
pub struct SequentialGuidGenerator {
    counter: AtomicU64,
}

impl SequentialGuidGenerator {
    /// Create a generator whose first GUID is `-1`
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator whose first GUID is `-(start + 1)`
    pub fn starting_after(start: u64) -> Self {
        Self {
            counter: AtomicU64::new(start),
        }
    }
}

impl GuidGenerator for SequentialGuidGenerator {
    fn next_guid(&self) -> String {
        let next = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("-{}", next)
    }
}

/// Whether a GUID is a client-side placeholder rather than a server-assigned one
pub fn is_placeholder_guid(guid: &str) -> bool {
    match guid.strip_prefix('-') {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}
