//! The two cache tiers in front of the origin, and the fingerprints that
//! key them. Tier order is always local, then shared, then origin.

pub mod keys;
pub mod local;
pub mod shared;

pub use keys::RequestKey;
pub use local::{DEFAULT_LOCAL_TTL, LocalCache};
pub use shared::{DEFAULT_SHARED_TTL, Namespace, SharedCache};

/// What happened to one cache-population attempt on the read path. Writes
/// are non-fatal by design; this keeps the failures visible to the caller
/// instead of silently swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Skipped(String),
}

impl WriteOutcome {
    pub fn was_written(&self) -> bool {
        matches!(self, WriteOutcome::Written)
    }
}
