use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use spin::RwLock;
#[cfg(feature = "std")]
use std::sync::RwLock;

use triomphe::Arc;

use super::StoredSink;

pub(super) type SinkList = Vec<Arc<dyn StoredSink>>;

/// The append-only list of registered sinks.
///
/// Backed by the std `RwLock` with the `std` feature and by a spinning
/// `RwLock` otherwise. No lock is held while a sink runs.
pub(super) struct SinkRegistry {
    sinks: RwLock<SinkList>,
}

impl SinkRegistry {
    pub(super) const fn new() -> Self {
        Self {
            sinks: RwLock::new(Vec::new()),
        }
    }

    /// Appends `sink` and returns the number of registered sinks.
    pub(super) fn push(&self, sink: Arc<dyn StoredSink>) -> usize {
        #[cfg(not(feature = "std"))]
        let mut sinks = self.sinks.write();
        // Only poisoned if a registration panicked while holding the lock.
        #[cfg(feature = "std")]
        let mut sinks = self.sinks.write().expect("Unable to acquire sink lock");

        sinks.push(sink);
        sinks.len()
    }

    /// Returns a copy of the list, so the sinks can be called without the
    /// lock.
    pub(super) fn snapshot(&self) -> SinkList {
        #[cfg(not(feature = "std"))]
        let sinks = self.sinks.read();
        #[cfg(feature = "std")]
        let sinks = self.sinks.read().expect("Unable to acquire sink lock");

        sinks.clone()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::{
        ErratumRef,
        sinks::{FnSink, stored},
    };

    #[test]
    fn test_push_and_snapshot() {
        let registry = SinkRegistry::new();
        assert!(registry.snapshot().is_empty());

        for expected in 1..=3 {
            let sink = stored(FnSink::new(|_: ErratumRef<'_>| {}));
            assert_eq!(registry.push(sink), expected);
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert!(
            snapshot
                .iter()
                .all(|sink| sink.to_string().contains("registry.rs"))
        );
    }
}
