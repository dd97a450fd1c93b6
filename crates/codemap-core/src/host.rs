//! Host-facing rebuild entry point and the latest-published diagram slot.
//!
//! A save notification triggers a fresh, independent rebuild. Rebuilds are
//! not coordinated: whichever finishes last overwrites the slot.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::errors::CodemapResult;
use crate::indexer::filesystem::SourceProvider;
use crate::indexer::pipeline::{rebuild, ScanReport};

#[derive(Clone, Debug)]
pub struct Published {
    /// Incremented on every publication, starting at 1.
    pub generation: u64,
    pub report: Arc<ScanReport>,
}

pub struct DiagramHost<P> {
    provider: P,
    slot: Mutex<Option<Published>>,
}

impl<P: SourceProvider> DiagramHost<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            slot: Mutex::new(None),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Rebuild from current sources and publish the result.
    ///
    /// Returns whether the aggregated source digest differs from the
    /// previously published one.
    pub fn on_unit_saved(&self) -> CodemapResult<bool> {
        let report = rebuild(&self.provider)?;
        Ok(self.publish(report))
    }

    /// Publish `report` unconditionally; returns whether the digest changed.
    pub fn publish(&self, report: ScanReport) -> bool {
        let mut slot = self.slot.lock();
        let (generation, changed) = match slot.as_ref() {
            Some(previous) => (
                previous.generation + 1,
                previous.report.digest != report.digest,
            ),
            None => (1, true),
        };
        debug!(generation, changed, edges = report.graph.edges.len(), "published diagram");
        *slot = Some(Published {
            generation,
            report: Arc::new(report),
        });
        changed
    }

    pub fn latest(&self) -> Option<Published> {
        self.slot.lock().clone()
    }
}
