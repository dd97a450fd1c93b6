//! Scan orchestration: aggregate → locate → classify → encode.

use sha2::{Digest, Sha256};
use tracing::info;

use crate::errors::CodemapResult;
use crate::graph::encoder::{encode, GraphDescription};
use crate::indexer::aggregate::{aggregate_located, aggregate_texts};
use crate::indexer::classifier::classify_usages;
use crate::indexer::filesystem::SourceProvider;
use crate::indexer::locator::locate_classes;
use crate::models::{ClassSet, Relationship, ScanOutput, ScanState};

/// Run locate and classify over an aggregated buffer.
pub fn scan(buffer: &str) -> ScanOutput {
    let mut state = ScanState::new();
    locate_classes(buffer, &mut state);
    classify_usages(&mut state);
    let output = state.finish();
    info!(
        buffer_len = buffer.len(),
        classes = output.classes.len(),
        records = output.records.len(),
        relationships = output.relationships.len(),
        "scan complete"
    );
    output
}

/// Build the graph description for in-memory source units.
pub fn build_graph<S: AsRef<str>>(units: &[S]) -> GraphDescription {
    let output = scan(&aggregate_texts(units));
    encode(&output.classes, &output.relationships)
}

/// Everything one rebuild produced.
#[derive(Clone, Debug)]
pub struct ScanReport {
    pub graph: GraphDescription,
    pub classes: ClassSet,
    pub relationships: Vec<Relationship>,
    /// SHA-256 hex digest of the aggregated buffer.
    pub digest: String,
}

/// Full rebuild from a source provider.
///
/// Only enumeration can fail; unreadable units are skipped.
pub fn rebuild<P: SourceProvider + ?Sized>(provider: &P) -> CodemapResult<ScanReport> {
    let locations = provider.locate()?;
    let buffer = aggregate_located(locations.iter().map(|loc| (loc, provider.read(loc))));
    let output = scan(&buffer);
    let graph = encode(&output.classes, &output.relationships);
    Ok(ScanReport {
        graph,
        classes: output.classes,
        relationships: output.relationships,
        digest: buffer_digest(&buffer),
    })
}

pub fn buffer_digest(buffer: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(buffer.as_bytes());
    format!("{:x}", hasher.finalize())
}
