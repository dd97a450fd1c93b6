//! Codemap core library: class-relationship graph extraction.
//!
//! A tolerant lexical scanner over concatenated source text locates class
//! declarations and their brace-matched bodies, classifies inheritance and
//! usage relationships between them, and encodes the result as a node/edge
//! description for an external layered layout engine.
//!
//! The pure entry point is [`indexer::pipeline::build_graph`]; hosts that
//! watch a workspace use [`host::DiagramHost`].

pub mod errors;
pub mod graph;
pub mod host;
pub mod indexer;
pub mod models;

pub use errors::{CodemapError, CodemapResult};
pub use graph::encoder::GraphDescription;
pub use indexer::pipeline::{build_graph, rebuild, scan, ScanReport};
