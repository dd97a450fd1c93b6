//! Shared typed models passed between the scan stages.
//!
//! Every scan builds these from empty and hands them to the next stage by
//! value; nothing here outlives a single scan.

use std::borrow::Borrow;
use std::fmt;
use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{CodemapError, CodemapResult};

static CLASS_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

// ---------------------------------------------------------------------------
// ClassName
// ---------------------------------------------------------------------------

/// An identifier token naming a class. Compared by exact string equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClassName(String);

impl ClassName {
    /// Validate `name` against `[A-Za-z_][A-Za-z0-9_]*`.
    pub fn new(name: impl Into<String>) -> CodemapResult<Self> {
        let name = name.into();
        if CLASS_NAME_RE.is_match(&name) {
            Ok(Self(name))
        } else {
            Err(CodemapError::InvalidClassName(name))
        }
    }

    /// Wrap text already matched by an identifier capture group.
    pub(crate) fn from_capture(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, used for node sizing.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClassName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ClassName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// ClassRecord / ClassSet
// ---------------------------------------------------------------------------

/// A declared class together with the text strictly inside its braces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassRecord {
    pub name: ClassName,
    pub body: String,
}

/// Every class name seen in a scan, declared or referenced as a supertype,
/// in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassSet {
    names: IndexSet<ClassName>,
}

impl ClassSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the name was not already present.
    pub fn insert(&mut self, name: ClassName) -> bool {
        self.names.insert(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassName> {
        self.names.iter()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<'a> IntoIterator for &'a ClassSet {
    type Item = &'a ClassName;
    type IntoIter = indexmap::set::Iter<'a, ClassName>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Inheritance,
    Usage,
}

impl RelationshipKind {
    /// Lowercase tag used in edge ids and the `style` field.
    pub fn tag(self) -> &'static str {
        match self {
            RelationshipKind::Inheritance => "inheritance",
            RelationshipKind::Usage => "usage",
        }
    }

    /// Display label attached to the edge.
    pub fn label(self) -> &'static str {
        match self {
            RelationshipKind::Inheritance => "inherits",
            RelationshipKind::Usage => "uses",
        }
    }

    fn arrow(self) -> &'static str {
        match self {
            RelationshipKind::Inheritance => "<|--",
            RelationshipKind::Usage => "..>",
        }
    }
}

/// A directed edge between two classes.
///
/// Inheritance edges point from supertype to subtype; usage edges point from
/// the user to the used class.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
    pub source: ClassName,
    pub target: ClassName,
    pub kind: RelationshipKind,
}

impl Relationship {
    pub fn inheritance(supertype: ClassName, subtype: ClassName) -> Self {
        Self {
            source: supertype,
            target: subtype,
            kind: RelationshipKind::Inheritance,
        }
    }

    pub fn usage(user: ClassName, used: ClassName) -> Self {
        Self {
            source: user,
            target: used,
            kind: RelationshipKind::Usage,
        }
    }

    pub fn is_self_reference(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.source, self.kind.arrow(), self.target)
    }
}

/// Append-only, deduplicated relationship log keyed on `(kind, source, target)`.
#[derive(Clone, Debug, Default)]
pub struct RelationshipLog {
    entries: IndexSet<Relationship>,
}

impl RelationshipLog {
    /// Append `relationship` unless an equal one exists or it is a self-edge.
    /// Returns whether it was appended.
    pub fn push(&mut self, relationship: Relationship) -> bool {
        if relationship.is_self_reference() {
            return false;
        }
        self.entries.insert(relationship)
    }

    pub fn contains(&self, relationship: &Relationship) -> bool {
        self.entries.contains(relationship)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Relationship> {
        self.entries.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Per-scan state
// ---------------------------------------------------------------------------

/// Accumulators for one scan pass, threaded through locate and classify.
#[derive(Debug, Default)]
pub struct ScanState {
    pub classes: ClassSet,
    pub records: IndexMap<ClassName, ClassRecord>,
    pub relationships: RelationshipLog,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> ScanOutput {
        ScanOutput {
            classes: self.classes,
            records: self.records.into_values().collect(),
            relationships: self.relationships.into_vec(),
        }
    }
}

/// Immutable result of a scan.
#[derive(Clone, Debug)]
pub struct ScanOutput {
    pub classes: ClassSet,
    pub records: Vec<ClassRecord>,
    pub relationships: Vec<Relationship>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
