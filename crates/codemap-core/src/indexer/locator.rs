//! Class declaration scanning and brace-matched body extraction.
//!
//! The scanner is lexical: it looks for `class NAME [: SUPER]` anywhere in
//! the buffer, including inside other class bodies, and never fails on
//! malformed input.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{ClassName, ClassRecord, Relationship, ScanState};

static CLASS_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"class\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*([A-Za-z_][A-Za-z0-9_]*))?").unwrap()
});

/// A declaration site found by the scanner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: ClassName,
    pub supertype: Option<ClassName>,
    /// Byte offset of the start of the match.
    pub start: usize,
}

/// All declaration sites in `buffer`, left to right.
pub fn declarations(buffer: &str) -> Vec<Declaration> {
    CLASS_DECL_RE
        .captures_iter(buffer)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            Some(Declaration {
                name: ClassName::from_capture(name.as_str()),
                supertype: caps.get(2).map(|m| ClassName::from_capture(m.as_str())),
                start: whole.start(),
            })
        })
        .collect()
}

/// Text between the first `{` at or after `from` and its matching `}`.
///
/// Returns `None` when no `{` follows. When the buffer ends before the
/// braces balance, the remainder of the buffer is the body.
pub fn body_span(buffer: &str, from: usize) -> Option<&str> {
    let open = from + buffer.get(from..)?.find('{')?;
    let body_start = open + 1;
    let mut depth = 1usize;
    for (offset, byte) in buffer.as_bytes()[body_start..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&buffer[body_start..body_start + offset]);
                }
            }
            _ => {}
        }
    }
    Some(&buffer[body_start..])
}

/// Record every declaration into `state`: class names, seeded inheritance
/// edges, and the first body found per class name.
pub fn locate_classes(buffer: &str, state: &mut ScanState) {
    for decl in declarations(buffer) {
        state.classes.insert(decl.name.clone());

        if let Some(supertype) = decl.supertype {
            state.classes.insert(supertype.clone());
            state
                .relationships
                .push(Relationship::inheritance(supertype, decl.name.clone()));
        }

        let Some(body) = body_span(buffer, decl.start) else {
            debug!(class = %decl.name, "declaration has no body");
            continue;
        };

        if state.records.contains_key(&decl.name) {
            debug!(class = %decl.name, "duplicate declaration, keeping first body");
            continue;
        }
        state.records.insert(
            decl.name.clone(),
            ClassRecord {
                name: decl.name,
                body: body.to_string(),
            },
        );
    }
}
