//! Usage classification between located classes.
//!
//! Three independent lexical detectors decide whether a class body refers to
//! another class. Any one of them is enough; false positives from comments
//! or strings are accepted.

use regex::Regex;

use crate::models::{ClassName, ClassRecord, ClassSet, Relationship, ScanState};

/// Which detector fired for a `(user, used)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UsageEvidence {
    Instantiation,
    StaticAccess,
    TypeReference,
}

/// Compiled detectors for one referenced class name.
pub struct TargetDetectors {
    target: ClassName,
    instantiation: Regex,
    static_access: Regex,
    type_reference: Regex,
}

impl TargetDetectors {
    pub fn new(target: &ClassName) -> Self {
        let escaped = regex::escape(target.as_str());
        Self {
            target: target.clone(),
            instantiation: compile(&format!(r"new\s+{escaped}\s*\(")),
            static_access: compile(&format!(r"{escaped}\s*\.\s*[A-Za-z_][A-Za-z0-9_]*")),
            type_reference: compile(&format!(r"(?:^|[^A-Za-z0-9_]){escaped}(?:\?|\b|<|\[)")),
        }
    }

    pub fn target(&self) -> &ClassName {
        &self.target
    }

    /// `new T(`, allowing whitespace before the parenthesis.
    pub fn is_instantiation(&self, body: &str) -> bool {
        self.instantiation.is_match(body)
    }

    /// `T.member` with optional whitespace around the dot.
    pub fn is_static_access(&self, body: &str) -> bool {
        self.static_access.is_match(body)
    }

    /// `T` as a standalone token, including `T?`, `T<..>` and `T[]` forms.
    pub fn is_type_reference(&self, body: &str) -> bool {
        self.type_reference.is_match(body)
    }

    /// Every detector that matches `body`, in detector order.
    pub fn evidence(&self, body: &str) -> Vec<UsageEvidence> {
        let mut found = Vec::new();
        if self.is_instantiation(body) {
            found.push(UsageEvidence::Instantiation);
        }
        if self.is_static_access(body) {
            found.push(UsageEvidence::StaticAccess);
        }
        if self.is_type_reference(body) {
            found.push(UsageEvidence::TypeReference);
        }
        found
    }
}

// The target is escaped, so the pattern is always valid.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// Build detectors for every class in `classes`, in set order.
pub fn detectors_for(classes: &ClassSet) -> Vec<TargetDetectors> {
    classes.iter().map(TargetDetectors::new).collect()
}

/// Usage relationships from `records` to any class in `detectors`.
///
/// Output order is record order, then detector order. Self references are
/// never emitted.
pub fn usage_relationships(
    records: &[&ClassRecord],
    detectors: &[TargetDetectors],
) -> Vec<Relationship> {
    let mut found = Vec::new();
    for record in records {
        for detector in detectors {
            if detector.target() == &record.name {
                continue;
            }
            if !detector.evidence(&record.body).is_empty() {
                found.push(Relationship::usage(
                    record.name.clone(),
                    detector.target().clone(),
                ));
            }
        }
    }
    found
}

/// Append usage edges for every located record to `state`.
pub fn classify_usages(state: &mut ScanState) {
    let detectors = detectors_for(&state.classes);
    let records: Vec<&ClassRecord> = state.records.values().collect();
    let usages = usage_relationships(&records, &detectors);
    for relationship in usages {
        state.relationships.push(relationship);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detectors(name: &str) -> TargetDetectors {
        TargetDetectors::new(&ClassName::new(name).unwrap())
    }

    fn record(name: &str, body: &str) -> ClassRecord {
        ClassRecord {
            name: ClassName::new(name).unwrap(),
            body: body.to_string(),
        }
    }

    // -- Instantiation ------------------------------------------------------

    #[test]
    fn test_instantiation_detected() {
        let d = detectors("Animal");
        assert!(d.is_instantiation("var a = new Animal();"));
        assert!(d.is_instantiation("new   Animal  (1, 2)"));
        assert!(!d.is_instantiation("new Animals()"));
        assert!(!d.is_instantiation("Animal()"));
    }

    // -- Static access ------------------------------------------------------

    #[test]
    fn test_static_access_detected() {
        let d = detectors("Config");
        assert!(d.is_static_access("var x = Config.Instance;"));
        assert!(d.is_static_access("Config . Load()"));
        assert!(!d.is_static_access("Config;"));
        assert!(!d.is_static_access("Config.1"));
    }

    // -- Type reference -----------------------------------------------------

    #[test]
    fn test_type_reference_forms() {
        let d = detectors("Item");
        assert!(d.is_type_reference("private Item current;"));
        assert!(d.is_type_reference("Item? maybe;"));
        assert!(d.is_type_reference("List<Item> items;"));
        assert!(d.is_type_reference("Item[] all;"));
        assert!(d.is_type_reference("Item<T> generic;"));
        assert!(d.is_type_reference("Item"));
    }

    #[test]
    fn test_type_reference_requires_token_boundaries() {
        let d = detectors("Item");
        assert!(!d.is_type_reference("ItemCount = 3;"));
        assert!(!d.is_type_reference("var myItem = 3;"));
        assert!(!d.is_type_reference("_Item x;"));
    }

    #[test]
    fn test_target_name_is_escaped() {
        // Names are identifiers, but escaping must keep them literal.
        let d = detectors("A_1");
        assert!(d.is_type_reference("A_1 x;"));
        assert!(!d.is_type_reference("AA1 x;"));
    }

    #[test]
    fn test_evidence_lists_every_detector() {
        let d = detectors("Foo");
        let evidence = d.evidence("Foo f = new Foo(); Foo.Bar();");
        assert_eq!(
            evidence,
            vec![
                UsageEvidence::Instantiation,
                UsageEvidence::StaticAccess,
                UsageEvidence::TypeReference,
            ]
        );
        assert!(d.evidence("nothing here").is_empty());
    }

    // -- Relationship emission ----------------------------------------------

    #[test]
    fn test_usage_relationships_skip_self() {
        let records = [record("Node", " Node Next; ")];
        let refs: Vec<&ClassRecord> = records.iter().collect();
        let dets = vec![detectors("Node")];
        assert!(usage_relationships(&refs, &dets).is_empty());
    }

    #[test]
    fn test_usage_relationships_order() {
        let records = [record("A", "C c; B b;"), record("B", "new A()")];
        let refs: Vec<&ClassRecord> = records.iter().collect();
        let dets = vec![detectors("A"), detectors("B"), detectors("C")];
        let rels: Vec<String> = usage_relationships(&refs, &dets)
            .iter()
            .map(|r| r.to_string())
            .collect();
        assert_eq!(rels, vec!["A ..> B", "A ..> C", "B ..> A"]);
    }

    #[test]
    fn test_classify_usages_deduplicates_against_state() {
        let mut state = ScanState::new();
        for name in ["A", "B"] {
            let class_name = ClassName::new(name).unwrap();
            state.classes.insert(class_name.clone());
            state
                .records
                .insert(class_name, record(name, "B b = new B(); B.Run();"));
        }
        classify_usages(&mut state);
        classify_usages(&mut state);
        let rels: Vec<String> = state
            .relationships
            .into_vec()
            .iter()
            .map(|r| r.to_string())
            .collect();
        assert_eq!(rels, vec!["A ..> B"]);
    }
}
