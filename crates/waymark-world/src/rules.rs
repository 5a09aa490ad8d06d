//! Parsing of `access_rules` / `visibility_rules` and their inheritance.
//!
//! Accepted shapes for a rule field:
//!
//! - absent or `null`: no local clauses
//! - `"a,b"`: one clause, split on commas
//! - `["a,b", ["c", "d"]]`: one clause per entry; string entries are
//!   comma-split, array entries supply one token per element
//!
//! Entries of any other kind are dropped one by one with a
//! [`BadRule`](DiagnosticKind::BadRule) diagnostic. A field of any other
//! kind is ignored as a whole. Whatever local clauses survive are merged
//! onto the inherited [`RuleSet`] with [`RuleSet::merge`]; when none
//! survive the inherited set passes through unchanged.

use serde_json::Value;
use waymark_types::{Clause, RuleSet};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::fields::{self, Object};

/// Which of the two rule fields is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// `access_rules`: can the items be collected.
    Access,
    /// `visibility_rules`: is the location shown at all.
    Visibility,
}

impl RuleKind {
    /// Pack field name for this kind.
    pub const fn field(self) -> &'static str {
        match self {
            Self::Access => "access_rules",
            Self::Visibility => "visibility_rules",
        }
    }
}

/// Parse the local clauses of a rule field.
pub fn parse_clauses(
    node: &Object,
    kind: RuleKind,
    subject: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<Clause> {
    let field = kind.field();
    match fields::present(node, field) {
        None => Vec::new(),
        Some(Value::String(raw)) => vec![Clause::new(fields::split_tokens(raw))],
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| parse_entry(entry, field, subject, diagnostics))
            .collect(),
        Some(other) => {
            diagnostics.push(
                DiagnosticKind::InvalidField { field },
                subject,
                format!("invalid {field}: got {}", fields::kind_name(other)),
            );
            Vec::new()
        }
    }
}

/// Compute a node's effective rule set from the inherited one.
pub fn resolve(
    inherited: &RuleSet,
    node: &Object,
    kind: RuleKind,
    subject: &str,
    diagnostics: &mut Diagnostics,
) -> RuleSet {
    inherited.merge(&parse_clauses(node, kind, subject, diagnostics))
}

fn parse_entry(
    entry: &Value,
    field: &'static str,
    subject: &str,
    diagnostics: &mut Diagnostics,
) -> Option<Clause> {
    match entry {
        Value::String(raw) => Some(Clause::new(fields::split_tokens(raw))),
        Value::Array(parts) => {
            let mut tokens = Vec::with_capacity(parts.len());
            for part in parts {
                if let Value::String(token) = part {
                    tokens.push(token.clone());
                } else {
                    bad_rule(field, part, subject, diagnostics);
                }
            }
            Some(Clause::new(tokens))
        }
        other => {
            bad_rule(field, other, subject, diagnostics);
            None
        }
    }
}

fn bad_rule(field: &'static str, value: &Value, subject: &str, diagnostics: &mut Diagnostics) {
    diagnostics.push(
        DiagnosticKind::BadRule { field },
        subject,
        format!("bad entry in {field}: {}", fields::kind_name(value)),
    );
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Object {
        match value {
            Value::Object(map) => map,
            _ => Object::new(),
        }
    }

    fn rules(raw: &[&[&str]]) -> RuleSet {
        raw.iter().map(|c| Clause::from(*c)).collect()
    }

    #[test]
    fn string_field_is_one_comma_split_clause() {
        let node = object(json!({ "access_rules": "hookshot, bombs" }));
        let mut diags = Diagnostics::new();
        let clauses = parse_clauses(&node, RuleKind::Access, "n", &mut diags);
        assert_eq!(clauses, vec![Clause::from(&["hookshot", "bombs"][..])]);
        assert!(diags.is_empty());
    }

    #[test]
    fn array_mixes_string_and_array_entries() {
        let node = object(json!({ "visibility_rules": ["a,b", ["c", "d"], "e"] }));
        let mut diags = Diagnostics::new();
        let clauses = parse_clauses(&node, RuleKind::Visibility, "n", &mut diags);
        assert_eq!(
            RuleSet::from(clauses),
            rules(&[&["a", "b"], &["c", "d"], &["e"]])
        );
    }

    #[test]
    fn bad_entries_are_dropped_individually() {
        let node = object(json!({ "access_rules": [1, "a", {"x": 1}, ["b", 2, "c"]] }));
        let mut diags = Diagnostics::new();
        let clauses = parse_clauses(&node, RuleKind::Access, "n", &mut diags);
        assert_eq!(RuleSet::from(clauses), rules(&[&["a"], &["b", "c"]]));
        assert_eq!(
            diags.count_where(|k| matches!(k, DiagnosticKind::BadRule { .. })),
            3
        );
    }

    #[test]
    fn absent_or_empty_inherits_parent() {
        let parent = rules(&[&["a"], &["b"]]);
        let mut diags = Diagnostics::new();
        for node in [json!({}), json!({ "access_rules": null }), json!({ "access_rules": [] })] {
            let resolved = resolve(&parent, &object(node), RuleKind::Access, "n", &mut diags);
            assert_eq!(resolved, parent);
        }
        assert!(diags.is_empty());
    }

    #[test]
    fn malformed_field_warns_and_inherits() {
        let parent = rules(&[&["a"]]);
        let node = object(json!({ "access_rules": 7 }));
        let mut diags = Diagnostics::new();
        let resolved = resolve(&parent, &node, RuleKind::Access, "n", &mut diags);
        assert_eq!(resolved, parent);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn all_invalid_entries_inherit_parent() {
        let parent = rules(&[&["a"]]);
        let node = object(json!({ "access_rules": [1, true] }));
        let mut diags = Diagnostics::new();
        let resolved = resolve(&parent, &node, RuleKind::Access, "n", &mut diags);
        assert_eq!(resolved, parent);
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn local_rule_gates_every_parent_path() {
        let parent = rules(&[&["a"], &["b"]]);
        let node = object(json!({ "access_rules": ["p"] }));
        let mut diags = Diagnostics::new();
        let resolved = resolve(&parent, &node, RuleKind::Access, "n", &mut diags);
        assert_eq!(resolved, rules(&[&["a", "p"], &["b", "p"]]));
    }
}
