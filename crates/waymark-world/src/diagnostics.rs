//! Structured record of everything the builder dropped or defaulted.
//!
//! Pack loading is best-effort: a malformed field never aborts the build.
//! Each problem is pushed here and also emitted as a `tracing` warning, so
//! callers can inspect what happened without scraping logs.

use serde::Serialize;
use tracing::warn;

/// Category of a non-fatal pack problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A location node was neither an object nor an array.
    NotAnObject,
    /// A field had the wrong JSON kind and was treated as absent.
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
    },
    /// One entry of a rule list was dropped.
    BadRule {
        /// `access_rules` or `visibility_rules`.
        field: &'static str,
    },
    /// A `map_locations` entry was not an object.
    BadMapLocation,
    /// A `sections` entry was not an object.
    BadSection,
    /// A `parent` reference matched no known location.
    UnresolvedParent {
        /// The reference after the `@` marker was stripped.
        reference: String,
    },
    /// A persisted record did not match the tree it was applied to.
    StateMismatch,
}

/// A single non-fatal problem found while processing pack or state data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// What went wrong.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    /// Name or identifier of the node being processed.
    pub subject: String,
    /// Human-readable description.
    pub message: String,
}

/// Ordered collection of [`Diagnostic`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a problem and log it.
    pub fn push(&mut self, kind: DiagnosticKind, subject: &str, message: impl Into<String>) {
        let message = message.into();
        warn!(subject = %subject.escape_debug(), "{message}");
        self.entries.push(Diagnostic {
            kind,
            subject: subject.to_owned(),
            message,
        });
    }

    /// Move all entries of `other` to the end of this collector.
    pub fn append(&mut self, other: &mut Self) {
        self.entries.append(&mut other.entries);
    }

    /// Return all recorded entries in order.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Return the number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count entries matching a predicate on their kind.
    pub fn count_where(&self, predicate: impl Fn(&DiagnosticKind) -> bool) -> usize {
        self.entries.iter().filter(|d| predicate(&d.kind)).count()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_order_and_subject() {
        let mut diags = Diagnostics::new();
        diags.push(DiagnosticKind::BadSection, "Cave", "bad section");
        diags.push(DiagnosticKind::NotAnObject, "", "not an object");
        assert_eq!(diags.len(), 2);
        assert_eq!(diags.entries().first().map(|d| d.subject.as_str()), Some("Cave"));
        assert_eq!(
            diags.count_where(|k| matches!(k, DiagnosticKind::NotAnObject)),
            1
        );
    }

    #[test]
    fn serializes_kind_inline() {
        let mut diags = Diagnostics::new();
        diags.push(
            DiagnosticKind::UnresolvedParent {
                reference: "Lake".to_owned(),
            },
            "Shore",
            "did not find parent",
        );
        let json = serde_json::to_value(&diags).ok();
        assert_eq!(
            json,
            Some(serde_json::json!([{
                "kind": "unresolved_parent",
                "reference": "Lake",
                "subject": "Shore",
                "message": "did not find parent",
            }]))
        );
    }
}
