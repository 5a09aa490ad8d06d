//! Access and visibility rule sets.
//!
//! A [`RuleSet`] is an OR of AND-clauses over opaque rule tokens. The
//! tracker never evaluates tokens itself; it only builds rule sets from
//! pack data and hands them to the rule evaluator.
//!
//! # Inheritance
//!
//! A node's effective rule set is its parent's set combined with the
//! node's own clauses (see [`RuleSet::merge`]):
//!
//! - no local clauses: the parent set is inherited unchanged
//! - empty parent: the local clauses are used as-is
//! - otherwise: every parent clause is joined with every local clause,
//!   so each of the parent's paths is further gated by each local
//!   alternative

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An AND-combination of rule tokens.
///
/// An empty clause places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Clause(pub Vec<String>);

impl Clause {
    /// Create a clause from its tokens.
    pub const fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    /// Return the tokens of this clause in order.
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Return the number of tokens.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the clause has no tokens.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenate `self` followed by `other` into a new clause.
    pub fn joined(&self, other: &Self) -> Self {
        let mut tokens = Vec::with_capacity(self.0.len().saturating_add(other.0.len()));
        tokens.extend(self.0.iter().cloned());
        tokens.extend(other.0.iter().cloned());
        Self(tokens)
    }
}

impl<S: Into<String>> FromIterator<S> for Clause {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// An OR of [`Clause`]s. The empty set is always satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RuleSet(pub Vec<Clause>);

impl RuleSet {
    /// Create an empty (unconstrained) rule set.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Return the clauses in order.
    pub fn clauses(&self) -> &[Clause] {
        &self.0
    }

    /// Return the number of clauses.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the set places no constraint.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Combine this (inherited) rule set with a node's local clauses.
    ///
    /// Clauses are emitted local-major: for each local clause in order,
    /// one joined clause per inherited clause in order.
    pub fn merge(&self, local: &[Clause]) -> Self {
        if local.is_empty() {
            return self.clone();
        }
        if self.0.is_empty() {
            return Self(local.to_vec());
        }
        let mut clauses = Vec::with_capacity(self.0.len().saturating_mul(local.len()));
        for own in local {
            for inherited in &self.0 {
                clauses.push(inherited.joined(own));
            }
        }
        Self(clauses)
    }
}

impl From<Vec<Clause>> for RuleSet {
    fn from(clauses: Vec<Clause>) -> Self {
        Self(clauses)
    }
}

impl<C: Into<Clause>> FromIterator<C> for RuleSet {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for Clause {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl From<&[&str]> for Clause {
    fn from(tokens: &[&str]) -> Self {
        tokens.iter().copied().collect()
    }
}
