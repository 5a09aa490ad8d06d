//! Sections: the collectible units of a location and their clearing state.
//!
//! A [`Section`] is built once from pack data and is structurally
//! immutable afterwards. Its [`SectionState`] holds the only mutable
//! value, the cleared-item counter, and drives the clearing state machine:
//!
//! | Call | Fails when | Effect |
//! |------|-----------|--------|
//! | [`SectionState::clear_item`] | `cleared >= item_count` | `+1`, or jump to `item_count` for group sections / `all` |
//! | [`SectionState::unclear_item`] | `cleared == 0` | `-1`, or reset to `0` for group sections |
//! | [`SectionState::set_available`] | result out of range high | `cleared = item_count - available`, low side clamped to `0` |
//! | [`SectionState::load`] | never | counter replaced verbatim |
//!
//! Every successful change that alters the counter notifies the
//! registered observers synchronously, in registration order.
//!
//! # Reentrancy
//!
//! Observers receive a [`SectionChange`] by shared reference while the
//! state is mutably borrowed. An observer must not try to mutate the same
//! section (for example through a shared `RefCell` handle) from inside the
//! callback; there is no reentrancy guard.

use serde_json::Value;
use tracing::debug;
use waymark_types::{ImageSet, RuleSet, SectionSave};

use crate::error::WorldError;
use crate::fields;

// ---------------------------------------------------------------------------
// Change notification
// ---------------------------------------------------------------------------

/// Payload delivered to section observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionChange {
    /// Counter value before the change.
    pub previous: i32,
    /// Counter value after the change.
    pub cleared: i32,
    /// Total number of items in the section.
    pub item_count: i32,
}

/// Registration token returned by [`SectionState::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&SectionChange)>;

// ---------------------------------------------------------------------------
// SectionState
// ---------------------------------------------------------------------------

/// Cleared-item counter of a single section plus its observers.
pub struct SectionState {
    item_count: i32,
    clear_as_group: bool,
    cleared: i32,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl SectionState {
    /// Create a state with nothing cleared.
    pub const fn new(item_count: i32, clear_as_group: bool) -> Self {
        Self {
            item_count,
            clear_as_group,
            cleared: 0,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    /// Total number of collectible items.
    pub const fn item_count(&self) -> i32 {
        self.item_count
    }

    /// Number of items marked collected.
    pub const fn cleared(&self) -> i32 {
        self.cleared
    }

    /// Number of items still to collect (`item_count - cleared`).
    pub const fn available(&self) -> i32 {
        self.item_count.saturating_sub(self.cleared)
    }

    /// Whether the whole count clears and unclears as one action.
    pub const fn clear_as_group(&self) -> bool {
        self.clear_as_group
    }

    /// Whether every item has been collected.
    pub const fn is_fully_cleared(&self) -> bool {
        self.cleared >= self.item_count
    }

    /// Register an observer for counter changes.
    pub fn subscribe(&mut self, observer: impl FnMut(&SectionChange) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer = self.next_observer.saturating_add(1);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a previously registered observer.
    ///
    /// Returns `false` if the token is unknown.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    /// Return the number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Mark one item (or the whole section) collected.
    ///
    /// Group sections and `all = true` jump straight to `item_count`.
    /// Returns `false` without notifying if already fully cleared.
    pub fn clear_item(&mut self, all: bool) -> bool {
        if self.cleared >= self.item_count {
            return false;
        }
        let next = if self.clear_as_group || all {
            self.item_count
        } else {
            self.cleared.saturating_add(1)
        };
        self.apply(next);
        true
    }

    /// Undo one collected item (or reset a group section).
    ///
    /// Returns `false` without notifying if the counter is zero. A negative
    /// counter left by [`load`](Self::load) still unclears: a group section
    /// resets to zero, any other section decrements.
    pub fn unclear_item(&mut self) -> bool {
        if self.cleared == 0 {
            return false;
        }
        let next = if self.clear_as_group {
            0
        } else {
            self.cleared.saturating_sub(1)
        };
        self.apply(next);
        true
    }

    /// Set the counter from a requested number of remaining items.
    ///
    /// Computes `cleared = item_count - available`. A result below zero is
    /// clamped to zero; a result above `item_count` is rejected and the
    /// current value kept. Returns `true` if the counter changed.
    pub fn set_available(&mut self, available: i64) -> bool {
        let wanted = i64::from(self.item_count).saturating_sub(available).max(0);
        let next = if wanted > i64::from(self.item_count) {
            self.cleared
        } else {
            i32::try_from(wanted).unwrap_or(self.cleared)
        };
        if next == self.cleared {
            return false;
        }
        self.apply(next);
        true
    }

    /// Return the persisted form of this state.
    pub const fn save(&self) -> SectionSave {
        SectionSave {
            cleared: self.cleared,
        }
    }

    /// Restore a persisted counter verbatim.
    ///
    /// The value is not clamped to `0..=item_count`. Observers fire only
    /// if the value differs from the current one.
    pub fn load(&mut self, saved: SectionSave) {
        if saved.cleared == self.cleared {
            return;
        }
        if saved.cleared < 0 || saved.cleared > self.item_count {
            debug!(
                cleared = saved.cleared,
                item_count = self.item_count,
                "Restoring out-of-range section counter"
            );
        }
        self.apply(saved.cleared);
    }

    /// Restore from a raw JSON record of the form `{"cleared": n}`.
    ///
    /// A missing or non-integer `cleared` keeps the current value.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::MalformedSectionState`] if `record` is not an
    /// object.
    pub fn load_json(&mut self, record: &Value) -> Result<(), WorldError> {
        let Value::Object(map) = record else {
            return Err(WorldError::MalformedSectionState {
                kind: fields::kind_name(record),
            });
        };
        let cleared = map
            .get("cleared")
            .and_then(fields::coerce_int)
            .unwrap_or(self.cleared);
        self.load(SectionSave { cleared });
        Ok(())
    }

    fn apply(&mut self, next: i32) {
        let change = SectionChange {
            previous: self.cleared,
            cleared: next,
            item_count: self.item_count,
        };
        self.cleared = next;
        debug!(
            previous = change.previous,
            cleared = change.cleared,
            item_count = change.item_count,
            "Section counter changed"
        );
        for (_, observer) in &mut self.observers {
            observer(&change);
        }
    }
}

impl core::fmt::Debug for SectionState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SectionState")
            .field("item_count", &self.item_count)
            .field("clear_as_group", &self.clear_as_group)
            .field("cleared", &self.cleared)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Copies the counter but not the observers; a copy starts unobserved.
impl Clone for SectionState {
    fn clone(&self) -> Self {
        Self {
            item_count: self.item_count,
            clear_as_group: self.clear_as_group,
            cleared: self.cleared,
            observers: Vec::new(),
            next_observer: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// A collectible unit (or group of units) inside a location.
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    hosted_items: Vec<String>,
    images: ImageSet,
    access_rules: RuleSet,
    visibility_rules: RuleSet,
    state: SectionState,
}

impl Section {
    /// Assemble a section from already-resolved parts.
    pub const fn new(
        name: String,
        hosted_items: Vec<String>,
        images: ImageSet,
        access_rules: RuleSet,
        visibility_rules: RuleSet,
        state: SectionState,
    ) -> Self {
        Self {
            name,
            hosted_items,
            images,
            access_rules,
            visibility_rules,
            state,
        }
    }

    /// Section name, unique only by convention within its location.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifiers of items hosted by this section.
    pub fn hosted_items(&self) -> &[String] {
        &self.hosted_items
    }

    /// Resolved chest and overlay images.
    pub const fn images(&self) -> &ImageSet {
        &self.images
    }

    /// Effective access rules (inherited and local combined).
    pub const fn access_rules(&self) -> &RuleSet {
        &self.access_rules
    }

    /// Effective visibility rules (inherited and local combined).
    pub const fn visibility_rules(&self) -> &RuleSet {
        &self.visibility_rules
    }

    /// Clearing state.
    pub const fn state(&self) -> &SectionState {
        &self.state
    }

    /// Mutable clearing state.
    pub const fn state_mut(&mut self) -> &mut SectionState {
        &mut self.state
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;

    fn recorder(state: &mut SectionState) -> Rc<RefCell<Vec<SectionChange>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        state.subscribe(move |change| sink.borrow_mut().push(*change));
        seen
    }

    #[test]
    fn clear_increments_until_full() {
        let mut state = SectionState::new(2, false);
        let seen = recorder(&mut state);
        assert!(state.clear_item(false));
        assert!(state.clear_item(false));
        assert_eq!(state.cleared(), 2);
        assert!(!state.clear_item(false));
        assert_eq!(state.cleared(), 2);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn clear_all_jumps_to_item_count() {
        let mut state = SectionState::new(4, false);
        assert!(state.clear_item(false));
        assert!(state.clear_item(true));
        assert_eq!(state.cleared(), 4);
        assert!(state.is_fully_cleared());
    }

    #[test]
    fn group_section_clears_and_unclears_atomically() {
        let mut state = SectionState::new(5, true);
        assert!(state.clear_item(false));
        assert_eq!(state.cleared(), 5);
        assert!(state.unclear_item());
        assert_eq!(state.cleared(), 0);
        assert!(!state.unclear_item());
    }

    #[test]
    fn group_section_clears_from_a_partial_counter_in_one_step() {
        let mut state = SectionState::new(5, true);
        state.load(SectionSave { cleared: 2 });
        let seen = recorder(&mut state);
        assert!(state.clear_item(false));
        assert_eq!(state.cleared(), 5);
        assert_eq!(
            *seen.borrow(),
            vec![SectionChange {
                previous: 2,
                cleared: 5,
                item_count: 5
            }]
        );
    }

    #[test]
    fn unclear_after_negative_load_resets_group_section() {
        let mut state = SectionState::new(5, true);
        state.load(SectionSave { cleared: -3 });
        let seen = recorder(&mut state);
        assert!(state.unclear_item());
        assert_eq!(state.cleared(), 0);
        assert_eq!(seen.borrow().len(), 1);
        assert!(!state.unclear_item());
    }

    #[test]
    fn unclear_after_negative_load_decrements_plain_section() {
        let mut state = SectionState::new(2, false);
        state.load(SectionSave { cleared: -1 });
        assert!(state.unclear_item());
        assert_eq!(state.cleared(), -2);
    }

    #[test]
    fn unclear_decrements_and_stops_at_zero() {
        let mut state = SectionState::new(3, false);
        let seen = recorder(&mut state);
        state.clear_item(true);
        assert!(state.unclear_item());
        assert_eq!(state.cleared(), 2);
        assert!(state.unclear_item());
        assert!(state.unclear_item());
        assert!(!state.unclear_item());
        assert_eq!(state.cleared(), 0);
        assert_eq!(seen.borrow().len(), 4);
    }

    #[test]
    fn zero_item_section_is_already_cleared() {
        let mut state = SectionState::new(0, false);
        assert!(state.is_fully_cleared());
        assert!(!state.clear_item(false));
        assert!(!state.unclear_item());
    }

    #[test]
    fn observers_fire_in_registration_order() {
        let mut state = SectionState::new(1, false);
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let sink = Rc::clone(&order);
            state.subscribe(move |_| sink.borrow_mut().push(tag));
        }
        state.clear_item(false);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribed_observer_stops_firing() {
        let mut state = SectionState::new(3, false);
        let hits = Rc::new(RefCell::new(0_u32));
        let sink = Rc::clone(&hits);
        let id = state.subscribe(move |_| *sink.borrow_mut() += 1);
        state.clear_item(false);
        assert!(state.unsubscribe(id));
        assert!(!state.unsubscribe(id));
        state.clear_item(false);
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(state.observer_count(), 0);
    }

    #[test]
    fn change_payload_carries_previous_value() {
        let mut state = SectionState::new(3, false);
        let seen = recorder(&mut state);
        state.clear_item(false);
        assert_eq!(
            seen.borrow().first().copied(),
            Some(SectionChange {
                previous: 0,
                cleared: 1,
                item_count: 3
            })
        );
    }

    #[test]
    fn set_available_clamps_low_and_rejects_high() {
        let mut state = SectionState::new(3, false);
        let seen = recorder(&mut state);

        assert!(state.set_available(1));
        assert_eq!(state.cleared(), 2);

        // More available than exist: cleared would be negative, clamp to 0.
        assert!(state.set_available(10));
        assert_eq!(state.cleared(), 0);

        state.clear_item(false);
        // Negative availability: cleared would exceed item_count, keep value.
        assert!(!state.set_available(-1));
        assert_eq!(state.cleared(), 1);

        // Unchanged value does not notify.
        assert!(!state.set_available(2));
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn load_is_verbatim_and_notifies_only_on_change() {
        let mut state = SectionState::new(2, false);
        let seen = recorder(&mut state);
        state.load(SectionSave { cleared: 7 });
        assert_eq!(state.cleared(), 7);
        state.load(SectionSave { cleared: 7 });
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn save_then_load_is_a_no_op() {
        let mut state = SectionState::new(4, false);
        state.clear_item(false);
        let seen = recorder(&mut state);
        let saved = state.save();
        state.load(saved);
        assert_eq!(state.cleared(), 1);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn load_json_requires_object_and_defaults_missing_counter() {
        let mut state = SectionState::new(3, false);
        state.clear_item(false);
        assert!(state.load_json(&json!([1])).is_err());
        assert!(state.load_json(&json!({})).is_ok());
        assert_eq!(state.cleared(), 1);
        assert!(state.load_json(&json!({ "cleared": "x" })).is_ok());
        assert_eq!(state.cleared(), 1);
        assert!(state.load_json(&json!({ "cleared": 3 })).is_ok());
        assert_eq!(state.cleared(), 3);
    }

    #[test]
    fn clone_drops_observers_but_keeps_counter() {
        let mut state = SectionState::new(3, false);
        let _seen = recorder(&mut state);
        state.clear_item(false);
        let copy = state.clone();
        assert_eq!(copy.cleared(), 1);
        assert_eq!(copy.observer_count(), 0);
    }
}
