//! Named section properties exposed to the rule-evaluation scripts.
//!
//! Scripts address section counters by property name. The set of names is
//! closed: [`SectionProperty`] enumerates them, and any other name yields
//! [`BridgeError::UnknownProperty`].
//!
//! | Property | Read | Write |
//! |----------|------|-------|
//! | `AvailableChestCount` | `item_count - cleared` | via [`SectionState::set_available`] |
//! | `ChestCount` | `item_count` | read-only |
//! | `Owner` | empty placeholder table | read-only |
//! | `CapturedItem` | write-only | accepted, no effect yet |

use core::str::FromStr;

use tracing::debug;

use crate::error::BridgeError;
use crate::section::{Section, SectionState};

/// The closed set of properties a script can touch on a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionProperty {
    /// Placeholder owner object.
    Owner,
    /// Items left to collect.
    AvailableChestCount,
    /// Total items in the section.
    ChestCount,
    /// Item captured at this section.
    CapturedItem,
}

impl SectionProperty {
    /// Every property, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Owner,
        Self::AvailableChestCount,
        Self::ChestCount,
        Self::CapturedItem,
    ];

    /// Script-facing name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::AvailableChestCount => "AvailableChestCount",
            Self::ChestCount => "ChestCount",
            Self::CapturedItem => "CapturedItem",
        }
    }
}

impl FromStr for SectionProperty {
    type Err = BridgeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| BridgeError::UnknownProperty(name.to_owned()))
    }
}

impl core::fmt::Display for SectionProperty {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A value crossing the script boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Script integer.
    Integer(i64),
    /// Script float.
    Number(f64),
    /// Script string.
    Text(String),
    /// Empty script table.
    Table,
}

/// Typed property access for script bindings.
pub trait PropertyBridge {
    /// Read a property.
    fn get_property(&self, property: SectionProperty) -> Result<PropertyValue, BridgeError>;

    /// Write a property. Returns `true` if observable state changed.
    fn set_property(
        &mut self,
        property: SectionProperty,
        value: PropertyValue,
    ) -> Result<bool, BridgeError>;

    /// Read a property by script name.
    fn get_named(&self, name: &str) -> Result<PropertyValue, BridgeError> {
        self.get_property(name.parse()?)
    }

    /// Write a property by script name.
    fn set_named(&mut self, name: &str, value: PropertyValue) -> Result<bool, BridgeError> {
        self.set_property(name.parse()?, value)
    }
}

impl PropertyBridge for SectionState {
    fn get_property(&self, property: SectionProperty) -> Result<PropertyValue, BridgeError> {
        match property {
            SectionProperty::Owner => Ok(PropertyValue::Table),
            SectionProperty::AvailableChestCount => {
                Ok(PropertyValue::Integer(i64::from(self.available())))
            }
            SectionProperty::ChestCount => Ok(PropertyValue::Integer(i64::from(self.item_count()))),
            SectionProperty::CapturedItem => Err(BridgeError::WriteOnly(property.name())),
        }
    }

    fn set_property(
        &mut self,
        property: SectionProperty,
        value: PropertyValue,
    ) -> Result<bool, BridgeError> {
        match property {
            SectionProperty::AvailableChestCount => {
                let available = integer_value(&value).ok_or(BridgeError::WrongType {
                    property: property.name(),
                    expected: "a number",
                })?;
                Ok(self.set_available(available))
            }
            SectionProperty::CapturedItem => {
                // Captured-item tracking is not modelled yet; the write is
                // accepted so scripts that set it keep running.
                debug!(?value, "Ignoring CapturedItem write");
                Ok(false)
            }
            SectionProperty::Owner | SectionProperty::ChestCount => {
                Err(BridgeError::ReadOnly(property.name()))
            }
        }
    }
}

impl PropertyBridge for Section {
    fn get_property(&self, property: SectionProperty) -> Result<PropertyValue, BridgeError> {
        self.state().get_property(property)
    }

    fn set_property(
        &mut self,
        property: SectionProperty,
        value: PropertyValue,
    ) -> Result<bool, BridgeError> {
        self.state_mut().set_property(property, value)
    }
}

/// Integers pass through; floats truncate toward zero.
fn integer_value(value: &PropertyValue) -> Option<i64> {
    match value {
        PropertyValue::Integer(i) => Some(*i),
        PropertyValue::Number(f) => {
            let t = f.trunc();
            // i64::MAX is not exactly representable; stay strictly below 2^63.
            let limit = 9_223_372_036_854_775_808.0_f64;
            if t.is_finite() && t >= -limit && t < limit {
                #[allow(clippy::cast_possible_truncation)]
                let i = t as i64;
                Some(i)
            } else {
                None
            }
        }
        PropertyValue::Text(_) | PropertyValue::Table => None,
    }
}
