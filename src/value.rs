//! The typed value model for merged settings.
//!
//! Every setting holds exactly one [`SettingValue`] variant. The variants
//! are deliberately explicit (no stringly-typed fallback) so the writer and
//! any GUI consumer must exhaustively handle each shape — a boolean toggle
//! can never be silently confused with a free-text value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The merged settings: name → typed value, first-seen order preserved.
///
/// Insertion order carries no semantics beyond keeping diagnostics and
/// snapshots in file order.
pub type SettingsMap = IndexMap<String, SettingValue>;

/// One typed setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingValue {
    /// A feature toggle. `true` means the macro line is active
    /// (not commented out).
    Boolean(bool),

    /// A `#define NAME value` with free-text value (number or identifier).
    Scalar { text: String, enabled: bool },

    /// One or more quoted string literals on the value side of a define.
    /// A single literal is stored as a 1-element list.
    QuotedList { items: Vec<String>, enabled: bool },

    /// Candidate homing options accumulated from repeated
    /// `HOMING_OPTION(...)` lines, deduplicated, first-seen order kept.
    /// Exactly one instance exists per document, under `HOMING_OPTS`.
    HomingOptionSet(Vec<String>),

    /// One of the four arguments of the grouped homing declaration, stored
    /// under the synthetic names `HOMING_STEP1`..`HOMING_STEP4`.
    HomingStep { index: u8, text: String },
}

impl SettingValue {
    /// Whether the setting's declaration line is active. Shapes without a
    /// comment-toggle (option set, homing steps) are always active.
    pub fn enabled(&self) -> bool {
        match self {
            SettingValue::Boolean(enabled) => *enabled,
            SettingValue::Scalar { enabled, .. } => *enabled,
            SettingValue::QuotedList { enabled, .. } => *enabled,
            SettingValue::HomingOptionSet(_) => true,
            SettingValue::HomingStep { .. } => true,
        }
    }

    /// Whether this is a value-typed setting (`Scalar` or `QuotedList`).
    /// A boolean declaration is never allowed to overwrite one of these.
    pub fn is_value_typed(&self) -> bool {
        matches!(
            self,
            SettingValue::Scalar { .. } | SettingValue::QuotedList { .. }
        )
    }

    /// The text to place in the value position of a `#define NAME value`
    /// line, or `None` for shapes that have no value position.
    pub fn value_text(&self) -> Option<String> {
        match self {
            SettingValue::Scalar { text, .. } => Some(text.clone()),
            SettingValue::QuotedList { items, .. } => {
                let quoted: Vec<String> = items.iter().map(|s| format!("\"{s}\"")).collect();
                Some(quoted.join(" "))
            }
            SettingValue::HomingStep { text, .. } => Some(text.clone()),
            SettingValue::Boolean(_) | SettingValue::HomingOptionSet(_) => None,
        }
    }
}
