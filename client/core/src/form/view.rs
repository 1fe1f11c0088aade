//! Render model produced by [`FormState::render`](super::FormState::render)
//!
//! One [`Control`] per field type. Front ends (terminal, web templates) draw
//! these; no presentation decisions are left to them beyond styling.

use super::field::{FieldType, FieldValue};
use super::options::SelectOption;
use serde::Serialize;

/// Placement of the submit/cancel row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionLayout {
    #[default]
    Inline,
    /// Pinned to the bottom of the viewport
    Sticky,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub sections: Vec<SectionView>,
    /// Error banner
    pub error: Option<String>,
    pub layout: ActionLayout,
    pub submitting: bool,
    pub submit_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub title: String,
    pub subtitle: Option<String>,
    pub background: Option<String>,
    pub columns: u8,
    pub controls: Vec<ControlView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlView {
    pub name: String,
    pub label: String,
    pub required: bool,
    pub helper_text: Option<String>,
    pub col_span: u8,
    pub control: Control,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    Input {
        input_type: FieldType,
        value: String,
        placeholder: Option<String>,
    },
    TextArea {
        value: String,
        placeholder: Option<String>,
    },
    Checkbox {
        checked: bool,
    },
    Number {
        /// `None` while the input is empty
        value: Option<i64>,
        min: Option<i64>,
        max: Option<i64>,
    },
    Select {
        options: Vec<SelectOption>,
        selected: Option<String>,
        placeholder: Option<String>,
        loading: bool,
    },
    MultiSelect {
        /// Removable tags
        selected: Vec<SelectOption>,
        /// Options offered by the "add another" dropdown
        available: Vec<SelectOption>,
        loading: bool,
    },
    Custom {
        value: FieldValue,
    },
}
