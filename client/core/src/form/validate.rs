//! Field validation
//!
//! Rules run in a fixed order and the first failing rule wins:
//! required, numeric minimum (required number fields only), custom callback.

use super::field::{all_fields, parse_int, FieldType, FieldValue, FormData, FormField, FormSection};

/// `true` for a missing value, `null` and the empty string. Whitespace,
/// `0`, `false` and empty lists count as present.
pub fn is_empty_value(value: Option<&FieldValue>) -> bool {
    match value {
        None | Some(FieldValue::Null) => true,
        Some(FieldValue::Text(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Minimum check for a numeric value given as number or text.
///
/// Unparsable input counts as below the minimum.
pub fn validate_number_min(value: &FieldValue, min: i64, label: &str) -> Option<String> {
    let parsed = match value {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(s) => parse_int(s),
        _ => None,
    };
    match parsed {
        Some(n) if n >= min => None,
        _ => Some(format!("{} muss mindestens {} sein.", label, min)),
    }
}

pub fn validate_field(field: &FormField, value: Option<&FieldValue>) -> Option<String> {
    if field.required && is_empty_value(value) {
        return Some(format!("{} ist erforderlich.", field.label));
    }

    if field.required && field.field_type == FieldType::Number {
        if let (Some(min), Some(value)) = (field.min, value) {
            if let Some(err) = validate_number_min(value, min, &field.label) {
                return Some(err);
            }
        }
    }

    match (&field.validation, value) {
        (Some(validator), Some(value)) => validator(value),
        (Some(validator), None) => validator(&FieldValue::Null),
        (None, _) => None,
    }
}

/// First error across all sections, in declaration order
pub fn validate_form_fields(sections: &[FormSection], data: &FormData) -> Option<String> {
    all_fields(sections).find_map(|field| validate_field(field, data.get(&field.name)))
}
