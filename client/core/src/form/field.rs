//! Form schema: fields, sections, values and value coercion

use super::options::{OptionSource, SelectOption};
use crate::value::scalar_string;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Field name whose numeric default differs from the usual `0`
pub const DATA_RETENTION_DAYS: &str = "data_retention_days";
/// Checkbox carrying the privacy consent of a student
pub const PRIVACY_CONSENT_ACCEPTED: &str = "privacy_consent_accepted";

/// Input control type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Select,
    Multiselect,
    Textarea,
    Password,
    Checkbox,
    Custom,
    Number,
    Date,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Textarea => "textarea",
            FieldType::Password => "password",
            FieldType::Checkbox => "checkbox",
            FieldType::Custom => "custom",
            FieldType::Number => "number",
            FieldType::Date => "date",
        }
    }

    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Multiselect)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current value of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(i64),
    Text(String),
    List(Vec<String>),
    /// Opaque payload of a custom component
    Json(Value),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => Value::from(*n),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::List(items) => Value::from(items.clone()),
            FieldValue::Json(v) => v.clone(),
        }
    }

    /// Display form used by views and tables
    pub fn display(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(true) => "Ja".into(),
            FieldValue::Bool(false) => "Nein".into(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
            FieldValue::Json(v) => v.to_string(),
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Number(i),
                None => FieldValue::Json(value.clone()),
            },
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Array(items) if items.iter().all(Value::is_string) => FieldValue::List(
                items.iter().filter_map(Value::as_str).map(String::from).collect(),
            ),
            other => FieldValue::Json(other.clone()),
        }
    }
}

/// Form state: field name -> value
pub type FormData = BTreeMap<String, FieldValue>;

/// Serialize form state into a request payload
pub fn form_data_to_json(data: &FormData) -> Value {
    Value::Object(data.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
}

/// Custom validation callback: `Some(message)` on error
pub type Validator = Arc<dyn Fn(&FieldValue) -> Option<String> + Send + Sync>;

/// Raw value coming out of an input control
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Text(String),
    Checked(bool),
    Selection(Vec<String>),
}

/// Declarative description of one form field
#[derive(Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub placeholder: Option<String>,
    pub options: Option<OptionSource>,
    pub validation: Option<Validator>,
    pub helper_text: Option<String>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub col_span: Option<u8>,
}

impl fmt::Debug for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormField")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("field_type", &self.field_type)
            .field("required", &self.required)
            .field("options", &self.options)
            .field("validation", &self.validation.is_some())
            .field("min", &self.min)
            .field("max", &self.max)
            .finish()
    }
}

impl FormField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            placeholder: None,
            options: None,
            validation: None,
            helper_text: None,
            min: None,
            max: None,
            col_span: None,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Text)
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Number)
    }

    pub fn checkbox(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldType::Checkbox)
    }

    pub fn select(name: impl Into<String>, label: impl Into<String>, options: OptionSource) -> Self {
        Self::new(name, label, FieldType::Select).options(options)
    }

    pub fn multiselect(
        name: impl Into<String>,
        label: impl Into<String>,
        options: OptionSource,
    ) -> Self {
        Self::new(name, label, FieldType::Multiselect).options(options)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn options(mut self, options: OptionSource) -> Self {
        self.options = Some(options);
        self
    }

    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldValue) -> Option<String> + Send + Sync + 'static,
    {
        self.validation = Some(Arc::new(f));
        self
    }

    pub fn helper_text(mut self, text: impl Into<String>) -> Self {
        self.helper_text = Some(text.into());
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn col_span(mut self, span: u8) -> Self {
        self.col_span = Some(span);
        self
    }

    /// Static options, if any
    pub fn static_options(&self) -> Option<&[SelectOption]> {
        match &self.options {
            Some(OptionSource::Static(options)) => Some(options),
            _ => None,
        }
    }
}

/// Titled group of fields
#[derive(Debug, Clone)]
pub struct FormSection {
    pub title: String,
    pub subtitle: Option<String>,
    /// Theme token for the section background
    pub background: Option<String>,
    pub columns: u8,
    pub fields: Vec<FormField>,
}

impl FormSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            background: None,
            columns: 1,
            fields: Vec::new(),
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn background(mut self, token: impl Into<String>) -> Self {
        self.background = Some(token.into());
        self
    }

    pub fn columns(mut self, columns: u8) -> Self {
        self.columns = columns.max(1);
        self
    }

    pub fn field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }
}

/// Iterate every field of every section in declaration order
pub fn all_fields(sections: &[FormSection]) -> impl Iterator<Item = &FormField> {
    sections.iter().flat_map(|s| s.fields.iter())
}

/// Default value for a freshly initialised field
pub fn default_value_for_field(field: &FormField) -> FieldValue {
    match field.field_type {
        FieldType::Checkbox => FieldValue::Bool(false),
        FieldType::Multiselect => FieldValue::List(Vec::new()),
        FieldType::Number if field.name == DATA_RETENTION_DAYS => FieldValue::Number(30),
        FieldType::Number => FieldValue::Number(0),
        _ => FieldValue::Text(String::new()),
    }
}

/// Integer prefix parse: leading whitespace, optional sign, digits.
///
/// `"12abc"` gives `12`, `"abc"` gives `None`. Digit runs beyond the `i64`
/// range saturate at `i64::MAX` / `i64::MIN`.
pub fn parse_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].bytes().fold(0i64, |acc, b| {
        let digit = i64::from(b - b'0');
        if negative {
            acc.saturating_mul(10).saturating_sub(digit)
        } else {
            acc.saturating_mul(10).saturating_add(digit)
        }
    });
    Some(value)
}

/// Value stored when the user edits a control
pub fn coerce_input(field: &FormField, input: InputValue) -> FieldValue {
    match (field.field_type, input) {
        (FieldType::Checkbox, InputValue::Checked(b)) => FieldValue::Bool(b),
        (FieldType::Checkbox, InputValue::Text(s)) => {
            FieldValue::Bool(matches!(s.trim(), "true" | "on" | "1" | "ja"))
        }
        (FieldType::Number, InputValue::Text(s)) => match parse_int(&s) {
            Some(n) => FieldValue::Number(n),
            None => FieldValue::Text(String::new()),
        },
        (FieldType::Multiselect, InputValue::Selection(values)) => FieldValue::List(values),
        (FieldType::Multiselect, InputValue::Text(s)) => FieldValue::List(
            s.split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect(),
        ),
        (_, InputValue::Text(s)) => FieldValue::Text(s),
        (_, InputValue::Checked(b)) => FieldValue::Text(b.to_string()),
        (_, InputValue::Selection(values)) => FieldValue::Text(values.join(",")),
    }
}

/// Value stored when initialising from an existing entity
pub fn coerce_initial(field: &FormField, value: &Value) -> FieldValue {
    if value.is_null() {
        return default_value_for_field(field);
    }
    match field.field_type {
        FieldType::Number => match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .map(FieldValue::Number)
                .unwrap_or_else(|| FieldValue::Text(String::new())),
            Value::String(s) => parse_int(s)
                .map(FieldValue::Number)
                .unwrap_or_else(|| FieldValue::Text(String::new())),
            _ => FieldValue::Text(String::new()),
        },
        FieldType::Checkbox => match value {
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::String(s) => FieldValue::Bool(s == "true"),
            Value::Number(n) => FieldValue::Bool(n.as_i64() != Some(0)),
            _ => FieldValue::Bool(false),
        },
        FieldType::Multiselect => match value {
            Value::Array(items) => FieldValue::List(items.iter().filter_map(scalar_string).collect()),
            other => FieldValue::List(scalar_string(other).into_iter().collect()),
        },
        FieldType::Custom => FieldValue::from(value),
        _ => scalar_string(value)
            .map(FieldValue::Text)
            .unwrap_or_else(|| FieldValue::Json(value.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ALL_TYPES: [FieldType; 10] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Select,
        FieldType::Multiselect,
        FieldType::Textarea,
        FieldType::Password,
        FieldType::Checkbox,
        FieldType::Custom,
        FieldType::Number,
        FieldType::Date,
    ];

    #[test]
    fn test_default_values_for_every_type() {
        for ty in ALL_TYPES {
            let field = FormField::new("x", "X", ty);
            let expected = match ty {
                FieldType::Checkbox => FieldValue::Bool(false),
                FieldType::Multiselect => FieldValue::List(vec![]),
                FieldType::Number => FieldValue::Number(0),
                _ => FieldValue::text(""),
            };
            assert_eq!(default_value_for_field(&field), expected, "type {}", ty);
        }
        let retention = FormField::number(DATA_RETENTION_DAYS, "Aufbewahrung");
        assert_eq!(default_value_for_field(&retention), FieldValue::Number(30));
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("  -7"), Some(-7));
        assert_eq!(parse_int("12abc"), Some(12));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_int("-99999999999999999999x"), Some(i64::MIN));
        assert_eq!(parse_int("-9223372036854775808"), Some(i64::MIN));
    }

    #[test]
    fn test_number_input_never_stores_garbage() {
        let field = FormField::number("count", "Anzahl");
        assert_eq!(coerce_input(&field, InputValue::Text("".into())), FieldValue::text(""));
        assert_eq!(coerce_input(&field, InputValue::Text("x".into())), FieldValue::text(""));
        assert_eq!(coerce_input(&field, InputValue::Text("15".into())), FieldValue::Number(15));
        assert_eq!(
            coerce_input(&field, InputValue::Text("123456789012345678901234".into())),
            FieldValue::Number(i64::MAX)
        );
    }

    #[test]
    fn test_checkbox_and_multiselect_input() {
        let checkbox = FormField::checkbox("active", "Aktiv");
        assert_eq!(coerce_input(&checkbox, InputValue::Checked(true)), FieldValue::Bool(true));
        assert_eq!(coerce_input(&checkbox, InputValue::Text("false".into())), FieldValue::Bool(false));

        let multi = FormField::new("tags", "Tags", FieldType::Multiselect);
        assert_eq!(
            coerce_input(&multi, InputValue::Text("a, b,,c".into())),
            FieldValue::List(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn test_initial_coercion() {
        let count = FormField::number("count", "Anzahl");
        assert_eq!(coerce_initial(&count, &json!("5")), FieldValue::Number(5));
        assert_eq!(coerce_initial(&count, &json!(7)), FieldValue::Number(7));
        assert_eq!(coerce_initial(&count, &json!(null)), FieldValue::Number(0));

        let select = FormField::new("room_id", "Raum", FieldType::Select);
        assert_eq!(coerce_initial(&select, &json!(3)), FieldValue::text("3"));

        let multi = FormField::new("teacher_ids", "Lehrkräfte", FieldType::Multiselect);
        assert_eq!(
            coerce_initial(&multi, &json!([1, "2"])),
            FieldValue::List(vec!["1".into(), "2".into()])
        );
    }

    #[test]
    fn test_form_data_to_json() {
        let mut data = FormData::new();
        data.insert("name".into(), FieldValue::text("Schach"));
        data.insert("max".into(), FieldValue::Number(12));
        data.insert("open".into(), FieldValue::Bool(true));
        assert_eq!(form_data_to_json(&data), json!({"name": "Schach", "max": 12, "open": true}));
    }
}
