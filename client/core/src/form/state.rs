//! Form state: the headless create/edit form
//!
//! Holds one value per declared field, applies input coercion, loads async
//! options, merges student privacy consent and runs the submit pipeline
//! (validate, call handler, surface errors in the banner).

use super::field::{
    all_fields, coerce_initial, coerce_input, default_value_for_field, form_data_to_json,
    FieldType, FieldValue, FormData, FormField, FormSection, InputValue, DATA_RETENTION_DAYS,
    PRIVACY_CONSENT_ACCEPTED,
};
use super::options::{OptionLoader, SelectOption};
use super::validate::validate_form_fields;
use super::view::{ActionLayout, Control, ControlView, FormView, SectionView};
use crate::api::{entity_id, ApiClient, PrivacyConsentSource};
use crate::error::{AdminError, AdminResult};
use serde_json::Value;
use std::future::Future;

/// Banner text when a submit handler fails without a usable message
pub const SUBMIT_FALLBACK_ERROR: &str = "Beim Speichern ist ein Fehler aufgetreten.";

/// Result of [`FormState::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    /// Validation failed; the handler was not called
    Invalid(String),
    /// The handler returned an error
    Failed(String),
    /// A submit is already in flight
    Busy,
}

/// Holds the submitting flag for the duration of the handler; cleared on drop,
/// so a cancelled submit does not lock the form.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

pub struct FormState {
    sections: Vec<FormSection>,
    initial: Option<Value>,
    values: FormData,
    error: Option<String>,
    submitting: bool,
    layout: ActionLayout,
    submit_label: String,
    loader: OptionLoader,
}

impl FormState {
    /// Empty form (create mode)
    pub fn new(sections: Vec<FormSection>) -> Self {
        let mut state = Self {
            sections,
            initial: None,
            values: FormData::new(),
            error: None,
            submitting: false,
            layout: ActionLayout::Inline,
            submit_label: "Speichern".into(),
            loader: OptionLoader::new(),
        };
        state.seed();
        state
    }

    /// Form pre-filled from an existing entity (edit mode)
    pub fn with_initial(sections: Vec<FormSection>, initial: &Value) -> Self {
        let mut state = Self::new(sections);
        state.set_initial_data(Some(initial));
        state
    }

    pub fn layout(mut self, layout: ActionLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }

    /// Replace the target entity; state is re-seeded
    pub fn set_initial_data(&mut self, initial: Option<&Value>) {
        self.initial = initial.cloned();
        self.seed();
    }

    /// Replace the schema; state is re-seeded and option caches dropped
    pub fn set_sections(&mut self, sections: Vec<FormSection>) {
        self.sections = sections;
        self.loader = OptionLoader::new();
        self.seed();
    }

    /// Discard edits and the error banner
    pub fn reset(&mut self) {
        self.seed();
    }

    fn seed(&mut self) {
        let mut values = FormData::new();
        for field in all_fields(&self.sections) {
            let value = self
                .initial
                .as_ref()
                .and_then(|initial| initial.get(&field.name))
                .map(|v| coerce_initial(field, v))
                .unwrap_or_else(|| default_value_for_field(field));
            values.insert(field.name.clone(), value);
        }
        self.values = values;
        self.error = None;
    }

    pub fn sections(&self) -> &[FormSection] {
        &self.sections
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        all_fields(&self.sections).find(|f| f.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn data(&self) -> &FormData {
        &self.values
    }

    pub fn to_json(&self) -> Value {
        form_data_to_json(&self.values)
    }

    /// Id of the entity being edited, if any
    pub fn entity_id(&self) -> Option<String> {
        self.initial.as_ref().and_then(entity_id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn option_loader(&self) -> &OptionLoader {
        &self.loader
    }

    fn known_field(&self, name: &str) -> AdminResult<FormField> {
        self.field(name)
            .cloned()
            .ok_or_else(|| AdminError::Validation(format!("Unbekanntes Feld: {}", name)))
    }

    /// Apply raw control input
    pub fn set_input(&mut self, name: &str, input: InputValue) -> AdminResult<()> {
        let field = self.known_field(name)?;
        self.values.insert(field.name.clone(), coerce_input(&field, input));
        Ok(())
    }

    /// Store a value as-is (custom component slots)
    pub fn set_value(&mut self, name: &str, value: FieldValue) -> AdminResult<()> {
        let field = self.known_field(name)?;
        self.values.insert(field.name, value);
        Ok(())
    }

    /// Add a tag to a multiselect; duplicates are ignored
    pub fn add_tag(&mut self, name: &str, value: &str) -> AdminResult<()> {
        let mut selected = self.selected_tags(name)?;
        if !selected.iter().any(|v| v == value) {
            selected.push(value.to_string());
        }
        self.values.insert(name.to_string(), FieldValue::List(selected));
        Ok(())
    }

    pub fn remove_tag(&mut self, name: &str, value: &str) -> AdminResult<()> {
        let mut selected = self.selected_tags(name)?;
        selected.retain(|v| v != value);
        self.values.insert(name.to_string(), FieldValue::List(selected));
        Ok(())
    }

    fn selected_tags(&self, name: &str) -> AdminResult<Vec<String>> {
        let field = self.known_field(name)?;
        if field.field_type != FieldType::Multiselect {
            return Err(AdminError::Validation(format!("{} ist keine Mehrfachauswahl.", field.label)));
        }
        Ok(self
            .values
            .get(name)
            .and_then(FieldValue::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default())
    }

    /// Options of a select, or for a multiselect the ones not yet selected
    pub fn available_options(&self, name: &str) -> Vec<SelectOption> {
        let Some(field) = self.field(name) else {
            return Vec::new();
        };
        let options = self.loader.options(field);
        match self.values.get(name).and_then(FieldValue::as_list) {
            Some(selected) if field.field_type == FieldType::Multiselect => options
                .into_iter()
                .filter(|o| !selected.contains(&o.value))
                .collect(),
            _ => options,
        }
    }

    /// Load every async option source of the schema
    pub async fn load_options(&self, client: Option<&ApiClient>) {
        self.loader.load_all(&self.sections, client).await;
    }

    pub fn has_privacy_fields(&self) -> bool {
        self.field(PRIVACY_CONSENT_ACCEPTED).is_some() || self.field(DATA_RETENTION_DAYS).is_some()
    }

    /// Merge the stored privacy consent of the edited student.
    ///
    /// Only runs in edit mode for schemas with consent fields. Returns whether
    /// consent data was applied; fetch errors are logged and leave defaults.
    pub async fn load_privacy_consent(&mut self, source: &dyn PrivacyConsentSource) -> bool {
        if !self.has_privacy_fields() {
            return false;
        }
        let Some(id) = self.entity_id() else {
            return false;
        };
        match source.privacy_consent(&id).await {
            Ok(consent) => {
                if self.field(PRIVACY_CONSENT_ACCEPTED).is_some() {
                    self.values
                        .insert(PRIVACY_CONSENT_ACCEPTED.into(), FieldValue::Bool(consent.accepted));
                }
                if self.field(DATA_RETENTION_DAYS).is_some() {
                    self.values.insert(
                        DATA_RETENTION_DAYS.into(),
                        FieldValue::Number(consent.data_retention_days),
                    );
                }
                true
            }
            Err(err) => {
                tracing::warn!(student = %id, error = %err, "could not load privacy consent");
                false
            }
        }
    }

    /// Validate and hand the state to `on_submit`.
    ///
    /// Validation failures and handler errors end up in the banner; nothing
    /// is retried.
    pub async fn submit<F, Fut>(&mut self, on_submit: F) -> SubmitOutcome
    where
        F: FnOnce(FormData) -> Fut,
        Fut: Future<Output = AdminResult<()>>,
    {
        if self.submitting {
            return SubmitOutcome::Busy;
        }
        self.error = None;

        if let Some(message) = validate_form_fields(&self.sections, &self.values) {
            self.error = Some(message.clone());
            return SubmitOutcome::Invalid(message);
        }

        let data = self.values.clone();
        let result = {
            let _guard = InFlight::enter(&mut self.submitting);
            on_submit(data).await
        };

        match result {
            Ok(()) => SubmitOutcome::Submitted,
            Err(err) => {
                let message = err.user_message();
                let message = if message.trim().is_empty() {
                    SUBMIT_FALLBACK_ERROR.to_string()
                } else {
                    message
                };
                tracing::error!(error = %err, "form submit failed");
                self.error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub fn render(&self) -> FormView {
        FormView {
            sections: self
                .sections
                .iter()
                .map(|section| SectionView {
                    title: section.title.clone(),
                    subtitle: section.subtitle.clone(),
                    background: section.background.clone(),
                    columns: section.columns,
                    controls: section.fields.iter().map(|f| self.render_field(f)).collect(),
                })
                .collect(),
            error: self.error.clone(),
            layout: self.layout,
            submitting: self.submitting,
            submit_label: self.submit_label.clone(),
        }
    }

    fn render_field(&self, field: &FormField) -> ControlView {
        let value = self.values.get(&field.name).cloned().unwrap_or(FieldValue::Null);
        let text = match &value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Null => String::new(),
            other => other.display(),
        };
        let loading = self.loader.is_loading(&field.name);

        let control = match field.field_type {
            FieldType::Text | FieldType::Email | FieldType::Password | FieldType::Date => {
                Control::Input {
                    input_type: field.field_type,
                    value: text,
                    placeholder: field.placeholder.clone(),
                }
            }
            FieldType::Textarea => Control::TextArea {
                value: text,
                placeholder: field.placeholder.clone(),
            },
            FieldType::Checkbox => Control::Checkbox {
                checked: value.as_bool().unwrap_or(false),
            },
            FieldType::Number => Control::Number {
                value: value.as_i64(),
                min: field.min,
                max: field.max,
            },
            FieldType::Select => Control::Select {
                options: self.loader.options(field),
                selected: Some(text).filter(|s| !s.is_empty()),
                placeholder: field.placeholder.clone(),
                loading,
            },
            FieldType::Multiselect => {
                let options = self.loader.options(field);
                let selected_values = value.as_list().map(<[String]>::to_vec).unwrap_or_default();
                let selected = selected_values
                    .iter()
                    .map(|v| {
                        options
                            .iter()
                            .find(|o| &o.value == v)
                            .cloned()
                            .unwrap_or_else(|| SelectOption::new(v.clone(), v.clone()))
                    })
                    .collect();
                Control::MultiSelect {
                    selected,
                    available: self.available_options(&field.name),
                    loading,
                }
            }
            FieldType::Custom => Control::Custom { value },
        };

        ControlView {
            name: field.name.clone(),
            label: field.label.clone(),
            required: field.required,
            helper_text: field.helper_text.clone(),
            col_span: field.col_span.unwrap_or(1),
            control,
        }
    }
}
