//! CLI Commands

pub mod browse;
pub mod config;
pub mod create;
pub mod delete;
pub mod filters;
pub mod list;
pub mod schema;
pub mod show;
pub mod update;

use crate::output::{self, OutputFormat};
use campus_admin_core::form::{FieldType, FormField, FormState, InputValue};
use campus_admin_core::{AdminConfig, AdminError, AdminPage, AdminResult, ApiClient, Confirm, EntityKind, SubmitOutcome};
use std::io::{self, BufRead, Write};

/// Shared state of one command invocation
pub struct Context<'a> {
    pub client: ApiClient,
    pub config: &'a AdminConfig,
    pub format: OutputFormat,
}

impl Context<'_> {
    /// Page for `kind`, with the configured page size
    pub fn page(&self, kind: EntityKind) -> AdminPage {
        let mut entity = kind.config();
        entity.list.page_size = self.config.page_size;
        AdminPage::connect(entity, self.client.clone())
    }
}

/// Parse `key=value`
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Raw command-line text as the input event the field's control would produce
pub fn input_for(field: &FormField, raw: &str) -> InputValue {
    match field.field_type {
        FieldType::Checkbox => InputValue::Checked(matches!(
            raw.trim().to_lowercase().as_str(),
            "true" | "1" | "yes" | "ja" | "on"
        )),
        FieldType::Multiselect => InputValue::Selection(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        ),
        _ => InputValue::Text(raw.to_string()),
    }
}

pub fn apply_values(form: &mut FormState, values: &[(String, String)]) -> AdminResult<()> {
    for (name, raw) in values {
        let input = match form.field(name) {
            Some(field) => input_for(field, raw),
            None => return Err(AdminError::Validation(format!("Unbekanntes Feld: {}", name))),
        };
        form.set_input(name, input)?;
    }
    Ok(())
}

/// Fill the open form and submit it
pub async fn submit_values(page: &mut AdminPage, values: &[(String, String)]) -> AdminResult<()> {
    let form = page
        .form_mut()
        .ok_or_else(|| AdminError::Validation("Kein Formular geöffnet.".into()))?;
    apply_values(form, values)?;

    let outcome = page.submit().await;
    let notices = page.list_mut().take_notices();
    match outcome {
        SubmitOutcome::Submitted => {
            output::print_notices(&notices);
            Ok(())
        }
        SubmitOutcome::Invalid(message) | SubmitOutcome::Failed(message) => Err(AdminError::Validation(message)),
        SubmitOutcome::Busy => Err(AdminError::Validation("Speichern läuft bereits.".into())),
    }
}

/// y/N prompt on stdin
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, message: &str) -> bool {
        print!("{} [j/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "j" | "ja" | "y" | "yes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_admin_core::form::{FieldValue, OptionSource};

    #[test]
    fn test_parse_key_val() {
        assert_eq!(parse_key_val("name=Aula").unwrap(), ("name".into(), "Aula".into()));
        assert_eq!(parse_key_val("note=a=b").unwrap(), ("note".into(), "a=b".into()));
        assert_eq!(parse_key_val("name=").unwrap(), ("name".into(), String::new()));
        assert!(parse_key_val("name").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn test_input_for_field_types() {
        let checkbox = FormField::checkbox("bus", "Bus");
        assert_eq!(input_for(&checkbox, "ja"), InputValue::Checked(true));
        assert_eq!(input_for(&checkbox, "false"), InputValue::Checked(false));

        let multi = FormField::multiselect("teacher_ids", "Betreuer", OptionSource::pairs(&[]));
        assert_eq!(
            input_for(&multi, "1, 2,,3"),
            InputValue::Selection(vec!["1".into(), "2".into(), "3".into()])
        );

        let number = FormField::number("capacity", "Kapazität");
        assert_eq!(input_for(&number, "12"), InputValue::Text("12".into()));
    }

    #[test]
    fn test_apply_values_coerces_and_rejects_unknown() {
        let mut form = EntityKind::Rooms.config().form_for(None);
        apply_values(&mut form, &[("capacity".into(), "30".into())]).unwrap();
        assert_eq!(form.value("capacity"), Some(&FieldValue::Number(30)));

        let err = apply_values(&mut form, &[("colour".into(), "red".into())]).unwrap_err();
        assert_eq!(err.user_message(), "Unbekanntes Feld: colour");
    }
}
