use super::{EntityConfig, EntityKind};
use crate::detail::{BadgeSpec, BadgeTone, DetailConfig, DetailItemSpec, DetailSectionSpec, TextSpec, Theme};
use crate::form::{FieldType, FormField, FormSection, OptionSource};
use crate::list::{FilterConfig, ListColumn, ListConfig, ListMessages, SearchStrategy};

pub(super) const DELETE_CONFLICT: &str =
    "Diese Aktivität kann nicht gelöscht werden, da noch Schüler angemeldet sind.";

pub(super) fn config() -> EntityConfig {
    let form = vec![
        FormSection::new("Grunddaten")
            .subtitle("Name, Kategorie und Kapazität")
            .background("bg-red-50")
            .columns(2)
            .field(FormField::text("name", "Name").required().placeholder("z.B. Fußball AG"))
            .field(
                FormField::select("category_id", "Kategorie", OptionSource::endpoint("/api/activities/categories"))
                    .required(),
            )
            .field(FormField::number("max_participants", "Maximale Teilnehmer").required().min(1))
            .field(
                FormField::select(
                    "supervisor_id",
                    "Leitung",
                    OptionSource::endpoint_with("/api/staff", "id", &["first_name", "last_name"]),
                )
                .helper_text("Hauptverantwortliche Betreuungsperson"),
            ),
        FormSection::new("Einstellungen")
            .background("bg-gray-50")
            .field(FormField::checkbox("is_open_ags", "Offen für Anmeldungen"))
            .field(FormField::new("description", "Beschreibung", FieldType::Textarea).col_span(2)),
    ];

    let list = ListConfig {
        strategy: SearchStrategy::Frontend,
        searchable_fields: vec!["name".into(), "category_name".into(), "supervisor_name".into()],
        min_search_length: 0,
        filters: vec![
            FilterConfig::new("category_name", "Kategorie", "category_name"),
            FilterConfig::new("is_open_ags", "Status", "is_open_ags").boolean("Offen", "Geschlossen"),
        ],
        page_size: 50,
        columns: vec![
            ListColumn::new("ID", "id"),
            ListColumn::new("Name", "name"),
            ListColumn::new("Kategorie", "category_name"),
            ListColumn::new("Teilnehmer", "participant_count"),
            ListColumn::new("Max.", "max_participants"),
        ],
    };

    let detail = DetailConfig {
        title: TextSpec::field("name"),
        subtitle: Some(TextSpec::field("category_name")),
        badges: vec![BadgeSpec::flag(
            "is_open_ags",
            ("Offen", BadgeTone::Success),
            Some(("Geschlossen", BadgeTone::Neutral)),
        )],
        sections: vec![
            DetailSectionSpec::new(
                "Details",
                vec![
                    DetailItemSpec::text("Kategorie", "category_name"),
                    DetailItemSpec::text("Leitung", "supervisor_name"),
                    DetailItemSpec::text("Maximale Teilnehmer", "max_participants"),
                    DetailItemSpec::text("Angemeldet", "participant_count"),
                ],
            ),
            DetailSectionSpec::new(
                "Zeiten",
                vec![DetailItemSpec::list("Termine", "times", Some("weekday"))],
            ),
        ],
        custom_actions: Vec::new(),
    };

    EntityConfig {
        kind: EntityKind::Activities,
        singular: "Aktivität".into(),
        plural: "Aktivitäten".into(),
        resource: "/api/activities".into(),
        theme: Theme::new("#FF3130", "#FF3130", "#e02020"),
        list,
        form,
        detail,
        messages: ListMessages::for_entity("Aktivität").delete_conflict(DELETE_CONFLICT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryService;
    use crate::error::{ApiError, ErrorKind};
    use crate::form::{validate_form_fields, FieldValue};
    use crate::list::{DeleteConfirmation, ListOrchestrator};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_max_participants_minimum() {
        let config = config();
        let mut form = config.form_for(None);
        form.set_value("name", FieldValue::text("Schach")).unwrap();
        form.set_value("category_id", FieldValue::text("2")).unwrap();
        form.set_value("max_participants", FieldValue::Number(0)).unwrap();
        assert_eq!(
            validate_form_fields(form.sections(), form.data()).as_deref(),
            Some("Maximale Teilnehmer muss mindestens 1 sein.")
        );
    }

    #[tokio::test]
    async fn test_delete_conflict_uses_activity_copy() {
        let config = config();
        let service = Arc::new(InMemoryService::new(vec![json!({"id": 1, "name": "Chor"})]));
        service.fail_next(ApiError::from_status(409, "activity has students enrolled"));
        let mut list = ListOrchestrator::new(service, config.list.clone(), config.messages.clone());

        let err = list.delete("1", DeleteConfirmation::AlreadyConfirmed).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(list.error(), Some(DELETE_CONFLICT));
    }
}
