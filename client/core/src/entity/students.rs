use super::{EntityConfig, EntityKind};
use crate::detail::{BadgeSpec, BadgeTone, DetailConfig, DetailItemSpec, DetailSectionSpec, TextSpec, Theme};
use crate::form::{FieldType, FormField, FormSection, OptionSource, DATA_RETENTION_DAYS, PRIVACY_CONSENT_ACCEPTED};
use crate::list::{FilterConfig, ListColumn, ListConfig, ListMessages, SearchStrategy};

pub(super) fn config() -> EntityConfig {
    let form = vec![
        FormSection::new("Persönliche Daten")
            .background("bg-blue-50")
            .columns(2)
            .field(FormField::text("first_name", "Vorname").required())
            .field(FormField::text("second_name", "Nachname").required())
            .field(FormField::text("school_class", "Klasse").required().placeholder("z.B. 3b"))
            .field(FormField::select("group_id", "Gruppe", OptionSource::endpoint("/api/groups")))
            .field(FormField::new("birthday", "Geburtsdatum", FieldType::Date)),
        FormSection::new("Erziehungsberechtigte")
            .columns(2)
            .field(FormField::text("name_lg", "Name"))
            .field(FormField::new("contact_lg", "Kontakt", FieldType::Email))
            .field(FormField::checkbox("bus", "Buskind")),
        FormSection::new("Datenschutz")
            .subtitle("Einwilligung und Aufbewahrung")
            .background("bg-gray-50")
            .field(FormField::checkbox(PRIVACY_CONSENT_ACCEPTED, "Datenschutzerklärung akzeptiert"))
            .field(
                FormField::number(DATA_RETENTION_DAYS, "Aufbewahrungsdauer (Tage)")
                    .required()
                    .min(1)
                    .max(31)
                    .helper_text("Besuchsdaten werden nach dieser Anzahl Tage gelöscht (1-31)")
                    .validate(|value| match value.as_i64() {
                        Some(days) if days > 31 => {
                            Some("Aufbewahrungsdauer darf höchstens 31 Tage betragen.".into())
                        }
                        _ => None,
                    }),
            ),
    ];

    let list = ListConfig {
        strategy: SearchStrategy::Backend,
        searchable_fields: vec!["first_name".into(), "second_name".into(), "school_class".into()],
        min_search_length: 2,
        filters: vec![
            FilterConfig::new("school_class", "Klasse", "school_class"),
            FilterConfig::new("group_id", "Gruppe", "group_id").dynamic_options("group_id", Some("group_name")),
            FilterConfig::new("bus", "Bus", "bus").boolean("Buskind", "Kein Buskind"),
        ],
        page_size: 50,
        columns: vec![
            ListColumn::new("ID", "id"),
            ListColumn::new("Vorname", "first_name"),
            ListColumn::new("Nachname", "second_name"),
            ListColumn::new("Klasse", "school_class"),
            ListColumn::new("Gruppe", "group_name"),
        ],
    };

    let detail = DetailConfig {
        title: TextSpec::join(&["first_name", "second_name"], " "),
        subtitle: Some(TextSpec::join(&["school_class", "group_name"], " · ")),
        badges: vec![
            BadgeSpec::flag("bus", ("Buskind", BadgeTone::Info), None),
            BadgeSpec::value("current_location", BadgeTone::Success),
        ],
        sections: vec![
            DetailSectionSpec::new(
                "Persönliche Daten",
                vec![
                    DetailItemSpec::text("Klasse", "school_class"),
                    DetailItemSpec::text("Gruppe", "group_name"),
                    DetailItemSpec::text("Geburtsdatum", "birthday"),
                ],
            ),
            DetailSectionSpec::new(
                "Erziehungsberechtigte",
                vec![
                    DetailItemSpec::text("Name", "name_lg"),
                    DetailItemSpec::text("Kontakt", "contact_lg"),
                ],
            ),
        ],
        custom_actions: Vec::new(),
    };

    EntityConfig {
        kind: EntityKind::Students,
        singular: "Schüler".into(),
        plural: "Schüler".into(),
        resource: "/api/students".into(),
        theme: Theme::new("#5080D8", "#5080D8", "#3f6bc4"),
        list,
        form,
        detail,
        messages: ListMessages::for_entity("Schüler"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldValue, InputValue};

    #[test]
    fn test_new_student_defaults_retention() {
        let form = config().form_for(None);
        assert!(form.has_privacy_fields());
        assert_eq!(form.value(DATA_RETENTION_DAYS), Some(&FieldValue::Number(30)));
        assert_eq!(form.value(PRIVACY_CONSENT_ACCEPTED), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn test_retention_bounds() {
        let config = config();
        let field = config.form[2].fields[1].clone();
        assert_eq!(field.name, DATA_RETENTION_DAYS);
        assert_eq!(
            crate::form::validate_field(&field, Some(&FieldValue::Number(0))).as_deref(),
            Some("Aufbewahrungsdauer (Tage) muss mindestens 1 sein.")
        );
        assert!(crate::form::validate_field(&field, Some(&FieldValue::Number(40))).is_some());
        assert!(crate::form::validate_field(&field, Some(&FieldValue::Number(14))).is_none());

        let mut form = config.form_for(None);
        form.set_input(DATA_RETENTION_DAYS, InputValue::Text("abc".into())).unwrap();
        assert_eq!(form.value(DATA_RETENTION_DAYS), Some(&FieldValue::text("")));
    }
}
