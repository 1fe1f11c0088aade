use super::{EntityConfig, EntityKind};
use crate::detail::{BadgeSpec, BadgeTone, DetailConfig, DetailItemSpec, DetailSectionSpec, TextSpec, Theme};
use crate::form::{FormField, FormSection, OptionSource};
use crate::list::{FilterConfig, ListColumn, ListConfig, ListMessages, SearchStrategy};

pub(super) fn config() -> EntityConfig {
    let form = vec![FormSection::new("Gerät")
        .background("bg-amber-50")
        .columns(2)
        .field(
            FormField::text("device_id", "Geräte-ID")
                .required()
                .validate(|value| match value.as_str() {
                    Some(id) if id.contains(char::is_whitespace) => {
                        Some("Geräte-ID darf keine Leerzeichen enthalten.".into())
                    }
                    _ => None,
                }),
        )
        .field(FormField::text("name", "Name"))
        .field(
            FormField::select(
                "device_type",
                "Typ",
                OptionSource::pairs(&[("rfid_reader", "RFID-Leser"), ("tablet", "Tablet")]),
            )
            .required(),
        )
        .field(FormField::select(
            "status",
            "Status",
            OptionSource::pairs(&[
                ("active", "Aktiv"),
                ("inactive", "Inaktiv"),
                ("maintenance", "Wartung"),
            ]),
        ))];

    let list = ListConfig {
        strategy: SearchStrategy::Frontend,
        searchable_fields: vec!["device_id".into(), "name".into()],
        min_search_length: 0,
        filters: vec![
            FilterConfig::new("device_type", "Typ", "device_type"),
            FilterConfig::new("status", "Status", "status"),
            FilterConfig::new("is_online", "Verbindung", "is_online").boolean("Online", "Offline"),
        ],
        page_size: 50,
        columns: vec![
            ListColumn::new("ID", "id"),
            ListColumn::new("Geräte-ID", "device_id"),
            ListColumn::new("Name", "name"),
            ListColumn::new("Typ", "device_type"),
            ListColumn::new("Status", "status"),
        ],
    };

    let detail = DetailConfig {
        title: TextSpec::field("name"),
        subtitle: Some(TextSpec::field("device_id")),
        badges: vec![
            BadgeSpec::flag("is_online", ("Online", BadgeTone::Success), Some(("Offline", BadgeTone::Danger))),
            BadgeSpec::value("status", BadgeTone::Neutral),
        ],
        sections: vec![DetailSectionSpec::new(
            "Gerät",
            vec![
                DetailItemSpec::text("Geräte-ID", "device_id"),
                DetailItemSpec::text("Typ", "device_type"),
                DetailItemSpec::text("Zuletzt gesehen", "last_seen"),
            ],
        )],
        custom_actions: Vec::new(),
    };

    EntityConfig {
        kind: EntityKind::Devices,
        singular: "Gerät".into(),
        plural: "Geräte".into(),
        resource: "/api/iot".into(),
        theme: Theme::new("#F59E0B", "#F59E0B", "#d97706"),
        list,
        form,
        detail,
        messages: ListMessages::for_entity("Gerät"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{validate_field, FieldValue};

    #[test]
    fn test_device_id_rejects_whitespace() {
        let config = config();
        let field = &config.form[0].fields[0];
        assert_eq!(
            validate_field(field, Some(&FieldValue::text("rfid 01"))).as_deref(),
            Some("Geräte-ID darf keine Leerzeichen enthalten.")
        );
        assert_eq!(
            validate_field(field, Some(&FieldValue::text(""))).as_deref(),
            Some("Geräte-ID ist erforderlich.")
        );
        assert!(validate_field(field, Some(&FieldValue::text("rfid-01"))).is_none());
    }
}
