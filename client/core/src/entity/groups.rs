use super::{EntityConfig, EntityKind};
use crate::detail::{DetailConfig, DetailItemSpec, DetailSectionSpec, TextSpec, Theme};
use crate::form::{FormField, FormSection, OptionSource};
use crate::list::{FilterConfig, ListColumn, ListConfig, ListMessages, SearchStrategy};

pub(super) fn config() -> EntityConfig {
    let form = vec![FormSection::new("Gruppe")
        .background("bg-green-50")
        .columns(2)
        .field(FormField::text("name", "Name").required())
        .field(FormField::select("room_id", "Raum", OptionSource::endpoint("/api/rooms")))
        .field(
            FormField::multiselect(
                "teacher_ids",
                "Betreuer",
                OptionSource::endpoint_with("/api/staff", "id", &["first_name", "last_name"]),
            )
            .col_span(2),
        )];

    let list = ListConfig {
        strategy: SearchStrategy::Frontend,
        searchable_fields: vec!["name".into(), "room_name".into()],
        min_search_length: 0,
        filters: vec![FilterConfig::new("room_name", "Raum", "room_name")],
        page_size: 50,
        columns: vec![
            ListColumn::new("ID", "id"),
            ListColumn::new("Name", "name"),
            ListColumn::new("Raum", "room_name"),
            ListColumn::new("Schüler", "student_count"),
        ],
    };

    let detail = DetailConfig {
        title: TextSpec::field("name"),
        subtitle: Some(TextSpec::field("room_name")),
        badges: Vec::new(),
        sections: vec![DetailSectionSpec::new(
            "Gruppe",
            vec![
                DetailItemSpec::text("Raum", "room_name"),
                DetailItemSpec::text("Schüler", "student_count"),
                DetailItemSpec::list("Betreuer", "supervisors", Some("name")),
            ],
        )],
        custom_actions: Vec::new(),
    };

    EntityConfig {
        kind: EntityKind::Groups,
        singular: "Gruppe".into(),
        plural: "Gruppen".into(),
        resource: "/api/groups".into(),
        theme: Theme::new("#83CD2D", "#83CD2D", "#70b525"),
        list,
        form,
        detail,
        messages: ListMessages::for_entity("Gruppe"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValue;

    #[test]
    fn test_teachers_default_to_empty_selection() {
        let form = config().form_for(None);
        assert_eq!(form.value("teacher_ids"), Some(&FieldValue::List(Vec::new())));
    }
}
