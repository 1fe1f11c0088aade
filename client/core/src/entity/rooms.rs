use super::{EntityConfig, EntityKind};
use crate::detail::{BadgeSpec, BadgeTone, DetailConfig, DetailItemSpec, DetailSectionSpec, TextSpec, Theme};
use crate::form::{FormField, FormSection, OptionSource};
use crate::list::{FilterConfig, ListColumn, ListConfig, ListMessages, SearchStrategy};

pub(super) fn config() -> EntityConfig {
    let form = vec![FormSection::new("Raumdaten")
        .background("bg-indigo-50")
        .columns(2)
        .field(FormField::text("name", "Raumname").required())
        .field(FormField::text("building", "Gebäude"))
        .field(FormField::number("floor", "Etage"))
        .field(FormField::number("capacity", "Kapazität").required().min(1))
        .field(FormField::select(
            "category",
            "Kategorie",
            OptionSource::pairs(&[
                ("Klassenzimmer", "Klassenzimmer"),
                ("Sport", "Sport"),
                ("Werkraum", "Werkraum"),
                ("Musik", "Musik"),
                ("Sonstiges", "Sonstiges"),
            ]),
        ))
        .field(FormField::text("color", "Farbe").placeholder("#4F46E5"))];

    let list = ListConfig {
        strategy: SearchStrategy::Frontend,
        searchable_fields: vec!["name".into(), "building".into(), "category".into()],
        min_search_length: 0,
        filters: vec![
            FilterConfig::new("building", "Gebäude", "building"),
            FilterConfig::new("category", "Kategorie", "category"),
            FilterConfig::new("is_occupied", "Belegung", "is_occupied").boolean("Belegt", "Frei"),
        ],
        page_size: 50,
        columns: vec![
            ListColumn::new("ID", "id"),
            ListColumn::new("Name", "name"),
            ListColumn::new("Gebäude", "building"),
            ListColumn::new("Etage", "floor"),
            ListColumn::new("Kapazität", "capacity"),
        ],
    };

    let detail = DetailConfig {
        title: TextSpec::field("name"),
        subtitle: Some(TextSpec::join(&["building", "category"], " · ")),
        badges: vec![BadgeSpec::flag(
            "is_occupied",
            ("Belegt", BadgeTone::Warning),
            Some(("Frei", BadgeTone::Success)),
        )],
        sections: vec![DetailSectionSpec::new(
            "Raumdaten",
            vec![
                DetailItemSpec::text("Gebäude", "building"),
                DetailItemSpec::text("Etage", "floor"),
                DetailItemSpec::text("Kapazität", "capacity"),
                DetailItemSpec::text("Aktuelle Aktivität", "activity_name"),
            ],
        )],
        custom_actions: vec![crate::detail::DetailAction::custom("history", "Belegungshistorie")],
    };

    EntityConfig {
        kind: EntityKind::Rooms,
        singular: "Raum".into(),
        plural: "Räume".into(),
        resource: "/api/rooms".into(),
        theme: Theme::new("#4F46E5", "#4F46E5", "#4338ca"),
        list,
        form,
        detail,
        messages: ListMessages::for_entity("Raum"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_occupancy_filter_accepts_string_flags() {
        let config = config();
        let filter = config.list.filter("is_occupied").unwrap();
        assert!(filter.matches(&json!({"is_occupied": true}), "true"));
        assert!(filter.matches(&json!({"is_occupied": "false"}), "false"));
        assert!(!filter.matches(&json!({"is_occupied": false}), "true"));
    }

    #[test]
    fn test_floor_stays_numeric_when_editing() {
        let form = config().form_for(Some(&json!({"id": 2, "name": "Turnhalle", "floor": "1", "capacity": 30})));
        assert_eq!(form.value("floor").and_then(|v| v.as_i64()), Some(1));
    }
}
