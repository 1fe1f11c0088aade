use super::{EntityConfig, EntityKind};
use crate::detail::{DetailConfig, DetailItemSpec, DetailSectionSpec, TextSpec, Theme};
use crate::form::{FieldType, FormField, FormSection, OptionSource};
use crate::list::{FilterConfig, ListColumn, ListConfig, ListMessages, SearchStrategy};

pub(super) fn config() -> EntityConfig {
    let form = vec![
        FormSection::new("Rolle")
            .background("bg-purple-50")
            .field(FormField::text("name", "Name").required())
            .field(FormField::new("description", "Beschreibung", FieldType::Textarea)),
        FormSection::new("Berechtigungen").field(
            FormField::multiselect(
                "permission_ids",
                "Berechtigungen",
                OptionSource::endpoint_with("/api/auth/permissions", "id", &["name"]),
            )
            .helper_text("Mehrere Berechtigungen können zugewiesen werden"),
        ),
    ];

    let list = ListConfig {
        strategy: SearchStrategy::Frontend,
        searchable_fields: vec!["name".into(), "description".into()],
        min_search_length: 0,
        filters: vec![FilterConfig::new("permission", "Berechtigung", "permissions")
            .array_contains(Some("name"))
            .dynamic_options("permissions", Some("name"))],
        page_size: 50,
        columns: vec![
            ListColumn::new("ID", "id"),
            ListColumn::new("Name", "name"),
            ListColumn::new("Beschreibung", "description"),
        ],
    };

    let detail = DetailConfig {
        title: TextSpec::field("name"),
        subtitle: Some(TextSpec::field("description")),
        badges: Vec::new(),
        sections: vec![DetailSectionSpec::new(
            "Berechtigungen",
            vec![DetailItemSpec::list("Zugewiesen", "permissions", Some("name"))],
        )],
        custom_actions: Vec::new(),
    };

    EntityConfig {
        kind: EntityKind::Roles,
        singular: "Rolle".into(),
        plural: "Rollen".into(),
        resource: "/api/auth/roles".into(),
        theme: Theme::new("#7C3AED", "#7C3AED", "#6d28d9"),
        list,
        form,
        detail,
        messages: ListMessages::for_entity("Rolle"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::DetailValue;
    use serde_json::json;

    #[test]
    fn test_permission_filter_matches_nested_names() {
        let config = config();
        let filter = config.list.filter("permission").unwrap();
        let role = json!({"id": 1, "name": "Admin", "permissions": [{"name": "users:read"}, {"name": "users:write"}]});
        assert!(filter.matches(&role, "users:write"));
        assert!(!filter.matches(&role, "rooms:read"));
    }

    #[tokio::test]
    async fn test_permission_filter_options_from_items() {
        let config = config();
        let service = std::sync::Arc::new(crate::api::InMemoryService::new(vec![
            json!({"id": 1, "name": "Admin", "permissions": [{"name": "users:write"}, {"name": "all"}]}),
            json!({"id": 2, "name": "Lehrer", "permissions": [{"name": "users:write"}]}),
        ]));
        let mut list = crate::list::ListOrchestrator::new(service, config.list.clone(), config.messages.clone());
        list.fetch().await.unwrap();
        let values: Vec<String> = list.filter_options("permission").into_iter().map(|o| o.value).collect();
        assert_eq!(values, vec!["all".to_string(), "users:write".to_string()]);
    }

    #[test]
    fn test_detail_lists_permissions() {
        let view = config().compose_detail(&json!({"id": 1, "name": "Admin", "permissions": [{"name": "all"}]}));
        assert_eq!(view.header.initials, "A");
        assert_eq!(view.sections[0].items[0].value, DetailValue::Node(vec!["all".into()]));
    }
}
