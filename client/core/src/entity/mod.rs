//! Per-entity configuration
//!
//! Every admin page is the same engine fed with an [`EntityConfig`]: REST
//! resource, theme, list behaviour, form schema, detail layout and copy.

mod activities;
mod devices;
mod groups;
mod roles;
mod rooms;
mod students;

use crate::api::{ApiClient, RestService};
use crate::detail::{compose_detail, DetailConfig, DetailView, Theme};
use crate::error::AdminError;
use crate::form::{FormSection, FormState};
use crate::list::{ListConfig, ListMessages};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Activities,
    Students,
    Roles,
    Rooms,
    Groups,
    Devices,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Activities,
        EntityKind::Students,
        EntityKind::Roles,
        EntityKind::Rooms,
        EntityKind::Groups,
        EntityKind::Devices,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Activities => "activities",
            EntityKind::Students => "students",
            EntityKind::Roles => "roles",
            EntityKind::Rooms => "rooms",
            EntityKind::Groups => "groups",
            EntityKind::Devices => "devices",
        }
    }

    pub fn config(&self) -> EntityConfig {
        match self {
            EntityKind::Activities => activities::config(),
            EntityKind::Students => students::config(),
            EntityKind::Roles => roles::config(),
            EntityKind::Rooms => rooms::config(),
            EntityKind::Groups => groups::config(),
            EntityKind::Devices => devices::config(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AdminError;

    /// Accepts plural and singular English names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "activities" | "activity" => Ok(EntityKind::Activities),
            "students" | "student" => Ok(EntityKind::Students),
            "roles" | "role" => Ok(EntityKind::Roles),
            "rooms" | "room" => Ok(EntityKind::Rooms),
            "groups" | "group" => Ok(EntityKind::Groups),
            "devices" | "device" => Ok(EntityKind::Devices),
            other => Err(AdminError::UnknownEntity(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntityConfig {
    pub kind: EntityKind,
    /// German display names
    pub singular: String,
    pub plural: String,
    /// REST collection path, e.g. `/api/rooms`
    pub resource: String,
    pub theme: Theme,
    pub list: ListConfig,
    pub form: Vec<FormSection>,
    pub detail: DetailConfig,
    pub messages: ListMessages,
}

impl EntityConfig {
    pub fn service(&self, client: ApiClient) -> RestService {
        RestService::new(client, self.resource.clone())
    }

    pub fn compose_detail(&self, item: &Value) -> DetailView {
        compose_detail(&self.detail, &self.theme, item)
    }

    /// Create form when `item` is `None`, edit form otherwise
    pub fn form_for(&self, item: Option<&Value>) -> FormState {
        match item {
            Some(item) => FormState::with_initial(self.form.clone(), item),
            None => FormState::new(self.form.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::all_fields;
    use std::collections::HashSet;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Rooms".parse::<EntityKind>().unwrap(), EntityKind::Rooms);
        assert_eq!("student".parse::<EntityKind>().unwrap(), EntityKind::Students);
        assert!(matches!("lunch".parse::<EntityKind>(), Err(AdminError::UnknownEntity(_))));
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_configs_well_formed() {
        for kind in EntityKind::ALL {
            let config = kind.config();
            assert_eq!(config.kind, kind);
            assert!(config.resource.starts_with("/api/"), "{kind}");
            assert!(!config.form.is_empty(), "{kind}");
            assert!(!config.list.columns.is_empty(), "{kind}");

            let mut names = HashSet::new();
            for field in all_fields(&config.form) {
                assert!(names.insert(field.name.clone()), "{kind}: duplicate field {}", field.name);
                if field.field_type.has_options() {
                    assert!(field.options.is_some(), "{kind}: {} has no options", field.name);
                }
            }
            for filter in &config.list.filters {
                assert!(!filter.id.is_empty(), "{kind}");
            }
        }
    }

    #[test]
    fn test_form_for_edit_seeds_item() {
        let config = EntityKind::Rooms.config();
        let form = config.form_for(Some(&serde_json::json!({"id": 3, "name": "Aula"})));
        assert_eq!(form.entity_id().as_deref(), Some("3"));
        assert_eq!(form.value("name").and_then(|v| v.as_str()), Some("Aula"));
        assert!(config.form_for(None).entity_id().is_none());
    }
}
