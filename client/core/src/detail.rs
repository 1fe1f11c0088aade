//! Detail view composer
//!
//! Turns an entity and its [`DetailConfig`] into a [`DetailView`]: themed
//! header (initials, title, subtitle, badges), labeled sections and action
//! descriptors. Pure; no state.

use crate::value::{display_value, value_at};
use serde::Serialize;
use serde_json::Value;

/// Placeholder for absent values
pub const NOT_SPECIFIED: &str = "Nicht angegeben";

/// Theme tokens of one entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub primary: String,
    pub gradient_from: String,
    pub gradient_to: String,
}

impl Theme {
    pub fn new(primary: &str, gradient_from: &str, gradient_to: &str) -> Self {
        Self {
            primary: primary.into(),
            gradient_from: gradient_from.into(),
            gradient_to: gradient_to.into(),
        }
    }
}

/// How a header text is built from the entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSpec {
    Field(String),
    /// Non-empty field values joined by `separator`
    Join { fields: Vec<String>, separator: String },
    Fixed(String),
}

impl TextSpec {
    pub fn field(path: &str) -> Self {
        TextSpec::Field(path.into())
    }

    pub fn join(fields: &[&str], separator: &str) -> Self {
        TextSpec::Join {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            separator: separator.into(),
        }
    }

    pub fn resolve(&self, item: &Value) -> String {
        match self {
            TextSpec::Field(path) => value_at(item, path).map(display_value).unwrap_or_default(),
            TextSpec::Join { fields, separator } => fields
                .iter()
                .filter_map(|f| value_at(item, f).map(display_value))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(separator),
            TextSpec::Fixed(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Success,
    Info,
    Warning,
    Danger,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeSpec {
    /// Boolean field: one badge for `true`, optionally one for `false`
    Flag {
        field: String,
        when_true: (String, BadgeTone),
        when_false: Option<(String, BadgeTone)>,
    },
    /// The field's value shown as a badge when present
    Value { field: String, tone: BadgeTone },
}

impl BadgeSpec {
    pub fn flag(field: &str, when_true: (&str, BadgeTone), when_false: Option<(&str, BadgeTone)>) -> Self {
        BadgeSpec::Flag {
            field: field.into(),
            when_true: (when_true.0.into(), when_true.1),
            when_false: when_false.map(|(l, t)| (l.into(), t)),
        }
    }

    pub fn value(field: &str, tone: BadgeTone) -> Self {
        BadgeSpec::Value { field: field.into(), tone }
    }

    fn resolve(&self, item: &Value) -> Option<Badge> {
        match self {
            BadgeSpec::Flag { field, when_true, when_false } => {
                let on = value_at(item, field).and_then(Value::as_bool).unwrap_or(false);
                let (label, tone) = if on { Some(when_true) } else { when_false.as_ref() }?;
                Some(Badge { label: label.clone(), tone: *tone })
            }
            BadgeSpec::Value { field, tone } => {
                let label = value_at(item, field).map(display_value).filter(|s| !s.is_empty())?;
                Some(Badge { label, tone: *tone })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Text,
    /// Array rendered as a nested list; `item_field` picks the text of object elements
    List { item_field: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailItemSpec {
    pub label: String,
    pub field: String,
    pub kind: ItemKind,
}

impl DetailItemSpec {
    pub fn text(label: &str, field: &str) -> Self {
        Self { label: label.into(), field: field.into(), kind: ItemKind::Text }
    }

    pub fn list(label: &str, field: &str, item_field: Option<&str>) -> Self {
        Self {
            label: label.into(),
            field: field.into(),
            kind: ItemKind::List { item_field: item_field.map(String::from) },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSectionSpec {
    pub title: String,
    pub items: Vec<DetailItemSpec>,
}

impl DetailSectionSpec {
    pub fn new(title: &str, items: Vec<DetailItemSpec>) -> Self {
        Self { title: title.into(), items }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Edit,
    Delete,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailAction {
    pub id: String,
    pub label: String,
    pub kind: ActionKind,
}

impl DetailAction {
    pub fn custom(id: &str, label: &str) -> Self {
        Self { id: id.into(), label: label.into(), kind: ActionKind::Custom }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailConfig {
    pub title: TextSpec,
    pub subtitle: Option<TextSpec>,
    pub badges: Vec<BadgeSpec>,
    pub sections: Vec<DetailSectionSpec>,
    pub custom_actions: Vec<DetailAction>,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            title: TextSpec::field("name"),
            subtitle: None,
            badges: Vec::new(),
            sections: Vec::new(),
            custom_actions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub tone: BadgeTone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailHeader {
    pub title: String,
    pub subtitle: Option<String>,
    pub initials: String,
    pub badges: Vec<Badge>,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DetailValue {
    Text(String),
    /// Pre-rendered nested content
    Node(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailItem {
    pub label: String,
    pub value: DetailValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailSection {
    pub title: String,
    pub items: Vec<DetailItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub header: DetailHeader,
    pub sections: Vec<DetailSection>,
    pub actions: Vec<DetailAction>,
}

/// Up to two uppercase initials; `?` for an empty name
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".into()
    } else {
        letters
    }
}

pub fn compose_detail(config: &DetailConfig, theme: &Theme, item: &Value) -> DetailView {
    let title = config.title.resolve(item);
    let subtitle = config
        .subtitle
        .as_ref()
        .map(|s| s.resolve(item))
        .filter(|s| !s.is_empty());

    let header = DetailHeader {
        initials: initials(&title),
        title,
        subtitle,
        badges: config.badges.iter().filter_map(|b| b.resolve(item)).collect(),
        theme: theme.clone(),
    };

    let sections = config
        .sections
        .iter()
        .map(|section| DetailSection {
            title: section.title.clone(),
            items: section.items.iter().map(|spec| compose_item(spec, item)).collect(),
        })
        .collect();

    let mut actions = vec![
        DetailAction { id: "edit".into(), label: "Bearbeiten".into(), kind: ActionKind::Edit },
        DetailAction { id: "delete".into(), label: "Löschen".into(), kind: ActionKind::Delete },
    ];
    actions.extend(config.custom_actions.iter().cloned());

    DetailView { header, sections, actions }
}

fn compose_item(spec: &DetailItemSpec, item: &Value) -> DetailItem {
    let raw = value_at(item, &spec.field);
    let value = match (&spec.kind, raw) {
        (ItemKind::List { item_field }, Some(Value::Array(elements))) => {
            let entries: Vec<String> = elements
                .iter()
                .map(|el| match item_field {
                    Some(f) => value_at(el, f).map(display_value).unwrap_or_default(),
                    None => display_value(el),
                })
                .filter(|s| !s.is_empty())
                .collect();
            if entries.is_empty() {
                DetailValue::Text(NOT_SPECIFIED.into())
            } else {
                DetailValue::Node(entries)
            }
        }
        (_, raw) => {
            let text = raw.map(display_value).unwrap_or_default();
            DetailValue::Text(if text.is_empty() { NOT_SPECIFIED.into() } else { text })
        }
    };
    DetailItem { label: spec.label.clone(), value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn student_config() -> DetailConfig {
        DetailConfig {
            title: TextSpec::join(&["first_name", "second_name"], " "),
            subtitle: Some(TextSpec::field("school_class")),
            badges: vec![
                BadgeSpec::flag("bus", ("Buskind", BadgeTone::Info), None),
                BadgeSpec::flag(
                    "in_house",
                    ("Anwesend", BadgeTone::Success),
                    Some(("Abwesend", BadgeTone::Neutral)),
                ),
            ],
            sections: vec![DetailSectionSpec::new(
                "Persönliche Daten",
                vec![
                    DetailItemSpec::text("Klasse", "school_class"),
                    DetailItemSpec::text("Gruppe", "group.name"),
                    DetailItemSpec::list("Erziehungsberechtigte", "guardians", Some("name")),
                ],
            )],
            custom_actions: vec![DetailAction::custom("checkout", "Abmelden")],
        }
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("max mustermann"), "MM");
        assert_eq!(initials("Anna Lena Schmidt"), "AL");
        assert_eq!(initials("Ö"), "Ö");
        assert_eq!(initials("   "), "?");
    }

    #[test]
    fn test_compose_header_and_badges() {
        let theme = Theme::new("#5080D8", "#5080D8", "#3f6bc4");
        let item = json!({"first_name": "Max", "second_name": "Mustermann", "school_class": "3b",
                          "bus": false, "in_house": false});
        let view = compose_detail(&student_config(), &theme, &item);
        assert_eq!(view.header.title, "Max Mustermann");
        assert_eq!(view.header.initials, "MM");
        assert_eq!(view.header.subtitle.as_deref(), Some("3b"));
        assert_eq!(view.header.badges, vec![Badge { label: "Abwesend".into(), tone: BadgeTone::Neutral }]);
        assert_eq!(view.actions.len(), 3);
        assert_eq!(view.actions[2].kind, ActionKind::Custom);
    }

    #[test]
    fn test_compose_items() {
        let theme = Theme::new("a", "b", "c");
        let item = json!({"first_name": "Max", "group": {"name": "Rot"},
                          "guardians": [{"name": "Eva"}, {"name": "Tom"}]});
        let view = compose_detail(&student_config(), &theme, &item);
        let items = &view.sections[0].items;
        assert_eq!(items[0].value, DetailValue::Text(NOT_SPECIFIED.into()));
        assert_eq!(items[1].value, DetailValue::Text("Rot".into()));
        assert_eq!(items[2].value, DetailValue::Node(vec!["Eva".into(), "Tom".into()]));
    }
}
