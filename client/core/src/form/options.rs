//! Select options and the async option loader
//!
//! Options are either static, produced by an [`OptionProvider`], or fetched
//! from a REST endpoint. The loader belongs to one form instance: each field
//! is loaded at most once until it is explicitly invalidated.

use super::field::{FormField, FormSection};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::value::scalar_string;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// One entry of a select control
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

/// Async source of options
#[async_trait]
pub trait OptionProvider: Send + Sync {
    async fn load(&self) -> Result<Vec<SelectOption>, ApiError>;
}

/// Where a select field gets its options from
#[derive(Clone)]
pub enum OptionSource {
    Static(Vec<SelectOption>),
    Provider(Arc<dyn OptionProvider>),
    /// `GET path`, each item mapped to `{value: item[value_key], label: item[label_keys...]}`
    Endpoint {
        path: String,
        value_key: String,
        label_keys: Vec<String>,
    },
}

impl fmt::Debug for OptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSource::Static(options) => f.debug_tuple("Static").field(options).finish(),
            OptionSource::Provider(_) => f.write_str("Provider(..)"),
            OptionSource::Endpoint { path, .. } => f.debug_tuple("Endpoint").field(path).finish(),
        }
    }
}

impl OptionSource {
    /// Static options from `(value, label)` pairs
    pub fn pairs(pairs: &[(&str, &str)]) -> Self {
        OptionSource::Static(pairs.iter().map(|(v, l)| SelectOption::new(*v, *l)).collect())
    }

    /// Endpoint with `id` values and `name` labels
    pub fn endpoint(path: impl Into<String>) -> Self {
        Self::endpoint_with(path, "id", &["name"])
    }

    pub fn endpoint_with(path: impl Into<String>, value_key: &str, label_keys: &[&str]) -> Self {
        OptionSource::Endpoint {
            path: path.into(),
            value_key: value_key.into(),
            label_keys: label_keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn provider<P: OptionProvider + 'static>(provider: P) -> Self {
        OptionSource::Provider(Arc::new(provider))
    }

    pub fn is_async(&self) -> bool {
        !matches!(self, OptionSource::Static(_))
    }
}

/// Map fetched items to options. Items already shaped `{value, label}` pass through.
pub fn options_from_items(items: &[Value], value_key: &str, label_keys: &[String]) -> Vec<SelectOption> {
    items
        .iter()
        .filter_map(|item| {
            let value = scalar_string(item.get(value_key).or_else(|| item.get("value"))?)?;
            let label = label_keys
                .iter()
                .filter_map(|k| item.get(k.as_str()).and_then(scalar_string))
                .collect::<Vec<_>>()
                .join(" ");
            let label = if label.is_empty() {
                item.get("label").and_then(scalar_string).unwrap_or_else(|| value.clone())
            } else {
                label
            };
            Some(SelectOption { value, label })
        })
        .collect()
}

#[derive(Default)]
struct LoaderState {
    options: HashMap<String, Vec<SelectOption>>,
    loaded: HashSet<String>,
    /// In-flight loads by field, tagged with the token of the load that owns them
    loading: HashMap<String, u64>,
    next_token: u64,
}

/// Clears the loading entry of one load when it finishes or is dropped
struct LoadTicket {
    state: Arc<RwLock<LoaderState>>,
    field: String,
    token: u64,
}

impl Drop for LoadTicket {
    fn drop(&mut self) {
        let mut state = self.state.write();
        if state.loading.get(&self.field) == Some(&self.token) {
            state.loading.remove(&self.field);
        }
    }
}

/// Per-form option loader
#[derive(Clone, Default)]
pub struct OptionLoader {
    state: Arc<RwLock<LoaderState>>,
}

impl OptionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options currently available for `field`
    pub fn options(&self, field: &FormField) -> Vec<SelectOption> {
        match &field.options {
            Some(OptionSource::Static(options)) => options.clone(),
            Some(_) => self.state.read().options.get(&field.name).cloned().unwrap_or_default(),
            None => Vec::new(),
        }
    }

    pub fn is_loading(&self, name: &str) -> bool {
        self.state.read().loading.contains_key(name)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.state.read().loaded.contains(name)
    }

    /// Forget the cached options of one field so the next load fetches again.
    /// A load still in flight for that field is discarded when it completes.
    pub fn invalidate(&self, name: &str) {
        let mut state = self.state.write();
        state.loaded.remove(name);
        state.options.remove(name);
        state.loading.remove(name);
    }

    pub async fn load_all(&self, sections: &[FormSection], client: Option<&ApiClient>) {
        for field in sections.iter().flat_map(|s| s.fields.iter()) {
            self.load_field(field, client).await;
        }
    }

    /// Load options for one field unless already loaded or in flight
    pub async fn load_field(&self, field: &FormField, client: Option<&ApiClient>) {
        if !field.field_type.has_options() {
            return;
        }
        let source = match &field.options {
            Some(source) if source.is_async() => source,
            _ => return,
        };

        let ticket = {
            let mut state = self.state.write();
            if state.loaded.contains(&field.name) || state.loading.contains_key(&field.name) {
                return;
            }
            state.next_token += 1;
            let token = state.next_token;
            state.loading.insert(field.name.clone(), token);
            LoadTicket { state: self.state.clone(), field: field.name.clone(), token }
        };

        let result = match source {
            OptionSource::Provider(provider) => provider.load().await,
            OptionSource::Endpoint { path, value_key, label_keys } => match client {
                Some(client) => client
                    .get::<Vec<Value>>(path)
                    .await
                    .map(|items| options_from_items(&items, value_key, label_keys)),
                None => {
                    tracing::warn!(field = %field.name, %path, "no api client for option endpoint");
                    Ok(Vec::new())
                }
            },
            OptionSource::Static(options) => Ok(options.clone()),
        };

        let options = result.unwrap_or_else(|err| {
            tracing::error!(field = %field.name, error = %err, "failed to load options");
            Vec::new()
        });

        let mut state = self.state.write();
        if state.loading.get(&field.name) != Some(&ticket.token) {
            tracing::debug!(field = %field.name, "discarding options of an invalidated load");
            return;
        }
        state.loading.remove(&field.name);
        state.loaded.insert(field.name.clone());
        state.options.insert(field.name.clone(), options);
    }
}
