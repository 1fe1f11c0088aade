//! Generic list orchestrator
//!
//! Fetches pages through an [`EntityService`] and derives the visible
//! subset. Two strategies:
//!
//! - `Frontend`: one fetch per page, filters and search run locally on
//!   every change.
//! - `Backend`: every search/filter change goes back to page 1 and needs a
//!   new request carrying `search` and the filter values. Callers debounce
//!   those requests (see [`crate::debounce`]).
//!
//! Every fetch gets a sequence number; a response to anything but the latest
//! request is dropped.

use crate::api::{EntityService, ListQuery, Page, Pagination};
use crate::error::{ApiError, ErrorKind};
use crate::form::SelectOption;
use crate::notice::Notice;
use crate::value::{display_value, scalar_string, value_at};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Undrained notices kept per list; older ones are dropped first
pub const MAX_NOTICES: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchStrategy {
    #[default]
    Frontend,
    Backend,
}

/// How a filter value is compared against an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterMatch {
    /// String equality of the scalar at `field`
    Exact,
    /// `"true"` / `"false"` against a boolean field
    Boolean,
    /// Membership in the array at `field`; `key` selects a member of object elements
    ArrayContains { key: Option<String> },
}

/// Where a filter's choices come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOptions {
    Static(Vec<SelectOption>),
    /// Distinct values found in the loaded items
    Dynamic {
        value_field: String,
        label_field: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Filter id, also the backend query parameter
    pub id: String,
    pub label: String,
    /// Dotted path into the item
    pub field: String,
    pub matcher: FilterMatch,
    pub options: FilterOptions,
}

impl FilterConfig {
    /// Exact-match filter on `field` with options derived from the data
    pub fn new(id: impl Into<String>, label: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            id: id.into(),
            label: label.into(),
            options: FilterOptions::Dynamic { value_field: field.clone(), label_field: None },
            field,
            matcher: FilterMatch::Exact,
        }
    }

    pub fn boolean(mut self, true_label: &str, false_label: &str) -> Self {
        self.matcher = FilterMatch::Boolean;
        self.options = FilterOptions::Static(vec![
            SelectOption::new("true", true_label),
            SelectOption::new("false", false_label),
        ]);
        self
    }

    pub fn array_contains(mut self, key: Option<&str>) -> Self {
        self.matcher = FilterMatch::ArrayContains { key: key.map(String::from) };
        self
    }

    pub fn static_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = FilterOptions::Static(options);
        self
    }

    pub fn dynamic_options(mut self, value_field: &str, label_field: Option<&str>) -> Self {
        self.options = FilterOptions::Dynamic {
            value_field: value_field.into(),
            label_field: label_field.map(String::from),
        };
        self
    }

    /// Does `item` pass this filter with `selected`?
    pub fn matches(&self, item: &Value, selected: &str) -> bool {
        let Some(value) = value_at(item, &self.field) else {
            return false;
        };
        match &self.matcher {
            FilterMatch::Exact => scalar_string(value).as_deref() == Some(selected),
            FilterMatch::Boolean => {
                let wanted = selected == "true";
                match value {
                    Value::Bool(b) => *b == wanted,
                    Value::String(s) => (s == "true") == wanted,
                    Value::Number(n) => (n.as_i64() != Some(0)) == wanted,
                    _ => false,
                }
            }
            FilterMatch::ArrayContains { key } => match value {
                Value::Array(elements) => elements.iter().any(|el| {
                    let candidate = match key {
                        Some(key) => value_at(el, key),
                        None => Some(el),
                    };
                    candidate.and_then(scalar_string).as_deref() == Some(selected)
                }),
                _ => false,
            },
        }
    }
}

/// Column of the list table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListColumn {
    pub header: String,
    pub field: String,
}

impl ListColumn {
    pub fn new(header: impl Into<String>, field: impl Into<String>) -> Self {
        Self { header: header.into(), field: field.into() }
    }
}

#[derive(Debug, Clone)]
pub struct ListConfig {
    pub strategy: SearchStrategy,
    pub searchable_fields: Vec<String>,
    /// Shorter (trimmed) terms do not filter
    pub min_search_length: usize,
    pub filters: Vec<FilterConfig>,
    pub page_size: u32,
    pub columns: Vec<ListColumn>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::Frontend,
            searchable_fields: vec!["name".into()],
            min_search_length: 0,
            filters: Vec::new(),
            page_size: 50,
            columns: vec![ListColumn::new("ID", "id"), ListColumn::new("Name", "name")],
        }
    }
}

impl ListConfig {
    pub fn row(&self, item: &Value) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| value_at(item, &c.field).map(display_value).unwrap_or_default())
            .collect()
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    pub fn filter(&self, id: &str) -> Option<&FilterConfig> {
        self.filters.iter().find(|f| f.id == id)
    }
}

/// Case-insensitive substring search across `fields`.
///
/// Terms shorter than `min_len` (after trimming) match everything.
pub fn matches_search(item: &Value, term: &str, fields: &[String], min_len: usize) -> bool {
    let term = term.trim();
    if term.is_empty() || term.chars().count() < min_len {
        return true;
    }
    let term = term.to_lowercase();
    fields.iter().any(|field| {
        value_at(item, field)
            .map(|v| display_value(v).to_lowercase().contains(&term))
            .unwrap_or(false)
    })
}

/// User-facing copy for one entity kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMessages {
    pub created: String,
    pub updated: String,
    pub deleted: String,
    pub confirm_delete: String,
    /// Shown instead of the generic text when a delete hits a conflict
    pub delete_conflict: Option<String>,
}

impl ListMessages {
    pub fn for_entity(singular: &str) -> Self {
        Self {
            created: format!("{} wurde erfolgreich erstellt.", singular),
            updated: format!("{} wurde erfolgreich aktualisiert.", singular),
            deleted: format!("{} wurde erfolgreich gelöscht.", singular),
            confirm_delete: format!("Möchten Sie diesen Eintrag ({}) wirklich löschen?", singular),
            delete_conflict: None,
        }
    }

    pub fn delete_conflict(mut self, message: impl Into<String>) -> Self {
        self.delete_conflict = Some(message.into());
        self
    }
}

/// What a search/filter change requires from the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    /// Visible items already updated locally
    Applied,
    /// A backend request with this query is needed
    Fetch(ListQuery),
}

/// Handle for an issued request; pass back to [`ListOrchestrator::complete_fetch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub seq: u64,
    pub query: ListQuery,
}

/// Yes/no prompt before destructive operations
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// How a delete is confirmed
pub enum DeleteConfirmation<'a> {
    /// Ask now
    Prompt(&'a dyn Confirm),
    /// The page already asked (e.g. through its own dialog)
    AlreadyConfirmed,
}

pub struct ListOrchestrator {
    service: Arc<dyn EntityService>,
    config: ListConfig,
    messages: ListMessages,
    all_items: Vec<Value>,
    items: Vec<Value>,
    pagination: Option<Pagination>,
    page: u32,
    search: String,
    filters: BTreeMap<String, String>,
    loading: bool,
    error: Option<String>,
    notices: Vec<Notice>,
    issued_seq: u64,
}

impl ListOrchestrator {
    pub fn new(service: Arc<dyn EntityService>, config: ListConfig, messages: ListMessages) -> Self {
        Self {
            service,
            config,
            messages,
            all_items: Vec::new(),
            items: Vec::new(),
            pagination: None,
            page: 1,
            search: String::new(),
            filters: BTreeMap::new(),
            loading: false,
            error: None,
            notices: Vec::new(),
            issued_seq: 0,
        }
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn service(&self) -> &Arc<dyn EntityService> {
        &self.service
    }

    /// Visible items
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Everything on the fetched page
    pub fn all_items(&self) -> &[Value] {
        &self.all_items
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn active_filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Pending notices, oldest first. At most [`MAX_NOTICES`] are kept until drained.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, notice: Notice) {
        if self.notices.len() >= MAX_NOTICES {
            let excess = self.notices.len() + 1 - MAX_NOTICES;
            self.notices.drain(..excess);
        }
        self.notices.push(notice);
    }

    /// Query for the current page and, for backend search, the current term and filters.
    /// Terms shorter than `min_search_length` are not sent.
    pub fn query(&self) -> ListQuery {
        let mut query = ListQuery {
            page: self.page,
            page_size: self.config.page_size,
            search: None,
            filters: Vec::new(),
        };
        if self.config.strategy == SearchStrategy::Backend {
            let term = self.search.trim();
            if !term.is_empty() && term.chars().count() >= self.config.min_search_length {
                query.search = Some(term.to_string());
            }
            query.filters = self.filters.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        }
        query
    }

    pub fn begin_fetch(&mut self) -> PendingFetch {
        self.issued_seq += 1;
        self.loading = true;
        PendingFetch { seq: self.issued_seq, query: self.query() }
    }

    /// Apply a response. Returns `false` when it belongs to a superseded request.
    pub fn complete_fetch(&mut self, pending: &PendingFetch, result: Result<Page, ApiError>) -> bool {
        if pending.seq != self.issued_seq {
            tracing::debug!(seq = pending.seq, latest = self.issued_seq, "dropping stale list response");
            return false;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.all_items = page.items;
                self.pagination = page.pagination;
                self.error = None;
                self.recompute();
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch list");
                self.error = Some(err.user_message());
            }
        }
        true
    }

    /// Fetch the current page
    pub async fn fetch(&mut self) -> Result<(), ApiError> {
        let pending = self.begin_fetch();
        let result = self.service.get_list(&pending.query).await;
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        self.complete_fetch(&pending, result);
        outcome
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<(), ApiError> {
        self.page = page.max(1);
        self.fetch().await
    }

    pub fn set_search(&mut self, term: &str) -> Refresh {
        self.search = term.to_string();
        self.after_criteria_change()
    }

    /// Set (`Some`) or clear (`None`) a filter. Unknown ids are ignored.
    pub fn set_filter(&mut self, id: &str, value: Option<&str>) -> Refresh {
        if self.config.filter(id).is_none() {
            tracing::warn!(filter = id, "unknown filter");
            return Refresh::Applied;
        }
        match value.filter(|v| !v.is_empty()) {
            Some(v) => self.filters.insert(id.to_string(), v.to_string()),
            None => self.filters.remove(id),
        };
        self.after_criteria_change()
    }

    pub fn clear_filters(&mut self) -> Refresh {
        self.filters.clear();
        self.search.clear();
        self.after_criteria_change()
    }

    fn after_criteria_change(&mut self) -> Refresh {
        match self.config.strategy {
            SearchStrategy::Frontend => {
                self.recompute();
                Refresh::Applied
            }
            SearchStrategy::Backend => {
                self.page = 1;
                Refresh::Fetch(self.query())
            }
        }
    }

    fn recompute(&mut self) {
        self.items = match self.config.strategy {
            SearchStrategy::Backend => self.all_items.clone(),
            SearchStrategy::Frontend => self
                .all_items
                .iter()
                .filter(|item| self.passes_filters(item))
                .filter(|item| {
                    matches_search(
                        item,
                        &self.search,
                        &self.config.searchable_fields,
                        self.config.min_search_length,
                    )
                })
                .cloned()
                .collect(),
        };
    }

    fn passes_filters(&self, item: &Value) -> bool {
        self.filters.iter().all(|(id, selected)| match self.config.filter(id) {
            Some(filter) => filter.matches(item, selected),
            None => true,
        })
    }

    /// Choices for a filter; dynamic ones are distinct values of the loaded items sorted by label
    pub fn filter_options(&self, id: &str) -> Vec<SelectOption> {
        let Some(filter) = self.config.filter(id) else {
            return Vec::new();
        };
        match &filter.options {
            FilterOptions::Static(options) => options.clone(),
            FilterOptions::Dynamic { value_field, label_field } => {
                let mut seen = BTreeSet::new();
                let mut options = Vec::new();
                for item in &self.all_items {
                    for (value, label) in distinct_values(item, value_field, label_field.as_deref()) {
                        if seen.insert(value.clone()) {
                            options.push(SelectOption { value, label });
                        }
                    }
                }
                options.sort_by(|a, b| a.label.to_lowercase().cmp(&b.label.to_lowercase()));
                options
            }
        }
    }

    pub async fn create(&mut self, payload: &Value) -> Result<Value, ApiError> {
        match self.service.create(payload).await {
            Ok(created) => {
                self.notify(Notice::success(self.messages.created.clone()));
                self.refresh_after_change().await;
                Ok(created)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    pub async fn update(&mut self, id: &str, payload: &Value) -> Result<Value, ApiError> {
        match self.service.update(id, payload).await {
            Ok(updated) => {
                self.notify(Notice::success(self.messages.updated.clone()));
                self.refresh_after_change().await;
                Ok(updated)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Delete after confirmation. `Ok(false)` when the user declined.
    pub async fn delete(&mut self, id: &str, confirmation: DeleteConfirmation<'_>) -> Result<bool, ApiError> {
        if let DeleteConfirmation::Prompt(prompt) = confirmation {
            if !prompt.confirm(&self.messages.confirm_delete) {
                return Ok(false);
            }
        }
        match self.service.delete(id).await {
            Ok(()) => {
                self.notify(Notice::success(self.messages.deleted.clone()));
                self.refresh_after_change().await;
                Ok(true)
            }
            Err(err) if err.kind == ErrorKind::Conflict && self.messages.delete_conflict.is_some() => {
                let message = self.messages.delete_conflict.clone().unwrap_or_default();
                tracing::error!(error = %err, "delete rejected");
                self.notify(Notice::error(message.clone()));
                self.error = Some(message);
                Err(err)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    fn report(&mut self, err: ApiError) -> ApiError {
        tracing::error!(error = %err, "list operation failed");
        let message = err.user_message();
        self.notify(Notice::error(message.clone()));
        self.error = Some(message);
        err
    }

    async fn refresh_after_change(&mut self) {
        // failure already lands in `self.error`
        let _ = self.fetch().await;
    }
}

fn distinct_values(item: &Value, value_field: &str, label_field: Option<&str>) -> Vec<(String, String)> {
    let Some(raw) = value_at(item, value_field) else {
        return Vec::new();
    };
    let label_of = |v: &String| {
        label_field
            .and_then(|lf| value_at(item, lf))
            .map(display_value)
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| v.clone())
    };
    match raw {
        // object elements are keyed by `label_field`
        Value::Array(elements) => elements
            .iter()
            .filter_map(|el| match el {
                Value::Object(_) => label_field.and_then(|lf| value_at(el, lf)).and_then(scalar_string),
                scalar => scalar_string(scalar),
            })
            .map(|v| (v.clone(), v))
            .collect(),
        other => scalar_string(other)
            .filter(|v| !v.is_empty())
            .map(|v| {
                let label = label_of(&v);
                vec![(v, label)]
            })
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryService;
    use crate::debounce::{Debouncer, SEARCH_DEBOUNCE};
    use serde_json::json;
    use std::cell::Cell;
    use tokio::time::Instant;

    struct Answer {
        yes: bool,
        asked: Cell<u32>,
    }

    impl Confirm for Answer {
        fn confirm(&self, _message: &str) -> bool {
            self.asked.set(self.asked.get() + 1);
            self.yes
        }
    }

    fn activities() -> Vec<Value> {
        vec![
            json!({"id": 1, "name": "Chess Club", "category_id": 2, "category": "Denksport",
                   "is_open": true, "supervisors": [{"id": 7, "name": "Frau Berg"}]}),
            json!({"id": 2, "name": "Art", "category_id": 1, "category": "Kunst",
                   "is_open": false, "supervisors": [{"id": 8, "name": "Herr Kuhn"}]}),
            json!({"id": 3, "name": "Fußball", "category_id": 3, "category": "Sport",
                   "is_open": true, "supervisors": [{"id": 7, "name": "Frau Berg"}]}),
        ]
    }

    fn config(strategy: SearchStrategy) -> ListConfig {
        ListConfig {
            strategy,
            searchable_fields: vec!["name".into()],
            min_search_length: 0,
            filters: vec![
                FilterConfig::new("category_id", "Kategorie", "category_id")
                    .dynamic_options("category_id", Some("category")),
                FilterConfig::new("is_open", "Offen", "is_open").boolean("Offen", "Geschlossen"),
                FilterConfig::new("supervisor", "Leitung", "supervisors").array_contains(Some("id")),
            ],
            page_size: 50,
            columns: vec![ListColumn::new("Name", "name"), ListColumn::new("Kategorie", "category")],
        }
    }

    fn orchestrator(strategy: SearchStrategy) -> (ListOrchestrator, Arc<InMemoryService>) {
        let service = Arc::new(InMemoryService::new(activities()));
        let list = ListOrchestrator::new(
            service.clone(),
            config(strategy),
            ListMessages::for_entity("Aktivität"),
        );
        (list, service)
    }

    fn names(list: &ListOrchestrator) -> Vec<String> {
        list.items().iter().map(|i| i["name"].as_str().unwrap_or_default().to_string()).collect()
    }

    #[tokio::test]
    async fn test_frontend_search_is_case_insensitive() {
        let (mut list, service) = orchestrator(SearchStrategy::Frontend);
        list.fetch().await.unwrap();

        for term in ["chess", "CHESS", "Chess"] {
            assert_eq!(list.set_search(term), Refresh::Applied);
            assert_eq!(names(&list), vec!["Chess Club"]);
        }
        // local search never hits the service again
        assert_eq!(service.queries().len(), 1);
    }

    #[test]
    fn test_min_search_length() {
        let item = json!({"name": "Art"});
        let fields = vec!["name".to_string()];
        assert!(matches_search(&item, "zz", &fields, 3));
        assert!(!matches_search(&item, "zzz", &fields, 3));
        assert!(matches_search(&item, "  ", &fields, 0));
    }

    #[tokio::test]
    async fn test_frontend_filters_apply_before_search() {
        let (mut list, _) = orchestrator(SearchStrategy::Frontend);
        list.fetch().await.unwrap();

        list.set_filter("is_open", Some("true"));
        assert_eq!(names(&list), vec!["Chess Club", "Fußball"]);

        list.set_filter("supervisor", Some("7"));
        list.set_search("fuß");
        assert_eq!(names(&list), vec!["Fußball"]);

        list.set_filter("is_open", None);
        list.set_search("");
        assert_eq!(names(&list), vec!["Chess Club", "Fußball"]);

        list.clear_filters();
        assert_eq!(list.items().len(), 3);
    }

    #[tokio::test]
    async fn test_dynamic_filter_options_sorted_by_label() {
        let (mut list, _) = orchestrator(SearchStrategy::Frontend);
        list.fetch().await.unwrap();
        let options = list.filter_options("category_id");
        assert_eq!(
            options,
            vec![
                SelectOption::new("2", "Denksport"),
                SelectOption::new("1", "Kunst"),
                SelectOption::new("3", "Sport"),
            ]
        );
        assert_eq!(list.filter_options("is_open").len(), 2);
        assert!(list.filter_options("nope").is_empty());
    }

    #[tokio::test]
    async fn test_backend_strategy_resets_page_and_queries_server() {
        let (mut list, service) = orchestrator(SearchStrategy::Backend);
        list.go_to_page(2).await.unwrap();
        assert_eq!(list.page(), 2);

        let refresh = list.set_search("chess");
        let expected = ListQuery {
            page: 1,
            page_size: 50,
            search: Some("chess".into()),
            filters: Vec::new(),
        };
        assert_eq!(refresh, Refresh::Fetch(expected.clone()));
        list.fetch().await.unwrap();
        assert_eq!(names(&list), vec!["Chess Club"]);
        assert_eq!(service.queries().last(), Some(&expected));

        let refresh = list.set_filter("category_id", Some("2"));
        match refresh {
            Refresh::Fetch(query) => {
                assert_eq!(query.filters, vec![("category_id".to_string(), "2".to_string())])
            }
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_search_burst_fetches_once_after_quiet_period() {
        let (mut list, service) = orchestrator(SearchStrategy::Backend);
        list.fetch().await.unwrap();
        let before = service.queries().len();

        let (debouncer, mut settled) = Debouncer::new(SEARCH_DEBOUNCE);
        let start = Instant::now();
        for term in ["c", "ch", "che", "chess"] {
            if let Refresh::Fetch(query) = list.set_search(term) {
                debouncer.push(query);
            }
        }
        assert_eq!(service.queries().len(), before);

        let query = settled.recv().await.unwrap();
        assert!(start.elapsed() >= SEARCH_DEBOUNCE);
        assert_eq!(query, list.query());
        list.fetch().await.unwrap();

        drop(debouncer);
        assert_eq!(settled.recv().await, None);
        assert_eq!(service.queries().len(), before + 1);
        assert_eq!(service.queries().last().and_then(|q| q.search.as_deref()), Some("chess"));
        assert_eq!(names(&list), vec!["Chess Club"]);
    }

    #[test]
    fn test_backend_query_skips_short_terms() {
        let service = Arc::new(InMemoryService::new(activities()));
        let mut config = config(SearchStrategy::Backend);
        config.min_search_length = 2;
        let mut list = ListOrchestrator::new(service, config, ListMessages::for_entity("Aktivität"));

        match list.set_search("a") {
            Refresh::Fetch(query) => assert_eq!(query.search, None),
            other => panic!("expected fetch, got {:?}", other),
        }
        match list.set_search("ar") {
            Refresh::Fetch(query) => assert_eq!(query.search.as_deref(), Some("ar")),
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stale_response_is_dropped() {
        let (mut list, _) = orchestrator(SearchStrategy::Backend);
        let first = list.begin_fetch();
        let second = list.begin_fetch();

        let newer = Page { items: vec![json!({"id": 9, "name": "Neu"})], pagination: None };
        assert!(list.complete_fetch(&second, Ok(newer)));
        let older = Page { items: vec![json!({"id": 1, "name": "Alt"})], pagination: None };
        assert!(!list.complete_fetch(&first, Ok(older)));

        assert_eq!(names(&list), vec!["Neu"]);
        assert!(!list.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_error_keeps_previous_items() {
        let (mut list, service) = orchestrator(SearchStrategy::Frontend);
        list.fetch().await.unwrap();
        service.fail_next(ApiError::from_status(401, "expired"));
        assert!(list.fetch().await.is_err());
        assert_eq!(list.items().len(), 3);
        assert_eq!(
            list.error(),
            Some("Sie sind nicht angemeldet. Bitte melden Sie sich erneut an.")
        );
    }

    #[tokio::test]
    async fn test_create_update_notify_and_refetch() {
        let (mut list, service) = orchestrator(SearchStrategy::Frontend);
        list.fetch().await.unwrap();

        let created = list.create(&json!({"name": "Theater"})).await.unwrap();
        assert_eq!(created["id"], 4);
        assert_eq!(list.items().len(), 4);

        list.update("4", &json!({"name": "Theater AG"})).await.unwrap();
        assert!(names(&list).contains(&"Theater AG".to_string()));

        let notices = list.take_notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].message, "Aktivität wurde erfolgreich erstellt.");
        assert!(list.notices().is_empty());
        assert_eq!(service.queries().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (mut list, service) = orchestrator(SearchStrategy::Frontend);
        list.fetch().await.unwrap();

        let no = Answer { yes: false, asked: Cell::new(0) };
        assert!(!list.delete("1", DeleteConfirmation::Prompt(&no)).await.unwrap());
        assert_eq!(no.asked.get(), 1);
        assert_eq!(service.items().len(), 3);

        let yes = Answer { yes: true, asked: Cell::new(0) };
        assert!(list.delete("1", DeleteConfirmation::Prompt(&yes)).await.unwrap());
        assert_eq!(list.items().len(), 2);

        assert!(list.delete("2", DeleteConfirmation::AlreadyConfirmed).await.unwrap());
        assert_eq!(list.items().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_conflict_uses_entity_message() {
        let service = Arc::new(InMemoryService::new(activities()));
        let messages = ListMessages::for_entity("Aktivität")
            .delete_conflict("Die Aktivität hat noch eingeschriebene Schüler.");
        let mut list = ListOrchestrator::new(service.clone(), config(SearchStrategy::Frontend), messages);

        service.fail_next(ApiError::from_status(409, "students enrolled"));
        let err = list.delete("1", DeleteConfirmation::AlreadyConfirmed).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(list.error(), Some("Die Aktivität hat noch eingeschriebene Schüler."));
        assert_eq!(list.notices()[0].level, crate::notice::NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_undrained_notices_are_capped() {
        let (mut list, service) = orchestrator(SearchStrategy::Frontend);
        for i in 0..MAX_NOTICES + 5 {
            service.fail_next(ApiError::from_status(500, format!("boom {i}")));
            assert!(list.create(&json!({"name": "X"})).await.is_err());
        }
        assert_eq!(list.notices().len(), MAX_NOTICES);

        list.create(&json!({"name": "Theater"})).await.unwrap();
        assert_eq!(list.notices().len(), MAX_NOTICES);
        let newest = list.notices().last().map(|n| n.message.as_str());
        assert_eq!(newest, Some("Aktivität wurde erfolgreich erstellt."));
    }

    #[test]
    fn test_row_rendering() {
        let config = config(SearchStrategy::Frontend);
        assert_eq!(config.row(&activities()[0]), vec!["Chess Club", "Denksport"]);
        assert_eq!(config.headers(), vec!["Name", "Kategorie"]);
    }
}
