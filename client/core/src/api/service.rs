//! Entity services - CRUD abstraction over one REST resource
//!
//! The list and form engines only talk to [`EntityService`]. [`RestService`]
//! is the production implementation, [`InMemoryService`] backs tests and
//! offline demos.

use super::client::{ApiClient, Pagination};
use crate::error::{ApiError, ErrorKind};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

/// Query for one page of a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    /// Active filters as (query parameter, value)
    pub filters: Vec<(String, String)>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { page: 1, page_size: 50, search: None, filters: Vec::new() }
    }
}

impl ListQuery {
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search".to_string(), search.to_string()));
        }
        params.extend(self.filters.iter().cloned());
        params
    }
}

/// One fetched page
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Value>,
    pub pagination: Option<Pagination>,
}

/// CRUD operations for one entity kind
#[async_trait]
pub trait EntityService: Send + Sync {
    async fn get_list(&self, query: &ListQuery) -> Result<Page, ApiError>;

    async fn get_one(&self, id: &str) -> Result<Value, ApiError>;

    async fn create(&self, payload: &Value) -> Result<Value, ApiError>;

    async fn update(&self, id: &str, payload: &Value) -> Result<Value, ApiError>;

    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// Read the `id` of an entity as a string (ids are numbers or strings)
pub fn entity_id(item: &Value) -> Option<String> {
    match item.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// REST implementation: `GET/POST {resource}`, `GET/PUT/DELETE {resource}/{id}`
#[derive(Debug, Clone)]
pub struct RestService {
    client: ApiClient,
    resource: String,
}

impl RestService {
    pub fn new(client: ApiClient, resource: impl Into<String>) -> Self {
        Self { client, resource: resource.into() }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.resource, id)
    }
}

#[async_trait]
impl EntityService for RestService {
    async fn get_list(&self, query: &ListQuery) -> Result<Page, ApiError> {
        let env = self.client.get_envelope(&self.resource, &query.to_params()).await?;
        let pagination = env.pagination.clone();
        let items = match env.data {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => {
                return Err(ApiError::new(
                    ErrorKind::Unknown,
                    format!("expected a list from {}, got {}", self.resource, other),
                ))
            }
        };
        tracing::debug!(resource = %self.resource, count = items.len(), "list fetched");
        Ok(Page { items, pagination })
    }

    async fn get_one(&self, id: &str) -> Result<Value, ApiError> {
        self.client.get(&self.item_path(id)).await
    }

    async fn create(&self, payload: &Value) -> Result<Value, ApiError> {
        self.client.post(&self.resource, payload).await
    }

    async fn update(&self, id: &str, payload: &Value) -> Result<Value, ApiError> {
        self.client.put(&self.item_path(id), payload).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&self.item_path(id)).await
    }
}

/// In-memory service (for testing and offline use)
///
/// Mimics the backend: substring search over string fields, exact-match
/// filters, page slicing. Every list query is recorded.
pub struct InMemoryService {
    items: RwLock<Vec<Value>>,
    next_id: RwLock<u64>,
    queries: RwLock<Vec<ListQuery>>,
    fail_next: RwLock<Option<ApiError>>,
}

impl InMemoryService {
    pub fn new(items: Vec<Value>) -> Self {
        let next_id = items
            .iter()
            .filter_map(|i| i.get("id").and_then(Value::as_u64))
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            items: RwLock::new(items),
            next_id: RwLock::new(next_id),
            queries: RwLock::new(Vec::new()),
            fail_next: RwLock::new(None),
        }
    }

    /// Queries seen by `get_list`, oldest first
    pub fn queries(&self) -> Vec<ListQuery> {
        self.queries.read().clone()
    }

    pub fn items(&self) -> Vec<Value> {
        self.items.read().clone()
    }

    /// Make the next call fail with `err`
    pub fn fail_next(&self, err: ApiError) {
        *self.fail_next.write() = Some(err);
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        match self.fail_next.write().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn matches(item: &Value, query: &ListQuery) -> bool {
        let search_ok = match query.search.as_deref().filter(|s| !s.is_empty()) {
            Some(term) => {
                let term = term.to_lowercase();
                item.as_object().is_some_and(|obj| {
                    obj.values()
                        .filter_map(Value::as_str)
                        .any(|s| s.to_lowercase().contains(&term))
                })
            }
            None => true,
        };
        search_ok
            && query.filters.iter().all(|(key, expected)| match item.get(key) {
                Some(Value::String(s)) => s == expected,
                Some(other) => other.to_string() == *expected,
                None => false,
            })
    }
}

#[async_trait]
impl EntityService for InMemoryService {
    async fn get_list(&self, query: &ListQuery) -> Result<Page, ApiError> {
        self.queries.write().push(query.clone());
        self.check_failure()?;

        let matching: Vec<Value> = self
            .items
            .read()
            .iter()
            .filter(|item| Self::matches(item, query))
            .cloned()
            .collect();

        let page_size = query.page_size.max(1);
        let total_records = matching.len() as u64;
        let total_pages = (matching.len() as u32).div_ceil(page_size).max(1);
        let start = ((query.page.max(1) - 1) * page_size) as usize;
        let items = matching.into_iter().skip(start).take(page_size as usize).collect();

        Ok(Page {
            items,
            pagination: Some(Pagination {
                current_page: query.page.max(1),
                page_size,
                total_pages,
                total_records,
            }),
        })
    }

    async fn get_one(&self, id: &str) -> Result<Value, ApiError> {
        self.check_failure()?;
        self.items
            .read()
            .iter()
            .find(|item| entity_id(item).as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| ApiError::from_status(404, format!("{} not found", id)))
    }

    async fn create(&self, payload: &Value) -> Result<Value, ApiError> {
        self.check_failure()?;
        let mut item = payload.clone();
        let id = {
            let mut next = self.next_id.write();
            let id = *next;
            *next += 1;
            id
        };
        match item.as_object_mut() {
            Some(obj) => {
                obj.insert("id".into(), Value::from(id));
            }
            None => return Err(ApiError::from_status(400, "payload must be an object")),
        }
        self.items.write().push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: &str, payload: &Value) -> Result<Value, ApiError> {
        self.check_failure()?;
        let mut items = self.items.write();
        let item = items
            .iter_mut()
            .find(|item| entity_id(item).as_deref() == Some(id))
            .ok_or_else(|| ApiError::from_status(404, format!("{} not found", id)))?;
        if let (Some(target), Some(patch)) = (item.as_object_mut(), payload.as_object()) {
            for (key, value) in patch {
                if key != "id" {
                    target.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(item.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.check_failure()?;
        let mut items = self.items.write();
        let before = items.len();
        items.retain(|item| entity_id(item).as_deref() != Some(id));
        if items.len() == before {
            return Err(ApiError::from_status(404, format!("{} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rooms() -> Vec<Value> {
        vec![
            json!({"id": 1, "name": "Aula", "building": "A"}),
            json!({"id": 2, "name": "Werkraum", "building": "B"}),
            json!({"id": 3, "name": "Musikraum", "building": "B"}),
        ]
    }

    #[test]
    fn test_query_params() {
        let query = ListQuery {
            page: 2,
            page_size: 20,
            search: Some("chess".into()),
            filters: vec![("category".into(), "Sport".into())],
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "20".to_string()),
                ("search".to_string(), "chess".to_string()),
                ("category".to_string(), "Sport".to_string()),
            ]
        );
        let empty_search = ListQuery { search: Some(String::new()), ..Default::default() };
        assert_eq!(empty_search.to_params().len(), 2);
    }

    #[test]
    fn test_entity_id() {
        assert_eq!(entity_id(&json!({"id": 5})).as_deref(), Some("5"));
        assert_eq!(entity_id(&json!({"id": "abc"})).as_deref(), Some("abc"));
        assert_eq!(entity_id(&json!({"name": "x"})), None);
    }

    #[tokio::test]
    async fn test_in_memory_crud() {
        let service = InMemoryService::new(rooms());

        let created = assert_ok!(service.create(&json!({"name": "Mensa"})).await);
        assert_eq!(created["id"], 4);

        let updated = assert_ok!(service.update("4", &json!({"building": "C"})).await);
        assert_eq!(updated["name"], "Mensa");
        assert_eq!(updated["building"], "C");

        assert_ok!(service.delete("1").await);
        assert_err!(service.get_one("1").await);
        assert_err!(service.delete("1").await);
        assert_eq!(service.items().len(), 3);
    }

    #[tokio::test]
    async fn test_in_memory_search_and_paging() {
        let service = InMemoryService::new(rooms());
        let page = service
            .get_list(&ListQuery {
                page: 1,
                page_size: 1,
                search: Some("RAUM".into()),
                filters: vec![("building".into(), "B".into())],
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        let pagination = page.pagination.unwrap();
        assert_eq!(pagination.total_records, 2);
        assert_eq!(pagination.total_pages, 2);
        assert_eq!(service.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_injected_failure() {
        let service = InMemoryService::new(rooms());
        service.fail_next(ApiError::from_status(403, "forbidden"));
        let err = service.get_one("1").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(service.get_one("1").await.is_ok());
    }

    #[tokio::test]
    async fn test_rest_service_roundtrip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/groups"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": [{"id": 1, "name": "Gruppe 1"}],
                "pagination": {"current_page": 1, "page_size": 50, "total_pages": 1, "total_records": 1}
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/groups/1"))
            .and(body_json(json!({"name": "Gruppe A"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"id": 1, "name": "Gruppe A"}
            })))
            .mount(&server)
            .await;

        let service = RestService::new(ApiClient::new(&server.uri(), None).unwrap(), "/api/groups");
        let page = service.get_list(&ListQuery::default()).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.unwrap().total_records, 1);

        let updated = service.update("1", &json!({"name": "Gruppe A"})).await.unwrap();
        assert_eq!(updated["name"], "Gruppe A");
    }
}
