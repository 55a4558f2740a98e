//! Hosted backend storage over a PostgREST-style table API

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::domain::storage::{Storage, StorageEntity, StorageKey, StoreQuery};
use crate::domain::DomainError;

/// Postgres error code for unique violations, surfaced by the table API
const UNIQUE_VIOLATION: &str = "23505";

/// Connection settings for the hosted backend
#[derive(Clone)]
pub struct HostedConfig {
    /// Project base URL, e.g. `https://project.example.co`
    pub url: String,
    /// Project API key, sent as `apikey` and bearer token
    pub api_key: String,
}

impl Debug for HostedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedConfig")
            .field("url", &self.url)
            .field("api_key", &"[hidden]")
            .finish()
    }
}

impl HostedConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Joins a path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Adds the project key headers to a request
    pub fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Error body returned by the table API
#[derive(Debug, Default, Deserialize)]
struct TableApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Storage backed by the hosted table API
///
/// Filters become `column=op.value` parameters, ordering `order=column.desc`,
/// pagination `offset`/`limit`. Writes ask for the affected rows back with
/// `Prefer: return=representation`.
pub struct HostedStorage<E>
where
    E: StorageEntity,
{
    client: Client,
    config: HostedConfig,
    _phantom: PhantomData<E>,
}

impl<E> Debug for HostedStorage<E>
where
    E: StorageEntity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedStorage")
            .field("table_name", &E::TABLE)
            .field("config", &self.config)
            .finish()
    }
}

impl<E> HostedStorage<E>
where
    E: StorageEntity,
{
    pub fn new(client: Client, config: HostedConfig) -> Self {
        Self {
            client,
            config,
            _phantom: PhantomData,
        }
    }

    fn table_url(&self) -> String {
        self.config.endpoint(&format!("rest/v1/{}", E::TABLE))
    }

    fn key_filter(key: &E::Key) -> [(String, String); 1] {
        [(E::KEY_COLUMN.to_string(), format!("eq.{}", key.as_str()))]
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        action: &str,
    ) -> Result<T, DomainError> {
        let response = self
            .config
            .authorize(builder)
            .send()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to {}: {}", action, e)))?;

        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                DomainError::storage(format!("Failed to decode {} response: {}", action, e))
            });
        }

        let body = response.text().await.unwrap_or_default();
        let error: TableApiError = serde_json::from_str(&body).unwrap_or_default();
        let message = error.message.unwrap_or(body);

        debug!(table = E::TABLE, status = %status, action, "Table API request failed");

        if status == StatusCode::CONFLICT || error.code.as_deref() == Some(UNIQUE_VIOLATION) {
            Err(DomainError::conflict(message))
        } else {
            Err(DomainError::storage(format!("Failed to {}: {}", action, message)))
        }
    }
}

/// Translates a query into table API parameters
fn query_params(query: &StoreQuery) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = query
        .filters()
        .iter()
        .map(|f| (f.column.clone(), format!("{}.{}", f.op.as_rest(), f.value)))
        .collect();

    if let Some(order) = query.order() {
        params.push((
            "order".to_string(),
            format!("{}.{}.nullslast", order.column, order.direction.as_rest()),
        ));
    }
    if let Some(offset) = query.offset() {
        params.push(("offset".to_string(), offset.to_string()));
    }
    if let Some(limit) = query.limit() {
        params.push(("limit".to_string(), limit.to_string()));
    }

    params
}

#[async_trait]
impl<E> Storage<E> for HostedStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let builder = self
            .client
            .get(self.table_url())
            .query(&[("select", "*")])
            .query(&Self::key_filter(key));

        let rows: Vec<E> = self.send(builder, "get entity").await?;
        Ok(rows.into_iter().next())
    }

    async fn select(&self, query: &StoreQuery) -> Result<Vec<E>, DomainError> {
        let builder = self
            .client
            .get(self.table_url())
            .query(&[("select", "*")])
            .query(&query_params(query));

        self.send(builder, "select entities").await
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let builder = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(&entity);

        let rows: Vec<E> = self.send(builder, "create entity").await?;
        Ok(rows.into_iter().next().unwrap_or(entity))
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let builder = self
            .client
            .patch(self.table_url())
            .query(&Self::key_filter(entity.key()))
            .header("Prefer", "return=representation")
            .json(&entity);

        let rows: Vec<E> = self.send(builder, "update entity").await?;

        rows.into_iter().next().ok_or_else(|| {
            DomainError::not_found(format!(
                "Entity with key '{}' not found",
                entity.key().as_str()
            ))
        })
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let builder = self
            .client
            .delete(self.table_url())
            .query(&Self::key_filter(key))
            .header("Prefer", "return=representation");

        let rows: Vec<serde_json::Value> = self.send(builder, "delete entity").await?;
        Ok(!rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::SortDirection;
    use crate::domain::{Category, CategoryId, User};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn storage<E: StorageEntity>(server: &MockServer) -> HostedStorage<E> {
        HostedStorage::new(Client::new(), HostedConfig::new(server.uri(), "anon-key"))
    }

    #[test]
    fn test_query_params() {
        let query = StoreQuery::new()
            .eq("user_id", "u-1")
            .gte("date", "2024-03-01")
            .lt("date", "2024-04-01")
            .order_by("date", SortDirection::Desc)
            .range(0, 100);

        let params = query_params(&query);

        assert_eq!(
            params,
            vec![
                ("user_id".to_string(), "eq.u-1".to_string()),
                ("date".to_string(), "gte.2024-03-01".to_string()),
                ("date".to_string(), "lt.2024-04-01".to_string()),
                ("order".to_string(), "date.desc.nullslast".to_string()),
                ("offset".to_string(), "0".to_string()),
                ("limit".to_string(), "100".to_string()),
            ]
        );
    }

    #[test]
    fn test_config_hides_api_key() {
        let config = HostedConfig::new("https://x.example.co/", "secret");

        assert_eq!(config.endpoint("/rest/v1/users"), "https://x.example.co/rest/v1/users");
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[tokio::test]
    async fn test_get_sends_key_filter_and_auth_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/categories"))
            .and(query_param("id", "eq.c-1"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "c-1", "name": "Food"}
            ])))
            .mount(&server)
            .await;

        let found = storage::<Category>(&server)
            .get(&CategoryId::new("c-1").unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.name(), "Food");
    }

    #[tokio::test]
    async fn test_create_returns_representation() {
        let server = MockServer::start().await;
        let category = Category::new("Travel").unwrap();

        Mock::given(method("POST"))
            .and(path("/rest/v1/categories"))
            .and(header("prefer", "return=representation"))
            .and(body_partial_json(json!({"name": "Travel"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([
                {"id": category.id().as_str(), "name": "Travel"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let created = storage::<Category>(&server).create(category.clone()).await.unwrap();
        assert_eq!(created, category);
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_conflict() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/users"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23505",
                "message": "duplicate key value violates unique constraint \"users_email_key\""
            })))
            .mount(&server)
            .await;

        let user = User::new("ann@example.com", "Ann").unwrap();
        let err = storage::<User>(&server).create(user).await.unwrap_err();

        assert!(err.is_conflict());
        assert!(err.message().contains("duplicate key"));
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = storage::<Category>(&server)
            .update(Category::new("Ghost").unwrap())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_select_and_delete() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/categories"))
            .and(query_param("order", "name.asc.nullslast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "c-1", "name": "Bills"},
                {"id": "c-2", "name": "Food"}
            ])))
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/categories"))
            .and(query_param("id", "eq.c-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "c-2", "name": "Food"}
            ])))
            .mount(&server)
            .await;

        let storage = storage::<Category>(&server);
        let query = StoreQuery::new().order_by("name", SortDirection::Asc);

        assert_eq!(storage.select(&query).await.unwrap().len(), 2);
        assert!(storage.delete(&CategoryId::new("c-2").unwrap()).await.unwrap());
    }

    #[tokio::test]
    async fn test_server_error_maps_to_storage_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = storage::<Category>(&server).list().await.unwrap_err();

        assert!(matches!(err, DomainError::Storage { .. }));
        assert!(err.message().contains("upstream down"));
    }
}
