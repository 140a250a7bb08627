//! `reqwest` implementation of [`InventoryApi`]
//!
//! Talks to the Django REST endpoints (`bodegas/`, `subbodegas/`). List
//! endpoints may answer with a bare array or a paginated envelope; `next` links
//! are followed until exhausted.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use shared::{
    ListResponse, NewSubLocation, NodeRef, RawStockRecord, RenameSubLocation, SubLocation,
    SubLocationId, Warehouse, WarehouseId,
};
use validator::Validate;

use super::{InventoryApi, SubLocationQuery};
use crate::auth::TokenSource;
use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};

/// Longest server message carried into an error
const MAX_SERVER_MESSAGE_LEN: usize = 300;

/// Inventory API client
#[derive(Clone)]
pub struct HttpInventoryApi {
    client: Client,
    base_url: String,
    token: Arc<dyn TokenSource>,
}

impl HttpInventoryApi {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig, token: Arc<dyn TokenSource>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Self::with_client(client, &config.base_url, token)
    }

    /// Create a client with default settings against `base_url` (for testing)
    pub fn with_base_url(base_url: &str, token: Arc<dyn TokenSource>) -> ClientResult<Self> {
        Self::with_client(Client::new(), base_url, token)
    }

    fn with_client(client: Client, base_url: &str, token: Arc<dyn TokenSource>) -> ClientResult<Self> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the token, send, check the status and decode the body
    async fn send<T: DeserializeOwned>(&self, resource: &str, builder: RequestBuilder) -> ClientResult<T> {
        let builder = match self.token.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let request = builder.build()?;
        tracing::debug!(method = %request.method(), url = %request.url(), "Calling inventory API");

        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, resource, "Inventory API returned an error");
            return Err(status_error(status, resource, &body));
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            resource: resource.to_string(),
            message: e.to_string(),
        })
    }

    /// Collect every page of a list endpoint
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        resource: &str,
        first: RequestBuilder,
    ) -> ClientResult<Vec<T>> {
        let mut visited: HashSet<String> = first
            .try_clone()
            .and_then(|b| b.build().ok())
            .map(|r| r.url().to_string())
            .into_iter()
            .collect();
        let (mut items, mut next) = self
            .send::<ListResponse<T>>(resource, first)
            .await?
            .into_parts();

        while let Some(url) = next {
            if !visited.insert(url.clone()) {
                tracing::warn!(resource, %url, "Pagination link repeats; stopping");
                break;
            }
            let (page, following) = self
                .send::<ListResponse<T>>(resource, self.client.get(&url))
                .await?
                .into_parts();
            items.extend(page);
            next = following;
        }

        Ok(items)
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryApi {
    async fn list_warehouses(&self, include_inactive: bool) -> ClientResult<Vec<Warehouse>> {
        let mut request = self.client.get(self.url("bodegas/"));
        if include_inactive {
            request = request.query(&[("incluir_inactivas", "true")]);
        }
        self.fetch_all("warehouses", request).await
    }

    async fn warehouse(&self, id: WarehouseId) -> ClientResult<Warehouse> {
        let request = self.client.get(self.url(&format!("bodegas/{}/", id)));
        self.send(&format!("warehouse {}", id), request).await
    }

    async fn list_sub_locations(&self, query: &SubLocationQuery) -> ClientResult<Vec<SubLocation>> {
        let mut params = vec![("bodega", query.warehouse_id.to_string())];
        match query.level {
            Some(NodeRef::Root) => params.push(("parent", "null".to_string())),
            Some(NodeRef::Node(id)) => params.push(("parent", id.to_string())),
            None => {}
        }
        if query.include_inactive {
            params.push(("incluir_inactivas", "true".to_string()));
        }

        let request = self.client.get(self.url("subbodegas/")).query(&params);
        self.fetch_all("sub-locations", request).await
    }

    async fn warehouse_stock(
        &self,
        warehouse_id: WarehouseId,
        scope: NodeRef,
    ) -> ClientResult<Vec<RawStockRecord>> {
        let mut request = self
            .client
            .get(self.url(&format!("bodegas/{}/stock_actual/", warehouse_id)));
        if let NodeRef::Node(id) = scope {
            request = request.query(&[("subbodega", id.to_string())]);
        }
        self.fetch_all("stock", request).await
    }

    async fn create_sub_location(&self, body: &NewSubLocation) -> ClientResult<SubLocation> {
        body.validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;

        let request = self.client.post(self.url("subbodegas/")).json(body);
        self.send("sub-location", request).await
    }

    async fn rename_sub_location(
        &self,
        id: SubLocationId,
        body: &RenameSubLocation,
    ) -> ClientResult<SubLocation> {
        body.validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;

        let request = self
            .client
            .patch(self.url(&format!("subbodegas/{}/", id)))
            .json(body);
        self.send(&format!("sub-location {}", id), request).await
    }

    async fn toggle_sub_location(&self, id: SubLocationId) -> ClientResult<SubLocation> {
        let request = self
            .client
            .post(self.url(&format!("subbodegas/{}/toggle_activo/", id)));
        self.send(&format!("sub-location {}", id), request).await
    }
}

/// Validate the configured root and make sure relative paths append to it
fn normalize_base_url(base_url: &str) -> ClientResult<String> {
    let trimmed = base_url.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| ClientError::Configuration(format!("Invalid API base URL {:?}: {}", trimmed, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Configuration(format!(
            "API base URL must use http or https, got {:?}",
            trimmed
        )));
    }

    Ok(format!("{}/", trimmed.trim_end_matches('/')))
}

fn status_error(status: StatusCode, resource: &str, body: &str) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::NOT_FOUND => ClientError::NotFound(resource.to_string()),
        s if s.is_client_error() => ClientError::Rejected {
            status: s.as_u16(),
            message: server_message(s, body),
        },
        s => ClientError::Server {
            status: s.as_u16(),
            message: server_message(s, body),
        },
    }
}

/// Human-readable message from a DRF error body.
///
/// Understands `{"detail": "..."}` and field errors such as
/// `{"nombre": ["ya existe"]}`; anything else is passed through, truncated.
fn server_message(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = fields.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }

        let messages: Vec<String> = fields
            .iter()
            .filter_map(|(field, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Array(items) => items
                        .iter()
                        .filter_map(|i| i.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    _ => return None,
                };
                Some(format!("{}: {}", field, text))
            })
            .collect();
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    let body = body.trim();
    if body.is_empty() {
        return status.canonical_reason().unwrap_or("unknown error").to_string();
    }
    body.chars().take(MAX_SERVER_MESSAGE_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:8000/api").unwrap(),
            "http://localhost:8000/api/"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8000/api//").unwrap(),
            "http://localhost:8000/api/"
        );
    }

    #[test]
    fn test_invalid_base_url_is_configuration_error() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(ClientError::Configuration(_))
        ));
        assert!(matches!(
            normalize_base_url("ftp://example.com/"),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "stock", ""),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "warehouse 3", ""),
            ClientError::NotFound(r) if r == "warehouse 3"
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "sub-location", "{}"),
            ClientError::Rejected { status: 400, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "stock", ""),
            ClientError::Server { status: 502, .. }
        ));
    }

    #[test]
    fn test_server_message_reads_drf_bodies() {
        assert_eq!(
            server_message(StatusCode::FORBIDDEN, r#"{"detail": "Sin permiso"}"#),
            "Sin permiso"
        );
        assert_eq!(
            server_message(StatusCode::BAD_REQUEST, r#"{"nombre": ["Ya existe una subbodega con este nombre."]}"#),
            "nombre: Ya existe una subbodega con este nombre."
        );
        assert_eq!(server_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
        assert_eq!(server_message(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
    }

    #[test]
    fn test_long_plain_body_is_truncated() {
        let body = "x".repeat(1000);
        assert_eq!(
            server_message(StatusCode::INTERNAL_SERVER_ERROR, &body).len(),
            MAX_SERVER_MESSAGE_LEN
        );
    }
}
