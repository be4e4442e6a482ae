//! HTTP transport over reqwest

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::core::error::{
    ConfigError, NotFoundError, TransportError, ValidationError, VistaError,
};
use crate::core::filter::Filter;
use crate::core::page::{PageMeta, Paged};
use crate::core::resource::Resource;
use crate::core::stats::ResourceStats;
use crate::transport::Transport;

/// REST adapter for a single resource collection
///
/// Every request carries `Accept: application/json` and `Content-Type:
/// application/json`; non-2xx responses surface as
/// [`TransportError`] with the status code, 404 on single-record paths as
/// [`NotFoundError`]. A configured timeout surfaces as a network-level
/// `TransportError`.
pub struct HttpTransport<T: Resource> {
    client: Client,
    collection_url: String,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> Clone for HttpTransport<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            collection_url: self.collection_url.clone(),
            _resource: PhantomData,
        }
    }
}

/// `{data, meta}` envelope returned by paginated endpoints
#[derive(Deserialize)]
struct Envelope<T> {
    data: Vec<T>,
    meta: PageMeta,
}

impl<T: Resource> HttpTransport<T> {
    /// Build a transport for `T` from the client configuration
    pub fn new(config: &ClientConfig) -> Result<Self, VistaError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ConfigError::InvalidBearerToken(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::ClientBuild(e.to_string()))?;

        let base = config.base_url.trim_end_matches('/');
        let path = config.path_for(T::resource_name());
        Ok(Self {
            client,
            collection_url: format!("{base}/{path}"),
            _resource: PhantomData,
        })
    }

    fn item_url(&self, id: &Uuid) -> String {
        format!("{}/{id}", self.collection_url)
    }

    async fn read_body<B: serde::de::DeserializeOwned>(response: Response) -> Result<B, VistaError> {
        response
            .json::<B>()
            .await
            .map_err(|e| TransportError::network(format!("invalid response body: {e}")).into())
    }

    /// Extract a failure from a non-2xx response, preferring the backend's
    /// `message` field when the body is JSON.
    async fn failure(response: Response) -> TransportError {
        let status = response.status().as_u16();
        let message = match response.json::<Value>().await {
            Ok(body) => body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("request failed with status {status}")),
            Err(_) => format!("request failed with status {status}"),
        };
        TransportError::status(status, message)
    }

    fn network(e: reqwest::Error) -> VistaError {
        TransportError::network(e.to_string()).into()
    }

    fn not_found(id: &Uuid) -> VistaError {
        NotFoundError::new(T::resource_name_singular(), *id).into()
    }

    fn payload_object(data: &Value, operation: &'static str) -> Result<(), VistaError> {
        if data.is_object() {
            Ok(())
        } else {
            Err(ValidationError::PayloadNotObject { operation }.into())
        }
    }

    fn decode_page(body: Value) -> Result<Paged<T>, VistaError> {
        // Endpoints that do not paginate return a bare array.
        if body.is_array() {
            let items: Vec<T> = serde_json::from_value(body)
                .map_err(|e| TransportError::network(format!("invalid response body: {e}")))?;
            return Ok(Paged::unpaged(items));
        }
        let envelope: Envelope<T> = serde_json::from_value(body)
            .map_err(|e| TransportError::network(format!("invalid response body: {e}")))?;
        Ok(Paged {
            items: envelope.data,
            meta: envelope.meta,
        })
    }
}

#[async_trait]
impl<T: Resource> Transport<T> for HttpTransport<T> {
    async fn list(&self, filter: &Filter) -> Result<Paged<T>, VistaError> {
        let query = filter.query_pairs()?;
        debug!(resource = T::resource_name(), page = filter.page(), "GET collection");
        let response = self
            .client
            .get(&self.collection_url)
            .query(&query)
            .send()
            .await
            .map_err(Self::network)?;
        if !response.status().is_success() {
            return Err(Self::failure(response).await.into());
        }
        let body: Value = Self::read_body(response).await?;
        Self::decode_page(body)
    }

    async fn get(&self, id: &Uuid) -> Result<T, VistaError> {
        let response = self
            .client
            .get(self.item_url(id))
            .send()
            .await
            .map_err(Self::network)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Self::not_found(id));
        }
        if !response.status().is_success() {
            return Err(Self::failure(response).await.into());
        }
        Self::read_body(response).await
    }

    async fn create(&self, data: &Value) -> Result<T, VistaError> {
        Self::payload_object(data, "create")?;
        let response = self
            .client
            .post(&self.collection_url)
            .json(data)
            .send()
            .await
            .map_err(Self::network)?;
        if !response.status().is_success() {
            return Err(Self::failure(response).await.into());
        }
        Self::read_body(response).await
    }

    async fn update(&self, id: &Uuid, patch: &Value) -> Result<T, VistaError> {
        Self::payload_object(patch, "update")?;
        let response = self
            .client
            .put(self.item_url(id))
            .json(patch)
            .send()
            .await
            .map_err(Self::network)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Self::not_found(id));
        }
        if !response.status().is_success() {
            return Err(Self::failure(response).await.into());
        }
        Self::read_body(response).await
    }

    async fn delete(&self, id: &Uuid) -> Result<(), VistaError> {
        let response = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(Self::network)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Self::not_found(id));
        }
        if !response.status().is_success() {
            return Err(Self::failure(response).await.into());
        }
        Ok(())
    }

    async fn stats(&self, filter: &Filter) -> Result<Option<ResourceStats>, VistaError> {
        let query = filter.query_pairs()?;
        let response = self
            .client
            .get(format!("{}/stats", self.collection_url))
            .query(&query)
            .send()
            .await
            .map_err(Self::network)?;
        // A backend without aggregate support simply lacks the route.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::failure(response).await.into());
        }
        Ok(Some(Self::read_body(response).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
    struct TestRecord {
        id: Uuid,
        status: String,
    }

    impl Resource for TestRecord {
        fn resource_name() -> &'static str {
            "records"
        }

        fn resource_name_singular() -> &'static str {
            "record"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn status(&self) -> &str {
            &self.status
        }
    }

    #[test]
    fn test_decode_bare_array_synthesizes_meta() {
        let body = json!([
            {"id": Uuid::new_v4(), "status": "pending"},
            {"id": Uuid::new_v4(), "status": "completed"},
        ]);
        let paged = HttpTransport::<TestRecord>::decode_page(body).unwrap();
        assert_eq!(paged.items.len(), 2);
        assert_eq!(paged.meta, PageMeta::for_unpaged(2));
    }

    #[test]
    fn test_decode_envelope() {
        let body = json!({
            "data": [{"id": Uuid::new_v4(), "status": "pending"}],
            "meta": {"currentPage": 2, "totalPages": 3, "totalItems": 41, "itemsPerPage": 20},
        });
        let paged = HttpTransport::<TestRecord>::decode_page(body).unwrap();
        assert_eq!(paged.items.len(), 1);
        assert_eq!(paged.meta.current_page, 2);
        assert_eq!(paged.meta.total_items, 41);
    }

    #[test]
    fn test_decode_rejects_malformed_body() {
        let err = HttpTransport::<TestRecord>::decode_page(json!({"unexpected": true})).unwrap_err();
        assert!(matches!(err, VistaError::Transport(_)));
    }

    #[test]
    fn test_payload_must_be_object() {
        let err =
            HttpTransport::<TestRecord>::payload_object(&json!(["nope"]), "create").unwrap_err();
        assert!(matches!(
            err,
            VistaError::Validation(ValidationError::PayloadNotObject { operation: "create" })
        ));
    }

    #[test]
    fn test_collection_url_uses_path_override() {
        let mut config = ClientConfig::new("http://localhost:3000/");
        config
            .resource_paths
            .insert("records".to_string(), "legacy_records".to_string());
        let transport = HttpTransport::<TestRecord>::new(&config).unwrap();
        assert_eq!(
            transport.collection_url,
            "http://localhost:3000/legacy_records"
        );
    }
}
