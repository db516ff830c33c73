//! HTTP object store client.

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::ObjectStore;
use super::config::StoreConfig;
use super::error::StorageError;
use super::types::ListEntry;
use super::urls::StorageUrls;

/// Page size requested from the listing endpoint.
pub const LIST_LIMIT: u32 = 1000;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: u32,
    offset: u32,
    sort_by: SortBy,
}

#[derive(Debug, Serialize)]
struct SortBy {
    column: &'static str,
    order: &'static str,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    id: Option<Option<Value>>,
}

impl RawEntry {
    fn into_entry(self) -> Option<ListEntry> {
        let name = self.name?;
        if name.trim().is_empty() {
            return None;
        }
        let is_folder = matches!(self.id, Some(None)) || name.ends_with('/');
        Some(ListEntry {
            name: name.trim_end_matches('/').to_string(),
            is_folder,
        })
    }
}

/// Object store client speaking the backend's REST contract.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    http: Client,
    urls: StorageUrls,
}

impl HttpObjectStore {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the service key is not a valid header value or
    /// the HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, StorageError> {
        if config.base_url.trim().is_empty() {
            return Err(StorageError::configuration("storage base url is empty"));
        }

        let mut headers = HeaderMap::new();
        let apikey = HeaderValue::from_str(&config.service_key)
            .map_err(|e| StorageError::configuration(e.to_string()))?;
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.service_key))
            .map_err(|e| StorageError::configuration(e.to_string()))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StorageError::configuration(e.to_string()))?;

        Ok(Self {
            http,
            urls: StorageUrls::new(&config.base_url),
        })
    }

    async fn send(request: RequestBuilder) -> Result<Response, StorageError> {
        request.send().await.map_err(StorageError::from)
    }

    async fn status_error(response: Response) -> StorageError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("unknown").to_string()
        } else {
            body
        };
        StorageError::status(status.as_u16(), message)
    }

    async fn parse_listing(response: Response) -> Result<Vec<ListEntry>, StorageError> {
        let raw: Vec<RawEntry> = response
            .json()
            .await
            .map_err(|e| StorageError::invalid_response(e.to_string()))?;
        Ok(raw.into_iter().filter_map(RawEntry::into_entry).collect())
    }

    async fn list_legacy(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ListEntry>, StorageError> {
        let request = self
            .http
            .get(self.urls.legacy_list_url(bucket))
            .query(&[("prefix", prefix)]);
        let response = Self::send(request).await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Self::parse_listing(response).await
    }
}

impl ObjectStore for HttpObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let request = self
            .http
            .put(self.urls.build_write_url(bucket, key))
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        let response = Self::send(request).await?;
        if response.status().is_success() {
            tracing::debug!(bucket, key, "object stored");
            Ok(())
        } else {
            Err(Self::status_error(response).await)
        }
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Bytes>, StorageError> {
        let response = Self::send(self.http.get(self.urls.object_url(bucket, key))).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.bytes().await?)),
            _ => Err(Self::status_error(response).await),
        }
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        let response = Self::send(self.http.delete(self.urls.object_url(bucket, key))).await?;
        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::debug!(bucket, key, "delete of missing object treated as success");
                Ok(())
            }
            status if status.is_success() => Ok(()),
            _ => Err(Self::status_error(response).await),
        }
    }

    async fn list_by_prefix(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ListEntry>, StorageError> {
        let body = ListRequest {
            prefix,
            limit: LIST_LIMIT,
            offset: 0,
            sort_by: SortBy {
                column: "name",
                order: "asc",
            },
        };
        let response = Self::send(self.http.post(self.urls.list_url(bucket)).json(&body)).await?;

        if response.status().is_success() {
            return Self::parse_listing(response).await;
        }

        tracing::debug!(
            bucket,
            prefix,
            status = response.status().as_u16(),
            "listing POST rejected, falling back to legacy GET"
        );
        self.list_legacy(bucket, prefix).await
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        self.urls.public_url(bucket, key)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
