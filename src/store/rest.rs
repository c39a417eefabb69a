//! RestRecordStore - record store su HTTP in stile PostgREST

use super::{Filters, Query, RecordStore, StoreError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

pub struct RestRecordStore {
    http: Client,
    base_url: String,
    service_key: String,
}

impl RestRecordStore {
    pub fn new(http: Client, base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn rows(response: Response) -> Result<Vec<Value>, StoreError> {
        let response = check_status(response).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Traduce i filtri nella sintassi `campo=eq.valore` / `campo=is.null`
pub(crate) fn filter_params(filters: &Filters) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|(field, value)| {
            let condition = match value {
                Value::Null => "is.null".to_string(),
                Value::String(s) => format!("eq.{}", s),
                other => format!("eq.{}", other),
            };
            (field.clone(), condition)
        })
        .collect()
}

pub(crate) fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    params.extend(filter_params(&query.filters));
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{}", order.field, direction)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    if let Some(offset) = query.offset {
        params.push(("offset".to_string(), offset.to_string()));
    }
    params
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Record store returned {}: {}", status, body);
    Err(match status {
        StatusCode::NOT_FOUND => StoreError::NotFound,
        StatusCode::CONFLICT => StoreError::Conflict(body),
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => {
            StoreError::Unavailable(body)
        }
        _ => StoreError::Rejected {
            status: status.as_u16(),
            body,
        },
    })
}

#[async_trait]
impl RecordStore for RestRecordStore {
    #[instrument(skip(self, query), fields(table = %table))]
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        debug!("Selecting records");
        let response = self
            .authorized(self.http.get(self.table_url(table)))
            .query(&query_params(query))
            .send()
            .await?;
        Self::rows(response).await
    }

    #[instrument(skip(self), fields(table = %table, id = %id))]
    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let rows = self.select(table, &Query::new().eq("id", id).limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self, record), fields(table = %table))]
    async fn insert(&self, table: &str, record: Value) -> Result<Value, StoreError> {
        debug!("Inserting record");
        let response = self
            .authorized(self.http.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Rejected {
                status: 200,
                body: "insert returned no representation".to_string(),
            })
    }

    #[instrument(skip(self, patch), fields(table = %table, id = %id))]
    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<Value, StoreError> {
        debug!("Updating record");
        let response = self
            .authorized(self.http.patch(self.table_url(table)))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self, filters, patch), fields(table = %table))]
    async fn update_matching(
        &self,
        table: &str,
        filters: &Filters,
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        debug!("Conditionally updating records");
        let response = self
            .authorized(self.http.patch(self.table_url(table)))
            .query(&filter_params(filters))
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;
        Self::rows(response).await
    }

    #[instrument(skip(self, filters), fields(table = %table))]
    async fn delete(&self, table: &str, filters: &Filters) -> Result<u64, StoreError> {
        debug!("Deleting records");
        let response = self
            .authorized(self.http.delete(self.table_url(table)))
            .query(&filter_params(filters))
            .header("Prefer", "return=representation")
            .send()
            .await?;
        Ok(Self::rows(response).await?.len() as u64)
    }
}
