//! RestFileStorage - storage di oggetti su HTTP (upload e URL firmati)

use super::{FileStorage, StorageError, UploadOptions};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, warn};

pub struct RestFileStorage {
    http: Client,
    base_url: String,
    service_key: String,
    bucket: String,
    signed_url_ttl_secs: u64,
}

#[derive(Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl RestFileStorage {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
        signed_url_ttl_secs: u64,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            bucket: bucket.into(),
            signed_url_ttl_secs,
        }
    }

    fn object_url(&self, kind: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}{}/{}",
            self.base_url,
            kind,
            self.bucket,
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl FileStorage for RestFileStorage {
    #[instrument(skip(self, bytes, options), fields(path = %path, size = bytes.len()))]
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<(), StorageError> {
        debug!("Uploading object");
        let response = self
            .http
            .post(self.object_url("", path))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("content-type", &options.content_type)
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        warn!("Upload rejected with {}: {}", status, body);
        if status == StatusCode::CONFLICT {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }
        Err(StorageError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn get_url(&self, path: &str) -> Result<Option<String>, StorageError> {
        let response = self
            .http
            .post(self.object_url("sign/", path))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&json!({ "expiresIn": self.signed_url_ttl_secs }))
            .send()
            .await?;

        match response.status() {
            // lo storage risponde 400 "Object not found" per path inesistenti
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                debug!("Object not found, no URL");
                Ok(None)
            }
            status if status.is_success() => {
                let body = response.text().await?;
                let signed: SignedUrlResponse = serde_json::from_str(&body)?;
                let url = if signed.signed_url.starts_with("http") {
                    signed.signed_url
                } else {
                    format!(
                        "{}/storage/v1/{}",
                        self.base_url,
                        signed.signed_url.trim_start_matches('/')
                    )
                };
                Ok(Some(url))
            }
            status => {
                warn!("Signing URL failed with {}", status);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn storage_for(server: &MockServer) -> RestFileStorage {
        RestFileStorage::new(Client::new(), server.uri(), "service-key", "assets", 60)
    }

    #[tokio::test]
    async fn upload_posts_bytes_with_upsert_header() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/storage/v1/object/assets/accounts/a1/logo.png"))
            .and(header("x-upsert", "true"))
            .and(header("content-type", "image/png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let options = UploadOptions {
            content_type: "image/png".to_string(),
            upsert: true,
        };
        storage_for(&server)
            .upload("accounts/a1/logo.png", vec![0x89, 0x50], &options)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn get_url_resolves_relative_signed_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/storage/v1/object/sign/assets/accounts/a1/logo.png"))
            .and(body_json(serde_json::json!({ "expiresIn": 60 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "signedURL": "/object/sign/assets/accounts/a1/logo.png?token=abc"
            })))
            .mount(&server)
            .await;

        let url = storage_for(&server)
            .get_url("accounts/a1/logo.png")
            .await
            .unwrap();
        assert_eq!(
            url,
            Some(format!(
                "{}/storage/v1/object/sign/assets/accounts/a1/logo.png?token=abc",
                server.uri()
            ))
        );
    }

    #[tokio::test]
    async fn get_url_for_missing_object_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/storage/v1/object/sign/assets/nope.png"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Object not found"))
            .mount(&server)
            .await;

        assert_eq!(storage_for(&server).get_url("nope.png").await.unwrap(), None);
    }
}
