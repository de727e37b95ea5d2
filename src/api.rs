// API client module: a small blocking HTTP client for the two native
// Dataverse endpoints the uploader needs, dataset creation and file add.

use crate::config::Config;
use crate::error::ApiError;
use anyhow::{Context, Result};
use log::debug;
use reqwest::blocking::{multipart, Client};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::path::Path;

pub const API_KEY_HEADER: &str = "x-dataverse-key";

/// Blocking client bound to one installation and one API token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Identifiers the server hands back for a freshly created dataset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreatedDataset {
    pub id: u64,
    #[serde(rename = "persistentId")]
    pub persistent_id: String,
}

#[derive(Deserialize, Debug)]
struct CreateResponse {
    data: CreatedDataset,
}

impl ApiClient {
    /// Build a client from the run configuration. The token is sent on
    /// every request as the `X-Dataverse-key` header.
    pub fn new(config: &Config) -> Result<Self> {
        let mut token = HeaderValue::from_str(&config.api_token)
            .context("API token contains characters not allowed in a header")?;
        token.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, token);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Create a dataset in the dataverse `alias`. Only HTTP 201 counts as
    /// success; the body is then expected to carry `data.id` and
    /// `data.persistentId`.
    pub fn create_dataset(&self, alias: &str, payload: &Value) -> Result<CreatedDataset, ApiError> {
        let url = format!("{}/api/dataverses/{}/datasets", self.base_url, alias);
        debug!("POST {}", url);
        let res = self.client.post(&url).json(payload).send()?;

        let status = res.status();
        let txt = res.text().unwrap_or_default();
        if status != StatusCode::CREATED {
            return Err(ApiError::Rejected { status, body: txt });
        }
        let parsed: CreateResponse =
            serde_json::from_str(&txt).map_err(|e| ApiError::Decode(format!("{e}: {txt}")))?;
        Ok(parsed.data)
    }

    /// Attach an archive to an existing dataset as `multipart/form-data`.
    /// Both 200 and 201 are accepted.
    pub fn upload_file(&self, persistent_id: &str, file_path: &Path) -> Result<(), ApiError> {
        let url = format!("{}/api/datasets/:persistentId/add", self.base_url);
        debug!("POST {}?persistentId={}", url, persistent_id);

        let file_err = |source: std::io::Error| ApiError::File {
            path: file_path.to_path_buf(),
            source,
        };
        let file = File::open(file_path).map_err(file_err)?;
        let len = file.metadata().map_err(file_err)?.len();
        let file_name = file_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("data.zip");

        let part = multipart::Part::reader_with_length(file, len)
            .file_name(file_name.to_string())
            .mime_str("application/zip")?;
        let form = multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(&url)
            .query(&[("persistentId", persistent_id)])
            .multipart(form)
            .send()?;

        let status = res.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let txt = res.text().unwrap_or_default();
            return Err(ApiError::Rejected { status, body: txt });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        let config = Config {
            api_token: "secret-token".into(),
            base_url: server.url(),
            dataverse: "root".into(),
            datasets_folder: std::env::temp_dir(),
            delay: Duration::ZERO,
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_create_dataset_returns_identifiers() {
        let mut server = mockito::Server::new();
        let payload = json!({ "datasetVersion": { "license": "CC0" } });
        let mock = server
            .mock("POST", "/api/dataverses/root/datasets")
            .match_header("x-dataverse-key", "secret-token")
            .match_body(Matcher::Json(payload.clone()))
            .with_status(201)
            .with_body(r#"{"status":"OK","data":{"id":17,"persistentId":"doi:10.5072/FK2/ABC"}}"#)
            .create();

        let created = client_for(&server).create_dataset("root", &payload).unwrap();
        mock.assert();
        assert_eq!(
            created,
            CreatedDataset {
                id: 17,
                persistent_id: "doi:10.5072/FK2/ABC".into()
            }
        );
    }

    #[test]
    fn test_create_dataset_rejected() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/dataverses/root/datasets")
            .with_status(400)
            .with_body(r#"{"status":"ERROR","message":"bad metadata"}"#)
            .create();

        let err = client_for(&server)
            .create_dataset("root", &json!({}))
            .unwrap_err();
        mock.assert();
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(err.to_string().contains("bad metadata"));
    }

    #[test]
    fn test_create_dataset_200_is_not_success() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/api/dataverses/root/datasets")
            .with_status(200)
            .with_body(r#"{"data":{"id":1,"persistentId":"doi:x"}}"#)
            .create();

        let err = client_for(&server)
            .create_dataset("root", &json!({}))
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { .. }));
    }

    #[test]
    fn test_create_dataset_bad_body() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/api/dataverses/root/datasets")
            .with_status(201)
            .with_body("created")
            .create();

        let err = client_for(&server)
            .create_dataset("root", &json!({}))
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_upload_file() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/datasets/:persistentId/add")
            .match_query(Matcher::UrlEncoded(
                "persistentId".into(),
                "doi:10.5072/FK2/ABC".into(),
            ))
            .match_header("x-dataverse-key", "secret-token")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data".into()),
            )
            .match_body(Matcher::Regex("data1.zip".into()))
            .with_status(200)
            .with_body(r#"{"status":"OK"}"#)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let zip = dir.path().join("data1.zip");
        std::fs::write(&zip, b"PK\x03\x04archive").unwrap();

        client_for(&server)
            .upload_file("doi:10.5072/FK2/ABC", &zip)
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_upload_file_rejected() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/api/datasets/:persistentId/add")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("forbidden")
            .create();

        let dir = tempfile::tempdir().unwrap();
        let zip = dir.path().join("data.zip");
        std::fs::write(&zip, b"zip").unwrap();

        let err = client_for(&server).upload_file("doi:x", &zip).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    }

    #[test]
    fn test_upload_missing_file_makes_no_request() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let err = client_for(&server)
            .upload_file("doi:x", &dir.path().join("gone.zip"))
            .unwrap_err();
        assert!(matches!(err, ApiError::File { .. }));
        mock.assert();
    }
}
