use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{anyhow, bail, Context};
use log::{debug, info, warn};
use serde::{de::IgnoredAny, Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use snd_tools_utils::credentials::{CredentialsLoadError, FirestoreCredentials};
use typed_builder::TypedBuilder;
use url::Url;

use crate::movie::MovieRecord;

pub const FIRESTORE_API_URL: &str = "https://firestore.googleapis.com/v1/";

#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FirestoreConfig {
    #[builder(default = PathBuf::from("serviceAccountKey.json"))]
    pub credentials_path: PathBuf,
    #[builder(default = "movies".to_owned())]
    pub collection: String,
    #[builder(default = 300)]
    pub page_size: u32,
    /// Overridable so that the emulator can be used.
    #[builder(default = Url::parse(FIRESTORE_API_URL).unwrap())]
    pub api_url: Url,
}
impl Default for FirestoreConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

pub struct FirestoreClient {
    client: reqwest::Client,
    credentials: FirestoreCredentials,
    api_url: Url,
}

impl FirestoreClient {
    pub fn new(credentials: FirestoreCredentials, api_url: Url) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, credentials, api_url))
    }

    pub fn with_client(
        client: reqwest::Client,
        credentials: FirestoreCredentials,
        api_url: Url,
    ) -> Self {
        Self {
            client,
            credentials,
            api_url,
        }
    }

    /// Loads the credential file named in `config`.
    ///
    /// A missing file is reported with instructions on how to obtain one.
    pub fn from_config(config: &FirestoreConfig) -> anyhow::Result<Self> {
        let path = &config.credentials_path;
        let credentials = match FirestoreCredentials::load(path) {
            Ok(credentials) => credentials,
            Err(CredentialsLoadError::NotFound) => bail!(
                "{path:?} not found!  \
                Download a service account key from Firebase Console \
                (Project Settings > Service Accounts > Generate New Private Key) \
                or write a JSON file with `project_id` and `api_key`, \
                and save it as {path:?}."
            ),
            Err(e) => {
                return Err(e).with_context(|| format!("While loading credentials from {path:?}"))
            }
        };
        info!("Loaded credentials for project {}.", credentials.project_id);
        if !credentials.has_auth() {
            warn!(
                "{path:?} has neither `api_key` nor `access_token`; \
                requests are sent unauthenticated and only succeed if the security rules allow it."
            );
        }
        Self::new(credentials, config.api_url.clone())
    }

    /// `<api_url>/projects/<p>/databases/(default)/documents/<collection>`, whether or not
    /// `api_url` ends with a slash.
    fn documents_url(&self, collection: &str) -> anyhow::Result<Url> {
        let project = self.credentials.project_id.to_string();
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("{} cannot be used as the API URL", self.api_url))?
            .pop_if_empty()
            .extend([
                "projects",
                project.as_str(),
                "databases",
                "(default)",
                "documents",
                collection,
            ]);
        Ok(url)
    }

    /// Fetches every document of `collection`, following page tokens until the last page.
    pub async fn list_documents(
        &self,
        collection: &str,
        page_size: u32,
    ) -> anyhow::Result<Vec<MovieRecord>> {
        let url = self.documents_url(collection)?;
        let mut records = vec![];
        let mut page_token = None::<String>;
        loop {
            let mut request = self
                .client
                .get(url.clone())
                .query(&[("pageSize", page_size.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            if let Some(key) = &self.credentials.api_key {
                request = request.query(&[("key", AsRef::<str>::as_ref(key))]);
            }
            if let Some(token) = &self.credentials.access_token {
                request = request.bearer_auth(AsRef::<str>::as_ref(token));
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                bail!("Failed to list {collection:?}: server returned {status:?}: {body}");
            }
            let page: ListDocumentsResponse = response.json().await?;
            debug!("Fetched {} documents", page.documents.len());
            records.extend(page.documents.into_iter().map(Document::into_record));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Document {
    /// `projects/<p>/databases/(default)/documents/<collection>/<id>`
    name: String,
    #[serde(default)]
    fields: BTreeMap<String, FirestoreValue>,
}

impl Document {
    /// Flattens typed values into plain JSON.  The document id fills in `id` when the
    /// document has no such field of its own.
    fn into_record(self) -> MovieRecord {
        let mut record: MovieRecord = self
            .fields
            .into_iter()
            .map(|(key, value)| (key, value.into_json()))
            .collect();
        if !record.contains("id") {
            if let Some(id) = self.name.rsplit('/').next().filter(|id| !id.is_empty()) {
                record.insert("id", id);
            }
        }
        record
    }
}

/// A value in the Firestore REST representation, such as `{"integerValue": "100"}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum FirestoreValue {
    NullValue(IgnoredAny),
    BooleanValue(bool),
    /// int64 is transmitted as a decimal string.
    IntegerValue(String),
    /// Either a number or one of `"NaN"`, `"Infinity"`, `"-Infinity"`.
    DoubleValue(Value),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayContents),
    MapValue(MapContents),
}

#[derive(Debug, Deserialize)]
struct GeoPoint {
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ArrayContents {
    #[serde(default)]
    values: Vec<FirestoreValue>,
}

#[derive(Debug, Deserialize)]
struct MapContents {
    #[serde(default)]
    fields: BTreeMap<String, FirestoreValue>,
}

impl FirestoreValue {
    fn into_json(self) -> Value {
        match self {
            Self::NullValue(_) => Value::Null,
            Self::BooleanValue(b) => Value::Bool(b),
            Self::IntegerValue(s) => match s.parse::<i64>() {
                Ok(i) => Value::Number(i.into()),
                Err(_) => Value::String(s),
            },
            Self::DoubleValue(v) => v,
            Self::TimestampValue(s)
            | Self::StringValue(s)
            | Self::BytesValue(s)
            | Self::ReferenceValue(s) => Value::String(s),
            Self::GeoPointValue(point) => {
                let mut map = Map::new();
                for (key, value) in [("latitude", point.latitude), ("longitude", point.longitude)] {
                    if let Some(number) = Number::from_f64(value) {
                        map.insert(key.to_owned(), Value::Number(number));
                    }
                }
                Value::Object(map)
            }
            Self::ArrayValue(array) => array.values.into_iter().map(Self::into_json).collect(),
            Self::MapValue(map) => Value::Object(
                map.fields
                    .into_iter()
                    .map(|(key, value)| (key, value.into_json()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use snd_tools_utils::credentials::FirestoreCredentials;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };
    use url::Url;

    use super::{FirestoreClient, FirestoreConfig, ListDocumentsResponse, FIRESTORE_API_URL};

    fn credentials() -> FirestoreCredentials {
        FirestoreCredentials::builder()
            .project_id("p".to_owned().into())
            .api_key(Some("k".to_owned().into()))
            .build()
    }

    /// Answers one request per canned response, then returns the request lines it saw.
    async fn serve(responses: Vec<(u16, Value)>) -> (Url, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = Url::parse(&format!("http://{}/v1", listener.local_addr().unwrap())).unwrap();
        let handle = tokio::spawn(async move {
            let mut request_lines = vec![];
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut request = vec![];
                let mut buf = [0; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let request = String::from_utf8_lossy(&request);
                request_lines.push(request.lines().next().unwrap_or_default().to_owned());

                let body = body.to_string();
                let response = format!(
                    "HTTP/1.1 {status} Canned\r\n\
                    Content-Type: application/json\r\n\
                    Content-Length: {}\r\n\
                    Connection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            request_lines
        });
        (url, handle)
    }

    fn local_client(api_url: Url) -> FirestoreClient {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        FirestoreClient::with_client(client, credentials(), api_url)
    }

    fn document(id: &str) -> Value {
        json!({
            "name": format!("projects/p/databases/(default)/documents/movies/{id}"),
            "fields": { "title": { "stringValue": id } }
        })
    }

    #[tokio::test]
    async fn test_list_follows_page_tokens() {
        let (url, server) = serve(vec![
            (200, json!({ "documents": [document("a"), document("b")], "nextPageToken": "page-2" })),
            (200, json!({ "documents": [document("c")] })),
        ])
        .await;
        let records = local_client(url).list_documents("movies", 2).await.unwrap();
        let ids: Vec<_> = records.iter().map(|record| record.resolve().id().clone()).collect();
        assert_eq!(ids, ["a", "b", "c"]);

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);
        for request in &requests {
            assert!(
                request.starts_with("GET /v1/projects/p/databases/(default)/documents/movies?"),
                "{request}"
            );
            assert!(request.contains("pageSize=2"), "{request}");
            assert!(request.contains("key=k"), "{request}");
        }
        assert!(!requests[0].contains("pageToken"));
        assert!(requests[1].contains("pageToken=page-2"));
    }

    #[tokio::test]
    async fn test_list_fails_on_error_status() {
        let (url, server) = serve(vec![
            (200, json!({ "documents": [document("a")], "nextPageToken": "page-2" })),
            (403, json!({ "error": { "code": 403, "status": "PERMISSION_DENIED" } })),
        ])
        .await;
        let error = local_client(url).list_documents("movies", 300).await.unwrap_err();
        let message = format!("{error:#}");
        assert!(message.contains("403"), "{message}");
        assert!(message.contains("PERMISSION_DENIED"), "{message}");
        assert_eq!(server.await.unwrap().len(), 2);
    }

    #[test]
    fn test_documents_url_keeps_base_path() {
        for base in ["http://localhost:8080/v1", "http://localhost:8080/v1/"] {
            let client = FirestoreClient::new(credentials(), Url::parse(base).unwrap()).unwrap();
            assert_eq!(
                client.documents_url("movies").unwrap().as_str(),
                "http://localhost:8080/v1/projects/p/databases/(default)/documents/movies",
                "{base}"
            );
        }
        let client =
            FirestoreClient::new(credentials(), Url::parse("http://localhost:8080").unwrap())
                .unwrap();
        assert_eq!(
            client.documents_url("movies").unwrap().as_str(),
            "http://localhost:8080/projects/p/databases/(default)/documents/movies"
        );
    }

    #[test]
    fn test_service_account_key_without_auth_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("serviceAccountKey.json");
        fs_err::write(&path, r#"{"type":"service_account","project_id":"p"}"#).unwrap();
        let config = FirestoreConfig::builder().credentials_path(path).build();
        let client = FirestoreClient::from_config(&config).unwrap();
        assert!(!client.credentials.has_auth());
    }

    #[test]
    fn test_documents_url() {
        let credentials = FirestoreCredentials::builder()
            .project_id("soundora-music".to_owned().into())
            .build();
        let client =
            FirestoreClient::new(credentials, Url::parse(FIRESTORE_API_URL).unwrap()).unwrap();
        assert_eq!(
            client.documents_url("movies").unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/soundora-music/databases/(default)/documents/movies"
        );
    }

    #[test]
    fn test_missing_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let config = FirestoreConfig::builder()
            .credentials_path(dir.path().join("serviceAccountKey.json"))
            .build();
        let error = FirestoreClient::from_config(&config).err().unwrap();
        assert!(format!("{error}").contains("not found"));
    }

    #[test]
    fn test_parse_page() {
        let page: ListDocumentsResponse = serde_json::from_value(json!({
            "documents": [
                {
                    "name": "projects/p/databases/(default)/documents/movies/9-jumboq",
                    "fields": {
                        "title": { "stringValue": "9 Jumboq" },
                        "year": { "integerValue": "2024" },
                        "sndVotes": { "integerValue": "100" },
                        "score": { "doubleValue": 7.5 },
                        "broken": { "doubleValue": "NaN" },
                        "poster": { "nullValue": null },
                        "premium": { "booleanValue": false },
                        "tags": { "arrayValue": { "values": [{ "stringValue": "drama" }] } },
                        "empty": { "arrayValue": {} },
                        "meta": { "mapValue": { "fields": { "lang": { "stringValue": "uz" } } } },
                        "addedAt": { "timestampValue": "2024-01-02T03:04:05Z" }
                    },
                    "createTime": "2024-01-02T03:04:05.000000Z",
                    "updateTime": "2024-01-02T03:04:05.000000Z"
                },
                {
                    "name": "projects/p/databases/(default)/documents/movies/abc",
                    "fields": { "id": { "stringValue": "jin-tilak-tila" } }
                }
            ],
            "nextPageToken": "next"
        }))
        .unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("next"));

        let records = page
            .documents
            .into_iter()
            .map(|document| document.into_record())
            .collect::<Vec<_>>();
        assert_eq!(
            serde_json::to_value(&records[0]).unwrap(),
            json!({
                "id": "9-jumboq",
                "title": "9 Jumboq",
                "year": 2024,
                "sndVotes": 100,
                "score": 7.5,
                "broken": "NaN",
                "poster": null,
                "premium": false,
                "tags": ["drama"],
                "empty": [],
                "meta": { "lang": "uz" },
                "addedAt": "2024-01-02T03:04:05Z"
            })
        );
        let movie = records[0].resolve();
        assert_eq!(movie.year(), "2024");
        assert_eq!(movie.votes(), "100");
        assert_eq!(movie.poster(), "");
        // An `id` field wins over the document id.
        assert_eq!(records[1].resolve().id(), "jin-tilak-tila");
    }

    #[test]
    fn test_parse_empty_collection() {
        let page: ListDocumentsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
