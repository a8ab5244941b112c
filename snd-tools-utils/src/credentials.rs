use std::{
    fmt::Debug,
    io::{self, BufReader},
    path::PathBuf,
};

use derive_more::{AsRef, Display, From};
use fs_err::File;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Credentials for reading a Firestore project over its REST API.
///
/// A service account key exported from the Firebase console also parses as this type;
/// only `project_id` is picked up from it, and unknown fields are ignored.
#[derive(Clone, TypedBuilder, Serialize, Deserialize)]
pub struct FirestoreCredentials {
    pub project_id: ProjectId,
    #[serde(default)]
    #[builder(default)]
    pub api_key: Option<ApiKey>,
    #[serde(default)]
    #[builder(default)]
    pub access_token: Option<AccessToken>,
}
impl Debug for FirestoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreCredentials")
            .field("project_id", &self.project_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Clone, Debug, From, AsRef, Display, Serialize, Deserialize)]
#[as_ref(forward)]
pub struct ProjectId(String);

#[derive(Clone, From, AsRef, Serialize, Deserialize)]
#[as_ref(forward)]
pub struct ApiKey(String);

#[derive(Clone, From, AsRef, Serialize, Deserialize)]
#[as_ref(forward)]
pub struct AccessToken(String);

impl FirestoreCredentials {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CredentialsLoadError> {
        Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
    }

    /// Whether requests made with these credentials carry a key or a token.
    pub fn has_auth(&self) -> bool {
        self.api_key.is_some() || self.access_token.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialsLoadError {
    #[error("Credential file was not found.")]
    NotFound,
    #[error("An I/O error occurred when loading the credential file: {0:?}")]
    IOError(io::Error),
    #[error("The credential file is corrupted and could not be loaded: {0:?}")]
    JsonError(#[from] serde_json::Error),
}
impl From<io::Error> for CredentialsLoadError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::IOError(e),
        }
    }
}
