use std::path::PathBuf;

use clap::ValueEnum;
use log::info;
use serde::{Deserialize, Serialize};

use crate::movie::MovieRecord;

pub mod firestore;
pub mod json_file;
pub mod sample;

use firestore::{FirestoreClient, FirestoreConfig};

/// Where movie records come from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceConfig {
    #[default]
    Sample,
    JsonFile {
        path: PathBuf,
    },
    Firestore(FirestoreConfig),
}

impl SourceConfig {
    /// Loads every record.  Any failure is fatal; nothing is written before this returns.
    pub async fn load(&self) -> anyhow::Result<Vec<MovieRecord>> {
        let records = match self {
            Self::Sample => sample::sample_movies(),
            Self::JsonFile { path } => {
                info!("Reading movies from {path:?}...");
                json_file::load_movies_json(path)?
            }
            Self::Firestore(config) => {
                let client = FirestoreClient::from_config(config)?;
                info!("Fetching movies from Firestore...");
                client
                    .list_documents(&config.collection, config.page_size)
                    .await?
            }
        };
        info!("Loaded {} movies.", records.len());
        Ok(records)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Sample,
    JsonFile,
    Firestore,
}

/// Command line overrides for [`SourceConfig`].
#[derive(Clone, Debug, Default, clap::Args)]
pub struct SourceArgs {
    /// Where to read movies from (defaults to the config file, then to the sample list)
    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,
    /// Local export used by `--source json-file`
    #[arg(long)]
    pub movies_json: Option<PathBuf>,
    /// Credential file used by `--source firestore`
    #[arg(long)]
    pub credentials_path: Option<PathBuf>,
    /// Collection read by `--source firestore`
    #[arg(long)]
    pub collection: Option<String>,
}

impl SourceArgs {
    /// Switches the source kind when requested, then applies path overrides to whichever
    /// source is in effect.
    pub fn apply(&self, config: &mut SourceConfig) {
        match self.source {
            Some(SourceKind::Sample) => *config = SourceConfig::Sample,
            Some(SourceKind::JsonFile) if !matches!(config, SourceConfig::JsonFile { .. }) => {
                *config = SourceConfig::JsonFile {
                    path: PathBuf::from("movies.json"),
                }
            }
            Some(SourceKind::Firestore) if !matches!(config, SourceConfig::Firestore(_)) => {
                *config = SourceConfig::Firestore(FirestoreConfig::default())
            }
            _ => {}
        }
        match config {
            SourceConfig::Sample => {}
            SourceConfig::JsonFile { path } => {
                if let Some(movies_json) = &self.movies_json {
                    path.clone_from(movies_json);
                }
            }
            SourceConfig::Firestore(firestore) => {
                if let Some(credentials_path) = &self.credentials_path {
                    firestore.credentials_path.clone_from(credentials_path);
                }
                if let Some(collection) = &self.collection {
                    firestore.collection.clone_from(collection);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{firestore::FirestoreConfig, SourceArgs, SourceConfig, SourceKind};

    #[test]
    fn test_config_from_toml() {
        let config: SourceConfig = toml::from_str(
            r#"
            kind = "firestore"
            credentials-path = "keys/sa.json"
            "#,
        )
        .unwrap();
        let SourceConfig::Firestore(firestore) = &config else {
            panic!("{config:?}");
        };
        assert_eq!(firestore.credentials_path, PathBuf::from("keys/sa.json"));
        assert_eq!(firestore.collection, "movies");

        let config: SourceConfig = toml::from_str(
            r#"
            kind = "json-file"
            path = "export.json"
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            SourceConfig::JsonFile {
                path: "export.json".into()
            }
        );
    }

    #[test]
    fn test_args_switch_source() {
        let mut config = SourceConfig::Sample;
        let args = SourceArgs {
            source: Some(SourceKind::Firestore),
            collection: Some("films".to_owned()),
            ..Default::default()
        };
        args.apply(&mut config);
        assert_eq!(
            config,
            SourceConfig::Firestore(
                FirestoreConfig::builder()
                    .collection("films".to_owned())
                    .build()
            )
        );
    }

    #[test]
    fn test_args_keep_configured_source() {
        let mut config = SourceConfig::JsonFile {
            path: "configured.json".into(),
        };
        let args = SourceArgs {
            source: Some(SourceKind::JsonFile),
            ..Default::default()
        };
        args.apply(&mut config);
        assert_eq!(
            config,
            SourceConfig::JsonFile {
                path: "configured.json".into()
            }
        );

        let args = SourceArgs {
            movies_json: Some("override.json".into()),
            ..Default::default()
        };
        args.apply(&mut config);
        assert_eq!(
            config,
            SourceConfig::JsonFile {
                path: "override.json".into()
            }
        );
    }

    #[tokio::test]
    async fn test_load_sample() {
        let records = SourceConfig::Sample.load().await.unwrap();
        assert_eq!(records.len(), 2);
    }
}
