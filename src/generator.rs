use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::{error, info};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    movie::MovieRecord,
    page::{write_page, PageSettings},
    source::SourceConfig,
};

/// What to do when one movie page cannot be written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OnRecordError {
    /// Stop at the first failure.  Pages written so far stay on disk.
    #[default]
    Abort,
    /// Log the failure and continue with the next movie.
    Skip,
}

#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneratorConfig {
    #[builder(default = PathBuf::from("app/src/main/assets"))]
    pub output_dir: PathBuf,
    #[builder(default)]
    pub source: SourceConfig,
    #[builder(default)]
    pub page: PageSettings,
    #[builder(default)]
    pub on_record_error: OnRecordError,
}
impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Default)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub failed: usize,
}

/// Writes one page per record into `output_dir`, which must already exist.
pub fn generate_pages(
    records: impl IntoIterator<Item = MovieRecord>,
    settings: &PageSettings,
    output_dir: &Path,
    on_record_error: OnRecordError,
) -> anyhow::Result<GenerationReport> {
    let mut report = GenerationReport::default();
    for record in records {
        match write_page(&record, settings, output_dir) {
            Ok(path) => report.written.push(path),
            Err(e) => match on_record_error {
                OnRecordError::Abort => return Err(e),
                OnRecordError::Skip => {
                    error!("Skipping a movie: {e:#}");
                    report.failed += 1;
                }
            },
        }
    }
    Ok(report)
}

/// Loads the configured source and writes every page.
///
/// The output directory is created only after the records have been loaded, so a missing
/// credential file leaves the file system untouched.
pub async fn run(config: &GeneratorConfig) -> anyhow::Result<GenerationReport> {
    let records = config.source.load().await?;
    fs_err::create_dir_all(&config.output_dir)?;
    info!("Generating movie HTML pages in {:?}...", config.output_dir);
    let report = generate_pages(
        records,
        &config.page,
        &config.output_dir,
        config.on_record_error,
    )?;
    println!(
        "\n✓ Done! Generated {} movie HTML pages in {}",
        report.written.len(),
        config.output_dir.display()
    );
    if report.failed > 0 {
        println!("✗ {} movies could not be written", report.failed);
    }
    Ok(report)
}
