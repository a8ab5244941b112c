//! Repairs text whose UTF-8 bytes were once read as a single-byte code page.

use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
};

use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

pub mod backup;
pub mod lock;
pub mod reinterpret;
pub mod table;
pub mod tables;

use backup::{ensure_backup, BackupPolicy};
use lock::RepairLock;
use reinterpret::{CodePage, ReinterpretReport, Reinterpretation};
use table::{ReplacementTable, Substitution};
use tables::BuiltinTable;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RepairStep {
    BuiltinTable { table: BuiltinTable },
    /// A TOML file with a `[table]` section.
    TableFile { path: PathBuf },
    Reinterpret(Reinterpretation),
}

#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RepairConfig {
    /// Applied in order.
    #[builder(default = default_steps())]
    pub steps: Vec<RepairStep>,
    #[builder(default = ".backup".to_owned())]
    pub backup_suffix: String,
    #[builder(default)]
    pub backup_policy: BackupPolicy,
}
impl Default for RepairConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_steps() -> Vec<RepairStep> {
    vec![
        RepairStep::Reinterpret(Reinterpretation::default()),
        RepairStep::BuiltinTable {
            table: BuiltinTable::Punctuation,
        },
    ]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepReport {
    Table {
        name: String,
        substitutions: Vec<Substitution>,
    },
    Reinterpret {
        source: CodePage,
        target: CodePage,
        report: ReinterpretReport,
    },
}

impl StepReport {
    pub fn fixed(&self) -> usize {
        match self {
            Self::Table { substitutions, .. } => substitutions.iter().map(|s| s.count).sum(),
            Self::Reinterpret { report, .. } => report.changed,
        }
    }
}

impl Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table {
                name,
                substitutions,
            } => {
                write!(f, "{name}: {} occurrences fixed", self.fixed())?;
                for s in substitutions.iter().filter(|s| s.count > 0) {
                    write!(f, "\n  {:?} -> {:?}: {}", s.garbled, s.correct, s.count)?;
                }
                Ok(())
            }
            Self::Reinterpret {
                source,
                target,
                report,
            } => write!(
                f,
                "{source} -> {target}: {} of {} suspicious lines fixed",
                report.changed, report.candidates
            ),
        }
    }
}

enum LoadedStep<'a> {
    Table(String, ReplacementTable),
    Reinterpret(&'a Reinterpretation),
}

fn load_steps(steps: &[RepairStep]) -> anyhow::Result<Vec<LoadedStep<'_>>> {
    steps
        .iter()
        .map(|step| {
            Ok(match step {
                RepairStep::BuiltinTable { table } => {
                    LoadedStep::Table(table.to_string(), table.table())
                }
                RepairStep::TableFile { path } => LoadedStep::Table(
                    path.display().to_string(),
                    ReplacementTable::load(path)?,
                ),
                RepairStep::Reinterpret(reinterpretation) => {
                    LoadedStep::Reinterpret(reinterpretation)
                }
            })
        })
        .collect()
}

/// Runs every step over `text`.  Table files are read before any step runs.
pub fn repair_text(
    text: &str,
    steps: &[RepairStep],
) -> anyhow::Result<(String, Vec<StepReport>)> {
    let mut text = text.to_owned();
    let mut reports = vec![];
    for step in load_steps(steps)? {
        let report = match step {
            LoadedStep::Table(name, table) => {
                let (fixed, substitutions) = table.apply(&text);
                text = fixed;
                StepReport::Table {
                    name,
                    substitutions,
                }
            }
            LoadedStep::Reinterpret(reinterpretation) => {
                let (fixed, report) = reinterpretation.apply(&text);
                text = fixed;
                StepReport::Reinterpret {
                    source: reinterpretation.source,
                    target: reinterpretation.target,
                    report,
                }
            }
        };
        reports.push(report);
    }
    Ok((text, reports))
}

#[derive(Debug)]
pub struct RepairReport {
    pub steps: Vec<StepReport>,
    pub changed: bool,
    pub backup: Option<PathBuf>,
}

/// Repairs the file at `path` in place.
///
/// Nothing is written when the repair changes nothing or `dry_run` is set.  Otherwise the
/// old content is backed up according to the policy before the file is overwritten.
pub fn repair_file(
    path: &Path,
    config: &RepairConfig,
    dry_run: bool,
) -> anyhow::Result<RepairReport> {
    let _lock = if dry_run {
        None
    } else {
        Some(RepairLock::acquire(path)?)
    };

    let original =
        fs_err::read_to_string(path).with_context(|| format!("While reading {path:?} as UTF-8"))?;
    info!("Read {} characters from {path:?}", original.chars().count());
    let (repaired, steps) = repair_text(&original, &config.steps)?;

    let mut report = RepairReport {
        steps,
        changed: repaired != original,
        backup: None,
    };
    if !report.changed {
        info!("Nothing to fix in {path:?}");
        return Ok(report);
    }
    if dry_run {
        info!("Dry run; {path:?} is left as is");
        return Ok(report);
    }

    report.backup = ensure_backup(
        path,
        &original,
        &config.backup_suffix,
        config.backup_policy,
    )?;
    fs_err::write(path, repaired)?;
    info!("Wrote the repaired text to {path:?}");
    Ok(report)
}
