use std::path::PathBuf;

use clap::Parser;
use snd_tools::repair::{backup::BackupPolicy, repair_file, RepairConfig};
use snd_tools_utils::fs_json_util::read_toml_or_default;

/// Repairs Cyrillic text that was decoded with the wrong code page.
#[derive(Parser)]
struct Opts {
    #[arg(default_value = "app/src/main/assets/index.html")]
    target: PathBuf,
    /// TOML file with a `RepairConfig`; defaults to reinterpretation plus the punctuation table
    #[arg(long)]
    config: Option<PathBuf>,
    /// Report what would be fixed without touching any file
    #[arg(long)]
    dry_run: bool,
    #[arg(long)]
    backup_suffix: Option<String>,
    #[arg(long, value_enum)]
    backup_policy: Option<BackupPolicy>,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();

    let mut config: RepairConfig = read_toml_or_default(opts.config)?;
    if let Some(backup_suffix) = opts.backup_suffix {
        config.backup_suffix = backup_suffix;
    }
    if let Some(backup_policy) = opts.backup_policy {
        config.backup_policy = backup_policy;
    }

    println!("Repairing {}...", opts.target.display());
    let report = repair_file(&opts.target, &config, opts.dry_run)?;
    for step in &report.steps {
        println!("{step}");
    }
    let total: usize = report.steps.iter().map(|step| step.fixed()).sum();
    match (report.changed, opts.dry_run) {
        (false, _) => println!("\n✓ No encoding errors found"),
        (true, true) => println!("\n{total} fixes found; dry run, nothing written"),
        (true, false) => {
            if let Some(backup) = &report.backup {
                println!("Backup saved to {}", backup.display());
            }
            println!("\n✓ {total} fixes written to {}", opts.target.display());
        }
    }
    Ok(())
}
