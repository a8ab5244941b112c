use std::path::PathBuf;

use clap::Parser;
use snd_tools::{
    generator::{self, GeneratorConfig, OnRecordError},
    source::SourceArgs,
};
use snd_tools_utils::fs_json_util::read_toml_or_default;

/// Writes one static redirect page per movie.
#[derive(Parser)]
struct Opts {
    /// TOML file with a `GeneratorConfig`; command line options take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    output_dir: Option<PathBuf>,
    #[arg(long, value_enum)]
    on_record_error: Option<OnRecordError>,
    #[command(flatten)]
    source: SourceArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();

    let mut config: GeneratorConfig = read_toml_or_default(opts.config)?;
    if let Some(output_dir) = opts.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(on_record_error) = opts.on_record_error {
        config.on_record_error = on_record_error;
    }
    opts.source.apply(&mut config.source);

    generator::run(&config).await?;
    Ok(())
}
