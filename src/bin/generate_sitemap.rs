use std::path::PathBuf;

use clap::Parser;
use snd_tools::{
    sitemap::{self, SitemapConfig},
    source::SourceArgs,
};
use snd_tools_utils::fs_json_util::read_toml_or_default;
use url::Url;

/// Writes `sitemap.xml` for the generated movie pages.
#[derive(Parser)]
struct Opts {
    #[arg(long)]
    config: Option<PathBuf>,
    /// Printed to standard output if neither this nor the config file names a file
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    site_url: Option<Url>,
    #[command(flatten)]
    source: SourceArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let opts = Opts::parse();

    let mut config: SitemapConfig = read_toml_or_default(opts.config)?;
    if let Some(output) = opts.output {
        config.output = Some(output);
    }
    if let Some(site_url) = opts.site_url {
        config.page.site_url = site_url;
    }
    opts.source.apply(&mut config.source);

    sitemap::run(&config).await
}
