use std::{fmt::Write, path::PathBuf};

use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{escape::escape_html, movie::MovieRecord, page::PageSettings, source::SourceConfig};

#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SitemapConfig {
    #[builder(default)]
    pub source: SourceConfig,
    #[builder(default)]
    pub page: PageSettings,
    /// Written to standard output when absent.
    #[builder(default)]
    pub output: Option<PathBuf>,
    #[builder(default = "weekly".to_owned())]
    pub changefreq: String,
    #[builder(default = "0.7".to_owned())]
    pub priority: String,
}
impl Default for SitemapConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Renders a sitemap pointing at the pages written by the page generator.
///
/// Movies without a usable slug have no page, so they are left out.
pub fn render_sitemap(records: &[MovieRecord], config: &SitemapConfig, lastmod: NaiveDate) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
        <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for record in records {
        let movie = record.resolve();
        // Only movies that get a page are listed.
        if let Err(e) = movie.filename() {
            warn!("Leaving a movie out of the sitemap: {e}");
            continue;
        }
        let filename = format!("{}.html", urlencoding::encode(movie.slug()));
        let loc = escape_html(&config.page.page_url(&filename));
        // Writing into a `String` cannot fail.
        let _ = write!(
            xml,
            "  <url>\n    \
            <loc>{loc}</loc>\n    \
            <lastmod>{}</lastmod>\n    \
            <changefreq>{}</changefreq>\n    \
            <priority>{}</priority>\n  \
            </url>\n",
            lastmod.format("%Y-%m-%d"),
            escape_html(&config.changefreq),
            escape_html(&config.priority),
        );
    }
    xml.push_str("</urlset>");
    xml
}

pub async fn run(config: &SitemapConfig) -> anyhow::Result<()> {
    let records = config.source.load().await?;
    let today = chrono::Local::now().date_naive();
    let xml = render_sitemap(&records, config, today);
    match &config.output {
        Some(path) => {
            fs_err::write(path, xml)?;
            info!("Wrote sitemap with {} movies to {path:?}.", records.len());
        }
        None => print!("{xml}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::{movie::MovieRecord, source::sample::sample_movies};

    use super::{render_sitemap, SitemapConfig};

    #[test]
    fn test_render_sitemap() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let xml = render_sitemap(&sample_movies(), &SitemapConfig::default(), date);
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://www.soundora-music.com/9-jumboq.html</loc>
    <lastmod>2025-03-01</lastmod>
    <changefreq>weekly</changefreq>
    <priority>0.7</priority>
  </url>
  <url>
    <loc>https://www.soundora-music.com/jin-tilak-tila.html</loc>
    <lastmod>2025-03-01</lastmod>
    <changefreq>weekly</changefreq>
    <priority>0.7</priority>
  </url>
</urlset>"#
        );
    }

    #[test]
    fn test_non_ascii_and_unusable_slugs() {
        let records: Vec<MovieRecord> = [
            json!({ "id": "Ёлки" }),
            json!({ "title": "Untitled" }),
            json!({ "slug": "a&b" }),
            json!({ "slug": "../index" }),
            json!({ "id": "x", "slug": "a\\b" }),
        ]
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap())
        .collect();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let xml = render_sitemap(&records, &SitemapConfig::default(), date);
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.contains("<loc>https://www.soundora-music.com/%D1%91%D0%BB%D0%BA%D0%B8.html</loc>"));
        assert!(xml.contains("<loc>https://www.soundora-music.com/a%26b.html</loc>"));
    }
}
