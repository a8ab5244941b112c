use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use url::Url;

use crate::{
    escape::{escape_html, script_string},
    movie::{MovieRecord, ResolvedMovie},
};

pub const DEFAULT_SITE_URL: &str = "https://www.soundora-music.com/";

/// Site-wide values shared by every generated page.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PageSettings {
    /// Public origin of the site; canonical and Open Graph URLs are built from it.
    #[builder(default = default_site_url())]
    pub site_url: Url,
    /// Page of the web app that reads `#<slug>.html` and shows the movie.
    #[builder(default = "index.html".to_owned())]
    pub app_entry: String,
}
impl Default for PageSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_site_url() -> Url {
    Url::parse(DEFAULT_SITE_URL).unwrap()
}

impl PageSettings {
    pub fn page_url(&self, filename: &str) -> String {
        format!(
            "{}/{}",
            self.site_url.as_str().trim_end_matches('/'),
            filename
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPage {
    pub filename: String,
    pub html: String,
}

/// Renders the redirect page of a movie.
///
/// HTML contexts get [`escape_html`]; the structured data block and the redirect script get
/// JSON string literals, so a quote or `</script>` in a title cannot break out of them.
pub fn render_page(movie: &ResolvedMovie, settings: &PageSettings) -> anyhow::Result<RenderedPage> {
    let filename = movie.filename()?;
    let page_url = settings.page_url(&filename);

    let title = escape_html(movie.title());
    let year = escape_html(movie.year());
    let description = escape_html(movie.description());
    let original_title = escape_html(movie.original_title());
    let genre = escape_html(movie.genre());
    let poster = escape_html(movie.poster());
    let url = escape_html(&page_url);

    let ld_title = script_string(movie.title());
    let ld_original_title = script_string(movie.original_title());
    let ld_poster = script_string(movie.poster());
    let ld_description = script_string(movie.description());
    let ld_date = script_string(&format!("{}-01-01", movie.year()));
    let ld_genre = script_string(movie.genre());
    let ld_url = script_string(&page_url);
    let ld_rating = script_string(movie.rating());
    let ld_votes = script_string(movie.votes());

    let js_id = script_string(movie.id());
    let js_slug = script_string(movie.slug());
    let js_redirect = script_string(&format!("{}#", settings.app_entry));

    let html = format!(
        r##"<!DOCTYPE html>
<html lang="uz">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta http-equiv="X-UA-Compatible" content="ie=edge">
    
    <!-- SEO Meta Tags -->
    <title>{title} ({year}) - SND</title>
    <meta name="description" content="{description}">
    <meta name="keywords" content="{title}, {original_title}, {genre}, смотреть онлайн, SND, фильм, кино">
    
    <!-- Open Graph / Facebook -->
    <meta property="og:type" content="video.movie">
    <meta property="og:url" content="{url}">
    <meta property="og:title" content="{title} ({year}) - SND">
    <meta property="og:description" content="{description}">
    <meta property="og:image" content="{poster}">
    <meta property="og:site_name" content="SND - Streaming Network of Dreams">
    
    <!-- Twitter -->
    <meta name="twitter:card" content="summary_large_image">
    <meta name="twitter:url" content="{url}">
    <meta name="twitter:title" content="{title} ({year}) - SND">
    <meta name="twitter:description" content="{description}">
    <meta name="twitter:image" content="{poster}">
    
    <!-- Canonical URL -->
    <link rel="canonical" href="{url}">
    
    <!-- Favicon -->
    <link rel="icon" type="image/x-icon" href="favicon.ico">
    
    <!-- Tailwind CSS -->
    <script src="https://cdn.tailwindcss.com"></script>
    
    <!-- Font Awesome -->
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css">
    
    <!-- Structured Data -->
    <script type="application/ld+json">
    {{
        "@context": "https://schema.org",
        "@type": "Movie",
        "name": {ld_title},
        "alternateName": {ld_original_title},
        "image": {ld_poster},
        "description": {ld_description},
        "datePublished": {ld_date},
        "genre": {ld_genre},
        "url": {ld_url},
        "aggregateRating": {{
            "@type": "AggregateRating",
            "ratingValue": {ld_rating},
            "bestRating": "10",
            "ratingCount": {ld_votes}
        }}
    }}
    </script>
    
    <style>
        body {{
            background: #000;
            color: #fff;
            font-family: system-ui, -apple-system, sans-serif;
        }}
        .loading {{
            display: flex;
            align-items: center;
            justify-content: center;
            min-height: 100vh;
        }}
    </style>
</head>
<body>
    <div class="loading">
        <i class="fas fa-spinner fa-spin text-white text-4xl"></i>
    </div>
    
    <script>
        // Redirect to main app with movie details hash
        const movieId = {js_id};
        const movieSlug = {js_slug};
        
        // Redirect to index.html with hash
        window.location.href = {js_redirect} + movieSlug + '.html';
    </script>
</body>
</html>"##
    );

    Ok(RenderedPage { filename, html })
}

/// Renders `record` into `<output_dir>/<slug>.html`, replacing any existing file.
pub fn write_page(
    record: &MovieRecord,
    settings: &PageSettings,
    output_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let movie = record.resolve();
    debug!("Rendering {movie:?}");
    let page = render_page(&movie, settings)?;
    let path = output_dir.join(&page.filename);
    fs_err::write(&path, page.html)?;
    println!("✓ Created: {}", page.filename);
    Ok(path)
}
