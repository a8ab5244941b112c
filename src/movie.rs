use std::borrow::Cow;

use anyhow::bail;
use derive_more::From;
use getset::Getters;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use typed_builder::TypedBuilder;

use crate::slug::slugify;

/// A movie document as stored in the `movies` collection.
///
/// Documents are loosely shaped: any field may be missing, and scalar fields may come as
/// strings or numbers depending on who wrote them.  Nothing is validated on load;
/// defaults are applied by [`MovieRecord::resolve`].
#[derive(Clone, Debug, Default, PartialEq, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieRecord(Map<String, Value>);

impl MovieRecord {
    /// Returns the field as text.  `null` counts as absent, and non-string scalars are
    /// stringified the way they appear in JSON (`2024`, `7.5`, `true`).
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s)),
            value => Some(Cow::Owned(value.to_string())),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.text(key).is_some()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Applies the documented defaults to every field used by the page template.
    pub fn resolve(&self) -> ResolvedMovie {
        let text = |key| self.text(key).map(Cow::into_owned);

        let id = text("id").unwrap_or_default();
        let title = text("title").unwrap_or_else(|| "Movie".to_owned());
        let slug = text("slug")
            .filter(|slug| !slug.is_empty())
            .unwrap_or_else(|| slugify(Some(id.as_str())));
        let original_title = text("originalTitle").unwrap_or_else(|| title.clone());
        let description = text("description").unwrap_or_else(|| format!("Watch {title} online"));
        let rating = text("rating").unwrap_or_else(|| "0/10".to_owned());

        ResolvedMovie::builder()
            .slug(slug)
            .year(text("year").unwrap_or_default())
            .original_title(original_title)
            .description(description)
            .genre(text("genre").unwrap_or_default())
            .poster(text("poster").unwrap_or_default())
            .rating(numeric_rating(&rating).to_owned())
            .votes(text("sndVotes").unwrap_or_else(|| "0".to_owned()))
            .id(id)
            .title(title)
            .build()
    }
}

impl FromIterator<(String, Value)> for MovieRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// `"7.5/10"` becomes `"7.5"`; a rating without a scale is not trusted and becomes `"0"`.
pub fn numeric_rating(rating: &str) -> &str {
    match rating.split_once('/') {
        Some((value, _)) => value,
        None => "0",
    }
}

/// Template values of a movie after defaults are applied.  Nothing here is escaped yet.
#[derive(Clone, PartialEq, Eq, Debug, TypedBuilder, Getters)]
#[getset(get = "pub")]
pub struct ResolvedMovie {
    id: String,
    slug: String,
    title: String,
    year: String,
    original_title: String,
    description: String,
    genre: String,
    poster: String,
    /// The part of `rating` before the slash.
    rating: String,
    votes: String,
}

impl ResolvedMovie {
    /// `<slug>.html`, or an error if the slug cannot name a file in the output directory.
    pub fn filename(&self) -> anyhow::Result<String> {
        if self.slug.is_empty() {
            bail!(
                "Movie {:?} has neither a slug nor an id to derive one from",
                self.title
            );
        }
        if self.slug.contains(['/', '\\']) {
            bail!("Slug {:?} cannot be used as a file name", self.slug);
        }
        Ok(format!("{}.html", self.slug))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{numeric_rating, MovieRecord};

    fn record(value: Value) -> MovieRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_resolve_full_record() {
        let movie = record(json!({
            "id": "9-jumboq",
            "slug": "9-jumboq",
            "title": "9 Jumboq",
            "year": "2024",
            "rating": "7.5/10",
            "sndVotes": 100,
        }))
        .resolve();
        assert_eq!(movie.slug(), "9-jumboq");
        assert_eq!(movie.title(), "9 Jumboq");
        assert_eq!(movie.original_title(), "9 Jumboq");
        assert_eq!(movie.description(), "Watch 9 Jumboq online");
        assert_eq!(movie.rating(), "7.5");
        assert_eq!(movie.votes(), "100");
        assert_eq!(movie.filename().unwrap(), "9-jumboq.html");
    }

    #[test]
    fn test_resolve_empty_record() {
        let movie = MovieRecord::default().resolve();
        assert_eq!(movie.id(), "");
        assert_eq!(movie.slug(), "");
        assert_eq!(movie.title(), "Movie");
        assert_eq!(movie.year(), "");
        assert_eq!(movie.description(), "Watch Movie online");
        assert_eq!(movie.rating(), "0");
        assert_eq!(movie.votes(), "0");
    }

    #[test]
    fn test_slug_falls_back_to_id() {
        let movie = record(json!({ "id": "Jin, Tilak tila!", "slug": "" })).resolve();
        assert_eq!(movie.slug(), "jin-tilak-tila");
        let movie = record(json!({ "id": "Jin, Tilak tila!", "slug": null })).resolve();
        assert_eq!(movie.slug(), "jin-tilak-tila");
    }

    #[test]
    fn test_numbers_are_stringified() {
        let movie = record(json!({ "year": 2024, "sndVotes": 7, "rating": 8 })).resolve();
        assert_eq!(movie.year(), "2024");
        assert_eq!(movie.votes(), "7");
        // No scale, so the rating is not trusted.
        assert_eq!(movie.rating(), "0");
    }

    #[test]
    fn test_present_but_empty_original_title_is_kept() {
        let movie = record(json!({ "title": "A", "originalTitle": "" })).resolve();
        assert_eq!(movie.original_title(), "");
    }

    #[test]
    fn test_filename_needs_usable_slug() {
        assert!(MovieRecord::default().resolve().filename().is_err());
        for slug in ["../index", "a\\b"] {
            let movie = record(json!({ "slug": slug })).resolve();
            assert!(movie.filename().is_err(), "{slug}");
        }
        let movie = record(json!({ "slug": "Qora Quti" })).resolve();
        assert_eq!(movie.filename().unwrap(), "Qora Quti.html");
    }

    #[test]
    fn test_numeric_rating() {
        assert_eq!(numeric_rating("7.5/10"), "7.5");
        assert_eq!(numeric_rating("/10"), "");
        assert_eq!(numeric_rating("8"), "0");
        assert_eq!(numeric_rating("1/2/3"), "1");
    }
}
