use serde_json::{json, Value};

use crate::movie::MovieRecord;

fn record<const N: usize>(fields: [(&str, Value); N]) -> MovieRecord {
    fields
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

/// Two movies used when no real source is configured.
pub fn sample_movies() -> Vec<MovieRecord> {
    vec![
        record([
            ("id", json!("9-jumboq")),
            ("slug", json!("9-jumboq")),
            ("title", json!("9 Jumboq")),
            ("year", json!("2024")),
            ("originalTitle", json!("9 Jumboq")),
            ("description", json!("Hayotiy drama haqida")),
            ("genre", json!("Drama")),
            ("poster", json!("https://example.com/poster.jpg")),
            ("rating", json!("7.5/10")),
            ("sndVotes", json!(100)),
        ]),
        record([
            ("id", json!("jin-tilak-tila")),
            ("slug", json!("jin-tilak-tila")),
            ("title", json!("Jin, Tilak tila!")),
            ("year", json!("2024")),
            ("originalTitle", json!("Jin, Tilak tila!")),
            ("description", json!("Fantastik komediya")),
            ("genre", json!("Fantasy, Comedy")),
            ("poster", json!("https://example.com/jin.jpg")),
            ("rating", json!("8.0/10")),
            ("sndVotes", json!(150)),
        ]),
    ]
}
