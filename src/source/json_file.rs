use std::{fmt::Debug, path::PathBuf};

use serde::Deserialize;
use snd_tools_utils::fs_json_util::read_json;

use crate::movie::MovieRecord;

/// A local export of the `movies` collection.
#[derive(Deserialize)]
#[serde(untagged)]
enum MoviesFile {
    List(Vec<MovieRecord>),
    Wrapped { movies: Vec<MovieRecord> },
}

/// Reads either a top-level array of movies or an object with a `movies` array.
pub fn load_movies_json<P: Into<PathBuf> + Debug>(path: P) -> anyhow::Result<Vec<MovieRecord>> {
    Ok(match read_json(path)? {
        MoviesFile::List(movies) => movies,
        MoviesFile::Wrapped { movies } => movies,
    })
}
