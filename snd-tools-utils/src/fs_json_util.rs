use std::{fmt::Debug, io::BufReader, path::PathBuf};

use anyhow::Context;
use fs_err::File;
use serde::de::DeserializeOwned;

/// Runs `parse` on the file at `path`, naming the file and the target type on failure.
fn parse_file<T, F>(path: PathBuf, parse: F) -> anyhow::Result<T>
where
    F: FnOnce(&PathBuf) -> anyhow::Result<T>,
{
    parse(&path).with_context(|| {
        format!(
            "While trying to parse {path:?} as {}",
            std::any::type_name::<T>()
        )
    })
}

pub fn read_json<P: Into<PathBuf> + Debug, T: DeserializeOwned>(path: P) -> anyhow::Result<T> {
    parse_file(path.into(), |path| {
        Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
    })
}

pub fn read_toml<P: Into<PathBuf> + Debug, T: DeserializeOwned>(path: P) -> anyhow::Result<T> {
    parse_file(path.into(), |path| {
        Ok(toml::from_str(&fs_err::read_to_string(path)?)?)
    })
}

/// Reads a TOML file if a path is given, and falls back to the default value otherwise.
pub fn read_toml_or_default<P, T>(path: Option<P>) -> anyhow::Result<T>
where
    P: Into<PathBuf> + Debug,
    T: DeserializeOwned + Default,
{
    match path {
        Some(path) => read_toml(path),
        None => Ok(T::default()),
    }
}
