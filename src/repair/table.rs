use std::{fmt::Debug, path::PathBuf};

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use snd_tools_utils::fs_json_util::read_toml;

/// An ordered garbled -> correct mapping.
///
/// Entries are applied one after another, so an entry whose key is a prefix of other keys
/// must come after them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplacementTable(IndexMap<String, String>);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Substitution {
    pub garbled: String,
    pub correct: String,
    pub count: usize,
}

#[derive(Deserialize)]
struct TableFile {
    table: ReplacementTable,
}

impl ReplacementTable {
    /// Reads the `[table]` section of a TOML file.
    pub fn load<P: Into<PathBuf> + Debug>(path: P) -> anyhow::Result<Self> {
        Ok(read_toml::<_, TableFile>(path)?.table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replaces every occurrence of every key, in table order, and counts what was replaced.
    pub fn apply(&self, text: &str) -> (String, Vec<Substitution>) {
        let mut text = text.to_owned();
        let substitutions = self
            .0
            .iter()
            .map(|(garbled, correct)| {
                // An empty pattern would match between every character.
                let count = if garbled.is_empty() {
                    0
                } else {
                    text.matches(garbled.as_str()).count()
                };
                if count > 0 {
                    text = text.replace(garbled.as_str(), correct);
                }
                Substitution {
                    garbled: garbled.clone(),
                    correct: correct.clone(),
                    count,
                }
            })
            .collect_vec();
        (text, substitutions)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReplacementTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
