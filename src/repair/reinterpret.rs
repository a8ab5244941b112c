use std::borrow::Cow;

use encoding_rs::{Encoding, KOI8_R, UTF_8, WINDOWS_1251, WINDOWS_1252};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Characters that windows-1251 assigns to the bytes 0x80 to 0xBF, except `Ё` and `ё`.
///
/// Every UTF-8 continuation byte lands in this range, so Cyrillic text misread as
/// windows-1251 is full of them, while correct Russian text rarely contains any.
pub const DEFAULT_MARKERS: &str = "ЂЃ‚ѓ„…†‡€‰Љ‹ЊЌЋЏђ‘’“”•–—\u{98}™љ›њќћџ\u{a0}ЎўЈ¤Ґ¦§©Є«¬\u{ad}®Ї°±Ііґµ¶·№є»јЅѕї";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum CodePage {
    /// ISO-8859-1: every byte is the character with the same number.
    #[serde(rename = "latin1")]
    #[strum(serialize = "latin1")]
    Latin1,
    #[serde(rename = "windows-1251")]
    #[strum(serialize = "windows-1251")]
    Windows1251,
    #[serde(rename = "windows-1252")]
    #[strum(serialize = "windows-1252")]
    Windows1252,
    #[serde(rename = "koi8-r")]
    #[strum(serialize = "koi8-r")]
    Koi8R,
    #[serde(rename = "utf-8")]
    #[strum(serialize = "utf-8")]
    Utf8,
}

impl CodePage {
    fn encoding(self) -> Option<&'static Encoding> {
        match self {
            Self::Latin1 => None,
            Self::Windows1251 => Some(WINDOWS_1251),
            Self::Windows1252 => Some(WINDOWS_1252),
            Self::Koi8R => Some(KOI8_R),
            Self::Utf8 => Some(UTF_8),
        }
    }

    /// Returns `None` if some character has no byte in this code page.
    pub fn encode(self, text: &str) -> Option<Cow<'_, [u8]>> {
        match self.encoding() {
            None => text
                .chars()
                .map(|c| u8::try_from(c).ok())
                .collect::<Option<Vec<u8>>>()
                .map(Cow::Owned),
            Some(encoding) => {
                let (bytes, _, had_unmappable) = encoding.encode(text);
                (!had_unmappable).then_some(bytes)
            }
        }
    }

    /// Returns `None` on malformed input.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self.encoding() {
            None => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Some(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Cow::into_owned),
        }
    }
}

/// Re-reads suspicious lines as if their characters were bytes in `source`, decoding those
/// bytes with `target`.
///
/// This is a heuristic: a correct line that happens to contain a marker is kept only because
/// its bytes are usually not valid in `target`.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Reinterpretation {
    #[builder(default = CodePage::Windows1251)]
    pub source: CodePage,
    #[builder(default = CodePage::Utf8)]
    pub target: CodePage,
    /// A line is touched only if it contains one of these characters.
    #[builder(default = DEFAULT_MARKERS.to_owned())]
    pub markers: String,
}
impl Default for Reinterpretation {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReinterpretReport {
    /// Lines containing a marker.
    pub candidates: usize,
    pub changed: usize,
}

impl Reinterpretation {
    fn is_candidate(&self, line: &str) -> bool {
        line.contains(|c: char| self.markers.contains(c))
    }

    pub fn reinterpret_line(&self, line: &str) -> Option<String> {
        self.target.decode(&self.source.encode(line)?)
    }

    /// Lines are split on `\n` only, so a `\r` stays part of its line.
    pub fn apply(&self, text: &str) -> (String, ReinterpretReport) {
        let mut report = ReinterpretReport::default();
        let lines = text
            .split('\n')
            .enumerate()
            .map(|(i, line)| {
                if !self.is_candidate(line) {
                    return Cow::Borrowed(line);
                }
                report.candidates += 1;
                match self.reinterpret_line(line) {
                    Some(fixed) if fixed != line => {
                        report.changed += 1;
                        Cow::Owned(fixed)
                    }
                    Some(_) => Cow::Borrowed(line),
                    None => {
                        debug!(
                            "Line {} is not {} read as {}; keeping it",
                            i + 1,
                            self.target,
                            self.source
                        );
                        Cow::Borrowed(line)
                    }
                }
            })
            .collect_vec();
        (lines.join("\n"), report)
    }
}
