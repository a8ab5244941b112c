use snd_tools_utils::regex;

/// Derives the URL token used as a page filename and as the hash route of the web app.
///
/// Characters other than word characters, whitespace and hyphens are dropped, and runs of
/// whitespace and hyphens become a single hyphen.  The result never starts or ends with a
/// hyphen.  Word characters are Unicode-aware, so Cyrillic titles keep their letters.
pub fn slugify(text: Option<&str>) -> String {
    let Some(text) = text.filter(|text| !text.is_empty()) else {
        return String::new();
    };
    let text = text.to_lowercase();
    let text = regex!(r"[^\w\s-]").replace_all(&text, "");
    let text = regex!(r"[-\s]+").replace_all(&text, "-");
    text.trim_matches('-').to_owned()
}
