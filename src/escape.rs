use serde_json::Value;

/// Escapes the five characters that are significant in HTML text and attribute values.
///
/// `&` goes first so that the entities introduced afterwards are not escaped twice.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Renders `text` as a JSON string literal that is safe to embed in a `<script>` element.
pub fn script_string(text: &str) -> String {
    Value::String(text.to_owned())
        .to_string()
        .replace("</", "<\\/")
}
