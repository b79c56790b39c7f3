/// Text between the first `<tag>` and the last `</tag>`, trimmed.
///
/// Models don't always honor the requested delimiters, so a response without
/// them is returned verbatim instead of failing the stage.
pub fn extract_tagged(raw: &str, tag: &str) -> String {
    match tagged_section(raw, tag) {
        Some(section) => section.trim().to_string(),
        None => raw.to_string(),
    }
}

fn tagged_section<'a>(raw: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = raw.find(&open)? + open.len();
    let end = raw.rfind(&close)?;
    if end < start {
        return None;
    }
    Some(&raw[start..end])
}

/// Drop every code-fence marker, wherever it appears, and trim the result.
pub fn strip_fences(raw: &str) -> String {
    raw.replace("```mermaid", "").replace("```", "").trim().to_string()
}
