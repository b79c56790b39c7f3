use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `click <Name> "<path>"`: the name holds no whitespace or quotes, the path
/// anything but a double quote.
static CLICK_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"click ([^\s"]+)\s+"([^"]+)""#).expect("valid click pattern"));

const QUOTES: &[char] = &['"', '\''];

/// Where click-event paths should point.
#[derive(Debug, Clone, Copy)]
pub struct RepoLinks<'a> {
    pub host: &'a str,
    pub owner: &'a str,
    pub repo: &'a str,
    pub branch: &'a str,
}

impl RepoLinks<'_> {
    /// Absolute URL for a repository-relative path. Paths whose last segment
    /// has an extension are files (`blob`), everything else a directory (`tree`).
    pub fn url_for(&self, raw_path: &str) -> String {
        let path = clean_path(raw_path);
        let kind = if is_file(path) { "blob" } else { "tree" };
        format!(
            "https://{}/{}/{}/{}/{}/{}",
            self.host, self.owner, self.repo, kind, self.branch, path
        )
    }
}

fn clean_path(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix(QUOTES).unwrap_or(trimmed);
    trimmed.strip_suffix(QUOTES).unwrap_or(trimmed)
}

fn is_file(path: &str) -> bool {
    path.rsplit('/').next().is_some_and(|last| last.contains('.'))
}

/// Replace the path argument of every click directive with an absolute
/// repository URL. Everything else in the diagram is left as-is.
pub fn rewrite_click_events(diagram: &str, links: &RepoLinks<'_>) -> String {
    CLICK_DIRECTIVE
        .replace_all(diagram, |caps: &Captures<'_>| {
            format!("click {} \"{}\"", &caps[1], links.url_for(&caps[2]))
        })
        .into_owned()
}
