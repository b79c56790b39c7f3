/// Substrings (matched case-insensitively) marking paths that carry no
/// architectural signal: build output, dependencies, binaries, media, caches,
/// editor metadata and minified bundles.
pub const EXCLUDED_SUBSTRINGS: &[&str] = &[
    "node_modules/",
    "vendor/",
    "venv/",
    ".min.",
    ".pyc",
    ".pyo",
    ".pyd",
    ".so",
    ".dll",
    ".class",
    ".jpg",
    ".jpeg",
    ".png",
    ".gif",
    ".ico",
    ".svg",
    ".ttf",
    ".woff",
    ".webp",
    "__pycache__/",
    ".cache/",
    ".tmp/",
    "yarn.lock",
    "poetry.lock",
    "*.log",
    ".vscode/",
    ".idea/",
];

/// Decide whether a repository path is worth showing to the model.
pub fn should_include(path: &str) -> bool {
    let lower = path.to_lowercase();
    !EXCLUDED_SUBSTRINGS.iter().any(|p| lower.contains(p))
}

/// Keep relevant paths in their original order, one per line.
pub fn filter_tree<I, S>(paths: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let kept: Vec<S> = paths
        .into_iter()
        .filter(|p| should_include(p.as_ref()))
        .collect();
    let mut out = String::new();
    for (i, path) in kept.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(path.as_ref());
    }
    out
}
