use gitdiagram_core::filter::filter_tree;
use gitdiagram_core::{RepoDataError, RepoDataSource, RepositorySnapshot};

pub const FALLBACK_BRANCH: &str = "main";

/// Gather the default branch, the filtered file tree and the README.
/// The first failing call aborts the whole fetch.
pub async fn fetch_snapshot(
    source: &dyn RepoDataSource,
    owner: &str,
    repo: &str,
) -> Result<RepositorySnapshot, RepoDataError> {
    let metadata = source.repository(owner, repo).await?;
    let default_branch = metadata
        .default_branch
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| FALLBACK_BRANCH.to_string());

    let paths = source.tree(owner, repo, &default_branch).await?;
    let file_tree = filter_tree(&paths);
    tracing::debug!(
        owner,
        repo,
        branch = %default_branch,
        total = paths.len(),
        kept = file_tree.lines().count(),
        "fetched file tree"
    );

    let readme = source.readme(owner, repo).await?;

    Ok(RepositorySnapshot {
        file_tree,
        readme,
        default_branch,
    })
}
