//! Resolve the database image of the project checked out locally.

use std::path::Path;

use tracing::info;

use crate::error::Error;
use crate::registry::ImageReference;
use crate::repo::{GitRepository, RepositoryInfo};

/// Docker tag used for images built from the `master` branch.
const MASTER_TAG: &str = "latest";

/// Resolve the image of the repository containing `dir`.
#[inline]
pub fn resolve_in(
    dir: &Path,
    explicit_tag: Option<&str>,
    remote: &str,
) -> Result<ImageReference, Error> {
    let repo = GitRepository::discover(dir)?;
    resolve(&repo, explicit_tag, remote)
}

/// Resolve the image of `repo`, pulling its path from the fetch URL of
/// `remote`.
///
/// An explicit tag is used verbatim; otherwise the current branch names
/// the tag, with `master` mapped to `latest`.
pub fn resolve<R: RepositoryInfo>(
    repo: &R,
    explicit_tag: Option<&str>,
    remote: &str,
) -> Result<ImageReference, Error> {
    let tag = match explicit_tag.filter(|tag| !tag.is_empty()) {
        Some(tag) => tag.to_owned(),
        None => branch_tag(repo)?,
    };
    let url = repo.remote_fetch_url(remote)?;
    ImageReference::from_remote_url(&url, &tag)
}

fn branch_tag<R: RepositoryInfo>(repo: &R) -> Result<String, Error> {
    let branch = repo.current_branch()?;
    info!("Docker tag not specified. Using current branch name: {branch}");
    if branch == "master" {
        info!("Using Docker tag '{MASTER_TAG}' for branch 'master'.");
        return Ok(MASTER_TAG.to_owned());
    }
    Ok(branch)
}
