//! Read-only access to the local git repository.

use std::ffi::OsStr;
use std::path::Path;

use git2::{ErrorCode, Repository, RepositoryOpenFlags};
use tracing::trace;

use crate::error::Error;

/// The git metadata needed to name a database image.
pub trait RepositoryInfo {
    /// Name of the branch currently checked out.
    fn current_branch(&self) -> Result<String, Error>;

    /// Fetch URL of the remote called `name`.
    fn remote_fetch_url(&self, name: &str) -> Result<String, Error>;
}

/// A [`RepositoryInfo`] backed by [`git2`].
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Find the repository containing `dir`, searching parent
    /// directories up to the filesystem root.
    #[inline]
    pub fn discover(dir: &Path) -> Result<Self, Error> {
        Self::discover_with_ceilings(dir, &[] as &[&OsStr])
    }

    /// Like [`GitRepository::discover`], but never searches above any
    /// of the `ceilings` directories.
    fn discover_with_ceilings<I, T>(dir: &Path, ceilings: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<OsStr>,
    {
        let repo = Repository::open_ext(dir, RepositoryOpenFlags::empty(), ceilings).map_err(
            |source| Error::RepositoryNotFound {
                path: dir.to_owned(),
                source,
            },
        )?;
        trace!("Found git repository at {}", repo.path().display());
        Ok(Self { repo })
    }
}

impl RepositoryInfo for GitRepository {
    fn current_branch(&self) -> Result<String, Error> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => head
                .shorthand()
                .map(str::to_owned)
                .ok_or(Error::NoBranch { source: None }),
            Ok(_) => Err(Error::NoBranch { source: None }),
            // a fresh repository has no commits yet, but HEAD still
            // names the branch the first commit will land on
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self
                    .repo
                    .find_reference("HEAD")
                    .map_err(|source| Error::NoBranch {
                        source: Some(source),
                    })?;
                head.symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(str::to_owned)
                    .ok_or(Error::NoBranch { source: None })
            }
            Err(source) => Err(Error::NoBranch {
                source: Some(source),
            }),
        }
    }

    fn remote_fetch_url(&self, name: &str) -> Result<String, Error> {
        let remote = self
            .repo
            .find_remote(name)
            .map_err(|source| Error::RemoteNotFound {
                name: name.to_owned(),
                source,
            })?;
        let url = match remote.url() {
            Some(url) => url.to_owned(),
            None => {
                return Err(Error::UnparseableUrl {
                    url: String::from_utf8_lossy(remote.url_bytes()).into_owned(),
                })
            }
        };
        trace!("Remote {name} fetches from {url}");
        Ok(url)
    }
}
