//! Errors raised while resolving and pulling the database image.

use std::path::PathBuf;

/// Every way a `db-refresh` invocation can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The working directory is not inside a git repository.
    #[error("No git repository found at or above {}", .path.display())]
    RepositoryNotFound {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },
    /// No tag was given and the current branch could not be determined.
    #[error("Could not determine the current branch, specify a Docker tag with --docker-tag")]
    NoBranch {
        #[source]
        source: Option<git2::Error>,
    },
    /// The requested git remote is not configured.
    #[error("Git remote {name:?} not found")]
    RemoteNotFound {
        name: String,
        #[source]
        source: git2::Error,
    },
    /// The remote URL is not of the form `user@host:path.git`.
    #[error("Invalid --git-remote: the remote URL {url:?} couldn't be parsed")]
    UnparseableUrl { url: String },
    /// The remote host has no known Docker registry.
    #[error("Invalid --git-remote: the remote host {host:?} isn't supported")]
    UnsupportedHost { host: String },
    /// The external command exited with a non-zero code.
    #[error("Command returned exit code '{code}'\n{}", .output.join("\n"))]
    CommandFailed { code: i32, output: Vec<String> },
}

impl Error {
    /// Process exit code to report for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::CommandFailed { code, .. } => u8::try_from(*code)
                .ok()
                .filter(|&code| code != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_propagates_exit_code() {
        let err = Error::CommandFailed {
            code: 125,
            output: vec![],
        };
        assert_eq!(err.exit_code(), 125);
    }

    #[test]
    fn test_out_of_range_exit_code_falls_back_to_one() {
        for code in [-1, 256, 1000] {
            let err = Error::CommandFailed {
                code,
                output: vec![],
            };
            assert_eq!(err.exit_code(), 1, "code {code}");
        }
    }

    #[test]
    fn test_command_failed_message_includes_output() {
        let err = Error::CommandFailed {
            code: 1,
            output: vec!["error: not found".into(), "second line".into()],
        };
        assert_eq!(
            err.to_string(),
            "Command returned exit code '1'\nerror: not found\nsecond line"
        );
    }

    #[test]
    fn test_url_errors_name_the_option() {
        let err = Error::UnsupportedHost {
            host: "github.com".into(),
        };
        assert!(err.to_string().contains("--git-remote"));
        let err = Error::UnparseableUrl {
            url: "https://github.com/a/b".into(),
        };
        assert!(err.to_string().contains("--git-remote"));
    }
}
