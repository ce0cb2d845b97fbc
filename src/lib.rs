pub mod browse;
pub mod browser;
pub mod cli;
pub mod git;
pub mod init;
pub mod mode;
pub mod remote;
pub mod resolver;
pub mod url;

use std::fmt;
use thiserror::Error;

/// A configured remote, selected by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSpec {
    pub name: String,
    pub raw_url: String,
}

/// Where a repository lives on its hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLocation {
    pub host: String,
    pub owner: String,
    pub repo: String,
}

/// The ref the user asked for, before it is classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    /// Whatever is checked out.
    Current,
    /// A ref expression given on the command line (`branch-1`, `HEAD~1`, a SHA).
    Explicit(String),
}

/// Classified checkout state. Every variant carries the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefState {
    Branch { name: String, sha: String },
    Tag { name: String, sha: String },
    Detached { sha: String },
}

impl RefState {
    /// Full commit SHA.
    pub fn sha(&self) -> &str {
        match self {
            RefState::Branch { sha, .. } | RefState::Tag { sha, .. } | RefState::Detached { sha } => {
                sha.as_str()
            }
        }
    }

    /// Branch or tag name, `None` when detached.
    pub fn name(&self) -> Option<&str> {
        match self {
            RefState::Branch { name, .. } | RefState::Tag { name, .. } => Some(name.as_str()),
            RefState::Detached { .. } => None,
        }
    }
}

/// A repository-relative file path with an optional line anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub path: String,
    pub line: Option<u32>,
}

/// The hosting page shape to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlMode {
    Top,
    Commit { sha: String },
    Tree { ref_name: String },
    Blob { id: String, path: String, line: Option<u32> },
}

/// Final URL handed to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    pub value: String,
}

impl fmt::Display for ResolvedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("remote '{remote}' has an unsupported URL: {url}")]
    UnsupportedRemoteFormat { remote: String, url: String },
    #[error("no such remote: {0}")]
    UnknownRemote(String),
    #[error("'{0}' does not name a branch, tag or commit")]
    UnresolvableRef(String),
    #[error(transparent)]
    Git(#[from] git::GitError),
}

pub type Result<T> = std::result::Result<T, BrowseError>;
