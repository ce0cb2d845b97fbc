use crate::git::RepoQuery;
use crate::{BrowseError, HostLocation, RemoteSpec, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Which syntax a remote URL was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteShape {
    /// `scheme://[user@]host[:port]/path`
    Scheme,
    /// `[user@]host:path`
    ScpLike,
}

struct RemotePattern {
    shape: RemoteShape,
    regex: Regex,
}

// Tried in order; the first pattern whose regex matches and whose path
// yields an owner and repo wins.
static REMOTE_PATTERNS: LazyLock<Vec<RemotePattern>> = LazyLock::new(|| {
    vec![
        RemotePattern {
            shape: RemoteShape::Scheme,
            regex: Regex::new(
                r"^[A-Za-z][A-Za-z0-9+.-]*://(?:[^@/]+@)?(?P<host>[^/:]+)(?::\d*)?/(?P<path>.+)$",
            )
            .unwrap(),
        },
        RemotePattern {
            shape: RemoteShape::ScpLike,
            regex: Regex::new(r"^(?:[^@/:]+@)?(?P<host>[^/:]+):(?P<path>[^/].*)$").unwrap(),
        },
    ]
});

impl HostLocation {
    /// Parse a remote URL into the host, owner and repository a hosting
    /// service uses for its web pages. Returns `None` when no known shape
    /// matches. Accepted shapes:
    ///
    /// - `https://<host>/<owner>/<repo>.git` (also `http`, `git`, `ssh`, `git+ssh`)
    /// - `ssh://git@<host>:2222/<owner>/<repo>.git`
    /// - `git@<host>:<owner>/<repo>.git`
    pub fn parse(raw_url: &str) -> Option<Self> {
        Self::parse_with_shape(raw_url).map(|(location, _)| location)
    }

    /// Like [`HostLocation::parse`], also reporting which shape matched.
    pub fn parse_with_shape(raw_url: &str) -> Option<(Self, RemoteShape)> {
        let raw_url = raw_url.trim();

        REMOTE_PATTERNS.iter().find_map(|pattern| {
            let captures = pattern.regex.captures(raw_url)?;
            let host = captures.name("host")?.as_str();
            let (owner, repo) = split_owner_repo(captures.name("path")?.as_str())?;
            if host.is_empty() {
                return None;
            }
            Some((
                HostLocation {
                    host: host.to_string(),
                    owner,
                    repo,
                },
                pattern.shape,
            ))
        })
    }

    /// `host/owner/repo`, handy for log lines.
    pub fn project_identifier(&self) -> String {
        format!("{}/{}/{}", self.host, self.owner, self.repo)
    }
}

/// The last two non-empty path segments, with `.git` stripped from the repo.
fn split_owner_repo(path: &str) -> Option<(String, String)> {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty()).rev();
    let repo_with_suffix = segments.next()?;
    let owner = segments.next()?;
    let repo = repo_with_suffix
        .strip_suffix(".git")
        .unwrap_or(repo_with_suffix);

    if owner.is_empty() || repo.is_empty() {
        return None;
    }

    Some((owner.to_string(), repo.to_string()))
}

/// Parse a configured remote, naming it in the error when its URL is unusable.
pub fn parse_remote(remote: &RemoteSpec) -> Result<HostLocation> {
    HostLocation::parse(&remote.raw_url).ok_or_else(|| BrowseError::UnsupportedRemoteFormat {
        remote: remote.name.clone(),
        url: remote.raw_url.clone(),
    })
}

/// Look up a remote by name in the repository configuration.
pub fn find_remote(repo: &dyn RepoQuery, name: &str) -> Result<RemoteSpec> {
    let raw_url = repo
        .remote_url(name)?
        .ok_or_else(|| BrowseError::UnknownRemote(name.to_string()))?;

    Ok(RemoteSpec {
        name: name.to_string(),
        raw_url,
    })
}

/// Find the named remote and parse its URL.
pub fn locate_remote(repo: &dyn RepoQuery, name: &str) -> Result<HostLocation> {
    let location = parse_remote(&find_remote(repo, name)?)?;
    tracing::debug!(
        remote = name,
        project = %location.project_identifier(),
        "located remote"
    );
    Ok(location)
}
