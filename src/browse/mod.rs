use crate::browser::Browser;
use crate::git::RepoQuery;
use crate::init::init_templates;
use crate::mode::{ModeFlags, select_mode};
use crate::remote::locate_remote;
use crate::resolver::{default_branch, resolve_ref};
use crate::url::{Recipe, UrlTemplates, build_url};
use crate::{PathSpec, RefTarget, ResolvedUrl, Result};
use tracing::{debug, warn};

/// One invocation's worth of arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseRequest {
    /// `--init`: configure templates instead of resolving a URL.
    pub init: Option<Recipe>,
    pub flags: ModeFlags,
    pub remote: String,
    pub line: Option<u32>,
    /// Ref expression, or an existing path when no `--` path is given.
    pub target: Option<String>,
    /// Path given after `--` or as a second positional.
    pub path: Option<String>,
}

impl Default for BrowseRequest {
    fn default() -> Self {
        Self {
            init: None,
            flags: ModeFlags::default(),
            remote: "origin".to_string(),
            line: None,
            target: None,
            path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Url(ResolvedUrl),
    Initialized { host: String, recipe: Recipe },
}

/// Resolve a request to a URL (or perform `--init`) without opening anything.
pub fn browse(request: &BrowseRequest, repo: &dyn RepoQuery) -> Result<Outcome> {
    if let Some(recipe) = request.init {
        let location = locate_remote(repo, &request.remote)?;
        init_templates(repo, &location.host, recipe)?;
        return Ok(Outcome::Initialized {
            host: location.host,
            recipe,
        });
    }

    let (target, path) = split_arguments(request, repo)?;
    let resolution = resolve_ref(repo, &target)?;
    let remote = resolution.remote.as_deref().unwrap_or(&request.remote);

    let location = locate_remote(repo, remote)?;
    let default_branch = default_branch(repo, remote)?;
    let mode = select_mode(
        request.flags,
        &resolution.state,
        path.as_ref(),
        &default_branch,
    );
    let templates = UrlTemplates::for_host(repo, &location.host)?;

    Ok(Outcome::Url(build_url(&location, &mode, &templates)))
}

/// [`browse`], then hand any URL to `browser`. Nothing is opened on error.
pub fn run(
    request: &BrowseRequest,
    repo: &dyn RepoQuery,
    browser: &dyn Browser,
) -> anyhow::Result<Outcome> {
    let outcome = browse(request, repo)?;
    if let Outcome::Url(url) = &outcome {
        browser.open(url)?;
    }
    Ok(outcome)
}

/// Decide which positional argument is the ref and which is the path.
///
/// Without `--`, a lone argument naming an existing file is a path.
fn split_arguments(
    request: &BrowseRequest,
    repo: &dyn RepoQuery,
) -> Result<(RefTarget, Option<PathSpec>)> {
    let (target, path) = match (&request.target, &request.path) {
        (target, Some(path)) => (target.clone(), Some(path.as_str())),
        (Some(target), None) if repo.path_exists(target) => {
            debug!(path = %target, "argument names a file");
            (None, Some(target.as_str()))
        }
        (target, None) => (target.clone(), None),
    };

    let target = match target {
        Some(text) => RefTarget::Explicit(text),
        None => RefTarget::Current,
    };

    let path = match path {
        Some(path) => Some(PathSpec {
            path: repo_relative(&repo.path_prefix()?, path),
            line: request.line,
        }),
        None => {
            if let Some(line) = request.line {
                warn!(line, "ignoring -L without a path");
            }
            None
        }
    };

    Ok((target, path))
}

/// Join the working directory's prefix and `path`, folding `.` and `..`.
fn repo_relative(prefix: &str, path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in prefix.split('/').chain(path.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            segment => parts.push(segment),
        }
    }
    parts.join("/")
}
