use crate::git::{RepoQuery, TagInfo, validate_git_ref};
use crate::{BrowseError, RefState, RefTarget, Result};
use std::collections::HashMap;
use tracing::debug;

/// Commit → tag names, built once from the full tag list.
#[derive(Debug, Clone, Default)]
pub struct TagLookup {
    by_commit: HashMap<String, Vec<String>>,
}

impl TagLookup {
    pub fn build(tags: &[TagInfo]) -> Self {
        let mut by_commit: HashMap<String, Vec<String>> = HashMap::new();
        for tag in tags {
            by_commit
                .entry(tag.commit.clone())
                .or_default()
                .push(tag.name.clone());
        }
        for names in by_commit.values_mut() {
            names.sort();
        }
        Self { by_commit }
    }

    /// The tag pointing at `commit`; the alphabetically first when several do.
    pub fn tag_for(&self, commit: &str) -> Option<&str> {
        self.by_commit
            .get(commit)
            .and_then(|names| names.first())
            .map(String::as_str)
    }
}

/// Outcome of ref resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub state: RefState,
    /// Remote picked by the ref argument itself (`origin2/master`, `origin2`).
    pub remote: Option<String>,
}

impl Resolution {
    fn local(state: RefState) -> Self {
        Self {
            state,
            remote: None,
        }
    }
}

/// Classify the requested ref.
///
/// An explicit argument is tried as a local branch, a tag, a remote-tracking
/// branch, a remote name and finally any commit expression, in that order.
/// The first match wins, so a branch and a tag sharing a name resolve to the
/// branch.
pub fn resolve_ref(repo: &dyn RepoQuery, target: &RefTarget) -> Result<Resolution> {
    let resolution = match target {
        RefTarget::Current => resolve_current(repo)?,
        RefTarget::Explicit(text) => resolve_explicit(repo, text)?,
    };
    debug!(?resolution, "resolved ref");
    Ok(resolution)
}

fn resolve_explicit(repo: &dyn RepoQuery, text: &str) -> Result<Resolution> {
    validate_git_ref(text)?;

    let branch_ref = format!("refs/heads/{text}");
    let tag_ref = format!("refs/tags/{text}");
    let is_branch = repo.ref_exists(&branch_ref)?;
    let is_tag = repo.ref_exists(&tag_ref)?;

    if is_branch {
        if is_tag {
            debug!(name = text, "name is both a branch and a tag, using the branch");
        }
        return Ok(Resolution::local(RefState::Branch {
            name: text.to_string(),
            sha: commit_of(repo, &branch_ref, text)?,
        }));
    }

    if is_tag {
        return Ok(Resolution::local(RefState::Tag {
            name: text.to_string(),
            sha: commit_of(repo, &tag_ref, text)?,
        }));
    }

    if let Some(resolution) = resolve_remote_branch(repo, text)? {
        return Ok(resolution);
    }

    if repo.remote_names()?.iter().any(|remote| remote == text) {
        debug!(remote = text, "ref argument names a remote");
        let mut resolution = resolve_current(repo)?;
        resolution.remote = Some(text.to_string());
        return Ok(resolution);
    }

    let sha = commit_of(repo, text, text)?;
    Ok(Resolution::local(RefState::Detached { sha }))
}

/// `origin2/feature` → branch `feature` on remote `origin2`.
fn resolve_remote_branch(repo: &dyn RepoQuery, text: &str) -> Result<Option<Resolution>> {
    for remote in repo.remote_names()? {
        let Some(branch) = text
            .strip_prefix(remote.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            continue;
        };
        if branch.is_empty() || branch == "HEAD" {
            continue;
        }

        let full_name = format!("refs/remotes/{text}");
        if repo.ref_exists(&full_name)? {
            let sha = commit_of(repo, &full_name, text)?;
            return Ok(Some(Resolution {
                state: RefState::Branch {
                    name: branch.to_string(),
                    sha,
                },
                remote: Some(remote),
            }));
        }
    }

    Ok(None)
}

fn resolve_current(repo: &dyn RepoQuery) -> Result<Resolution> {
    let head = commit_of(repo, "HEAD", "HEAD")?;

    if let Some(name) = repo.current_branch()? {
        return Ok(Resolution::local(RefState::Branch { name, sha: head }));
    }

    let tags = TagLookup::build(&repo.tags()?);
    let state = match tags.tag_for(&head) {
        Some(name) => RefState::Tag {
            name: name.to_string(),
            sha: head,
        },
        None => RefState::Detached { sha: head },
    };

    Ok(Resolution::local(state))
}

fn commit_of(repo: &dyn RepoQuery, expr: &str, shown_as: &str) -> Result<String> {
    repo.rev_parse(expr)?
        .ok_or_else(|| BrowseError::UnresolvableRef(shown_as.to_string()))
}

/// The branch the host treats as primary for `remote`.
///
/// `browse-remote.defaultBranch` wins, then the remote's `HEAD`, then a local
/// `main`, then `master`.
pub fn default_branch(repo: &dyn RepoQuery, remote: &str) -> Result<String> {
    if let Some(name) = repo.config_get("browse-remote.defaultBranch")? {
        return Ok(name);
    }

    let remote_head = format!("refs/remotes/{remote}/HEAD");
    if let Some(target) = repo.symbolic_ref(&remote_head)? {
        if let Some(branch) = target.strip_prefix(&format!("refs/remotes/{remote}/")) {
            return Ok(branch.to_string());
        }
    }

    if repo.ref_exists("refs/heads/main")? {
        return Ok("main".to_string());
    }

    Ok("master".to_string())
}
