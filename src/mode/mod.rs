use crate::{PathSpec, RefState, UrlMode};
use tracing::debug;

/// Length of the abbreviated SHA used in file URLs under `--rev`.
pub const SHORT_SHA_LEN: usize = 7;

/// Mode-forcing command line flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFlags {
    /// `--top`: always the repository root page.
    pub top: bool,
    /// `--rev`: commit identifiers instead of names.
    pub rev: bool,
    /// `--ref`: name identifiers (tree pages) instead of commits.
    pub ref_names: bool,
}

/// Pick the page to open.
///
/// `--top` beats everything, then a path (file page), then `--rev`/`--ref`,
/// then the inferred default: the root page on the default branch, a tree
/// page on any other branch or tag and a commit page when detached.
pub fn select_mode(
    flags: ModeFlags,
    state: &RefState,
    path: Option<&PathSpec>,
    default_branch: &str,
) -> UrlMode {
    let mode = if flags.top {
        UrlMode::Top
    } else if let Some(path) = path {
        let id = if flags.rev {
            short_sha(state.sha()).to_string()
        } else {
            state.name().unwrap_or(state.sha()).to_string()
        };
        UrlMode::Blob {
            id,
            path: path.path.clone(),
            line: path.line,
        }
    } else {
        match state {
            _ if flags.rev => UrlMode::Commit {
                sha: state.sha().to_string(),
            },
            RefState::Branch { name, .. } if !flags.ref_names && name == default_branch => {
                UrlMode::Top
            }
            RefState::Branch { name, .. } | RefState::Tag { name, .. } => UrlMode::Tree {
                ref_name: name.clone(),
            },
            RefState::Detached { sha } => UrlMode::Commit { sha: sha.clone() },
        }
    };

    debug!(?flags, ?mode, "selected mode");
    mode
}

fn short_sha(sha: &str) -> &str {
    sha.get(..SHORT_SHA_LEN).unwrap_or(sha)
}
