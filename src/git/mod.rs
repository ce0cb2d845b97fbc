use std::path::PathBuf;
use std::process::{Command, Output};
use thiserror::Error;

#[cfg(test)]
pub(crate) mod fake;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("not in a git repository")]
    NotARepo,
    #[error("git command failed: {0}")]
    CommandFailed(String),
    #[error("invalid git ref: {0}")]
    InvalidRef(String),
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GitError>;

/// A tag and the commit it ultimately points at (annotated tags are peeled).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub commit: String,
}

/// Everything the resolver needs to know about the local repository.
///
/// `GitCli` answers these by running `git`; tests answer them from memory.
pub trait RepoQuery {
    /// Names of all configured remotes.
    fn remote_names(&self) -> Result<Vec<String>>;

    /// URL of the named remote, `None` when it is not configured.
    fn remote_url(&self, name: &str) -> Result<Option<String>>;

    /// Current branch name, `None` for detached HEAD.
    fn current_branch(&self) -> Result<Option<String>>;

    /// Resolve a ref expression to a full commit SHA.
    fn rev_parse(&self, expr: &str) -> Result<Option<String>>;

    /// Whether a fully-qualified ref (`refs/heads/x`, `refs/tags/x`) exists.
    fn ref_exists(&self, full_name: &str) -> Result<bool>;

    /// Target of a symbolic ref such as `refs/remotes/origin/HEAD`.
    fn symbolic_ref(&self, full_name: &str) -> Result<Option<String>>;

    fn tags(&self) -> Result<Vec<TagInfo>>;

    fn config_get(&self, key: &str) -> Result<Option<String>>;

    /// Write a key into the repository-local config.
    fn config_set(&self, key: &str, value: &str) -> Result<()>;

    /// Whether `path` exists relative to the working directory.
    fn path_exists(&self, path: &str) -> bool;

    /// Working directory relative to the repository root (`""` or `"sub/dir/"`).
    fn path_prefix(&self) -> Result<String>;
}

/// `RepoQuery` backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    /// Query the repository containing `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Result<Self> {
        let cli = Self {
            workdir: workdir.into(),
        };
        cli.find_repo_root()?;
        Ok(cli)
    }

    /// Query the repository containing the current directory.
    pub fn discover() -> Result<Self> {
        Self::new(std::env::current_dir()?)
    }

    /// Find the root of the git repository.
    pub fn find_repo_root(&self) -> Result<PathBuf> {
        let output = self.git(&["rev-parse", "--show-toplevel"])?;

        if !output.status.success() {
            return Err(GitError::NotARepo);
        }

        let path = String::from_utf8(output.stdout)?.trim().to_string();

        Ok(PathBuf::from(path))
    }

    fn git(&self, args: &[&str]) -> Result<Output> {
        tracing::trace!(?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()?;
        Ok(output)
    }

    /// Run git and return trimmed stdout, failing on a non-zero exit.
    fn stdout_of(&self, args: &[&str]) -> Result<String> {
        let output = self.git(args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8(output.stdout)?.trim().to_string())
    }

    /// Run a git lookup where exit status 1 means "not found".
    fn lookup(&self, args: &[&str]) -> Result<Option<String>> {
        let output = self.git(args)?;

        match output.status.code() {
            Some(0) => Ok(Some(String::from_utf8(output.stdout)?.trim().to_string())),
            Some(1) => Ok(None),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(GitError::CommandFailed(format!(
                    "git {} failed: {}",
                    args.join(" "),
                    stderr.trim()
                )))
            }
        }
    }
}

impl RepoQuery for GitCli {
    fn remote_names(&self) -> Result<Vec<String>> {
        let stdout = self.stdout_of(&["remote"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        if !self.remote_names()?.iter().any(|remote| remote == name) {
            return Ok(None);
        }
        // get-url applies url.<base>.insteadOf rewrites
        self.stdout_of(&["remote", "get-url", name]).map(Some)
    }

    fn current_branch(&self) -> Result<Option<String>> {
        let branch = self.stdout_of(&["branch", "--show-current"])?;
        if branch.is_empty() {
            Ok(None)
        } else {
            Ok(Some(branch))
        }
    }

    fn rev_parse(&self, expr: &str) -> Result<Option<String>> {
        let peeled = format!("{expr}^{{commit}}");
        self.lookup(&["rev-parse", "--verify", "--quiet", &peeled])
    }

    fn ref_exists(&self, full_name: &str) -> Result<bool> {
        Ok(self
            .lookup(&["show-ref", "--verify", "--quiet", full_name])?
            .is_some())
    }

    fn symbolic_ref(&self, full_name: &str) -> Result<Option<String>> {
        // A missing ref exits 128 rather than 1, which is still "no target" here
        let output = self.git(&["symbolic-ref", "--quiet", full_name])?;
        if !output.status.success() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8(output.stdout)?.trim().to_string()))
    }

    fn tags(&self) -> Result<Vec<TagInfo>> {
        let stdout = self.stdout_of(&[
            "for-each-ref",
            "--format=%(refname:short)%09%(objectname)%09%(*objectname)",
            "refs/tags/",
        ])?;
        let mut tags = Vec::new();

        for line in stdout.lines() {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 2 || fields[0].is_empty() {
                continue;
            }
            let commit = match fields.get(2) {
                Some(peeled) if !peeled.is_empty() => *peeled,
                _ => fields[1],
            };
            tags.push(TagInfo {
                name: fields[0].to_string(),
                commit: commit.to_string(),
            });
        }

        Ok(tags)
    }

    fn config_get(&self, key: &str) -> Result<Option<String>> {
        self.lookup(&["config", "--get", key])
    }

    fn config_set(&self, key: &str, value: &str) -> Result<()> {
        self.stdout_of(&["config", "--local", key, value])?;
        Ok(())
    }

    fn path_exists(&self, path: &str) -> bool {
        self.workdir.join(path).exists()
    }

    fn path_prefix(&self) -> Result<String> {
        self.stdout_of(&["rev-parse", "--show-prefix"])
    }
}

/// Reject refs git would read as an option. Everything else goes to git as a
/// plain argument and a bad name simply fails to resolve.
pub fn validate_git_ref(ref_str: &str) -> Result<()> {
    if ref_str.is_empty() {
        return Err(GitError::InvalidRef("Empty git ref".to_string()));
    }

    if ref_str.starts_with('-') {
        return Err(GitError::InvalidRef(format!(
            "git ref may not start with '-': {}",
            ref_str
        )));
    }

    Ok(())
}
