use super::{RepoQuery, Result, TagInfo};
use std::cell::RefCell;
use std::collections::HashMap;

pub(crate) const MASTER_SHA: &str = "5a1c0ffee5a1c0ffee5a1c0ffee5a1c0ffee5a1c";
pub(crate) const PARENT_SHA: &str = "4b2deadbeef4b2deadbeef4b2deadbeef4b2dead";
pub(crate) const TAG_SHA: &str = "3c3facade3c3facade3c3facade3c3facade3c3f";
pub(crate) const BRANCH_SHA: &str = "b1b1b1b1b1b1b1b1b1b1b1b1b1b1b1b1b1b1b1b1";

/// In-memory `RepoQuery` mirroring a small history: `master` (default) and
/// `branch-1`, tag `tag-a` on an older master commit, and `origin`/`origin2`
/// remotes.
#[derive(Debug)]
pub(crate) struct FakeRepo {
    pub remotes: Vec<(String, String)>,
    pub branches: HashMap<String, String>,
    pub remote_branches: HashMap<String, String>,
    pub tags: Vec<TagInfo>,
    pub expressions: HashMap<String, String>,
    pub symbolic: HashMap<String, String>,
    pub head: String,
    pub current_branch: Option<String>,
    pub files: Vec<String>,
    pub prefix: String,
    pub config: RefCell<HashMap<String, String>>,
}

impl FakeRepo {
    pub fn new() -> Self {
        let branches = HashMap::from([
            ("master".to_string(), MASTER_SHA.to_string()),
            ("branch-1".to_string(), BRANCH_SHA.to_string()),
        ]);
        let expressions = HashMap::from([
            ("HEAD~1".to_string(), PARENT_SHA.to_string()),
            ("master^1".to_string(), PARENT_SHA.to_string()),
        ]);

        Self {
            remotes: vec![
                (
                    "origin".to_string(),
                    "git@github.com:user/repo.git".to_string(),
                ),
                (
                    "origin2".to_string(),
                    "https://github.com/user/repo2.git".to_string(),
                ),
            ],
            branches,
            remote_branches: HashMap::new(),
            tags: vec![TagInfo {
                name: "tag-a".to_string(),
                commit: TAG_SHA.to_string(),
            }],
            expressions,
            symbolic: HashMap::new(),
            head: MASTER_SHA.to_string(),
            current_branch: Some("master".to_string()),
            files: vec!["README.md".to_string(), "src/lib.rs".to_string()],
            prefix: String::new(),
            config: RefCell::new(HashMap::new()),
        }
    }

    pub fn on_branch(mut self, name: &str) -> Self {
        self.head = self.branches[name].clone();
        self.current_branch = Some(name.to_string());
        self
    }

    pub fn detached_at(mut self, sha: &str) -> Self {
        self.head = sha.to_string();
        self.current_branch = None;
        self
    }

    pub fn with_remote(mut self, name: &str, url: &str) -> Self {
        self.remotes.push((name.to_string(), url.to_string()));
        self
    }

    pub fn with_config(self, key: &str, value: &str) -> Self {
        self.config
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn config_value(&self, key: &str) -> Option<String> {
        self.config.borrow().get(key).cloned()
    }

    fn known_shas(&self) -> impl Iterator<Item = &String> {
        self.branches
            .values()
            .chain(self.remote_branches.values())
            .chain(self.tags.iter().map(|tag| &tag.commit))
            .chain(self.expressions.values())
            .chain(std::iter::once(&self.head))
    }
}

impl RepoQuery for FakeRepo {
    fn remote_names(&self) -> Result<Vec<String>> {
        Ok(self.remotes.iter().map(|(name, _)| name.clone()).collect())
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .remotes
            .iter()
            .find(|(remote, _)| remote == name)
            .map(|(_, url)| url.clone()))
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.current_branch.clone())
    }

    fn rev_parse(&self, expr: &str) -> Result<Option<String>> {
        if expr == "HEAD" {
            return Ok(Some(self.head.clone()));
        }
        let named = expr
            .strip_prefix("refs/heads/")
            .and_then(|name| self.branches.get(name))
            .or_else(|| {
                expr.strip_prefix("refs/remotes/")
                    .and_then(|name| self.remote_branches.get(name))
            })
            .or_else(|| {
                let name = expr.strip_prefix("refs/tags/").unwrap_or(expr);
                self.tags
                    .iter()
                    .find(|tag| tag.name == name)
                    .map(|tag| &tag.commit)
            })
            .or_else(|| self.branches.get(expr))
            .or_else(|| self.expressions.get(expr));
        if let Some(sha) = named {
            return Ok(Some(sha.clone()));
        }
        if expr.len() >= 4 && expr.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(self.known_shas().find(|sha| sha.starts_with(expr)).cloned());
        }
        Ok(None)
    }

    fn ref_exists(&self, full_name: &str) -> Result<bool> {
        if let Some(name) = full_name.strip_prefix("refs/heads/") {
            return Ok(self.branches.contains_key(name));
        }
        if let Some(name) = full_name.strip_prefix("refs/tags/") {
            return Ok(self.tags.iter().any(|tag| tag.name == name));
        }
        if let Some(name) = full_name.strip_prefix("refs/remotes/") {
            return Ok(self.remote_branches.contains_key(name));
        }
        Ok(false)
    }

    fn symbolic_ref(&self, full_name: &str) -> Result<Option<String>> {
        Ok(self.symbolic.get(full_name).cloned())
    }

    fn tags(&self) -> Result<Vec<TagInfo>> {
        Ok(self.tags.clone())
    }

    fn config_get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.config_value(key))
    }

    fn config_set(&self, key: &str, value: &str) -> Result<()> {
        self.config
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn path_exists(&self, path: &str) -> bool {
        let full = format!("{}{}", self.prefix, path);
        self.files.iter().any(|file| *file == full)
    }

    fn path_prefix(&self) -> Result<String> {
        Ok(self.prefix.clone())
    }
}
