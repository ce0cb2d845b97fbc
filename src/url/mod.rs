use crate::git::RepoQuery;
use crate::{HostLocation, ResolvedUrl, Result, UrlMode};
use clap::ValueEnum;
use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([a-z]+)\}").unwrap());

/// A named set of templates for a hosting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Recipe {
    Github,
    Gitlab,
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipe::Github => f.write_str("github"),
            Recipe::Gitlab => f.write_str("gitlab"),
        }
    }
}

/// One template per page shape, plus the line anchor appended to file pages.
///
/// Templates use `{host}`, `{owner}`, `{repo}`, `{ref}`, `{rev}`, `{path}`
/// and `{line}` placeholders. They come from `browse-remote.<host>.<key>` git
/// config, falling back to the GitHub layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplates {
    pub top: String,
    pub tree: String,
    pub commit: String,
    pub blob: String,
    pub line: String,
}

impl Default for UrlTemplates {
    fn default() -> Self {
        Self::from_recipe(Recipe::Github)
    }
}

impl UrlTemplates {
    pub fn from_recipe(recipe: Recipe) -> Self {
        let base = "https://{host}/{owner}/{repo}";
        let section = match recipe {
            Recipe::Github => "",
            Recipe::Gitlab => "/-",
        };
        Self {
            top: base.to_string(),
            tree: format!("{base}{section}/tree/{{ref}}"),
            commit: format!("{base}{section}/commit/{{rev}}"),
            blob: format!("{base}{section}/blob/{{ref}}/{{path}}"),
            line: "#L{line}".to_string(),
        }
    }

    /// Templates for `host`, overriding the GitHub layout key by key from git config.
    pub fn for_host(repo: &dyn RepoQuery, host: &str) -> Result<Self> {
        let mut templates = Self::default();
        for (key, slot) in templates.entries_mut() {
            if let Some(value) = repo.config_get(&format!("browse-remote.{host}.{key}"))? {
                *slot = value;
            }
        }
        Ok(templates)
    }

    /// `(config key, template)` pairs.
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("top", self.top.as_str()),
            ("ref", self.tree.as_str()),
            ("rev", self.commit.as_str()),
            ("file", self.blob.as_str()),
            ("line", self.line.as_str()),
        ]
    }

    fn entries_mut(&mut self) -> [(&'static str, &mut String); 5] {
        [
            ("top", &mut self.top),
            ("ref", &mut self.tree),
            ("rev", &mut self.commit),
            ("file", &mut self.blob),
            ("line", &mut self.line),
        ]
    }
}

/// Compose the URL for `mode` on `location`.
pub fn build_url(location: &HostLocation, mode: &UrlMode, templates: &UrlTemplates) -> ResolvedUrl {
    let mut vars = vec![
        ("host", location.host.clone()),
        ("owner", location.owner.clone()),
        ("repo", location.repo.clone()),
    ];

    let value = match mode {
        UrlMode::Top => expand(&templates.top, &vars),
        UrlMode::Tree { ref_name } => {
            vars.push(("ref", ref_name.clone()));
            expand(&templates.tree, &vars)
        }
        UrlMode::Commit { sha } => {
            vars.push(("rev", sha.clone()));
            expand(&templates.commit, &vars)
        }
        UrlMode::Blob { id, path, line } => {
            vars.push(("ref", id.clone()));
            vars.push(("path", path.clone()));
            let mut url = expand(&templates.blob, &vars);
            if let Some(line) = line {
                vars.push(("line", line.to_string()));
                url.push_str(&expand(&templates.line, &vars));
            }
            url
        }
    };

    ResolvedUrl { value }
}

/// Substitute `{name}` placeholders in one pass; unknown ones are kept as written.
fn expand(template: &str, vars: &[(&str, String)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            vars.iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
