use crate::Result;
use crate::git::RepoQuery;
use crate::url::{Recipe, UrlTemplates};

/// Write the recipe's URL templates for `host` into the local git config.
///
/// Existing `browse-remote.<host>.*` keys are overwritten. Keys for other
/// hosts are left alone.
pub fn init_templates(repo: &dyn RepoQuery, host: &str, recipe: Recipe) -> Result<()> {
    let templates = UrlTemplates::from_recipe(recipe);

    for (key, template) in templates.entries() {
        repo.config_set(&format!("browse-remote.{host}.{key}"), template)?;
    }

    tracing::debug!(host, %recipe, "configured URL templates");
    Ok(())
}
