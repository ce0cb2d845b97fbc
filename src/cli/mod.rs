use crate::browse::BrowseRequest;
use crate::mode::ModeFlags;
use crate::url::Recipe;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "git-browse-remote",
    about = "Open the hosting page for the current git checkout",
    override_usage = "git browse-remote [OPTIONS] [REF] [PATH | -- PATH]"
)]
pub struct Cli {
    /// Write URL templates for the remote's host into the local git config.
    #[arg(
        long,
        value_enum,
        value_name = "RECIPE",
        num_args = 0..=1,
        default_missing_value = "github"
    )]
    pub init: Option<Recipe>,

    /// Open the repository's top page.
    #[arg(long)]
    pub top: bool,

    /// Use commit SHAs instead of branch or tag names.
    #[arg(long, overrides_with = "ref_names")]
    pub rev: bool,

    /// Use branch or tag names instead of commit SHAs.
    #[arg(long = "ref", overrides_with = "rev")]
    pub ref_names: bool,

    /// Remote to browse.
    #[arg(short, long, value_name = "NAME", default_value = "origin")]
    pub remote: String,

    /// Line to anchor when opening a file.
    #[arg(short = 'L', value_name = "N")]
    pub line: Option<u32>,

    /// Print the URL instead of opening a browser.
    #[arg(short, long)]
    pub print: bool,

    /// Branch, tag, commit or ref expression (e.g. "HEAD~1"), or an existing file.
    pub target: Option<String>,

    /// File to open at REF, relative to the current directory.
    #[arg(value_name = "FILE", conflicts_with = "path")]
    pub file: Option<String>,

    /// File to open, relative to the current directory.
    #[arg(last = true, value_name = "PATH")]
    pub path: Option<String>,
}

impl Cli {
    /// Everything but `--print`, which only picks the browser.
    pub fn to_request(&self) -> BrowseRequest {
        BrowseRequest {
            init: self.init,
            flags: ModeFlags {
                top: self.top,
                rev: self.rev,
                ref_names: self.ref_names,
            },
            remote: self.remote.clone(),
            line: self.line,
            target: self.target.clone(),
            path: self.path.clone().or_else(|| self.file.clone()),
        }
    }
}

/// Parse CLI arguments.
pub fn parse_args() -> Cli {
    Cli::parse()
}
