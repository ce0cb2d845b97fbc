use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_browse_remote::browse::{Outcome, run};
use git_browse_remote::browser::{Browser, GitWebBrowser, PrintUrl};
use git_browse_remote::cli;
use git_browse_remote::git::GitCli;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::parse_args();
    let request = args.to_request();

    let repo = GitCli::discover().context("Failed to open the git repository")?;
    let browser: Box<dyn Browser> = if args.print {
        Box::new(PrintUrl)
    } else {
        Box::new(GitWebBrowser)
    };

    match run(&request, &repo, browser.as_ref())? {
        Outcome::Url(_) => {}
        Outcome::Initialized { host, recipe } => {
            println!("✓ Configured {} URL templates for {}", recipe, host);
        }
    }

    Ok(())
}
