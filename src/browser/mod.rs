use crate::ResolvedUrl;
use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Something that can show a URL to the user.
pub trait Browser {
    fn open(&self, url: &ResolvedUrl) -> io::Result<()>;
}

/// Opens URLs through `git web--browse`, which honours `web.browser`.
///
/// The browser process is spawned and left running.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitWebBrowser;

impl Browser for GitWebBrowser {
    fn open(&self, url: &ResolvedUrl) -> io::Result<()> {
        tracing::debug!(url = %url, "launching git web--browse");
        Command::new("git")
            .arg("web--browse")
            .arg(&url.value)
            .stdin(Stdio::null())
            .spawn()?;
        Ok(())
    }
}

/// Writes the URL to stdout instead of opening it (`--print`).
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintUrl;

impl Browser for PrintUrl {
    fn open(&self, url: &ResolvedUrl) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{url}")
    }
}
