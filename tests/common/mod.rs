#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// A repository with this history:
///
/// ```text
/// * (branch-1) branched commit
/// | * (HEAD -> master) 5th commit
/// | * 4th commit
/// | * (tag: tag-a) 3rd commit
/// |/
/// * 2nd commit
/// * 1st commit
/// ```
///
/// `origin` points at `user/repo` over ssh, `origin2` at `user/repo2` over https.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let fixture = Self { dir };

        fixture.git(&["init", "-q"]);
        fixture.git(&["symbolic-ref", "HEAD", "refs/heads/master"]);
        fixture.git(&["remote", "add", "origin", "git@github.com:user/repo.git"]);
        fixture.git(&["remote", "add", "origin2", "https://github.com/user/repo2.git"]);

        fs::write(fixture.path().join("README.md"), "# repo\n\nline 3\n").unwrap();
        fs::create_dir(fixture.path().join("docs")).unwrap();
        fs::write(fixture.path().join("docs/guide.md"), "guide\n").unwrap();
        fixture.git(&["add", "README.md", "docs/guide.md"]);
        fixture.commit("1st commit");
        fixture.commit("2nd commit");
        fixture.git(&["checkout", "-q", "-b", "branch-1"]);
        fixture.commit("branched commit");
        fixture.git(&["checkout", "-q", "master"]);
        fixture.commit("3rd commit");
        fixture.git(&["tag", "tag-a"]);
        fixture.commit("4th commit");
        fixture.commit("5th commit");

        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git in the fixture with a fixed identity, returning trimmed stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args([
                "-c",
                "user.name=Test",
                "-c",
                "user.email=test@example.com",
                "-c",
                "commit.gpgsign=false",
                "-c",
                "tag.gpgsign=false",
            ])
            .args(args)
            .current_dir(self.path())
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }

    fn commit(&self, message: &str) {
        self.git(&["commit", "-q", "--allow-empty", "-m", message]);
    }

    pub fn checkout(&self, target: &str) {
        self.git(&["checkout", "-q", target]);
    }

    pub fn sha(&self, expr: &str) -> String {
        self.git(&["rev-parse", expr])
    }
}
