// Shared helpers for integration tests.
//
// Provides a temporary source repository holding a `dotfiler.yml`, a
// separate temporary destination root, and a fixed-answer implementation of
// `Dependencies` so every test controls the platform and the confirmation
// key without touching the real environment.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::cell::Cell;
use std::path::{Path, PathBuf};

use dotfiler::cli::UpdateOpts;
use dotfiler::deps::Dependencies;
use dotfiler::error::DotfilerError;
use dotfiler::logging::BufferedLog;
use dotfiler::manifest::MANIFEST_FILE_NAME;
use dotfiler::operations::SystemFileSystemOps;

/// [`Dependencies`] with a fixed platform, home directory and answer.
#[derive(Debug)]
pub struct FakeDependencies {
    pub os: String,
    pub arch: String,
    pub home: PathBuf,
    pub key: char,
    /// Number of times the confirmation key was read.
    pub prompts: Cell<usize>,
}

impl FakeDependencies {
    pub fn new(os: &str, arch: &str, home: &Path, key: char) -> Self {
        Self {
            os: os.to_string(),
            arch: arch.to_string(),
            home: home.to_path_buf(),
            key,
            prompts: Cell::new(0),
        }
    }
}

impl Dependencies for FakeDependencies {
    fn os(&self) -> String {
        self.os.clone()
    }

    fn arch(&self) -> String {
        self.arch.clone()
    }

    fn home_dir(&self) -> Result<PathBuf, DotfilerError> {
        Ok(self.home.clone())
    }

    fn read_confirmation_key(&self) -> Result<char, DotfilerError> {
        self.prompts.set(self.prompts.get() + 1);
        Ok(self.key)
    }
}

/// A source repository and a destination root, both temporary.
#[derive(Debug)]
pub struct IntegrationTestContext {
    /// Directory holding `dotfiler.yml` and the source files.
    pub repo: tempfile::TempDir,
    /// Destination root (stands in for the home directory).
    pub home: tempfile::TempDir,
}

impl IntegrationTestContext {
    pub fn repo_path(&self) -> &Path {
        self.repo.path()
    }

    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// Path of `rel` under the destination root.
    pub fn dest(&self, rel: &str) -> PathBuf {
        self.home.path().join(rel)
    }

    /// Path of `rel` under the source repository.
    pub fn source(&self, rel: &str) -> PathBuf {
        self.repo.path().join(rel)
    }

    /// Fake host answering `key`, with the destination root as home.
    pub fn deps(&self, os: &str, arch: &str, key: char) -> FakeDependencies {
        FakeDependencies::new(os, arch, self.home.path(), key)
    }

    /// Run `files update` against this context with the manifest found in
    /// the repository directory.
    pub fn update(
        &self,
        deps: &FakeDependencies,
        dry_run: bool,
    ) -> (anyhow::Result<()>, BufferedLog) {
        let opts = UpdateOpts {
            manifest: Some(self.repo.path().to_path_buf()),
            destination: None,
            dry_run,
        };
        let log = BufferedLog::new();
        let result = dotfiler::commands::update::run(
            &opts,
            deps,
            &SystemFileSystemOps,
            &log,
            self.repo.path(),
        );
        (result, log)
    }

    /// Target of the link at `rel` under the destination root.
    pub fn link_target(&self, rel: &str) -> Option<PathBuf> {
        std::fs::read_link(self.dest(rel)).ok()
    }
}

/// Fluent builder for [`IntegrationTestContext`].
#[derive(Debug)]
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
    entries: Vec<String>,
}

impl TestContextBuilder {
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext {
                repo: tempfile::tempdir().expect("create repo dir"),
                home: tempfile::tempdir().expect("create home dir"),
            },
            entries: Vec::new(),
        }
    }

    /// Create a source file in the repository.
    pub fn with_source(self, rel: &str, content: &str) -> Self {
        let path = self.ctx.repo.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create source parent");
        }
        std::fs::write(&path, content).expect("write source file");
        self
    }

    /// Create a regular file in the destination root.
    pub fn with_existing_file(self, rel: &str, content: &str) -> Self {
        let path = self.ctx.home.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create destination parent");
        }
        std::fs::write(&path, content).expect("write destination file");
        self
    }

    /// Create a symlink in the destination root pointing at `target`.
    #[cfg(unix)]
    pub fn with_existing_link(self, rel: &str, target: &Path) -> Self {
        let path = self.ctx.home.path().join(rel);
        std::os::unix::fs::symlink(target, &path).expect("create destination link");
        self
    }

    /// Append a manifest entry.
    pub fn with_entry(mut self, op: &str, src: &str, dst: &str, os: &[&str], arch: &[&str]) -> Self {
        self.entries.push(format!(
            "- op: {op}\n  srcFilePath: {src}\n  dstFilePath: {dst}\n  targetOS: [{}]\n  targetArch: [{}]\n",
            os.join(", "),
            arch.join(", ")
        ));
        self
    }

    /// Shorthand for a symlink entry.
    pub fn with_link(self, src: &str, dst: &str, os: &[&str], arch: &[&str]) -> Self {
        self.with_entry("symlink", src, dst, os, arch)
    }

    /// Write `dotfiler.yml` and return the context.
    pub fn build(self) -> IntegrationTestContext {
        std::fs::write(
            self.ctx.repo.path().join(MANIFEST_FILE_NAME),
            self.entries.concat(),
        )
        .expect("write manifest");
        self.ctx
    }
}
