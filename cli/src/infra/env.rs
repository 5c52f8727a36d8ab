//! Operator machine access: implements the `LocalEnv` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::LocalEnv;

/// Production `LocalEnv` backed by the process environment and filesystem.
pub struct SystemEnv;

impl LocalEnv for SystemEnv {
    fn find_tool(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
    }
}
