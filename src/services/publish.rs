use crate::domain::models::{Category, ContentScan, FileEntry, Manifest};
use crate::error::ShipError;
use crate::services::classifier::classify_normalized;
use crate::services::manifest::walk_files;
use crate::services::policy::{normalize_repo_path, Rules};
use std::path::{Path, PathBuf};

/// Receives the Safe file set; stands in for a push to the hosting repo.
pub trait Publisher {
    fn publish(&self, root: &Path, entries: &[FileEntry]) -> anyhow::Result<usize>;
    fn describe(&self) -> String;
}

pub struct DirectoryPublisher {
    pub dest: PathBuf,
}

impl DirectoryPublisher {
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self { dest: dest.into() }
    }

    /// Fails when the destination is the repository root or sits below it;
    /// the next walk would pick the published copy up as repository content.
    pub fn check_outside(&self, root: &Path) -> anyhow::Result<()> {
        let root = root.canonicalize()?;
        if resolve(&self.dest)?.starts_with(&root) {
            return Err(ShipError::InvalidDestination(self.describe()).into());
        }
        Ok(())
    }

    /// Fails if the checkout already tracks a secret-bearing file.
    pub fn check_destination(&self, rules: &Rules) -> anyhow::Result<()> {
        if !self.dest.exists() {
            return Ok(());
        }
        for rel in walk_files(&self.dest, &rules.skip_dirs)? {
            let e = classify_normalized(rules, rel, &ContentScan::default());
            if e.category == Category::Excluded && e.reason.starts_with("deny:") {
                return Err(ShipError::ExcludedFile {
                    path: format!("{} (already in destination)", e.path),
                    reason: e.reason,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Canonical form of a path that may not exist yet: the nearest existing
/// ancestor is canonicalized and the missing tail appended.
fn resolve(path: &Path) -> std::io::Result<PathBuf> {
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let mut tail = Vec::new();
    let mut cur = abs.as_path();
    loop {
        match cur.canonicalize() {
            Ok(mut base) => {
                base.extend(tail.iter().rev());
                return Ok(base);
            }
            Err(e) => match (cur.parent(), cur.file_name()) {
                (Some(parent), Some(name)) => {
                    tail.push(name.to_os_string());
                    cur = parent;
                }
                _ => return Err(e),
            },
        }
    }
}

impl Publisher for DirectoryPublisher {
    fn publish(&self, root: &Path, entries: &[FileEntry]) -> anyhow::Result<usize> {
        let mut copied = 0usize;
        for e in entries {
            if e.category != Category::Safe {
                return Err(ShipError::ExcludedFile {
                    path: e.path.clone(),
                    reason: e.reason.clone(),
                }
                .into());
            }
            let to = self.dest.join(&e.path);
            if let Some(parent) = to.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(root.join(&e.path), &to)?;
            tracing::debug!(path = %e.path, "published");
            copied += 1;
        }
        Ok(copied)
    }

    fn describe(&self) -> String {
        self.dest.to_string_lossy().to_string()
    }
}

/// Picks the entries to publish. An explicit list must be all Safe.
pub fn select_entries(manifest: &Manifest, only: &[String]) -> anyhow::Result<Vec<FileEntry>> {
    if only.is_empty() {
        return Ok(manifest.safe.clone());
    }
    let mut out = Vec::new();
    for raw in only {
        let path = normalize_repo_path(raw)?;
        if let Some(e) = manifest.excluded.iter().find(|e| e.path == path) {
            return Err(ShipError::ExcludedFile {
                path: e.path.clone(),
                reason: e.reason.clone(),
            }
            .into());
        }
        match manifest.safe.iter().find(|e| e.path == path) {
            Some(e) => out.push(e.clone()),
            None => anyhow::bail!("file not found in repository: {}", path),
        }
    }
    Ok(out)
}
