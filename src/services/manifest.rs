use crate::domain::models::{Category, ContentScan, FileEntry, Manifest};
use crate::error::ShipError;
use crate::services::classifier::classify_normalized;
use crate::services::policy::Rules;
use crate::services::scanner::Scanner;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;

/// Relative paths of every file under `root`, sorted, skip dirs pruned.
pub fn walk_files(root: &Path, skip_dirs: &[String]) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::new();
    walk_dir(root, root, skip_dirs, &mut out)?;
    out.sort();
    Ok(out)
}

fn walk_dir(
    root: &Path,
    dir: &Path,
    skip_dirs: &[String],
    out: &mut Vec<String>,
) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        let name = entry.file_name().to_string_lossy().to_string();
        if ty.is_dir() {
            if skip_dirs.iter().any(|d| d == &name) {
                tracing::debug!(dir = %entry.path().display(), "skipping directory");
                continue;
            }
            walk_dir(root, &entry.path(), skip_dirs, out)?;
        } else if ty.is_file() {
            let rel = entry.path().strip_prefix(root)?.to_string_lossy().replace('\\', "/");
            out.push(rel);
        }
    }
    Ok(())
}

pub fn scan_files(
    root: &Path,
    rules: &Rules,
    files: &[String],
    scanner: &Scanner,
) -> anyhow::Result<ContentScan> {
    let mut scan = ContentScan::default();
    let path_only = ContentScan::default();
    for rel in files {
        // Files the path rules already exclude never reach the publisher.
        let by_path = classify_normalized(rules, rel.clone(), &path_only);
        if by_path.category == Category::Excluded {
            continue;
        }
        scanner.scan_file(root, rel, &mut scan)?;
    }
    Ok(scan)
}

pub fn build_manifest(root: &Path, rules: &Rules) -> anyhow::Result<Manifest> {
    if !root.is_dir() {
        anyhow::bail!("repository root is not a directory: {}", root.display());
    }
    let files = walk_files(root, &rules.skip_dirs)?;
    let scan = if rules.scan_content {
        scan_files(root, rules, &files, &Scanner::new()?)?
    } else {
        ContentScan::default()
    };

    let mut safe = Vec::new();
    let mut excluded = Vec::new();
    for rel in &files {
        let entry = classify_normalized(rules, rel.clone(), &scan);
        match entry.category {
            Category::Safe => safe.push(entry),
            Category::Excluded => excluded.push(entry),
        }
    }
    tracing::info!(
        safe = safe.len(),
        excluded = excluded.len(),
        findings = scan.findings.len(),
        unscanned = scan.unscanned.len(),
        "manifest built"
    );

    let digest = digest_safe_set(root, &safe)?;
    let manifest = Manifest {
        root: root.to_string_lossy().to_string(),
        safe,
        excluded,
        findings: scan.findings,
        unscanned: scan.unscanned,
        digest,
    };
    verify_partition(&manifest, &files)?;
    Ok(manifest)
}

fn digest_safe_set(root: &Path, safe: &[FileEntry]) -> anyhow::Result<String> {
    let mut paths: Vec<&str> = safe.iter().map(|e| e.path.as_str()).collect();
    paths.sort_unstable();
    let mut hasher = Sha256::new();
    for p in paths {
        let content = Sha256::digest(std::fs::read(root.join(p))?);
        hasher.update(p.as_bytes());
        hasher.update([0u8]);
        hasher.update(content);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Every walked file lands in exactly one side.
pub fn verify_partition(manifest: &Manifest, files: &[String]) -> Result<(), ShipError> {
    let safe: HashSet<&str> = manifest.safe.iter().map(|e| e.path.as_str()).collect();
    let excluded: HashSet<&str> = manifest.excluded.iter().map(|e| e.path.as_str()).collect();

    if let Some(p) = safe.intersection(&excluded).next() {
        return Err(ShipError::PartitionBroken(format!("{p} is both safe and excluded")));
    }
    for f in files {
        if !safe.contains(f.as_str()) && !excluded.contains(f.as_str()) {
            return Err(ShipError::PartitionBroken(format!("{f} is unclassified")));
        }
    }
    let total = manifest.safe.len() + manifest.excluded.len();
    if total != files.len() {
        return Err(ShipError::PartitionBroken(format!(
            "{total} entries for {} files",
            files.len()
        )));
    }
    Ok(())
}

/// `.gitignore` body: deny patterns, then concrete excluded paths.
pub fn render_gitignore(rules: &Rules, manifest: Option<&Manifest>) -> String {
    let mut out = String::from("# secret-bearing files (shipcheck deny rules)\n");
    for r in &rules.allow_override {
        out.push_str(&format!("!{}\n", r.source));
    }
    for r in &rules.deny {
        out.push_str(&format!("{}\n", r.source));
    }
    if let Some(m) = manifest {
        let extra: Vec<&FileEntry> = m
            .excluded
            .iter()
            .filter(|e| !e.reason.starts_with("deny:"))
            .collect();
        if !extra.is_empty() {
            out.push_str("\n# excluded by content or unclassified\n");
            for e in extra {
                out.push_str(&format!("/{}\n", e.path));
            }
        }
    }
    out
}
