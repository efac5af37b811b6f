//! Path classification against the rule table.
//!
//! Precedence: allow-override, deny, content finding, unscanned content,
//! allow, default. No I/O happens here; content is scanned elsewhere and
//! passed in.

use crate::domain::models::{Category, ContentScan, FileEntry};
use crate::error::ShipError;
use crate::services::policy::{normalize_repo_path, Rules};

pub fn classify(rules: &Rules, raw_path: &str, scan: &ContentScan) -> Result<FileEntry, ShipError> {
    let path = normalize_repo_path(raw_path)?;
    Ok(classify_normalized(rules, path, scan))
}

pub(crate) fn classify_normalized(rules: &Rules, path: String, scan: &ContentScan) -> FileEntry {
    let (category, reason) = decide(rules, &path, scan);
    FileEntry {
        path,
        category,
        reason,
    }
}

fn decide(rules: &Rules, path: &str, scan: &ContentScan) -> (Category, String) {
    let overridden = rules.allow_override.iter().find(|r| r.matches(path));

    if overridden.is_none() {
        if let Some(r) = rules.deny.iter().find(|r| r.matches(path)) {
            return (Category::Excluded, format!("deny: {}", r.source));
        }
    }

    if let Some(f) = scan.findings.iter().find(|f| f.path == path) {
        return (
            Category::Excluded,
            format!("content: {} (line {})", f.rule, f.line),
        );
    }

    if let Some(u) = scan.unscanned.iter().find(|u| u.path == path) {
        return (Category::Excluded, format!("unscanned: {}", u.reason));
    }

    if let Some(r) = overridden {
        return (Category::Safe, format!("template: {}", r.source));
    }

    if let Some(r) = rules.allow.iter().find(|r| r.matches(path)) {
        return (Category::Safe, format!("allow: {}", r.source));
    }

    match rules.default_category {
        Category::Excluded => (
            Category::Excluded,
            "unclassified: confirm before publishing".to_string(),
        ),
        Category::Safe => (Category::Safe, "unclassified: policy default".to_string()),
    }
}
