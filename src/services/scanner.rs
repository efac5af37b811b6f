use crate::domain::constants::MAX_SCAN_BYTES;
use crate::domain::models::{ContentScan, Finding, Unscanned};
use regex::Regex;
use std::path::Path;

const RULES: &[(&str, &str)] = &[
    ("google-oauth-client-secret", r"GOCSPX-[A-Za-z0-9_\-]{20,}"),
    ("google-api-key", r"AIza[0-9A-Za-z_\-]{35}"),
    ("private-key-block", r"-----BEGIN ([A-Z]+ )?PRIVATE KEY-----"),
    ("aws-access-key-id", r"\bAKIA[0-9A-Z]{16}\b"),
    (
        "client-secret-assignment",
        r#"(?i)["']?client_secret["']?\s*[:=]\s*["'][^"'\s]{8,}["']"#,
    ),
    (
        "hardcoded-password",
        r#"(?i)(set_password\(\s*["'][^"']+["']\s*\)|\bpassword\s*=\s*["'][^"']{4,}["'])"#,
    ),
];

/// Line-oriented secret detector. Findings carry the rule name only,
/// never the matched text.
pub struct Scanner {
    rules: Vec<(&'static str, Regex)>,
}

impl Scanner {
    pub fn new() -> anyhow::Result<Self> {
        let rules = RULES
            .iter()
            .map(|(name, re)| -> anyhow::Result<(&'static str, Regex)> {
                Ok((*name, Regex::new(re)?))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn scan_text(&self, path: &str, text: &str) -> Vec<Finding> {
        let mut out = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            for (name, re) in &self.rules {
                if re.is_match(line) {
                    out.push(Finding {
                        path: path.to_string(),
                        line: idx + 1,
                        rule: name.to_string(),
                    });
                }
            }
        }
        out
    }

    /// Records findings for `rel`, or marks it unscanned when it is too
    /// large or not UTF-8.
    pub fn scan_file(&self, root: &Path, rel: &str, out: &mut ContentScan) -> anyhow::Result<()> {
        let full = root.join(rel);
        let meta = std::fs::metadata(&full)?;
        if meta.len() > MAX_SCAN_BYTES {
            tracing::warn!(path = rel, size = meta.len(), "file too large to scan, holding it back");
            out.unscanned.push(unscanned(rel, "too large"));
            return Ok(());
        }
        let bytes = std::fs::read(&full)?;
        match String::from_utf8(bytes) {
            Ok(text) => out.findings.extend(self.scan_text(rel, &text)),
            Err(_) => {
                tracing::warn!(path = rel, "file is not utf-8, holding it back");
                out.unscanned.push(unscanned(rel, "not utf-8"));
            }
        }
        Ok(())
    }
}

fn unscanned(path: &str, reason: &str) -> Unscanned {
    Unscanned {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
