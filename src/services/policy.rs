use crate::domain::constants::{
    BACKEND_ENV, DEFAULT_ALLOW, DEFAULT_ALLOW_OVERRIDE, DEFAULT_DENY, DEFAULT_SKIP_DIRS,
};
use crate::domain::models::{Category, PolicyFile, RuleTable};
use crate::error::ShipError;
use crate::services::secrets::validate_env_name;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

/// Rejects absolute paths and parent traversal, normalizes separators.
pub fn normalize_repo_path(raw: &str) -> Result<String, ShipError> {
    let s = raw.trim().replace('\\', "/");
    let s = s.trim_start_matches("./");
    if s.is_empty() || s.starts_with('/') || s.split('/').any(|seg| seg == "..") {
        return Err(ShipError::InvalidPath(raw.to_string()));
    }
    if has_drive_prefix(s) {
        return Err(ShipError::InvalidPath(raw.to_string()));
    }
    let parts: Vec<&str> = s.split('/').filter(|p| !p.is_empty() && *p != ".").collect();
    if parts.is_empty() {
        return Err(ShipError::InvalidPath(raw.to_string()));
    }
    Ok(parts.join("/"))
}

/// `C:/...`; backslashes are already folded to `/` here.
fn has_drive_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 3 && b[0].is_ascii_alphabetic() && b[1] == b':' && b[2] == b'/'
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub source: String,
    pattern: Pattern,
}

impl Rule {
    pub fn new(source: &str) -> Result<Self, ShipError> {
        let pattern = Pattern::new(source)
            .map_err(|e| ShipError::PolicyInvalid(format!("bad pattern {source:?}: {e}")))?;
        Ok(Self {
            source: source.to_string(),
            pattern,
        })
    }

    /// Patterns without `/` match the file name, others the whole path.
    pub fn matches(&self, path: &str) -> bool {
        let opts = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        if self.source.contains('/') {
            self.pattern.matches_with(path, opts)
        } else {
            let name = path.rsplit('/').next().unwrap_or(path);
            self.pattern.matches_with(name, opts)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rules {
    pub allow_override: Vec<Rule>,
    pub deny: Vec<Rule>,
    pub allow: Vec<Rule>,
    pub default_category: Category,
    pub skip_dirs: Vec<String>,
    pub scan_content: bool,
    pub required_env: Vec<String>,
}

fn compile(defaults: &[&str], extra: &[String]) -> Result<Vec<Rule>, ShipError> {
    defaults
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str))
        .map(Rule::new)
        .collect()
}

impl Rules {
    pub fn from_policy(policy: &PolicyFile) -> Result<Self, ShipError> {
        let c = &policy.classify;
        let mut skip_dirs: Vec<String> = DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect();
        for d in &c.skip_dirs {
            if !skip_dirs.contains(d) {
                skip_dirs.push(d.clone());
            }
        }

        let mut required_env: Vec<String> = BACKEND_ENV
            .iter()
            .filter(|v| v.required)
            .map(|v| v.name.to_string())
            .collect();
        for name in &policy.env.required {
            validate_env_name(name).map_err(|e| ShipError::PolicyInvalid(e.to_string()))?;
            if !required_env.contains(name) {
                required_env.push(name.clone());
            }
        }

        Ok(Self {
            allow_override: compile(DEFAULT_ALLOW_OVERRIDE, &c.allow_override)?,
            deny: compile(DEFAULT_DENY, &c.deny)?,
            allow: compile(DEFAULT_ALLOW, &c.allow)?,
            default_category: c.default_category,
            skip_dirs,
            scan_content: c.scan_content,
            required_env,
        })
    }

    #[cfg(test)]
    pub fn builtin() -> Self {
        Self::from_policy(&PolicyFile::default()).expect("built-in rules compile")
    }

    pub fn table(&self) -> RuleTable {
        let names = |rules: &[Rule]| rules.iter().map(|r| r.source.clone()).collect();
        RuleTable {
            allow_override: names(&self.allow_override),
            deny: names(&self.deny),
            allow: names(&self.allow),
            default_category: self.default_category,
            skip_dirs: self.skip_dirs.clone(),
            scan_content: self.scan_content,
            required_env: self.required_env.clone(),
        }
    }
}

pub fn default_policy_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/shipcheck/policy.toml"))
}

pub fn load_policy(explicit: Option<&Path>) -> anyhow::Result<PolicyFile> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("policy file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => default_policy_path()?,
    };
    if !path.exists() {
        tracing::debug!("no policy file, using built-in rule table");
        return Ok(PolicyFile::default());
    }
    tracing::debug!(path = %path.display(), "loading policy");
    let raw = std::fs::read_to_string(&path)?;
    toml::from_str(&raw).map_err(|e| ShipError::PolicyInvalid(e.to_string()).into())
}
