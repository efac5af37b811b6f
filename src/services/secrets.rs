//! Platform-managed environment variables.
//!
//! The hosting platform's dashboard is modelled as a `SecretStore`. Values
//! go in, only names come out.

use crate::domain::constants::BACKEND_ENV;
use crate::domain::models::{EnvSource, EnvironmentVariable};
use crate::error::ShipError;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Created,
    Unchanged,
    Updated,
}

impl SetOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetOutcome::Created => "created",
            SetOutcome::Unchanged => "unchanged",
            SetOutcome::Updated => "updated",
        }
    }
}

pub trait SecretStore {
    fn names(&self) -> Vec<String>;
    fn contains(&self, name: &str) -> bool;
    fn set(&mut self, name: &str, value: &str) -> anyhow::Result<SetOutcome>;
    fn unset(&mut self, name: &str) -> anyhow::Result<bool>;
}

pub fn validate_env_name(name: &str) -> Result<(), ShipError> {
    let mut chars = name.chars();
    let first_ok = chars
        .next()
        .map(|c| c.is_ascii_uppercase() || c == '_')
        .unwrap_or(false);
    if first_ok && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_') {
        Ok(())
    } else {
        Err(ShipError::InvalidEnvName(name.to_string()))
    }
}

pub fn secrets_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/shipcheck/secrets.json"))
}

pub struct FileSecretStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSecretStore {
    pub fn open_default() -> anyhow::Result<Self> {
        Self::open(secrets_path()?)
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let values = if path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    /// Writes to a private sibling file, then renames it over the store so
    /// the values never sit in a file with default permissions.
    fn persist(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        if tmp.exists() {
            std::fs::remove_file(&tmp)?;
        }
        let mut file = private_file(&tmp)?;
        file.write_all(serde_json::to_string_pretty(&self.values)?.as_bytes())?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn private_file(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn private_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

impl SecretStore for FileSecretStore {
    fn names(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn set(&mut self, name: &str, value: &str) -> anyhow::Result<SetOutcome> {
        validate_env_name(name)?;
        let outcome = match self.values.get(name) {
            Some(existing) if existing == value => return Ok(SetOutcome::Unchanged),
            Some(_) => SetOutcome::Updated,
            None => SetOutcome::Created,
        };
        self.values.insert(name.to_string(), value.to_string());
        self.persist()?;
        Ok(outcome)
    }

    fn unset(&mut self, name: &str) -> anyhow::Result<bool> {
        if self.values.remove(name).is_none() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }
}

/// Required names absent from the store, in declaration order.
pub fn missing_required(store: &dyn SecretStore, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|n| !store.contains(n))
        .cloned()
        .collect()
}

/// Backend contract plus anything else stored or required by policy.
pub fn list_variables(store: &dyn SecretStore, required: &[String]) -> Vec<EnvironmentVariable> {
    let mut out: Vec<EnvironmentVariable> = BACKEND_ENV
        .iter()
        .map(|v| EnvironmentVariable {
            name: v.name.to_string(),
            source: EnvSource::PlatformManaged,
            required: v.required || required.iter().any(|r| r == v.name),
            present: store.contains(v.name),
            description: v.description.to_string(),
        })
        .collect();

    let extra = required.iter().cloned().chain(store.names());
    for name in extra {
        if out.iter().any(|v| v.name == name) {
            continue;
        }
        out.push(EnvironmentVariable {
            present: store.contains(&name),
            required: required.contains(&name),
            source: EnvSource::PlatformManaged,
            description: String::new(),
            name,
        });
    }
    out
}
