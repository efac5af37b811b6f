use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Safe,
    Excluded,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Safe => write!(f, "safe"),
            Category::Excluded => write!(f, "excluded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub category: Category,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub path: String,
    pub line: usize,
    pub rule: String,
}

/// A file whose content could not be checked: too large or not text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unscanned {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ContentScan {
    pub findings: Vec<Finding>,
    pub unscanned: Vec<Unscanned>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub root: String,
    pub safe: Vec<FileEntry>,
    pub excluded: Vec<FileEntry>,
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub unscanned: Vec<Unscanned>,
    /// SHA-256 over the sorted Safe paths and their content hashes.
    pub digest: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvSource {
    PlatformManaged,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub source: EnvSource,
    pub required: bool,
    pub present: bool,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployState {
    Prepared,
    Uploaded,
    EnvConfigured,
    Deployed,
}

impl std::fmt::Display for DeployState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeployState::Prepared => "prepared",
            DeployState::Uploaded => "uploaded",
            DeployState::EnvConfigured => "env_configured",
            DeployState::Deployed => "deployed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployEvent {
    Upload,
    ConfirmEnv,
    BuildSucceeded,
    BuildFailed,
    Reset,
}

impl std::fmt::Display for DeployEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeployEvent::Upload => "upload",
            DeployEvent::ConfirmEnv => "confirm_env",
            DeployEvent::BuildSucceeded => "build_succeeded",
            DeployEvent::BuildFailed => "build_failed",
            DeployEvent::Reset => "reset",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub from: DeployState,
    pub to: DeployState,
    pub event: DeployEvent,
    pub at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub state: DeployState,
    #[serde(default)]
    pub uploaded_digest: Option<String>,
    #[serde(default)]
    pub uploaded_files: Vec<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub history: Vec<Transition>,
}

impl Default for WorkflowRecord {
    fn default() -> Self {
        Self {
            state: DeployState::Prepared,
            uploaded_digest: None,
            uploaded_files: Vec::new(),
            destination: None,
            history: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct PolicyFile {
    #[serde(default)]
    pub classify: ClassifySection,
    #[serde(default)]
    pub env: EnvSection,
}

fn default_true() -> bool {
    true
}

fn default_category() -> Category {
    Category::Excluded
}

#[derive(Debug, Deserialize)]
pub struct ClassifySection {
    #[serde(default)]
    pub deny: Vec<String>,
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub allow_override: Vec<String>,
    #[serde(default = "default_category")]
    pub default_category: Category,
    #[serde(default)]
    pub skip_dirs: Vec<String>,
    #[serde(default = "default_true")]
    pub scan_content: bool,
}

impl Default for ClassifySection {
    fn default() -> Self {
        Self {
            deny: Vec::new(),
            allow: Vec::new(),
            allow_override: Vec::new(),
            default_category: default_category(),
            skip_dirs: Vec::new(),
            scan_content: true,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct EnvSection {
    #[serde(default)]
    pub required: Vec<String>,
}

#[derive(Serialize)]
pub struct RuleTable {
    pub allow_override: Vec<String>,
    pub deny: Vec<String>,
    pub allow: Vec<String>,
    pub default_category: Category,
    pub skip_dirs: Vec<String>,
    pub scan_content: bool,
    pub required_env: Vec<String>,
}

#[derive(Serialize)]
pub struct UploadReport {
    pub state: DeployState,
    pub destination: String,
    pub published: usize,
    pub excluded: usize,
    pub digest: String,
}

#[derive(Serialize)]
pub struct EnvConfirmReport {
    pub state: DeployState,
    pub confirmed: Vec<String>,
    pub changed: bool,
}

#[derive(Serialize)]
pub struct WorkflowStatus {
    pub state: DeployState,
    pub next: Vec<DeployEvent>,
    pub uploaded_digest: Option<String>,
    pub uploaded_files: usize,
    pub destination: Option<String>,
    pub history: Vec<Transition>,
}

#[derive(Serialize)]
pub struct EnvSetReport {
    pub name: String,
    pub outcome: String,
}

#[derive(Serialize)]
pub struct ReadinessReport {
    pub overall: String,
    pub state: DeployState,
    pub safe_count: usize,
    pub excluded_count: usize,
    pub findings: Vec<Finding>,
    pub missing_env: Vec<String>,
    pub recommendations: Vec<String>,
}
