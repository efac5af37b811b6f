use crate::domain::models::WorkflowRecord;
use std::path::PathBuf;

fn config_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/shipcheck"))
}

pub fn audit(action: &str, data: serde_json::Value) {
    let dir = match config_dir() {
        Ok(d) => d,
        Err(_) => return,
    };
    let path = dir.join("audit.jsonl");
    let _ = std::fs::create_dir_all(&dir);
    let event = serde_json::json!({
        "ts": now_secs(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    if let Err(e) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()))
    {
        tracing::warn!(path = %path.display(), error = %e, "audit log write failed");
    }
}

pub fn now_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn workflow_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("workflow.json"))
}

pub fn load_workflow() -> anyhow::Result<WorkflowRecord> {
    let p = workflow_path()?;
    if !p.exists() {
        return Ok(WorkflowRecord::default());
    }
    let raw = std::fs::read_to_string(p)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_workflow(record: &WorkflowRecord) -> anyhow::Result<()> {
    let p = workflow_path()?;
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(p, serde_json::to_string_pretty(record)?)?;
    Ok(())
}
