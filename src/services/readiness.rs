use crate::domain::models::{DeployState, Manifest, ReadinessReport};

pub fn build_readiness_report(
    state: DeployState,
    manifest: &Manifest,
    missing_env: Vec<String>,
) -> ReadinessReport {
    let overall = if manifest.findings.is_empty() && missing_env.is_empty() {
        "ok"
    } else {
        "needs_attention"
    }
    .to_string();

    let mut recommendations = Vec::new();
    if !manifest.findings.is_empty() {
        recommendations.push("Move the values flagged by `shipcheck scan` into platform environment variables; files with findings stay unpublished until then.".to_string());
    }
    let unclassified = manifest
        .excluded
        .iter()
        .filter(|e| e.reason.starts_with("unclassified"))
        .count();
    if unclassified > 0 {
        recommendations.push(format!(
            "{} unclassified file(s) are held back; add allow rules to the policy once confirmed safe.",
            unclassified
        ));
    }
    if !manifest.unscanned.is_empty() {
        recommendations.push(format!(
            "{} file(s) could not be scanned (too large or not text) and are held back; review them by hand or set `scan_content = false`.",
            manifest.unscanned.len()
        ));
    }
    for name in &missing_env {
        recommendations.push(format!(
            "Run `shipcheck env set {}` before `shipcheck deploy confirm-env`.",
            name
        ));
    }
    match state {
        DeployState::Prepared => {
            recommendations.push("Run `shipcheck deploy upload --dest <hosting-repo>` to publish the safe file set.".to_string())
        }
        DeployState::Uploaded => {
            recommendations.push("Run `shipcheck deploy confirm-env` once platform variables are set.".to_string())
        }
        DeployState::EnvConfigured => recommendations.push(
            "Report the platform build with `shipcheck deploy build --outcome success|failure`.".to_string(),
        ),
        DeployState::Deployed => {}
    }

    ReadinessReport {
        overall,
        state,
        safe_count: manifest.safe.len(),
        excluded_count: manifest.excluded.len(),
        findings: manifest.findings.clone(),
        missing_env,
        recommendations,
    }
}
