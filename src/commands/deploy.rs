use crate::cli::{BuildOutcome, Cli, Commands, DeployCommands, EnvCommands};
use crate::domain::models::{
    DeployEvent, EnvConfirmReport, EnvSetReport, UploadReport, WorkflowRecord, WorkflowStatus,
};
use crate::error::ShipError;
use crate::services::manifest::build_manifest;
use crate::services::output::{print_one, print_rows};
use crate::services::policy::Rules;
use crate::services::publish::{select_entries, DirectoryPublisher, Publisher};
use crate::services::secrets::{list_variables, missing_required, FileSecretStore, SecretStore};
use crate::services::storage::{audit, load_workflow, now_secs, save_workflow};
use crate::services::workflow::{allowed_events, apply, next_state};
use std::io::BufRead;
use std::path::Path;

pub fn handle_env_commands(cli: &Cli, rules: &Rules) -> anyhow::Result<bool> {
    let Commands::Env { command } = &cli.command else {
        return Ok(false);
    };

    let mut store = FileSecretStore::open_default()?;
    match command {
        EnvCommands::List => {
            let vars = list_variables(&store, &rules.required_env);
            print_rows(cli.json, &vars, |v| {
                format!(
                    "{}\t{}\t{}",
                    v.name,
                    if v.present { "set" } else { "missing" },
                    if v.required { "required" } else { "optional" }
                )
            })?;
        }
        EnvCommands::Set { name, value } => {
            let value = match value {
                Some(v) => v.clone(),
                None => read_value_from_stdin()?,
            };
            let outcome = store.set(name, &value)?;
            audit(
                "env.set",
                serde_json::json!({ "name": name, "outcome": outcome.as_str() }),
            );
            let report = EnvSetReport {
                name: name.clone(),
                outcome: outcome.as_str().to_string(),
            };
            print_one(cli.json, report, |r| format!("{} {}", r.name, r.outcome))?;
        }
        EnvCommands::Unset { name } => {
            let removed = store.unset(name)?;
            if removed {
                audit("env.unset", serde_json::json!({ "name": name }));
            }
            print_one(cli.json, removed, |r| {
                if *r {
                    format!("removed {}", name)
                } else {
                    format!("{} was not set", name)
                }
            })?;
        }
        EnvCommands::Confirm => {
            let missing = missing_required(&store, &rules.required_env);
            if !missing.is_empty() {
                return Err(ShipError::MissingEnv(missing).into());
            }
            print_one(cli.json, rules.required_env.clone(), |names| {
                format!("all {} required variables set", names.len())
            })?;
        }
    }
    Ok(true)
}

fn read_value_from_stdin() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let value = line.trim_end_matches(['\r', '\n']).to_string();
    if value.is_empty() {
        anyhow::bail!("no value given (use --value or pipe it on stdin)");
    }
    Ok(value)
}

pub fn handle_deploy_commands(cli: &Cli, rules: &Rules) -> anyhow::Result<bool> {
    let Commands::Deploy { command } = &cli.command else {
        return Ok(false);
    };

    let mut record = load_workflow()?;
    match command {
        DeployCommands::Status => {
            let status = workflow_status(&record);
            print_one(cli.json, status, |s| {
                let next: Vec<String> = s.next.iter().map(|e| e.to_string()).collect();
                format!("state: {}\nnext: {}", s.state, next.join(", "))
            })?;
        }
        DeployCommands::Upload { root, dest, files } => {
            let report = upload(&mut record, rules, root, dest, files)?;
            print_one(cli.json, report, |r| {
                format!(
                    "uploaded {} files to {} ({} held back)",
                    r.published, r.destination, r.excluded
                )
            })?;
        }
        DeployCommands::ConfirmEnv => {
            next_state(record.state, DeployEvent::ConfirmEnv)?;
            let store = FileSecretStore::open_default()?;
            let missing = missing_required(&store, &rules.required_env);
            if !missing.is_empty() {
                return Err(ShipError::MissingEnv(missing).into());
            }
            let changed = apply(&mut record, DeployEvent::ConfirmEnv, now_secs())?;
            if changed {
                save_workflow(&record)?;
                audit(
                    "deploy.confirm_env",
                    serde_json::json!({ "confirmed": rules.required_env }),
                );
            }
            let report = EnvConfirmReport {
                state: record.state,
                confirmed: rules.required_env.clone(),
                changed,
            };
            print_one(cli.json, report, |r| {
                if r.changed {
                    format!("environment confirmed ({} variables)", r.confirmed.len())
                } else {
                    "environment already confirmed".to_string()
                }
            })?;
        }
        DeployCommands::Build { outcome } => {
            let event = match outcome {
                BuildOutcome::Success => DeployEvent::BuildSucceeded,
                BuildOutcome::Failure => DeployEvent::BuildFailed,
            };
            apply(&mut record, event, now_secs())?;
            save_workflow(&record)?;
            audit(
                "deploy.build",
                serde_json::json!({ "event": event, "state": record.state }),
            );
            print_one(cli.json, workflow_status(&record), |s| {
                format!("state: {}", s.state)
            })?;
        }
        DeployCommands::Reset => {
            apply(&mut record, DeployEvent::Reset, now_secs())?;
            save_workflow(&record)?;
            audit("deploy.reset", serde_json::json!({}));
            print_one(cli.json, workflow_status(&record), |s| {
                format!("state: {}", s.state)
            })?;
        }
    }
    Ok(true)
}

fn upload(
    record: &mut WorkflowRecord,
    rules: &Rules,
    root: &Path,
    dest: &Path,
    files: &[String],
) -> anyhow::Result<UploadReport> {
    next_state(record.state, DeployEvent::Upload)?;

    let manifest = build_manifest(root, rules)?;
    let entries = select_entries(&manifest, files)?;
    let publisher = DirectoryPublisher::new(dest);
    publisher.check_outside(root)?;
    publisher.check_destination(rules)?;
    let published = publisher.publish(root, &entries)?;

    apply(record, DeployEvent::Upload, now_secs())?;
    record.uploaded_digest = Some(manifest.digest.clone());
    record.uploaded_files = entries.iter().map(|e| e.path.clone()).collect();
    record.destination = Some(publisher.describe());
    save_workflow(record)?;
    audit(
        "deploy.upload",
        serde_json::json!({
            "destination": publisher.describe(),
            "published": published,
            "digest": manifest.digest,
        }),
    );

    Ok(UploadReport {
        state: record.state,
        destination: publisher.describe(),
        published,
        excluded: manifest.excluded.len(),
        digest: manifest.digest,
    })
}

fn workflow_status(record: &WorkflowRecord) -> WorkflowStatus {
    WorkflowStatus {
        state: record.state,
        next: allowed_events(record.state),
        uploaded_digest: record.uploaded_digest.clone(),
        uploaded_files: record.uploaded_files.len(),
        destination: record.destination.clone(),
        history: record.history.clone(),
    }
}
