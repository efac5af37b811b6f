//! Deployment workflow state machine.
//!
//! ```text
//! Prepared --upload--> Uploaded --confirm_env--> EnvConfigured --build_succeeded--> Deployed
//!                         ^                           |
//!                         +-------build_failed--------+
//! ```
//! `upload` is accepted from any state, `reset` returns to Prepared.

use crate::domain::models::{DeployEvent, DeployState, Transition, WorkflowRecord};
use crate::error::ShipError;

pub fn next_state(state: DeployState, event: DeployEvent) -> Result<DeployState, ShipError> {
    use crate::domain::models::DeployEvent as E;
    use crate::domain::models::DeployState as S;

    let to = match (state, event) {
        (_, E::Upload) => S::Uploaded,
        (_, E::Reset) => S::Prepared,
        (S::Uploaded | S::EnvConfigured, E::ConfirmEnv) => S::EnvConfigured,
        (S::EnvConfigured, E::BuildSucceeded) => S::Deployed,
        (S::EnvConfigured, E::BuildFailed) => S::Uploaded,
        _ => return Err(ShipError::InvalidTransition { state, event }),
    };
    Ok(to)
}

/// Events accepted in `state`, in pipeline order.
pub fn allowed_events(state: DeployState) -> Vec<DeployEvent> {
    [
        DeployEvent::Upload,
        DeployEvent::ConfirmEnv,
        DeployEvent::BuildSucceeded,
        DeployEvent::BuildFailed,
        DeployEvent::Reset,
    ]
    .into_iter()
    .filter(|e| next_state(state, *e).is_ok())
    .collect()
}

/// Applies `event` to the record. A rejected event leaves it untouched.
/// Re-confirming an already configured environment records nothing.
pub fn apply(record: &mut WorkflowRecord, event: DeployEvent, at: u64) -> Result<bool, ShipError> {
    let from = record.state;
    let to = next_state(from, event)?;
    if from == to && event == DeployEvent::ConfirmEnv {
        return Ok(false);
    }
    record.state = to;
    record.history.push(Transition {
        from,
        to,
        event,
        at,
    });
    if event == DeployEvent::Reset {
        record.uploaded_digest = None;
        record.uploaded_files.clear();
        record.destination = None;
    }
    tracing::info!(%from, %to, %event, "workflow transition");
    Ok(true)
}
