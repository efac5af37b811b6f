//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep entry/report/state structs in one place.
//! - Avoid cyclic imports between classifier, workflow and storage.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs` — file entries, manifest, workflow record, report structs.
//! - `constants.rs` — built-in rule table and the backend's env contract.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs and integration contracts.
//! Keep schema-impacting changes explicit and synchronized with `docs/contracts/*`.

pub mod constants;
pub mod models;
