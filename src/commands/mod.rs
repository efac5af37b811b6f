//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `inspect.rs` — classify/manifest/scan/policy/check (read-only).
//! - `deploy.rs` — env and deploy command trees (state-changing).
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod deploy;
pub mod inspect;

pub use deploy::{handle_deploy_commands, handle_env_commands};
pub use inspect::handle_inspect_commands;
