//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `policy.rs` — path normalization, glob rules, policy file loading.
//! - `classifier.rs` — pure Safe/Excluded decision for one path.
//! - `scanner.rs` — secret detection inside file contents.
//! - `manifest.rs` — repository walk, partition check, `.gitignore` rendering.
//! - `secrets.rs` — platform secret store and the env contract.
//! - `workflow.rs` — deployment state machine.
//! - `publish.rs` — copying the Safe set into the hosting repo checkout.
//! - `readiness.rs` — readiness report assembly.
//! - `storage.rs` — workflow persistence + audit log.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod classifier;
pub mod manifest;
pub mod output;
pub mod policy;
pub mod publish;
pub mod readiness;
pub mod scanner;
pub mod secrets;
pub mod storage;
pub mod workflow;
