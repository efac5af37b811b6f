use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "shipcheck",
    version,
    about = "Publish a backend repository without its secrets"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, global = true, help = "Debug logging on stderr (RUST_LOG overrides)")]
    pub verbose: bool,
    #[arg(
        long,
        global = true,
        help = "Policy file (default: ~/.config/shipcheck/policy.toml)"
    )]
    pub policy: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify repository paths as safe or excluded
    Classify {
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(long, help = "Repository root; existing files get a content scan")]
        root: Option<PathBuf>,
    },
    /// Classify every file under a repository root
    Manifest {
        #[arg(long, default_value = ".")]
        root: PathBuf,
        #[arg(long, help = "Save the manifest JSON to this file")]
        write: Option<PathBuf>,
        #[arg(long, default_value_t = false, help = "Print .gitignore lines instead")]
        gitignore: bool,
    },
    /// Report secrets embedded in publishable files
    Scan {
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    Policy {
        #[command(subcommand)]
        command: PolicyCommands,
    },
    Env {
        #[command(subcommand)]
        command: EnvCommands,
    },
    Deploy {
        #[command(subcommand)]
        command: DeployCommands,
    },
    /// Readiness report with next steps
    Check {
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum PolicyCommands {
    Show,
    Gitignore,
}

#[derive(Subcommand, Debug)]
pub enum EnvCommands {
    List,
    Set {
        name: String,
        #[arg(long, help = "Value; read from stdin when omitted")]
        value: Option<String>,
    },
    Unset {
        name: String,
    },
    Confirm,
}

#[derive(Subcommand, Debug)]
pub enum DeployCommands {
    Status,
    Upload {
        #[arg(long, default_value = ".")]
        root: PathBuf,
        #[arg(long, help = "Hosting repository checkout to publish into")]
        dest: PathBuf,
        #[arg(help = "Publish only these files (all must be safe)")]
        files: Vec<String>,
    },
    ConfirmEnv,
    Build {
        #[arg(long, value_enum)]
        outcome: BuildOutcome,
    },
    Reset,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BuildOutcome {
    Success,
    Failure,
}
