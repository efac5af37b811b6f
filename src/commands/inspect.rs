use crate::cli::{Cli, Commands, PolicyCommands};
use crate::domain::models::{Category, ContentScan, FileEntry, Finding};
use crate::services::classifier::{classify, classify_normalized};
use crate::services::manifest::{build_manifest, render_gitignore, scan_files, walk_files};
use crate::services::output::{print_json, print_one, print_rows};
use crate::services::policy::{normalize_repo_path, Rules};
use crate::services::readiness::build_readiness_report;
use crate::services::scanner::Scanner;
use crate::services::secrets::{missing_required, FileSecretStore};
use crate::services::storage::load_workflow;
use std::path::Path;

pub fn handle_inspect_commands(cli: &Cli, rules: &Rules) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Classify { paths, root } => {
            let entries = classify_paths(rules, paths, root.as_deref())?;
            print_rows(cli.json, &entries, entry_row)?;
        }
        Commands::Manifest {
            root,
            write,
            gitignore,
        } => {
            let manifest = build_manifest(root, rules)?;
            if let Some(out) = write {
                std::fs::write(out, serde_json::to_string_pretty(&manifest)?)?;
                tracing::info!(path = %out.display(), "manifest written");
            }
            if *gitignore {
                print!("{}", render_gitignore(rules, Some(&manifest)));
            } else if cli.json {
                print_json(true, &manifest)?;
            } else {
                for e in manifest.safe.iter().chain(manifest.excluded.iter()) {
                    println!("{}", entry_row(e));
                }
                println!(
                    "safe={} excluded={} digest={}",
                    manifest.safe.len(),
                    manifest.excluded.len(),
                    manifest.digest
                );
            }
        }
        Commands::Scan { root } => {
            let files = walk_files(root, &rules.skip_dirs)?;
            let scan = scan_files(root, rules, &files, &Scanner::new()?)?;
            let clean = scan.findings.is_empty();
            if cli.json {
                print_json(clean, &scan.findings)?;
            } else {
                for f in &scan.findings {
                    println!("{}", finding_row(f));
                }
                for u in &scan.unscanned {
                    println!("{}\tunscanned: {}", u.path, u.reason);
                }
                if clean {
                    println!("no secrets found in {} files", files.len());
                }
            }
            if !clean {
                std::process::exit(1);
            }
        }
        Commands::Policy { command } => match command {
            PolicyCommands::Show => {
                let table = rules.table();
                print_one(cli.json, table, |t| {
                    format!(
                        "allow_override: {}\ndeny: {}\nallow: {}\ndefault: {}\nskip_dirs: {}\nscan_content: {}\nrequired_env: {}",
                        t.allow_override.join(" "),
                        t.deny.join(" "),
                        t.allow.join(" "),
                        t.default_category,
                        t.skip_dirs.join(" "),
                        t.scan_content,
                        t.required_env.join(" ")
                    )
                })?;
            }
            PolicyCommands::Gitignore => {
                let body = render_gitignore(rules, None);
                if cli.json {
                    print_json(true, body)?;
                } else {
                    print!("{}", body);
                }
            }
        },
        Commands::Check { root } => {
            let manifest = build_manifest(root, rules)?;
            let store = FileSecretStore::open_default()?;
            let missing = missing_required(&store, &rules.required_env);
            let record = load_workflow()?;
            let report = build_readiness_report(record.state, &manifest, missing);
            if cli.json {
                print_json(report.overall == "ok", report)?;
            } else {
                println!("readiness: {} (state {})", report.overall, report.state);
                println!(
                    "safe={} excluded={} findings={} missing_env={}",
                    report.safe_count,
                    report.excluded_count,
                    report.findings.len(),
                    report.missing_env.len()
                );
                for r in &report.recommendations {
                    println!("- {}", r);
                }
            }
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn classify_paths(
    rules: &Rules,
    paths: &[String],
    root: Option<&Path>,
) -> anyhow::Result<Vec<FileEntry>> {
    let scanner = match root {
        Some(_) if rules.scan_content => Some(Scanner::new()?),
        _ => None,
    };
    let mut out = Vec::new();
    for raw in paths {
        let entry = classify(rules, raw, &ContentScan::default())?;
        let scanned = match (root, &scanner) {
            (Some(root), Some(scanner))
                if entry.category == Category::Safe && root.join(&entry.path).is_file() =>
            {
                let mut scan = ContentScan::default();
                scanner.scan_file(root, &entry.path, &mut scan)?;
                classify_normalized(rules, normalize_repo_path(raw)?, &scan)
            }
            _ => entry,
        };
        out.push(scanned);
    }
    Ok(out)
}

fn entry_row(e: &FileEntry) -> String {
    format!("{}\t{}\t{}", e.category, e.path, e.reason)
}

fn finding_row(f: &Finding) -> String {
    format!("{}:{}\t{}", f.path, f.line, f.rule)
}
