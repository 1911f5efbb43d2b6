//! Command-line front end for builder documents.
//!
//! ```text
//! fb-cli check  <doc.json>
//! fb-cli export <doc.json> [--can-commit] [--pretty]
//! ```
//!
//! Logging goes to stderr through `env_logger`; set `RUST_LOG=debug` to see
//! store and save activity.

use fb_core::error::{SaveError, TemplateError};
use fb_core::template::{self, BuilderDocument};
use fb_core::validate::{self, FieldIssue, ValidationIssue};
use fb_editor::session::{BuilderConfig, BuilderSession};
use std::path::{Path, PathBuf};
use std::{env, fs, io, process};
use thiserror::Error;

const USAGE: &str = "usage:\n  fb-cli check <doc.json>\n  fb-cli export <doc.json> [--can-commit] [--pretty]";

#[derive(Debug, Error)]
enum CliError {
    #[error("{}", USAGE)]
    Usage,

    #[error("unknown flag '{0}'")]
    UnknownFlag(String),

    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

#[derive(Debug, PartialEq)]
enum Command {
    Check { path: PathBuf },
    Export { path: PathBuf, can_commit: bool, pretty: bool },
}

fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let (name, rest) = args.split_first().ok_or(CliError::Usage)?;
    let (path, flags) = rest.split_first().ok_or(CliError::Usage)?;
    let path = PathBuf::from(path);
    match name.as_str() {
        "check" => match flags.first() {
            Some(flag) => Err(CliError::UnknownFlag(flag.clone())),
            None => Ok(Command::Check { path }),
        },
        "export" => {
            let mut can_commit = false;
            let mut pretty = false;
            for flag in flags {
                match flag.as_str() {
                    "--can-commit" => can_commit = true,
                    "--pretty" => pretty = true,
                    other => return Err(CliError::UnknownFlag(other.to_string())),
                }
            }
            Ok(Command::Export {
                path,
                can_commit,
                pretty,
            })
        }
        _ => Err(CliError::Usage),
    }
}

/// Everything `check` found wrong with a document.
#[derive(Debug, Default)]
struct Report {
    fields: Vec<FieldIssue>,
    meta: Vec<ValidationIssue>,
}

impl Report {
    fn is_clean(&self) -> bool {
        self.fields.is_empty() && self.meta.is_empty()
    }

    fn lines(&self) -> Vec<String> {
        let fields = self
            .fields
            .iter()
            .map(|f| format!("{}: {}: {}", f.id, f.issue.field, f.issue.message));
        let meta = self
            .meta
            .iter()
            .map(|i| format!("template: {}: {}", i.field, i.message));
        fields.chain(meta).collect()
    }
}

fn load(json: &str) -> Result<BuilderSession, CliError> {
    let doc = BuilderDocument::from_json(json)?;
    Ok(BuilderSession::from_document(doc, BuilderConfig::default())?)
}

fn check(json: &str) -> Result<Report, CliError> {
    let session = load(json)?;
    Ok(Report {
        fields: validate::check_fields(session.elements()),
        meta: validate::validate_meta(session.meta()),
    })
}

fn export(json: &str, can_commit: bool, pretty: bool) -> Result<String, CliError> {
    let session = load(json)?;
    let request = template::prepare_save(
        session.meta(),
        session.elements(),
        session.existing(),
        can_commit,
    )?;
    let out = if pretty {
        serde_json::to_string_pretty(&request)
    } else {
        serde_json::to_string(&request)
    };
    Ok(out.map_err(TemplateError::from)?)
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn run(command: Command) -> Result<bool, CliError> {
    match command {
        Command::Check { path } => {
            let report = check(&read(&path)?)?;
            for line in report.lines() {
                println!("{line}");
            }
            if report.is_clean() {
                println!("✓ {}", path.display());
            }
            Ok(report.is_clean())
        }
        Command::Export {
            path,
            can_commit,
            pretty,
        } => {
            println!("{}", export(&read(&path)?, can_commit, pretty)?);
            Ok(true)
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let result = parse_args(&args).and_then(run);
    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            log::debug!("fb-cli failed: {e:?}");
            eprintln!("fb-cli: {e}");
            process::exit(match e {
                CliError::Usage | CliError::UnknownFlag(_) => 2,
                _ => 1,
            });
        }
    }
}
