//! # Validate Command
//!
//! Validates JSON payload files and request collections against the schemas
//! their `@context` annotations point to.
//!
//! One [`SchemaStore`] serves the whole run, so a schema fetched for the
//! first file is reused by every later file. A file that cannot be read or
//! parsed is reported and the run moves on to the next one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use ldv_core::ValidationError;
use ldv_schema::{
    validate_payload, HttpSchemaLoader, LoaderConfig, SchemaLoader, SchemaStore, WalkOptions,
};

use crate::collection::{is_collection, request_bodies};

/// Arguments for `ldv`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON payload files or request collections to validate.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Only validate core objects; domain objects are neither fetched nor checked.
    #[arg(long)]
    pub core_only: bool,

    /// Per-request timeout for schema fetches, in seconds.
    /// Overrides LDV_FETCH_TIMEOUT_SECS.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

impl ValidateArgs {
    fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            core_only: self.core_only,
        }
    }
}

/// How an input file was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// A single JSON payload.
    Payload,
    /// A request collection whose raw bodies were validated.
    Collection,
}

/// Validation result for one input file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// The input file as given on the command line.
    pub file: PathBuf,
    /// Whether the file was a payload or a request collection.
    pub kind: InputKind,
    /// Number of payloads validated (request bodies for a collection).
    pub payloads: usize,
    /// Validation errors in traversal order, across all payloads.
    pub errors: Vec<ValidationError>,
}

/// Outcome for one input file: a report, or why it could not be processed.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The file was read and every payload in it validated.
    Checked(FileReport),
    /// The file could not be read or parsed.
    Failed {
        /// The input file as given on the command line.
        file: PathBuf,
        /// The error chain, outermost context first.
        error: String,
    },
}

impl FileOutcome {
    fn error_count(&self) -> usize {
        match self {
            FileOutcome::Checked(report) => report.errors.len(),
            FileOutcome::Failed { .. } => 1,
        }
    }
}

/// Report for a whole run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// One outcome per input file, in argument order.
    pub files: Vec<FileOutcome>,
    /// Number of files processed.
    pub checked: usize,
    /// Validation errors plus files that failed to process.
    pub error_count: usize,
}

impl RunReport {
    /// Exit code: 0 if every file was processed cleanly, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.error_count == 0 {
            0
        } else {
            1
        }
    }
}

/// Execute the validate command.
///
/// Returns exit code: 0 on success, 1 on validation failure. Operational
/// errors (bad configuration, HTTP client construction) are returned as
/// `Err` before any file is processed.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let mut config = LoaderConfig::from_env().context("invalid loader configuration")?;
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Some(Duration::from_secs(secs)));
    }
    tracing::debug!(
        timeout = ?config.timeout,
        user_agent = %config.user_agent,
        "schema loader configuration"
    );
    let loader = HttpSchemaLoader::new(&config).context("failed to build schema loader")?;
    let mut store = SchemaStore::new(loader);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = check_files(&mut store, &args.files, args.walk_options(), &mut out, args.json)?;

    tracing::info!(
        documents = store.registry().len(),
        contexts = store.context_count(),
        "schema cache at exit"
    );
    Ok(report.exit_code())
}

/// Validate `files` in order through `store`, writing the report to `out`.
pub fn check_files<L: SchemaLoader, W: Write>(
    store: &mut SchemaStore<L>,
    files: &[PathBuf],
    options: WalkOptions,
    out: &mut W,
    json: bool,
) -> Result<RunReport> {
    let mut outcomes = Vec::with_capacity(files.len());
    for path in files {
        if !json {
            writeln!(out, "Processing {}...", path.display())?;
        }
        let outcome = match process_file(store, path, options) {
            Ok(report) => FileOutcome::Checked(report),
            Err(e) => {
                tracing::warn!(file = %path.display(), "{e:#}");
                FileOutcome::Failed {
                    file: path.clone(),
                    error: format!("{e:#}"),
                }
            }
        };
        if !json {
            write_outcome(out, &outcome)?;
        }
        outcomes.push(outcome);
    }

    let report = RunReport {
        checked: outcomes.len(),
        error_count: outcomes.iter().map(FileOutcome::error_count).sum(),
        files: outcomes,
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &report).context("failed to write report")?;
        writeln!(out)?;
    } else {
        writeln!(
            out,
            "{} file(s) checked, {} error(s)",
            report.checked, report.error_count
        )?;
    }
    Ok(report)
}

/// Validate one file: a plain payload, or every JSON body of a request
/// collection.
pub fn process_file<L: SchemaLoader>(
    store: &mut SchemaStore<L>,
    path: &Path,
    options: WalkOptions,
) -> Result<FileReport> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let document: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {} as JSON", path.display()))?;

    if is_collection(&document) {
        let bodies = request_bodies(&document);
        tracing::info!(
            file = %path.display(),
            requests = bodies.len(),
            "identified as request collection"
        );
        let errors = bodies
            .iter()
            .flat_map(|body| validate_payload(store, body, options))
            .collect();
        Ok(FileReport {
            file: path.to_path_buf(),
            kind: InputKind::Collection,
            payloads: bodies.len(),
            errors,
        })
    } else {
        Ok(FileReport {
            file: path.to_path_buf(),
            kind: InputKind::Payload,
            payloads: 1,
            errors: validate_payload(store, &document, options),
        })
    }
}

fn write_outcome<W: Write>(out: &mut W, outcome: &FileOutcome) -> io::Result<()> {
    match outcome {
        FileOutcome::Checked(report) if report.errors.is_empty() => writeln!(out, "  OK"),
        FileOutcome::Checked(report) => {
            for error in &report.errors {
                writeln!(out, "  {error}")?;
            }
            Ok(())
        }
        FileOutcome::Failed { file, error } => {
            writeln!(out, "  Error processing {}: {error}", file.display())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ldv_schema::MemoryLoader;
    use serde_json::json;

    const EV_CTX: &str = "https://s/refs/heads/main/schema/EvChargingOffer/v1/context.jsonld";
    const EV_URL: &str = "https://s/refs/heads/main/schema/EvChargingOffer/v1/attributes.yaml";

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: ValidateArgs,
    }

    fn loader() -> MemoryLoader {
        MemoryLoader::new().with_document(
            EV_URL,
            "components:\n  schemas:\n    ChargingOffer:\n      type: object\n      required: [tariffModel]\n",
        )
    }

    fn write_json(dir: &tempfile::TempDir, name: &str, value: &serde_json::Value) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn args_require_at_least_one_file() {
        assert!(TestCli::try_parse_from(["ldv"]).is_err());
        let cli = TestCli::try_parse_from(["ldv", "a.json", "b.json", "--core-only"]).unwrap();
        assert_eq!(cli.args.files.len(), 2);
        assert!(cli.args.walk_options().core_only);
        assert_eq!(cli.args.timeout_secs, None);
    }

    #[test]
    fn payload_file_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(
            &dir,
            "offer.json",
            &json!({"offer": {"@context": EV_CTX, "@type": "ChargingOffer"}}),
        );
        let loader = loader();
        let mut store = SchemaStore::new(&loader);
        let report = process_file(&mut store, &path, WalkOptions::default()).unwrap();
        assert_eq!(report.kind, InputKind::Payload);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "offer");
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let loader = loader();
        let mut store = SchemaStore::new(&loader);
        let err = process_file(&mut store, Path::new("/nonexistent/x.json"), WalkOptions::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }

    #[test]
    fn text_report_lists_errors_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_json(&dir, "good.json", &json!({"plain": true}));
        let bad = write_json(
            &dir,
            "bad.json",
            &json!({"@context": EV_CTX, "@type": "ChargingOffer"}),
        );
        let loader = loader();
        let mut store = SchemaStore::new(&loader);
        let mut out = Vec::new();
        let report = check_files(
            &mut store,
            &[good.clone(), bad.clone()],
            WalkOptions::default(),
            &mut out,
            false,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], format!("Processing {}...", good.display()));
        assert_eq!(lines[1], "  OK");
        assert_eq!(lines[2], format!("Processing {}...", bad.display()));
        assert!(lines[3].starts_with("   (ChargingOffer): "), "{}", lines[3]);
        assert_eq!(lines[4], "2 file(s) checked, 1 error(s)");
        assert_eq!(report.exit_code(), 1);
    }
}
