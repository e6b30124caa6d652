use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use resumeschema_core::{
    Config, Diagnostic, ExtraFields, FieldPath, NullPolicy, Record, Report, Severity, ValidationError,
    ViolationCode,
};
use resumeschema_model::{
    advise, advise_at, PaginatedResponse, Resume, ResumeResponse, ResumeSearchParams, ResumeUpdate,
};

/// Config file picked up from the working directory
const DEFAULT_CONFIG: &str = "resumeschema.toml";

/// Environment variable naming a config file
const CONFIG_ENV: &str = "RESUMESCHEMA_CONFIG";

/// resumeschema - validate résumé documents against their record schemas
#[derive(Parser)]
#[command(name = "resumeschema")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: resumeschema.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate JSON documents and write a report
    Validate {
        /// Record type the documents should satisfy
        #[arg(short, long, value_enum)]
        kind: RecordKind,

        /// Documents to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// Apply a partial update to a stored résumé
    Merge {
        /// Résumé to update
        #[arg(short, long)]
        target: PathBuf,

        /// Partial update document
        #[arg(short, long)]
        update: PathBuf,

        /// Write the merged résumé here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treatment of explicit nulls: keep or reject (overrides config)
        #[arg(long)]
        null_policy: Option<NullPolicy>,
    },

    /// List the declared fields of a record type
    Fields {
        #[arg(short, long, value_enum)]
        kind: RecordKind,
    },
}

/// Record types a document can be checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RecordKind {
    Resume,
    Update,
    Response,
    Search,
    Page,
}

impl RecordKind {
    fn name(self) -> &'static str {
        match self {
            Self::Resume => Resume::NAME,
            Self::Update => ResumeUpdate::NAME,
            Self::Response => ResumeResponse::NAME,
            Self::Search => ResumeSearchParams::NAME,
            Self::Page => PaginatedResponse::NAME,
        }
    }

    fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Resume => Resume::FIELDS,
            Self::Update => ResumeUpdate::FIELDS,
            Self::Response => ResumeResponse::FIELDS,
            Self::Search => ResumeSearchParams::FIELDS,
            Self::Page => PaginatedResponse::FIELDS,
        }
    }

    fn extra_fields(self) -> ExtraFields {
        match self {
            Self::Resume => Resume::EXTRA_FIELDS,
            Self::Update => ResumeUpdate::EXTRA_FIELDS,
            Self::Response => ResumeResponse::EXTRA_FIELDS,
            Self::Search => ResumeSearchParams::EXTRA_FIELDS,
            Self::Page => PaginatedResponse::EXTRA_FIELDS,
        }
    }
}

fn main() -> Result<()> {
    // .env may set RUST_LOG or RESUMESCHEMA_CONFIG
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Validate {
            kind,
            files,
            output,
            markdown,
        } => validate_command(&config, kind, &files, &output, markdown.as_deref(), cli.verbose),
        Commands::Merge {
            target,
            update,
            output,
            null_policy,
        } => merge_command(&config, &target, &update, output.as_deref(), null_policy, cli.verbose),
        Commands::Fields { kind } => {
            fields_command(kind);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Resolve the config file: `--config`, then `$RESUMESCHEMA_CONFIG`, then `./resumeschema.toml`
fn load_config(explicit: Option<&Path>, verbose: bool) -> Result<Config> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG);
            default.exists().then_some(default)
        });

    let Some(path) = path else {
        if verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        return Ok(Config::default());
    };

    if verbose {
        eprintln!("{} {}", "Using config:".cyan(), path.display());
    }
    Config::from_file(&path).with_context(|| format!("failed to load config from {}", path.display()))
}

fn read_json(path: &Path) -> Result<Value> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Result of checking one document
struct Checked {
    rejected: bool,
    diagnostics: Vec<Diagnostic>,
}

impl From<Result<Vec<Diagnostic>, ValidationError>> for Checked {
    fn from(result: Result<Vec<Diagnostic>, ValidationError>) -> Self {
        match result {
            Ok(warnings) => Self {
                rejected: false,
                diagnostics: warnings,
            },
            Err(err) => Self {
                rejected: true,
                diagnostics: err.into_violations(),
            },
        }
    }
}

/// Construct `value` as `kind`, then run advisory checks on whatever résumés it holds
fn check_document(kind: RecordKind, value: &Value) -> Checked {
    let result = match kind {
        RecordKind::Resume => Resume::from_value(value).map(|resume| advise(&resume)),
        RecordKind::Response => ResumeResponse::from_value(value).map(|response| advise(&response.resume)),
        RecordKind::Page => PaginatedResponse::from_value(value).map(|page| {
            let results = FieldPath::root().child("results");
            page.results
                .iter()
                .enumerate()
                .flat_map(|(i, response)| advise_at(&response.resume, &results.index(i)))
                .collect::<Vec<_>>()
        }),
        RecordKind::Update => ResumeUpdate::from_value(value).map(|_| Vec::new()),
        RecordKind::Search => ResumeSearchParams::from_value(value).map(|_| Vec::new()),
    };
    result.into()
}

/// Parse `contents` and check it; text that is not JSON rejects the document at `$`
fn parse_document(kind: RecordKind, contents: &str) -> Checked {
    match serde_json::from_str::<Value>(contents) {
        Ok(value) => check_document(kind, &value),
        Err(err) => Checked {
            rejected: true,
            diagnostics: vec![Diagnostic::new(
                ViolationCode::FieldTypeMismatch,
                Severity::Error,
                FieldPath::root(),
                format!("Document is not valid JSON: {}", err),
            )
            .with_expected("JSON document")],
        },
    }
}

/// Check every file as `kind` and collect the results into one report
fn build_report(config: &Config, kind: RecordKind, files: &[PathBuf], verbose: bool) -> Result<Report> {
    let mut report = Report::new();
    report.metadata = Some(json!({
        "record": kind.name(),
        "files": files.iter().map(|file| file.display().to_string()).collect::<Vec<_>>(),
    }));

    for file in files {
        let document = file.display().to_string();
        let contents =
            std::fs::read_to_string(file).with_context(|| format!("failed to read {}", document))?;
        let checked = parse_document(kind, &contents);

        tracing::debug!(
            document = %document,
            rejected = checked.rejected,
            diagnostics = checked.diagnostics.len(),
            "document checked"
        );
        if verbose {
            let verdict = if checked.rejected { "rejected".red() } else { "ok".green() };
            eprintln!("  {} {}: {}", "Checked".cyan(), document, verdict);
        }

        report.record_document(checked.rejected);
        for diagnostic in checked.diagnostics {
            let severity = config.severity.get_severity(diagnostic.code, diagnostic.severity);
            report.add_diagnostic(diagnostic.with_severity(severity).with_document(document.as_str()));
        }
    }

    if config.redact_sensitive_data {
        report.redact();
    }

    Ok(report)
}

/// Validate command - check every file and write report.json
fn validate_command(
    config: &Config,
    kind: RecordKind,
    files: &[PathBuf],
    output: &Path,
    markdown: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("{} {} document(s) as {}", "Validating".cyan(), files.len(), kind.name());
    }

    let report = build_report(config, kind, files, verbose)?;

    report
        .save_to_file(output)
        .with_context(|| format!("failed to write report to {}", output.display()))?;

    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))
            .with_context(|| format!("failed to write markdown report to {}", md_path.display()))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Merge command - validate both documents and apply the update
fn merge_command(
    config: &Config,
    target: &Path,
    update: &Path,
    output: Option<&Path>,
    null_policy: Option<NullPolicy>,
    verbose: bool,
) -> Result<()> {
    let policy = null_policy.unwrap_or(config.update.null_policy);

    let stored = Resume::from_value(&read_json(target)?)
        .with_context(|| format!("{} is not a valid résumé", target.display()))?;
    let patch = ResumeUpdate::from_value(&read_json(update)?)
        .with_context(|| format!("{} is not a valid résumé update", update.display()))?;

    if verbose {
        eprintln!(
            "{} {} (null policy: {})",
            "Applying fields:".cyan(),
            patch.present_fields().join(", "),
            policy
        );
    }

    let merged = patch
        .merged(&stored, policy)
        .with_context(|| format!("{} could not be applied", update.display()))?;
    let json = serde_json::to_string_pretty(&merged)?;

    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            if verbose {
                eprintln!("{} {}", "Merged résumé saved to:".green(), path.display());
            }
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Fields command - print the declared field set
fn fields_command(kind: RecordKind) {
    println!("{}", kind.name().bold().bright_blue());
    println!("Undeclared fields: {}", kind.extra_fields());
    println!();
    for field in kind.fields() {
        println!("  {}", field);
    }
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Error => "ERROR".red().bold(),
        Severity::Warn => "WARN".yellow().bold(),
        Severity::Info => "INFO".cyan(),
    }
}

/// Print report summary to stdout
fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Résumé Validation Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Documents checked:  {}", report.summary.documents_checked);
    if report.summary.documents_rejected > 0 {
        println!(
            "  Documents rejected: {}",
            format!("{}", report.summary.documents_rejected).red().bold()
        );
    } else {
        println!(
            "  Documents rejected: {}",
            format!("{}", report.summary.documents_rejected).green()
        );
    }
    println!("  Total diagnostics: {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }

    println!("  Info:     {}", report.summary.info);
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in &report.diagnostics {
            println!("  [{}] {}: {}", severity_label(diag.severity), diag.code, diag.message);

            match &diag.document {
                Some(document) => println!("    at {} {}", document, diag.path),
                None => println!("    at {}", diag.path),
            }

            if let Some(exp) = &diag.expected {
                println!("    Expected: {}", exp);
            }
            if let Some(act) = &diag.actual {
                println!("    Actual:   {}", act);
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Résumé Validation Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Documents checked: {}\n", report.summary.documents_checked));
    md.push_str(&format!("- Documents rejected: {}\n", report.summary.documents_rejected));
    md.push_str(&format!("- Total diagnostics: {}\n", report.summary.total));
    md.push_str(&format!("- Errors: {}\n", report.summary.errors));
    md.push_str(&format!("- Warnings: {}\n", report.summary.warnings));
    md.push_str(&format!("- Info: {}\n", report.summary.info));
    md.push('\n');

    if report.diagnostics.is_empty() {
        md.push_str("✅ **No issues found!**\n");
        return md;
    }

    md.push_str("## Diagnostics\n\n");
    for diag in &report.diagnostics {
        let severity_emoji = match diag.severity {
            Severity::Error => "❌",
            Severity::Warn => "⚠️",
            Severity::Info => "ℹ️",
        };

        md.push_str(&format!("### {} {} - {}\n\n", severity_emoji, diag.severity, diag.code));
        md.push_str(&format!("{}\n\n", diag.message));

        md.push_str(&format!("**Field:** `{}`", diag.path));
        if let Some(document) = &diag.document {
            md.push_str(&format!(" in {}", document));
        }
        md.push_str("\n\n");

        if let Some(exp) = &diag.expected {
            md.push_str(&format!("**Expected:** `{}`\n\n", exp));
        }
        if let Some(act) = &diag.actual {
            md.push_str(&format!("**Actual:** `{}`\n\n", act));
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use resumeschema_core::ViolationCode;
    use serde_json::json;

    fn resume() -> Value {
        json!({
            "student_key": "s1",
            "name": "Li",
            "gender": "female",
            "id_number": "11010119900307891X",
            "birth_place": "Beijing",
            "phone": "13800001111",
            "email": "a@b.com",
            "birthday": "1990-03-07",
            "highest_degree": "bachelor",
            "graduate_year": 2012,
            "skill_description": "Rust",
            "self_introduction": "Hello",
            "job_intention": {
                "industry": "tech",
                "province": "Beijing",
                "city": "Beijing",
                "salary_min": 5000,
                "salary_max": 9000,
                "job_type": "full-time",
                "category": "engineer"
            },
            "last_updated": "2024-01-01"
        })
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_validate_arguments() {
        let cli = Cli::try_parse_from([
            "resumeschema",
            "validate",
            "--kind",
            "page",
            "a.json",
            "b.json",
            "--markdown",
            "report.md",
        ])
        .unwrap();

        let Commands::Validate { kind, files, output, markdown } = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(kind, RecordKind::Page);
        assert_eq!(files.len(), 2);
        assert_eq!(output, PathBuf::from("report.json"));
        assert_eq!(markdown, Some(PathBuf::from("report.md")));
    }

    #[test]
    fn parses_null_policy_override() {
        let cli = Cli::try_parse_from([
            "resumeschema",
            "merge",
            "--target",
            "r.json",
            "--update",
            "u.json",
            "--null-policy",
            "reject",
        ])
        .unwrap();

        let Commands::Merge { null_policy, .. } = cli.command else {
            panic!("expected merge");
        };
        assert_eq!(null_policy, Some(NullPolicy::Reject));
        assert!(Cli::try_parse_from(["resumeschema", "merge", "-t", "r", "-u", "u", "--null-policy", "erase"]).is_err());
    }

    #[test]
    fn valid_resume_is_not_rejected() {
        let checked = check_document(RecordKind::Resume, &resume());
        assert!(!checked.rejected);
        assert!(checked.diagnostics.is_empty());
    }

    #[test]
    fn advisory_warnings_do_not_reject() {
        let mut value = resume();
        value["job_intention"]["salary_min"] = json!(10000);

        let checked = check_document(RecordKind::Resume, &value);
        assert!(!checked.rejected);
        assert_eq!(checked.diagnostics[0].code, ViolationCode::SalaryRangeInverted);
    }

    #[test]
    fn page_warnings_point_into_results() {
        let mut entry = resume();
        entry["job_intention"]["salary_max"] = json!(1);
        entry["id"] = json!("r-1");
        entry["created_at"] = json!("2024-01-01");
        entry["updated_at"] = json!("2024-01-01");

        let checked = check_document(
            RecordKind::Page,
            &json!({"total": 1, "page": 1, "page_size": 10, "results": [entry]}),
        );
        assert!(!checked.rejected);
        assert_eq!(checked.diagnostics[0].path.as_str(), "results[0].job_intention");
    }

    #[test]
    fn invalid_update_is_rejected() {
        let checked = check_document(RecordKind::Update, &json!({"id_number": "x"}));
        assert!(checked.rejected);
        assert_eq!(checked.diagnostics[0].code, ViolationCode::FieldUnknown);
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[update]\nnull_policy = \"reject\"\n").unwrap();

        let config = load_config(Some(&path), false).unwrap();
        assert_eq!(config.update.null_policy, NullPolicy::Reject);

        assert!(load_config(Some(&dir.path().join("missing.toml")), false).is_err());
    }

    #[test]
    fn read_json_reports_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_json(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn unparseable_document_is_rejected_at_root() {
        let checked = parse_document(RecordKind::Resume, "{ not json");
        assert!(checked.rejected);
        assert_eq!(checked.diagnostics.len(), 1);
        assert_eq!(checked.diagnostics[0].code, ViolationCode::FieldTypeMismatch);
        assert!(checked.diagnostics[0].path.is_root());
    }

    #[test]
    fn report_continues_past_unparseable_files() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.json");
        let valid = dir.path().join("valid.json");
        std::fs::write(&broken, "{ not json").unwrap();
        std::fs::write(&valid, resume().to_string()).unwrap();

        let files = vec![broken.clone(), valid.clone()];
        let report = build_report(&Config::default(), RecordKind::Resume, &files, false).unwrap();

        assert_eq!(report.summary.documents_checked, 2);
        assert_eq!(report.summary.documents_rejected, 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].path.as_str(), "$");
        assert_eq!(report.diagnostics[0].document, Some(broken.display().to_string()));

        let metadata = report.metadata.unwrap();
        assert_eq!(metadata["record"], json!("Resume"));
        assert_eq!(
            metadata["files"],
            json!([broken.display().to_string(), valid.display().to_string()])
        );
    }

    #[test]
    fn missing_file_still_aborts_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![dir.path().join("absent.json")];
        assert!(build_report(&Config::default(), RecordKind::Resume, &files, false).is_err());
    }

    #[test]
    fn markdown_report_lists_fields() {
        let checked = check_document(RecordKind::Resume, &json!({"name": "Li"}));
        let mut report = Report::new();
        report.record_document(checked.rejected);
        for diagnostic in checked.diagnostics {
            report.add_diagnostic(diagnostic.with_document("li.json"));
        }

        let md = generate_markdown_report(&report);
        assert!(md.contains("- Documents rejected: 1"));
        assert!(md.contains("**Field:** `phone` in li.json"));
        assert!(md.contains("FIELD_MISSING"));
    }

    #[test]
    fn markdown_report_without_diagnostics() {
        let mut report = Report::new();
        report.record_document(false);
        assert!(generate_markdown_report(&report).contains("No issues found"));
    }
}
