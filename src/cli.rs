//! Command-line front end: the console report plus a few read-only
//! helpers for poking at the operations database.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::builder::PossibleValue;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Table};

use crate::config;
use crate::db;
use crate::models::enums::ViewPreference;
use crate::models::{Claim, FilterInput};
use crate::render::{ConsoleSink, JsonSink, ReportSink};
use crate::report::DashboardSession;

#[derive(Debug, Parser)]
#[command(name = "healthops", version, about = "Healthcare operations reports", long_about = None)]
pub struct Cli {
    /// Path to the operations database
    #[arg(short, long, global = true, env = config::DATABASE_ENV)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(config::default_database_path)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute and print every report section
    Report(ReportArgs),

    /// Show the first rows of the claims table
    PreviewClaims {
        #[arg(short, long, default_value_t = config::DEFAULT_PREVIEW_LIMIT)]
        limit: u32,
    },

    /// List the distinct lab test names
    TestNames,

    /// Verify the required collections and print row counts
    Check,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

#[derive(Debug, clap::Args)]
pub struct ReportArgs {
    /// Lab department, or "All"
    #[arg(long)]
    pub department: Option<String>,

    /// Restrict to these lab tests (repeatable)
    #[arg(long = "test", value_name = "NAME", conflicts_with = "no_tests")]
    pub tests: Vec<String>,

    /// Select no lab tests at all
    #[arg(long)]
    pub no_tests: bool,

    /// First appointment date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last appointment date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// How sections are drawn; auto uses each section's own layout
    #[arg(long, value_enum, default_value_t = ViewPreference::Auto)]
    pub view: ViewPreference,

    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,
}

impl ValueEnum for ViewPreference {
    fn value_variants<'a>() -> &'a [Self] {
        Self::ALL
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.as_str()))
    }
}

impl ReportArgs {
    pub fn filter_input(&self) -> FilterInput {
        let test_names = if self.no_tests {
            Some(Vec::new())
        } else if self.tests.is_empty() {
            None
        } else {
            Some(self.tests.clone())
        };

        FilterInput {
            department: self.department.clone(),
            test_names,
            date_from: self.from.clone(),
            date_to: self.to.clone(),
            view: Some(self.view.as_str().to_string()),
        }
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let db_path = cli.database_path();
    tracing::debug!(path = %db_path.display(), "Using database");

    match &cli.command {
        Command::Report(args) => handle_report(db_path, args),
        Command::PreviewClaims { limit } => handle_preview(db_path, *limit),
        Command::TestNames => handle_test_names(db_path),
        Command::Check => handle_check(db_path),
    }
}

fn handle_report(db_path: PathBuf, args: &ReportArgs) -> anyhow::Result<()> {
    let mut session = DashboardSession::new(db_path);
    session.apply(&args.filter_input());

    let mut sink: Box<dyn ReportSink> = match args.format {
        OutputFormat::Console => Box::new(ConsoleSink::stdout()),
        OutputFormat::Json => Box::new(JsonSink::new(std::io::stdout())),
    };
    session
        .refresh(sink.as_mut())
        .context("Report refresh failed")?;
    Ok(())
}

fn open_verified(db_path: &Path) -> anyhow::Result<rusqlite::Connection> {
    let conn = db::open_database(db_path)
        .with_context(|| format!("Cannot open database at {}", db_path.display()))?;
    db::verify_collections(&conn)?;
    Ok(conn)
}

fn handle_preview(db_path: PathBuf, limit: u32) -> anyhow::Result<()> {
    let limit = limit.min(config::MAX_PREVIEW_LIMIT);
    let conn = open_verified(&db_path)?;
    let claims = db::preview_claims(&conn, limit)?;

    println!("Preview of Claims Table:");
    println!("{}", claims_table(&claims));
    Ok(())
}

fn claims_table(claims: &[Claim]) -> Table {
    let cell = |v: &Option<String>| v.clone().unwrap_or_default();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Status", "Amount", "Department"]);
    for claim in claims {
        table.add_row(vec![
            cell(&claim.id),
            cell(&claim.status),
            claim.amount.map(|a| format!("{a:.2}")).unwrap_or_default(),
            cell(&claim.department),
        ]);
    }
    table
}

fn handle_test_names(db_path: PathBuf) -> anyhow::Result<()> {
    let conn = open_verified(&db_path)?;
    for name in db::list_test_names(&conn)? {
        println!("{name}");
    }
    Ok(())
}

fn handle_check(db_path: PathBuf) -> anyhow::Result<()> {
    let conn = open_verified(&db_path)?;
    let counts = db::count_collections(&conn)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Collection", "Rows"]);
    for count in &counts {
        table.add_row(vec![count.collection.to_string(), count.rows.to_string()]);
    }
    println!("{}: all required collections present", db_path.display());
    println!("{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DepartmentFilter, TestSelection};
    use crate::models::enums::LabDepartment;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("healthops").chain(args.iter().copied())).unwrap()
    }

    fn report_args(cli: Cli) -> ReportArgs {
        match cli.command {
            Command::Report(args) => args,
            other => panic!("expected report, got {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn report_defaults_select_everything() {
        let args = report_args(parse(&["report"]));
        let input = args.filter_input();
        let filter = input.compose();
        assert_eq!(filter.lab.tests, TestSelection::All);
        assert_eq!(filter.lab.department, DepartmentFilter::All);
        assert_eq!(input.view_preference(), ViewPreference::Auto);
        assert_eq!(args.format, OutputFormat::Console);
    }

    #[test]
    fn repeated_tests_and_department() {
        let args = report_args(parse(&[
            "report",
            "--department",
            "hematology",
            "--test",
            "CBC",
            "--test",
            "Coag Panel",
            "--view",
            "table",
            "--format",
            "json",
        ]));
        let input = args.filter_input();
        let filter = input.compose();
        assert_eq!(filter.lab.department, DepartmentFilter::Only(LabDepartment::Hematology));
        assert_eq!(filter.lab.tests, TestSelection::only(["CBC", "Coag Panel"]));
        assert_eq!(input.view_preference(), ViewPreference::Table);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn unknown_view_is_rejected() {
        let result = Cli::try_parse_from(["healthops", "report", "--view", "pie"]);
        assert!(result.is_err());
        let args = report_args(parse(&["report", "--view", "chart"]));
        assert_eq!(args.view, ViewPreference::Chart);
        assert_eq!(args.filter_input().view_preference(), ViewPreference::Chart);
    }

    #[test]
    fn no_tests_means_empty_selection() {
        let args = report_args(parse(&["report", "--no-tests"]));
        assert!(args.filter_input().compose().lab.tests.is_empty());
    }

    #[test]
    fn no_tests_conflicts_with_test() {
        let result = Cli::try_parse_from(["healthops", "report", "--no-tests", "--test", "CBC"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_database_flag() {
        let cli = parse(&["check", "--database", "/tmp/ops.db"]);
        assert_eq!(cli.database_path(), PathBuf::from("/tmp/ops.db"));
    }

    #[test]
    fn preview_limit_default() {
        match parse(&["preview-claims"]).command {
            Command::PreviewClaims { limit } => assert_eq!(limit, config::DEFAULT_PREVIEW_LIMIT),
            other => panic!("expected preview-claims, got {other:?}"),
        }
    }

    #[test]
    fn claims_table_renders_missing_values_blank() {
        let table = claims_table(&[Claim {
            id: Some("c1".into()),
            status: None,
            amount: Some(12.5),
            department: Some("ER".into()),
        }]);
        let rendered = table.to_string();
        assert!(rendered.contains("12.50"));
        assert!(rendered.contains("c1"));
    }
}
