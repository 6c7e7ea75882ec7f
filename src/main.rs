use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use relnotes::cli::{run_notes_workflow, NotesWorkflowArgs};
use relnotes::config;
use relnotes::domain::ReleaseKind;
use relnotes::git::Git2Repository;
use relnotes::ui;
use relnotes::verify;

#[derive(Parser)]
#[command(
    name = "relnotes",
    version,
    about = "Compose release notes and check pull requests using emoji PR prefixes"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "More logging (-v info, -vv debug)")]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print release notes for the next release of a release branch
    Notes(NotesArgs),
    /// Check a pull request title and description
    Verify(VerifyArgs),
}

#[derive(clap::Args)]
struct NotesArgs {
    #[arg(long, help = "The tag or commit to start from")]
    from: Option<String>,

    #[arg(long, help = "The release branch to run on (defaults to current)")]
    branch: Option<String>,

    #[arg(short = 'r', long = "release-type", default_value = "final", help = "Type of release: final, alpha, beta or rc")]
    release_type: ReleaseKind,

    #[arg(long, help = "On a 0.Y line, make the next major release 1.0.0 instead of 0.(Y+1)")]
    force_v1: bool,

    #[arg(long, value_delimiter = ',', help = "Comma-separated non-code sections to show (docs,infra,release)")]
    show_others: Option<Vec<String>>,

    #[arg(long, help = "GitHub project in org/repo form, for links to past releases")]
    project: Option<String>,

    #[arg(long, help = "Compose from upstream versions of the local release branches [default: true]")]
    use_upstream: Option<bool>,

    #[arg(long, help = "Fetch the branch's remote before continuing [default: true]")]
    refresh_upstream: Option<bool>,

    #[arg(long, help = "When going from pre-release to final, also print all changes since the last final [default: true]")]
    print_full_final: Option<bool>,
}

#[derive(clap::Args)]
struct VerifyArgs {
    #[arg(long, help = "Pull request title")]
    title: String,

    #[arg(long, default_value = "", help = "Pull request description")]
    body: String,

    #[arg(long, help = "Minimum description length in characters")]
    min_description_length: Option<usize>,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    match args.command {
        Command::Notes(notes) => run_notes(notes, &config),
        Command::Verify(verify) => run_verify(verify, &config),
    }
}

fn run_notes(notes: NotesArgs, config: &config::Config) -> Result<()> {
    let mut workflow = NotesWorkflowArgs::from_config(config);
    workflow.from = notes.from;
    workflow.branch = notes.branch;
    workflow.release_kind = notes.release_type;
    workflow.pre10 = workflow.pre10 && !notes.force_v1;
    if let Some(show_others) = notes.show_others {
        workflow.show_others = show_others;
    }
    if notes.project.is_some() {
        workflow.project = notes.project;
    }
    if let Some(use_upstream) = notes.use_upstream {
        workflow.use_upstream = use_upstream;
    }
    if let Some(refresh_upstream) = notes.refresh_upstream {
        workflow.refresh_upstream = refresh_upstream;
    }
    if let Some(print_full_final) = notes.print_full_final {
        workflow.print_full_final = print_full_final;
    }

    let repo = match Git2Repository::open(".") {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let outcome = match run_notes_workflow(&repo, &workflow) {
        Ok(outcome) => outcome,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    ui::display_status(&format!(
        "next release on {}: {}",
        outcome.branch.name(),
        outcome.notes.next
    ));
    for warning in &outcome.notes.warnings {
        ui::display_boundary_warning(warning);
    }

    let rendered = ui::render_release_notes(
        &outcome.notes,
        outcome.project.as_deref().unwrap_or_default(),
        &outcome.show_others,
    );
    print!("{}", rendered);

    Ok(())
}

fn run_verify(args: VerifyArgs, config: &config::Config) -> Result<()> {
    let min_length = args
        .min_description_length
        .unwrap_or(config.verify.min_description_length);

    let outcomes = verify::run_checks(&args.title, &args.body, min_length);
    for outcome in &outcomes {
        ui::display_check_outcome(outcome);
    }

    if !outcomes.iter().all(verify::CheckOutcome::passed) {
        std::process::exit(1);
    }

    Ok(())
}
