use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use tcia_dash::app::App;
use tcia_dash::domain::CollectionId;
use tcia_dash::error::DashError;
use tcia_dash::labels::Labels;
use tcia_dash::nbia::NbiaHttpClient;
use tcia_dash::output::{JsonOutput, OutputMode};
use tcia_dash::tui::Dashboard;

#[derive(Parser)]
#[command(name = "tcia-dash")]
#[command(about = "Terminal dashboard for TCIA cancer imaging collections")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    /// Label config file. Defaults to tcia-dash.json when present.
    #[arg(long, global = true)]
    labels: Option<String>,

    /// Override the NBIA API base URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Print the filtered collection catalog as JSON")]
    Catalog,
    #[command(about = "Fetch and aggregate chart data for a selection")]
    Snapshot(SnapshotArgs),
}

#[derive(Args)]
struct SnapshotArgs {
    #[arg(long = "collection", required = true)]
    collections: Vec<String>,

    /// Modality code narrowing the per-year counts.
    #[arg(long)]
    modality: Option<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(dash) = report.downcast_ref::<DashError>() {
            return ExitCode::from(map_exit_code(dash));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &DashError) -> u8 {
    match error {
        DashError::InvalidCollectionId(_)
        | DashError::LabelsRead(_)
        | DashError::LabelsParse(_) => 2,
        DashError::CatalogHttp(_)
        | DashError::CatalogStatus { .. }
        | DashError::SeriesHttp { .. }
        | DashError::SeriesStatus { .. }
        | DashError::SeriesParse { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let labels = Labels::resolve(cli.labels.as_deref()).into_diagnostic()?;
    let client = match cli.base_url {
        Some(base_url) => NbiaHttpClient::with_base_url(base_url),
        None => NbiaHttpClient::new(),
    }
    .into_diagnostic()?;
    let app = App::new(client, labels);

    match cli.command {
        Some(Commands::Catalog) => {
            let catalog = app.load_catalog(&JsonOutput).into_diagnostic()?;
            JsonOutput::print_catalog(&catalog).into_diagnostic()?;
            Ok(())
        }
        Some(Commands::Snapshot(args)) => {
            let collections = args
                .collections
                .iter()
                .map(|value| value.parse::<CollectionId>())
                .collect::<Result<Vec<_>, _>>()
                .into_diagnostic()?;
            let result = app
                .refresh(&collections, args.modality.as_deref(), &JsonOutput)
                .into_diagnostic()?;
            JsonOutput::print_snapshot(&result.data).into_diagnostic()?;
            Ok(())
        }
        None => match output_mode {
            OutputMode::Interactive => {
                let mut dashboard = Dashboard::new(app);
                dashboard.run().into_diagnostic()?;
                Ok(())
            }
            OutputMode::NonInteractive => Err(miette::Report::msg(
                "command required (try `tcia-dash --help`)",
            )),
        },
    }
}
