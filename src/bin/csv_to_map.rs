// Converter CLI - Turn a stored batch into an interactive map
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::FmtSubscriber;

use incline_telemetry::application::convert_service::{latest_collected_source, ConvertService};
use incline_telemetry::application::map_service::MapService;
use incline_telemetry::domain::placement::{PlacementMode, DEFAULT_BASE_OFFSET};
use incline_telemetry::infrastructure::leaflet_renderer::LeafletRenderer;

/// Convert collected GPS+inclination data into an interactive map.
#[derive(clap::Parser)]
struct ClArgs {
    /// CSV or JSON batch file; defaults to the newest collected_data_* file
    #[arg()]
    source: Option<PathBuf>,

    /// Output HTML file
    #[arg(default_value = "created_maps/gps_map.html")]
    output: PathBuf,

    /// Marker placement strategy (spread or cluster)
    #[arg(short, long, default_value = "spread")]
    mode: PlacementMode,

    /// Offset ring radius in degrees for spread mode
    #[arg(long, default_value_t = DEFAULT_BASE_OFFSET)]
    base_offset: f64,

    /// Verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbosity: u8,
}

fn main() -> ExitCode {
    let args = ClArgs::parse();

    let tracing_subscriber = FmtSubscriber::builder()
        .with_max_level(match args.verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        })
        .finish();
    tracing::subscriber::set_global_default(tracing_subscriber)
        .expect("setting default tracing subscriber failed");

    let source = match &args.source {
        Some(path) => path.clone(),
        None => match latest_collected_source(Path::new(".")) {
            Some(path) => {
                println!("No file specified. Using most recent: {}", path.display());
                path
            }
            None => {
                eprintln!("No source given and no collected_data_* file found.");
                eprintln!("Usage: csv_to_map <source.csv|source.json> [output.html]");
                return ExitCode::FAILURE;
            }
        },
    };

    let service = ConvertService::new(MapService::new(Arc::new(LeafletRenderer)));
    match service.convert_and_render(&source, &args.output, args.mode, args.base_offset) {
        Ok(rendered) => {
            if rendered.skipped_rows > 0 {
                eprintln!("Warning: skipped {} invalid row(s)", rendered.skipped_rows);
            }
            println!(
                "Map created: {} ({} points)",
                rendered.path.display(),
                rendered.points
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
