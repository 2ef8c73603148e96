use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ferroscan::telemetry::{LogConfig, init_logging};
use ferroscan::{
    ConfidenceThreshold, DetectionReport, ModelId, Pipeline, RoboflowClient, Settings,
};

#[derive(Parser)]
#[command(name = "ferroscan")]
#[command(about = "Detect iron-gall ink in manuscript images with a hosted detection model")]
struct Cli {
    /// Analyze this image once and print the results instead of opening the window
    #[arg(long, value_name = "IMAGE")]
    image: Option<PathBuf>,

    /// Model version to use (defaults to the first configured model)
    #[arg(long, value_name = "ID")]
    model: Option<String>,

    /// Confidence threshold in [0, 1]
    #[arg(long, value_name = "T")]
    threshold: Option<f64>,

    /// Save the annotated image here
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the raw detector response
    #[arg(long)]
    json: bool,

    /// Settings file (YAML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    init_logging(&LogConfig {
        default_level: if args.verbose { "debug" } else { "info" }.to_string(),
        json_format: args.log_json,
    })?;

    let settings = Settings::load(args.config.as_deref())?;

    match args.image.clone() {
        Some(image_path) => run_headless(&args, settings, image_path),
        None => run_gui(&args, settings),
    }
}

fn build_pipeline(args: &Cli, settings: &Settings) -> ferroscan::Result<Pipeline> {
    let client = RoboflowClient::from_settings(settings)?;
    let mut pipeline = Pipeline::new(Arc::new(client));
    if let Some(debug_dir) = args.debug_out.clone() {
        pipeline = pipeline.with_debug(debug_dir)?;
    }
    Ok(pipeline)
}

fn run_headless(args: &Cli, settings: Settings, image_path: PathBuf) -> anyhow::Result<()> {
    let pipeline = build_pipeline(args, &settings)?;

    let mut config = settings.default_configuration()?;
    if let Some(model) = &args.model {
        config.model_id = ModelId::new(model.clone());
    }
    if let Some(threshold) = args.threshold {
        config.confidence_threshold = ConfidenceThreshold::new(threshold)?;
    }

    tracing::info!("Loading image: {:?}", image_path);
    let upload = std::fs::read(&image_path)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let interaction = runtime.block_on(pipeline.run(&upload, &config))?;
    let analysis = &interaction.analysis;

    println!("Model: {}  Threshold: {}\n", interaction.model_id, analysis.threshold);
    print!("{}", analysis.report);
    if analysis.report.is_empty() {
        println!("{}", DetectionReport::empty_notice(analysis.threshold));
    }

    if args.json {
        println!("\n{}", serde_json::to_string_pretty(&interaction.response.raw)?);
    }

    if let Some(output) = &args.output {
        analysis
            .annotated
            .save(output)
            .map_err(|e| anyhow::anyhow!("Failed to save annotated image: {}", e))?;
        println!("\nAnnotated image saved to {}", output.display());
    }

    Ok(())
}

#[cfg(feature = "gui")]
fn run_gui(args: &Cli, settings: Settings) -> anyhow::Result<()> {
    // A missing credential stops here: the window only reports it
    let pipeline = build_pipeline(args, &settings)
        .map(Arc::new)
        .map_err(|e| {
            tracing::error!("{e}");
            e.to_string()
        });
    ferroscan::gui::run(settings, pipeline)?;
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn run_gui(_args: &Cli, _settings: Settings) -> anyhow::Result<()> {
    anyhow::bail!("built without the `gui` feature; pass --image to analyze a file")
}
