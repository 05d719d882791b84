//! Ribbed CLI - Command-line interface for parametric ribbed sculptures

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ribbed_engine::{
    ParamWatcher, Params, Pipeline, SceneSummary, UpdateOutcome, WatchEvent, sculptures,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ribbed")]
#[command(about = "Parametric ribbed sculpture generation through code", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in sculptures and their parameters
    List,

    /// Build a sculpture once and print a summary of the scene
    Generate {
        /// Sculpture name (see `ribbed list`)
        sculpture: String,

        /// JSON parameter file
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Override a parameter, e.g. `--set num_ribs=60` or
        /// `--set background_color=0.7,0.85,1`
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild a sculpture whenever its parameter file changes
    Watch {
        /// Sculpture name (see `ribbed list`)
        sculpture: String,

        /// JSON parameter file to watch
        #[arg(short, long)]
        params: PathBuf,

        /// Print summaries as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => run_list(),
        Commands::Generate {
            sculpture,
            params,
            set,
            json,
        } => run_generate(&sculpture, params.as_deref(), &set, json),
        Commands::Watch {
            sculpture,
            params,
            json,
        } => run_watch(&sculpture, &params, json),
    }
}

fn run_list() -> Result<()> {
    for sculpture in sculptures::builtin() {
        let name = sculpture.name();
        let pipeline = Pipeline::new(sculpture)?;
        println!("{} - {}", name, pipeline.sculpture().description());
        for decl in pipeline.registry().iter() {
            println!("    {:<18} {}", decl.name, decl.kind);
        }
        println!();
    }
    Ok(())
}

fn run_generate(sculpture: &str, params_file: Option<&Path>, set: &[String], json: bool) -> Result<()> {
    let mut params = match params_file {
        Some(path) => ribbed_engine::load_params(path)?,
        None => Params::new(),
    };
    for assignment in set {
        params
            .assign(assignment)
            .with_context(|| format!("Invalid --set {}", assignment))?;
    }

    let mut pipeline = Pipeline::by_name(sculpture)?;
    pipeline.update(&params)?;

    let current = pipeline.current();
    print_summary(&current.output.summary(sculpture, current.generation), json)
}

fn run_watch(sculpture: &str, params_file: &Path, json: bool) -> Result<()> {
    let mut pipeline = Pipeline::by_name(sculpture)?;
    let mut watcher = ParamWatcher::new(None)?;
    watcher.watch(params_file)?;

    println!("Watching {} for '{}'", params_file.display(), sculpture);
    println!("Press Ctrl+C to stop\n");

    rebuild(&mut pipeline, sculpture, params_file, json);
    while let Some(event) = watcher.recv() {
        match event {
            WatchEvent::Modified(path) => {
                tracing::debug!("Changed: {}", path.display());
                rebuild(&mut pipeline, sculpture, params_file, json);
            }
            WatchEvent::Error(message) => eprintln!("{}", message),
        }
    }
    Ok(())
}

/// Reload the parameter file and rebuild, reporting failures without exiting
fn rebuild(pipeline: &mut Pipeline, sculpture: &str, params_file: &Path, json: bool) {
    let outcome = ribbed_engine::load_params(params_file)
        .and_then(|params| pipeline.update(&params).map_err(anyhow::Error::from));

    match outcome {
        Ok(UpdateOutcome::Regenerated { generation }) => {
            let summary = pipeline.current().output.summary(sculpture, generation);
            if let Err(e) = print_summary(&summary, json) {
                eprintln!("Error: {:#}", e);
            }
        }
        Ok(UpdateOutcome::Unchanged) => println!("Parameters unchanged"),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!(
                "Keeping generation {} on screen",
                pipeline.current().generation
            );
        }
    }
}

fn print_summary(summary: &SceneSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("{} (generation {})", summary.sculpture, summary.generation);
    println!(
        "  instances:  {} ({} unique meshes)",
        summary.instances, summary.unique_meshes
    );
    println!("  vertices:   {}", summary.vertices);
    println!("  triangles:  {}", summary.triangles);
    let bg = summary.background;
    println!("  background: {:.2}, {:.2}, {:.2}", bg.r, bg.g, bg.b);
    for light in &summary.lights {
        println!(
            "  light:      ({:.1}, {:.1}, {:.1}) color {:.2}, {:.2}, {:.2} x {}",
            light.position.x,
            light.position.y,
            light.position.z,
            light.color.r,
            light.color.g,
            light.color.b,
            light.intensity
        );
    }
    if let Some([min, max]) = summary.bounds {
        println!(
            "  bounds:     ({:.2}, {:.2}, {:.2}) .. ({:.2}, {:.2}, {:.2})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }
    Ok(())
}
