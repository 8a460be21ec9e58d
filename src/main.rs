use clap::{Parser, Subcommand};
use robo_parts::config::{self, CollectConfig, ProcessingConfig, RunConfig};
use robo_parts::{collect, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "robo-parts")]
#[command(about = "Generate embeddable avatar part tables from image directories")]
#[command(long_about = "\
Generate embeddable avatar part tables from image directories

Every directory holding .png files is a category. Its images are re-encoded
as AVIF, base64-encoded, and written as one Rust array per category, padded
to a common width. A `name#N` suffix on the directory sets the layer.

Part tree:

  sets/set1/green/
  ├── 000#00Body/          # BODY, layer 0
  │   ├── 000-a.png
  │   └── 001-b.png
  ├── 003#01Eyes/          # EYES, layer 1
  │   └── 000-a.png
  └── 010#02Hat/           # HAT, layer 2
      └── 000-a.png

Generated module:

  pub const EMPTY: &str = \"\";
  pub static PARTS: [[&str; 2]; 3] = [BODY, EYES, HAT];
  pub static PARTS_LENGTH: [u8; 3] = [2, 1, 1];
  pub const BODY: [&str; 2] = [\"...\", \"...\"];
  ...

Run 'robo-parts gen-config' to generate a documented parts.toml.")]
#[command(version)]
struct Cli {
    /// Run configuration file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the configured runs (all, or the named ones)
    Collect {
        /// Run names from parts.toml
        runs: Vec<String>,
    },
    /// Generate one module from SOURCE into OUTPUT without a configured run
    Generate { source: PathBuf, output: PathBuf },
    /// Show what each run would generate, without encoding
    Scan {
        /// Run names from parts.toml
        runs: Vec<String>,
        /// Print plans as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock parts.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Collect { runs } => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let selected = config.select_runs(&runs)?;
            for run in selected {
                println!("==> {}: {} → {}", run.name, run.source.display(), run.output.display());
                collect_run(run, &config.processing)?;
            }
        }
        Command::Generate { source, output } => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let run = RunConfig {
                name: run_name(&source),
                source,
                output,
            };
            collect_run(&run, &config.processing)?;
        }
        Command::Scan { runs, json } => {
            let config = config::load_config(&cli.config)?;
            scan_runs(&config, &runs, json)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Execute one run, printing progress from a dedicated thread.
fn collect_run(
    run: &RunConfig,
    processing: &ProcessingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_category_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = collect::collect(run, processing, Some(tx));
    printer.join().ok();
    output::print_report(&result?);
    Ok(())
}

fn scan_runs(
    config: &CollectConfig,
    runs: &[String],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let selected = config.select_runs(runs)?;
    if json {
        let plans = selected
            .iter()
            .map(|run| Ok((run.name.clone(), collect::plan(&run.source)?)))
            .collect::<Result<std::collections::BTreeMap<_, _>, collect::CollectError>>()?;
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    for run in selected {
        let plan = collect::plan(&run.source)?;
        output::print_plan(&run.name, &plan);
    }
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: the user can constrain down, not up.
fn init_thread_pool(processing: &ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Name an ad-hoc run after its source directory.
fn run_name(source: &Path) -> String {
    source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "generate".to_string())
}
