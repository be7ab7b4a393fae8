use clap::{Parser, Subcommand};
use pcb_common::db::design::Design;
use pcb_common::db::layout::LayoutResult;
use pcb_common::util::config::Config;
use pcb_common::util::profiler::ScopedTimer;
use pcb_common::util::{check, generator, logger};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for the best placed-and-routed layout of the input design.
    Synth,
    /// Emit a random benchmark design.
    Generate {
        #[arg(long, default_value_t = 8)]
        components: usize,
        #[arg(long, default_value_t = 10)]
        nets: usize,
        #[arg(long, default_value = "inputs/random.json")]
        output: String,
    },
    /// Re-verify a previously written layout against its design.
    Check {
        #[arg(long, value_name = "FILE")]
        layout: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };

    match args.command.unwrap_or(Commands::Synth) {
        Commands::Generate {
            components,
            nets,
            output,
        } => {
            prepare_output_dir(&output)?;
            generator::generate_random_design(&output, components, nets)?;
            log::info!("Generated: {}", output);
        }
        Commands::Synth => {
            if run_synth(&config).is_err() {
                std::process::exit(1);
            }
        }
        Commands::Check { layout } => {
            let layout_path = layout
                .unwrap_or_else(|| PathBuf::from(&config.input.output_file));
            let design = load_design(&config.input.design_file)?;
            let layout = load_layout(&layout_path)?;
            check::run(&design, &layout).map_err(|e| anyhow::anyhow!(e))?;
        }
    }

    Ok(())
}

fn run_synth(config: &Config) -> anyhow::Result<()> {
    let design = load_design(&config.input.design_file)?;
    log::info!(
        "Loaded design '{}': {} components, {} nets",
        config.input.design_file,
        design.components.len(),
        design.net_list().len()
    );

    let timer = ScopedTimer::new("Layout synthesis");
    let mut layout = match pcb_synth::synthesize_layout(&design, &config.synthesis) {
        Ok(layout) => layout,
        Err(e) => {
            log::error!("{}", e);
            log::error!("Consider raising max_iters or enlarging the grid.");
            return Err(anyhow::anyhow!(e));
        }
    };
    drop(timer);

    check::run(&design, &layout).map_err(|e| anyhow::anyhow!("Verification Failed: {}", e))?;

    if log::log_enabled!(log::Level::Debug) {
        for line in render_ascii(&layout) {
            log::debug!("{}", line);
        }
    }

    layout.trim();
    prepare_output_dir(&config.input.output_file)?;
    save_layout(&layout, &config.input.output_file)?;
    log::info!(
        "Wrote layout (score {:.4}, {}x{} trimmed board) to {}",
        layout.score,
        layout.grid_dims.0,
        layout.grid_dims.1,
        config.input.output_file
    );
    Ok(())
}

fn load_design(path: &str) -> anyhow::Result<Design> {
    if !Path::new(path).exists() {
        return Err(anyhow::anyhow!("Input design file missing: {}", path));
    }
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| anyhow::anyhow!("Invalid design JSON in '{}': {}", path, e))
}

fn load_layout(path: &Path) -> anyhow::Result<LayoutResult> {
    let file = File::open(path)
        .map_err(|e| anyhow::anyhow!("Cannot open layout '{}': {}", path.display(), e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| anyhow::anyhow!("Invalid layout JSON in '{}': {}", path.display(), e))
}

fn save_layout(layout: &LayoutResult, path: &str) -> anyhow::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), layout)?;
    Ok(())
}

fn prepare_output_dir(path_str: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path_str).parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            log::info!("Creating output directory: {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Debug dump of the routed board: wire cells carry their net digit,
/// endpoints are starred, free cells are dots.
fn render_ascii(layout: &LayoutResult) -> Vec<String> {
    let (w, h) = layout.grid_dims;
    let mut board = vec![vec!['.'; w as usize]; h as usize];
    for route in &layout.routes {
        let digit = char::from(b'0' + (route.net % 10) as u8);
        for &cell in &route.cells {
            board[cell.y as usize][cell.x as usize] = digit;
        }
        for &cell in [route.cells.first(), route.cells.last()].into_iter().flatten() {
            board[cell.y as usize][cell.x as usize] = '*';
        }
    }
    board.into_iter().map(|row| row.into_iter().collect()).collect()
}
