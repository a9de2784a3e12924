use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lowreslove::catalog::PaletteCatalog;
use lowreslove::config::{output_path_in, ConvertOptions, DEFAULT_OUTPUT};
use lowreslove::convert::{convert_batch, ConvertJob};
use lowreslove::io;
use pixel_quant::{Adjustments, QuantizeMode, Quantizer};

#[derive(Parser)]
#[command(name = "lowreslove")]
#[command(about = "Turn photos into low-resolution, fixed-palette pixel art")]
struct Cli {
    /// Extra palette definitions (YAML); overrides PALETTES_FILE
    #[arg(long, global = true)]
    palettes: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one or more images
    Convert {
        /// Input images (any format the decoder understands)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output PNG file (single input only)
        #[arg(short, long, conflicts_with = "out_dir")]
        output: Option<PathBuf>,

        /// Write `<stem>-lowres.png` files into this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Palette name from `lowreslove palettes`, or "auto" to derive one from the image
        #[arg(short, long, default_value = "auto")]
        palette: String,

        /// Brightness shift, -10..10
        #[arg(long, default_value_t = 0, allow_negative_numbers = true,
              value_parser = clap::value_parser!(i32).range(-10..=10))]
        exposure: i32,

        /// Contrast, -10 (flat grey) ..10
        #[arg(long, default_value_t = 0, allow_negative_numbers = true,
              value_parser = clap::value_parser!(i32).range(-10..=10))]
        contrast: i32,

        /// Saturation, -10 (greyscale) ..10
        #[arg(long, default_value_t = 0, allow_negative_numbers = true,
              value_parser = clap::value_parser!(i32).range(-10..=10))]
        chrominance: i32,

        /// Error diffusion strength; 0 disables dithering, sign is ignored
        #[arg(long, default_value_t = 0, allow_negative_numbers = true,
              value_parser = clap::value_parser!(i32).range(-10..=10))]
        dithering: i32,

        /// Width of the low-resolution bounding box
        #[arg(long, default_value_t = 256, value_parser = clap::value_parser!(u32).range(1..=4096))]
        width: u32,

        /// Height of the low-resolution bounding box
        #[arg(long, default_value_t = 128, value_parser = clap::value_parser!(u32).range(1..=4096))]
        height: u32,

        /// Pixel block size of the output image
        #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: u32,

        /// Seed for palette extraction (same seed, same palette)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of colors for "auto" palettes
        #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..=256))]
        colors: u32,

        /// Also write the un-upscaled image (single input only)
        #[arg(long)]
        low_res: Option<PathBuf>,
    },
    /// Print the palette extracted from an image, darkest first
    Palette {
        input: PathBuf,

        #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..=256))]
        colors: u32,

        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the available palettes
    Palettes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lowreslove=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Some(Commands::Convert {
            inputs,
            output,
            out_dir,
            palette,
            exposure,
            contrast,
            chrominance,
            dithering,
            width,
            height,
            scale,
            seed,
            colors,
            low_res,
        }) => {
            let options = ConvertOptions {
                palette,
                adjustments: Adjustments::new(exposure, contrast, chrominance, dithering)?,
                target: (width as usize, height as usize),
                scale: scale as usize,
                seed,
                colors: colors as usize,
            };
            let jobs = plan_jobs(inputs, output, out_dir.as_deref(), low_res)?;
            run_convert_command(jobs, options, cli.palettes.as_deref()).await
        }
        Some(Commands::Palette {
            input,
            colors,
            seed,
        }) => run_palette_command(&input, colors as usize, seed),
        Some(Commands::Palettes) => run_palettes_command(cli.palettes.as_deref()),
        None => {
            run_status_command(cli.palettes.as_deref());
            Ok(())
        }
    }
}

/// Decide the output path(s) of every input.
fn plan_jobs(
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    out_dir: Option<&Path>,
    low_res: Option<PathBuf>,
) -> anyhow::Result<Vec<ConvertJob>> {
    if inputs.len() > 1 {
        if output.is_some() {
            anyhow::bail!("--output takes a single input; use --out-dir for several");
        }
        if low_res.is_some() {
            anyhow::bail!("--low-res takes a single input");
        }
    }

    // Several inputs without --out-dir go next to each other in the working directory.
    let several = inputs.len() > 1;
    let jobs = inputs
        .into_iter()
        .map(|input| {
            let target = match (&output, out_dir) {
                (Some(path), _) => path.clone(),
                (None, Some(dir)) => output_path_in(dir, &input),
                (None, None) if several => output_path_in(Path::new("."), &input),
                (None, None) => PathBuf::from(DEFAULT_OUTPUT),
            };
            let job = ConvertJob::new(input, target);
            match &low_res {
                Some(path) => job.with_low_res(path),
                None => job,
            }
        })
        .collect();
    Ok(jobs)
}

async fn run_convert_command(
    jobs: Vec<ConvertJob>,
    options: ConvertOptions,
    palettes_file: Option<&Path>,
) -> anyhow::Result<()> {
    let catalog = Arc::new(PaletteCatalog::load(palettes_file)?);
    // Fail before any decoding if the palette name is wrong.
    catalog.resolve(&options.palette)?;

    let max_parallel = std::thread::available_parallelism().map_or(1, |n| n.get());
    let total = jobs.len();
    let results = convert_batch(jobs, Arc::new(options), catalog, max_parallel).await;

    let mut failed = 0;
    for (job, result) in results {
        match result {
            Ok(report) => {
                let mode = match report.mode {
                    QuantizeMode::Nearest => "nearest".to_string(),
                    QuantizeMode::Dither { strength } => format!("dither {strength:.1}"),
                };
                println!(
                    "Converted {} -> {} ({}x{} from {}x{}, palette {}, {mode}, {} bytes)",
                    report.input.display(),
                    report.output.display(),
                    report.high_res_size.0,
                    report.high_res_size.1,
                    report.low_res_size.0,
                    report.low_res_size.1,
                    report.palette_name,
                    report.bytes
                );
                if let Some(path) = &report.low_res_output {
                    println!("  low-res image: {}", path.display());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("Failed {}: {e}", job.input.display());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {total} conversions failed");
    }
    Ok(())
}

/// Extract and print a palette without converting
fn run_palette_command(input: &Path, colors: usize, seed: Option<u64>) -> anyhow::Result<()> {
    let source = io::decode_file(input)?;
    let quantizer = Quantizer::new().colors(colors);
    let palette = match seed {
        Some(seed) => quantizer.extract_seeded(&source, seed)?,
        None => quantizer.extract(&source, &mut rand::thread_rng())?,
    };
    for hex in palette.to_hex_strings() {
        println!("{hex}");
    }
    Ok(())
}

fn run_palettes_command(palettes_file: Option<&Path>) -> anyhow::Result<()> {
    let catalog = PaletteCatalog::load(palettes_file)?;
    let width = catalog.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in catalog.iter() {
        println!(
            "{:width$}  {}",
            entry.name,
            entry.palette.to_hex_strings().join(" ")
        );
    }
    println!("{:width$}  (extracted from each image)", "auto");
    Ok(())
}

/// Display version, configuration and available commands
fn run_status_command(palettes_file: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let env_file = std::env::var("PALETTES_FILE").ok();

    println!("Lowreslove v{VERSION}");
    println!("Low-resolution, fixed-palette pixel art from photos\n");

    println!("Environment Variables:");
    println!(
        "  PALETTES_FILE = {}",
        env_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  RUST_LOG      = {}",
        std::env::var("RUST_LOG")
            .ok()
            .as_deref()
            .unwrap_or("lowreslove=warn (default)")
    );

    println!("\nPalettes:");
    match PaletteCatalog::load(palettes_file) {
        Ok(catalog) => println!("  {} + auto", catalog.names().join(", ")),
        Err(e) => println!("  error: {e}"),
    }

    println!("\nCommands:");
    println!("  lowreslove convert   Convert images to pixel art PNGs");
    println!("  lowreslove palette   Print the palette extracted from an image");
    println!("  lowreslove palettes  List available palettes");
    println!("\nRun 'lowreslove --help' for more details.");
}
