//! `easel`: run unit draws and move pictures between SKP JSON, λSkia and PNG.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use easel_engine::logging::{init_logging, LoggingConfig};
use easel_engine::paint::Color;
use easel_engine::raster::SurfaceConfig;
use log::LevelFilter;

/// Skia picture toolchain: unit draws, SKP JSON and λSkia
#[derive(Parser, Debug)]
#[command(name = "easel")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Log filter in env_logger syntax; overrides -v and RUST_LOG
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one unit draw on a raster surface and save it as PNG
    Draw {
        /// Registered name, e.g. 000_simpleDraw
        name: String,
        /// Output file (default: <name>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        surface: SurfaceArgs,
    },
    /// Write unit__<name>.png and unit__<name>.json for every unit draw
    Units {
        /// Output directory, created if missing
        dir: PathBuf,
        #[command(flatten)]
        surface: SurfaceArgs,
    },
    /// List registered unit draws
    List,
    /// Check an SKP JSON file against the supported command subset
    Verify { input: PathBuf },
    /// Compile SKP JSON to λSkia and print it as `(let test ..)`
    Compile {
        input: PathBuf,
        /// Write the term here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the indented form of an SKP JSON or λSkia file
    Print { input: PathBuf },
    /// Render an SKP JSON or λSkia file to PNG
    Render {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        surface: SurfaceArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct SurfaceArgs {
    /// Surface width in pixels
    #[arg(long, default_value_t = 512)]
    width: u32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 512)]
    height: u32,

    /// Background as #rrggbb or #rrggbbaa
    #[arg(long, value_parser = commands::parse_color, default_value = "#00000000")]
    background: Color,
}

impl From<SurfaceArgs> for SurfaceConfig {
    fn from(args: SurfaceArgs) -> Self {
        SurfaceConfig { width: args.width, height: args.height, background: args.background }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        level: match cli.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        },
        ..LoggingConfig::default()
    });

    match cli.command {
        Command::Draw { name, output, surface } => {
            let output = output.unwrap_or_else(|| PathBuf::from(format!("{name}.png")));
            commands::draw(&name, &output, surface.into())
        }
        Command::Units { dir, surface } => commands::units(&dir, surface.into()),
        Command::List => {
            commands::list();
            Ok(())
        }
        Command::Verify { input } => commands::verify(&input),
        Command::Compile { input, output } => commands::compile(&input, output.as_deref()),
        Command::Print { input } => commands::print(&input),
        Command::Render { input, output, surface } => commands::render(&input, &output, surface.into()),
    }
}
