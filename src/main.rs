use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkpress::assets::{AssetCategory, AssetLoader};
use inkpress::error::CoreError;
use inkpress::models::{AppConfig, CallerIdentity};
use inkpress::services::{ArtifactKind, ConversionService};

#[derive(Parser)]
#[command(name = "inkpress")]
#[command(about = "Convert photos into frames for 4-bit e-paper panels")]
struct Cli {
    /// Config file (falls back to CONFIG_FILE, then the embedded default)
    #[arg(long, global = true, env = "CONFIG_FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image and store its preview and panel frame
    Convert {
        /// Source image (PNG, JPEG, BMP, GIF or WebP)
        #[arg(short, long)]
        image: PathBuf,

        /// Palette file name, e.g. spectra6.act
        #[arg(short, long, default_value = "spectra6.act")]
        palette: String,

        /// Session token; a new one is generated when omitted
        #[arg(long)]
        identity: Option<String>,

        /// Send the frame to the panel after converting
        #[arg(long)]
        display: bool,
    },
    /// Send a session's stored frame to the panel
    Display {
        #[arg(long)]
        identity: String,
    },
    /// Send an already packed frame file to the panel
    SendRaw {
        /// Packed 4-bit frame (960000 bytes)
        file: PathBuf,
    },
    /// Manage palette tables
    Palettes {
        #[command(subcommand)]
        action: PaletteAction,
    },
    /// Apply the retention limit to stored artifacts
    Sweep {
        /// Files to keep (defaults to retention.keep_last)
        #[arg(long)]
        keep: Option<usize>,
    },
    /// Copy a stored artifact out of the artifacts directory
    Export {
        #[arg(long)]
        identity: String,

        #[arg(long, value_enum, default_value = "preview")]
        kind: ExportKind,

        #[arg(short, long)]
        output: PathBuf,
    },
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract the default palettes
        #[arg(long)]
        palettes: bool,

        /// Extract config.yaml
        #[arg(long = "config-file")]
        config_file: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

#[derive(Subcommand)]
enum PaletteAction {
    /// List available palettes
    List,
    /// Copy a palette table into the palettes directory
    Add {
        file: PathBuf,

        /// Stored name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove a palette
    Remove { name: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportKind {
    Preview,
    Buffer,
}

impl From<ExportKind> for ArtifactKind {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::Preview => ArtifactKind::Preview,
            ExportKind::Buffer => ArtifactKind::Buffer,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpress=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config_file = cli.config;
    match cli.command {
        Some(Commands::Init {
            palettes,
            config_file: extract_config,
            all,
            force,
            list,
        }) => run_init_command(config_file, palettes, extract_config, all, force, list),
        Some(command) => {
            let (config, service) = open_service(config_file)?;
            report(run_command(command, &config, &service))
        }
        None => {
            run_status_command(config_file);
            Ok(())
        }
    }
}

/// Print the user-facing message for library errors; keep detail in the log
fn report(result: anyhow::Result<()>) -> anyhow::Result<()> {
    if let Err(e) = &result {
        if let Some(core) = e.downcast_ref::<CoreError>() {
            tracing::debug!(kind = ?core.kind(), "{core}");
            eprintln!("{}", core.user_message());
            std::process::exit(1);
        }
    }
    result
}

fn open_service(config_file: Option<PathBuf>) -> anyhow::Result<(AppConfig, ConversionService)> {
    let loader = AssetLoader::new(None, config_file.clone());
    let config = AppConfig::load_from_assets(&loader);

    let loader = loader.with_palettes_dir(config.storage.palettes_dir.clone());
    if let Err(e) = loader.seed_if_configured() {
        tracing::warn!(%e, "Failed to seed assets");
    }

    let service = ConversionService::from_config(&config).context("opening storage")?;
    Ok((config, service))
}

fn run_command(
    command: Commands,
    config: &AppConfig,
    service: &ConversionService,
) -> anyhow::Result<()> {
    match command {
        Commands::Convert {
            image,
            palette,
            identity,
            display,
        } => {
            let identity = match identity {
                Some(token) => CallerIdentity::new(token).map_err(CoreError::from)?,
                None => CallerIdentity::generate(),
            };
            let source =
                fs::read(&image).with_context(|| format!("reading {}", image.display()))?;

            let summary = service.convert_for(&identity, &source, &palette)?;
            println!("identity: {}", summary.identity);
            println!("palette:  {}", summary.palette);
            println!(
                "frame:    {} bytes, preview {} bytes",
                summary.buffer_bytes, summary.preview_bytes
            );
            if summary.swept > 0 {
                println!("swept:    {} old files", summary.swept);
            }

            if display {
                service.display_for(&identity)?;
                println!("Sent to panel.");
            }
        }
        Commands::Display { identity } => {
            service.display_for(&CallerIdentity::new(identity).map_err(CoreError::from)?)?;
            println!("Sent to panel.");
        }
        Commands::SendRaw { file } => {
            let buffer = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            service.send_raw(&buffer)?;
            println!("Sent {} bytes to panel.", buffer.len());
        }
        Commands::Palettes { action } => run_palettes_command(action, service)?,
        Commands::Sweep { keep } => {
            let keep = keep.unwrap_or(config.retention.keep_last);
            let report = service.sweep_keeping(keep)?;
            println!("Kept {} files, removed {}.", report.kept, report.removed.len());
            for name in &report.removed {
                println!("  - {name}");
            }
        }
        Commands::Export {
            identity,
            kind,
            output,
        } => {
            let identity = CallerIdentity::new(identity).map_err(CoreError::from)?;
            let bytes = match ArtifactKind::from(kind) {
                ArtifactKind::Preview => service.preview_for(&identity)?,
                ArtifactKind::Buffer => service.buffer_for(&identity)?,
            };
            fs::write(&output, &bytes)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Wrote {} bytes to {}", bytes.len(), output.display());
        }
        Commands::Init { .. } => unreachable!("init is handled before opening storage"),
    }
    Ok(())
}

fn run_palettes_command(action: PaletteAction, service: &ConversionService) -> anyhow::Result<()> {
    let palettes = service.palettes();
    match action {
        PaletteAction::List => {
            let names = palettes.list_available().map_err(CoreError::from)?;
            if names.is_empty() {
                println!("No palettes installed.");
            }
            for name in names {
                println!("{name}");
            }
        }
        PaletteAction::Add { file, name } => {
            let name = match name {
                Some(name) => name,
                None => file_name_of(&file)?,
            };
            let bytes = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            palettes.store(&name, &bytes).map_err(CoreError::from)?;
            println!("Added {name}");
        }
        PaletteAction::Remove { name } => {
            palettes.delete(&name).map_err(CoreError::from)?;
            println!("Removed {name}");
        }
    }
    Ok(())
}

fn file_name_of(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("{} has no file name", path.display()))
}

fn run_init_command(
    config_file: Option<PathBuf>,
    palettes: bool,
    config: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        println!("Palettes:");
        for f in AssetLoader::list_embedded(AssetCategory::Palettes) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    let mut categories = Vec::new();
    if all || palettes {
        categories.push(AssetCategory::Palettes);
    }
    if all || config {
        categories.push(AssetCategory::Config);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --palettes, or --config-file");
        eprintln!("\nRun 'inkpress init --list' to see embedded assets.");
        std::process::exit(1);
    }

    // Extract palettes where the config says they live
    let loader = AssetLoader::new(None, config_file);
    let app_config = AppConfig::load_from_assets(&loader);
    let loader = loader.with_palettes_dir(app_config.storage.palettes_dir);

    let report = loader.init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command(config_file: Option<PathBuf>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let loader = AssetLoader::new(None, config_file.clone());
    let config = AppConfig::load_from_assets(&loader);

    println!("Inkpress v{VERSION}");
    println!("Photo conversion for 4-bit e-paper panels\n");

    let config_source = match config_file {
        Some(ref path) if path.exists() => path.display().to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };

    println!("Configuration:");
    println!("  Config:    {config_source}");
    println!("  Palettes:  {}", config.storage.palettes_dir.display());
    println!("  Artifacts: {}", config.storage.artifacts_dir.display());
    println!("  Keep last: {} files", config.retention.keep_last);
    println!("  Driver:    {:?}", config.display.driver);

    let embedded = AssetLoader::list_embedded(AssetCategory::Palettes);
    println!("\nEmbedded palettes: {}", embedded.join(", "));

    println!("\nCommands:");
    println!("  inkpress convert -i <image>     Convert an image for the panel");
    println!("  inkpress display --identity <id> Show a stored frame");
    println!("  inkpress send-raw <file>        Show a packed frame file");
    println!("  inkpress palettes list          List palettes");
    println!("  inkpress sweep                  Apply the retention limit");
    println!("  inkpress export ...             Copy a stored preview or frame");
    println!("  inkpress init --all             Extract embedded assets");
    println!("\nRun 'inkpress --help' for details.");
}
