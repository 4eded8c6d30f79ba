use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use cardgen_core::atlas::{self, Grid};
use cardgen_core::{Category, Config, Generation, Pipeline, assets};
use clap::{Parser, Subcommand, ValueEnum};
use fonts::FontRegistry;
use log::{error, info};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};

#[derive(Parser, Debug)]
#[command(name = "cardgen", version, about = "Render card PNGs and print sheets from CSV data")]
struct Cli {
    /// Project root holding data/, fonts/ and public/.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    #[arg(long, global = true, value_enum, default_value_t = GenerationArg::Large)]
    generation: GenerationArg,
    /// Skip rows with a non-empty Addon column.
    #[arg(long, global = true)]
    ignore_addons: bool,
    /// Extra font directory [default: {root}/fonts]
    #[arg(long, global = true)]
    fonts: Option<PathBuf>,
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GenerationArg {
    Legacy,
    Large,
}

impl From<GenerationArg> for Generation {
    fn from(arg: GenerationArg) -> Self {
        match arg {
            GenerationArg::Legacy => Generation::Legacy,
            GenerationArg::Large => Generation::Large,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render card faces for the given categories, or all of them.
    Cards { categories: Vec<Category> },
    /// Render deck backs and shared backs into misc/.
    Misc,
    /// Render a blank template of every category.
    Templates,
    /// Tile rendered cards into print sheets.
    Atlases,
    /// Mirror atlases/ and misc/ into public/.
    Sync,
    /// Write public/index.html and public/listing.json.
    Listing,
    /// Empty the output root.
    Clean,
    /// cards, misc, atlases, sync and listing in one go.
    Build,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    if let Err(e) = TermLogger::init(level, LogConfig::default(), TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("logger already initialised: {e}");
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("project root {} not found", cli.root.display()))?;
    let mut config = Config::from_env(&root);
    config.generation = cli.generation.into();
    config.ignore_addon_records = cli.ignore_addons;
    if let Some(dir) = &cli.fonts {
        config.fonts_dir = dir.clone();
    }
    Ok(config)
}

fn generate_cards(pipeline: &Pipeline<'_>, categories: &[Category]) -> Result<()> {
    let categories = if categories.is_empty() {
        Category::ALL.to_vec()
    } else {
        categories.to_vec()
    };
    for category in categories {
        pipeline
            .generate(category)
            .with_context(|| format!("failed to generate {category}"))?;
    }
    Ok(())
}

fn build_atlases(config: &Config) -> Result<()> {
    let sheets = atlas::build_all_atlases(
        &atlas::default_groups(config),
        &config.atlases_dir(),
        Grid::default(),
    )
    .context("failed to build atlases")?;
    info!("{} atlas sheets in {}", sheets.len(), config.atlases_dir().display());
    Ok(())
}

fn write_listing(config: &Config) -> Result<()> {
    let listing = assets::build_listing(&config.public_root).context("failed to list public assets")?;
    assets::write_listing(&config.public_root, &listing).context("failed to write listing")?;
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let fonts = || FontRegistry::load(Some(&config.fonts_dir));
    match &cli.command {
        Command::Cards { categories } => {
            let fonts = fonts();
            generate_cards(&Pipeline::new(&config, &fonts), categories)?;
        }
        Command::Misc => {
            let fonts = fonts();
            Pipeline::new(&config, &fonts)
                .generate_misc()
                .context("failed to generate misc cards")?;
        }
        Command::Templates => {
            let fonts = fonts();
            Pipeline::new(&config, &fonts)
                .render_templates()
                .context("failed to render templates")?;
        }
        Command::Atlases => build_atlases(&config)?,
        Command::Sync => {
            assets::sync_public_assets(&config).context("failed to sync public assets")?;
        }
        Command::Listing => write_listing(&config)?,
        Command::Clean => assets::clean_output_root(&config).context("failed to clean output root")?,
        Command::Build => {
            let fonts = fonts();
            let pipeline = Pipeline::new(&config, &fonts);
            generate_cards(&pipeline, &[])?;
            pipeline.generate_misc().context("failed to generate misc cards")?;
            build_atlases(&config)?;
            assets::sync_public_assets(&config).context("failed to sync public assets")?;
            write_listing(&config)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
