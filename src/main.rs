use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};

use cairo_chrome::Config;
use cairo_chrome::demo::{self, DemoOptions};
use cairo_chrome::draw::{AntialiasMode, DriverOptions};
use cairo_chrome::theme::ThemeRegistry;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CAIRO_CHROME_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "cairo-chrome")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Render themed widget chrome with the Cairo graphics driver")]
struct Cli {
    /// Where to write the rendered PNG
    #[arg(long, short = 'o', value_name = "FILE", default_value = "cairo-chrome.png")]
    output: PathBuf,

    /// Window width in pixels
    #[arg(long, default_value_t = 480, value_parser = clap::value_parser!(i32).range(1..=8192))]
    width: i32,

    /// Window height in pixels
    #[arg(long, default_value_t = 360, value_parser = clap::value_parser!(i32).range(1..=8192))]
    height: i32,

    /// Box theme (overrides the config file)
    #[arg(long, short = 't', value_name = "NAME")]
    theme: Option<String>,

    /// Color scheme (overrides the config file)
    #[arg(long, short = 's', value_name = "NAME")]
    scheme: Option<String>,

    /// Antialiasing mode: default, on or off
    #[arg(long, value_name = "MODE")]
    antialias: Option<AntialiasMode>,

    /// Read configuration from FILE instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the example configuration to the config location and exit
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,

    /// List the available themes and color schemes and exit
    #[arg(long, action = ArgAction::SetTrue)]
    list_themes: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.list_themes {
        let registry = ThemeRegistry::with_defaults();
        println!("Themes:");
        for theme in registry.themes() {
            println!("  {:<8} {}", theme.name, theme.description);
        }
        println!("Color schemes:");
        for scheme in registry.schemes() {
            println!("  {}", scheme.name);
        }
        return Ok(());
    }

    if cli.init_config {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::get_config_path()?,
        };
        Config::create_default_file(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let mut driver = DriverOptions::from(&config.driver);
    if let Some(mode) = cli.antialias {
        driver.antialias = mode;
    }

    let options = DemoOptions {
        width: cli.width,
        height: cli.height,
        theme: cli.theme.unwrap_or_else(|| config.theme.name.clone()),
        scheme: cli.scheme.unwrap_or_else(|| config.theme.scheme.clone()),
        box_style: config.theme.box_style(),
        driver,
    };
    log::debug!("Demo options: {:?}", options);

    let surface = demo::render(&options)?;
    let mut file = File::create(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;
    surface
        .write_to_png(&mut file)
        .with_context(|| format!("Failed to write PNG to {}", cli.output.display()))?;

    log::info!("Wrote {}", cli.output.display());
    Ok(())
}
