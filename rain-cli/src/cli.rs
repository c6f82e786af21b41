use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::Text;
use rain_core::{
    Config, FEATURE_LAYOUT, RainPredictor, RawObservation, assets::load_background,
    build_feature_vector,
};

use crate::form;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "rain", version, about = "Predict whether it will rain tomorrow")]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict tomorrow's rain from today's observations.
    Predict {
        /// Model file; defaults to the configured one.
        #[arg(long)]
        model: Option<PathBuf>,

        /// JSON observation file; prompts interactively if absent.
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print the feature vector an observation encodes to.
    Encode {
        /// JSON observation file; prompts interactively if absent.
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Store the model and background image paths.
    Configure {
        #[arg(long)]
        model: Option<PathBuf>,

        #[arg(long)]
        background: Option<PathBuf>,
    },

    /// List the feature names in vector order.
    Layout,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Predict { model, input } => {
                let config = config_for_predict(Config::load(), model.is_some())?;
                tracing::debug!(?config, "Loaded configuration");

                // Fail before asking for any input if the model is unusable.
                let predictor =
                    RainPredictor::from_model_path(config.resolve_model_path(model.as_deref()))?;

                let background = config.background_image.as_deref().and_then(load_background);
                if let Some(image) = background {
                    tracing::debug!("Showing background image {}", image.path.display());
                }

                let observation = read_observation(input)?;
                let prediction = predictor.handle(&observation)?;
                println!("{prediction}");
            }
            Command::Encode { input } => {
                let observation = read_observation(input)?;
                let features = build_feature_vector(&observation)?;
                let json = serde_json::to_string_pretty(&features)
                    .context("Failed to serialize feature vector")?;
                println!("{json}");
            }
            Command::Configure { model, background } => {
                let mut config = Config::load()?;

                if model.is_none() && background.is_none() {
                    configure_interactively(&mut config)?;
                } else {
                    if let Some(path) = model {
                        config.set_model_path(path);
                    }
                    if let Some(path) = background {
                        config.set_background_image(path);
                    }
                }

                let path = config.save()?;
                println!("Saved configuration to {}", path.display());
            }
            Command::Layout => {
                for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
                    println!("{i:>2}  {name}");
                }
            }
        }

        Ok(())
    }
}

/// With `--model` given, a broken config file only costs the background image.
fn config_for_predict(loaded: Result<Config>, has_model_override: bool) -> Result<Config> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e) if has_model_override => {
            tracing::warn!("Ignoring unreadable configuration: {e:#}");
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

fn read_observation(input: Option<PathBuf>) -> Result<RawObservation> {
    let Some(path) = input else {
        return form::collect_observation();
    };

    let file = File::open(&path)
        .with_context(|| format!("Failed to open observation file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse observation file: {}", path.display()))
}

fn configure_interactively(config: &mut Config) -> Result<()> {
    let current_model = display_or_empty(config.model_path.as_ref());
    let model = Text::new("Model file:")
        .with_initial_value(&current_model)
        .prompt()?;
    if !model.trim().is_empty() {
        config.set_model_path(PathBuf::from(model.trim()));
    }

    let current_background = display_or_empty(config.background_image.as_ref());
    let background = Text::new("Background image (optional):")
        .with_initial_value(&current_background)
        .prompt_skippable()?;
    match background.as_deref().map(str::trim) {
        Some("") => config.background_image = None,
        Some(path) => config.set_background_image(PathBuf::from(path)),
        None => {}
    }

    Ok(())
}

fn display_or_empty(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}
