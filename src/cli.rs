use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::data::GameData;
use crate::script::{load_script, replay};
use crate::session::BattleLogSession;

/// battlelog - battle log scrollback and keyword coloring
#[derive(Parser, Debug)]
#[command(name = "battlelog")]
#[command(version)]
#[command(about = "Battle log scrollback and keyword coloring")]
#[command(long_about = "battlelog keeps a bounded scrollback of battle-log lines and wraps
actor, enemy, item and skill names (plus your own keywords) in \\c[N] color codes.

Quick start:
  1. Run 'battlelog init' to write a battlelog.toml with the default settings
  2. Point --data-dir at a game's data/ folder so names can be looked up
  3. Run 'battlelog replay battle.txt' to play a scripted battle through the log

Settings can also be read straight from a game's js/plugins.js with --plugins.")]
pub struct Cli {
    /// Path to config file (defaults to battlelog.toml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Read settings from a game's js/plugins.js instead of the config file
    #[arg(long)]
    pub plugins: Option<PathBuf>,

    /// Game data directory holding Actors.json, Enemies.json, Items.json and Skills.json
    #[arg(short = 'd', long)]
    pub data_dir: Option<PathBuf>,

    /// Strip color codes instead of showing them as terminal colors
    #[arg(long)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Play a battle script through the log and print each rendered frame
    Replay {
        /// Script file: one log line per line, host events as @directives
        script: PathBuf,
    },
    /// Print the colorized form of each line
    Colorize {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Write a default config file if none exists
    Init,
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init => init_config(&cli.config),
        Commands::Replay { script } => {
            let mut session = BattleLogSession::new(&load_config(cli)?, load_game_data(cli)?);
            let steps = load_script(script)?;
            let output = replay(&mut session, &steps, cli.plain);
            std::io::stdout().write_all(output.as_bytes())?;
            Ok(())
        }
        Commands::Colorize { text } => {
            let mut session = BattleLogSession::new(&load_config(cli)?, load_game_data(cli)?);
            let mut stdout = std::io::stdout();
            for line in text {
                writeln!(stdout, "{}", session.colorizer_mut().colorize(line))?;
            }
            Ok(())
        }
    }
}

/// Settings from --plugins, else the config file, else the defaults.
pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(plugins) = &cli.plugins {
        let content = std::fs::read_to_string(plugins)
            .with_context(|| format!("Failed to read '{}'", plugins.display()))?;
        return Config::from_plugins_js(&content)
            .with_context(|| format!("Failed to parse '{}'", plugins.display()));
    }

    if Path::new(&cli.config).exists() {
        Config::from_file(&cli.config)
    } else {
        tracing::info!(path = %cli.config, "no config file, using defaults");
        Ok(Config::default())
    }
}

pub fn load_game_data(cli: &Cli) -> anyhow::Result<GameData> {
    match &cli.data_dir {
        Some(dir) => GameData::load_dir(dir),
        None => Ok(GameData::new()),
    }
}

pub fn init_config(config_path: &str) -> anyhow::Result<()> {
    if Path::new(config_path).exists() {
        println!("{} already exists, leaving it untouched", config_path);
        return Ok(());
    }

    let content = Config::default_toml()?;
    std::fs::write(config_path, content)
        .with_context(|| format!("Failed to write config '{}'", config_path))?;
    println!("Created {}", config_path);
    Ok(())
}
