//! CLI Module
//!
//! Command-line interface for kartuli using Clap v4.

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::phonology::{transform, transform_detailed};
use crate::speech::{AudioStore, SpeechClient, Synthesizer};

/// Georgian voicing and nasal-insertion transformer
#[derive(Parser, Debug)]
#[command(name = "kartuli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug mode (creates log files in .kartuli/logs/)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service (default)
    Serve {
        /// Bind address override
        #[arg(long)]
        bind: Option<String>,

        /// Port override
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Transform text from the argument or stdin
    Transform {
        /// Text to transform; read from stdin when omitted
        text: Option<String>,

        /// Also print the voiced intermediate and nasal count
        #[arg(long)]
        stages: bool,

        /// Print every stage as a JSON object
        #[arg(long, conflicts_with = "stages")]
        json: bool,
    },

    /// Transform text and synthesize it to a WAV file
    Speak {
        /// Text to speak
        text: String,

        /// Send the text to the provider as-is, without transforming it
        #[arg(long)]
        raw: bool,
    },

    /// List recently generated audio files
    History {
        /// Number of records to show (default: configured history limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration
    Config {
        /// Show full configuration including secrets
        #[arg(short, long)]
        show_secrets: bool,
    },

    /// Log management operations
    Logs {
        #[command(subcommand)]
        operation: LogCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Show log file location and status
    Status,
    /// Clean up old log files
    Clean {
        /// Maximum age in days (default: 7)
        #[arg(short = 'a', long, default_value = "7")]
        days: u64,
    },
}

/// Main CLI entry point
pub async fn run(cli: Cli) -> Result<()> {
    if cli.debug {
        tracing::info!("Debug mode enabled");
    }

    let config_path = cli.config.as_deref();
    let config = || load_config(config_path);

    match cli.command.unwrap_or(Commands::Serve { bind: None, port: None }) {
        Commands::Serve { bind, port } => cmd_serve(config()?, bind, port).await,
        Commands::Transform { text, stages, json } => cmd_transform(text, stages, json),
        Commands::Speak { text, raw } => cmd_speak(&config()?, &text, raw).await,
        Commands::History { limit } => cmd_history(&config()?, limit),
        Commands::Init { force } => cmd_init(force),
        Commands::Config { show_secrets } => cmd_config(&config()?, show_secrets),
        Commands::Logs { operation } => cmd_logs(operation),
    }
}

/// Load configuration from file or defaults
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config = if let Some(path) = config_path {
        tracing::info!("Loading configuration from custom path: {}", path);
        Config::load_from_path(path)?
    } else {
        tracing::debug!("Loading default configuration");
        Config::load()?
    };

    config.validate()?;

    Ok(config)
}

async fn cmd_serve(mut config: Config, bind: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    crate::server::serve(&config).await
}

fn cmd_transform(text: Option<String>, stages: bool, json: bool) -> Result<()> {
    let input = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf.trim_end_matches(['\n', '\r']).to_string()
        }
    };

    if json {
        let detail = transform_detailed(&input);
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else if stages {
        let detail = transform_detailed(&input);
        println!("original:    {}", detail.original);
        println!("voiced:      {}", detail.voiced);
        println!("transformed: {}", detail.transformed);
        println!("nasals:      {}", detail.nasals_inserted);
    } else {
        println!("{}", transform(&input));
    }

    Ok(())
}

async fn cmd_speak(config: &Config, text: &str, raw: bool) -> Result<()> {
    // An explicit request for audio needs a key, even if speech is off for the server.
    let client = SpeechClient::from_config(&config.speech)
        .context("Speech synthesis needs GEMINI_API_KEY or speech.api_key")?;
    let store = Arc::new(AudioStore::new(config.speech.audio_dir.clone()));
    let synth = Synthesizer::new(client, store);

    let spoken = if raw { text.to_string() } else { transform(text) };
    let saved = synth.speak(&spoken).await?;

    println!("{}", spoken);
    println!("Saved: {}", saved.path.display());
    Ok(())
}

fn cmd_history(config: &Config, limit: Option<usize>) -> Result<()> {
    let store = AudioStore::new(config.speech.audio_dir.clone());
    let records = store.recent(limit.unwrap_or(config.speech.history_limit));

    if records.is_empty() {
        println!("No audio files in {}", store.dir().display());
        return Ok(());
    }

    for record in records {
        println!("{}  {}", record.date, record.filename);
    }
    Ok(())
}

/// Initialize configuration file
fn cmd_init(force: bool) -> Result<()> {
    let config_path = Config::system_config_path();

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            config_path.display()
        );
    }

    Config::default().save(&config_path)?;

    println!("Configuration initialized at: {}", config_path.display());
    println!("Set GEMINI_API_KEY to enable speech synthesis.");
    Ok(())
}

/// Show configuration
fn cmd_config(config: &Config, show_secrets: bool) -> Result<()> {
    if show_secrets {
        println!("{:#?}", config);
        return Ok(());
    }

    println!("Listen:        {}", config.server.addr());
    println!("Static dir:    {}", config.server.static_dir.display());
    println!("Log level:     {}", config.logging.level);
    println!("Speech:        {}", if config.speech.is_active() { "enabled" } else { "disabled" });
    println!("  model:       {}", config.speech.model);
    println!("  voice:       {}", config.speech.voice);
    println!("  audio dir:   {}", config.speech.audio_dir.display());
    println!(
        "  API key:     {}",
        if config.speech.api_key.is_some() { "[SET]" } else { "[NOT SET]" }
    );
    println!("\nUse --show-secrets to display API keys");
    Ok(())
}

fn cmd_logs(operation: LogCommands) -> Result<()> {
    use crate::logging;

    match operation {
        LogCommands::Status => {
            let log_dir = logging::log_dir();
            println!("Log directory: {}", log_dir.display());
            match logging::latest_log_file() {
                Some(latest) => println!("Latest log: {}", latest.display()),
                None => println!("No logs found. Run with -d to enable file logging."),
            }
            Ok(())
        }
        LogCommands::Clean { days } => {
            let removed = logging::cleanup_old_logs(days)?;
            println!("Removed {} log file(s) older than {} days", removed, days);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_no_command() {
        let cli = Cli::try_parse_from(["kartuli"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_parse_transform_with_stages() {
        let cli = Cli::try_parse_from(["kartuli", "-d", "transform", "ქართული", "--stages"]).unwrap();
        assert!(cli.debug);
        match cli.command {
            Some(Commands::Transform { text, stages, json }) => {
                assert_eq!(text.as_deref(), Some("ქართული"));
                assert!(stages);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_transform_json() {
        let cli = Cli::try_parse_from(["kartuli", "transform", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Transform { text, stages, json }) => {
                assert!(text.is_none());
                assert!(!stages);
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_transform_json_conflicts_with_stages() {
        assert!(Cli::try_parse_from(["kartuli", "transform", "x", "--json", "--stages"]).is_err());
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["kartuli", "serve", "--port", "9000", "--bind", "127.0.0.1"])
            .unwrap();
        match cli.command {
            Some(Commands::Serve { bind, port }) => {
                assert_eq!(bind.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_logs_clean() {
        let cli = Cli::try_parse_from(["kartuli", "logs", "clean", "-a", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Logs { operation: LogCommands::Clean { days: 3 } })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_port() {
        assert!(Cli::try_parse_from(["kartuli", "serve", "--port", "99999"]).is_err());
    }
}
