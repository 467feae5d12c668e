//! Compass CLI application entry point
//!
//! A thin, line-driven front end over the navigation engine. Every line read
//! from stdin is one task or one buffer edit; after each line the current
//! layer is printed.
//!
//! # Usage
//!
//! ```bash
//! # Browse the configured providers
//! compass
//!
//! # Edit a document below the providers, in editor flavor
//! compass --editor notes.json
//!
//! # Convert between formats
//! compass convert notes.json notes.ffon
//!
//! # Where is the configuration?
//! compass config path
//! ```

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use tracing::{debug, info};

use compass::{
    CompassError,
    cli::{Action, Cli, Commands, ConfigCommands, parse_line},
    codec,
    config::CompassConfig,
    engine::{Engine, EngineError, Mode, Outcome},
    logging,
    registry::ProviderRegistry,
};

type Result<T> = std::result::Result<T, CompassError>;

fn main() {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => CompassConfig::load_from(path)?,
        None => CompassConfig::load()?,
    };

    match &cli.command {
        Some(Commands::Convert { input, output }) => convert(input, output),
        Some(Commands::Config { command }) => show_config(command, &cli, &config),
        None => session(&cli, &config),
    }
}

fn convert(input: &Path, output: &Path) -> Result<()> {
    let nodes = codec::load(input)?;
    codec::save(output, &nodes)?;
    println!(
        "{} {} -> {} ({} root node(s))",
        "Converted".green(),
        input.display(),
        output.display(),
        nodes.len()
    );
    Ok(())
}

fn show_config(command: &ConfigCommands, cli: &Cli, config: &CompassConfig) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            let path = match &cli.config {
                Some(path) => path.clone(),
                None => CompassConfig::config_path()?,
            };
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            let content = toml::to_string_pretty(config)
                .map_err(|e| CompassError::InvalidInput(format!("Failed to serialize config: {e}")))?;
            print!("{content}");
        }
    }
    Ok(())
}

fn session(cli: &Cli, config: &CompassConfig) -> Result<()> {
    let mut registry = if cli.no_providers {
        ProviderRegistry::new()
    } else {
        ProviderRegistry::from_config(config)
    };
    registry.init_all();

    let document = match &cli.document {
        Some(path) if path.exists() => codec::load(path)?,
        _ => Vec::new(),
    };
    let mut builder = Engine::builder().config(config).registry(registry).document(document);
    if let Some(flavor) = cli.flavor() {
        builder = builder.flavor(flavor);
    }
    let mut engine = builder.build();
    info!("Session started with {} provider(s)", engine.registry().len());

    render(&engine);
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let text_entry = !engine.mode().is_general();
        let result = match parse_line(&line, text_entry) {
            Action::Quit => break,
            Action::Task(task) => engine.dispatch(task),
            Action::Enter => engine.enter(),
            Action::Escape => engine.escape(),
            Action::Search => engine.open_search(),
            Action::ExtendedSearch => engine.open_extended_search(),
            Action::Commands => engine.open_command_palette(),
            Action::Text(text) => Ok(engine.set_input(&text)),
            Action::Unknown(token) => {
                println!("{} {token}", "Unknown command:".yellow());
                continue;
            }
        };
        report(result);
        render(&engine);
    }

    if let Some(path) = &cli.document {
        codec::save(path, engine.document())?;
        println!("{} {}", "Saved".green(), path.display());
    }
    engine.registry_mut().cleanup_all();
    Ok(())
}

fn report(result: std::result::Result<Outcome, EngineError>) {
    match result {
        Ok(Outcome::Applied) => {}
        Ok(Outcome::Skipped) => debug!("Task skipped"),
        Err(e) => debug!("Task failed: {e}"),
    }
}

fn render(engine: &Engine) {
    let mode = engine.mode();
    println!("{} [{}]", mode.to_string().cyan().bold(), engine.cursor());
    if let Some(session) = engine.registry().active(engine.cursor()) {
        println!("{}", format!("{}: {}", session.display_name(), session.location()).dimmed());
    }

    let overlay = engine.overlay();
    let selected = overlay.selected_index();
    for (i, item) in overlay.visible().iter().enumerate() {
        let label = if item.is_group {
            format!("{}/", item.label).blue().bold()
        } else {
            item.label.normal()
        };
        let label = if i == selected { label.reversed() } else { label };
        match &item.detail {
            Some(detail) => println!("  {label}  {}", detail.dimmed()),
            None => println!("  {label}"),
        }
    }

    match mode {
        Mode::General(_) => {}
        Mode::Insert(_) => println!("{} {}", "edit>".green(), engine.input()),
        Mode::SimpleSearch | Mode::ExtendedSearch | Mode::RunCommand => {
            println!("{} {}", "filter>".green(), engine.input());
        }
    }
    if let Some(message) = engine.message() {
        println!("{}", message.red());
    }
    if let Err(e) = io::stdout().flush() {
        debug!("Failed to flush stdout: {e}");
    }
}
