use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};

use affirmation_adventures::config::GameConfig;
use affirmation_adventures::engine::EngineBuilder;
use affirmation_adventures::screen::GameScreen;

const DEFAULT_CONFIG: &str = "config.json";

const USAGE: &str = "usage: affirmation-adventures [--config <path>] [--debug]";

#[derive(Debug, PartialEq)]
struct Args {
    config: PathBuf,
    debug: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Run(Args),
    Help,
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Command, String> {
    let mut args = Args { config: PathBuf::from(DEFAULT_CONFIG), debug: false };
    let mut iter = argv.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--debug" => args.debug = true,
            "--config" => {
                args.config = iter.next().map(PathBuf::from).ok_or("--config needs a path")?;
            }
            "-h" | "--help" => return Ok(Command::Help),
            other => return Err(format!("unknown argument '{other}'\n{USAGE}")),
        }
    }
    Ok(Command::Run(args))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(a)) => a,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = match GameConfig::load_or_default(&args.config) {
        Ok(c) => c,
        Err(e) => {
            error!("[Main] {e}");
            return ExitCode::FAILURE;
        }
    };
    config.debug_regions |= args.debug;

    info!("[Main] Assets from {}", config.assets_dir.display());
    let screen = GameScreen::new(&config);

    let result = EngineBuilder::new()
        .with_window(config.window.clone())
        .with_ups(config.target_ups)
        .run(screen);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("[Main] {e}");
            ExitCode::FAILURE
        }
    }
}
