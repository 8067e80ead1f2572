//! Replay a pointer script and print the resulting board state.

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: pinboard-replay <script.json>");
        return ExitCode::FAILURE;
    };

    log::info!("Replaying {}", path.display());
    let report = pinboard_replay::Script::load(&path).and_then(|script| pinboard_replay::run(&script));
    match report.map(|report| report.to_json()) {
        Ok(Ok(json)) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Ok(Err(err)) => {
            log::error!("Failed to serialize report: {err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
