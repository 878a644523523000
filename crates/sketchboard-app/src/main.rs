use clap::Parser;
use sketchboard_app::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.shortcuts {
        print!("{}", sketchboard_app::help_text());
        return ExitCode::SUCCESS;
    }

    log::info!("Starting Sketchboard");
    match sketchboard_app::run(&cli) {
        Ok(summary) => {
            println!(
                "{}: {} shape(s), {} event(s) replayed",
                cli.drawing, summary.shapes, summary.replay.events
            );
            if let Some(path) = summary.svg {
                println!("SVG written to {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
