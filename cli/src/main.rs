pub mod commands;

use std::process::ExitCode;

use clap::Parser;
use commands::Commands;
use log::error;
use server::coordinator::StartTrigger;
use shared::{
    env, logger,
    models::{camera::default_camera, scene::population::build_scene},
};

/// Distributed ray tracer: one server, any number of workers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    env::init();
    logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Worker(args) => worker::run_worker(args.config()).await.map(|_| ()),
        Commands::Server(args) => {
            let trigger = match args.expect_workers {
                Some(count) => StartTrigger::Workers(count),
                None => StartTrigger::Enter,
            };
            let scene = build_scene(args.seed);
            server::run_server(args.config(), default_camera(), scene, trigger).await
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
