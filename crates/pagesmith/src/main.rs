mod cli;
mod commands;
mod context;
mod logging;
mod output;

use clap::Parser;
use cli::{Cli, Commands, Family};
use commands::video::VideoArgs;
use context::Context;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = Context::new(cli.root, cli.verbose).and_then(|ctx| match cli.command {
        Commands::Build { family } => commands::build::run(&ctx, family),
        Commands::Scenes => commands::build::run(&ctx, Some(Family::Scenes)),
        Commands::Video {
            scene,
            script,
            output,
            dry_run,
            mock_audio,
        } => commands::video::run(
            &ctx,
            VideoArgs {
                scene,
                script,
                output,
                dry_run,
                mock_audio,
            },
        ),
        Commands::Svg {
            composition,
            output,
        } => commands::svg::run(&ctx, &composition, output),
        Commands::Timeline { scene, json } => commands::timeline::run(&ctx, &scene, json),
    });

    match result {
        Ok(completion) => std::process::exit(completion.exit_code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
