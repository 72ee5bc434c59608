use clap::Parser;

use obj_studio::{config::Cli, Studio, StudioApp};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(error) = run(cli) {
        log::error!("{:#}", error);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config();
    log::info!(
        "Opening {} from {}",
        config.object_file,
        config.object_directory.display()
    );

    let studio = Studio::new(config.clone());
    StudioApp::new(config, studio)?.run()
}
