use clap::Parser;

use curio::app::App;
use curio::cli::Cli;
use curio::config::AppConfig;
use curio::core::logging;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref()).map_err(curio::CurioError::from)?;
    let _log_guard = logging::init(&config.log_dir(), cli.verbose);
    tracing::info!("Curio v{} starting", curio::VERSION);

    let app = App::open(config).await?;
    app.run(cli.command).await?;
    Ok(())
}
