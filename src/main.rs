use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fanline::app::AppContext;
use fanline::cli::{commands, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries progress output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fanline=info,tower_http=info")),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let config = commands::load_config(cli.config.as_deref())?;
    let ctx = AppContext::new(config)?;

    let report = if cli.from_snapshot {
        commands::rebuild_from_snapshot(&ctx)?
    } else if let Some(actor) = &cli.actor {
        commands::build(&ctx, actor).await?
    } else {
        anyhow::bail!("an actor URL is required unless --from-snapshot is given");
    };
    commands::print_report(&report);

    if !cli.no_serve {
        commands::serve(&ctx, cli.open).await?;
    }

    Ok(())
}
