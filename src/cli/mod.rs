pub mod commands;

use std::path::PathBuf;

use clap::Parser;

use crate::domain::ActorUrl;

#[derive(Debug, Parser)]
#[command(name = "fanline", version)]
#[command(about = "Browse posts from the followers you don't follow back", long_about = None)]
pub struct Cli {
    /// Your profile URL, e.g. https://example.com/@you
    #[arg(value_parser = parse_actor, required_unless_present = "from_snapshot")]
    pub actor: Option<ActorUrl>,

    /// Config file to use instead of ~/.config/fanline/config.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Re-render pages from the existing statuses.json without fetching
    #[arg(long)]
    pub from_snapshot: bool,

    /// Exit after writing pages instead of serving them
    #[arg(long)]
    pub no_serve: bool,

    /// Open the first page in the default browser once the server is up
    #[arg(long, conflicts_with = "no_serve")]
    pub open: bool,
}

fn parse_actor(value: &str) -> Result<ActorUrl, String> {
    value
        .parse()
        .map_err(|_| "expected a profile URL like https://example.com/@you".to_string())
}
