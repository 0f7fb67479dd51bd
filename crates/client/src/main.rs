mod app;
mod config;
mod events;
mod game;
mod headless;
mod menu;
mod tui;

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use dingdong::{GameMode, PeerRole};

use config::ClientConfig;
use events::MatchSetup;

#[derive(Parser)]
#[command(name = "dingdong")]
#[command(about = "Two player paddle game over the terminal or the network")]
struct Args {
    #[arg(long, help = "Host an online match")]
    host: bool,

    #[arg(long, value_name = "ADDR", help = "Join an online match (e.g., 127.0.0.1)")]
    join: Option<String>,

    #[arg(short, long, help = "Points needed to win")]
    end_score: Option<i32>,

    #[arg(short, long, help = "UDP port the host listens on")]
    port: Option<u16>,

    #[arg(long, help = "Play one online match without the terminal UI")]
    headless: bool,

    #[arg(short, long, value_name = "PATH", help = "RON config file")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    if let Some(end_score) = args.end_score {
        config.end_score = end_score.clamp(1, config::MAX_END_SCORE);
    }
    if let Some(port) = args.port {
        config.session.port = port;
    }

    if args.headless {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let role = match (args.host, &args.join) {
            (true, None) => PeerRole::Host,
            (false, Some(_)) => PeerRole::Join,
            _ => bail!("--headless needs exactly one of --host or --join <ADDR>"),
        };
        return headless::run(role, args.join, &config);
    }

    env_logger::init();

    let start = match (args.host, args.join) {
        (true, Some(_)) => bail!("--host and --join are mutually exclusive"),
        (true, None) => Some(online_setup(PeerRole::Host, None, &config)),
        (false, Some(address)) => Some(online_setup(PeerRole::Join, Some(address), &config)),
        (false, None) => None,
    };

    tui::run(&config, start)
}

fn online_setup(role: PeerRole, address: Option<String>, config: &ClientConfig) -> MatchSetup {
    MatchSetup {
        mode: GameMode::Online(role),
        end_score: config.end_score,
        address,
    }
}
