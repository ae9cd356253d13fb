//! sorte command-line entry point.
//!
//! Generates lottery tickets and fetches result pages through the
//! persistent page cache. Logging goes to stderr so page content can be
//! piped from stdout.

use std::io::Write;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sorte_client::Downloader;
use sorte_core::{AppConfig, Lottery, PageCache, PageContent};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sorte")]
#[command(about = "Lottery tickets and cached result pages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate lottery tickets
    Bet {
        /// Game name (quina, megasena) or alias (sena)
        game: String,

        /// Numbers per ticket (defaults to the game's minimum)
        #[arg(long)]
        picks: Option<usize>,

        /// How many tickets to generate
        #[arg(long, default_value_t = 1)]
        count: usize,
    },

    /// Fetch a result page, preferring the cache
    Fetch {
        /// Page URL
        url: String,

        /// Always hit the network and skip the cache write-back
        #[arg(long)]
        no_cache: bool,
    },

    /// Demote a cached page to the temp tier
    Evict {
        /// Page URL
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Command::Bet { game, picks, count } => bet(&game, picks, count),
        Command::Fetch { url, no_cache } => {
            let downloader = open_downloader(&config).await?;
            let result = fetch(&downloader, &url, no_cache).await;
            downloader.close().await?;
            result
        }
        Command::Evict { url } => {
            let downloader = open_downloader(&config).await?;
            let result = downloader.evict(&url).await;
            downloader.close().await?;
            Ok(result?)
        }
    }
}

async fn open_downloader(config: &AppConfig) -> Result<Downloader> {
    let cache = PageCache::open(config.resolve_config_dir().as_deref()).await?;
    Ok(Downloader::new(cache, config)?)
}

fn bet(game: &str, picks: Option<usize>, count: usize) -> Result<()> {
    let lottery = Lottery::new(game)?;
    tracing::info!("generating {count} ticket(s) for {}", lottery.display_name());

    for _ in 0..count {
        let ticket = lottery.ticket(picks)?;
        let line = ticket.iter().map(u16::to_string).collect::<Vec<_>>().join(" ");
        println!("{line}");
    }
    Ok(())
}

async fn fetch(downloader: &Downloader, url: &str, no_cache: bool) -> Result<()> {
    let use_cache = if no_cache { Some(false) } else { None };
    let content = downloader.download(url, use_cache).await?;

    match content {
        PageContent::Text(text) => println!("{text}"),
        PageContent::Raw(bytes) => std::io::stdout().write_all(&bytes)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bet_with_defaults() {
        let cli = Cli::try_parse_from(["sorte", "bet", "quina"]).unwrap();
        match cli.command {
            Command::Bet { game, picks, count } => {
                assert_eq!(game, "quina");
                assert_eq!(picks, None);
                assert_eq!(count, 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_bet_with_options() {
        let cli = Cli::try_parse_from(["sorte", "bet", "sena", "--picks", "8", "--count", "3"]).unwrap();
        match cli.command {
            Command::Bet { game, picks, count } => {
                assert_eq!(game, "sena");
                assert_eq!(picks, Some(8));
                assert_eq!(count, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_fetch_no_cache() {
        let cli = Cli::try_parse_from(["sorte", "fetch", "http://example.com", "--no-cache"]).unwrap();
        match cli.command {
            Command::Fetch { url, no_cache } => {
                assert_eq!(url, "http://example.com");
                assert!(no_cache);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_requires_subcommand() {
        assert!(Cli::try_parse_from(["sorte"]).is_err());
    }
}
