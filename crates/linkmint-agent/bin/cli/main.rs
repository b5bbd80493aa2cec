mod cli;

use crate::cli::{Command, HistoryCommand, CLI};
use clap::Parser;
use linkmint_agent::{qr_image_url, AgentConfig, LinkAgent, Request, Response};
use linkmint_core::SystemClock;
use linkmint_history::{HistoryStore, JsonFileStore};
use linkmint_shorten::{expand, Orchestration, ShortenConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = CLI::try_parse()?;

    let store = JsonFileStore::new(&config.state_file);
    let history = HistoryStore::open(store, Arc::new(SystemClock)).await?;
    let client = reqwest::Client::new();

    match config.command {
        Command::Shorten { url, race, json } => {
            let orchestration = if race {
                Orchestration::Race
            } else {
                Orchestration::Sequential
            };
            let shorten = match config.fallback_base {
                Some(base) => ShortenConfig::builder()
                    .orchestration(orchestration)
                    .fallback_base(base)
                    .build(),
                None => ShortenConfig::builder().orchestration(orchestration).build(),
            };

            let agent = LinkAgent::new(
                client,
                history,
                AgentConfig {
                    shorten,
                    ..AgentConfig::default()
                },
            );
            let response = agent.dispatch(Request::ShortenAndFetchMetadata {
                url,
                title: None,
                favicon: None,
                page_html: None,
            });

            match response.await {
                Response::Record { entry, .. } => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&entry)?);
                    } else {
                        println!("{}", entry.short_url);
                        if !entry.title.is_empty() {
                            println!("{}", entry.title);
                        }
                    }
                }
                Response::Failure { error, .. } => anyhow::bail!(error),
                other => anyhow::bail!("unexpected response: {:?}", other),
            }
        }

        Command::History { command } => match command {
            HistoryCommand::List { json } => {
                let entries = history.list().await;
                if json {
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                } else {
                    for entry in entries {
                        println!(
                            "{}  {}  {} click(s)  {}",
                            entry.timestamp, entry.short_url, entry.click_count, entry.title
                        );
                    }
                }
            }
            HistoryCommand::Delete {
                short_url,
                timestamp,
            } => {
                if history.delete(&short_url, timestamp).await? {
                    info!(short_url = %short_url, "history entry deleted");
                } else {
                    anyhow::bail!("no entry matches {} at {}", short_url, timestamp);
                }
            }
            HistoryCommand::Clear => {
                history.clear().await?;
                info!("history cleared");
            }
        },

        Command::Expand { short_url } => {
            let resolved = expand::expand(&client, &short_url).await?;
            println!("{}", resolved);
        }

        Command::Qr { url, size } => {
            println!("{}", qr_image_url(&url, size));
        }
    }

    Ok(())
}
