//! Command-line arguments and their dispatch onto [`MemoryClient`].

use clap::{Parser, Subcommand};
use mem0_client::types::{MemoryOptions, Messages, SearchOptions};
use mem0_client::{ClientError, ClientOptions, MemoryClient};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "mem0")]
#[command(about = "Command-line client for the Mem0 memory API")]
#[command(version)]
pub struct Args {
    /// API key (overrides MEM0_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Service URL (overrides MEM0_HOST)
    #[arg(long)]
    pub host: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add memories from one or more user messages
    Add {
        #[arg(required = true)]
        text: Vec<String>,
        #[arg(long)]
        user_id: Option<String>,
        /// Queue extraction and return events instead of memories
        #[arg(long = "async")]
        run_async: bool,
    },
    /// Semantic search
    Search {
        query: String,
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        top_k: Option<u32>,
    },
    /// Fetch one memory
    Get { id: String },
    /// List memories
    List {
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Replace a memory's text
    Update { id: String, text: String },
    /// Delete one memory
    Delete { id: String },
    /// Show a memory's change history
    History { id: String },
    /// List users
    Users,
    /// Fetch one event
    Event { id: String },
    /// List events, optionally from a cursor
    Events {
        #[arg(long, default_value = "")]
        cursor: String,
    },
}

impl Args {
    /// Environment configuration with command-line overrides applied.
    pub fn client_options(&self) -> Result<ClientOptions, ClientError> {
        let mut options = ClientOptions::from_env()?;
        if let Some(ref key) = self.api_key {
            options.api_key = key.clone();
        }
        if let Some(ref host) = self.host {
            options.host = host.clone();
        }
        Ok(options)
    }
}

fn scoped(user_id: Option<String>) -> MemoryOptions {
    MemoryOptions {
        user_id: user_id.unwrap_or_default(),
        ..Default::default()
    }
}

fn deleted(id: &str) -> serde_json::Value {
    serde_json::json!({ "deleted": id })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(
    client: &MemoryClient,
    command: Command,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match command {
        Command::Add {
            text,
            user_id,
            run_async,
        } => {
            let messages = Messages::from(text);
            let options = scoped(user_id);
            if run_async {
                print_json(&client.add_async(messages, &options).await?)
            } else {
                print_json(&client.add(messages, &options).await?)
            }
        }
        Command::Search {
            query,
            user_id,
            top_k,
        } => {
            let options = SearchOptions {
                base: scoped(user_id),
                top_k: top_k.unwrap_or_default(),
                ..Default::default()
            };
            print_json(&client.search(&query, &options).await?)
        }
        Command::Get { id } => print_json(&client.get(&id).await?),
        Command::List {
            user_id,
            page,
            page_size,
        } => {
            let mut base = MemoryOptions {
                page: page.unwrap_or_default(),
                page_size: page_size.unwrap_or_default(),
                ..Default::default()
            };
            if let Some(user_id) = user_id {
                base.filters
                    .insert("user_id".to_string(), serde_json::Value::String(user_id));
            }
            print_json(&client.get_all(&SearchOptions::from(base)).await?)
        }
        Command::Update { id, text } => print_json(&client.update(&id, &text).await?),
        Command::Delete { id } => {
            client.delete(&id).await?;
            tracing::info!(memory_id = %id, "memory deleted");
            print_json(&deleted(&id))
        }
        Command::History { id } => print_json(&client.history(&id).await?),
        Command::Users => print_json(&client.users().await?),
        Command::Event { id } => print_json(&client.event(&id).await?),
        Command::Events { cursor } => print_json(&client.events(&cursor).await?),
    }
}
