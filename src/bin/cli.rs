// src/bin/cli.rs

//! A small command-line client over the library: issue one command against a
//! server and print the shaped reply.

use anyhow::Result;
use citrine::{Client, ClientConfig, DEFAULT_PORT};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(
    name = "citrine-cli",
    version,
    author,
    about = "Issue commands against a Redis-compatible server"
)]
struct Cli {
    #[clap(subcommand)]
    command: CliCommand,

    #[clap(name = "hostname", long, default_value = "127.0.0.1")]
    host: String,

    #[clap(long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Check that the server is alive.
    Ping,
    /// Get the value of a key.
    Get { key: String },
    /// Set a key to a string value.
    Set { key: String, value: String },
    /// Delete a key.
    Del { key: String },
    /// Increment a counter key.
    Incr { key: String },
    /// List key names matching a glob pattern.
    Keys { pattern: String },
    /// Print the server's INFO report.
    Info,
    /// Issue any registered command by name.
    Call { name: String, args: Vec<String> },
}

/// A current-thread runtime is plenty for a one-shot tool.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
        )
        .compact()
        .init();

    let cli = Cli::parse();

    let config = ClientConfig {
        host: cli.host,
        port: cli.port,
        ..ClientConfig::default()
    };
    let mut client = Client::new(config);
    client.connect().await?;

    match cli.command {
        CliCommand::Ping => {
            let alive = client.ping().await?;
            println!("{}", if alive { "PONG" } else { "(no pong)" });
        }
        CliCommand::Get { key } => match client.get(key.as_bytes()).await? {
            Some(value) => println!("{}", String::from_utf8_lossy(&value)),
            None => println!("(nil)"),
        },
        CliCommand::Set { key, value } => {
            client.set(key.as_bytes(), value.as_bytes()).await?;
            println!("OK");
        }
        CliCommand::Del { key } => {
            let removed = client.delete(key.as_bytes()).await?;
            println!("{}", if removed { "1" } else { "0" });
        }
        CliCommand::Incr { key } => {
            println!("{}", client.incr(key.as_bytes()).await?);
        }
        CliCommand::Keys { pattern } => {
            for key in client.keys(pattern.as_bytes()).await? {
                println!("{}", String::from_utf8_lossy(&key));
            }
        }
        CliCommand::Info => {
            for (field, value) in client.info().await? {
                println!("{field}:{value}");
            }
        }
        CliCommand::Call { name, args } => {
            let arg_bytes: Vec<&[u8]> = args.iter().map(|a| a.as_bytes()).collect();
            let value = client.call(&name, &arg_bytes).await?;
            println!("{value}");
        }
    }

    client.disconnect().await;
    Ok(())
}
