//! One-shot command-line client.
//!
//! Connects, runs a single command, prints the typed outcome, exits.

use anyhow::Result;
use clap::{Parser, Subcommand};

use redpepper_client::Client;

/// RedPepper CLI
#[derive(Parser, Debug)]
#[command(name = "redpepper-cli")]
#[command(about = "One-shot CLI for Redis-dialect key-value stores")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a value by key
    Get { key: String },

    /// Store a value under a key
    Set { key: String, value: String },

    /// Delete one or more keys
    Del { keys: Vec<String> },

    /// Report whether a key exists (1 or 0)
    Exists { key: String },

    /// Increment the integer value of a key
    Incr { key: String },

    /// Remaining time-to-live of a key in seconds
    Ttl { key: String },

    /// List keys matching a glob pattern
    Keys { pattern: String },

    /// Print all fields and values of a hash
    Hgetall { key: String },

    /// Store several keys from an interleaved `key value key value` list
    Mset { tokens: Vec<String> },

    /// Check the server is reachable
    Ping,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut client = Client::connect_to(args.server)?;

    match args.command {
        Commands::Get { key } => match client.get(key.as_bytes())? {
            Some(value) => println!("{}", String::from_utf8_lossy(&value)),
            None => println!("(nil)"),
        },
        Commands::Set { key, value } => {
            print_status(client.set(key.as_bytes(), value.as_bytes())?);
        }
        Commands::Del { keys } => {
            let keys: Vec<&[u8]> = keys.iter().map(String::as_bytes).collect();
            println!("{}", client.del_many(&keys)?);
        }
        Commands::Exists { key } => println!("{}", client.exists(key.as_bytes())?),
        Commands::Incr { key } => println!("{}", client.incr(key.as_bytes())?),
        Commands::Ttl { key } => println!("{}", client.ttl(key.as_bytes())?),
        Commands::Keys { pattern } => {
            for key in client.keys(pattern.as_bytes())? {
                println!("{}", String::from_utf8_lossy(&key));
            }
        }
        Commands::Hgetall { key } => {
            for pair in client.hgetall(key.as_bytes())? {
                println!(
                    "{} {}",
                    String::from_utf8_lossy(&pair.key),
                    String::from_utf8_lossy(&pair.value)
                );
            }
        }
        Commands::Mset { tokens } => {
            let tokens: Vec<&[u8]> = tokens.iter().map(String::as_bytes).collect();
            print_status(client.mset_interleaved(&tokens)?);
        }
        Commands::Ping => {
            let pong = client.ping()?;
            println!("{}", String::from_utf8_lossy(&pong));
        }
    }

    Ok(())
}

fn print_status(ok: bool) {
    println!("{}", if ok { "OK" } else { "not OK" });
}
