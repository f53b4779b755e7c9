//! pushsync CLI - runs the push server and manages its key.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pushsync::constants::DEFAULT_LISTEN_ADDR;
use pushsync::{commands, Config};

#[derive(Parser, Debug)]
#[command(name = "pushsync", version, about = "Push server and key tooling")]
struct Cli {
    /// Push server base URL [env: PUSHSYNC_SERVER_URL]
    #[arg(long, global = true)]
    server: Option<String>,

    /// Private key PEM file [env: PUSHSYNC_PRIVATE_KEY]
    #[arg(long, global = true)]
    key: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new private key (never overwrites)
    Keygen,
    /// Print the public key as /pubkey serves it
    Pubkey,
    /// Check that the server serves the local public key
    Check,
    /// Register a subscription endpoint with the server
    Register {
        /// Push subscription endpoint URI
        endpoint: String,
    },
    /// Serve /pubkey, /register, /auth/start and the page
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
        listen: SocketAddr,

        /// Page assets served at / [env: PUSHSYNC_STATIC_DIR]
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::from_env().with_overrides(cli.server, cli.key);
    log::debug!("Using config: {config:?}");

    match cli.command {
        Command::Keygen => {
            let public_key = commands::keygen(&config)?;
            println!("Wrote private key to {}", config.private_key.display());
            println!("{public_key}");
        }
        Command::Pubkey => println!("{}", commands::pubkey(&config)?),
        Command::Check => {
            let check = commands::check(&config).await?;
            if !check.matches {
                eprintln!("Served key does not match local key");
                eprintln!("  served: {}", check.served);
                eprintln!("  local:  {}", check.local);
                return Ok(ExitCode::FAILURE);
            }
            println!("Server serves the local key: {}", check.local);
        }
        Command::Register { endpoint } => {
            commands::register(&config, &endpoint).await?;
            println!("Registered {endpoint}");
        }
        Command::Serve { listen, static_dir } => {
            commands::serve(&config.with_static_dir(static_dir), listen).await?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run(Cli::parse()).await
}
