use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use serde::Serialize;
use tracing::info;

use kinetic_sdk::domain::{CallOptions, Commitment};
use kinetic_sdk::infra::observability::init_tracing;
use kinetic_sdk::{KineticSdk, SdkConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Query and fund accounts through a Kinetic service", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json: bool,

    /// Commitment for reads and airdrops (Processed, Confirmed, Finalized)
    #[arg(short, long, global = true)]
    commitment: Option<Commitment>,

    /// Mint to operate on instead of the app's default
    #[arg(short, long, global = true)]
    mint: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the application descriptor
    AppConfig,
    /// Show the balance of an account
    Balance { account: String },
    /// Show the signature history of an account
    History { account: String },
    /// List token accounts owned by an account
    TokenAccounts { account: String },
    /// Look up a transaction by signature
    Transaction { signature: String },
    /// Request an airdrop (devnet only)
    Airdrop {
        account: String,
        /// Amount in whole tokens; the mint's default when omitted
        amount: Option<String>,
    },
    /// Lamports needed to keep an account of the given size rent exempt
    Rent { data_length: u64 },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    init_tracing(args.verbose, args.json).context("failed to install tracing subscriber")?;

    let config = SdkConfig::from_env().context("failed to load Kinetic configuration")?;
    info!(endpoint = %config.endpoint, environment = %config.environment, index = config.index, "Connecting");
    let sdk = KineticSdk::connect(&config).await?;

    let options = CallOptions {
        commitment: args.commitment,
        mint: args.mint,
        ..CallOptions::default()
    };

    match args.command {
        Commands::AppConfig => print_json(&*sdk.app_config()?)?,
        Commands::Balance { account } => {
            print_json(&sdk.get_balance(&account, options.commitment).await?)?;
        }
        Commands::History { account } => {
            print_json(&sdk.get_history(&account, &options).await?)?;
        }
        Commands::TokenAccounts { account } => {
            print_json(&sdk.get_token_accounts(&account, &options).await?)?;
        }
        Commands::Transaction { signature } => {
            print_json(&sdk.get_transaction(&signature, options.commitment).await?)?;
        }
        Commands::Airdrop { account, amount } => {
            let response = sdk
                .request_airdrop(&account, amount.as_deref(), &options)
                .await?;
            print_json(&response)?;
        }
        Commands::Rent { data_length } => {
            println!("{}", sdk.get_minimum_rent_exemption_balance(data_length).await?);
        }
    }

    Ok(())
}
