//! WeChat Pay CLI
//!
//! Command-line interface for placing, querying and signing gateway requests.
//! Credentials are read from the `WXPAY_*` environment variables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "wxpay")]
#[command(about = "WeChat Pay CLI - place, query and sign gateway requests", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a unified order and print the client invocation payload
    Pay {
        /// Merchant order number
        #[arg(long)]
        trade_num: String,

        /// Order description shown to the payer
        #[arg(long)]
        describe: String,

        /// Amount in fen
        #[arg(long)]
        amount: u64,

        /// Payer openid
        #[arg(long)]
        open_id: String,

        /// Originating IP (defaults to this host's outbound address)
        #[arg(long)]
        client_ip: Option<IpAddr>,
    },

    /// Query an order by merchant order number
    Query {
        /// Merchant order number
        trade_num: String,
    },

    /// Sign a set of fields offline
    Sign {
        /// Fields as name=value pairs
        #[arg(required = true)]
        fields: Vec<String>,

        /// Merchant API secret
        #[arg(long, env = "WXPAY_API_KEY", hide_env_values = true)]
        key: String,
    },

    /// Verify a signature over raw data
    Verify {
        /// Data the signature was computed over
        #[arg(long)]
        data: String,

        /// Presented signature
        #[arg(long)]
        sign: String,

        /// Merchant API secret
        #[arg(long, env = "WXPAY_API_KEY", hide_env_values = true)]
        key: String,
    },

    /// Check a payment-result callback body and print the acknowledgement
    Notify {
        /// File holding the callback XML (reads stdin when omitted)
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "wxpay_cli=debug,wxpay_lib=debug"
    } else {
        "wxpay_cli=info,wxpay_lib=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Pay {
            trade_num,
            describe,
            amount,
            open_id,
            client_ip,
        } => {
            commands::pay::run(trade_num, describe, amount, open_id, client_ip).await?;
        }
        Commands::Query { trade_num } => {
            commands::query::run(&trade_num).await?;
        }
        Commands::Sign { fields, key } => {
            commands::sign::run(&fields, &key)?;
        }
        Commands::Verify { data, sign, key } => {
            commands::verify::run(&data, &sign, &key)?;
        }
        Commands::Notify { input } => {
            commands::notify::run(input.as_deref())?;
        }
    }

    Ok(())
}
