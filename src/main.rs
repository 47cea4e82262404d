use std::fs::File;
use std::io;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rift_pay::app::RiftApp;
use rift_pay::capabilities::LogClipboard;
use rift_pay::config::RiftConfig;
use rift_pay::{process_link_requests, write_ledger};

#[derive(Parser)]
#[command(name = "rift-pay")]
#[command(about = "Issue payment links and walk through a simulated checkout", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue one link per `item,amount` row of a CSV file and print the ledger
    Batch {
        /// Input CSV with an `item,amount` header
        input: String,
    },

    /// Print the sample recent-activity ledger
    Activity,

    /// Issue a link and run the buyer checkout to completion
    Checkout {
        /// Item name / description
        #[arg(short, long)]
        item: String,

        /// Amount in currency units, e.g. 45.5
        #[arg(short, long)]
        amount: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "rift_pay=debug" } else { "rift_pay=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = RiftConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Batch { input } => {
            let file = File::open(&input)
                .with_context(|| format!("Failed to open input file '{}'", input))?;
            process_link_requests(file, io::stdout(), &config)
                .context("Failed to issue links and write ledger")?;
        }
        Commands::Activity => {
            let app = RiftApp::with_sample_activity(config, LogClipboard)
                .context("Invalid configuration")?;
            let now = Utc::now();
            for tx in app.store().recent() {
                println!(
                    "{:<28} {:>10} {:<5} {:<8} {:<14} {}",
                    tx.item_name(),
                    tx.amount(),
                    app.config().currency,
                    tx.status(),
                    tx.age_label(now),
                    tx.link()
                );
            }
            write_ledger(app.store(), io::stdout()).context("Failed to write ledger")?;
        }
        Commands::Checkout { item, amount } => run_checkout(config, &item, &amount).await?,
    }

    Ok(())
}

async fn run_checkout(config: RiftConfig, item: &str, amount: &str) -> Result<()> {
    let currency = config.currency.clone();
    let mut app = RiftApp::new(config, LogClipboard).context("Invalid configuration")?;

    let tx = app
        .generate_link(item, amount)
        .await
        .context("Cannot issue payment link")?;
    app.copy_link(tx.id());
    println!("Link: {}", tx.link());

    let session = app
        .checkout_mut()
        .context("Checkout did not open after issuing the link")?;
    println!(
        "Ready to pay: {} - {} {}",
        session.request().item_name(),
        session.request().amount(),
        currency
    );

    // First press connects the wallet, second starts settlement
    for _ in 0..2 {
        let label = session.actions().pay_label;
        let state = session.pay();
        println!("[{}] -> {:?}", label, state);
    }

    let state = session.wait_until_complete().await;
    println!("Checkout finished: {:?}", state);

    app.back();
    Ok(())
}
