use std::sync::Arc;

use clap::{Parser, Subcommand};
use eyre::{Error, Result};
use log::info;
use quoter::config::Config;
use quoter::core::serve;
use quoter::sync::run_publisher;
use quoter::utils::app_context::AppContext;
use quoter::utils::logger::setup_logger;
use serde::Serialize;
use tokio::sync::watch;

/// Uniswap V2 pricing service
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Command to run, `serve` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand)]
enum Commands {
    /// Run the gas price refresh triggers until Ctrl-C
    Serve,
    /// Publish a refresh signal on the gas price queue periodically
    Publish,
    /// Refresh the cached gas price once
    Refresh,
    /// Print the cached gas price
    GasPrice,
    /// Quote a swap
    Quote {
        /// Address of the token sold
        from_token: String,
        /// Address of the token bought
        to_token: String,
        /// Amount sold, in human units
        amount_in: String,
    },
}

/// Prints `value` as pretty JSON on stdout
fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Publishes refresh signals until Ctrl-C
async fn run_publisher_until_ctrl_c(ctx: &AppContext) -> Result<(), Error> {
    let (shutdown, shutdown_rx) = watch::channel(false);
    let publisher = tokio::spawn(run_publisher(
        Arc::clone(&ctx.broker),
        ctx.config.gas_price_queue.clone(),
        ctx.config.gas_price_publish,
        shutdown_rx,
    ));

    tokio::signal::ctrl_c().await?;
    let _ = shutdown.send(true);
    let published = publisher.await?;
    ctx.broker.close().await?;
    info!("Published {published} refresh signals");
    Ok(())
}

/// Prints the quote of a swap. Internal failures are reported opaquely.
async fn quote(
    ctx: &AppContext,
    from_token: &str,
    to_token: &str,
    amount_in: &str,
) -> Result<(), Error> {
    let orchestrator = ctx.orchestrator();
    match orchestrator
        .quote_within(from_token, to_token, amount_in, ctx.config.quote_timeout)
        .await
    {
        Ok(amount_out) => print_json(&amount_out),
        Err(e) if e.is_client_error() => Err(Error::msg(e.to_string())),
        Err(e) => {
            log::error!("Quote failed: {e}");
            Err(Error::msg(e.public_message()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    setup_logger()?;

    let config = Config::from_env()?;
    info!("Starting with RPC_URL: {}", config.rpc_url);
    let ctx = AppContext::new(config).await?;

    match cli.command {
        Some(Commands::Publish) => run_publisher_until_ctrl_c(&ctx).await?,
        Some(Commands::Refresh) => {
            let gas_price = ctx.gas_price_sync().refresh_gas_price().await?;
            info!("Gas price refreshed: {gas_price} gwei");
        }
        Some(Commands::GasPrice) => print_json(&ctx.gas_price_sync().cached_gas_price().await?)?,
        Some(Commands::Quote {
            from_token,
            to_token,
            amount_in,
        }) => quote(&ctx, &from_token, &to_token, &amount_in).await?,
        Some(Commands::Serve) | None => serve(&ctx).await?,
    }

    Ok(())
}
