//! Command line front end: derive pool addresses, read reserves and size swaps.

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use eyre::{Error, Result};
use log::{info, warn};
use serde::Serialize;

use nudge::config::Config;
use nudge::pool::math::pow10;
use nudge::pool::types::PRICE_DECIMALS;
use nudge::pool::{pool_key, AssetId, PoolError, TargetPrice};
use nudge::utils::app_context::AppContext;
use nudge::utils::constants::FactoryPreset;
use nudge::utils::logger::setup_logger;

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Factory preset, overrides `NUDGE_PRESET`
    #[arg(long, global = true)]
    preset: Option<FactoryPreset>,
    /// What to do
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands
#[derive(Subcommand)]
enum Commands {
    /// Derive the pool address for two tokens, without network access
    Address { token_a: AssetId, token_b: AssetId },
    /// Read the pool's reserves in the given token order
    Reserves { token_a: AssetId, token_b: AssetId },
    /// Size the swap of TOKEN_IN that moves TOKEN_OUT's price to a target
    Size {
        token_in: AssetId,
        token_out: AssetId,
        /// Target price of TOKEN_OUT in TOKEN_IN, as a decimal
        #[arg(long, required_unless_present = "bump_bps", conflicts_with = "bump_bps")]
        price: Option<TargetPrice>,
        /// Target the current price raised by this many basis points
        #[arg(long)]
        bump_bps: Option<u32>,
    },
    /// Liquidity token balance of HOLDER in the pool
    LpBalance {
        token_a: AssetId,
        token_b: AssetId,
        holder: Address,
    },
}

/// Prints `value` as JSON, or `human` otherwise.
fn emit<T: Serialize>(json: bool, value: &T, human: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{human}");
    }
    Ok(())
}

/// Executes one command.
async fn run(cli: Cli, config: Config) -> Result<(), Error> {
    match cli.command {
        Commands::Address { token_a, token_b } => {
            let key = pool_key(token_a, token_b)?;
            let pool = AppContext::offline_resolver(&config).address_for_key(&key);
            let report = serde_json::json!({
                "pool": pool,
                "token0": key.low().address(),
                "token1": key.high().address(),
                "factory": config.factory,
            });
            emit(cli.json, &report, &format!("{pool:#x}"))?;
        }
        Commands::Reserves { token_a, token_b } => {
            let ctx = AppContext::new(&config)?;
            let reserves = ctx.sizer.reserves(token_a, token_b).await?;
            emit(
                cli.json,
                &reserves,
                &format!(
                    "{token_a}: {}\n{token_b}: {}",
                    reserves.reserve_a, reserves.reserve_b
                ),
            )?;
        }
        Commands::Size {
            token_in,
            token_out,
            price,
            bump_bps,
        } => {
            let ctx = AppContext::new(&config)?;
            let plan = match (price, bump_bps) {
                (Some(target), _) => ctx.sizer.plan(token_in, token_out, &target).await,
                (None, Some(bps)) => {
                    ctx.sizer
                        .plan_bump(token_in, token_out, bps, pow10(PRICE_DECIMALS))
                        .await
                }
                (None, None) => return Err(Error::msg("either --price or --bump-bps is required")),
            };
            match plan {
                Ok(plan) => {
                    info!(
                        "Pool {}: spot {} -> target {} (scale {})",
                        plan.pool, plan.spot_price, plan.target_price, plan.price_scale
                    );
                    emit(cli.json, &plan, &plan.amount_in.to_string())?;
                }
                Err(e @ PoolError::PriceAlreadyAtOrBeyondTarget { .. }) => {
                    warn!("No swap needed: {e}");
                    emit(cli.json, &serde_json::json!({ "amount_in": null }), "0")?;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::LpBalance {
            token_a,
            token_b,
            holder,
        } => {
            let ctx = AppContext::new(&config)?;
            let balance = ctx.sizer.lp_balance(token_a, token_b, holder).await?;
            emit(cli.json, &balance, &balance.to_string())?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_logger()?;

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(preset) = cli.preset {
        config = config.with_preset(preset);
    }
    info!(
        "Using factory {} ({}), fee {}/{}",
        config.factory,
        config.preset,
        config.fee.numerator(),
        config.fee.denominator()
    );

    run(cli, config).await
}
