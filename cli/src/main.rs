use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use rc_core::{
    BlockConsumption, Capability, FixedBalances, MarketParameters, MarketsParameters,
    ResourceKind, ResourceSystem, SystemClock, SystemConfig,
};
use rc_storage::SledStore;
use serde::Serialize;
use std::path::PathBuf;

type Error = Box<dyn std::error::Error>;

#[derive(Parser)]
#[command(name = "rc")]
#[command(about = "Resource credit economy operator tool")]
#[command(version, long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Directory of the resource state database
    #[arg(
        short,
        long,
        value_name = "DIR",
        global = true,
        default_value = "$HOME/.resource-credits/db"
    )]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all three markets and the pending block
    Markets,

    /// Show per-market admission limits and unit costs
    Limits,

    /// Show the global resource parameters
    Params,

    /// Show consumption charged since the last settlement
    Pending,

    /// Show an account's resource credits
    Rc {
        account: String,

        /// Current token balance of the account
        #[arg(long)]
        balance: Option<u64>,
    },

    /// Charge an account for consuming a resource
    Charge {
        account: String,

        /// disk, network or compute
        resource: ResourceKind,

        amount: u64,

        /// Current token balance of the account
        #[arg(long)]
        balance: Option<u64>,
    },

    /// Settle a block
    Settle {
        #[arg(long, default_value_t = 0)]
        disk: u64,

        #[arg(long, default_value_t = 0)]
        network: u64,

        #[arg(long, default_value_t = 0)]
        compute: u64,

        /// Settle the recorded pending consumption instead
        #[arg(long, conflicts_with_all = ["disk", "network", "compute"])]
        pending: bool,
    },

    /// Set a market's block budget and limit (system authority)
    SetMarket {
        resource: ResourceKind,

        #[arg(long)]
        budget: u64,

        #[arg(long)]
        limit: u64,
    },
}

fn expand_path(path: &str, home: &str) -> String {
    path.replace("$HOME", home)
}

fn print_json<T: Serialize>(title: &str, value: &T) -> Result<(), Error> {
    println!("{}", title.cyan().bold());
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

type System = ResourceSystem<SledStore, SystemClock, FixedBalances>;

/// Mirror an operator-supplied balance into the account before acting on it
fn sync_balance(system: &mut System, account: &str, balance: Option<u64>) -> Result<(), Error> {
    let Some(balance) = balance else {
        return Ok(());
    };
    system.balances_mut().set(account, balance);
    if system.account_credit(account)?.token_balance != balance {
        system.on_balance_changed(&Capability::Kernel, account, balance)?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = match &cli.config {
        Some(path) => SystemConfig::load(path)?,
        None => SystemConfig::default(),
    };
    let home = std::env::var("HOME").unwrap_or_default();
    let data_dir = expand_path(&cli.data_dir, &home);
    log::debug!("opening resource state at {}", data_dir);

    let store = SledStore::open(&data_dir)?;
    let mut system = ResourceSystem::new(&config, store, SystemClock, FixedBalances::new())?;

    match cli.command {
        Commands::Markets => print_json("Resource markets", &system.resource_markets()?)?,
        Commands::Limits => print_json("Resource limits", &system.resource_limits()?)?,
        Commands::Params => print_json("Resource parameters", &system.resource_parameters()?)?,
        Commands::Pending => print_json("Pending consumption", &system.pending_consumption()?)?,
        Commands::Rc { account, balance } => {
            sync_balance(&mut system, &account, balance)?;
            let credit = system.account_credit(&account)?;
            print_json(&format!("Resource credits of {}", account), &credit)?;
        }
        Commands::Charge {
            account,
            resource,
            amount,
            balance,
        } => {
            sync_balance(&mut system, &account, balance)?;
            let receipt = system.charge(&Capability::Kernel, &account, resource, amount)?;
            print_json("Charged", &receipt)?;
        }
        Commands::Settle {
            disk,
            network,
            compute,
            pending,
        } => {
            let settled = if pending {
                system.settle_pending_block(&Capability::Kernel)?
            } else {
                let consumption = BlockConsumption::new(disk, network, compute);
                system.settle_block(&Capability::Kernel, consumption)?
            };
            print_json("Settled markets", &settled)?;
        }
        Commands::SetMarket {
            resource,
            budget,
            limit,
        } => {
            let update = MarketsParameters::single(
                resource,
                MarketParameters {
                    block_budget: budget,
                    block_limit: limit,
                },
            );
            let markets = system.set_resource_markets_parameters(&Capability::SystemAuthority, update)?;
            print_json(&format!("Updated {} market", resource), markets.get(resource))?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
