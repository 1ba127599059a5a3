//! `grant`: command-line front end for the grant contract.
//!
//! Reads state through the view methods and prints the action JSON for change
//! methods without submitting it. Signing and broadcast are left to a wallet.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use grant_client::methods::lookup;
use grant_client::{
    AccountId, Amount, CallKind, CallOptions, ClientConfig, Gas, GrantClient, JsonRpcTransport,
};

#[derive(Parser)]
#[command(version, about = "Query the grant contract and build its actions")]
struct Args {
    #[arg(long)]
    /// JSON-RPC endpoint (defaults to the network's public node)
    rpc_url: Option<String>,

    #[arg(long)]
    /// Account the grant contract is deployed to
    contract_id: Option<AccountId>,

    #[command(subcommand)]
    command: Subcmd,
}

#[derive(Subcommand)]
enum Subcmd {
    /// Show the contract configuration
    Config,

    /// List operator accounts
    Operators,

    /// Show one round
    Round { round_id: u64 },

    /// List rounds with their project counts
    Rounds {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },

    /// Show one project
    Project { round_id: u64, owner: AccountId },

    /// List projects
    Projects {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },

    /// List projects registered by an owner
    ProjectsForOwner {
        owner: AccountId,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },

    /// Show (withdrawable, granted) for a project
    GrantFor { round_id: u64, owner: AccountId },

    /// Call any view method by name
    View {
        method: String,
        /// JSON arguments
        #[arg(default_value = "{}")]
        args: String,
    },

    /// Print the action for a change method without sending it
    Action {
        method: String,
        /// JSON arguments
        #[arg(default_value = "{}")]
        args: String,
        #[arg(long)]
        /// Gas budget (defaults to DEFAULT_GAS)
        gas: Option<Gas>,
        #[arg(long)]
        /// Attached deposit in yoctoNEAR
        deposit: Option<Amount>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(rpc_url) = args.rpc_url {
        config.rpc_url = rpc_url;
    }
    if let Some(contract_id) = args.contract_id {
        config.contract_id = contract_id;
    }
    debug!(
        "Using {} on {} ({:?})",
        config.contract_id, config.rpc_url, config.network
    );

    let transport = JsonRpcTransport::from_config(&config)?;
    let client = GrantClient::read_only(transport, config.contract_id.clone())
        .with_default_gas(config.default_gas);

    match args.command {
        Subcmd::Config => print_json(&client.config().await?),
        Subcmd::Operators => print_json(&client.operators().await?),
        Subcmd::Round { round_id } => print_json(&client.round(round_id).await?),
        Subcmd::Rounds { limit, offset } => print_json(&client.rounds(limit, offset).await?),
        Subcmd::Project { round_id, owner } => {
            print_json(&client.project((round_id, owner)).await?)
        }
        Subcmd::Projects { limit, offset } => print_json(&client.projects(limit, offset).await?),
        Subcmd::ProjectsForOwner {
            owner,
            limit,
            offset,
        } => print_json(&client.projects_for_owner(owner, limit, offset).await?),
        Subcmd::GrantFor { round_id, owner } => {
            print_json(&client.grant_for((round_id, owner)).await?)
        }
        Subcmd::View { method, args } => {
            let descriptor = lookup(&method).with_context(|| format!("Unknown method {method}"))?;
            if descriptor.kind != CallKind::View {
                bail!("{method} is a change method; use `action` to build it");
            }
            let args = parse_args(&args)?;
            print_json(&client.invoke_by_name(&method, &args, CallOptions::new()).await?)
        }
        Subcmd::Action {
            method,
            args,
            gas,
            deposit,
        } => {
            let args = parse_args(&args)?;
            let options = CallOptions {
                gas,
                attached_deposit: deposit,
            };
            print_json(&client.action_by_name(&method, &args, options)?)
        }
    }
}

fn parse_args(raw: &str) -> anyhow::Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("Arguments are not valid JSON: {raw}"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
