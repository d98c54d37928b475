use std::{fs, path::PathBuf, sync::Arc};

use abi_console::{AccessFilter, Filter, Session};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
};
use tracing_subscriber::EnvFilter;

mod console;
mod ethers_capability;

use console::Console;
use ethers_capability::EthersContract;

/// Interactive console for any contract ABI.
///
/// Loads a JSON ABI, lists one panel per function and lets you call views or submit
/// transactions after a confirmation prompt.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// RPC URL of the node to talk to.
    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    /// Path to a file containing the signer private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<PathBuf>,

    /// Private key (hex string, 0x...). Without a key the node's unlocked accounts are used.
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    private_key: Option<String>,

    /// Path to the contract's JSON ABI.
    #[arg(long, env = "ABI_PATH", requires = "address")]
    abi: Option<PathBuf>,

    /// Address of the contract to load at startup.
    #[arg(long, env = "CONTRACT_ADDRESS", requires = "abi")]
    address: Option<String>,

    /// Initial filter tab (eg, all, mint, burn, transfer).
    #[arg(long, default_value = "all")]
    filter: String,

    /// Show privileged functions (mint, burn) to every caller.
    #[arg(long)]
    no_access_filter: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let provider = Provider::<Http>::try_from(cli.rpc_url.as_str())
        .with_context(|| format!("invalid RPC URL `{}`", cli.rpc_url))?;

    match read_key(&cli)? {
        Some(key) => {
            let chain_id = provider
                .get_chainid()
                .await
                .context("failed to fetch chain id")?
                .as_u64();
            let wallet = key
                .parse::<LocalWallet>()
                .map_err(|e| anyhow!("invalid private key: {e}"))?
                .with_chain_id(chain_id);
            run(&cli, SignerMiddleware::new(provider, wallet)).await
        }
        None => run(&cli, provider).await,
    }
}

fn read_key(cli: &Cli) -> Result<Option<String>> {
    if let Some(ref path) = cli.private_key_path {
        let key = fs::read_to_string(path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        return Ok(Some(key.trim().to_string()));
    }
    Ok(cli.private_key.as_ref().map(|k| k.trim().to_string()))
}

async fn run<M: Middleware>(cli: &Cli, client: M) -> Result<()> {
    let access = if cli.no_access_filter {
        AccessFilter::disabled()
    } else {
        AccessFilter::default()
    };
    let mut console = Console::new(Session::new(access), EthersContract::new(Arc::new(client)));
    // Without a key the node's first unlocked account, if any, becomes the caller.
    console.connect().await;
    if let (Some(abi), Some(address)) = (&cli.abi, &cli.address) {
        console.load_file(abi, address).await?;
    }
    // Loading resets the filter, so the flag applies afterwards.
    console.set_filter(Filter::parse(&cli.filter));
    console.run().await
}
