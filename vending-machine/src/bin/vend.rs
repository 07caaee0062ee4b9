//! `vend`: the outer driver binary. Validates the configured mint policy
//! once (§4.D, §6 exit-code contract), then repeatedly invokes
//! `VendingMachine::vend` with a sleep in between, honoring a shutdown
//! signal between passes (§5).

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vending_indexer::BlockfrostIndexer;
use vending_machine::{
    AssetCatalog, CliAssembler, ExclusionSet, MintPolicy, NoWhitelist, RebateCalculator,
    SingleUseWhitelist, UnlimitedWhitelist, VendingMachine, Whitelist,
};
use vending_primitives::NetworkId;

#[derive(Parser, Debug)]
#[command(about = "NFT vending machine: watches a payment address and mints against a catalog")]
struct Cli {
    #[arg(long, env = "VEND_BLOCKFROST_PROJECT_ID")]
    blockfrost_project_id: String,

    #[arg(long, env = "VEND_MAINNET", default_value_t = false)]
    mainnet: bool,

    #[arg(long, env = "VEND_PAYMENT_ADDRESS")]
    payment_address: String,

    #[arg(long, env = "VEND_PAYMENT_SIGNING_KEY")]
    payment_signing_key: PathBuf,

    #[arg(long, env = "VEND_PROFIT_ADDRESS")]
    profit_address: String,

    #[arg(long, env = "VEND_DONATION_ADDRESS")]
    donation_address: Option<String>,

    #[arg(long, env = "VEND_RANDOMLY", default_value_t = false)]
    vend_randomly: bool,

    #[arg(long, env = "VEND_SINGLE_VEND_CAP", default_value_t = 1)]
    single_vend_cap: u64,

    #[arg(long, env = "VEND_POLICY_ID")]
    policy_id: String,

    #[arg(long, env = "VEND_MINIMUM_PRICE_LOVELACE")]
    minimum_price_lovelace: u64,

    #[arg(long, env = "VEND_DONATION_LOVELACE", default_value_t = 0)]
    donation_lovelace: u64,

    #[arg(long, env = "VEND_METADATA_DIR")]
    metadata_dir: PathBuf,

    #[arg(long, env = "VEND_LOCKED_DIR")]
    locked_dir: PathBuf,

    #[arg(long, env = "VEND_SCRIPT_FILE")]
    script_file: PathBuf,

    #[arg(long, env = "VEND_SIGNING_KEY")]
    signing_key: PathBuf,

    #[arg(long, env = "VEND_WHITELIST_KIND", value_enum, default_value_t = WhitelistKind::None)]
    whitelist_kind: WhitelistKind,

    #[arg(long, env = "VEND_WHITELIST_DIR")]
    whitelist_dir: Option<PathBuf>,

    #[arg(long, env = "VEND_CONSUMED_DIR")]
    consumed_dir: Option<PathBuf>,

    #[arg(long, env = "VEND_ASSEMBLER_BIN")]
    assembler_bin: PathBuf,

    #[arg(long, env = "VEND_POLL_INTERVAL_SECS", default_value_t = 20)]
    poll_interval_secs: u64,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum WhitelistKind {
    None,
    SingleUse,
    Unlimited,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let whitelist: Box<dyn Whitelist + Send + Sync> = match cli.whitelist_kind {
        WhitelistKind::None => Box::new(NoWhitelist),
        WhitelistKind::SingleUse => Box::new(SingleUseWhitelist::new(
            cli.whitelist_dir.clone().expect("--whitelist-dir required for single-use"),
            cli.consumed_dir.clone().expect("--consumed-dir required for single-use"),
            cli.policy_id.clone(),
        )),
        WhitelistKind::Unlimited => Box::new(UnlimitedWhitelist::new(
            cli.whitelist_dir.clone().expect("--whitelist-dir required for unlimited"),
            cli.consumed_dir.clone().expect("--consumed-dir required for unlimited"),
            cli.policy_id.clone(),
        )),
    };

    let mint_policy = MintPolicy {
        policy_id_hex: cli.policy_id.clone(),
        minimum_price_lovelace: cli.minimum_price_lovelace,
        donation_lovelace: cli.donation_lovelace,
        metadata_dir: cli.metadata_dir.clone(),
        locked_dir: cli.locked_dir.clone(),
        script_file: cli.script_file.clone(),
        signing_key: cli.signing_key.clone(),
        whitelist,
        whitelist_dir: matches!(cli.whitelist_kind, WhitelistKind::SingleUse | WhitelistKind::Unlimited)
            .then(|| cli.whitelist_dir.clone().unwrap()),
        consumed_dir: matches!(cli.whitelist_kind, WhitelistKind::SingleUse | WhitelistKind::Unlimited)
            .then(|| cli.consumed_dir.clone().unwrap()),
    };

    // §4.D / §6: validation failure is fatal and the loop never starts.
    if let Err(err) = mint_policy.validate() {
        error!(error = %err, "mint policy failed validation");
        std::process::exit(1);
    }

    let network = if cli.mainnet { NetworkId::Mainnet } else { NetworkId::Preview };
    let indexer = if cli.mainnet {
        BlockfrostIndexer::mainnet(cli.blockfrost_project_id.clone())
    } else {
        BlockfrostIndexer::preview(cli.blockfrost_project_id.clone())
    };

    let machine = VendingMachine {
        payment_address: cli.payment_address.clone(),
        payment_signing_key_path: cli.payment_signing_key.clone(),
        profit_address: cli.profit_address.clone(),
        donation_address: cli.donation_address.clone(),
        vend_randomly: cli.vend_randomly,
        single_vend_cap: cli.single_vend_cap,
        network,
        catalog: AssetCatalog::new(cli.metadata_dir.clone(), cli.locked_dir.clone()),
        rebate_calculator: RebateCalculator::default_cardano(),
        mint_policy,
        indexer,
        assembler: CliAssembler::new(cli.assembler_bin.clone()),
    };

    info!(
        payment_address = %machine.payment_address,
        poll_interval_secs = cli.poll_interval_secs,
        "vending machine starting"
    );

    let mut exclusions = ExclusionSet::new();
    let poll_interval = Duration::from_secs(cli.poll_interval_secs);
    loop {
        tokio::select! {
            result = machine.vend(&mut exclusions) => {
                // §6: runtime errors within the loop do not terminate the
                // process; only startup-time configuration/indexer failures
                // do, and those are handled above before the loop starts.
                if let Err(err) = result {
                    warn!(error = %err, "vend pass ended early; retrying on the next pass");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received, exiting between passes");
                return Ok(());
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(poll_interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received, exiting between passes");
                return Ok(());
            }
        }
    }
}
