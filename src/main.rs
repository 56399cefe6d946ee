//! Offline transfer planner
//!
//! Runs the validation and builder pipeline against figures supplied on
//! the command line: prints the fee and maximum transferable amount and,
//! when the transfer is accepted, the unsigned transaction as JSON.
//! Exits non-zero on a rejected transfer.

use clap::Parser;
use ethers_core::types::U256;

use weblink_core::amounts::{format_ether, validate_transfer, TransferDecision};
use weblink_core::config::DEFAULT_CHAIN_ID;
use weblink_core::error::WeblinkResult;
use weblink_core::tx::{build_unsigned_transaction, TransferParams};

#[derive(Parser, Debug)]
#[command(name = "weblink-core", about = "Plan an Ethereum transfer offline")]
struct Args {
    /// Sender address (0x-prefixed)
    #[arg(long)]
    from: String,

    /// Recipient address (0x-prefixed)
    #[arg(long)]
    to: String,

    /// Transfer amount in ether (decimal string, e.g. "1.5")
    #[arg(long)]
    amount: String,

    /// Available balance in wei (decimal)
    #[arg(long)]
    balance: String,

    /// Gas price in wei (decimal)
    #[arg(long)]
    gas_price: String,

    /// Network gas estimate (decimal)
    #[arg(long)]
    gas_estimate: String,

    /// User-chosen gas limit (decimal)
    #[arg(long, default_value = "21000")]
    gas_limit: String,

    /// Sender's next nonce (decimal)
    #[arg(long, default_value = "0")]
    nonce: String,

    /// EIP-155 chain id
    #[arg(long, default_value_t = DEFAULT_CHAIN_ID)]
    chain_id: u64,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn parse_dec(label: &str, value: &str) -> WeblinkResult<U256> {
    U256::from_dec_str(value).map_err(|e| {
        weblink_core::WeblinkError::invalid_input(format!("Invalid {}: {}", label, e))
    })
}

fn run(args: &Args) -> WeblinkResult<bool> {
    let balance = parse_dec("balance", &args.balance)?;
    let gas_price = parse_dec("gas price", &args.gas_price)?;
    let estimated_gas = parse_dec("gas estimate", &args.gas_estimate)?;
    let gas_limit = parse_dec("gas limit", &args.gas_limit)?;
    let nonce = parse_dec("nonce", &args.nonce)?;

    let decision = validate_transfer(balance, gas_price, estimated_gas, gas_limit, &args.amount)?;

    let (value_wei, fee, max) = match decision {
        TransferDecision::Accepted {
            value_wei,
            fee,
            max_transferable,
        } => (value_wei, fee, max_transferable),
        rejected => {
            if let Some(err) = rejected.rejection_error() {
                eprintln!("{}", err.message);
            }
            return Ok(false);
        }
    };

    println!("fee: {} Ether", format_ether(fee.fee));
    println!("max transferable: {} Ether", format_ether(max));

    let params = TransferParams {
        from: args.from.clone(),
        to: args.to.clone(),
        value_wei,
        gas_price,
        gas_limit,
    };
    let unsigned = build_unsigned_transaction(&params, nonce, args.chain_id)?;
    println!("{}", serde_json::to_string_pretty(&unsigned)?);

    Ok(true)
}

fn main() {
    let args = Args::parse();
    if args.debug {
        weblink_core::utils::logging::enable_debug();
    }

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    }
}
