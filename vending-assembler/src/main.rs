//! `vend-txbuilder`: the transaction assembler (spec §4.F). Invoked as a
//! subprocess by `vending_machine::CliAssembler`, which writes one
//! [`MintRequest`] as JSON to this process's stdin and reads one
//! `MintOutcome` back on stdout.

mod builder;
mod key;
mod metadata;
mod submit;

use std::io::Read;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vending_primitives::{MintOutcome, MintRequest};

use submit::{BlockfrostSubmitter, SubmitError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;

    let request = match serde_json::from_str::<MintRequest>(&raw) {
        Ok(request) => request,
        Err(err) => {
            let outcome = MintOutcome::Rejected {
                reason: format!("malformed mint request: {err}"),
            };
            println!("{}", serde_json::to_string(&outcome)?);
            // §6: non-zero on assembler failure at startup — this request
            // never reached submission.
            std::process::exit(1);
        }
    };

    let (outcome, reached_submission) = run(&request).await;
    println!("{}", serde_json::to_string(&outcome)?);
    if !reached_submission {
        std::process::exit(1);
    }
    Ok(())
}

/// Runs one mint attempt, returning the outcome to report on stdout and
/// whether `submit()` was ever called — the caller uses the latter to
/// decide the process exit code (§6: startup-type failures are non-zero,
/// network submission outcomes are not).
async fn run(request: &MintRequest) -> (MintOutcome, bool) {
    let built = match builder::build_and_sign(request) {
        Ok(built) => built,
        Err(err) => {
            error!(error = %err, "could not build mint transaction");
            return (
                MintOutcome::Rejected {
                    reason: err.to_string(),
                },
                false,
            );
        }
    };

    let project_token = match std::env::var("VEND_ASSEMBLER_BLOCKFROST_PROJECT") {
        Ok(token) => token,
        Err(_) => {
            return (
                MintOutcome::Rejected {
                    reason: "VEND_ASSEMBLER_BLOCKFROST_PROJECT is not set".to_string(),
                },
                false,
            )
        }
    };

    let submitter = BlockfrostSubmitter::new(request.network, project_token);
    match submitter.submit(&built.tx_bytes.0).await {
        Ok(tx_hash) => {
            info!(tx_hash, "mint transaction submitted");
            (MintOutcome::Submitted { tx_hash }, true)
        }
        Err(SubmitError::Timeout(reason)) => (MintOutcome::Timeout { reason }, true),
        Err(SubmitError::Rejected(reason)) => (MintOutcome::Rejected { reason }, true),
    }
}
