//! Transaction assembler interface (spec §4.F): the vending loop's view of
//! the mint+pay+refund transaction builder, realized as a subprocess call
//! to the `vend-txbuilder` binary (crate `vending-assembler`).

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{error, warn};

use vending_primitives::{MintOutcome, MintRequest};

use crate::errors::AssemblerError;

/// Produces and submits the mint transaction (§4.F). Implementations must
/// not assume the transaction is final on return — only that it was
/// accepted for submission.
pub trait TransactionAssembler {
    fn build_and_submit(
        &self,
        request: &MintRequest,
    ) -> impl std::future::Future<Output = Result<String, AssemblerError>>;
}

/// Shells out to a subprocess, passing the request as JSON on stdin and
/// reading a JSON [`MintOutcome`] from stdout — the systems-language
/// realization of invoking an external transaction-building tool (§4.F).
pub struct CliAssembler {
    binary_path: PathBuf,
    args: Vec<String>,
}

impl CliAssembler {
    pub fn new(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

impl TransactionAssembler for CliAssembler {
    async fn build_and_submit(&self, request: &MintRequest) -> Result<String, AssemblerError> {
        let payload = serde_json::to_vec(request)
            .map_err(|err| AssemblerError::rejected(format!("could not serialize request: {err}")))?;

        let mut child = Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| AssemblerError::rejected(format!("could not spawn assembler: {err}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&payload)
                .await
                .map_err(|err| AssemblerError::rejected(format!("could not write request: {err}")))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|err| AssemblerError::timeout(format!("assembler process error: {err}")))?;

        if !output.stderr.is_empty() {
            warn!(
                stderr = %String::from_utf8_lossy(&output.stderr),
                "assembler subprocess wrote to stderr"
            );
        }

        let outcome: MintOutcome = serde_json::from_slice(&output.stdout).map_err(|err| {
            error!(
                stdout = %String::from_utf8_lossy(&output.stdout),
                "could not parse assembler response"
            );
            AssemblerError::rejected(format!("malformed assembler response: {err}"))
        })?;

        match outcome {
            MintOutcome::Submitted { tx_hash } => Ok(tx_hash),
            MintOutcome::Rejected { reason } => Err(AssemblerError::rejected(reason)),
            MintOutcome::Timeout { reason } => Err(AssemblerError::timeout(reason)),
        }
    }
}
