//! Subcommands of the bridge CLI.

mod status;
pub use status::{StatusArg, StatusCommand};

mod wait;
pub use wait::WaitCommand;

mod prove;
pub use prove::ProveCommand;

mod finalize;
pub use finalize::FinalizeCommand;

mod deposit_hash;
pub use deposit_hash::DepositHashCommand;

mod min_gas_limit;
pub use min_gas_limit::{GasDestination, MinGasLimitCommand};

use kona_bridge::{CallRequest, TransactionSubmitter};

/// Sends `request` through `submitter` if one is given, otherwise prints the unsigned call.
pub(crate) async fn submit_or_print<S: TransactionSubmitter>(
    submitter: Option<S>,
    request: CallRequest,
) -> anyhow::Result<()> {
    let Some(submitter) = submitter else {
        println!("to:    {}", request.to);
        println!("value: {}", request.value);
        println!("input: {}", request.input);
        return Ok(());
    };

    let hash = submitter.send_transaction(request).await?;
    tracing::info!(target: "bridge", %hash, "Sent transaction");
    let receipt = submitter.wait_for_receipt(hash).await?;
    if !receipt.status {
        anyhow::bail!("Transaction {hash} reverted in block {}", receipt.block_number);
    }
    println!("{hash}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256};
    use kona_bridge::{MockTransactionSubmitter, ReceiptInfo};

    const PORTAL: Address = Address::repeat_byte(0x0B);
    const HASH: B256 = B256::repeat_byte(0x55);

    fn request() -> CallRequest {
        CallRequest::new(PORTAL, vec![0xde, 0xad])
    }

    fn submitter(status: bool) -> MockTransactionSubmitter {
        let mut submitter = MockTransactionSubmitter::new();
        submitter
            .expect_send_transaction()
            .withf(|request| request.to == PORTAL && request.input[..] == [0xde, 0xad])
            .times(1)
            .returning(|_| Ok(HASH));
        submitter.expect_wait_for_receipt().withf(|hash| *hash == HASH).times(1).returning(
            move |hash| {
                Ok(ReceiptInfo {
                    transaction_hash: hash,
                    block_number: 12,
                    status,
                    ..Default::default()
                })
            },
        );
        submitter
    }

    #[tokio::test]
    async fn test_submits_and_awaits_receipt() {
        submit_or_print(Some(submitter(true)), request()).await.unwrap();
    }

    #[tokio::test]
    async fn test_reverted_receipt_fails() {
        let err = submit_or_print(Some(submitter(false)), request()).await.unwrap_err();
        assert!(err.to_string().contains("reverted in block 12"));
    }

    #[tokio::test]
    async fn test_prints_without_submitter() {
        submit_or_print(None::<MockTransactionSubmitter>, request()).await.unwrap();
    }
}
