//! The cross-domain message lifecycle.

use crate::{
    BridgeConfig, BridgeError, BridgeResult, ChainView, ChainViewError, CrossDomainMessage,
    DepositMessage, OptimismPortal, OutputOracle, PollOptions, WithdrawalMessage,
    poll_with_backoff,
};
use alloy_primitives::{Address, B256};
use derive_more::Display;
use tokio_util::sync::CancellationToken;

/// The lifecycle status of a cross-domain message.
///
/// Variants are ordered by lifecycle progress. A deposit moves from
/// [`MessageStatus::UnconfirmedL1ToL2`] to either [`MessageStatus::FailedL1ToL2`] or
/// [`MessageStatus::Relayed`]; a withdrawal moves through every state from
/// [`MessageStatus::StateRootNotPublished`] to [`MessageStatus::Relayed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum MessageStatus {
    /// The deposit has not been processed by the rollup yet.
    #[display("UNCONFIRMED_L1_TO_L2")]
    UnconfirmedL1ToL2,
    /// The deposit, or the L1 transaction initiating it, reverted.
    #[display("FAILED_L1_TO_L2")]
    FailedL1ToL2,
    /// No output proposal covers the withdrawal yet.
    #[display("STATE_ROOT_NOT_PUBLISHED")]
    StateRootNotPublished,
    /// The withdrawal can be proven on L1.
    #[display("READY_TO_PROVE")]
    ReadyToProve,
    /// The withdrawal is proven and waiting out the challenge period.
    #[display("IN_CHALLENGE_PERIOD")]
    InChallengePeriod,
    /// The withdrawal can be finalized on L1.
    #[display("READY_FOR_RELAY")]
    ReadyForRelay,
    /// The message has been executed on its destination chain.
    #[display("RELAYED")]
    Relayed,
}

impl MessageStatus {
    /// Returns `true` if no further transition is possible.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::FailedL1ToL2 | Self::Relayed)
    }
}

/// Derives the status of cross-domain messages from live chain state.
///
/// Nothing is persisted between queries; the only cached value is the oracle's
/// finalization period, which is fixed per deployment.
#[derive(Debug)]
pub struct MessageStatusTracker<L1, L2> {
    l1: L1,
    l2: L2,
    portal_address: Address,
    message_passer: Address,
    oracle: OutputOracle<L1>,
    portal: OptimismPortal<L1>,
}

impl<L1, L2> MessageStatusTracker<L1, L2>
where
    L1: ChainView + Clone,
    L2: ChainView,
{
    /// Creates a tracker over the given L1 and L2 views.
    pub fn new(l1: L1, l2: L2, config: &BridgeConfig) -> Self {
        let contracts = &config.contracts;
        Self {
            oracle: OutputOracle::new(l1.clone(), contracts.l2_output_oracle),
            portal: OptimismPortal::new(l1.clone(), contracts.optimism_portal),
            portal_address: contracts.optimism_portal,
            message_passer: contracts.l2_to_l1_message_passer,
            l1,
            l2,
        }
    }

    /// Returns the output oracle the tracker reads.
    pub const fn oracle(&self) -> &OutputOracle<L1> {
        &self.oracle
    }

    /// Reconstructs the message initiated by `tx_hash`, looking on L1 first.
    ///
    /// Returns `Ok(None)` if the transaction reverted on L1, since a reverted deposit leaves
    /// no log to reconstruct.
    pub async fn resolve_message(&self, tx_hash: B256) -> BridgeResult<Option<CrossDomainMessage>> {
        if let Some(receipt) = self.l1.receipt_by_hash(tx_hash).await? {
            if !receipt.status {
                return Ok(None);
            }
            return match DepositMessage::from_receipt(&receipt, self.portal_address) {
                Ok(deposit) => Ok(Some(deposit.into())),
                Err(BridgeError::NoDepositLogFound(_)) => {
                    Err(BridgeError::UnknownDirection(tx_hash))
                }
                Err(err) => Err(err),
            };
        }

        let receipt = self
            .l2
            .receipt_by_hash(tx_hash)
            .await?
            .ok_or(BridgeError::TransactionNotFound(tx_hash))?;
        WithdrawalMessage::from_receipt(&receipt, self.message_passer).map(|w| Some(w.into()))
    }

    /// Returns the current status of the message initiated by `tx_hash`.
    pub async fn message_status(&self, tx_hash: B256) -> BridgeResult<MessageStatus> {
        let result = match self.resolve_message(tx_hash).await {
            Ok(Some(message)) => self.status_of(&message).await,
            Ok(None) => Ok(MessageStatus::FailedL1ToL2),
            Err(err) => Err(err),
        };

        #[cfg(feature = "metrics")]
        crate::Metrics::record_status_query(&result);
        match &result {
            Ok(status) => {
                debug!(target: "bridge::status", %tx_hash, %status, "Derived message status")
            }
            Err(err) => {
                debug!(target: "bridge::status", %tx_hash, %err, "Failed to derive message status")
            }
        }
        result
    }

    /// Returns the current status of `message`.
    pub async fn status_of(&self, message: &CrossDomainMessage) -> BridgeResult<MessageStatus> {
        match message {
            CrossDomainMessage::Deposit(deposit) => self.deposit_status(deposit).await,
            CrossDomainMessage::Withdrawal(withdrawal) => self.withdrawal_status(withdrawal).await,
        }
    }

    /// Returns the current status of a deposit, by looking up the receipt of its predicted L2
    /// transaction.
    pub async fn deposit_status(&self, deposit: &DepositMessage) -> BridgeResult<MessageStatus> {
        let l2_hash = deposit.l2_transaction_hash();
        let status = match self.l2.receipt_by_hash(l2_hash).await? {
            None => MessageStatus::UnconfirmedL1ToL2,
            Some(receipt) if receipt.status => MessageStatus::Relayed,
            Some(_) => MessageStatus::FailedL1ToL2,
        };
        trace!(target: "bridge::status", %l2_hash, %status, "Deposit status");
        Ok(status)
    }

    /// Returns the current status of a withdrawal.
    pub async fn withdrawal_status(
        &self,
        withdrawal: &WithdrawalMessage,
    ) -> BridgeResult<MessageStatus> {
        let hash = withdrawal.withdrawal_hash;
        if self.portal.is_finalized(hash).await? {
            return Ok(MessageStatus::Relayed);
        }
        if self.oracle.output_index_after(withdrawal.block_number).await?.is_none() {
            return Ok(MessageStatus::StateRootNotPublished);
        }
        let Some(proven) = self.portal.proven_withdrawal(hash).await? else {
            return Ok(MessageStatus::ReadyToProve);
        };

        let period = self.oracle.finalization_period().await?;
        let now = self.l1_timestamp().await?;
        let status = if proven.timestamp.saturating_add(period) > now {
            MessageStatus::InChallengePeriod
        } else {
            MessageStatus::ReadyForRelay
        };
        trace!(
            target: "bridge::status",
            withdrawal_hash = %hash,
            proven_at = proven.timestamp,
            period,
            now,
            %status,
            "Withdrawal status"
        );
        Ok(status)
    }

    /// Returns the challenge period of the deployment, in seconds.
    pub async fn challenge_period(&self) -> BridgeResult<u64> {
        self.oracle.finalization_period().await
    }

    /// Waits until the message initiated by `tx_hash` reaches `target` or a later status.
    ///
    /// A transaction that is not known yet is polled for like any other unmet condition. A
    /// deposit that fails while waiting for a later status ends the wait with
    /// [`BridgeError::DepositFailed`].
    pub async fn wait_for_status(
        &self,
        tx_hash: B256,
        target: MessageStatus,
        options: &PollOptions,
        cancel: &CancellationToken,
    ) -> BridgeResult<MessageStatus> {
        info!(target: "bridge::status", %tx_hash, %target, "Waiting for message status");
        poll_with_backoff(options, cancel, || async move {
            let status = match self.message_status(tx_hash).await {
                Ok(status) => status,
                Err(BridgeError::TransactionNotFound(_)) => return Ok(None),
                Err(err) => return Err(err),
            };
            if status >= target {
                return Ok(Some(status));
            }
            if status == MessageStatus::FailedL1ToL2 {
                return Err(BridgeError::DepositFailed(tx_hash));
            }
            Ok(None)
        })
        .await
    }

    async fn l1_timestamp(&self) -> BridgeResult<u64> {
        let number = self.l1.block_number().await?;
        let header = self
            .l1
            .header_by_number(number)
            .await?
            .ok_or(ChainViewError::HeaderNotFound(number))?;
        Ok(header.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BridgeContracts, HeaderInfo, L2_TO_L1_MESSAGE_PASSER, ReceiptInfo, ReceiptLog,
        test_utils::TestChainView,
    };
    use alloy_primitives::{Bytes, U256};
    use core::time::Duration;

    const PORTAL: Address = Address::repeat_byte(0x0B);
    const ORACLE: Address = Address::repeat_byte(0x0A);
    const PERIOD: u64 = 604_800;

    struct Chains {
        l1: TestChainView,
        l2: TestChainView,
        tracker: MessageStatusTracker<TestChainView, TestChainView>,
    }

    fn chains() -> Chains {
        let l1 = TestChainView::default();
        let l2 = TestChainView::default();
        l1.set_finalization_period(PERIOD);
        let config = BridgeConfig {
            contracts: BridgeContracts {
                optimism_portal: PORTAL,
                l2_output_oracle: ORACLE,
                ..Default::default()
            },
            ..Default::default()
        };
        let tracker = MessageStatusTracker::new(l1.clone(), l2.clone(), &config);
        Chains { l1, l2, tracker }
    }

    fn set_l1_time(l1: &TestChainView, number: u64, timestamp: u64) {
        l1.insert_header(HeaderInfo { number, timestamp, ..Default::default() });
    }

    fn withdrawal(l2: &TestChainView) -> WithdrawalMessage {
        let mut msg = WithdrawalMessage {
            nonce: U256::from(7),
            sender: Address::repeat_byte(0xAA),
            target: Address::repeat_byte(0xBB),
            value: U256::from(1000),
            gas_limit: U256::from(20000),
            data: Bytes::new(),
            withdrawal_hash: B256::ZERO,
            tx_hash: B256::repeat_byte(0x42),
            block_number: 150,
            log_index: Some(0),
        };
        msg.withdrawal_hash = msg.hash();
        l2.insert_receipt(ReceiptInfo {
            transaction_hash: msg.tx_hash,
            block_number: 150,
            status: true,
            logs: vec![ReceiptLog { log: msg.to_log(L2_TO_L1_MESSAGE_PASSER), log_index: Some(0) }],
            ..Default::default()
        });
        msg
    }

    fn deposit(l1: &TestChainView) -> DepositMessage {
        let msg = DepositMessage {
            from: Address::repeat_byte(0xAA),
            to: Some(Address::repeat_byte(0xBB)),
            mint: U256::from(1000),
            value: U256::from(1000),
            gas_limit: 100_000,
            data: Bytes::new(),
            l1_tx_hash: B256::repeat_byte(0x99),
            l1_block_hash: B256::repeat_byte(0x01),
            l1_block_number: 10,
            log_index: 3,
        };
        l1.insert_receipt(ReceiptInfo {
            transaction_hash: msg.l1_tx_hash,
            block_hash: msg.l1_block_hash,
            block_number: 10,
            status: true,
            to: Some(PORTAL),
            logs: vec![ReceiptLog { log: msg.to_log(PORTAL), log_index: Some(3) }],
        });
        msg
    }

    fn l2_receipt(hash: B256, status: bool) -> ReceiptInfo {
        ReceiptInfo { transaction_hash: hash, status, ..Default::default() }
    }

    #[tokio::test]
    async fn test_withdrawal_lifecycle() {
        let c = chains();
        let msg = withdrawal(&c.l2);
        set_l1_time(&c.l1, 1, 10_000);

        c.l1.push_output(100, B256::repeat_byte(1), 1_000);
        assert_eq!(
            c.tracker.message_status(msg.tx_hash).await.unwrap(),
            MessageStatus::StateRootNotPublished
        );

        c.l1.push_output(200, B256::repeat_byte(2), 2_000);
        assert_eq!(
            c.tracker.message_status(msg.tx_hash).await.unwrap(),
            MessageStatus::ReadyToProve
        );

        c.l1.prove_withdrawal(msg.withdrawal_hash, B256::repeat_byte(2), 10_000, 1);
        assert_eq!(
            c.tracker.message_status(msg.tx_hash).await.unwrap(),
            MessageStatus::InChallengePeriod
        );

        set_l1_time(&c.l1, 2, 10_000 + PERIOD);
        assert_eq!(
            c.tracker.message_status(msg.tx_hash).await.unwrap(),
            MessageStatus::ReadyForRelay
        );

        c.l1.finalize_withdrawal(msg.withdrawal_hash);
        assert_eq!(c.tracker.message_status(msg.tx_hash).await.unwrap(), MessageStatus::Relayed);
        assert_eq!(c.l1.finalization_period_reads(), 1);
    }

    #[tokio::test]
    async fn test_never_skips_ahead_without_output() {
        let c = chains();
        let msg = withdrawal(&c.l2);
        set_l1_time(&c.l1, 1, 10_000);
        // A proof recorded without a covering output cannot advance the status.
        c.l1.prove_withdrawal(msg.withdrawal_hash, B256::repeat_byte(2), 1, 0);
        assert_eq!(
            c.tracker.withdrawal_status(&msg).await.unwrap(),
            MessageStatus::StateRootNotPublished
        );
    }

    #[tokio::test]
    async fn test_challenge_period_never_regresses() {
        let c = chains();
        let msg = withdrawal(&c.l2);
        c.l1.push_output(200, B256::repeat_byte(2), 2_000);
        c.l1.prove_withdrawal(msg.withdrawal_hash, B256::repeat_byte(2), 5_000, 0);

        let mut last = MessageStatus::UnconfirmedL1ToL2;
        for (i, now) in [5_000, 5_000 + PERIOD - 1, 5_000 + PERIOD, 5_000 + PERIOD + 1, 9_999_999]
            .into_iter()
            .enumerate()
        {
            set_l1_time(&c.l1, i as u64 + 1, now);
            let status = c.tracker.withdrawal_status(&msg).await.unwrap();
            assert!(status >= last, "{status} regressed from {last}");
            last = status;
        }
        assert_eq!(last, MessageStatus::ReadyForRelay);
    }

    #[tokio::test]
    async fn test_deposit_lifecycle() {
        let c = chains();
        let msg = deposit(&c.l1);
        assert_eq!(
            c.tracker.message_status(msg.l1_tx_hash).await.unwrap(),
            MessageStatus::UnconfirmedL1ToL2
        );

        c.l2.insert_receipt(l2_receipt(msg.l2_transaction_hash(), true));
        assert_eq!(c.tracker.message_status(msg.l1_tx_hash).await.unwrap(), MessageStatus::Relayed);
    }

    #[tokio::test]
    async fn test_failed_deposit() {
        let c = chains();
        let msg = deposit(&c.l1);
        c.l2.insert_receipt(l2_receipt(msg.l2_transaction_hash(), false));
        assert_eq!(
            c.tracker.message_status(msg.l1_tx_hash).await.unwrap(),
            MessageStatus::FailedL1ToL2
        );
    }

    #[tokio::test]
    async fn test_reverted_l1_transaction() {
        let c = chains();
        c.l1.insert_receipt(ReceiptInfo {
            transaction_hash: B256::repeat_byte(0x98),
            status: false,
            ..Default::default()
        });
        assert_eq!(
            c.tracker.message_status(B256::repeat_byte(0x98)).await.unwrap(),
            MessageStatus::FailedL1ToL2
        );
    }

    #[tokio::test]
    async fn test_unclassifiable_transactions() {
        let c = chains();
        c.l1.insert_receipt(ReceiptInfo {
            transaction_hash: B256::repeat_byte(0x97),
            status: true,
            ..Default::default()
        });
        assert!(matches!(
            c.tracker.message_status(B256::repeat_byte(0x97)).await,
            Err(BridgeError::UnknownDirection(_))
        ));
        assert!(matches!(
            c.tracker.message_status(B256::repeat_byte(0x96)).await,
            Err(BridgeError::TransactionNotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_relay() {
        let c = chains();
        let msg = deposit(&c.l1);
        let l2 = c.l2.clone();
        let l2_hash = msg.l2_transaction_hash();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            l2.insert_receipt(l2_receipt(l2_hash, true));
        });

        let status = c
            .tracker
            .wait_for_status(
                msg.l1_tx_hash,
                MessageStatus::Relayed,
                &PollOptions::every(Duration::from_secs(5)).with_timeout(Duration::from_secs(120)),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(status, MessageStatus::Relayed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_ends_on_failed_deposit() {
        let c = chains();
        let msg = deposit(&c.l1);
        c.l2.insert_receipt(l2_receipt(msg.l2_transaction_hash(), false));

        let err = c
            .tracker
            .wait_for_status(
                msg.l1_tx_hash,
                MessageStatus::Relayed,
                &PollOptions::every(Duration::from_secs(5)),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::DepositFailed(h) if h == msg.l1_tx_hash));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_retries_until_latest_header_is_served() {
        let c = chains();
        let msg = withdrawal(&c.l2);
        c.l1.push_output(200, B256::repeat_byte(2), 2_000);
        c.l1.prove_withdrawal(msg.withdrawal_hash, B256::repeat_byte(2), 10_000, 0);
        set_l1_time(&c.l1, 1, 10_000);
        // The node advertises block 2 before it serves its header.
        c.l1.set_block_number(2);

        let err = c.tracker.withdrawal_status(&msg).await.unwrap_err();
        assert!(matches!(
            err,
            BridgeError::ChainViewUnavailable(ChainViewError::HeaderNotFound(2))
        ));
        assert!(err.is_retryable());

        let l1 = c.l1.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            set_l1_time(&l1, 2, 10_000 + PERIOD);
        });
        let status = c
            .tracker
            .wait_for_status(
                msg.tx_hash,
                MessageStatus::InChallengePeriod,
                &PollOptions::every(Duration::from_secs(1)).with_timeout(Duration::from_secs(60)),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(status, MessageStatus::ReadyForRelay);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_queries_agree() {
        let c = chains();
        let msg = withdrawal(&c.l2);
        c.l1.push_output(200, B256::repeat_byte(2), 2_000);
        c.l1.prove_withdrawal(msg.withdrawal_hash, B256::repeat_byte(2), 10_000, 0);
        set_l1_time(&c.l1, 1, 10_000 + PERIOD);

        let options = PollOptions::every(Duration::from_secs(1));
        let cancel = CancellationToken::new();
        let (a, b, direct, waited) = tokio::join!(
            c.tracker.message_status(msg.tx_hash),
            c.tracker.message_status(msg.tx_hash),
            c.tracker.withdrawal_status(&msg),
            c.tracker.wait_for_status(msg.tx_hash, MessageStatus::ReadyToProve, &options, &cancel),
        );
        for status in [a.unwrap(), b.unwrap(), direct.unwrap(), waited.unwrap()] {
            assert_eq!(status, MessageStatus::ReadyForRelay);
        }
        assert_eq!(c.l1.finalization_period_reads(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out_before_output() {
        let c = chains();
        let msg = withdrawal(&c.l2);
        let err = c
            .tracker
            .wait_for_status(
                msg.tx_hash,
                MessageStatus::ReadyToProve,
                &PollOptions::every(Duration::from_secs(5)).with_timeout(Duration::from_secs(60)),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Timeout(_)));
        assert!(err.is_retryable());
    }
}
