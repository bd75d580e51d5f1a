//! Reads from the `L2OutputOracle`.

use crate::{
    BridgeError, BridgeResult, ChainView, ChainViewError, OutputProposal,
    bindings::L2OutputOracle, traits::sol_call,
};
use alloy_primitives::{Address, U256};
use tokio::sync::OnceCell;

/// A reader over the L1 `L2OutputOracle`.
///
/// The finalization period is fixed per deployment and read at most once.
#[derive(Debug)]
pub struct OutputOracle<V> {
    view: V,
    address: Address,
    finalization_period: OnceCell<u64>,
}

impl<V: ChainView> OutputOracle<V> {
    /// Creates a reader for the oracle at `address` on the L1 `view`.
    pub fn new(view: V, address: Address) -> Self {
        Self { view, address, finalization_period: OnceCell::new() }
    }

    /// Returns the L1 view the oracle is read through.
    pub const fn view(&self) -> &V {
        &self.view
    }

    /// Returns the L2 block of the most recent proposal.
    pub async fn latest_block_number(&self) -> BridgeResult<u64> {
        let latest =
            sol_call(&self.view, self.address, L2OutputOracle::latestBlockNumberCall {}, None)
                .await?;
        Ok(to_u64(latest))
    }

    /// Returns the index of the first proposal covering `l2_block_number`, or `None` if no
    /// proposal covers it yet.
    pub async fn output_index_after(&self, l2_block_number: u64) -> BridgeResult<Option<u64>> {
        let latest = self.latest_block_number().await?;
        if l2_block_number > latest {
            trace!(
                target: "bridge::status",
                l2_block_number,
                latest,
                "No output proposal covers the block yet"
            );
            return Ok(None);
        }

        let call = L2OutputOracle::getL2OutputIndexAfterCall {
            _l2BlockNumber: U256::from(l2_block_number),
        };
        match sol_call(&self.view, self.address, call, None).await {
            Ok(index) => Ok(Some(to_u64(index))),
            // The oracle reverts when no proposal covers the block.
            Err(BridgeError::ChainViewUnavailable(ChainViewError::Reverted(_))) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Returns the proposal at `index`.
    pub async fn output(&self, index: u64) -> BridgeResult<OutputProposal> {
        let call = L2OutputOracle::getL2OutputCall { _l2OutputIndex: U256::from(index) };
        let proposal = sol_call(&self.view, self.address, call, None).await?;
        Ok(OutputProposal::from_sol(index, &proposal))
    }

    /// Returns the first proposal covering `l2_block_number`, if one has been submitted.
    pub async fn covering_output(
        &self,
        l2_block_number: u64,
    ) -> BridgeResult<Option<OutputProposal>> {
        match self.output_index_after(l2_block_number).await? {
            Some(index) => Ok(Some(self.output(index).await?)),
            None => Ok(None),
        }
    }

    /// Returns the challenge period, in seconds, that must elapse between proving and
    /// finalizing a withdrawal.
    pub async fn finalization_period(&self) -> BridgeResult<u64> {
        self.finalization_period
            .get_or_try_init(|| async {
                let period = sol_call(
                    &self.view,
                    self.address,
                    L2OutputOracle::FINALIZATION_PERIOD_SECONDSCall {},
                    None,
                )
                .await?;
                debug!(target: "bridge::status", period = %period, "Read finalization period");
                Ok::<_, BridgeError>(to_u64(period))
            })
            .await
            .copied()
    }
}

fn to_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestChainView;
    use alloy_primitives::B256;

    const ORACLE: Address = Address::repeat_byte(0x0A);

    fn chain() -> TestChainView {
        let chain = TestChainView::default();
        chain.push_output(100, B256::repeat_byte(1), 1_000);
        chain.push_output(200, B256::repeat_byte(2), 2_000);
        chain
    }

    #[tokio::test]
    async fn test_output_index_after() {
        let oracle = OutputOracle::new(chain(), ORACLE);
        assert_eq!(oracle.output_index_after(150).await.unwrap(), Some(1));
        assert_eq!(oracle.output_index_after(100).await.unwrap(), Some(0));
        assert_eq!(oracle.output_index_after(201).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_covering_output() {
        let oracle = OutputOracle::new(chain(), ORACLE);
        let output = oracle.covering_output(150).await.unwrap().unwrap();
        assert_eq!(output.index, 1);
        assert_eq!(output.l2_block_number, 200);
        assert_eq!(output.output_root, B256::repeat_byte(2));
        assert_eq!(output.timestamp, 2_000);
        assert!(oracle.covering_output(250).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_oracle_has_no_outputs() {
        let oracle = OutputOracle::new(TestChainView::default(), ORACLE);
        assert_eq!(oracle.output_index_after(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_finalization_period_is_read_once() {
        let chain = chain();
        chain.set_finalization_period(604_800);
        let oracle = OutputOracle::new(chain.clone(), ORACLE);

        assert_eq!(oracle.finalization_period().await.unwrap(), 604_800);
        chain.set_finalization_period(12);
        assert_eq!(oracle.finalization_period().await.unwrap(), 604_800);
        assert_eq!(chain.finalization_period_reads(), 1);
    }

    #[tokio::test]
    async fn test_index_after_revert_means_uncovered() {
        use crate::traits::MockChainView;
        use alloy_primitives::Bytes;
        use alloy_sol_types::{SolCall, SolValue};

        let mut view = MockChainView::new();
        view.expect_call()
            .withf(|to, input, _| {
                *to == ORACLE &&
                    input.starts_with(&L2OutputOracle::latestBlockNumberCall::SELECTOR)
            })
            .returning(|_, _, _| Ok(U256::from(500).abi_encode().into()));
        view.expect_call()
            .withf(|_, input, _| {
                input.starts_with(&L2OutputOracle::getL2OutputIndexAfterCall::SELECTOR)
            })
            .times(1)
            .returning(|_, _, _| Err(ChainViewError::Reverted(Bytes::new())));

        let oracle = OutputOracle::new(view, ORACLE);
        assert_eq!(oracle.output_index_after(150).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let chain = chain();
        chain.fail_next_calls(1);
        let oracle = OutputOracle::new(chain, ORACLE);
        let err = oracle.output_index_after(150).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(oracle.output_index_after(150).await.unwrap(), Some(1));
    }
}
