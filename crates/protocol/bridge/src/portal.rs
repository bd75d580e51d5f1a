//! Reads from the `OptimismPortal`.

use crate::{BridgeResult, ChainView, bindings, traits::sol_call};
use alloy_primitives::{Address, B256};

/// A withdrawal proof accepted by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvenWithdrawal {
    /// The output root the withdrawal was proven against.
    pub output_root: B256,
    /// The L1 timestamp at which the proof was accepted.
    pub timestamp: u64,
    /// The index of the output proposal the withdrawal was proven against.
    pub l2_output_index: u64,
}

/// A reader over the L1 `OptimismPortal`.
#[derive(Debug, Clone)]
pub struct OptimismPortal<V> {
    view: V,
    address: Address,
}

impl<V: ChainView> OptimismPortal<V> {
    /// Creates a reader for the portal at `address` on the L1 `view`.
    pub const fn new(view: V, address: Address) -> Self {
        Self { view, address }
    }

    /// Returns the portal's proof record for `withdrawal_hash`, or `None` if it has not been
    /// proven.
    pub async fn proven_withdrawal(
        &self,
        withdrawal_hash: B256,
    ) -> BridgeResult<Option<ProvenWithdrawal>> {
        let call =
            bindings::OptimismPortal::provenWithdrawalsCall { _withdrawalHash: withdrawal_hash };
        let proven = sol_call(&self.view, self.address, call, None).await?;

        // Unproven entries are zeroed.
        if proven.timestamp == 0 {
            return Ok(None);
        }
        Ok(Some(ProvenWithdrawal {
            output_root: proven.outputRoot,
            timestamp: u64::try_from(proven.timestamp).unwrap_or(u64::MAX),
            l2_output_index: u64::try_from(proven.l2OutputIndex).unwrap_or(u64::MAX),
        }))
    }

    /// Returns whether `withdrawal_hash` has been finalized.
    pub async fn is_finalized(&self, withdrawal_hash: B256) -> BridgeResult<bool> {
        let call =
            bindings::OptimismPortal::finalizedWithdrawalsCall { _withdrawalHash: withdrawal_hash };
        sol_call(&self.view, self.address, call, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestChainView;

    #[tokio::test]
    async fn test_proven_and_finalized() {
        let chain = TestChainView::default();
        let portal = OptimismPortal::new(chain.clone(), Address::repeat_byte(0x0B));
        let hash = B256::repeat_byte(0x77);

        assert_eq!(portal.proven_withdrawal(hash).await.unwrap(), None);
        assert!(!portal.is_finalized(hash).await.unwrap());

        chain.prove_withdrawal(hash, B256::repeat_byte(2), 1_234, 1);
        chain.finalize_withdrawal(hash);
        assert_eq!(
            portal.proven_withdrawal(hash).await.unwrap(),
            Some(ProvenWithdrawal {
                output_root: B256::repeat_byte(2),
                timestamp: 1_234,
                l2_output_index: 1
            })
        );
        assert!(portal.is_finalized(hash).await.unwrap());
    }
}
