//! Transaction requests for the portal and the message passer.

use crate::{
    BridgeConfig, CallRequest, WithdrawalMessage, WithdrawalProof,
    bindings::{L2ToL1MessagePasser, OptimismPortal},
};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

/// Builds the unsigned transactions that move a message across the bridge.
///
/// Requests are returned to the caller for signing and submission through a
/// [`crate::TransactionSubmitter`].
#[derive(Debug, Clone)]
pub struct BridgeCalls {
    config: BridgeConfig,
}

impl BridgeCalls {
    /// Creates a builder for the deployment described by `config`.
    pub const fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    /// Returns a `depositTransaction` call on the L1 portal.
    ///
    /// `mint` is the ether attached on L1 and minted on L2; `value` is the value of the L2
    /// call and must not exceed the minted amount plus the sender's L2 balance. A `gas_limit` of
    /// `None` uses the minimum relay gas for the payload. `to` of `None` creates a contract
    /// from `data`.
    pub fn deposit_transaction(
        &self,
        to: Option<Address>,
        mint: U256,
        value: U256,
        gas_limit: Option<u64>,
        data: Bytes,
    ) -> CallRequest {
        let gas_limit = gas_limit.unwrap_or_else(|| self.config.l2_min_gas_limit(data.len()));
        let call = OptimismPortal::depositTransactionCall {
            _to: to.unwrap_or_default(),
            _value: value,
            _gasLimit: gas_limit,
            _isCreation: to.is_none(),
            _data: data,
        };
        CallRequest::new(self.config.contracts.optimism_portal, call.abi_encode()).with_value(mint)
    }

    /// Returns an `initiateWithdrawal` call on the L2 message passer.
    ///
    /// A `gas_limit` of `None` uses the minimum relay gas for the payload.
    pub fn initiate_withdrawal(
        &self,
        target: Address,
        value: U256,
        gas_limit: Option<u64>,
        data: Bytes,
    ) -> CallRequest {
        let gas_limit = gas_limit.unwrap_or_else(|| self.config.l1_min_gas_limit(data.len()));
        let call = L2ToL1MessagePasser::initiateWithdrawalCall {
            _target: target,
            _gasLimit: U256::from(gas_limit),
            _data: data,
        };
        CallRequest::new(self.config.contracts.l2_to_l1_message_passer, call.abi_encode())
            .with_value(value)
    }

    /// Returns a `proveWithdrawalTransaction` call on the L1 portal.
    pub fn prove_withdrawal(
        &self,
        message: &WithdrawalMessage,
        proof: &WithdrawalProof,
    ) -> CallRequest {
        let call = OptimismPortal::proveWithdrawalTransactionCall {
            _tx: message.to_transaction(),
            _l2OutputIndex: U256::from(proof.output_index),
            _outputRootProof: proof.output_root_proof.to_sol(),
            _withdrawalProof: proof.storage_proof.clone(),
        };
        CallRequest::new(self.config.contracts.optimism_portal, call.abi_encode())
    }

    /// Returns a `finalizeWithdrawalTransaction` call on the L1 portal.
    pub fn finalize_withdrawal(&self, message: &WithdrawalMessage) -> CallRequest {
        let call =
            OptimismPortal::finalizeWithdrawalTransactionCall { _tx: message.to_transaction() };
        CallRequest::new(self.config.contracts.optimism_portal, call.abi_encode())
    }
}
