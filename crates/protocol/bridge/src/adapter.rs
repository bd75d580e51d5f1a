//! Token bridge adapters.
//!
//! Each [`BridgeAdapter`] variant moves one family of token pairs through the standard or a
//! dedicated bridge. Adapters only build [`CallRequest`]s. The messages their transactions
//! initiate are tracked like any other through [`crate::MessageStatusTracker`].

use crate::{
    BridgeContracts, BridgeError, BridgeResult, CallRequest, LEGACY_ERC20_ETH, UsdcContracts,
    bindings::{IERC20, L1StandardBridge, L2StandardBridge},
};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use derive_more::Display;

/// The L2 gas limit used for deposits that do not specify one.
pub const DEFAULT_DEPOSIT_GAS_LIMIT: u32 = 200_000;

/// A token movement in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransfer {
    /// The token on L1, [`Address::ZERO`] for ether.
    pub l1_token: Address,
    /// The token on L2.
    pub l2_token: Address,
    /// The account credited on the destination chain.
    pub recipient: Address,
    /// The amount to move.
    pub amount: U256,
    /// The minimum gas limit of the relayed call, or `None` for the adapter's default.
    pub min_gas_limit: Option<u32>,
    /// Opaque data forwarded to the recipient.
    pub extra_data: Bytes,
}

impl TokenTransfer {
    /// Creates a transfer of `amount` of the `(l1_token, l2_token)` pair to `recipient`.
    pub fn new(l1_token: Address, l2_token: Address, recipient: Address, amount: U256) -> Self {
        Self {
            l1_token,
            l2_token,
            recipient,
            amount,
            min_gas_limit: None,
            extra_data: Bytes::new(),
        }
    }

    /// Sets the minimum gas limit of the relayed call.
    pub const fn with_min_gas_limit(mut self, min_gas_limit: u32) -> Self {
        self.min_gas_limit = Some(min_gas_limit);
        self
    }
}

/// The capability shared by all bridge adapters.
pub trait TokenBridge {
    /// Returns `true` if the adapter moves the `(l1_token, l2_token)` pair.
    fn supports_token_pair(&self, l1_token: Address, l2_token: Address) -> bool;

    /// Returns the L1 approval the deposit needs, or `None` if it moves ether.
    fn approve_call(&self, transfer: &TokenTransfer) -> BridgeResult<Option<CallRequest>>;

    /// Returns the L1 call depositing the transfer.
    fn deposit_call(&self, transfer: &TokenTransfer) -> BridgeResult<CallRequest>;

    /// Returns the L2 call withdrawing the transfer.
    fn withdraw_call(&self, transfer: &TokenTransfer) -> BridgeResult<CallRequest>;
}

/// The closed set of bridge adapters.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum BridgeAdapter {
    /// Ether through the standard bridge.
    #[display("eth")]
    Eth(BridgeContracts),
    /// The L1 token that is native on L2, through the standard bridge.
    #[display("native-token")]
    NativeToken(BridgeContracts),
    /// Any other mintable ERC-20 pair, through the standard bridge.
    #[display("erc20")]
    Erc20(BridgeContracts),
    /// USDC, through its dedicated bridge.
    #[display("usdc")]
    Usdc(UsdcContracts),
}

impl BridgeAdapter {
    /// Returns every adapter the deployment supports, most specific first.
    pub fn all(contracts: &BridgeContracts) -> Vec<Self> {
        let mut adapters = Vec::with_capacity(4);
        if let Some(usdc) = contracts.usdc {
            adapters.push(Self::Usdc(usdc));
        }
        adapters.push(Self::Eth(contracts.clone()));
        if contracts.l1_native_token.is_some() {
            adapters.push(Self::NativeToken(contracts.clone()));
        }
        adapters.push(Self::Erc20(contracts.clone()));
        adapters
    }

    /// Returns the adapter moving the `(l1_token, l2_token)` pair.
    pub fn for_pair(
        contracts: &BridgeContracts,
        l1_token: Address,
        l2_token: Address,
    ) -> BridgeResult<Self> {
        Self::all(contracts)
            .into_iter()
            .find(|adapter| adapter.supports_token_pair(l1_token, l2_token))
            .ok_or(BridgeError::UnsupportedTokenPair { l1_token, l2_token })
    }

    fn ensure_supported(&self, transfer: &TokenTransfer) -> BridgeResult<()> {
        if self.supports_token_pair(transfer.l1_token, transfer.l2_token) {
            return Ok(());
        }
        Err(BridgeError::UnsupportedTokenPair {
            l1_token: transfer.l1_token,
            l2_token: transfer.l2_token,
        })
    }

    const fn bridges(&self) -> (Address, Address) {
        match self {
            Self::Eth(c) | Self::NativeToken(c) | Self::Erc20(c) => {
                (c.l1_standard_bridge, c.l2_standard_bridge)
            }
            Self::Usdc(usdc) => (usdc.l1_bridge, usdc.l2_bridge),
        }
    }
}

impl TokenBridge for BridgeAdapter {
    fn supports_token_pair(&self, l1_token: Address, l2_token: Address) -> bool {
        match self {
            Self::Eth(c) => l1_token == Address::ZERO && l2_token == c.l2_eth_token,
            Self::NativeToken(c) => {
                c.l1_native_token.is_some_and(|native| native == l1_token) &&
                    l2_token == LEGACY_ERC20_ETH
            }
            Self::Erc20(c) => {
                let native = c.l1_native_token == Some(l1_token) || l2_token == LEGACY_ERC20_ETH;
                let usdc = c.usdc.is_some_and(|u| u.l1_token == l1_token && u.l2_token == l2_token);
                !l1_token.is_zero() &&
                    !l2_token.is_zero() &&
                    l2_token != c.l2_eth_token &&
                    !native &&
                    !usdc
            }
            Self::Usdc(u) => u.l1_token == l1_token && u.l2_token == l2_token,
        }
    }

    fn approve_call(&self, transfer: &TokenTransfer) -> BridgeResult<Option<CallRequest>> {
        self.ensure_supported(transfer)?;
        if matches!(self, Self::Eth(_)) {
            return Ok(None);
        }
        let call = IERC20::approveCall { spender: self.bridges().0, amount: transfer.amount };
        Ok(Some(CallRequest::new(transfer.l1_token, call.abi_encode())))
    }

    fn deposit_call(&self, transfer: &TokenTransfer) -> BridgeResult<CallRequest> {
        self.ensure_supported(transfer)?;
        let l1_bridge = self.bridges().0;
        let min_gas_limit = transfer.min_gas_limit.unwrap_or(DEFAULT_DEPOSIT_GAS_LIMIT);

        if matches!(self, Self::Eth(_)) {
            let call = L1StandardBridge::bridgeETHToCall {
                _to: transfer.recipient,
                _minGasLimit: min_gas_limit,
                _extraData: transfer.extra_data.clone(),
            };
            return Ok(CallRequest::new(l1_bridge, call.abi_encode()).with_value(transfer.amount));
        }

        let call = L1StandardBridge::depositERC20ToCall {
            _l1Token: transfer.l1_token,
            _l2Token: transfer.l2_token,
            _to: transfer.recipient,
            _amount: transfer.amount,
            _minGasLimit: min_gas_limit,
            _extraData: transfer.extra_data.clone(),
        };
        Ok(CallRequest::new(l1_bridge, call.abi_encode()))
    }

    fn withdraw_call(&self, transfer: &TokenTransfer) -> BridgeResult<CallRequest> {
        self.ensure_supported(transfer)?;
        let call = L2StandardBridge::withdrawToCall {
            _l2Token: transfer.l2_token,
            _to: transfer.recipient,
            _amount: transfer.amount,
            _minGasLimit: transfer.min_gas_limit.unwrap_or_default(),
            _extraData: transfer.extra_data.clone(),
        };
        let request = CallRequest::new(self.bridges().1, call.abi_encode());

        // The L2 native currency is burned by value, everything else by allowance.
        if transfer.l2_token == LEGACY_ERC20_ETH {
            return Ok(request.with_value(transfer.amount));
        }
        Ok(request)
    }
}
