//! Immutable bridge configuration.

use crate::{GasParameters, L2_TO_L1_MESSAGE_PASSER, LEGACY_ERC20_ETH};
use alloy_primitives::{Address, address};

/// The L2 standard bridge predeploy.
const L2_STANDARD_BRIDGE: Address = address!("0x4200000000000000000000000000000000000010");

/// The configuration of a single L1/L2 bridge deployment.
///
/// Constructed once and handed to every component at construction time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct BridgeConfig {
    /// The chain id of the settlement layer.
    pub l1_chain_id: u64,
    /// The chain id of the rollup.
    pub l2_chain_id: u64,
    /// Contract addresses on both layers.
    pub contracts: BridgeContracts,
    /// Relay gas accounting constants.
    #[cfg_attr(feature = "serde", serde(default))]
    pub gas: GasParameters,
}

impl BridgeConfig {
    /// Returns the minimum gas limit for relaying a payload of `payload_len` bytes to L1.
    pub fn l1_min_gas_limit(&self, payload_len: usize) -> u64 {
        self.gas.min_gas_limit(payload_len, self.l1_chain_id)
    }

    /// Returns the minimum gas limit for relaying a payload of `payload_len` bytes to L2.
    pub fn l2_min_gas_limit(&self, payload_len: usize) -> u64 {
        self.gas.min_gas_limit(payload_len, self.l2_chain_id)
    }
}

/// Contract addresses of a bridge deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct BridgeContracts {
    /// The `OptimismPortal` proxy on L1.
    pub optimism_portal: Address,
    /// The `L2OutputOracle` proxy on L1.
    pub l2_output_oracle: Address,
    /// The `L1StandardBridge` proxy on L1.
    pub l1_standard_bridge: Address,
    /// The `L2ToL1MessagePasser` on L2.
    pub l2_to_l1_message_passer: Address,
    /// The `L2StandardBridge` on L2.
    pub l2_standard_bridge: Address,
    /// The L2 representation of ether.
    pub l2_eth_token: Address,
    /// The L1 token paying for gas on L2, if the rollup has a custom native token.
    pub l1_native_token: Option<Address>,
    /// A dedicated USDC bridge pair, if deployed.
    pub usdc: Option<UsdcContracts>,
}

impl Default for BridgeContracts {
    fn default() -> Self {
        Self {
            optimism_portal: Address::ZERO,
            l2_output_oracle: Address::ZERO,
            l1_standard_bridge: Address::ZERO,
            l2_to_l1_message_passer: L2_TO_L1_MESSAGE_PASSER,
            l2_standard_bridge: L2_STANDARD_BRIDGE,
            l2_eth_token: LEGACY_ERC20_ETH,
            l1_native_token: None,
            usdc: None,
        }
    }
}

/// The contracts of a dedicated USDC bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct UsdcContracts {
    /// The USDC bridge on L1.
    pub l1_bridge: Address,
    /// The USDC bridge on L2.
    pub l2_bridge: Address,
    /// The USDC token on L1.
    pub l1_token: Address,
    /// The USDC token on L2.
    pub l2_token: Address,
}

#[cfg(test)]
#[cfg(feature = "serde")]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_toml() {
        let raw = r#"
            l1_chain_id = 11155111
            l2_chain_id = 55004

            [contracts]
            optimism_portal = "0x00000000000000000000000000000000000000a1"
            l2_output_oracle = "0x00000000000000000000000000000000000000a2"
        "#;
        let config: BridgeConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.l2_chain_id, 55_004);
        assert_eq!(config.contracts.l2_to_l1_message_passer, L2_TO_L1_MESSAGE_PASSER);
        assert_eq!(
            config.contracts.l2_output_oracle,
            address!("0x00000000000000000000000000000000000000a2")
        );
        assert_eq!(config.gas, GasParameters::default());
        assert_eq!(config.l1_min_gas_limit(0), 1_300_873);
        assert_eq!(config.l2_min_gas_limit(0), 1_335_873);
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let raw = "l1_chain_id = 1\nl2_chain_id = 10\nbogus = true\n[contracts]\n";
        assert!(toml::from_str::<BridgeConfig>(raw).is_err());
    }
}
