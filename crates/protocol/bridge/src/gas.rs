//! Relay gas accounting, mirroring `CrossDomainMessenger.baseGas`.

/// The constants used to size the gas limit of a relayed message.
///
/// The defaults reproduce the on-chain messenger. Changing them only makes sense when
/// targeting a deployment whose messenger was built with different constants.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct GasParameters {
    /// Gas charged per byte of message payload.
    pub per_byte_cost: u64,
    /// Fixed overhead of `relayMessage`.
    pub constant_overhead: u64,
    /// The gas limit the EIP-150 dynamic overhead is computed against.
    pub dynamic_overhead_base: u64,
    /// Numerator of the EIP-150 dynamic overhead ratio.
    pub dynamic_overhead_numerator: u64,
    /// Denominator of the EIP-150 dynamic overhead ratio.
    pub dynamic_overhead_denominator: u64,
    /// Overhead of the inner `CALL`.
    pub call_overhead: u64,
    /// Gas reserved for `relayMessage` to complete after the call.
    pub reserved_gas: u64,
    /// Gas-check buffer applied when the destination is a known L1.
    pub gas_check_buffer: u64,
    /// Gas-check buffer applied to every other destination.
    pub gas_check_buffer_with_approval: u64,
    /// Destination chain ids that receive the smaller gas-check buffer.
    pub origin_chain_ids: Vec<u64>,
    /// `(chain id, overhead)` pairs whose overhead is a fixed legacy value instead of the
    /// computed one.
    pub legacy_overrides: Vec<(u64, u64)>,
    /// Upper bound of any computed gas limit.
    pub max_gas_limit: u64,
}

impl Default for GasParameters {
    fn default() -> Self {
        Self {
            per_byte_cost: 16,
            constant_overhead: 200_000,
            dynamic_overhead_base: 1_000_000,
            dynamic_overhead_numerator: 64,
            dynamic_overhead_denominator: 63,
            call_overhead: 40_000,
            reserved_gas: 40_000,
            gas_check_buffer: 5_000,
            gas_check_buffer_with_approval: 40_000,
            origin_chain_ids: vec![1, 5, 11_155_111, 31_337, 900],
            legacy_overrides: vec![(420, 200_000)],
            max_gas_limit: 25_000_000,
        }
    }
}

impl GasParameters {
    /// Returns the EIP-150 dynamic overhead, rounded down.
    pub const fn dynamic_overhead(&self) -> u64 {
        if self.dynamic_overhead_denominator == 0 {
            return 0;
        }
        self.dynamic_overhead_base.saturating_mul(self.dynamic_overhead_numerator) /
            self.dynamic_overhead_denominator
    }

    /// Returns the payload-independent overhead of relaying to `chain_id`.
    pub fn overhead(&self, chain_id: u64) -> u64 {
        if let Some((_, overhead)) = self.legacy_overrides.iter().find(|(id, _)| *id == chain_id) {
            return *overhead;
        }

        let buffer = if self.origin_chain_ids.contains(&chain_id) {
            self.gas_check_buffer
        } else {
            self.gas_check_buffer_with_approval
        };
        self.constant_overhead
            .saturating_add(self.dynamic_overhead())
            .saturating_add(self.call_overhead)
            .saturating_add(self.reserved_gas)
            .saturating_add(buffer)
    }

    /// Computes the minimum gas limit for relaying a payload of `payload_len` bytes to
    /// `chain_id`, clamped to [`GasParameters::max_gas_limit`].
    pub fn min_gas_limit(&self, payload_len: usize, chain_id: u64) -> u64 {
        let data_cost = (payload_len as u64).saturating_mul(self.per_byte_cost);
        data_cost.saturating_add(self.overhead(chain_id)).min(self.max_gas_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_dynamic_overhead_rounds_down() {
        assert_eq!(GasParameters::default().dynamic_overhead(), 1_015_873);
    }

    #[rstest]
    #[case::mainnet(1, 0, 1_300_873)]
    #[case::sepolia(11_155_111, 0, 1_300_873)]
    #[case::devnet(900, 10, 1_301_033)]
    #[case::unknown_chain(55_004, 0, 1_335_873)]
    #[case::legacy(420, 0, 200_000)]
    #[case::legacy_with_data(420, 100, 201_600)]
    #[case::capped(1, 2_000_000, 25_000_000)]
    fn test_min_gas_limit(#[case] chain_id: u64, #[case] len: usize, #[case] expected: u64) {
        assert_eq!(GasParameters::default().min_gas_limit(len, chain_id), expected);
    }

    #[test]
    fn test_legacy_override_table_is_configurable() {
        let params =
            GasParameters { legacy_overrides: vec![(10, 123)], ..GasParameters::default() };
        assert_eq!(params.min_gas_limit(0, 10), 123);
        assert_eq!(params.min_gas_limit(0, 420), 1_335_873);
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_partial_toml_falls_back_to_defaults() {
        let params: GasParameters = toml::from_str("max_gas_limit = 30000000").unwrap();
        assert_eq!(params.max_gas_limit, 30_000_000);
        assert_eq!(params.per_byte_cost, 16);
        assert_eq!(params.legacy_overrides, vec![(420, 200_000)]);

        let params: GasParameters =
            toml::from_str("legacy_overrides = [[10, 150000]]\norigin_chain_ids = [1]").unwrap();
        assert_eq!(params.min_gas_limit(0, 10), 150_000);
        assert_eq!(params.min_gas_limit(0, 900), 1_335_873);
    }

    proptest! {
        #[test]
        fn test_min_gas_limit_monotonic_and_capped(
            a in 0usize..4_000_000,
            b in 0usize..4_000_000,
            chain_id in prop_oneof![Just(1u64), Just(420u64), Just(55_004u64), any::<u64>()],
        ) {
            let params = GasParameters::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let gas_lo = params.min_gas_limit(lo, chain_id);
            let gas_hi = params.min_gas_limit(hi, chain_id);
            prop_assert!(gas_lo <= gas_hi);
            prop_assert!(gas_hi <= 25_000_000);
        }
    }
}
