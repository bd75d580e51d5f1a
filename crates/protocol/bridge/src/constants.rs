//! Protocol constants shared with the on-chain bridge contracts.

use alloy_primitives::{Address, B256, address};

/// The `L2ToL1MessagePasser` predeploy. Withdrawals are initiated here and recorded in its
/// `sentMessages` mapping at storage slot zero.
pub const L2_TO_L1_MESSAGE_PASSER: Address = address!("0x4200000000000000000000000000000000000016");

/// The `LegacyERC20ETH` predeploy, used as the L2 token address for ether.
pub const LEGACY_ERC20_ETH: Address = address!("0xDeadDeAddeAddEAddeadDEaDDEAdDeaDDeAD0000");

/// The EIP-2718 transaction type of a deposit transaction.
pub const DEPOSIT_TX_TYPE: u8 = 0x7E;

/// The source-hash domain of user deposits.
pub const USER_DEPOSIT_SOURCE_DOMAIN: u64 = 0;

/// The only output root version understood by the portal.
pub const OUTPUT_ROOT_VERSION_V0: B256 = B256::ZERO;

/// The minimum size of `MessagePassed` log data: the four head words followed by the payload
/// length word.
pub const MIN_MESSAGE_PASSED_DATA_LEN: usize = 160;
