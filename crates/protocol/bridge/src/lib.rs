#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/op-rs/kona/main/assets/square.png",
    html_favicon_url = "https://raw.githubusercontent.com/op-rs/kona/main/assets/favicon.ico",
    issue_tracker_base_url = "https://github.com/op-rs/kona/issues/"
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

pub mod bindings;

mod constants;
pub use constants::{
    DEPOSIT_TX_TYPE, L2_TO_L1_MESSAGE_PASSER, LEGACY_ERC20_ETH, MIN_MESSAGE_PASSED_DATA_LEN,
    OUTPUT_ROOT_VERSION_V0, USER_DEPOSIT_SOURCE_DOMAIN,
};

mod errors;
pub use errors::{
    BridgeError, BridgeResult, ChainViewError, DepositLogError, HashCodecError,
    ProofBindingError, WithdrawalLogError,
};

pub mod hash;

mod gas;
pub use gas::GasParameters;

mod config;
pub use config::{BridgeConfig, BridgeContracts, UsdcContracts};

mod types;
pub use types::{HeaderInfo, ReceiptInfo, ReceiptLog, StorageProof};

mod traits;
pub use traits::{CallRequest, ChainView, TransactionSubmitter};
#[cfg(any(test, feature = "test-utils"))]
pub use traits::{MockChainView, MockTransactionSubmitter};

mod message;
pub use message::{CrossDomainMessage, MessageDirection};

mod deposit;
pub use deposit::DepositMessage;

mod withdrawal;
pub use withdrawal::WithdrawalMessage;

mod output;
pub use output::{OutputProposal, OutputRootProof, WithdrawalProof, covering_output_index};

mod oracle;
pub use oracle::OutputOracle;

mod portal;
pub use portal::{OptimismPortal, ProvenWithdrawal};

mod proof;
pub use proof::WithdrawalProofBuilder;

mod status;
pub use status::{MessageStatus, MessageStatusTracker};

mod poll;
pub use poll::{PollOptions, poll_with_backoff};

mod calls;
pub use calls::BridgeCalls;

pub mod adapter;

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use crate::metrics::Metrics;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
