//! Solidity bindings for the bridge contracts read and called by the engine.

#![allow(missing_docs)]

use alloy_sol_types::sol;

sol! {
    /// Structs shared between the oracle and the portal.
    library Types {
        #[derive(Debug, PartialEq, Eq)]
        struct OutputProposal {
            bytes32 outputRoot;
            uint128 timestamp;
            uint128 l2BlockNumber;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct OutputRootProof {
            bytes32 version;
            bytes32 stateRoot;
            bytes32 messagePasserStorageRoot;
            bytes32 latestBlockhash;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct WithdrawalTransaction {
            uint256 nonce;
            address sender;
            address target;
            uint256 value;
            uint256 gasLimit;
            bytes data;
        }
    }

    /// The L1 oracle that records L2 output proposals.
    interface L2OutputOracle {
        function getL2OutputIndexAfter(uint256 _l2BlockNumber) external view returns (uint256);
        function getL2Output(uint256 _l2OutputIndex)
            external
            view
            returns (Types.OutputProposal memory);
        function latestBlockNumber() external view returns (uint256);
        function FINALIZATION_PERIOD_SECONDS() external view returns (uint256);
    }

    /// The L1 portal that accepts deposits and proves and finalizes withdrawals.
    interface OptimismPortal {
        #[derive(Debug)]
        event TransactionDeposited(
            address indexed from,
            address indexed to,
            uint256 indexed version,
            bytes opaqueData
        );

        function depositTransaction(
            address _to,
            uint256 _value,
            uint64 _gasLimit,
            bool _isCreation,
            bytes memory _data
        ) external payable;
        function proveWithdrawalTransaction(
            Types.WithdrawalTransaction memory _tx,
            uint256 _l2OutputIndex,
            Types.OutputRootProof calldata _outputRootProof,
            bytes[] calldata _withdrawalProof
        ) external;
        function finalizeWithdrawalTransaction(Types.WithdrawalTransaction memory _tx) external;
        function provenWithdrawals(bytes32 _withdrawalHash)
            external
            view
            returns (bytes32 outputRoot, uint128 timestamp, uint128 l2OutputIndex);
        function finalizedWithdrawals(bytes32 _withdrawalHash) external view returns (bool);
    }

    /// The L2 predeploy through which withdrawals are initiated.
    interface L2ToL1MessagePasser {
        #[derive(Debug)]
        event MessagePassed(
            uint256 indexed nonce,
            address indexed sender,
            address indexed target,
            uint256 value,
            uint256 gasLimit,
            bytes data,
            bytes32 withdrawalHash
        );

        function initiateWithdrawal(address _target, uint256 _gasLimit, bytes memory _data)
            external
            payable;
        function sentMessages(bytes32 _withdrawalHash) external view returns (bool);
    }

    /// The L1 side of a standard token bridge.
    interface L1StandardBridge {
        function bridgeETHTo(address _to, uint32 _minGasLimit, bytes calldata _extraData)
            external
            payable;
        function depositERC20To(
            address _l1Token,
            address _l2Token,
            address _to,
            uint256 _amount,
            uint32 _minGasLimit,
            bytes calldata _extraData
        ) external;
    }

    /// The subset of ERC-20 needed to approve a bridge.
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// The L2 side of a standard token bridge.
    interface L2StandardBridge {
        function withdrawTo(
            address _l2Token,
            address _to,
            uint256 _amount,
            uint32 _minGasLimit,
            bytes calldata _extraData
        ) external payable;
    }
}
