//! Deterministic hashing primitives shared with the bridge contracts.
//!
//! Every function here must agree bit-for-bit with its on-chain counterpart: the message
//! hash with `Hashing.hashWithdrawal`, the storage slot with the `sentMessages` mapping of
//! the message passer, the output root with `Hashing.hashOutputRootProof` and the source
//! hash with the rollup node's user-deposit source.

use crate::{HashCodecError, USER_DEPOSIT_SOURCE_DOMAIN};
use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use alloy_sol_types::SolValue;

/// Computes the withdrawal hash of a message, `keccak256(abi.encode(nonce, sender, target,
/// value, gasLimit, data))`.
pub fn message_hash(
    nonce: U256,
    sender: Address,
    target: Address,
    value: U256,
    gas_limit: U256,
    data: &Bytes,
) -> B256 {
    let encoded = (nonce, sender, target, value, gas_limit, data.clone()).abi_encode_params();
    keccak256(encoded)
}

/// Computes the storage slot under which the message passer records a sent message: the
/// mapping key hashed together with slot zero.
pub fn storage_slot(message_hash: B256) -> B256 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(message_hash.as_slice());
    keccak256(buf)
}

/// Hashes the four words of an output root proof in order.
pub fn output_root(
    version: B256,
    state_root: B256,
    message_passer_storage_root: B256,
    latest_block_hash: B256,
) -> B256 {
    let mut buf = [0u8; 128];
    buf[..32].copy_from_slice(version.as_slice());
    buf[32..64].copy_from_slice(state_root.as_slice());
    buf[64..96].copy_from_slice(message_passer_storage_root.as_slice());
    buf[96..].copy_from_slice(latest_block_hash.as_slice());
    keccak256(buf)
}

/// Computes the source hash of a user deposit from its position in the L1 chain.
///
/// `keccak256(domain ++ keccak256(block_hash ++ uint256(log_index)))`, with the user
/// deposit domain `0`.
pub fn user_deposit_source_hash(block_hash: B256, log_index: u64) -> B256 {
    let mut deposit_id = [0u8; 64];
    deposit_id[..32].copy_from_slice(block_hash.as_slice());
    deposit_id[32..].copy_from_slice(&U256::from(log_index).to_be_bytes::<32>());
    let deposit_id_hash = keccak256(deposit_id);

    let mut source = [0u8; 64];
    source[..32].copy_from_slice(&U256::from(USER_DEPOSIT_SOURCE_DOMAIN).to_be_bytes::<32>());
    source[32..].copy_from_slice(deposit_id_hash.as_slice());
    keccak256(source)
}

/// Reads a 32-byte word from an untyped slice.
pub fn word_from_slice(field: &'static str, bytes: &[u8]) -> Result<B256, HashCodecError> {
    B256::try_from(bytes).map_err(|_| HashCodecError { field, expected: 32, actual: bytes.len() })
}

/// Reads a 20-byte address from an untyped slice.
pub fn address_from_slice(field: &'static str, bytes: &[u8]) -> Result<Address, HashCodecError> {
    Address::try_from(bytes).map_err(|_| HashCodecError {
        field,
        expected: 20,
        actual: bytes.len(),
    })
}

/// [`storage_slot`] over an untyped message hash.
pub fn try_storage_slot(message_hash: &[u8]) -> Result<B256, HashCodecError> {
    word_from_slice("message_hash", message_hash).map(storage_slot)
}

/// [`output_root`] over untyped words.
pub fn try_output_root(
    version: &[u8],
    state_root: &[u8],
    message_passer_storage_root: &[u8],
    latest_block_hash: &[u8],
) -> Result<B256, HashCodecError> {
    Ok(output_root(
        word_from_slice("version", version)?,
        word_from_slice("state_root", state_root)?,
        word_from_slice("message_passer_storage_root", message_passer_storage_root)?,
        word_from_slice("latest_block_hash", latest_block_hash)?,
    ))
}

/// [`message_hash`] over untyped addresses.
pub fn try_message_hash(
    nonce: U256,
    sender: &[u8],
    target: &[u8],
    value: U256,
    gas_limit: U256,
    data: &Bytes,
) -> Result<B256, HashCodecError> {
    Ok(message_hash(
        nonce,
        address_from_slice("sender", sender)?,
        address_from_slice("target", target)?,
        value,
        gas_limit,
        data,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;
    use rstest::rstest;

    const SENDER: Address = Address::repeat_byte(0xAA);
    const TARGET: Address = Address::repeat_byte(0xBB);

    fn golden_hash() -> B256 {
        message_hash(
            U256::from(7),
            SENDER,
            TARGET,
            U256::from(1000),
            U256::from(20000),
            &Bytes::new(),
        )
    }

    #[test]
    fn test_message_hash_golden() {
        assert_eq!(
            golden_hash(),
            b256!("0x26e2a4aa84f8559c837febaf2f68878bc3187e81bb4fe7f5927d86c9c3a8c94f")
        );
    }

    #[test]
    fn test_storage_slot_golden() {
        assert_eq!(
            storage_slot(golden_hash()),
            b256!("0x6076a6be68e6452933ee042bda89046b2392f8a0b2b4963796833986e707ee4b")
        );
    }

    #[test]
    fn test_output_root_golden() {
        let root = output_root(
            B256::ZERO,
            B256::repeat_byte(0x11),
            B256::repeat_byte(0x22),
            B256::repeat_byte(0x33),
        );
        assert_eq!(
            root,
            b256!("0xd50bf2ff34ced71be0d2f0be7c2433c6b39d9c3b16c95daf1ed6f24b7578a3b2")
        );
    }

    #[rstest]
    #[case(3, b256!("0x9d6da23c6f04cc9d4ffdf42e6971fb491033412590399e9bd9faec9e1245373d"))]
    #[case(4, b256!("0x6bbd6e44966cdb01e5a211c0eb3305a25d1416d20b02b95eaf233dd88ff9b193"))]
    fn test_user_deposit_source_hash(#[case] log_index: u64, #[case] expected: B256) {
        assert_eq!(user_deposit_source_hash(B256::repeat_byte(0x01), log_index), expected);
    }

    #[test]
    fn test_message_hash_changes_with_every_field() {
        let base = golden_hash();
        let one = U256::from(1);
        let data = Bytes::new();
        let variants = [
            message_hash(U256::from(8), SENDER, TARGET, U256::from(1000), U256::from(20000), &data),
            message_hash(U256::from(7), TARGET, TARGET, U256::from(1000), U256::from(20000), &data),
            message_hash(U256::from(7), SENDER, SENDER, U256::from(1000), U256::from(20000), &data),
            message_hash(
                U256::from(7),
                SENDER,
                TARGET,
                U256::from(1000) + one,
                U256::from(20000),
                &data,
            ),
            message_hash(U256::from(7), SENDER, TARGET, U256::from(1000), U256::from(20001), &data),
            message_hash(
                U256::from(7),
                SENDER,
                TARGET,
                U256::from(1000),
                U256::from(20000),
                &Bytes::from_static(&[0x00]),
            ),
        ];
        for variant in variants {
            assert_ne!(variant, base);
        }
    }

    #[test]
    fn test_try_variants_reject_bad_lengths() {
        let err = try_storage_slot(&[0u8; 31]).unwrap_err();
        assert_eq!(err, HashCodecError { field: "message_hash", expected: 32, actual: 31 });

        let err = try_output_root(&[0u8; 32], &[0u8; 32], &[0u8; 33], &[0u8; 32]).unwrap_err();
        assert_eq!(err.field, "message_passer_storage_root");

        let err = try_message_hash(
            U256::ZERO,
            &[0u8; 20],
            &[0u8; 19],
            U256::ZERO,
            U256::ZERO,
            &Bytes::new(),
        )
        .unwrap_err();
        assert_eq!(err, HashCodecError { field: "target", expected: 20, actual: 19 });
    }

    #[test]
    fn test_try_variants_agree_with_typed() {
        let hash = golden_hash();
        assert_eq!(try_storage_slot(hash.as_slice()).unwrap(), storage_slot(hash));
        let untyped = try_message_hash(
            U256::from(7),
            SENDER.as_slice(),
            TARGET.as_slice(),
            U256::from(1000),
            U256::from(20000),
            &Bytes::new(),
        )
        .unwrap();
        assert_eq!(untyped, hash);
    }
}
