//! Builds a merkle proof over a handful of real `btc-tx` transaction ids and
//! checks it through `MerkleBlock::is_valid`, the way an SPV client would
//! confirm a `filterload`-prompted `merkleblock` response.

use btc_block::MerkleBlock;
use btc_common::merkle::merkle_root;
use btc_script::Script;
use btc_tx::{Tx, TxIn, TxOut};

fn tx_hash(seed: u8) -> [u8; 32] {
    let tx = Tx::new(
        1,
        vec![TxIn::new([seed; 32], 0, Script::default(), 0xffffffff)],
        vec![TxOut::new(1_000 + seed as u64, Script::default())],
        0,
        false,
    );
    tx.hash()
}

#[test]
fn merkle_block_with_every_hash_revealed_validates() {
    let leaves = [tx_hash(1), tx_hash(2), tx_hash(3)];
    let root = merkle_root(&leaves).expect("non-empty");

    let block = MerkleBlock {
        version: 1,
        prev_block: [0u8; 32],
        merkle_root: root,
        timestamp: 0,
        bits: 0x1d00ffff,
        nonce: 0,
        total: leaves.len() as u32,
        hashes: leaves.to_vec(),
        // root + (left leaf, right leaf) + (lone third leaf's subtree) = 6 nodes visited.
        flags: vec![true; 6],
    };

    assert!(block.is_valid().expect("populate"));
}

#[test]
fn merkle_block_with_a_mismatched_root_is_rejected() {
    let leaves = [tx_hash(1), tx_hash(2)];
    let block = MerkleBlock {
        version: 1,
        prev_block: [0u8; 32],
        merkle_root: [0xaa; 32],
        timestamp: 0,
        bits: 0x1d00ffff,
        nonce: 0,
        total: leaves.len() as u32,
        hashes: leaves.to_vec(),
        flags: vec![true; 3],
    };

    assert!(!block.is_valid().expect("populate"));
}
