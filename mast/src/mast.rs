#![allow(clippy::module_inception)]

use digest::Digest;
use hashes::Hash;
use light_taproot_primitives::Script;
use light_taproot_schnorr::{
    taggedhash::{TAG_TAP_BRANCH, TAG_TAP_LEAF, TAG_TAP_TWEAK},
    HashAdd, SchnorrPubkey, Tagged,
};
use light_taproot_serialization::Stream;

use super::{TapLeafHash, TapNodeHash, TapTweakHash};

fn finalize<H: Hash<Inner = [u8; 32]>>(engine: sha2::Sha256) -> H {
    let mut inner = [0u8; 32];
    inner.copy_from_slice(&engine.finalize());
    H::from_inner(inner)
}

/// Calculate the leaf hash of a tapscript
///
/// tagged_hash("TapLeaf", bytes([leaf_version]) + ser_script(script))
pub fn tagged_leaf(leaf_version: u8, script: &Script) -> TapLeafHash {
    let mut stream = Stream::default();
    stream.append(&leaf_version);
    stream.append_list(script.as_bytes());
    let out = stream.out();

    finalize(
        sha2::Sha256::default()
            .tagged(TAG_TAP_LEAF)
            .add(&out[..]),
    )
}

/// Calculate branch nodes from two children
///
/// tagged_hash("TapBranch", left + right). The children are sorted byte-wise,
/// so the result does not depend on the argument order.
pub fn tagged_branch(a: &TapNodeHash, b: &TapNodeHash) -> TapNodeHash {
    let (left, right) = lexicographical_compare(a, b);
    finalize(
        sha2::Sha256::default()
            .tagged(TAG_TAP_BRANCH)
            .add(&left[..])
            .add(&right[..]),
    )
}

/// Lexicographic order of left and right nodes
fn lexicographical_compare<'a>(
    left: &'a TapNodeHash,
    right: &'a TapNodeHash,
) -> (&'a TapNodeHash, &'a TapNodeHash) {
    if right.as_inner() < left.as_inner() {
        (right, left)
    } else {
        (left, right)
    }
}

/// Compute the taproot tweak of an internal key
///
/// tagged_hash("TapTweak", P + root). A zero root means a key-only output and
/// is left out of the preimage.
pub fn tagged_tweak(internal_pubkey: &SchnorrPubkey, root: &TapNodeHash) -> TapTweakHash {
    let engine = sha2::Sha256::default()
        .tagged(TAG_TAP_TWEAK)
        .add(internal_pubkey.as_bytes());
    if root.is_zero() {
        finalize(engine)
    } else {
        finalize(engine.add(&root[..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(s: &str) -> TapNodeHash {
        TapNodeHash::from_slice(&hex::decode(s).unwrap()).unwrap()
    }

    #[test]
    fn test_empty_leaf() {
        let hash = tagged_leaf(0xc0, &Script::default());
        assert_eq!(
            hex::encode(hash.as_inner()),
            "83d956a5b36109f8f667aa9b366e8479942e32396455b5f43b6df917768e4d45"
        );
    }

    #[test]
    fn test_leaf_version_changes_hash() {
        let script = Script::from_hex("51").unwrap();
        assert_eq!(
            hex::encode(tagged_leaf(0xc4, &script).as_inner()),
            "b893df7b9b277874f3427de6af5a8d9b1ba5ba6be139557d7a1db9cc4a4e5dae"
        );
        assert_ne!(tagged_leaf(0xc0, &script), tagged_leaf(0xc4, &script));
    }

    #[test]
    fn test_branch_is_commutative() {
        let a = node("4d18084bb47027f47d428b2ed67e1ccace5520fdc36f308e272394e288d53b6d");
        let b = node("dc82121e4ff8d23745f3859e8939ecb0a38af63e6ddea2fff97a7fd61a1d2d54");
        assert_eq!(tagged_branch(&a, &b), tagged_branch(&b, &a));
    }

    #[test]
    fn test_equal_children_are_hashed() {
        let a = node("4d18084bb47027f47d428b2ed67e1ccace5520fdc36f308e272394e288d53b6d");
        assert_ne!(tagged_branch(&a, &a), a);
    }

    #[test]
    fn test_tweak_without_root() {
        let internal = SchnorrPubkey::from_hex(
            "1777701648fa4dd93c74edd9d58cfcc7bdc2fa30a2f6fa908b6fd70c92833cfb",
        )
        .unwrap();
        let zero = TapNodeHash::from_inner([0u8; 32]);
        let one = TapNodeHash::from_inner([1u8; 32]);
        assert_ne!(tagged_tweak(&internal, &zero), tagged_tweak(&internal, &one));
    }
}
