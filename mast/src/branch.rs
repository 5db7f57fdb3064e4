//! Accumulating merkle branch of a taproot script tree.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use core::fmt;

use hashes::Hash;
use light_taproot_primitives::{Script, H256};
use light_taproot_schnorr::{Privkey, SchnorrPubkey};

use super::{
    error::{MastError, Result},
    leaf::TapLeaf,
    mast::{tagged_branch, tagged_tweak},
    TapLeafHash, TapNodeHash, TapTweakHash, TAPROOT_CONTROL_MAX_NODE_COUNT,
};

/// A branch of the script tree.
///
/// The branch starts from a base (nothing, an opaque commitment or a leaf)
/// and merges further branches into it one at a time. Every merge is a
/// `TapBranch` hash of the sorted pair, so the resulting hash does not depend
/// on the order the merges were requested in. The merged branches and their
/// hashes are kept in merge order: they are the control block path of the
/// base.
#[derive(Clone, PartialEq, Eq)]
pub struct TapBranch {
    leaf: Option<TapLeaf>,
    root_commitment: TapNodeHash,
    branch_list: Vec<TapBranch>,
    node_list: Vec<TapNodeHash>,
    current_hash: TapNodeHash,
}

impl Default for TapBranch {
    fn default() -> Self {
        let zero = TapNodeHash::from_inner([0u8; 32]);
        TapBranch {
            leaf: None,
            root_commitment: zero,
            branch_list: Vec::new(),
            node_list: Vec::new(),
            current_hash: zero,
        }
    }
}

impl TapBranch {
    /// An empty branch. Its hash is all-zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A branch known only by its hash.
    pub fn from_commitment(commitment: TapNodeHash) -> Self {
        TapBranch {
            root_commitment: commitment,
            current_hash: commitment,
            ..Default::default()
        }
    }

    pub fn from_leaf(leaf: TapLeaf) -> Self {
        let hash = TapNodeHash::from(leaf.leaf_hash());
        TapBranch {
            leaf: Some(leaf),
            current_hash: hash,
            ..Default::default()
        }
    }

    /// Merge `branch` into this one.
    pub fn add_branch<B: Into<TapBranch>>(&mut self, branch: B) -> Result<()> {
        let branch = branch.into();
        if self.branch_list.len() >= TAPROOT_CONTROL_MAX_NODE_COUNT {
            log::warn!(
                "taproot tree node maximum over. [{}]",
                self.branch_list.len() + 1
            );
            return Err(MastError::MaxNodeCountExceeded(self.branch_list.len() + 1));
        }
        let node = branch.current_hash;
        self.current_hash = tagged_branch(&self.current_hash, &node);
        self.node_list.push(node);
        self.branch_list.push(branch);
        Ok(())
    }

    pub fn has_tap_leaf(&self) -> bool {
        self.leaf.is_some()
    }

    pub fn tap_leaf(&self) -> Option<&TapLeaf> {
        self.leaf.as_ref()
    }

    /// Leaf version of the base leaf, or 0 without one.
    pub fn leaf_version(&self) -> u8 {
        self.leaf.as_ref().map_or(0, TapLeaf::leaf_version)
    }

    pub fn script(&self) -> Option<&Script> {
        self.leaf.as_ref().map(TapLeaf::script)
    }

    pub fn tap_leaf_hash(&self) -> Option<TapLeafHash> {
        self.leaf.as_ref().map(TapLeaf::leaf_hash)
    }

    /// Hash of the base, before any merge.
    pub fn base_hash(&self) -> TapNodeHash {
        match &self.leaf {
            Some(leaf) => leaf.leaf_hash().into(),
            None => self.root_commitment,
        }
    }

    pub fn current_branch_hash(&self) -> TapNodeHash {
        self.current_hash
    }

    /// Hash after the first `depth` merges.
    pub fn branch_hash(&self, depth: usize) -> Result<TapNodeHash> {
        if depth > self.node_list.len() {
            log::warn!(
                "branch depth out of range. [{}/{}]",
                depth,
                self.node_list.len()
            );
            return Err(MastError::MaxNodeCountExceeded(depth));
        }
        Ok(self.node_list[..depth]
            .iter()
            .fold(self.base_hash(), |hash, node| tagged_branch(&hash, node)))
    }

    /// Hashes of the merged branches, in merge order.
    pub fn node_list(&self) -> &[TapNodeHash] {
        &self.node_list
    }

    /// Merged branches, in merge order.
    pub fn branch_list(&self) -> &[TapBranch] {
        &self.branch_list
    }

    pub fn is_empty(&self) -> bool {
        self.leaf.is_none() && self.branch_list.is_empty() && self.root_commitment.is_zero()
    }

    pub fn tap_tweak(&self, internal_pubkey: &SchnorrPubkey) -> TapTweakHash {
        tagged_tweak(internal_pubkey, &self.current_hash)
    }

    /// Output key committing `internal_pubkey` to this branch, with its parity.
    pub fn tweaked_pubkey(&self, internal_pubkey: &SchnorrPubkey) -> Result<(SchnorrPubkey, bool)> {
        let tweak = tweak_to_h256(&self.tap_tweak(internal_pubkey));
        Ok(internal_pubkey.create_tweak_add(&tweak)?)
    }

    /// Secret key of the tweaked output key, with the output key parity.
    pub fn tweaked_privkey(&self, internal_privkey: &Privkey) -> Result<(Privkey, bool)> {
        let (internal_pubkey, _) = SchnorrPubkey::from_privkey(internal_privkey);
        let tweak = tweak_to_h256(&self.tap_tweak(&internal_pubkey));
        let (_, privkey, parity) =
            SchnorrPubkey::create_tweak_add_from_privkey(internal_privkey, &tweak)?;
        Ok((privkey, parity))
    }

    /// Canonical text of the branch: the two sides of every merge are
    /// printed in hash order.
    pub fn to_text(&self) -> String {
        let mut text = match &self.leaf {
            Some(leaf) => leaf.to_text(),
            None if self.is_empty() => return String::new(),
            None => hex::encode(self.root_commitment.as_inner()),
        };
        let mut hash = self.base_hash();
        for branch in &self.branch_list {
            let node = branch.current_hash;
            let branch_text = branch.to_text();
            let mut merged = String::with_capacity(text.len() + branch_text.len() + 3);
            merged.push('{');
            if hash.as_inner() < node.as_inner() {
                merged.push_str(&text);
                merged.push(',');
                merged.push_str(&branch_text);
            } else {
                merged.push_str(&branch_text);
                merged.push(',');
                merged.push_str(&text);
            }
            merged.push('}');
            text = merged;
            hash = tagged_branch(&hash, &node);
        }
        text
    }
}

pub(crate) fn tweak_to_h256(tweak: &TapTweakHash) -> H256 {
    H256::from(tweak.into_inner())
}

impl fmt::Display for TapBranch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for TapBranch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TapBranch")
            .field("current_hash", &self.current_hash)
            .field("tree", &self.to_text())
            .finish()
    }
}

impl From<TapNodeHash> for TapBranch {
    fn from(commitment: TapNodeHash) -> Self {
        TapBranch::from_commitment(commitment)
    }
}

impl From<SchnorrPubkey> for TapBranch {
    fn from(commitment: SchnorrPubkey) -> Self {
        TapBranch::from_commitment(TapNodeHash::from_inner(*commitment.as_bytes()))
    }
}

impl From<TapLeaf> for TapBranch {
    fn from(leaf: TapLeaf) -> Self {
        TapBranch::from_leaf(leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use light_taproot_schnorr::sign;

    pub(crate) fn node(s: &str) -> TapNodeHash {
        TapNodeHash::from_slice(&hex::decode(s).unwrap()).unwrap()
    }

    fn internal_key() -> (Privkey, SchnorrPubkey) {
        let key = Privkey::from_hex("305e293b010d29bf3c888b617763a438fee9054c8cab66eb12ad078f819d9f27")
            .unwrap();
        let (pubkey, parity) = SchnorrPubkey::from_privkey(&key);
        assert_eq!(
            pubkey.to_hex(),
            "1777701648fa4dd93c74edd9d58cfcc7bdc2fa30a2f6fa908b6fd70c92833cfb"
        );
        assert!(parity);
        (key, pubkey)
    }

    #[test]
    fn test_empty_branch() {
        let (key, pubkey) = internal_key();
        let tree = TapBranch::new();
        assert!(tree.base_hash().is_zero());
        assert!(tree.current_branch_hash().is_zero());
        assert!(!tree.has_tap_leaf());
        assert_eq!(tree.to_string(), "");

        let (tweaked, _) = tree.tweaked_pubkey(&pubkey).unwrap();
        assert_eq!(
            tweaked.to_hex(),
            "cc3b1538e0c8144375f71e848b12d609d743992fddfc60dd6ca9b33b8392f27a"
        );
        let (tweaked_key, _) = tree.tweaked_privkey(&key).unwrap();
        assert_eq!(
            tweaked_key.to_hex(),
            "3a56ec9129732312a78db4b845138a3180c102621d7381ae6e6a5d530f14856a"
        );

        let msg = H256::from_slice(
            &hex::decode("e5b11ddceab1e4fc49a8132ae589a39b07acf49cabb2b0fbf6104bc31da12c02")
                .unwrap(),
        );
        let sig = sign(&msg, &tweaked_key, &H256::zero()).unwrap();
        assert!(tweaked.verify(&sig, &msg));
    }

    #[test]
    fn test_commitment_branch() {
        let a = node("4d18084bb47027f47d428b2ed67e1ccace5520fdc36f308e272394e288d53b6d");
        let b = node("dc82121e4ff8d23745f3859e8939ecb0a38af63e6ddea2fff97a7fd61a1d2d54");
        let mut branch = TapBranch::from_commitment(a);
        assert_eq!(branch.base_hash(), a);
        branch.add_branch(b).unwrap();
        assert_eq!(branch.current_branch_hash(), tagged_branch(&a, &b));
        assert_eq!(branch.node_list(), &[b]);
        assert_eq!(
            branch.to_string(),
            "{4d18084bb47027f47d428b2ed67e1ccace5520fdc36f308e272394e288d53b6d,\
             dc82121e4ff8d23745f3859e8939ecb0a38af63e6ddea2fff97a7fd61a1d2d54}"
        );
    }

    #[test]
    fn test_merge_is_commutative() {
        let a = TapLeaf::from_script(Script::from_hex("51").unwrap());
        let b = TapLeaf::from_script(Script::from_hex("52").unwrap());

        let mut ab = TapBranch::from_leaf(a.clone());
        ab.add_branch(b.clone()).unwrap();
        let mut ba = TapBranch::from_leaf(b);
        ba.add_branch(a).unwrap();

        assert_eq!(ab.current_branch_hash(), ba.current_branch_hash());
        assert_eq!(ab.to_string(), ba.to_string());
    }

    #[test]
    fn test_branch_hash_by_depth() {
        let leaf = TapLeaf::new(0xc4, Script::from_hex("51").unwrap());
        let a = node("4d18084bb47027f47d428b2ed67e1ccace5520fdc36f308e272394e288d53b6d");
        let b = node("dc82121e4ff8d23745f3859e8939ecb0a38af63e6ddea2fff97a7fd61a1d2d54");
        let mut branch = TapBranch::from_leaf(leaf);
        branch.add_branch(a).unwrap();
        branch.add_branch(b).unwrap();

        assert_eq!(branch.branch_hash(0).unwrap(), branch.base_hash());
        assert_eq!(
            branch.branch_hash(1).unwrap(),
            tagged_branch(&branch.base_hash(), &a)
        );
        assert_eq!(branch.branch_hash(2).unwrap(), branch.current_branch_hash());
        assert_eq!(
            hex::encode(branch.current_branch_hash().as_inner()),
            "daf066945913caa54e4ccfe32f0ca769b6c06679191cc01b9d96664226a1ffb4"
        );
        assert!(branch.branch_hash(3).is_err());
    }

    #[test]
    fn test_node_limit() {
        let mut branch = TapBranch::from_leaf(TapLeaf::default());
        for i in 0..TAPROOT_CONTROL_MAX_NODE_COUNT {
            branch
                .add_branch(TapNodeHash::from_inner([i as u8; 32]))
                .unwrap();
        }
        assert_eq!(
            branch.add_branch(TapNodeHash::from_inner([0xff; 32])),
            Err(MastError::MaxNodeCountExceeded(129))
        );
        assert_eq!(branch.node_list().len(), TAPROOT_CONTROL_MAX_NODE_COUNT);
    }

    #[test]
    fn test_pubkey_as_commitment() {
        let bytes = hex::decode("dc82121e4ff8d23745f3859e8939ecb0a38af63e6ddea2fff97a7fd61a1d2d54").unwrap();
        let from_key = TapBranch::from(SchnorrPubkey::from_slice(&bytes).unwrap());
        let from_hash = TapBranch::from(TapNodeHash::from_slice(&bytes).unwrap());
        assert_eq!(from_key, from_hash);
    }
}
