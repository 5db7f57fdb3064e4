//! BIP341 taproot script trees: leaves, branches, the textual tree form and
//! the control block helpers built on top of them.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[macro_use]
pub extern crate bitcoin_hashes as hashes;

pub mod branch;
pub mod error;
pub mod leaf;
pub mod mast;
pub mod text;
pub mod tree;
pub mod util;

pub use crate::branch::TapBranch;
pub use crate::error::MastError;
pub use crate::leaf::TapLeaf;
pub use crate::mast::{tagged_branch, tagged_leaf, tagged_tweak};
pub use crate::text::TapTree;
pub use crate::tree::TaprootScriptTree;
pub use crate::util::{
    create_tapscript_control, is_valid_leaf_version, parse_taproot_sign_data, parse_witness_stack,
    taproot_locking_script, verify_taproot_commitment, ControlBlock, TapScriptControl,
    TaprootSignData,
};

use hashes::{hash_newtype, sha256, Hash};

/// Leaf version of BIP342 tapscript.
pub const TAPSCRIPT_LEAF_VERSION: u8 = 0xc0;
/// Maximum number of merkle nodes a control block may carry.
pub const TAPROOT_CONTROL_MAX_NODE_COUNT: usize = 128;
/// First byte of a witness annex.
pub const ANNEX_TAG: u8 = 0x50;

hash_newtype!(
    TapLeafHash,
    sha256::Hash,
    32,
    doc = "Tagged hash of a single tapscript leaf.",
    false
);
hash_newtype!(
    TapNodeHash,
    sha256::Hash,
    32,
    doc = "Hash of a node of the taproot script tree, leaves included.",
    false
);
hash_newtype!(
    TapTweakHash,
    sha256::Hash,
    32,
    doc = "Tagged hash committing an internal key to a script tree root.",
    false
);

impl From<TapLeafHash> for TapNodeHash {
    fn from(leaf: TapLeafHash) -> Self {
        TapNodeHash::from_inner(leaf.into_inner())
    }
}

impl TapNodeHash {
    /// The all-zero hash stands for "no script tree".
    pub fn is_zero(&self) -> bool {
        self.as_inner().iter().all(|b| *b == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_hash_from_slice() {
        let leaf = tagged_leaf(TAPSCRIPT_LEAF_VERSION, &light_taproot_primitives::Script::default());
        let node = TapNodeHash::from_slice(leaf.as_inner()).unwrap();
        assert_eq!(node, TapNodeHash::from(leaf));
        assert!(!node.is_zero());

        assert!(TapNodeHash::from_slice(&[0u8; 31]).is_err());
        assert!(TapLeafHash::from_slice(&[0u8; 33]).is_err());
        assert!(TapTweakHash::from_slice(&[0u8; 32]).is_ok());
        assert!(TapNodeHash::from_slice(&[0u8; 32]).unwrap().is_zero());
    }
}
