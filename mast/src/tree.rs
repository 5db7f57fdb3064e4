#[cfg(not(feature = "std"))]
use alloc::string::String;

use core::fmt;

use light_taproot_primitives::Script;
use light_taproot_schnorr::{Privkey, SchnorrPubkey};

use super::{
    branch::TapBranch,
    error::{MastError, Result},
    leaf::TapLeaf,
    util::is_valid_leaf_version,
    TapLeafHash, TapNodeHash, TapTweakHash,
};

/// A script tree seen from one of its leaves.
///
/// The base of the inner branch is always a leaf with a BIP341 leaf version,
/// so the merged node list is the control block path of that leaf.
#[derive(Clone, PartialEq, Eq)]
pub struct TaprootScriptTree {
    leaf: TapLeaf,
    branch: TapBranch,
}

impl Default for TaprootScriptTree {
    fn default() -> Self {
        let leaf = TapLeaf::default();
        TaprootScriptTree {
            branch: TapBranch::from_leaf(leaf.clone()),
            leaf,
        }
    }
}

impl TaprootScriptTree {
    pub fn new(leaf_version: u8, script: Script) -> Result<Self> {
        Self::from_leaf(TapLeaf::new(leaf_version, script))
    }

    /// Tree of a single BIP342 tapscript.
    pub fn from_script(script: Script) -> Self {
        let leaf = TapLeaf::from_script(script);
        TaprootScriptTree {
            branch: TapBranch::from_leaf(leaf.clone()),
            leaf,
        }
    }

    pub fn from_leaf(leaf: TapLeaf) -> Result<Self> {
        if !is_valid_leaf_version(leaf.leaf_version()) {
            log::warn!("Unsupported leaf version. [{:#04x}]", leaf.leaf_version());
            return Err(MastError::InvalidLeafVersion(leaf.leaf_version()));
        }
        Ok(TaprootScriptTree {
            branch: TapBranch::from_leaf(leaf.clone()),
            leaf,
        })
    }

    pub fn add_branch<B: Into<TapBranch>>(&mut self, branch: B) -> Result<()> {
        self.branch.add_branch(branch)
    }

    /// A tree whose script is empty cannot be spent.
    pub fn is_valid(&self) -> bool {
        !self.leaf.script().is_empty()
    }

    pub fn tap_leaf(&self) -> &TapLeaf {
        &self.leaf
    }

    pub fn leaf_version(&self) -> u8 {
        self.leaf.leaf_version()
    }

    pub fn script(&self) -> &Script {
        self.leaf.script()
    }

    pub fn tap_leaf_hash(&self) -> TapLeafHash {
        self.leaf.leaf_hash()
    }

    pub fn base_hash(&self) -> TapNodeHash {
        self.branch.base_hash()
    }

    pub fn current_branch_hash(&self) -> TapNodeHash {
        self.branch.current_branch_hash()
    }

    pub fn branch_hash(&self, depth: usize) -> Result<TapNodeHash> {
        self.branch.branch_hash(depth)
    }

    pub fn node_list(&self) -> &[TapNodeHash] {
        self.branch.node_list()
    }

    pub fn branch_list(&self) -> &[TapBranch] {
        self.branch.branch_list()
    }

    pub fn tap_tweak(&self, internal_pubkey: &SchnorrPubkey) -> TapTweakHash {
        self.branch.tap_tweak(internal_pubkey)
    }

    pub fn tweaked_pubkey(&self, internal_pubkey: &SchnorrPubkey) -> Result<(SchnorrPubkey, bool)> {
        self.branch.tweaked_pubkey(internal_pubkey)
    }

    pub fn tweaked_privkey(&self, internal_privkey: &Privkey) -> Result<(Privkey, bool)> {
        self.branch.tweaked_privkey(internal_privkey)
    }

    pub fn as_branch(&self) -> &TapBranch {
        &self.branch
    }

    pub fn to_text(&self) -> String {
        self.branch.to_text()
    }
}

impl From<TaprootScriptTree> for TapBranch {
    fn from(tree: TaprootScriptTree) -> Self {
        tree.branch
    }
}

impl TryFrom<TapBranch> for TaprootScriptTree {
    type Error = MastError;

    fn try_from(branch: TapBranch) -> Result<Self> {
        let leaf = match branch.tap_leaf() {
            Some(leaf) => leaf.clone(),
            None => {
                log::warn!("object is not tapleaf.");
                return Err(MastError::ScriptNotFound);
            }
        };
        if !is_valid_leaf_version(leaf.leaf_version()) {
            log::warn!("Unsupported leaf version. [{:#04x}]", leaf.leaf_version());
            return Err(MastError::InvalidLeafVersion(leaf.leaf_version()));
        }
        Ok(TaprootScriptTree { leaf, branch })
    }
}

impl fmt::Display for TaprootScriptTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for TaprootScriptTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TaprootScriptTree")
            .field("leaf", &self.leaf)
            .field("branch", &self.branch)
            .finish()
    }
}
