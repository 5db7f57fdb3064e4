use core::fmt;

#[cfg(not(feature = "std"))]
use alloc::string::String;

use codec::{Decode, Encode};
use light_taproot_primitives::Script;
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use super::{mast::tagged_leaf, TapLeafHash, TAPSCRIPT_LEAF_VERSION};

/// A single tapscript leaf: a script and the version it is interpreted under.
#[derive(Clone, PartialEq, Eq, Hash, Encode, Decode, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct TapLeaf {
    leaf_version: u8,
    script: Script,
}

impl Default for TapLeaf {
    fn default() -> Self {
        TapLeaf::from_script(Script::default())
    }
}

impl TapLeaf {
    /// Any version byte is accepted here; policy checks happen on the tree.
    pub fn new(leaf_version: u8, script: Script) -> Self {
        TapLeaf {
            leaf_version,
            script,
        }
    }

    pub fn from_script(script: Script) -> Self {
        TapLeaf::new(TAPSCRIPT_LEAF_VERSION, script)
    }

    pub fn leaf_version(&self) -> u8 {
        self.leaf_version
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn leaf_hash(&self) -> TapLeafHash {
        tagged_leaf(self.leaf_version, &self.script)
    }

    /// Textual form `tl(<script>[,<version>])`; the version is left out for
    /// plain tapscript.
    pub fn to_text(&self) -> String {
        let mut text = String::from("tl(");
        text.push_str(&self.script.to_hex());
        if self.leaf_version != TAPSCRIPT_LEAF_VERSION {
            text.push(',');
            text.push_str(&hex::encode([self.leaf_version]));
        }
        text.push(')');
        text
    }
}

impl fmt::Display for TapLeaf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for TapLeaf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TapLeaf")
            .field("leaf_version", &self.leaf_version)
            .field("script", &self.script)
            .finish()
    }
}
