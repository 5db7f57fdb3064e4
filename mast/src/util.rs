//! Control blocks and taproot witness stacks.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use hashes::Hash;
use light_taproot_primitives::Script;
use light_taproot_schnorr::{SchnorrPubkey, SchnorrSignature, SCHNORR_PUBKEY_SIZE};
use light_taproot_serialization::{deserialize, Stream};

use super::{
    branch::{tweak_to_h256, TapBranch},
    error::{MastError, Result},
    tree::TaprootScriptTree,
    TapLeafHash, TapNodeHash, ANNEX_TAG, TAPROOT_CONTROL_MAX_NODE_COUNT, TAPSCRIPT_LEAF_VERSION,
};

const NODE_SIZE: usize = 32;
const CONTROL_MIN_SIZE: usize = SCHNORR_PUBKEY_SIZE + 1;

/// Whether `leaf_version` is a BIP341 leaf version.
pub fn is_valid_leaf_version(leaf_version: u8) -> bool {
    const VALID_LEAF_VERSIONS: [u8; 9] = [0x66, 0x7e, 0x80, 0x84, 0x96, 0x98, 0xba, 0xbc, 0xbe];
    if VALID_LEAF_VERSIONS.contains(&leaf_version) {
        return true;
    }
    leaf_version % 2 == 0 && (0xc0..=0xfe).contains(&leaf_version)
}

/// Script path spending proof of one leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlBlock {
    pub leaf_version: u8,
    /// Y parity of the output key
    pub parity: bool,
    pub internal_pubkey: SchnorrPubkey,
    pub nodes: Vec<TapNodeHash>,
}

impl ControlBlock {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < CONTROL_MIN_SIZE || (bytes.len() - 1) % NODE_SIZE != 0 {
            log::warn!("wrong taproot control size. [{}]", bytes.len());
            return Err(MastError::InvalidControlBlock(bytes.len()));
        }
        let node_count = (bytes.len() - CONTROL_MIN_SIZE) / NODE_SIZE;
        if node_count > TAPROOT_CONTROL_MAX_NODE_COUNT {
            log::warn!("taproot control node maximum over. [{}]", node_count);
            return Err(MastError::MaxNodeCountExceeded(node_count));
        }

        let internal_pubkey = SchnorrPubkey::from_slice(&bytes[1..CONTROL_MIN_SIZE])?;
        let nodes = bytes[CONTROL_MIN_SIZE..]
            .chunks_exact(NODE_SIZE)
            .map(|chunk| {
                let mut node = [0u8; NODE_SIZE];
                node.copy_from_slice(chunk);
                TapNodeHash::from_inner(node)
            })
            .collect();
        Ok(ControlBlock {
            leaf_version: bytes[0] & 0xfe,
            parity: bytes[0] & 0x01 == 0x01,
            internal_pubkey,
            nodes,
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut stream = Stream::default();
        stream.append(&(self.leaf_version | self.parity as u8));
        stream.append_slice(self.internal_pubkey.as_bytes());
        for node in &self.nodes {
            stream.append_slice(node.as_inner());
        }
        stream.out()
    }

    /// Whether `witness_program` commits to `tapscript` through this block.
    pub fn verify(&self, witness_program: &SchnorrPubkey, tapscript: &Script) -> Result<bool> {
        let (valid, _) = verify_taproot_commitment(
            self.parity,
            self.leaf_version,
            witness_program,
            &self.internal_pubkey,
            &self.nodes,
            tapscript,
        )?;
        Ok(valid)
    }
}

/// Everything needed to lock to a tree and later spend one of its leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TapScriptControl {
    pub control_block: ControlBlock,
    /// Tweaked output key
    pub witness_program: SchnorrPubkey,
    /// `OP_1 <witness_program>`
    pub locking_script: Script,
}

/// `OP_1 OP_PUSHBYTES_32 <key>`
pub fn taproot_locking_script(witness_program: &SchnorrPubkey) -> Script {
    let mut bytes = Vec::with_capacity(2 + SCHNORR_PUBKEY_SIZE);
    bytes.push(0x51);
    bytes.push(0x20);
    bytes.extend_from_slice(witness_program.as_bytes());
    Script::new(bytes)
}

/// Commits `internal_pubkey` to `tree` and builds the control block of the
/// tree's leaf.
pub fn create_tapscript_control(
    internal_pubkey: &SchnorrPubkey,
    tree: &TapBranch,
) -> Result<TapScriptControl> {
    let (witness_program, parity) = tree.tweaked_pubkey(internal_pubkey)?;
    let leaf_version = match tree.leaf_version() {
        0 => TAPSCRIPT_LEAF_VERSION,
        version => version,
    };
    Ok(TapScriptControl {
        control_block: ControlBlock {
            leaf_version,
            parity,
            internal_pubkey: *internal_pubkey,
            nodes: tree.node_list().to_vec(),
        },
        locking_script: taproot_locking_script(&witness_program),
        witness_program,
    })
}

/// Checks that `witness_program` is `internal_pubkey` tweaked by the tree
/// root rebuilt from `tapscript` and its merkle path.
///
/// The leaf hash of `tapscript` is returned alongside the result.
pub fn verify_taproot_commitment(
    parity: bool,
    leaf_version: u8,
    witness_program: &SchnorrPubkey,
    internal_pubkey: &SchnorrPubkey,
    nodes: &[TapNodeHash],
    tapscript: &Script,
) -> Result<(bool, TapLeafHash)> {
    let mut tree = TaprootScriptTree::new(leaf_version, tapscript.clone())?;
    let leaf_hash = tree.tap_leaf_hash();
    if nodes.len() > TAPROOT_CONTROL_MAX_NODE_COUNT {
        log::warn!("control node maximum over. [{}]", nodes.len());
        return Ok((false, leaf_hash));
    }
    for node in nodes {
        tree.add_branch(*node)?;
    }
    let tweak = tweak_to_h256(&tree.tap_tweak(internal_pubkey));
    Ok((
        witness_program.is_tweaked(internal_pubkey, &tweak, parity),
        leaf_hash,
    ))
}

/// Spending data carried by a taproot witness stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaprootSignData {
    KeyPath {
        signature: SchnorrSignature,
        annex: Option<Vec<u8>>,
    },
    ScriptPath {
        control_block: ControlBlock,
        tapscript: Script,
        /// Items below the script, in stack order
        stack: Vec<Vec<u8>>,
        annex: Option<Vec<u8>>,
    },
}

impl TaprootSignData {
    pub fn annex(&self) -> Option<&[u8]> {
        match self {
            TaprootSignData::KeyPath { annex, .. } | TaprootSignData::ScriptPath { annex, .. } => {
                annex.as_deref()
            }
        }
    }
}

/// Splits a taproot witness stack into key path or script path data.
pub fn parse_taproot_sign_data(witness_stack: &[Vec<u8>]) -> Result<TaprootSignData> {
    let mut size = witness_stack.len();
    let mut annex = None;
    if size >= 2 {
        if let Some(last) = witness_stack.last() {
            if last.first() == Some(&ANNEX_TAG) {
                annex = Some(last.clone());
                size -= 1;
            }
        }
    }

    match size {
        0 => {
            log::warn!("witness_stack is empty.");
            Err(MastError::EmptyWitnessStack)
        }
        1 => Ok(TaprootSignData::KeyPath {
            signature: SchnorrSignature::parse(&witness_stack[0])?,
            annex,
        }),
        _ => {
            let control_block = ControlBlock::parse(&witness_stack[size - 1])?;
            Ok(TaprootSignData::ScriptPath {
                control_block,
                tapscript: Script::from(&witness_stack[size - 2][..]),
                stack: witness_stack[..size - 2].to_vec(),
                annex,
            })
        }
    }
}

/// Decodes a serialized witness: a compact size item count followed by
/// length prefixed items.
pub fn parse_witness_stack(serialized: &[u8]) -> Result<Vec<Vec<u8>>> {
    Ok(deserialize(serialized)?)
}
