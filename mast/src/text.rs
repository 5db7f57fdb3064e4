//! Textual form of script trees.
//!
//! ```text
//! tree := leaf | hash | "{" tree "," tree "}"
//! leaf := "tl(" hex-script ["," hex-version] ")"
//! hash := 64 hex characters
//! ```

#[cfg(not(feature = "std"))]
use alloc::{
    borrow::ToOwned,
    boxed::Box,
    format,
    string::String,
    vec::Vec,
};

use core::{fmt, str::FromStr};

use hashes::Hash;
use light_taproot_primitives::Script;

use super::{
    branch::TapBranch,
    error::{MastError, Result},
    leaf::TapLeaf,
    mast::tagged_branch,
    tree::TaprootScriptTree,
    TapNodeHash, TAPROOT_CONTROL_MAX_NODE_COUNT, TAPSCRIPT_LEAF_VERSION,
};

/// Parsed structure of a script tree.
#[derive(Clone, PartialEq, Eq)]
pub enum TapTree {
    /// Subtree known only by its hash
    Hash(TapNodeHash),
    Leaf(TapLeaf),
    Merge(Box<TapTree>, Box<TapTree>),
}

impl TapTree {
    pub fn parse(text: &str) -> Result<Self> {
        let mut parser = Parser::new(text)?;
        let tree = parser.tree(0)?;
        if parser.pos != parser.text.len() {
            return Err(parser.error("trailing characters"));
        }
        Ok(tree)
    }

    pub fn hash(&self) -> TapNodeHash {
        match self {
            TapTree::Hash(hash) => *hash,
            TapTree::Leaf(leaf) => leaf.leaf_hash().into(),
            TapTree::Merge(left, right) => tagged_branch(&left.hash(), &right.hash()),
        }
    }

    /// Builds the accumulating branch of this subtree.
    ///
    /// A merge keeps its left side as the base unless only the right side
    /// carries a leaf.
    pub fn to_branch(&self) -> Result<TapBranch> {
        match self {
            TapTree::Hash(hash) => Ok(TapBranch::from_commitment(*hash)),
            TapTree::Leaf(leaf) => Ok(TapBranch::from_leaf(leaf.clone())),
            TapTree::Merge(left, right) => {
                let left = left.to_branch()?;
                let right = right.to_branch()?;
                if !left.has_tap_leaf() && right.has_tap_leaf() {
                    let mut branch = right;
                    branch.add_branch(left)?;
                    Ok(branch)
                } else {
                    let mut branch = left;
                    branch.add_branch(right)?;
                    Ok(branch)
                }
            }
        }
    }

    /// Pre-order search for subtrees accepted by `is_target`, each returned
    /// with its sibling path ordered from the root down.
    fn find_paths<'a, F>(
        &'a self,
        is_target: &F,
        siblings: &mut Vec<&'a TapTree>,
        found: &mut Vec<(&'a TapTree, Vec<&'a TapTree>)>,
    ) where
        F: Fn(&TapTree) -> bool,
    {
        if is_target(self) {
            found.push((self, siblings.clone()));
        }
        if let TapTree::Merge(left, right) = self {
            siblings.push(right);
            left.find_paths(is_target, siblings, found);
            siblings.pop();
            siblings.push(left);
            right.find_paths(is_target, siblings, found);
            siblings.pop();
        }
    }

    fn paths<F>(&self, is_target: F) -> Vec<(&TapTree, Vec<&TapTree>)>
    where
        F: Fn(&TapTree) -> bool,
    {
        let mut found = Vec::new();
        self.find_paths(&is_target, &mut Vec::new(), &mut found);
        found
    }

    fn to_text(&self) -> String {
        match self {
            TapTree::Hash(hash) => hex::encode(hash.as_inner()),
            TapTree::Leaf(leaf) => leaf.to_text(),
            TapTree::Merge(left, right) => {
                let (first, second) = if right.hash().as_inner() < left.hash().as_inner() {
                    (right, left)
                } else {
                    (left, right)
                };
                format!("{{{},{}}}", first.to_text(), second.to_text())
            }
        }
    }
}

impl fmt::Display for TapTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for TapTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TapTree({})", self.to_text())
    }
}

impl FromStr for TapTree {
    type Err = MastError;

    fn from_str(s: &str) -> Result<Self> {
        TapTree::parse(s)
    }
}

struct Parser<'a> {
    text: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Result<Self> {
        if let Some(index) = text.find(char::is_whitespace) {
            log::warn!("tree text contains whitespace. [{}]", index);
            return Err(MastError::InvalidTreeFormat(format!(
                "whitespace at {}",
                index
            )));
        }
        Ok(Parser {
            text: text.as_bytes(),
            pos: 0,
        })
    }

    fn error(&self, reason: &str) -> MastError {
        log::warn!("invalid tree text at {}: {}", self.pos, reason);
        MastError::InvalidTreeFormat(format!("{} at {}", reason, self.pos))
    }

    fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    /// Lowercase hex digits only.
    fn hex_run(&mut self) -> &'a [u8] {
        let text = self.text;
        let start = self.pos;
        while self.peek().map_or(false, |b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            self.pos += 1;
        }
        &text[start..self.pos]
    }

    fn tree(&mut self, depth: usize) -> Result<TapTree> {
        if depth > TAPROOT_CONTROL_MAX_NODE_COUNT {
            return Err(self.error("tree too deep"));
        }
        match self.peek() {
            Some(b'{') => {
                self.pos += 1;
                let left = self.tree(depth + 1)?;
                self.expect(b',')?;
                let right = self.tree(depth + 1)?;
                self.expect(b'}')?;
                Ok(TapTree::Merge(Box::new(left), Box::new(right)))
            }
            Some(b't') => self.leaf(),
            Some(_) => self.hash(),
            None => Err(self.error("unexpected end")),
        }
    }

    fn leaf(&mut self) -> Result<TapTree> {
        if !self.text[self.pos..].starts_with(b"tl(") {
            return Err(self.error("expected 'tl('"));
        }
        self.pos += 3;
        let script = hex::decode(self.hex_run()).map_err(|_| self.error("invalid script hex"))?;
        let mut leaf_version = TAPSCRIPT_LEAF_VERSION;
        if self.peek() == Some(b',') {
            self.pos += 1;
            let version = self.hex_run();
            if version.is_empty() || version.len() > 2 {
                return Err(self.error("invalid leaf version"));
            }
            leaf_version = version.iter().fold(0u8, |acc, digit| {
                (acc << 4) | (*digit as char).to_digit(16).unwrap_or(0) as u8
            });
        }
        self.expect(b')')?;
        Ok(TapTree::Leaf(TapLeaf::new(leaf_version, Script::new(script))))
    }

    fn hash(&mut self) -> Result<TapTree> {
        let digits = self.hex_run();
        if digits.len() != 64 {
            return Err(self.error("expected 32-byte hash"));
        }
        let bytes = hex::decode(digits).map_err(|_| self.error("invalid hash hex"))?;
        let hash = TapNodeHash::from_slice(&bytes).map_err(|_| self.error("invalid hash"))?;
        Ok(TapTree::Hash(hash))
    }
}

impl TapBranch {
    /// Parses a whole tree. The empty string is the empty branch.
    pub fn from_string(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Ok(TapBranch::new());
        }
        TapTree::parse(text)?.to_branch()
    }

    /// Parses a tree and re-roots it at the first node with the hash of
    /// `subtree`, whatever order its children are written in.
    ///
    /// The returned branch is `subtree` merged with its siblings from the
    /// bottom up, so its node list is the path of `subtree` to the root.
    pub fn from_string_with_subtree(text: &str, subtree: &TapBranch) -> Result<Self> {
        let tree = TapTree::parse(text)?;
        let target = subtree.current_branch_hash();
        let (found, siblings) = tree
            .paths(|node| node.hash() == target)
            .into_iter()
            .next()
            .ok_or(MastError::ScriptNotFound)?;
        let mut branch = found.to_branch()?;
        for sibling in siblings.iter().rev() {
            branch.add_branch(sibling.to_branch()?)?;
        }
        Ok(branch)
    }
}

impl FromStr for TapBranch {
    type Err = MastError;

    fn from_str(s: &str) -> Result<Self> {
        TapBranch::from_string(s)
    }
}

impl TaprootScriptTree {
    /// Parses a tree and rebuilds it from the leaf holding `tapscript`.
    ///
    /// Leaves are tried in pre-order and leaves with an unsupported version
    /// are skipped. When `known_nodes` is not empty, only a leaf whose node
    /// list equals it is accepted; a trailing entry equal to the leaf hash
    /// itself is ignored.
    pub fn from_string(
        text: &str,
        tapscript: &Script,
        known_nodes: &[TapNodeHash],
    ) -> Result<Self> {
        let tree = TapTree::parse(text)?;
        let candidates = tree.paths(
            |node| matches!(node, TapTree::Leaf(leaf) if leaf.script() == tapscript),
        );
        for (found, siblings) in candidates {
            let leaf = match found {
                TapTree::Leaf(leaf) => leaf.clone(),
                _ => continue,
            };
            let mut expected = known_nodes;
            if let Some((last, rest)) = known_nodes.split_last() {
                if *last == TapNodeHash::from(leaf.leaf_hash()) {
                    expected = rest;
                }
            }
            if !expected.is_empty() && expected.len() != siblings.len() {
                continue;
            }

            let mut script_tree = match TaprootScriptTree::from_leaf(leaf) {
                Ok(script_tree) => script_tree,
                Err(_) => continue,
            };
            for sibling in siblings.iter().rev() {
                script_tree.add_branch(sibling.to_branch()?)?;
            }
            if expected.is_empty() || script_tree.node_list() == expected {
                return Ok(script_tree);
            }
        }
        log::warn!("This tapscript not exist in this tree.");
        Err(MastError::ScriptNotFound)
    }
}

impl TapLeaf {
    pub fn from_string(text: &str) -> Result<Self> {
        match TapTree::parse(text)? {
            TapTree::Leaf(leaf) => Ok(leaf),
            _ => Err(MastError::InvalidTreeFormat(text.to_owned())),
        }
    }
}
