#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod hash;
mod script;

pub use self::hash::{h256_from_slice, H256, H264, H512};
pub use self::script::Script;
