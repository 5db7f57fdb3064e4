#![cfg_attr(not(feature = "std"), no_std)]

pub use light_taproot_mast as mast;
pub use light_taproot_primitives as primitives;
pub use light_taproot_schnorr as schnorr;
pub use light_taproot_serialization as serialization;
