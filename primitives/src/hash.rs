pub use primitive_types::{H256, H512};

use fixed_hash::construct_fixed_hash;
use impl_codec::impl_fixed_hash_codec;
#[cfg(feature = "std")]
use impl_serde::impl_fixed_hash_serde;

construct_fixed_hash! {
    /// Fixed-size uninterpreted hash type with 33 bytes (264 bits) size.
    ///
    /// Holds a compressed secp256k1 point.
    #[derive(scale_info::TypeInfo)]
    pub struct H264(33);
}

#[cfg(feature = "std")]
mod serde_impls {
    use super::*;

    impl_fixed_hash_serde!(H264, 33);
}

mod codec_impls {
    use super::*;

    impl_fixed_hash_codec!(H264, 33);
}

/// Length-checked counterpart of `H256::from_slice`, which panics on a bad length.
pub fn h256_from_slice(bytes: &[u8]) -> Option<H256> {
    if bytes.len() != 32 {
        return None;
    }
    Some(H256::from_slice(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h256_from_slice() {
        let bytes = [0x11u8; 32];
        assert_eq!(h256_from_slice(&bytes), Some(H256::from(bytes)));
        assert_eq!(h256_from_slice(&bytes[..31]), None);
        assert_eq!(h256_from_slice(&[0u8; 33]), None);
    }

    #[test]
    fn test_h256_orders_bytewise() {
        let low = H256::from([0x00u8; 32]);
        let mut high_bytes = [0x00u8; 32];
        high_bytes[0] = 0x01;
        let high = H256::from(high_bytes);
        assert!(low < high);
    }
}
