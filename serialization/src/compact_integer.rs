//! Variable-length integer commonly used in the bitcoin [P2P protocol](https://bitcoin.org/en/developer-reference#compactsize-unsigned-integers)

use core::fmt;

use codec::{Decode, Encode};

use crate::{
    reader::{Deserializable, Error, Reader},
    stream::{Serializable, Stream},
};

/// A type of variable-length integer commonly used in the Bitcoin P2P protocol and Bitcoin serialized data structures.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, scale_info::TypeInfo)]
pub struct CompactInteger(u64);

impl fmt::Display for CompactInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CompactInteger> for usize {
    fn from(i: CompactInteger) -> Self {
        i.0 as usize
    }
}

impl From<CompactInteger> for u64 {
    fn from(i: CompactInteger) -> Self {
        i.0
    }
}

impl From<u8> for CompactInteger {
    fn from(i: u8) -> Self {
        CompactInteger(i as u64)
    }
}

impl From<u16> for CompactInteger {
    fn from(i: u16) -> Self {
        CompactInteger(i as u64)
    }
}

impl From<u32> for CompactInteger {
    fn from(i: u32) -> Self {
        CompactInteger(i as u64)
    }
}

impl From<usize> for CompactInteger {
    fn from(i: usize) -> Self {
        CompactInteger(i as u64)
    }
}

impl From<u64> for CompactInteger {
    fn from(i: u64) -> Self {
        CompactInteger(i)
    }
}

impl Serializable for CompactInteger {
    fn serialize(&self, stream: &mut Stream) {
        match self.0 {
            0..=0xfc => {
                stream.append(&(self.0 as u8));
            }
            0xfd..=0xffff => {
                stream.append(&0xfdu8).append(&(self.0 as u16));
            }
            0x10000..=0xffff_ffff => {
                stream.append(&0xfeu8).append(&(self.0 as u32));
            }
            _ => {
                stream.append(&0xffu8).append(&self.0);
            }
        }
    }

    fn serialized_size(&self) -> usize {
        match self.0 {
            0..=0xfc => 1,
            0xfd..=0xffff => 3,
            0x10000..=0xffff_ffff => 5,
            _ => 9,
        }
    }
}

impl Deserializable for CompactInteger {
    fn deserialize(reader: &mut Reader) -> Result<Self, Error> {
        let result = match reader.read::<u8>()? {
            i @ 0..=0xfc => i.into(),
            0xfd => {
                let value = reader.read::<u16>()?;
                if value < 0xfd {
                    return Err(Error::MalformedData);
                }
                value.into()
            }
            0xfe => {
                let value = reader.read::<u32>()?;
                if value <= 0xffff {
                    return Err(Error::MalformedData);
                }
                value.into()
            }
            _ => {
                let value = reader.read::<u64>()?;
                if value <= 0xffff_ffff {
                    return Err(Error::MalformedData);
                }
                value.into()
            }
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{deserialize, serialize};

    #[test]
    fn test_compact_integer_boundaries() {
        let cases: [(u64, &str); 7] = [
            (0, "00"),
            (0xfc, "fc"),
            (0xfd, "fdfd00"),
            (0xffff, "fdffff"),
            (0x10000, "fe00000100"),
            (0xffff_ffff, "feffffffff"),
            (0x1_0000_0000, "ff0000000001000000"),
        ];
        for (value, expected) in cases {
            let compact = CompactInteger::from(value);
            let bytes = serialize(&compact);
            assert_eq!(hex::encode(&bytes), expected);
            assert_eq!(bytes.len(), compact.serialized_size());
            assert_eq!(deserialize::<CompactInteger>(&bytes), Ok(compact));
        }
    }

    #[test]
    fn test_compact_integer_rejects_non_minimal() {
        assert_eq!(
            deserialize::<CompactInteger>(&[0xfd, 0x10, 0x00]),
            Err(Error::MalformedData)
        );
        assert_eq!(
            deserialize::<CompactInteger>(&[0xfe, 0xff, 0xff, 0x00, 0x00]),
            Err(Error::MalformedData)
        );
        assert_eq!(
            deserialize::<CompactInteger>(&[0xfd, 0x10]),
            Err(Error::UnexpectedEnd)
        );
    }
}
