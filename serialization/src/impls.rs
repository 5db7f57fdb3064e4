#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::{
    reader::{Deserializable, Error, Reader},
    stream::{Serializable, Stream},
};

macro_rules! impl_le_integer {
    ($($ty:ty),*) => {
        $(
            impl Serializable for $ty {
                fn serialize(&self, stream: &mut Stream) {
                    stream.append_slice(&self.to_le_bytes());
                }

                fn serialized_size(&self) -> usize {
                    core::mem::size_of::<$ty>()
                }
            }

            impl Deserializable for $ty {
                fn deserialize(reader: &mut Reader) -> Result<Self, Error> {
                    let mut bytes = [0u8; core::mem::size_of::<$ty>()];
                    bytes.copy_from_slice(reader.read_slice(core::mem::size_of::<$ty>())?);
                    Ok(<$ty>::from_le_bytes(bytes))
                }
            }
        )*
    };
}

impl_le_integer!(u8, u16, u32, u64);

impl Serializable for [u8; 32] {
    fn serialize(&self, stream: &mut Stream) {
        stream.append_slice(self);
    }

    fn serialized_size(&self) -> usize {
        32
    }
}

impl Deserializable for [u8; 32] {
    fn deserialize(reader: &mut Reader) -> Result<Self, Error> {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(reader.read_slice(32)?);
        Ok(bytes)
    }
}

impl<T> Deserializable for Vec<T>
where
    T: Deserializable,
{
    fn deserialize(reader: &mut Reader) -> Result<Self, Error> {
        reader.read_list()
    }
}

impl<T> Serializable for Vec<T>
where
    T: Serializable,
{
    fn serialize(&self, stream: &mut Stream) {
        stream.append_list(self);
    }

    fn serialized_size(&self) -> usize {
        let prefix = crate::CompactInteger::from(self.len()).serialized_size();
        prefix + self.iter().map(Serializable::serialized_size).sum::<usize>()
    }
}
