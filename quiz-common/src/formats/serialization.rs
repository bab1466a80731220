//! Fixed-size header codec shared by the bundle's two header kinds.
//!
//! [`BundleHeader`](super::BundleHeader) (the 4-byte question count) and
//! [`RecordHeader`](super::RecordHeader) (length plus two score vectors)
//! both implement [`BinarySerializable`], so the decoder's cursor reads
//! either with one bounds-checked `header::<T>()` call.

/// A little-endian header with a known on-disk size.
///
/// `deserialize` only reads the first `SIZE` bytes; the decoder slices the
/// input before calling it and turns `None` into `BundleError::Truncated`.
///
/// # Example
///
/// ```
/// use quiz_common::formats::{BinarySerializable, RecordHeader};
///
/// let header = RecordHeader::result(1024);
///
/// let bytes = header.serialize();
/// let parsed = RecordHeader::deserialize(&bytes).unwrap();
/// assert_eq!(parsed.payload_len, 1024);
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized header in bytes.
    const SIZE: usize;

    fn serialize(&self) -> Vec<u8>;

    /// Returns `None` if the byte slice is too short.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

impl BinarySerializable for super::RecordHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

impl BinarySerializable for super::BundleHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}
