//! Quiz bundle binary formats
//!
//! POD (Plain Old Data) layout, little-endian throughout. No magic bytes: the
//! consumer knows it is reading a bundle because that is the only file it
//! loads.
//!
//! Both headers implement the [`BinarySerializable`] trait, which the decoder
//! uses to read them generically.

pub mod bundle;
pub mod record;
mod serialization;

pub use bundle::*;
pub use record::*;
pub use serialization::BinarySerializable;
