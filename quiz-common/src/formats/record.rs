//! Bundle record format
//!
//! One self-delimiting unit per audio clip. POD format - no magic bytes.
//!
//! # Layout
//! ```text
//! 0x00: payload_len u32 LE
//! 0x04: yes_points [i8; 7]
//! 0x0B: no_points [i8; 7]
//! 0x12: payload (payload_len bytes)
//! ```
//!
//! Result records share the layout with both vectors zeroed. The consumer
//! only ever plays them back by outcome index.

use std::io::{self, Write};

use crate::error::{BundleError, ScoreVectorError};

/// Number of outcomes a quiz can resolve to (fixed by the consumer)
pub const OUTCOME_COUNT: usize = 7;

/// Per-outcome point deltas for one answer, ordered by outcome 1..7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ScoreVector([i8; OUTCOME_COUNT]);

impl ScoreVector {
    pub const SIZE: usize = OUTCOME_COUNT;

    /// All-zero vector (used by result records)
    pub const ZERO: Self = Self([0; OUTCOME_COUNT]);

    pub const fn new(points: [i8; OUTCOME_COUNT]) -> Self {
        Self(points)
    }

    /// Build a vector from caller-supplied integers.
    ///
    /// Fails if there are not exactly [`OUTCOME_COUNT`] values or any value
    /// does not fit a signed byte.
    pub fn from_values(values: &[i64]) -> Result<Self, ScoreVectorError> {
        if values.len() != OUTCOME_COUNT {
            return Err(ScoreVectorError::WrongLength {
                expected: OUTCOME_COUNT,
                actual: values.len(),
            });
        }

        let mut points = [0i8; OUTCOME_COUNT];
        for (i, (slot, &value)) in points.iter_mut().zip(values).enumerate() {
            *slot = i8::try_from(value).map_err(|_| ScoreVectorError::OutOfRange {
                outcome: i + 1,
                value,
            })?;
        }
        Ok(Self(points))
    }

    pub fn points(&self) -> [i8; OUTCOME_COUNT] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&p| p == 0)
    }

    /// Two's-complement bytes, outcome order
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        self.0.map(|p| p as u8)
    }

    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        Self(bytes.map(|b| b as i8))
    }
}

impl TryFrom<&[i64]> for ScoreVector {
    type Error = ScoreVectorError;

    fn try_from(values: &[i64]) -> Result<Self, Self::Error> {
        Self::from_values(values)
    }
}

/// Record header (18 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Length of the payload that follows the header
    pub payload_len: u32,
    pub yes_points: ScoreVector,
    pub no_points: ScoreVector,
}

impl RecordHeader {
    pub const SIZE: usize = 4 + ScoreVector::SIZE * 2;

    pub fn question(payload_len: u32, yes_points: ScoreVector, no_points: ScoreVector) -> Self {
        Self {
            payload_len,
            yes_points,
            no_points,
        }
    }

    /// Header for a result record (zeroed vectors)
    pub fn result(payload_len: u32) -> Self {
        Self::question(payload_len, ScoreVector::ZERO, ScoreVector::ZERO)
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes[4..11].copy_from_slice(&self.yes_points.to_bytes());
        bytes[11..18].copy_from_slice(&self.no_points.to_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut yes = [0u8; ScoreVector::SIZE];
        let mut no = [0u8; ScoreVector::SIZE];
        yes.copy_from_slice(&bytes[4..11]);
        no.copy_from_slice(&bytes[11..18]);
        Some(Self {
            payload_len: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            yes_points: ScoreVector::from_bytes(yes),
            no_points: ScoreVector::from_bytes(no),
        })
    }
}

/// A question clip with its yes/no scoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub payload: Vec<u8>,
    pub yes_points: ScoreVector,
    pub no_points: ScoreVector,
}

impl Question {
    pub fn new(payload: Vec<u8>, yes_points: ScoreVector, no_points: ScoreVector) -> Self {
        Self {
            payload,
            yes_points,
            no_points,
        }
    }

    /// Build a question from unvalidated score tables
    pub fn from_values(
        payload: Vec<u8>,
        yes_points: &[i64],
        no_points: &[i64],
    ) -> Result<Self, BundleError> {
        Ok(Self::new(
            payload,
            ScoreVector::from_values(yes_points)?,
            ScoreVector::from_values(no_points)?,
        ))
    }

    pub fn header(&self) -> Result<RecordHeader, BundleError> {
        Ok(RecordHeader::question(
            payload_len(&self.payload)?,
            self.yes_points,
            self.no_points,
        ))
    }

    /// Size of this record on the wire
    pub fn encoded_len(&self) -> usize {
        RecordHeader::SIZE + self.payload.len()
    }
}

/// A result clip, played back when its outcome wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultClip {
    pub payload: Vec<u8>,
}

impl ResultClip {
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }

    pub fn header(&self) -> Result<RecordHeader, BundleError> {
        Ok(RecordHeader::result(payload_len(&self.payload)?))
    }

    pub fn encoded_len(&self) -> usize {
        RecordHeader::SIZE + self.payload.len()
    }
}

/// Validate a payload and return its length prefix
pub(crate) fn payload_len(payload: &[u8]) -> Result<u32, BundleError> {
    if payload.is_empty() {
        return Err(BundleError::EmptyPayload);
    }
    u32::try_from(payload.len()).map_err(|_| BundleError::PayloadTooLarge(payload.len()))
}

/// Write one record (header + payload)
pub(crate) fn write_record<W: Write>(
    w: &mut W,
    header: &RecordHeader,
    payload: &[u8],
) -> io::Result<()> {
    w.write_all(&header.to_bytes())?;
    w.write_all(payload)
}

fn encode_record(header: &RecordHeader, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(RecordHeader::SIZE + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(payload);
    out
}

/// Encode a question record from a payload and two score tables.
///
/// Output: `u32` LE payload length, 7 yes points, 7 no points, payload.
pub fn encode_question(
    payload: &[u8],
    yes_points: &[i64],
    no_points: &[i64],
) -> Result<Vec<u8>, BundleError> {
    let yes_points = ScoreVector::from_values(yes_points)?;
    let no_points = ScoreVector::from_values(no_points)?;
    let header = RecordHeader::question(payload_len(payload)?, yes_points, no_points);
    Ok(encode_record(&header, payload))
}

/// Encode a result record (zeroed score vectors)
pub fn encode_result(payload: &[u8]) -> Result<Vec<u8>, BundleError> {
    let header = RecordHeader::result(payload_len(payload)?);
    Ok(encode_record(&header, payload))
}
