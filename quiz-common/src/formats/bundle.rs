//! Quiz bundle format
//!
//! All question and result clips for one quiz, concatenated into a single
//! file. POD format - no magic bytes, no version tag.
//!
//! # Layout
//! ```text
//! 0x00: question_count u32 LE
//! 0x04: question records (question_count, see `record`)
//! ....: result records (exactly OUTCOME_COUNT, outcome order 1..7)
//! ```
//!
//! Records are self-delimiting through their length prefix, so the consumer
//! walks the file front to back. Results carry no count prefix.

use std::io::Write;

use super::record::{OUTCOME_COUNT, Question, RecordHeader, ResultClip, write_record};
use super::serialization::BinarySerializable;
use crate::error::BundleError;

/// Bundle header (4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleHeader {
    pub question_count: u32,
}

impl BundleHeader {
    pub const SIZE: usize = 4;

    pub fn new(question_count: u32) -> Self {
        Self { question_count }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        self.question_count.to_le_bytes()
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            question_count: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        })
    }
}

/// Ordered questions followed by one result clip per outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    pub questions: Vec<Question>,
    pub results: Vec<ResultClip>,
}

impl Bundle {
    pub fn new(questions: Vec<Question>, results: Vec<ResultClip>) -> Self {
        Self { questions, results }
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Exact size of the encoded bundle, without encoding it
    pub fn encoded_len(&self) -> usize {
        BundleHeader::SIZE
            + self.questions.iter().map(Question::encoded_len).sum::<usize>()
            + self.results.iter().map(ResultClip::encoded_len).sum::<usize>()
    }

    pub fn encode(&self) -> Result<Vec<u8>, BundleError> {
        encode_bundle(&self.questions, &self.results)
    }

    /// Parse a bundle, reading records in the same order as the consumer.
    ///
    /// Accepts exactly what [`encode_bundle`] can produce, so a decoded
    /// bundle always re-encodes: zero-length payloads are rejected with
    /// [`BundleError::EmptyPayload`].
    pub fn decode(bytes: &[u8]) -> Result<Self, BundleError> {
        let mut reader = Reader::new(bytes);

        let header: BundleHeader = reader.header()?;
        let count = header.question_count as usize;

        // A corrupt count must not drive the allocation
        let mut questions = Vec::with_capacity(count.min(reader.remaining() / RecordHeader::SIZE));
        for _ in 0..count {
            let header: RecordHeader = reader.header()?;
            let payload = reader.payload(&header)?;
            questions.push(Question::new(
                payload.to_vec(),
                header.yes_points,
                header.no_points,
            ));
        }

        let mut results = Vec::with_capacity(OUTCOME_COUNT);
        for outcome in 1..=OUTCOME_COUNT {
            let header: RecordHeader = reader.header()?;
            if !header.yes_points.is_zero() || !header.no_points.is_zero() {
                return Err(BundleError::NonZeroResultScores(outcome));
            }
            let payload = reader.payload(&header)?;
            results.push(ResultClip::new(payload.to_vec()));
        }

        if reader.remaining() > 0 {
            return Err(BundleError::TrailingBytes(reader.remaining()));
        }

        Ok(Self { questions, results })
    }
}

/// Validated headers paired with their payloads, ready to be written
struct Plan<'a> {
    header: BundleHeader,
    records: Vec<(RecordHeader, &'a [u8])>,
    len: usize,
}

/// Check arity and every record before anything is written
fn plan<'a>(questions: &'a [Question], results: &'a [ResultClip]) -> Result<Plan<'a>, BundleError> {
    if results.len() != OUTCOME_COUNT {
        return Err(BundleError::ResultArityError {
            expected: OUTCOME_COUNT,
            actual: results.len(),
        });
    }

    let question_count = u32::try_from(questions.len())
        .map_err(|_| BundleError::TooManyQuestions(questions.len()))?;

    let mut records = Vec::with_capacity(questions.len() + results.len());
    let mut len = BundleHeader::SIZE;
    for question in questions {
        records.push((question.header()?, question.payload.as_slice()));
        len += question.encoded_len();
    }
    for result in results {
        records.push((result.header()?, result.payload.as_slice()));
        len += result.encoded_len();
    }

    Ok(Plan {
        header: BundleHeader::new(question_count),
        records,
        len,
    })
}

fn write_plan<W: Write>(w: &mut W, plan: &Plan<'_>) -> Result<(), BundleError> {
    w.write_all(&plan.header.to_bytes())?;
    for (header, payload) in &plan.records {
        write_record(w, header, payload)?;
    }
    Ok(())
}

/// Encode a complete bundle into memory.
///
/// Fails with [`BundleError::ResultArityError`] unless there are exactly
/// [`OUTCOME_COUNT`] results. Output is a pure function of the inputs.
pub fn encode_bundle(questions: &[Question], results: &[ResultClip]) -> Result<Vec<u8>, BundleError> {
    let plan = plan(questions, results)?;
    let mut out = Vec::with_capacity(plan.len);
    write_plan(&mut out, &plan)?;
    Ok(out)
}

/// Stream a complete bundle to a writer.
///
/// All validation happens before the first byte is written, so an invalid
/// input never leaves a partial bundle in the sink. Sink errors are returned
/// as [`BundleError::Io`].
pub fn write_bundle<W: Write>(
    w: &mut W,
    questions: &[Question],
    results: &[ResultClip],
) -> Result<(), BundleError> {
    let plan = plan(questions, results)?;
    write_plan(w, &plan)
}

/// Forward-only cursor over bundle bytes
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], BundleError> {
        if n > self.remaining() {
            return Err(BundleError::Truncated {
                offset: self.offset,
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.bytes[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    fn payload(&mut self, header: &RecordHeader) -> Result<&'a [u8], BundleError> {
        if header.payload_len == 0 {
            return Err(BundleError::EmptyPayload);
        }
        self.take(header.payload_len as usize)
    }

    fn header<T: BinarySerializable>(&mut self) -> Result<T, BundleError> {
        let offset = self.offset;
        let bytes = self.take(T::SIZE)?;
        T::deserialize(bytes).ok_or(BundleError::Truncated {
            offset,
            needed: T::SIZE,
            available: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{ScoreVector, encode_question, encode_result};

    const YES: [i64; 7] = [1, 2, 3, 0, 0, 0, 0];
    const NO: [i64; 7] = [0, 0, 0, -3, -2, -1, 0];

    fn results_of(len: usize, payload_len: usize) -> Vec<ResultClip> {
        (0..len)
            .map(|i| ResultClip::new(vec![i as u8 + 1; payload_len]))
            .collect()
    }

    fn sample_bundle() -> Bundle {
        let questions = vec![
            Question::from_values(b"AB".to_vec(), &YES, &NO).unwrap(),
            Question::new(
                b"second question".to_vec(),
                ScoreVector::new([-128, 127, 0, 0, 5, 0, -5]),
                ScoreVector::ZERO,
            ),
        ];
        Bundle::new(questions, results_of(OUTCOME_COUNT, 3))
    }

    #[test]
    fn test_no_questions_scenario() {
        let results: Vec<ResultClip> = (0..7u8)
            .map(|i| ResultClip::new((0..10).map(|b| b * 10 + i).collect()))
            .collect();

        let bytes = encode_bundle(&[], &results).unwrap();
        assert_eq!(bytes.len(), 200);
        assert_eq!(&bytes[0..4], &0u32.to_le_bytes());
    }

    #[test]
    fn test_single_question_scenario() {
        let questions = vec![Question::from_values(b"AB".to_vec(), &YES, &NO).unwrap()];
        let results = results_of(OUTCOME_COUNT, 1);

        let bytes = encode_bundle(&questions, &results).unwrap();
        assert_eq!(bytes.len(), 157);
        assert_eq!(&bytes[0..4], &1u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &2u32.to_le_bytes());
    }

    #[test]
    fn test_length_is_sum_of_records() {
        let bundle = sample_bundle();
        let bytes = bundle.encode().unwrap();

        let mut expected = 4;
        for q in &bundle.questions {
            expected += encode_question(
                &q.payload,
                &q.yes_points.points().map(i64::from),
                &q.no_points.points().map(i64::from),
            )
            .unwrap()
            .len();
        }
        for r in &bundle.results {
            expected += encode_result(&r.payload).unwrap().len();
        }

        assert_eq!(bytes.len(), expected);
        assert_eq!(bundle.encoded_len(), expected);
    }

    #[test]
    fn test_bundle_is_concatenation_of_records() {
        let bundle = sample_bundle();
        let bytes = bundle.encode().unwrap();

        let mut expected = 2u32.to_le_bytes().to_vec();
        expected.extend(encode_question(b"AB", &YES, &NO).unwrap());
        expected.extend(
            encode_question(b"second question", &[-128, 127, 0, 0, 5, 0, -5], &[0; 7]).unwrap(),
        );
        for r in &bundle.results {
            expected.extend(encode_result(&r.payload).unwrap());
        }
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_wrong_result_arity() {
        for len in [0, 6, 8, 100] {
            let err = encode_bundle(&[], &results_of(len, 1)).unwrap_err();
            match err {
                BundleError::ResultArityError { expected, actual } => {
                    assert_eq!(expected, 7);
                    assert_eq!(actual, len);
                }
                other => panic!("unexpected error for {len} results: {other:?}"),
            }
        }
    }

    #[test]
    fn test_write_bundle_writes_nothing_on_error() {
        let mut sink = Vec::new();
        let err = write_bundle(&mut sink, &[], &results_of(6, 1)).unwrap_err();
        assert!(matches!(err, BundleError::ResultArityError { .. }));
        assert!(sink.is_empty());

        let mut results = results_of(OUTCOME_COUNT, 1);
        results[6].payload.clear();
        let err = write_bundle(&mut sink, &[], &results).unwrap_err();
        assert!(matches!(err, BundleError::EmptyPayload));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_write_bundle_matches_encode() {
        let bundle = sample_bundle();
        let mut sink = Vec::new();
        write_bundle(&mut sink, &bundle.questions, &bundle.results).unwrap();
        assert_eq!(sink, bundle.encode().unwrap());
    }

    #[test]
    fn test_encode_is_deterministic() {
        let bundle = sample_bundle();
        assert_eq!(bundle.encode().unwrap(), bundle.encode().unwrap());
    }

    #[test]
    fn test_decode_roundtrip() {
        let bundle = sample_bundle();
        let decoded = Bundle::decode(&bundle.encode().unwrap()).unwrap();

        assert_eq!(decoded.question_count(), 2);
        assert_eq!(decoded, bundle);
        assert!(decoded
            .results
            .iter()
            .all(|r| r.header().unwrap().yes_points.is_zero()));
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = sample_bundle().encode().unwrap();

        let err = Bundle::decode(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(
            err,
            BundleError::Truncated {
                needed: 3,
                available: 2,
                ..
            }
        ));

        let err = Bundle::decode(&bytes[..2]).unwrap_err();
        assert!(matches!(err, BundleError::Truncated { offset: 0, .. }));
    }

    #[test]
    fn test_decode_huge_count() {
        let mut bytes = sample_bundle().encode().unwrap();
        bytes[0..4].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            Bundle::decode(&bytes),
            Err(BundleError::Truncated { .. })
        ));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let mut bytes = sample_bundle().encode().unwrap();
        bytes.extend_from_slice(&[0, 0]);
        assert!(matches!(
            Bundle::decode(&bytes),
            Err(BundleError::TrailingBytes(2))
        ));
    }

    #[test]
    fn test_decode_rejects_empty_payload() {
        let mut bytes = 1u32.to_le_bytes().to_vec();
        bytes.extend(RecordHeader::question(0, ScoreVector::ZERO, ScoreVector::ZERO).to_bytes());
        for r in &results_of(OUTCOME_COUNT, 1) {
            bytes.extend(encode_result(&r.payload).unwrap());
        }

        assert!(matches!(
            Bundle::decode(&bytes),
            Err(BundleError::EmptyPayload)
        ));
    }

    #[test]
    fn test_decoded_bundle_reencodes() {
        let bytes = sample_bundle().encode().unwrap();
        let decoded = Bundle::decode(&bytes).unwrap();
        assert_eq!(decoded.encode().unwrap(), bytes);
    }

    #[test]
    fn test_decode_rejects_scored_result() {
        let bundle = Bundle::new(Vec::new(), results_of(OUTCOME_COUNT, 1));
        let mut bytes = bundle.encode().unwrap();

        // First result header starts right after the count
        bytes[4 + 4] = 1;
        assert!(matches!(
            Bundle::decode(&bytes),
            Err(BundleError::NonZeroResultScores(1))
        ));
    }
}
