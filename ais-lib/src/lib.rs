#![doc = include_str!("../README.md")]

mod error;

pub mod encode;
pub mod filter;
pub mod messages;
pub mod sentence;
pub mod sixbit;
pub mod stream;
pub mod tracker;

pub use encode::{encode, Encoder};
pub use error::{Error, Result};
pub use messages::{Message, Mmsi};
pub use sentence::Sentence;

/// Decode one message given all of its sentences.
///
/// Pass a single element for single-fragment messages and every fragment
/// (in any order) for multipart ones. Checksum validation is lenient; see
/// [decode_strict].
///
/// # Errors
/// [Error::MissingMultipartMessage] when fragments are missing, plus any
/// framing or payload error.
pub fn decode<B: AsRef<[u8]>>(parts: &[B]) -> Result<Message> {
    decode_parts(parts, false)
}

/// [decode], but failing with [Error::InvalidChecksum] on any checksum
/// mismatch.
///
/// # Errors
/// See [decode].
pub fn decode_strict<B: AsRef<[u8]>>(parts: &[B]) -> Result<Message> {
    decode_parts(parts, true)
}

fn decode_parts<B: AsRef<[u8]>>(parts: &[B], strict: bool) -> Result<Message> {
    if parts.is_empty() {
        return Err(Error::InvalidNmea("no sentences provided".into()));
    }
    let mut sentences = Vec::with_capacity(parts.len());
    for part in parts {
        let sentence = Sentence::parse(part.as_ref())?;
        if strict {
            sentence.require_valid()?;
        }
        sentences.push(sentence);
    }

    let count = sentences[0].frag_count;
    let mut have = vec![false; count as usize];
    for sentence in &sentences {
        if sentence.frag_count != count {
            return Err(Error::InvalidNmea(
                "sentences are not fragments of one message".into(),
            ));
        }
        have[sentence.frag_index as usize - 1] = true;
    }
    let missing: Vec<u8> = (1..=count).filter(|i| !have[*i as usize - 1]).collect();
    if !missing.is_empty() {
        return Err(Error::MissingMultipartMessage { missing });
    }
    if sentences.len() != count as usize {
        return Err(Error::InvalidData(format!(
            "got {} sentences for a {count}-fragment message",
            sentences.len()
        )));
    }

    let assembled = if sentences.len() == 1 {
        sentences.pop().expect("one sentence present")
    } else {
        Sentence::assemble(sentences)?
    };
    Message::decode_bits(&assembled.bits()?)
}
