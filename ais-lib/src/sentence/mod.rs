//! NMEA 0183 sentence framing.
//!
//! An AIS sentence looks like
//!
//! ```text
//! [\k:v,…*CS\]!AIVDM,<count>,<index>,<seq>,<chan>,<payload>,<fill>*<CS>
//! ```
//!
//! with an optional IEC 61162-1 tag block prefix. `$PGHP` companion
//! sentences (the "Gatehouse" wrapper) carry a receive timestamp for the
//! AIS sentence that follows them on the same source.

mod assembler;
mod gatehouse;
mod tagblock;

pub use assembler::{Assembler, GroupAssembler};
pub use gatehouse::Gatehouse;
pub use tagblock::{TagBlock, TagBlockGroup};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sixbit::{self, BitBuf};

/// 8-bit XOR over `bytes`, the NMEA checksum function.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// A parsed line: either an AIS payload carrier or a Gatehouse wrapper.
#[derive(Debug, Clone)]
pub enum Nmea {
    Ais(Sentence),
    Gatehouse(Gatehouse),
}

impl Nmea {
    /// Parse a single line, which may carry a tag block prefix.
    ///
    /// Checksum validation is lenient: a mismatch is recorded on
    /// [Sentence::is_valid] rather than failing the parse. Use
    /// [Sentence::require_valid] to enforce it.
    ///
    /// # Errors
    /// [Error::InvalidNmea] on framing violations and
    /// [Error::NonPrintableCharacter] for payload bytes outside the ASCII-6
    /// alphabet.
    pub fn parse(raw: &[u8]) -> Result<Nmea> {
        let line = strip_line_ending(raw);
        let (rest, tag_block) = tagblock::split_tag_block(line)?;
        let tag_block = tag_block.map(TagBlock::parse).transpose()?;

        if rest.starts_with(b"$PGHP,") {
            let mut wrapper = Gatehouse::parse(rest)?;
            wrapper.tag_block = tag_block;
            return Ok(Nmea::Gatehouse(wrapper));
        }
        let mut sentence = Sentence::parse_body(rest)?;
        sentence.tag_block = tag_block;
        sentence.raw = line.to_vec();
        Ok(Nmea::Ais(sentence))
    }
}

/// A validated AIVDM/AIVDO sentence.
///
/// Owns its raw bytes along with the parsed framing fields. The payload is
/// kept armored; [Sentence::bits] unpacks it on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    /// Leading delimiter, `!` for AIS carriers.
    pub delimiter: char,
    /// Two-character talker id, e.g. `AI`, `BS`.
    pub talker: String,
    /// Three-character sentence type, usually `VDM` or `VDO`.
    pub sentence_type: String,
    /// Total fragments in this sentence's group, 1..=9.
    pub frag_count: u8,
    /// This fragment's one-based index.
    pub frag_index: u8,
    /// Sequential id shared by fragments of one group.
    pub seq_id: Option<u8>,
    /// Radio channel, usually `A` or `B`.
    pub channel: Option<char>,
    /// Armored ASCII-6 payload.
    pub payload: String,
    /// Pad bits in the final payload character, 0..=5.
    pub fill_bits: u8,
    /// Stated checksum value.
    pub checksum: u8,
    /// Whether the stated checksum matches the computed one.
    pub is_valid: bool,
    /// Tag block prefix, when present.
    pub tag_block: Option<TagBlock>,
    /// Gatehouse wrapper seen immediately before this sentence.
    pub wrapper: Option<Gatehouse>,
    /// Original line bytes, tag block included.
    #[serde(with = "serde_bytes")]
    pub raw: Vec<u8>,
}

impl Sentence {
    /// Maximum sentence length in characters, line terminator excluded.
    pub const MAX_LEN: usize = 82;

    /// Parse one AIS sentence line (tag block allowed).
    ///
    /// # Errors
    /// See [Nmea::parse]; additionally [Error::InvalidNmea] if the line is a
    /// wrapper sentence rather than an AIS carrier.
    pub fn parse(raw: &[u8]) -> Result<Sentence> {
        match Nmea::parse(raw)? {
            Nmea::Ais(sentence) => Ok(sentence),
            Nmea::Gatehouse(_) => Err(Error::InvalidNmea(
                "expected an AIS sentence, got a $PGHP wrapper".into(),
            )),
        }
    }

    /// Parse the sentence body with the tag block already removed.
    fn parse_body(line: &[u8]) -> Result<Sentence> {
        if line.len() > Self::MAX_LEN {
            return Err(Error::InvalidNmea(format!(
                "sentence length {} exceeds {} characters",
                line.len(),
                Self::MAX_LEN
            )));
        }
        let delimiter = match line.first() {
            Some(b'!') => '!',
            Some(b'$') => '$',
            _ => return Err(Error::InvalidNmea("missing ! or $ delimiter".into())),
        };
        let star = line
            .iter()
            .rposition(|&b| b == b'*')
            .ok_or_else(|| Error::InvalidNmea("missing checksum separator".into()))?;
        let body = &line[1..star];
        let stated = parse_hex_checksum(&line[star + 1..])?;
        let computed = checksum(body);

        let fields: Vec<&[u8]> = body.split(|&b| b == b',').collect();
        if fields.len() != 7 {
            return Err(Error::InvalidNmea(format!(
                "expected 7 comma-separated fields, got {}",
                fields.len()
            )));
        }
        if fields[0].len() != 5 {
            return Err(Error::InvalidNmea("malformed talker/type field".into()));
        }
        let talker = String::from_utf8_lossy(&fields[0][..2]).into_owned();
        let sentence_type = String::from_utf8_lossy(&fields[0][2..]).into_owned();

        let frag_count = parse_digit(fields[1], "fragment count")?;
        let frag_index = parse_digit(fields[2], "fragment index")?;
        if frag_count < 1 || frag_index < 1 || frag_index > frag_count {
            return Err(Error::InvalidNmea(format!(
                "fragment index {frag_index} out of range for count {frag_count}"
            )));
        }
        let seq_id = if fields[3].is_empty() {
            None
        } else {
            Some(parse_digit(fields[3], "sequence id")?)
        };
        let channel = fields[4].first().map(|&b| char::from(b));

        let payload = fields[5];
        if let Some(&bad) = payload.iter().find(|&&b| !(48..120).contains(&b)) {
            return Err(Error::NonPrintableCharacter(bad));
        }
        let fill_bits = parse_digit(fields[6], "fill bits")?;
        if fill_bits > 5 {
            return Err(Error::InvalidNmea(format!(
                "fill bit count {fill_bits} out of range"
            )));
        }

        Ok(Sentence {
            delimiter,
            talker,
            sentence_type,
            frag_count,
            frag_index,
            seq_id,
            channel,
            payload: String::from_utf8_lossy(payload).into_owned(),
            fill_bits,
            checksum: stated,
            is_valid: stated == computed,
            tag_block: None,
            wrapper: None,
            raw: line.to_vec(),
        })
    }

    /// Fail with [Error::InvalidChecksum] unless the stated checksum
    /// matched.
    ///
    /// # Errors
    /// [Error::InvalidChecksum]
    pub fn require_valid(&self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            // Search from the right: a tag block prefix may itself contain
            // delimiter characters.
            let body_end = self
                .raw
                .iter()
                .rposition(|&b| b == b'*')
                .unwrap_or(self.raw.len());
            let body_start = self.raw[..body_end]
                .iter()
                .rposition(|&b| b == b'!' || b == b'$')
                .map_or(0, |p| p + 1);
            Err(Error::InvalidChecksum {
                stated: self.checksum,
                computed: checksum(&self.raw[body_start..body_end]),
            })
        }
    }

    #[must_use]
    pub fn is_single(&self) -> bool {
        self.frag_count == 1
    }

    #[must_use]
    pub fn is_multi(&self) -> bool {
        self.frag_count > 1
    }

    /// Unpack the armored payload.
    ///
    /// # Errors
    /// [Error::MissingPayload] if the payload field is empty.
    pub fn bits(&self) -> Result<BitBuf> {
        if self.payload.is_empty() {
            return Err(Error::MissingPayload);
        }
        sixbit::unarmor(self.payload.as_bytes(), self.fill_bits)
    }

    /// Merge ordered fragments of one group into a single sentence.
    ///
    /// Payloads concatenate in index order and the fill bits of the last
    /// fragment apply. Framing fields are taken from the first fragment.
    pub(crate) fn assemble(mut parts: Vec<Sentence>) -> Result<Sentence> {
        debug_assert!(!parts.is_empty());
        parts.sort_by_key(|s| s.frag_index);
        let mut assembled = parts[0].clone();
        assembled.payload = parts.iter().map(|s| s.payload.as_str()).collect();
        assembled.fill_bits = parts.last().expect("parts is non-empty").fill_bits;
        assembled.is_valid = parts.iter().all(|s| s.is_valid);
        assembled.raw = parts
            .iter()
            .flat_map(|s| s.raw.iter().copied())
            .collect();
        if assembled.payload.is_empty() {
            return Err(Error::MissingPayload);
        }
        Ok(assembled)
    }
}

fn strip_line_ending(raw: &[u8]) -> &[u8] {
    let mut line = raw;
    while let [rest @ .., b'\r' | b'\n'] = line {
        line = rest;
    }
    line
}

fn parse_digit(field: &[u8], what: &str) -> Result<u8> {
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse::<u8>().ok())
        .ok_or_else(|| Error::InvalidNmea(format!("malformed {what} field")))
}

fn parse_hex_checksum(field: &[u8]) -> Result<u8> {
    if field.len() < 2 {
        return Err(Error::InvalidNmea("truncated checksum".into()));
    }
    std::str::from_utf8(&field[..2])
        .ok()
        .and_then(|s| u8::from_str_radix(s, 16).ok())
        .ok_or_else(|| Error::InvalidNmea("malformed checksum".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single() {
        let s = Sentence::parse(b"!AIVDM,1,1,,B,15M67FC000G?ufbE`FepT@3n00Sa,0*5C").unwrap();
        assert_eq!(s.delimiter, '!');
        assert_eq!(s.talker, "AI");
        assert_eq!(s.sentence_type, "VDM");
        assert_eq!(s.frag_count, 1);
        assert_eq!(s.frag_index, 1);
        assert_eq!(s.seq_id, None);
        assert_eq!(s.channel, Some('B'));
        assert_eq!(s.payload, "15M67FC000G?ufbE`FepT@3n00Sa");
        assert_eq!(s.fill_bits, 0);
        assert!(s.is_valid);
        assert!(s.is_single());
    }

    #[test]
    fn parse_multi_fragment_fields() {
        let s = Sentence::parse(
            b"!AIVDM,2,1,4,A,55O0W7`00001L@gCWGA2uItLth@DqtL5@F22220j1h742t0Ht0000000,0*08",
        )
        .unwrap();
        assert_eq!(s.frag_count, 2);
        assert_eq!(s.frag_index, 1);
        assert_eq!(s.seq_id, Some(4));
        assert!(s.is_multi());
    }

    #[test]
    fn parse_strips_crlf() {
        let s = Sentence::parse(b"!AIVDM,1,1,,B,15M67FC000G?ufbE`FepT@3n00Sa,0*5C\r\n").unwrap();
        assert!(s.is_valid);
    }

    #[test]
    fn bad_checksum_is_lenient() {
        let s = Sentence::parse(b"!AIVDM,1,1,,B,15M67FC000G?ufbE`FepT@3n00Sa,0*00").unwrap();
        assert!(!s.is_valid);
        assert!(matches!(
            s.require_valid(),
            Err(Error::InvalidChecksum {
                stated: 0x00,
                computed: 0x5C
            })
        ));
    }

    #[test]
    fn missing_star_is_invalid() {
        let zult = Sentence::parse(b"!AIVDM,1,1,,B,15M67FC000G?ufbE`FepT@3n00Sa,0");
        assert!(matches!(zult, Err(Error::InvalidNmea(_))));
    }

    #[test]
    fn wrong_field_count_is_invalid() {
        let zult = Sentence::parse(b"!AIVDM,1,1,,B,15M67FC000G?ufbE`FepT@3n00Sa*5C");
        assert!(matches!(zult, Err(Error::InvalidNmea(_))));
    }

    #[test]
    fn over_length_is_invalid() {
        let mut line = b"!AIVDM,1,1,,B,".to_vec();
        line.extend(std::iter::repeat(b'0').take(80));
        line.extend(b",0*00");
        let zult = Sentence::parse(&line);
        assert!(matches!(zult, Err(Error::InvalidNmea(_))));
    }

    #[test]
    fn non_printable_payload_is_distinguished() {
        let zult = Sentence::parse(b"!AIVDM,1,1,,B,15M6 FC000,0*25");
        assert!(matches!(zult, Err(Error::NonPrintableCharacter(b' '))));
    }

    #[test]
    fn fragment_index_must_fit_count() {
        let zult = Sentence::parse(b"!AIVDM,2,3,1,B,15M67FC000,0*4B");
        assert!(matches!(zult, Err(Error::InvalidNmea(_))));
    }

    #[test]
    fn tag_block_is_attached() {
        let s = Sentence::parse(
            b"\\s:2573135,c:1671620143*0B\\!AIVDM,1,1,,A,16:=?;0P00`SstvFnFbeGH6L088h,0*44",
        )
        .unwrap();
        let tb = s.tag_block.expect("tag block expected");
        assert_eq!(tb.source_station.as_deref(), Some("2573135"));
        assert_eq!(tb.receiver_timestamp, Some(1671620143));
        assert!(s.is_valid);
    }

    #[test]
    fn gatehouse_line_classifies_as_wrapper() {
        let parsed = Nmea::parse(b"$PGHP,1,2020,12,31,23,59,58,239,0,0,0,1,2C*5B").unwrap();
        match parsed {
            Nmea::Gatehouse(w) => assert_eq!(w.year, 2020),
            Nmea::Ais(_) => panic!("expected wrapper"),
        }
    }

    #[test]
    fn assemble_orders_fragments() {
        let a = Sentence::parse(
            b"!AIVDM,2,1,4,A,55O0W7`00001L@gCWGA2uItLth@DqtL5@F22220j1h742t0Ht0000000,0*08",
        )
        .unwrap();
        let b = Sentence::parse(b"!AIVDM,2,2,4,A,000000000000000,2*20").unwrap();
        let forward = Sentence::assemble(vec![a.clone(), b.clone()]).unwrap();
        let reverse = Sentence::assemble(vec![b, a]).unwrap();
        assert_eq!(forward.payload, reverse.payload);
        assert_eq!(forward.fill_bits, 2);
    }
}
