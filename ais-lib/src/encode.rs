//! NMEA sentence generation.
//!
//! Packs a [Message] into armored payload characters and frames it as one
//! or more AIVDM/AIVDO sentences, splitting over-length payloads into
//! fragments that each stay within the 82-character sentence limit.

use crate::error::{Error, Result};
use crate::messages::Message;
use crate::sentence::{checksum, Sentence};
use crate::sixbit;

/// Payload characters per fragment. The framing overhead
/// (`!AIVDM,9,9,9,A,` plus `,0*CS`) leaves this much room under the
/// sentence limit.
pub const MAX_PAYLOAD_CHARS: usize = 60;

/// Builds NMEA sentences from messages.
///
/// Holds the sequence-id counter shared by the fragments of one
/// multi-sentence message; ids cycle 0..=9 across calls.
#[derive(Debug, Default)]
pub struct Encoder {
    next_seq: u8,
}

impl Encoder {
    #[must_use]
    pub fn new() -> Self {
        Encoder::default()
    }

    /// Encode `message` into one or more framed sentences.
    ///
    /// `talker` must be `AIVDM` or `AIVDO`; `channel` must be `A` or `B`.
    ///
    /// # Errors
    /// [Error::InvalidData] for out-of-range field values or framing
    /// parameters.
    pub fn encode(
        &mut self,
        message: &Message,
        channel: char,
        talker: &str,
    ) -> Result<Vec<String>> {
        if talker != "AIVDM" && talker != "AIVDO" {
            return Err(Error::InvalidData(format!(
                "talker must be AIVDM or AIVDO, got {talker:?}"
            )));
        }
        if channel != 'A' && channel != 'B' {
            return Err(Error::InvalidData(format!(
                "channel must be A or B, got {channel:?}"
            )));
        }

        let bits = message.to_bits()?;
        let (payload, fill_bits) = sixbit::armor(&bits);
        let chunks: Vec<&str> = payload
            .as_bytes()
            .chunks(MAX_PAYLOAD_CHARS)
            .map(|c| std::str::from_utf8(c).expect("armored payload is ASCII"))
            .collect();
        let count = chunks.len().max(1);
        if count > 9 {
            return Err(Error::InvalidData(format!(
                "payload of {} characters exceeds 9 fragments",
                payload.len()
            )));
        }

        let seq_id = if count > 1 {
            let id = self.next_seq;
            self.next_seq = (self.next_seq + 1) % 10;
            id.to_string()
        } else {
            String::new()
        };

        let mut sentences = Vec::with_capacity(count);
        for (idx, chunk) in chunks.iter().enumerate() {
            let fill = if idx == count - 1 { fill_bits } else { 0 };
            let body = format!(
                "{talker},{count},{index},{seq_id},{channel},{chunk},{fill}",
                index = idx + 1,
            );
            let sentence = format!("!{body}*{:02X}", checksum(body.as_bytes()));
            debug_assert!(sentence.len() <= Sentence::MAX_LEN);
            sentences.push(sentence);
        }
        if sentences.is_empty() {
            // A zero-field message still frames as one empty-payload
            // sentence.
            let body = format!("{talker},1,1,,{channel},,0");
            sentences.push(format!("!{body}*{:02X}", checksum(body.as_bytes())));
        }
        Ok(sentences)
    }
}

/// One-shot [Encoder::encode] with a fresh sequence counter.
///
/// # Errors
/// See [Encoder::encode].
pub fn encode(message: &Message, channel: char, talker: &str) -> Result<Vec<String>> {
    Encoder::new().encode(message, channel, talker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Mmsi, PositionReport, StaticAndVoyageData};
    use crate::sentence::{Assembler, Sentence};

    fn decode_sentences(sentences: &[String]) -> Message {
        let mut asm = Assembler::new();
        let mut out = None;
        for s in sentences {
            out = asm.push(Sentence::parse(s.as_bytes()).unwrap()).unwrap();
        }
        Message::decode_bits(&out.expect("complete assembly").bits().unwrap()).unwrap()
    }

    #[test]
    fn single_sentence_frame() {
        let msg = Message::PositionReport(PositionReport {
            mmsi: Mmsi::new(366_053_209),
            lon: -122.341,
            lat: 37.802,
            course: 219.3,
            ..PositionReport::default()
        });
        let sentences = encode(&msg, 'B', "AIVDM").unwrap();
        assert_eq!(sentences.len(), 1);
        assert!(sentences[0].starts_with("!AIVDM,1,1,,B,"));
        assert!(sentences[0].len() <= Sentence::MAX_LEN);

        let parsed = Sentence::parse(sentences[0].as_bytes()).unwrap();
        assert!(parsed.is_valid);
        assert_eq!(parsed.fill_bits, 0);

        let Message::PositionReport(back) = decode_sentences(&sentences) else {
            panic!("expected position report");
        };
        assert_eq!(back.mmsi.to_string(), "366053209");
        assert!((back.lon - -122.341).abs() < 1e-4);
        assert!((back.lat - 37.802).abs() < 1e-4);
        assert!((back.course - 219.3).abs() < 0.05);
    }

    #[test]
    fn long_payload_fragments() {
        let msg = Message::StaticAndVoyageData(StaticAndVoyageData {
            mmsi: Mmsi::new(211_339_980),
            shipname: "HHLA 3 B".into(),
            callsign: "DH3579".into(),
            destination: "HAMBURG".into(),
            ..StaticAndVoyageData::default()
        });
        let sentences = encode(&msg, 'A', "AIVDO").unwrap();
        // 424 bits armor to 71 characters: two fragments.
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].starts_with("!AIVDO,2,1,0,A,"));
        assert!(sentences[1].starts_with("!AIVDO,2,2,0,A,"));
        for s in &sentences {
            assert!(s.len() <= Sentence::MAX_LEN, "{s} too long");
            assert!(Sentence::parse(s.as_bytes()).unwrap().is_valid);
        }
        // Fill bits only on the final fragment: 424 = 70*6 + 4.
        let last = Sentence::parse(sentences[1].as_bytes()).unwrap();
        assert_eq!(last.fill_bits, 2);

        let Message::StaticAndVoyageData(back) = decode_sentences(&sentences) else {
            panic!("expected static and voyage data");
        };
        assert_eq!(back.shipname, "HHLA 3 B");
        assert_eq!(back.destination, "HAMBURG");
    }

    #[test]
    fn sequence_ids_cycle() {
        let msg = Message::StaticAndVoyageData(StaticAndVoyageData {
            mmsi: Mmsi::new(211_339_980),
            ..StaticAndVoyageData::default()
        });
        let mut encoder = Encoder::new();
        for expected in ["0", "1", "2"] {
            let sentences = encoder.encode(&msg, 'A', "AIVDM").unwrap();
            let parsed = Sentence::parse(sentences[0].as_bytes()).unwrap();
            assert_eq!(parsed.seq_id, Some(expected.parse().unwrap()));
        }
    }

    #[test]
    fn rejects_bad_framing_parameters() {
        let msg = Message::PositionReport(PositionReport::default());
        assert!(matches!(
            encode(&msg, 'C', "AIVDM"),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            encode(&msg, 'A', "GPGGA"),
            Err(Error::InvalidData(_))
        ));
    }
}
