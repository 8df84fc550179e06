use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sentence::checksum;

/// Sentence-group designator from a tag block `g:` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagBlockGroup {
    /// One-based index of this sentence within the group.
    pub sentence_num: u32,
    /// Total sentences in the group.
    pub sentence_tot: u32,
    /// Group id shared by all members.
    pub group_id: u32,
}

/// An IEC 61162-1 tag block: `\k:v,…*CS\` ahead of the sentence proper.
///
/// Recognized keys are `c` (unix receive time), `d` (destination station),
/// `n` (line count), `r` (relative time), `s` (source station), `t` (text),
/// and `g` (sentence grouping). Unknown keys are ignored. The block carries
/// its own XOR checksum over the content between the backslashes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagBlock {
    pub receiver_timestamp: Option<u64>,
    pub destination_station: Option<String>,
    pub line_count: Option<u64>,
    pub relative_time: Option<u64>,
    pub source_station: Option<String>,
    pub text: Option<String>,
    pub group: Option<TagBlockGroup>,
    /// Whether the stated checksum matched; `false` when absent.
    pub is_valid: bool,
    /// The content between the backslashes, checksum included.
    pub raw: String,
}

impl TagBlock {
    /// Parse the tag block content (backslashes already removed).
    ///
    /// A missing or mismatched checksum leaves [TagBlock::is_valid] unset
    /// rather than failing; real feeds omit it surprisingly often.
    ///
    /// # Errors
    /// [Error::InvalidNmea] if the content is not `k:v` shaped at all.
    pub fn parse(content: &[u8]) -> Result<TagBlock> {
        let raw = String::from_utf8_lossy(content).into_owned();
        let (fields_part, is_valid) = match content.iter().rposition(|&b| b == b'*') {
            Some(star) => {
                let stated = std::str::from_utf8(&content[star + 1..])
                    .ok()
                    .and_then(|s| u8::from_str_radix(s, 16).ok());
                let computed = checksum(&content[..star]);
                (&content[..star], stated == Some(computed))
            }
            None => (content, false),
        };

        let mut block = TagBlock {
            is_valid,
            raw,
            ..TagBlock::default()
        };
        for pair in fields_part.split(|&b| b == b',') {
            let Some(colon) = pair.iter().position(|&b| b == b':') else {
                return Err(Error::InvalidNmea("tag block field without ':'".into()));
            };
            // Values may themselves contain ':' -- split on the first only.
            let key = &pair[..colon];
            let val = String::from_utf8_lossy(&pair[colon + 1..]).into_owned();
            match key {
                b"c" => block.receiver_timestamp = val.parse().ok(),
                b"d" => block.destination_station = Some(val),
                b"n" => block.line_count = val.parse().ok(),
                b"r" => block.relative_time = val.parse().ok(),
                b"s" => block.source_station = Some(val),
                b"t" => block.text = Some(val),
                b"g" => block.group = parse_group(&val),
                _ => {}
            }
        }
        Ok(block)
    }

    /// Re-encode the recognized fields as tag block content with a fresh
    /// checksum, backslashes not included.
    #[must_use]
    pub fn to_raw(&self) -> String {
        let mut fields: Vec<String> = Vec::new();
        if let Some(g) = &self.group {
            fields.push(format!("g:{}-{}-{}", g.sentence_num, g.sentence_tot, g.group_id));
        }
        if let Some(s) = &self.source_station {
            fields.push(format!("s:{s}"));
        }
        if let Some(c) = self.receiver_timestamp {
            fields.push(format!("c:{c}"));
        }
        if let Some(d) = &self.destination_station {
            fields.push(format!("d:{d}"));
        }
        if let Some(r) = self.relative_time {
            fields.push(format!("r:{r}"));
        }
        if let Some(t) = &self.text {
            fields.push(format!("t:{t}"));
        }
        if let Some(n) = self.line_count {
            fields.push(format!("n:{n}"));
        }
        let body = fields.join(",");
        format!("{body}*{:02X}", checksum(body.as_bytes()))
    }
}

/// Group values occur as `num-total-id` and `num/total/id` in the wild.
fn parse_group(val: &str) -> Option<TagBlockGroup> {
    let sep = if val.contains('-') { '-' } else { '/' };
    let mut it = val.splitn(3, sep);
    Some(TagBlockGroup {
        sentence_num: it.next()?.parse().ok()?,
        sentence_tot: it.next()?.parse().ok()?,
        group_id: it.next()?.parse().ok()?,
    })
}

/// Split an optional leading tag block off `line`.
///
/// Returns the remaining bytes and the tag block content, if any. An empty
/// block (`\\`) yields `None`.
pub(crate) fn split_tag_block(line: &[u8]) -> Result<(&[u8], Option<&[u8]>)> {
    if line.first() != Some(&b'\\') {
        return Ok((line, None));
    }
    let Some(end) = line[1..].iter().position(|&b| b == b'\\') else {
        return Err(Error::InvalidNmea("unterminated tag block".into()));
    };
    let content = &line[1..=end];
    let rest = &line[end + 2..];
    if content.is_empty() {
        Ok((rest, None))
    } else {
        Ok((rest, Some(content)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_line_count() {
        let tb = TagBlock::parse(b"n:3140,s:FooBar,c:1428451253*1C").unwrap();
        assert!(tb.is_valid);
        assert_eq!(tb.receiver_timestamp, Some(1428451253));
        assert_eq!(tb.source_station.as_deref(), Some("FooBar"));
        assert_eq!(tb.destination_station, None);
        assert_eq!(tb.line_count, Some(3140));
        assert_eq!(tb.relative_time, None);
        assert_eq!(tb.text, None);
    }

    #[test]
    fn parse_with_group() {
        let tb = TagBlock::parse(b"g:1-2-4512,s:FooBar,c:1428451253*50").unwrap();
        let group = tb.group.unwrap();
        assert_eq!(group.sentence_num, 1);
        assert_eq!(group.sentence_tot, 2);
        assert_eq!(group.group_id, 4512);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let tb =
            TagBlock::parse(b"s:APIDSSRC1,g:2-2-05628,n:08795,c:0002780323,x:123445,y:23456*0C")
                .unwrap();
        assert_eq!(tb.source_station.as_deref(), Some("APIDSSRC1"));
        assert_eq!(tb.line_count, Some(8795));
        assert_eq!(tb.receiver_timestamp, Some(2780323));
    }

    #[test]
    fn values_may_contain_colons() {
        let tb = TagBlock::parse(
            b"s:rORBCOMM000,q:u,c:1426032001,T:2015-03-11 00.00.01,i:<T>A:12344 F:+30000</T>*07",
        )
        .unwrap();
        assert!(tb.is_valid);
        assert_eq!(tb.receiver_timestamp, Some(1426032001));
        assert_eq!(tb.source_station.as_deref(), Some("rORBCOMM000"));
    }

    #[test]
    fn missing_checksum_is_tolerated() {
        let tb = TagBlock::parse(b"s:2573535,c:1671533231").unwrap();
        assert!(!tb.is_valid);
        assert_eq!(tb.source_station.as_deref(), Some("2573535"));
    }

    #[test]
    fn parse_is_idempotent() {
        let a = TagBlock::parse(b"g:1-2-4512,s:FooBar,c:1428451253*50").unwrap();
        let b = TagBlock::parse(b"g:1-2-4512,s:FooBar,c:1428451253*50").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn to_raw_round_trips_checksum() {
        let tb = TagBlock::parse(b"s:APIDSSRC1,g:2-2-05628,n:08795,c:0002780323*0C").unwrap();
        let raw = tb.to_raw();
        assert_eq!(raw, "g:2-2-5628,s:APIDSSRC1,c:2780323,n:8795*3C");
        let reparsed = TagBlock::parse(raw.as_bytes()).unwrap();
        assert!(reparsed.is_valid);
        assert_eq!(reparsed.group, tb.group);
        assert_eq!(reparsed.line_count, tb.line_count);
    }

    #[test]
    fn split_removes_leading_block() {
        let (rest, tb) =
            split_tag_block(b"\\s:2573535,c:1671533231*08\\!BSVDM,2,2,8,B,00000000000,2*36")
                .unwrap();
        assert_eq!(rest, b"!BSVDM,2,2,8,B,00000000000,2*36");
        assert_eq!(tb, Some(&b"s:2573535,c:1671533231*08"[..]));

        let (rest, tb) = split_tag_block(b"!BSVDM,2,2,8,B,00000000000,2*36").unwrap();
        assert_eq!(rest, b"!BSVDM,2,2,8,B,00000000000,2*36");
        assert_eq!(tb, None);
    }

    #[test]
    fn empty_block_is_none() {
        let (rest, tb) = split_tag_block(b"\\\\!AIVDM,1,1,,A,1,0*00").unwrap();
        assert_eq!(tb, None);
        assert!(rest.starts_with(b"!AIVDM"));
    }
}
