use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sentence::{checksum, TagBlock};

/// A `$PGHP` Gatehouse wrapper sentence.
///
/// Shore-side Gatehouse equipment prefixes AIS traffic with these to carry a
/// receive timestamp and station context. The wrapper applies to the next
/// AIS sentence read from the same source.
///
/// ```text
/// $PGHP,1,2020,12,31,23,59,58,239,0,0,0,1,2C*5B
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gatehouse {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    pub pss: u32,
    pub region: String,
    pub country: String,
    pub online_data: String,
    pub is_valid: bool,
    pub tag_block: Option<TagBlock>,
}

impl Gatehouse {
    /// Parse a `$PGHP` line (line terminator and tag block already
    /// removed).
    ///
    /// # Errors
    /// [Error::InvalidNmea] on structural violations.
    pub fn parse(line: &[u8]) -> Result<Gatehouse> {
        let star = line.iter().rposition(|&b| b == b'*');
        let (body, is_valid) = match star {
            Some(star) => {
                let stated = std::str::from_utf8(&line[star + 1..])
                    .ok()
                    .and_then(|s| u8::from_str_radix(s.trim_end(), 16).ok());
                let computed = checksum(&line[1..star]);
                (&line[..star], stated == Some(computed))
            }
            None => (line, false),
        };
        let fields: Vec<&[u8]> = body.split(|&b| b == b',').collect();
        if fields.len() < 13 || fields[0] != b"$PGHP" || fields[1] != b"1" {
            return Err(Error::InvalidNmea("malformed $PGHP sentence".into()));
        }
        Ok(Gatehouse {
            year: parse_num(fields[2], "year")?,
            month: parse_num(fields[3], "month")?,
            day: parse_num(fields[4], "day")?,
            hour: parse_num(fields[5], "hour")?,
            minute: parse_num(fields[6], "minute")?,
            second: parse_num(fields[7], "second")?,
            millisecond: parse_num(fields[8], "millisecond")?,
            pss: parse_num(fields[9], "pss")?,
            region: String::from_utf8_lossy(fields[10]).into_owned(),
            country: String::from_utf8_lossy(fields[11]).into_owned(),
            online_data: String::from_utf8_lossy(fields[12]).into_owned(),
            is_valid,
            tag_block: None,
        })
    }

    /// The wrapper's receive time, or `None` for out-of-range components.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        Utc.with_ymd_and_hms(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
        .single()
        .and_then(|dt| {
            dt.checked_add_signed(chrono::Duration::milliseconds(i64::from(self.millisecond)))
        })
    }
}

fn parse_num<T: std::str::FromStr>(field: &[u8], what: &str) -> Result<T> {
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .ok_or_else(|| Error::InvalidNmea(format!("malformed $PGHP {what} field")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sample() {
        let w = Gatehouse::parse(b"$PGHP,1,2020,12,31,23,59,58,239,0,0,0,1,2C*5B").unwrap();
        assert_eq!(w.year, 2020);
        assert_eq!(w.month, 12);
        assert_eq!(w.day, 31);
        assert_eq!(w.hour, 23);
        assert_eq!(w.minute, 59);
        assert_eq!(w.second, 58);
        assert_eq!(w.millisecond, 239);
        assert_eq!(w.online_data, "1");
        assert!(w.is_valid);

        let ts = w.timestamp().unwrap();
        assert_eq!(ts.to_rfc3339(), "2020-12-31T23:59:58.239+00:00");
    }

    #[test]
    fn short_sentence_is_invalid() {
        let zult = Gatehouse::parse(b"$PGHP,1,2020,12*00");
        assert!(matches!(zult, Err(Error::InvalidNmea(_))));
    }

    #[test]
    fn bogus_date_has_no_timestamp() {
        let mut w = Gatehouse::parse(b"$PGHP,1,2020,12,31,23,59,58,239,0,0,0,1,2C*5B").unwrap();
        w.month = 13;
        assert!(w.timestamp().is_none());
    }
}
