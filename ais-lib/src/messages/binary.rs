//! Application-specific binary payload carriers: types 6, 8, 17, 25, 26.
//!
//! The inner DAC/FID subprotocols are not interpreted; payloads surface as
//! MSB-aligned bytes plus an exact bit count so re-encoding reproduces the
//! original window.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sixbit::{BitReader, BitWriter};

use super::Mmsi;

fn read_data(rd: &mut BitReader<'_>, nbits: usize) -> (Vec<u8>, usize) {
    match rd.bytes(nbits) {
        Some(data) => (data, nbits),
        None => (Vec::new(), 0),
    }
}

/// Addressed binary message, type 6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressedBinaryMessage {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub seqno: u8,
    pub dest_mmsi: Mmsi,
    pub retransmit: bool,
    /// Designated area code.
    pub dac: u16,
    /// Functional id within the DAC.
    pub fid: u8,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
    /// Exact bit length of `data`; trailing pad bits are not payload.
    pub data_bits: usize,
}

impl Default for AddressedBinaryMessage {
    fn default() -> Self {
        AddressedBinaryMessage {
            msg_type: 6,
            repeat: 0,
            mmsi: Mmsi::default(),
            seqno: 0,
            dest_mmsi: Mmsi::default(),
            retransmit: false,
            dac: 0,
            fid: 0,
            data: Vec::new(),
            data_bits: 0,
        }
    }
}

impl AddressedBinaryMessage {
    /// Maximum application data bits.
    pub const MAX_DATA_BITS: usize = 920;

    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        let seqno = rd.u32(2).unwrap_or(0) as u8;
        let dest_mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        let retransmit = rd.flag().unwrap_or(false);
        rd.skip(1);
        let dac = rd.u32(10).unwrap_or(0) as u16;
        let fid = rd.u32(6).unwrap_or(0) as u8;
        let nbits = rd.remaining().min(Self::MAX_DATA_BITS);
        let (data, data_bits) = read_data(rd, nbits);
        AddressedBinaryMessage {
            msg_type: 6,
            repeat,
            mmsi,
            seqno,
            dest_mmsi,
            retransmit,
            dac,
            fid,
            data,
            data_bits,
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(u32::from(self.seqno), 2)?;
        w.put_u32(self.dest_mmsi.raw(), 30)?;
        w.put_flag(self.retransmit);
        w.put_u32(0, 1)?;
        w.put_u32(u32::from(self.dac), 10)?;
        w.put_u32(u32::from(self.fid), 6)?;
        w.put_bytes(&self.data, self.payload_bits());
        Ok(())
    }

    fn payload_bits(&self) -> usize {
        let nbits = if self.data_bits == 0 && !self.data.is_empty() {
            self.data.len() * 8
        } else {
            self.data_bits
        };
        nbits.min(Self::MAX_DATA_BITS)
    }
}

/// Binary broadcast message, type 8.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryBroadcastMessage {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub dac: u16,
    pub fid: u8,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
    pub data_bits: usize,
}

impl Default for BinaryBroadcastMessage {
    fn default() -> Self {
        BinaryBroadcastMessage {
            msg_type: 8,
            repeat: 0,
            mmsi: Mmsi::default(),
            dac: 0,
            fid: 0,
            data: Vec::new(),
            data_bits: 0,
        }
    }
}

impl BinaryBroadcastMessage {
    pub const MAX_DATA_BITS: usize = 952;

    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        rd.skip(2);
        let dac = rd.u32(10).unwrap_or(0) as u16;
        let fid = rd.u32(6).unwrap_or(0) as u8;
        let nbits = rd.remaining().min(Self::MAX_DATA_BITS);
        let (data, data_bits) = read_data(rd, nbits);
        BinaryBroadcastMessage {
            msg_type: 8,
            repeat,
            mmsi,
            dac,
            fid,
            data,
            data_bits,
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(0, 2)?;
        w.put_u32(u32::from(self.dac), 10)?;
        w.put_u32(u32::from(self.fid), 6)?;
        let nbits = if self.data_bits == 0 && !self.data.is_empty() {
            self.data.len() * 8
        } else {
            self.data_bits
        };
        w.put_bytes(&self.data, nbits.min(Self::MAX_DATA_BITS));
        Ok(())
    }
}

/// DGNSS differential correction broadcast, type 17.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DgnssBroadcast {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    /// Reference station longitude at 0.1-minute resolution.
    pub lon: f64,
    /// Reference station latitude at 0.1-minute resolution.
    pub lat: f64,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
    pub data_bits: usize,
}

impl Default for DgnssBroadcast {
    fn default() -> Self {
        DgnssBroadcast {
            msg_type: 17,
            repeat: 0,
            mmsi: Mmsi::default(),
            lon: 0.0,
            lat: 0.0,
            data: Vec::new(),
            data_bits: 0,
        }
    }
}

impl DgnssBroadcast {
    pub const MAX_DATA_BITS: usize = 736;

    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let d = DgnssBroadcast::default();
        let repeat = rd.u32(2).map_or(0, |v| v as u8);
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        rd.skip(2);
        let lon = rd.i32(18).map_or(d.lon, |v| f64::from(v) / 10.0);
        let lat = rd.i32(17).map_or(d.lat, |v| f64::from(v) / 10.0);
        rd.skip(5);
        let nbits = rd.remaining().min(Self::MAX_DATA_BITS);
        let (data, data_bits) = read_data(rd, nbits);
        DgnssBroadcast {
            msg_type: 17,
            repeat,
            mmsi,
            lon,
            lat,
            data,
            data_bits,
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(0, 2)?;
        w.put_i32((self.lon * 10.0).round() as i32, 18)?;
        w.put_i32((self.lat * 10.0).round() as i32, 17)?;
        w.put_u32(0, 5)?;
        let nbits = if self.data_bits == 0 && !self.data.is_empty() {
            self.data.len() * 8
        } else {
            self.data_bits
        };
        w.put_bytes(&self.data, nbits.min(Self::MAX_DATA_BITS));
        Ok(())
    }
}

/// Single-slot binary message, type 25.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleSlotBinaryMessage {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub addressed: bool,
    pub structured: bool,
    /// Destination, present when `addressed`.
    pub dest_mmsi: Option<Mmsi>,
    /// 16-bit application id (DAC + FID), present when `structured`.
    pub app_id: Option<u16>,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
    pub data_bits: usize,
}

impl Default for SingleSlotBinaryMessage {
    fn default() -> Self {
        SingleSlotBinaryMessage {
            msg_type: 25,
            repeat: 0,
            mmsi: Mmsi::default(),
            addressed: false,
            structured: false,
            dest_mmsi: None,
            app_id: None,
            data: Vec::new(),
            data_bits: 0,
        }
    }
}

impl SingleSlotBinaryMessage {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        let addressed = rd.flag().unwrap_or(false);
        let structured = rd.flag().unwrap_or(false);
        let dest_mmsi = if addressed {
            rd.u32(30).map(Mmsi::new)
        } else {
            None
        };
        let app_id = if structured {
            rd.u32(16).map(|v| v as u16)
        } else {
            None
        };
        let nbits = rd.remaining();
        let (data, data_bits) = read_data(rd, nbits);
        SingleSlotBinaryMessage {
            msg_type: 25,
            repeat,
            mmsi,
            addressed,
            structured,
            dest_mmsi,
            app_id,
            data,
            data_bits,
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_flag(self.addressed);
        w.put_flag(self.structured);
        if self.addressed {
            w.put_u32(self.dest_mmsi.unwrap_or_default().raw(), 30)?;
        }
        if self.structured {
            w.put_u32(u32::from(self.app_id.unwrap_or(0)), 16)?;
        }
        let nbits = if self.data_bits == 0 && !self.data.is_empty() {
            self.data.len() * 8
        } else {
            self.data_bits
        };
        w.put_bytes(&self.data, nbits);
        Ok(())
    }

    /// Designated area code from the application id.
    #[must_use]
    pub fn dac(&self) -> Option<u16> {
        self.app_id.map(|v| v >> 6)
    }

    /// Functional id from the application id.
    #[must_use]
    pub fn fid(&self) -> Option<u8> {
        self.app_id.map(|v| (v & 0x3f) as u8)
    }
}

/// Multi-slot binary message with appended radio status, type 26.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiSlotBinaryMessage {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub addressed: bool,
    pub structured: bool,
    pub dest_mmsi: Option<Mmsi>,
    pub app_id: Option<u16>,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
    pub data_bits: usize,
    /// 20-bit radio status word trailing the payload.
    pub radio: u32,
}

impl Default for MultiSlotBinaryMessage {
    fn default() -> Self {
        MultiSlotBinaryMessage {
            msg_type: 26,
            repeat: 0,
            mmsi: Mmsi::default(),
            addressed: false,
            structured: false,
            dest_mmsi: None,
            app_id: None,
            data: Vec::new(),
            data_bits: 0,
            radio: 0,
        }
    }
}

impl MultiSlotBinaryMessage {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        let addressed = rd.flag().unwrap_or(false);
        let structured = rd.flag().unwrap_or(false);
        let dest_mmsi = if addressed {
            rd.u32(30).map(Mmsi::new)
        } else {
            None
        };
        let app_id = if structured {
            rd.u32(16).map(|v| v as u16)
        } else {
            None
        };
        // The radio word occupies the last 20 bits; everything before it is
        // application data.
        let nbits = rd.remaining().saturating_sub(20);
        let (data, data_bits) = read_data(rd, nbits);
        let radio = rd.u32(20).unwrap_or(0);
        MultiSlotBinaryMessage {
            msg_type: 26,
            repeat,
            mmsi,
            addressed,
            structured,
            dest_mmsi,
            app_id,
            data,
            data_bits,
            radio,
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_flag(self.addressed);
        w.put_flag(self.structured);
        if self.addressed {
            w.put_u32(self.dest_mmsi.unwrap_or_default().raw(), 30)?;
        }
        if self.structured {
            w.put_u32(u32::from(self.app_id.unwrap_or(0)), 16)?;
        }
        let nbits = if self.data_bits == 0 && !self.data.is_empty() {
            self.data.len() * 8
        } else {
            self.data_bits
        };
        w.put_bytes(&self.data, nbits);
        w.put_u32(self.radio, 20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Message;
    use crate::sixbit::unarmor;

    #[test]
    fn decode_type_8() {
        let bits = unarmor(b"85Mwp`1Kf3aCnsNvBWLi=wQuNhA5t43N`5nCuI=p<IBfVqnMgPGs", 0).unwrap();
        let Message::BinaryBroadcast(m) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected binary broadcast");
        };
        assert_eq!(m.mmsi.to_string(), "366999712");
        assert_eq!(m.dac, 366);
        assert_eq!(m.fid, 56);
        assert_eq!(m.data_bits, bits.bit_len() - 56);
    }

    #[test]
    fn type_6_round_trips_with_exact_bit_count() {
        let original = AddressedBinaryMessage {
            mmsi: Mmsi::new(150_834_090),
            seqno: 3,
            dest_mmsi: Mmsi::new(313_240_222),
            retransmit: false,
            dac: 669,
            fid: 11,
            data: vec![0xeb, 0x2f, 0x11, 0x80],
            data_bits: 26,
            ..AddressedBinaryMessage::default()
        };
        let bits = Message::AddressedBinary(original.clone()).to_bits().unwrap();
        assert_eq!(bits.bit_len(), 88 + 26);
        let Message::AddressedBinary(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected addressed binary");
        };
        assert_eq!(back.dac, original.dac);
        assert_eq!(back.fid, original.fid);
        assert_eq!(back.data_bits, 26);
        // Trailing pad bits within the last byte are zeroed either way.
        assert_eq!(back.data, vec![0xeb, 0x2f, 0x11, 0x80]);
    }

    #[test]
    fn type_25_layout_selection() {
        let original = SingleSlotBinaryMessage {
            mmsi: Mmsi::new(366_999_712),
            addressed: true,
            structured: true,
            dest_mmsi: Some(Mmsi::new(134_218_384)),
            app_id: Some((45 << 6) | 12),
            data: vec![0xaa, 0x55],
            data_bits: 16,
            ..SingleSlotBinaryMessage::default()
        };
        assert_eq!(original.dac(), Some(45));
        assert_eq!(original.fid(), Some(12));
        let bits = Message::SingleSlotBinary(original.clone()).to_bits().unwrap();
        let Message::SingleSlotBinary(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected single slot binary");
        };
        assert_eq!(back, original);

        let broadcast = SingleSlotBinaryMessage {
            mmsi: Mmsi::new(366_999_712),
            addressed: false,
            structured: false,
            data: vec![0xff],
            data_bits: 8,
            ..SingleSlotBinaryMessage::default()
        };
        let bits = Message::SingleSlotBinary(broadcast.clone()).to_bits().unwrap();
        let Message::SingleSlotBinary(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected single slot binary");
        };
        assert_eq!(back, broadcast);
    }

    #[test]
    fn type_26_radio_trails_payload() {
        let original = MultiSlotBinaryMessage {
            mmsi: Mmsi::new(440_006_460),
            addressed: false,
            structured: true,
            app_id: Some(16_477),
            data: vec![0x12, 0x34, 0x56],
            data_bits: 24,
            radio: 33_236,
            ..MultiSlotBinaryMessage::default()
        };
        let bits = Message::MultiSlotBinary(original.clone()).to_bits().unwrap();
        let Message::MultiSlotBinary(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected multi slot binary");
        };
        assert_eq!(back, original);
    }
}
