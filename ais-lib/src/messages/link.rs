//! Link management and addressed traffic: types 7/13, 10, 12, 14, 15, 16,
//! 20, 22, and 23.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sixbit::{BitBuf, BitReader, BitWriter};

use super::enums::{StationInterval, StationType, TransmitMode};
use super::Mmsi;

/// One acknowledged message in a type 7/13 report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub mmsi: Mmsi,
    pub seqno: u8,
}

/// Binary acknowledge (type 7) and safety-related acknowledge (type 13).
///
/// Carries between one and four acknowledgements; the wire length varies
/// accordingly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryAcknowledge {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub acks: Vec<Acknowledgement>,
}

impl Default for BinaryAcknowledge {
    fn default() -> Self {
        BinaryAcknowledge {
            msg_type: 7,
            repeat: 0,
            mmsi: Mmsi::default(),
            acks: Vec::new(),
        }
    }
}

impl BinaryAcknowledge {
    pub(crate) fn decode(rd: &mut BitReader<'_>, msg_type: u8) -> Self {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        rd.skip(2);
        let mut acks = Vec::new();
        while acks.len() < 4 && rd.remaining() >= 32 {
            acks.push(Acknowledgement {
                mmsi: Mmsi::new(rd.u32(30).expect("length checked")),
                seqno: rd.u32(2).expect("length checked") as u8,
            });
        }
        BinaryAcknowledge {
            msg_type,
            repeat,
            mmsi,
            acks,
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(0, 2)?;
        for ack in self.acks.iter().take(4) {
            w.put_u32(ack.mmsi.raw(), 30)?;
            w.put_u32(u32::from(ack.seqno), 2)?;
        }
        Ok(())
    }
}

/// UTC/date inquiry, type 10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtcDateInquiry {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub dest_mmsi: Mmsi,
}

impl Default for UtcDateInquiry {
    fn default() -> Self {
        UtcDateInquiry {
            msg_type: 10,
            repeat: 0,
            mmsi: Mmsi::default(),
            dest_mmsi: Mmsi::default(),
        }
    }
}

impl UtcDateInquiry {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        rd.skip(2);
        let dest_mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        UtcDateInquiry {
            msg_type: 10,
            repeat,
            mmsi,
            dest_mmsi,
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(0, 2)?;
        w.put_u32(self.dest_mmsi.raw(), 30)?;
        w.put_u32(0, 2)
    }
}

/// Addressed safety-related message, type 12.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressedSafetyMessage {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub seqno: u8,
    pub dest_mmsi: Mmsi,
    pub retransmit: bool,
    pub text: String,
}

impl Default for AddressedSafetyMessage {
    fn default() -> Self {
        AddressedSafetyMessage {
            msg_type: 12,
            repeat: 0,
            mmsi: Mmsi::default(),
            seqno: 0,
            dest_mmsi: Mmsi::default(),
            retransmit: false,
            text: String::new(),
        }
    }
}

impl AddressedSafetyMessage {
    /// Maximum text payload bits.
    pub const MAX_TEXT_BITS: usize = 936;

    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        let seqno = rd.u32(2).unwrap_or(0) as u8;
        let dest_mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        let retransmit = rd.flag().unwrap_or(false);
        rd.skip(1);
        let nbits = rd.remaining().min(Self::MAX_TEXT_BITS);
        let text = rd.string(nbits).unwrap_or_default();
        AddressedSafetyMessage {
            msg_type: 12,
            repeat,
            mmsi,
            seqno,
            dest_mmsi,
            retransmit,
            text,
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
        let nbits = (self.text.chars().count() * 6).min(Self::MAX_TEXT_BITS);
        w.put_string(&self.text, nbits)
    }
}

/// Safety-related broadcast message, type 14.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyBroadcastMessage {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub text: String,
}

impl Default for SafetyBroadcastMessage {
    fn default() -> Self {
        SafetyBroadcastMessage {
            msg_type: 14,
            repeat: 0,
            mmsi: Mmsi::default(),
            text: String::new(),
        }
    }
}

impl SafetyBroadcastMessage {
    pub const MAX_TEXT_BITS: usize = 966;

    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        rd.skip(2);
        let nbits = rd.remaining().min(Self::MAX_TEXT_BITS);
        let text = rd.string(nbits).unwrap_or_default();
        SafetyBroadcastMessage {
            msg_type: 14,
            repeat,
            mmsi,
            text,
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(0, 2)?;
        let nbits = (self.text.chars().count() * 6).min(Self::MAX_TEXT_BITS);
        w.put_string(&self.text, nbits)
    }
}

/// Interrogation, type 15.
///
/// Requests up to two message types from a first station and one from a
/// second. Absent requests are zero, as transmitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interrogation {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub mmsi1: Mmsi,
    pub type1_1: u8,
    pub offset1_1: u16,
    pub type1_2: u8,
    pub offset1_2: u16,
    pub mmsi2: Mmsi,
    pub type2_1: u8,
    pub offset2_1: u16,
}

impl Default for Interrogation {
    fn default() -> Self {
        Interrogation {
            msg_type: 15,
            repeat: 0,
            mmsi: Mmsi::default(),
            mmsi1: Mmsi::default(),
            type1_1: 0,
            offset1_1: 0,
            type1_2: 0,
            offset1_2: 0,
            mmsi2: Mmsi::default(),
            type2_1: 0,
            offset2_1: 0,
        }
    }
}

impl Interrogation {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        rd.skip(2);
        let mmsi1 = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        let type1_1 = rd.u32(6).unwrap_or(0) as u8;
        let offset1_1 = rd.u32(12).unwrap_or(0) as u16;
        rd.skip(2);
        let type1_2 = rd.u32(6).unwrap_or(0) as u8;
        let offset1_2 = rd.u32(12).unwrap_or(0) as u16;
        rd.skip(2);
        let mmsi2 = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        let type2_1 = rd.u32(6).unwrap_or(0) as u8;
        let offset2_1 = rd.u32(12).unwrap_or(0) as u16;
        Interrogation {
            msg_type: 15,
            repeat,
            mmsi,
            mmsi1,
            type1_1,
            offset1_1,
            type1_2,
            offset1_2,
            mmsi2,
            type2_1,
            offset2_1,
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(0, 2)?;
        w.put_u32(self.mmsi1.raw(), 30)?;
        w.put_u32(u32::from(self.type1_1), 6)?;
        w.put_u32(u32::from(self.offset1_1), 12)?;
        w.put_u32(0, 2)?;
        w.put_u32(u32::from(self.type1_2), 6)?;
        w.put_u32(u32::from(self.offset1_2), 12)?;
        w.put_u32(0, 2)?;
        w.put_u32(self.mmsi2.raw(), 30)?;
        w.put_u32(u32::from(self.type2_1), 6)?;
        w.put_u32(u32::from(self.offset2_1), 12)?;
        w.put_u32(0, 2)
    }
}

/// One `(mmsi, offset, increment)` assignment in a type 16 command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub mmsi: Mmsi,
    pub offset: u16,
    pub increment: u16,
}

/// Assignment mode command, type 16.
///
/// The short 96-bit form carries a single assignment; the 144-bit form
/// carries two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentModeCommand {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub assignment1: Assignment,
    pub assignment2: Option<Assignment>,
}

impl Default for AssignmentModeCommand {
    fn default() -> Self {
        AssignmentModeCommand {
            msg_type: 16,
            repeat: 0,
            mmsi: Mmsi::default(),
            assignment1: Assignment::default(),
            assignment2: None,
        }
    }
}

impl AssignmentModeCommand {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        rd.skip(2);
        let assignment1 = Assignment {
            mmsi: rd.u32(30).map_or_else(Mmsi::default, Mmsi::new),
            offset: rd.u32(12).unwrap_or(0) as u16,
            increment: rd.u32(10).unwrap_or(0) as u16,
        };
        let assignment2 = if rd.remaining() >= 52 {
            Some(Assignment {
                mmsi: Mmsi::new(rd.u32(30).expect("length checked")),
                offset: rd.u32(12).expect("length checked") as u16,
                increment: rd.u32(10).expect("length checked") as u16,
            })
        } else {
            None
        };
        AssignmentModeCommand {
            msg_type: 16,
            repeat,
            mmsi,
            assignment1,
            assignment2,
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(0, 2)?;
        w.put_u32(self.assignment1.mmsi.raw(), 30)?;
        w.put_u32(u32::from(self.assignment1.offset), 12)?;
        w.put_u32(u32::from(self.assignment1.increment), 10)?;
        match &self.assignment2 {
            Some(b) => {
                w.put_u32(b.mmsi.raw(), 30)?;
                w.put_u32(u32::from(b.offset), 12)?;
                w.put_u32(u32::from(b.increment), 10)
            }
            // Short form pads to 96 bits.
            None => w.put_u32(0, 4),
        }
    }
}

/// One reserved slot block in a type 20 message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedSlots {
    pub offset: u16,
    pub number: u8,
    pub timeout: u8,
    pub increment: u16,
}

/// Data link management message, type 20.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataLinkManagement {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    /// Up to four reserved slot blocks.
    pub reservations: Vec<ReservedSlots>,
}

impl Default for DataLinkManagement {
    fn default() -> Self {
        DataLinkManagement {
            msg_type: 20,
            repeat: 0,
            mmsi: Mmsi::default(),
            reservations: Vec::new(),
        }
    }
}

impl DataLinkManagement {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        rd.skip(2);
        let mut reservations = Vec::new();
        while reservations.len() < 4 && rd.remaining() >= 30 {
            reservations.push(ReservedSlots {
                offset: rd.u32(12).expect("length checked") as u16,
                number: rd.u32(4).expect("length checked") as u8,
                timeout: rd.u32(3).expect("length checked") as u8,
                increment: rd.u32(11).expect("length checked") as u16,
            });
        }
        DataLinkManagement {
            msg_type: 20,
            repeat,
            mmsi,
            reservations,
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(0, 2)?;
        for r in self.reservations.iter().take(4) {
            w.put_u32(u32::from(r.offset), 12)?;
            w.put_u32(u32::from(r.number), 4)?;
            w.put_u32(u32::from(r.timeout), 3)?;
            w.put_u32(u32::from(r.increment), 11)?;
        }
        Ok(())
    }
}

/// Jurisdiction rectangle for broadcast channel management, at 0.1-minute
/// resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelArea {
    pub ne_lon: f64,
    pub ne_lat: f64,
    pub sw_lon: f64,
    pub sw_lat: f64,
}

/// Whether a channel management command is addressed to two stations or
/// broadcast over an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChannelTarget {
    Addressed { dest1: Mmsi, dest2: Mmsi },
    Broadcast(ChannelArea),
}

impl Default for ChannelTarget {
    fn default() -> Self {
        ChannelTarget::Broadcast(ChannelArea::default())
    }
}

/// Channel management, type 22.
///
/// Bits 69..139 are two destination MMSIs when the `addressed` bit at 139
/// is set, otherwise the corners of a jurisdiction rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelManagement {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub channel_a: u16,
    pub channel_b: u16,
    pub txrx: u8,
    pub power: bool,
    pub target: ChannelTarget,
    pub band_a: bool,
    pub band_b: bool,
    pub zonesize: u8,
}

impl Default for ChannelManagement {
    fn default() -> Self {
        ChannelManagement {
            msg_type: 22,
            repeat: 0,
            mmsi: Mmsi::default(),
            channel_a: 0,
            channel_b: 0,
            txrx: 0,
            power: false,
            target: ChannelTarget::default(),
            band_a: false,
            band_b: false,
            zonesize: 0,
        }
    }
}

impl ChannelManagement {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        rd.skip(2);
        let channel_a = rd.u32(12).unwrap_or(0) as u16;
        let channel_b = rd.u32(12).unwrap_or(0) as u16;
        let txrx = rd.u32(4).unwrap_or(0) as u8;
        let power = rd.flag().unwrap_or(false);
        // The interpretation of the next 70 bits depends on the addressed
        // bit that follows them.
        let window = rd.bytes(70);
        let addressed = rd.flag().unwrap_or(false);
        let band_a = rd.flag().unwrap_or(false);
        let band_b = rd.flag().unwrap_or(false);
        let zonesize = rd.u32(3).unwrap_or(0) as u8;
        let target = match window {
            Some(bytes) => {
                let buf = BitBuf::from_bytes(bytes, 70);
                let mut wr = BitReader::new(&buf);
                if addressed {
                    let dest1 = wr.u32(30).map_or_else(Mmsi::default, Mmsi::new);
                    wr.skip(5);
                    let dest2 = wr.u32(30).map_or_else(Mmsi::default, Mmsi::new);
                    ChannelTarget::Addressed { dest1, dest2 }
                } else {
                    ChannelTarget::Broadcast(ChannelArea {
                        ne_lon: wr.i32(18).map_or(0.0, |v| f64::from(v) / 10.0),
                        ne_lat: wr.i32(17).map_or(0.0, |v| f64::from(v) / 10.0),
                        sw_lon: wr.i32(18).map_or(0.0, |v| f64::from(v) / 10.0),
                        sw_lat: wr.i32(17).map_or(0.0, |v| f64::from(v) / 10.0),
                    })
                }
            }
            None => ChannelTarget::default(),
        };
        ChannelManagement {
            msg_type: 22,
            repeat,
            mmsi,
            channel_a,
            channel_b,
            txrx,
            power,
            target,
            band_a,
            band_b,
            zonesize,
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(0, 2)?;
        w.put_u32(u32::from(self.channel_a), 12)?;
        w.put_u32(u32::from(self.channel_b), 12)?;
        w.put_u32(u32::from(self.txrx), 4)?;
        w.put_flag(self.power);
        match &self.target {
            ChannelTarget::Addressed { dest1, dest2 } => {
                w.put_u32(dest1.raw(), 30)?;
                w.put_u32(0, 5)?;
                w.put_u32(dest2.raw(), 30)?;
                w.put_u32(0, 5)?;
                w.put_flag(true);
            }
            ChannelTarget::Broadcast(area) => {
                w.put_i32((area.ne_lon * 10.0).round() as i32, 18)?;
                w.put_i32((area.ne_lat * 10.0).round() as i32, 17)?;
                w.put_i32((area.sw_lon * 10.0).round() as i32, 18)?;
                w.put_i32((area.sw_lat * 10.0).round() as i32, 17)?;
                w.put_flag(false);
            }
        }
        w.put_flag(self.band_a);
        w.put_flag(self.band_b);
        w.put_u32(u32::from(self.zonesize), 3)?;
        w.put_u32(0, 23)
    }
}

/// Group assignment command, type 23.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupAssignmentCommand {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub area: ChannelArea,
    pub station_type: StationType,
    pub ship_type: u8,
    pub txrx: TransmitMode,
    pub interval: StationInterval,
    /// Quiet time in minutes, 0 for none.
    pub quiet: u8,
}

impl Default for GroupAssignmentCommand {
    fn default() -> Self {
        GroupAssignmentCommand {
            msg_type: 23,
            repeat: 0,
            mmsi: Mmsi::default(),
            area: ChannelArea::default(),
            station_type: StationType::default(),
            ship_type: 0,
            txrx: TransmitMode::default(),
            interval: StationInterval::default(),
            quiet: 0,
        }
    }
}

impl GroupAssignmentCommand {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        rd.skip(2);
        let area = ChannelArea {
            ne_lon: rd.i32(18).map_or(0.0, |v| f64::from(v) / 10.0),
            ne_lat: rd.i32(17).map_or(0.0, |v| f64::from(v) / 10.0),
            sw_lon: rd.i32(18).map_or(0.0, |v| f64::from(v) / 10.0),
            sw_lat: rd.i32(17).map_or(0.0, |v| f64::from(v) / 10.0),
        };
        let station_type = rd
            .u32(4)
            .map_or_else(StationType::default, |v| StationType::from_raw(v as u8));
        let ship_type = rd.u32(8).unwrap_or(0) as u8;
        rd.skip(22);
        let txrx = rd
            .u32(2)
            .map_or_else(TransmitMode::default, |v| TransmitMode::from_raw(v as u8));
        let interval = rd.u32(4).map_or_else(StationInterval::default, |v| {
            StationInterval::from_raw(v as u8)
        });
        let quiet = rd.u32(4).unwrap_or(0) as u8;
        GroupAssignmentCommand {
            msg_type: 23,
            repeat,
            mmsi,
            area,
            station_type,
            ship_type,
            txrx,
            interval,
            quiet,
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(0, 2)?;
        w.put_i32((self.area.ne_lon * 10.0).round() as i32, 18)?;
        w.put_i32((self.area.ne_lat * 10.0).round() as i32, 17)?;
        w.put_i32((self.area.sw_lon * 10.0).round() as i32, 18)?;
        w.put_i32((self.area.sw_lat * 10.0).round() as i32, 17)?;
        w.put_u32(u32::from(self.station_type.raw()), 4)?;
        w.put_u32(u32::from(self.ship_type), 8)?;
        w.put_u32(0, 22)?;
        w.put_u32(u32::from(self.txrx.raw()), 2)?;
        w.put_u32(u32::from(self.interval.raw()), 4)?;
        w.put_u32(u32::from(self.quiet), 4)?;
        w.put_u32(0, 6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Message;
    use crate::sixbit::unarmor;

    #[test]
    fn decode_type_7() {
        let bits = unarmor(b"702R5`hwCjq8", 0).unwrap();
        let Message::BinaryAcknowledge(m) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected binary acknowledge");
        };
        assert_eq!(m.msg_type, 7);
        assert_eq!(m.mmsi.to_string(), "002655651");
        assert_eq!(m.acks.len(), 1);
        assert_eq!(m.acks[0].mmsi.to_string(), "265538450");
    }

    #[test]
    fn type_12_round_trips() {
        let original = AddressedSafetyMessage {
            mmsi: Mmsi::new(271_002_099),
            seqno: 0,
            dest_mmsi: Mmsi::new(271_002_111),
            retransmit: true,
            text: "MSG FROM 271002099".into(),
            ..AddressedSafetyMessage::default()
        };
        let bits = Message::AddressedSafety(original.clone()).to_bits().unwrap();
        let Message::AddressedSafety(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected addressed safety message");
        };
        assert_eq!(back, original);
    }

    #[test]
    fn type_16_short_form_drops_second_assignment() {
        let short = AssignmentModeCommand {
            mmsi: Mmsi::new(2_053_501),
            assignment1: Assignment {
                mmsi: Mmsi::new(224_251_000),
                offset: 200,
                increment: 0,
            },
            assignment2: None,
            ..AssignmentModeCommand::default()
        };
        let bits = Message::AssignmentModeCommand(short.clone()).to_bits().unwrap();
        assert_eq!(bits.bit_len(), 96);
        let Message::AssignmentModeCommand(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected assignment mode command");
        };
        assert_eq!(back, short);

        let long = AssignmentModeCommand {
            assignment2: Some(Assignment {
                mmsi: Mmsi::new(235_000_126),
                offset: 1,
                increment: 2,
            }),
            ..short
        };
        let bits = Message::AssignmentModeCommand(long.clone()).to_bits().unwrap();
        assert_eq!(bits.bit_len(), 144);
        let Message::AssignmentModeCommand(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected assignment mode command");
        };
        assert_eq!(back, long);
    }

    #[test]
    fn type_20_variable_reservations() {
        let original = DataLinkManagement {
            mmsi: Mmsi::new(2_243_302),
            reservations: vec![
                ReservedSlots {
                    offset: 200,
                    number: 5,
                    timeout: 7,
                    increment: 750,
                },
                ReservedSlots {
                    offset: 450,
                    number: 2,
                    timeout: 7,
                    increment: 0,
                },
            ],
            ..DataLinkManagement::default()
        };
        let bits = Message::DataLinkManagement(original.clone()).to_bits().unwrap();
        assert_eq!(bits.bit_len(), 40 + 60);
        let Message::DataLinkManagement(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected data link management");
        };
        assert_eq!(back, original);
    }

    #[test]
    fn type_22_addressed_vs_broadcast() {
        let addressed = ChannelManagement {
            mmsi: Mmsi::new(3_160_127),
            channel_a: 2087,
            channel_b: 2088,
            txrx: 1,
            power: false,
            target: ChannelTarget::Addressed {
                dest1: Mmsi::new(28_144_881),
                dest2: Mmsi::new(268_435_519),
            },
            ..ChannelManagement::default()
        };
        let bits = Message::ChannelManagement(addressed.clone()).to_bits().unwrap();
        assert_eq!(bits.bit_len(), 168);
        let Message::ChannelManagement(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected channel management");
        };
        assert_eq!(back, addressed);

        let broadcast = ChannelManagement {
            target: ChannelTarget::Broadcast(ChannelArea {
                ne_lon: -7.7,
                ne_lat: 3.3,
                sw_lon: -8.0,
                sw_lat: 3.0,
            }),
            ..addressed
        };
        let bits = Message::ChannelManagement(broadcast.clone()).to_bits().unwrap();
        let Message::ChannelManagement(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected channel management");
        };
        assert_eq!(back, broadcast);
    }

    #[test]
    fn type_23_round_trips() {
        let original = GroupAssignmentCommand {
            mmsi: Mmsi::new(2_268_120),
            area: ChannelArea {
                ne_lon: 157.8,
                ne_lat: 45.2,
                sw_lon: 109.6,
                sw_lat: 12.3,
            },
            station_type: StationType::ClassBAll,
            ship_type: 0,
            txrx: TransmitMode::TxATxBRxARxB,
            interval: StationInterval::NextShorter,
            quiet: 0,
            ..GroupAssignmentCommand::default()
        };
        let bits = Message::GroupAssignmentCommand(original.clone()).to_bits().unwrap();
        assert_eq!(bits.bit_len(), 160);
        let Message::GroupAssignmentCommand(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected group assignment command");
        };
        assert_eq!(back.station_type, original.station_type);
        assert_eq!(back.interval, original.interval);
        assert!((back.area.ne_lon - original.area.ne_lon).abs() < 0.05);
    }
}
