//! Static vessel data: types 5, 21, and 24.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sixbit::{BitReader, BitWriter};

use super::enums::{EpfdType, NavAid};
use super::Mmsi;

/// Static and voyage related data, type 5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticAndVoyageData {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub ais_version: u8,
    pub imo: u32,
    pub callsign: String,
    pub shipname: String,
    /// Raw ship-and-cargo code; see [super::ShipType::from_raw].
    pub ship_type: u8,
    pub to_bow: u16,
    pub to_stern: u16,
    pub to_port: u8,
    pub to_starboard: u8,
    pub epfd: EpfdType,
    /// ETA month; 0 when not available.
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// Maximum present static draught in meters, 0.1 m resolution.
    pub draught: f64,
    pub destination: String,
    pub dte: bool,
}

impl Default for StaticAndVoyageData {
    fn default() -> Self {
        StaticAndVoyageData {
            msg_type: 5,
            repeat: 0,
            mmsi: Mmsi::default(),
            ais_version: 0,
            imo: 0,
            callsign: String::new(),
            shipname: String::new(),
            ship_type: 0,
            to_bow: 0,
            to_stern: 0,
            to_port: 0,
            to_starboard: 0,
            epfd: EpfdType::Undefined,
            month: 0,
            day: 0,
            hour: 24,
            minute: 60,
            draught: 0.0,
            destination: String::new(),
            dte: true,
        }
    }
}

impl StaticAndVoyageData {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let d = StaticAndVoyageData::default();
        StaticAndVoyageData {
            msg_type: 5,
            repeat: rd.u32(2).map_or(d.repeat, |v| v as u8),
            mmsi: rd.u32(30).map_or(d.mmsi, Mmsi::new),
            ais_version: rd.u32(2).map_or(d.ais_version, |v| v as u8),
            imo: rd.u32(30).unwrap_or(d.imo),
            callsign: rd.string(42).unwrap_or_else(|| d.callsign.clone()),
            shipname: rd.string(120).unwrap_or_else(|| d.shipname.clone()),
            ship_type: rd.u32(8).map_or(d.ship_type, |v| v as u8),
            to_bow: rd.u32(9).map_or(d.to_bow, |v| v as u16),
            to_stern: rd.u32(9).map_or(d.to_stern, |v| v as u16),
            to_port: rd.u32(6).map_or(d.to_port, |v| v as u8),
            to_starboard: rd.u32(6).map_or(d.to_starboard, |v| v as u8),
            epfd: rd.u32(4).map_or(d.epfd, |v| EpfdType::from_raw(v as u8)),
            month: rd.u32(4).map_or(d.month, |v| v as u8),
            day: rd.u32(5).map_or(d.day, |v| v as u8),
            hour: rd.u32(5).map_or(d.hour, |v| v as u8),
            minute: rd.u32(6).map_or(d.minute, |v| v as u8),
            draught: rd.u32(8).map_or(d.draught, |v| f64::from(v) / 10.0),
            destination: rd.string(120).unwrap_or_else(|| d.destination.clone()),
            dte: rd.flag().unwrap_or(d.dte),
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(u32::from(self.ais_version), 2)?;
        w.put_u32(self.imo, 30)?;
        w.put_string(&self.callsign, 42)?;
        w.put_string(&self.shipname, 120)?;
        w.put_u32(u32::from(self.ship_type), 8)?;
        w.put_u32(u32::from(self.to_bow), 9)?;
        w.put_u32(u32::from(self.to_stern), 9)?;
        w.put_u32(u32::from(self.to_port), 6)?;
        w.put_u32(u32::from(self.to_starboard), 6)?;
        w.put_u32(u32::from(self.epfd.raw()), 4)?;
        w.put_u32(u32::from(self.month), 4)?;
        w.put_u32(u32::from(self.day), 5)?;
        w.put_u32(u32::from(self.hour), 5)?;
        w.put_u32(u32::from(self.minute), 6)?;
        w.put_u32((self.draught * 10.0).round() as u32, 8)?;
        w.put_string(&self.destination, 120)?;
        w.put_flag(self.dte);
        w.put_u32(0, 1)
    }
}

/// Aid-to-navigation report, type 21.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AidToNavigationReport {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub aid_type: NavAid,
    pub name: String,
    pub accuracy: bool,
    pub lon: f64,
    pub lat: f64,
    pub to_bow: u16,
    pub to_stern: u16,
    pub to_port: u8,
    pub to_starboard: u8,
    pub epfd: EpfdType,
    pub second: u8,
    pub off_position: bool,
    pub regional: u8,
    pub raim: bool,
    pub virtual_aid: bool,
    pub assigned: bool,
    /// Continuation of `name` for aids with names over 20 characters.
    pub name_ext: String,
}

impl Default for AidToNavigationReport {
    fn default() -> Self {
        AidToNavigationReport {
            msg_type: 21,
            repeat: 0,
            mmsi: Mmsi::default(),
            aid_type: NavAid::Default,
            name: String::new(),
            accuracy: false,
            lon: 181.0,
            lat: 91.0,
            to_bow: 0,
            to_stern: 0,
            to_port: 0,
            to_starboard: 0,
            epfd: EpfdType::Undefined,
            second: 60,
            off_position: false,
            regional: 0,
            raim: false,
            virtual_aid: false,
            assigned: false,
            name_ext: String::new(),
        }
    }
}

impl AidToNavigationReport {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let d = AidToNavigationReport::default();
        AidToNavigationReport {
            msg_type: 21,
            repeat: rd.u32(2).map_or(d.repeat, |v| v as u8),
            mmsi: rd.u32(30).map_or(d.mmsi, Mmsi::new),
            aid_type: rd.u32(5).map_or(d.aid_type, |v| NavAid::from_raw(v as u8)),
            name: rd.string(120).unwrap_or_else(|| d.name.clone()),
            accuracy: rd.flag().unwrap_or(d.accuracy),
            lon: rd.i32(28).map_or(d.lon, |v| f64::from(v) / 600_000.0),
            lat: rd.i32(27).map_or(d.lat, |v| f64::from(v) / 600_000.0),
            to_bow: rd.u32(9).map_or(d.to_bow, |v| v as u16),
            to_stern: rd.u32(9).map_or(d.to_stern, |v| v as u16),
            to_port: rd.u32(6).map_or(d.to_port, |v| v as u8),
            to_starboard: rd.u32(6).map_or(d.to_starboard, |v| v as u8),
            epfd: rd.u32(4).map_or(d.epfd, |v| EpfdType::from_raw(v as u8)),
            second: rd.u32(6).map_or(d.second, |v| v as u8),
            off_position: rd.flag().unwrap_or(d.off_position),
            regional: rd.u32(8).map_or(d.regional, |v| v as u8),
            raim: rd.flag().unwrap_or(d.raim),
            virtual_aid: rd.flag().unwrap_or(d.virtual_aid),
            assigned: rd.flag().unwrap_or(d.assigned),
            name_ext: {
                rd.skip(1);
                let nbits = rd.remaining().min(88);
                if nbits == 0 {
                    d.name_ext.clone()
                } else {
                    rd.string(nbits).unwrap_or_else(|| d.name_ext.clone())
                }
            },
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(u32::from(self.aid_type.raw()), 5)?;
        w.put_string(&self.name, 120)?;
        w.put_flag(self.accuracy);
        w.put_i32((self.lon * 600_000.0).round() as i32, 28)?;
        w.put_i32((self.lat * 600_000.0).round() as i32, 27)?;
        w.put_u32(u32::from(self.to_bow), 9)?;
        w.put_u32(u32::from(self.to_stern), 9)?;
        w.put_u32(u32::from(self.to_port), 6)?;
        w.put_u32(u32::from(self.to_starboard), 6)?;
        w.put_u32(u32::from(self.epfd.raw()), 4)?;
        w.put_u32(u32::from(self.second), 6)?;
        w.put_flag(self.off_position);
        w.put_u32(u32::from(self.regional), 8)?;
        w.put_flag(self.raim);
        w.put_flag(self.virtual_aid);
        w.put_flag(self.assigned);
        w.put_u32(0, 1)?;
        if !self.name_ext.is_empty() {
            let nbits = (self.name_ext.chars().count() * 6).min(84);
            w.put_string(&self.name_ext, nbits)?;
        }
        Ok(())
    }
}

/// Payload of a type 24 static data report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StaticDataPart {
    A {
        shipname: String,
    },
    B {
        ship_type: u8,
        vendorid: String,
        model: u8,
        serial: u32,
        callsign: String,
        to_bow: u16,
        to_stern: u16,
        to_port: u8,
        to_starboard: u8,
        /// For auxiliary craft (MMSI `98XXXYYYY`) the dimension bits carry
        /// the mothership's MMSI instead.
        mothership_mmsi: Option<Mmsi>,
    },
}

impl Default for StaticDataPart {
    fn default() -> Self {
        StaticDataPart::A {
            shipname: String::new(),
        }
    }
}

/// Static data report, type 24.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticDataReport {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub part: StaticDataPart,
}

impl Default for StaticDataReport {
    fn default() -> Self {
        StaticDataReport {
            msg_type: 24,
            repeat: 0,
            mmsi: Mmsi::default(),
            part: StaticDataPart::default(),
        }
    }
}

impl StaticDataReport {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Result<Self> {
        let repeat = rd.u32(2).unwrap_or(0) as u8;
        let mmsi = rd.u32(30).map_or_else(Mmsi::default, Mmsi::new);
        let part_num = rd.u32(2).unwrap_or(0) as u8;
        let part = match part_num {
            0 => StaticDataPart::A {
                shipname: rd.string(120).unwrap_or_default(),
            },
            1 => {
                let ship_type = rd.u32(8).unwrap_or(0) as u8;
                let vendorid = rd.string(18).unwrap_or_default();
                let model = rd.u32(4).unwrap_or(0) as u8;
                let serial = rd.u32(20).unwrap_or(0);
                let callsign = rd.string(42).unwrap_or_default();
                let (dims, mothership) = if mmsi.is_auxiliary_craft() {
                    ((0, 0, 0, 0), rd.u32(30).map(Mmsi::new))
                } else {
                    (
                        (
                            rd.u32(9).unwrap_or(0) as u16,
                            rd.u32(9).unwrap_or(0) as u16,
                            rd.u32(6).unwrap_or(0) as u8,
                            rd.u32(6).unwrap_or(0) as u8,
                        ),
                        None,
                    )
                };
                StaticDataPart::B {
                    ship_type,
                    vendorid,
                    model,
                    serial,
                    callsign,
                    to_bow: dims.0,
                    to_stern: dims.1,
                    to_port: dims.2,
                    to_starboard: dims.3,
                    mothership_mmsi: mothership,
                }
            }
            other => {
                return Err(Error::InvalidData(format!(
                    "static data report part number {other}"
                )))
            }
        };
        Ok(StaticDataReport {
            msg_type: 24,
            repeat,
            mmsi,
            part,
        })
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        match &self.part {
            StaticDataPart::A { shipname } => {
                w.put_u32(0, 2)?;
                w.put_string(shipname, 120)?;
                w.put_u32(0, 8)
            }
            StaticDataPart::B {
                ship_type,
                vendorid,
                model,
                serial,
                callsign,
                to_bow,
                to_stern,
                to_port,
                to_starboard,
                mothership_mmsi,
            } => {
                w.put_u32(1, 2)?;
                w.put_u32(u32::from(*ship_type), 8)?;
                w.put_string(vendorid, 18)?;
                w.put_u32(u32::from(*model), 4)?;
                w.put_u32(*serial, 20)?;
                w.put_string(callsign, 42)?;
                if let Some(mothership) = mothership_mmsi {
                    w.put_u32(mothership.raw(), 30)?;
                } else {
                    w.put_u32(u32::from(*to_bow), 9)?;
                    w.put_u32(u32::from(*to_stern), 9)?;
                    w.put_u32(u32::from(*to_port), 6)?;
                    w.put_u32(u32::from(*to_starboard), 6)?;
                }
                w.put_u32(0, 6)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Message;
    use crate::sixbit::unarmor;

    #[test]
    fn decode_type_5_two_fragments() {
        let payload = "55O0W7`00001L@gCWGA2uItLth@DqtL5@F22220j1h742t0Ht0000000000000000000000";
        let bits = unarmor(payload.as_bytes(), 2).unwrap();
        let Message::StaticAndVoyageData(m) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected static and voyage data");
        };
        assert_eq!(m.mmsi.to_string(), "368060190");
        assert_eq!(m.callsign, "WDK4954");
        assert_eq!(m.shipname, "P/V_GOLDEN_GATE");
        assert_eq!(m.ship_type, 50);
    }

    #[test]
    fn type_5_round_trips() {
        let original = StaticAndVoyageData {
            mmsi: Mmsi::new(369_190_000),
            imo: 9_267_118,
            callsign: "WDD7294".into(),
            shipname: "MT.MITCHELL".into(),
            ship_type: 99,
            to_bow: 90,
            to_stern: 90,
            to_port: 10,
            to_starboard: 10,
            draught: 6.8,
            destination: "SEATTLE".into(),
            ..StaticAndVoyageData::default()
        };
        let bits = Message::StaticAndVoyageData(original.clone()).to_bits().unwrap();
        assert_eq!(bits.bit_len(), 424);
        let Message::StaticAndVoyageData(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected static and voyage data");
        };
        assert_eq!(back, original);
    }

    #[test]
    fn type_24_part_a_round_trips() {
        let original = StaticDataReport {
            mmsi: Mmsi::new(367_468_490),
            part: StaticDataPart::A {
                shipname: "WILDFLOWER".into(),
            },
            ..StaticDataReport::default()
        };
        let bits = Message::StaticDataReport(original.clone()).to_bits().unwrap();
        assert_eq!(bits.bit_len(), 168);
        let Message::StaticDataReport(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected static data report");
        };
        assert_eq!(back, original);
    }

    #[test]
    fn type_24_part_b_round_trips() {
        let original = StaticDataReport {
            mmsi: Mmsi::new(367_468_490),
            part: StaticDataPart::B {
                ship_type: 36,
                vendorid: "SRT".into(),
                model: 5,
                serial: 123_456,
                callsign: "WDF5902".into(),
                to_bow: 6,
                to_stern: 2,
                to_port: 2,
                to_starboard: 1,
                mothership_mmsi: None,
            },
            ..StaticDataReport::default()
        };
        let bits = Message::StaticDataReport(original.clone()).to_bits().unwrap();
        let Message::StaticDataReport(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected static data report");
        };
        assert_eq!(back, original);
    }

    #[test]
    fn type_24_auxiliary_craft_carries_mothership() {
        let original = StaticDataReport {
            mmsi: Mmsi::new(982_470_210),
            part: StaticDataPart::B {
                ship_type: 0,
                vendorid: String::new(),
                model: 0,
                serial: 0,
                callsign: String::new(),
                to_bow: 0,
                to_stern: 0,
                to_port: 0,
                to_starboard: 0,
                mothership_mmsi: Some(Mmsi::new(211_207_380)),
            },
            ..StaticDataReport::default()
        };
        let bits = Message::StaticDataReport(original.clone()).to_bits().unwrap();
        let Message::StaticDataReport(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected static data report");
        };
        assert_eq!(back, original);
    }

    #[test]
    fn type_21_round_trips_with_name_extension() {
        let original = AidToNavigationReport {
            mmsi: Mmsi::new(993_672_072),
            aid_type: NavAid::SpecialMark,
            name: "PRIVATE AID WHITE BU".into(),
            name_ext: "OY".into(),
            lon: -71.334_617,
            lat: 41.487_9,
            accuracy: true,
            virtual_aid: false,
            ..AidToNavigationReport::default()
        };
        let bits = Message::AidToNavigationReport(original.clone()).to_bits().unwrap();
        let Message::AidToNavigationReport(back) = Message::decode_bits(&bits).unwrap() else {
            panic!("expected aid to navigation report");
        };
        assert_eq!(back.name, original.name);
        assert_eq!(back.name_ext, original.name_ext);
        assert!((back.lon - original.lon).abs() < 1e-6);
        assert_eq!(back.aid_type, original.aid_type);
    }
}
