//! Position reports: types 1/2/3, 4/11, 9, 18, 19, and 27.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sixbit::{BitReader, BitWriter};

use super::comm_state::CommunicationState;
use super::enums::{EpfdType, ManeuverIndicator, NavigationStatus};
use super::Mmsi;

/// Decode a raw rate-of-turn value to degrees per minute.
///
/// The wire value is `4.733 * sqrt(rot)` with the sign carried separately;
/// -128 means not available and ±127 flag turning faster than 5°/30s.
#[must_use]
pub fn turn_from_raw(raw: i8) -> Option<f64> {
    if raw == -128 {
        return None;
    }
    let mag = (f64::from(raw.unsigned_abs()) / 4.733).powi(2);
    Some(if raw < 0 { -mag } else { mag })
}

/// Inverse of [turn_from_raw] over the shared subdomain.
#[must_use]
pub fn turn_to_raw(turn: Option<f64>) -> i8 {
    let Some(turn) = turn else {
        return -128;
    };
    let raw = (4.733 * turn.abs().sqrt()).round().min(127.0);
    if turn < 0.0 {
        -(raw as i8)
    } else {
        raw as i8
    }
}

/// Class A position report, types 1 (SOTDMA), 2 (SOTDMA assigned), and
/// 3 (ITDMA).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionReport {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub status: NavigationStatus,
    /// Rate of turn in degrees per minute, `None` when not available.
    pub turn: Option<f64>,
    /// Speed over ground in knots, 0.1 kn resolution.
    pub speed: f64,
    pub accuracy: bool,
    /// Longitude in degrees east; 181.0 when not available.
    pub lon: f64,
    /// Latitude in degrees north; 91.0 when not available.
    pub lat: f64,
    /// Course over ground in degrees; 360.0 when not available.
    pub course: f64,
    /// True heading in degrees; 511 when not available.
    pub heading: u16,
    /// UTC second of the position fix; 60 when not available.
    pub second: u8,
    pub maneuver: ManeuverIndicator,
    pub raim: bool,
    pub radio: u32,
}

impl Default for PositionReport {
    fn default() -> Self {
        PositionReport {
            msg_type: 1,
            repeat: 0,
            mmsi: Mmsi::default(),
            status: NavigationStatus::Undefined,
            turn: None,
            speed: 0.0,
            accuracy: false,
            lon: 181.0,
            lat: 91.0,
            course: 360.0,
            heading: 511,
            second: 60,
            maneuver: ManeuverIndicator::NotAvailable,
            raim: false,
            radio: 0,
        }
    }
}

impl PositionReport {
    pub(crate) fn decode(rd: &mut BitReader<'_>, msg_type: u8) -> Self {
        let d = PositionReport::default();
        PositionReport {
            msg_type,
            repeat: rd.u32(2).map_or(d.repeat, |v| v as u8),
            mmsi: rd.u32(30).map_or(d.mmsi, Mmsi::new),
            status: rd
                .u32(4)
                .map_or(d.status, |v| NavigationStatus::from_raw(v as u8)),
            turn: rd.i32(8).map_or(d.turn, |v| turn_from_raw(v as i8)),
            speed: rd.u32(10).map_or(d.speed, |v| f64::from(v) / 10.0),
            accuracy: rd.flag().unwrap_or(d.accuracy),
            lon: rd.i32(28).map_or(d.lon, |v| f64::from(v) / 600_000.0),
            lat: rd.i32(27).map_or(d.lat, |v| f64::from(v) / 600_000.0),
            course: rd.u32(12).map_or(d.course, |v| f64::from(v) / 10.0),
            heading: rd.u32(9).map_or(d.heading, |v| v as u16),
            second: rd.u32(6).map_or(d.second, |v| v as u8),
            maneuver: rd
                .u32(2)
                .map_or(d.maneuver, |v| ManeuverIndicator::from_raw(v as u8)),
            raim: {
                rd.skip(3);
                rd.flag().unwrap_or(d.raim)
            },
            radio: rd.u32(19).unwrap_or(d.radio),
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(u32::from(self.status.raw()), 4)?;
        w.put_i32(i32::from(turn_to_raw(self.turn)), 8)?;
        w.put_u32((self.speed * 10.0).round() as u32, 10)?;
        w.put_flag(self.accuracy);
        w.put_i32((self.lon * 600_000.0).round() as i32, 28)?;
        w.put_i32((self.lat * 600_000.0).round() as i32, 27)?;
        w.put_u32((self.course * 10.0).round() as u32, 12)?;
        w.put_u32(u32::from(self.heading), 9)?;
        w.put_u32(u32::from(self.second), 6)?;
        w.put_u32(u32::from(self.maneuver.raw()), 2)?;
        w.put_u32(0, 3)?;
        w.put_flag(self.raim);
        w.put_u32(self.radio, 19)
    }

    /// Slot-allocation state from the radio word: SOTDMA for types 1 and 2,
    /// ITDMA for type 3.
    #[must_use]
    pub fn communication_state(&self) -> CommunicationState {
        if self.msg_type == 3 {
            CommunicationState::itdma(self.radio)
        } else {
            CommunicationState::sotdma(self.radio)
        }
    }
}

/// Base station report (type 4) and UTC/date response (type 11).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseStationReport {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    /// UTC year 1..=9999; 0 when not available.
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// UTC hour; 24 when not available.
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub accuracy: bool,
    pub lon: f64,
    pub lat: f64,
    pub epfd: EpfdType,
    pub raim: bool,
    pub radio: u32,
}

impl Default for BaseStationReport {
    fn default() -> Self {
        BaseStationReport {
            msg_type: 4,
            repeat: 0,
            mmsi: Mmsi::default(),
            year: 0,
            month: 0,
            day: 0,
            hour: 24,
            minute: 60,
            second: 60,
            accuracy: false,
            lon: 181.0,
            lat: 91.0,
            epfd: EpfdType::Undefined,
            raim: false,
            radio: 0,
        }
    }
}

impl BaseStationReport {
    pub(crate) fn decode(rd: &mut BitReader<'_>, msg_type: u8) -> Self {
        let d = BaseStationReport::default();
        BaseStationReport {
            msg_type,
            repeat: rd.u32(2).map_or(d.repeat, |v| v as u8),
            mmsi: rd.u32(30).map_or(d.mmsi, Mmsi::new),
            year: rd.u32(14).map_or(d.year, |v| v as u16),
            month: rd.u32(4).map_or(d.month, |v| v as u8),
            day: rd.u32(5).map_or(d.day, |v| v as u8),
            hour: rd.u32(5).map_or(d.hour, |v| v as u8),
            minute: rd.u32(6).map_or(d.minute, |v| v as u8),
            second: rd.u32(6).map_or(d.second, |v| v as u8),
            accuracy: rd.flag().unwrap_or(d.accuracy),
            lon: rd.i32(28).map_or(d.lon, |v| f64::from(v) / 600_000.0),
            lat: rd.i32(27).map_or(d.lat, |v| f64::from(v) / 600_000.0),
            epfd: rd.u32(4).map_or(d.epfd, |v| EpfdType::from_raw(v as u8)),
            raim: {
                rd.skip(10);
                rd.flag().unwrap_or(d.raim)
            },
            radio: rd.u32(19).unwrap_or(d.radio),
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(u32::from(self.year), 14)?;
        w.put_u32(u32::from(self.month), 4)?;
        w.put_u32(u32::from(self.day), 5)?;
        w.put_u32(u32::from(self.hour), 5)?;
        w.put_u32(u32::from(self.minute), 6)?;
        w.put_u32(u32::from(self.second), 6)?;
        w.put_flag(self.accuracy);
        w.put_i32((self.lon * 600_000.0).round() as i32, 28)?;
        w.put_i32((self.lat * 600_000.0).round() as i32, 27)?;
        w.put_u32(u32::from(self.epfd.raw()), 4)?;
        w.put_u32(0, 10)?;
        w.put_flag(self.raim);
        w.put_u32(self.radio, 19)
    }

    /// Base stations always use SOTDMA.
    #[must_use]
    pub fn communication_state(&self) -> CommunicationState {
        CommunicationState::sotdma(self.radio)
    }
}

/// Standard SAR aircraft position report, type 9.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SarAircraftPositionReport {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    /// Altitude in meters; 4095 when not available.
    pub alt: u16,
    /// Speed over ground in knots; 1023 when not available.
    pub speed: u16,
    pub accuracy: bool,
    pub lon: f64,
    pub lat: f64,
    pub course: f64,
    pub second: u8,
    pub regional: u8,
    pub dte: bool,
    pub assigned: bool,
    pub raim: bool,
    pub radio: u32,
}

impl Default for SarAircraftPositionReport {
    fn default() -> Self {
        SarAircraftPositionReport {
            msg_type: 9,
            repeat: 0,
            mmsi: Mmsi::default(),
            alt: 4095,
            speed: 1023,
            accuracy: false,
            lon: 181.0,
            lat: 91.0,
            course: 360.0,
            second: 60,
            regional: 0,
            dte: true,
            assigned: false,
            raim: false,
            radio: 0,
        }
    }
}

impl SarAircraftPositionReport {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let d = SarAircraftPositionReport::default();
        SarAircraftPositionReport {
            msg_type: 9,
            repeat: rd.u32(2).map_or(d.repeat, |v| v as u8),
            mmsi: rd.u32(30).map_or(d.mmsi, Mmsi::new),
            alt: rd.u32(12).map_or(d.alt, |v| v as u16),
            speed: rd.u32(10).map_or(d.speed, |v| v as u16),
            accuracy: rd.flag().unwrap_or(d.accuracy),
            lon: rd.i32(28).map_or(d.lon, |v| f64::from(v) / 600_000.0),
            lat: rd.i32(27).map_or(d.lat, |v| f64::from(v) / 600_000.0),
            course: rd.u32(12).map_or(d.course, |v| f64::from(v) / 10.0),
            second: rd.u32(6).map_or(d.second, |v| v as u8),
            regional: rd.u32(8).map_or(d.regional, |v| v as u8),
            dte: rd.flag().unwrap_or(d.dte),
            assigned: {
                rd.skip(3);
                rd.flag().unwrap_or(d.assigned)
            },
            raim: rd.flag().unwrap_or(d.raim),
            radio: rd.u32(20).unwrap_or(d.radio),
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(u32::from(self.alt), 12)?;
        w.put_u32(u32::from(self.speed), 10)?;
        w.put_flag(self.accuracy);
        w.put_i32((self.lon * 600_000.0).round() as i32, 28)?;
        w.put_i32((self.lat * 600_000.0).round() as i32, 27)?;
        w.put_u32((self.course * 10.0).round() as u32, 12)?;
        w.put_u32(u32::from(self.second), 6)?;
        w.put_u32(u32::from(self.regional), 8)?;
        w.put_flag(self.dte);
        w.put_u32(0, 3)?;
        w.put_flag(self.assigned);
        w.put_flag(self.raim);
        w.put_u32(self.radio, 20)
    }

    /// The leading bit of the 20-bit radio word selects SOTDMA or ITDMA.
    #[must_use]
    pub fn communication_state(&self) -> CommunicationState {
        CommunicationState::selected(self.radio)
    }
}

/// Standard class B equipment position report, type 18.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardClassBReport {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub reserved: u8,
    pub speed: f64,
    pub accuracy: bool,
    pub lon: f64,
    pub lat: f64,
    pub course: f64,
    pub heading: u16,
    pub second: u8,
    pub regional: u8,
    /// Carrier-sense unit, as opposed to SOTDMA.
    pub cs: bool,
    pub display: bool,
    pub dsc: bool,
    pub band: bool,
    pub msg22: bool,
    pub assigned: bool,
    pub raim: bool,
    pub radio: u32,
}

impl Default for StandardClassBReport {
    fn default() -> Self {
        StandardClassBReport {
            msg_type: 18,
            repeat: 0,
            mmsi: Mmsi::default(),
            reserved: 0,
            speed: 0.0,
            accuracy: false,
            lon: 181.0,
            lat: 91.0,
            course: 360.0,
            heading: 511,
            second: 60,
            regional: 0,
            cs: false,
            display: false,
            dsc: false,
            band: false,
            msg22: false,
            assigned: false,
            raim: false,
            radio: 0,
        }
    }
}

impl StandardClassBReport {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let d = StandardClassBReport::default();
        StandardClassBReport {
            msg_type: 18,
            repeat: rd.u32(2).map_or(d.repeat, |v| v as u8),
            mmsi: rd.u32(30).map_or(d.mmsi, Mmsi::new),
            reserved: rd.u32(8).map_or(d.reserved, |v| v as u8),
            speed: rd.u32(10).map_or(d.speed, |v| f64::from(v) / 10.0),
            accuracy: rd.flag().unwrap_or(d.accuracy),
            lon: rd.i32(28).map_or(d.lon, |v| f64::from(v) / 600_000.0),
            lat: rd.i32(27).map_or(d.lat, |v| f64::from(v) / 600_000.0),
            course: rd.u32(12).map_or(d.course, |v| f64::from(v) / 10.0),
            heading: rd.u32(9).map_or(d.heading, |v| v as u16),
            second: rd.u32(6).map_or(d.second, |v| v as u8),
            regional: rd.u32(2).map_or(d.regional, |v| v as u8),
            cs: rd.flag().unwrap_or(d.cs),
            display: rd.flag().unwrap_or(d.display),
            dsc: rd.flag().unwrap_or(d.dsc),
            band: rd.flag().unwrap_or(d.band),
            msg22: rd.flag().unwrap_or(d.msg22),
            assigned: rd.flag().unwrap_or(d.assigned),
            raim: rd.flag().unwrap_or(d.raim),
            radio: rd.u32(20).unwrap_or(d.radio),
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(u32::from(self.reserved), 8)?;
        w.put_u32((self.speed * 10.0).round() as u32, 10)?;
        w.put_flag(self.accuracy);
        w.put_i32((self.lon * 600_000.0).round() as i32, 28)?;
        w.put_i32((self.lat * 600_000.0).round() as i32, 27)?;
        w.put_u32((self.course * 10.0).round() as u32, 12)?;
        w.put_u32(u32::from(self.heading), 9)?;
        w.put_u32(u32::from(self.second), 6)?;
        w.put_u32(u32::from(self.regional), 2)?;
        w.put_flag(self.cs);
        w.put_flag(self.display);
        w.put_flag(self.dsc);
        w.put_flag(self.band);
        w.put_flag(self.msg22);
        w.put_flag(self.assigned);
        w.put_flag(self.raim);
        w.put_u32(self.radio, 20)
    }

    /// The leading bit of the 20-bit radio word selects SOTDMA or ITDMA.
    #[must_use]
    pub fn communication_state(&self) -> CommunicationState {
        CommunicationState::selected(self.radio)
    }
}

/// Extended class B equipment position report, type 19.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedClassBReport {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub reserved: u8,
    pub speed: f64,
    pub accuracy: bool,
    pub lon: f64,
    pub lat: f64,
    pub course: f64,
    pub heading: u16,
    pub second: u8,
    pub regional: u8,
    pub shipname: String,
    pub ship_type: u8,
    pub to_bow: u16,
    pub to_stern: u16,
    pub to_port: u8,
    pub to_starboard: u8,
    pub epfd: EpfdType,
    pub raim: bool,
    pub dte: bool,
    pub assigned: bool,
}

impl Default for ExtendedClassBReport {
    fn default() -> Self {
        ExtendedClassBReport {
            msg_type: 19,
            repeat: 0,
            mmsi: Mmsi::default(),
            reserved: 0,
            speed: 0.0,
            accuracy: false,
            lon: 181.0,
            lat: 91.0,
            course: 360.0,
            heading: 511,
            second: 60,
            regional: 0,
            shipname: String::new(),
            ship_type: 0,
            to_bow: 0,
            to_stern: 0,
            to_port: 0,
            to_starboard: 0,
            epfd: EpfdType::Undefined,
            raim: false,
            dte: true,
            assigned: false,
        }
    }
}

impl ExtendedClassBReport {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let d = ExtendedClassBReport::default();
        ExtendedClassBReport {
            msg_type: 19,
            repeat: rd.u32(2).map_or(d.repeat, |v| v as u8),
            mmsi: rd.u32(30).map_or(d.mmsi, Mmsi::new),
            reserved: rd.u32(8).map_or(d.reserved, |v| v as u8),
            speed: rd.u32(10).map_or(d.speed, |v| f64::from(v) / 10.0),
            accuracy: rd.flag().unwrap_or(d.accuracy),
            lon: rd.i32(28).map_or(d.lon, |v| f64::from(v) / 600_000.0),
            lat: rd.i32(27).map_or(d.lat, |v| f64::from(v) / 600_000.0),
            course: rd.u32(12).map_or(d.course, |v| f64::from(v) / 10.0),
            heading: rd.u32(9).map_or(d.heading, |v| v as u16),
            second: rd.u32(6).map_or(d.second, |v| v as u8),
            regional: rd.u32(4).map_or(d.regional, |v| v as u8),
            shipname: rd.string(120).unwrap_or_else(|| d.shipname.clone()),
            ship_type: rd.u32(8).map_or(d.ship_type, |v| v as u8),
            to_bow: rd.u32(9).map_or(d.to_bow, |v| v as u16),
            to_stern: rd.u32(9).map_or(d.to_stern, |v| v as u16),
            to_port: rd.u32(6).map_or(d.to_port, |v| v as u8),
            to_starboard: rd.u32(6).map_or(d.to_starboard, |v| v as u8),
            epfd: rd.u32(4).map_or(d.epfd, |v| EpfdType::from_raw(v as u8)),
            raim: rd.flag().unwrap_or(d.raim),
            dte: rd.flag().unwrap_or(d.dte),
            assigned: rd.flag().unwrap_or(d.assigned),
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_u32(u32::from(self.reserved), 8)?;
        w.put_u32((self.speed * 10.0).round() as u32, 10)?;
        w.put_flag(self.accuracy);
        w.put_i32((self.lon * 600_000.0).round() as i32, 28)?;
        w.put_i32((self.lat * 600_000.0).round() as i32, 27)?;
        w.put_u32((self.course * 10.0).round() as u32, 12)?;
        w.put_u32(u32::from(self.heading), 9)?;
        w.put_u32(u32::from(self.second), 6)?;
        w.put_u32(u32::from(self.regional), 4)?;
        w.put_string(&self.shipname, 120)?;
        w.put_u32(u32::from(self.ship_type), 8)?;
        w.put_u32(u32::from(self.to_bow), 9)?;
        w.put_u32(u32::from(self.to_stern), 9)?;
        w.put_u32(u32::from(self.to_port), 6)?;
        w.put_u32(u32::from(self.to_starboard), 6)?;
        w.put_u32(u32::from(self.epfd.raw()), 4)?;
        w.put_flag(self.raim);
        w.put_flag(self.dte);
        w.put_flag(self.assigned);
        w.put_u32(0, 4)
    }
}

/// Long-range AIS broadcast, type 27.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongRangeBroadcast {
    pub msg_type: u8,
    pub repeat: u8,
    pub mmsi: Mmsi,
    pub accuracy: bool,
    pub raim: bool,
    pub status: NavigationStatus,
    /// Longitude at 0.1-minute resolution.
    pub lon: f64,
    /// Latitude at 0.1-minute resolution.
    pub lat: f64,
    /// Speed over ground in knots; 63 when not available.
    pub speed: u8,
    /// Course over ground in degrees; 511 when not available.
    pub course: u16,
    /// Whether the position is not a current GNSS fix.
    pub gnss: bool,
}

impl Default for LongRangeBroadcast {
    fn default() -> Self {
        LongRangeBroadcast {
            msg_type: 27,
            repeat: 0,
            mmsi: Mmsi::default(),
            accuracy: false,
            raim: false,
            status: NavigationStatus::Undefined,
            lon: 181.0,
            lat: 91.0,
            speed: 63,
            course: 511,
            gnss: false,
        }
    }
}

impl LongRangeBroadcast {
    pub(crate) fn decode(rd: &mut BitReader<'_>) -> Self {
        let d = LongRangeBroadcast::default();
        LongRangeBroadcast {
            msg_type: 27,
            repeat: rd.u32(2).map_or(d.repeat, |v| v as u8),
            mmsi: rd.u32(30).map_or(d.mmsi, Mmsi::new),
            accuracy: rd.flag().unwrap_or(d.accuracy),
            raim: rd.flag().unwrap_or(d.raim),
            status: rd
                .u32(4)
                .map_or(d.status, |v| NavigationStatus::from_raw(v as u8)),
            lon: rd.i32(18).map_or(d.lon, |v| f64::from(v) / 600.0),
            lat: rd.i32(17).map_or(d.lat, |v| f64::from(v) / 600.0),
            speed: rd.u32(6).map_or(d.speed, |v| v as u8),
            course: rd.u32(9).map_or(d.course, |v| v as u16),
            gnss: rd.flag().unwrap_or(d.gnss),
        }
    }

    pub(crate) fn encode(&self, w: &mut BitWriter) -> Result<()> {
        w.put_u32(u32::from(self.msg_type), 6)?;
        w.put_u32(u32::from(self.repeat), 2)?;
        w.put_u32(self.mmsi.raw(), 30)?;
        w.put_flag(self.accuracy);
        w.put_flag(self.raim);
        w.put_u32(u32::from(self.status.raw()), 4)?;
        w.put_i32((self.lon * 600.0).round() as i32, 18)?;
        w.put_i32((self.lat * 600.0).round() as i32, 17)?;
        w.put_u32(u32::from(self.speed), 6)?;
        w.put_u32(u32::from(self.course), 9)?;
        w.put_flag(self.gnss);
        w.put_u32(0, 1)
    }
}
