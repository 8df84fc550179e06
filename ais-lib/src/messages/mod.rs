//! Typed AIS messages.
//!
//! [Message] is a tagged variant over the 27 wire types. Types that share a
//! payload layout share a struct and keep their original `msg_type` value so
//! re-encoding reproduces the wire form: 1/2/3 decode to [PositionReport],
//! 4/11 to [BaseStationReport], and 7/13 to [BinaryAcknowledge].
//!
//! Decoding is best-effort: once a payload runs out of bits, the remaining
//! fields of the type's table take their documented "not available"
//! defaults. Unknown leading type values are an error.

mod binary;
mod comm_state;
mod enums;
mod link;
mod position;
mod static_data;

pub use binary::{
    AddressedBinaryMessage, BinaryBroadcastMessage, DgnssBroadcast, MultiSlotBinaryMessage,
    SingleSlotBinaryMessage,
};
pub use comm_state::{CommunicationState, SotdmaMessage};
pub use enums::{
    EpfdType, ManeuverIndicator, NavAid, NavigationStatus, ShipType, StationInterval, StationType,
    SyncState, TransmitMode,
};
pub use link::{
    Acknowledgement, AddressedSafetyMessage, Assignment, AssignmentModeCommand, BinaryAcknowledge,
    ChannelArea, ChannelManagement, ChannelTarget, DataLinkManagement, GroupAssignmentCommand,
    Interrogation, ReservedSlots, SafetyBroadcastMessage, UtcDateInquiry,
};
pub use position::{
    turn_from_raw, turn_to_raw, BaseStationReport, ExtendedClassBReport, LongRangeBroadcast,
    PositionReport, SarAircraftPositionReport, StandardClassBReport,
};
pub use static_data::{
    AidToNavigationReport, StaticAndVoyageData, StaticDataPart, StaticDataReport,
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sixbit::{BitBuf, BitReader, BitWriter};

/// Maritime Mobile Service Identity.
///
/// Stored as the 30-bit wire value; displayed and serialized as the
/// canonical zero-padded 9-digit decimal string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mmsi(u32);

impl Mmsi {
    #[must_use]
    pub fn new(raw: u32) -> Self {
        Mmsi(raw)
    }

    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Auxiliary craft associated with a parent ship carry MMSIs of the
    /// form `98XXXYYYY`; type 24 part B swaps dimensions for a mothership
    /// reference for them.
    #[must_use]
    pub fn is_auxiliary_craft(self) -> bool {
        (980_000_000..=989_999_999).contains(&self.0)
    }
}

impl From<u32> for Mmsi {
    fn from(raw: u32) -> Self {
        Mmsi(raw)
    }
}

impl std::fmt::Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:09}", self.0)
    }
}

impl std::str::FromStr for Mmsi {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<u32>().map(Mmsi)
    }
}

impl Serialize for Mmsi {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Mmsi {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = Mmsi;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an MMSI as a decimal string or integer")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<Mmsi, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> std::result::Result<Mmsi, E> {
                u32::try_from(v).map(Mmsi).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

/// A decoded AIS message.
///
/// Every payload struct carries its wire `msg_type`, so the JSON form of a
/// message is a flat object tagged by that field. Deserialization
/// dispatches on `msg_type` (or its `type` alias) and fails without one,
/// never guessing a variant from whichever fields happen to be present.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    PositionReport(PositionReport),
    BaseStationReport(BaseStationReport),
    StaticAndVoyageData(StaticAndVoyageData),
    AddressedBinary(AddressedBinaryMessage),
    BinaryAcknowledge(BinaryAcknowledge),
    BinaryBroadcast(BinaryBroadcastMessage),
    SarAircraftPosition(SarAircraftPositionReport),
    UtcDateInquiry(UtcDateInquiry),
    AddressedSafety(AddressedSafetyMessage),
    SafetyBroadcast(SafetyBroadcastMessage),
    Interrogation(Interrogation),
    AssignmentModeCommand(AssignmentModeCommand),
    DgnssBroadcast(DgnssBroadcast),
    StandardClassBReport(StandardClassBReport),
    ExtendedClassBReport(ExtendedClassBReport),
    DataLinkManagement(DataLinkManagement),
    AidToNavigationReport(AidToNavigationReport),
    ChannelManagement(ChannelManagement),
    GroupAssignmentCommand(GroupAssignmentCommand),
    StaticDataReport(StaticDataReport),
    SingleSlotBinary(SingleSlotBinaryMessage),
    MultiSlotBinary(MultiSlotBinaryMessage),
    LongRangeBroadcast(LongRangeBroadcast),
}

impl Serialize for Message {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Message::PositionReport(m) => m.serialize(serializer),
            Message::BaseStationReport(m) => m.serialize(serializer),
            Message::StaticAndVoyageData(m) => m.serialize(serializer),
            Message::AddressedBinary(m) => m.serialize(serializer),
            Message::BinaryAcknowledge(m) => m.serialize(serializer),
            Message::BinaryBroadcast(m) => m.serialize(serializer),
            Message::SarAircraftPosition(m) => m.serialize(serializer),
            Message::UtcDateInquiry(m) => m.serialize(serializer),
            Message::AddressedSafety(m) => m.serialize(serializer),
            Message::SafetyBroadcast(m) => m.serialize(serializer),
            Message::Interrogation(m) => m.serialize(serializer),
            Message::AssignmentModeCommand(m) => m.serialize(serializer),
            Message::DgnssBroadcast(m) => m.serialize(serializer),
            Message::StandardClassBReport(m) => m.serialize(serializer),
            Message::ExtendedClassBReport(m) => m.serialize(serializer),
            Message::DataLinkManagement(m) => m.serialize(serializer),
            Message::AidToNavigationReport(m) => m.serialize(serializer),
            Message::ChannelManagement(m) => m.serialize(serializer),
            Message::GroupAssignmentCommand(m) => m.serialize(serializer),
            Message::StaticDataReport(m) => m.serialize(serializer),
            Message::SingleSlotBinary(m) => m.serialize(serializer),
            Message::MultiSlotBinary(m) => m.serialize(serializer),
            Message::LongRangeBroadcast(m) => m.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        use serde::de::Error;
        use serde_json::{from_value, Value};

        let mut value = Value::deserialize(deserializer)?;
        let Some(record) = value.as_object_mut() else {
            return Err(D::Error::custom("expected a JSON object"));
        };
        let msg_type = record
            .get("msg_type")
            .or_else(|| record.get("type"))
            .and_then(Value::as_u64)
            .ok_or_else(|| D::Error::missing_field("msg_type"))?;
        // Normalize the `type` alias onto the struct field name.
        record.remove("type");
        record.insert("msg_type".to_string(), Value::from(msg_type));

        let msg = match msg_type {
            1..=3 => Message::PositionReport(from_value(value).map_err(D::Error::custom)?),
            4 | 11 => Message::BaseStationReport(from_value(value).map_err(D::Error::custom)?),
            5 => Message::StaticAndVoyageData(from_value(value).map_err(D::Error::custom)?),
            6 => Message::AddressedBinary(from_value(value).map_err(D::Error::custom)?),
            7 | 13 => Message::BinaryAcknowledge(from_value(value).map_err(D::Error::custom)?),
            8 => Message::BinaryBroadcast(from_value(value).map_err(D::Error::custom)?),
            9 => Message::SarAircraftPosition(from_value(value).map_err(D::Error::custom)?),
            10 => Message::UtcDateInquiry(from_value(value).map_err(D::Error::custom)?),
            12 => Message::AddressedSafety(from_value(value).map_err(D::Error::custom)?),
            14 => Message::SafetyBroadcast(from_value(value).map_err(D::Error::custom)?),
            15 => Message::Interrogation(from_value(value).map_err(D::Error::custom)?),
            16 => Message::AssignmentModeCommand(from_value(value).map_err(D::Error::custom)?),
            17 => Message::DgnssBroadcast(from_value(value).map_err(D::Error::custom)?),
            18 => Message::StandardClassBReport(from_value(value).map_err(D::Error::custom)?),
            19 => Message::ExtendedClassBReport(from_value(value).map_err(D::Error::custom)?),
            20 => Message::DataLinkManagement(from_value(value).map_err(D::Error::custom)?),
            21 => Message::AidToNavigationReport(from_value(value).map_err(D::Error::custom)?),
            22 => Message::ChannelManagement(from_value(value).map_err(D::Error::custom)?),
            23 => Message::GroupAssignmentCommand(from_value(value).map_err(D::Error::custom)?),
            24 => Message::StaticDataReport(from_value(value).map_err(D::Error::custom)?),
            25 => Message::SingleSlotBinary(from_value(value).map_err(D::Error::custom)?),
            26 => Message::MultiSlotBinary(from_value(value).map_err(D::Error::custom)?),
            27 => Message::LongRangeBroadcast(from_value(value).map_err(D::Error::custom)?),
            other => {
                return Err(D::Error::custom(format!("unsupported message type {other}")))
            }
        };
        Ok(msg)
    }
}

impl Message {
    /// Decode a message from unpacked payload bits.
    ///
    /// # Errors
    /// [Error::UnknownMessageType] for a leading type value outside 1..=27
    /// or a payload too short to carry one.
    pub fn decode_bits(bits: &BitBuf) -> Result<Message> {
        let mut rd = BitReader::new(bits);
        let msg_type = rd.u32(6).ok_or(Error::UnknownMessageType(0))? as u8;
        let msg = match msg_type {
            1..=3 => Message::PositionReport(PositionReport::decode(&mut rd, msg_type)),
            4 | 11 => Message::BaseStationReport(BaseStationReport::decode(&mut rd, msg_type)),
            5 => Message::StaticAndVoyageData(StaticAndVoyageData::decode(&mut rd)),
            6 => Message::AddressedBinary(AddressedBinaryMessage::decode(&mut rd)),
            7 | 13 => Message::BinaryAcknowledge(BinaryAcknowledge::decode(&mut rd, msg_type)),
            8 => Message::BinaryBroadcast(BinaryBroadcastMessage::decode(&mut rd)),
            9 => Message::SarAircraftPosition(SarAircraftPositionReport::decode(&mut rd)),
            10 => Message::UtcDateInquiry(UtcDateInquiry::decode(&mut rd)),
            12 => Message::AddressedSafety(AddressedSafetyMessage::decode(&mut rd)),
            14 => Message::SafetyBroadcast(SafetyBroadcastMessage::decode(&mut rd)),
            15 => Message::Interrogation(Interrogation::decode(&mut rd)),
            16 => Message::AssignmentModeCommand(AssignmentModeCommand::decode(&mut rd)),
            17 => Message::DgnssBroadcast(DgnssBroadcast::decode(&mut rd)),
            18 => Message::StandardClassBReport(StandardClassBReport::decode(&mut rd)),
            19 => Message::ExtendedClassBReport(ExtendedClassBReport::decode(&mut rd)),
            20 => Message::DataLinkManagement(DataLinkManagement::decode(&mut rd)),
            21 => Message::AidToNavigationReport(AidToNavigationReport::decode(&mut rd)),
            22 => Message::ChannelManagement(ChannelManagement::decode(&mut rd)),
            23 => Message::GroupAssignmentCommand(GroupAssignmentCommand::decode(&mut rd)),
            24 => Message::StaticDataReport(StaticDataReport::decode(&mut rd)?),
            25 => Message::SingleSlotBinary(SingleSlotBinaryMessage::decode(&mut rd)),
            26 => Message::MultiSlotBinary(MultiSlotBinaryMessage::decode(&mut rd)),
            27 => Message::LongRangeBroadcast(LongRangeBroadcast::decode(&mut rd)),
            other => return Err(Error::UnknownMessageType(other)),
        };
        Ok(msg)
    }

    /// Pack this message back into payload bits.
    ///
    /// # Errors
    /// [Error::InvalidData] if a field value does not fit its width.
    pub fn to_bits(&self) -> Result<BitBuf> {
        let mut w = BitWriter::new();
        match self {
            Message::PositionReport(m) => m.encode(&mut w)?,
            Message::BaseStationReport(m) => m.encode(&mut w)?,
            Message::StaticAndVoyageData(m) => m.encode(&mut w)?,
            Message::AddressedBinary(m) => m.encode(&mut w)?,
            Message::BinaryAcknowledge(m) => m.encode(&mut w)?,
            Message::BinaryBroadcast(m) => m.encode(&mut w)?,
            Message::SarAircraftPosition(m) => m.encode(&mut w)?,
            Message::UtcDateInquiry(m) => m.encode(&mut w)?,
            Message::AddressedSafety(m) => m.encode(&mut w)?,
            Message::SafetyBroadcast(m) => m.encode(&mut w)?,
            Message::Interrogation(m) => m.encode(&mut w)?,
            Message::AssignmentModeCommand(m) => m.encode(&mut w)?,
            Message::DgnssBroadcast(m) => m.encode(&mut w)?,
            Message::StandardClassBReport(m) => m.encode(&mut w)?,
            Message::ExtendedClassBReport(m) => m.encode(&mut w)?,
            Message::DataLinkManagement(m) => m.encode(&mut w)?,
            Message::AidToNavigationReport(m) => m.encode(&mut w)?,
            Message::ChannelManagement(m) => m.encode(&mut w)?,
            Message::GroupAssignmentCommand(m) => m.encode(&mut w)?,
            Message::StaticDataReport(m) => m.encode(&mut w)?,
            Message::SingleSlotBinary(m) => m.encode(&mut w)?,
            Message::MultiSlotBinary(m) => m.encode(&mut w)?,
            Message::LongRangeBroadcast(m) => m.encode(&mut w)?,
        }
        Ok(w.into_buf())
    }

    /// The wire type value, 1..=27.
    #[must_use]
    pub fn msg_type(&self) -> u8 {
        match self {
            Message::PositionReport(m) => m.msg_type,
            Message::BaseStationReport(m) => m.msg_type,
            Message::StaticAndVoyageData(m) => m.msg_type,
            Message::AddressedBinary(m) => m.msg_type,
            Message::BinaryAcknowledge(m) => m.msg_type,
            Message::BinaryBroadcast(m) => m.msg_type,
            Message::SarAircraftPosition(m) => m.msg_type,
            Message::UtcDateInquiry(m) => m.msg_type,
            Message::AddressedSafety(m) => m.msg_type,
            Message::SafetyBroadcast(m) => m.msg_type,
            Message::Interrogation(m) => m.msg_type,
            Message::AssignmentModeCommand(m) => m.msg_type,
            Message::DgnssBroadcast(m) => m.msg_type,
            Message::StandardClassBReport(m) => m.msg_type,
            Message::ExtendedClassBReport(m) => m.msg_type,
            Message::DataLinkManagement(m) => m.msg_type,
            Message::AidToNavigationReport(m) => m.msg_type,
            Message::ChannelManagement(m) => m.msg_type,
            Message::GroupAssignmentCommand(m) => m.msg_type,
            Message::StaticDataReport(m) => m.msg_type,
            Message::SingleSlotBinary(m) => m.msg_type,
            Message::MultiSlotBinary(m) => m.msg_type,
            Message::LongRangeBroadcast(m) => m.msg_type,
        }
    }

    /// The reporting station's MMSI.
    #[must_use]
    pub fn mmsi(&self) -> Mmsi {
        match self {
            Message::PositionReport(m) => m.mmsi,
            Message::BaseStationReport(m) => m.mmsi,
            Message::StaticAndVoyageData(m) => m.mmsi,
            Message::AddressedBinary(m) => m.mmsi,
            Message::BinaryAcknowledge(m) => m.mmsi,
            Message::BinaryBroadcast(m) => m.mmsi,
            Message::SarAircraftPosition(m) => m.mmsi,
            Message::UtcDateInquiry(m) => m.mmsi,
            Message::AddressedSafety(m) => m.mmsi,
            Message::SafetyBroadcast(m) => m.mmsi,
            Message::Interrogation(m) => m.mmsi,
            Message::AssignmentModeCommand(m) => m.mmsi,
            Message::DgnssBroadcast(m) => m.mmsi,
            Message::StandardClassBReport(m) => m.mmsi,
            Message::ExtendedClassBReport(m) => m.mmsi,
            Message::DataLinkManagement(m) => m.mmsi,
            Message::AidToNavigationReport(m) => m.mmsi,
            Message::ChannelManagement(m) => m.mmsi,
            Message::GroupAssignmentCommand(m) => m.mmsi,
            Message::StaticDataReport(m) => m.mmsi,
            Message::SingleSlotBinary(m) => m.mmsi,
            Message::MultiSlotBinary(m) => m.mmsi,
            Message::LongRangeBroadcast(m) => m.mmsi,
        }
    }

    /// Longitude in degrees east, when this message type carries one.
    #[must_use]
    pub fn lon(&self) -> Option<f64> {
        match self {
            Message::PositionReport(m) => Some(m.lon),
            Message::BaseStationReport(m) => Some(m.lon),
            Message::SarAircraftPosition(m) => Some(m.lon),
            Message::StandardClassBReport(m) => Some(m.lon),
            Message::ExtendedClassBReport(m) => Some(m.lon),
            Message::AidToNavigationReport(m) => Some(m.lon),
            Message::LongRangeBroadcast(m) => Some(m.lon),
            _ => None,
        }
    }

    /// Latitude in degrees north, when this message type carries one.
    #[must_use]
    pub fn lat(&self) -> Option<f64> {
        match self {
            Message::PositionReport(m) => Some(m.lat),
            Message::BaseStationReport(m) => Some(m.lat),
            Message::SarAircraftPosition(m) => Some(m.lat),
            Message::StandardClassBReport(m) => Some(m.lat),
            Message::ExtendedClassBReport(m) => Some(m.lat),
            Message::AidToNavigationReport(m) => Some(m.lat),
            Message::LongRangeBroadcast(m) => Some(m.lat),
            _ => None,
        }
    }

    /// Speed over ground in knots.
    #[must_use]
    pub fn speed(&self) -> Option<f64> {
        match self {
            Message::PositionReport(m) => Some(m.speed),
            Message::SarAircraftPosition(m) => Some(f64::from(m.speed)),
            Message::StandardClassBReport(m) => Some(m.speed),
            Message::ExtendedClassBReport(m) => Some(m.speed),
            Message::LongRangeBroadcast(m) => Some(f64::from(m.speed)),
            _ => None,
        }
    }

    /// Course over ground in degrees.
    #[must_use]
    pub fn course(&self) -> Option<f64> {
        match self {
            Message::PositionReport(m) => Some(m.course),
            Message::SarAircraftPosition(m) => Some(m.course),
            Message::StandardClassBReport(m) => Some(m.course),
            Message::ExtendedClassBReport(m) => Some(m.course),
            Message::LongRangeBroadcast(m) => Some(f64::from(m.course)),
            _ => None,
        }
    }

    /// True heading in degrees, 511 when unavailable.
    #[must_use]
    pub fn heading(&self) -> Option<u16> {
        match self {
            Message::PositionReport(m) => Some(m.heading),
            Message::StandardClassBReport(m) => Some(m.heading),
            Message::ExtendedClassBReport(m) => Some(m.heading),
            _ => None,
        }
    }

    /// Rate of turn in degrees per minute.
    #[must_use]
    pub fn turn(&self) -> Option<f64> {
        match self {
            Message::PositionReport(m) => m.turn,
            _ => None,
        }
    }

    /// Vessel name from static reports.
    #[must_use]
    pub fn shipname(&self) -> Option<&str> {
        match self {
            Message::StaticAndVoyageData(m) => Some(m.shipname.as_str()),
            Message::ExtendedClassBReport(m) => Some(m.shipname.as_str()),
            Message::AidToNavigationReport(m) => Some(m.name.as_str()),
            Message::StaticDataReport(m) => match &m.part {
                StaticDataPart::A { shipname } => Some(shipname.as_str()),
                StaticDataPart::B { .. } => None,
            },
            _ => None,
        }
    }

    /// Radio call sign from static reports.
    #[must_use]
    pub fn callsign(&self) -> Option<&str> {
        match self {
            Message::StaticAndVoyageData(m) => Some(m.callsign.as_str()),
            Message::StaticDataReport(m) => match &m.part {
                StaticDataPart::B { callsign, .. } => Some(callsign.as_str()),
                StaticDataPart::A { .. } => None,
            },
            _ => None,
        }
    }

    #[must_use]
    pub fn destination(&self) -> Option<&str> {
        match self {
            Message::StaticAndVoyageData(m) => Some(m.destination.as_str()),
            _ => None,
        }
    }

    /// Maximum present static draught in meters.
    #[must_use]
    pub fn draught(&self) -> Option<f64> {
        match self {
            Message::StaticAndVoyageData(m) => Some(m.draught),
            _ => None,
        }
    }

    /// Raw ship-and-cargo code; see [ShipType::from_raw].
    #[must_use]
    pub fn ship_type(&self) -> Option<u8> {
        match self {
            Message::StaticAndVoyageData(m) => Some(m.ship_type),
            Message::ExtendedClassBReport(m) => Some(m.ship_type),
            Message::StaticDataReport(m) => match &m.part {
                StaticDataPart::B { ship_type, .. } => Some(*ship_type),
                StaticDataPart::A { .. } => None,
            },
            _ => None,
        }
    }

    /// IMO number from voyage data.
    #[must_use]
    pub fn imo(&self) -> Option<u32> {
        match self {
            Message::StaticAndVoyageData(m) => Some(m.imo),
            _ => None,
        }
    }

    /// Whether the named attribute is present on this message type.
    ///
    /// Names follow the field names used throughout the crate, e.g. `lat`,
    /// `speed`, `shipname`.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        match name {
            "mmsi" | "msg_type" => true,
            "lon" => self.lon().is_some(),
            "lat" => self.lat().is_some(),
            "speed" => self.speed().is_some(),
            "course" => self.course().is_some(),
            "heading" => self.heading().is_some(),
            "turn" => self.turn().is_some(),
            "shipname" => self.shipname().is_some(),
            "callsign" => self.callsign().is_some(),
            "destination" => self.destination().is_some(),
            "draught" => self.draught().is_some(),
            "ship_type" => self.ship_type().is_some(),
            "imo" => self.imo().is_some(),
            _ => false,
        }
    }
}
