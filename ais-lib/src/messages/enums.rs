//! Enumerated field values per ITU-R M.1371.
//!
//! Every enumeration keeps unassigned codes in a value-carrying catch-all so
//! a decode→encode round trip reproduces the original bits.

use serde::{Deserialize, Serialize};

/// Navigational status from position reports (4 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationStatus {
    UnderWayUsingEngine,
    AtAnchor,
    NotUnderCommand,
    RestrictedManoeuverability,
    ConstrainedByHerDraught,
    Moored,
    Aground,
    EngagedInFishing,
    UnderWaySailing,
    ReservedHsc,
    ReservedWig,
    PowerDrivenVesselTowingAstern,
    PowerDrivenVesselPushingAhead,
    ReservedFuture,
    AisSartActive,
    Undefined,
}

impl NavigationStatus {
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0xf {
            0 => Self::UnderWayUsingEngine,
            1 => Self::AtAnchor,
            2 => Self::NotUnderCommand,
            3 => Self::RestrictedManoeuverability,
            4 => Self::ConstrainedByHerDraught,
            5 => Self::Moored,
            6 => Self::Aground,
            7 => Self::EngagedInFishing,
            8 => Self::UnderWaySailing,
            9 => Self::ReservedHsc,
            10 => Self::ReservedWig,
            11 => Self::PowerDrivenVesselTowingAstern,
            12 => Self::PowerDrivenVesselPushingAhead,
            13 => Self::ReservedFuture,
            14 => Self::AisSartActive,
            _ => Self::Undefined,
        }
    }

    #[must_use]
    pub fn raw(self) -> u8 {
        match self {
            Self::UnderWayUsingEngine => 0,
            Self::AtAnchor => 1,
            Self::NotUnderCommand => 2,
            Self::RestrictedManoeuverability => 3,
            Self::ConstrainedByHerDraught => 4,
            Self::Moored => 5,
            Self::Aground => 6,
            Self::EngagedInFishing => 7,
            Self::UnderWaySailing => 8,
            Self::ReservedHsc => 9,
            Self::ReservedWig => 10,
            Self::PowerDrivenVesselTowingAstern => 11,
            Self::PowerDrivenVesselPushingAhead => 12,
            Self::ReservedFuture => 13,
            Self::AisSartActive => 14,
            Self::Undefined => 15,
        }
    }
}

impl Default for NavigationStatus {
    fn default() -> Self {
        Self::Undefined
    }
}

/// Maneuver indicator from class A position reports (2 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ManeuverIndicator {
    #[default]
    NotAvailable,
    NoSpecialManeuver,
    SpecialManeuver,
    Reserved,
}

impl ManeuverIndicator {
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0x3 {
            0 => Self::NotAvailable,
            1 => Self::NoSpecialManeuver,
            2 => Self::SpecialManeuver,
            _ => Self::Reserved,
        }
    }

    #[must_use]
    pub fn raw(self) -> u8 {
        match self {
            Self::NotAvailable => 0,
            Self::NoSpecialManeuver => 1,
            Self::SpecialManeuver => 2,
            Self::Reserved => 3,
        }
    }
}

/// Electronic position fixing device type (4 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpfdType {
    Undefined,
    Gps,
    Glonass,
    CombinedGpsGlonass,
    LoranC,
    Chayka,
    IntegratedNavigationSystem,
    Surveyed,
    Galileo,
    Internal,
    Reserved(u8),
}

impl EpfdType {
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0xf {
            0 => Self::Undefined,
            1 => Self::Gps,
            2 => Self::Glonass,
            3 => Self::CombinedGpsGlonass,
            4 => Self::LoranC,
            5 => Self::Chayka,
            6 => Self::IntegratedNavigationSystem,
            7 => Self::Surveyed,
            8 => Self::Galileo,
            15 => Self::Internal,
            other => Self::Reserved(other),
        }
    }

    #[must_use]
    pub fn raw(self) -> u8 {
        match self {
            Self::Undefined => 0,
            Self::Gps => 1,
            Self::Glonass => 2,
            Self::CombinedGpsGlonass => 3,
            Self::LoranC => 4,
            Self::Chayka => 5,
            Self::IntegratedNavigationSystem => 6,
            Self::Surveyed => 7,
            Self::Galileo => 8,
            Self::Internal => 15,
            Self::Reserved(v) => v,
        }
    }
}

impl Default for EpfdType {
    fn default() -> Self {
        Self::Undefined
    }
}

/// Coarse vessel category derived from the 8-bit ship-and-cargo code.
///
/// The wire value is kept raw on the messages (the second digit carries
/// hazard sub-codes); this classification covers the first digit plus the
/// individually assigned 5x codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipType {
    NotAvailable,
    WingInGround,
    Fishing,
    Towing,
    TowingLong,
    DredgingOrUnderwaterOps,
    DivingOps,
    MilitaryOps,
    Sailing,
    PleasureCraft,
    HighSpeedCraft,
    PilotVessel,
    SearchAndRescueVessel,
    Tug,
    PortTender,
    AntiPollutionEquipment,
    LawEnforcement,
    LocalVessel,
    MedicalTransport,
    NonCombatant,
    Passenger,
    Cargo,
    Tanker,
    Other,
    Reserved(u8),
}

impl ShipType {
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::NotAvailable,
            20..=29 => Self::WingInGround,
            30 => Self::Fishing,
            31 => Self::Towing,
            32 => Self::TowingLong,
            33 => Self::DredgingOrUnderwaterOps,
            34 => Self::DivingOps,
            35 => Self::MilitaryOps,
            36 => Self::Sailing,
            37 => Self::PleasureCraft,
            40..=49 => Self::HighSpeedCraft,
            50 => Self::PilotVessel,
            51 => Self::SearchAndRescueVessel,
            52 => Self::Tug,
            53 => Self::PortTender,
            54 => Self::AntiPollutionEquipment,
            55 => Self::LawEnforcement,
            56 | 57 => Self::LocalVessel,
            58 => Self::MedicalTransport,
            59 => Self::NonCombatant,
            60..=69 => Self::Passenger,
            70..=79 => Self::Cargo,
            80..=89 => Self::Tanker,
            90..=99 => Self::Other,
            other => Self::Reserved(other),
        }
    }
}

/// Aid-to-navigation type from type 21 reports (5 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavAid {
    Default,
    ReferencePoint,
    Racon,
    FixedStructure,
    Spare,
    LightWithoutSectors,
    LightWithSectors,
    LeadingLightFront,
    LeadingLightRear,
    BeaconCardinalN,
    BeaconCardinalE,
    BeaconCardinalS,
    BeaconCardinalW,
    BeaconPortHand,
    BeaconStarboardHand,
    BeaconPreferredChannelPort,
    BeaconPreferredChannelStarboard,
    BeaconIsolatedDanger,
    BeaconSafeWater,
    BeaconSpecialMark,
    CardinalMarkN,
    CardinalMarkE,
    CardinalMarkS,
    CardinalMarkW,
    PortHandMark,
    StarboardHandMark,
    PreferredChannelPort,
    PreferredChannelStarboard,
    IsolatedDanger,
    SafeWater,
    SpecialMark,
    LightVessel,
}

impl NavAid {
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0x1f {
            0 => Self::Default,
            1 => Self::ReferencePoint,
            2 => Self::Racon,
            3 => Self::FixedStructure,
            4 => Self::Spare,
            5 => Self::LightWithoutSectors,
            6 => Self::LightWithSectors,
            7 => Self::LeadingLightFront,
            8 => Self::LeadingLightRear,
            9 => Self::BeaconCardinalN,
            10 => Self::BeaconCardinalE,
            11 => Self::BeaconCardinalS,
            12 => Self::BeaconCardinalW,
            13 => Self::BeaconPortHand,
            14 => Self::BeaconStarboardHand,
            15 => Self::BeaconPreferredChannelPort,
            16 => Self::BeaconPreferredChannelStarboard,
            17 => Self::BeaconIsolatedDanger,
            18 => Self::BeaconSafeWater,
            19 => Self::BeaconSpecialMark,
            20 => Self::CardinalMarkN,
            21 => Self::CardinalMarkE,
            22 => Self::CardinalMarkS,
            23 => Self::CardinalMarkW,
            24 => Self::PortHandMark,
            25 => Self::StarboardHandMark,
            26 => Self::PreferredChannelPort,
            27 => Self::PreferredChannelStarboard,
            28 => Self::IsolatedDanger,
            29 => Self::SafeWater,
            30 => Self::SpecialMark,
            _ => Self::LightVessel,
        }
    }

    #[must_use]
    pub fn raw(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::ReferencePoint => 1,
            Self::Racon => 2,
            Self::FixedStructure => 3,
            Self::Spare => 4,
            Self::LightWithoutSectors => 5,
            Self::LightWithSectors => 6,
            Self::LeadingLightFront => 7,
            Self::LeadingLightRear => 8,
            Self::BeaconCardinalN => 9,
            Self::BeaconCardinalE => 10,
            Self::BeaconCardinalS => 11,
            Self::BeaconCardinalW => 12,
            Self::BeaconPortHand => 13,
            Self::BeaconStarboardHand => 14,
            Self::BeaconPreferredChannelPort => 15,
            Self::BeaconPreferredChannelStarboard => 16,
            Self::BeaconIsolatedDanger => 17,
            Self::BeaconSafeWater => 18,
            Self::BeaconSpecialMark => 19,
            Self::CardinalMarkN => 20,
            Self::CardinalMarkE => 21,
            Self::CardinalMarkS => 22,
            Self::CardinalMarkW => 23,
            Self::PortHandMark => 24,
            Self::StarboardHandMark => 25,
            Self::PreferredChannelPort => 26,
            Self::PreferredChannelStarboard => 27,
            Self::IsolatedDanger => 28,
            Self::SafeWater => 29,
            Self::SpecialMark => 30,
            Self::LightVessel => 31,
        }
    }
}

impl Default for NavAid {
    fn default() -> Self {
        Self::Default
    }
}

/// Station type selector for group assignment commands (4 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationType {
    AllMobiles,
    ClassBAll,
    SarAirborne,
    AidToNavigation,
    ClassBShipborne,
    RegionalUse(u8),
    Reserved(u8),
}

impl StationType {
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0xf {
            0 => Self::AllMobiles,
            2 => Self::ClassBAll,
            3 => Self::SarAirborne,
            4 => Self::AidToNavigation,
            5 => Self::ClassBShipborne,
            v @ 6..=9 => Self::RegionalUse(v),
            other => Self::Reserved(other),
        }
    }

    #[must_use]
    pub fn raw(self) -> u8 {
        match self {
            Self::AllMobiles => 0,
            Self::ClassBAll => 2,
            Self::SarAirborne => 3,
            Self::AidToNavigation => 4,
            Self::ClassBShipborne => 5,
            Self::RegionalUse(v) | Self::Reserved(v) => v,
        }
    }
}

impl Default for StationType {
    fn default() -> Self {
        Self::AllMobiles
    }
}

/// Transmit/receive mode for channel and group assignment (2 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransmitMode {
    #[default]
    TxATxBRxARxB,
    TxARxARxB,
    TxBRxARxB,
    Reserved,
}

impl TransmitMode {
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0x3 {
            0 => Self::TxATxBRxARxB,
            1 => Self::TxARxARxB,
            2 => Self::TxBRxARxB,
            _ => Self::Reserved,
        }
    }

    #[must_use]
    pub fn raw(self) -> u8 {
        match self {
            Self::TxATxBRxARxB => 0,
            Self::TxARxARxB => 1,
            Self::TxBRxARxB => 2,
            Self::Reserved => 3,
        }
    }
}

/// Reporting interval for group assignment commands (4 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationInterval {
    AsAutonomousMode,
    Minutes10,
    Minutes6,
    Minutes3,
    Minutes1,
    Seconds30,
    Seconds15,
    Seconds10,
    Seconds5,
    NextShorter,
    NextLonger,
    Reserved(u8),
}

impl StationInterval {
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0xf {
            0 => Self::AsAutonomousMode,
            1 => Self::Minutes10,
            2 => Self::Minutes6,
            3 => Self::Minutes3,
            4 => Self::Minutes1,
            5 => Self::Seconds30,
            6 => Self::Seconds15,
            7 => Self::Seconds10,
            8 => Self::Seconds5,
            9 => Self::NextShorter,
            10 => Self::NextLonger,
            other => Self::Reserved(other),
        }
    }

    #[must_use]
    pub fn raw(self) -> u8 {
        match self {
            Self::AsAutonomousMode => 0,
            Self::Minutes10 => 1,
            Self::Minutes6 => 2,
            Self::Minutes3 => 3,
            Self::Minutes1 => 4,
            Self::Seconds30 => 5,
            Self::Seconds15 => 6,
            Self::Seconds10 => 7,
            Self::Seconds5 => 8,
            Self::NextShorter => 9,
            Self::NextLonger => 10,
            Self::Reserved(v) => v,
        }
    }
}

impl Default for StationInterval {
    fn default() -> Self {
        Self::AsAutonomousMode
    }
}

/// TDMA synchronization state from the radio status field (2 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncState {
    #[default]
    UtcDirect,
    UtcIndirect,
    BaseDirect,
    BaseIndirect,
}

impl SyncState {
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0x3 {
            0 => Self::UtcDirect,
            1 => Self::UtcIndirect,
            2 => Self::BaseDirect,
            _ => Self::BaseIndirect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_status_round_trips() {
        for raw in 0..16u8 {
            assert_eq!(NavigationStatus::from_raw(raw).raw(), raw);
        }
    }

    #[test]
    fn epfd_reserved_preserves_raw() {
        for raw in 0..16u8 {
            assert_eq!(EpfdType::from_raw(raw).raw(), raw);
        }
        assert_eq!(EpfdType::from_raw(9), EpfdType::Reserved(9));
    }

    #[test]
    fn nav_aid_round_trips() {
        for raw in 0..32u8 {
            assert_eq!(NavAid::from_raw(raw).raw(), raw);
        }
    }

    #[test]
    fn ship_type_classifies_decades() {
        assert_eq!(ShipType::from_raw(0), ShipType::NotAvailable);
        assert_eq!(ShipType::from_raw(36), ShipType::Sailing);
        assert_eq!(ShipType::from_raw(52), ShipType::Tug);
        assert_eq!(ShipType::from_raw(74), ShipType::Cargo);
        assert_eq!(ShipType::from_raw(85), ShipType::Tanker);
        assert_eq!(ShipType::from_raw(12), ShipType::Reserved(12));
    }

    #[test]
    fn station_type_round_trips() {
        for raw in 0..16u8 {
            assert_eq!(StationType::from_raw(raw).raw(), raw);
        }
    }

    #[test]
    fn station_interval_round_trips() {
        for raw in 0..16u8 {
            assert_eq!(StationInterval::from_raw(raw).raw(), raw);
        }
    }
}
