//! TDMA communication state carried in the `radio` field.
//!
//! Position and base-station reports end in a 19- or 20-bit radio status
//! word describing the station's slot allocation. SOTDMA and ITDMA lay the
//! word out differently; which one applies depends on the message type and,
//! for 20-bit variants, on a selector bit ahead of the 19 state bits.

use serde::{Deserialize, Serialize};

use super::enums::SyncState;

const SYNC_MASK: u32 = 0x03;
const TIMEOUT_MASK: u32 = 0x07;
const SUB_MESSAGE_MASK: u32 = 0x3fff;
const SLOT_INCREMENT_MASK: u32 = 0x1fff;

/// Interpretation of the 14-bit SOTDMA sub-message, selected by the slot
/// timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SotdmaMessage {
    /// Timeout 0: offset of the slot in which the next transmission occurs.
    SlotOffset(u16),
    /// Timeout 1: current UTC hour and minute.
    UtcHourMinute { hour: u8, minute: u8 },
    /// Timeout 2, 4, 6: slot number used for this transmission.
    SlotNumber(u16),
    /// Timeout 3, 5, 7: number of stations currently received.
    ReceivedStations(u16),
}

/// Decoded radio status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommunicationState {
    Sotdma {
        sync_state: SyncState,
        /// Frames remaining until a new slot is selected; 0 means this was
        /// the last transmission in this slot.
        slot_timeout: u8,
        sub_message: SotdmaMessage,
    },
    Itdma {
        sync_state: SyncState,
        /// Offset to the next slot to be used, or 0 for no more
        /// transmissions.
        slot_increment: u16,
        /// Consecutive slots to allocate, 0 meaning one slot.
        num_slots: u8,
        /// Whether the slot remains allocated for one more frame.
        keep_flag: bool,
    },
}

impl CommunicationState {
    /// Decode a 19-bit SOTDMA state word.
    #[must_use]
    pub fn sotdma(radio: u32) -> Self {
        let slot_timeout = (radio >> 14 & TIMEOUT_MASK) as u8;
        let sub = (radio & SUB_MESSAGE_MASK) as u16;
        let sub_message = match slot_timeout {
            0 => SotdmaMessage::SlotOffset(sub),
            1 => SotdmaMessage::UtcHourMinute {
                hour: (sub >> 9 & 0x1f) as u8,
                minute: (sub >> 2 & 0x3f) as u8,
            },
            2 | 4 | 6 => SotdmaMessage::SlotNumber(sub),
            _ => SotdmaMessage::ReceivedStations(sub),
        };
        CommunicationState::Sotdma {
            sync_state: SyncState::from_raw((radio >> 17 & SYNC_MASK) as u8),
            slot_timeout,
            sub_message,
        }
    }

    /// Decode a 19-bit ITDMA state word.
    #[must_use]
    pub fn itdma(radio: u32) -> Self {
        CommunicationState::Itdma {
            sync_state: SyncState::from_raw((radio >> 17 & SYNC_MASK) as u8),
            slot_increment: (radio >> 4 & SLOT_INCREMENT_MASK) as u16,
            num_slots: (radio >> 1 & TIMEOUT_MASK) as u8,
            keep_flag: radio & 1 == 1,
        }
    }

    /// Decode a 20-bit state word whose leading bit selects the layout:
    /// 0 for SOTDMA, 1 for ITDMA (types 9 and 18).
    #[must_use]
    pub fn selected(radio: u32) -> Self {
        let state = radio & 0x7_ffff;
        if radio >> 19 & 1 == 1 {
            Self::itdma(state)
        } else {
            Self::sotdma(state)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sotdma_slot_offset() {
        // sync 0, timeout 0, sub-message 34059 -> slot offset
        let state = CommunicationState::sotdma(34059 & 0x3fff);
        match state {
            CommunicationState::Sotdma {
                sync_state,
                slot_timeout,
                sub_message,
            } => {
                assert_eq!(sync_state, SyncState::UtcDirect);
                assert_eq!(slot_timeout, 0);
                assert_eq!(sub_message, SotdmaMessage::SlotOffset((34059 & 0x3fff) as u16));
            }
            CommunicationState::Itdma { .. } => panic!("expected SOTDMA"),
        }
    }

    #[test]
    fn sotdma_utc_hour_minute() {
        // timeout 1; hour 11, minute 30 packed into the sub-message
        let sub = (11u32 << 9) | (30u32 << 2);
        let radio = (1 << 14) | sub;
        match CommunicationState::sotdma(radio) {
            CommunicationState::Sotdma { sub_message, .. } => {
                assert_eq!(sub_message, SotdmaMessage::UtcHourMinute { hour: 11, minute: 30 });
            }
            CommunicationState::Itdma { .. } => panic!("expected SOTDMA"),
        }
    }

    #[test]
    fn sotdma_received_stations() {
        let radio = (3 << 14) | 42;
        match CommunicationState::sotdma(radio) {
            CommunicationState::Sotdma {
                slot_timeout,
                sub_message,
                ..
            } => {
                assert_eq!(slot_timeout, 3);
                assert_eq!(sub_message, SotdmaMessage::ReceivedStations(42));
            }
            CommunicationState::Itdma { .. } => panic!("expected SOTDMA"),
        }
    }

    #[test]
    fn itdma_fields() {
        let radio = (2 << 17) | (100 << 4) | (3 << 1) | 1;
        match CommunicationState::itdma(radio) {
            CommunicationState::Itdma {
                sync_state,
                slot_increment,
                num_slots,
                keep_flag,
            } => {
                assert_eq!(sync_state, SyncState::BaseDirect);
                assert_eq!(slot_increment, 100);
                assert_eq!(num_slots, 3);
                assert!(keep_flag);
            }
            CommunicationState::Sotdma { .. } => panic!("expected ITDMA"),
        }
    }

    #[test]
    fn selector_bit_picks_layout() {
        assert!(matches!(
            CommunicationState::selected(0),
            CommunicationState::Sotdma { .. }
        ));
        assert!(matches!(
            CommunicationState::selected(1 << 19),
            CommunicationState::Itdma { .. }
        ));
    }
}
