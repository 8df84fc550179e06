#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Sentence or tag-block XOR checksum does not match the stated value.
    #[error("checksum mismatch: stated {stated:02X}, computed {computed:02X}")]
    InvalidChecksum { stated: u8, computed: u8 },

    /// Message type outside 1..=27.
    #[error("unsupported message type {0}")]
    UnknownMessageType(u8),

    /// Payload contains a byte outside the ASCII-6 alphabet.
    #[error("non-printable payload character {0:#04x}")]
    NonPrintableCharacter(u8),

    /// A multipart operation was given an incomplete fragment set.
    #[error("incomplete multipart message: missing fragments {missing:?}")]
    MissingMultipartMessage { missing: Vec<u8> },

    /// A structurally valid sentence carried a zero-length payload.
    #[error("sentence has no payload")]
    MissingPayload,

    /// Framing violation: missing `*`, wrong field count, over-length, etc.
    #[error("invalid NMEA sentence: {0}")]
    InvalidNmea(String),

    /// An encoder input exceeds its field width or allowed values.
    #[error("invalid field value: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
