use crate::errors::JournalError;

/// Journal file magic bytes.
pub const MAGIC: &[u8; 8] = b"GCJOURNL";

/// Current journal format version.
pub const VERSION: u16 = 0x0001;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// Frame header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Maximum payload size: 16 MiB.
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// Record frame kind: transaction JSON.
pub const FRAME_KIND_TRANSACTION: u8 = 0x01;

/// Journal file header.
///
/// Layout: magic (8) ‖ version u16 LE ‖ flags u16 LE ‖ reserved u32 LE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalHeader {
    /// Format version.
    pub version: u16,
    /// Reserved flags (must be 0).
    pub flags: u16,
}

impl JournalHeader {
    /// Header for the current version.
    pub fn new() -> Self {
        Self {
            version: VERSION,
            flags: 0,
        }
    }

    /// Serializes the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..8].copy_from_slice(MAGIC);
        bytes[8..10].copy_from_slice(&self.version.to_le_bytes());
        bytes[10..12].copy_from_slice(&self.flags.to_le_bytes());
        bytes
    }

    /// Parses and validates a header.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, JournalError> {
        if bytes.len() < HEADER_SIZE {
            return Err(JournalError::InvalidHeader(format!(
                "header too short: {} bytes",
                bytes.len()
            )));
        }
        if &bytes[0..8] != MAGIC {
            return Err(JournalError::InvalidHeader("bad magic".to_string()));
        }

        let version = u16::from_le_bytes([bytes[8], bytes[9]]);
        if version != VERSION {
            return Err(JournalError::InvalidHeader(format!(
                "unsupported version: 0x{:04x}, expected 0x{:04x}",
                version, VERSION
            )));
        }

        let flags = u16::from_le_bytes([bytes[10], bytes[11]]);
        if flags != 0 {
            return Err(JournalError::InvalidHeader(format!(
                "non-zero flags: 0x{:04x}",
                flags
            )));
        }
        if bytes[12..16] != [0u8; 4] {
            return Err(JournalError::InvalidHeader(
                "non-zero reserved bytes".to_string(),
            ));
        }

        Ok(Self { version, flags })
    }
}

impl Default for JournalHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Record frame kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// JSON of a signed transaction.
    Transaction,
    /// Unknown kind; readers skip it.
    Unknown(u8),
}

impl FrameKind {
    /// Kind for a byte value.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            FRAME_KIND_TRANSACTION => FrameKind::Transaction,
            _ => FrameKind::Unknown(byte),
        }
    }

    /// Byte value of this kind.
    pub fn to_byte(self) -> u8 {
        match self {
            FrameKind::Transaction => FRAME_KIND_TRANSACTION,
            FrameKind::Unknown(b) => b,
        }
    }
}

/// Record frame header: kind ‖ 3 reserved bytes ‖ payload length u32 LE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFrame {
    /// Frame kind.
    pub kind: FrameKind,
    /// Payload length in bytes.
    pub len: u32,
}

impl RecordFrame {
    /// Frame header for a payload of `len` bytes.
    pub fn new(kind: FrameKind, len: usize) -> Result<Self, JournalError> {
        match u32::try_from(len) {
            Ok(len) if len <= MAX_PAYLOAD_SIZE => Ok(Self { kind, len }),
            _ => Err(JournalError::PayloadTooLarge {
                size: len,
                max: MAX_PAYLOAD_SIZE,
            }),
        }
    }

    /// Serializes the frame header.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut bytes = [0u8; FRAME_HEADER_SIZE];
        bytes[0] = self.kind.to_byte();
        bytes[4..8].copy_from_slice(&self.len.to_le_bytes());
        bytes
    }

    /// Parses a frame header found at `offset`.
    pub fn from_bytes(bytes: &[u8; FRAME_HEADER_SIZE], offset: u64) -> Result<Self, JournalError> {
        if bytes[1..4] != [0u8; 3] {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: "non-zero reserved bytes".to_string(),
            });
        }
        let len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if len > MAX_PAYLOAD_SIZE {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: format!("payload size {} exceeds maximum {}", len, MAX_PAYLOAD_SIZE),
            });
        }
        Ok(Self {
            kind: FrameKind::from_byte(bytes[0]),
            len,
        })
    }
}
