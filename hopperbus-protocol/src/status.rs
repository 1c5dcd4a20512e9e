//! Response status codes and command results

/// Outcome of processing a request
///
/// Sent as the first byte of every addressed response, except
/// [`Status::NoReply`] which suppresses the response altogether.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Status {
    /// Command completed
    CommandOk = 0x00,
    /// Command ran but could not complete
    CommandFailed = 0x01,
    /// Unknown command identifier
    CommandNotSupported = 0x02,
    /// Frame too short to hold a command and a checksum
    InvalidTransfer = 0x03,
    /// Frame checksum mismatch
    InvalidCrc = 0x04,
    /// Malformed payload or not enough room for the reply
    InvalidArguments = 0x05,
    /// Never sent; no response is produced at all
    NoReply = 0xFF,
}

impl Status {
    /// Wire value of this status
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns true if this status produces a response on the bus
    pub fn is_reply(self) -> bool {
        self != Status::NoReply
    }
}

/// Result of a command handler
///
/// `len` is the number of reply payload bytes the handler wrote. The
/// dispatcher frames exactly that many bytes and never looks at them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandResult {
    pub status: Status,
    pub len: usize,
}

impl CommandResult {
    /// Result with a payload
    pub const fn new(status: Status, len: usize) -> Self {
        Self { status, len }
    }

    /// Successful result with `len` payload bytes
    pub const fn ok(len: usize) -> Self {
        Self::new(Status::CommandOk, len)
    }

    /// Result carrying only a status
    pub const fn status(status: Status) -> Self {
        Self::new(status, 0)
    }

    /// Suppress the response entirely
    pub const fn no_reply() -> Self {
        Self::status(Status::NoReply)
    }
}

impl From<Status> for CommandResult {
    fn from(status: Status) -> Self {
        Self::status(status)
    }
}
