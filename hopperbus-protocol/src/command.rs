//! Command table
//!
//! Maps one-byte command identifiers to handlers. Handlers read their
//! request payload from, and write their reply payload into, the same frame
//! buffer the dispatcher later frames the response in.

use heapless::Vec;

use crate::status::{CommandResult, Status};

/// Errors from building a [`CommandRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// A handler is already registered for this identifier
    DuplicateCommand(u8),
    /// Registry capacity exhausted
    Full,
}

/// Handler view of the frame buffer
///
/// Covers the bytes between the command/status byte and the checksum byte.
/// The first `payload_len` bytes hold the request payload; the whole
/// region (`capacity` bytes) may be overwritten with the reply payload.
pub struct CommandBuffer<'a> {
    data: &'a mut [u8],
    payload_len: usize,
}

impl<'a> CommandBuffer<'a> {
    /// Wrap a reply region holding `payload_len` request bytes
    pub fn new(data: &'a mut [u8], payload_len: usize) -> Self {
        debug_assert!(payload_len <= data.len());
        let payload_len = payload_len.min(data.len());
        Self { data, payload_len }
    }

    /// Request payload
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.payload_len]
    }

    /// Request payload length in bytes
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }

    /// Number of reply payload bytes that fit
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Reply region, `capacity` bytes long
    ///
    /// Writing here overwrites the request payload.
    pub fn reply_mut(&mut self) -> &mut [u8] {
        self.data
    }

    /// Copy `bytes` into the reply region
    ///
    /// Returns [`Status::InvalidArguments`] if they don't fit.
    pub fn reply(&mut self, bytes: &[u8]) -> CommandResult {
        if bytes.len() > self.capacity() {
            return CommandResult::status(Status::InvalidArguments);
        }
        self.data[..bytes.len()].copy_from_slice(bytes);
        CommandResult::ok(bytes.len())
    }
}

/// Handler for a single command identifier
pub trait CommandHandler {
    /// Run the command
    ///
    /// The returned length must not exceed `buf.capacity()`.
    fn handle(&mut self, buf: &mut CommandBuffer<'_>) -> CommandResult;
}

impl<F> CommandHandler for F
where
    F: FnMut(&mut CommandBuffer<'_>) -> CommandResult,
{
    fn handle(&mut self, buf: &mut CommandBuffer<'_>) -> CommandResult {
        self(buf)
    }
}

/// Dispatcher-facing command lookup
///
/// Unknown identifiers must produce [`Status::CommandNotSupported`].
pub trait CommandTable {
    /// Run the handler for `command`
    fn dispatch(&mut self, command: u8, buf: &mut CommandBuffer<'_>) -> CommandResult;
}

/// Fixed-capacity command table filled in at startup
///
/// Holds at most one handler per identifier.
pub struct CommandRegistry<'h, const N: usize> {
    entries: Vec<(u8, &'h mut dyn CommandHandler), N>,
}

impl<'h, const N: usize> Default for CommandRegistry<'h, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'h, const N: usize> CommandRegistry<'h, N> {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register the handler for `command`
    pub fn register(
        &mut self,
        command: u8,
        handler: &'h mut dyn CommandHandler,
    ) -> Result<(), RegistryError> {
        if self.contains(command) {
            return Err(RegistryError::DuplicateCommand(command));
        }
        self.entries
            .push((command, handler))
            .map_err(|_| RegistryError::Full)
    }

    /// Check whether a handler is registered for `command`
    pub fn contains(&self, command: u8) -> bool {
        self.entries.iter().any(|(id, _)| *id == command)
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no commands are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'h, const N: usize> CommandTable for CommandRegistry<'h, N> {
    fn dispatch(&mut self, command: u8, buf: &mut CommandBuffer<'_>) -> CommandResult {
        match self.entries.iter_mut().find(|(id, _)| *id == command) {
            Some((_, handler)) => handler.handle(buf),
            None => CommandResult::status(Status::CommandNotSupported),
        }
    }
}
