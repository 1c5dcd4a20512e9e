//! Bus command table of the interface board
//!
//! Application commands answered over the bus. Every identifier is
//! registered with the protocol's [`CommandRegistry`]; anything else is
//! answered with `COMMAND_NOT_SUPPORTED` by the registry itself.

use hopperbus_protocol::{
    CommandBuffer, CommandHandler, CommandRegistry, CommandResult, RegistryError, Status,
};

use crate::measurement::MeasurementStore;

// Command IDs
pub const CMD_GET_LAST_MEASUREMENT: u8 = 0x80;

/// Number of commands the board registers
pub const COMMAND_COUNT: usize = 1;

/// Application commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Read the raw readings of the latest hopper measurement
    GetLastMeasurement,
}

impl Command {
    /// Command identifier
    pub fn to_byte(self) -> u8 {
        match self {
            Command::GetLastMeasurement => CMD_GET_LAST_MEASUREMENT,
        }
    }
}

/// `GET_LAST_MEASUREMENT`: no arguments, replies `[on_hi, on_lo, off_hi, off_lo]`
pub struct LastMeasurementHandler<'a> {
    store: &'a MeasurementStore,
}

impl<'a> LastMeasurementHandler<'a> {
    pub fn new(store: &'a MeasurementStore) -> Self {
        Self { store }
    }
}

impl CommandHandler for LastMeasurementHandler<'_> {
    fn handle(&mut self, buf: &mut CommandBuffer<'_>) -> CommandResult {
        if buf.payload_len() != 0 || buf.capacity() < 4 {
            return CommandResult::status(Status::InvalidArguments);
        }
        buf.reply(&self.store.latest().to_be_bytes())
    }
}

/// All command handlers of the board
pub struct BoardCommands<'a> {
    last_measurement: LastMeasurementHandler<'a>,
}

impl<'a> BoardCommands<'a> {
    pub fn new(store: &'a MeasurementStore) -> Self {
        Self {
            last_measurement: LastMeasurementHandler::new(store),
        }
    }

    /// Register every handler under its identifier
    pub fn register<'h, const N: usize>(
        &'h mut self,
        registry: &mut CommandRegistry<'h, N>,
    ) -> Result<(), RegistryError> {
        registry.register(
            Command::GetLastMeasurement.to_byte(),
            &mut self.last_measurement,
        )?;
        Ok(())
    }
}
