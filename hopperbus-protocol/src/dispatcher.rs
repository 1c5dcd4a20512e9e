//! Frame dispatcher
//!
//! Entry point for the transport. Called once per completed bus
//! transaction with the received bytes; validates the frame, runs the
//! command and rewrites the buffer in place with the framed response.

use hopperbus_hal::{AddressReset, Watchdog, WatchdogTimeout, GENERAL_CALL_ADDRESS};

use crate::checksum::checksum;
use crate::command::{CommandBuffer, CommandTable};
use crate::general_call;
use crate::status::{CommandResult, Status};

/// Shortest valid frame: one command/status byte plus the checksum byte
pub const MIN_FRAME_LEN: usize = 2;

/// Protocol dispatcher
///
/// Owns the command table and the platform services the general-call
/// directives need.
pub struct Dispatcher<T, W, A> {
    table: T,
    watchdog: W,
    address_reset: A,
    reset_timeout: WatchdogTimeout,
}

impl<T, W, A> Dispatcher<T, W, A>
where
    T: CommandTable,
    W: Watchdog,
    A: AddressReset,
{
    /// Create a dispatcher with the default 15 ms reset timeout
    pub fn new(table: T, watchdog: W, address_reset: A) -> Self {
        Self {
            table,
            watchdog,
            address_reset,
            reset_timeout: WatchdogTimeout::Ms15,
        }
    }

    /// Use a different watchdog timeout for the reset directive
    pub fn with_reset_timeout(mut self, timeout: WatchdogTimeout) -> Self {
        self.reset_timeout = timeout;
        self
    }

    /// Process one bus transaction
    ///
    /// `buffer` holds the `len` received bytes and its slice length is the
    /// writable capacity for the reply. Returns the reply length, 0 meaning
    /// no reply. Does not return when a general call requests a reset.
    pub fn process(&mut self, address: u8, buffer: &mut [u8], len: usize) -> usize {
        debug_assert!(len <= buffer.len());
        let len = len.min(buffer.len());

        if address == GENERAL_CALL_ADDRESS {
            return general_call::handle(
                &buffer[..len],
                &mut self.watchdog,
                &mut self.address_reset,
                self.reset_timeout,
            );
        }

        self.process_addressed(buffer, len)
    }

    fn process_addressed(&mut self, buffer: &mut [u8], len: usize) -> usize {
        let max_len = buffer.len();

        // No room for a status byte and a checksum
        if max_len < MIN_FRAME_LEN {
            return 0;
        }

        let reply_len = if len < MIN_FRAME_LEN {
            buffer[0] = Status::InvalidTransfer.as_u8();
            1
        } else if checksum(&buffer[..len]) != 0 {
            buffer[0] = Status::InvalidCrc.as_u8();
            1
        } else {
            let command = buffer[0];
            let capacity = max_len - MIN_FRAME_LEN;

            let result = {
                let mut cmd_buf = CommandBuffer::new(&mut buffer[1..1 + capacity], len - 2);
                self.table.dispatch(command, &mut cmd_buf)
            };

            if !result.status.is_reply() {
                return 0;
            }

            let result = if result.len > capacity {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "Command {=u8:#x} claims {} reply bytes, room for {}",
                    command,
                    result.len,
                    capacity
                );
                CommandResult::status(Status::CommandFailed)
            } else {
                result
            };

            #[cfg(feature = "defmt")]
            defmt::debug!("Command {=u8:#x} -> {:?}", command, result);

            buffer[0] = result.status.as_u8();
            result.len + 1
        };

        buffer[reply_len] = checksum(&buffer[..reply_len]);
        reply_len + 1
    }
}
