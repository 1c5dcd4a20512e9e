//! Bus target task
//!
//! Receives master writes into a frame buffer, runs them through the
//! dispatcher and serves the resulting reply on the next master read.

use defmt::*;
use embassy_stm32::i2c::mode::MultiMaster;
use embassy_stm32::i2c::{Address, I2c, SlaveCommand, SlaveCommandKind};
use embassy_stm32::mode::Async;

use hopperbus_core::commands::{BoardCommands, COMMAND_COUNT};
use hopperbus_hal::{AddressReset, TargetAddress, WatchdogTimeout};
use hopperbus_hal_stm32f0::{I2cBusError, IndependentWatchdog};
use hopperbus_protocol::{CommandRegistry, Dispatcher};

use crate::channels::{ADDRESS_RESET, MEASUREMENTS};

/// Frame buffer size; bounds both requests and replies
const FRAME_CAPACITY: usize = 32;

/// Forwards the address reset general call to the bus task
struct AddressResetRequest;

impl AddressReset for AddressResetRequest {
    fn reset_address(&mut self) {
        ADDRESS_RESET.signal(());
    }
}

/// Bus target task
#[embassy_executor::task]
pub async fn bus_task(
    mut i2c: I2c<'static, Async, MultiMaster>,
    watchdog: IndependentWatchdog<'static>,
    address: TargetAddress,
    reset_timeout: WatchdogTimeout,
) {
    info!("Bus task started");

    let mut commands = BoardCommands::new(&MEASUREMENTS);
    let mut registry: CommandRegistry<'_, COMMAND_COUNT> = CommandRegistry::new();
    if let Err(e) = commands.register(&mut registry) {
        error!("Command registration failed: {:?}", e);
        return;
    }

    let mut dispatcher =
        Dispatcher::new(registry, watchdog, AddressResetRequest).with_reset_timeout(reset_timeout);

    let mut frame = [0u8; FRAME_CAPACITY];
    let mut reply_len = 0usize;

    loop {
        let command = match i2c.listen().await {
            Ok(command) => command,
            Err(e) => {
                warn!("Bus listen error: {:?}", I2cBusError::from(e));
                continue;
            }
        };

        match command {
            SlaveCommand {
                kind: SlaveCommandKind::Write,
                address: Address::SevenBit(target),
            } => {
                // A new request discards any reply the master never fetched
                reply_len = 0;
                match i2c.respond_to_write(&mut frame).await {
                    Ok(len) => {
                        trace!("Frame from master: {=[u8]:02x}", &frame[..len]);
                        reply_len = dispatcher.process(target, &mut frame, len);
                    }
                    Err(e) => warn!("Bus receive error: {:?}", I2cBusError::from(e)),
                }

                // Runtime address changes do not exist; configured is default
                if ADDRESS_RESET.try_take().is_some() {
                    info!("Address reset: already on {=u8:#x}", address.current());
                }
            }
            SlaveCommand {
                kind: SlaveCommandKind::Read,
                ..
            } => {
                let reply = &frame[..reply_len];
                reply_len = 0;
                if let Err(e) = i2c.respond_to_read(reply).await {
                    let e = I2cBusError::from(e);
                    if !e.is_benign() {
                        warn!("Bus transmit error: {:?}", e);
                    }
                }
            }
            _ => trace!("Ignoring ten-bit address match"),
        }
    }
}
