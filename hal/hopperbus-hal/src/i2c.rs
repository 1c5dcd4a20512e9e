//! I2C bus target abstractions
//!
//! The board never drives the bus. It answers as a target on one 7-bit
//! address and additionally listens to general calls.

/// Address that broadcast ("general call") transfers are sent to
pub const GENERAL_CALL_ADDRESS: u8 = 0x00;

/// Default target address of the board
pub const DEFAULT_TARGET_ADDRESS: u8 = 0x08;

/// Errors from target address handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressError {
    /// Address is in one of the reserved 7-bit ranges (0x00-0x07, 0x78-0x7F)
    Reserved,
    /// Address does not fit in 7 bits
    OutOfRange,
}

/// Check that a 7-bit address may be used as a target address
pub fn validate_target_address(address: u8) -> Result<(), AddressError> {
    match address {
        0x80..=0xFF => Err(AddressError::OutOfRange),
        0x00..=0x07 | 0x78..=0x7F => Err(AddressError::Reserved),
        _ => Ok(()),
    }
}

/// Bus-address reset operation
///
/// Invoked by the protocol when a general call asks every device to drop
/// back to its default address. What "default" means is up to the
/// transport implementing this.
pub trait AddressReset {
    /// Revert the target address to its default
    fn reset_address(&mut self);
}

/// Validated 7-bit address the target answers on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TargetAddress(u8);

impl TargetAddress {
    /// Check `address` and wrap it
    pub fn new(address: u8) -> Result<Self, AddressError> {
        validate_target_address(address)?;
        Ok(Self(address))
    }

    /// Address the target answers on
    pub fn current(&self) -> u8 {
        self.0
    }
}

impl Default for TargetAddress {
    fn default() -> Self {
        Self(DEFAULT_TARGET_ADDRESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_addresses() {
        assert_eq!(validate_target_address(GENERAL_CALL_ADDRESS), Err(AddressError::Reserved));
        assert_eq!(validate_target_address(0x07), Err(AddressError::Reserved));
        assert_eq!(validate_target_address(0x78), Err(AddressError::Reserved));
        assert_eq!(validate_target_address(0x80), Err(AddressError::OutOfRange));
        assert_eq!(validate_target_address(0x08), Ok(()));
        assert_eq!(validate_target_address(0x77), Ok(()));
    }

    #[test]
    fn test_new_rejects_general_call() {
        assert_eq!(TargetAddress::new(0), Err(AddressError::Reserved));
    }

    #[test]
    fn test_new_keeps_valid_address() {
        assert_eq!(TargetAddress::new(0x42).map(|a| a.current()), Ok(0x42));
        assert_eq!(TargetAddress::new(0x78), Err(AddressError::Reserved));
        assert_eq!(TargetAddress::new(0x80), Err(AddressError::OutOfRange));
    }

    #[test]
    fn test_default_address() {
        assert_eq!(TargetAddress::default().current(), DEFAULT_TARGET_ADDRESS);
        assert_eq!(validate_target_address(DEFAULT_TARGET_ADDRESS), Ok(()));
    }
}
