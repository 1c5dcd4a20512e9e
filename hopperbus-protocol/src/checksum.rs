//! CRC-8 (CCITT polynomial) frame checksum
//!
//! Polynomial 0x07, initial value 0, MSB first, no final XOR. Appending the
//! checksum of a byte range to that range makes the checksum of the whole
//! thing zero, which is how frames are validated.

/// Generator polynomial x^8 + x^2 + x + 1
pub const POLYNOMIAL: u8 = 0x07;

/// Feed one byte into a running checksum
pub const fn update(crc: u8, byte: u8) -> u8 {
    let mut data = crc ^ byte;
    let mut bit = 0;
    while bit < 8 {
        data = if data & 0x80 != 0 {
            (data << 1) ^ POLYNOMIAL
        } else {
            data << 1
        };
        bit += 1;
    }
    data
}

/// Checksum over all of `data`
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0, |crc, &byte| update(crc, byte))
}
