//! The LW14 I²C register map and the status byte read from register
//! `0x00`.

use bitfield_struct::bitfield;

/// LW14 bridge register addresses (default I²C slave address `0x23`).
pub mod register {
    /// Bus status bit field, read-only, 1 byte.
    pub const STATUS: u8 = 0x00;
    /// Pending forward frame on write (2 bytes: addr, data); latest
    /// backward frame on read (1 byte).
    pub const COMMAND: u8 = 0x01;
    /// Bridge configuration, write-only, 1 byte.
    pub const CONFIG: u8 = 0x02;
    /// Device signature, read-only, 6 bytes.
    pub const SIGNATURE: u8 = 0xF0;
    /// Change bridge I²C address, write-only, 2 bytes.
    pub const ADDRESS: u8 = 0xFE;
}

/// Default I²C slave address of the LW14 bridge.
pub const LW14_DEFAULT_ADDRESS: u8 = 0x23;

/// Bit field decoded from the LW14 status register (`0x00`).
///
/// Bit order is LSB-first, as the LW14 bridge datasheet defines it.
#[bitfield(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusByte {
    /// LSB of the received reply byte count.
    pub reply_count_lsb: bool,
    /// MSB of the received reply byte count.
    pub reply_count_msb: bool,
    /// Less than 22 Te have elapsed since the last forward frame; the
    /// bus is still inside the reply window.
    pub reply_timeframe: bool,
    /// A backward frame has been captured and awaits reading.
    pub valid_reply: bool,
    /// A malformed frame was observed on the bus.
    pub frame_error: bool,
    /// A reply arrived while a previous one was un-read.
    pub overrun: bool,
    /// The bridge is currently driving or sampling a frame.
    pub busy: bool,
    /// A physical fault (short, no power, line stuck) was detected.
    pub bus_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_all_eight_bits() {
        let status = StatusByte::from(0b1010_1010);
        assert!(!status.reply_count_lsb());
        assert!(status.reply_count_msb());
        assert!(!status.reply_timeframe());
        assert!(status.valid_reply());
        assert!(!status.frame_error());
        assert!(status.overrun());
        assert!(!status.busy());
        assert!(status.bus_error());
    }

    #[test]
    fn idle_bus_has_busy_and_reply_timeframe_clear() {
        let status = StatusByte::from(0x00);
        assert!(!status.busy());
        assert!(!status.reply_timeframe());
    }
}
