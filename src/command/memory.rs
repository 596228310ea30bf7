//! Memory-bank readout: a big-endian unsigned integer assembled from
//! repeated `READ MEMORY LOCATION` queries, with DTR1/DTR0 selecting the
//! bank and starting location.

use super::send_query;
use crate::address::Address;
use crate::engine::LW14Adapter;
use crate::error::Error;
use crate::transport::Transport;

const READ_MEMORY_LOCATION: u8 = 0xC5;

/// Memory bank 0, present on every gear.
pub const MEMORY_BANK_0: u8 = 0;
/// Offset of the 6-byte Global Trade Item Number within bank 0.
pub const OFFSET_GTIN: u8 = 0x03;
/// Offset of the 8-byte gear identification/serial number within bank 0.
pub const OFFSET_GEAR_IDENTIFICATION_NUMBER: u8 = 0x0B;

impl<T: Transport> LW14Adapter<T> {
    /// Reads `length` bytes starting at `(bank, location)` and assembles
    /// them into a big-endian value: `byte[0]` is the most significant.
    ///
    /// `length` must be at most 8 (the widest value this crate names,
    /// the 8-byte gear identification number); larger reads still work
    /// mechanically but the result would not fit in a `u64`.
    pub fn read_memory_bank(
        &mut self,
        address: Address,
        bank: u8,
        location: u8,
        length: u8,
    ) -> Result<u64, Error> {
        self.set_dtr1(bank)?;
        self.set_dtr0(location)?;

        let mut value: u64 = 0;
        for _ in 0..length {
            let byte = send_query(self, address.command_byte(), READ_MEMORY_LOCATION)?;
            value = (value << 8) | u64::from(byte);
        }
        Ok(value)
    }

    /// Reads the 6-byte Global Trade Item Number from memory bank 0.
    pub fn query_memory_bank0_gtin(&mut self, address: Address) -> Result<u64, Error> {
        self.read_memory_bank(address, MEMORY_BANK_0, OFFSET_GTIN, 6)
    }

    /// Reads the 8-byte gear identification number from memory bank 0.
    pub fn query_memory_bank0_gear_identification_number(
        &mut self,
        address: Address,
    ) -> Result<u64, Error> {
        self.read_memory_bank(address, MEMORY_BANK_0, OFFSET_GEAR_IDENTIFICATION_NUMBER, 8)
    }
}
