//! L3: the DALI command codec.
//!
//! Three command shapes are layered over [`crate::engine::LW14Adapter`]
//! and [`crate::address::Address`]: control commands (one round-trip, no
//! reply), queries (one round-trip, one-byte reply, decoded into a typed
//! response) and DTR-prefixed commands (two round-trips). Each command is
//! a method on `LW14Adapter<T>`, grouped by family into a submodule:
//! methods on the adapter rather than free functions, with no gear-local
//! mutable state — every method takes the target
//! [`crate::address::Address`] as a plain argument.

pub mod control;
pub mod memory;
pub mod query;
pub mod special;

pub use control::ControlOpcode;
pub use memory::{MEMORY_BANK_0, OFFSET_GEAR_IDENTIFICATION_NUMBER, OFFSET_GTIN};
pub use query::{
    DimmingCurveResponse, GearTypeResponse, OperatingModeResponse, PossibleOperatingModesResponse,
    StatusResponse,
};
pub use special::{DimmingCurve, InitialiseMode};

use crate::engine::{LW14Adapter, ReplyLength, DEFAULT_TIMEOUT_MS};
use crate::error::Error;
use crate::transport::Transport;

/// Writes one forward frame, expecting no reply. Shared by control
/// commands and every special addressing command.
pub(crate) fn send_no_reply<T: Transport>(
    adapter: &mut LW14Adapter<T>,
    first: u8,
    data: u8,
) -> Result<(), Error> {
    adapter
        .send_frame(first, data, ReplyLength::None, DEFAULT_TIMEOUT_MS)
        .map(|_| ())
}

/// Writes one forward frame, expecting one reply byte.
pub(crate) fn send_query<T: Transport>(
    adapter: &mut LW14Adapter<T>,
    first: u8,
    data: u8,
) -> Result<u8, Error> {
    match adapter.send_frame(first, data, ReplyLength::One, DEFAULT_TIMEOUT_MS)? {
        Some(byte) => Ok(byte),
        None => Err(Error::Timeout),
    }
}

/// `Compare` and `VerifyShortAddress` interpret a reply of `0xFF` as
/// "yes" and a bus `Timeout` as logical "no" rather than an error. Every
/// other error still propagates. This is folded in here, at the query
/// layer, rather than overloading a generic optional at the engine
/// layer, since only these two commands give `Timeout` that meaning.
pub(crate) fn send_query_fold_timeout<T: Transport>(
    adapter: &mut LW14Adapter<T>,
    first: u8,
    data: u8,
) -> Result<bool, Error> {
    match send_query(adapter, first, data) {
        Ok(byte) => Ok(byte == 0xFF),
        Err(Error::Timeout) => Ok(false),
        Err(err) => Err(err),
    }
}
