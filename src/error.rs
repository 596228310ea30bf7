//! The error taxonomy shared by every layer of the core.

use core::fmt;

/// Every way a transaction against the bus can fail.
///
/// Variants are exhaustive and disjoint: exactly one of them describes the
/// outcome of any given [`crate::engine::LW14Adapter::send_frame`] call that
/// does not return `Ok`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The status register never reported completion within the caller's
    /// deadline (Phase D of the transaction engine).
    Timeout,
    /// 25 consecutive idle-polls all showed `busy` or `reply_timeframe`
    /// set (Phase A of the transaction engine).
    BusBusy,
    /// The physical fault bit was set, or a reply overran an unread
    /// previous reply.
    BusError,
    /// The bridge signalled a malformed frame, typically a collision of
    /// multiple gear answering one broadcast query.
    FrameError,
    /// The underlying transport refused a register read or write.
    I2cError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Error::Timeout => "timeout waiting for bus reply",
            Error::BusBusy => "bus busy: bridge never reported idle",
            Error::BusError => "bus error: physical fault or overrun",
            Error::FrameError => "frame error: malformed or colliding frame",
            Error::I2cError => "underlying I2C transport error",
        };
        f.write_str(text)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
