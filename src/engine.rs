//! L1: the LW14 transaction engine.
//!
//! Turns one logical `(first_byte, data_byte, reply_len)` request into the
//! sequence of status reads, command writes and reply reads the LW14
//! bridge protocol requires. This is the small, subtle state machine
//! everything else in the crate is built on: five phases, idle-wait
//! through reply fetch, documented on [`LW14Adapter::send_frame`] below.

use crate::error::Error;
use crate::status::{register, StatusByte};
use crate::transport::Transport;

/// Default per-frame timeout, in milliseconds: one frame of Phase D.
pub const DEFAULT_TIMEOUT_MS: u32 = 150;

/// "Long wait" quantum used while polling for an idle bus in Phase A.
const IDLE_POLL_DELAY_US: u32 = 10_000;

/// Idle-poll iterations allowed before Phase A gives up with `BusBusy`.
const IDLE_POLL_MAX_ITERATIONS: u32 = 25;

/// Settling delay after writing the forward frame in Phase C. Required on
/// some hosts to prevent the bridge from overlapping the write with the
/// subsequent status read, which otherwise reports a stale status.
const POST_WRITE_SETTLE_US: u32 = 50_000;

/// Requested length of a backward frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyLength {
    /// No reply expected.
    None,
    /// One reply byte expected.
    One,
}

impl ReplyLength {
    const fn is_none(self) -> bool {
        matches!(self, ReplyLength::None)
    }
}

/// Drives one LW14 bridge over its transport.
///
/// Created once per physical bridge and used for the adapter's lifetime.
/// Not re-entrant across threads: only one transaction may be in flight
/// per bridge at a time; callers sharing one adapter across threads must
/// serialise externally.
#[derive(Debug)]
pub struct LW14Adapter<T: Transport> {
    transport: T,
}

impl<T: Transport> LW14Adapter<T> {
    /// Wraps a transport already addressed to the bridge's I²C slave
    /// address (default `0x23`, see `crate::status::LW14_DEFAULT_ADDRESS`).
    pub fn new(transport: T) -> Self {
        LW14Adapter { transport }
    }

    /// Releases the underlying transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Blocks for `us` microseconds without running a frame. Used by the
    /// commissioning driver to wait for gear to settle on a fresh random
    /// address after `RANDOMISE`, where no reply is expected and no frame
    /// is sent.
    pub fn settle(&mut self, us: u32) {
        self.transport.delay_microseconds(us);
    }

    fn read_status(&mut self) -> Result<StatusByte, Error> {
        let mut buf = [0u8; 1];
        self.transport
            .read_register(register::STATUS, &mut buf)
            .map_err(|_| Error::I2cError)?;
        Ok(StatusByte::from(buf[0]))
    }

    /// Phase A: wait for the bridge to report an idle bus, draining any
    /// stale backward frame left over from a prior, timed-out transaction
    /// along the way.
    fn await_idle(&mut self) -> Result<(), Error> {
        for _ in 0..IDLE_POLL_MAX_ITERATIONS {
            let status = self.read_status()?;

            if status.bus_error() {
                return Err(Error::BusError);
            }

            if status.valid_reply() {
                // A stale backward frame is sitting in the command
                // register; drain it and re-check status without
                // counting this round against the idle-poll budget.
                let mut discard = [0u8; 1];
                let _ = self.transport.read_register(register::COMMAND, &mut discard);
                continue;
            }

            if !status.busy() && !status.reply_timeframe() {
                return Ok(());
            }

            self.transport.delay_microseconds(IDLE_POLL_DELAY_US);
        }

        Err(Error::BusBusy)
    }

    /// Phase B: write the forward frame.
    fn transmit(&mut self, first: u8, data: u8) -> Result<(), Error> {
        self.transport
            .write_register(register::COMMAND, &[first, data])
            .map_err(|_| Error::I2cError)
    }

    /// Phase D: poll status until the frame resolves, classifying each
    /// outcome the status byte can report.
    fn await_completion(
        &mut self,
        reply_len: ReplyLength,
        timeout_ms: u32,
    ) -> Result<bool, Error> {
        let start = self.transport.millis();

        loop {
            let status = self.read_status()?;

            if status.frame_error() {
                return Err(Error::FrameError);
            }
            if status.bus_error() {
                return Err(Error::BusError);
            }
            if status.overrun() {
                return Err(Error::BusError);
            }

            if reply_len.is_none() && !status.busy() {
                return Ok(false);
            }

            if status.valid_reply() {
                return Ok(true);
            }

            if self.transport.millis().wrapping_sub(start) > timeout_ms {
                return Err(Error::Timeout);
            }
        }
    }

    /// Phase E: fetch the backward frame byte.
    fn fetch_reply(&mut self) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.transport
            .read_register(register::COMMAND, &mut buf)
            .map_err(|_| Error::I2cError)?;
        Ok(buf[0])
    }

    /// Runs one complete DALI transaction: `(first, data)` forward frame,
    /// optionally followed by a one-byte backward frame.
    ///
    /// `timeout_ms` bounds Phase D only; Phase A has its own fixed
    /// 25-iteration budget (see `IDLE_POLL_MAX_ITERATIONS`).
    pub fn send_frame(
        &mut self,
        first: u8,
        data: u8,
        reply_len: ReplyLength,
        timeout_ms: u32,
    ) -> Result<Option<u8>, Error> {
        self.await_idle()?;
        self.transmit(first, data)?;
        self.transport.delay_microseconds(POST_WRITE_SETTLE_US);

        let has_reply = self.await_completion(reply_len, timeout_ms)?;
        if has_reply {
            Ok(Some(self.fetch_reply()?))
        } else {
            Ok(None)
        }
    }
}
