//! Special addressing commands used for DTR access and commissioning:
//! `DTR0`/`DTR1`, `TERMINATE`, `INITIALISE`, `RANDOMISE`, `COMPARE`,
//! `WITHDRAW`, the `SEARCHADDR` triplet, `PROGRAM SHORT ADDRESS` and
//! `VERIFY SHORT ADDRESS`.
//!
//! These commands carry pre-assigned first-byte literals and bypass the
//! `Address` codec entirely: they address "whatever gear is currently
//! selected by the addressing state machine", not a short address or
//! broadcast.

use super::{send_no_reply, send_query_fold_timeout};
use crate::address::{Address, SearchAddress};
use crate::engine::LW14Adapter;
use crate::error::Error;
use crate::transport::Transport;

/// First-byte literals for the DALI special commands this crate uses.
pub mod opcode {
    pub const DTR0: u8 = 0xA3;
    pub const TERMINATE: u8 = 0xA1;
    pub const INITIALISE: u8 = 0xA5;
    pub const RANDOMISE: u8 = 0xA7;
    pub const COMPARE: u8 = 0xA9;
    pub const WITHDRAW: u8 = 0xAB;
    pub const SEARCHADDRH: u8 = 0xB1;
    pub const SEARCHADDRM: u8 = 0xB3;
    pub const SEARCHADDRL: u8 = 0xB5;
    pub const PROGRAM_SHORT_ADDRESS: u8 = 0xB7;
    pub const VERIFY_SHORT_ADDRESS: u8 = 0xB9;
    pub const DTR1: u8 = 0xC3;
    pub const SELECT_DIMMING_CURVE: u8 = 0xE3;
}

/// Data byte sent with `PROGRAM SHORT ADDRESS` to delete a gear's short
/// address instead of assigning one.
const PROGRAM_SHORT_ADDRESS_DELETE: u8 = 0xFF;

/// The command byte a gear sets its DTR0 to when that DTR0 value is then
/// stored as the gear's short address via `STORE DTR AS SHORT ADDRESS`.
const STORE_DTR_AS_SHORT_ADDRESS: u8 = 0x80;

/// Who should react to `INITIALISE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitialiseMode {
    /// All control gear react.
    All,
    /// Only gear that currently have no short address react.
    New,
    /// Only the named gear reacts.
    Gear(Address),
}

impl InitialiseMode {
    const fn data_byte(self) -> u8 {
        match self {
            InitialiseMode::All => 0x00,
            InitialiseMode::New => 0xFF,
            InitialiseMode::Gear(address) => address.command_byte(),
        }
    }
}

/// The dimming curve a gear should use, as set by `SELECT DIMMING CURVE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DimmingCurve {
    Logarithmic = 0,
    Linear = 1,
}

impl<T: Transport> LW14Adapter<T> {
    /// Sets DTR0 to `value`.
    pub fn set_dtr0(&mut self, value: u8) -> Result<(), Error> {
        send_no_reply(self, opcode::DTR0, value)
    }

    /// Sets DTR1 to `value`.
    pub fn set_dtr1(&mut self, value: u8) -> Result<(), Error> {
        send_no_reply(self, opcode::DTR1, value)
    }

    /// `STORE DTR AS SHORT ADDRESS` (opcode `0x80`): the DALI standard
    /// mandates sending this command twice within roughly 100ms; this
    /// sends two back-to-back identical frames with no interleaving.
    pub fn store_dtr_as_short_address(&mut self, address: Address) -> Result<(), Error> {
        send_no_reply(self, address.command_byte(), STORE_DTR_AS_SHORT_ADDRESS)?;
        send_no_reply(self, address.command_byte(), STORE_DTR_AS_SHORT_ADDRESS)
    }

    /// `TERMINATE`: cancels any addressing mode currently in progress.
    pub fn terminate(&mut self) -> Result<(), Error> {
        send_no_reply(self, opcode::TERMINATE, 0x00)
    }

    /// `INITIALISE`: puts the selected gear into commissioning mode for
    /// 15 minutes. Sent twice, per the DALI standard.
    pub fn initialise(&mut self, mode: InitialiseMode) -> Result<(), Error> {
        send_no_reply(self, opcode::INITIALISE, mode.data_byte())?;
        send_no_reply(self, opcode::INITIALISE, mode.data_byte())
    }

    /// `RANDOMISE`: every initialised gear picks a fresh 24-bit random
    /// address (BRN). Sent twice, per the DALI standard.
    pub fn randomise(&mut self) -> Result<(), Error> {
        send_no_reply(self, opcode::RANDOMISE, 0x00)?;
        send_no_reply(self, opcode::RANDOMISE, 0x00)
    }

    /// `COMPARE`: "is there a gear whose BRN is less than or equal to the
    /// current SEARCHADDR?" A reply of `0xFF` means yes; a `Timeout`
    /// (no gear answered) is folded into `Ok(false)`.
    pub fn compare(&mut self) -> Result<bool, Error> {
        send_query_fold_timeout(self, opcode::COMPARE, 0x00)
    }

    /// `WITHDRAW`: removes the currently selected gear from future
    /// `COMPARE` answers.
    pub fn withdraw(&mut self) -> Result<(), Error> {
        send_no_reply(self, opcode::WITHDRAW, 0x00)
    }

    /// Sets the 24-bit `SEARCHADDR` used by `COMPARE` and `WITHDRAW`.
    pub fn search_addrs(&mut self, address: SearchAddress) -> Result<(), Error> {
        send_no_reply(self, opcode::SEARCHADDRH, address.h())?;
        send_no_reply(self, opcode::SEARCHADDRM, address.m())?;
        send_no_reply(self, opcode::SEARCHADDRL, address.l())
    }

    /// `PROGRAM SHORT ADDRESS`: assigns `short` (masked to `0..=63`) to
    /// the currently selected gear.
    pub fn program_short_address(&mut self, short: u8) -> Result<(), Error> {
        send_no_reply(
            self,
            opcode::PROGRAM_SHORT_ADDRESS,
            Address::short(short).command_byte(),
        )
    }

    /// `PROGRAM SHORT ADDRESS` with the "delete" data byte: removes the
    /// currently selected gear's short address.
    pub fn program_short_address_delete(&mut self) -> Result<(), Error> {
        send_no_reply(self, opcode::PROGRAM_SHORT_ADDRESS, PROGRAM_SHORT_ADDRESS_DELETE)
    }

    /// `VERIFY SHORT ADDRESS`: asks the currently selected gear whether
    /// its short address equals `address`. A `Timeout` is folded into
    /// `Ok(false)`, matching `compare`.
    pub fn verify_short_address(&mut self, address: Address) -> Result<bool, Error> {
        send_query_fold_timeout(self, opcode::VERIFY_SHORT_ADDRESS, address.command_byte())
    }

    /// `SELECT DIMMING CURVE`: a DTR0-prefixed command. Loads `curve` into
    /// DTR0, then sends the command with no reply expected; an error on
    /// the DTR0 write aborts before the second frame is sent.
    pub fn select_dimming_curve(&mut self, address: Address, curve: DimmingCurve) -> Result<(), Error> {
        self.set_dtr0(curve as u8)?;
        send_no_reply(self, address.command_byte(), opcode::SELECT_DIMMING_CURVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    fn adapter() -> LW14Adapter<MockTransport> {
        let mut transport = MockTransport::new();
        transport.status_sequence = vec![0x00];
        LW14Adapter::new(transport)
    }

    #[test]
    fn terminate_writes_literal_frame() {
        let mut adapter = adapter();
        adapter.terminate().unwrap();
        let writes = adapter.into_inner().writes;
        assert_eq!(writes, vec![(0x01, vec![0xA1, 0x00])]);
    }

    #[test]
    fn store_dtr_as_short_address_sends_two_identical_frames() {
        let mut adapter = adapter();
        adapter.store_dtr_as_short_address(Address::Broadcast).unwrap();
        let writes = adapter.into_inner().writes;
        assert_eq!(
            writes,
            vec![(0x01, vec![0xFF, 0x80]), (0x01, vec![0xFF, 0x80])]
        );
    }

    #[test]
    fn initialise_all_sends_two_frames() {
        let mut adapter = adapter();
        adapter.initialise(InitialiseMode::All).unwrap();
        let writes = adapter.into_inner().writes;
        assert_eq!(
            writes,
            vec![(0x01, vec![0xA5, 0x00]), (0x01, vec![0xA5, 0x00])]
        );
    }

    #[test]
    fn initialise_new_uses_0xff_data_byte() {
        let mut adapter = adapter();
        adapter.initialise(InitialiseMode::New).unwrap();
        let writes = adapter.into_inner().writes;
        assert_eq!(writes[0], (0x01, vec![0xA5, 0xFF]));
    }

    #[test]
    fn compare_folds_timeout_to_false() {
        let mut transport = MockTransport::new();
        transport.status_sequence = vec![0x00]; // never a valid_reply
        struct NeverAdvancing(MockTransport, u32);
        impl crate::transport::Transport for NeverAdvancing {
            type Error = ();
            fn read_register(&mut self, r: u8, b: &mut [u8]) -> Result<(), ()> {
                self.0.read_register(r, b)
            }
            fn write_register(&mut self, r: u8, d: &[u8]) -> Result<(), ()> {
                self.0.write_register(r, d)
            }
            fn delay_microseconds(&mut self, us: u32) {
                self.0.delay_microseconds(us)
            }
            fn millis(&mut self) -> u32 {
                self.1 += 200;
                self.1
            }
        }
        let mut adapter = LW14Adapter::new(NeverAdvancing(transport, 0));
        assert_eq!(adapter.compare(), Ok(false));
    }

    #[test]
    fn compare_true_on_0xff_reply() {
        let mut transport = MockTransport::new();
        transport.status_sequence = vec![0x00, 0b0000_1000];
        transport.reply_byte = 0xFF;
        let mut adapter = LW14Adapter::new(transport);
        assert_eq!(adapter.compare(), Ok(true));
    }

    #[test]
    fn search_addrs_writes_three_frames_in_order() {
        let mut adapter = adapter();
        adapter.search_addrs(SearchAddress::new(0xDEAD21)).unwrap();
        let writes = adapter.into_inner().writes;
        assert_eq!(
            writes,
            vec![
                (0x01, vec![0xB1, 0xDE]),
                (0x01, vec![0xB3, 0xAD]),
                (0x01, vec![0xB5, 0x21]),
            ]
        );
    }

    #[test]
    fn program_short_address_masks_to_six_bits() {
        let mut adapter = adapter();
        adapter.program_short_address(10).unwrap();
        let writes = adapter.into_inner().writes;
        assert_eq!(writes, vec![(0x01, vec![0xB7, 0x15])]);
    }

    #[test]
    fn select_dimming_curve_loads_dtr0_then_sends_command() {
        let mut adapter = adapter();
        adapter
            .select_dimming_curve(Address::short(10), DimmingCurve::Linear)
            .unwrap();
        let writes = adapter.into_inner().writes;
        assert_eq!(
            writes,
            vec![(0x01, vec![0xA3, 0x01]), (0x01, vec![0x15, 0xE3])]
        );
    }
}
