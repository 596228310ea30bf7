//! Control commands (one round-trip, no reply) and Direct Arc Power
//! Control.

use super::send_no_reply;
use crate::address::Address;
use crate::engine::LW14Adapter;
use crate::error::Error;
use crate::transport::Transport;

/// DALI command codes 0-9, sent as `{command_byte(addr), opcode}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ControlOpcode {
    Off = 0x00,
    Up = 0x01,
    Down = 0x02,
    StepUp = 0x03,
    StepDown = 0x04,
    RecallMax = 0x05,
    RecallMin = 0x06,
    StepDownOff = 0x07,
    OnStepUp = 0x08,
    EnableDapcSequence = 0x09,
}

/// Data byte DALI reserves as "stop fading" for direct arc power control.
const DIRECT_ARC_STOP_FADING: u8 = 0xFF;
/// Maximum direct arc power level a gear accepts as a level (as opposed
/// to the reserved `0xFF` "stop fading" value).
const DIRECT_ARC_MAX_LEVEL: u8 = 0xFE;

impl<T: Transport> LW14Adapter<T> {
    /// Sends one of the ten DALI control commands to `address`.
    pub fn control(&mut self, address: Address, opcode: ControlOpcode) -> Result<(), Error> {
        send_no_reply(self, address.command_byte(), opcode as u8)
    }

    pub fn off(&mut self, address: Address) -> Result<(), Error> {
        self.control(address, ControlOpcode::Off)
    }

    pub fn up(&mut self, address: Address) -> Result<(), Error> {
        self.control(address, ControlOpcode::Up)
    }

    pub fn down(&mut self, address: Address) -> Result<(), Error> {
        self.control(address, ControlOpcode::Down)
    }

    pub fn step_up(&mut self, address: Address) -> Result<(), Error> {
        self.control(address, ControlOpcode::StepUp)
    }

    pub fn step_down(&mut self, address: Address) -> Result<(), Error> {
        self.control(address, ControlOpcode::StepDown)
    }

    pub fn recall_max(&mut self, address: Address) -> Result<(), Error> {
        self.control(address, ControlOpcode::RecallMax)
    }

    pub fn recall_min(&mut self, address: Address) -> Result<(), Error> {
        self.control(address, ControlOpcode::RecallMin)
    }

    pub fn step_down_off(&mut self, address: Address) -> Result<(), Error> {
        self.control(address, ControlOpcode::StepDownOff)
    }

    pub fn on_step_up(&mut self, address: Address) -> Result<(), Error> {
        self.control(address, ControlOpcode::OnStepUp)
    }

    pub fn enable_dapc_sequence(&mut self, address: Address) -> Result<(), Error> {
        self.control(address, ControlOpcode::EnableDapcSequence)
    }

    /// Direct Arc Power Control: sets the brightness level directly.
    ///
    /// `power` is the caller's desired `0..=255` level; `255` is remapped
    /// to `254` since the DALI standard reserves `255` as "stop fading".
    /// Use [`LW14Adapter::direct_arc_stop_fading`] to send that literal.
    pub fn direct_arc(&mut self, address: Address, power: u8) -> Result<(), Error> {
        let level = if power == 0xFF {
            DIRECT_ARC_MAX_LEVEL
        } else {
            power
        };
        send_no_reply(self, address.dacp_byte(), level)
    }

    /// Sends the reserved "stop fading" direct arc power value (`0xFF`).
    pub fn direct_arc_stop_fading(&mut self, address: Address) -> Result<(), Error> {
        send_no_reply(self, address.dacp_byte(), DIRECT_ARC_STOP_FADING)
    }
}
