//! Query commands (one round-trip, one-byte reply) and the structured
//! responses their replies decode into.

use bitfield_struct::bitfield;

use super::send_query;
use crate::address::Address;
use crate::engine::LW14Adapter;
use crate::error::Error;
use crate::transport::Transport;

const QUERY_STATUS: u8 = 0x90;
const QUERY_ACTUAL_LEVEL: u8 = 0xA0;
const QUERY_GEAR_TYPE: u8 = 0xED;
const QUERY_DIMMING_CURVE: u8 = 0xEE;
const QUERY_POSSIBLE_OPERATING_MODES: u8 = 0xEF;
const QUERY_FEATURES: u8 = 0xF0;
const QUERY_FAILURE_STATUS: u8 = 0xF1;
const QUERY_SHORT_CIRCUIT: u8 = 0xF2;
const QUERY_OPERATING_MODE: u8 = 0xFC;

/// Reply to `QUERY STATUS` (opcode `0x90`).
#[bitfield(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusResponse {
    pub status_ok: bool,
    pub lamp_failure: bool,
    pub lamp_arc_power_on: bool,
    pub limit_error: bool,
    pub fade_ready: bool,
    pub reset_state: bool,
    pub missing_short_address: bool,
    pub power_failure: bool,
}

/// Reply to `QUERY GEAR TYPE` (opcode `0xED`); only the low 4 bits are
/// defined.
#[bitfield(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GearTypeResponse {
    pub led_supply_integrated: bool,
    pub led_module_integrated: bool,
    pub ac_supply: bool,
    pub dc_supply: bool,
    #[bits(4)]
    __reserved: u8,
}

/// Reply to `QUERY DIMMING CURVE` (opcode `0xEE`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DimmingCurveResponse {
    Logarithmic,
    Linear,
    /// A value outside the two defined curves; carries the raw byte.
    Unknown(u8),
}

impl From<u8> for DimmingCurveResponse {
    fn from(byte: u8) -> Self {
        match byte {
            0 => DimmingCurveResponse::Logarithmic,
            1 => DimmingCurveResponse::Linear,
            other => DimmingCurveResponse::Unknown(other),
        }
    }
}

/// Reply to `QUERY POSSIBLE OPERATING MODES` (opcode `0xEF`).
#[bitfield(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PossibleOperatingModesResponse {
    pub pwm: bool,
    pub am: bool,
    pub output_current_regulated: bool,
    pub high_current_pulse: bool,
    #[bits(4)]
    __reserved: u8,
}

/// Reply to `QUERY OPERATING MODE` (opcode `0xFC`).
#[bitfield(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OperatingModeResponse {
    pub pwm_active: bool,
    pub am_active: bool,
    pub output_current_regulated: bool,
    pub high_current_pulse_active: bool,
    pub non_logarithmic_dimming_active: bool,
    #[bits(3)]
    __reserved: u8,
}

impl<T: Transport> LW14Adapter<T> {
    /// `QUERY STATUS` (`0x90`): status bits and lamp/limit/fade state.
    pub fn query_status(&mut self, address: Address) -> Result<StatusResponse, Error> {
        send_query(self, address.command_byte(), QUERY_STATUS).map(StatusResponse::from)
    }

    /// `QUERY ACTUAL LEVEL` (`0xA0`): the gear's current arc power level.
    pub fn query_actual_level(&mut self, address: Address) -> Result<u8, Error> {
        send_query(self, address.command_byte(), QUERY_ACTUAL_LEVEL)
    }

    /// `QUERY GEAR TYPE` (`0xED`).
    pub fn query_gear_type(&mut self, address: Address) -> Result<GearTypeResponse, Error> {
        send_query(self, address.command_byte(), QUERY_GEAR_TYPE).map(GearTypeResponse::from)
    }

    /// `QUERY DIMMING CURVE` (`0xEE`).
    pub fn query_dimming_curve(&mut self, address: Address) -> Result<DimmingCurveResponse, Error> {
        send_query(self, address.command_byte(), QUERY_DIMMING_CURVE)
            .map(DimmingCurveResponse::from)
    }

    /// `QUERY POSSIBLE OPERATING MODES` (`0xEF`).
    pub fn query_possible_operating_modes(
        &mut self,
        address: Address,
    ) -> Result<PossibleOperatingModesResponse, Error> {
        send_query(self, address.command_byte(), QUERY_POSSIBLE_OPERATING_MODES)
            .map(PossibleOperatingModesResponse::from)
    }

    /// `QUERY OPERATING MODE` (`0xFC`).
    pub fn query_operating_mode(&mut self, address: Address) -> Result<OperatingModeResponse, Error> {
        send_query(self, address.command_byte(), QUERY_OPERATING_MODE).map(OperatingModeResponse::from)
    }

    /// `QUERY FEATURES` (`0xF0`): raw, undecoded feature byte.
    pub fn query_features(&mut self, address: Address) -> Result<u8, Error> {
        send_query(self, address.command_byte(), QUERY_FEATURES)
    }

    /// `QUERY FAILURE STATUS` (`0xF1`): raw, undecoded failure byte.
    pub fn query_failure_status(&mut self, address: Address) -> Result<u8, Error> {
        send_query(self, address.command_byte(), QUERY_FAILURE_STATUS)
    }

    /// `QUERY SHORT CIRCUIT` (`0xF2`): reply `0xFF` means "yes".
    pub fn query_short_circuit(&mut self, address: Address) -> Result<bool, Error> {
        send_query(self, address.command_byte(), QUERY_SHORT_CIRCUIT).map(|byte| byte == 0xFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    #[test]
    fn query_status_decodes_all_bits() {
        let mut transport = MockTransport::new();
        transport.status_sequence = vec![0x00, 0b0000_1000];
        transport.reply_byte = 0b0101_0101;
        let mut adapter = LW14Adapter::new(transport);

        let result = adapter.query_status(Address::short(10)).unwrap();
        assert!(result.status_ok());
        assert!(!result.lamp_failure());
        assert!(result.lamp_arc_power_on());
        assert!(!result.limit_error());
        assert!(result.fade_ready());
        assert!(!result.reset_state());
        assert!(result.missing_short_address());
        assert!(!result.power_failure());
    }

    #[test]
    fn query_status_sends_command_byte_and_opcode() {
        let mut transport = MockTransport::new();
        transport.status_sequence = vec![0x00, 0b0000_1000];
        let mut adapter = LW14Adapter::new(transport);
        adapter.query_status(Address::short(10)).unwrap();
        let writes = adapter.into_inner().writes;
        assert_eq!(writes, vec![(0x01, vec![0x15, 0x90])]);
    }

    #[test]
    fn query_status_timeout_propagates() {
        let mut transport = MockTransport::new();
        transport.status_sequence = vec![0x00]; // never sets valid_reply
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
        let result = adapter.query_status(Address::short(10));
        assert_eq!(result, Err(Error::Timeout));
    }

    #[test]
    fn dimming_curve_decodes_known_values() {
        assert_eq!(DimmingCurveResponse::from(0), DimmingCurveResponse::Logarithmic);
        assert_eq!(DimmingCurveResponse::from(1), DimmingCurveResponse::Linear);
        assert_eq!(DimmingCurveResponse::from(7), DimmingCurveResponse::Unknown(7));
    }

    #[test]
    fn gear_type_decodes_low_four_bits() {
        let response = GearTypeResponse::from(0b0000_1011);
        assert!(response.led_supply_integrated());
        assert!(response.led_module_integrated());
        assert!(!response.ac_supply());
        assert!(response.dc_supply());
    }

    #[test]
    fn operating_mode_decodes_all_named_bits() {
        let response = OperatingModeResponse::from(0xFF);
        assert!(response.pwm_active());
        assert!(response.am_active());
        assert!(response.output_current_regulated());
        assert!(response.high_current_pulse_active());
        assert!(response.non_logarithmic_dimming_active());
    }
}
