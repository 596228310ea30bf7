#![no_std]

#[macro_use]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod address;
pub mod command;
pub mod commissioning;
pub mod engine;
pub mod error;
#[cfg(feature = "hal")]
pub mod hal;
pub mod light;
pub mod status;
pub mod transport;

pub use address::{Address, SearchAddress};
pub use command::{
    ControlOpcode, DimmingCurve, DimmingCurveResponse, GearTypeResponse, InitialiseMode,
    OperatingModeResponse, PossibleOperatingModesResponse, StatusResponse,
};
pub use commissioning::{commission, CommissionedGear, MAX_SHORT_ADDRESSES};
pub use engine::LW14Adapter;
pub use error::Error;
pub use light::{DimmableLight, Gear};
pub use status::LW14_DEFAULT_ADDRESS;
pub use transport::Transport;
