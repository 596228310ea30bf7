//! L5: a thin trait surface for integrating a single DALI gear into a
//! home-automation layer, independent of any particular framework.
//!
//! Deliberately minimal: this crate stops at the interface a caller's
//! home-automation adapter would implement against, leaving the
//! framework-specific plumbing to that caller.

use crate::address::Address;
use crate::engine::LW14Adapter;
use crate::error::Error;
use crate::transport::Transport;

/// A single dimmable DALI gear addressed by its short address.
pub trait DimmableLight {
    /// Sets the arc power level directly, `0..=254` (`255` is remapped to
    /// `254`; see [`crate::engine::LW14Adapter::direct_arc`] via the
    /// implementation below).
    fn set_level(&mut self, level: u8) -> Result<(), Error>;

    /// Reads the gear's current arc power level.
    fn actual_level(&mut self) -> Result<u8, Error>;

    /// Turns the gear off.
    fn turn_off(&mut self) -> Result<(), Error>;
}

/// Binds one [`Address`] to a shared [`LW14Adapter`], giving it the
/// [`DimmableLight`] surface without owning the adapter.
pub struct Gear<'a, T: Transport> {
    adapter: &'a mut LW14Adapter<T>,
    address: Address,
}

impl<'a, T: Transport> Gear<'a, T> {
    pub fn new(adapter: &'a mut LW14Adapter<T>, address: Address) -> Self {
        Gear { adapter, address }
    }
}

impl<'a, T: Transport> DimmableLight for Gear<'a, T> {
    fn set_level(&mut self, level: u8) -> Result<(), Error> {
        self.adapter.direct_arc(self.address, level)
    }

    fn actual_level(&mut self) -> Result<u8, Error> {
        self.adapter.query_actual_level(self.address)
    }

    fn turn_off(&mut self) -> Result<(), Error> {
        self.adapter.off(self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    #[test]
    fn set_level_issues_direct_arc_on_bound_address() {
        let mut transport = MockTransport::new();
        transport.status_sequence = vec![0x00];
        let mut adapter = LW14Adapter::new(transport);
        let mut gear = Gear::new(&mut adapter, Address::short(5));

        gear.set_level(128).unwrap();
        let writes = adapter.into_inner().writes;
        assert_eq!(writes, vec![(0x01, vec![0x0A, 128])]);
    }

    #[test]
    fn turn_off_issues_off_command() {
        let mut transport = MockTransport::new();
        transport.status_sequence = vec![0x00];
        let mut adapter = LW14Adapter::new(transport);
        let mut gear = Gear::new(&mut adapter, Address::short(5));

        gear.turn_off().unwrap();
        let writes = adapter.into_inner().writes;
        assert_eq!(writes, vec![(0x01, vec![0x0B, 0x00])]);
    }
}
