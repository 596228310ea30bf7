//! L4: the commissioning driver.
//!
//! Assigns sequential short addresses `0, 1, 2, ...` to every unaddressed
//! gear on the bus via randomise + binary search on the 24-bit random
//! address (BRN), withdraw and verify.

use alloc::vec::Vec;

use crate::address::{Address, SearchAddress};
use crate::command::InitialiseMode;
use crate::engine::LW14Adapter;
use crate::error::Error;
use crate::transport::Transport;

/// Upper bound on assigned short addresses. A gear that never withdraws
/// could in principle be rediscovered forever, so the outer loop is
/// bounded here rather than run unbounded.
pub const MAX_SHORT_ADDRESSES: u8 = 64;

/// Delay the standard allows gear to settle on their random address
/// after `RANDOMISE`.
const RANDOMISE_SETTLE_US: u32 = 100_000;

/// One gear successfully commissioned during a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommissionedGear {
    /// The short address programmed onto the gear.
    pub short_address: u8,
    /// The random address (BRN) this gear was selected by.
    pub random_address: SearchAddress,
    /// The gear identification number read from memory bank 0 for
    /// auditing, if it could be read.
    pub identification_number: Option<u64>,
}

/// Assigns short addresses to every unaddressed gear on the bus: turns
/// everything off, erases existing short addresses, terminates,
/// initialises, randomises, then repeatedly binary-searches for the
/// smallest remaining random address, withdraws it, programs the next
/// short address, and verifies.
pub fn commission<T: Transport>(
    adapter: &mut LW14Adapter<T>,
) -> Result<Vec<CommissionedGear>, Error> {
    adapter.off(Address::Broadcast)?;

    adapter.set_dtr0(0xFF)?;
    adapter.store_dtr_as_short_address(Address::Broadcast)?;

    adapter.terminate()?;
    adapter.initialise(InitialiseMode::All)?;
    adapter.randomise()?;
    // Give gear time to settle on their random address before searching.
    adapter.settle(RANDOMISE_SETTLE_US);

    let mut gear = Vec::new();
    let mut short_address: u8 = 0;

    while short_address < MAX_SHORT_ADDRESSES {
        let mut candidate: u32 = 0;

        for bit_index in (0..24).rev() {
            let bit = 1u32 << bit_index;
            let probe = SearchAddress::new(candidate | bit);

            adapter.search_addrs(probe)?;
            match adapter.compare() {
                Ok(true) => {
                    // At least one gear has BRN <= probe: tighten the
                    // upper bound by leaving the bit clear.
                }
                Ok(false) => {
                    // No gear at or below probe: raise the lower bound.
                    candidate |= bit;
                }
                Err(Error::FrameError) => {
                    // Multiple gear answered at once, which implies
                    // "yes": leave the bit clear, same as Ok(true).
                }
                Err(err) => return Err(err),
            }
        }

        if candidate == SearchAddress::MAX.value() {
            // No gear remains with an unassigned short address.
            break;
        }

        let found = SearchAddress::new(candidate + 1);

        adapter.search_addrs(found)?;
        if !adapter.compare()? {
            // A gear may have powered off mid-search; skip and retry
            // from the top of the outer loop rather than aborting.
            continue;
        }

        adapter.search_addrs(found)?;
        adapter.withdraw()?;

        adapter.search_addrs(found)?;
        if adapter.compare()? {
            // Gear did not withdraw. Ignore and continue: it will be
            // re-found (or skipped again) on the next outer iteration.
            continue;
        }

        adapter.program_short_address(short_address)?;

        if !adapter.verify_short_address(Address::short(short_address))? {
            continue;
        }

        let identification_number = adapter
            .query_memory_bank0_gear_identification_number(Address::short(short_address))
            .ok();

        gear.push(CommissionedGear {
            short_address,
            random_address: found,
            identification_number,
        });

        short_address += 1;
    }

    adapter.terminate()?;

    Ok(gear)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockTransport, Transport};

    /// A status-only wrapper whose clock advances 200ms on every read, so
    /// that any query this test issues (`Compare`, `VerifyShortAddress`)
    /// times out after one poll instead of spinning forever against a
    /// mock whose clock never otherwise moves on its own.
    struct FastTimeout {
        inner: MockTransport,
        clock_ms: u32,
    }

    impl Transport for FastTimeout {
        type Error = ();

        fn read_register(&mut self, register: u8, buf: &mut [u8]) -> Result<(), ()> {
            self.inner.read_register(register, buf)
        }

        fn write_register(&mut self, register: u8, data: &[u8]) -> Result<(), ()> {
            self.inner.write_register(register, data)
        }

        fn delay_microseconds(&mut self, us: u32) {
            self.inner.delay_microseconds(us)
        }

        fn millis(&mut self) -> u32 {
            self.clock_ms += 200;
            self.clock_ms
        }
    }

    #[test]
    fn binary_search_arithmetic_converges_on_injected_brn() {
        let brn: u32 = 0x123456;
        let mut candidate: u32 = 0;
        for bit_index in (0..24).rev() {
            let bit = 1u32 << bit_index;
            let probe = candidate | bit;
            let compare_true = probe >= brn;
            if compare_true {
                // keep bit clear
            } else {
                candidate |= bit;
            }
        }
        assert_eq!(candidate, brn - 1);
        assert_eq!(candidate + 1, brn);
    }

    #[test]
    fn no_remaining_gear_is_all_ones() {
        assert_eq!(SearchAddress::MAX.value(), 0x00FF_FFFF);
    }

    #[test]
    fn commission_with_no_gear_returns_empty_and_terminates() {
        // Every Compare folds to false (Timeout), since no gear ever
        // answers; commissioning must stop after the first outer
        // iteration's binary search saturates to candidate == MAX.
        let mut transport = MockTransport::new();
        transport.status_sequence = vec![0x00]; // idle forever, no replies
        let wrapped = FastTimeout {
            inner: transport,
            clock_ms: 0,
        };
        let mut adapter = LW14Adapter::new(wrapped);

        let result = commission(&mut adapter).unwrap();
        assert!(result.is_empty());
    }
}
