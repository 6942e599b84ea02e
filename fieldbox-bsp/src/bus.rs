//! Shared-bus arbitration
//!
//! Every chip on the board hangs off the same I2C bus, and a chip
//! transaction sequence (configure + trigger + read, or a whole sampling
//! burst) must not interleave with another user's sequence. The arbiter
//! wraps the bus in a blocking mutex with closure-scoped acquisition, so
//! the lock is released on every exit path.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Exclusive owner of the shared I2C bus
///
/// `M` selects the locking discipline: `CriticalSectionRawMutex` when the
/// bus is shared across executors or interrupts, `NoopRawMutex` for
/// single-context use and host tests.
///
/// Not reentrant: code running inside [`with_bus`](Self::with_bus) must
/// not call back into another bus operation, or it will deadlock. That is
/// a caller discipline, not something the arbiter can detect.
pub struct BusArbiter<M: RawMutex, BUS> {
    inner: Mutex<M, RefCell<BUS>>,
}

impl<M: RawMutex, BUS> BusArbiter<M, BUS> {
    /// Take ownership of the bus
    pub fn new(bus: BUS) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(bus)),
        }
    }

    /// Run `f` with exclusive access to the bus
    ///
    /// Blocks without timeout until the bus is free. The lock is held for
    /// exactly the duration of `f` and released unconditionally.
    pub fn with_bus<R>(&self, f: impl FnOnce(&mut BUS) -> R) -> R {
        self.inner.lock(|bus| f(&mut bus.borrow_mut()))
    }

    /// Consume the arbiter and hand the bus back
    pub fn release(self) -> BUS {
        self.inner.into_inner().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn scoped_access_mutates_the_bus() {
        let arbiter: BusArbiter<NoopRawMutex, u32> = BusArbiter::new(0);
        arbiter.with_bus(|bus| *bus += 1);
        let result = arbiter.with_bus(|bus| {
            *bus += 1;
            *bus
        });
        assert_eq!(result, 2);
        assert_eq!(arbiter.release(), 2);
    }
}
