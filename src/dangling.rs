//! Reading through an address whose allocation has already been freed.
//!
//! A `usize` that once pointed at a heap block carries no ownership. When
//! the owner drops, the block goes back to the allocator and may be handed
//! out again before the stale address is used. Nothing here is sound; the
//! point is to watch it happen.

use std::fmt;
use std::hint::black_box;
use std::ptr;

use log::{debug, warn};

use crate::reinterpret::PlainBits;

/// Written into scratch buffers so a recycled block is recognisable.
pub const CHURN_MARKER: i64 = 0x5a5a_5a5a;

/// An address stripped of type, lifetime and ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawAddress(usize);

impl RawAddress {
    pub fn of<T>(ptr: *const T) -> Self {
        Self(ptr as usize)
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// # Safety
    ///
    /// Never safe in general: the address may be freed, reused, unmapped or
    /// misaligned. Callers accept whatever comes back, or a crash.
    pub unsafe fn read<T: PlainBits>(self) -> T {
        ptr::read_volatile(self.0 as *const T)
    }
}

impl fmt::Display for RawAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Allocates `[1, 2, 3]`, keeps only the address of the first element and
/// lets the vector drop.
pub fn capture_address() -> RawAddress {
    let data = vec![1i64, 2, 3];
    let address = RawAddress::of(data.as_ptr());
    debug!("captured {address} before the vector drops");
    address
}

/// Allocates and frees `rounds` buffers the size of the captured vector.
/// Returns how many of them landed on `address`.
pub fn churn_allocator(address: RawAddress, rounds: usize) -> usize {
    let mut hits = 0;
    for _ in 0..rounds {
        let scratch = black_box(vec![CHURN_MARKER; 3]);
        if RawAddress::of(scratch.as_ptr()) == address {
            hits += 1;
        }
    }
    debug!("allocator handed out {address} {hits} time(s) in {rounds} round(s)");
    hits
}

/// Outcome of one dangling read. `value` means nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DanglingRead {
    pub address: RawAddress,
    pub value: i64,
    pub reused: bool,
}

/// Capture, free, churn, then dereference the stale address.
///
/// A survivor buffer is held across the read, so the result is often the
/// churn marker, often allocator bookkeeping, and sometimes the old `1`.
pub fn dangling_read(churn_rounds: usize) -> DanglingRead {
    let address = capture_address();
    let hits = churn_allocator(address, churn_rounds);
    let survivor = black_box(vec![CHURN_MARKER; 3]);
    let reused = hits > 0 || RawAddress::of(survivor.as_ptr()) == address;

    warn!("reading freed memory at {address}");
    // SAFETY: none. This is a use-after-free on purpose.
    let value = unsafe { address.read::<i64>() };
    drop(survivor);

    DanglingRead {
        address,
        value,
        reused,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_address_round_trip_on_live_value() {
        let live = 77i64;
        let address = RawAddress::of(&live as *const i64);
        assert_eq!(address.get(), &live as *const i64 as usize);
        assert_eq!(unsafe { address.read::<i64>() }, 77);
    }

    #[test]
    fn test_raw_address_display_is_hex() {
        let address = RawAddress::of(0x1000 as *const u8);
        assert_eq!(address.to_string(), "0x1000");
    }

    #[test]
    fn test_capture_address_is_nonzero() {
        assert_ne!(capture_address().get(), 0);
    }

    #[test]
    fn test_churn_counts_at_most_rounds() {
        let address = capture_address();
        assert!(churn_allocator(address, 4) <= 4);
        assert_eq!(churn_allocator(address, 0), 0);
    }

    // Only termination is asserted; the value is undefined.
    #[test]
    fn test_dangling_read_terminates() {
        let outcome = dangling_read(8);
        assert_ne!(outcome.address.get(), 0);
    }
}
