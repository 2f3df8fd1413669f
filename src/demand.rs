use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::sync::atomic::{AtomicU64, Ordering};

/// Encoding of `Demand::Unlimited` inside an `AtomicDemand`
const UNLIMITED: u64 = u64::MAX;

///
/// The number of elements a subscriber is still willing to receive
///
/// `Unlimited` compares greater than any finite demand. Adding demand saturates at `Unlimited`,
/// and a finite count of `u64::MAX` is treated as unlimited.
///
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Demand {
    /// At most this many more elements may be delivered
    Max(u64),

    /// Any number of elements may be delivered
    Unlimited
}

impl Demand {
    ///
    /// A demand for no further elements
    ///
    pub const fn none() -> Demand {
        Demand::Max(0)
    }

    ///
    /// A demand for no more than `count` further elements
    ///
    pub fn max(count: u64) -> Demand {
        if count == UNLIMITED {
            Demand::Unlimited
        } else {
            Demand::Max(count)
        }
    }

    ///
    /// A demand for every element the publisher can produce
    ///
    pub const fn unlimited() -> Demand {
        Demand::Unlimited
    }

    /// True if this demand permits no further elements
    pub fn is_none(&self) -> bool {
        *self == Demand::Max(0)
    }

    /// True if this demand has no limit
    pub fn is_unlimited(&self) -> bool {
        *self == Demand::Unlimited
    }

    ///
    /// The finite element count, or None if this demand is unlimited
    ///
    pub fn count(&self) -> Option<u64> {
        match self {
            Demand::Max(count)  => Some(*count),
            Demand::Unlimited   => None
        }
    }
}

impl Default for Demand {
    fn default() -> Demand {
        Demand::none()
    }
}

impl Add for Demand {
    type Output = Demand;

    fn add(self, other: Demand) -> Demand {
        match (self, other) {
            (Demand::Max(a), Demand::Max(b))    => a.checked_add(b).map(Demand::max).unwrap_or(Demand::Unlimited),
            _                                   => Demand::Unlimited
        }
    }
}

impl AddAssign for Demand {
    fn add_assign(&mut self, other: Demand) {
        *self = *self + other;
    }
}

impl Sub for Demand {
    type Output = Demand;

    ///
    /// Removes some demand, stopping at zero. Unlimited demand is never reduced, and
    /// subtracting unlimited demand from a finite demand leaves none.
    ///
    fn sub(self, other: Demand) -> Demand {
        match (self, other) {
            (Demand::Unlimited, _)              => Demand::Unlimited,
            (Demand::Max(_), Demand::Unlimited) => Demand::none(),
            (Demand::Max(a), Demand::Max(b))    => Demand::Max(a.saturating_sub(b))
        }
    }
}

impl SubAssign for Demand {
    fn sub_assign(&mut self, other: Demand) {
        *self = *self - other;
    }
}

///
/// Lock-free counter of outstanding demand, shared between the threads that request elements
/// and the thread that is delivering them
///
pub struct AtomicDemand {
    remaining: AtomicU64
}

impl AtomicDemand {
    ///
    /// Creates a counter with no outstanding demand
    ///
    pub fn new() -> AtomicDemand {
        AtomicDemand {
            remaining: AtomicU64::new(0)
        }
    }

    ///
    /// Reads the current outstanding demand
    ///
    pub fn load(&self) -> Demand {
        Demand::max(self.remaining.load(Ordering::Acquire))
    }

    ///
    /// True if at least one more element may be delivered
    ///
    pub fn has_demand(&self) -> bool {
        self.remaining.load(Ordering::Acquire) > 0
    }

    ///
    /// Adds demand to this counter, returning the new total
    ///
    pub fn add(&self, demand: Demand) -> Demand {
        let mut current = self.remaining.load(Ordering::Acquire);

        loop {
            let updated = match Demand::max(current) + demand {
                Demand::Max(count)  => count,
                Demand::Unlimited   => UNLIMITED
            };

            if updated == current {
                return Demand::max(updated);
            }

            match self.remaining.compare_exchange_weak(current, updated, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_)       => { return Demand::max(updated); }
                Err(actual) => { current = actual; }
            }
        }
    }

    ///
    /// Claims the right to deliver a single element. Returns false if there is no outstanding demand.
    ///
    /// Unlimited demand is never used up.
    ///
    pub fn take_one(&self) -> bool {
        let mut current = self.remaining.load(Ordering::Acquire);

        loop {
            if current == UNLIMITED { return true; }
            if current == 0 { return false; }

            match self.remaining.compare_exchange_weak(current, current - 1, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_)       => { return true; }
                Err(actual) => { current = actual; }
            }
        }
    }
}

impl Default for AtomicDemand {
    fn default() -> AtomicDemand {
        AtomicDemand::new()
    }
}
