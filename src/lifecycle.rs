use std::sync::atomic::{AtomicU8, Ordering};

///
/// The states a subscription passes through
///
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LifecycleState {
    /// Constructed but not yet handed to the subscriber
    Pending,

    /// Handed to the subscriber: demand may flow
    Active,

    /// The producer has claimed the right to send its final elements and completion
    Completing,

    /// Cancelled or completed: every further call is a no-op
    Terminated
}

impl LifecycleState {
    fn to_raw(self) -> u8 {
        match self {
            LifecycleState::Pending     => 0,
            LifecycleState::Active      => 1,
            LifecycleState::Completing  => 2,
            LifecycleState::Terminated  => 3
        }
    }

    fn from_raw(raw: u8) -> LifecycleState {
        match raw {
            0 => LifecycleState::Pending,
            1 => LifecycleState::Active,
            2 => LifecycleState::Completing,
            _ => LifecycleState::Terminated
        }
    }
}

///
/// A single atomic cell tracking the state of a subscription
///
/// Every transition is one compare-and-swap, so when several threads race to move a subscription
/// out of `Active` (eg, one cancelling and one delivering) exactly one of them succeeds and the
/// others see the state it left behind.
///
pub struct SubscriptionLifecycle {
    state: AtomicU8
}

impl SubscriptionLifecycle {
    ///
    /// Creates a lifecycle in the `Pending` state
    ///
    pub fn new() -> SubscriptionLifecycle {
        SubscriptionLifecycle {
            state: AtomicU8::new(LifecycleState::Pending.to_raw())
        }
    }

    ///
    /// Reads the current state
    ///
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// True once the subscription has been cancelled or has completed
    pub fn is_terminated(&self) -> bool {
        self.state() == LifecycleState::Terminated
    }

    /// True while demand may be requested and delivered
    pub fn is_active(&self) -> bool {
        self.state() == LifecycleState::Active
    }

    ///
    /// Moves between two states, returning true if this call made the transition
    ///
    pub fn transition(&self, from: LifecycleState, to: LifecycleState) -> bool {
        self.state.compare_exchange(from.to_raw(), to.to_raw(), Ordering::AcqRel, Ordering::Acquire).is_ok()
    }

    ///
    /// Pending -> Active. Succeeds at most once, so the subscription is handed over at most once.
    ///
    pub fn activate(&self) -> bool {
        self.transition(LifecycleState::Pending, LifecycleState::Active)
    }

    ///
    /// Active -> Completing: the caller wins the right to deliver the terminal sequence
    ///
    pub fn begin_completing(&self) -> bool {
        self.transition(LifecycleState::Active, LifecycleState::Completing)
    }

    ///
    /// Completing -> Terminated, once the terminal sequence has been delivered
    ///
    pub fn finish(&self) -> bool {
        self.transition(LifecycleState::Completing, LifecycleState::Terminated)
    }

    ///
    /// Active -> Terminated. Returns true if this call ended the subscription.
    ///
    /// A subscription that is still pending can also be terminated (this happens when a
    /// publisher abandons a subscription before handing it over).
    ///
    pub fn terminate(&self) -> bool {
        self.transition(LifecycleState::Active, LifecycleState::Terminated)
            || self.transition(LifecycleState::Pending, LifecycleState::Terminated)
    }
}

impl Default for SubscriptionLifecycle {
    fn default() -> SubscriptionLifecycle {
        SubscriptionLifecycle::new()
    }
}
