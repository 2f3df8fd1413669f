use std::sync::*;

///
/// The contents of an atomic slot
///
enum SlotState<T> {
    /// Nothing has been stored yet
    Empty,

    /// A value is held
    Present(T),

    /// The slot has been torn down and will never hold a value again
    TornDown
}

///
/// A cell holding a value that can be stored once and torn down once
///
/// This is a lock-backed single-step cell rather than a lock-free atomic. Each operation takes
/// the lock once, changes the state and releases it again, never calling out to a subscriber
/// while it is held. `store_if_empty` and `tear_down` are therefore each one linearizable step.
///
/// Subscriptions keep the things they reference (their subscriber, an upstream subscription)
/// in slots: tearing the slot down when the subscription terminates is what releases them.
///
pub struct AtomicSlot<T> {
    state: Mutex<SlotState<T>>
}

impl<T> AtomicSlot<T> {
    ///
    /// Creates a slot that has not had a value stored in it yet
    ///
    pub fn empty() -> AtomicSlot<T> {
        AtomicSlot {
            state: Mutex::new(SlotState::Empty)
        }
    }

    ///
    /// Creates a slot already holding a value
    ///
    pub fn with_value(value: T) -> AtomicSlot<T> {
        AtomicSlot {
            state: Mutex::new(SlotState::Present(value))
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        // Nothing that can panic runs with the lock held, but a poisoned slot is still usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    ///
    /// Stores a value if the slot is empty. If a value is already present or the slot has been
    /// torn down, the value is handed back.
    ///
    pub fn store_if_empty(&self, value: T) -> Result<(), T> {
        let mut state = self.lock();

        match *state {
            SlotState::Empty    => { *state = SlotState::Present(value); Ok(()) }
            _                   => Err(value)
        }
    }

    ///
    /// Tears down this slot, returning the value that was in it (if there was one)
    ///
    /// Only the first call can return a value: later calls always return None.
    ///
    pub fn tear_down(&self) -> Option<T> {
        let previous = {
            let mut state = self.lock();
            std::mem::replace(&mut *state, SlotState::TornDown)
        };

        match previous {
            SlotState::Present(value)   => Some(value),
            _                           => None
        }
    }

    /// True once `tear_down` has been called
    pub fn is_torn_down(&self) -> bool {
        match *self.lock() {
            SlotState::TornDown => true,
            _                   => false
        }
    }

    /// True if a value is currently held
    pub fn is_occupied(&self) -> bool {
        match *self.lock() {
            SlotState::Present(_)   => true,
            _                       => false
        }
    }
}

impl<T: Clone> AtomicSlot<T> {
    ///
    /// Retrieves a copy of the value in this slot, if there is one
    ///
    pub fn load(&self) -> Option<T> {
        match &*self.lock() {
            SlotState::Present(value)   => Some(value.clone()),
            _                           => None
        }
    }
}
