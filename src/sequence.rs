use super::traits::*;
use super::demand::*;
use super::completion::*;
use super::error::*;
use super::lifecycle::*;
use super::atomic_slot::*;

use log::{trace, warn};

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::*;
use std::sync::atomic::{fence, AtomicBool, Ordering};

///
/// A publisher that sends a fixed list of values to each subscriber, as fast as they are requested
///
#[derive(Clone, PartialEq, Debug)]
pub struct Sequence<Value> {
    values: Arc<Vec<Value>>
}

impl<Value> Sequence<Value> {
    ///
    /// Creates a publisher for a list of values
    ///
    pub fn new(values: Vec<Value>) -> Sequence<Value> {
        Sequence {
            values: Arc::new(values)
        }
    }
}

///
/// Creates a publisher that sends each item from an iterator in turn and then finishes
///
pub fn sequence<Value, Values>(values: Values) -> Sequence<Value>
where Values: IntoIterator<Item=Value> {
    Sequence::new(values.into_iter().collect())
}

impl<Value> Publisher for Sequence<Value>
where Value: 'static+Clone+Send+Sync {
    type Output     = Value;
    type Failure    = Infallible;

    fn subscribe<S>(&self, subscriber: S)
    where S: 'static+Subscriber<Input=Value, Failure=Infallible> {
        let subscriber      = Arc::new(subscriber);
        let subscription    = Arc::new(SequenceSubscription {
            lifecycle:  SubscriptionLifecycle::new(),
            demand:     AtomicDemand::new(),
            draining:   AtomicBool::new(false),
            remaining:  Mutex::new(self.values.iter().cloned().collect()),
            subscriber: AtomicSlot::with_value(Arc::clone(&subscriber))
        });

        if !subscription.lifecycle.activate() { return; }
        trace!("Sequence: subscription activated ({} values)", self.values.len());

        subscriber.receive_subscription(subscription.clone());

        // An empty sequence is finished before anything is requested
        if self.values.is_empty() {
            subscription.complete();
        }
    }
}

///
/// The subscription created for each subscriber to a `Sequence`
///
struct SequenceSubscription<Value, S> {
    lifecycle: SubscriptionLifecycle,

    /// Elements requested but not yet delivered
    demand: AtomicDemand,

    /// Set while a thread is running the delivery loop
    draining: AtomicBool,

    /// Values not yet delivered. Only the draining thread takes from this.
    remaining: Mutex<VecDeque<Value>>,

    /// The subscriber, released once the subscription terminates
    subscriber: AtomicSlot<Arc<S>>
}

impl<Value, S> SequenceSubscription<Value, S>
where S: Subscriber<Input=Value, Failure=Infallible> {
    fn remaining(&self) -> MutexGuard<'_, VecDeque<Value>> {
        self.remaining.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    ///
    /// Ends the subscription with a 'finished' completion, if nothing else has ended it first
    ///
    fn complete(&self) {
        if self.lifecycle.terminate() {
            trace!("Sequence: finished");

            if let Some(subscriber) = self.subscriber.tear_down() {
                subscriber.receive_completion(Completion::Finished);
            }
        }
    }

    ///
    /// Delivers values while there is demand for them
    ///
    /// Only one thread runs this loop at a time. Any other thread (including the subscriber calling `request()`
    /// from inside `receive()`) just adds to the demand and leaves the delivery to the thread that is already
    /// draining, so delivering any number of values never grows the stack.
    ///
    fn drain(&self) {
        loop {
            if self.draining.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
                return;
            }

            while !self.lifecycle.is_terminated() && self.demand.take_one() {
                let next = self.remaining().pop_front();
                let next = match next {
                    Some(next)  => next,
                    None        => break
                };

                let subscriber = match self.subscriber.load() {
                    Some(subscriber)    => subscriber,
                    None                => break
                };

                let more_demand = subscriber.receive(next);
                if !more_demand.is_none() {
                    self.demand.add(more_demand);
                }

                if self.remaining().is_empty() {
                    self.complete();
                }
            }

            self.draining.store(false, Ordering::Release);

            // More demand might have arrived after the loop stopped but before the flag was cleared.
            // Pairs with the fence in request(): without it the store above can be ordered after the
            // demand check below, and a requester could see `draining` still set while this thread
            // sees no demand, leaving the request undelivered.
            fence(Ordering::SeqCst);
            if self.lifecycle.is_terminated() || !self.demand.has_demand() || self.remaining().is_empty() {
                return;
            }
        }
    }
}

impl<Value, S> Subscription for SequenceSubscription<Value, S>
where   Value:  Send,
        S:      Subscriber<Input=Value, Failure=Infallible> {
    fn request(&self, demand: Demand) -> Result<(), SubscriptionError> {
        if self.lifecycle.is_terminated() {
            return Ok(());
        }

        if demand.is_none() {
            warn!("Sequence: zero demand requested");
            return Err(SubscriptionError::ZeroDemand);
        }

        self.demand.add(demand);

        // The new demand must be visible before this thread checks whether another one is draining
        fence(Ordering::SeqCst);
        self.drain();

        Ok(())
    }

    fn cancel(&self) {
        if self.lifecycle.terminate() {
            trace!("Sequence: cancelled");

            self.subscriber.tear_down();
            self.remaining().clear();
        }
    }
}
