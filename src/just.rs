use super::traits::*;
use super::demand::*;
use super::completion::*;
use super::error::*;
use super::lifecycle::*;
use super::atomic_slot::*;

use log::{trace, warn};

use std::convert::Infallible;
use std::sync::*;

///
/// A publisher that sends a single value to each subscriber and then finishes
///
#[derive(Clone, PartialEq, Debug)]
pub struct Just<Value> {
    value: Value
}

impl<Value> Just<Value> {
    ///
    /// Creates a publisher that will send `value` to each subscriber
    ///
    pub fn new(value: Value) -> Just<Value> {
        Just { value }
    }

    ///
    /// The value that this publisher sends
    ///
    pub fn value(&self) -> &Value {
        &self.value
    }
}

///
/// Creates a publisher that sends a single value and then finishes
///
pub fn just<Value>(value: Value) -> Just<Value> {
    Just::new(value)
}

impl<Value> Publisher for Just<Value>
where Value: 'static+Clone+Send {
    type Output     = Value;
    type Failure    = Infallible;

    fn subscribe<S>(&self, subscriber: S)
    where S: 'static+Subscriber<Input=Value, Failure=Infallible> {
        let subscriber      = Arc::new(subscriber);
        let subscription    = Arc::new(JustSubscription {
            lifecycle:  SubscriptionLifecycle::new(),
            value:      AtomicSlot::with_value(self.value.clone()),
            subscriber: AtomicSlot::with_value(Arc::clone(&subscriber))
        });

        if subscription.lifecycle.activate() {
            trace!("Just: subscription activated");
            subscriber.receive_subscription(subscription);
        }
    }
}

///
/// The subscription created for each subscriber to a `Just` publisher
///
struct JustSubscription<Value, S> {
    /// Pending -> Active on subscribe, Active -> Completing when delivery wins, Active -> Terminated on cancel
    lifecycle: SubscriptionLifecycle,

    /// The value waiting to be delivered
    value: AtomicSlot<Value>,

    /// The subscriber, released once the subscription terminates
    subscriber: AtomicSlot<Arc<S>>
}

impl<Value, S> JustSubscription<Value, S>
where S: Subscriber<Input=Value, Failure=Infallible> {
    ///
    /// Sends the value and the completion. Only the thread that won the `begin_completing()` race calls this.
    ///
    fn deliver(&self) {
        let value       = self.value.tear_down();
        let subscriber  = self.subscriber.tear_down();

        if let (Some(value), Some(subscriber)) = (value, subscriber) {
            // There's nothing more to send, so any further demand is ignored
            subscriber.receive(value);
            subscriber.receive_completion(Completion::Finished);
        }

        self.lifecycle.finish();
        trace!("Just: delivered and finished");
    }
}

impl<Value, S> Subscription for JustSubscription<Value, S>
where   Value:  Send,
        S:      Subscriber<Input=Value, Failure=Infallible> {
    fn request(&self, demand: Demand) -> Result<(), SubscriptionError> {
        match self.lifecycle.state() {
            LifecycleState::Completing | LifecycleState::Terminated => Ok(()),

            LifecycleState::Pending | LifecycleState::Active => {
                if demand.is_none() {
                    warn!("Just: zero demand requested");
                    return Err(SubscriptionError::ZeroDemand);
                }

                // Only one of any number of concurrent requests gets to deliver the value
                if self.lifecycle.begin_completing() {
                    self.deliver();
                }

                Ok(())
            }
        }
    }

    fn cancel(&self) {
        if self.lifecycle.terminate() {
            trace!("Just: cancelled");

            self.value.tear_down();
            self.subscriber.tear_down();
        }
    }
}
