use super::traits::*;
use super::demand::*;
use super::completion::*;
use super::atomic_slot::*;

use log::warn;

use std::sync::*;

///
/// Handle to a subscription made by `Publisher::sink()`
///
/// The subscription is cancelled when this is dropped, unless `keep_alive()` has been called
///
pub struct Cancellable {
    /// The subscription being controlled (torn down once cancelled or completed)
    subscription: Arc<AtomicSlot<Arc<dyn Subscription>>>,

    /// If false, the subscription is cancelled when this is dropped
    keep_alive: bool
}

impl Cancellable {
    ///
    /// Indicates that the subscription should not be cancelled when this handle is dropped
    ///
    pub fn keep_alive(&mut self) {
        self.keep_alive = true;
    }

    ///
    /// Cancels the subscription
    ///
    pub fn done(&mut self) {
        if let Some(subscription) = self.subscription.tear_down() {
            subscription.cancel();
        }
    }

    ///
    /// True while the subscription has neither completed nor been cancelled
    ///
    pub fn is_active(&self) -> bool {
        self.subscription.is_occupied()
    }
}

impl Drop for Cancellable {
    fn drop(&mut self) {
        if !self.keep_alive {
            self.done();
        }
    }
}

///
/// Subscriber that passes its values and completion on to a pair of functions
///
struct SinkSubscriber<Input, Failure> {
    /// Demand to request when the subscription arrives
    demand: Demand,

    /// Shared with the `Cancellable`
    subscription: Arc<AtomicSlot<Arc<dyn Subscription>>>,

    receive_value:      Box<dyn Fn(Input)+Send+Sync>,
    receive_completion: Box<dyn Fn(Completion<Failure>)+Send+Sync>
}

impl<Input, Failure> Subscriber for SinkSubscriber<Input, Failure> {
    type Input      = Input;
    type Failure    = Failure;

    fn receive_subscription(&self, subscription: Arc<dyn Subscription>) {
        match self.subscription.store_if_empty(Arc::clone(&subscription)) {
            Ok(()) => {
                if let Err(error) = subscription.request(self.demand) {
                    warn!("Sink: could not request initial demand: {}", error);
                }
            }

            // Already cancelled, or a second subscription
            Err(unwanted) => unwanted.cancel()
        }
    }

    fn receive(&self, input: Input) -> Demand {
        (self.receive_value)(input);
        Demand::none()
    }

    fn receive_completion(&self, completion: Completion<Failure>) {
        self.subscription.tear_down();
        (self.receive_completion)(completion);
    }
}

///
/// Subscribes a pair of functions to a publisher, requesting `demand` elements up front
///
pub fn sink<P, TValueFn, TCompletionFn>(publisher: &P, demand: Demand, receive_value: TValueFn, receive_completion: TCompletionFn) -> Cancellable
where   P:              Publisher,
        P::Output:      'static,
        P::Failure:     'static,
        TValueFn:       'static+Send+Sync+Fn(P::Output),
        TCompletionFn:  'static+Send+Sync+Fn(Completion<P::Failure>) {
    let subscription = Arc::new(AtomicSlot::empty());

    publisher.subscribe(SinkSubscriber {
        demand:             demand,
        subscription:       Arc::clone(&subscription),
        receive_value:      Box::new(receive_value),
        receive_completion: Box::new(receive_completion)
    });

    Cancellable {
        subscription:   subscription,
        keep_alive:     false
    }
}
