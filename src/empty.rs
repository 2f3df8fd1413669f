use super::traits::*;
use super::demand::*;
use super::completion::*;
use super::error::*;
use super::lifecycle::*;

use log::{trace, warn};

use std::marker::PhantomData;
use std::sync::*;

///
/// A publisher that never sends any values, and optionally finishes straight away
///
pub struct Empty<Output, Failure> {
    complete_immediately: bool,

    phantom: PhantomData<fn() -> (Output, Failure)>
}

impl<Output, Failure> Empty<Output, Failure> {
    ///
    /// Creates an empty publisher. If `complete_immediately` is false, subscribers are never sent a completion.
    ///
    pub fn new(complete_immediately: bool) -> Empty<Output, Failure> {
        Empty {
            complete_immediately:   complete_immediately,
            phantom:                PhantomData
        }
    }
}

impl<Output, Failure> Clone for Empty<Output, Failure> {
    fn clone(&self) -> Self {
        Empty::new(self.complete_immediately)
    }
}

///
/// Creates a publisher that finishes as soon as something subscribes to it
///
pub fn empty<Output, Failure>() -> Empty<Output, Failure> {
    Empty::new(true)
}

impl<Output, Failure> Publisher for Empty<Output, Failure> {
    type Output     = Output;
    type Failure    = Failure;

    fn subscribe<S>(&self, subscriber: S)
    where S: 'static+Subscriber<Input=Output, Failure=Failure> {
        let subscription = Arc::new(InertSubscription::new("Empty"));

        if !subscription.lifecycle.activate() { return; }
        subscriber.receive_subscription(subscription.clone());

        if self.complete_immediately && subscription.lifecycle.terminate() {
            subscriber.receive_completion(Completion::Finished);
        }
    }
}

///
/// A subscription for a publisher that has no values to deliver: it only tracks whether or not it has been cancelled
///
pub (crate) struct InertSubscription {
    /// Name of the publisher, for logging
    name: &'static str,

    pub (crate) lifecycle: SubscriptionLifecycle
}

impl InertSubscription {
    pub (crate) fn new(name: &'static str) -> InertSubscription {
        InertSubscription {
            name:       name,
            lifecycle:  SubscriptionLifecycle::new()
        }
    }
}

impl Subscription for InertSubscription {
    fn request(&self, demand: Demand) -> Result<(), SubscriptionError> {
        if !self.lifecycle.is_terminated() && demand.is_none() {
            warn!("{}: zero demand requested", self.name);
            Err(SubscriptionError::ZeroDemand)
        } else {
            Ok(())
        }
    }

    fn cancel(&self) {
        if self.lifecycle.terminate() {
            trace!("{}: cancelled", self.name);
        }
    }
}
