use super::traits::*;
use super::completion::*;
use super::empty::*;

use std::marker::PhantomData;
use std::sync::*;

///
/// A publisher that ends every subscription straight away with a failure
///
#[derive(Clone, PartialEq, Debug)]
pub struct Fail<Output, Failure> {
    failure: Failure,

    output: PhantomData<fn() -> Output>
}

impl<Output, Failure> Fail<Output, Failure> {
    ///
    /// Creates a publisher that sends `failure` to each subscriber
    ///
    pub fn new(failure: Failure) -> Fail<Output, Failure> {
        Fail {
            failure:    failure,
            output:     PhantomData
        }
    }
}

///
/// Creates a publisher that immediately fails with the specified error
///
pub fn fail<Output, Failure>(failure: Failure) -> Fail<Output, Failure> {
    Fail::new(failure)
}

impl<Output, Failure: Clone> Publisher for Fail<Output, Failure> {
    type Output     = Output;
    type Failure    = Failure;

    fn subscribe<S>(&self, subscriber: S)
    where S: 'static+Subscriber<Input=Output, Failure=Failure> {
        let subscription = Arc::new(InertSubscription::new("Fail"));

        if !subscription.lifecycle.activate() { return; }
        subscriber.receive_subscription(subscription.clone());

        if subscription.lifecycle.terminate() {
            subscriber.receive_completion(Completion::Failed(self.failure.clone()));
        }
    }
}
