use super::traits::*;
use super::demand::*;
use super::completion::*;

use std::sync::*;

///
/// A subscriber made out of three functions
///
/// The functions are called without any lock held, so they may call back into the subscription.
///
pub struct AnySubscriber<Input, Failure> {
    receive_subscription:   Box<dyn Fn(Arc<dyn Subscription>)+Send+Sync>,
    receive_value:          Box<dyn Fn(Input) -> Demand+Send+Sync>,
    receive_completion:     Box<dyn Fn(Completion<Failure>)+Send+Sync>
}

impl<Input, Failure> AnySubscriber<Input, Failure> {
    ///
    /// Creates a subscriber from the functions to call for each of the events it can receive
    ///
    pub fn new<TSubscriptionFn, TValueFn, TCompletionFn>(receive_subscription: TSubscriptionFn, receive_value: TValueFn, receive_completion: TCompletionFn) -> AnySubscriber<Input, Failure>
    where   TSubscriptionFn:    'static+Send+Sync+Fn(Arc<dyn Subscription>),
            TValueFn:           'static+Send+Sync+Fn(Input) -> Demand,
            TCompletionFn:      'static+Send+Sync+Fn(Completion<Failure>) {
        AnySubscriber {
            receive_subscription:   Box::new(receive_subscription),
            receive_value:          Box::new(receive_value),
            receive_completion:     Box::new(receive_completion)
        }
    }
}

impl<Input, Failure> Subscriber for AnySubscriber<Input, Failure> {
    type Input      = Input;
    type Failure    = Failure;

    fn receive_subscription(&self, subscription: Arc<dyn Subscription>) {
        (self.receive_subscription)(subscription)
    }

    fn receive(&self, input: Input) -> Demand {
        (self.receive_value)(input)
    }

    fn receive_completion(&self, completion: Completion<Failure>) {
        (self.receive_completion)(completion)
    }
}
