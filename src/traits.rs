use super::demand::*;
use super::completion::*;
use super::error::*;
use super::map::*;
use super::sink::*;
#[cfg(feature = "stream")] use super::stream::*;

use std::sync::*;

///
/// The link between one publisher and one subscriber, used by the subscriber to control the flow of elements
///
/// Once a subscription has terminated (by being cancelled or by delivering its completion) every call
/// on it does nothing.
///
pub trait Subscription : Send+Sync {
    ///
    /// Asks for up to `demand` more elements to be delivered
    ///
    /// Elements may be delivered on the calling thread before this returns. Requesting zero elements
    /// from a live subscription is a protocol error and leaves the subscription unchanged. This holds
    /// for as long as the subscription is live, including after some elements have been delivered.
    /// Once the subscription has terminated, any request (zero included) returns `Ok(())`.
    ///
    fn request(&self, demand: Demand) -> Result<(), SubscriptionError>;

    ///
    /// Stops the flow of elements and releases the subscriber. Calling this more than once has
    /// the same effect as calling it once.
    ///
    fn cancel(&self);
}

///
/// Trait implemented by things that consume the elements produced by a publisher
///
/// A subscriber receives its subscription first, then any number of values (never more than it
/// has asked for), then at most one completion.
///
pub trait Subscriber : Send+Sync {
    /// The type of element this subscriber accepts
    type Input;

    /// The type of failure that can end the stream
    type Failure;

    ///
    /// Called once, when the subscriber is attached to a publisher
    ///
    fn receive_subscription(&self, subscription: Arc<dyn Subscription>);

    ///
    /// Called with each element, returning how many more elements the subscriber wants on top of
    /// what it has already requested
    ///
    fn receive(&self, input: Self::Input) -> Demand;

    ///
    /// Called once the stream has ended
    ///
    fn receive_completion(&self, completion: Completion<Self::Failure>);
}

///
/// Trait implemented by things that produce elements for subscribers
///
pub trait Publisher {
    /// The type of element that this publisher produces
    type Output;

    /// The type of failure that can end a stream from this publisher
    type Failure;

    ///
    /// Attaches a subscriber to this publisher
    ///
    /// The subscriber is handed its subscription before this returns. Nothing else is delivered until it
    /// requests some elements.
    ///
    fn subscribe<S>(&self, subscriber: S)
    where S: 'static+Subscriber<Input=Self::Output, Failure=Self::Failure>;

    ///
    /// Creates a publisher that applies a function to every element produced by this one
    ///
    fn map<Output, TFn>(self, transform: TFn) -> Map<Self, Output, TFn>
    where   Self:   Sized,
            TFn:    'static+Send+Sync+Fn(Self::Output) -> Output {
        Map::new(self, transform)
    }

    ///
    /// Subscribes a pair of functions to this publisher, requesting `demand` elements straight away
    ///
    /// The subscription lasts until the publisher completes or the returned `Cancellable` is dropped or marked as `done()`.
    ///
    fn sink<TValueFn, TCompletionFn>(&self, demand: Demand, receive_value: TValueFn, receive_completion: TCompletionFn) -> Cancellable
    where   Self:           Sized,
            Self::Output:   'static,
            Self::Failure:  'static,
            TValueFn:       'static+Send+Sync+Fn(Self::Output),
            TCompletionFn:  'static+Send+Sync+Fn(Completion<Self::Failure>) {
        sink(self, demand, receive_value, receive_completion)
    }

    ///
    /// Subscribes to this publisher, returning its elements as a futures stream
    ///
    #[cfg(feature = "stream")]
    fn to_stream(&self) -> PublisherStream<Self::Output, Self::Failure>
    where   Self:           Sized,
            Self::Output:   'static+Send,
            Self::Failure:  'static+Send {
        publisher_stream(self)
    }
}

impl<S: Subscriber> Subscriber for Arc<S> {
    type Input      = S::Input;
    type Failure    = S::Failure;

    #[inline]
    fn receive_subscription(&self, subscription: Arc<dyn Subscription>) {
        (**self).receive_subscription(subscription)
    }

    #[inline]
    fn receive(&self, input: Self::Input) -> Demand {
        (**self).receive(input)
    }

    #[inline]
    fn receive_completion(&self, completion: Completion<Self::Failure>) {
        (**self).receive_completion(completion)
    }
}

impl<P: Publisher> Publisher for Arc<P> {
    type Output     = P::Output;
    type Failure    = P::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where S: 'static+Subscriber<Input=Self::Output, Failure=Self::Failure> {
        (**self).subscribe(subscriber)
    }
}
