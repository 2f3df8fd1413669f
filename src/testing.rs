//!
//! Instrumented publishers, subscribers and subscriptions that record the calls made to them, for
//! checking that a stage obeys the subscription protocol
//!

use super::traits::*;
use super::demand::*;
use super::completion::*;
use super::error::*;

use std::sync::*;

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

///
/// A call recorded by a `TracingSubscriber`
///
#[derive(Clone, PartialEq, Debug)]
pub enum TracingEvent<Input, Failure> {
    /// `receive_subscription()` was called
    Subscription,

    /// `receive()` was called with a value
    Value(Input),

    /// `receive_completion()` was called
    Completion(Completion<Failure>)
}

///
/// A subscriber that records every call made to it, in order
///
pub struct TracingSubscriber<Input, Failure> {
    /// Demand to request as soon as the subscription arrives
    initial_demand: Option<Demand>,

    /// Decides the demand to return for each value
    receive_value: Box<dyn Fn(&Input, &Arc<dyn Subscription>) -> Demand+Send+Sync>,

    /// The subscription, once it has been received
    subscription: Mutex<Option<Arc<dyn Subscription>>>,

    /// The result of the initial request
    initial_request: Mutex<Option<Result<(), SubscriptionError>>>,

    /// The calls made to this subscriber
    events: Mutex<Vec<TracingEvent<Input, Failure>>>
}

impl<Input, Failure> TracingSubscriber<Input, Failure> {
    ///
    /// Creates a subscriber that does not request anything itself and asks for no more demand when it receives a value
    ///
    pub fn new() -> TracingSubscriber<Input, Failure> {
        TracingSubscriber {
            initial_demand:     None,
            receive_value:      Box::new(|_, _| Demand::none()),
            subscription:       Mutex::new(None),
            initial_request:    Mutex::new(None),
            events:             Mutex::new(vec![])
        }
    }

    ///
    /// Creates a subscriber that requests the specified demand when it receives its subscription
    ///
    pub fn with_initial_demand(demand: Demand) -> TracingSubscriber<Input, Failure> {
        let mut subscriber = Self::new();
        subscriber.initial_demand = Some(demand);
        subscriber
    }

    ///
    /// Sets the function called for each value: it can call the subscription, and returns the extra demand to report
    ///
    pub fn on_value<TFn>(mut self, receive_value: TFn) -> TracingSubscriber<Input, Failure>
    where TFn: 'static+Send+Sync+Fn(&Input, &Arc<dyn Subscription>) -> Demand {
        self.receive_value = Box::new(receive_value);
        self
    }

    ///
    /// The subscription received by this subscriber, if there is one
    ///
    pub fn subscription(&self) -> Option<Arc<dyn Subscription>> {
        locked(&self.subscription).clone()
    }

    ///
    /// The result of the request made when the subscription arrived (None if no request was made)
    ///
    pub fn initial_request(&self) -> Option<Result<(), SubscriptionError>> {
        *locked(&self.initial_request)
    }
}

impl<Input: Clone, Failure: Clone> TracingSubscriber<Input, Failure> {
    ///
    /// Every call made to this subscriber so far
    ///
    pub fn events(&self) -> Vec<TracingEvent<Input, Failure>> {
        locked(&self.events).clone()
    }

    ///
    /// The values and completions received so far
    ///
    pub fn events_without_subscription(&self) -> Vec<TracingEvent<Input, Failure>> {
        locked(&self.events)
            .iter()
            .filter(|event| match event { TracingEvent::Subscription => false, _ => true })
            .cloned()
            .collect()
    }
}

impl<Input, Failure> Default for TracingSubscriber<Input, Failure> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Input, Failure> Subscriber for TracingSubscriber<Input, Failure>
where   Input:      Clone+Send,
        Failure:    Send {
    type Input      = Input;
    type Failure    = Failure;

    fn receive_subscription(&self, subscription: Arc<dyn Subscription>) {
        *locked(&self.subscription) = Some(Arc::clone(&subscription));
        locked(&self.events).push(TracingEvent::Subscription);

        if let Some(demand) = self.initial_demand {
            let result = subscription.request(demand);
            *locked(&self.initial_request) = Some(result);
        }
    }

    fn receive(&self, input: Input) -> Demand {
        locked(&self.events).push(TracingEvent::Value(input.clone()));

        let subscription = self.subscription();
        match subscription {
            Some(subscription)  => (self.receive_value)(&input, &subscription),
            None                => Demand::none()
        }
    }

    fn receive_completion(&self, completion: Completion<Failure>) {
        locked(&self.events).push(TracingEvent::Completion(completion));
    }
}

///
/// A call recorded by a `TestSubscription`
///
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum TestSubscriptionEvent {
    /// `request()` was called with a demand
    Request(Demand),

    /// `cancel()` was called
    Cancel
}

///
/// A subscription that records every call made to it, in order
///
pub struct TestSubscription {
    /// Called after each request has been recorded
    on_request: Option<Box<dyn Fn(Demand)+Send+Sync>>,

    /// The calls made to this subscription
    events: Mutex<Vec<TestSubscriptionEvent>>
}

impl TestSubscription {
    ///
    /// Creates a subscription that only records calls
    ///
    pub fn new() -> TestSubscription {
        TestSubscription {
            on_request: None,
            events:     Mutex::new(vec![])
        }
    }

    ///
    /// Creates a subscription that calls a function for each request
    ///
    pub fn with_request<TFn>(on_request: TFn) -> TestSubscription
    where TFn: 'static+Send+Sync+Fn(Demand) -> () {
        TestSubscription {
            on_request: Some(Box::new(on_request)),
            events:     Mutex::new(vec![])
        }
    }

    ///
    /// The calls made to this subscription so far
    ///
    pub fn events(&self) -> Vec<TestSubscriptionEvent> {
        locked(&self.events).clone()
    }
}

impl Default for TestSubscription {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscription for TestSubscription {
    fn request(&self, demand: Demand) -> Result<(), SubscriptionError> {
        locked(&self.events).push(TestSubscriptionEvent::Request(demand));

        if let Some(on_request) = &self.on_request {
            on_request(demand);
        }

        Ok(())
    }

    fn cancel(&self) {
        locked(&self.events).push(TestSubscriptionEvent::Cancel);
    }
}

///
/// The state shared between clones of a test publisher
///
struct TestPublisherCore<Output, Failure> {
    /// The subscription handed to each subscriber
    subscription: Arc<TestSubscription>,

    /// The most recently attached subscriber
    subscriber: Mutex<Option<Arc<dyn Subscriber<Input=Output, Failure=Failure>>>>
}

///
/// A publisher driven by hand: it gives its subscriber a `TestSubscription`, and values and completions
/// are only sent when the test asks for them
///
pub struct TestPublisher<Output, Failure> {
    core: Arc<TestPublisherCore<Output, Failure>>
}

impl<Output, Failure> Clone for TestPublisher<Output, Failure> {
    fn clone(&self) -> Self {
        TestPublisher { core: Arc::clone(&self.core) }
    }
}

impl<Output, Failure> TestPublisher<Output, Failure> {
    ///
    /// Creates a publisher that hands out a subscription that only records calls
    ///
    pub fn new() -> TestPublisher<Output, Failure> {
        Self::with_subscription(TestSubscription::new())
    }

    ///
    /// Creates a publisher that hands out a particular test subscription
    ///
    pub fn with_subscription(subscription: TestSubscription) -> TestPublisher<Output, Failure> {
        TestPublisher {
            core: Arc::new(TestPublisherCore {
                subscription:   Arc::new(subscription),
                subscriber:     Mutex::new(None)
            })
        }
    }

    ///
    /// The subscription given to subscribers of this publisher
    ///
    pub fn subscription(&self) -> Arc<TestSubscription> {
        Arc::clone(&self.core.subscription)
    }

    fn subscriber(&self) -> Option<Arc<dyn Subscriber<Input=Output, Failure=Failure>>> {
        locked(&self.core.subscriber).clone()
    }

    ///
    /// Sends a value to the subscriber, returning the demand it reported (None if nothing is subscribed)
    ///
    pub fn send(&self, value: Output) -> Option<Demand> {
        self.subscriber().map(move |subscriber| subscriber.receive(value))
    }

    ///
    /// Sends a completion to the subscriber
    ///
    pub fn send_completion(&self, completion: Completion<Failure>) {
        if let Some(subscriber) = self.subscriber() {
            subscriber.receive_completion(completion);
        }
    }

    ///
    /// Sends an extra subscription to the subscriber, as a misbehaving publisher might
    ///
    pub fn send_subscription(&self, subscription: Arc<dyn Subscription>) {
        if let Some(subscriber) = self.subscriber() {
            subscriber.receive_subscription(subscription);
        }
    }
}

impl<Output, Failure> Default for TestPublisher<Output, Failure> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Output: 'static, Failure: 'static> Publisher for TestPublisher<Output, Failure> {
    type Output     = Output;
    type Failure    = Failure;

    fn subscribe<S>(&self, subscriber: S)
    where S: 'static+Subscriber<Input=Output, Failure=Failure> {
        let subscriber: Arc<dyn Subscriber<Input=Output, Failure=Failure>> = Arc::new(subscriber);
        *locked(&self.core.subscriber) = Some(Arc::clone(&subscriber));

        subscriber.receive_subscription(self.subscription());
    }
}
