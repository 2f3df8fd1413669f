use super::traits::*;
use super::demand::*;
use super::completion::*;
use super::error::*;
use super::atomic_slot::*;

use log::{trace, warn};

use std::marker::PhantomData;
use std::sync::*;

///
/// A publisher that transforms every element produced by an upstream publisher
///
pub struct Map<Upstream, Output, TFn> {
    /// The publisher that elements are read from
    upstream: Upstream,

    /// The transformation to apply to each element
    transform: Arc<TFn>,

    output: PhantomData<fn() -> Output>
}

impl<Upstream, Output, TFn> Map<Upstream, Output, TFn>
where   Upstream:   Publisher,
        TFn:        'static+Send+Sync+Fn(Upstream::Output) -> Output {
    ///
    /// Creates a new map publisher
    ///
    pub fn new(upstream: Upstream, transform: TFn) -> Map<Upstream, Output, TFn> {
        Map {
            upstream:   upstream,
            transform:  Arc::new(transform),
            output:     PhantomData
        }
    }

    ///
    /// The publisher that this is reading from
    ///
    pub fn upstream(&self) -> &Upstream {
        &self.upstream
    }
}

impl<Upstream: Clone, Output, TFn> Clone for Map<Upstream, Output, TFn> {
    fn clone(&self) -> Self {
        Map {
            upstream:   self.upstream.clone(),
            transform:  Arc::clone(&self.transform),
            output:     PhantomData
        }
    }
}

impl<Upstream, Output, TFn> Publisher for Map<Upstream, Output, TFn>
where   Upstream:           Publisher,
        Upstream::Output:   'static,
        Upstream::Failure:  'static,
        Output:             'static,
        TFn:                'static+Send+Sync+Fn(Upstream::Output) -> Output {
    type Output     = Output;
    type Failure    = Upstream::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where S: 'static+Subscriber<Input=Output, Failure=Upstream::Failure> {
        let bridge = Arc::new(MapSubscription {
            upstream:   AtomicSlot::empty(),
            downstream: AtomicSlot::with_value(Arc::new(subscriber)),
            transform:  Arc::clone(&self.transform),
            input:      PhantomData
        });

        self.upstream.subscribe(MapSubscriber { bridge });
    }
}

///
/// The bridge between the upstream publisher and the downstream subscriber
///
/// Downstream only ever sees this object as its subscription: it never gets to touch the upstream
/// subscription directly.
///
struct MapSubscription<Input, S, TFn> {
    /// The subscription from the upstream publisher, once it has arrived
    upstream: AtomicSlot<Arc<dyn Subscription>>,

    /// The subscriber that transformed elements are sent to
    downstream: AtomicSlot<Arc<S>>,

    /// The transformation to apply
    transform: Arc<TFn>,

    input: PhantomData<fn(Input)>
}

///
/// The face of the bridge that the upstream publisher sees
///
struct MapSubscriber<Input, S, TFn> {
    bridge: Arc<MapSubscription<Input, S, TFn>>
}

impl<Input, S, TFn> Subscription for MapSubscription<Input, S, TFn>
where   S:      Subscriber,
        TFn:    Send+Sync {
    fn request(&self, demand: Demand) -> Result<(), SubscriptionError> {
        // Demand is passed on exactly as requested
        match self.upstream.load() {
            Some(upstream)  => upstream.request(demand),
            None            => Ok(())
        }
    }

    fn cancel(&self) {
        let upstream = self.upstream.tear_down();
        self.downstream.tear_down();

        if let Some(upstream) = upstream {
            trace!("Map: cancelled");
            upstream.cancel();
        }
    }
}

impl<Input, S, TFn> Subscriber for MapSubscriber<Input, S, TFn>
where   Input:  'static,
        S:      'static+Subscriber,
        TFn:    'static+Send+Sync+Fn(Input) -> S::Input {
    type Input      = Input;
    type Failure    = S::Failure;

    fn receive_subscription(&self, subscription: Arc<dyn Subscription>) {
        match self.bridge.upstream.store_if_empty(subscription) {
            Ok(()) => {
                if let Some(downstream) = self.bridge.downstream.load() {
                    downstream.receive_subscription(self.bridge.clone());
                }
            }

            Err(duplicate) => {
                // Upstream is misbehaving: the downstream subscriber only ever gets one subscription
                warn!("Map: received more than one upstream subscription");
                duplicate.cancel();
            }
        }
    }

    fn receive(&self, input: Input) -> Demand {
        if self.bridge.upstream.load().is_none() {
            // Cancelled (or no subscription yet): the element is dropped
            if !self.bridge.upstream.is_torn_down() {
                warn!("Map: value received before the upstream subscription");
            }

            return Demand::none();
        }

        match self.bridge.downstream.load() {
            Some(downstream)    => downstream.receive((*self.bridge.transform)(input)),
            None                => Demand::none()
        }
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        // Tearing down the upstream subscription stops a racing cancel() from cancelling a finished publisher
        self.bridge.upstream.tear_down();

        if let Some(downstream) = self.bridge.downstream.tear_down() {
            downstream.receive_completion(completion);
        }
    }
}
