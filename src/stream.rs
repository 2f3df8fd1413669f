use super::traits::*;
use super::demand::*;
use super::completion::*;
use super::atomic_slot::*;

use futures::prelude::*;
use futures::task::{Context, Poll, Waker};
use log::{trace, warn};

use std::collections::VecDeque;
use std::pin::*;
use std::sync::*;

///
/// Values received from the publisher that the stream has not yet returned
///
struct StreamState<Output, Failure> {
    /// Values waiting to be read from the stream
    waiting: VecDeque<Output>,

    /// The completion, once it has been received and until it has been read
    completion: Option<Completion<Failure>>,

    /// Set once the stream has returned its last item
    finished: bool,

    /// True if an element has been requested and has not arrived yet
    requested: bool,

    /// The task to wake when something arrives
    waker: Option<Waker>
}

///
/// The data shared between a stream and the subscriber that feeds it
///
struct StreamCore<Output, Failure> {
    subscription:   AtomicSlot<Arc<dyn Subscription>>,
    state:          Mutex<StreamState<Output, Failure>>
}

impl<Output, Failure> StreamCore<Output, Failure> {
    fn state(&self) -> MutexGuard<'_, StreamState<Output, Failure>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    ///
    /// Updates the state and wakes the stream (the waker is called after the lock is released)
    ///
    fn update_and_wake<TFn: FnOnce(&mut StreamState<Output, Failure>)>(&self, update: TFn) {
        let waker = {
            let mut state = self.state();
            update(&mut state);
            state.waker.take()
        };

        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

///
/// A futures `Stream` that reads from a publisher, requesting one element at a time as they are consumed
///
/// A publisher that fails produces a single `Err` item before the stream ends. Dropping the stream cancels
/// the subscription.
///
pub struct PublisherStream<Output, Failure> {
    core: Arc<StreamCore<Output, Failure>>
}

///
/// The subscriber that passes elements on to a `PublisherStream`
///
struct StreamSubscriber<Output, Failure> {
    core: Arc<StreamCore<Output, Failure>>
}

///
/// Subscribes to a publisher, returning the elements it produces as a stream
///
pub fn publisher_stream<P>(publisher: &P) -> PublisherStream<P::Output, P::Failure>
where   P:              Publisher,
        P::Output:      'static+Send,
        P::Failure:     'static+Send {
    let core = Arc::new(StreamCore {
        subscription:   AtomicSlot::empty(),
        state:          Mutex::new(StreamState {
            waiting:    VecDeque::new(),
            completion: None,
            finished:   false,
            requested:  false,
            waker:      None
        })
    });

    publisher.subscribe(StreamSubscriber { core: Arc::clone(&core) });

    PublisherStream { core }
}

impl<Output: Send, Failure: Send> Subscriber for StreamSubscriber<Output, Failure> {
    type Input      = Output;
    type Failure    = Failure;

    fn receive_subscription(&self, subscription: Arc<dyn Subscription>) {
        match self.core.subscription.store_if_empty(subscription) {
            // The stream may already be waiting to make its first request
            Ok(())          => self.core.update_and_wake(|_| { }),
            Err(unwanted)   => unwanted.cancel()
        }
    }

    fn receive(&self, input: Output) -> Demand {
        self.core.update_and_wake(move |state| {
            state.waiting.push_back(input);
            state.requested = false;
        });

        Demand::none()
    }

    fn receive_completion(&self, completion: Completion<Failure>) {
        self.core.subscription.tear_down();
        self.core.update_and_wake(move |state| {
            state.completion = Some(completion);
        });
    }
}

impl<Output, Failure> Stream for PublisherStream<Output, Failure> {
    type Item = Result<Output, Failure>;

    fn poll_next(self: Pin<&mut Self>, context: &mut Context) -> Poll<Option<Self::Item>> {
        loop {
            let subscription = {
                let mut state = self.core.state();

                if let Some(next) = state.waiting.pop_front() {
                    return Poll::Ready(Some(Ok(next)));
                }

                if state.finished {
                    return Poll::Ready(None);
                }

                match state.completion.take() {
                    Some(Completion::Finished) => {
                        state.finished = true;
                        return Poll::Ready(None);
                    }

                    Some(Completion::Failed(failure)) => {
                        state.finished = true;
                        return Poll::Ready(Some(Err(failure)));
                    }

                    None => { }
                }

                state.waker = Some(context.waker().clone());

                // Wait for the element we've already asked for, or for the subscription to turn up
                if state.requested { return Poll::Pending; }
                match self.core.subscription.load() {
                    Some(subscription)  => { state.requested = true; subscription }
                    None                => { return Poll::Pending; }
                }
            };

            // The publisher may deliver straight away, so the request is made with the lock released
            if let Err(error) = subscription.request(Demand::max(1)) {
                warn!("PublisherStream: request failed: {}", error);
                return Poll::Pending;
            }
        }
    }
}

impl<Output, Failure> Drop for PublisherStream<Output, Failure> {
    fn drop(&mut self) {
        if let Some(subscription) = self.core.subscription.tear_down() {
            trace!("PublisherStream: dropped before completion");
            subscription.cancel();
        }
    }
}
