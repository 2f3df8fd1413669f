extern crate flo_reactive;
extern crate env_logger;

use flo_reactive::*;
use flo_reactive::testing::*;

use std::convert::Infallible;
use std::sync::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

#[test]
fn requesting_from_receive_does_not_grow_the_stack() {
    let depth       = Arc::new(AtomicUsize::new(0));
    let max_depth   = Arc::new(AtomicUsize::new(0));

    let subscriber  = {
        let depth       = Arc::clone(&depth);
        let max_depth   = Arc::clone(&max_depth);

        TracingSubscriber::<usize, Infallible>::with_initial_demand(Demand::max(1))
            .on_value(move |_, subscription| {
                let now_at = depth.fetch_add(1, Ordering::SeqCst) + 1;
                max_depth.fetch_max(now_at, Ordering::SeqCst);

                subscription.request(Demand::max(1)).unwrap();

                depth.fetch_sub(1, Ordering::SeqCst);
                Demand::none()
            })
    };
    let subscriber = Arc::new(subscriber);

    sequence(0..100_000).subscribe(Arc::clone(&subscriber));

    let events = subscriber.events_without_subscription();
    assert_eq!(events.len(), 100_001);
    assert_eq!(events[99_999], TracingEvent::Value(99_999));
    assert_eq!(events[100_000], TracingEvent::Completion(Completion::Finished));
    assert_eq!(max_depth.load(Ordering::SeqCst), 1);
}

#[test]
fn requests_from_many_threads_deliver_every_value_in_order() {
    let _ = env_logger::try_init();

    let subscriber = Arc::new(TracingSubscriber::<usize, Infallible>::new());
    sequence(0..800).subscribe(Arc::clone(&subscriber));

    let subscription = subscriber.subscription().unwrap();
    let threads = (0..8).map(|_| {
        let subscription = Arc::clone(&subscription);
        thread::spawn(move || {
            for _ in 0..100 {
                subscription.request(Demand::max(1)).unwrap();
            }
        })
    }).collect::<Vec<_>>();
    threads.into_iter().for_each(|thread| thread.join().unwrap());

    let mut expected = (0..800).map(TracingEvent::Value).collect::<Vec<_>>();
    expected.push(TracingEvent::Completion(Completion::Finished));

    assert_eq!(subscriber.events_without_subscription(), expected);
}

#[test]
fn cancelling_from_receive_stops_delivery() {
    let subscriber = Arc::new(TracingSubscriber::<i32, Infallible>::with_initial_demand(Demand::unlimited())
        .on_value(|value, subscription| {
            if *value == 2 { subscription.cancel(); }
            Demand::none()
        }));

    sequence(0..10).subscribe(Arc::clone(&subscriber));

    assert_eq!(subscriber.events_without_subscription(), vec![TracingEvent::Value(0), TracingEvent::Value(1), TracingEvent::Value(2)]);
    assert_eq!(Arc::strong_count(&subscriber), 1);
}

#[test]
fn zero_demand_is_an_error_until_the_sequence_ends() {
    let subscriber = Arc::new(TracingSubscriber::<i32, Infallible>::new());
    sequence(vec![1]).subscribe(Arc::clone(&subscriber));

    let subscription = subscriber.subscription().unwrap();
    assert_eq!(subscription.request(Demand::none()), Err(SubscriptionError::ZeroDemand));

    subscription.request(Demand::max(1)).unwrap();
    assert_eq!(subscription.request(Demand::none()), Ok(()));

    assert_eq!(subscriber.events_without_subscription(), vec![TracingEvent::Value(1), TracingEvent::Completion(Completion::Finished)]);
}

#[test]
fn sink_reads_a_mapped_sequence() {
    let received    = Arc::new(Mutex::new(vec![]));
    let completed   = Arc::new(Mutex::new(None));

    let values      = Arc::clone(&received);
    let completion  = Arc::clone(&completed);
    let cancellable = sequence(1..=4)
        .map(|x| x * x)
        .sink(Demand::unlimited(), move |value| values.lock().unwrap().push(value), move |finished| *completion.lock().unwrap() = Some(finished));

    assert_eq!(*received.lock().unwrap(), vec![1, 4, 9, 16]);
    assert_eq!(*completed.lock().unwrap(), Some(Completion::Finished));
    assert!(!cancellable.is_active());
}

#[test]
fn dropping_sink_cancels_the_sequence() {
    let received    = Arc::new(Mutex::new(vec![]));
    let values      = Arc::clone(&received);

    let publisher   = sequence(0..10);
    let cancellable = publisher.sink(Demand::max(3), move |value| values.lock().unwrap().push(value), |_| { });

    assert!(cancellable.is_active());
    drop(cancellable);

    assert_eq!(*received.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn zero_demand_is_an_error_after_values_have_been_delivered() {
    let subscriber = Arc::new(TracingSubscriber::<i32, Infallible>::new());
    sequence(vec![1, 2]).subscribe(Arc::clone(&subscriber));

    let subscription = subscriber.subscription().unwrap();
    subscription.request(Demand::max(1)).unwrap();
    assert_eq!(subscription.request(Demand::none()), Err(SubscriptionError::ZeroDemand));

    subscription.request(Demand::max(1)).unwrap();
    assert_eq!(subscriber.events_without_subscription(), vec![TracingEvent::Value(1), TracingEvent::Value(2), TracingEvent::Completion(Completion::Finished)]);
}

#[test]
fn racing_single_requests_are_never_stranded() {
    let _ = env_logger::try_init();

    for _ in 0..2000 {
        let subscriber = Arc::new(TracingSubscriber::<usize, Infallible>::new());
        sequence(0..16).subscribe(Arc::clone(&subscriber));

        let subscription    = subscriber.subscription().unwrap();
        let barrier         = Arc::new(Barrier::new(8));

        let threads = (0..8).map(|_| {
            let subscription    = Arc::clone(&subscription);
            let barrier         = Arc::clone(&barrier);
            thread::spawn(move || { barrier.wait(); subscription.request(Demand::max(1)).unwrap(); })
        }).collect::<Vec<_>>();
        threads.into_iter().for_each(|thread| thread.join().unwrap());

        let expected = (0..8).map(TracingEvent::Value).collect::<Vec<_>>();
        assert_eq!(subscriber.events_without_subscription(), expected);
    }
}
