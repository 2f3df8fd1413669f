extern crate flo_reactive;
extern crate env_logger;

use flo_reactive::*;
use flo_reactive::testing::*;

use std::convert::Infallible;
use std::sync::*;
use std::thread;

#[derive(Clone, PartialEq, Debug)]
enum TestFailure {
    Broken(String)
}

#[test]
fn doubles_single_value() {
    let subscriber = Arc::new(TracingSubscriber::with_initial_demand(Demand::unlimited()));
    just(5).map(|x| x * 2).subscribe(Arc::clone(&subscriber));

    assert_eq!(subscriber.events_without_subscription(), vec![TracingEvent::Value(10), TracingEvent::Completion(Completion::Finished)]);
}

#[test]
fn stages_can_be_chained() {
    let subscriber = Arc::new(TracingSubscriber::with_initial_demand(Demand::unlimited()));
    sequence(vec![1, 2, 3])
        .map(|x| x * 2)
        .map(|x: i32| x.to_string())
        .subscribe(Arc::clone(&subscriber));

    assert_eq!(subscriber.events_without_subscription(), vec![
        TracingEvent::Value("2".to_string()),
        TracingEvent::Value("4".to_string()),
        TracingEvent::Value("6".to_string()),
        TracingEvent::Completion(Completion::Finished)
    ]);
}

#[test]
fn demand_reaches_upstream_unchanged() {
    let upstream    = TestPublisher::<i32, Infallible>::new();
    let subscriber  = Arc::new(TracingSubscriber::<i32, Infallible>::new());
    upstream.clone().map(|x| x).subscribe(Arc::clone(&subscriber));

    let subscription = subscriber.subscription().unwrap();
    subscription.request(Demand::max(1)).unwrap();
    subscription.request(Demand::max(7)).unwrap();
    subscription.request(Demand::max(u64::MAX - 1)).unwrap();
    subscription.request(Demand::unlimited()).unwrap();

    assert_eq!(upstream.subscription().events(), vec![
        TestSubscriptionEvent::Request(Demand::max(1)),
        TestSubscriptionEvent::Request(Demand::max(7)),
        TestSubscriptionEvent::Request(Demand::max(u64::MAX - 1)),
        TestSubscriptionEvent::Request(Demand::unlimited())
    ]);
}

#[test]
fn downstream_demand_is_returned_unchanged() {
    let upstream    = TestPublisher::<i32, Infallible>::new();
    let subscriber  = Arc::new(TracingSubscriber::<i32, Infallible>::new().on_value(|value, _| Demand::max(*value as u64)));
    upstream.clone().map(|x| x + 1).subscribe(Arc::clone(&subscriber));

    assert_eq!(upstream.send(2), Some(Demand::max(3)));
    assert_eq!(upstream.send(9), Some(Demand::max(10)));
    assert_eq!(subscriber.events_without_subscription(), vec![TracingEvent::Value(3), TracingEvent::Value(10)]);
}

#[test]
fn failure_is_forwarded_unchanged() {
    let subscriber = Arc::new(TracingSubscriber::<i32, TestFailure>::with_initial_demand(Demand::unlimited()));
    fail(TestFailure::Broken("upstream".to_string())).map(|x: i32| x * 2).subscribe(Arc::clone(&subscriber));

    assert_eq!(subscriber.events(), vec![
        TracingEvent::Subscription,
        TracingEvent::Completion(Completion::Failed(TestFailure::Broken("upstream".to_string())))
    ]);
}

#[test]
fn no_values_after_failure() {
    let upstream    = TestPublisher::<i32, TestFailure>::new();
    let subscriber  = Arc::new(TracingSubscriber::<i32, TestFailure>::new());
    upstream.clone().map(|x| x * 2).subscribe(Arc::clone(&subscriber));

    upstream.send(1);
    upstream.send_completion(Completion::Failed(TestFailure::Broken("late".to_string())));
    assert_eq!(upstream.send(2), Some(Demand::none()));
    upstream.send_completion(Completion::Finished);

    assert_eq!(subscriber.events_without_subscription(), vec![
        TracingEvent::Value(2),
        TracingEvent::Completion(Completion::Failed(TestFailure::Broken("late".to_string())))
    ]);
}

#[test]
fn second_upstream_subscription_is_cancelled() {
    let upstream    = TestPublisher::<i32, Infallible>::new();
    let subscriber  = Arc::new(TracingSubscriber::<i32, Infallible>::new());
    upstream.clone().map(|x| x).subscribe(Arc::clone(&subscriber));

    let duplicate = Arc::new(TestSubscription::new());
    upstream.send_subscription(duplicate.clone());

    assert_eq!(duplicate.events(), vec![TestSubscriptionEvent::Cancel]);
    assert_eq!(subscriber.events(), vec![TracingEvent::Subscription]);

    // Requests still go to the original subscription
    subscriber.subscription().unwrap().request(Demand::max(1)).unwrap();
    assert_eq!(upstream.subscription().events(), vec![TestSubscriptionEvent::Request(Demand::max(1))]);
    assert_eq!(duplicate.events(), vec![TestSubscriptionEvent::Cancel]);
}

#[test]
fn cancelling_many_times_cancels_upstream_once() {
    let upstream    = TestPublisher::<i32, Infallible>::new();
    let subscriber  = Arc::new(TracingSubscriber::<i32, Infallible>::new());
    upstream.clone().map(|x| x).subscribe(Arc::clone(&subscriber));

    let subscription = subscriber.subscription().unwrap();
    subscription.cancel();
    subscription.cancel();
    subscription.cancel();

    assert_eq!(upstream.subscription().events(), vec![TestSubscriptionEvent::Cancel]);
}

#[test]
fn concurrent_cancels_cancel_upstream_once() {
    let upstream    = TestPublisher::<i32, Infallible>::new();
    let subscriber  = Arc::new(TracingSubscriber::<i32, Infallible>::new());
    upstream.clone().map(|x| x).subscribe(Arc::clone(&subscriber));

    let subscription = subscriber.subscription().unwrap();
    let threads = (0..50).map(|_| {
        let subscription = Arc::clone(&subscription);
        thread::spawn(move || subscription.cancel())
    }).collect::<Vec<_>>();
    threads.into_iter().for_each(|thread| thread.join().unwrap());

    assert_eq!(upstream.subscription().events(), vec![TestSubscriptionEvent::Cancel]);
}

#[test]
fn values_after_cancel_are_dropped() {
    let upstream    = TestPublisher::<i32, Infallible>::new();
    let subscriber  = Arc::new(TracingSubscriber::<i32, Infallible>::new().on_value(|_, _| Demand::max(1)));
    upstream.clone().map(|x| x).subscribe(Arc::clone(&subscriber));

    subscriber.subscription().unwrap().cancel();

    assert_eq!(upstream.send(1), Some(Demand::none()));
    upstream.send_completion(Completion::Finished);

    assert!(subscriber.events_without_subscription().is_empty());
}

#[test]
fn cancel_after_completion_does_not_reach_upstream() {
    let upstream    = TestPublisher::<i32, Infallible>::new();
    let subscriber  = Arc::new(TracingSubscriber::<i32, Infallible>::new());
    upstream.clone().map(|x| x).subscribe(Arc::clone(&subscriber));

    upstream.send_completion(Completion::Finished);

    let subscription = subscriber.subscription().unwrap();
    subscription.cancel();
    subscription.request(Demand::max(1)).unwrap();

    assert!(upstream.subscription().events().is_empty());
    assert_eq!(subscriber.events_without_subscription(), vec![TracingEvent::Completion(Completion::Finished)]);
}

#[test]
fn cancel_before_request_delivers_nothing() {
    let subscriber = Arc::new(TracingSubscriber::<i32, Infallible>::new());
    just(1).map(|x| x + 1).subscribe(Arc::clone(&subscriber));

    let subscription = subscriber.subscription().unwrap();
    subscription.cancel();
    subscription.request(Demand::unlimited()).unwrap();

    assert!(subscriber.events_without_subscription().is_empty());
    assert_eq!(Arc::strong_count(&subscriber), 1);
}

#[test]
fn zero_demand_error_comes_from_upstream() {
    let subscriber = Arc::new(TracingSubscriber::<i32, Infallible>::with_initial_demand(Demand::none()));
    just(1).map(|x| x + 1).subscribe(Arc::clone(&subscriber));

    assert_eq!(subscriber.initial_request(), Some(Err(SubscriptionError::ZeroDemand)));

    subscriber.subscription().unwrap().request(Demand::max(1)).unwrap();
    assert_eq!(subscriber.events_without_subscription(), vec![TracingEvent::Value(2), TracingEvent::Completion(Completion::Finished)]);
}

#[test]
fn concurrent_requests_through_map_deliver_once() {
    let _ = env_logger::try_init();

    let subscriber = Arc::new(TracingSubscriber::<i32, Infallible>::new());
    just(1).map(|x| x * 100).subscribe(Arc::clone(&subscriber));

    let subscription = subscriber.subscription().unwrap();
    let threads = (0..100).map(|_| {
        let subscription = Arc::clone(&subscription);
        thread::spawn(move || subscription.request(Demand::max(1)).unwrap())
    }).collect::<Vec<_>>();
    threads.into_iter().for_each(|thread| thread.join().unwrap());

    assert_eq!(subscriber.events_without_subscription(), vec![TracingEvent::Value(100), TracingEvent::Completion(Completion::Finished)]);
}
