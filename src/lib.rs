//!
//! # Reactive streams with backpressure
//!
//! `flo_reactive` connects a `Publisher`, which produces values, to a `Subscriber`, which consumes
//! them, through a `Subscription`. The subscriber is in charge of the flow: nothing is delivered
//! until it asks for it with `request()`, and never more than it has asked for. Each value it
//! receives can ask for more, and at the end the publisher sends exactly one `Completion`.
//!
//! ```
//! # use flo_reactive::*;
//! # use std::sync::*;
//! let received    = Arc::new(Mutex::new(vec![]));
//! let sink_into   = Arc::clone(&received);
//!
//! let mut done    = just(5)
//!     .map(|x| x * 2)
//!     .sink(Demand::unlimited(), move |value| sink_into.lock().unwrap().push(value), |_completion| { });
//!
//! assert!(*received.lock().unwrap() == vec![10]);
//! done.done();
//! ```
//!
//! Subscriptions are thread-safe: `request()` and `cancel()` can be called from any thread, at any
//! time, and the publishers here guarantee that values are never delivered twice, that nothing
//! follows a completion and that a subscription cancelled before it was used never delivers anything.
//! Once a subscription has terminated it lets go of its subscriber.
//!
//! This crate has no threading model of its own: values are delivered on whichever thread calls
//! `request()`.
//!

#![warn(bare_trait_objects)]

mod traits;
mod demand;
mod completion;
mod error;
mod lifecycle;
mod atomic_slot;
mod just;
mod map;
mod empty;
mod fail;
mod sequence;
mod any_subscriber;
mod sink;
#[cfg(feature = "stream")] mod stream;
pub mod testing;

pub use self::traits::*;
pub use self::demand::*;
pub use self::completion::*;
pub use self::error::*;
pub use self::lifecycle::*;
pub use self::atomic_slot::*;
pub use self::just::*;
pub use self::map::*;
pub use self::empty::*;
pub use self::fail::*;
pub use self::sequence::*;
pub use self::any_subscriber::*;
pub use self::sink::*;
#[cfg(feature = "stream")] pub use self::stream::*;
