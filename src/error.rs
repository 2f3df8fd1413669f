use std::error::Error;
use std::fmt;

///
/// Ways a caller can misuse a subscription
///
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SubscriptionError {
    /// A demand of zero elements was requested on a subscription that is still live
    ZeroDemand
}

impl fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubscriptionError::ZeroDemand => write!(f, "demand must be at least one element")
        }
    }
}

impl Error for SubscriptionError { }
