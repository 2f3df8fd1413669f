///
/// The terminal signal of a subscription: either the stream ran out of elements or it failed
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Completion<Failure> {
    /// The publisher has no more elements to send
    Finished,

    /// The publisher stopped because of an error
    Failed(Failure)
}

impl<Failure> Completion<Failure> {
    /// True if this is a normal end of stream
    pub fn is_finished(&self) -> bool {
        match self {
            Completion::Finished    => true,
            Completion::Failed(_)   => false
        }
    }

    ///
    /// Retrieves the failure that ended the stream, if there was one
    ///
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Completion::Finished        => None,
            Completion::Failed(failure) => Some(failure)
        }
    }

    ///
    /// Changes the type of failure carried by this completion
    ///
    pub fn map_failure<NewFailure, TFn>(self, map_fn: TFn) -> Completion<NewFailure>
    where TFn: FnOnce(Failure) -> NewFailure {
        match self {
            Completion::Finished        => Completion::Finished,
            Completion::Failed(failure) => Completion::Failed(map_fn(failure))
        }
    }
}

impl<Failure> From<Result<(), Failure>> for Completion<Failure> {
    fn from(result: Result<(), Failure>) -> Completion<Failure> {
        match result {
            Ok(())          => Completion::Finished,
            Err(failure)    => Completion::Failed(failure)
        }
    }
}
