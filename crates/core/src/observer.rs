/// Watches a running simulation, one event at a time.
///
/// Returning `Some(action)` asks the simulation to react, for example by
/// stopping early. Returning `None` lets it carry on.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer, and `()` is an
/// observer that never acts.
pub trait Observer<E, A> {
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _: &E) -> Option<A> {
        None
    }
}
