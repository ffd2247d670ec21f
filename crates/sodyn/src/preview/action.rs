/// Control actions an observer may return from a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop sampling and return the curve so far.
    StopEarly,
}
