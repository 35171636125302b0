use crate::graphs::visited::Visited;

/// Engines that can be run to exhaustion, yielding everything they visited.
pub trait Worklist<T, V: Visited<T>> {
    fn worklist(self) -> V;
}
