mod compact;
mod parallel;
mod pipeline;

pub use parallel::{ParallelDispatch, SequentialDispatch};
pub use pipeline::{IterationStats, PathBuffers, trace_iteration};

/// Data-parallel execution of one pipeline stage.
///
/// Each call runs `f` once per slot and returns only after every slot is
/// done, so consecutive calls are separated by a full barrier. A slot is
/// handed out as `&mut`, which rules out two invocations touching the same
/// slot.
pub trait Dispatch: Sync {
    fn for_each<T, F>(&self, slots: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync;

    fn threads(&self) -> usize;
}
