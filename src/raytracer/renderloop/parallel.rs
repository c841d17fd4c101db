use super::Dispatch;
use crate::raytracer::error::{RenderError, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Runs stages on a dedicated rayon pool.
pub struct ParallelDispatch {
    pool: ThreadPool,
}

impl ParallelDispatch {
    pub fn new(threads: Option<usize>) -> Result<Self> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("tracer-worker-{i}"));
        if let Some(threads) = threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| RenderError::backend("building worker pool", e))?;
        Ok(Self { pool })
    }
}

impl Dispatch for ParallelDispatch {
    fn for_each<T, F>(&self, slots: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync,
    {
        self.pool.install(|| {
            slots
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, slot)| f(i, slot));
        });
    }

    fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

/// Single-threaded reference dispatcher.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialDispatch;

impl Dispatch for SequentialDispatch {
    fn for_each<T, F>(&self, slots: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync,
    {
        for (i, slot) in slots.iter_mut().enumerate() {
            f(i, slot);
        }
    }

    fn threads(&self) -> usize {
        1
    }
}
