//! Native scheduling: a single synchronous thread owns the loop.

use super::{Application, Clock, LoopScheduler, Ticker};

/// Runs the ticker in an unbounded blocking loop on the calling thread.
#[derive(Debug, Default)]
pub struct BlockingScheduler;

impl LoopScheduler for BlockingScheduler {
    fn run<A, C>(self, mut ticker: Ticker<A, C>)
    where
        A: Application + 'static,
        C: Clock + 'static,
    {
        while ticker.tick() {}
    }
}
