//! The game-loop driver.
//!
//! Runs an [`Application`]'s `init`/`update` contract until the
//! application asks to stop, measuring elapsed wall-clock time between
//! iterations as the per-tick delta. Two [`LoopScheduler`] strategies
//! cover the two target families: a native blocking loop, and a
//! host-driven callback loop for environments (web/Emscripten) that
//! forbid blocking the main thread.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::handle::ResourceCreationError;
use crate::window::WindowError;

mod blocking;
pub use blocking::BlockingScheduler;

#[cfg(target_os = "emscripten")]
mod callback;
#[cfg(target_os = "emscripten")]
pub use callback::CallbackScheduler;

/// Elapsed wall-clock time since the previous tick.
pub type DeltaTime = Duration;

/// Top-level error for context construction and loop startup.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Window or GL context setup failed.
    #[error("window error: {0}")]
    Window(#[from] WindowError),

    /// A native resource could not be created.
    #[error("resource error: {0}")]
    Resource(#[from] ResourceCreationError),

    /// Application-specific startup failure.
    #[error("{0}")]
    Application(String),
}

/// The per-tick contract the driver runs.
pub trait Application {
    /// Called once, after construction, before the first tick.
    fn init(&mut self);

    /// One tick. Return false to stop the loop; the application is torn
    /// down on the stopping tick and never called again.
    fn update(&mut self, delta_time: DeltaTime) -> bool;
}

/// Source of monotonic timestamps for delta measurement.
pub trait Clock {
    /// The current instant. Must never move backwards.
    fn now(&mut self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&mut self) -> Instant {
        Instant::now()
    }
}

/// Owns an application between ticks.
///
/// One `tick()` computes the delta since the previous tick, invokes
/// `update`, and on a false return drops the application exactly once.
/// Further ticks after termination do nothing and report false.
pub struct Ticker<A: Application, C: Clock = MonotonicClock> {
    context: Option<A>,
    clock: C,
    previous: Instant,
}

impl<A: Application> Ticker<A> {
    /// Initialize `context` and prepare it for ticking against the real
    /// monotonic clock.
    pub fn new(context: A) -> Self {
        Self::with_clock(context, MonotonicClock)
    }
}

impl<A: Application, C: Clock> Ticker<A, C> {
    /// Initialize `context` and prepare it for ticking against `clock`.
    pub fn with_clock(mut context: A, mut clock: C) -> Self {
        context.init();
        let previous = clock.now();
        Self {
            context: Some(context),
            clock,
            previous,
        }
    }

    /// Run one tick. Returns whether the loop should continue.
    pub fn tick(&mut self) -> bool {
        let Some(context) = self.context.as_mut() else {
            return false;
        };

        let now = self.clock.now();
        let delta_time = now.saturating_duration_since(self.previous);
        self.previous = now;

        if context.update(delta_time) {
            true
        } else {
            // Teardown: dropping the context releases its resources.
            self.context = None;
            false
        }
    }

    /// Whether the application has stopped and been torn down.
    pub fn is_terminated(&self) -> bool {
        self.context.is_none()
    }
}

/// How a target drives the ticker: "run until stop requested".
pub trait LoopScheduler {
    /// Drive `ticker` until its application stops.
    ///
    /// The blocking strategy returns once the loop has fully terminated;
    /// the host-callback strategy returns after registering with the host
    /// scheduler, termination then being asynchronous from the caller's
    /// point of view.
    fn run<A, C>(self, ticker: Ticker<A, C>)
    where
        A: Application + 'static,
        C: Clock + 'static;
}

/// Construct the application, initialize it, and drive it with the
/// target's default scheduler. Returns status 0 once the loop is done
/// (native) or registered (web).
pub fn run<A, F>(make_context: F) -> Result<i32, EngineError>
where
    A: Application + 'static,
    F: FnOnce() -> Result<A, EngineError>,
{
    let ticker = Ticker::new(make_context()?);

    #[cfg(not(target_os = "emscripten"))]
    BlockingScheduler.run(ticker);

    #[cfg(target_os = "emscripten")]
    CallbackScheduler.run(ticker);

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EventQueue};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// A clock advanced explicitly by the test.
    struct ManualClock {
        base: Instant,
        offset: Rc<Cell<Duration>>,
    }

    impl ManualClock {
        fn new() -> (Self, Rc<Cell<Duration>>) {
            let offset = Rc::new(Cell::new(Duration::ZERO));
            (
                Self {
                    base: Instant::now(),
                    offset: Rc::clone(&offset),
                },
                offset,
            )
        }
    }

    impl Clock for ManualClock {
        fn now(&mut self) -> Instant {
            self.base + self.offset.get()
        }
    }

    #[derive(Default)]
    struct Trace {
        updates: Cell<usize>,
        inits: Cell<usize>,
        drops: Cell<usize>,
        deltas: RefCell<Vec<Duration>>,
    }

    /// Updates `ticks_left` times, then asks to stop.
    struct CountdownApp {
        ticks_left: usize,
        trace: Rc<Trace>,
    }

    impl Application for CountdownApp {
        fn init(&mut self) {
            self.trace.inits.set(self.trace.inits.get() + 1);
        }

        fn update(&mut self, delta_time: DeltaTime) -> bool {
            self.trace.updates.set(self.trace.updates.get() + 1);
            self.trace.deltas.borrow_mut().push(delta_time);
            if self.ticks_left == 0 {
                return false;
            }
            self.ticks_left -= 1;
            true
        }
    }

    impl Drop for CountdownApp {
        fn drop(&mut self) {
            self.trace.drops.set(self.trace.drops.get() + 1);
        }
    }

    #[test]
    fn test_loop_calls_update_until_false_then_tears_down_once() {
        let trace = Rc::new(Trace::default());
        let app = CountdownApp {
            ticks_left: 4,
            trace: Rc::clone(&trace),
        };
        let (clock, _offset) = ManualClock::new();

        BlockingScheduler.run(Ticker::with_clock(app, clock));

        assert_eq!(trace.inits.get(), 1);
        assert_eq!(trace.updates.get(), 5); // 4 trues + the final false
        assert_eq!(trace.drops.get(), 1);
    }

    #[test]
    fn test_tick_after_termination_is_inert() {
        let trace = Rc::new(Trace::default());
        let app = CountdownApp {
            ticks_left: 0,
            trace: Rc::clone(&trace),
        };
        let (clock, _offset) = ManualClock::new();
        let mut ticker = Ticker::with_clock(app, clock);

        assert!(!ticker.tick());
        assert!(ticker.is_terminated());
        assert!(!ticker.tick());
        assert!(!ticker.tick());

        assert_eq!(trace.updates.get(), 1);
        assert_eq!(trace.drops.get(), 1);
    }

    #[test]
    fn test_delta_time_reflects_clock_advance() {
        let trace = Rc::new(Trace::default());
        let app = CountdownApp {
            ticks_left: 2,
            trace: Rc::clone(&trace),
        };
        let (clock, offset) = ManualClock::new();
        let mut ticker = Ticker::with_clock(app, clock);

        offset.set(Duration::from_millis(5));
        ticker.tick();
        offset.set(Duration::from_millis(5) + Duration::from_micros(16_667));
        ticker.tick();

        let deltas = trace.deltas.borrow();
        assert_eq!(deltas[0], Duration::from_millis(5));
        assert_eq!(deltas[1], Duration::from_micros(16_667));
    }

    #[test]
    fn test_delta_time_never_negative_for_stalled_clock() {
        let trace = Rc::new(Trace::default());
        let app = CountdownApp {
            ticks_left: 1,
            trace: Rc::clone(&trace),
        };
        let (clock, _offset) = ManualClock::new();
        let mut ticker = Ticker::with_clock(app, clock);

        ticker.tick();
        assert_eq!(trace.deltas.borrow()[0], Duration::ZERO);
    }

    /// Stops as soon as it sees a quit event in its queue.
    struct QuitOnEventApp {
        queue: EventQueue,
        trace: Rc<Trace>,
    }

    impl Application for QuitOnEventApp {
        fn init(&mut self) {}

        fn update(&mut self, _delta_time: DeltaTime) -> bool {
            self.trace.updates.set(self.trace.updates.get() + 1);
            while let Some(event) = self.queue.poll() {
                if matches!(event, Event::Quit) {
                    return false;
                }
            }
            true
        }
    }

    impl Drop for QuitOnEventApp {
        fn drop(&mut self) {
            self.trace.drops.set(self.trace.drops.get() + 1);
        }
    }

    #[test]
    fn test_pending_quit_event_stops_after_one_tick() {
        let trace = Rc::new(Trace::default());
        let mut queue = EventQueue::new();
        queue.push(Event::Quit);
        let app = QuitOnEventApp {
            queue,
            trace: Rc::clone(&trace),
        };
        let (clock, _offset) = ManualClock::new();

        BlockingScheduler.run(Ticker::with_clock(app, clock));

        assert_eq!(trace.updates.get(), 1);
        assert_eq!(trace.drops.get(), 1);
    }
}
