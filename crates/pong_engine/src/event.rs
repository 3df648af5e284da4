//! Application-level input/window events and the pending-event queue.
//!
//! Host events (glfw) are translated by the window module into [`Event`]
//! values and buffered here, so application code and tests never touch
//! the host queue directly.

use std::collections::VecDeque;

/// Window-system occurrences that mutate window state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    /// The window was resized to the given client size.
    Resized(u32, u32),
    /// The window gained input focus.
    FocusGained,
    /// The window lost input focus.
    FocusLost,
    /// The window became visible.
    Shown,
    /// The window was hidden or minimized.
    Hidden,
    /// The user asked to close the window.
    CloseRequested,
}

/// One pending input or window-system event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Application-level request to quit.
    Quit,
    /// A window-system event.
    Window(WindowEvent),
    /// Pointer moved to the given client coordinates.
    CursorMoved {
        /// Horizontal client coordinate.
        x: f64,
        /// Vertical client coordinate.
        y: f64,
    },
    /// Touch moved to the given client coordinates (web target).
    Touch {
        /// Horizontal client coordinate.
        x: f64,
        /// Vertical client coordinate.
        y: f64,
    },
    /// Keyboard key press/release/repeat.
    Key(glfw::Key, glfw::Action),
}

/// The host queue is finite; pushes beyond this are dropped.
const MAX_PENDING: usize = 256;

/// Ordered queue of pending events.
///
/// `poll` is non-blocking and `any` is a read-only scan: it answers a
/// predicate question over every pending event without consuming any of
/// them, used e.g. to detect whether the host already resized a window
/// before an initial size is forced.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an event. Returns false (dropping the event) when the
    /// queue is at capacity.
    pub fn push(&mut self, event: Event) -> bool {
        if self.events.len() >= MAX_PENDING {
            return false;
        }
        self.events.push_back(event);
        true
    }

    /// Dequeue the oldest pending event, if any.
    pub fn poll(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// Logical OR of `predicate` over every pending event.
    ///
    /// The predicate sees all pending events (no short-circuit), and the
    /// queue's contents and order are unchanged afterwards. Returns false
    /// for an empty queue.
    pub fn any<P>(&self, predicate: P) -> bool
    where
        P: Fn(&Event) -> bool,
    {
        self.events
            .iter()
            .fold(false, |result, event| result | predicate(event))
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<Event> {
        vec![
            Event::Window(WindowEvent::Resized(800, 600)),
            Event::CursorMoved { x: 10.0, y: 20.0 },
            Event::Window(WindowEvent::FocusLost),
            Event::Quit,
        ]
    }

    #[test]
    fn test_poll_returns_events_in_push_order() {
        let mut queue = EventQueue::new();
        for event in sample_events() {
            assert!(queue.push(event));
        }
        let drained: Vec<_> = std::iter::from_fn(|| queue.poll()).collect();
        assert_eq!(drained, sample_events());
        assert!(queue.poll().is_none());
    }

    #[test]
    fn test_any_is_non_destructive() {
        let mut queue = EventQueue::new();
        for event in sample_events() {
            queue.push(event);
        }

        assert!(queue.any(|e| matches!(e, Event::Quit)));
        assert!(!queue.any(|e| matches!(e, Event::Touch { .. })));

        // The scan left every event in place, in order.
        let drained: Vec<_> = std::iter::from_fn(|| queue.poll()).collect();
        assert_eq!(drained, sample_events());
    }

    #[test]
    fn test_any_on_empty_queue_is_false() {
        let queue = EventQueue::new();
        assert!(!queue.any(|_| true));
    }

    #[test]
    fn test_any_sees_every_event() {
        let mut queue = EventQueue::new();
        for event in sample_events() {
            queue.push(event);
        }
        let seen = std::cell::Cell::new(0);
        assert!(queue.any(|_| {
            seen.set(seen.get() + 1);
            true
        }));
        assert_eq!(seen.get(), sample_events().len());
    }

    #[test]
    fn test_push_fails_when_full() {
        let mut queue = EventQueue::new();
        for _ in 0..MAX_PENDING {
            assert!(queue.push(Event::Quit));
        }
        assert!(!queue.push(Event::Quit));
        assert_eq!(queue.len(), MAX_PENDING);
    }
}
