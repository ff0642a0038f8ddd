//! Interaction Recorder Module
//!
//! Bounded FIFO history of user interactions. Pure data collection; all
//! interpretation lives in the analyzer.

use std::collections::VecDeque;

use crate::interaction::{InteractionEvent, DEFAULT_HISTORY_WINDOW};

// == Interaction Recorder ==
/// Keeps the most recent interaction events, oldest dropped first.
#[derive(Debug)]
pub struct InteractionRecorder {
    /// Recorded events, oldest at the front
    history: VecDeque<InteractionEvent>,
    /// Maximum number of retained events
    window: usize,
}

impl Default for InteractionRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl InteractionRecorder {
    // == Constructor ==
    /// Creates a recorder retaining at most `window` events.
    pub fn new(window: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(window.min(DEFAULT_HISTORY_WINDOW)),
            window: window.max(1),
        }
    }

    // == Record ==
    /// Appends an event, trimming the oldest entry past the window.
    ///
    /// Purely additive; has no failure modes.
    pub fn record(&mut self, event: InteractionEvent) {
        if self.history.len() >= self.window {
            self.history.pop_front();
        }
        self.history.push_back(event);
    }

    // == Accessors ==
    /// All retained events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &InteractionEvent> {
        self.history.iter()
    }

    /// Retained slice navigation events, oldest first.
    pub fn navigation_events(&self) -> impl Iterator<Item = &InteractionEvent> {
        self.history.iter().filter(|e| e.is_navigation())
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Returns true if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
