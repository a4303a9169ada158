use crate::{input::events::PathEvent, rendering::arena::PathId};
use instant::Instant;
use std::time::Duration;

/// Tracks the single hovered path and throttles hover hit tests
///
/// Tests arriving within the throttle window of the previous one are dropped,
/// not deferred.
#[derive(Debug, Clone)]
pub struct HoverTracker {
    hovered: Option<PathId>,
    throttle: Duration,
    last_test: Option<Instant>,
}

impl HoverTracker {
    pub fn new(throttle: Duration) -> Self {
        Self {
            hovered: None,
            throttle,
            last_test: None,
        }
    }

    pub fn hovered(&self) -> Option<PathId> {
        self.hovered
    }

    pub fn throttle(&self) -> Duration {
        self.throttle
    }

    pub fn set_throttle(&mut self, throttle: Duration) {
        self.throttle = throttle;
    }

    /// Whether a hit test may run at `now`; if so, starts a new window
    pub fn should_test(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_test {
            if now < last + self.throttle {
                return false;
            }
        }
        self.last_test = Some(now);
        true
    }

    /// Records the path under the pointer, appending the resulting events
    pub fn update(&mut self, candidate: Option<PathId>, events: &mut Vec<PathEvent>) {
        if candidate != self.hovered {
            if let Some(previous) = self.hovered.take() {
                events.push(PathEvent::MouseOut(previous));
            }
            if let Some(candidate) = candidate {
                events.push(PathEvent::MouseOver(candidate));
                self.hovered = Some(candidate);
            }
        }

        if let Some(hovered) = self.hovered {
            events.push(PathEvent::MouseMove(hovered));
        }
    }

    /// Pointer left the surface: clears the hovered path and the throttle
    pub fn mouse_out(&mut self, events: &mut Vec<PathEvent>) {
        if let Some(previous) = self.hovered.take() {
            events.push(PathEvent::MouseOut(previous));
        }
        self.last_test = None;
    }

    /// Drops `id` if it is hovered, without emitting events
    pub fn forget(&mut self, id: PathId) {
        if self.hovered == Some(id) {
            self.hovered = None;
        }
    }

    pub fn reset(&mut self) {
        self.hovered = None;
        self.last_test = None;
    }
}
