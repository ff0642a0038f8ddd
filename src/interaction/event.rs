//! Interaction Event Module
//!
//! Defines the immutable navigation events reported by the viewer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Interaction Kind ==
/// Category of user interaction reported by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Moving between slices in a stack
    SliceNavigation,
    /// Zooming the viewport
    Zoom,
    /// Panning the viewport
    Pan,
    /// Adjusting window/level presentation
    WindowLevel,
    /// Activating a measurement or annotation tool
    ToolUse,
}

// == Navigation Direction ==
/// Direction of a slice navigation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavDirection {
    /// One slice forward
    Next,
    /// One slice backward
    Previous,
    /// A non-adjacent move (scrollbar drag, thumbnail click)
    Jump,
}

// == Interaction Event ==
/// A single recorded user interaction.
///
/// Events are immutable once recorded; the recorder appends them to a
/// bounded history and never mutates them afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// What the user did
    pub kind: InteractionKind,
    /// Wall-clock time the action was observed
    pub timestamp: DateTime<Utc>,
    /// Slice index involved, when the action targets a slice
    pub slice_index: Option<i64>,
    /// Direction of movement for slice navigation actions
    pub direction: Option<NavDirection>,
    /// Viewing session the action belongs to
    pub session_id: String,
}

impl InteractionEvent {
    // == Constructors ==
    /// Creates a slice navigation event at the current time.
    pub fn navigation(slice_index: i64, direction: NavDirection, session_id: impl Into<String>) -> Self {
        Self {
            kind: InteractionKind::SliceNavigation,
            timestamp: Utc::now(),
            slice_index: Some(slice_index),
            direction: Some(direction),
            session_id: session_id.into(),
        }
    }

    /// Creates a non-navigation event (zoom, pan, window/level, tool use).
    pub fn action(kind: InteractionKind, session_id: impl Into<String>) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            slice_index: None,
            direction: None,
            session_id: session_id.into(),
        }
    }

    // == Signature ==
    /// Stable `(kind, direction)` signature used as histogram key.
    ///
    /// Non-navigation events carry no direction and collapse to the kind
    /// alone, e.g. `zoom`; navigation events include the direction, e.g.
    /// `slice_navigation:next`.
    pub fn signature(&self) -> String {
        let kind = match self.kind {
            InteractionKind::SliceNavigation => "slice_navigation",
            InteractionKind::Zoom => "zoom",
            InteractionKind::Pan => "pan",
            InteractionKind::WindowLevel => "window_level",
            InteractionKind::ToolUse => "tool_use",
        };
        match self.direction {
            Some(NavDirection::Next) => format!("{}:next", kind),
            Some(NavDirection::Previous) => format!("{}:previous", kind),
            Some(NavDirection::Jump) => format!("{}:jump", kind),
            None => kind.to_string(),
        }
    }

    /// True for slice navigation events.
    pub fn is_navigation(&self) -> bool {
        self.kind == InteractionKind::SliceNavigation
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_event_shape() {
        let event = InteractionEvent::navigation(12, NavDirection::Next, "sess-1");

        assert_eq!(event.kind, InteractionKind::SliceNavigation);
        assert_eq!(event.slice_index, Some(12));
        assert_eq!(event.direction, Some(NavDirection::Next));
        assert!(event.is_navigation());
    }

    #[test]
    fn test_action_event_has_no_slice_context() {
        let event = InteractionEvent::action(InteractionKind::Zoom, "sess-1");

        assert_eq!(event.slice_index, None);
        assert_eq!(event.direction, None);
        assert!(!event.is_navigation());
    }

    #[test]
    fn test_signature_includes_direction() {
        let next = InteractionEvent::navigation(3, NavDirection::Next, "s");
        let jump = InteractionEvent::navigation(9, NavDirection::Jump, "s");
        let pan = InteractionEvent::action(InteractionKind::Pan, "s");

        assert_eq!(next.signature(), "slice_navigation:next");
        assert_eq!(jump.signature(), "slice_navigation:jump");
        assert_eq!(pan.signature(), "pan");
    }

    #[test]
    fn test_event_serializes() {
        let event = InteractionEvent::navigation(5, NavDirection::Previous, "sess-2");
        let json = serde_json::to_string(&event).unwrap();

        assert!(json.contains("slice_navigation"));
        assert!(json.contains("previous"));
    }
}
