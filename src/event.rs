//! Event value type flowing between layers

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Symbol assigned to an event by the upstream clustering stage.
pub type ClusterId = u16;

/// A sequence of events, ordered by non-decreasing timestamp.
pub type Events = Vec<Event>;

/// A single sensor event.
///
/// `p` is the channel field: polarity for raw sensor events, cluster id for
/// events emitted by a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event {
    /// Timestamp.
    pub t: u64,
    /// Horizontal coordinate.
    pub x: u32,
    /// Vertical coordinate.
    pub y: u32,
    /// Channel / polarity.
    pub p: u16,
}

impl Event {
    /// Create an event from its fields.
    #[inline]
    pub const fn new(t: u64, x: u32, y: u32, p: u16) -> Self {
        Self { t, x, y, p }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_is_value() {
        let a = Event::new(10, 1, 2, 1);
        let b = a;
        assert_eq!(a, b);
        assert_eq!(Event::default(), Event::new(0, 0, 0, 0));
    }
}
