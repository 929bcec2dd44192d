//! Output encodings for layer events
//!
//! A remapper changes the coordinates or channel of an emitted event. The
//! timestamp is never touched.

use crate::error::{CellError, Result};
use crate::event::{ClusterId, Event};
use std::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a layer encodes `(event, cluster id)` into its output event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Remapper {
    /// `{t, x, y, k}` - position kept, channel carries the cluster id.
    #[default]
    Identity,
    /// `{t, k, y, 0}` - horizontal axis carries the cluster id.
    Array,
    /// `{t, w*h*k + w*y + x, 0, 0}` - single linear dimension.
    ///
    /// Sizes are non-zero by type, including when deserialized.
    Serializing {
        width: NonZeroU32,
        height: NonZeroU32,
    },
}

impl Remapper {
    pub fn array() -> Self {
        Remapper::Array
    }

    /// Serializing remapper over a `width x height` context.
    pub fn serializing(width: u32, height: u32) -> Result<Self> {
        match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(width), Some(height)) => Ok(Remapper::Serializing { width, height }),
            _ => Err(CellError::ZeroOutputSize { width, height }),
        }
    }

    /// Remap an event given its cluster id.
    ///
    /// For `Serializing`, `x < width`, `y < height` and `k` within the
    /// caller's alphabet are not checked; out-of-range inputs alias other
    /// indices.
    #[inline]
    pub fn remap(&self, ev: Event, k: ClusterId) -> Event {
        match *self {
            Remapper::Identity => Event::new(ev.t, ev.x, ev.y, k),
            Remapper::Array => Event::new(ev.t, u32::from(k), ev.y, 0),
            Remapper::Serializing { width, height } => {
                let (w, h) = (width.get(), height.get());
                let index = w * h * u32::from(k) + w * ev.y + ev.x;
                Event::new(ev.t, index, 0, 0)
            }
        }
    }

    /// Context size for encodings that carry one.
    pub fn size(&self) -> Option<(u32, u32)> {
        match *self {
            Remapper::Serializing { width, height } => Some((width.get(), height.get())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_writes_cluster_to_channel() {
        let ev = Event::new(7, 1, 2, 9);
        assert_eq!(Remapper::Identity.remap(ev, 3), Event::new(7, 1, 2, 3));
    }

    #[test]
    fn test_array() {
        let ev = Event::new(7, 1, 2, 9);
        assert_eq!(Remapper::array().remap(ev, 3), Event::new(7, 3, 2, 0));
        // Input untouched.
        assert_eq!(ev, Event::new(7, 1, 2, 9));
    }

    #[test]
    fn test_serializing() {
        let r = Remapper::serializing(5, 5).unwrap();
        let ev = Event::new(100, 2, 3, 0);
        assert_eq!(r.remap(ev, 4), Event::new(100, 117, 0, 0));
        assert_eq!(r.size(), Some((5, 5)));
    }

    #[test]
    fn test_serializing_is_bijective_in_range() {
        let (w, h, k) = (4u32, 3u32, 5u16);
        let r = Remapper::serializing(w, h).unwrap();
        let mut seen = std::collections::HashSet::new();
        for c in 0..k {
            for y in 0..h {
                for x in 0..w {
                    let out = r.remap(Event::new(0, x, y, 0), c);
                    assert!(seen.insert(out.x));
                }
            }
        }
        assert_eq!(seen.len(), (w * h * u32::from(k)) as usize);
        assert_eq!(seen.iter().max(), Some(&(w * h * u32::from(k) - 1)));
    }

    #[test]
    fn test_serializing_rejects_empty_context() {
        assert!(matches!(
            Remapper::serializing(0, 5),
            Err(CellError::ZeroOutputSize { .. })
        ));
        assert!(Remapper::serializing(5, 0).is_err());
        assert!(Remapper::serializing(0, 0).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serializing_deserialize_rejects_zero() {
        let ok: Remapper =
            serde_json::from_str(r#"{"Serializing":{"width":5,"height":5}}"#).unwrap();
        assert_eq!(ok, Remapper::serializing(5, 5).unwrap());

        let zero = serde_json::from_str::<Remapper>(r#"{"Serializing":{"width":0,"height":5}}"#);
        assert!(zero.is_err());
    }
}
