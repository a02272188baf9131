//! Widget identifiers.
//!
//! Ids are handed out by a [`WidgetTree`](crate::WidgetTree) when a widget is
//! attached. They are monotonic per tree and never reused, so a client that
//! still holds markup for a removed widget can never address a newer one by
//! mistake.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix of the DOM id carried by every rendered fragment.
pub const DOM_ID_PREFIX: &str = "pk-";

/// Tree-unique identifier of an attached widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(u64);

impl WidgetId {
    /// The id every tree assigns to its root.
    pub const ROOT: WidgetId = WidgetId(0);

    /// Create a widget ID from raw u64 (for ids received over the wire).
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// DOM id of the fragment rendered for this widget, e.g. `pk-12`.
    pub fn dom_id(&self) -> String {
        format!("{}{}", DOM_ID_PREFIX, self.0)
    }

    /// Parse a DOM id produced by [`WidgetId::dom_id`].
    pub fn from_dom_id(dom_id: &str) -> Option<Self> {
        dom_id
            .strip_prefix(DOM_ID_PREFIX)
            .and_then(|raw| raw.parse().ok())
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WidgetId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for WidgetId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_id_roundtrip() {
        let id = WidgetId::from_raw(42);
        assert_eq!(id.dom_id(), "pk-42");
        assert_eq!(WidgetId::from_dom_id("pk-42"), Some(id));
        assert_eq!(WidgetId::from_dom_id("42"), None);
        assert_eq!(WidgetId::from_dom_id("pk-x"), None);
    }

    #[test]
    fn test_ordering_follows_allocation() {
        assert!(WidgetId::ROOT < WidgetId::from_raw(1));
        let mut ids = vec![WidgetId::from_raw(9), WidgetId::from_raw(3), WidgetId::from_raw(5)];
        ids.sort();
        assert_eq!(ids, vec![WidgetId::from_raw(3), WidgetId::from_raw(5), WidgetId::from_raw(9)]);
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&WidgetId::from_raw(7)).unwrap();
        assert_eq!(json, "7");
        let parsed: WidgetId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, WidgetId::from_raw(7));
    }
}
