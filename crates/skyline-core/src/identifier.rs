//! Entity identifiers.
//!
//! Applications, packages and classes share a single id space, so the layout
//! map can be keyed by one [`Id`] type. An id owns a shared copy of its name:
//! cloning is a reference-count bump, and the name is released together with
//! the last structure tree or layout that refers to it.

use std::{borrow::Borrow, fmt, ops::Deref, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of an entity in the software structure tree.
///
/// # Examples
///
/// ```
/// use skyline_core::identifier::Id;
///
/// let class_id = Id::new("org.example.Main");
/// assert_eq!(class_id, "org.example.Main");
/// assert_eq!(class_id, Id::new("org.example.Main"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(Arc<str>);

impl Id {
    /// Creates an `Id` from its string form.
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// Returns the identifier's string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Id {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

// Hash and Eq agree with `str`, so maps keyed by `Id` can be queried by name.
impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_equal_names_are_equal_ids() {
        let id1 = Id::new("net.shop.Cart");
        let id2 = Id::from("net.shop.Cart".to_string());
        let id3 = Id::new("net.shop.Order");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "net.shop.Cart");
    }

    #[test]
    fn test_display() {
        let id = Id::new("pkg-42");
        assert_eq!(id.to_string(), "pkg-42");
        assert_eq!(id.as_str(), "pkg-42");
    }

    #[test]
    fn test_map_lookup_by_name() {
        let mut map = HashMap::new();
        map.insert(Id::new("class-3"), 3);
        assert_eq!(map.get("class-3"), Some(&3));
        assert_eq!(map.get("class-4"), None);
    }

    #[test]
    fn test_name_released_with_last_id() {
        let id = Id::new("short-lived");
        let weak = Arc::downgrade(&id.0);
        let copy = id.clone();

        drop(id);
        assert!(weak.upgrade().is_some());
        drop(copy);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_serde_as_string() {
        let id = Id::new("class-7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"class-7\"");

        let back: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
