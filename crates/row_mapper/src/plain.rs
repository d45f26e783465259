//! Plain-object snapshots of a view.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A detached snapshot of a view's named fields.
///
/// Keys are the mapper's deduplicated field names in first-appearance order.
/// A field whose offset lies past the end of the row is kept as `None`; such
/// members are skipped when serialising, so two objects compare equal when
/// they hold the same present members in the same order. Every decoded
/// member is present, including ones whose value is a null.
#[derive(Debug, Clone)]
pub struct PlainObject<T> {
    entries: Vec<(String, Option<T>)>,
}

impl<T> PlainObject<T> {
    pub(crate) fn from_entries(entries: Vec<(String, Option<T>)>) -> Self {
        Self { entries }
    }

    /// Value of a member, `None` if absent or missing.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Returns `true` if the snapshot has a key for `name`, present or not.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Members in order, `None` for missing values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&T>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_ref()))
    }

    /// Number of keys, including missing members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the snapshot has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn present(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key.as_str(), v)))
    }
}

impl<T: PartialEq> PartialEq for PlainObject<T> {
    fn eq(&self, other: &Self) -> bool {
        self.present().eq(other.present())
    }
}

impl<T: Serialize> Serialize for PlainObject<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_members(
            self.entries
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_ref())),
            serializer,
        )
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PlainObject<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PlainObjectVisitor(PhantomData))
    }
}

struct PlainObjectVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for PlainObjectVisitor<T> {
    type Value = PlainObject<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, T>()? {
            entries.push((key, Some(value)));
        }
        Ok(PlainObject { entries })
    }
}

/// Write `(name, value)` members as a map, skipping missing values.
///
/// Shared by [`PlainObject`] and by views so both serialise identically.
pub(crate) fn serialize_members<'a, T, I, S>(members: I, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize + 'a,
    I: Iterator<Item = (&'a str, Option<&'a T>)> + Clone,
    S: Serializer,
{
    let len = members.clone().filter(|(_, value)| value.is_some()).count();
    let mut map = serializer.serialize_map(Some(len))?;
    for (key, value) in members {
        if let Some(value) = value {
            map.serialize_entry(key, value)?;
        }
    }
    map.end()
}
