//! View instances.
//!
//! A [`ViewInstance`] binds a descriptor's accessor table to one borrowed
//! row. It holds no values of its own: every read and write goes straight to
//! the backing sequence, so a change made through one accessor is visible
//! through every other, and through the caller's own handle once the view is
//! dropped.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::accessor::Accessor;
use crate::backing::Backing;
use crate::descriptor::ViewDescriptor;
use crate::error::MapperError;
use crate::plain::{PlainObject, serialize_members};

/// The result of a named read.
#[derive(Debug, PartialEq)]
pub enum Field<'v, T> {
    /// A column value.
    Value(&'v T),
    /// The row position, from the reserved `index` field.
    Row(usize),
    /// The backing sequence, from the reserved `array` field.
    Raw(&'v [T]),
}

impl<'v, T> Field<'v, T> {
    /// The column value, if this is one.
    #[must_use]
    pub fn as_value(&self) -> Option<&'v T> {
        match *self {
            Field::Value(value) => Some(value),
            Field::Row(_) | Field::Raw(_) => None,
        }
    }
}

/// A named-field view over one borrowed row.
pub struct ViewInstance<'a, S: Backing + ?Sized> {
    descriptor: &'a ViewDescriptor,
    values: &'a mut S,
    row: Option<usize>,
}

impl<'a, S: Backing + ?Sized> ViewInstance<'a, S> {
    /// Wrap `values` as a view of `descriptor`.
    ///
    /// Produces the same view as [`ViewDescriptor::call`].
    pub fn new(descriptor: &'a ViewDescriptor, values: &'a mut S, row: Option<usize>) -> Self {
        Self::init(descriptor, values, row)
    }

    pub(crate) fn init(descriptor: &'a ViewDescriptor, values: &'a mut S, row: Option<usize>) -> Self {
        Self {
            descriptor,
            values,
            row,
        }
    }

    /// The descriptor this view was created from.
    #[must_use]
    pub fn descriptor(&self) -> &'a ViewDescriptor {
        self.descriptor
    }

    /// Returns `true` if this view was created from `descriptor` or a clone
    /// of it.
    #[must_use]
    pub fn is_instance_of(&self, descriptor: &ViewDescriptor) -> bool {
        self.descriptor.same_as(descriptor)
    }

    /// The row position supplied at creation.
    #[must_use]
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    /// Read a named field.
    ///
    /// Returns `None` for unknown names, for columns past the end of the row,
    /// and for the `index` field of a view created without a row position.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Field<'_, S::Item>> {
        let entry = self.descriptor.accessors().lookup(name)?;
        match entry.accessor {
            Accessor::Column(offset) => self.values.as_slice().get(offset).map(Field::Value),
            Accessor::Row => self.row.map(Field::Row),
            Accessor::Raw => Some(Field::Raw(self.values.as_slice())),
        }
    }

    /// Read a column by name. Reserved pseudo-fields are not columns.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&S::Item> {
        let offset = self.descriptor.accessors().column(name)?;
        self.values.as_slice().get(offset)
    }

    /// Mutable access to a column by name, if the row reaches it.
    pub fn value_mut(&mut self, name: &str) -> Option<&mut S::Item> {
        let offset = self.descriptor.accessors().column(name)?;
        self.values.as_mut_slice().get_mut(offset)
    }

    /// Write a named field through to the backing sequence.
    ///
    /// # Errors
    ///
    /// - [`MapperError::ReadOnlyField`] for an unshadowed reserved field.
    /// - [`MapperError::UnknownField`] if no accessor has this name.
    /// - [`MapperError::OutOfBounds`] if the column lies past the end of a
    ///   fixed-length row.
    pub fn set(&mut self, name: &str, value: S::Item) -> Result<(), MapperError> {
        let descriptor = self.descriptor;
        let entry = descriptor
            .accessors()
            .lookup(name)
            .ok_or_else(|| MapperError::UnknownField(name.to_string()))?;
        match entry.accessor {
            Accessor::Column(offset) => self.values.put(offset, value),
            Accessor::Row | Accessor::Raw => Err(MapperError::ReadOnlyField {
                field: entry.name.clone(),
            }),
        }
    }

    /// Read by position. Only offsets below the mapper's field count are
    /// addressable, whatever the row length.
    #[must_use]
    pub fn get_offset(&self, offset: usize) -> Option<&S::Item> {
        if offset >= self.descriptor.len() {
            return None;
        }
        self.values.as_slice().get(offset)
    }

    /// Write by position.
    ///
    /// # Errors
    ///
    /// - [`MapperError::UnknownOffset`] if `offset` is not below the field
    ///   count.
    /// - [`MapperError::OutOfBounds`] if the offset lies past the end of a
    ///   fixed-length row.
    pub fn set_offset(&mut self, offset: usize, value: S::Item) -> Result<(), MapperError> {
        if offset >= self.descriptor.len() {
            return Err(MapperError::UnknownOffset(offset));
        }
        self.values.put(offset, value)
    }

    /// The backing sequence, as borrowed.
    #[must_use]
    pub fn as_slice(&self) -> &[S::Item] {
        self.values.as_slice()
    }

    /// The backing sequence, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [S::Item] {
        self.values.as_mut_slice()
    }

    /// Length of the backing sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the backing sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate the backing sequence in position order, duplicates included.
    pub fn iter(&self) -> std::slice::Iter<'_, S::Item> {
        self.values.as_slice().iter()
    }

    /// Copy the backing sequence into a new vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<S::Item>
    where
        S::Item: Clone,
    {
        self.values.as_slice().to_vec()
    }

    /// Snapshot the named columns.
    ///
    /// Keys follow the collision policy: each name maps to the same offset
    /// as [`value`](Self::value) reads. Reserved pseudo-fields are not
    /// included.
    #[must_use]
    pub fn to_plain_object(&self) -> PlainObject<S::Item>
    where
        S::Item: Clone,
    {
        PlainObject::from_entries(
            self.members()
                .map(|(name, value)| (name.to_string(), value.cloned()))
                .collect(),
        )
    }

    fn members(&self) -> impl Iterator<Item = (&str, Option<&S::Item>)> + Clone {
        let values = self.values.as_slice();
        self.descriptor
            .accessors()
            .columns()
            .map(move |(name, offset)| (name, values.get(offset)))
    }
}

impl<'b, S: Backing + ?Sized> IntoIterator for &'b ViewInstance<'_, S> {
    type Item = &'b S::Item;
    type IntoIter = std::slice::Iter<'b, S::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serialises as the same map [`ViewInstance::to_plain_object`] produces.
impl<S> Serialize for ViewInstance<'_, S>
where
    S: Backing + ?Sized,
    S::Item: Serialize,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serialize_members(self.members(), serializer)
    }
}

/// Renders the backing sequence joined with commas.
impl<S> fmt::Display for ViewInstance<'_, S>
where
    S: Backing + ?Sized,
    S::Item: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

impl<S> fmt::Debug for ViewInstance<'_, S>
where
    S: Backing + ?Sized,
    S::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.descriptor.display_name())?;
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::{RAW_FIELD, ROW_FIELD};
    use crate::config::MapperConfig;
    use crate::create;
    use serde_json::{Value, json};

    fn row(values: Value) -> Vec<Value> {
        match values {
            Value::Array(items) => items,
            other => vec![other],
        }
    }

    #[test]
    fn test_named_and_offset_reads_alias_backing() {
        let desc = create(["id", "name", "age"]).unwrap();
        let mut values = row(json!([1, "Alice", 30]));
        let view = desc.call(&mut values, None);
        assert_eq!(view.value("id"), Some(&json!(1)));
        assert_eq!(view.value("name"), Some(&json!("Alice")));
        assert_eq!(view.get_offset(2), Some(&json!(30)));
        assert_eq!(view.get("age"), Some(Field::Value(&json!(30))));
    }

    #[test]
    fn test_read_after_write_through_either_form() {
        let desc = create(["id", "name"]).unwrap();
        let mut values = row(json!([1, "Alice"]));
        {
            let mut view = desc.call(&mut values, None);
            view.set("name", json!("Bob")).unwrap();
            assert_eq!(view.get_offset(1), Some(&json!("Bob")));
            view.set_offset(0, json!(7)).unwrap();
            assert_eq!(view.value("id"), Some(&json!(7)));
            *view.value_mut("name").unwrap() = json!("Carol");
            assert_eq!(view.get_offset(1), Some(&json!("Carol")));
        }
        assert_eq!(values, row(json!([7, "Carol"])));
    }

    #[test]
    fn test_dual_invocation_is_equivalent() {
        let desc = create(["id", "name", "id"]).unwrap();
        let mut a = row(json!([1, "Alice", 2]));
        let mut b = a.clone();
        let called = desc.call(&mut a, Some(3));
        let constructed = ViewInstance::new(&desc, &mut b, Some(3));

        assert_eq!(called.value("id"), constructed.value("id"));
        assert_eq!(called.get(ROW_FIELD), constructed.get(ROW_FIELD));
        assert_eq!(called.get_offset(0), constructed.get_offset(0));
        assert_eq!(called.to_vec(), constructed.to_vec());
        assert_eq!(called.to_plain_object(), constructed.to_plain_object());
        assert_eq!(
            serde_json::to_value(&called).unwrap(),
            serde_json::to_value(&constructed).unwrap()
        );
        assert!(called.is_instance_of(&desc));
        assert!(constructed.is_instance_of(&desc));
    }

    #[test]
    fn test_collision_last_wins() {
        let desc = create(["id", "name", "id"]).unwrap();
        let mut values = row(json!([1, "Alice", 2]));
        let view = desc.call(&mut values, None);
        assert_eq!(view.value("id"), Some(&json!(2)));
        assert_eq!(view.to_vec(), row(json!([1, "Alice", 2])));
        assert_eq!(view.get_offset(0), Some(&json!(1)));
        assert_eq!(
            serde_json::to_value(view.to_plain_object()).unwrap(),
            json!({ "id": 2, "name": "Alice" })
        );
    }

    #[test]
    fn test_collision_first_wins() {
        let desc = create(MapperConfig::new(["id", "name", "id"]).with_prevent_collisions(true)).unwrap();
        let mut values = row(json!([1, "Alice", 2]));
        let mut view = desc.call(&mut values, None);
        assert_eq!(view.value("id"), Some(&json!(1)));
        assert_eq!(view.iter().cloned().collect::<Vec<_>>(), row(json!([1, "Alice", 2])));
        let plain = view.to_plain_object();
        assert_eq!(plain.len(), 2);
        assert_eq!(plain.get("id"), Some(&json!(1)));

        // The later duplicate stays reachable by position.
        view.set_offset(2, json!(99)).unwrap();
        assert_eq!(view.value("id"), Some(&json!(1)));
        assert_eq!(view.get_offset(2), Some(&json!(99)));
    }

    #[test]
    fn test_shadowed_index_is_a_plain_column() {
        let desc = create(["id", "index"]).unwrap();
        let mut values = row(json!([1, 2]));
        let mut view = desc.call(&mut values, Some(40));
        assert_eq!(view.get(ROW_FIELD), Some(Field::Value(&json!(2))));
        view.set(ROW_FIELD, json!(5)).unwrap();
        assert_eq!(view.get_offset(1), Some(&json!(5)));
        assert_eq!(view.row(), Some(40));
    }

    #[test]
    fn test_reserved_index_is_read_only() {
        let desc = create(["id", "name"]).unwrap();
        let mut values = vec!["v1".to_string(), "v2".to_string()];
        let mut view = desc.call(&mut values, Some(7));
        assert_eq!(view.get(ROW_FIELD), Some(Field::Row(7)));

        let err = view.set(ROW_FIELD, "x".to_string()).unwrap_err();
        assert!(matches!(err, MapperError::ReadOnlyField { ref field } if field == "index"));
        assert!(err.to_string().contains("index"));
        assert_eq!(view.as_slice(), ["v1", "v2"]);
        assert_eq!(view.get(ROW_FIELD), Some(Field::Row(7)));
    }

    #[test]
    fn test_reserved_index_without_row_is_none() {
        let desc = create(["id"]).unwrap();
        let mut values = vec![1];
        let view = desc.call(&mut values, None);
        assert_eq!(view.get(ROW_FIELD), None);
    }

    #[test]
    fn test_reserved_array_returns_backing() {
        let desc = create(["a", "b"]).unwrap();
        let mut values = vec![1, 2, 3];
        let mut view = desc.call(&mut values, None);
        match view.get(RAW_FIELD) {
            Some(Field::Raw(raw)) => assert_eq!(raw, [1, 2, 3]),
            other => panic!("expected raw access, got {other:?}"),
        }
        let err = view.set(RAW_FIELD, 0).unwrap_err();
        assert!(matches!(err, MapperError::ReadOnlyField { ref field } if field == "array"));
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_disabled_reserved_fields_are_absent() {
        let desc = create(MapperConfig::new(["a"]).with_index(false).with_array(false)).unwrap();
        let mut values = vec![1];
        let mut view = desc.call(&mut values, Some(0));
        assert_eq!(view.get(ROW_FIELD), None);
        assert_eq!(view.get(RAW_FIELD), None);
        assert!(matches!(
            view.set(ROW_FIELD, 2),
            Err(MapperError::UnknownField(ref name)) if name == "index"
        ));
    }

    #[test]
    fn test_empty_backing() {
        let desc = create(["id", "name"]).unwrap();
        let mut values: Vec<Value> = Vec::new();
        let view = desc.call(&mut values, None);
        assert_eq!(view.value("id"), None);
        assert_eq!(view.get("name"), None);
        assert_eq!(view.iter().count(), 0);
        assert!(view.is_empty());
        assert_eq!(serde_json::to_value(&view).unwrap(), json!({}));
        let plain = view.to_plain_object();
        assert_eq!(plain.keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(plain.get("id"), None);
    }

    #[test]
    fn test_out_of_range_offset_is_none() {
        let desc = create(["id", "name"]).unwrap();
        let mut values = vec![1, 2, 3, 4];
        let mut view = desc.call(&mut values, None);
        assert_eq!(view.get_offset(2), None);
        assert_eq!(view.get_offset(usize::MAX), None);
        assert!(matches!(view.set_offset(2, 0), Err(MapperError::UnknownOffset(2))));
        // Iteration still covers the whole row.
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn test_write_past_end_grows_vec() {
        let desc = create(["id", "name", "age"]).unwrap();
        let mut values = row(json!([1]));
        {
            let mut view = desc.call(&mut values, None);
            view.set("age", json!(30)).unwrap();
            assert_eq!(view.value("age"), Some(&json!(30)));
        }
        assert_eq!(values, row(json!([1, null, 30])));
    }

    #[test]
    fn test_write_past_end_of_slice_fails() {
        let desc = create(["id", "name"]).unwrap();
        let mut values = [1];
        let mut view = desc.call(values.as_mut_slice(), None);
        assert!(matches!(
            view.set("name", 2),
            Err(MapperError::OutOfBounds { offset: 1, len: 1 })
        ));
        assert_eq!(view.as_slice(), [1]);
    }

    #[test]
    fn test_unknown_name() {
        let desc = create(["id"]).unwrap();
        let mut values = vec![1];
        let mut view = desc.call(&mut values, None);
        assert_eq!(view.get("missing"), None);
        assert!(matches!(view.set("missing", 1), Err(MapperError::UnknownField(_))));
    }

    #[test]
    fn test_display_joins_backing() {
        let desc = create(["id", "name", "id"]).unwrap();
        let mut values = vec!["1".to_string(), "Alice".to_string(), "2".to_string()];
        let view = desc.call(&mut values, None);
        assert_eq!(view.to_string(), "1,Alice,2");
        assert_eq!(format!("row: {view}"), "row: 1,Alice,2");
    }

    #[test]
    fn test_debug_shows_class_and_full_row() {
        let desc = create(MapperConfig::new(["a", "a"]).with_class_name("Pair")).unwrap();
        let mut values = vec![1, 2];
        let view = desc.call(&mut values, None);
        assert_eq!(format!("{view:?}"), "Pair [1, 2]");
    }

    #[test]
    fn test_iterates_by_reference() {
        let desc = create(["a", "b"]).unwrap();
        let mut values = vec![3, 4];
        let view = desc.call(&mut values, None);
        let mut total = 0;
        for value in &view {
            total += value;
        }
        assert_eq!(total, 7);
    }

    #[test]
    fn test_serialize_matches_plain_object() {
        let desc = create(["id", "name", "id"]).unwrap();
        let mut values = row(json!([1, "Alice", 2]));
        let view = desc.call(&mut values, Some(0));
        let json = serde_json::to_string(&view).unwrap();
        assert_eq!(json, r#"{"id":2,"name":"Alice"}"#);
        let restored: PlainObject<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, view.to_plain_object());
    }

    #[test]
    fn test_plain_object_is_a_snapshot() {
        let desc = create(["id"]).unwrap();
        let mut values = vec![1];
        let mut view = desc.call(&mut values, None);
        let before = view.to_plain_object();
        view.set("id", 2).unwrap();
        assert_eq!(before.get("id"), Some(&1));
        assert_eq!(view.to_plain_object().get("id"), Some(&2));
    }

    #[test]
    fn test_views_from_other_descriptors_are_not_instances() {
        let desc = create(["id"]).unwrap();
        let other = create(["id"]).unwrap();
        let mut values = vec![1];
        let view = desc.call(&mut values, None);
        assert!(view.is_instance_of(&desc.clone()));
        assert!(!view.is_instance_of(&other));
        assert_eq!(view.descriptor().display_name(), "RowMapper");
    }
}
