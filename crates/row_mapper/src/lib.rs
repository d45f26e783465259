//! # row_mapper
//!
//! Named-field views over positional rows.
//!
//! [`create`] turns a list of field names into a [`ViewDescriptor`]. The
//! descriptor is applied to rows (any [`Backing`] sequence: a `Vec`, a slice
//! or an array) to produce [`ViewInstance`]s that read and write the row in
//! place by name or by offset, iterate it, render it, and serialise it as a
//! map of field names to values.
//!
//! This crate provides:
//!
//! - [`config`] — [`MapperConfig`], the field list plus options.
//! - [`accessor`] — the resolved name and offset table behind a descriptor.
//! - [`descriptor`] — [`ViewDescriptor`], the reusable template.
//! - [`instance`] — [`ViewInstance`], the per-row view.
//! - [`backing`] — the [`Backing`] trait for row containers.
//! - [`plain`] — [`PlainObject`] snapshots.
//! - [`codec`] — JSON and MessagePack helpers.
//! - [`error`] — [`MapperError`].
//!
//! ## Usage
//!
//! ```rust
//! use row_mapper::{Field, create};
//!
//! let person = create(["id", "name"]).unwrap();
//! let mut row = vec!["7".to_string(), "Alice".to_string()];
//!
//! let mut view = person.call(&mut row, Some(0));
//! assert_eq!(view.value("name").map(String::as_str), Some("Alice"));
//! assert_eq!(view.get("index"), Some(Field::Row(0)));
//!
//! view.set("name", "Bob".to_string()).unwrap();
//! assert!(view.set("index", "1".to_string()).is_err());
//! assert_eq!(view.to_string(), "7,Bob");
//! assert_eq!(row[1], "Bob");
//! ```

pub mod accessor;
pub mod backing;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod instance;
pub mod plain;

pub use accessor::{Accessor, AccessorEntry, AccessorTable, RAW_FIELD, ROW_FIELD};
pub use backing::Backing;
pub use config::{DEFAULT_CLASS_NAME, MapperConfig};
pub use descriptor::ViewDescriptor;
pub use error::MapperError;
pub use instance::{Field, ViewInstance};
pub use plain::PlainObject;

/// Build a [`ViewDescriptor`] from a field list or configuration.
///
/// Accepts a list of names (`["id", "name"]`, `Vec<String>`, ...), a
/// [`MapperConfig`], or a [`serde_json::Value`] holding either form.
///
/// # Errors
///
/// Returns [`MapperError::Configuration`] if no field list can be resolved.
pub fn create<C>(config: C) -> Result<ViewDescriptor, MapperError>
where
    C: TryInto<MapperConfig>,
    MapperError: From<C::Error>,
{
    let config = config.try_into()?;
    ViewDescriptor::new(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_create_from_name_lists() {
        init_tracing();
        assert_eq!(create(["a", "b"]).unwrap().len(), 2);
        assert_eq!(create(vec!["a", "b", "c"]).unwrap().len(), 3);
        assert_eq!(create(vec!["a".to_string()]).unwrap().len(), 1);
        let names: &[&str] = &["x", "y"];
        assert_eq!(create(names).unwrap().fields(), ["x", "y"]);
    }

    #[test]
    fn test_create_from_json() {
        init_tracing();
        let desc = create(json!({
            "headers": ["id", "name", "id"],
            "className": "Person",
            "preventCollisions": true,
        }))
        .unwrap();
        assert_eq!(desc.display_name(), "Person");
        assert_eq!(desc.accessors().column("id"), Some(0));
        assert_eq!(create(json!(["id"])).unwrap().len(), 1);
    }

    #[test]
    fn test_create_without_headers_fails() {
        init_tracing();
        for config in [json!(null), json!({}), json!({ "headers": null }), json!("id")] {
            let err = create(config).unwrap_err();
            assert!(matches!(err, MapperError::Configuration(_)));
            assert!(err.to_string().contains("field list or configuration object"));
        }
        assert!(matches!(
            create(MapperConfig::default()),
            Err(MapperError::Configuration(_))
        ));
    }

    #[test]
    fn test_read_after_write_for_unique_fields() {
        init_tracing();
        let fields = ["a", "b", "c", "d"];
        let desc = create(fields).unwrap();
        let mut values: Vec<i64> = vec![10, 20, 30, 40, 50];
        let mut view = desc.call(&mut values, None);
        for (i, name) in fields.iter().enumerate() {
            assert_eq!(view.value(name), Some(&view.as_slice()[i]));
            assert_eq!(view.get_offset(i), view.value(name));

            view.set(name, i as i64 * 2).unwrap();
            assert_eq!(view.get_offset(i), Some(&(i as i64 * 2)));

            view.set_offset(i, i as i64 * 3).unwrap();
            assert_eq!(view.value(name), Some(&(i as i64 * 3)));
        }
        assert_eq!(view.get_offset(fields.len()), None);
    }

    #[test]
    fn test_descriptor_is_reusable_across_rows() {
        init_tracing();
        let desc = create(["id", "name"]).unwrap();
        let mut first = vec![1, 2];
        let mut second = vec![3, 4];
        let a = desc.call(&mut first, Some(0));
        let b = ViewInstance::new(&desc, &mut second, Some(1));
        assert_eq!(a.value("name"), Some(&2));
        assert_eq!(b.value("name"), Some(&4));
        assert_eq!(a.get(ROW_FIELD), Some(Field::Row(0)));
        assert_eq!(b.get(ROW_FIELD), Some(Field::Row(1)));
    }
}
