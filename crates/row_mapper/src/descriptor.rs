//! View descriptors.
//!
//! A [`ViewDescriptor`] is the reusable product of [`create`](crate::create):
//! an immutable accessor table plus a display name. It is built once per
//! field layout and then applied to any number of rows.

use std::fmt;
use std::sync::Arc;

use crate::accessor::AccessorTable;
use crate::backing::Backing;
use crate::config::MapperConfig;
use crate::error::MapperError;
use crate::instance::ViewInstance;

#[derive(Debug)]
struct DescriptorInner {
    class_name: String,
    table: AccessorTable,
}

/// A named, reusable template for viewing rows.
///
/// Cloning is cheap and clones share identity: a view created from one clone
/// reports [`ViewInstance::is_instance_of`] for every other.
#[derive(Debug, Clone)]
pub struct ViewDescriptor {
    inner: Arc<DescriptorInner>,
}

impl ViewDescriptor {
    /// Build a descriptor from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::Configuration`] if the config has no headers.
    pub fn new(config: &MapperConfig) -> Result<Self, MapperError> {
        let table = AccessorTable::build(config)?;
        Ok(Self {
            inner: Arc::new(DescriptorInner {
                class_name: config.class_name.clone(),
                table,
            }),
        })
    }

    /// Wrap `values` as a view, with an optional row position.
    ///
    /// Produces the same view as [`ViewInstance::new`].
    pub fn call<'a, S>(&'a self, values: &'a mut S, row: Option<usize>) -> ViewInstance<'a, S>
    where
        S: Backing + ?Sized,
    {
        ViewInstance::init(self, values, row)
    }

    /// Wrap each row in turn, numbering them from zero.
    pub fn map_rows<'a, S, I>(&'a self, rows: I) -> impl Iterator<Item = ViewInstance<'a, S>>
    where
        S: Backing + ?Sized + 'a,
        I: IntoIterator<Item = &'a mut S>,
    {
        rows.into_iter()
            .enumerate()
            .map(move |(row, values)| self.call(values, Some(row)))
    }

    /// The configured class name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.inner.class_name
    }

    /// Field names in column order, duplicates included.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        self.inner.table.fields()
    }

    /// Number of positional fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.table.len()
    }

    /// Returns `true` if the mapper has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.table.is_empty()
    }

    /// Returns `true` if the first occurrence of a duplicated name wins.
    #[must_use]
    pub fn prevent_collisions(&self) -> bool {
        self.inner.table.prevent_collisions()
    }

    /// The resolved accessor table.
    #[must_use]
    pub fn accessors(&self) -> &AccessorTable {
        &self.inner.table
    }

    /// Returns `true` if both handles refer to the same descriptor.
    #[must_use]
    pub fn same_as(&self, other: &ViewDescriptor) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for ViewDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
