//! Accessor tables.
//!
//! An [`AccessorTable`] is built once per mapper from its [`MapperConfig`].
//! It keeps two structures apart:
//!
//! - the positional field list, duplicates preserved, which backs offset
//!   access, iteration and rendering;
//! - the named entries, one per distinct name plus the enabled reserved
//!   pseudo-fields, which back named access and plain-object export.
//!
//! Views never inspect field names themselves; every named read or write is
//! dispatched through [`AccessorTable::lookup`].

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::config::MapperConfig;
use crate::error::MapperError;

/// Name of the reserved pseudo-field exposing the row position.
pub const ROW_FIELD: &str = "index";

/// Name of the reserved pseudo-field exposing the backing sequence.
pub const RAW_FIELD: &str = "array";

/// What a named entry resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    /// Offset into the backing sequence.
    Column(usize),
    /// The row position supplied when the view was created.
    Row,
    /// The backing sequence itself.
    Raw,
}

/// A single named entry in an [`AccessorTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorEntry {
    /// Field or pseudo-field name.
    pub name: String,
    /// What the name resolves to.
    pub accessor: Accessor,
    /// `false` for reserved pseudo-fields.
    pub writable: bool,
}

/// The resolved shape of a mapper.
#[derive(Debug, Clone)]
pub struct AccessorTable {
    /// Field names in column order, duplicates included.
    fields: Vec<String>,
    /// Column entries in first-appearance order, followed by reserved entries.
    entries: Vec<AccessorEntry>,
    by_name: HashMap<String, usize>,
    /// Number of leading column entries in `entries`.
    columns: usize,
    prevent_collisions: bool,
}

impl AccessorTable {
    /// Build the table for a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::Configuration`] if the config has no headers.
    pub fn build(config: &MapperConfig) -> Result<Self, MapperError> {
        let fields = config.headers()?.to_vec();
        let mut table = Self {
            fields: Vec::new(),
            entries: Vec::with_capacity(fields.len() + 2),
            by_name: HashMap::with_capacity(fields.len() + 2),
            columns: 0,
            prevent_collisions: config.prevent_collisions,
        };

        for (offset, name) in fields.iter().enumerate() {
            match table.by_name.get(name) {
                None => table.push(name, Accessor::Column(offset), true),
                Some(&slot) if config.prevent_collisions => {
                    trace!(field = %name, offset, kept = ?table.entries[slot].accessor, "duplicate field ignored");
                }
                Some(&slot) => {
                    trace!(field = %name, offset, replaced = ?table.entries[slot].accessor, "duplicate field rebound");
                    table.entries[slot].accessor = Accessor::Column(offset);
                }
            }
        }
        table.columns = table.entries.len();
        table.fields = fields;

        let names: HashSet<&str> = table.fields.iter().map(String::as_str).collect();
        let mut reserved = Vec::new();
        for (enabled, name, accessor) in [
            (config.index, ROW_FIELD, Accessor::Row),
            (config.array, RAW_FIELD, Accessor::Raw),
        ] {
            if !enabled {
                continue;
            }
            if names.contains(name) {
                trace!(field = name, "reserved field shadowed by column");
            } else {
                reserved.push((name, accessor));
            }
        }
        for (name, accessor) in reserved {
            table.push(name, accessor, false);
        }

        debug!(
            class_name = %config.class_name,
            fields = table.fields.len(),
            named = table.columns,
            prevent_collisions = table.prevent_collisions,
            reserved = table.entries.len() - table.columns,
            "accessor table built"
        );
        Ok(table)
    }

    fn push(&mut self, name: &str, accessor: Accessor, writable: bool) {
        self.by_name.insert(name.to_string(), self.entries.len());
        self.entries.push(AccessorEntry {
            name: name.to_string(),
            accessor,
            writable,
        });
    }

    /// Resolve a name to its entry.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&AccessorEntry> {
        self.by_name.get(name).map(|&slot| &self.entries[slot])
    }

    /// Resolve a name to the offset it reads, if it names a column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        match self.lookup(name)?.accessor {
            Accessor::Column(offset) => Some(offset),
            Accessor::Row | Accessor::Raw => None,
        }
    }

    /// Deduplicated column names with the offset each one resolves to, in
    /// first-appearance order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, usize)> + Clone {
        self.entries[..self.columns]
            .iter()
            .filter_map(|entry| match entry.accessor {
                Accessor::Column(offset) => Some((entry.name.as_str(), offset)),
                Accessor::Row | Accessor::Raw => None,
            })
    }

    /// Every named entry, reserved pseudo-fields last.
    #[must_use]
    pub fn entries(&self) -> &[AccessorEntry] {
        &self.entries
    }

    /// Field names in column order, duplicates included.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of positional fields. Offsets `0..len()` are addressable.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the mapper has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if the first occurrence of a duplicated name wins.
    #[must_use]
    pub fn prevent_collisions(&self) -> bool {
        self.prevent_collisions
    }
}
