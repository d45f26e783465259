//! Backing sequences.
//!
//! A view never owns its values. It borrows a caller-owned container through
//! the [`Backing`] trait, which exposes the container as a slice and defines
//! what a write past the end means for that container.

use crate::error::MapperError;

/// A positional container a view can alias.
pub trait Backing {
    /// Element type.
    type Item;

    /// The whole sequence, in position order.
    fn as_slice(&self) -> &[Self::Item];

    /// The whole sequence, mutably.
    fn as_mut_slice(&mut self) -> &mut [Self::Item];

    /// Store `value` at `offset`.
    ///
    /// In-range writes replace the existing element. Out-of-range writes grow
    /// the container if it can grow.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::OutOfBounds`] if `offset` is past the end of a
    /// fixed-length container. The container is left untouched.
    fn put(&mut self, offset: usize, value: Self::Item) -> Result<(), MapperError>;

    /// Number of elements.
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` if the sequence has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Growable backing. Gaps left by a write past the end are filled with
/// `T::default()`.
impl<T: Default> Backing for Vec<T> {
    type Item = T;

    fn as_slice(&self) -> &[T] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    fn put(&mut self, offset: usize, value: T) -> Result<(), MapperError> {
        if offset < self.len() {
            self[offset] = value;
        } else {
            self.resize_with(offset, T::default);
            self.push(value);
        }
        Ok(())
    }
}

impl<T> Backing for [T] {
    type Item = T;

    fn as_slice(&self) -> &[T] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    fn put(&mut self, offset: usize, value: T) -> Result<(), MapperError> {
        let len = <[T]>::len(self);
        match self.get_mut(offset) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(MapperError::OutOfBounds { offset, len }),
        }
    }
}

impl<T, const N: usize> Backing for [T; N] {
    type Item = T;

    fn as_slice(&self) -> &[T] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    fn put(&mut self, offset: usize, value: T) -> Result<(), MapperError> {
        Backing::put(self.as_mut_slice(), offset, value)
    }
}
