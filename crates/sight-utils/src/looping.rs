#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A list with its own cursor whose indices wrap around instead of going out of bounds.
///
/// [`Self::index`] points to the *last used* element: after `set_index(i)`, [`Self::next`]
/// returns the element after `i`. Every accessor returns `None` on an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoopingList<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> Default for LoopingList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LoopingList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move the cursor; `index` wraps modulo the length. No-op on an empty list.
    pub fn set_index(&mut self, index: usize) {
        if let Some(i) = self.wrap(index) {
            self.index = i;
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.wrap(index).map(|i| &self.items[i])
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.wrap(index).map(|i| &mut self.items[i])
    }

    pub fn current(&self) -> Option<&T> {
        self.get(self.index)
    }

    /// Overwrite the element under the cursor, returning the old one.
    pub fn set_current(&mut self, value: T) -> Option<T> {
        let slot = self.get_mut(self.index)?;
        Some(core::mem::replace(slot, value))
    }

    /// Advance the cursor, then return the element it lands on.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&T> {
        let i = self.wrap(self.index + 1)?;
        self.index = i;
        Some(&self.items[i])
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Remove the element at `index` (wrapped), keeping the cursor on the same element
    /// where possible.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        let i = self.wrap(index)?;
        let removed = self.items.remove(i);
        if self.index >= i && self.index > 0 {
            self.index -= 1;
        }
        Some(removed)
    }

    /// Swap in a new sequence. With `reset_index` the cursor goes back to 0; otherwise it is
    /// kept and wrapped into the new length.
    pub fn replace(&mut self, items: impl IntoIterator<Item = T>, reset_index: bool) {
        self.items = items.into_iter().collect();
        if reset_index {
            self.index = 0;
        } else {
            self.index = self.wrap(self.index).unwrap_or(0);
        }
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }

    fn wrap(&self, index: usize) -> Option<usize> {
        match self.items.len() {
            0 => None,
            len => Some(index % len),
        }
    }
}

impl<T: PartialEq> LoopingList<T> {
    /// Remove the first element equal to `value`. Returns whether one was found.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.items.iter().position(|item| item == value) {
            Some(i) => self.remove_at(i).is_some(),
            None => false,
        }
    }
}

impl<T> From<Vec<T>> for LoopingList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items, index: 0 }
    }
}

impl<T> FromIterator<T> for LoopingList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T> IntoIterator for &'a LoopingList<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for LoopingList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
