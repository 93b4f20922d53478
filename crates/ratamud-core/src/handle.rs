use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

const INDEX_BITS: u32 = 32;
const GENERATION_BITS: u32 = 24;
const TAG_SHIFT: u32 = INDEX_BITS + GENERATION_BITS;
const MAX_GENERATION: u32 = (1 << GENERATION_BITS) - 1;

/// Opaque identifier for a resource held in a [`HandleTable`].
///
/// The low 32 bits are the slot index, the next 24 the slot generation and
/// the top 8 the tag of the issuing table. Generations start at 1, so a valid
/// handle is never 0 and hosts can use 0 as their "null" value. Tables with
/// different tags never accept each other's handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(u64);

impl Handle {
    fn new(tag: u8, index: u32, generation: u32) -> Self {
        Self(
            (u64::from(tag) << TAG_SHIFT)
                | (u64::from(generation) << INDEX_BITS)
                | u64::from(index),
        )
    }

    /// Reinterpret a raw value received from a host.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value handed to a host.
    pub fn into_raw(self) -> u64 {
        self.0
    }

    /// Tag of the table that issued this handle.
    pub fn tag(self) -> u8 {
        (self.0 >> TAG_SHIFT) as u8
    }

    fn index(self) -> usize {
        (self.0 & u64::from(u32::MAX)) as usize
    }

    fn generation(self) -> u32 {
        ((self.0 >> INDEX_BITS) as u32) & MAX_GENERATION
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}.{}", self.tag(), self.index(), self.generation())
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Arena of resources addressed by generational [`Handle`]s.
///
/// Released slots are reused with a bumped generation, so a stale handle is
/// rejected with [`CoreError::InvalidHandle`] instead of aliasing whatever now
/// lives in its slot. Handles carry the table's tag, so one issued by a table
/// with another tag is rejected the same way.
#[derive(Debug)]
pub struct HandleTable<T> {
    tag: u8,
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleTable<T> {
    /// Create an empty table with tag 0.
    pub fn new() -> Self {
        Self::tagged(0)
    }

    /// Create an empty table whose handles carry `tag`.
    pub fn tagged(tag: u8) -> Self {
        Self {
            tag,
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Store a value and return its handle.
    pub fn insert(&mut self, value: T) -> Handle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.value = Some(value);
            return Handle::new(self.tag, index as u32, slot.generation);
        }

        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 1,
            value: Some(value),
        });
        Handle::new(self.tag, index as u32, 1)
    }

    /// Tag stamped on every handle this table issues.
    pub fn tag(&self) -> u8 {
        self.tag
    }

    fn owns(&self, handle: Handle) -> bool {
        handle.tag() == self.tag
    }

    /// Borrow the value behind a handle.
    pub fn get(&self, handle: Handle) -> CoreResult<&T> {
        if !self.owns(handle) {
            return Err(CoreError::InvalidHandle(handle));
        }
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.as_ref())
            .ok_or(CoreError::InvalidHandle(handle))
    }

    /// Mutably borrow the value behind a handle.
    pub fn get_mut(&mut self, handle: Handle) -> CoreResult<&mut T> {
        if !self.owns(handle) {
            return Err(CoreError::InvalidHandle(handle));
        }
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.as_mut())
            .ok_or(CoreError::InvalidHandle(handle))
    }

    /// Whether the handle currently refers to a live value.
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_ok()
    }

    /// Remove and return the value behind a handle. The handle is dead afterwards.
    pub fn remove(&mut self, handle: Handle) -> CoreResult<T> {
        if !self.owns(handle) {
            return Err(CoreError::InvalidHandle(handle));
        }
        let index = handle.index();
        let slot = self
            .slots
            .get_mut(index)
            .filter(|slot| slot.generation == handle.generation())
            .ok_or(CoreError::InvalidHandle(handle))?;
        let value = slot.value.take().ok_or(CoreError::InvalidHandle(handle))?;

        if retire_or_bump(slot) {
            self.free.push(index);
        }
        self.len -= 1;
        Ok(value)
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the table holds no live values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every live value. Outstanding handles become stale.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_none() {
                continue;
            }
            if retire_or_bump(slot) {
                self.free.push(index);
            }
        }
        self.len = 0;
    }
}

/// Bump a freed slot's generation. A slot that has used up its generations
/// is retired and reports `false`.
fn retire_or_bump<T>(slot: &mut Slot<T>) -> bool {
    if slot.generation >= MAX_GENERATION {
        return false;
    }
    slot.generation += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_never_zero() {
        let mut table = HandleTable::new();
        let h = table.insert("a");
        assert_ne!(h.into_raw(), 0);
    }

    #[test]
    fn insert_get_remove() {
        let mut table = HandleTable::new();
        let a = table.insert(1);
        let b = table.insert(2);
        assert_eq!(table.len(), 2);
        assert_eq!(*table.get(a).unwrap(), 1);
        *table.get_mut(b).unwrap() += 40;
        assert_eq!(*table.get(b).unwrap(), 42);

        assert_eq!(table.remove(a).unwrap(), 1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(a), Err(CoreError::InvalidHandle(a)));
    }

    #[test]
    fn stale_handle_does_not_alias_reused_slot() {
        let mut table = HandleTable::new();
        let old = table.insert("old");
        table.remove(old).unwrap();

        let new = table.insert("new");
        assert_ne!(old, new);
        assert!(table.get(old).is_err());
        assert_eq!(*table.get(new).unwrap(), "new");
    }

    #[test]
    fn double_remove_is_rejected() {
        let mut table = HandleTable::new();
        let h = table.insert(());
        assert!(table.remove(h).is_ok());
        assert_eq!(table.remove(h), Err(CoreError::InvalidHandle(h)));
        assert!(table.is_empty());
    }

    #[test]
    fn unknown_raw_value_is_rejected() {
        let table: HandleTable<u8> = HandleTable::new();
        assert!(table.get(Handle::from_raw(0)).is_err());
        assert!(table.get(Handle::from_raw(u64::MAX)).is_err());
    }

    #[test]
    fn handles_from_another_table_are_rejected() {
        let mut people = HandleTable::tagged(1);
        let mut places = HandleTable::tagged(2);
        let person = people.insert("Hero");
        let place = places.insert("meadow");
        assert_eq!(person.tag(), 1);
        assert_eq!(place.tag(), 2);
        assert_ne!(person, place);

        assert_eq!(places.get(person), Err(CoreError::InvalidHandle(person)));
        assert!(places.get_mut(person).is_err());
        assert_eq!(places.remove(person), Err(CoreError::InvalidHandle(person)));
        assert_eq!(places.len(), 1);
        assert_eq!(*people.get(person).unwrap(), "Hero");
    }

    #[test]
    fn exhausted_slot_is_retired() {
        let mut table = HandleTable::new();
        let h = table.insert(1);
        table.slots[0].generation = MAX_GENERATION;
        let last = Handle::new(0, 0, MAX_GENERATION);
        assert!(table.get(h).is_err());
        assert_eq!(table.remove(last).unwrap(), 1);

        let next = table.insert(2);
        assert_ne!(next.index(), 0);
        assert!(table.get(last).is_err());
    }

    #[test]
    fn display_shows_tag_index_and_generation() {
        let mut table = HandleTable::tagged(3);
        table.insert(());
        let h = table.insert(());
        assert_eq!(h.to_string(), "#3:1.1");
    }

    #[test]
    fn clear_invalidates_everything() {
        let mut table = HandleTable::new();
        let a = table.insert('a');
        let b = table.insert('b');
        table.clear();
        assert!(table.is_empty());
        assert!(!table.contains(a));
        assert!(!table.contains(b));
    }
}
