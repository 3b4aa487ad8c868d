//! Generational arena holding live component instances.

use std::any::Any;
use std::fmt;

use crate::TypeHash;

/// Handle to a component instance.
///
/// This is a copyable, non-owning reference to an object in the
/// [`ObjectHeap`]. Holding a handle never keeps the instance alive; once the
/// instance is destroyed the generation check turns every later lookup into a
/// miss instead of a dangling access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    /// Index into ObjectHeap.slots
    pub index: u32,
    /// Generation for use-after-destroy detection
    pub generation: u32,
    /// Registered class of the instance
    pub class: TypeHash,
}

impl ObjectHandle {
    /// Create a new object handle.
    pub fn new(index: u32, generation: u32, class: TypeHash) -> Self {
        Self {
            index,
            generation,
            class,
        }
    }
}

/// Heap storage for component instances with generational indices.
///
/// Destroying an instance empties its slot and bumps the slot generation;
/// the slot is reused by later allocations.
pub struct ObjectHeap {
    slots: Vec<HeapSlot>,
    free_list: Vec<u32>,
    live: usize,
}

struct HeapSlot {
    generation: u32,
    /// Class the current value was allocated for
    class: TypeHash,
    value: Option<Box<dyn Any + Send + Sync>>,
}

impl HeapSlot {
    fn holds(&self, handle: ObjectHandle) -> bool {
        self.generation == handle.generation && self.class == handle.class && self.value.is_some()
    }
}

impl ObjectHeap {
    /// Create a new empty object heap.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Store instance state and return a handle tagged with `class`.
    pub fn allocate(&mut self, class: TypeHash, value: Box<dyn Any + Send + Sync>) -> ObjectHandle {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.class = class;
            slot.value = Some(value);
            ObjectHandle::new(index, slot.generation, class)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(HeapSlot {
                generation: 0,
                class,
                value: Some(value),
            });
            ObjectHandle::new(index, 0, class)
        }
    }

    /// Check whether the handle refers to a live instance of its class.
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.holds(handle))
    }

    /// Get immutable reference to an instance.
    ///
    /// Returns None if the handle is stale or the state type doesn't match.
    pub fn get<T: Any>(&self, handle: ObjectHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if !slot.holds(handle) {
            return None;
        }
        slot.value.as_ref()?.downcast_ref::<T>()
    }

    /// Get mutable reference to an instance.
    ///
    /// Returns None if the handle is stale or the state type doesn't match.
    pub fn get_mut<T: Any>(&mut self, handle: ObjectHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if !slot.holds(handle) {
            return None;
        }
        slot.value.as_mut()?.downcast_mut::<T>()
    }

    /// Destroy an instance.
    ///
    /// Returns false (and changes nothing) when the handle is already stale.
    pub fn free(&mut self, handle: ObjectHandle) -> bool {
        if let Some(slot) = self.slots.get_mut(handle.index as usize)
            && slot.holds(handle)
        {
            slot.value = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free_list.push(handle.index);
            self.live -= 1;
            return true;
        }
        false
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check if no instance is alive.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl Default for ObjectHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHeap")
            .field("slot_count", &self.slots.len())
            .field("free_count", &self.free_list.len())
            .field("live", &self.live)
            .finish()
    }
}
