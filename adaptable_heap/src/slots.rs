use crate::editable_binary_heap::HeapIndex;

/// Index of an element in `Slots`.
/// Used to avoid mix up with heap index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub(crate) struct SlotIndex(usize);

impl SlotIndex {
    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn new(v: usize) -> Self {
        Self(v)
    }

    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn as_usize(self) -> usize {
        self.0
    }
}

/// Handle to an entry returned by [`AdaptableMinHeap::insert`].
///
/// Handle stays valid while its entry is in the heap, regardless of how the entry
/// moves inside heap storage. After the entry is extracted or removed, the handle
/// is rejected by every method, even if its storage gets reused by another entry.
///
/// [`AdaptableMinHeap::insert`]: struct.AdaptableMinHeap.html#method.insert
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct EntryHandle {
    slot: SlotIndex,
    generation: u32,
}

#[derive(Clone, Debug)]
enum SlotState<TElement> {
    Occupied {
        element: TElement,
        heap_idx: HeapIndex,
    },
    Vacant {
        next_free: Option<SlotIndex>,
    },
}

#[derive(Clone, Debug)]
struct Slot<TElement> {
    // Bumped every time the slot is vacated so old handles stop matching.
    generation: u32,
    state: SlotState<TElement>,
}

/// Arena owning elements and their current positions in heap storage.
/// Elements never move here; only recorded heap positions change.
#[derive(Clone, Debug)]
pub(crate) struct Slots<TElement> {
    slots: Vec<Slot<TElement>>,
    free_head: Option<SlotIndex>,
    len: usize,
}

impl<TElement> Slots<TElement> {
    #[inline(always)]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    #[inline(always)]
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores element with its heap position and returns handle to it.
    /// Reuses vacated slots first.
    pub(crate) fn insert(&mut self, element: TElement, heap_idx: HeapIndex) -> EntryHandle {
        self.len += 1;
        let occupied = SlotState::Occupied { element, heap_idx };
        match self.free_head {
            Some(slot) => {
                let entry = &mut self.slots[slot.0];
                self.free_head = match entry.state {
                    SlotState::Vacant { next_free } => next_free,
                    SlotState::Occupied { .. } => panic!("Free list points to occupied slot"),
                };
                entry.state = occupied;
                EntryHandle {
                    slot,
                    generation: entry.generation,
                }
            }
            None => {
                let slot = SlotIndex(self.slots.len());
                self.slots.push(Slot {
                    generation: 0,
                    state: occupied,
                });
                EntryHandle {
                    slot,
                    generation: 0,
                }
            }
        }
    }

    /// Returns slot of handle if it still refers to a stored element.
    #[inline(always)]
    pub(crate) fn resolve(&self, handle: EntryHandle) -> Option<SlotIndex> {
        let entry = self.slots.get(handle.slot.0)?;
        match entry.state {
            SlotState::Occupied { .. } if entry.generation == handle.generation => {
                Some(handle.slot)
            }
            _ => None,
        }
    }

    #[inline(always)]
    pub(crate) fn handle(&self, slot: SlotIndex) -> EntryHandle {
        EntryHandle {
            slot,
            generation: self.slots[slot.0].generation,
        }
    }

    #[inline(always)]
    pub(crate) fn get(&self, slot: SlotIndex) -> (&TElement, HeapIndex) {
        match &self.slots[slot.0].state {
            SlotState::Occupied { element, heap_idx } => (element, *heap_idx),
            SlotState::Vacant { .. } => panic!("All slot indexes from heap must be occupied"),
        }
    }

    #[inline(always)]
    pub(crate) fn set_heap_idx(&mut self, slot: SlotIndex, position: HeapIndex) {
        match &mut self.slots[slot.0].state {
            SlotState::Occupied { heap_idx, .. } => *heap_idx = position,
            SlotState::Vacant { .. } => panic!("All slot indexes from heap must be occupied"),
        }
    }

    /// Takes element out and puts slot into the free list.
    pub(crate) fn remove(&mut self, slot: SlotIndex) -> TElement {
        let vacant = SlotState::Vacant {
            next_free: self.free_head,
        };
        let entry = &mut self.slots[slot.0];
        match std::mem::replace(&mut entry.state, vacant) {
            SlotState::Occupied { element, .. } => {
                entry.generation = entry.generation.wrapping_add(1);
                self.free_head = Some(slot);
                self.len -= 1;
                element
            }
            SlotState::Vacant { .. } => panic!("Removing element from vacant slot"),
        }
    }

    /// Drops all elements. Every handle issued before becomes stale.
    pub(crate) fn clear(&mut self) {
        let mut next_free = None;
        for (i, entry) in self.slots.iter_mut().enumerate().rev() {
            if let SlotState::Occupied { .. } = entry.state {
                entry.generation = entry.generation.wrapping_add(1);
            }
            entry.state = SlotState::Vacant { next_free };
            next_free = Some(SlotIndex(i));
        }
        self.free_head = next_free;
        self.len = 0;
    }
}

impl EntryHandle {
    #[inline(always)]
    pub(crate) fn slot(self) -> SlotIndex {
        self.slot
    }
}
