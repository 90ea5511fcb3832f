use std::fmt::Debug;

use crate::slots::SlotIndex;
use crate::ticker::{Operation, Ticker};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub(crate) struct HeapIndex(usize);

impl HeapIndex {
    #[cfg(test)]
    #[inline(always)]
    pub(crate) fn new(v: usize) -> Self {
        Self(v)
    }

    #[inline(always)]
    pub(crate) fn as_usize(self) -> usize {
        self.0
    }
}

pub(crate) struct HeapEntry<TPriority> {
    slot: SlotIndex,
    priority: TPriority,
}

/// Array-backed min-heap of slot references.
/// Every move of an entry is reported to the caller through `change_handler`
/// so the owner of the slots can keep recorded positions in sync.
pub(crate) struct BinaryHeap<TPriority, TTicker> {
    data: Vec<HeapEntry<TPriority>>,
    ticker: TTicker,
}

impl<TPriority: Ord, TTicker: Ticker> BinaryHeap<TPriority, TTicker> {
    #[inline(always)]
    pub(crate) fn with_capacity_and_ticker(capacity: usize, ticker: TTicker) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            ticker,
        }
    }

    #[inline(always)]
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    #[inline(always)]
    pub(crate) fn tick(&mut self, operation: Operation) {
        self.ticker.tick(operation);
    }

    #[inline(always)]
    pub(crate) fn ticker(&self) -> &TTicker {
        &self.ticker
    }

    #[inline(always)]
    pub(crate) fn ticker_mut(&mut self) -> &mut TTicker {
        &mut self.ticker
    }

    #[inline(always)]
    pub(crate) fn into_ticker(self) -> TTicker {
        self.ticker
    }

    /// Puts slot and priority at the end of storage and repairs from there.
    /// Calls change_handler for every move of stored values
    #[inline(always)]
    pub(crate) fn push<TChangeHandler: FnMut(SlotIndex, HeapIndex)>(
        &mut self,
        slot: SlotIndex,
        priority: TPriority,
        change_handler: TChangeHandler,
    ) {
        self.data.push(HeapEntry { slot, priority });
        self.repair(HeapIndex(self.data.len() - 1), change_handler);
    }

    /// Appends without restoring ordering. Must be followed by `rebuild`.
    #[inline(always)]
    pub(crate) fn push_unordered(&mut self, slot: SlotIndex, priority: TPriority) {
        self.data.push(HeapEntry { slot, priority });
    }

    /// Restores heap ordering over the whole storage in O(n).
    pub(crate) fn rebuild<TChangeHandler: FnMut(SlotIndex, HeapIndex)>(
        &mut self,
        mut change_handler: TChangeHandler,
    ) {
        // Indices from len / 2 onwards are leaves.
        for pos in (0..self.data.len() / 2).rev() {
            self.bubble_down(HeapIndex(pos), &mut change_handler);
        }
    }

    /// Removes item with the smallest priority.
    /// The last item takes the root place and sinks down.
    /// Time complexity - O(log n) swaps and change_handler calls
    pub(crate) fn pop<TChangeHandler: FnMut(SlotIndex, HeapIndex)>(
        &mut self,
        mut change_handler: TChangeHandler,
    ) -> Option<(SlotIndex, TPriority)> {
        let last = self.data.len().checked_sub(1)?;
        if last > 0 {
            self.swap_items(0, last, &mut change_handler);
        }
        let result = self.data.pop()?;
        if !self.data.is_empty() {
            self.bubble_down(HeapIndex(0), &mut change_handler);
        }
        Some((result.slot, result.priority))
    }

    #[inline(always)]
    pub(crate) fn peek(&self) -> Option<(SlotIndex, &TPriority)> {
        self.look_into(HeapIndex(0))
    }

    /// Takes entry at position out, the last entry fills the hole.
    /// Returns None if position is outside of storage.
    pub(crate) fn remove<TChangeHandler: FnMut(SlotIndex, HeapIndex)>(
        &mut self,
        position: HeapIndex,
        mut change_handler: TChangeHandler,
    ) -> Option<(SlotIndex, TPriority)> {
        if self.len() <= position {
            return None;
        }
        let last = self.data.len() - 1;
        if position.0 != last {
            self.swap_items(position.0, last, &mut change_handler);
        }
        let result = self.data.pop()?;
        if position < self.len() {
            self.repair(position, &mut change_handler);
        }
        Some((result.slot, result.priority))
    }

    #[inline(always)]
    pub(crate) fn look_into(&self, position: HeapIndex) -> Option<(SlotIndex, &TPriority)> {
        let entry = self.data.get(position.0)?;
        Some((entry.slot, &entry.priority))
    }

    /// Replaces priority of queue item and returns old one.
    /// New priority may be both bigger or smaller so repair tries both directions.
    pub(crate) fn change_priority<TChangeHandler: FnMut(SlotIndex, HeapIndex)>(
        &mut self,
        position: HeapIndex,
        updated: TPriority,
        change_handler: TChangeHandler,
    ) -> TPriority {
        if position >= self.len() {
            panic!("Out of index during changing priority");
        }

        let old = std::mem::replace(&mut self.data[position.0].priority, updated);
        self.repair(position, change_handler);
        old
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> HeapIndex {
        HeapIndex(self.data.len())
    }

    #[inline(always)]
    pub(crate) fn usize_len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline(always)]
    pub(crate) fn clear(&mut self) {
        self.data.clear()
    }

    #[inline(always)]
    pub(crate) fn iter(&self) -> BinaryHeapIterator<'_, TPriority> {
        BinaryHeapIterator {
            inner: self.data.iter(),
        }
    }

    fn repair<TChangeHandler: FnMut(SlotIndex, HeapIndex)>(
        &mut self,
        position: HeapIndex,
        mut change_handler: TChangeHandler,
    ) {
        self.ticker.tick(Operation::Repair);
        // At most one direction actually moves the entry.
        let position = self.bubble_up(position, &mut change_handler);
        self.bubble_down(position, &mut change_handler);
    }

    fn bubble_up<TChangeHandler: FnMut(SlotIndex, HeapIndex)>(
        &mut self,
        position: HeapIndex,
        change_handler: &mut TChangeHandler,
    ) -> HeapIndex {
        debug_assert!(position.0 < self.data.len(), "Out of index in bubble_up");
        let mut position = position.0;
        loop {
            self.ticker.tick(Operation::BubbleUp);
            if position == 0 {
                break;
            }
            let parent_pos = (position - 1) / 2;
            if self.data[position].priority < self.data[parent_pos].priority {
                self.swap_items(position, parent_pos, change_handler);
                position = parent_pos;
            } else {
                break;
            }
        }
        HeapIndex(position)
    }

    fn bubble_down<TChangeHandler: FnMut(SlotIndex, HeapIndex)>(
        &mut self,
        position: HeapIndex,
        change_handler: &mut TChangeHandler,
    ) -> HeapIndex {
        debug_assert!(position.0 < self.data.len(), "Out of index in bubble_down");
        let mut position = position.0;
        loop {
            self.ticker.tick(Operation::BubbleDown);
            let min_child_idx = {
                let left = position * 2 + 1;
                let right = left + 1;
                if left >= self.data.len() {
                    break;
                }
                // Right child wins ties.
                if right >= self.data.len() || self.data[left].priority < self.data[right].priority
                {
                    left
                } else {
                    right
                }
            };

            if self.data[min_child_idx].priority < self.data[position].priority {
                self.swap_items(position, min_child_idx, change_handler);
                position = min_child_idx;
            } else {
                break;
            }
        }
        HeapIndex(position)
    }

    /// The only place where entries move inside storage.
    #[inline(always)]
    fn swap_items<TChangeHandler: FnMut(SlotIndex, HeapIndex)>(
        &mut self,
        pos1: usize,
        pos2: usize,
        change_handler: &mut TChangeHandler,
    ) {
        debug_assert!(pos1 < self.data.len(), "Out of index in first pos in swap");
        debug_assert!(pos2 < self.data.len(), "Out of index in second pos in swap");
        self.ticker.tick(Operation::Swap);
        self.data.swap(pos1, pos2);
        change_handler(self.data[pos1].slot, HeapIndex(pos1));
        change_handler(self.data[pos2].slot, HeapIndex(pos2));
    }
}

/// Storage order iterator: root first, then level by level.
pub(crate) struct BinaryHeapIterator<'a, TPriority> {
    inner: std::slice::Iter<'a, HeapEntry<TPriority>>,
}

impl<'a, TPriority> Iterator for BinaryHeapIterator<'a, TPriority> {
    type Item = (SlotIndex, &'a TPriority);

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (entry.slot, &entry.priority))
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    #[inline(always)]
    fn count(self) -> usize {
        self.inner.count()
    }
}

impl<'a, TPriority> ExactSizeIterator for BinaryHeapIterator<'a, TPriority> {}


impl<TPriority: Clone> Clone for HeapEntry<TPriority> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot,
            priority: self.priority.clone(),
        }
    }
}

impl<TPriority: Debug> Debug for HeapEntry<TPriority> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "{{slot: {:?}, priority: {:?}}}",
            &self.slot, &self.priority
        )
    }
}

impl<TPriority: Clone, TTicker: Clone> Clone for BinaryHeap<TPriority, TTicker> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            ticker: self.ticker.clone(),
        }
    }
}

impl<TPriority: Debug, TTicker> Debug for BinaryHeap<TPriority, TTicker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.data.fmt(f)
    }
}
