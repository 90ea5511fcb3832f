use std::fmt::{Debug, Display};
use std::iter::FromIterator;

use tracing::{debug, trace};

use crate::editable_binary_heap::{BinaryHeap, BinaryHeapIterator, HeapIndex};
use crate::slots::{EntryHandle, SlotIndex, Slots};
use crate::ticker::{NoopTicker, Operation, Ticker};

/// A binary min-heap whose entries can change priority in place.
///
/// Smaller `TPriority` values are extracted first.
/// Every [`insert`] returns an [`EntryHandle`] that can later be used to
/// [`update_priority`] or [`remove`] the entry without searching for it.
///
/// Changing a stored priority by any other means than [`update_priority`]
/// (for example through interior mutability) is a logic error.
///
/// Entries with equal priorities come out in unspecified order.
/// Use priority like `(priority, sequence_number)` if stable order is required.
///
/// [`insert`]: struct.AdaptableMinHeap.html#method.insert
/// [`update_priority`]: struct.AdaptableMinHeap.html#method.update_priority
/// [`remove`]: struct.AdaptableMinHeap.html#method.remove
/// [`EntryHandle`]: struct.EntryHandle.html
///
/// # Examples
///
/// ## Main example
/// ```
/// use adaptable_heap::AdaptableMinHeap;
///
/// let mut heap = AdaptableMinHeap::new();
///
/// // Currently heap is empty
/// assert!(heap.peek_min().is_none());
///
/// let ten = heap.insert("ten", 10);
/// let four = heap.insert("four", 4);
/// heap.insert("fifteen", 15);
///
/// // Peek returns view of the entry with smallest priority.
/// let min = heap.peek_min().unwrap();
/// assert_eq!((min.element(), min.priority()), (&"four", &4));
/// assert_eq!(min.handle(), four);
///
/// // Priority can be changed through handle in both directions.
/// assert_eq!(heap.update_priority(four, 20), Ok(4));
/// assert_eq!(heap.peek_min().unwrap().element(), &"ten");
/// assert_eq!(heap.update_priority(ten, 30), Ok(10));
///
/// // Heap renders in storage order.
/// assert_eq!(heap.to_string(), "(E=fifteen, P=15) (E=four, P=20) (E=ten, P=30)");
///
/// // Extraction always returns the smallest entry.
/// let entry = heap.extract_min().unwrap();
/// assert_eq!(entry.into_parts(), ("fifteen", 15));
///
/// // Entry can be removed by handle as well.
/// assert_eq!(heap.remove(ten).unwrap().into_parts(), ("ten", 30));
/// assert_eq!(heap.len(), 1);
///
/// // Handles of entries that are gone are rejected.
/// assert!(heap.update_priority(ten, 1).is_err());
/// ```
///
/// ## Stable order and max-heap
///
/// Equal priorities may come out in any order. Adding insertion counter to priority
/// makes order stable, and `std::cmp::Reverse` turns the heap into max-heap:
///
/// ```
/// use adaptable_heap::AdaptableMinHeap;
/// use std::cmp::Reverse;
///
/// let mut heap = AdaptableMinHeap::new();
/// for (seq, &(name, rank)) in [("a", 1), ("b", 3), ("c", 3), ("d", 2)].iter().enumerate() {
///     heap.insert(name, (Reverse(rank), seq));
/// }
/// let names: Vec<&str> = heap.into_iter().map(|e| e.into_element()).collect();
/// assert_eq!(names, ["b", "c", "d", "a"]);
/// ```
#[derive(Clone)]
pub struct AdaptableMinHeap<TElement, TPriority, TTicker = NoopTicker>
where
    TPriority: Ord,
    TTicker: Ticker,
{
    heap: BinaryHeap<TPriority, TTicker>,
    slots: Slots<TElement>,
}

impl<TElement, TPriority: Ord> AdaptableMinHeap<TElement, TPriority, NoopTicker> {
    /// Creates an empty heap
    ///
    /// ### Examples
    ///
    ///
    /// ```
    /// use adaptable_heap::AdaptableMinHeap;
    /// let mut heap = AdaptableMinHeap::new();
    /// heap.insert("Element", 4);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity_and_ticker(0, NoopTicker)
    }

    /// Creates an empty heap with allocated memory enough
    /// to keep `capacity` entries without reallocation.
    ///
    /// ### Examples
    ///
    ///
    /// ```
    /// use adaptable_heap::AdaptableMinHeap;
    /// let mut heap = AdaptableMinHeap::with_capacity(10);
    /// heap.insert("Element", 4);
    /// ```
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_ticker(capacity, NoopTicker)
    }
}

impl<TElement, TPriority: Ord, TTicker: Ticker> AdaptableMinHeap<TElement, TPriority, TTicker> {
    /// Creates an empty heap which reports its primitive steps to `ticker`.
    ///
    /// ### Examples
    ///
    ///
    /// ```
    /// use adaptable_heap::{AdaptableMinHeap, CountingTicker};
    /// let mut heap = AdaptableMinHeap::with_ticker(CountingTicker::new());
    /// heap.insert("Element", 4);
    /// assert!(heap.ticker().total() > 0);
    /// ```
    #[inline]
    pub fn with_ticker(ticker: TTicker) -> Self {
        Self::with_capacity_and_ticker(0, ticker)
    }

    /// Creates an empty heap with allocated memory enough
    /// to keep `capacity` entries without reallocation.
    /// Primitive steps are reported to `ticker`.
    #[inline]
    pub fn with_capacity_and_ticker(capacity: usize, ticker: TTicker) -> Self {
        Self {
            heap: BinaryHeap::with_capacity_and_ticker(capacity, ticker),
            slots: Slots::with_capacity(capacity),
        }
    }

    /// Reserves space for at least `additional` new entries.
    ///
    /// ### Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.heap.reserve(additional);
        self.slots.reserve(additional);
    }

    /// Adds new entry and returns handle to it.
    ///
    /// The handle stays usable for [`update_priority`] and [`remove`]
    /// until the entry leaves the heap.
    ///
    /// ### Examples
    ///
    ///
    /// ```
    /// use adaptable_heap::AdaptableMinHeap;
    /// let mut heap = AdaptableMinHeap::new();
    /// let handle = heap.insert("First", 5);
    /// assert_eq!(heap.peek_min().unwrap().handle(), handle);
    /// assert_eq!(heap.get(handle).unwrap().priority(), &5);
    /// ```
    ///
    /// ### Time complexity
    ///
    /// Average complexity is ***O(log n)***
    /// If entries inserted in ascending order, amortized complexity is ***O(1)***.
    ///
    /// The worst case is when reallocation appears.
    /// In this case complexity of single call is ***O(n)***.
    ///
    /// [`update_priority`]: struct.AdaptableMinHeap.html#method.update_priority
    /// [`remove`]: struct.AdaptableMinHeap.html#method.remove
    pub fn insert(&mut self, element: TElement, priority: TPriority) -> EntryHandle {
        // Split borrows so the change handler can update slots while heap is mutated.
        let heap = &mut self.heap;
        let slots = &mut self.slots;

        heap.tick(Operation::Insert);
        let handle = slots.insert(element, heap.len());
        heap.push(handle.slot(), priority, |slot, position| {
            slots.set_heap_idx(slot, position)
        });
        trace!(
            position = slots.get(handle.slot()).1.as_usize(),
            len = heap.usize_len(),
            "inserted entry"
        );
        handle
    }

    /// Get view of the entry with the minimal priority.
    ///
    /// ### Examples
    ///
    ///
    /// ```
    /// use adaptable_heap::AdaptableMinHeap;
    /// let heap: AdaptableMinHeap<i32, i32> = (0..5).map(|x|(x, x)).collect();
    /// let min = heap.peek_min().unwrap();
    /// assert_eq!((min.element(), min.priority()), (&0, &0));
    /// assert_eq!(min.position(), 0);
    /// ```
    ///
    /// ### Time complexity
    ///
    /// Always ***O(1)***
    pub fn peek_min(&self) -> Option<EntryRef<'_, TElement, TPriority>> {
        let (slot, priority) = self.heap.peek()?;
        Some(self.entry_ref(slot, priority))
    }

    /// Remove and return entry with the minimal priority.
    ///
    /// Handle of the returned entry stops being valid.
    ///
    /// ### Examples
    ///
    ///
    /// ```
    /// use adaptable_heap::AdaptableMinHeap;
    /// let mut heap: AdaptableMinHeap<&str, i32> =
    ///     [("five", 5), ("three", 3), ("eight", 8)].iter().cloned().collect();
    /// assert_eq!(heap.extract_min().unwrap().into_parts(), ("three", 3));
    /// assert_eq!(heap.extract_min().unwrap().into_parts(), ("five", 5));
    /// assert_eq!(heap.extract_min().unwrap().into_parts(), ("eight", 8));
    /// assert!(heap.extract_min().is_none());
    /// ```
    ///
    /// ### Time complexity
    ///
    /// Cost of extraction is always ***O(log n)***
    pub fn extract_min(&mut self) -> Option<Entry<TElement, TPriority>> {
        let heap = &mut self.heap;
        let slots = &mut self.slots;

        heap.tick(Operation::ExtractMin);
        let (slot, priority) = heap.pop(|slot, position| slots.set_heap_idx(slot, position))?;
        let element = slots.remove(slot);
        trace!(len = heap.usize_len(), "extracted minimal entry");
        Some(Entry { element, priority })
    }

    /// Set new priority for resident entry and reorder the heap.
    /// Returns old priority if succeeds or [`NotResidentError`].
    ///
    /// ### Examples
    ///
    ///
    /// ```
    /// use adaptable_heap::{AdaptableMinHeap, NotResidentError};
    /// let mut heap = AdaptableMinHeap::new();
    /// heap.insert("ten", 10);
    /// let four = heap.insert("four", 4);
    /// heap.insert("fifteen", 15);
    /// assert_eq!(heap.peek_min().unwrap().priority(), &4);
    /// assert_eq!(heap.update_priority(four, 20), Ok(4));
    /// assert_eq!(heap.peek_min().unwrap().priority(), &10);
    ///
    /// heap.remove(four).unwrap();
    /// assert_eq!(heap.update_priority(four, 5), Err(NotResidentError));
    /// ```
    ///
    /// ### Time complexity
    ///
    /// In best case ***O(1)***, in average costs ***O(log n)***.
    ///
    /// [`NotResidentError`]: struct.NotResidentError.html
    pub fn update_priority(
        &mut self,
        handle: EntryHandle,
        priority: TPriority,
    ) -> Result<TPriority, NotResidentError> {
        let slot = self.resolve(handle, Operation::UpdatePriority)?;

        let heap = &mut self.heap;
        let slots = &mut self.slots;

        heap.tick(Operation::UpdatePriority);
        let (_, position) = slots.get(slot);
        let old = heap.change_priority(position, priority, |slot, position| {
            slots.set_heap_idx(slot, position)
        });
        trace!(
            from = position.as_usize(),
            to = slots.get(slot).1.as_usize(),
            "updated entry priority"
        );
        Ok(old)
    }

    /// Remove resident entry by handle.
    /// Returns the entry if succeeds or [`NotResidentError`].
    ///
    /// ### Examples
    ///
    ///
    /// ```
    /// use adaptable_heap::AdaptableMinHeap;
    /// let mut heap = AdaptableMinHeap::new();
    /// let handles: Vec<_> = (0..5).map(|x| heap.insert(x, x)).collect();
    /// assert_eq!(heap.remove(handles[2]).unwrap().into_parts(), (2, 2));
    /// assert!(heap.remove(handles[2]).is_err());
    /// let rest: Vec<_> = heap.into_iter().map(|e| e.into_element()).collect();
    /// assert_eq!(rest, [0, 1, 3, 4]);
    /// ```
    ///
    /// ### Time complexity
    ///
    /// On average the function will require ***O(log n)*** operations.
    ///
    /// [`NotResidentError`]: struct.NotResidentError.html
    pub fn remove(
        &mut self,
        handle: EntryHandle,
    ) -> Result<Entry<TElement, TPriority>, NotResidentError> {
        let slot = self.resolve(handle, Operation::Remove)?;

        let heap = &mut self.heap;
        let slots = &mut self.slots;

        heap.tick(Operation::Remove);
        let (_, position) = slots.get(slot);
        let (removed, priority) = heap
            .remove(position, |slot, position| slots.set_heap_idx(slot, position))
            .expect("Resident entry must be in heap storage");
        debug_assert_eq!(removed, slot);
        let element = slots.remove(slot);
        trace!(
            position = position.as_usize(),
            len = heap.usize_len(),
            "removed entry"
        );
        Ok(Entry { element, priority })
    }

    /// Get view of the entry by handle if it is still in the heap.
    ///
    /// ### Time complexity
    ///
    /// Always ***O(1)***
    pub fn get(&self, handle: EntryHandle) -> Option<EntryRef<'_, TElement, TPriority>> {
        let slot = self.slots.resolve(handle)?;
        let (_, heap_idx) = self.slots.get(slot);
        let (_, priority) = self
            .heap
            .look_into(heap_idx)
            .expect("Resident entry must be in heap storage");
        Some(self.entry_ref(slot, priority))
    }

    /// Returns true if the entry of `handle` is still in the heap.
    #[inline]
    pub fn contains(&self, handle: EntryHandle) -> bool {
        self.slots.resolve(handle).is_some()
    }

    /// Current index of the entry in heap storage.
    ///
    /// ```
    /// use adaptable_heap::AdaptableMinHeap;
    /// let mut heap = AdaptableMinHeap::new();
    /// let big = heap.insert("big", 10);
    /// assert_eq!(heap.position(big), Some(0));
    /// heap.insert("small", 1);
    /// assert_eq!(heap.position(big), Some(1));
    /// heap.extract_min();
    /// heap.extract_min();
    /// assert_eq!(heap.position(big), None);
    /// ```
    #[inline]
    pub fn position(&self, handle: EntryHandle) -> Option<usize> {
        let slot = self.slots.resolve(handle)?;
        Some(self.slots.get(slot).1.as_usize())
    }

    /// Get the number of entries in heap.
    ///
    /// ### Time complexity
    ///
    /// Always ***O(1)***
    #[inline]
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.slots.len(), self.heap.usize_len());
        self.slots.len()
    }

    /// Returns true if heap is empty.
    ///
    /// ```
    /// let mut heap = adaptable_heap::AdaptableMinHeap::new();
    /// assert!(heap.is_empty());
    /// heap.insert(0, 5);
    /// assert!(!heap.is_empty());
    /// ```
    ///
    /// ### Time complexity
    ///
    /// Always ***O(1)***
    #[inline]
    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.heap.is_empty(), self.slots.is_empty());
        self.heap.is_empty()
    }

    /// Make the heap empty. All handles become stale.
    ///
    /// ### Time complexity
    ///
    /// Always ***O(n)***
    #[inline]
    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    /// Create readonly borrowing iterator over heap storage.
    ///
    /// Entries are visited in storage order: root first, then level by level.
    ///
    /// ```
    /// use adaptable_heap::AdaptableMinHeap;
    /// let mut heap = AdaptableMinHeap::new();
    /// for x in [3, 1, 2].iter() {
    ///     heap.insert(*x, *x);
    /// }
    /// let order: Vec<i32> = heap.iter().map(|e| *e.priority()).collect();
    /// assert_eq!(order, [1, 3, 2]);
    /// assert!(heap.iter().enumerate().all(|(i, e)| e.position() == i));
    /// ```
    ///
    /// ### Time complexity
    ///
    /// Iterating over whole heap is ***O(n)***
    pub fn iter(&self) -> AdaptableMinHeapBorrowIter<'_, TElement, TPriority> {
        AdaptableMinHeapBorrowIter {
            heap_iterator: self.heap.iter(),
            slots: &self.slots,
        }
    }

    /// Ticker that receives primitive steps of this heap.
    #[inline]
    pub fn ticker(&self) -> &TTicker {
        self.heap.ticker()
    }

    #[inline]
    pub fn ticker_mut(&mut self) -> &mut TTicker {
        self.heap.ticker_mut()
    }

    /// Drops all entries and returns the ticker.
    #[inline]
    pub fn into_ticker(self) -> TTicker {
        self.heap.into_ticker()
    }

    fn resolve(
        &self,
        handle: EntryHandle,
        operation: Operation,
    ) -> Result<SlotIndex, NotResidentError> {
        match self.slots.resolve(handle) {
            Some(slot) => Ok(slot),
            None => {
                debug!(?handle, %operation, "rejected handle of entry that is not in heap");
                Err(NotResidentError)
            }
        }
    }

    fn entry_ref<'a>(
        &'a self,
        slot: SlotIndex,
        priority: &'a TPriority,
    ) -> EntryRef<'a, TElement, TPriority> {
        make_entry_ref(&self.slots, slot, priority)
    }
}

#[inline(always)]
fn make_entry_ref<'a, TElement, TPriority>(
    slots: &'a Slots<TElement>,
    slot: SlotIndex,
    priority: &'a TPriority,
) -> EntryRef<'a, TElement, TPriority> {
    let (element, heap_idx): (&TElement, HeapIndex) = slots.get(slot);
    EntryRef {
        handle: slots.handle(slot),
        element,
        priority,
        position: heap_idx.as_usize(),
    }
}

/// Entry taken out of [`AdaptableMinHeap`].
///
/// [`AdaptableMinHeap`]: struct.AdaptableMinHeap.html
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Entry<TElement, TPriority> {
    element: TElement,
    priority: TPriority,
}

impl<TElement, TPriority> Entry<TElement, TPriority> {
    #[inline]
    pub fn element(&self) -> &TElement {
        &self.element
    }

    /// Priority the entry had when it left the heap.
    #[inline]
    pub fn priority(&self) -> &TPriority {
        &self.priority
    }

    #[inline]
    pub fn into_element(self) -> TElement {
        self.element
    }

    #[inline]
    pub fn into_parts(self) -> (TElement, TPriority) {
        (self.element, self.priority)
    }
}

/// Readonly view of an entry which is in [`AdaptableMinHeap`].
///
/// [`AdaptableMinHeap`]: struct.AdaptableMinHeap.html
#[derive(PartialEq, Eq, Debug)]
pub struct EntryRef<'a, TElement, TPriority> {
    handle: EntryHandle,
    element: &'a TElement,
    priority: &'a TPriority,
    position: usize,
}

impl<'a, TElement, TPriority> EntryRef<'a, TElement, TPriority> {
    /// Handle which can be used to change priority or remove the entry.
    #[inline]
    pub fn handle(&self) -> EntryHandle {
        self.handle
    }

    #[inline]
    pub fn element(&self) -> &'a TElement {
        self.element
    }

    #[inline]
    pub fn priority(&self) -> &'a TPriority {
        self.priority
    }

    /// Index in heap storage recorded for this entry.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a, TElement, TPriority> Clone for EntryRef<'a, TElement, TPriority> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, TElement, TPriority> Copy for EntryRef<'a, TElement, TPriority> {}

impl<TElement: Display, TPriority: Display> Display for Entry<TElement, TPriority> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "(E={}, P={})", self.element, self.priority)
    }
}

impl<'a, TElement: Display, TPriority: Display> Display for EntryRef<'a, TElement, TPriority> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "(E={}, P={})", self.element, self.priority)
    }
}

/// Entries separated by single space in storage order.
///
/// ```
/// use adaptable_heap::AdaptableMinHeap;
/// let mut heap = AdaptableMinHeap::new();
/// assert_eq!(heap.to_string(), "");
/// heap.insert("b", 2);
/// heap.insert("a", 1);
/// assert_eq!(heap.to_string(), "(E=a, P=1) (E=b, P=2)");
/// ```
impl<TElement, TPriority, TTicker> Display for AdaptableMinHeap<TElement, TPriority, TTicker>
where
    TElement: Display,
    TPriority: Ord + Display,
    TTicker: Ticker,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        for (i, entry) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

impl<TElement, TPriority, TTicker> Debug for AdaptableMinHeap<TElement, TPriority, TTicker>
where
    TElement: Debug,
    TPriority: Ord + Debug,
    TTicker: Ticker,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "[")?;
        for entry in self.iter() {
            write!(f, "{:?}", (entry.element, entry.priority))?;
        }
        write!(f, "]")
    }
}

impl<TElement, TPriority: Ord, TTicker: Ticker + Default> Default
    for AdaptableMinHeap<TElement, TPriority, TTicker>
{
    #[inline]
    fn default() -> Self {
        Self::with_capacity_and_ticker(0, TTicker::default())
    }
}

impl<TElement, TPriority: Ord, TTicker: Ticker + Default> FromIterator<(TElement, TPriority)>
    for AdaptableMinHeap<TElement, TPriority, TTicker>
{
    /// Allows building heap from iterator using `collect()`.
    /// Handles of the collected entries are available through [`iter`].
    ///
    /// ### Examples
    ///
    ///
    /// ```
    /// use adaptable_heap::AdaptableMinHeap;
    /// let mut heap: AdaptableMinHeap<&str, i32> =
    ///     [("first", 0), ("second", 1), ("third", 2), ("first", -1)]
    ///                             .iter().cloned().collect();
    /// assert_eq!(heap.len(), 4);
    /// assert_eq!(heap.extract_min().unwrap().into_parts(), ("first", -1));
    /// assert_eq!(heap.extract_min().unwrap().into_parts(), ("first", 0));
    /// ```
    ///
    /// ### Time complexity
    ///
    /// ***O(n)*** in average.
    ///
    /// [`iter`]: struct.AdaptableMinHeap.html#method.iter
    fn from_iter<T: IntoIterator<Item = (TElement, TPriority)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut result = Self::with_capacity_and_ticker(iter.size_hint().0, TTicker::default());

        let heap = &mut result.heap;
        let slots = &mut result.slots;
        for (element, priority) in iter {
            let handle = slots.insert(element, heap.len());
            heap.push_unordered(handle.slot(), priority);
        }
        heap.rebuild(|slot, position| slots.set_heap_idx(slot, position));
        result
    }
}

impl<TElement, TPriority: Ord, TTicker: Ticker> Extend<(TElement, TPriority)>
    for AdaptableMinHeap<TElement, TPriority, TTicker>
{
    fn extend<T: IntoIterator<Item = (TElement, TPriority)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (element, priority) in iter {
            self.insert(element, priority);
        }
    }
}

impl<TElement, TPriority: Ord, TTicker: Ticker> IntoIterator
    for AdaptableMinHeap<TElement, TPriority, TTicker>
{
    type Item = Entry<TElement, TPriority>;
    type IntoIter = AdaptableMinHeapIterator<TElement, TPriority, TTicker>;

    /// Make iterator that return entries in ascending priority order.
    ///
    /// ### Examples
    ///
    ///
    /// ```
    /// use adaptable_heap::AdaptableMinHeap;
    /// let heap: AdaptableMinHeap<&str, i32> =
    ///     [("second", 1), ("first", 0), ("third", 2)]
    ///                             .iter().cloned().collect();
    /// let order: Vec<_> = heap.into_iter().map(|e| e.into_parts()).collect();
    /// assert_eq!(order, [("first", 0), ("second", 1), ("third", 2)]);
    /// ```
    ///
    /// ### Time complexity
    ///
    /// ***O(n log n)*** for iteration.
    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter { heap: self }
    }
}

impl<'a, TElement, TPriority: Ord, TTicker: Ticker> IntoIterator
    for &'a AdaptableMinHeap<TElement, TPriority, TTicker>
{
    type Item = EntryRef<'a, TElement, TPriority>;
    type IntoIter = AdaptableMinHeapBorrowIter<'a, TElement, TPriority>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// This is consuming iterator that returns entries in ascending priority order
///
/// ### Time complexity
/// Overall complexity of iteration is ***O(n log n)***
pub struct AdaptableMinHeapIterator<TElement, TPriority, TTicker = NoopTicker>
where
    TPriority: Ord,
    TTicker: Ticker,
{
    heap: AdaptableMinHeap<TElement, TPriority, TTicker>,
}

impl<TElement, TPriority: Ord, TTicker: Ticker> Iterator
    for AdaptableMinHeapIterator<TElement, TPriority, TTicker>
{
    type Item = Entry<TElement, TPriority>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.heap.extract_min()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }

    #[inline]
    fn count(self) -> usize
    where
        Self: Sized,
    {
        self.heap.len()
    }
}

impl<TElement, TPriority: Ord, TTicker: Ticker> ExactSizeIterator
    for AdaptableMinHeapIterator<TElement, TPriority, TTicker>
{
}

/// This is borrowing iterator over heap storage, root first.
///
/// ### Time complexity
/// Overall complexity of iteration is ***O(n)***
pub struct AdaptableMinHeapBorrowIter<'a, TElement, TPriority> {
    heap_iterator: BinaryHeapIterator<'a, TPriority>,
    slots: &'a Slots<TElement>,
}

impl<'a, TElement: 'a, TPriority: 'a> Iterator for AdaptableMinHeapBorrowIter<'a, TElement, TPriority> {
    type Item = EntryRef<'a, TElement, TPriority>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let slots = self.slots;
        self.heap_iterator
            .next()
            .map(|(slot, priority)| make_entry_ref(slots, slot, priority))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.heap_iterator.size_hint()
    }

    #[inline]
    fn count(self) -> usize
    where
        Self: Sized,
    {
        self.heap_iterator.count()
    }
}

impl<'a, TElement: 'a, TPriority: 'a> ExactSizeIterator
    for AdaptableMinHeapBorrowIter<'a, TElement, TPriority>
{
}

/// This is error type for methods of [`AdaptableMinHeap`] that take [`EntryHandle`].
/// It means that entry of the handle was already extracted or removed.
///
/// [`AdaptableMinHeap`]: struct.AdaptableMinHeap.html
/// [`EntryHandle`]: struct.EntryHandle.html
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Default)]
pub struct NotResidentError;

impl Display for NotResidentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "Entry of handle is not in AdaptableMinHeap")
    }
}

impl std::error::Error for NotResidentError {}

#[cfg(test)]
mod tests {
    use super::{AdaptableMinHeap, NotResidentError};
    use crate::ticker::{CountingTicker, Operation};
    use crate::validate::validate;

    #[test]
    fn test_extraction_order() {
        let mut items = [5, 3, 8, 1, 9, 2];
        let mut heap = AdaptableMinHeap::<i32, i32>::with_capacity(items.len());
        for (i, &x) in items.iter().enumerate() {
            heap.insert(x, x);
            assert_eq!(heap.len(), i + 1);
            assert_eq!(validate(&heap), Ok(()));
        }
        assert_eq!(heap.len(), items.len());
        items.sort_unstable();
        assert_eq!(items, [1, 2, 3, 5, 8, 9]);
        for &x in items.iter() {
            assert_eq!(heap.extract_min().map(|e| e.into_parts()), Some((x, x)));
            assert_eq!(validate(&heap), Ok(()));
        }
        assert!(heap.extract_min().is_none());
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
    }

    #[test]
    fn test_peek_is_brute_force_minimum() {
        let items = [
            ("first", 5),
            ("second", 4),
            ("third", 3),
            ("fourth", 2),
            ("fifth", 1),
        ];

        let mut heap: AdaptableMinHeap<&str, i32> = items.iter().cloned().collect();

        while !heap.is_empty() {
            let (element, priority, handle) = {
                let min = heap.peek_min().unwrap();
                (*min.element(), *min.priority(), min.handle())
            };
            let brute_min = heap.iter().map(|e| *e.priority()).min().unwrap();
            assert_eq!(priority, brute_min);
            assert!(heap.contains(handle));
            let entry = heap.extract_min().unwrap();
            assert_eq!(entry.into_parts(), (element, priority));
            assert!(!heap.contains(handle));
        }
        assert!(heap.peek_min().is_none());
    }

    #[test]
    fn test_update_priority_scenario() {
        let mut heap = AdaptableMinHeap::new();
        heap.insert("ten", 10);
        let four = heap.insert("four", 4);
        heap.insert("fifteen", 15);
        assert_eq!(heap.peek_min().unwrap().priority(), &4);

        assert_eq!(heap.update_priority(four, 20), Ok(4));
        assert_eq!(validate(&heap), Ok(()));
        assert_eq!(heap.peek_min().unwrap().priority(), &10);
        assert_eq!(heap.get(four).unwrap().priority(), &20);
    }

    #[test]
    fn test_update_priority_both_directions() {
        let mut heap = AdaptableMinHeap::new();
        let handles: Vec<_> = (0..20).map(|x| heap.insert(x, x * 10)).collect();

        assert_eq!(heap.update_priority(handles[15], -1), Ok(150));
        assert_eq!(validate(&heap), Ok(()));
        assert_eq!(heap.peek_min().unwrap().handle(), handles[15]);
        assert_eq!(heap.position(handles[15]), Some(0));

        assert_eq!(heap.update_priority(handles[15], 1000), Ok(-1));
        assert_eq!(validate(&heap), Ok(()));
        assert_eq!(heap.peek_min().unwrap().handle(), handles[0]);

        // Same priority does not move anything.
        let before = heap.to_string();
        assert_eq!(heap.update_priority(handles[7], 70), Ok(70));
        assert_eq!(heap.to_string(), before);

        let order: Vec<i32> = heap.into_iter().map(|e| e.into_element()).collect();
        let mut expected: Vec<i32> = (0..20).filter(|&x| x != 15).collect();
        expected.push(15);
        assert_eq!(order, expected);
    }

    #[test]
    fn test_stale_handles() {
        let mut heap = AdaptableMinHeap::new();
        let a = heap.insert("a", 1);
        let b = heap.insert("b", 2);
        assert_eq!(heap.extract_min().unwrap().into_parts(), ("a", 1));

        assert_eq!(heap.update_priority(a, 0), Err(NotResidentError));
        assert_eq!(heap.remove(a), Err(NotResidentError));
        assert!(heap.get(a).is_none());
        assert_eq!(heap.position(a), None);

        // Slot of `a` is reused, old handle must not reach the new entry.
        let c = heap.insert("c", 3);
        assert_ne!(a, c);
        assert_eq!(heap.update_priority(a, 0), Err(NotResidentError));
        assert_eq!(heap.get(c).unwrap().priority(), &3);
        assert_eq!(heap.peek_min().unwrap().handle(), b);
        assert_eq!(validate(&heap), Ok(()));
    }

    #[test]
    fn test_remove_last_entry() {
        let mut heap = AdaptableMinHeap::new();
        let handles: Vec<_> = [1, 4, 5, 2, 3].iter().map(|&x| heap.insert(x, x)).collect();
        assert_eq!(heap.remove(handles[4]).unwrap().into_parts(), (3, 3));
        assert_eq!(heap.len(), 4);
        assert!(heap.get(handles[4]).is_none());
        assert_eq!(validate(&heap), Ok(()));

        let mut rest = Vec::new();
        while let Some(entry) = heap.extract_min() {
            rest.push(entry.into_element());
        }
        assert_eq!(rest, [1, 2, 4, 5]);
    }

    #[test]
    fn test_remove_interior() {
        let mut heap = AdaptableMinHeap::new();
        let handles: Vec<_> = [30, 50, 40, 40, 60, 10, 20]
            .iter()
            .map(|&p| heap.insert(p / 10, p))
            .collect();
        assert_eq!(heap.remove(handles[1]).map(|e| e.into_parts()), Ok((5, 50)));
        assert_eq!(validate(&heap), Ok(()));

        let drained: Vec<i32> = heap.into_iter().map(|e| *e.priority()).collect();
        assert_eq!(drained, [10, 20, 30, 40, 40, 60]);
    }

    #[test]
    fn test_remove_moves_last_up() {
        // Last entry is smaller than parent of removed position.
        let mut heap = AdaptableMinHeap::new();
        let handles: Vec<_> = [0, 10, 1, 11, 12, 2, 3]
            .iter()
            .map(|&x| heap.insert(x, x))
            .collect();
        let priorities = |heap: &AdaptableMinHeap<i32, i32>| -> Vec<i32> {
            heap.iter().map(|e| *e.priority()).collect()
        };
        assert_eq!(priorities(&heap), [0, 10, 1, 11, 12, 2, 3]);
        heap.remove(handles[3]).unwrap();
        assert_eq!(validate(&heap), Ok(()));
        assert_eq!(priorities(&heap), [0, 3, 1, 10, 12, 2]);
        assert_eq!(heap.position(handles[6]), Some(1));
    }

    #[test]
    fn test_single_entry_needs_no_swaps() {
        let mut heap = AdaptableMinHeap::with_ticker(CountingTicker::new());
        let handle = heap.insert("only", 7);
        assert_eq!(heap.position(handle), Some(0));
        let entry = heap.extract_min().unwrap();
        assert_eq!(entry.into_parts(), ("only", 7));
        assert!(heap.is_empty());
        assert_eq!(heap.ticker().count(Operation::Swap), 0);
        assert_eq!(heap.ticker().count(Operation::Insert), 1);
        assert_eq!(heap.ticker().count(Operation::ExtractMin), 1);
    }

    #[test]
    fn test_equal_priorities_stay_in_place() {
        let mut heap = AdaptableMinHeap::with_ticker(CountingTicker::new());
        let handles: Vec<_> = ["a", "b", "c"].iter().map(|&e| heap.insert(e, 1)).collect();
        assert_eq!(heap.to_string(), "(E=a, P=1) (E=b, P=1) (E=c, P=1)");
        for (i, &handle) in handles.iter().enumerate() {
            assert_eq!(heap.position(handle), Some(i));
        }

        // Leaf gets priority equal to its parent, then root equal to its children.
        assert_eq!(heap.update_priority(handles[2], 1), Ok(1));
        assert_eq!(heap.update_priority(handles[0], 1), Ok(1));
        assert_eq!(heap.to_string(), "(E=a, P=1) (E=b, P=1) (E=c, P=1)");
        assert_eq!(heap.ticker().count(Operation::Swap), 0);
    }

    #[test]
    fn test_empty_heap() {
        let mut heap = AdaptableMinHeap::<i32, i32>::new();
        assert!(heap.extract_min().is_none());
        assert!(heap.peek_min().is_none());
        assert_eq!(heap.iter().count(), 0);
        assert_eq!(heap.to_string(), "");
        assert_eq!(validate(&heap), Ok(()));
    }

    #[test]
    fn test_insert_n_extract_n() {
        let mut heap = AdaptableMinHeap::new();
        for x in (0..100).rev() {
            heap.insert(x, x % 7);
        }
        for _ in 0..100 {
            assert!(heap.extract_min().is_some());
        }
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
    }

    #[test]
    fn test_ticker_counts() {
        let mut heap = AdaptableMinHeap::with_ticker(CountingTicker::new());
        heap.insert("b", 2);
        heap.insert("a", 1);
        assert_eq!(heap.ticker().count(Operation::Swap), 1);
        assert_eq!(heap.ticker().count(Operation::Repair), 2);

        let gone = heap.insert("c", 0);
        heap.extract_min();
        heap.ticker_mut().reset();
        // Rejected handles do not reach the heap.
        assert_eq!(heap.update_priority(gone, 5), Err(NotResidentError));
        assert_eq!(heap.ticker().count(Operation::UpdatePriority), 0);
        assert_eq!(heap.into_ticker().total(), 0);
    }

    #[test]
    fn test_clear() {
        let mut heap = AdaptableMinHeap::new();
        let handles: Vec<_> = (0..5).map(|x| heap.insert(x, x)).collect();
        heap.clear();
        assert!(heap.is_empty());
        for &handle in handles.iter() {
            assert!(!heap.contains(handle));
        }
        let fresh = heap.insert(10, 10);
        assert!(handles.iter().all(|&h| h != fresh));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_consuming_iteration() {
        let heap: AdaptableMinHeap<char, u8> =
            [('e', 5), ('d', 4), ('c', 3), ('b', 2), ('a', 1)].iter().cloned().collect();
        assert_eq!(validate(&heap), Ok(()));
        let mut iter = heap.into_iter();
        assert_eq!(iter.len(), 5);
        let drained: String = iter.by_ref().take(3).map(|e| e.into_element()).collect();
        assert_eq!(drained, "abc");
        assert_eq!(iter.size_hint(), (2, Some(2)));
        assert_eq!(iter.map(|e| *e.priority()).collect::<Vec<_>>(), [4, 5]);
    }

    #[test]
    fn test_collected_handles_work() {
        let mut heap: AdaptableMinHeap<u32, u32> = (0..50).map(|x| (x, 100 - x)).collect();
        assert_eq!(validate(&heap), Ok(()));
        let handle = heap
            .iter()
            .find(|e| *e.element() == 10)
            .map(|e| e.handle())
            .unwrap();
        assert_eq!(heap.update_priority(handle, 0), Ok(90));
        assert_eq!(validate(&heap), Ok(()));
        assert_eq!(heap.extract_min().unwrap().into_parts(), (10, 0));
    }

    #[test]
    fn test_extend() {
        let mut heap = AdaptableMinHeap::new();
        heap.insert("z", 26);
        heap.extend(vec![("b", 2), ("a", 1)]);
        assert_eq!(heap.len(), 3);
        assert_eq!(validate(&heap), Ok(()));
        assert_eq!(heap.peek_min().unwrap().element(), &"a");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut heap = AdaptableMinHeap::new();
        let a = heap.insert("a", 1);
        heap.insert("b", 2);
        let mut copy = heap.clone();
        copy.update_priority(a, 10).unwrap();
        assert_eq!(heap.peek_min().unwrap().element(), &"a");
        assert_eq!(copy.peek_min().unwrap().element(), &"b");
        assert_eq!(heap.get(a).unwrap().priority(), &1);
        assert_eq!(copy.get(a).unwrap().priority(), &10);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AdaptableMinHeap<String, u64>>();
        assert_send_sync::<AdaptableMinHeap<i32, i32, CountingTicker>>();
    }

    #[test]
    fn test_fmt() {
        let mut heap = AdaptableMinHeap::new();
        for &(e, p) in [("first", 5), ("second", 4), ("third", 3)].iter() {
            heap.insert(e, p);
        }

        assert_eq!(
            heap.to_string(),
            "(E=third, P=3) (E=first, P=5) (E=second, P=4)"
        );
        assert_eq!(
            format!("{:?}", heap),
            "[(\"third\", 3)(\"first\", 5)(\"second\", 4)]"
        );
        let entry = heap.extract_min().unwrap();
        assert_eq!(entry.to_string(), "(E=third, P=3)");
        assert_eq!(heap.peek_min().unwrap().to_string(), "(E=second, P=4)");
    }

    #[test]
    fn test_payload_without_clone() {
        #[derive(Debug, PartialEq)]
        struct Payload(u32);

        let mut heap = AdaptableMinHeap::new();
        let handles: Vec<_> = [0u32, 1, 1, 2, 4, 5]
            .iter()
            .map(|&v| heap.insert(Payload(v), v))
            .collect();
        heap.update_priority(handles[1], 10).unwrap();
        let mut res = Vec::with_capacity(6);
        while let Some(entry) = heap.extract_min() {
            let (Payload(v), p) = entry.into_parts();
            res.push((v, p));
        }
        assert_eq!(&res, &[(0, 0), (1, 1), (2, 2), (4, 4), (5, 5), (1, 10)]);
    }
}
