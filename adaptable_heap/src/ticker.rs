use std::fmt::{Debug, Display};

/// Primitive step performed by [`AdaptableMinHeap`].
///
/// [`AdaptableMinHeap`]: struct.AdaptableMinHeap.html
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum Operation {
    /// New entry appended to storage.
    Insert,
    /// Root taken out of storage.
    ExtractMin,
    /// Entry taken out of storage by handle.
    Remove,
    /// Priority replaced through a handle.
    UpdatePriority,
    /// Combined up-then-down repair started at one position.
    Repair,
    /// One level examined while moving an entry towards the root.
    BubbleUp,
    /// One level examined while moving an entry towards the leaves.
    BubbleDown,
    /// Two storage slots exchanged.
    Swap,
}

impl Operation {
    /// Number of distinct operations.
    pub const COUNT: usize = 8;

    /// All operations in declaration order.
    pub const ALL: [Operation; Operation::COUNT] = [
        Operation::Insert,
        Operation::ExtractMin,
        Operation::Remove,
        Operation::UpdatePriority,
        Operation::Repair,
        Operation::BubbleUp,
        Operation::BubbleDown,
        Operation::Swap,
    ];

    #[inline(always)]
    fn as_usize(self) -> usize {
        self as usize
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        let name = match self {
            Operation::Insert => "insert",
            Operation::ExtractMin => "extract_min",
            Operation::Remove => "remove",
            Operation::UpdatePriority => "update_priority",
            Operation::Repair => "repair",
            Operation::BubbleUp => "bubble_up",
            Operation::BubbleDown => "bubble_down",
            Operation::Swap => "swap",
        };
        f.write_str(name)
    }
}

/// Bookkeeping accumulator notified by the heap on every primitive step.
///
/// Tickers only observe; nothing they do can change the heap's behaviour.
///
/// ### Examples
///
/// ```
/// use adaptable_heap::{AdaptableMinHeap, Operation, Ticker};
///
/// #[derive(Default)]
/// struct SwapCounter(usize);
///
/// impl Ticker for SwapCounter {
///     fn tick(&mut self, operation: Operation) {
///         if operation == Operation::Swap {
///             self.0 += 1;
///         }
///     }
/// }
///
/// let mut heap = AdaptableMinHeap::with_ticker(SwapCounter::default());
/// heap.insert("b", 2);
/// heap.insert("a", 1);
/// assert_eq!(heap.ticker().0, 1);
/// ```
pub trait Ticker {
    /// Called once for every primitive step.
    fn tick(&mut self, operation: Operation);
}

/// Ticker that ignores everything. Used by default.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct NoopTicker;

impl Ticker for NoopTicker {
    #[inline(always)]
    fn tick(&mut self, _operation: Operation) {}
}

/// Ticker that counts every step, in total and per operation.
///
/// ```
/// use adaptable_heap::{AdaptableMinHeap, CountingTicker, Operation};
///
/// let mut heap = AdaptableMinHeap::with_ticker(CountingTicker::new());
/// heap.insert("only", 1);
/// heap.extract_min();
/// assert_eq!(heap.ticker().count(Operation::Insert), 1);
/// assert_eq!(heap.ticker().count(Operation::ExtractMin), 1);
/// assert_eq!(heap.ticker().count(Operation::Swap), 0);
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Default)]
pub struct CountingTicker {
    total: u64,
    counts: [u64; Operation::COUNT],
}

impl CountingTicker {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks received so far.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of ticks received for `operation`.
    #[inline]
    pub fn count(&self, operation: Operation) -> u64 {
        self.counts[operation.as_usize()]
    }

    /// Forget all counted ticks.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Ticker for CountingTicker {
    #[inline]
    fn tick(&mut self, operation: Operation) {
        self.total += 1;
        self.counts[operation.as_usize()] += 1;
    }
}

impl<T: Ticker + ?Sized> Ticker for &mut T {
    #[inline]
    fn tick(&mut self, operation: Operation) {
        (**self).tick(operation)
    }
}

impl Debug for CountingTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        let mut map = f.debug_map();
        map.entry(&"total", &self.total);
        for op in Operation::ALL.iter() {
            map.entry(&format_args!("{}", op), &self.count(*op));
        }
        map.finish()
    }
}
