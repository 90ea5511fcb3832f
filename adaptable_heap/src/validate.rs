use std::fmt::Display;

use tracing::debug;

use crate::adaptable_min_heap::AdaptableMinHeap;
use crate::ticker::Ticker;

/// Broken invariant found by [`validate`].
///
/// [`validate`]: fn.validate.html
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum InvariantViolation {
    /// Entry at `child` has smaller priority than its parent at `parent`.
    HeapOrder { parent: usize, child: usize },
    /// Entry stored at `index` believes it is at `recorded`.
    Position { index: usize, recorded: usize },
}

impl Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            InvariantViolation::HeapOrder { parent, child } => write!(
                f,
                "Entry at {} has smaller priority than its parent at {}",
                child, parent
            ),
            InvariantViolation::Position { index, recorded } => write!(
                f,
                "Entry stored at {} has recorded position {}",
                index, recorded
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Checks heap ordering and position consistency of every stored entry.
///
/// Storage is read through [`AdaptableMinHeap::iter`] so this can be called
/// between any two operations. The first violation found is returned.
///
/// ```
/// use adaptable_heap::{validate, AdaptableMinHeap};
/// let mut heap = AdaptableMinHeap::new();
/// for x in [5, 3, 8, 1, 9, 2].iter() {
///     heap.insert(*x, *x);
///     assert_eq!(validate(&heap), Ok(()));
/// }
/// ```
///
/// ### Time complexity
///
/// Always ***O(n)***
///
/// [`AdaptableMinHeap::iter`]: struct.AdaptableMinHeap.html#method.iter
pub fn validate<TElement, TPriority, TTicker>(
    heap: &AdaptableMinHeap<TElement, TPriority, TTicker>,
) -> Result<(), InvariantViolation>
where
    TPriority: Ord,
    TTicker: Ticker,
{
    let result = check(heap.iter().map(|e| (e.position(), e.priority())));
    if let Err(violation) = &result {
        debug!(%violation, len = heap.len(), "heap invariant violated");
    }
    result
}

/// Takes `(recorded position, priority)` pairs in storage order.
fn check<'a, TPriority: Ord + 'a>(
    entries: impl Iterator<Item = (usize, &'a TPriority)>,
) -> Result<(), InvariantViolation> {
    let mut priorities: Vec<&TPriority> = Vec::new();
    for (index, (recorded, priority)) in entries.enumerate() {
        if recorded != index {
            return Err(InvariantViolation::Position { index, recorded });
        }
        if index > 0 {
            let parent = (index - 1) / 2;
            if priority < priorities[parent] {
                return Err(InvariantViolation::HeapOrder {
                    parent,
                    child: index,
                });
            }
        }
        priorities.push(priority);
    }
    Ok(())
}
