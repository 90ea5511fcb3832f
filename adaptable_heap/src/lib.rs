//! This is binary min-heap that supports changing priority of entries in place and early removal.
//!
//! It uses own implementation of binary heap and an arena of slots which
//! remembers where every entry currently lives in heap storage.
//!
//! Each entry has associated *element* and *priority*.
//! Elements may be anything; priorities must implement Ord trait.
//!
//! Extraction returns entry with smallest priority.
//! Insertion adds entry to heap and returns [`EntryHandle`].
//! Handle allows to change priority or remove the entry without searching for it.
//!
//! Insert, extract, update priority, remove by handle have ***O(log n)*** time complexity;
//! peek, lookup by handle are ***O(1)***.
//!
//! # Examples
//!
//! This is implementation of [Dijkstra's algorithm][dijkstra] for directed graph.
//!
//! Every vertex gets an entry in heap as soon as it is reached first time.
//! When shorter path to a vertex in heap is found,
//! its priority is decreased through the handle instead of pushing duplicate.
//!
//! [dijkstra]: https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm
//! [`EntryHandle`]: struct.EntryHandle.html
//!
//! ```
//! use adaptable_heap::{AdaptableMinHeap, EntryHandle};
//!
//! struct Graph {
//!     // For every vertex list of (target, weight)
//!     edges: Vec<Vec<(usize, u32)>>,
//! }
//!
//! enum State {
//!     Unseen,
//!     Queued(EntryHandle),
//!     Done,
//! }
//!
//! fn shortest_paths(graph: &Graph, start: usize) -> Vec<Option<u32>> {
//!     let mut result = vec![None; graph.edges.len()];
//!     let mut states: Vec<State> = graph.edges.iter().map(|_| State::Unseen).collect();
//!     let mut heap = AdaptableMinHeap::new();
//!     states[start] = State::Queued(heap.insert(start, 0));
//!
//!     while let Some(entry) = heap.extract_min() {
//!         let (vertex, distance) = entry.into_parts();
//!         result[vertex] = Some(distance);
//!         states[vertex] = State::Done;
//!
//!         for &(next, weight) in graph.edges[vertex].iter() {
//!             let candidate = distance + weight;
//!             match states[next] {
//!                 State::Unseen => {
//!                     states[next] = State::Queued(heap.insert(next, candidate));
//!                 }
//!                 State::Queued(handle) => {
//!                     // Have found better path to vertex in heap
//!                     if heap.get(handle).map_or(false, |e| candidate < *e.priority()) {
//!                         heap.update_priority(handle, candidate).unwrap();
//!                     }
//!                 }
//!                 State::Done => {}
//!             }
//!         }
//!     }
//!     result
//! }
//!
//! let graph = Graph {
//!     edges: vec![
//!         vec![(1, 7), (2, 9), (5, 14)],
//!         vec![(0, 7), (2, 10), (3, 15)],
//!         vec![(0, 9), (1, 10), (3, 11), (5, 2)],
//!         vec![(1, 15), (2, 11), (4, 6)],
//!         vec![(3, 6), (5, 9)],
//!         vec![(0, 14), (2, 2), (4, 9)],
//!         vec![],
//!     ],
//! };
//!
//! assert_eq!(
//!     shortest_paths(&graph, 0),
//!     [Some(0), Some(7), Some(9), Some(20), Some(20), Some(11), None]
//! );
//! ```
//!

mod adaptable_min_heap;
mod editable_binary_heap;
mod slots;
mod ticker;
mod validate;

pub use crate::adaptable_min_heap::{
    AdaptableMinHeap, AdaptableMinHeapBorrowIter, AdaptableMinHeapIterator, Entry, EntryRef,
    NotResidentError,
};
pub use crate::slots::EntryHandle;
pub use crate::ticker::{CountingTicker, NoopTicker, Operation, Ticker};
pub use crate::validate::{validate, InvariantViolation};

#[doc = include_str!("../../Readme.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
