//! Ref-no bookkeeping: the per-connection counter and the table of
//! requests still waiting for a reply.
//!
//! # What is a ref-no? (for beginners)
//!
//! Protocol A lets a client send several requests before reading any reply.
//! Each request is prefixed with a client-chosen integer, the *ref-no*, and
//! the server echoes it in the matching `=` or `%` reply.  Replies may arrive
//! in any order and interleaved with asynchronous messages, so the ref-no is
//! the only way to tell which request a reply belongs to.
//!
//! Two rules keep that correlation sound:
//!
//! - **Never reuse a number.**  [`SequenceCounter`] starts at 1 and only goes
//!   up; a connection would have to send 2^64 requests to wrap it.
//! - **At most one owner per number.**  [`OutstandingRequests::register`]
//!   refuses a ref-no that is already waiting, and
//!   [`OutstandingRequests::take`] removes an entry exactly once.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::protocol::error::ProtocolError;

/// A monotonically increasing ref-no counter.
///
/// # Examples
///
/// ```rust
/// use lyskom_core::protocol::SequenceCounter;
///
/// let counter = SequenceCounter::new();
/// assert_eq!(counter.next(), 1);
/// assert_eq!(counter.next(), 2);
/// ```
#[derive(Debug, Default)]
pub struct SequenceCounter {
    /// The last number handed out (0 before the first call).
    inner: AtomicU64,
}

impl SequenceCounter {
    /// Creates a counter whose first [`next`](Self::next) returns 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter and returns the new value.
    pub fn next(&self) -> u64 {
        // `fetch_add` returns the old value; the ref-no is the new one.
        self.inner.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Returns the last number handed out without incrementing.
    pub fn current(&self) -> u64 {
        self.inner.load(Ordering::Relaxed)
    }
}

/// Requests that have been sent but not yet answered, keyed by ref-no.
///
/// `T` is whatever the owner needs to decode the eventual reply; the
/// connection stores the call number.
#[derive(Debug)]
pub struct OutstandingRequests<T> {
    entries: HashMap<u64, T>,
}

impl<T> Default for OutstandingRequests<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> OutstandingRequests<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `pending` under `ref_no`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::DuplicateRefNo`] if `ref_no` is already outstanding.
    /// The existing entry is left untouched.
    pub fn register(&mut self, ref_no: u64, pending: T) -> Result<(), ProtocolError> {
        if self.entries.contains_key(&ref_no) {
            return Err(ProtocolError::DuplicateRefNo(ref_no));
        }
        self.entries.insert(ref_no, pending);
        Ok(())
    }

    /// Removes and returns the entry for `ref_no`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::BadRequestId`] if nothing is waiting under `ref_no`.
    pub fn take(&mut self, ref_no: u64) -> Result<T, ProtocolError> {
        self.entries
            .remove(&ref_no)
            .ok_or(ProtocolError::BadRequestId(ref_no))
    }

    /// Looks at the entry for `ref_no` without removing it.
    pub fn get(&self, ref_no: u64) -> Option<&T> {
        self.entries.get(&ref_no)
    }

    pub fn contains(&self, ref_no: u64) -> bool {
        self.entries.contains_key(&ref_no)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry (used when the connection closes).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_counter_starts_at_one() {
        // Arrange
        let counter = SequenceCounter::new();

        // Act
        let values: Vec<u64> = (0..3).map(|_| counter.next()).collect();

        // Assert
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_current_does_not_increment() {
        let counter = SequenceCounter::new();
        assert_eq!(counter.current(), 0);
        counter.next();

        assert_eq!(counter.current(), 1);
        assert_eq!(counter.next(), 2);
    }

    #[test]
    fn test_register_rejects_an_outstanding_ref_no() {
        // Arrange – three requests are waiting
        let mut table = OutstandingRequests::new();
        for ref_no in 1..=3 {
            table.register(ref_no, "first").unwrap();
        }

        // Act – a fourth request tries to reuse ref-no 2
        let result = table.register(2, "second");

        // Assert – rejected, and the original owner is untouched
        assert!(matches!(result, Err(ProtocolError::DuplicateRefNo(2))));
        assert_eq!(table.get(2), Some(&"first"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_take_removes_exactly_once() {
        let mut table = OutstandingRequests::new();
        table.register(7, 42u32).unwrap();

        assert_eq!(table.take(7).unwrap(), 42);
        assert!(matches!(table.take(7), Err(ProtocolError::BadRequestId(7))));
        assert!(table.is_empty());
    }

    #[test]
    fn test_ref_no_can_be_registered_again_after_take() {
        let mut table = OutstandingRequests::new();
        table.register(1, ()).unwrap();
        table.take(1).unwrap();

        assert!(table.register(1, ()).is_ok());
        assert!(table.contains(1));
    }
}
