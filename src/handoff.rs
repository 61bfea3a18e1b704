//! Single-slot hand-off channel.
//!
//! The template list writes one document, the editor reads it once. Reading
//! clears the slot so a reload never re-opens a stale document, and a second
//! write is refused until the first one has been read or discarded.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::LabsheetError;

/// Write-once, read-once slot. Safe to share between threads.
#[derive(Debug)]
pub struct HandoffSlot<T> {
    value: Mutex<Option<T>>,
}

impl<T> Default for HandoffSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandoffSlot<T> {
    pub const fn new() -> Self {
        Self {
            value: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        // Plain data: a poisoned lock is still consistent.
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a value. Fails with [`LabsheetError::HandoffOccupied`] while an
    /// unread value is present.
    pub fn send(&self, value: T) -> Result<(), LabsheetError> {
        let mut slot = self.lock();
        if slot.is_some() {
            return Err(LabsheetError::HandoffOccupied);
        }
        *slot = Some(value);
        Ok(())
    }

    /// Store a value over whatever is there, in one step. Returns the unread
    /// value it displaced.
    pub fn replace(&self, value: T) -> Option<T> {
        self.lock().replace(value)
    }

    /// Take the value, leaving the slot empty.
    pub fn take(&self) -> Option<T> {
        self.lock().take()
    }

    /// Drop an unread value. Returns `true` if there was one.
    pub fn discard(&self) -> bool {
        self.lock().take().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_read_once() {
        let slot = HandoffSlot::new();
        slot.send(7).unwrap();
        assert_eq!(slot.take(), Some(7));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_second_write_refused() {
        let slot = HandoffSlot::new();
        slot.send("a").unwrap();
        assert!(matches!(slot.send("b"), Err(LabsheetError::HandoffOccupied)));
        assert_eq!(slot.take(), Some("a"));
        slot.send("b").unwrap();
    }

    #[test]
    fn test_discard() {
        let slot = HandoffSlot::new();
        assert!(!slot.discard());
        slot.send(1).unwrap();
        assert!(slot.discard());
        assert!(slot.is_empty());
    }

    #[test]
    fn test_replace() {
        let slot = HandoffSlot::new();
        assert_eq!(slot.replace("a"), None);
        assert_eq!(slot.replace("b"), Some("a"));
        assert_eq!(slot.take(), Some("b"));
        assert!(slot.is_empty());
    }

    #[test]
    fn test_concurrent_replace_never_refused() {
        let slot = Arc::new(HandoffSlot::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let slot = Arc::clone(&slot);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        slot.replace(i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(matches!(slot.take(), Some(0..=7)));
        assert!(slot.is_empty());
    }

    #[test]
    fn test_only_one_reader_wins() {
        let slot = Arc::new(HandoffSlot::new());
        slot.send(42).unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let slot = Arc::clone(&slot);
                std::thread::spawn(move || slot.take())
            })
            .collect();
        let taken: Vec<_> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(taken, [42]);
    }
}
