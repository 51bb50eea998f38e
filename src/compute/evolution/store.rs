//! Bounded blocking FIFO shared by every worker pool.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Fixed-capacity population buffer with blocking push/pop.
///
/// Every operation takes the lock only for its own duration; waiting
/// happens on the condition variables with the lock released.
pub struct PopulationStore<T> {
    items: Mutex<VecDeque<T>>,
    /// Signalled after a pop frees a slot.
    not_full: Condvar,
    /// Signalled after a push adds an item.
    not_empty: Condvar,
    capacity: usize,
}

impl<T> PopulationStore<T> {
    /// Create an empty store holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lock().len() >= self.capacity
    }

    /// Append an item, blocking while the store is full.
    pub fn push(&self, item: T) {
        let mut items = self.wait_until(&self.not_full, |items| items.len() < self.capacity);
        items.push_back(item);
        drop(items);
        // Single and paired pops share this condvar.
        self.not_empty.notify_all();
    }

    /// Remove the oldest item, blocking while the store is empty.
    pub fn pop(&self) -> T {
        let mut items = self.wait_until(&self.not_empty, |items| !items.is_empty());
        let item = items.pop_front();
        drop(items);
        self.not_full.notify_one();
        // The wait predicate guarantees an item.
        item.unwrap_or_else(|| unreachable!("store was non-empty under lock"))
    }

    /// Remove the two oldest items in one step, blocking until two are
    /// available. Workers that each hold one item can never wait on each
    /// other for a partner.
    pub fn pop_pair(&self) -> (T, T) {
        let mut items = self.wait_until(&self.not_empty, |items| items.len() >= 2);
        let pair = items.pop_front().zip(items.pop_front());
        drop(items);
        self.not_full.notify_all();
        pair.unwrap_or_else(|| unreachable!("store held two items under lock"))
    }

    /// Visit every item in place. Size and membership are unchanged.
    pub fn inspect<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        for item in self.lock().iter() {
            visit(item);
        }
    }

    /// Remove and return every item.
    pub fn drain(&self) -> Vec<T> {
        let drained: Vec<T> = self.lock().drain(..).collect();
        self.not_full.notify_all();
        drained
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait_until<P>(&self, condvar: &Condvar, mut ready: P) -> MutexGuard<'_, VecDeque<T>>
    where
        P: FnMut(&VecDeque<T>) -> bool,
    {
        condvar
            .wait_while(self.lock(), |items| !ready(&*items))
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_fifo_order() {
        let store = PopulationStore::new(4);
        for i in 0..4 {
            store.push(i);
        }
        assert!(store.is_full());
        assert_eq!(store.pop(), 0);
        assert_eq!(store.pop_pair(), (1, 2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_inspect_preserves_contents() {
        let store = PopulationStore::new(3);
        store.push(5);
        store.push(9);
        store.push(1);

        let mut max = 0;
        store.inspect(|&x| max = max.max(x));
        assert_eq!(max, 9);
        assert_eq!(store.len(), 3);
        assert_eq!(store.drain(), vec![5, 9, 1]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_push_blocks_until_pop() {
        let store = Arc::new(PopulationStore::new(1));
        store.push(1);

        let producer = {
            let store = Arc::clone(&store);
            thread::spawn(move || store.push(2))
        };

        assert_eq!(store.pop(), 1);
        producer.join().unwrap();
        assert_eq!(store.pop(), 2);
    }

    #[test]
    fn test_pop_pair_waits_for_two() {
        let store = Arc::new(PopulationStore::new(2));
        store.push(1);

        let consumer = {
            let store = Arc::clone(&store);
            thread::spawn(move || store.pop_pair())
        };

        store.push(2);
        assert_eq!(consumer.join().unwrap(), (1, 2));
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_cycle_conserves_size() {
        let store = Arc::new(PopulationStore::new(16));
        for i in 0..16 {
            store.push(i);
        }

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let (a, b) = store.pop_pair();
                        store.push(b);
                        store.push(a);
                        let c = store.pop();
                        store.push(c);
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        let mut items = store.drain();
        items.sort();
        assert_eq!(items, (0..16).collect::<Vec<_>>());
    }
}
