//! Local edit buffer
//!
//! A reorderable list is mirrored locally, so that a drag gesture changes the visible order
//! immediately. The new order is persisted with a single request when the gesture ends. If the
//! request fails, the list falls back to the last order confirmed by the server.
//!
//! At most one reorder request per list is in flight. Reorders made while a request is pending
//! are collected and committed after the pending request has been resolved.

use std::{cell::Cell, cell::RefCell, collections::HashSet, fmt::Debug, hash::Hash, rc::Rc};

use log::debug;

use crate::UpdateError;

/// Stable identity of a list element used for ordering and updates.
pub trait Keyed {
    type Key: Clone + Eq + Hash + Debug;

    fn key(&self) -> Self::Key;
}

#[allow(async_fn_in_trait)]
pub trait Reorder {
    type Key;

    async fn reorder(&self, order: Vec<Self::Key>) -> Result<(), UpdateError>;
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ReorderError {
    #[error("new order must contain the same elements as the list")]
    NotAPermutation,
    #[error("position {0} is out of range")]
    OutOfRange(usize),
}

#[derive(Debug, Clone)]
pub struct ReorderBuffer<T> {
    items: Vec<T>,
    confirmed: Vec<T>,
    dirty: bool,
    in_flight: Option<Vec<T>>,
    deferred: bool,
}

impl<T: Keyed + Clone> ReorderBuffer<T> {
    #[must_use]
    pub fn new(server_list: Vec<T>) -> Self {
        Self {
            items: server_list.clone(),
            confirmed: server_list,
            dirty: false,
            in_flight: None,
            deferred: false,
        }
    }

    /// Replaces the buffer with the current server list.
    pub fn initialize(&mut self, server_list: Vec<T>) {
        self.items = server_list.clone();
        self.confirmed = server_list;
        self.dirty = false;
        self.deferred = false;
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn confirmed(&self) -> &[T] {
        &self.confirmed
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn is_committing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn apply_reorder(&mut self, new_order: Vec<T>) -> Result<(), ReorderError> {
        if new_order.len() != self.items.len() {
            return Err(ReorderError::NotAPermutation);
        }
        let current = self.items.iter().map(Keyed::key).collect::<HashSet<_>>();
        let new = new_order.iter().map(Keyed::key).collect::<HashSet<_>>();
        if current != new || new.len() != new_order.len() {
            return Err(ReorderError::NotAPermutation);
        }
        self.items = new_order;
        self.dirty = true;
        Ok(())
    }

    /// Moves the element at `from` to position `to`, as done by a single drag event.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), ReorderError> {
        let len = self.items.len();
        if from >= len {
            return Err(ReorderError::OutOfRange(from));
        }
        if to >= len {
            return Err(ReorderError::OutOfRange(to));
        }
        let mut new_order = self.items.clone();
        let item = new_order.remove(from);
        new_order.insert(to, item);
        self.apply_reorder(new_order)
    }

    /// Returns the order that has to be sent to the server, if any.
    ///
    /// While a commit is in flight, nothing is returned and the commit is deferred until
    /// [`ReorderBuffer::finish_commit`] is called.
    pub fn begin_commit(&mut self) -> Option<Vec<T::Key>> {
        if self.in_flight.is_some() {
            if self.dirty {
                self.deferred = true;
            }
            return None;
        }
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        let order = self.items.iter().map(Keyed::key).collect();
        self.in_flight = Some(self.items.clone());
        Some(order)
    }

    /// Resolves the commit in flight.
    ///
    /// On success, the order of a deferred commit is returned. On failure, the buffer is reset
    /// to the last confirmed order and all local changes are dropped.
    pub fn finish_commit<E>(&mut self, result: Result<(), E>) -> Result<Option<Vec<T::Key>>, E> {
        let committed = self.in_flight.take();
        match result {
            Ok(()) => {
                if let Some(committed) = committed {
                    self.confirmed = committed;
                }
                if self.deferred {
                    self.deferred = false;
                    return Ok(self.begin_commit());
                }
                Ok(None)
            }
            Err(err) => {
                self.rollback();
                Err(err)
            }
        }
    }

    pub fn rollback(&mut self) {
        self.items = self.confirmed.clone();
        self.dirty = false;
        self.deferred = false;
    }
}

/// Reorder buffer owned by a single view.
#[derive(Debug)]
pub struct ReorderList<T> {
    buffer: Rc<RefCell<ReorderBuffer<T>>>,
    closed: Rc<Cell<bool>>,
}

impl<T> Clone for ReorderList<T> {
    fn clone(&self) -> Self {
        Self {
            buffer: Rc::clone(&self.buffer),
            closed: Rc::clone(&self.closed),
        }
    }
}

impl<T: Keyed + Clone> ReorderList<T> {
    #[must_use]
    pub fn new(server_list: Vec<T>) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(ReorderBuffer::new(server_list))),
            closed: Rc::new(Cell::new(false)),
        }
    }

    pub fn initialize(&self, server_list: Vec<T>) {
        self.buffer.borrow_mut().initialize(server_list);
    }

    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.buffer.borrow().items().to_vec()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.buffer.borrow().is_dirty()
    }

    #[must_use]
    pub fn is_committing(&self) -> bool {
        self.buffer.borrow().is_committing()
    }

    pub fn apply_reorder(&self, new_order: Vec<T>) -> Result<(), ReorderError> {
        self.buffer.borrow_mut().apply_reorder(new_order)
    }

    pub fn move_item(&self, from: usize, to: usize) -> Result<(), ReorderError> {
        self.buffer.borrow_mut().move_item(from, to)
    }

    /// Marks the owning view as gone. Responses that arrive afterwards are not applied.
    pub fn close(&self) {
        self.closed.set(true);
    }

    /// Persists the local order.
    ///
    /// Returns immediately if there is nothing to commit or if another commit of this list is
    /// still pending. In the latter case, the pending commit issues the deferred request once it
    /// has been resolved.
    pub async fn commit<R>(&self, repository: &R) -> Result<(), UpdateError>
    where
        R: Reorder<Key = T::Key>,
    {
        let Some(mut order) = self.buffer.borrow_mut().begin_commit() else {
            return Ok(());
        };
        loop {
            let result = repository.reorder(order).await;
            if self.closed.get() {
                debug!("discarding reorder result of closed list");
                return result;
            }
            let next = self.buffer.borrow_mut().finish_commit(result)?;
            match next {
                Some(next) => order = next,
                None => return Ok(()),
            }
        }
    }
}
