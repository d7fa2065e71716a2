//! Ordered callback registries and their removal handles.

use std::cell::RefCell;

/// Callbacks in registration order, each under a stable id.
pub(crate) struct Registry<T> {
    next_id: u64,
    entries: Vec<(u64, T)>,
}

impl<T: Clone> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, item: T) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, item));
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn snapshot(&self) -> Vec<T> {
        self.entries.iter().map(|(_, item)| item.clone()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Removes a hook or listener. Calling it more than once is harmless.
pub struct Unlisten {
    remove: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Unlisten {
    pub(crate) fn new<F>(remove: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            remove: RefCell::new(Some(Box::new(remove))),
        }
    }

    pub fn unlisten(&self) {
        let remove = self.remove.borrow_mut().take();
        if let Some(remove) = remove {
            remove();
        }
    }

    pub fn is_active(&self) -> bool {
        self.remove.borrow().is_some()
    }
}

impl std::fmt::Debug for Unlisten {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unlisten")
            .field("active", &self.is_active())
            .finish()
    }
}
