//! Screenshot carousel index controller.
//!
//! Cycles through a fixed sequence in both directions. An empty sequence has no
//! current item and ignores every navigation call.

/// Cyclic cursor over a fixed, ordered list of items
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> Default for Carousel<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> Carousel<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn next(&mut self) {
        if !self.items.is_empty() {
            self.index = (self.index + 1) % self.items.len();
        }
    }

    pub fn previous(&mut self) {
        let n = self.items.len();
        if n > 0 {
            self.index = (self.index + n - 1) % n;
        }
    }

    /// Jump to `index`; out-of-range values are ignored
    pub fn go_to(&mut self, index: usize) {
        if index < self.items.len() {
            self.index = index;
        }
    }
}
