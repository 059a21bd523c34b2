//! Single-open FAQ list.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default)]
pub struct Accordion {
    items: Vec<FaqItem>,
    open: Option<usize>,
}

impl Accordion {
    pub fn new(items: Vec<FaqItem>) -> Self {
        Self { items, open: None }
    }

    pub fn items(&self) -> &[FaqItem] {
        &self.items
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Open `index`, closing whichever item was open. Toggling the open item
    /// closes it. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
    }
}
