//! Navigation dropdowns.
//!
//! Hovering a trigger opens its menu; leaving starts a short grace period so
//! the pointer can travel from the trigger into the panel. At most one menu
//! in a [`MenuBar`] is open.

use super::Key;

/// Delay between the pointer leaving a menu and the menu closing.
pub const CLOSE_GRACE_MS: f64 = 150.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    /// Catalog slug this item navigates to.
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown {
    pub label: String,
    pub items: Vec<MenuItem>,
}

impl Dropdown {
    pub fn new(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            label: label.into(),
            items,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuBar {
    menus: Vec<Dropdown>,
    open: Option<usize>,
    close_at: Option<f64>,
}

impl MenuBar {
    pub fn new(menus: Vec<Dropdown>) -> Self {
        Self {
            menus,
            open: None,
            close_at: None,
        }
    }

    pub fn menus(&self) -> &[Dropdown] {
        &self.menus
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    pub fn open_menu(&self) -> Option<&Dropdown> {
        self.open.and_then(|index| self.menus.get(index))
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Pointer entered a trigger or its panel.
    pub fn hover_enter(&mut self, index: usize) {
        if index < self.menus.len() {
            self.open = Some(index);
            self.close_at = None;
        }
    }

    /// Pointer left a trigger or its panel.
    pub fn hover_leave(&mut self, index: usize, now_ms: f64) {
        if self.open == Some(index) {
            self.close_at = Some(now_ms + CLOSE_GRACE_MS);
        }
    }

    /// Click on a trigger toggles its menu.
    pub fn click(&mut self, index: usize) {
        if self.open == Some(index) {
            self.close();
        } else {
            self.hover_enter(index);
        }
    }

    pub fn click_outside(&mut self) {
        self.close();
    }

    pub fn key(&mut self, key: Key) {
        if key == Key::Escape {
            self.close();
        }
    }

    /// Apply a pending close whose grace period has run out.
    pub fn tick(&mut self, now_ms: f64) {
        if self.close_at.is_some_and(|at| now_ms >= at) {
            self.close();
        }
    }

    pub fn close(&mut self) {
        self.open = None;
        self.close_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar() -> MenuBar {
        let item = |slug: &str| MenuItem {
            label: slug.to_string(),
            slug: slug.to_string(),
        };
        MenuBar::new(vec![
            Dropdown::new("Products", vec![item("employer-of-record"), item("global-payroll")]),
            Dropdown::new("Solutions", vec![item("immigration")]),
        ])
    }

    #[test]
    fn only_one_menu_open() {
        let mut bar = bar();
        bar.hover_enter(0);
        bar.hover_enter(1);
        assert!(!bar.is_open(0));
        assert_eq!(bar.open_menu().map(|m| m.label.as_str()), Some("Solutions"));
    }

    #[test]
    fn leave_closes_after_grace_unless_reentered() {
        let mut bar = bar();
        bar.hover_enter(0);
        bar.hover_leave(0, 1000.0);
        bar.tick(1100.0);
        assert!(bar.is_open(0));

        bar.hover_enter(0);
        bar.tick(1200.0);
        assert!(bar.is_open(0));

        bar.hover_leave(0, 1200.0);
        bar.tick(1350.0);
        assert_eq!(bar.open_index(), None);
    }

    #[test]
    fn click_escape_and_outside() {
        let mut bar = bar();
        bar.click(1);
        assert!(bar.is_open(1));
        bar.click(1);
        assert_eq!(bar.open_index(), None);

        bar.click(0);
        bar.key(Key::Escape);
        assert_eq!(bar.open_index(), None);

        bar.click(0);
        bar.click_outside();
        assert_eq!(bar.open_index(), None);

        bar.hover_enter(7);
        assert_eq!(bar.open_index(), None);
    }
}
