//! Page navigation.
//!
//! Every navigation fully tears the current page down before the next one is
//! mounted: controllers are unmounted and their containers removed. Going
//! back mounts fresh controllers, so a page revisited plays its reveals
//! again.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, info};
use unveil_config::{RevealDefaults, UnveilConfig};
use unveil_core::{Clock, FrameStats, MemorySurface, RevealEvent, RevealRuntime};

use crate::content::{Catalog, EntryKind};
use crate::page::{MountedPage, PageLayout};
use crate::widgets::{Dropdown, MenuBar, MenuItem, ScrollLock};

/// Slug of the landing page.
pub const HOME: &str = "home";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no page for `{0}`")]
    NotFound(String),
}

/// What one frame of the current page did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageFrame {
    pub stats: FrameStats,
    /// Reveal events since the previous frame, navigation teardown included.
    pub events: Vec<RevealEvent>,
}

pub struct Router {
    catalog: Catalog,
    surface: Rc<RefCell<MemorySurface>>,
    runtime: RevealRuntime,
    reveal: RevealDefaults,
    scroll_lock: ScrollLock,
    history: Vec<String>,
    current: Option<(PageLayout, MountedPage)>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("current", &self.current().map(|page| page.slug.as_str()))
            .field("history", &self.history)
            .field("runtime", &self.runtime)
            .finish()
    }
}

impl Router {
    pub fn new(catalog: Catalog, clock: Rc<dyn Clock>, config: &UnveilConfig) -> Self {
        let surface = Rc::new(RefCell::new(MemorySurface::default()));
        let runtime = RevealRuntime::new(clock, surface.clone(), config.viewport.to_viewport());
        Self {
            catalog,
            surface,
            runtime,
            reveal: config.reveal.clone(),
            scroll_lock: ScrollLock::new(),
            history: Vec::new(),
            current: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn runtime(&self) -> &RevealRuntime {
        &self.runtime
    }

    pub fn surface(&self) -> &Rc<RefCell<MemorySurface>> {
        &self.surface
    }

    /// Lock shared with modals; while held, scrolling is refused.
    pub fn scroll_lock(&self) -> ScrollLock {
        self.scroll_lock.clone()
    }

    pub fn current(&self) -> Option<&MountedPage> {
        self.current.as_ref().map(|(_, page)| page)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Products and solutions menus for the header.
    pub fn menu_bar(&self) -> MenuBar {
        let menu = |label: &str, kind: EntryKind| {
            let items = self
                .catalog
                .of_kind(kind)
                .map(|entry| MenuItem {
                    label: entry.title.clone(),
                    slug: entry.slug.clone(),
                })
                .collect();
            Dropdown::new(label, items)
        };
        MenuBar::new(vec![
            menu("Products", EntryKind::Product),
            menu("Solutions", EntryKind::Solution),
        ])
    }

    pub fn navigate(&mut self, slug: &str) -> Result<&MountedPage, NavigationError> {
        let layout = self.layout_for(slug)?;
        if let Some(current) = self.current() {
            self.history.push(current.slug.clone());
        }
        Ok(self.show(layout))
    }

    /// Return to the previous page. `Ok(None)` when there is no history.
    pub fn back(&mut self) -> Result<Option<&MountedPage>, NavigationError> {
        let Some(slug) = self.history.pop() else {
            return Ok(None);
        };
        let layout = self.layout_for(&slug)?;
        Ok(Some(self.show(layout)))
    }

    pub fn scroll_to(&self, scroll_y: f64) -> bool {
        if self.scroll_lock.is_locked() {
            debug!(scroll_y, "scroll locked by modal");
            return false;
        }
        self.runtime.scroll_to(scroll_y)
    }

    pub fn scroll_by(&self, delta: f64) -> bool {
        self.scroll_to(self.runtime.viewport().scroll_y + delta)
    }

    /// Resize the viewport and reflow the current page to the new width.
    pub fn resize(&mut self, width: f64, height: f64) {
        if let Some((layout, page)) = self.current.as_mut() {
            layout.restack(page, &mut self.surface.borrow_mut(), width);
            debug!(slug = %page.slug, width, height = page.height, "page reflowed");
        }
        self.runtime.resize(width, height);
    }

    /// Run one frame and hand back every reveal event queued since the last.
    pub fn frame(&self) -> PageFrame {
        let stats = self.runtime.frame();
        PageFrame {
            stats,
            events: self.runtime.drain_events(),
        }
    }

    fn layout_for(&self, slug: &str) -> Result<PageLayout, NavigationError> {
        if slug == HOME || slug.is_empty() {
            return Ok(PageLayout::home(&self.catalog));
        }
        self.catalog
            .get(slug)
            .map(PageLayout::for_entry)
            .ok_or_else(|| NavigationError::NotFound(slug.to_string()))
    }

    fn show(&mut self, layout: PageLayout) -> &MountedPage {
        self.teardown();
        let page = layout.mount(&mut self.runtime, &self.surface, &self.reveal);
        info!(slug = %page.slug, sections = page.sections.len(), "page mounted");
        &self.current.insert((layout, page)).1
    }

    fn teardown(&mut self) {
        let unmounted = self.runtime.unmount_all();
        if let Some((_, page)) = self.current.take() {
            let mut surface = self.surface.borrow_mut();
            for section in &page.sections {
                surface.remove(section.container);
            }
            debug!(slug = %page.slug, unmounted, "page torn down");
        }
        self.runtime.scroll_to(0.0);
    }
}
