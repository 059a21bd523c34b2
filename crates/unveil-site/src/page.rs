//! Page sections and how they are placed on a surface.
//!
//! A [`PageLayout`] lists sections top to bottom. Mounting it stacks the
//! sections on the surface and attaches one reveal controller to each: hero
//! content reveals on load, everything further down on scroll.

use std::cell::RefCell;

use unveil_config::RevealDefaults;
use unveil_core::{
    break_lines, ContainerId, ControllerId, ElementBounds, MemorySurface, RevealConfig,
    RevealRuntime, Surface, Trigger,
};

use crate::content::{Catalog, Entry, EntryKind};

const GUTTER: f64 = 80.0;
const MIN_CONTENT_WIDTH: f64 = 280.0;
const SECTION_GAP: f64 = 64.0;
const TOP_OFFSET: f64 = 96.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Heading,
    Paragraph,
    /// A grid of `count` cards, revealed one card at a time.
    Cards { count: usize },
    Image,
}

impl SectionKind {
    fn line_height(self) -> f64 {
        match self {
            SectionKind::Heading => 72.0,
            _ => 28.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub text: String,
    pub trigger: Trigger,
    /// Added to the configured reveal delay.
    pub extra_delay_ms: f64,
}

impl Section {
    pub fn heading(text: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            kind: SectionKind::Heading,
            text: text.into(),
            trigger,
            extra_delay_ms: 0.0,
        }
    }

    pub fn paragraph(text: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            kind: SectionKind::Paragraph,
            text: text.into(),
            trigger,
            extra_delay_ms: 0.0,
        }
    }

    pub fn cards(count: usize) -> Self {
        Self {
            kind: SectionKind::Cards { count },
            text: String::new(),
            trigger: Trigger::Scroll,
            extra_delay_ms: 0.0,
        }
    }

    pub fn image(trigger: Trigger) -> Self {
        Self {
            kind: SectionKind::Image,
            text: String::new(),
            trigger,
            extra_delay_ms: 0.0,
        }
    }

    pub fn delayed(mut self, extra_delay_ms: f64) -> Self {
        self.extra_delay_ms = extra_delay_ms;
        self
    }

    fn reveal_config(&self, defaults: &RevealDefaults) -> RevealConfig {
        match self.trigger {
            Trigger::Mount => defaults
                .mount()
                .with_delay(defaults.delay_ms + self.extra_delay_ms),
            Trigger::Scroll => defaults.scroll(),
        }
    }

    fn height(&self, width: f64, surface: &MemorySurface) -> f64 {
        match self.kind {
            SectionKind::Heading | SectionKind::Paragraph => {
                let lines = break_lines(&self.text, width, surface.text_measure()).len();
                lines.max(1) as f64 * self.kind.line_height()
            }
            SectionKind::Cards { count } => 320.0 * count.div_ceil(3).max(1) as f64,
            SectionKind::Image => 480.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub slug: String,
    pub sections: Vec<Section>,
}

impl PageLayout {
    pub fn home(catalog: &Catalog) -> Self {
        let products = catalog.of_kind(EntryKind::Product).count();
        let solutions = catalog.of_kind(EntryKind::Solution).count();
        Self {
            slug: crate::router::HOME.to_string(),
            sections: vec![
                Section::heading("Build your team anywhere in the world", Trigger::Mount),
                Section::paragraph(
                    "Hire, pay and manage people in every country from one platform.",
                    Trigger::Mount,
                )
                .delayed(200.0),
                Section::image(Trigger::Mount).delayed(400.0),
                Section::heading("Products", Trigger::Scroll),
                Section::cards(products),
                Section::heading("Solutions", Trigger::Scroll),
                Section::cards(solutions),
                Section::heading("Ready to hire anywhere?", Trigger::Scroll),
            ],
        }
    }

    pub fn for_entry(entry: &Entry) -> Self {
        Self {
            slug: entry.slug.clone(),
            sections: vec![
                Section::heading(entry.title.clone(), Trigger::Mount),
                Section::paragraph(entry.tagline.clone(), Trigger::Mount).delayed(200.0),
                Section::image(Trigger::Mount).delayed(400.0),
                Section::paragraph(entry.description.clone(), Trigger::Scroll),
                Section::cards(entry.features.len()),
                Section::heading("Talk to our team", Trigger::Scroll),
            ],
        }
    }

    /// Bounds of every section stacked top to bottom at `width`, and the
    /// resulting document height.
    fn stack(&self, width: f64, surface: &MemorySurface) -> (Vec<ElementBounds>, f64) {
        let mut top = TOP_OFFSET;
        let bounds = self
            .sections
            .iter()
            .map(|section| {
                let height = section.height(width, surface);
                let bounds = ElementBounds::new(top, height);
                top += height + SECTION_GAP;
                bounds
            })
            .collect();
        (bounds, top)
    }

    /// Place every section on `surface` and mount its reveal.
    pub fn mount(
        &self,
        runtime: &mut RevealRuntime,
        surface: &RefCell<MemorySurface>,
        defaults: &RevealDefaults,
    ) -> MountedPage {
        let width = content_width(runtime.viewport().width);
        let (placed, height) = self.stack(width, &surface.borrow());
        let mut sections = Vec::with_capacity(self.sections.len());

        for (section, bounds) in self.sections.iter().zip(placed) {
            let container = {
                let mut surface = surface.borrow_mut();
                match section.kind {
                    SectionKind::Heading | SectionKind::Paragraph => {
                        surface.insert_text(bounds, width, section.text.clone())
                    }
                    SectionKind::Cards { count } => surface.insert_blocks(bounds, width, count),
                    SectionKind::Image => surface.insert_blocks(bounds, width, 1),
                }
            };
            let controller = runtime.mount(container, section.reveal_config(defaults));
            sections.push(MountedSection {
                kind: section.kind,
                container,
                controller,
            });
        }

        MountedPage {
            slug: self.slug.clone(),
            sections,
            height,
        }
    }

    /// Reflow a mounted page for a viewport `viewport_width` wide: every
    /// section gets the new content width and is re-stacked below the one
    /// above it. Controllers pick the new geometry up on their next layout.
    pub fn restack(
        &self,
        page: &mut MountedPage,
        surface: &mut MemorySurface,
        viewport_width: f64,
    ) {
        let width = content_width(viewport_width);
        let (placed, height) = self.stack(width, surface);
        for (mounted, bounds) in page.sections.iter().zip(placed) {
            surface.set_width(mounted.container, width);
            surface.set_bounds(mounted.container, bounds);
        }
        page.height = height;
    }
}

/// Width available to section content in a viewport `viewport_width` wide.
pub fn content_width(viewport_width: f64) -> f64 {
    (viewport_width - 2.0 * GUTTER).max(MIN_CONTENT_WIDTH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountedSection {
    pub kind: SectionKind,
    pub container: ContainerId,
    pub controller: ControllerId,
}

/// A layout placed on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedPage {
    pub slug: String,
    pub sections: Vec<MountedSection>,
    /// Document height.
    pub height: f64,
}

impl MountedPage {
    pub fn controllers(&self) -> impl Iterator<Item = ControllerId> + '_ {
        self.sections.iter().map(|section| section.controller)
    }
}
