//! Rendering targets for reveals.
//!
//! The engine never touches a concrete UI tree. It talks to a [`Surface`],
//! which can measure a container, wrap its segments in clipping wrappers,
//! move those segments between visual states, and put everything back.
//! [`MemorySurface`] is an in-memory tree used by the headless driver and the
//! tests; it counts nodes so leaked wrappers are observable.

use std::collections::BTreeMap;

use crate::error::{RevealError, Result};
use crate::observer::ElementBounds;
use crate::segment::{Content, ContainerLayout, MonospaceMeasure, SegmentSpec, TextMeasure};
use crate::types::{ContainerId, SegmentId, VisualState};

/// A target the reveal engine can drive.
pub trait Surface {
    /// Measure a container after layout.
    fn measure(&self, container: ContainerId) -> Result<ContainerLayout>;

    /// Measurer consistent with this surface's text rendering.
    fn text_measure(&self) -> &dyn TextMeasure;

    /// Wrap each segment of `container` in its own clipping wrapper and
    /// return the segment handles in order.
    fn split(&mut self, container: ContainerId, specs: &[SegmentSpec]) -> Result<Vec<SegmentId>>;

    /// Set a segment's visual state.
    fn apply(&mut self, segment: SegmentId, state: VisualState);

    /// Show or hide the container as a whole.
    fn set_container_visible(&mut self, container: ContainerId, visible: bool);

    /// Remove every wrapper created by [`Surface::split`], restoring the
    /// container's original structure. A no-op if nothing is split.
    fn revert(&mut self, container: ContainerId);

    /// Make the container and all of its content fully visible with no
    /// animation. Used when a reveal cannot be set up.
    fn reveal_immediately(&mut self, container: ContainerId) {
        self.revert(container);
        self.set_container_visible(container, true);
    }
}

#[derive(Debug, Clone)]
struct ContainerNode {
    bounds: ElementBounds,
    width: f64,
    content: Content,
    attached: bool,
    visible: bool,
    segments: Vec<SegmentId>,
}

#[derive(Debug, Clone)]
struct SegmentNode {
    container: ContainerId,
    spec: SegmentSpec,
    state: VisualState,
}

impl SegmentNode {
    /// Nodes this segment adds: a clip wrapper, plus a line box for text.
    /// Block segments wrap an existing child.
    fn node_cost(&self) -> usize {
        match self.spec {
            SegmentSpec::Line(_) => 2,
            SegmentSpec::Block(_) => 1,
        }
    }
}

/// In-memory surface.
///
/// Containers are created hidden, the way a page styles content that is
/// about to be revealed, so nothing flashes before the reveal is set up.
pub struct MemorySurface {
    containers: BTreeMap<ContainerId, ContainerNode>,
    segments: BTreeMap<SegmentId, SegmentNode>,
    next_id: u64,
    measure: Box<dyn TextMeasure>,
}

impl std::fmt::Debug for MemorySurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySurface")
            .field("containers", &self.containers.len())
            .field("segments", &self.segments.len())
            .field("nodes", &self.node_count())
            .finish()
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new(MonospaceMeasure::default())
    }
}

impl MemorySurface {
    pub fn new(measure: impl TextMeasure + 'static) -> Self {
        Self {
            containers: BTreeMap::new(),
            segments: BTreeMap::new(),
            next_id: 0,
            measure: Box::new(measure),
        }
    }

    fn insert(&mut self, bounds: ElementBounds, width: f64, content: Content) -> ContainerId {
        self.next_id += 1;
        let id = ContainerId(self.next_id);
        self.containers.insert(
            id,
            ContainerNode {
                bounds,
                width,
                content,
                attached: true,
                visible: false,
                segments: Vec::new(),
            },
        );
        id
    }

    /// Add a text container.
    pub fn insert_text(
        &mut self,
        bounds: ElementBounds,
        width: f64,
        text: impl Into<String>,
    ) -> ContainerId {
        self.insert(bounds, width, Content::Text(text.into()))
    }

    /// Add a container of `count` block children.
    pub fn insert_blocks(&mut self, bounds: ElementBounds, width: f64, count: usize) -> ContainerId {
        self.insert(bounds, width, Content::Blocks(count))
    }

    /// Detach a container, dropping any wrappers it still has.
    pub fn detach(&mut self, container: ContainerId) {
        self.revert(container);
        if let Some(node) = self.containers.get_mut(&container) {
            node.attached = false;
        }
    }

    /// Remove a container entirely.
    pub fn remove(&mut self, container: ContainerId) {
        self.revert(container);
        self.containers.remove(&container);
    }

    /// Change a container's layout width (viewport resize).
    pub fn set_width(&mut self, container: ContainerId, width: f64) {
        if let Some(node) = self.containers.get_mut(&container) {
            node.width = width;
        }
    }

    /// Move or resize a container in the document.
    pub fn set_bounds(&mut self, container: ContainerId, bounds: ElementBounds) {
        if let Some(node) = self.containers.get_mut(&container) {
            node.bounds = bounds;
        }
    }

    /// Total node count: containers, their block children, and wrappers.
    pub fn node_count(&self) -> usize {
        let containers: usize = self
            .containers
            .values()
            .map(|node| match node.content {
                Content::Text(_) => 1,
                Content::Blocks(count) => 1 + count,
            })
            .sum();
        let wrappers: usize = self.segments.values().map(SegmentNode::node_cost).sum();
        containers + wrappers
    }

    pub fn is_visible(&self, container: ContainerId) -> bool {
        self.containers
            .get(&container)
            .is_some_and(|node| node.visible)
    }

    pub fn segments(&self, container: ContainerId) -> Vec<SegmentId> {
        self.containers
            .get(&container)
            .map(|node| node.segments.clone())
            .unwrap_or_default()
    }

    pub fn segment_state(&self, segment: SegmentId) -> Option<VisualState> {
        self.segments.get(&segment).map(|node| node.state)
    }

    /// Text of a line segment, without trailing whitespace.
    pub fn segment_text(&self, segment: SegmentId) -> Option<&str> {
        let node = self.segments.get(&segment)?;
        let SegmentSpec::Line(range) = &node.spec else {
            return None;
        };
        match &self.containers.get(&node.container)?.content {
            Content::Text(text) => text.get(range.clone()).map(str::trim_end),
            Content::Blocks(_) => None,
        }
    }

    /// True when the container is visible and every segment is at rest.
    pub fn is_fully_shown(&self, container: ContainerId) -> bool {
        self.is_visible(container)
            && self
                .segments(container)
                .iter()
                .all(|id| self.segment_state(*id).is_some_and(|s| s.is_visible()))
    }
}

impl Surface for MemorySurface {
    fn measure(&self, container: ContainerId) -> Result<ContainerLayout> {
        match self.containers.get(&container) {
            Some(node) if node.attached => Ok(ContainerLayout {
                bounds: node.bounds,
                width: node.width,
                content: node.content.clone(),
            }),
            _ => Err(RevealError::Detached(container)),
        }
    }

    fn text_measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    fn split(&mut self, container: ContainerId, specs: &[SegmentSpec]) -> Result<Vec<SegmentId>> {
        match self.containers.get(&container) {
            Some(node) if node.attached => {}
            _ => return Err(RevealError::Detached(container)),
        }
        self.revert(container);

        let mut ids = Vec::with_capacity(specs.len());
        for spec in specs {
            self.next_id += 1;
            let id = SegmentId(self.next_id);
            self.segments.insert(
                id,
                SegmentNode {
                    container,
                    spec: spec.clone(),
                    state: VisualState::VISIBLE,
                },
            );
            ids.push(id);
        }

        if let Some(node) = self.containers.get_mut(&container) {
            node.segments = ids.clone();
        }
        Ok(ids)
    }

    fn apply(&mut self, segment: SegmentId, state: VisualState) {
        if let Some(node) = self.segments.get_mut(&segment) {
            node.state = state;
        }
    }

    fn set_container_visible(&mut self, container: ContainerId, visible: bool) {
        if let Some(node) = self.containers.get_mut(&container) {
            node.visible = visible;
        }
    }

    fn revert(&mut self, container: ContainerId) {
        let Some(node) = self.containers.get_mut(&container) else {
            return;
        };
        for id in std::mem::take(&mut node.segments) {
            self.segments.remove(&id);
        }
    }
}
