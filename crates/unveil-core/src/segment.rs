//! Content segmentation: splitting a laid-out container into reveal units.
//!
//! Text is broken into the lines it actually occupies at the container's
//! current width, using UAX-14 break opportunities from `unicode-linebreak`
//! and a [`TextMeasure`] supplied by the surface. Block content (images,
//! layered artwork) gets one segment per child.
//!
//! Line count depends on layout, so segmentation only ever runs in the
//! runtime's post-layout pass.

use core::ops::Range;

use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

use crate::observer::ElementBounds;

/// Measures rendered text width.
pub trait TextMeasure {
    fn width(&self, text: &str) -> f64;
}

/// Fixed advance per grapheme cluster. Good enough for headless layout and
/// tests; real surfaces measure with their font stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub advance: f64,
}

impl MonospaceMeasure {
    pub fn new(advance: f64) -> Self {
        Self { advance }
    }
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl TextMeasure for MonospaceMeasure {
    fn width(&self, text: &str) -> f64 {
        text.graphemes(true).count() as f64 * self.advance
    }
}

/// What a container holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    /// Number of block children (image layers).
    Blocks(usize),
}

/// A container as measured after layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerLayout {
    pub bounds: ElementBounds,
    pub width: f64,
    pub content: Content,
}

/// One unit to wrap, in reveal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentSpec {
    /// Byte range of a visual line in the container's text.
    Line(Range<usize>),
    /// Index of a block child.
    Block(usize),
}

/// Split a measured container into segments.
///
/// Zero-sized or empty containers produce no segments.
pub fn decompose(layout: &ContainerLayout, measure: &dyn TextMeasure) -> Vec<SegmentSpec> {
    if layout.bounds.height <= 0.0 || layout.width <= 0.0 {
        return Vec::new();
    }

    match &layout.content {
        Content::Text(text) => break_lines(text, layout.width, measure)
            .into_iter()
            .map(SegmentSpec::Line)
            .collect(),
        Content::Blocks(count) => (0..*count).map(SegmentSpec::Block).collect(),
    }
}

/// Greedy line breaking at `max_width`.
///
/// Each range keeps its trailing whitespace so the ranges tile the text;
/// whitespace is ignored when checking fit. Blank lines are skipped. A single
/// word wider than the container overflows onto its own line.
pub fn break_lines(text: &str, max_width: f64, measure: &dyn TextMeasure) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    if max_width <= 0.0 || text.trim().is_empty() {
        return lines;
    }

    let mut push = |range: Range<usize>| {
        if !text[range.clone()].trim().is_empty() {
            lines.push(range);
        }
    };

    let mut line_start = 0;
    let mut last_fit: Option<usize> = None;

    for (offset, opportunity) in linebreaks(text) {
        let overflows = measure.width(text[line_start..offset].trim_end()) > max_width;
        if overflows {
            if let Some(fit) = last_fit.take() {
                push(line_start..fit);
                line_start = fit;
            }
        }

        match opportunity {
            BreakOpportunity::Mandatory => {
                push(line_start..offset);
                line_start = offset;
                last_fit = None;
            }
            BreakOpportunity::Allowed => last_fit = Some(offset),
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of<'a>(text: &'a str, width: f64) -> Vec<&'a str> {
        break_lines(text, width, &MonospaceMeasure::new(10.0))
            .into_iter()
            .map(|r| text[r].trim_end())
            .collect()
    }

    #[test]
    fn single_line_when_it_fits() {
        assert_eq!(lines_of("Hello World", 200.0), vec!["Hello World"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(lines_of("Hello World", 60.0), vec!["Hello", "World"]);
        assert_eq!(
            lines_of("Hire anyone anywhere in days", 120.0),
            vec!["Hire anyone", "anywhere in", "days"]
        );
    }

    #[test]
    fn ranges_tile_the_text() {
        let text = "Payroll in 150 countries, one invoice";
        let ranges = break_lines(text, 100.0, &MonospaceMeasure::default());
        assert!(ranges.len() > 1);
        assert_eq!(ranges.first().map(|r| r.start), Some(0));
        assert_eq!(ranges.last().map(|r| r.end), Some(text.len()));
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn honours_mandatory_breaks_and_skips_blank_lines() {
        assert_eq!(
            lines_of("First line\n\nSecond", 500.0),
            vec!["First line", "Second"]
        );
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        assert_eq!(
            lines_of("a supercalifragilistic b", 50.0),
            vec!["a", "supercalifragilistic", "b"]
        );
    }

    #[test]
    fn empty_or_zero_width_yields_nothing() {
        assert!(lines_of("", 100.0).is_empty());
        assert!(lines_of("   ", 100.0).is_empty());
        assert!(lines_of("text", 0.0).is_empty());
    }

    #[test]
    fn decompose_handles_blocks_and_zero_height() {
        let measure = MonospaceMeasure::default();
        let blocks = ContainerLayout {
            bounds: ElementBounds::new(0.0, 300.0),
            width: 400.0,
            content: Content::Blocks(3),
        };
        assert_eq!(
            decompose(&blocks, &measure),
            vec![
                SegmentSpec::Block(0),
                SegmentSpec::Block(1),
                SegmentSpec::Block(2)
            ]
        );

        let collapsed = ContainerLayout {
            bounds: ElementBounds::new(0.0, 0.0),
            width: 400.0,
            content: Content::Text("Hidden".into()),
        };
        assert!(decompose(&collapsed, &measure).is_empty());
    }
}
