use super::items::Item;
use super::line::Line;
use super::wrap::{wrap_lines, LineAction, LineHandler};
use crate::canvas::Canvas;
use crate::error::LayoutError;
use crate::shape::{Shape, EPSILON};
use crate::style::{Style, TextAlign};
use std::rc::Rc;

/// How a text layout ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLayoutStatus {
    /// All items were laid out
    Success,
    /// An item doesn't fit on a line by itself
    BoxTooWide,
    /// The available height was used up before all items were laid out
    Height,
}

/// The result of [TextLayouter::fit]
#[derive(Debug, Clone)]
pub struct TextLayout {
    pub status: TextLayoutStatus,
    pub lines: Vec<Line>,
    /// The items that didn't make it onto a line
    pub remaining: Vec<Item>,
    /// Height of all lines together
    pub height: f32,
}

impl TextLayout {
    /// The horizontal extent of the lines, as `(left, right)` relative to the left
    /// edge of the text
    pub fn horizontal_extent(&self) -> (f32, f32) {
        self.lines
            .iter()
            .filter(|line| !line.is_empty())
            .map(|line| (line.x_offset, line.x_offset + line.width()))
            .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)))
            .unwrap_or((0.0, 0.0))
    }

    /// Draw the lines with the top-left corner of the text at `(x, top)`
    pub fn draw(&self, canvas: &mut dyn Canvas, x: f32, top: f32) -> Result<(), LayoutError> {
        for line in self.lines.iter() {
            line.draw(canvas, x + line.x_offset, top - line.y_offset)?;
        }
        Ok(())
    }
}

/// The horizontal room available to lines of text, possibly depending on where
/// the line is
pub trait WidthFunction {
    /// The free horizontal segments, as `(offset, width)` from the left edge of the
    /// text, for a line whose top is `y_offset` below the top of the text and which
    /// is `line_height` tall
    fn segments(&self, y_offset: f32, line_height: f32) -> Vec<(f32, f32)>;

    /// Whether every line gets the same single segment
    fn is_fixed(&self) -> bool {
        false
    }

    /// The next offset below `y_offset` where the segments may change
    fn next_offset(&self, _y_offset: f32) -> Option<f32> {
        None
    }
}

impl WidthFunction for f32 {
    fn segments(&self, _y_offset: f32, _line_height: f32) -> Vec<(f32, f32)> {
        vec![(0.0, self.max(0.0))]
    }

    fn is_fixed(&self) -> bool {
        true
    }
}

/// Line widths taken from the free area of a [Shape], used to flow text around
/// floating boxes
#[derive(Debug, Clone)]
pub struct WidthFromShape {
    shape: Shape,
    left: f32,
    top: f32,
    width: f32,
}

impl WidthFromShape {
    /// Text starts at `(left, top)` in the coordinates of the shape and is never
    /// wider than `width`
    pub fn new(shape: Shape, left: f32, top: f32, width: f32) -> WidthFromShape {
        WidthFromShape {
            shape,
            left,
            top,
            width,
        }
    }
}

impl WidthFunction for WidthFromShape {
    fn segments(&self, y_offset: f32, line_height: f32) -> Vec<(f32, f32)> {
        let top = self.top - y_offset;
        let bottom = top - line_height.max(0.0);
        let right = self.left + self.width;
        self.shape
            .spans_between(bottom, top)
            .into_iter()
            .filter_map(|span| {
                let start = span.start.max(self.left);
                let end = span.end.min(right);
                (end - start > EPSILON).then_some((start - self.left, end - start))
            })
            .collect()
    }

    fn next_offset(&self, y_offset: f32) -> Option<f32> {
        let y = self.top - y_offset;
        self.shape
            .bands()
            .iter()
            .flat_map(|band| [band.top, band.bottom])
            .find(|edge| *edge < y - EPSILON)
            .map(|edge| self.top - edge)
    }
}

/// Lays out tokens into lines
#[derive(Debug, Clone)]
pub struct TextLayouter {
    style: Rc<Style>,
}

impl TextLayouter {
    /// `style` decides the alignment and spacing of the lines
    pub fn new(style: Rc<Style>) -> TextLayouter {
        TextLayouter { style }
    }

    /// Lay out `items` into lines no wider than `width` allows and not taller than
    /// `height` all together
    pub fn fit(&self, items: &[Item], width: &dyn WidthFunction, height: f32) -> TextLayout {
        let mut rows = Rows::new(&self.style, width, height);
        let end = wrap_lines(items, 0, &mut rows);
        let Rows { lines, status, .. } = rows;

        let mut total = lines
            .iter()
            .map(|line| line.y_offset - line.y_min())
            .fold(0.0_f32, f32::max);
        if let (true, TextLayoutStatus::Success, Some(last)) =
            (self.style.last_line_gap, status, lines.last())
        {
            total += self.style.line_spacing.gap(last.y_min(), last.y_max()).max(0.0);
        }

        log::trace!(
            "laid out {} lines, {:.2} high, {} items remaining",
            lines.len(),
            total,
            items.len() - end
        );
        TextLayout {
            status,
            lines,
            remaining: items[end..].to_vec(),
            height: total,
        }
    }
}

/// Places wrapped lines into rows from the top down. A row holds one line per
/// free segment of the width function
struct Rows<'a> {
    style: &'a Style,
    width: &'a dyn WidthFunction,
    height: f32,
    lines: Vec<Line>,
    status: TextLayoutStatus,
    /// Top of the current row
    cursor: f32,
    /// Baseline and lowest point of the previous row, if directly above
    prev: Option<(f32, f32)>,
    row_start: usize,
    row_baseline: Option<f32>,
    row_min_height: f32,
    segment: usize,
    segment_offset: f32,
    segment_width: f32,
}

impl<'a> Rows<'a> {
    fn new(style: &'a Style, width: &'a dyn WidthFunction, height: f32) -> Self {
        Rows {
            style,
            width,
            height,
            lines: Vec::new(),
            status: TextLayoutStatus::Success,
            cursor: 0.0,
            prev: None,
            row_start: 0,
            row_baseline: None,
            row_min_height: 0.0,
            segment: 0,
            segment_offset: 0.0,
            segment_width: 0.0,
        }
    }

    fn segment_count(&self, line_height: f32) -> usize {
        self.width
            .segments(self.cursor, line_height.max(self.row_min_height))
            .len()
    }

    fn row_lines(&self) -> &[Line] {
        &self.lines[self.row_start..]
    }

    fn row_bottom(&self) -> f32 {
        match self.row_baseline {
            Some(baseline) => {
                let y_min = self.row_lines().iter().map(Line::y_min).fold(0.0, f32::min);
                baseline - y_min
            }
            None => self.cursor,
        }
    }

    fn finish_row(&mut self) {
        if let Some(baseline) = self.row_baseline {
            let y_min = self.row_lines().iter().map(Line::y_min).fold(0.0, f32::min);
            self.prev = Some((baseline, y_min));
            self.cursor = baseline - y_min;
        }
        self.start_row();
    }

    fn start_row(&mut self) {
        self.row_start = self.lines.len();
        self.row_baseline = None;
        self.row_min_height = 0.0;
        self.segment = 0;
    }

    /// Move down to where the free segments change, for content that didn't fit
    /// anywhere in the current row
    fn advance(&mut self, item_height: f32) -> LineAction {
        let bottom = self.row_bottom();
        let Some(next) = self.width.next_offset(self.cursor) else {
            self.status = TextLayoutStatus::Height;
            return LineAction::Stop;
        };
        let cursor = next.max(bottom);
        if cursor + item_height > self.height + EPSILON {
            self.status = TextLayoutStatus::Height;
            return LineAction::Stop;
        }
        log::trace!("no room for the next item at {:.2}, moving down to {cursor:.2}", self.cursor);
        self.start_row();
        self.cursor = cursor;
        self.prev = None;
        LineAction::StoreStart
    }
}

impl LineHandler for Rows<'_> {
    fn available_width(&mut self, line_height: f32) -> f32 {
        let segments = self
            .width
            .segments(self.cursor, line_height.max(self.row_min_height));
        let (offset, width) = segments.get(self.segment).copied().unwrap_or((0.0, 0.0));
        self.segment_offset = offset;
        self.segment_width = width;
        width
    }

    fn line_finished(&mut self, mut line: Line, next: Option<&Item>) -> LineAction {
        if line.is_empty() {
            let Some(next) = next else {
                return LineAction::StoreStart;
            };
            if self.width.is_fixed() {
                self.status = TextLayoutStatus::BoxTooWide;
                return LineAction::Stop;
            }
            if self.segment + 1 < self.segment_count(next.height()) {
                self.segment += 1;
                return LineAction::Continue;
            }
            return self.advance(next.height());
        }

        let baseline = match (self.row_baseline, self.prev) {
            (Some(row), _) => row.max(self.cursor + line.y_max()),
            (None, Some((prev_baseline, prev_y_min))) => {
                prev_baseline + self.style.line_spacing.baseline_distance(prev_y_min, line.y_max())
            }
            (None, None) => self.cursor + line.y_max(),
        };
        if baseline - line.y_min() > self.height + EPSILON {
            self.status = TextLayoutStatus::Height;
            return LineAction::Stop;
        }

        let slack = self.segment_width - line.width();
        let shift = match self.style.text_align {
            TextAlign::Left => 0.0,
            TextAlign::Center => slack / 2.0,
            TextAlign::Right => slack,
            TextAlign::Justify => {
                if !line.ignore_justification && next.is_some() {
                    line.justify(self.segment_width);
                }
                0.0
            }
        };
        let row_end = line.ignore_justification && next.is_some();
        let line_height = line.height();
        line.x_offset = self.segment_offset + shift.max(0.0);
        line.y_offset = baseline;
        for previous in self.lines[self.row_start..].iter_mut() {
            previous.y_offset = baseline;
        }
        self.row_baseline = Some(baseline);
        self.lines.push(line);

        if !row_end && !self.width.is_fixed() && self.segment + 1 < self.segment_count(line_height) {
            self.segment += 1;
            return LineAction::Continue;
        }
        self.finish_row();
        LineAction::StoreStart
    }

    fn restart(&mut self, line_height: f32) {
        self.lines.truncate(self.row_start);
        self.row_baseline = None;
        self.segment = 0;
        self.row_min_height = line_height;
    }
}
