use super::{BoxBase, FitStatus, LayoutBox};
use crate::canvas::Canvas;
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::fitter::{BoxFitter, Placement};
use crate::frame::Frame;
use crate::style::Style;
use std::rc::Rc;

/// Lays out its children in a number of equally wide columns, filling one column
/// after the other.
///
/// With `equal_height` set, the columns are balanced: the box searches for the
/// smallest height at which all children still fit, so that the columns end up
/// about equally long. The search is a bisection between a height known to work
/// and one known not to, which stops once both are closer than
/// [LayoutConfig::balance_tolerance] or after [LayoutConfig::balance_max_tries]
/// attempts.
#[derive(Debug, Clone)]
pub struct ColumnBox {
    base: BoxBase,
    children: Vec<Box<dyn LayoutBox>>,
    columns: usize,
    gap: f32,
    equal_height: bool,
    config: LayoutConfig,
    placements: Vec<Placement>,
    remaining: Vec<Box<dyn LayoutBox>>,
    content_heights: Vec<f32>,
    frame_height: f32,
}

impl ColumnBox {
    pub fn new(children: Vec<Box<dyn LayoutBox>>, style: Rc<Style>) -> ColumnBox {
        ColumnBox {
            base: BoxBase::new(0.0, 0.0, style),
            children,
            columns: 2,
            gap: 36.0,
            equal_height: true,
            config: LayoutConfig::default(),
            placements: Vec::new(),
            remaining: Vec::new(),
            content_heights: Vec::new(),
            frame_height: 0.0,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> ColumnBox {
        self.base = BoxBase::new(width, height, self.base.style().clone());
        self
    }

    /// Use `columns` columns with `gap` points between them
    pub fn with_columns(mut self, columns: usize, gap: f32) -> ColumnBox {
        self.columns = columns.max(1);
        self.gap = gap.max(0.0);
        self
    }

    pub fn with_equal_height(mut self, equal_height: bool) -> ColumnBox {
        self.equal_height = equal_height;
        self
    }

    pub fn with_config(mut self, config: LayoutConfig) -> ColumnBox {
        self.config = config;
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    /// How much of each column the last fit used
    pub fn content_heights(&self) -> &[f32] {
        &self.content_heights
    }

    fn column_width(&self) -> f32 {
        let gaps = self.gap * (self.columns - 1) as f32;
        ((self.base.content_width() - gaps) / self.columns as f32).max(0.0)
    }

    /// Fit all children into columns `height` tall
    fn fit_columns(&self, height: f32) -> Result<BoxFitter, LayoutError> {
        let width = self.column_width();
        let frames = (0..self.columns)
            .map(|i| Frame::new(i as f32 * (width + self.gap), 0.0, width, height))
            .collect();
        let mut fitter = BoxFitter::new(frames);
        for child in self.children.iter() {
            fitter.fit(child.clone())?;
        }
        Ok(fitter)
    }

    fn tallest(fitter: &BoxFitter) -> f32 {
        fitter.content_heights().into_iter().fold(0.0, f32::max)
    }
}

impl LayoutBox for ColumnBox {
    fn base(&self) -> &BoxBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BoxBase {
        &mut self.base
    }

    fn fit_content(
        &mut self,
        _available_width: f32,
        _available_height: f32,
        _frame: &Frame,
    ) -> Result<FitStatus, LayoutError> {
        let available = self.base.content_height();
        let mut height = available;
        let mut fitter = self.fit_columns(height)?;

        if fitter.is_success() && self.equal_height && self.columns > 1 {
            let mut fits = Self::tallest(&fitter);
            let mut fails = 0.0_f32;
            let mut tries = 0;
            while fits - fails >= self.config.balance_tolerance && tries < self.config.balance_max_tries {
                tries += 1;
                let candidate = fails + (fits - fails) / 2.0;
                let attempt = self.fit_columns(candidate)?;
                log::debug!(
                    "balancing columns at {candidate:.2}: {}",
                    if attempt.is_success() { "fits" } else { "doesn't fit" }
                );
                if attempt.is_success() {
                    fits = Self::tallest(&attempt).min(candidate);
                    height = candidate;
                    fitter = attempt;
                } else {
                    fails = candidate;
                }
            }
        }

        let used = Self::tallest(&fitter);
        let status = if fitter.is_success() {
            FitStatus::Success
        } else if fitter.fit_results().is_empty() {
            FitStatus::Failure
        } else {
            FitStatus::Overflow
        };
        self.base.set_content_height(used);
        self.content_heights = fitter.content_heights();
        self.frame_height = height;
        let (placements, remaining) = fitter.into_parts();
        self.placements = placements;
        self.remaining = remaining;
        Ok(status)
    }

    fn split_content(&mut self) -> Option<Box<dyn LayoutBox>> {
        if self.placements.is_empty() {
            return None;
        }
        self.children = self.placements.iter().map(|p| p.boxed.clone()).collect();
        Some(Box::new(ColumnBox {
            base: self.base.continuation(),
            children: std::mem::take(&mut self.remaining),
            placements: Vec::new(),
            remaining: Vec::new(),
            content_heights: Vec::new(),
            frame_height: 0.0,
            ..self.clone()
        }))
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, x: f32, y: f32) -> Result<(), LayoutError> {
        let dy = y - (self.frame_height - self.base.content_height());
        for placement in self.placements.iter() {
            placement
                .boxed
                .draw(canvas, x + placement.result.x, dy + placement.result.y)?;
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.base.is_empty() && self.children.iter().all(|child| child.is_empty())
    }
}
