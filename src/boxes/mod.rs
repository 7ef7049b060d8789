//! Boxes are the units that get placed into frames.
//!
//! Every box embeds a [BoxBase] with the data common to all boxes and implements
//! the content hooks of [LayoutBox]. Fitting, splitting and drawing are driven by
//! the provided methods of the trait, which take care of the declared dimensions,
//! padding, borders and backgrounds before handing over to the hooks.

mod basic;
mod column;
mod container;
mod image;
mod list;
mod table;
mod text_box;

pub use basic::*;
pub use column::*;
pub use container::*;
pub use image::*;
pub use list::*;
pub use table::*;
pub use text_box::*;

use crate::canvas::Canvas;
use crate::error::LayoutError;
use crate::frame::Frame;
use crate::rect::Rect;
use crate::shape::EPSILON;
use crate::style::{OverflowPolicy, Position, Style};
use std::fmt;
use std::rc::Rc;

/// The outcome of fitting a box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStatus {
    /// The box doesn't fit at all
    Failure,
    /// The box fits completely
    Success,
    /// Only part of the box's content fits
    Overflow,
}

/// Where a box would be placed in a frame, and which area it would take up
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub status: FitStatus,
    /// The bottom-left corner of the box
    pub x: f32,
    pub y: f32,
    pub available_width: f32,
    pub available_height: f32,
    /// The area to remove from the frame when the box is placed
    pub mask: Option<Rect>,
}

impl FitResult {
    pub(crate) fn failure(available_width: f32, available_height: f32) -> FitResult {
        FitResult {
            status: FitStatus::Failure,
            x: 0.0,
            y: 0.0,
            available_width,
            available_height,
            mask: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FitStatus::Success
    }
}

/// The result of [LayoutBox::split]
#[derive(Debug)]
pub enum SplitOutcome {
    /// The box can be placed as it is
    Whole,
    /// Nothing of the box can be placed
    Nothing,
    /// The box holds what fits and the returned box holds the rest
    Parts(Box<dyn LayoutBox>),
}

/// The state every box has
#[derive(Debug, Clone)]
pub struct BoxBase {
    declared_width: f32,
    declared_height: f32,
    width: f32,
    height: f32,
    style: Rc<Style>,
    split: bool,
    fit_status: Option<FitStatus>,
}

impl BoxBase {
    /// A width or height of 0 means the box takes its size from the available space
    /// or its content
    pub fn new(width: f32, height: f32, style: Rc<Style>) -> BoxBase {
        BoxBase {
            declared_width: width.max(0.0),
            declared_height: height.max(0.0),
            width: width.max(0.0),
            height: height.max(0.0),
            style,
            split: false,
            fit_status: None,
        }
    }

    /// The base of the box holding the rest of the content after a split
    pub fn continuation(&self) -> BoxBase {
        BoxBase {
            width: self.declared_width,
            height: self.declared_height,
            split: true,
            fit_status: None,
            style: self.style.clone(),
            ..*self
        }
    }

    pub fn declared_width(&self) -> f32 {
        self.declared_width
    }

    pub fn declared_height(&self) -> f32 {
        self.declared_height
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn style(&self) -> &Rc<Style> {
        &self.style
    }

    /// Whether this box holds the rest of a box that was split
    pub fn is_split(&self) -> bool {
        self.split
    }

    pub fn fit_status(&self) -> Option<FitStatus> {
        self.fit_status
    }

    pub fn reserved_width(&self) -> f32 {
        self.style.padding.horizontal() + self.style.border.width.horizontal()
    }

    pub fn reserved_height(&self) -> f32 {
        self.style.padding.vertical() + self.style.border.width.vertical()
    }

    pub fn reserved_left(&self) -> f32 {
        self.style.padding.left + self.style.border.width.left
    }

    pub fn reserved_bottom(&self) -> f32 {
        self.style.padding.bottom + self.style.border.width.bottom
    }

    pub fn content_width(&self) -> f32 {
        (self.width - self.reserved_width()).max(0.0)
    }

    pub fn content_height(&self) -> f32 {
        (self.height - self.reserved_height()).max(0.0)
    }

    /// Size the box around its content, unless the width was declared
    pub fn set_content_width(&mut self, width: f32) {
        if self.declared_width == 0.0 {
            self.width = width.max(0.0) + self.reserved_width();
        }
    }

    /// Size the box around its content, unless the height was declared
    pub fn set_content_height(&mut self, height: f32) {
        if self.declared_height == 0.0 {
            self.height = height.max(0.0) + self.reserved_height();
        }
    }

    /// Whether drawing the box paints nothing besides its content
    pub fn is_empty(&self) -> bool {
        self.style.background_colour.is_none()
            && self.style.border.is_none()
            && self.style.underlays.is_empty()
            && self.style.overlays.is_empty()
    }

    pub(crate) fn mark_fitted(&mut self, status: FitStatus) {
        self.fit_status = Some(status);
    }
}

/// Object safe cloning of boxes, implemented for every [LayoutBox] that is [Clone]
pub trait BoxClone {
    fn box_clone(&self) -> Box<dyn LayoutBox>;
}

impl<T: LayoutBox + Clone + 'static> BoxClone for T {
    fn box_clone(&self) -> Box<dyn LayoutBox> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn LayoutBox> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Something that can be fit into a frame, split when it doesn't fit, and drawn
pub trait LayoutBox: BoxClone + fmt::Debug {
    fn base(&self) -> &BoxBase;
    fn base_mut(&mut self) -> &mut BoxBase;

    /// Whether the box can be positioned with [Position::Flow]
    fn supports_flow(&self) -> bool {
        false
    }

    /// Fit the content into the box. The base already holds the resolved width and
    /// height; boxes sized by their content update them
    fn fit_content(
        &mut self,
        _available_width: f32,
        _available_height: f32,
        _frame: &Frame,
    ) -> Result<FitStatus, LayoutError> {
        Ok(FitStatus::Success)
    }

    /// Move the content that didn't fit into a new box. Only called after the
    /// content overflowed; `None` means nothing of the content fits
    fn split_content(&mut self) -> Option<Box<dyn LayoutBox>> {
        None
    }

    /// Draw the content with the bottom-left corner of the content area at `(x, y)`
    fn draw_content(&self, _canvas: &mut dyn Canvas, _x: f32, _y: f32) -> Result<(), LayoutError> {
        Ok(())
    }

    /// Whether drawing the box would paint nothing at all
    fn is_empty(&self) -> bool {
        self.base().is_empty()
    }

    fn width(&self) -> f32 {
        self.base().width()
    }

    fn height(&self) -> f32 {
        self.base().height()
    }

    fn style(&self) -> &Rc<Style> {
        self.base().style()
    }

    fn is_flowing(&self) -> bool {
        self.supports_flow() && self.style().position == Position::Flow
    }

    /// Resolve the size of the box and fit its content into `available_width` x
    /// `available_height` of `frame`
    fn fit(
        &mut self,
        available_width: f32,
        available_height: f32,
        frame: &Frame,
    ) -> Result<FitStatus, LayoutError> {
        let flowing = self.is_flowing();
        let base = self.base_mut();
        base.width = match base.declared_width {
            w if w > 0.0 => w,
            _ if flowing => frame.width(),
            _ => available_width.max(0.0),
        };
        base.height = match base.declared_height {
            h if h > 0.0 => h,
            _ if flowing => frame.y() - frame.bottom(),
            _ => available_height.max(0.0),
        };

        let status = if !flowing
            && (base.width > available_width + EPSILON || base.height > available_height + EPSILON)
        {
            FitStatus::Failure
        } else {
            self.fit_content(available_width, available_height, frame)?
        };
        self.base_mut().mark_fitted(status);
        Ok(status)
    }

    /// Split the box according to the last fit
    fn split(&mut self) -> Result<SplitOutcome, LayoutError> {
        let fixed_height = self.base().declared_height > 0.0;
        match self.base().fit_status {
            None => Err(LayoutError::NotFitted("split")),
            Some(FitStatus::Success) => Ok(SplitOutcome::Whole),
            Some(FitStatus::Failure) => Ok(SplitOutcome::Nothing),
            // content that doesn't fit a fixed height is dealt with when drawing
            Some(FitStatus::Overflow) if fixed_height => Ok(SplitOutcome::Whole),
            Some(FitStatus::Overflow) => match self.split_content() {
                Some(rest) => {
                    self.base_mut().mark_fitted(FitStatus::Success);
                    Ok(SplitOutcome::Parts(rest))
                }
                None => Ok(SplitOutcome::Nothing),
            },
        }
    }

    /// Draw the box with its bottom-left corner at `(x, y)`
    fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) -> Result<(), LayoutError> {
        let base = self.base();
        let status = base.fit_status.ok_or(LayoutError::NotFitted("draw"))?;
        let style = base.style();
        let overflowed = status == FitStatus::Overflow && base.declared_height > 0.0;
        if overflowed && style.overflow == OverflowPolicy::Error {
            return Err(LayoutError::Overflow(base.height));
        }

        if let Some(name) = &style.optional_content {
            canvas.begin_optional_content(name);
        }
        let rect = Rect::from_xywh(x, y, base.width, base.height);
        if let Some(colour) = style.background_colour {
            if !rect.is_empty() {
                canvas.fill_rect(rect, colour);
            }
        }
        style.underlays.draw(canvas, rect);
        style.border.draw(canvas, rect);

        let (content_x, content_y) = (x + base.reserved_left(), y + base.reserved_bottom());
        if overflowed {
            log::warn!(
                "box of height {:.2} overflowed, clipping its content",
                base.height
            );
            canvas.save_state();
            canvas.clip_rect(rect);
            let drawn = self.draw_content(canvas, content_x, content_y);
            canvas.restore_state();
            drawn?;
        } else {
            self.draw_content(canvas, content_x, content_y)?;
        }

        style.overlays.draw(canvas, rect);
        if style.optional_content.is_some() {
            canvas.end_optional_content();
        }
        Ok(())
    }
}

/// Split a fitted box into the part that is placed and the part that is left over
pub fn split_box(
    mut boxed: Box<dyn LayoutBox>,
) -> Result<(Option<Box<dyn LayoutBox>>, Option<Box<dyn LayoutBox>>), LayoutError> {
    Ok(match boxed.split()? {
        SplitOutcome::Whole => (Some(boxed), None),
        SplitOutcome::Nothing => (None, Some(boxed)),
        SplitOutcome::Parts(rest) => (Some(boxed), Some(rest)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{Op, RecordingCanvas};
    use crate::colour::colours;
    use crate::style::{Border, Quad};

    fn frame() -> Frame {
        Frame::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn content_size_never_goes_negative() {
        let mut style = Style::new();
        style.padding = Quad::all(10.0);
        let mut b = BasicBox::new(15.0, 5.0, Rc::new(style));
        assert_eq!(b.fit(100.0, 100.0, &frame()).unwrap(), FitStatus::Success);
        assert_eq!(b.base().content_width(), 0.0);
        assert_eq!(b.base().content_height(), 0.0);
    }

    #[test]
    fn auto_size_takes_the_available_space() {
        let mut b = BasicBox::new(0.0, 0.0, Rc::new(Style::new()));
        b.fit(30.0, 40.0, &frame()).unwrap();
        assert_eq!((b.width(), b.height()), (30.0, 40.0));
    }

    #[test]
    fn too_large_boxes_fail() {
        let mut b = BasicBox::new(50.0, 50.0, Rc::new(Style::new()));
        assert_eq!(b.fit(40.0, 100.0, &frame()).unwrap(), FitStatus::Failure);
        assert!(matches!(b.split().unwrap(), SplitOutcome::Nothing));
        assert_eq!(b.fit(50.0, 50.0, &frame()).unwrap(), FitStatus::Success);
        assert!(matches!(b.split().unwrap(), SplitOutcome::Whole));
    }

    #[test]
    fn split_and_draw_need_a_fit() {
        let mut b = BasicBox::new(10.0, 10.0, Rc::new(Style::new()));
        assert!(matches!(b.split(), Err(LayoutError::NotFitted("split"))));
        let mut canvas = RecordingCanvas::default();
        assert!(matches!(
            b.draw(&mut canvas, 0.0, 0.0),
            Err(LayoutError::NotFitted("draw"))
        ));
    }

    #[test]
    fn split_box_returns_pairs() {
        let mut b: Box<dyn LayoutBox> = Box::new(BasicBox::new(50.0, 50.0, Rc::new(Style::new())));
        b.fit(40.0, 40.0, &frame()).unwrap();
        let (first, second) = split_box(b).unwrap();
        assert!(first.is_none());
        assert!(second.is_some());
    }

    #[test]
    fn draws_background_border_and_layers_in_order() {
        let mut style = Style::new();
        style.background_colour = Some(colours::GREY);
        style.border = Border::new(Quad::all(1.0), colours::BLACK);
        style.optional_content = Some("oc1".to_string());
        style.overlays.add(|canvas: &mut dyn Canvas, rect: Rect| {
            canvas.stroke_line((rect.x1, rect.y1), (rect.x2, rect.y2), 1.0, colours::RED)
        });
        let mut b = BasicBox::new(10.0, 10.0, Rc::new(style));
        assert!(!LayoutBox::is_empty(&b));
        b.fit(100.0, 100.0, &frame()).unwrap();

        let mut canvas = RecordingCanvas::default();
        b.draw(&mut canvas, 5.0, 5.0).unwrap();
        assert_eq!(canvas.ops.first(), Some(&Op::BeginOptional("oc1".to_string())));
        assert_eq!(canvas.ops[1], Op::FillRect(Rect::new(5.0, 5.0, 15.0, 15.0)));
        assert!(canvas.ops.contains(&Op::Line((5.0, 5.0), (15.0, 15.0))));
        assert_eq!(canvas.ops.last(), Some(&Op::EndOptional));
    }

    #[test]
    fn plain_boxes_are_empty() {
        let b = BasicBox::new(10.0, 10.0, Rc::new(Style::new()));
        assert!(LayoutBox::is_empty(&b));
    }
}
