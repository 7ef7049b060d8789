//! Frames keep track of the free area of a page, column or any other region that
//! boxes are placed into.

use crate::boxes::{FitResult, FitStatus, LayoutBox};
use crate::error::LayoutError;
use crate::rect::Rect;
use crate::shape::{Shape, EPSILON};
use crate::style::{Align, MaskMode, Position, Quad, VAlign};
use crate::text::WidthFromShape;

/// The strategy [Frame::find_next_region] uses on its next call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegionSelection {
    MaxWidth,
    MaxHeight,
    TrimShape,
}

/// A rectangular area with a shape describing which parts of it are still free.
///
/// Boxes are placed into the *current region*: an axis-aligned rectangle inside
/// the shape whose top-left corner is the top-most, left-most corner of the shape.
/// If a box doesn't fit there, [Frame::find_next_region] tries a taller but narrower
/// region from the same corner, and then cuts away the top band of the shape and
/// starts over further down. Cutting away bands wastes whatever area is left in
/// them, but it makes sure the search always ends.
#[derive(Debug, Clone)]
pub struct Frame {
    left: f32,
    bottom: f32,
    width: f32,
    height: f32,
    shape: Shape,
    x: f32,
    y: f32,
    available_width: f32,
    available_height: f32,
    region_selection: RegionSelection,
}

impl Frame {
    pub fn new(left: f32, bottom: f32, width: f32, height: f32) -> Frame {
        let bounds = Rect::from_xywh(left, bottom, width.max(0.0), height.max(0.0));
        Frame::with_shape(left, bottom, width, height, Shape::from_rect(bounds))
    }

    /// A frame whose free area starts out as `shape`, clipped to the frame's bounds
    pub fn with_shape(left: f32, bottom: f32, width: f32, height: f32, shape: Shape) -> Frame {
        let (width, height) = (width.max(0.0), height.max(0.0));
        let bounds = Rect::from_xywh(left, bottom, width, height);
        let mut frame = Frame {
            left,
            bottom,
            width,
            height,
            shape: shape.intersection(&Shape::from_rect(bounds)),
            x: left,
            y: bottom + height,
            available_width: 0.0,
            available_height: 0.0,
            region_selection: RegionSelection::MaxWidth,
        };
        frame.find_next_region();
        frame
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn top(&self) -> f32 {
        self.bottom + self.height
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Left edge of the current region
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Top edge of the current region
    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn available_width(&self) -> f32 {
        self.available_width
    }

    pub fn available_height(&self) -> f32 {
        self.available_height
    }

    /// The part of the frame that is still free
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn is_full(&self) -> bool {
        self.available_width <= 0.0
    }

    /// Line widths for text that flows through the free area of the frame, starting
    /// at the top of the current region and at `left_offset` from the frame's left
    /// edge
    pub fn width_specification(&self, left_offset: f32, top_offset: f32, width: f32) -> WidthFromShape {
        WidthFromShape::new(
            self.shape.clone(),
            self.left + left_offset,
            self.y - top_offset,
            width,
        )
    }

    /// Work out where `boxed` would go in the current region and what area it would
    /// take up. Nothing is committed; see [Frame::remove_area]
    pub fn fit(&self, boxed: &mut dyn LayoutBox) -> Result<FitResult, LayoutError> {
        let mut result = FitResult::failure(self.available_width, self.available_height);
        if self.is_full() {
            return Ok(result);
        }
        let style = boxed.style().clone();
        let margin = style.margin;

        if let Position::Absolute { x, y } = style.position {
            let (aw, ah) = (self.width - x, self.height - y);
            boxed.fit(aw, ah, self)?;
            result.status = FitStatus::Success;
            result.x = self.left + x;
            result.y = self.bottom + y;
            result.available_width = aw;
            result.available_height = ah;
            result.mask = self.mask(style.resolved_mask_mode(), &margin, boxed, result.x, result.y);
            return Ok(result);
        }

        // margins on the outer edges of the frame don't apply
        let margin = Quad {
            top: flush_or(self.y, self.top(), margin.top),
            right: flush_or(self.x + self.available_width, self.right(), margin.right),
            bottom: flush_or(self.y - self.available_height, self.bottom, margin.bottom),
            left: flush_or(self.x, self.left, margin.left),
        };
        let aw = (self.available_width - margin.horizontal()).max(0.0);
        let ah = (self.available_height - margin.vertical()).max(0.0);
        result.available_width = aw;
        result.available_height = ah;

        result.status = boxed.fit(aw, ah, self)?;
        if result.status == FitStatus::Failure {
            return Ok(result);
        }

        let (width, height) = (boxed.width(), boxed.height());
        let (x, y) = match style.position {
            Position::Flow => (self.left, self.y - margin.top - height),
            _ => {
                let x = match style.align {
                    Align::Left => self.x + margin.left,
                    Align::Right => self.x + self.available_width - margin.right - width,
                    Align::Center => {
                        let slack = self.available_width - width;
                        if slack / 2.0 >= margin.left.max(margin.right) {
                            self.x + slack / 2.0
                        } else {
                            self.x + margin.left + (aw - width) / 2.0
                        }
                    }
                };
                let region_bottom = self.y - self.available_height;
                let y = match style.valign {
                    VAlign::Top => self.y - margin.top - height,
                    VAlign::Bottom => region_bottom + margin.bottom,
                    VAlign::Center => {
                        let slack = self.available_height - height;
                        if slack / 2.0 >= margin.top.max(margin.bottom) {
                            region_bottom + slack / 2.0
                        } else {
                            region_bottom + margin.bottom + (ah - height) / 2.0
                        }
                    }
                };
                (x, y)
            }
        };
        result.x = x;
        result.y = y;
        result.mask = self.mask(style.resolved_mask_mode(), &margin, boxed, x, y);
        Ok(result)
    }

    /// The area a box placed at `(x, y)` takes up, clipped to the frame
    fn mask(&self, mode: MaskMode, margin: &Quad, boxed: &dyn LayoutBox, x: f32, y: f32) -> Option<Rect> {
        let (width, height) = (boxed.width(), boxed.height());
        let region_bottom = self.y - self.available_height;
        let rect = match mode {
            MaskMode::None => return None,
            MaskMode::Box | MaskMode::Default => Rect::new(
                x - margin.left,
                y - margin.bottom,
                x + width + margin.right,
                y + height + margin.top,
            ),
            MaskMode::FillHorizontal => Rect::new(
                self.x,
                y - margin.bottom,
                self.x + self.available_width,
                self.y,
            ),
            MaskMode::FillFrameHorizontal => {
                Rect::new(self.left, y - margin.bottom, self.right(), self.y)
            }
            MaskMode::FillVertical => Rect::new(
                x - margin.left,
                region_bottom,
                x + width + margin.right,
                self.y,
            ),
            MaskMode::Fill => Rect::new(self.x, region_bottom, self.x + self.available_width, self.y),
        };
        let bounds = Rect::from_xywh(self.left, self.bottom, self.width, self.height);
        rect.intersection(&bounds)
    }

    /// Mark `area` as used and move on to the next region
    pub fn remove_area(&mut self, area: &Shape) {
        self.shape = self.shape.difference(area);
        log::debug!(
            "removed area from frame at ({:.2}, {:.2}), {:.2} left",
            self.left,
            self.bottom,
            self.shape.area()
        );
        self.region_selection = RegionSelection::MaxWidth;
        self.find_next_region();
    }

    /// Move on to the next candidate region. Returns false once the frame is full
    pub fn find_next_region(&mut self) -> bool {
        match self.region_selection {
            RegionSelection::MaxWidth => {
                self.find_max_width_region();
                self.region_selection = RegionSelection::MaxHeight;
            }
            RegionSelection::MaxHeight => {
                let previous = (self.x, self.y, self.available_width, self.available_height);
                self.find_max_height_region();
                if previous == (self.x, self.y, self.available_width, self.available_height) {
                    self.trim_shape();
                } else {
                    log::debug!("switched to the tallest region at ({:.2}, {:.2})", self.x, self.y);
                    self.region_selection = RegionSelection::TrimShape;
                }
            }
            RegionSelection::TrimShape => self.trim_shape(),
        }
        self.available_width > 0.0
    }

    fn trim_shape(&mut self) {
        if let Some(band) = self.shape.bands().first() {
            log::debug!("trimming unused band {:.2}..{:.2} from frame", band.bottom, band.top);
        }
        self.shape = self.shape.without_top_band();
        self.find_max_width_region();
        self.region_selection = RegionSelection::MaxHeight;
    }

    /// The region at the top-left corner as wide as the shape allows there, as tall
    /// as that width allows
    fn find_max_width_region(&mut self) {
        let bands = self.shape.bands();
        let Some(span) = bands.first().and_then(|band| band.spans.first()) else {
            return self.set_exhausted();
        };
        let (start, end) = (span.start, span.end);
        let top = bands[0].top;
        let mut bottom = bands[0].bottom;
        for pair in bands.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            if (upper.bottom - lower.top).abs() > EPSILON || lower.span_containing(start, end).is_none() {
                break;
            }
            bottom = lower.bottom;
        }
        self.set_region(start, top, end - start, top - bottom);
    }

    /// The region at the top-left corner as tall as the shape allows there, as wide
    /// as that height allows
    fn find_max_height_region(&mut self) {
        let bands = self.shape.bands();
        let Some(span) = bands.first().and_then(|band| band.spans.first()) else {
            return self.set_exhausted();
        };
        let (start, mut end) = (span.start, span.end);
        let top = bands[0].top;
        let mut bottom = bands[0].bottom;
        for pair in bands.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            if (upper.bottom - lower.top).abs() > EPSILON {
                break;
            }
            match lower.spans.iter().find(|s| s.start <= start + EPSILON && s.end > start + EPSILON) {
                Some(s) => {
                    end = end.min(s.end);
                    bottom = lower.bottom;
                }
                None => break,
            }
        }
        self.set_region(start, top, end - start, top - bottom);
    }

    fn set_region(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.x = x;
        self.y = y;
        self.available_width = width;
        self.available_height = height;
    }

    fn set_exhausted(&mut self) {
        self.set_region(self.left, self.bottom, 0.0, 0.0);
    }
}

/// `margin` unless the edge at `edge` lies on the frame boundary at `boundary`
fn flush_or(edge: f32, boundary: f32, margin: f32) -> f32 {
    if (edge - boundary).abs() <= EPSILON {
        0.0
    } else {
        margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BasicBox;
    use crate::style::Style;
    use std::rc::Rc;

    fn sized(width: f32, height: f32, f: impl FnOnce(&mut Style)) -> BasicBox {
        let mut style = Style::new();
        f(&mut style);
        BasicBox::new(width, height, Rc::new(style))
    }

    fn region(frame: &Frame) -> (f32, f32, f32, f32) {
        (frame.x(), frame.y(), frame.available_width(), frame.available_height())
    }

    #[test]
    fn starts_with_the_whole_frame() {
        let frame = Frame::new(10.0, 20.0, 100.0, 200.0);
        assert_eq!(region(&frame), (10.0, 220.0, 100.0, 200.0));
        assert!(!frame.is_full());
    }

    #[test]
    fn places_boxes_top_left_by_default() {
        let frame = Frame::new(0.0, 0.0, 100.0, 100.0);
        let mut b = sized(50.0, 50.0, |_| {});
        let result = frame.fit(&mut b).unwrap();
        assert_eq!(result.status, FitStatus::Success);
        assert_eq!((result.x, result.y), (0.0, 50.0));
        assert_eq!(result.mask, Some(Rect::new(0.0, 50.0, 100.0, 100.0)));
    }

    #[test]
    fn box_mask_leaves_room_beside_the_box() {
        let mut frame = Frame::new(0.0, 0.0, 100.0, 100.0);
        let mut b = sized(50.0, 50.0, |s| s.mask_mode = MaskMode::Box);
        let result = frame.fit(&mut b).unwrap();
        let mask = result.mask.unwrap();
        assert_eq!(mask, Rect::new(0.0, 50.0, 50.0, 100.0));
        frame.remove_area(&mask.into());
        assert_eq!(region(&frame), (50.0, 100.0, 50.0, 100.0));
    }

    #[test]
    fn frame_horizontal_mask_takes_the_full_width() {
        let mut frame = Frame::new(0.0, 0.0, 100.0, 100.0);
        let mut b = sized(50.0, 50.0, |s| s.mask_mode = MaskMode::FillFrameHorizontal);
        let mask = frame.fit(&mut b).unwrap().mask.unwrap();
        frame.remove_area(&mask.into());
        assert_eq!(region(&frame), (0.0, 50.0, 100.0, 50.0));
    }

    #[test]
    fn aligns_inside_the_region() {
        let frame = Frame::new(0.0, 0.0, 100.0, 100.0);
        let mut b = sized(20.0, 10.0, |s| {
            s.align = Align::Right;
            s.valign = VAlign::Bottom;
        });
        let result = frame.fit(&mut b).unwrap();
        assert_eq!((result.x, result.y), (80.0, 0.0));

        let mut b = sized(20.0, 10.0, |s| {
            s.align = Align::Center;
            s.valign = VAlign::Center;
        });
        let result = frame.fit(&mut b).unwrap();
        assert_eq!((result.x, result.y), (40.0, 45.0));
    }

    #[test]
    fn centering_respects_large_margins() {
        let frame = Frame::new(0.0, 0.0, 100.0, 100.0);
        // margins on the frame edges collapse, so move the region away from them
        let mut frame = frame;
        frame.remove_area(&Rect::new(0.0, 90.0, 100.0, 100.0).into());
        frame.remove_area(&Rect::new(0.0, 0.0, 10.0, 90.0).into());
        assert_eq!(region(&frame), (10.0, 90.0, 90.0, 90.0));

        let mut b = sized(60.0, 10.0, |s| {
            s.align = Align::Center;
            s.margin = Quad::trbl(0.0, 0.0, 0.0, 20.0);
        });
        let result = frame.fit(&mut b).unwrap();
        // slack of 30 can't hold the left margin twice over
        assert_eq!(result.x, 10.0 + 20.0 + (70.0 - 60.0) / 2.0);
    }

    #[test]
    fn margins_collapse_at_frame_edges() {
        let mut frame = Frame::new(0.0, 0.0, 100.0, 100.0);
        let mut b = sized(0.0, 10.0, |s| s.margin = Quad::all(5.0));
        let result = frame.fit(&mut b).unwrap();
        assert_eq!((result.available_width, result.available_height), (100.0, 100.0));
        assert_eq!((result.x, result.y), (0.0, 90.0));
        frame.remove_area(&result.mask.unwrap().into());

        // the top edge is no longer on the frame boundary
        let result = frame.fit(&mut b).unwrap();
        assert_eq!(result.available_height, 90.0 - 5.0);
        assert_eq!(result.y, 90.0 - 5.0 - 10.0);
    }

    #[test]
    fn absolute_boxes_always_fit() {
        let frame = Frame::new(0.0, 0.0, 100.0, 100.0);
        let mut b = sized(30.0, 30.0, |s| s.position = Position::Absolute { x: 10.0, y: 20.0 });
        let result = frame.fit(&mut b).unwrap();
        assert_eq!(result.status, FitStatus::Success);
        assert_eq!((result.x, result.y), (10.0, 20.0));
        assert_eq!(result.mask, Some(Rect::new(10.0, 20.0, 40.0, 50.0)));
    }

    #[test]
    fn full_frames_reject_everything() {
        let mut frame = Frame::new(0.0, 0.0, 100.0, 100.0);
        frame.remove_area(&Rect::new(0.0, 0.0, 100.0, 100.0).into());
        assert!(frame.is_full());
        let mut b = sized(1.0, 1.0, |_| {});
        assert_eq!(frame.fit(&mut b).unwrap().status, FitStatus::Failure);
    }

    #[test]
    fn searches_taller_regions_then_trims() {
        // an L: wide on top, narrow below
        let shape = Shape::from_polygon(&[
            (0.0, 0.0),
            (20.0, 0.0),
            (20.0, 80.0),
            (100.0, 80.0),
            (100.0, 100.0),
            (0.0, 100.0),
        ])
        .unwrap();
        let mut frame = Frame::with_shape(0.0, 0.0, 100.0, 100.0, shape);
        assert_eq!(region(&frame), (0.0, 100.0, 100.0, 20.0));

        assert!(frame.find_next_region());
        assert_eq!(region(&frame), (0.0, 100.0, 20.0, 100.0));

        assert!(frame.find_next_region());
        assert_eq!(region(&frame), (0.0, 80.0, 20.0, 80.0));
    }

    #[test]
    fn region_search_ends() {
        let shape = Shape::from_polygons(&[
            vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)],
            vec![(10.0, 10.0), (30.0, 10.0), (30.0, 30.0), (10.0, 30.0)],
            vec![(50.0, 40.0), (90.0, 40.0), (90.0, 70.0), (50.0, 70.0)],
        ])
        .unwrap();
        let mut frame = Frame::with_shape(0.0, 0.0, 100.0, 100.0, shape);
        let mut calls = 0;
        while frame.find_next_region() {
            calls += 1;
            assert!(calls < 100, "region search doesn't terminate");
        }
        assert!(frame.is_full());
    }

    #[test]
    fn free_area_never_grows() {
        let shape = Shape::from_polygons(&[
            vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)],
            vec![(10.0, 10.0), (30.0, 10.0), (30.0, 30.0), (10.0, 30.0)],
            vec![(50.0, 40.0), (90.0, 40.0), (90.0, 70.0), (50.0, 70.0)],
        ])
        .unwrap();
        let mut frame = Frame::with_shape(0.0, 0.0, 100.0, 100.0, shape);
        let mut area = frame.shape().area();

        // a few removals that don't line up with anything
        for (i, r) in [
            Rect::new(5.0, 85.0, 45.0, 97.0),
            Rect::new(60.0, 20.0, 75.0, 95.0),
            Rect::new(-10.0, 35.0, 12.0, 50.0),
            Rect::new(25.0, 0.0, 55.0, 8.0),
        ]
        .into_iter()
        .enumerate()
        {
            frame.remove_area(&r.into());
            let now = frame.shape().area();
            assert!(now <= area + 1e-3, "removal {i} grew the area from {area} to {now}");
            area = now;
        }

        // then fill up what is left with boxes
        let mut placed = 0;
        for _ in 0..5000 {
            let mut b = sized(15.0, 12.0, |s| s.mask_mode = MaskMode::Box);
            let result = frame.fit(&mut b).unwrap();
            match result.mask {
                Some(mask) if result.is_success() => {
                    frame.remove_area(&mask.into());
                    placed += 1;
                }
                _ => {
                    if !frame.find_next_region() {
                        break;
                    }
                }
            }
            let now = frame.shape().area();
            assert!(now <= area + 1e-3, "area grew from {area} to {now}");
            area = now;
        }
        assert!(placed > 0);
        assert!(frame.is_full());
    }

    #[test]
    fn flow_specification_follows_the_region() {
        let mut frame = Frame::new(0.0, 0.0, 100.0, 100.0);
        frame.remove_area(&Rect::new(0.0, 60.0, 30.0, 100.0).into());
        let spec = frame.width_specification(0.0, 0.0, 100.0);
        use crate::text::WidthFunction;
        assert_eq!(spec.segments(0.0, 10.0), vec![(30.0, 70.0)]);
    }
}
