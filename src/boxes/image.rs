use super::{BoxBase, FitStatus, LayoutBox};
use crate::canvas::Canvas;
use crate::error::LayoutError;
use crate::frame::Frame;
use crate::rect::Rect;
use crate::shape::EPSILON;
use crate::style::Style;
use std::rc::Rc;

/// Shows an image XObject, keeping its aspect ratio unless both dimensions of the
/// box are declared.
///
/// The image itself is registered with the PDF under `name` by whoever writes the
/// document; the box only knows its intrinsic size.
#[derive(Debug, Clone)]
pub struct ImageBox {
    base: BoxBase,
    name: String,
    image_width: f32,
    image_height: f32,
}

impl ImageBox {
    pub fn new<S: Into<String>>(
        name: S,
        image_width: f32,
        image_height: f32,
        style: Rc<Style>,
    ) -> ImageBox {
        ImageBox {
            base: BoxBase::new(0.0, 0.0, style),
            name: name.into(),
            image_width: image_width.max(0.0),
            image_height: image_height.max(0.0),
        }
    }

    /// Declare the size of the box. Either dimension may be 0 to derive it from the
    /// other one
    pub fn with_size(mut self, width: f32, height: f32) -> ImageBox {
        self.base = BoxBase::new(width, height, self.base.style().clone());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl LayoutBox for ImageBox {
    fn base(&self) -> &BoxBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BoxBase {
        &mut self.base
    }

    fn fit_content(
        &mut self,
        available_width: f32,
        available_height: f32,
        _frame: &Frame,
    ) -> Result<FitStatus, LayoutError> {
        let (iw, ih) = (self.image_width, self.image_height);
        let base = &mut self.base;
        if iw <= 0.0 || ih <= 0.0 {
            base.set_content_width(0.0);
            base.set_content_height(0.0);
        } else {
            let (cw, ch) = (base.content_width(), base.content_height());
            match (base.declared_width() > 0.0, base.declared_height() > 0.0) {
                (true, true) => {}
                (true, false) => base.set_content_height(cw * ih / iw),
                (false, true) => base.set_content_width(ch * iw / ih),
                (false, false) => {
                    let ratio = (cw / iw).min(ch / ih);
                    base.set_content_width(iw * ratio);
                    base.set_content_height(ih * ratio);
                }
            }
        }

        if base.width() > available_width + EPSILON || base.height() > available_height + EPSILON {
            Ok(FitStatus::Failure)
        } else {
            Ok(FitStatus::Success)
        }
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, x: f32, y: f32) -> Result<(), LayoutError> {
        let rect = Rect::from_xywh(x, y, self.base.content_width(), self.base.content_height());
        if !rect.is_empty() {
            canvas.draw_image(&self.name, rect);
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.base.is_empty() && (self.image_width <= 0.0 || self.image_height <= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{Op, RecordingCanvas};

    fn frame() -> Frame {
        Frame::new(0.0, 0.0, 200.0, 200.0)
    }

    #[test]
    fn scales_into_the_available_space() {
        let mut image = ImageBox::new("Im1", 400.0, 100.0, Rc::new(Style::new()));
        assert_eq!(image.fit(200.0, 200.0, &frame()).unwrap(), FitStatus::Success);
        assert_eq!((image.width(), image.height()), (200.0, 50.0));

        let mut canvas = RecordingCanvas::default();
        image.draw(&mut canvas, 0.0, 10.0).unwrap();
        assert_eq!(
            canvas.ops,
            vec![Op::Image("Im1".to_string(), Rect::new(0.0, 10.0, 200.0, 60.0))]
        );
    }

    #[test]
    fn derives_the_missing_dimension() {
        let style = Rc::new(Style::new());
        let mut image = ImageBox::new("Im1", 100.0, 50.0, style.clone()).with_size(0.0, 40.0);
        image.fit(200.0, 200.0, &frame()).unwrap();
        assert_eq!((image.width(), image.height()), (80.0, 40.0));

        let mut image = ImageBox::new("Im1", 100.0, 50.0, style).with_size(60.0, 0.0);
        image.fit(200.0, 200.0, &frame()).unwrap();
        assert_eq!((image.width(), image.height()), (60.0, 30.0));
    }

    #[test]
    fn fails_when_the_derived_size_is_too_large() {
        let mut image =
            ImageBox::new("Im1", 100.0, 100.0, Rc::new(Style::new())).with_size(150.0, 0.0);
        assert_eq!(image.fit(150.0, 100.0, &frame()).unwrap(), FitStatus::Failure);
    }
}
