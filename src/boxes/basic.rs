use super::{BoxBase, LayoutBox};
use crate::canvas::Canvas;
use crate::error::LayoutError;
use crate::style::Style;
use std::fmt;
use std::rc::Rc;

/// Draws the content of a [BasicBox], given the canvas, the bottom-left corner of
/// the content area and its size
pub type DrawFn = Rc<dyn Fn(&mut dyn Canvas, f32, f32, f32, f32)>;

/// A box with no content of its own. It paints its background, border and layers,
/// and optionally runs a drawing closure over its content area
#[derive(Clone)]
pub struct BasicBox {
    base: BoxBase,
    drawing: Option<DrawFn>,
}

impl BasicBox {
    pub fn new(width: f32, height: f32, style: Rc<Style>) -> BasicBox {
        BasicBox {
            base: BoxBase::new(width, height, style),
            drawing: None,
        }
    }

    pub fn with_drawing<F>(mut self, drawing: F) -> BasicBox
    where
        F: Fn(&mut dyn Canvas, f32, f32, f32, f32) + 'static,
    {
        self.drawing = Some(Rc::new(drawing));
        self
    }
}

impl fmt::Debug for BasicBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicBox")
            .field("base", &self.base)
            .field("drawing", &self.drawing.is_some())
            .finish()
    }
}

impl LayoutBox for BasicBox {
    fn base(&self) -> &BoxBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BoxBase {
        &mut self.base
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, x: f32, y: f32) -> Result<(), LayoutError> {
        if let Some(drawing) = &self.drawing {
            drawing(canvas, x, y, self.base.content_width(), self.base.content_height());
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.base.is_empty() && self.drawing.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{Op, RecordingCanvas};
    use crate::colour::colours;
    use crate::frame::Frame;
    use crate::rect::Rect;
    use crate::style::Quad;

    #[test]
    fn drawing_gets_the_content_area() {
        let mut style = Style::new();
        style.padding = Quad::all(2.0);
        let mut b = BasicBox::new(20.0, 10.0, Rc::new(style)).with_drawing(
            |canvas: &mut dyn Canvas, x, y, w, h| {
                canvas.fill_rect(Rect::from_xywh(x, y, w, h), colours::BLACK)
            },
        );
        assert!(!LayoutBox::is_empty(&b));
        b.fit(100.0, 100.0, &Frame::new(0.0, 0.0, 100.0, 100.0)).unwrap();

        let mut canvas = RecordingCanvas::default();
        b.draw(&mut canvas, 10.0, 10.0).unwrap();
        assert_eq!(canvas.ops, vec![Op::FillRect(Rect::new(12.0, 12.0, 28.0, 18.0))]);
    }
}
