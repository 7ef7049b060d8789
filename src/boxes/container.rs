use super::{BoxBase, FitStatus, LayoutBox};
use crate::canvas::Canvas;
use crate::error::LayoutError;
use crate::fitter::{BoxFitter, Placement};
use crate::frame::Frame;
use crate::style::Style;
use std::rc::Rc;

/// Lays out its children in a frame of its own. Either all children fit or the
/// container doesn't fit at all; it is never split.
#[derive(Debug, Clone)]
pub struct ContainerBox {
    base: BoxBase,
    children: Vec<Box<dyn LayoutBox>>,
    placements: Vec<Placement>,
    frame_height: f32,
}

impl ContainerBox {
    pub fn new(children: Vec<Box<dyn LayoutBox>>, style: Rc<Style>) -> ContainerBox {
        ContainerBox {
            base: BoxBase::new(0.0, 0.0, style),
            children,
            placements: Vec::new(),
            frame_height: 0.0,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> ContainerBox {
        self.base = BoxBase::new(width, height, self.base.style().clone());
        self
    }

    pub fn children(&self) -> &[Box<dyn LayoutBox>] {
        &self.children
    }
}

impl LayoutBox for ContainerBox {
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
        let (width, height) = (self.base.content_width(), self.base.content_height());
        let mut fitter = BoxFitter::new(vec![Frame::new(0.0, 0.0, width, height)]);
        for child in self.children.iter() {
            fitter.fit(child.clone())?;
        }
        if !fitter.is_success() {
            self.placements.clear();
            return Ok(FitStatus::Failure);
        }

        let used = fitter.content_heights().first().copied().unwrap_or(0.0);
        self.base.set_content_height(used);
        self.frame_height = height;
        self.placements = fitter.into_parts().0;
        Ok(FitStatus::Success)
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, x: f32, y: f32) -> Result<(), LayoutError> {
        // children were placed from the top of a frame that may be taller than the box
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BasicBox;
    use crate::canvas::recording::{Op, RecordingCanvas};
    use crate::colour::colours;
    use crate::rect::Rect;

    fn filled(width: f32, height: f32) -> Box<dyn LayoutBox> {
        let mut style = Style::new();
        style.background_colour = Some(colours::BLACK);
        Box::new(BasicBox::new(width, height, Rc::new(style)))
    }

    fn frame() -> Frame {
        Frame::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn wraps_its_children() {
        let mut container =
            ContainerBox::new(vec![filled(50.0, 20.0), filled(50.0, 20.0)], Rc::new(Style::new()));
        assert!(!LayoutBox::is_empty(&container));
        assert_eq!(container.fit(100.0, 100.0, &frame()).unwrap(), FitStatus::Success);
        assert_eq!((container.width(), container.height()), (100.0, 40.0));

        let mut canvas = RecordingCanvas::default();
        container.draw(&mut canvas, 10.0, 10.0).unwrap();
        assert_eq!(
            canvas.ops,
            vec![
                Op::FillRect(Rect::new(10.0, 30.0, 60.0, 50.0)),
                Op::FillRect(Rect::new(10.0, 10.0, 60.0, 30.0)),
            ]
        );
    }

    #[test]
    fn all_or_nothing() {
        let mut container =
            ContainerBox::new(vec![filled(50.0, 60.0), filled(50.0, 60.0)], Rc::new(Style::new()));
        assert_eq!(container.fit(100.0, 100.0, &frame()).unwrap(), FitStatus::Failure);
        assert!(matches!(
            container.split().unwrap(),
            crate::boxes::SplitOutcome::Nothing
        ));
    }
}
