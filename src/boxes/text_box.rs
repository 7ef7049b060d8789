use super::{BoxBase, FitStatus, LayoutBox};
use crate::canvas::Canvas;
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::frame::Frame;
use crate::shape::EPSILON;
use crate::style::{Style, TextVAlign};
use crate::text::{
    segment, InlineItem, Item, Line, TextFragment, TextLayout, TextLayoutStatus, TextLayouter,
};
use std::rc::Rc;

/// A box of wrapped text.
///
/// Without a declared width the box shrinks to the widest line; without a declared
/// height it is as tall as its lines. With [Position::Flow](crate::Position::Flow)
/// the lines flow around whatever was already placed in the frame.
#[derive(Debug, Clone)]
pub struct TextBox {
    base: BoxBase,
    tokens: Vec<Item>,
    layout: Option<TextLayout>,
    x_shift: f32,
    y_shift: f32,
}

impl TextBox {
    /// A text box over styled fragments and inline boxes
    pub fn new(items: Vec<InlineItem>, style: Rc<Style>, config: &LayoutConfig) -> TextBox {
        TextBox::from_tokens(segment(items, config), style)
    }

    /// A text box over plain text set in the box's style
    pub fn from_text(text: &str, style: Rc<Style>) -> TextBox {
        let fragment = TextFragment::create(text, style.clone());
        TextBox::new(vec![fragment.into()], style, &LayoutConfig::default())
    }

    /// A text box over already segmented tokens
    pub fn from_tokens(tokens: Vec<Item>, style: Rc<Style>) -> TextBox {
        TextBox {
            base: BoxBase::new(0.0, 0.0, style),
            tokens,
            layout: None,
            x_shift: 0.0,
            y_shift: 0.0,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> TextBox {
        self.base = BoxBase::new(width, height, self.base.style().clone());
        self
    }

    pub fn tokens(&self) -> &[Item] {
        &self.tokens
    }

    /// The lines of the last fit
    pub fn lines(&self) -> &[Line] {
        self.layout
            .as_ref()
            .map(|layout| layout.lines.as_slice())
            .unwrap_or(&[])
    }
}

impl LayoutBox for TextBox {
    fn base(&self) -> &BoxBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BoxBase {
        &mut self.base
    }

    fn supports_flow(&self) -> bool {
        true
    }

    fn fit_content(
        &mut self,
        _available_width: f32,
        _available_height: f32,
        frame: &Frame,
    ) -> Result<FitStatus, LayoutError> {
        let style = self.base.style().clone();
        let layouter = TextLayouter::new(style.clone());
        let flowing = self.is_flowing();
        let content_width = self.base.content_width();

        let layout = if flowing {
            // the top margin is dropped at the top edge of the frame
            let margin_top = if (frame.y() - frame.top()).abs() <= EPSILON {
                0.0
            } else {
                style.margin.top
            };
            let reserved_top = style.padding.top + style.border.width.top;
            let height = self.base.content_height() - margin_top;
            let width = frame.width_specification(
                self.base.reserved_left(),
                margin_top + reserved_top,
                content_width,
            );
            layouter.fit(&self.tokens, &width, height)
        } else {
            layouter.fit(&self.tokens, &content_width, self.base.content_height())
        };

        self.x_shift = 0.0;
        if !flowing && self.base.declared_width() == 0.0 {
            let (left, right) = layout.horizontal_extent();
            self.base.set_content_width(right - left);
            self.x_shift = -left;
        }
        self.base.set_content_height(layout.height);
        self.y_shift = match style.text_valign {
            TextVAlign::Top => 0.0,
            TextVAlign::Center => (self.base.content_height() - layout.height).max(0.0) / 2.0,
            TextVAlign::Bottom => (self.base.content_height() - layout.height).max(0.0),
        };

        let status = match layout.status {
            TextLayoutStatus::Success => FitStatus::Success,
            _ if layout.lines.is_empty() => FitStatus::Failure,
            _ => FitStatus::Overflow,
        };
        log::trace!(
            "text box fit {} lines with status {:?}",
            layout.lines.len(),
            status
        );
        self.layout = Some(layout);
        Ok(status)
    }

    fn split_content(&mut self) -> Option<Box<dyn LayoutBox>> {
        let layout = self.layout.as_mut()?;
        if layout.lines.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut layout.remaining);
        let consumed = self.tokens.len() - rest.len();
        self.tokens.truncate(consumed);
        Some(Box::new(TextBox {
            base: self.base.continuation(),
            tokens: rest,
            layout: None,
            x_shift: 0.0,
            y_shift: 0.0,
        }))
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, x: f32, y: f32) -> Result<(), LayoutError> {
        match &self.layout {
            Some(layout) => {
                let top = y + self.base.content_height() - self.y_shift;
                layout.draw(canvas, x + self.x_shift, top)
            }
            None => Ok(()),
        }
    }

    fn is_empty(&self) -> bool {
        self.base.is_empty()
            && match &self.layout {
                Some(layout) => layout.lines.iter().all(Line::is_empty),
                None => self.tokens.is_empty(),
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BasicBox;
    use crate::canvas::recording::{Op, RecordingCanvas};
    use crate::fitter::BoxFitter;
    use crate::font::FixedPitchFont;
    use crate::style::{OverflowPolicy, Position};

    const LINE: f32 = 7.86;

    fn style() -> Style {
        Style::with_font(Rc::new(FixedPitchFont::courier()), 10.0)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn frame() -> Frame {
        Frame::new(0.0, 0.0, 100.0, 100.0)
    }

    fn texts(b: &TextBox) -> Vec<String> {
        b.lines().iter().map(Line::text).collect()
    }

    #[test]
    fn shrinks_to_the_widest_line() {
        let mut b = TextBox::from_text("aaa bbb ccc", Rc::new(style()));
        assert_eq!(b.fit(45.0, 100.0, &frame()).unwrap(), FitStatus::Success);
        assert_eq!(texts(&b), vec!["aaa bbb", "ccc"]);
        assert!(close(b.width(), 42.0));
        assert!(close(b.height(), 2.0 * LINE));
    }

    #[test]
    fn shrinking_drops_the_alignment_offset() {
        let mut s = style();
        s.text_align = crate::style::TextAlign::Right;
        let mut b = TextBox::from_text("aa", Rc::new(s));
        b.fit(100.0, 100.0, &frame()).unwrap();
        assert!(close(b.width(), 12.0));

        let mut canvas = RecordingCanvas::default();
        b.draw(&mut canvas, 0.0, 0.0).unwrap();
        let (x, _, _) = canvas.texts()[0].clone();
        assert!(close(x, 0.0));
    }

    #[test]
    fn splits_after_the_lines_that_fit() {
        let mut b = TextBox::from_text("aaa bbb ccc", Rc::new(style()));
        assert_eq!(b.fit(45.0, 1.5 * LINE, &frame()).unwrap(), FitStatus::Overflow);
        let crate::boxes::SplitOutcome::Parts(mut rest) = b.split().unwrap() else {
            panic!("expected the box to split");
        };
        assert_eq!(texts(&b), vec!["aaa bbb"]);
        assert!(close(b.height(), LINE));
        assert_eq!(b.tokens().len(), 4);

        assert!(rest.base().is_split());
        assert_eq!(rest.fit(45.0, 100.0, &frame()).unwrap(), FitStatus::Success);
        assert!(close(rest.width(), 18.0));
    }

    #[test]
    fn nothing_fits_when_no_line_does() {
        let mut b = TextBox::from_text("aaa", Rc::new(style()));
        assert_eq!(b.fit(100.0, 5.0, &frame()).unwrap(), FitStatus::Failure);
        assert!(matches!(b.split().unwrap(), crate::boxes::SplitOutcome::Nothing));
    }

    #[test]
    fn fixed_height_overflow_is_clipped_or_reported() {
        let mut b = TextBox::from_text("aa\nbb", Rc::new(style())).with_size(100.0, 10.0);
        assert_eq!(b.fit(100.0, 100.0, &frame()).unwrap(), FitStatus::Overflow);
        assert!(matches!(b.split().unwrap(), crate::boxes::SplitOutcome::Whole));

        let mut canvas = RecordingCanvas::default();
        b.draw(&mut canvas, 0.0, 0.0).unwrap();
        assert_eq!(canvas.ops[0], Op::Save);
        assert_eq!(canvas.ops[1], Op::Clip(crate::rect::Rect::new(0.0, 0.0, 100.0, 10.0)));
        assert_eq!(canvas.texts().len(), 1);

        let mut s = style();
        s.overflow = OverflowPolicy::Error;
        let mut b = TextBox::from_text("aa\nbb", Rc::new(s)).with_size(100.0, 10.0);
        b.fit(100.0, 100.0, &frame()).unwrap();
        assert!(matches!(
            b.draw(&mut RecordingCanvas::default(), 0.0, 0.0),
            Err(LayoutError::Overflow(_))
        ));
    }

    #[test]
    fn valigns_text_inside_a_taller_box() {
        let mut s = style();
        s.text_valign = TextVAlign::Bottom;
        let mut b = TextBox::from_text("aa", Rc::new(s)).with_size(100.0, 50.0);
        b.fit(100.0, 100.0, &frame()).unwrap();
        let mut canvas = RecordingCanvas::default();
        b.draw(&mut canvas, 0.0, 0.0).unwrap();
        let (_, y, _) = canvas.texts()[0].clone();
        // the descender sits on the bottom edge
        assert!(close(y, 1.57));
    }

    #[test]
    fn empty_text_takes_no_room() {
        let mut fitter = BoxFitter::new(vec![frame()]);
        fitter
            .fit(Box::new(TextBox::from_text("", Rc::new(style()))))
            .unwrap();
        assert!(fitter.is_success());
        assert_eq!(fitter.fit_results()[0].result.mask, None);
        assert!(close(fitter.frames()[0].shape().area(), 100.0 * 100.0));
    }

    #[test]
    fn flows_around_floating_boxes() {
        let mut float = Style::new();
        float.position = Position::Float;
        let mut flow = style();
        flow.position = Position::Flow;

        let mut fitter = BoxFitter::new(vec![frame()]);
        fitter
            .fit(Box::new(BasicBox::new(40.0, 10.0, Rc::new(float))))
            .unwrap();
        fitter
            .fit(Box::new(TextBox::from_text(
                "aaaa bbbb cccc dddd eeee",
                Rc::new(flow),
            )))
            .unwrap();
        assert!(fitter.is_success());

        let placed = &fitter.fit_results()[1];
        assert_eq!(placed.result.x, 0.0);
        assert!(close(placed.result.y, 100.0 - 3.0 * LINE));

        let mut canvas = RecordingCanvas::default();
        placed.draw(&mut canvas).unwrap();
        let lines: Vec<(f32, String)> = canvas.texts().into_iter().map(|(x, _, t)| (x, t)).collect();
        assert_eq!(
            lines,
            vec![
                (40.0, "aaaa bbbb".to_string()),
                (40.0, "cccc dddd".to_string()),
                (0.0, "eeee".to_string()),
            ]
        );
    }
}
