use super::{BoxBase, FitStatus, LayoutBox};
use crate::canvas::Canvas;
use crate::error::LayoutError;
use crate::fitter::{BoxFitter, Placement};
use crate::frame::Frame;
use crate::style::Style;
use crate::text::TextFragment;
use std::fmt;
use std::rc::Rc;

/// What goes in front of each item of a [ListBox]
#[derive(Clone, Default)]
pub enum ListMarker {
    #[default]
    Disc,
    Circle,
    Square,
    /// `1.`, `2.`, ...
    Decimal,
    /// Builds the marker from the item number
    Custom(Rc<dyn Fn(usize) -> String>),
}

impl ListMarker {
    pub fn text(&self, number: usize) -> String {
        match self {
            ListMarker::Disc => "\u{2022}".to_string(),
            ListMarker::Circle => "\u{25e6}".to_string(),
            ListMarker::Square => "\u{25aa}".to_string(),
            ListMarker::Decimal => format!("{number}."),
            ListMarker::Custom(f) => f(number),
        }
    }
}

impl fmt::Debug for ListMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListMarker::Disc => write!(f, "Disc"),
            ListMarker::Circle => write!(f, "Circle"),
            ListMarker::Square => write!(f, "Square"),
            ListMarker::Decimal => write!(f, "Decimal"),
            ListMarker::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// A list of items, each a box, indented behind a marker set in the list's style.
///
/// Items are split across regions like any other box; the part of an item that is
/// continued elsewhere gets no second marker.
#[derive(Debug, Clone)]
pub struct ListBox {
    base: BoxBase,
    items: Vec<Box<dyn LayoutBox>>,
    marker: ListMarker,
    indent: f32,
    start_number: usize,
    continues_item: bool,
    placements: Vec<Placement>,
    /// Item number and the placement its marker goes next to
    markers: Vec<(usize, usize)>,
    remaining: Vec<Box<dyn LayoutBox>>,
    next_number: usize,
    continued: bool,
    frame_height: f32,
}

impl ListBox {
    pub fn new(items: Vec<Box<dyn LayoutBox>>, style: Rc<Style>) -> ListBox {
        ListBox {
            base: BoxBase::new(0.0, 0.0, style),
            items,
            marker: ListMarker::default(),
            indent: 18.0,
            start_number: 1,
            continues_item: false,
            placements: Vec::new(),
            markers: Vec::new(),
            remaining: Vec::new(),
            next_number: 1,
            continued: false,
            frame_height: 0.0,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> ListBox {
        self.base = BoxBase::new(width, height, self.base.style().clone());
        self
    }

    pub fn with_marker(mut self, marker: ListMarker) -> ListBox {
        self.marker = marker;
        self
    }

    /// Space between the left edge of the list and its items
    pub fn with_indent(mut self, indent: f32) -> ListBox {
        self.indent = indent.max(0.0);
        self
    }

    pub fn with_start_number(mut self, start_number: usize) -> ListBox {
        self.start_number = start_number;
        self
    }

    pub fn start_number(&self) -> usize {
        self.start_number
    }

    /// Whether the first item is the rest of an item that was started elsewhere
    pub fn continues_item(&self) -> bool {
        self.continues_item
    }

    fn draw_marker(&self, canvas: &mut dyn Canvas, number: usize, x: f32, top: f32) {
        let style = self.base.style();
        if style.font.is_none() {
            return;
        }
        let marker = TextFragment::create(&self.marker.text(number), style.clone());
        canvas.show_text(x, top - style.ascender(), &marker);
    }
}

impl LayoutBox for ListBox {
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
        let indent = self.indent.min(width);
        let mut fitter = BoxFitter::new(vec![Frame::new(indent, 0.0, width - indent, height)]);

        self.markers.clear();
        self.next_number = self.start_number;
        self.continued = false;
        let mut done = true;
        for (i, item) in self.items.iter().enumerate() {
            let before = fitter.fit_results().len();
            fitter.fit(item.clone())?;
            let placed = fitter.fit_results().len() > before;
            if placed && !(i == 0 && self.continues_item) {
                self.markers.push((self.start_number + i, before));
            }
            if done && !fitter.is_success() {
                done = false;
                self.next_number = self.start_number + i;
                self.continued = placed;
            }
        }

        let status = if fitter.is_success() {
            FitStatus::Success
        } else if fitter.fit_results().is_empty() {
            FitStatus::Failure
        } else {
            FitStatus::Overflow
        };
        let used = fitter.content_heights().first().copied().unwrap_or(0.0);
        self.base.set_content_height(used);
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
        let mut rest = ListBox::new(std::mem::take(&mut self.remaining), self.base.style().clone())
            .with_marker(self.marker.clone())
            .with_indent(self.indent)
            .with_start_number(self.next_number);
        rest.base = self.base.continuation();
        rest.continues_item = self.continued;
        self.items = self.placements.iter().map(|p| p.boxed.clone()).collect();
        Some(Box::new(rest))
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, x: f32, y: f32) -> Result<(), LayoutError> {
        let dy = y - (self.frame_height - self.base.content_height());
        for placement in self.placements.iter() {
            placement
                .boxed
                .draw(canvas, x + placement.result.x, dy + placement.result.y)?;
        }
        for &(number, index) in self.markers.iter() {
            if let Some(placement) = self.placements.get(index) {
                let top = dy + placement.result.y + placement.boxed.height();
                self.draw_marker(canvas, number, x, top);
            }
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.base.is_empty() && self.items.iter().all(|item| item.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::{SplitOutcome, TextBox};
    use crate::font::FixedPitchFont;

    const LINE: f32 = 7.86;

    fn style() -> Rc<Style> {
        Rc::new(Style::with_font(Rc::new(FixedPitchFont::courier()), 10.0))
    }

    fn items(texts: &[&str]) -> Vec<Box<dyn LayoutBox>> {
        texts
            .iter()
            .map(|text| Box::new(TextBox::from_text(text, style())) as Box<dyn LayoutBox>)
            .collect()
    }

    fn frame() -> Frame {
        Frame::new(0.0, 0.0, 100.0, 100.0)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn markers() {
        assert_eq!(ListMarker::Decimal.text(3), "3.");
        assert_eq!(ListMarker::Disc.text(3), "\u{2022}");
        let custom = ListMarker::Custom(Rc::new(|n| format!("({n})")));
        assert_eq!(custom.text(2), "(2)");
    }

    #[test]
    fn indents_items_behind_markers() {
        let mut list = ListBox::new(items(&["one", "two"]), style())
            .with_marker(ListMarker::Decimal)
            .with_indent(20.0);
        assert_eq!(list.fit(100.0, 100.0, &frame()).unwrap(), FitStatus::Success);
        assert!(close(list.height(), 2.0 * LINE));

        let mut canvas = crate::canvas::recording::RecordingCanvas::default();
        list.draw(&mut canvas, 0.0, 0.0).unwrap();
        let texts = canvas.texts();
        let items: Vec<(f32, String)> = texts.iter().map(|(x, _, t)| (*x, t.clone())).collect();
        assert_eq!(
            items,
            vec![
                (20.0, "one".to_string()),
                (20.0, "two".to_string()),
                (0.0, "1.".to_string()),
                (0.0, "2.".to_string()),
            ]
        );
        // markers share the baseline of their item
        assert!(close(texts[0].1, texts[2].1));
    }

    #[test]
    fn continues_numbering_after_a_split() {
        let mut list = ListBox::new(items(&["one", "two two", "three"]), style())
            .with_marker(ListMarker::Decimal)
            .with_indent(20.0);
        // the second item wraps onto two lines and only its first line fits
        let available = 2.5 * LINE;
        assert_eq!(list.fit(60.0, available, &frame()).unwrap(), FitStatus::Overflow);
        let SplitOutcome::Parts(rest) = list.split().unwrap() else {
            panic!("expected the list to split");
        };
        assert_eq!(list.markers, vec![(1, 0), (2, 1)]);

        assert!(rest.base().is_split());
    }

    #[test]
    fn split_list_does_not_repeat_the_marker() {
        let mut list = ListBox::new(items(&["one", "two two", "three"]), style())
            .with_marker(ListMarker::Decimal)
            .with_indent(20.0);
        list.fit(60.0, 2.5 * LINE, &frame()).unwrap();
        let (next, continued) = (list.next_number, list.continued);
        assert_eq!((next, continued), (2, true));

        let mut rest = ListBox::new(items(&["two", "three"]), style())
            .with_marker(ListMarker::Decimal)
            .with_start_number(next);
        rest.continues_item = continued;
        rest.fit(60.0, 100.0, &frame()).unwrap();
        assert_eq!(rest.markers, vec![(3, 1)]);
    }
}
