use super::items::{InlineItem, TextFragment};
use crate::canvas::Canvas;
use crate::error::LayoutError;
use crate::style::ItemVAlign;

/// Differences in width smaller than this don't need justifying
const JUSTIFICATION_EPSILON: f32 = 0.001;

/// A single line of laid out text
#[derive(Debug, Clone, Default)]
pub struct Line {
    items: Vec<InlineItem>,
    /// Horizontal offset of the line from the left edge of the text box
    pub x_offset: f32,
    /// Distance from the top of the text box to the baseline of the line
    pub y_offset: f32,
    /// Lines ending a paragraph or broken by a mandatory break are not justified
    pub(crate) ignore_justification: bool,
    y_min: f32,
    y_max: f32,
    text_y_min: f32,
    text_y_max: f32,
}

impl Line {
    /// Create a line from `items`, merging neighbouring text fragments that share
    /// a style
    pub fn new(items: Vec<InlineItem>) -> Line {
        let mut merged: Vec<InlineItem> = Vec::with_capacity(items.len());
        for item in items {
            if let (Some(InlineItem::Text(last)), InlineItem::Text(f)) = (merged.last_mut(), &item) {
                if last.shares_style(f) {
                    last.append(f);
                    continue;
                }
            }
            merged.push(item);
        }
        let mut line = Line {
            items: merged,
            ..Default::default()
        };
        line.calculate_metrics();
        line
    }

    pub fn items(&self) -> &[InlineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn width(&self) -> f32 {
        self.items.iter().map(InlineItem::width).sum()
    }

    /// Lowest point of the line relative to its baseline, usually negative
    pub fn y_min(&self) -> f32 {
        self.y_min
    }

    /// Highest point of the line relative to its baseline
    pub fn y_max(&self) -> f32 {
        self.y_max
    }

    pub fn text_y_min(&self) -> f32 {
        self.text_y_min
    }

    pub fn text_y_max(&self) -> f32 {
        self.text_y_max
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// The text of the line, with inline boxes left out
    pub fn text(&self) -> String {
        self.items
            .iter()
            .filter_map(|item| match item {
                InlineItem::Text(f) => Some(f.text()),
                InlineItem::Inline(_) => None,
            })
            .collect()
    }

    /// Stretch or shrink the line to exactly `width` by adjusting the space after
    /// every space glyph. Returns whether the line was changed
    pub fn justify(&mut self, width: f32) -> bool {
        let delta = width - self.width();
        if delta.abs() < JUSTIFICATION_EPSILON {
            return false;
        }
        let spaces: usize = self
            .items
            .iter()
            .map(|item| match item {
                InlineItem::Text(f) => f.space_count(),
                InlineItem::Inline(_) => 0,
            })
            .sum();
        if spaces == 0 {
            return false;
        }

        let per_space = delta / spaces as f32;
        for item in self.items.iter_mut() {
            if let InlineItem::Text(f) = item {
                let size = f.style().font_size;
                if size > 0.0 && f.space_count() > 0 {
                    f.kern_spaces(-per_space * 1000.0 / size);
                }
            }
        }
        true
    }

    /// Vertical offset of an item's baseline from the line's baseline
    pub fn item_offset(&self, item: &InlineItem) -> f32 {
        match item.valign() {
            ItemVAlign::Text | ItemVAlign::Baseline => 0.0,
            ItemVAlign::Top => self.y_max - item.y_max(),
            ItemVAlign::Bottom => self.y_min - item.y_min(),
            ItemVAlign::TextTop => self.text_y_max - item.y_max(),
            ItemVAlign::TextBottom => self.text_y_min - item.y_min(),
        }
    }

    /// Draw the line with its baseline starting at `(x, y)`
    pub fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) -> Result<(), LayoutError> {
        let mut x = x;
        for item in self.items.iter() {
            let y = y + self.item_offset(item);
            match item {
                InlineItem::Text(f) => canvas.show_text(x, y, f),
                InlineItem::Inline(b) => b.draw(canvas, x, y)?,
            }
            x += item.width();
        }
        Ok(())
    }

    /// Items aligned to the text or the baseline are measured first; items aligned
    /// to the top or bottom depend on those bounds
    fn calculate_metrics(&mut self) {
        let (mut y_min, mut y_max) = (0.0_f32, 0.0_f32);
        let (mut text_y_min, mut text_y_max) = (0.0_f32, 0.0_f32);
        for item in self.items.iter() {
            match (item, item.valign()) {
                (InlineItem::Text(f), _) => {
                    text_y_min = text_y_min.min(f.y_min());
                    text_y_max = text_y_max.max(f.y_max());
                }
                (_, ItemVAlign::Text | ItemVAlign::Baseline) => {
                    y_min = y_min.min(item.y_min());
                    y_max = y_max.max(item.y_max());
                }
                _ => {}
            }
        }
        y_min = y_min.min(text_y_min);
        y_max = y_max.max(text_y_max);

        for item in self.items.iter() {
            match item.valign() {
                ItemVAlign::TextTop => y_min = y_min.min(text_y_max - item.height()),
                ItemVAlign::TextBottom => y_max = y_max.max(text_y_min + item.height()),
                _ => {}
            }
        }

        // top and bottom aligned items each extend the line in one direction only
        let (mut new_y_min, mut new_y_max) = (y_min, y_max);
        for item in self.items.iter() {
            match item.valign() {
                ItemVAlign::Top => new_y_min = new_y_min.min(y_max - item.height()),
                ItemVAlign::Bottom => new_y_max = new_y_max.max(y_min + item.height()),
                _ => {}
            }
        }

        self.y_min = new_y_min;
        self.y_max = new_y_max;
        self.text_y_min = text_y_min;
        self.text_y_max = text_y_max;
    }
}

impl From<TextFragment> for Line {
    fn from(fragment: TextFragment) -> Self {
        Line::new(vec![fragment.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BasicBox;
    use crate::font::FixedPitchFont;
    use crate::style::Style;
    use crate::text::items::InlineBox;
    use std::rc::Rc;

    fn style() -> Rc<Style> {
        Rc::new(Style::with_font(Rc::new(FixedPitchFont::courier()), 10.0))
    }

    fn inline(height: f32, valign: ItemVAlign) -> InlineItem {
        let mut s = Style::new();
        s.item_valign = valign;
        let b = BasicBox::new(5.0, height, Rc::new(s));
        InlineBox::from_box(Box::new(b)).unwrap().into()
    }

    #[test]
    fn merges_fragments_with_the_same_style() {
        let s = style();
        let line = Line::new(vec![
            TextFragment::create("ab", s.clone()).into(),
            TextFragment::create("cd", s).into(),
            TextFragment::create("ef", style()).into(),
        ]);
        assert_eq!(line.items().len(), 2);
        assert_eq!(line.text(), "abcdef");
        assert!((line.width() - 36.0).abs() < 1e-4);
    }

    #[test]
    fn text_sets_the_bounds() {
        let line = Line::from(TextFragment::create("x", style()));
        assert!((line.y_max() - 6.29).abs() < 1e-4);
        assert!((line.y_min() + 1.57).abs() < 1e-4);
    }

    #[test]
    fn top_and_bottom_aligned_items() {
        let s = style();
        let text: InlineItem = TextFragment::create("x", s).into();

        let line = Line::new(vec![text.clone(), inline(20.0, ItemVAlign::Top)]);
        assert!((line.y_max() - 6.29).abs() < 1e-4);
        assert!((line.y_min() - (6.29 - 20.0)).abs() < 1e-4);
        let item = &line.items()[1];
        assert!((line.item_offset(item) - (6.29 - 20.0)).abs() < 1e-4);

        let line = Line::new(vec![text.clone(), inline(20.0, ItemVAlign::Bottom)]);
        assert!((line.y_min() + 1.57).abs() < 1e-4);
        assert!((line.y_max() - (20.0 - 1.57)).abs() < 1e-4);

        let line = Line::new(vec![text, inline(20.0, ItemVAlign::Baseline)]);
        assert!((line.y_max() - 20.0).abs() < 1e-4);
        assert!((line.y_min() + 1.57).abs() < 1e-4);
    }

    #[test]
    fn justify_is_a_no_op_on_an_exact_fit() {
        let mut line = Line::from(TextFragment::create("ab cd", style()));
        let width = line.width();
        assert!(!line.justify(width));
        assert_eq!(line.width(), width);
    }

    #[test]
    fn justify_spreads_space_over_spaces() {
        let mut line = Line::from(TextFragment::create("a b c", style()));
        assert!(line.justify(40.0));
        assert!((line.width() - 40.0).abs() < 1e-3);
        assert_eq!(line.text(), "a b c");
    }

    #[test]
    fn justify_needs_spaces() {
        let mut line = Line::from(TextFragment::create("abc", style()));
        assert!(!line.justify(40.0));
    }
}
