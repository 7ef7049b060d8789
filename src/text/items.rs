use crate::boxes::LayoutBox;
use crate::canvas::Canvas;
use crate::error::LayoutError;
use crate::frame::Frame;
use crate::style::{ItemVAlign, Style};
use std::rc::Rc;

/// A single glyph of a [TextFragment]. The width is in 1/1000 of an em and does
/// not include character or word spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub width: f32,
    /// `[x_min, y_min, x_max, y_max]` in 1/1000 of an em
    pub bbox: Option<[f32; 4]>,
}

/// What a [TextFragment] is made of
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextItem {
    Glyph(Glyph),
    /// A positioning adjustment in 1/1000 of an em. Positive values move the next
    /// glyph to the left, the same as in a PDF `TJ` array
    Kern(f32),
}

/// A run of glyphs that share a style
#[derive(Debug, Clone)]
pub struct TextFragment {
    items: Vec<TextItem>,
    style: Rc<Style>,
    width: f32,
}

impl TextFragment {
    pub fn new(items: Vec<TextItem>, style: Rc<Style>) -> TextFragment {
        let mut fragment = TextFragment {
            items,
            style,
            width: 0.0,
        };
        fragment.width = fragment.calculate_width();
        fragment
    }

    /// Create a fragment for `text` using the glyphs of the style's font. Without
    /// a font all glyphs have zero width
    pub fn create(text: &str, style: Rc<Style>) -> TextFragment {
        let items = text.chars().map(|ch| TextItem::Glyph(glyph(&style, ch))).collect();
        TextFragment::new(items, style)
    }

    pub fn items(&self) -> &[TextItem] {
        &self.items
    }

    pub fn style(&self) -> &Rc<Style> {
        &self.style
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The width in points, including spacing and kerning
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn y_min(&self) -> f32 {
        self.style.descender()
    }

    pub fn y_max(&self) -> f32 {
        self.style.ascender()
    }

    pub fn height(&self) -> f32 {
        self.y_max() - self.y_min()
    }

    /// The characters of the fragment, without any kerning
    pub fn text(&self) -> String {
        self.items
            .iter()
            .filter_map(|item| match item {
                TextItem::Glyph(g) => Some(g.ch),
                TextItem::Kern(_) => None,
            })
            .collect()
    }

    pub(crate) fn space_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, TextItem::Glyph(g) if g.ch == ' '))
            .count()
    }

    /// Whether both fragments use the very same style and can be merged
    pub(crate) fn shares_style(&self, other: &TextFragment) -> bool {
        Rc::ptr_eq(&self.style, &other.style)
    }

    pub(crate) fn append(&mut self, other: &TextFragment) {
        self.items.extend_from_slice(&other.items);
        self.width += other.width;
    }

    /// Insert a kerning adjustment after every space glyph
    pub(crate) fn kern_spaces(&mut self, kern: f32) {
        let mut items = Vec::with_capacity(self.items.len() * 2);
        for item in self.items.drain(..) {
            items.push(item);
            if matches!(item, TextItem::Glyph(g) if g.ch == ' ') {
                items.push(TextItem::Kern(kern));
            }
        }
        self.items = items;
        self.width = self.calculate_width();
    }

    fn calculate_width(&self) -> f32 {
        let scale = self.style.font_size / 1000.0;
        self.items
            .iter()
            .map(|item| match item {
                TextItem::Glyph(g) => {
                    let word = if g.ch == ' ' { self.style.word_spacing } else { 0.0 };
                    g.width * scale + self.style.character_spacing + word
                }
                TextItem::Kern(k) => -k * scale,
            })
            .sum()
    }
}

pub(crate) fn glyph(style: &Style, ch: char) -> Glyph {
    match style.font.as_ref() {
        Some(font) => {
            let metrics = font.glyph(ch);
            Glyph {
                ch,
                width: metrics.width,
                bbox: metrics.bbox,
            }
        }
        None => Glyph {
            ch,
            width: 0.0,
            bbox: None,
        },
    }
}

/// A box placed inside a line of text. The box is fit when the inline box is
/// created, using its own width and height
#[derive(Debug, Clone)]
pub struct InlineBox {
    boxed: Box<dyn LayoutBox>,
    valign: ItemVAlign,
}

impl InlineBox {
    /// An inline box aligned the way the box's style asks for with `item_valign`
    pub fn from_box(boxed: Box<dyn LayoutBox>) -> Result<InlineBox, LayoutError> {
        let valign = boxed.style().item_valign;
        InlineBox::new(boxed, valign)
    }

    pub fn new(mut boxed: Box<dyn LayoutBox>, valign: ItemVAlign) -> Result<InlineBox, LayoutError> {
        let width = boxed.base().declared_width();
        let height = boxed.base().declared_height();
        let frame = Frame::new(0.0, 0.0, width, height);
        boxed.fit(width, height, &frame)?;
        Ok(InlineBox { boxed, valign })
    }

    pub fn width(&self) -> f32 {
        self.boxed.width()
    }

    pub fn height(&self) -> f32 {
        self.boxed.height()
    }

    pub fn valign(&self) -> ItemVAlign {
        self.valign
    }

    /// Draw the box with its bottom-left corner at `(x, y)`
    pub fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32) -> Result<(), LayoutError> {
        self.boxed.draw(canvas, x, y)
    }
}

/// Something that can be placed on a line
#[derive(Debug, Clone)]
pub enum InlineItem {
    Text(TextFragment),
    Inline(InlineBox),
}

impl InlineItem {
    pub fn width(&self) -> f32 {
        match self {
            InlineItem::Text(f) => f.width(),
            InlineItem::Inline(b) => b.width(),
        }
    }

    /// Lowest point of the item relative to its baseline
    pub fn y_min(&self) -> f32 {
        match self {
            InlineItem::Text(f) => f.y_min(),
            InlineItem::Inline(_) => 0.0,
        }
    }

    /// Highest point of the item relative to its baseline
    pub fn y_max(&self) -> f32 {
        match self {
            InlineItem::Text(f) => f.y_max(),
            InlineItem::Inline(b) => b.height(),
        }
    }

    pub fn height(&self) -> f32 {
        self.y_max() - self.y_min()
    }

    pub fn valign(&self) -> ItemVAlign {
        match self {
            InlineItem::Text(_) => ItemVAlign::Text,
            InlineItem::Inline(b) => b.valign(),
        }
    }
}

impl From<TextFragment> for InlineItem {
    fn from(f: TextFragment) -> Self {
        InlineItem::Text(f)
    }
}

impl From<InlineBox> for InlineItem {
    fn from(b: InlineBox) -> Self {
        InlineItem::Inline(b)
    }
}

/// A breaking opportunity with a cost, see [Item::Penalty]
#[derive(Debug, Clone)]
pub struct Penalty {
    pub penalty: f32,
    /// Width of `item`, which only shows up if the line is broken here
    pub width: f32,
    pub item: Option<InlineItem>,
}

impl Penalty {
    /// Any penalty at least this high forbids a break
    pub const INFINITY: f32 = 1000.0;
    pub const PARAGRAPH_BREAK: f32 = -Penalty::INFINITY - 1_000_000.0;
    pub const LINE_BREAK: f32 = -Penalty::INFINITY - 1_000_001.0;
    /// The cost of breaking at a hyphen
    pub const STANDARD: f32 = 50.0;

    pub fn new(penalty: f32, item: Option<InlineItem>) -> Penalty {
        let width = item.as_ref().map(InlineItem::width).unwrap_or(0.0);
        Penalty { penalty, width, item }
    }

    pub fn is_mandatory(&self) -> bool {
        self.penalty <= -Penalty::INFINITY
    }

    pub fn is_prohibited(&self) -> bool {
        self.penalty >= Penalty::INFINITY
    }
}

/// The tokens text is broken into lines from
#[derive(Debug, Clone)]
pub enum Item {
    /// Content that can't be broken
    Box(InlineItem),
    /// Breakable white space. It stretches and shrinks when lines are justified
    /// and disappears at the end of a line
    Glue(TextFragment),
    /// A place where a line may, must, or must not be broken
    Penalty(Penalty),
}

impl Item {
    pub fn width(&self) -> f32 {
        match self {
            Item::Box(item) => item.width(),
            Item::Glue(f) => f.width(),
            Item::Penalty(p) => p.width,
        }
    }

    /// The height the item adds to a line it is placed on
    pub fn height(&self) -> f32 {
        match self {
            Item::Box(item) => item.height(),
            Item::Glue(f) => f.height(),
            Item::Penalty(p) => p.item.as_ref().map(InlineItem::height).unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FixedPitchFont;

    fn style() -> Rc<Style> {
        Rc::new(Style::with_font(Rc::new(FixedPitchFont::courier()), 10.0))
    }

    #[test]
    fn fragment_width_includes_spacing() {
        let mut s = Style::with_font(Rc::new(FixedPitchFont::courier()), 10.0);
        s.character_spacing = 1.0;
        s.word_spacing = 2.0;
        let f = TextFragment::create("a b", Rc::new(s));
        assert!((f.width() - (18.0 + 3.0 + 2.0)).abs() < 1e-4);
    }

    #[test]
    fn kerning_spaces_changes_width() {
        let mut f = TextFragment::create("a b c", style());
        assert_eq!(f.space_count(), 2);
        f.kern_spaces(-100.0);
        assert!((f.width() - (30.0 + 2.0)).abs() < 1e-4);
        assert_eq!(f.text(), "a b c");
    }

    #[test]
    fn inline_boxes_take_their_alignment_from_the_style() {
        let mut s = Style::new();
        s.apply("item_valign", "text_top").unwrap();
        let b = crate::boxes::BasicBox::new(5.0, 8.0, Rc::new(s));
        let inline = InlineBox::from_box(Box::new(b)).unwrap();
        assert_eq!(inline.valign(), ItemVAlign::TextTop);
        assert_eq!((inline.width(), inline.height()), (5.0, 8.0));
    }

    #[test]
    fn fragment_bounds_follow_font() {
        let f = TextFragment::create("x", style());
        assert!((f.y_max() - 6.29).abs() < 1e-4);
        assert!((f.y_min() + 1.57).abs() < 1e-4);
    }

    #[test]
    fn penalty_classes() {
        assert!(Penalty::new(Penalty::PARAGRAPH_BREAK, None).is_mandatory());
        assert!(Penalty::new(Penalty::LINE_BREAK, None).is_mandatory());
        assert!(Penalty::new(Penalty::INFINITY, None).is_prohibited());
        let hyphen = Penalty::new(Penalty::STANDARD, Some(TextFragment::create("-", style()).into()));
        assert!(!hyphen.is_mandatory() && !hyphen.is_prohibited());
        assert!((hyphen.width - 6.0).abs() < 1e-4);
    }
}
