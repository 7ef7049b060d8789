//! Styling properties shared by boxes and text.
//!
//! A [Style] is shared between the boxes and text fragments that use it through an
//! `Rc`, so boxes that are split keep pointing at the same style as the original.

use crate::canvas::Canvas;
use crate::colour::Colour;
use crate::error::LayoutError;
use crate::font::FontMetrics;
use crate::rect::Rect;
use crate::units::Pt;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Four lengths, one for each side of a box. Used for padding, margins and
/// border widths
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Quad {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Quad {
    /// Create a quad by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl<T: Into<Pt>, R: Into<Pt>, B: Into<Pt>, L: Into<Pt>>(
        top: T,
        right: R,
        bottom: B,
        left: L,
    ) -> Quad {
        Quad {
            top: points(top),
            right: points(right),
            bottom: points(bottom),
            left: points(left),
        }
    }

    /// Create a quad where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Quad {
        let value: Pt = value.into();
        Quad::trbl(value, value, value, value)
    }

    /// Create a quad by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) sides
    pub fn symmetric<V: Into<Pt>, H: Into<Pt>>(vertical: V, horizontal: H) -> Quad {
        let vertical: Pt = vertical.into();
        let horizontal: Pt = horizontal.into();
        Quad::trbl(vertical, horizontal, vertical, horizontal)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }
}

fn points<T: Into<Pt>>(value: T) -> f32 {
    let value: Pt = value.into();
    value.0
}

/// Parses one to four lengths, expanded the way CSS expands them
impl FromStr for Quad {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(|v| v.parse::<f32>())
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|_| invalid("quad", s))?;
        match values.as_slice() {
            [a] => Ok(Quad::all(*a)),
            [v, h] => Ok(Quad::symmetric(*v, *h)),
            [t, h, b] => Ok(Quad::trbl(*t, *h, *b, *h)),
            [t, r, b, l] => Ok(Quad::trbl(*t, *r, *b, *l)),
            _ => Err(invalid("quad", s)),
        }
    }
}

/// A border drawn just inside the edges of a box
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: Quad,
    pub colour: Colour,
}

impl Border {
    pub fn new(width: Quad, colour: Colour) -> Border {
        Border { width, colour }
    }

    pub fn is_none(&self) -> bool {
        self.width.is_zero()
    }

    /// Draw the border inside `rect`, each side as a filled rectangle
    pub fn draw(&self, canvas: &mut dyn Canvas, rect: Rect) {
        if self.is_none() || rect.is_empty() {
            return;
        }
        let w = &self.width;
        let sides = [
            Rect::new(rect.x1, rect.y2 - w.top, rect.x2, rect.y2),
            Rect::new(rect.x2 - w.right, rect.y1, rect.x2, rect.y2),
            Rect::new(rect.x1, rect.y1, rect.x2, rect.y1 + w.bottom),
            Rect::new(rect.x1, rect.y1, rect.x1 + w.left, rect.y2),
        ];
        for side in sides.into_iter().filter(|side| !side.is_empty()) {
            canvas.fill_rect(side, self.colour);
        }
    }
}

fn invalid(property: &'static str, value: &str) -> LayoutError {
    LayoutError::InvalidStyle {
        property,
        value: value.to_string(),
    }
}

/// Declares a fieldless style enum together with its [FromStr] impl
macro_rules! style_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $property:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl FromStr for $name {
            type Err = LayoutError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(invalid($property, s)),
                }
            }
        }
    };
}

style_enum!(
    /// Horizontal alignment of a box inside the region it is fit into
    Align, "align" {
        #[default]
        Left => "left",
        Center => "center",
        Right => "right",
    }
);

style_enum!(
    /// Vertical alignment of a box inside the region it is fit into
    VAlign, "valign" {
        #[default]
        Top => "top",
        Center => "center",
        Bottom => "bottom",
    }
);

style_enum!(
    /// Horizontal alignment of lines of text
    TextAlign, "text_align" {
        #[default]
        Left => "left",
        Center => "center",
        Right => "right",
        Justify => "justify",
    }
);

style_enum!(
    /// Vertical alignment of the lines inside a text box with a fixed height
    TextVAlign, "text_valign" {
        #[default]
        Top => "top",
        Center => "center",
        Bottom => "bottom",
    }
);

style_enum!(
    /// Where an inline item sits vertically on its line
    ItemVAlign, "item_valign" {
        /// Like text: the item's own baseline sits on the line's baseline
        #[default]
        Text => "text",
        /// The bottom of the item sits on the line's baseline
        Baseline => "baseline",
        /// Aligned to the top of the whole line
        Top => "top",
        /// Aligned to the bottom of the whole line
        Bottom => "bottom",
        /// Aligned to the top of the text on the line
        TextTop => "text_top",
        /// Aligned to the bottom of the text on the line
        TextBottom => "text_bottom",
    }
);

style_enum!(
    /// Which part of a frame's region a placed box removes
    MaskMode, "mask_mode" {
        /// Chosen from the box's [Position]
        #[default]
        Default => "default",
        None => "none",
        Box => "box",
        FillHorizontal => "fill_horizontal",
        FillFrameHorizontal => "fill_frame_horizontal",
        FillVertical => "fill_vertical",
        Fill => "fill",
    }
);

style_enum!(
    /// What happens when a box with a fixed height can't fit its content
    OverflowPolicy, "overflow" {
        /// Draw whatever fits, clipped to the box
        #[default]
        Clip => "clip",
        /// Fail with [LayoutError::Overflow] when drawing
        Error => "error",
    }
);

/// How a box is positioned inside a frame
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Position {
    /// Placed according to [Align] and [VAlign]; removes the full horizontal strip
    #[default]
    Default,
    /// Placed according to [Align] and [VAlign]; removes only the box itself so that
    /// other content can flow around it
    Float,
    /// Flows into the frame's shape, which lets text wrap around already placed floats
    Flow,
    /// At a fixed offset from the bottom-left corner of the frame
    Absolute { x: f32, y: f32 },
}

impl FromStr for Position {
    type Err = LayoutError;

    /// Parses `default`, `float`, `flow`, or `absolute <x> <y>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let position = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            Some("default") => Position::Default,
            Some("float") => Position::Float,
            Some("flow") => Position::Flow,
            Some("absolute") => {
                let mut coord = || parts.next().and_then(|v| v.parse::<f32>().ok());
                match (coord(), coord()) {
                    (Some(x), Some(y)) => Position::Absolute { x, y },
                    _ => return Err(invalid("position", s)),
                }
            }
            _ => return Err(invalid("position", s)),
        };
        match parts.next() {
            None => Ok(position),
            Some(_) => Err(invalid("position", s)),
        }
    }
}

/// The vertical distance between consecutive lines of text
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum LineSpacing {
    /// Same as `Proportional(1.0)`
    #[default]
    Single,
    /// A multiple of the natural distance between two lines
    Proportional(f32),
    /// A fixed distance between the baselines
    Fixed(f32),
    /// The natural distance plus a fixed amount
    Leading(f32),
}

impl LineSpacing {
    /// The distance between the baseline of a line whose lowest point is `prev_y_min`
    /// below its baseline and the baseline of the following line which reaches
    /// `next_y_max` above its baseline
    pub fn baseline_distance(&self, prev_y_min: f32, next_y_max: f32) -> f32 {
        let natural = prev_y_min.abs() + next_y_max;
        match *self {
            LineSpacing::Single => natural,
            LineSpacing::Proportional(factor) => natural * factor,
            LineSpacing::Fixed(distance) => distance,
            LineSpacing::Leading(extra) => natural + extra,
        }
    }

    /// The blank space between two lines
    pub fn gap(&self, prev_y_min: f32, next_y_max: f32) -> f32 {
        self.baseline_distance(prev_y_min, next_y_max) - prev_y_min.abs() - next_y_max
    }
}

impl FromStr for LineSpacing {
    type Err = LayoutError;

    /// Parses `single`, `proportional <f>`, `fixed <pt>`, or `leading <pt>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let value = |v: &str| v.parse::<f32>().map_err(|_| invalid("line_spacing", s));
        match parts.as_slice() {
            ["single"] => Ok(LineSpacing::Single),
            ["proportional", v] => Ok(LineSpacing::Proportional(value(v)?)),
            ["fixed", v] => Ok(LineSpacing::Fixed(value(v)?)),
            ["leading", v] => Ok(LineSpacing::Leading(value(v)?)),
            _ => Err(invalid("line_spacing", s)),
        }
    }
}

/// A drawing callback that receives the rectangle of the box it belongs to
pub type LayerFn = Rc<dyn Fn(&mut dyn Canvas, Rect)>;

/// Extra drawing done below (underlays) or above (overlays) a box's content
#[derive(Clone, Default)]
pub struct Layers(Vec<LayerFn>);

impl Layers {
    pub fn add<F: Fn(&mut dyn Canvas, Rect) + 'static>(&mut self, layer: F) {
        self.0.push(Rc::new(layer));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, rect: Rect) {
        for layer in self.0.iter() {
            canvas.save_state();
            layer(canvas, rect);
            canvas.restore_state();
        }
    }
}

impl fmt::Debug for Layers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layers({})", self.0.len())
    }
}

/// The complete set of styling properties of a box or a piece of text
#[derive(Debug, Clone)]
pub struct Style {
    pub padding: Quad,
    pub margin: Quad,
    pub border: Border,
    pub align: Align,
    pub valign: VAlign,
    pub text_align: TextAlign,
    pub text_valign: TextVAlign,
    /// How the box sits in a line when placed with [InlineBox::from_box](crate::text::InlineBox::from_box)
    pub item_valign: ItemVAlign,
    pub position: Position,
    pub mask_mode: MaskMode,
    pub overflow: OverflowPolicy,
    pub background_colour: Option<Colour>,
    pub underlays: Layers,
    pub overlays: Layers,
    /// Name of the optional content group the box is drawn into
    pub optional_content: Option<String>,

    pub font: Option<Rc<dyn FontMetrics>>,
    pub font_size: f32,
    /// Extra space after every glyph, in points
    pub character_spacing: f32,
    /// Extra space after every space glyph, in points
    pub word_spacing: f32,
    pub fill_colour: Colour,
    pub line_spacing: LineSpacing,
    /// Whether the gap after the last line of a text box is part of its height
    pub last_line_gap: bool,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            padding: Quad::default(),
            margin: Quad::default(),
            border: Border::default(),
            align: Align::default(),
            valign: VAlign::default(),
            text_align: TextAlign::default(),
            text_valign: TextVAlign::default(),
            item_valign: ItemVAlign::default(),
            position: Position::default(),
            mask_mode: MaskMode::default(),
            overflow: OverflowPolicy::default(),
            background_colour: None,
            underlays: Layers::default(),
            overlays: Layers::default(),
            optional_content: None,
            font: None,
            font_size: 10.0,
            character_spacing: 0.0,
            word_spacing: 0.0,
            fill_colour: Colour::default(),
            line_spacing: LineSpacing::default(),
            last_line_gap: false,
        }
    }
}

impl Style {
    pub fn new() -> Style {
        Style::default()
    }

    /// A default style that sets text in `font` at `size` points
    pub fn with_font(font: Rc<dyn FontMetrics>, size: f32) -> Style {
        Style {
            font: Some(font),
            font_size: size,
            ..Default::default()
        }
    }

    /// Set a property by name from its textual value, e.g. `("align", "center")`
    /// or `("padding", "5 10")`
    pub fn apply(&mut self, property: &str, value: &str) -> Result<(), LayoutError> {
        let number = |property: &'static str| {
            value
                .trim()
                .parse::<f32>()
                .map_err(|_| invalid(property, value))
        };
        match property {
            "padding" => self.padding = value.parse()?,
            "margin" => self.margin = value.parse()?,
            "border_width" => self.border.width = value.parse()?,
            "border_colour" | "border_color" => self.border.colour = value.parse()?,
            "align" => self.align = value.parse()?,
            "valign" => self.valign = value.parse()?,
            "text_align" => self.text_align = value.parse()?,
            "text_valign" => self.text_valign = value.parse()?,
            "item_valign" => self.item_valign = value.parse()?,
            "position" => self.position = value.parse()?,
            "mask_mode" => self.mask_mode = value.parse()?,
            "overflow" => self.overflow = value.parse()?,
            "background_colour" | "background_color" => {
                self.background_colour = match value.trim() {
                    "none" => None,
                    colour => Some(colour.parse()?),
                }
            }
            "fill_colour" | "fill_color" => self.fill_colour = value.parse()?,
            "optional_content" => self.optional_content = Some(value.to_string()),
            "font_size" => self.font_size = number("font_size")?,
            "character_spacing" => self.character_spacing = number("character_spacing")?,
            "word_spacing" => self.word_spacing = number("word_spacing")?,
            "line_spacing" => self.line_spacing = value.parse()?,
            "last_line_gap" => {
                self.last_line_gap = value
                    .trim()
                    .parse::<bool>()
                    .map_err(|_| invalid("last_line_gap", value))?
            }
            _ => return Err(LayoutError::UnknownStyleProperty(property.to_string())),
        }
        Ok(())
    }

    /// The mask mode to use when placing a box, with [MaskMode::Default] resolved
    /// according to the box's position
    pub fn resolved_mask_mode(&self) -> MaskMode {
        match (self.mask_mode, self.position) {
            (MaskMode::Default, Position::Absolute { .. } | Position::Float) => MaskMode::Box,
            (MaskMode::Default, Position::Flow) => MaskMode::FillFrameHorizontal,
            (MaskMode::Default, Position::Default) => MaskMode::FillHorizontal,
            (mode, _) => mode,
        }
    }

    /// Distance from the baseline to the top of the font at the style's size
    pub fn ascender(&self) -> f32 {
        self.font
            .as_ref()
            .map(|font| font.ascender() * self.font_size / 1000.0)
            .unwrap_or(0.0)
    }

    /// Distance from the baseline to the bottom of the font at the style's size.
    /// Note: this is usually negative
    pub fn descender(&self) -> f32 {
        self.font
            .as_ref()
            .map(|font| font.descender() * self.font_size / 1000.0)
            .unwrap_or(0.0)
    }
}
