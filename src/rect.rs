/// An axis-aligned rectangle, specified by two opposite corners.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rect {
    /// The x-coordinate of the lower-left corner.
    pub x1: f32,
    /// The y-coordinate of the lower-left corner.
    pub y1: f32,
    /// The x-coordinate of the upper-right corner.
    pub x2: f32,
    /// The y-coordinate of the upper-right corner.
    pub y2: f32,
}

impl Rect {
    /// Create a rectangle from two corners, normalizing them so that
    /// `(x1, y1)` is the lower-left corner
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Rect {
        Rect {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Create a rectangle from its lower-left corner and its dimensions
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// A rectangle without area (a line or a point) is empty
    pub fn is_empty(&self) -> bool {
        self.width() <= f32::EPSILON || self.height() <= f32::EPSILON
    }

    /// The overlapping part of both rectangles, if they overlap at all
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let r = Rect {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        };
        (r.x1 < r.x2 && r.y1 < r.y2).then_some(r)
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1,
            y1: r.y1,
            x2: r.x2,
            y2: r.y2,
        }
    }
}

impl From<pdf_writer::Rect> for Rect {
    fn from(r: pdf_writer::Rect) -> Self {
        Rect::new(r.x1, r.y1, r.x2, r.y2)
    }
}
