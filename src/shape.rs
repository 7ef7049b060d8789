//! Rectilinear polygon sets.
//!
//! A [Shape] stores an area made up of axis aligned edges as a stack of horizontal
//! bands, ordered from top to bottom. Every band covers a vertical range and holds
//! the sorted, disjoint horizontal spans that are part of the shape within that
//! range. Boolean operations split both operands at every band boundary either of
//! them has and combine the spans band by band, which keeps them simple and exact
//! for the rectangles and staircase outlines that page layout produces.

use crate::error::LayoutError;
use crate::rect::Rect;

/// Coordinates closer together than this are considered equal
pub(crate) const EPSILON: f32 = 1e-3;

/// A horizontal run `[start, end]` inside a [Band]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f32,
    pub end: f32,
}

impl Span {
    pub fn new(start: f32, end: f32) -> Span {
        Span { start, end }
    }

    pub fn width(&self) -> f32 {
        self.end - self.start
    }

    fn contains(&self, x: f32) -> bool {
        self.start < x && x < self.end
    }
}

/// A horizontal slice of a [Shape], covering `bottom..top`
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub top: f32,
    pub bottom: f32,
    pub spans: Vec<Span>,
}

impl Band {
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// The span that contains all of `start..end`, if any
    pub fn span_containing(&self, start: f32, end: f32) -> Option<&Span> {
        self.spans
            .iter()
            .find(|s| s.start <= start + EPSILON && s.end >= end - EPSILON)
    }
}

/// An area bounded by horizontal and vertical edges, possibly made of several
/// disjoint parts and possibly with holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    bands: Vec<Band>,
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Shape::from_rect(rect)
    }
}

impl Shape {
    /// A shape without any area
    pub fn empty() -> Shape {
        Shape::default()
    }

    pub fn from_rect(rect: Rect) -> Shape {
        if rect.is_empty() {
            return Shape::empty();
        }
        Shape {
            bands: vec![Band {
                top: rect.y2,
                bottom: rect.y1,
                spans: vec![Span::new(rect.x1, rect.x2)],
            }],
        }
    }

    /// The union of all the given rectangles
    pub fn from_rects<I: IntoIterator<Item = Rect>>(rects: I) -> Shape {
        rects
            .into_iter()
            .fold(Shape::empty(), |shape, rect| shape.union(&Shape::from_rect(rect)))
    }

    /// Build a shape from a closed polygon given by its vertices. All edges must be
    /// horizontal or vertical.
    pub fn from_polygon(points: &[(f32, f32)]) -> Result<Shape, LayoutError> {
        Shape::from_polygons(&[points])
    }

    /// Build a shape from several closed polygons using the even-odd rule, so a
    /// polygon nested inside another one punches a hole into it.
    pub fn from_polygons<P: AsRef<[(f32, f32)]>>(polygons: &[P]) -> Result<Shape, LayoutError> {
        // vertical edges as (x, y_low, y_high)
        let mut edges: Vec<(f32, f32, f32)> = Vec::new();
        let mut ys: Vec<f32> = Vec::new();

        for polygon in polygons {
            let points = polygon.as_ref();
            for (i, &(x1, y1)) in points.iter().enumerate() {
                let (x2, y2) = points[(i + 1) % points.len()];
                ys.push(y1);
                let horizontal = (y1 - y2).abs() < EPSILON;
                let vertical = (x1 - x2).abs() < EPSILON;
                if !horizontal && !vertical {
                    return Err(LayoutError::NonRectilinear(x1, y1, x2, y2));
                }
                if vertical && !horizontal {
                    edges.push((x1, y1.min(y2), y1.max(y2)));
                }
            }
        }

        let ys = sorted_breakpoints(ys, true);
        let mut bands = Vec::with_capacity(ys.len());
        for pair in ys.windows(2) {
            let (top, bottom) = (pair[0], pair[1]);
            let mid = (top + bottom) / 2.0;
            let mut crossings: Vec<f32> = edges
                .iter()
                .filter(|(_, low, high)| *low < mid && mid < *high)
                .map(|(x, _, _)| *x)
                .collect();
            crossings.sort_by(f32::total_cmp);
            let spans = crossings
                .chunks_exact(2)
                .map(|pair| Span::new(pair[0], pair[1]))
                .collect();
            bands.push(Band {
                top,
                bottom,
                spans: merge_spans(spans),
            });
        }

        Ok(Shape::normalized(bands))
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn area(&self) -> f32 {
        self.bands
            .iter()
            .map(|band| band.height() * band.spans.iter().map(Span::width).sum::<f32>())
            .sum()
    }

    /// The smallest rectangle enclosing the whole shape
    pub fn bbox(&self) -> Option<Rect> {
        let top = self.bands.first()?.top;
        let bottom = self.bands.last()?.bottom;
        let spans = self.bands.iter().flat_map(|b| b.spans.iter());
        let x1 = spans.clone().map(|s| s.start).fold(f32::INFINITY, f32::min);
        let x2 = spans.map(|s| s.end).fold(f32::NEG_INFINITY, f32::max);
        Some(Rect::new(x1, bottom, x2, top))
    }

    /// The top-most vertex of the shape; if several share that height, the left-most
    pub fn top_left(&self) -> Option<(f32, f32)> {
        let band = self.bands.first()?;
        band.spans.first().map(|span| (span.start, band.top))
    }

    /// The shape without the area between its top-most and second top-most y
    /// coordinate
    pub fn without_top_band(&self) -> Shape {
        Shape {
            bands: self.bands.iter().skip(1).cloned().collect(),
        }
    }

    pub fn union(&self, other: &Shape) -> Shape {
        self.combine(other, |a, b| a || b)
    }

    pub fn intersection(&self, other: &Shape) -> Shape {
        self.combine(other, |a, b| a && b)
    }

    pub fn difference(&self, other: &Shape) -> Shape {
        self.combine(other, |a, b| a && !b)
    }

    /// The horizontal spans that are inside the shape over the whole vertical range
    /// `bottom..top`. A range of (nearly) zero height asks for the spans just below `top`.
    pub fn spans_between(&self, bottom: f32, top: f32) -> Vec<Span> {
        if top - bottom <= EPSILON {
            return self.spans_at(top - EPSILON / 2.0).to_vec();
        }

        let mut result: Option<Vec<Span>> = None;
        let mut covered_to = top;
        for band in &self.bands {
            if band.bottom >= top - EPSILON {
                continue;
            }
            if band.top <= bottom + EPSILON {
                break;
            }
            if band.top < covered_to - EPSILON {
                // a gap in the shape runs through the range
                return Vec::new();
            }
            result = Some(match result {
                None => band.spans.clone(),
                Some(spans) => combine_spans(&spans, &band.spans, |a, b| a && b),
            });
            covered_to = band.bottom;
        }

        if covered_to > bottom + EPSILON {
            return Vec::new();
        }
        result.unwrap_or_default()
    }

    fn spans_at(&self, y: f32) -> &[Span] {
        self.bands
            .iter()
            .find(|band| band.bottom < y && y < band.top)
            .map(|band| band.spans.as_slice())
            .unwrap_or(&[])
    }

    fn combine(&self, other: &Shape, op: fn(bool, bool) -> bool) -> Shape {
        let ys = sorted_breakpoints(
            self.bands
                .iter()
                .chain(other.bands.iter())
                .flat_map(|band| [band.top, band.bottom])
                .collect(),
            true,
        );

        let bands = ys
            .windows(2)
            .map(|pair| {
                let (top, bottom) = (pair[0], pair[1]);
                let mid = (top + bottom) / 2.0;
                Band {
                    top,
                    bottom,
                    spans: combine_spans(self.spans_at(mid), other.spans_at(mid), op),
                }
            })
            .collect();

        Shape::normalized(bands)
    }

    /// Drops empty bands and merges vertically adjacent bands with identical spans
    fn normalized(bands: Vec<Band>) -> Shape {
        let mut result: Vec<Band> = Vec::with_capacity(bands.len());
        for band in bands {
            if band.height() <= EPSILON || band.spans.is_empty() {
                continue;
            }
            match result.last_mut() {
                Some(last)
                    if (last.bottom - band.top).abs() <= EPSILON
                        && spans_equal(&last.spans, &band.spans) =>
                {
                    last.bottom = band.bottom;
                }
                _ => result.push(band),
            }
        }
        Shape { bands: result }
    }
}

/// Sorts coordinates (descending if `descending`) and removes near-duplicates
fn sorted_breakpoints(mut values: Vec<f32>, descending: bool) -> Vec<f32> {
    values.sort_by(|a, b| {
        if descending {
            b.total_cmp(a)
        } else {
            a.total_cmp(b)
        }
    });
    values.dedup_by(|a, b| (*a - *b).abs() <= EPSILON);
    values
}

fn combine_spans(a: &[Span], b: &[Span], op: fn(bool, bool) -> bool) -> Vec<Span> {
    let xs = sorted_breakpoints(
        a.iter()
            .chain(b.iter())
            .flat_map(|span| [span.start, span.end])
            .collect(),
        false,
    );

    let mut spans: Vec<Span> = Vec::new();
    for pair in xs.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let mid = (start + end) / 2.0;
        let in_a = a.iter().any(|s| s.contains(mid));
        let in_b = b.iter().any(|s| s.contains(mid));
        if !op(in_a, in_b) {
            continue;
        }
        match spans.last_mut() {
            Some(last) if (last.end - start).abs() <= EPSILON => last.end = end,
            _ => spans.push(Span::new(start, end)),
        }
    }
    spans.retain(|s| s.width() > EPSILON);
    spans
}

fn merge_spans(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by(|a, b| a.start.total_cmp(&b.start));
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end + EPSILON => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged.retain(|s| s.width() > EPSILON);
    merged
}

fn spans_equal(a: &[Span], b: &[Span]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(a, b)| {
            (a.start - b.start).abs() <= EPSILON && (a.end - b.end).abs() <= EPSILON
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, size: f32) -> Shape {
        Shape::from_rect(Rect::from_xywh(x, y, size, size))
    }

    #[test]
    fn difference_of_corner_leaves_l_shape() {
        let shape = square(0.0, 0.0, 100.0).difference(&square(0.0, 50.0, 50.0));
        assert_eq!(shape.area(), 7500.0);
        assert_eq!(shape.bands().len(), 2);
        assert_eq!(shape.top_left(), Some((50.0, 100.0)));
        assert_eq!(shape.bbox(), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn hole_in_the_middle_splits_spans() {
        let shape = square(0.0, 0.0, 90.0).difference(&square(30.0, 30.0, 30.0));
        let middle = &shape.bands()[1];
        assert_eq!(middle.top, 60.0);
        assert_eq!(middle.bottom, 30.0);
        assert_eq!(middle.spans, vec![Span::new(0.0, 30.0), Span::new(60.0, 90.0)]);
        assert_eq!(shape.area(), 90.0 * 90.0 - 30.0 * 30.0);
    }

    #[test]
    fn union_merges_adjacent_bands() {
        let shape = Shape::from_rects([
            Rect::from_xywh(0.0, 0.0, 10.0, 10.0),
            Rect::from_xywh(0.0, 10.0, 10.0, 10.0),
        ]);
        assert_eq!(shape.bands().len(), 1);
        assert_eq!(shape.bbox(), Some(Rect::new(0.0, 0.0, 10.0, 20.0)));
    }

    #[test]
    fn intersection_clips_to_overlap() {
        let shape = square(0.0, 0.0, 10.0).intersection(&square(5.0, 5.0, 10.0));
        assert_eq!(shape.area(), 25.0);
        assert!(square(0.0, 0.0, 1.0).intersection(&square(5.0, 5.0, 1.0)).is_empty());
    }

    #[test]
    fn polygon_with_staircase_outline() {
        let shape = Shape::from_polygon(&[
            (0.0, 0.0),
            (100.0, 0.0),
            (100.0, 50.0),
            (50.0, 50.0),
            (50.0, 100.0),
            (0.0, 100.0),
        ])
        .unwrap();
        assert_eq!(shape.area(), 7500.0);
        assert_eq!(shape.top_left(), Some((0.0, 100.0)));
    }

    #[test]
    fn nested_polygons_use_even_odd_rule() {
        let outer = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let inner = vec![(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)];
        let shape = Shape::from_polygons(&[outer, inner]).unwrap();
        assert_eq!(shape.area(), 100.0 - 36.0);
    }

    #[test]
    fn diagonal_edges_are_rejected() {
        let result = Shape::from_polygon(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        assert!(matches!(result, Err(LayoutError::NonRectilinear(..))));
    }

    #[test]
    fn spans_between_intersects_bands_in_range() {
        let shape = square(0.0, 0.0, 100.0).difference(&Shape::from_rect(Rect::new(0.0, 60.0, 40.0, 80.0)));
        assert_eq!(shape.spans_between(85.0, 100.0), vec![Span::new(0.0, 100.0)]);
        assert_eq!(shape.spans_between(70.0, 90.0), vec![Span::new(40.0, 100.0)]);
        assert_eq!(shape.spans_between(100.0, 100.0), vec![Span::new(0.0, 100.0)]);
        assert!(shape.spans_between(-10.0, 10.0).is_empty());
    }

    #[test]
    fn removing_the_top_band() {
        let shape = square(0.0, 0.0, 100.0).difference(&square(0.0, 50.0, 50.0));
        let trimmed = shape.without_top_band();
        assert_eq!(trimmed.bbox(), Some(Rect::new(0.0, 0.0, 100.0, 50.0)));
    }
}
