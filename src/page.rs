use crate::canvas::Canvas;
use crate::error::LayoutError;
use crate::fitter::Placement;
use crate::frame::Frame;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::style::Quad;
use pdf_writer::Content;

/// A page of laid out boxes
#[derive(Debug, Clone)]
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// The boxes placed on the page, in the order they are drawn
    pub placements: Vec<Placement>,
}

impl Page {
    pub fn new(size: PageSize, margins: Option<Quad>) -> Page {
        let (width, height) = (*size.0, *size.1);
        let margins = margins.unwrap_or_default();
        Page {
            media_box: Rect::new(0.0, 0.0, width, height),
            content_box: Rect::new(
                margins.left,
                margins.bottom,
                (width - margins.right).max(margins.left),
                (height - margins.top).max(margins.bottom),
            ),
            placements: Vec::default(),
        }
    }

    /// A fresh frame covering the content box
    pub fn frame(&self) -> Frame {
        let b = &self.content_box;
        Frame::new(b.x1, b.y1, b.width(), b.height())
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) -> Result<(), LayoutError> {
        for placement in self.placements.iter() {
            placement.draw(canvas)?;
        }
        Ok(())
    }

    /// Draw the page into a PDF content stream
    pub fn render(&self) -> Result<Vec<u8>, LayoutError> {
        let mut content = Content::new();
        self.draw(&mut content)?;
        Ok(content.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize;
    use crate::units::Pt;

    #[test]
    fn content_box_sits_inside_the_margins() {
        let page = Page::new(pagesize::custom(Pt(200.0), Pt(100.0)), Some(Quad::trbl(10.0, 20.0, 30.0, 40.0)));
        assert_eq!(page.media_box, Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(page.content_box, Rect::new(40.0, 30.0, 180.0, 90.0));

        let frame = page.frame();
        assert_eq!((frame.x(), frame.y()), (40.0, 90.0));
        assert_eq!((frame.available_width(), frame.available_height()), (140.0, 60.0));
    }

    #[test]
    fn empty_pages_render_nothing() {
        let page = Page::new(pagesize::A4, None);
        assert!(page.render().unwrap().is_empty());
    }
}
