use crate::boxes::LayoutBox;
use crate::error::LayoutError;
use crate::fitter::BoxFitter;
use crate::page::Page;
use crate::pagesize::PageSize;
use crate::style::Quad;

/// Places a sequence of boxes onto as many pages as it takes
#[derive(Debug, Clone)]
pub struct Composer {
    size: PageSize,
    margins: Option<Quad>,
}

impl Composer {
    pub fn new(size: PageSize, margins: Option<Quad>) -> Composer {
        Composer { size, margins }
    }

    /// Lay out `boxes` in order, starting a new page whenever the current one is full.
    ///
    /// Fails with [LayoutError::ElementTooLarge] if a box doesn't fit even on an
    /// empty page.
    pub fn compose(&self, boxes: Vec<Box<dyn LayoutBox>>) -> Result<Vec<Page>, LayoutError> {
        let mut pages = Vec::new();
        let mut queue = boxes;
        while !queue.is_empty() {
            let mut page = Page::new(self.size, self.margins);
            let mut fitter = BoxFitter::new(vec![page.frame()]);
            for boxed in queue.drain(..) {
                fitter.fit(boxed)?;
            }

            let (placements, remaining) = fitter.into_parts();
            if placements.is_empty() {
                let (width, height) = remaining
                    .first()
                    .map(|b| (b.width(), b.height()))
                    .unwrap_or_default();
                return Err(LayoutError::ElementTooLarge(width, height));
            }
            page.placements = placements;
            pages.push(page);
            if !remaining.is_empty() {
                log::debug!(
                    "page {} is full, {} boxes left over",
                    pages.len(),
                    remaining.len()
                );
            }
            queue = remaining;
        }
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::{BasicBox, TextBox};
    use crate::font::FixedPitchFont;
    use crate::style::Style;
    use crate::units::Pt;
    use std::rc::Rc;

    fn size() -> PageSize {
        crate::pagesize::custom(Pt(100.0), Pt(100.0))
    }

    #[test]
    fn breaks_pages() {
        let style = Rc::new(Style::new());
        let boxes: Vec<Box<dyn LayoutBox>> = (0..5)
            .map(|_| Box::new(BasicBox::new(50.0, 40.0, style.clone())) as Box<dyn LayoutBox>)
            .collect();
        let pages = Composer::new(size(), Some(Quad::all(5.0))).compose(boxes).unwrap();
        let counts: Vec<usize> = pages.iter().map(|p| p.placements.len()).collect();
        assert_eq!(counts, vec![2, 2, 1]);
    }

    #[test]
    fn splits_text_across_pages() {
        let style = Rc::new(Style::with_font(Rc::new(FixedPitchFont::courier()), 10.0));
        let text = "word ".repeat(200);
        let pages = Composer::new(size(), None)
            .compose(vec![Box::new(TextBox::from_text(&text, style))])
            .unwrap();
        assert!(pages.len() > 1);
        assert!(pages.iter().all(|p| p.placements.len() == 1));
        assert!(!pages[0].render().unwrap().is_empty());
    }

    #[test]
    fn rejects_boxes_larger_than_a_page() {
        let boxed = Box::new(BasicBox::new(50.0, 200.0, Rc::new(Style::new())));
        let result = Composer::new(size(), None).compose(vec![boxed]);
        assert!(matches!(result, Err(LayoutError::ElementTooLarge(_, _))));
    }
}
