//! The drawing surface boxes draw themselves onto.

use crate::colour::Colour;
use crate::rect::Rect;
use crate::text::{TextFragment, TextItem};
use pdf_writer::{Content, Name, Str};

/// The drawing operations layout needs. Coordinates are in PDF points with the
/// origin in the bottom-left corner of the page.
///
/// [pdf_writer::Content] implements this, so boxes can be drawn directly into a
/// PDF content stream.
pub trait Canvas {
    fn save_state(&mut self);
    fn restore_state(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn fill_rect(&mut self, rect: Rect, colour: Colour);
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, colour: Colour);
    /// Restrict all further drawing, until the state is restored, to `rect`
    fn clip_rect(&mut self, rect: Rect);
    /// Show the fragment with its baseline starting at `(x, y)`
    fn show_text(&mut self, x: f32, y: f32, fragment: &TextFragment);
    /// Paint the image XObject called `name` so that it covers `rect`
    fn draw_image(&mut self, name: &str, rect: Rect);
    fn begin_optional_content(&mut self, name: &str);
    fn end_optional_content(&mut self);
}

fn set_fill_colour(content: &mut Content, colour: Colour) {
    match colour {
        Colour::RGB { r, g, b } => content.set_fill_rgb(r, g, b),
        Colour::CMYK { c, m, y, k } => content.set_fill_cmyk(c, m, y, k),
        Colour::Grey { g } => content.set_fill_gray(g),
    };
}

fn set_stroke_colour(content: &mut Content, colour: Colour) {
    match colour {
        Colour::RGB { r, g, b } => content.set_stroke_rgb(r, g, b),
        Colour::CMYK { c, m, y, k } => content.set_stroke_cmyk(c, m, y, k),
        Colour::Grey { g } => content.set_stroke_gray(g),
    };
}

impl Canvas for Content {
    fn save_state(&mut self) {
        Content::save_state(self);
    }

    fn restore_state(&mut self) {
        Content::restore_state(self);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.transform([1.0, 0.0, 0.0, 1.0, x, y]);
    }

    fn fill_rect(&mut self, rect: Rect, colour: Colour) {
        set_fill_colour(self, colour);
        self.rect(rect.x1, rect.y1, rect.width(), rect.height());
        self.fill_nonzero();
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, colour: Colour) {
        set_stroke_colour(self, colour);
        self.set_line_width(width);
        self.move_to(from.0, from.1);
        self.line_to(to.0, to.1);
        self.stroke();
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.rect(rect.x1, rect.y1, rect.width(), rect.height());
        self.clip_nonzero();
        self.end_path();
    }

    fn show_text(&mut self, x: f32, y: f32, fragment: &TextFragment) {
        let style = fragment.style();
        let Some(font) = style.font.as_ref() else {
            return;
        };
        if fragment.items().is_empty() {
            return;
        }

        set_fill_colour(self, style.fill_colour);
        self.begin_text();
        self.set_font(Name(font.resource_name().as_bytes()), style.font_size);
        if style.character_spacing != 0.0 {
            self.set_char_spacing(style.character_spacing);
        }
        self.next_line(x, y);

        // word spacing is applied by hand since Tw only affects single byte spaces
        let word_adjust = match style.font_size {
            size if size > 0.0 && style.word_spacing != 0.0 => {
                Some(-style.word_spacing * 1000.0 / size)
            }
            _ => None,
        };
        {
            let mut positioned = self.show_positioned();
            let mut items = positioned.items();
            let mut run: Vec<u8> = Vec::new();
            for item in fragment.items() {
                match item {
                    TextItem::Glyph(glyph) => {
                        font.encode(glyph.ch, &mut run);
                        if let (' ', Some(adjust)) = (glyph.ch, word_adjust) {
                            items.show(Str(&run));
                            run.clear();
                            items.adjust(adjust);
                        }
                    }
                    TextItem::Kern(kern) => {
                        if !run.is_empty() {
                            items.show(Str(&run));
                            run.clear();
                        }
                        items.adjust(*kern);
                    }
                }
            }
            if !run.is_empty() {
                items.show(Str(&run));
            }
        }
        self.end_text();
    }

    fn draw_image(&mut self, name: &str, rect: Rect) {
        Content::save_state(self);
        self.transform([rect.width(), 0.0, 0.0, rect.height(), rect.x1, rect.y1]);
        self.x_object(Name(name.as_bytes()));
        Content::restore_state(self);
    }

    fn begin_optional_content(&mut self, name: &str) {
        self.begin_marked_content_with_properties(Name(b"OC"))
            .properties_named(Name(name.as_bytes()));
    }

    fn end_optional_content(&mut self) {
        self.end_marked_content();
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;
    use crate::font::FixedPitchFont;
    use crate::style::Style;
    use std::rc::Rc;

    #[test]
    fn writes_rectangles_and_text_operators() {
        let style = Rc::new(Style::with_font(Rc::new(FixedPitchFont::courier()), 10.0));
        let fragment = TextFragment::create("Hi", style);

        let mut content = Content::new();
        content.fill_rect(Rect::new(0.0, 0.0, 10.0, 20.0), colours::RED);
        content.show_text(5.0, 7.0, &fragment);
        let bytes = content.finish();
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains("0 0 10 20 re"));
        assert!(text.contains("/Courier 10 Tf"));
        assert!(text.contains("5 7 Td"));
        assert!(text.contains("(Hi)"));
        assert!(text.contains("TJ"));
    }

    #[test]
    fn marks_optional_content() {
        let mut content = Content::new();
        content.begin_optional_content("oc1");
        content.end_optional_content();
        let bytes = content.finish();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/oc1"));
        assert!(text.contains("BDC"));
        assert!(text.contains("EMC"));
    }
}
