//! Turning text into the box, glue and penalty tokens that lines are built from.

use super::items::{glyph, InlineItem, Item, Penalty, TextFragment, TextItem};
use crate::config::LayoutConfig;
use crate::style::Style;
use std::rc::Rc;

const PARAGRAPH_SEPARATORS: [char; 4] = ['\n', '\r', '\u{85}', '\u{2029}'];
const LINE_SEPARATORS: [char; 3] = ['\u{2028}', '\u{0B}', '\u{0C}'];
const NBSP: char = '\u{A0}';
const SOFT_HYPHEN: char = '\u{AD}';
const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// Break `items` up into tokens. Text fragments are split at spaces, tabs,
/// hyphens and the special break characters; inline boxes become a single
/// [Item::Box] each
pub fn segment(items: Vec<InlineItem>, config: &LayoutConfig) -> Vec<Item> {
    let mut tokens = Vec::new();
    for item in items {
        match item {
            InlineItem::Text(fragment) => segment_fragment(&fragment, config, &mut tokens),
            inline => tokens.push(Item::Box(inline)),
        }
    }
    log::trace!("segmented text into {} tokens", tokens.len());
    tokens
}

/// Segment plain text set in a single style
pub fn segment_text(text: &str, style: Rc<Style>, config: &LayoutConfig) -> Vec<Item> {
    segment(vec![TextFragment::create(text, style).into()], config)
}

fn segment_fragment(fragment: &TextFragment, config: &LayoutConfig, tokens: &mut Vec<Item>) {
    let style = fragment.style();
    let mut run: Vec<TextItem> = Vec::new();
    let flush = |run: &mut Vec<TextItem>, tokens: &mut Vec<Item>| {
        if !run.is_empty() {
            let content = TextFragment::new(std::mem::take(run), style.clone());
            tokens.push(Item::Box(content.into()));
        }
    };

    let mut items = fragment.items().iter().peekable();
    while let Some(item) = items.next() {
        let g = match item {
            TextItem::Glyph(g) => g,
            TextItem::Kern(_) => {
                run.push(*item);
                continue;
            }
        };

        match g.ch {
            ' ' => {
                flush(&mut run, tokens);
                tokens.push(Item::Glue(TextFragment::new(vec![*item], style.clone())));
            }
            '\t' => {
                flush(&mut run, tokens);
                let space = TextItem::Glyph(glyph(style, ' '));
                tokens.push(Item::Glue(TextFragment::new(
                    vec![space; config.tab_size],
                    style.clone(),
                )));
            }
            '-' => {
                run.push(*item);
                flush(&mut run, tokens);
                tokens.push(Item::Penalty(Penalty::new(Penalty::STANDARD, None)));
            }
            SOFT_HYPHEN => {
                flush(&mut run, tokens);
                let hyphen = TextFragment::create("-", style.clone());
                tokens.push(Item::Penalty(Penalty::new(Penalty::STANDARD, Some(hyphen.into()))));
            }
            ZERO_WIDTH_SPACE => {
                flush(&mut run, tokens);
                tokens.push(Item::Penalty(Penalty::new(0.0, None)));
            }
            NBSP => {
                flush(&mut run, tokens);
                let space = TextFragment::new(vec![TextItem::Glyph(glyph(style, ' '))], style.clone());
                tokens.push(Item::Penalty(Penalty::new(Penalty::INFINITY, Some(space.into()))));
            }
            ch if PARAGRAPH_SEPARATORS.contains(&ch) => {
                if ch == '\r' {
                    items.next_if(|next| matches!(next, TextItem::Glyph(n) if n.ch == '\n'));
                }
                flush(&mut run, tokens);
                tokens.push(mandatory_break(Penalty::PARAGRAPH_BREAK, style));
            }
            ch if LINE_SEPARATORS.contains(&ch) => {
                flush(&mut run, tokens);
                tokens.push(mandatory_break(Penalty::LINE_BREAK, style));
            }
            _ => run.push(*item),
        }
    }
    flush(&mut run, tokens);
}

/// A mandatory break carries an empty fragment so that an empty line still gets
/// the height of the text around it
fn mandatory_break(penalty: f32, style: &Rc<Style>) -> Item {
    let empty = TextFragment::new(Vec::new(), style.clone());
    Item::Penalty(Penalty {
        penalty,
        width: 0.0,
        item: Some(empty.into()),
    })
}
