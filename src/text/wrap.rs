//! Greedy line wrapping.
//!
//! Lines are filled with as many tokens as fit and broken at the last breaking
//! opportunity. The available width is asked for through a [LineHandler], which also
//! receives every finished line and decides how wrapping goes on. When the width
//! depends on the height of a line (text flowing around shapes), a taller item can
//! make the line narrower than what was already put on it; the line is then thrown
//! away and wrapping restarts at the last stored line start with the new height.

use super::items::{InlineItem, Item, Penalty};
use super::line::Line;
use crate::shape::EPSILON;

/// What [wrap_lines] should do after a line has been handed to
/// [LineHandler::line_finished]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    /// Go on with the next line. If a restart happens later, it goes back to the
    /// previously stored line start
    Continue,
    /// Go on with the next line and remember where it starts, for restarts
    StoreStart,
    /// Stop wrapping. The line that was handed over is not used
    Stop,
}

/// The policy side of [wrap_lines]
pub trait LineHandler {
    /// The width available for the next line, given the height of the line so far
    fn available_width(&mut self, line_height: f32) -> f32;

    /// A line is complete. An empty line with `next` set means that `next` doesn't
    /// fit on a line by itself with the current width
    fn line_finished(&mut self, line: Line, next: Option<&Item>) -> LineAction;

    /// The lines since the last stored start are discarded and will be wrapped again,
    /// this time at least `line_height` tall
    fn restart(&mut self, line_height: f32);
}

/// Break `items`, starting at index `start`, into lines. Returns the index of the
/// first token that was not put on an accepted line
pub fn wrap_lines<H: LineHandler + ?Sized>(items: &[Item], start: usize, handler: &mut H) -> usize {
    Wrapper::new(items, start, handler).run()
}

#[derive(Debug)]
struct BreakPoint {
    /// Where to go on after breaking here
    resume: usize,
    line_len: usize,
    width: f32,
    /// Shows up at the end of the line only if it is broken here
    item: Option<InlineItem>,
}

enum Flow {
    Next,
    Stop,
}

struct Wrapper<'a, H: ?Sized> {
    items: &'a [Item],
    handler: &'a mut H,
    pos: usize,
    /// Where a restart goes back to
    anchor: usize,
    line_start: usize,
    line: Vec<InlineItem>,
    /// Length of `line` without trailing glue
    content_len: usize,
    width: f32,
    line_height: f32,
    available: f32,
    break_point: Option<BreakPoint>,
}

impl<'a, H: LineHandler + ?Sized> Wrapper<'a, H> {
    fn new(items: &'a [Item], start: usize, handler: &'a mut H) -> Self {
        Wrapper {
            items,
            handler,
            pos: start,
            anchor: start,
            line_start: start,
            line: Vec::new(),
            content_len: 0,
            width: 0.0,
            line_height: 0.0,
            available: 0.0,
            break_point: None,
        }
    }

    fn run(mut self) -> usize {
        self.start_line(0.0);
        while self.pos < self.items.len() {
            let items = self.items;
            let flow = match &items[self.pos] {
                Item::Box(item) => self.add_box(item),
                Item::Glue(glue) => self.add_glue(glue.height(), glue.width(), || {
                    InlineItem::Text(glue.clone())
                }),
                Item::Penalty(penalty) => self.add_penalty(penalty),
            };
            if let Flow::Stop = flow {
                return self.pos;
            }
        }

        if self.content_len > 0 {
            let line = self.take_line(true);
            if let Flow::Stop = self.finish_line(line) {
                return self.pos;
            }
        }
        self.pos
    }

    fn start_line(&mut self, line_height: f32) {
        self.line.clear();
        self.content_len = 0;
        self.width = 0.0;
        self.break_point = None;
        self.line_start = self.pos;
        self.line_height = line_height;
        self.available = self.handler.available_width(line_height);
    }

    fn fits(&self, width: f32) -> bool {
        self.width + width <= self.available + EPSILON
    }

    /// Take an item's height into account. Returns false if the line got narrower
    /// than its content and wrapping was restarted
    fn probe_height(&mut self, height: f32) -> bool {
        if height <= self.line_height + EPSILON {
            return true;
        }
        let available = self.handler.available_width(height);
        self.line_height = height;
        if available + EPSILON < self.width {
            log::trace!(
                "line of height {height:.2} is only {available:.2} wide, restarting at token {}",
                self.anchor
            );
            self.handler.restart(height);
            self.pos = self.anchor;
            self.start_line(height);
            return false;
        }
        self.available = available;
        true
    }

    fn push(&mut self, item: InlineItem) {
        self.width += item.width();
        self.line.push(item);
        self.content_len = self.line.len();
    }

    fn add_box(&mut self, item: &InlineItem) -> Flow {
        if !self.probe_height(item.height()) {
            return Flow::Next;
        }
        if self.fits(item.width()) {
            self.push(item.clone());
            self.pos += 1;
            Flow::Next
        } else {
            self.overflow()
        }
    }

    fn add_glue<F: FnOnce() -> InlineItem>(&mut self, height: f32, width: f32, item: F) -> Flow {
        if self.content_len == 0 {
            // glue at the start of a line is dropped
            self.pos += 1;
            return Flow::Next;
        }
        if !self.probe_height(height) {
            return Flow::Next;
        }
        self.break_point = Some(BreakPoint {
            resume: self.pos + 1,
            line_len: self.content_len,
            width: self.content_width(),
            item: None,
        });
        if !self.fits(width) {
            return self.break_line();
        }
        self.width += width;
        self.line.push(item());
        self.pos += 1;
        Flow::Next
    }

    fn add_penalty(&mut self, penalty: &Penalty) -> Flow {
        if penalty.is_mandatory() {
            self.line.truncate(self.content_len);
            self.width = self.content_width();
            if self.line.is_empty() {
                if let Some(item) = &penalty.item {
                    self.push(item.clone());
                }
            }
            self.pos += 1;
            let line = self.take_line(true);
            return self.finish_line(line);
        }

        if penalty.is_prohibited() {
            return match &penalty.item {
                Some(item) => self.add_box(item),
                None => {
                    self.pos += 1;
                    Flow::Next
                }
            };
        }

        if self.content_len == 0 {
            self.pos += 1;
            return Flow::Next;
        }
        let width = self.content_width();
        if width + penalty.width > self.available + EPSILON {
            return self.overflow();
        }

        let next_width = self.next_box_width(self.pos + 1);
        if penalty.item.is_some() && width + self.pending_glue_width() + next_width > self.available + EPSILON {
            // the following word doesn't fit anymore, so break right here
            log::trace!("breaking at penalty {} before token {}", penalty.penalty, self.pos + 1);
            self.line.truncate(self.content_len);
            self.width = width;
            if let Some(item) = &penalty.item {
                self.push(item.clone());
            }
            self.pos += 1;
            let line = self.take_line(false);
            return self.finish_line(line);
        }

        self.break_point = Some(BreakPoint {
            resume: self.pos + 1,
            line_len: self.content_len,
            width,
            item: penalty.item.clone(),
        });
        self.pos += 1;
        Flow::Next
    }

    /// Width of the unbreakable content starting at `from`
    fn next_box_width(&self, from: usize) -> f32 {
        self.items[from.min(self.items.len())..]
            .iter()
            .map_while(|item| match item {
                Item::Box(b) => Some(b.width()),
                Item::Penalty(p) if p.is_prohibited() => Some(p.width),
                _ => None,
            })
            .sum()
    }

    fn pending_glue_width(&self) -> f32 {
        self.line[self.content_len..].iter().map(InlineItem::width).sum()
    }

    fn content_width(&self) -> f32 {
        self.line[..self.content_len].iter().map(InlineItem::width).sum()
    }

    /// The current token doesn't fit on the line anymore
    fn overflow(&mut self) -> Flow {
        if self.break_point.is_some() {
            return self.break_line();
        }
        if self.content_len > 0 {
            if self.can_break_before(self.pos) {
                // no breaking opportunity on the line, break before the token
                let line = self.take_line(false);
                return self.finish_line(line);
            }
            // the whole line is glued together by no-break spaces
            log::trace!(
                "tokens {}..={} can't be broken and don't fit into {:.2}",
                self.line_start,
                self.pos,
                self.available
            );
            self.pos = self.line_start;
        }
        self.report_too_wide()
    }

    /// Whether a line may end right before the token at `pos`
    fn can_break_before(&self, pos: usize) -> bool {
        let prohibited = |item: Option<&Item>| matches!(item, Some(Item::Penalty(p)) if p.is_prohibited());
        let previous = pos.checked_sub(1).filter(|p| *p >= self.line_start);
        !prohibited(self.items.get(pos)) && !prohibited(previous.and_then(|p| self.items.get(p)))
    }

    /// The token at `pos` can't be put on a line of the current width
    fn report_too_wide(&mut self) -> Flow {
        let items = self.items;
        let item = &items[self.pos];
        log::trace!(
            "token {} of width {:.2} doesn't fit into {:.2}",
            self.pos,
            item.width(),
            self.available
        );
        match self.handler.line_finished(Line::default(), Some(item)) {
            LineAction::Stop => {
                self.pos = self.line_start;
                Flow::Stop
            }
            LineAction::StoreStart => {
                self.anchor = self.pos;
                self.start_line(0.0);
                Flow::Next
            }
            LineAction::Continue => {
                self.start_line(0.0);
                Flow::Next
            }
        }
    }

    /// Break the line at the last breaking opportunity
    fn break_line(&mut self) -> Flow {
        let Some(bp) = self.break_point.take() else {
            return self.overflow();
        };
        self.line.truncate(bp.line_len);
        self.content_len = bp.line_len;
        self.width = bp.width;
        if let Some(item) = bp.item {
            self.push(item);
        }
        self.pos = bp.resume;
        let line = self.take_line(false);
        self.finish_line(line)
    }

    fn take_line(&mut self, ignore_justification: bool) -> Line {
        self.line.truncate(self.content_len);
        let mut line = Line::new(std::mem::take(&mut self.line));
        line.ignore_justification = ignore_justification;
        line
    }

    fn finish_line(&mut self, line: Line) -> Flow {
        let next = self.items.get(self.pos);
        log::trace!("line of width {:.2} ends before token {}", line.width(), self.pos);
        match self.handler.line_finished(line, next) {
            LineAction::Stop => {
                self.pos = self.line_start;
                Flow::Stop
            }
            LineAction::StoreStart => {
                self.anchor = self.pos;
                self.start_line(0.0);
                Flow::Next
            }
            LineAction::Continue => {
                self.start_line(0.0);
                Flow::Next
            }
        }
    }
}
