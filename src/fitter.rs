use crate::boxes::{split_box, FitResult, FitStatus, LayoutBox};
use crate::canvas::Canvas;
use crate::error::LayoutError;
use crate::frame::Frame;
use crate::shape::Shape;

/// A box that was placed into one of the frames of a [BoxFitter]
#[derive(Debug, Clone)]
pub struct Placement {
    /// Index of the frame the box was placed into
    pub frame_index: usize,
    pub result: FitResult,
    pub boxed: Box<dyn LayoutBox>,
}

impl Placement {
    /// Draw the placed box where it was fit
    pub fn draw(&self, canvas: &mut dyn Canvas) -> Result<(), LayoutError> {
        self.boxed.draw(canvas, self.result.x, self.result.y)
    }
}

/// Places a sequence of boxes into a sequence of frames, splitting boxes across
/// regions and frames as needed.
///
/// Once a box couldn't be placed, it and every box after it end up in
/// [BoxFitter::remaining], in order.
#[derive(Debug, Clone)]
pub struct BoxFitter {
    frames: Vec<Frame>,
    initial_tops: Vec<f32>,
    current: usize,
    placements: Vec<Placement>,
    remaining: Vec<Box<dyn LayoutBox>>,
}

impl BoxFitter {
    pub fn new(frames: Vec<Frame>) -> BoxFitter {
        BoxFitter {
            initial_tops: frames.iter().map(Frame::y).collect(),
            frames,
            current: 0,
            placements: Vec::new(),
            remaining: Vec::new(),
        }
    }

    /// Place `boxed` into the frames, starting where the previous box ended
    pub fn fit(&mut self, boxed: Box<dyn LayoutBox>) -> Result<(), LayoutError> {
        if !self.remaining.is_empty() {
            self.remaining.push(boxed);
            return Ok(());
        }

        let mut boxed = boxed;
        while self.current < self.frames.len() {
            let frame = &mut self.frames[self.current];
            let result = frame.fit(boxed.as_mut())?;
            if result.is_success() {
                self.commit(boxed, result);
                return Ok(());
            }

            if !frame.is_full() {
                let tried = (result.available_width, result.available_height);
                let (placed, rest) = match result.status {
                    FitStatus::Failure => (None, Some(boxed)),
                    _ => split_box(boxed)?,
                };
                match (placed, rest) {
                    (Some(placed), Some(rest)) => {
                        let mut result = result;
                        result.status = FitStatus::Success;
                        self.commit(placed, result);
                        boxed = rest;
                        continue;
                    }
                    (Some(placed), None) => {
                        self.commit(placed, result);
                        return Ok(());
                    }
                    (None, Some(rest)) => {
                        boxed = rest;
                        log::trace!(
                            "box doesn't fit into {:.2}x{:.2}, trying the next region",
                            tried.0,
                            tried.1
                        );
                        if self.frames[self.current].find_next_region() {
                            continue;
                        }
                    }
                    (None, None) => return Ok(()),
                }
            }

            log::debug!("frame {} is full, moving on", self.current);
            self.current += 1;
        }

        log::debug!("no room left for box, {} frames used", self.frames.len());
        self.remaining.push(boxed);
        Ok(())
    }

    fn commit(&mut self, boxed: Box<dyn LayoutBox>, result: FitResult) {
        let frame = &mut self.frames[self.current];
        if let Some(mask) = result.mask {
            if !mask.is_empty() {
                frame.remove_area(&Shape::from_rect(mask));
            }
        }
        self.placements.push(Placement {
            frame_index: self.current,
            result,
            boxed,
        });
    }

    /// Whether every box was placed
    pub fn is_success(&self) -> bool {
        self.remaining.is_empty()
    }

    /// How far down from its initial top each frame was used
    pub fn content_heights(&self) -> Vec<f32> {
        let mut heights = vec![0.0_f32; self.frames.len()];
        for placement in self.placements.iter() {
            if let Some(mask) = placement.result.mask {
                let height = self.initial_tops[placement.frame_index] - mask.y1;
                let slot = &mut heights[placement.frame_index];
                *slot = slot.max(height);
            }
        }
        heights
    }

    pub fn fit_results(&self) -> &[Placement] {
        &self.placements
    }

    /// The boxes that couldn't be placed, in order
    pub fn remaining(&self) -> &[Box<dyn LayoutBox>] {
        &self.remaining
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_parts(self) -> (Vec<Placement>, Vec<Box<dyn LayoutBox>>) {
        (self.placements, self.remaining)
    }
}
