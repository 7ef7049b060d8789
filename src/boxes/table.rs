use super::{BoxBase, FitStatus, LayoutBox};
use crate::canvas::Canvas;
use crate::error::LayoutError;
use crate::frame::Frame;
use crate::shape::EPSILON;
use crate::style::Style;
use std::rc::Rc;

/// The width of a table column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// A width in points
    Fixed(f32),
    /// A share of the width the fixed columns leave over, relative to the other
    /// relative columns
    Relative(f32),
}

/// Resolve the column widths for a table `width` wide
pub fn resolve_column_widths(columns: &[ColumnWidth], width: f32) -> Vec<f32> {
    let fixed: f32 = columns
        .iter()
        .map(|c| match c {
            ColumnWidth::Fixed(w) => w.max(0.0),
            ColumnWidth::Relative(_) => 0.0,
        })
        .sum();
    let shares: f32 = columns
        .iter()
        .map(|c| match c {
            ColumnWidth::Relative(share) => share.max(0.0),
            ColumnWidth::Fixed(_) => 0.0,
        })
        .sum();
    if fixed > width + EPSILON {
        log::warn!(
            "fixed table columns need {fixed:.2} but only {width:.2} is available, cells will overhang"
        );
    }
    let left_over = (width - fixed).max(0.0);
    columns
        .iter()
        .map(|c| match c {
            ColumnWidth::Fixed(w) => w.max(0.0),
            ColumnWidth::Relative(_) if shares <= 0.0 => 0.0,
            ColumnWidth::Relative(share) => left_over * share.max(0.0) / shares,
        })
        .collect()
}

/// A row of a table that was laid out
#[derive(Debug, Clone)]
struct FittedRow {
    cells: Vec<Box<dyn LayoutBox>>,
    height: f32,
}

/// A table of boxes. Each row is as tall as its tallest cell.
///
/// Rows are never split; a table that doesn't fit is split between rows, and the
/// header rows are repeated at the top of every part.
#[derive(Debug, Clone)]
pub struct TableBox {
    base: BoxBase,
    columns: Vec<ColumnWidth>,
    header: Vec<Vec<Box<dyn LayoutBox>>>,
    rows: Vec<Vec<Box<dyn LayoutBox>>>,
    fitted: Vec<FittedRow>,
    fitted_body_rows: usize,
    column_widths: Vec<f32>,
}

impl TableBox {
    pub fn new(
        columns: Vec<ColumnWidth>,
        rows: Vec<Vec<Box<dyn LayoutBox>>>,
        style: Rc<Style>,
    ) -> TableBox {
        TableBox {
            base: BoxBase::new(0.0, 0.0, style),
            columns,
            header: Vec::new(),
            rows,
            fitted: Vec::new(),
            fitted_body_rows: 0,
            column_widths: Vec::new(),
        }
    }

    /// Rows repeated at the top of every part of the table
    pub fn with_header(mut self, header: Vec<Vec<Box<dyn LayoutBox>>>) -> TableBox {
        self.header = header;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> TableBox {
        self.base = BoxBase::new(width, height, self.base.style().clone());
        self
    }

    pub fn rows(&self) -> &[Vec<Box<dyn LayoutBox>>] {
        &self.rows
    }

    /// The resolved column widths of the last fit
    pub fn column_widths(&self) -> &[f32] {
        &self.column_widths
    }

    /// Fit the cells of a row into the columns, `None` if one of them doesn't fit
    fn fit_row(
        &self,
        row: &[Box<dyn LayoutBox>],
        height: f32,
    ) -> Result<Option<FittedRow>, LayoutError> {
        let mut cells = Vec::with_capacity(row.len());
        let mut row_height = 0.0_f32;
        for (cell, width) in row.iter().zip(self.column_widths.iter()) {
            let mut cell = cell.clone();
            let frame = Frame::new(0.0, 0.0, *width, height);
            if cell.fit(*width, height, &frame)? != FitStatus::Success {
                return Ok(None);
            }
            row_height = row_height.max(cell.height());
            cells.push(cell);
        }
        Ok(Some(FittedRow {
            cells,
            height: row_height,
        }))
    }
}

impl LayoutBox for TableBox {
    fn base(&self) -> &BoxBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BoxBase {
        &mut self.base
    }

    fn fit_content(
        &mut self,
        _available_width: f32,
        _available_height: f32,
        _frame: &Frame,
    ) -> Result<FitStatus, LayoutError> {
        self.column_widths = resolve_column_widths(&self.columns, self.base.content_width());
        let mut left = self.base.content_height();
        let mut fitted = Vec::new();

        for row in self.header.iter() {
            match self.fit_row(row, left)? {
                Some(row) => {
                    left -= row.height;
                    fitted.push(row);
                }
                None => {
                    self.fitted.clear();
                    return Ok(FitStatus::Failure);
                }
            }
        }

        let mut body_rows = 0;
        for row in self.rows.iter() {
            match self.fit_row(row, left)? {
                Some(row) => {
                    left -= row.height;
                    fitted.push(row);
                    body_rows += 1;
                }
                None => break,
            }
        }

        let status = if body_rows == self.rows.len() {
            FitStatus::Success
        } else if body_rows == 0 {
            FitStatus::Failure
        } else {
            FitStatus::Overflow
        };
        log::trace!(
            "table fit {body_rows} of {} rows, status {status:?}",
            self.rows.len()
        );
        let height: f32 = fitted.iter().map(|row| row.height).sum();
        self.base.set_content_height(height);
        self.fitted = fitted;
        self.fitted_body_rows = body_rows;
        Ok(status)
    }

    fn split_content(&mut self) -> Option<Box<dyn LayoutBox>> {
        if self.fitted_body_rows == 0 {
            return None;
        }
        let rest = self.rows.split_off(self.fitted_body_rows);
        Some(Box::new(TableBox {
            base: self.base.continuation(),
            columns: self.columns.clone(),
            header: self.header.clone(),
            rows: rest,
            fitted: Vec::new(),
            fitted_body_rows: 0,
            column_widths: Vec::new(),
        }))
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, x: f32, y: f32) -> Result<(), LayoutError> {
        let mut top = y + self.base.content_height();
        for row in self.fitted.iter() {
            let mut cell_x = x;
            for (cell, width) in row.cells.iter().zip(self.column_widths.iter()) {
                cell.draw(canvas, cell_x, top - cell.height())?;
                cell_x += width;
            }
            top -= row.height;
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.base.is_empty()
            && self
                .header
                .iter()
                .chain(self.rows.iter())
                .flatten()
                .all(|cell| cell.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::{BasicBox, SplitOutcome};
    use crate::canvas::recording::{Op, RecordingCanvas};
    use crate::colour::colours;
    use crate::rect::Rect;

    fn cell(height: f32) -> Box<dyn LayoutBox> {
        let mut style = Style::new();
        style.background_colour = Some(colours::BLACK);
        Box::new(BasicBox::new(0.0, height, Rc::new(style)))
    }

    fn row(heights: &[f32]) -> Vec<Box<dyn LayoutBox>> {
        heights.iter().map(|h| cell(*h)).collect()
    }

    fn frame() -> Frame {
        Frame::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn resolves_widths() {
        let widths = resolve_column_widths(
            &[
                ColumnWidth::Fixed(20.0),
                ColumnWidth::Relative(1.0),
                ColumnWidth::Relative(3.0),
            ],
            100.0,
        );
        assert_eq!(widths, vec![20.0, 20.0, 60.0]);
        assert_eq!(
            resolve_column_widths(&[ColumnWidth::Fixed(150.0), ColumnWidth::Relative(1.0)], 100.0),
            vec![150.0, 0.0]
        );
    }

    #[test]
    fn rows_are_as_tall_as_their_tallest_cell() {
        let mut table = TableBox::new(
            vec![ColumnWidth::Fixed(30.0), ColumnWidth::Relative(1.0)],
            vec![row(&[10.0, 20.0]), row(&[5.0, 5.0])],
            Rc::new(Style::new()),
        );
        assert_eq!(table.fit(100.0, 100.0, &frame()).unwrap(), FitStatus::Success);
        assert_eq!(table.height(), 25.0);
        assert_eq!(table.column_widths(), &[30.0, 70.0]);

        let mut canvas = RecordingCanvas::default();
        table.draw(&mut canvas, 0.0, 0.0).unwrap();
        assert_eq!(
            canvas.ops,
            vec![
                Op::FillRect(Rect::new(0.0, 15.0, 30.0, 25.0)),
                Op::FillRect(Rect::new(30.0, 5.0, 100.0, 25.0)),
                Op::FillRect(Rect::new(0.0, 0.0, 30.0, 5.0)),
                Op::FillRect(Rect::new(30.0, 0.0, 100.0, 5.0)),
            ]
        );
    }

    #[test]
    fn splits_between_rows_and_repeats_the_header() {
        let mut table = TableBox::new(
            vec![ColumnWidth::Relative(1.0)],
            vec![row(&[20.0]), row(&[20.0]), row(&[20.0])],
            Rc::new(Style::new()),
        )
        .with_header(vec![row(&[10.0])]);
        assert_eq!(table.fit(100.0, 55.0, &frame()).unwrap(), FitStatus::Overflow);
        let SplitOutcome::Parts(mut rest) = table.split().unwrap() else {
            panic!("expected the table to split");
        };
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.height(), 50.0);

        assert_eq!(rest.fit(100.0, 100.0, &frame()).unwrap(), FitStatus::Success);
        // header plus the last row
        assert_eq!(rest.height(), 30.0);
    }

    #[test]
    fn fails_without_room_for_the_header() {
        let mut table = TableBox::new(
            vec![ColumnWidth::Relative(1.0)],
            vec![row(&[5.0])],
            Rc::new(Style::new()),
        )
        .with_header(vec![row(&[50.0])]);
        assert_eq!(table.fit(100.0, 40.0, &frame()).unwrap(), FitStatus::Failure);
    }
}
