#![forbid(unsafe_code)]

//! Text rendering of a board: a row of top halves, a hinge, a row of
//! bottom halves.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use flap_core::{
    CellAnimator, CursorAnimator, Face, FlapBoard, FrameSpec, PlanAnimator, cursor_faces,
    visible_halves,
};
use unicode_width::UnicodeWidthStr;

const LEFT: u16 = 2;
const TOP: u16 = 1;

/// Face stacks for one animator kind.
pub trait CellFaces {
    /// Faces of the flip on screen right now.
    fn faces(&self) -> Vec<Face>;
}

impl CellFaces for PlanAnimator {
    fn faces(&self) -> Vec<Face> {
        FrameSpec::from_snapshot(&self.snapshot()).faces()
    }
}

impl CellFaces for CursorAnimator {
    fn faces(&self) -> Vec<Face> {
        cursor_faces(&self.snapshot())
    }
}

/// Center `glyph` in `width` terminal columns.
fn center(glyph: &str, width: usize) -> String {
    let slack = width.saturating_sub(UnicodeWidthStr::width(glyph));
    let left = slack / 2;
    format!("{}{glyph}{}", " ".repeat(left), " ".repeat(slack - left))
}

/// The three text rows of a board.
pub fn board_lines<A: CellAnimator + CellFaces>(board: &FlapBoard<A>) -> [String; 3] {
    let width = board.alphabet().max_width().max(1);
    let mut top = String::new();
    let mut hinge = String::new();
    let mut bottom = String::new();
    for cell in board.cells() {
        let progress = cell.snapshot().progress();
        let (upper, lower) = visible_halves(&cell.faces(), progress);
        top.push_str(&center(&upper, width));
        top.push(' ');
        hinge.push_str(&"\u{2500}".repeat(width));
        hinge.push(' ');
        bottom.push_str(&center(&lower, width));
        bottom.push(' ');
    }
    [top, hinge, bottom]
}

/// Draw the board and a status line.
///
/// # Errors
///
/// Propagates terminal write errors.
pub fn draw<A, W>(out: &mut W, board: &FlapBoard<A>, status: &str) -> io::Result<()>
where
    A: CellAnimator + CellFaces,
    W: Write,
{
    for (row, line) in (TOP..).zip(board_lines(board)) {
        crossterm::queue!(
            out,
            MoveTo(LEFT, row),
            Clear(ClearType::CurrentLine),
            Print(line)
        )?;
    }
    crossterm::queue!(
        out,
        MoveTo(LEFT, TOP + 4),
        Clear(ClearType::CurrentLine),
        Print(status)
    )?;
    out.flush()
}
