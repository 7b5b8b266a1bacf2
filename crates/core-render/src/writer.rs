//! Terminal writer.
//!
//! Collects primitive terminal operations for one frame and flushes them in order with a single
//! `flush`. Rows are emitted as runs of cells sharing a style so each style change costs one
//! escape sequence rather than one per cell.

use crate::{Cell, CellFlags, Tone};
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ClearAll,
    MoveTo(u16, u16),
    Style(Tone, CellFlags),
    Print(String),
    Reset,
}

#[derive(Default, Debug)]
pub struct Writer {
    cmds: Vec<Command>,
}

pub(crate) fn tone_color(tone: Tone) -> Option<Color> {
    match tone {
        Tone::Plain => None,
        Tone::Keyword => Some(Color::Blue),
        Tone::Match => Some(Color::Magenta),
        Tone::UserLabel => Some(Color::Yellow),
        Tone::ModelLabel => Some(Color::Green),
        Tone::Error => Some(Color::Red),
        Tone::Border => Some(Color::DarkGrey),
        Tone::Dim => Some(Color::Grey),
    }
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn clear_all(&mut self) {
        self.cmds.push(Command::ClearAll);
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }

    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }

    /// Queue a full row of cells at screen row `y`, grouping equal styles into runs.
    pub fn row(&mut self, y: u16, cells: &[Cell]) {
        self.move_to(0, y);
        let mut run = String::new();
        let mut style = (Tone::Plain, CellFlags::empty());
        for cell in cells {
            // CURSOR only marks position; it has no visual of its own.
            let next = (cell.tone, cell.flags - CellFlags::CURSOR);
            if next != style {
                self.print(std::mem::take(&mut run));
                self.cmds.push(Command::Reset);
                if next != (Tone::Plain, CellFlags::empty()) {
                    self.cmds.push(Command::Style(next.0, next.1));
                }
                style = next;
            }
            run.push(cell.ch);
        }
        self.print(run);
        if style != (Tone::Plain, CellFlags::empty()) {
            self.cmds.push(Command::Reset);
        }
    }

    pub fn flush<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::ClearAll => queue!(out, Clear(ClearType::All))?,
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::Style(tone, flags) => {
                    if let Some(color) = tone_color(tone) {
                        queue!(out, SetForegroundColor(color))?;
                    }
                    if flags.contains(CellFlags::REVERSE) {
                        queue!(out, SetAttribute(Attribute::Reverse))?;
                    }
                    if flags.contains(CellFlags::BOLD) {
                        queue!(out, SetAttribute(Attribute::Bold))?;
                    }
                }
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Reset => queue!(out, SetAttribute(Attribute::Reset), ResetColor)?,
            }
        }
        out.flush()?;
        Ok(())
    }
}
