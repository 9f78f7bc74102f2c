//! Text renderer for terminal output
//!
//! Draws the grid one row per line. Each atom is its type letter, uppercase
//! for enzymes; empty cells are dots. With states shown, every cell is three
//! characters wide: letter, state (mod 100, two digits).

use achem_core::{GridSnapshot, Location, Renderer};
use std::io::Write;

/// Renderer that prints the grid to a writer every `every` ticks
pub struct AsciiRenderer<W: Write> {
    out: W,
    every: u64,
    show_states: bool,
}

impl AsciiRenderer<std::io::Stdout> {
    pub fn stdout(every: u64, show_states: bool) -> Self {
        Self::new(std::io::stdout(), every, show_states)
    }
}

impl<W: Write> AsciiRenderer<W> {
    pub fn new(out: W, every: u64, show_states: bool) -> Self {
        Self {
            out,
            every,
            show_states,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for AsciiRenderer<W> {
    fn redraw(&mut self, snapshot: &GridSnapshot) {
        if self.every == 0 || snapshot.tick % self.every != 0 {
            return;
        }

        let frame = render_to_string(snapshot, self.show_states);
        let written = writeln!(self.out, "tick {}", snapshot.tick)
            .and_then(|_| self.out.write_all(frame.as_bytes()))
            .and_then(|_| self.out.flush());
        if let Err(err) = written {
            log::warn!("Failed to draw tick {}: {err}", snapshot.tick);
        }
    }
}

/// Draw a snapshot as text, one line per grid row
pub fn render_to_string(snapshot: &GridSnapshot, show_states: bool) -> String {
    let size = snapshot.size.max(0) as usize;
    let cell_width = if show_states { 3 } else { 1 };
    let blank = if show_states { " . " } else { "." };

    let mut rows: Vec<Vec<String>> = vec![vec![blank.to_string(); size]; size];
    for atom in &snapshot.atoms {
        let Location::Square(pos) = atom.location else {
            continue;
        };
        let (Ok(x), Ok(y)) = (usize::try_from(pos.x), usize::try_from(pos.y)) else {
            continue;
        };
        if x >= size || y >= size {
            continue;
        }

        let letter = if atom.enzyme {
            atom.kind.letter().to_ascii_uppercase()
        } else {
            atom.kind.letter()
        };
        rows[y][x] = if show_states {
            format!("{letter}{:02}", atom.state.rem_euclid(100))
        } else {
            letter.to_string()
        };
    }

    let mut out = String::with_capacity(size * (size * cell_width + 1));
    for row in rows {
        out.push_str(&row.concat());
        out.push('\n');
    }
    out
}
