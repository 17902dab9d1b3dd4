//! Drawing seam and its terminal implementation.
//!
//! The world draws through the `Renderer` trait; the terminal implementation
//! rasterizes segments into a char grid, scaled from world units to cells,
//! and writes frames either to stdout or to an in-memory buffer that dumps
//! frames to the log in headless runs.

use std::io::{self, Write};

use crossterm::{cursor::MoveTo, execute};
use log::info;

use crate::types::{Line, Point};

/// What the world needs from a display: a frame clear, stroked segments with
/// a width, filled squares for bullets, and a frame flush.
pub trait Renderer {
    fn clear(&mut self);
    fn stroke_line(&mut self, line: Line, width: f64);
    fn fill_rect(&mut self, center: Point, size: f64);
    fn flush(&mut self) -> io::Result<()>;
}

// --- ScreenBuffer for headless rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    cursor_x: u16,
    cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            if self.cursor_y < self.height && self.cursor_x < self.width {
                self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
            }
            self.cursor_x += 1;
        }
    }

    pub fn print_to_log(&self) {
        info!("--- Frame ---");
        for row in &self.buffer {
            info!("{}", row.iter().collect::<String>());
        }
        info!("-------------");
    }
}

impl Write for ScreenBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        self.write_str(&s);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// --- OutputTarget: real stdout or the headless buffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn execute_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(command.0, command.1);
                Ok(())
            }
        }
    }

    pub fn execute_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()), // Ignore in headless mode
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => sb.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(sb) => sb.flush(),
        }
    }
}

// --- GameGrid: one frame's cells ---
pub struct GameGrid {
    pub grid: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn set_char(&mut self, x: u16, y: u16, c: char) {
        if y < self.height && x < self.width {
            self.grid[y as usize][x as usize] = c;
        }
    }

    pub fn clear(&mut self) {
        self.grid = vec![vec![' '; self.width as usize]; self.height as usize];
    }

    pub fn render(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", self.grid[y as usize].iter().collect::<String>())?;
        }
        Ok(())
    }

    pub fn clear_screen_manual(
        &self,
        stdout: &mut OutputTarget,
        terminal_width: u16,
        terminal_height: u16,
    ) -> io::Result<()> {
        for y in 0..terminal_height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", " ".repeat(terminal_width as usize))?;
        }
        stdout.execute_move_to(MoveTo(0, 0))?;
        Ok(())
    }
}

/// Renders the world plane onto a terminal cell grid.
pub struct TerminalRenderer {
    grid: GameGrid,
    out: OutputTarget,
    world: Point,
}

impl TerminalRenderer {
    pub fn new(cols: u16, rows: u16, world: Point, out: OutputTarget) -> Self {
        TerminalRenderer {
            grid: GameGrid::new(cols, rows),
            out,
            world,
        }
    }

    #[cfg(test)]
    pub fn grid(&self) -> &GameGrid {
        &self.grid
    }

    fn to_cell(&self, p: Point) -> (i64, i64) {
        let cx = (p.x * (self.grid.width.saturating_sub(1)) as f64 / self.world.x).round() as i64;
        let cy = (p.y * (self.grid.height.saturating_sub(1)) as f64 / self.world.y).round() as i64;
        (cx, cy)
    }

    fn plot(&mut self, x: i64, y: i64, c: char) {
        if x >= 0 && y >= 0 && x < self.grid.width as i64 && y < self.grid.height as i64 {
            self.grid.set_char(x as u16, y as u16, c);
        }
    }

    /// A cell has no stroke width, so the width picks the glyph instead:
    /// heavy for the ship, light for thin outlines and fading debris.
    fn stroke_char(width: f64) -> char {
        if width >= 3.0 {
            '#'
        } else if width >= 1.5 {
            '+'
        } else {
            '*'
        }
    }
}

impl Renderer for TerminalRenderer {
    fn clear(&mut self) {
        self.grid.clear();
    }

    fn stroke_line(&mut self, line: Line, width: f64) {
        let c = Self::stroke_char(width);
        let (mut x0, mut y0) = self.to_cell(line.a);
        let (x1, y1) = self.to_cell(line.b);

        // Bresenham over cells; off-grid cells are dropped by plot().
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, c);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn fill_rect(&mut self, center: Point, _size: f64) {
        // A bullet is below cell resolution; one cell is its whole footprint.
        let (x, y) = self.to_cell(center);
        self.plot(x, y, 'o');
    }

    fn flush(&mut self) -> io::Result<()> {
        if let OutputTarget::ScreenBuffer(sb) = &mut self.out {
            for y in 0..self.grid.height.min(sb.height) {
                for x in 0..self.grid.width.min(sb.width) {
                    sb.buffer[y as usize][x as usize] = self.grid.grid[y as usize][x as usize];
                }
            }
            sb.print_to_log();
            return Ok(());
        }
        self.grid.render(&mut self.out)?;
        self.out.flush()
    }
}
