use std::io::{self, Write};
use log::info;
use crossterm::{
    cursor::MoveTo,
    execute,
};

use crate::game::Status;
use crate::snapshot::Frame;
use crate::types::{Arena, Vector2D};

const ASTEROID_CHAR: char = '@';
const LASER_CHAR: char = '*';
const SHIP_CHAR: char = '+';

const CONTROLS_TEXT: &str = "W/Up thrust  S/Down brake  A D/Left Right rotate  E stop  Enter/Space fire  Q quit";

// --- ScreenBuffer for headless rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    pub cursor_x: u16,
    pub cursor_y: u16,
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

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn write_char(&mut self, c: char) {
        if self.cursor_y < self.height && self.cursor_x < self.width {
            self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
        }
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            self.write_char(c);
            self.cursor_x = self.cursor_x.saturating_add(1);
        }
    }

    pub fn row(&self, y: u16) -> String {
        self.buffer
            .get(y as usize)
            .map(|row| row.iter().collect())
            .unwrap_or_default()
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for row in &self.buffer {
            info!("{}", row.iter().collect::<String>());
        }
        info!("---------------------");
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

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
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
            },
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

// --- GameGrid: arena geometry rasterized into character cells ---
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

    pub fn set_char(&mut self, x: i32, y: i32, c: char) {
        if x >= 0 && y >= 0 && y < self.height as i32 && x < self.width as i32 {
            self.grid[y as usize][x as usize] = c;
        }
    }

    pub fn get_char(&self, x: u16, y: u16) -> Option<char> {
        self.grid.get(y as usize).and_then(|row| row.get(x as usize)).copied()
    }

    pub fn clear(&mut self) {
        self.grid = vec![vec![' '; self.width as usize]; self.height as usize];
    }

    /// Arena point to the nearest cell. The whole arena is stretched over the grid.
    pub fn project(&self, arena: &Arena, point: Vector2D) -> (i32, i32) {
        let cols = self.width.saturating_sub(1) as f64;
        let rows = self.height.saturating_sub(1) as f64;
        (
            (point.x / arena.width * cols).round() as i32,
            (point.y / arena.height * rows).round() as i32,
        )
    }

    pub fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), c: char) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs());
        if steps == 0 {
            self.set_char(from.0, from.1, c);
            return;
        }
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = from.0 as f64 + dx as f64 * t;
            let y = from.1 as f64 + dy as f64 * t;
            self.set_char(x.round() as i32, y.round() as i32, c);
        }
    }

    pub fn draw_outline(&mut self, arena: &Arena, outline: &[Vector2D], c: char) {
        let cells: Vec<(i32, i32)> = outline.iter().map(|&p| self.project(arena, p)).collect();
        for (i, &from) in cells.iter().enumerate() {
            let to = cells[(i + 1) % cells.len()];
            self.draw_line(from, to, c);
        }
    }

    pub fn render(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", self.grid[y as usize].iter().collect::<String>())?;
        }
        Ok(())
    }

    pub fn clear_screen_manual(&self, stdout: &mut OutputTarget, terminal_width: u16, terminal_height: u16) -> io::Result<()> {
        for y in 0..terminal_height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", " ".repeat(terminal_width as usize))?;
        }
        stdout.execute_move_to(MoveTo(0, 0))?;
        Ok(())
    }
}

/// Arrow for the ship's nose cell, from the facing in degrees (0 = right, 90 = down).
pub fn nose_char(facing: f64) -> char {
    let normalized = facing.rem_euclid(360.0);
    if !(45.0..315.0).contains(&normalized) {
        '>'
    } else if normalized < 135.0 {
        'v'
    } else if normalized < 225.0 {
        '<'
    } else {
        '^'
    }
}

/// Headline for a finished round. A field that emptied without a single kill is not a win.
pub fn banner(frame: &Frame) -> &'static str {
    match frame.status {
        Status::GameOver => "GAME OVER",
        Status::Cleared if frame.tally.asteroids_destroyed > 0 => "ARENA CLEARED",
        Status::Cleared => "FIELD EMPTY",
        Status::Playing => "",
    }
}

/// Draws `Frame`s onto a terminal or a headless buffer.
pub struct Renderer {
    pub target: OutputTarget,
    grid: GameGrid,
}

impl Renderer {
    pub fn new(target: OutputTarget, width: u16, height: u16) -> Self {
        Renderer { target, grid: GameGrid::new(width, height) }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.grid = GameGrid::new(width, height);
        if let OutputTarget::ScreenBuffer(sb) = &mut self.target {
            *sb = ScreenBuffer::new(width, height);
        }
    }

    pub fn clear_screen(&mut self) -> io::Result<()> {
        let (width, height) = (self.grid.width, self.grid.height);
        self.grid.clear_screen_manual(&mut self.target, width, height)?;
        self.target.flush()
    }

    fn write_at(&mut self, x: u16, y: u16, text: &str) -> io::Result<()> {
        self.target.execute_move_to(MoveTo(x, y))?;
        write!(self.target, "{}", text)
    }

    fn write_centered(&mut self, y: u16, text: &str) -> io::Result<()> {
        let x = (self.grid.width / 2).saturating_sub(text.chars().count() as u16 / 2);
        self.write_at(x, y, text)
    }

    pub fn show_title_screen(&mut self) -> io::Result<()> {
        self.clear_screen()?;
        let title_art = [
            r"    _   ___ _____ ___ ___  ___ ___ ___ ",
            r"   /_\ / __|_   _| __| _ \/ _ \_ _|   \",
            r"  / _ \\__ \ | | | _||   / (_) | || |) |",
            r" /_/ \_\___/ |_| |___|_|_\\___/___|___/ ",
            r"              A R E N A               ",
        ];
        let title_start_y = (self.grid.height / 2).saturating_sub(title_art.len() as u16 / 2 + 2);
        for (i, line) in title_art.iter().enumerate() {
            self.write_centered(title_start_y + i as u16, line)?;
        }
        self.write_centered(self.grid.height.saturating_sub(5), "Press any key to start...")?;
        self.write_centered(self.grid.height.saturating_sub(3), CONTROLS_TEXT)?;
        self.target.flush()
    }

    pub fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        self.grid.clear();

        for outline in &frame.asteroids {
            self.grid.draw_outline(&frame.arena, outline, ASTEROID_CHAR);
        }
        for outline in &frame.lasers {
            self.grid.draw_outline(&frame.arena, outline, LASER_CHAR);
        }
        self.grid.draw_outline(&frame.arena, &frame.ship.outline, SHIP_CHAR);
        let (nose_x, nose_y) = self.grid.project(&frame.arena, frame.ship.nose);
        self.grid.set_char(nose_x, nose_y, nose_char(frame.ship.facing));

        self.grid.render(&mut self.target)?;

        let hud = format!("{}  Lives: {}", frame.score_text, frame.lives);
        self.write_at(0, 0, &hud)?;

        let bottom = self.grid.height.saturating_sub(1);
        match &frame.results_text {
            Some(results) => {
                let middle = self.grid.height / 2;
                self.write_centered(middle.saturating_sub(1), banner(frame))?;
                self.write_centered(middle + 1, "R: restart   Q: exit")?;
                self.write_at(0, bottom, results)?;
            }
            None => self.write_at(0, bottom, CONTROLS_TEXT)?,
        }

        self.target.flush()?;
        Ok(())
    }
}
