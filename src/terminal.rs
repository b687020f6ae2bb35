use crate::animation::{Canvas, InputEvent, InputSource};
use crate::config::Rgb;
use crate::render::GlyphMetrics;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    alternate_screen: bool,
    picture: (usize, usize),
    origin: (i32, i32),
}

/// A single cell in the terminal buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg: None,
        }
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb { r: c.r, g: c.g, b: c.b }
    }
}

impl Terminal {
    /// Initialize the terminal for drawing
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = size()?;

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        Ok(Self::with_size(width, height, alternate_screen))
    }

    /// Buffer-only terminal that never touches the tty (for print mode)
    pub fn offscreen(width: u16, height: u16) -> Self {
        Self::with_size(width, height, false)
    }

    fn with_size(width: u16, height: u16, alternate_screen: bool) -> Self {
        Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            alternate_screen,
            picture: (0, 0),
            origin: (0, 0),
        }
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn set_title(&self, title: &str) -> io::Result<()> {
        if self.alternate_screen {
            execute!(stdout(), SetTitle(title))?;
        }
        Ok(())
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    /// Set a character at position with optional color, clipped to the buffer
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let cell = &mut self.buffer[y as usize][x as usize];
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.buffer.get(y as usize)?.get(x as usize)
    }

    /// Keep the picture centered, pinned to the top-left when it does not fit
    fn recenter(&mut self) {
        let (pw, ph) = self.picture;
        let ox = (self.width as usize).saturating_sub(pw) / 2;
        let oy = (self.height as usize).saturating_sub(ph) / 2;
        self.origin = (ox as i32, oy as i32);
    }

    /// Render the entire buffer to screen
    pub fn render(&self) -> io::Result<()> {
        let mut out = stdout().lock();
        let mut fg = None;
        let mut bg = None;

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;

            for cell in row {
                if cell.bg != bg {
                    match cell.bg {
                        Some(color) => queue!(out, SetBackgroundColor(color))?,
                        None => queue!(out, SetBackgroundColor(Color::Reset))?,
                    }
                    bg = cell.bg;
                }
                if cell.fg != fg {
                    match cell.fg {
                        Some(color) => queue!(out, SetForegroundColor(color))?,
                        None => queue!(out, SetForegroundColor(Color::Reset))?,
                    }
                    fg = cell.fg;
                }
                queue!(out, Print(cell.ch))?;
            }
        }

        queue!(out, ResetColor)?;
        out.flush()
    }

    /// Write the buffer as ANSI-colored lines (for print mode)
    pub fn write_ansi<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for row in &self.buffer {
            for cell in row {
                if let Some(color) = cell.bg {
                    queue!(out, SetBackgroundColor(color))?;
                }
                if let Some(color) = cell.fg {
                    queue!(out, SetForegroundColor(color))?;
                }
                queue!(out, Print(cell.ch))?;
            }
            queue!(out, ResetColor, Print('\n'))?;
        }
        out.flush()
    }

    pub fn print_to_stdout(&self) -> io::Result<()> {
        self.write_ansi(&mut stdout().lock())
    }
}

impl GlyphMetrics for Terminal {
    /// Every glyph occupies exactly one cell
    fn measure_glyph(&self, _ch: char) -> (usize, usize) {
        (1, 1)
    }
}

impl Canvas for Terminal {
    fn fit(&mut self, width: usize, height: usize) -> io::Result<()> {
        if width > self.width as usize || height > self.height as usize {
            log::warn!(
                "tree needs {}x{} cells but the terminal is {}x{}, it will be clipped",
                width,
                height,
                self.width,
                self.height
            );
        }
        self.picture = (width, height);
        self.recenter();
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = vec![vec![Cell::default(); width as usize]; height as usize];
        self.recenter();
    }

    fn clear(&mut self, background: Rgb) {
        let bg = Some(Color::from(background));
        for row in &mut self.buffer {
            for cell in row {
                *cell = Cell { ch: ' ', fg: None, bg };
            }
        }
    }

    fn draw_glyph(&mut self, ch: char, color: Rgb, x: usize, y: usize) {
        let (ox, oy) = self.origin;
        self.set(ox + x as i32, oy + y as i32, ch, Some(Color::from(color)));
    }

    fn present(&mut self) -> io::Result<()> {
        self.render()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), ResetColor, Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

/// Keyboard and resize events from crossterm
pub struct KeyInput;

impl InputSource for KeyInput {
    /// Drain queued events without blocking; the first cancel or resize wins
    fn poll(&mut self) -> io::Result<Option<InputEvent>> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if is_cancel(key.code, key.modifiers) {
                        return Ok(Some(InputEvent::Cancel));
                    }
                }
                Event::Resize(w, h) => return Ok(Some(InputEvent::Resize(w, h))),
                _ => {}
            }
        }
        Ok(None)
    }
}

/// q, Esc, or Ctrl-C (raw mode swallows SIGINT)
pub fn is_cancel(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgb = Rgb::new(0x26, 0x26, 0x26);

    #[test]
    fn cancel_keys() {
        assert!(is_cancel(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(is_cancel(KeyCode::Esc, KeyModifiers::NONE));
        assert!(is_cancel(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!is_cancel(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!is_cancel(KeyCode::Char(' '), KeyModifiers::NONE));
    }

    #[test]
    fn picture_is_centered() {
        let mut term = Terminal::offscreen(21, 10);
        term.fit(5, 4).unwrap();
        term.clear(BG);
        term.draw_glyph('+', Rgb::new(232, 189, 32), 0, 0);

        assert_eq!(term.cell(8, 3).unwrap().ch, '+');
        assert_eq!(term.cell(8, 3).unwrap().fg, Some(Color::Rgb { r: 232, g: 189, b: 32 }));
        assert_eq!(term.cell(0, 0).unwrap().bg, Some(Color::from(BG)));
    }

    #[test]
    fn oversized_picture_is_clipped() {
        let mut term = Terminal::offscreen(4, 2);
        term.fit(10, 10).unwrap();
        term.clear(BG);
        term.draw_glyph('#', BG, 0, 0);
        term.draw_glyph('#', BG, 9, 9);

        assert_eq!(term.cell(0, 0).unwrap().ch, '#');
        assert!(term.cell(9, 9).is_none());
    }

    #[test]
    fn resize_recenters() {
        let mut term = Terminal::offscreen(5, 4);
        term.fit(5, 4).unwrap();
        term.resize(15, 8);
        term.clear(BG);
        term.draw_glyph('H', BG, 0, 0);

        assert_eq!(term.size(), (15, 8));
        assert_eq!(term.cell(5, 2).unwrap().ch, 'H');
    }

    #[test]
    fn ansi_output_has_one_line_per_row() {
        let mut term = Terminal::offscreen(3, 2);
        term.fit(3, 2).unwrap();
        term.clear(BG);
        term.draw_glyph('o', Rgb::new(255, 0, 0), 1, 0);

        let mut out = Vec::new();
        term.write_ansi(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 2);
        assert!(text.contains('o'));
        assert!(text.contains("38;2;255;0;0"));
    }
}
