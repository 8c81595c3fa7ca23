//! Keyboard-driven list picker used by `proxy` and `mode`.
//!
//! `Menu` holds the navigation state and is pure; `pick` owns the terminal.

use std::io::{self, Write};
use std::ops::Range;

use colored::Colorize;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};

pub const PAGE_SIZE: usize = 10;

const HINT: &str = "w/↑ s/↓ move · a/← d/→ page · enter select · q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    Selected(usize),
    Cancelled,
}

#[derive(Debug)]
pub struct Menu {
    options: Vec<String>,
    current: Option<usize>,
    cursor: usize,
}

impl Menu {
    /// The cursor starts on `current` when it is a valid index.
    pub fn new(options: Vec<String>, current: Option<usize>) -> Self {
        let current = current.filter(|&idx| idx < options.len());
        Self {
            cursor: current.unwrap_or(0),
            options,
            current,
        }
    }

    /// Moves the cursor to the first entry of the 1-based `page`, or `None`
    /// when that page does not exist.
    pub fn on_page(mut self, page: usize) -> Option<Self> {
        let start = page.checked_sub(1)?.checked_mul(PAGE_SIZE)?;
        if start >= self.options.len() {
            return None;
        }
        self.cursor = start;
        Some(self)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// 1-based page holding the cursor.
    pub fn page(&self) -> usize {
        self.cursor / PAGE_SIZE + 1
    }

    pub fn page_count(&self) -> usize {
        self.options.len().div_ceil(PAGE_SIZE).max(1)
    }

    pub fn visible(&self) -> Range<usize> {
        let start = self.cursor / PAGE_SIZE * PAGE_SIZE;
        start..(start + PAGE_SIZE).min(self.options.len())
    }

    pub fn label(&self, idx: usize) -> String {
        let name = &self.options[idx];
        if Some(idx) == self.current {
            format!("{name} (current)")
        } else {
            name.clone()
        }
    }

    pub fn up(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn down(&mut self) -> bool {
        if self.cursor + 1 >= self.options.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.cursor < PAGE_SIZE {
            return false;
        }
        self.cursor -= PAGE_SIZE;
        true
    }

    /// Lands on the same row of the next page, or its last entry when the
    /// next page is shorter.
    pub fn next_page(&mut self) -> bool {
        if self.page() >= self.page_count() {
            return false;
        }
        self.cursor = (self.cursor + PAGE_SIZE).min(self.options.len() - 1);
        true
    }

    pub fn handle(&mut self, key: KeyEvent) -> Outcome {
        if key.kind != KeyEventKind::Press {
            return Outcome::Pending;
        }
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (_, KeyCode::Char('q'))
            | (_, KeyCode::Esc) => Outcome::Cancelled,
            (_, KeyCode::Enter) if self.is_empty() => Outcome::Cancelled,
            (_, KeyCode::Enter) => Outcome::Selected(self.cursor),
            (_, KeyCode::Char('w')) | (_, KeyCode::Up) => {
                self.up();
                Outcome::Pending
            }
            (_, KeyCode::Char('s')) | (_, KeyCode::Down) => {
                self.down();
                Outcome::Pending
            }
            (_, KeyCode::Char('a')) | (_, KeyCode::Left) => {
                self.prev_page();
                Outcome::Pending
            }
            (_, KeyCode::Char('d')) | (_, KeyCode::Right) => {
                self.next_page();
                Outcome::Pending
            }
            _ => Outcome::Pending,
        }
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        for idx in self.visible() {
            let label = self.label(idx);
            if idx == self.cursor() {
                write!(out, "{} {}\r\n", "›".cyan().bold(), label.cyan().bold())?;
            } else {
                write!(out, "  {label}\r\n")?;
            }
        }
        write!(
            out,
            "\r\n{}\r\n",
            format!("page {}/{} · {HINT}", self.page(), self.page_count()).bright_black()
        )?;
        out.flush()
    }
}

/// Raw mode for the lifetime of the guard; restored even on early return.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), Hide)?;
        Ok(guard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0), Show);
        let _ = disable_raw_mode();
    }
}

/// Runs the menu until the user selects an entry (`Some(index)`) or
/// cancels (`None`).
pub fn pick(mut menu: Menu) -> io::Result<Option<usize>> {
    if menu.is_empty() {
        return Ok(None);
    }

    let _raw = RawModeGuard::enable()?;
    let mut stdout = io::stdout();
    loop {
        menu.render(&mut stdout)?;
        if let Event::Key(key) = event::read()? {
            match menu.handle(key) {
                Outcome::Pending => {}
                Outcome::Selected(idx) => return Ok(Some(idx)),
                Outcome::Cancelled => return Ok(None),
            }
        }
    }
}
