//! Display surface seam for the pager.
//!
//! The engine draws through [`Screen`]: pixel-positioned text, a clear
//! operation, and one blocking key read. [`StdioScreen`] is the plain
//! terminal implementation used by the CLI; [`FakeScreen`] records every
//! operation and replays scripted keys, which is what the pager tests run
//! against.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Keys the engine cares about. Everything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Esc,
    Up,
    Down,
    Char(char),
    Other,
}

/// A drawable surface with blocking key input.
pub trait Screen {
    /// Viewport width in pixels.
    fn width(&self) -> u32;
    /// Viewport height in pixels.
    fn height(&self) -> u32;
    fn clear(&mut self);
    /// Draw `text` with its top-left corner at pixel position (x, y).
    fn print(&mut self, x: u32, y: u32, text: &str);
    /// Block until one key is available.
    fn read_key(&mut self) -> Key;
}

/// Line-oriented terminal surface for the CLI binary.
///
/// Runs in cooked mode: a "key" is the first character of an input line
/// (`u` = up, `d` = down, `q` or an empty line = exit). Pixel coordinates
/// degrade to plain sequential lines.
pub struct StdioScreen {
    width: u32,
    height: u32,
}

impl StdioScreen {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Screen for StdioScreen {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        print!("\x1b[2J\x1b[H");
        let _ = std::io::stdout().flush();
    }

    fn print(&mut self, _x: u32, _y: u32, text: &str) {
        println!("{}", text);
    }

    fn read_key(&mut self) -> Key {
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line).is_err() {
            return Key::Esc;
        }
        match line.trim().chars().next() {
            None => Key::Esc,
            Some('q') => Key::Esc,
            Some('u') => Key::Up,
            Some('d') => Key::Down,
            Some(c) => Key::Char(c),
        }
    }
}

/// Recorded draw operation, for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenOp {
    Clear,
    Print { x: u32, y: u32, text: String },
}

/// Scripted in-memory screen used by tests.
pub struct FakeScreen {
    width: u32,
    height: u32,
    keys: VecDeque<Key>,
    pub ops: Vec<ScreenOp>,
}

impl FakeScreen {
    pub fn new(width: u32, height: u32) -> Self {
        FakeScreen {
            width,
            height,
            keys: VecDeque::new(),
            ops: Vec::new(),
        }
    }

    /// Queue keys to be returned by `read_key`, in order. When the queue
    /// runs dry, `read_key` yields `Esc` so loops always terminate.
    pub fn with_keys(mut self, keys: impl IntoIterator<Item = Key>) -> Self {
        self.keys.extend(keys);
        self
    }

    /// All text drawn since construction, in draw order.
    pub fn printed_lines(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                ScreenOp::Print { text, .. } => Some(text.as_str()),
                ScreenOp::Clear => None,
            })
            .collect()
    }
}

impl Screen for FakeScreen {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.push(ScreenOp::Clear);
    }

    fn print(&mut self, x: u32, y: u32, text: &str) {
        self.ops.push(ScreenOp::Print {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn read_key(&mut self) -> Key {
        self.keys.pop_front().unwrap_or(Key::Esc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_screen_records_ops() {
        let mut s = FakeScreen::new(1024, 768);
        s.clear();
        s.print(0, 20, "hello");
        assert_eq!(s.ops.len(), 2);
        assert_eq!(s.printed_lines(), vec!["hello"]);
    }

    #[test]
    fn test_fake_screen_keys_drain_to_esc() {
        let mut s = FakeScreen::new(1024, 768).with_keys([Key::Down, Key::Char('y')]);
        assert_eq!(s.read_key(), Key::Down);
        assert_eq!(s.read_key(), Key::Char('y'));
        assert_eq!(s.read_key(), Key::Esc);
    }
}
