//! Paginated text viewer.
//!
//! The pager holds an open file and a top-line offset, renders one fixed
//! window of numbered lines at a time, and pages forward and backward on
//! key events until an exit key. Rendering re-seeks to the start of the
//! file and skips `offset` lines every pass. O(total lines) per page, which
//! is fine for files a person reads interactively; the seam exists so an
//! indexed strategy could replace it without changing observable behavior.
//!
//! Entry gates, in order: viewport below the minimum geometry declines
//! silently; an unopenable file declines silently; a file above the size
//! threshold requires one confirmation keypress, and any other key aborts.
//! The handle is released on every exit path, including that abort.

use tracing::debug;

use crate::screen::{Key, Screen};
use crate::settings::PagerSettings;
use crate::util::human_size;
use crate::vfs::{FileHandle, FileSource, OpenFlags};

/// Row pitch in pixels.
pub const FONT_SPACE: u32 = 20;

/// The single designated confirm key for the large-file gate.
pub const CONFIRM_KEY: char = 'y';

const END_MARKER: &str = "                    --- END ---";

/// Display label for the file's assumed text encoding. Label only, the
/// pager performs no transcoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Gbk,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Gbk => "GBK",
        }
    }
}

/// The text-viewing state machine.
pub struct TextPager {
    settings: PagerSettings,
    encoding: TextEncoding,
}

impl TextPager {
    pub fn new(settings: PagerSettings) -> Self {
        TextPager {
            settings,
            encoding: TextEncoding::default(),
        }
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// View `path` on `screen`, blocking until the exit key.
    pub fn view(&self, files: &dyn FileSource, path: &str, screen: &mut dyn Screen) {
        if screen.width() < self.settings.min_width
            || screen.height() < self.settings.min_height
        {
            debug!(
                width = screen.width(),
                height = screen.height(),
                "viewport too small, declining"
            );
            return;
        }
        let Some(mut file) = files.open(path, OpenFlags::CAT) else {
            debug!(path, "open failed, nothing to view");
            return;
        };

        if file.size() > self.settings.large_file_bytes {
            screen.print(
                0,
                0,
                &format!("Are you sure to open large text file {}?", file.name()),
            );
            screen.print(0, FONT_SPACE, "Press [Y] to continue.");
            if screen.read_key() != Key::Char(CONFIRM_KEY) {
                debug!(path, "large-file gate declined");
                return;
            }
        }

        let page = self.settings.page_lines;
        let mut top: usize = 0;
        loop {
            screen.clear();
            screen.print(
                0,
                FONT_SPACE,
                &format!(
                    "FILE: {} ({}) ENCODING: {}",
                    path,
                    human_size(file.size()),
                    self.encoding.label()
                ),
            );
            self.render_page(file.as_mut(), top, page, 2 * FONT_SPACE, screen);
            screen.print(0, screen.height() - 4, "↑ Page Up  ↓ Page Down  [ESC] Exit");

            // Only three keys mean anything; keep blocking on the rest.
            let key = loop {
                match screen.read_key() {
                    k @ (Key::Esc | Key::Up | Key::Down) => break k,
                    _ => continue,
                }
            };
            match key {
                Key::Esc => break,
                Key::Down => {
                    // Probe-then-advance: never page past end of file.
                    if !file.is_eof() {
                        top += page;
                    }
                }
                Key::Up => top = top.saturating_sub(page),
                _ => unreachable!(),
            }
        }
    }

    /// Render `count` numbered lines starting at line `from`, drawing from
    /// pixel row `y`. Restarts from the top of the file each call.
    fn render_page(
        &self,
        file: &mut dyn FileHandle,
        from: usize,
        count: usize,
        y: u32,
        screen: &mut dyn Screen,
    ) {
        file.rewind();
        for _ in 0..from {
            if file.is_eof() {
                screen.print(0, y, END_MARKER);
                return;
            }
            let _ = file.read_line();
        }
        for i in 0..count {
            let row = y + FONT_SPACE * i as u32;
            if file.is_eof() {
                screen.print(0, row, END_MARKER);
                return;
            }
            match file.read_line() {
                Some(line) => screen.print(0, row, &format!("{:>20} {}", from + i + 1, line)),
                None => screen.print(0, row, &format!("{:>20} (null)", from + i + 1)),
            }
        }
    }
}
