//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Frames are diffed against the previous one and only changed runs are
//! written. Entering the terminal also asks for key release events where the
//! terminal supports them, so held keys can be tracked exactly.

use std::io::{self, Write};

use anyhow::{Context, Result};

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    release_events: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
            release_events: false,
        }
    }

    /// Switch to raw mode on the alternate screen
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        // Not every terminal answers the query; treat errors as unsupported.
        self.release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);

        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        if self.release_events {
            self.buf.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        self.flush_buf().context("failed to set up terminal")?;
        Ok(())
    }

    /// Restore the terminal; safe to call after a failed `enter`
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        if self.release_events {
            self.buf.queue(PopKeyboardEnhancementFlags)?;
        }
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf().context("failed to restore terminal")?;
        terminal::disable_raw_mode().context("failed to disable raw mode")?;
        Ok(())
    }

    /// Whether the terminal reports key releases
    pub fn release_events(&self) -> bool {
        self.release_events
    }

    /// Force the next draw to be a full redraw, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a framebuffer, swapping it into internal state.
    ///
    /// Callers keep one `FrameBuffer` and pass it in every frame. After the
    /// diff the buffers are swapped, so the caller gets the previous frame
    /// back to render into.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let mut prev = match self.last.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_frame_into(Some(&prev), fb, &mut self.buf)?;
                prev
            }
            stale => {
                encode_frame_into(None, fb, &mut self.buf)?;
                let mut prev = stale.unwrap_or_else(|| FrameBuffer::new(0, 0));
                prev.resize(fb.width(), fb.height());
                prev
            }
        };
        self.flush_buf()?;

        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `next` into terminal commands.
///
/// With a same-sized `prev` only the changed runs of each row are written;
/// otherwise the screen is cleared and every row is written.
pub(crate) fn encode_frame_into(
    prev: Option<&FrameBuffer>,
    next: &FrameBuffer,
    out: &mut Vec<u8>,
) -> Result<()> {
    let mut writer = RunWriter { out, style: None };

    match prev {
        Some(prev) => {
            for y in 0..next.height() {
                for (x, len) in changed_runs(prev, next, y) {
                    writer.run(next, x, y, len)?;
                }
            }
        }
        None => {
            writer.out.queue(terminal::Clear(terminal::ClearType::All))?;
            for y in 0..next.height() {
                writer.run(next, 0, y, next.width())?;
            }
        }
    }

    writer.out.queue(ResetColor)?;
    writer.out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Queues cell runs, emitting style changes only when the style differs
struct RunWriter<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl RunWriter<'_> {
    fn run(&mut self, fb: &FrameBuffer, x: u16, y: u16, len: u16) -> Result<()> {
        self.out.queue(cursor::MoveTo(x, y))?;
        for cell in (x..x + len).filter_map(|cx| fb.get(cx, y)) {
            if self.style != Some(cell.style) {
                self.apply(cell.style)?;
            }
            self.out.queue(Print(cell.ch))?;
        }
        Ok(())
    }

    fn apply(&mut self, style: CellStyle) -> Result<()> {
        self.out.queue(SetForegroundColor(style.fg.into()))?;
        self.out.queue(SetBackgroundColor(style.bg.into()))?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        if style.bold {
            self.out.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            self.out.queue(SetAttribute(Attribute::Dim))?;
        }
        self.style = Some(style);
        Ok(())
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        }
    }
}

/// `(start, len)` of each run of cells in row `y` that differ between frames
fn changed_runs<'a>(
    prev: &'a FrameBuffer,
    next: &'a FrameBuffer,
    y: u16,
) -> impl Iterator<Item = (u16, u16)> + 'a {
    let width = next.width();
    let differs = move |x: u16| prev.get(x, y) != next.get(x, y);
    let mut x = 0;
    std::iter::from_fn(move || {
        while x < width && !differs(x) {
            x += 1;
        }
        if x >= width {
            return None;
        }
        let start = x;
        while x < width && differs(x) {
            x += 1;
        }
        Some((start, x - start))
    })
}
