/// Terminal display sink: presents completed frames as half-block cells.
///
/// Each terminal cell shows two stacked pixels ('▀' with independent
/// fg/bg colors). Frames are scaled to the terminal with nearest-neighbor
/// sampling and letterboxed to keep the aspect. A diff against the last
/// presented frame keeps the byte stream small: only changed cells emit
/// cursor moves and color changes, batched and flushed once per present.
///
/// The sink only ever reads the frame it is handed; it owns no game
/// state and never draws between presents.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::gfx::palette::Palette;
use crate::gfx::screen::DisplaySink;
use crate::gfx::surface::Surface;

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    fg: (u8, u8, u8),
    bg: (u8, u8, u8),
}

const BLANK: Cell = Cell {
    fg: (0, 0, 0),
    bg: (0, 0, 0),
};

pub struct TerminalSink {
    writer: BufWriter<Stdout>,
    /// Last presented frame, one entry per terminal cell.
    back: Vec<Cell>,
    term_w: u16,
    term_h: u16,
    force_redraw: bool,
    enhanced: bool,
}

impl TerminalSink {
    pub fn new() -> TerminalSink {
        TerminalSink {
            writer: BufWriter::new(io::stdout()),
            back: vec![],
            term_w: 0,
            term_h: 0,
            force_redraw: true,
            enhanced: false,
        }
    }

    /// Enter raw mode and the alternate screen. Returns whether the
    /// terminal reports key release events.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(self.writer, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        self.enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.enhanced {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        Ok(self.enhanced)
    }
}

/// Restore the terminal, for teardown after the sink has been handed
/// to the screen.
pub fn cleanup_terminal(enhanced: bool) -> io::Result<()> {
    let mut out = io::stdout();
    if enhanced {
        execute!(out, PopKeyboardEnhancementFlags)?;
    }
    execute!(out, ResetColor, cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()
}

impl TerminalSink {
    fn sync_size(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size()?;
        if tw != self.term_w || th != self.term_h {
            self.term_w = tw;
            self.term_h = th;
            self.back = vec![BLANK; tw as usize * th as usize];
            self.force_redraw = true;
            queue!(self.writer, Clear(ClearType::All))?;
        }
        Ok(())
    }

    /// Scale, diff and emit one frame. `rgb_at` samples source pixels.
    fn draw_frame<F>(&mut self, src_w: u32, src_h: u32, rgb_at: F) -> io::Result<()>
    where
        F: Fn(u32, u32) -> (u8, u8, u8),
    {
        self.sync_size()?;
        if self.term_w == 0 || self.term_h == 0 {
            return Ok(());
        }

        // Cell grid is term_w x term_h; pixel grid is term_w x 2*term_h.
        let scale = (self.term_w as f32 / src_w as f32)
            .min(2.0 * self.term_h as f32 / src_h as f32);
        let cells_w = ((src_w as f32 * scale) as u16).clamp(1, self.term_w);
        let cells_h = (((src_h as f32 * scale) / 2.0) as u16).clamp(1, self.term_h);
        let off_x = (self.term_w - cells_w) / 2;
        let off_y = (self.term_h - cells_h) / 2;

        let sample = |cx: u16, cy: u16, half: u32| -> (u8, u8, u8) {
            let sx = ((cx as f32 + 0.5) / scale) as u32;
            let sy = ((cy as f32 * 2.0 + half as f32 + 0.5) / scale) as u32;
            rgb_at(sx.min(src_w - 1), sy.min(src_h - 1))
        };

        let mut last_fg: Option<(u8, u8, u8)> = None;
        let mut last_bg: Option<(u8, u8, u8)> = None;
        let mut cursor_at: Option<(u16, u16)> = None;

        for cy in 0..cells_h {
            for cx in 0..cells_w {
                let cell = Cell {
                    fg: sample(cx, cy, 0),
                    bg: sample(cx, cy, 1),
                };
                let tx = off_x + cx;
                let ty = off_y + cy;
                let idx = ty as usize * self.term_w as usize + tx as usize;

                if !self.force_redraw && self.back[idx] == cell {
                    cursor_at = None;
                    continue;
                }
                self.back[idx] = cell;

                if cursor_at != Some((tx, ty)) {
                    queue!(self.writer, MoveTo(tx, ty))?;
                }
                if last_fg != Some(cell.fg) {
                    let (r, g, b) = cell.fg;
                    queue!(self.writer, SetForegroundColor(Color::Rgb { r, g, b }))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    let (r, g, b) = cell.bg;
                    queue!(self.writer, SetBackgroundColor(Color::Rgb { r, g, b }))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.writer, Print('▀'))?;
                cursor_at = Some((tx + 1, ty));
            }
            cursor_at = None;
        }

        self.force_redraw = false;
        self.writer.flush()
    }
}

impl DisplaySink for TerminalSink {
    fn present_indexed(&mut self, surface: &Surface, palette: &Palette) -> io::Result<()> {
        let w = surface.width();
        let pixels = surface.pixels();
        self.draw_frame(w, surface.height(), |x, y| {
            let [r, g, b] = palette.rgb(pixels[(y * w + x) as usize]);
            (r, g, b)
        })
    }

    fn present_rgba(&mut self, width: u32, height: u32, rgba: &[u8]) -> io::Result<()> {
        self.draw_frame(width, height, |x, y| {
            let i = ((y * width + x) * 4) as usize;
            (rgba[i], rgba[i + 1], rgba[i + 2])
        })
    }
}
