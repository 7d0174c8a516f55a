//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use std::fmt::Write as _;

use arrayvec::ArrayString;

use crate::core::GameSnapshot;
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Columns reserved to the right of the board frame
const PANEL_WIDTH: u16 = 14;
/// Gap between board frame and panel
const PANEL_GAP: u16 = 2;

const WELL_BG: Rgb = Rgb::new(24, 24, 32);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Fixed per-kind palette
pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::Z => Rgb::new(220, 80, 80),
    }
}

/// Draws the well, the ghost, the side panel and the pause/game-over overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub const MAX_CELL_WIDTH: u16 = 4;

    /// A view with board cells `cell_w` columns wide (clamped to 1..=4)
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.clamp(1, Self::MAX_CELL_WIDTH),
        }
    }

    pub fn cell_width(&self) -> u16 {
        self.cell_w
    }

    fn frame_size(&self) -> (u16, u16) {
        (
            u16::from(BOARD_WIDTH) * self.cell_w + 2,
            u16::from(BOARD_HEIGHT) + 2,
        )
    }

    /// Smallest viewport that shows board and panel without clipping
    pub fn required_size(&self) -> Viewport {
        let (frame_w, frame_h) = self.frame_size();
        Viewport::new(frame_w + PANEL_GAP + PANEL_WIDTH, frame_h)
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    ///
    /// Callers can reuse a framebuffer across frames.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear();

        let (frame_w, frame_h) = self.frame_size();
        let needed = self.required_size();
        let origin_x = viewport.width.saturating_sub(needed.width) / 2;
        let origin_y = viewport.height.saturating_sub(needed.height) / 2;

        fb.draw_box(origin_x, origin_y, frame_w, frame_h, Style::fg(Rgb::new(200, 200, 200)));
        self.draw_well(fb, snap, origin_x + 1, origin_y + 1);
        self.draw_panel(fb, snap, origin_x + frame_w + PANEL_GAP, origin_y);

        if snap.game_over {
            self.draw_overlay(fb, origin_x, origin_y, frame_w, frame_h, "GAME OVER", "Enter: restart");
        } else if snap.paused {
            self.draw_overlay(fb, origin_x, origin_y, frame_w, frame_h, "PAUSED", "Enter: start");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_well(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, left: u16, top: u16) {
        let ghost = Style::fg(piece_color(snap.active_kind).darken()).on(WELL_BG);
        let empty = Style::fg(Rgb::new(70, 70, 80)).on(WELL_BG).dim();

        for (y, row) in snap.board.rows().enumerate() {
            let py = top + y as u16;
            for (x, cell) in row.iter().enumerate() {
                let px = left + x as u16 * self.cell_w;
                match cell {
                    Some(kind) => {
                        let style = Style::fg(piece_color(*kind)).on(WELL_BG);
                        fb.fill_rect(px, py, self.cell_w, 1, '█', style);
                    }
                    None if snap.is_ghost_at(x as i8, y as i8) => {
                        fb.fill_rect(px, py, self.cell_w, 1, '░', ghost);
                    }
                    None => {
                        fb.fill_rect(px, py, self.cell_w, 1, ' ', empty);
                        fb.put_char(px + self.cell_w - 1, py, '·', empty);
                    }
                }
            }
        }
    }

    fn draw_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, x: u16, top: u16) {
        let label = Style::PLAIN.bold();
        let value = Style::fg(Rgb::new(200, 200, 200));

        let mut y = top;
        for (name, number) in [("SCORE", snap.score), ("LEVEL", snap.level), ("LINES", snap.lines)] {
            fb.put_str(x, y, name, label);
            put_number(fb, x, y + 1, number, value);
            y += 3;
        }

        fb.put_str(x, y, "HOLD", label);
        match snap.hold {
            Some(kind) => {
                let style = if snap.can_hold { value } else { value.dim() };
                fb.put_char(x, y + 1, kind.letter(), style.with_fg(piece_color(kind)));
                if !snap.can_hold {
                    fb.put_str(x + 2, y + 1, "(used)", style);
                }
            }
            None => fb.put_char(x, y + 1, '-', value),
        }
        y += 3;

        fb.put_str(x, y, "NEXT", label);
        for (i, kind) in snap.next_queue.iter().enumerate() {
            fb.put_char(x, y + 1 + i as u16, kind.letter(), value.with_fg(piece_color(*kind)));
        }
    }

    fn draw_overlay(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        frame_w: u16,
        frame_h: u16,
        title: &str,
        hint: &str,
    ) {
        let mid = y + frame_h / 2;
        for (dy, text, style) in [
            (0, title, Style::fg(Rgb::new(255, 255, 255)).bold()),
            (1, hint, Style::PLAIN.dim()),
        ] {
            let w = text.chars().count() as u16;
            fb.put_str(x + frame_w.saturating_sub(w) / 2, mid + dy, text, style);
        }
    }
}

fn put_number(fb: &mut FrameBuffer, x: u16, y: u16, n: u32, style: Style) {
    let mut text = ArrayString::<10>::new();
    // u32::MAX has ten digits, so this cannot overflow the buffer.
    let _ = write!(text, "{n}");
    fb.put_str(x, y, &text, style);
}
