/// Animated sprite effects (explosions)

use super::components::{SpriteAnimation, SpriteFrame};
use crate::assets::SpriteSheet;

/// Milliseconds each explosion frame stays on screen
pub const EXPLOSION_FRAME_MS: f32 = 100.0;

impl SpriteAnimation {
    /// Play `sheet` once at `frame_ms` per frame
    pub fn once(sheet: SpriteSheet, frame_ms: f32) -> Self {
        Self {
            sheet,
            frame_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Total playing time of one pass over the sheet
    pub fn duration_ms(&self) -> f32 {
        self.sheet.frame_count() as f32 * self.frame_ms
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed_ms += dt * 1000.0;
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms()
    }

    /// Index of the frame currently shown, holding the last one when done
    pub fn current_frame(&self) -> u32 {
        let count = self.sheet.frame_count();
        if count == 0 || self.frame_ms <= 0.0 {
            return 0;
        }
        ((self.elapsed_ms / self.frame_ms) as u32).min(count - 1)
    }

    /// Pixel rectangle of the current frame, row-major across the sheet
    pub fn frame_rect(&self) -> SpriteFrame {
        let index = self.current_frame();
        let columns = self.sheet.grid.x.max(1);
        let size = self.sheet.frame_size;
        SpriteFrame {
            x: (index % columns) * size.x,
            y: (index / columns) * size.y,
            width: size.x,
            height: size.y,
        }
    }
}
