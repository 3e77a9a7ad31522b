//! Boundary between the physics core and whatever draws the bodies.
//!
//! Positions are already in pixels; a sink only floors them. Appearance
//! (radius, color) lives here rather than on [`crate::bodies::Body`].

pub mod trail;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::bodies::Body;

pub use trail::{Trail, TrailConfig};

/// RGB, 0-255 per channel.
pub type Color = [u8; 3];

/// Presentation attributes of one body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub radius: f64,    // px
    pub color: Color,
}

impl Default for Appearance {
    fn default() -> Self {
        Self { radius: 4.0, color: [255, 255, 255] }
    }
}

/// What a sink receives for one body in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite<'a> {
    pub name: &'a str,
    pub pixel_x: i64,
    pub pixel_y: i64,
    pub radius: f64,
    pub color: Color,
}

impl<'a> Sprite<'a> {
    pub fn new(body: &'a Body, appearance: &Appearance) -> Self {
        let (pixel_x, pixel_y) = to_pixel(&body.pos());
        Self {
            name: body.name(),
            pixel_x,
            pixel_y,
            radius: appearance.radius,
            color: appearance.color,
        }
    }
}

/// Floor a position to integer pixel coordinates.
pub fn to_pixel(pos: &Vector2<f64>) -> (i64, i64) {
    (pos.x.floor() as i64, pos.y.floor() as i64)
}

/// Receives one frame of drawables at a time.
pub trait RenderSink {
    fn begin_frame(&mut self) {}

    /// Recent positions of one body, oldest first. Drawn before bodies.
    fn draw_trail(&mut self, _points: &[Vector2<f64>], _color: Color) {}

    fn draw_body(&mut self, sprite: &Sprite<'_>);

    fn end_frame(&mut self) {}
}

/// Collects sprites per frame; used by the headless binary and tests.
#[derive(Debug, Default)]
pub struct FrameLog {
    pub frames: usize,
    pub last: Vec<(String, i64, i64)>,
    current: Vec<(String, i64, i64)>,
}

impl RenderSink for FrameLog {
    fn begin_frame(&mut self) {
        self.current.clear();
    }

    fn draw_body(&mut self, sprite: &Sprite<'_>) {
        tracing::trace!(
            body = sprite.name,
            x = sprite.pixel_x,
            y = sprite.pixel_y,
            "sprite"
        );
        self.current.push((sprite.name.to_string(), sprite.pixel_x, sprite.pixel_y));
    }

    fn end_frame(&mut self) {
        self.frames += 1;
        std::mem::swap(&mut self.last, &mut self.current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::BodyBuilder;

    #[test]
    fn sprite_floors_position() {
        let body = BodyBuilder::new("Moon").position(10.9, -0.2).build().unwrap();
        let look = Appearance { radius: 2.0, color: [1, 2, 3] };
        let s = Sprite::new(&body, &look);
        assert_eq!((s.pixel_x, s.pixel_y), (10, -1));
        assert_eq!(s.name, "Moon");
        assert_eq!(s.color, [1, 2, 3]);
    }

    #[test]
    fn frame_log_keeps_last_complete_frame() {
        let body = BodyBuilder::new("A").position(1.0, 2.0).build().unwrap();
        let look = Appearance::default();
        let mut log = FrameLog::default();

        log.begin_frame();
        log.draw_body(&Sprite::new(&body, &look));
        log.end_frame();
        log.begin_frame();

        assert_eq!(log.frames, 1);
        assert_eq!(log.last, vec![("A".to_string(), 1, 2)]);
    }
}
