use image::imageops::FilterType;
use kurbo::Rect;

use crate::foundation::core::{CHANNELS, FrameSize};
use crate::foundation::error::{DelayError, DelayResult};
use crate::render::frame::Frame;

/// Fractions of the frame kept by the crop-on-black step.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CropRatios {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for CropRatios {
    fn default() -> Self {
        Self {
            left: 0.15,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
        }
    }
}

/// Cosmetic transforms applied to every finished frame before it reaches the sink.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PostConfig {
    /// Centre zoom factor; values `<= 1` disable zooming.
    pub zoom: f64,
    /// Mirror left and right.
    pub flip: bool,
    /// Initial state of crop-on-black (toggled at run time with `c`/`f`).
    pub crop_frame: bool,
    pub crop: CropRatios,
    /// Remove the central border strips of a four-screen wall.
    pub crop_border: bool,
    pub border_width_ratio: f64,
    pub border_height_ratio: f64,
    /// Final output size; `None` keeps the composed size.
    pub output_size: Option<FrameSize>,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            flip: false,
            crop_frame: false,
            crop: CropRatios::default(),
            crop_border: false,
            border_width_ratio: 2.596 / 332.644,
            border_height_ratio: 3.124 / 188.776,
            output_size: Some(FrameSize {
                width: 1920,
                height: 1080,
            }),
        }
    }
}

impl PostConfig {
    /// No transform at all; frames pass through untouched.
    pub fn identity() -> Self {
        Self {
            output_size: None,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> DelayResult<()> {
        if !self.zoom.is_finite() || self.zoom < 1.0 {
            return Err(DelayError::validation(format!(
                "zoom must be a finite value >= 1, got {}",
                self.zoom
            )));
        }
        let c = self.crop;
        for (name, v) in [
            ("left", c.left),
            ("right", c.right),
            ("top", c.top),
            ("bottom", c.bottom),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(DelayError::validation(format!(
                    "crop ratio '{name}' must be within [0, 1], got {v}"
                )));
            }
        }
        for (name, v) in [
            ("border_width_ratio", self.border_width_ratio),
            ("border_height_ratio", self.border_height_ratio),
        ] {
            if !(0.0..1.0).contains(&v) {
                return Err(DelayError::validation(format!(
                    "{name} must be within [0, 1), got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Integer pixel rectangle `(x, y, w, h)` of `r` clipped to a `width × height` frame.
fn pixel_rect(r: Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let bounds = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
    let r = r.intersect(bounds);
    let (x, y) = (r.x0 as u32, r.y0 as u32);
    let (w, h) = (r.width() as u32, r.height() as u32);
    (w > 0 && h > 0).then_some((x, y, w, h))
}

/// Centre rectangle shown at `zoom`.
pub fn zoom_rect(size: FrameSize, zoom: f64) -> Rect {
    let (w, h) = (f64::from(size.width), f64::from(size.height));
    let margin = (zoom - 1.0) / zoom;
    // Each coordinate truncates on its own.
    let x = (w * margin / 2.0).trunc();
    let y = (h * margin / 2.0).trunc();
    Rect::from_origin_size((x, y), ((w / zoom).trunc(), (h / zoom).trunc()))
}

/// Region kept visible by crop-on-black.
pub fn crop_rect(size: FrameSize, c: CropRatios) -> Rect {
    let (w, h) = (f64::from(size.width), f64::from(size.height));
    Rect::from_origin_size(
        ((w * c.left).trunc(), (h * c.top).trunc()),
        (
            (w * (1.0 - c.left + c.right)).trunc(),
            (h * (1.0 - c.top + c.bottom)).trunc(),
        ),
    )
}

/// Geometry of the border-strip removal for one frame size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderLayout {
    pub border_width: u32,
    pub border_height: u32,
    pub screen_width: u32,
    pub screen_height: u32,
}

impl BorderLayout {
    pub fn new(size: FrameSize, width_ratio: f64, height_ratio: f64) -> Self {
        let even = |len: u32, ratio: f64| ((f64::from(len) * ratio / 2.0).round() as u32) * 2;
        let border_width = even(size.width, width_ratio).min(size.width);
        let border_height = even(size.height, height_ratio).min(size.height);
        Self {
            border_width,
            border_height,
            screen_width: (size.width - border_width) / 2,
            screen_height: (size.height - border_height) / 2,
        }
    }

    /// `(source origin, destination origin)` for each of the four quadrants.
    pub fn quadrants(&self) -> [((u32, u32), (u32, u32)); 4] {
        let (sw, sh) = (self.screen_width, self.screen_height);
        let (bw, bh) = (self.border_width, self.border_height);
        [
            ((0, 0), (0, 0)),
            ((sw + bw, 0), (sw, 0)),
            ((0, sh + bh), (0, sh)),
            ((sw + bw, sh + bh), (sw, sh)),
        ]
    }
}

pub fn flip_horizontal(frame: &mut Frame) {
    let width = frame.width() as usize;
    let stride = width * CHANNELS;
    for row in frame.as_bytes_mut().chunks_exact_mut(stride) {
        for x in 0..width / 2 {
            let (l, r) = (x * CHANNELS, (width - 1 - x) * CHANNELS);
            for c in 0..CHANNELS {
                row.swap(l + c, r + c);
            }
        }
    }
}

/// Scale every channel by `1 - fade`, rounding to nearest.
pub fn apply_fade(frame: &mut Frame, fade: f64) {
    let gain = (1.0 - fade).clamp(0.0, 1.0);
    for v in frame.as_bytes_mut() {
        *v = (f64::from(*v) * gain).round() as u8;
    }
}

/// The post-processing pipeline: zoom, flip, crop on black, border removal, fade, resize.
#[derive(Clone, Debug)]
pub struct PostProcessor {
    cfg: PostConfig,
}

impl PostProcessor {
    pub fn new(cfg: PostConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &PostConfig {
        &self.cfg
    }

    /// Size of the frames `apply` produces for an input of `input`, ignoring run-time toggles.
    pub fn output_size(&self, input: FrameSize) -> FrameSize {
        self.cfg.output_size.unwrap_or(input)
    }

    pub fn apply(&self, mut frame: Frame, crop: bool, fade: f64) -> DelayResult<Frame> {
        if self.cfg.zoom > 1.0
            && let Some((x, y, w, h)) = pixel_rect(
                zoom_rect(frame.size(), self.cfg.zoom),
                frame.width(),
                frame.height(),
            )
        {
            frame = frame.crop(x, y, w, h)?;
        }

        if self.cfg.flip {
            flip_horizontal(&mut frame);
        }

        if crop {
            let mut black = Frame::black(frame.size());
            if let Some((x, y, w, h)) = pixel_rect(
                crop_rect(frame.size(), self.cfg.crop),
                frame.width(),
                frame.height(),
            ) {
                black.copy_rect_from(&frame, x..x + w, y..y + h);
            }
            frame = black;
        }

        if self.cfg.crop_border {
            frame = self.remove_borders(frame)?;
        }

        if fade > 0.0 {
            apply_fade(&mut frame, fade);
        }

        if let Some(out) = self.cfg.output_size
            && out != frame.size()
        {
            let resized = image::imageops::resize(
                &frame.to_rgb_image(),
                out.width,
                out.height,
                FilterType::Triangle,
            );
            frame = Frame::from_rgb_image(resized)?;
        }
        Ok(frame)
    }

    fn remove_borders(&self, frame: Frame) -> DelayResult<Frame> {
        let layout = BorderLayout::new(
            frame.size(),
            self.cfg.border_width_ratio,
            self.cfg.border_height_ratio,
        );
        let (sw, sh) = (layout.screen_width, layout.screen_height);
        let Ok(size) = FrameSize::new(sw * 2, sh * 2) else {
            tracing::debug!(size = %frame.size(), "frame too small for border removal");
            return Ok(frame);
        };
        let mut out = Frame::black(size);
        for ((sx, sy), (dx, dy)) in layout.quadrants() {
            out.blit(&frame.crop(sx, sy, sw, sh)?, dx, dy);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/post.rs"]
mod tests;
