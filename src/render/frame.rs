use std::ops::Range;

use crate::foundation::core::{CHANNELS, FrameSize, Rgb8};
use crate::foundation::error::{DelayError, DelayResult};

/// An RGB8 bitmap, tightly packed, row-major.
///
/// Every frame that flows through the engine (ring slots, the composed frame, post-processed
/// output) is a `Frame`. Pixel access is bounds-checked; bulk copies clip to the frame.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Frame {
    /// A frame filled with black.
    pub fn black(size: FrameSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            data: vec![0u8; size.byte_len()],
        }
    }

    /// A frame filled with one color.
    pub fn solid(size: FrameSize, rgb: Rgb8) -> Self {
        Self {
            width: size.width,
            height: size.height,
            data: rgb.repeat(size.pixel_count()),
        }
    }

    /// Wrap raw RGB8 bytes. `data.len()` must equal `width * height * 3`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> DelayResult<Self> {
        let size = FrameSize::new(width, height)?;
        if data.len() != size.byte_len() {
            return Err(DelayError::validation(format!(
                "frame data size mismatch: got {} bytes, expected {} for {size}",
                data.len(),
                size.byte_len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> FrameSize {
        FrameSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw bytes; capture sources decode straight into this.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        let i = self.offset(x, y)?;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Overwrite the pixel at `(x, y)`. Returns `false` outside the frame.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgb: Rgb8) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.data[i..i + CHANNELS].copy_from_slice(&rgb);
                true
            }
            None => false,
        }
    }

    /// Copy the rectangle `xs × ys` from `src` into the same position of `self`.
    ///
    /// Exact byte copy, no blending. The rectangle is clipped to both frames; a source of a
    /// different size only contributes its overlapping area.
    pub fn copy_rect_from(&mut self, src: &Frame, xs: Range<u32>, ys: Range<u32>) {
        let x_end = xs.end.min(self.width).min(src.width);
        let y_end = ys.end.min(self.height).min(src.height);
        if xs.start >= x_end || ys.start >= y_end {
            return;
        }

        let dst_stride = self.stride();
        let src_stride = src.stride();
        let x0 = xs.start as usize * CHANNELS;
        let x1 = x_end as usize * CHANNELS;
        for y in ys.start..y_end {
            let d = y as usize * dst_stride;
            let s = y as usize * src_stride;
            self.data[d + x0..d + x1].copy_from_slice(&src.data[s + x0..s + x1]);
        }
    }

    /// Copy `src` into `self` with its top-left corner at `(x, y)`, clipped to `self`.
    pub fn blit(&mut self, src: &Frame, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let w = src.width.min(self.width - x) as usize;
        let h = src.height.min(self.height - y);
        let dst_stride = self.stride();
        let src_stride = src.stride();
        for row in 0..h {
            let d = (y + row) as usize * dst_stride + x as usize * CHANNELS;
            let s = row as usize * src_stride;
            self.data[d..d + w * CHANNELS].copy_from_slice(&src.data[s..s + w * CHANNELS]);
        }
    }

    /// A new frame holding the rectangle at `(x, y)` of size `w × h`, clipped to `self`.
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> DelayResult<Frame> {
        let x = x.min(self.width);
        let y = y.min(self.height);
        let w = w.min(self.width - x);
        let h = h.min(self.height - y);
        let size = FrameSize::new(w, h)
            .map_err(|_| DelayError::validation("crop rectangle lies outside the frame"))?;

        let mut out = Frame::black(size);
        let src_stride = self.stride();
        let out_stride = out.stride();
        for row in 0..h {
            let s = (y + row) as usize * src_stride + x as usize * CHANNELS;
            let d = row as usize * out_stride;
            out.data[d..d + out_stride].copy_from_slice(&self.data[s..s + out_stride]);
        }
        Ok(out)
    }

    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| image::RgbImage::new(self.width, self.height))
    }

    pub fn from_rgb_image(img: image::RgbImage) -> DelayResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_raw(w, h, img.into_raw())
    }

    fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * CHANNELS)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
