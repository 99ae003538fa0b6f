use crate::foundation::error::CineResult;
use crate::render::state::RenderState;

/// A rendered frame as RGBA8 pixels.
///
/// The `premultiplied` flag makes the alpha convention explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// Ticket for one submitted draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawHandle(pub u64);

/// Rasterizer collaborator.
///
/// `capture_frame` must return exactly the pixels of the draw identified by `handle`.
pub trait Renderer {
    /// Submit one render state.
    fn draw(&mut self, state: &RenderState) -> CineResult<DrawHandle>;

    /// Block until the draw behind `handle` is complete.
    fn await_draw(&mut self, _handle: DrawHandle) -> CineResult<()> {
        Ok(())
    }

    /// Read back the pixels of the draw behind `handle`.
    fn capture_frame(&mut self, handle: DrawHandle) -> CineResult<FrameRGBA>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn draw(&mut self, state: &RenderState) -> CineResult<DrawHandle> {
        (**self).draw(state)
    }

    fn await_draw(&mut self, handle: DrawHandle) -> CineResult<()> {
        (**self).await_draw(handle)
    }

    fn capture_frame(&mut self, handle: DrawHandle) -> CineResult<FrameRGBA> {
        (**self).capture_frame(handle)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
