use crate::eval::overlays::OverlayState;
use crate::foundation::core::{DMat4, DVec3, Rgba8};
use crate::foundation::error::{CineError, CineResult};
use crate::foundation::math::seed_for_id;
use crate::objects::animator::ObjectState;
use crate::particles::field::ParticleInstance;
use crate::render::backend::{DrawHandle, FrameRGBA, Renderer};
use crate::render::state::RenderState;
use glam::DVec4;
use vello_cpu::kurbo::{BezPath, Circle, Point, Rect, Shape};
use vello_cpu::peniko::Color;

/// Options for [`PreviewRenderer`].
#[derive(Clone, Copy, Debug)]
pub struct PreviewOpts {
    /// Multiplier on particle world size.
    pub particle_scale: f64,
    pub draw_objects: bool,
    pub draw_particles: bool,
}

impl Default for PreviewOpts {
    fn default() -> Self {
        Self {
            particle_scale: 1.0,
            draw_objects: true,
            draw_particles: true,
        }
    }
}

/// Flat-shaded CPU preview of a [`RenderState`], rasterized with `vello_cpu`.
///
/// Objects are drawn as their projected front face with a tinted screen inset, particles as
/// discs and overlays as text-box placeholders. Post-processing is not applied.
pub struct PreviewRenderer {
    opts: PreviewOpts,
    ctx: Option<vello_cpu::RenderContext>,
    next_handle: u64,
    last: Option<(DrawHandle, FrameRGBA)>,
}

impl PreviewRenderer {
    pub fn new(opts: PreviewOpts) -> Self {
        Self {
            opts,
            ctx: None,
            next_handle: 0,
            last: None,
        }
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&PreviewOpts, &mut vello_cpu::RenderContext) -> CineResult<R>,
    ) -> CineResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&self.opts, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new(PreviewOpts::default())
    }
}

impl Renderer for PreviewRenderer {
    fn draw(&mut self, state: &RenderState) -> CineResult<DrawHandle> {
        let width: u16 = state
            .canvas
            .width
            .try_into()
            .map_err(|_| CineError::collaborator("canvas width exceeds u16"))?;
        let height: u16 = state
            .canvas
            .height
            .try_into()
            .map_err(|_| CineError::collaborator("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(CineError::collaborator("canvas must be non-empty"));
        }

        let frame = self.with_ctx_mut(width, height, |opts, ctx| {
            let view = Viewport::new(state);
            draw_background(ctx, state, &view)?;
            if opts.draw_objects {
                draw_objects(ctx, state, &view);
            }
            if opts.draw_particles {
                draw_particles(ctx, &state.particles.particles, &view, opts.particle_scale);
            }
            for overlay in &state.overlays {
                draw_overlay(ctx, overlay, &view);
            }

            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(width, height);
            ctx.render_to_pixmap(&mut pixmap);
            Ok(FrameRGBA {
                width: state.canvas.width,
                height: state.canvas.height,
                data: pixmap.data_as_u8_slice().to_vec(),
                premultiplied: true,
            })
        })?;

        let handle = DrawHandle(self.next_handle);
        self.next_handle += 1;
        self.last = Some((handle, frame));
        Ok(handle)
    }

    fn capture_frame(&mut self, handle: DrawHandle) -> CineResult<FrameRGBA> {
        match &self.last {
            Some((h, frame)) if *h == handle => Ok(frame.clone()),
            Some((h, _)) => Err(CineError::collaborator(format!(
                "stale draw handle {} (latest is {})",
                handle.0, h.0
            ))),
            None => Err(CineError::collaborator("capture requested before any draw")),
        }
    }
}

struct Viewport {
    view: DMat4,
    view_projection: DMat4,
    width: f64,
    height: f64,
    /// Pixels per world unit at view depth 1.
    focal_px: f64,
}

impl Viewport {
    fn new(state: &RenderState) -> Self {
        let height = f64::from(state.canvas.height);
        Self {
            view: state.camera.view,
            view_projection: state.camera.view_projection(),
            width: f64::from(state.canvas.width),
            height,
            focal_px: state.camera.projection.y_axis.y * height * 0.5,
        }
    }

    /// Pixel position and clip `w`; `None` behind the camera.
    fn project(&self, p: DVec3) -> Option<(Point, f64)> {
        let clip = self.view_projection * DVec4::new(p.x, p.y, p.z, 1.0);
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let x = (ndc.x + 1.0) * 0.5 * self.width;
        let y = (1.0 - ndc.y) * 0.5 * self.height;
        Some((Point::new(x, y), clip.w))
    }

    fn depth(&self, p: DVec3) -> f64 {
        -self.view.transform_point3(p).z
    }
}

fn paint(c: Rgba8, opacity: f64) -> Color {
    let a = (f64::from(c.a) * opacity.clamp(0.0, 1.0)).round() as u8;
    Color::from_rgba8(c.r, c.g, c.b, a)
}

fn draw_background(
    ctx: &mut vello_cpu::RenderContext,
    state: &RenderState,
    view: &Viewport,
) -> CineResult<()> {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    let full = Rect::new(0.0, 0.0, view.width, view.height);
    match state.background.gradient {
        Some([top, bottom]) => {
            let img = gradient_image(top, bottom, state.canvas.width, state.canvas.height)?;
            ctx.set_paint(img);
        }
        None => ctx.set_paint(paint(state.background.color, 1.0)),
    }
    ctx.fill_rect(&full);
    Ok(())
}

fn gradient_image(top: Rgba8, bottom: Rgba8, w: u32, h: u32) -> CineResult<vello_cpu::Image> {
    let w16: u16 = w
        .try_into()
        .map_err(|_| CineError::collaborator("gradient width exceeds u16"))?;
    let h16: u16 = h
        .try_into()
        .map_err(|_| CineError::collaborator("gradient height exceeds u16"))?;

    let h1 = f64::from(h.max(1) - 1);
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(w as usize * h as usize);
    for y in 0..h {
        let t = if h1 <= 0.0 { 0.0 } else { f64::from(y) / h1 };
        let lerp = |a: u8, b: u8| -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        let row = Rgba8::new(
            lerp(top.r, bottom.r),
            lerp(top.g, bottom.g),
            lerp(top.b, bottom.b),
            lerp(top.a, bottom.a),
        );
        let [r, g, b, a] = row.to_premul();
        may_have_opacities |= a != 255;
        for _ in 0..w {
            pixels.push(vello_cpu::peniko::color::PremulRgba8 { r, g, b, a });
        }
    }
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w16, h16, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn draw_objects(ctx: &mut vello_cpu::RenderContext, state: &RenderState, view: &Viewport) {
    let mut order: Vec<(&ObjectState, f64)> = state
        .objects
        .iter()
        .map(|o| (o, view.depth(o.transform.position)))
        .collect();
    // Far to near.
    order.sort_by(|a, b| b.1.total_cmp(&a.1));

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for (object, _) in order {
        let half = object.appearance.size * 0.5;
        let Some(body) = face_path(view, object, half.x, half.y, half.z) else {
            continue;
        };
        ctx.set_paint(paint(object.appearance.color, 1.0));
        ctx.fill_path(&body);

        let inset = 0.9;
        let Some(screen) = face_path(view, object, half.x * inset, half.y * inset, half.z) else {
            continue;
        };
        for layer in &object.screen.layers {
            ctx.set_paint(paint(screen_tint(&layer.screen_id), layer.weight));
            ctx.fill_path(&screen);
        }
    }
}

/// Projected front face (`+z` side) of an object's box.
fn face_path(view: &Viewport, object: &ObjectState, hx: f64, hy: f64, hz: f64) -> Option<BezPath> {
    let corners = [
        DVec3::new(-hx, -hy, hz),
        DVec3::new(hx, -hy, hz),
        DVec3::new(hx, hy, hz),
        DVec3::new(-hx, hy, hz),
    ];
    let mut path = BezPath::new();
    for (i, c) in corners.into_iter().enumerate() {
        let (p, _) = view.project(object.transform.apply(c))?;
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    Some(path)
}

fn screen_tint(screen_id: &str) -> Rgba8 {
    let bits = seed_for_id(screen_id);
    let channel = |shift: u32| 120 + ((bits >> shift) & 0x7f) as u8;
    Rgba8::new(channel(0), channel(8), channel(16), 255)
}

fn draw_particles(
    ctx: &mut vello_cpu::RenderContext,
    particles: &[ParticleInstance],
    view: &Viewport,
    scale: f64,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for p in particles {
        if p.opacity <= 0.0 {
            continue;
        }
        let Some((center, w)) = view.project(p.position) else {
            continue;
        };
        let radius = (p.size * scale * view.focal_px / w).max(0.5);
        ctx.set_paint(paint(p.color, p.opacity));
        ctx.fill_path(&Circle::new(center, radius).to_path(0.1));
    }
}

fn draw_overlay(ctx: &mut vello_cpu::RenderContext, overlay: &OverlayState, view: &Viewport) {
    if overlay.opacity <= 0.0 {
        return;
    }
    let px = overlay.font_size * view.height / 1080.0;
    let w = px * 0.55 * overlay.text.chars().count() as f64;
    let cx = overlay.position[0] * view.width;
    let cy = overlay.position[1] * view.height;
    let rr = kurbo::RoundedRect::new(
        cx - w * 0.5,
        cy - px * 0.5,
        cx + w * 0.5,
        cy + px * 0.5,
        px * 0.2,
    );
    let mut path = BezPath::new();
    for el in kurbo::Shape::path_elements(&rr, 0.1) {
        path.push(el);
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(paint(overlay.color, overlay.opacity));
    ctx.fill_path(&path);
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
