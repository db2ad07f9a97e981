use image::{Rgba, RgbaImage};

use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::path::{ArcParams, Path};
use super::Context2d;

/// Sub-scanlines sampled per pixel row when filling paths.
const FILL_SUBSAMPLES: u32 = 4;

/// CPU canvas backed by a straight-alpha sRGB bitmap.
///
/// Rendering model:
/// - source-over compositing in premultiplied space
/// - paths are filled with the nonzero rule, antialiased vertically
/// - strokes use distance-to-segment coverage, so a 1px line on an integer
///   coordinate lights the two adjacent pixel rows at half coverage each
#[derive(Debug, Clone)]
pub struct RasterContext {
    bitmap: RgbaImage,
    path: Path,
    stroke_style: Color,
    fill_style: Color,
    line_width: f32,
}

impl RasterContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bitmap: RgbaImage::new(width, height),
            path: Path::new(),
            stroke_style: Color::BLACK,
            fill_style: Color::BLACK,
            line_width: 1.0,
        }
    }

    #[inline]
    pub fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }

    #[inline]
    pub fn into_bitmap(self) -> RgbaImage {
        self.bitmap
    }

    /// Straight-alpha sRGB bytes at `(x, y)`; transparent outside the bitmap.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.bitmap.get_pixel_checked(x, y).map(|p| p.0).unwrap_or([0; 4])
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.bitmap.pixels().all(|p| p.0[3] == 0)
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn blend(&mut self, x: u32, y: u32, src: Color) {
        if src.a <= 0.0 {
            return;
        }
        let dst = self.bitmap.get_pixel_mut(x, y);
        let [r, g, b, a] = dst.0;
        let out = src.over(Color::from_srgb_u8(r, g, b, a));
        *dst = Rgba(out.to_srgb_u8());
    }

    fn composite(&mut self, mask: &CoverageMask, color: Color) {
        for (x, y, coverage) in mask.iter() {
            self.blend(x, y, color.with_coverage(coverage));
        }
    }

    fn stroke_path(&mut self, path: &Path) {
        let Some(bounds) = path.bounds() else { return };
        let hw = 0.5 * self.line_width.max(0.0);
        let pad = hw + 1.0;
        let area = Rect::new(
            bounds.origin.x - pad,
            bounds.origin.y - pad,
            bounds.size.x + 2.0 * pad,
            bounds.size.y + 2.0 * pad,
        );
        let (w, h) = (self.bitmap.width(), self.bitmap.height());
        let Some(mut mask) = CoverageMask::new(area, w, h) else { return };

        for sp in path.subpaths() {
            for (a, b) in sp.edges(false) {
                mask.stroke_segment(a, b, hw);
            }
        }
        self.composite(&mask, self.stroke_style);
    }
}

impl Context2d for RasterContext {
    fn size(&self) -> (u32, u32) {
        (self.bitmap.width(), self.bitmap.height())
    }

    fn clear_rect(&mut self, rect: Rect) {
        let (w, h) = self.size();
        let Some((x0, y0, x1, y1)) = rect.pixel_span(w, h) else { return };
        for y in y0..y1 {
            for x in x0..x1 {
                if rect.contains(Vec2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.bitmap.put_pixel(x, y, Rgba([0, 0, 0, 0]));
                }
            }
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32, anticlockwise: bool) {
        self.path.arc(ArcParams { center, radius, start_angle, end_angle, anticlockwise });
    }

    fn close_path(&mut self) {
        self.path.close_path();
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.stroke_style = color;
    }

    fn set_fill_style(&mut self, color: Color) {
        self.fill_style = color;
    }

    fn set_line_width(&mut self, width: f32) {
        // Canvas ignores non-positive and non-finite widths.
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    fn stroke(&mut self) {
        let path = std::mem::take(&mut self.path);
        self.stroke_path(&path);
        self.path = path;
    }

    fn fill(&mut self) {
        let Some(bounds) = self.path.bounds() else { return };
        let (w, h) = self.size();
        let Some(mut mask) = CoverageMask::new(bounds, w, h) else { return };
        mask.fill_nonzero(&self.path);
        self.composite(&mask, self.fill_style);
    }

    fn fill_rect(&mut self, rect: Rect) {
        let rect = rect.normalized();
        let (w, h) = self.size();
        let Some((x0, y0, x1, y1)) = rect.pixel_span(w, h) else { return };
        let (min, max) = (rect.min(), rect.max());
        for y in y0..y1 {
            let cy = overlap(y as f32, min.y, max.y);
            for x in x0..x1 {
                let cov = cy * overlap(x as f32, min.x, max.x);
                if cov > 0.0 {
                    self.blend(x, y, self.fill_style.with_coverage(cov));
                }
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect) {
        if !rect.is_finite() {
            return;
        }
        let mut outline = Path::new();
        outline.rect(rect.normalized());
        self.stroke_path(&outline);
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect) {
        let dest = dest.normalized();
        if !dest.is_finite() || image.width() == 0 || image.height() == 0 {
            return;
        }
        // Snap to whole pixels, then only visit the part that lands on the bitmap.
        let snapped = Rect::new(
            dest.origin.x.round(),
            dest.origin.y.round(),
            dest.size.x.round(),
            dest.size.y.round(),
        );
        let (w, h) = self.size();
        let Some((x0, y0, x1, y1)) = snapped.pixel_span(w, h) else { return };

        let sx = image.width() as f64 / snapped.size.x as f64;
        let sy = image.height() as f64 / snapped.size.y as f64;
        let identity = sx == 1.0 && sy == 1.0;
        for y in y0..y1 {
            let v = (y as f64 + 0.5 - snapped.origin.y as f64) * sy;
            for x in x0..x1 {
                let u = (x as f64 + 0.5 - snapped.origin.x as f64) * sx;
                let src = if identity {
                    let [r, g, b, a] = image.get_pixel(u as u32, v as u32).0;
                    Color::from_srgb_u8(r, g, b, a)
                } else {
                    sample_bilinear(image, u as f32, v as f32)
                };
                self.blend(x, y, src);
            }
        }
    }
}

/// Bilinear sample at source coordinates `(u, v)` (pixel centers at `.5`), edges clamped.
fn sample_bilinear(image: &RgbaImage, u: f32, v: f32) -> Color {
    let (iw, ih) = image.dimensions();
    let x = (u - 0.5).clamp(0.0, (iw - 1) as f32);
    let y = (v - 0.5).clamp(0.0, (ih - 1) as f32);
    let (ix, iy) = (x.floor() as u32, y.floor() as u32);
    let (jx, jy) = ((ix + 1).min(iw - 1), (iy + 1).min(ih - 1));
    let (fx, fy) = (x - ix as f32, y - iy as f32);

    let texel = |x: u32, y: u32| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        Color::from_srgb_u8(r, g, b, a)
    };
    let top = mix(texel(ix, iy), texel(jx, iy), fx);
    let bottom = mix(texel(ix, jy), texel(jx, jy), fx);
    mix(top, bottom, fy)
}

/// Linear interpolation in premultiplied space.
#[inline]
fn mix(a: Color, b: Color, t: f32) -> Color {
    Color::from_premul(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
        a.a + (b.a - a.a) * t,
    )
}

/// Length of `[lo, hi)` ∩ `[p, p+1)`.
#[inline]
fn overlap(p: f32, lo: f32, hi: f32) -> f32 {
    ((p + 1.0).min(hi) - p.max(lo)).clamp(0.0, 1.0)
}

/// Per-pixel coverage over a clamped window of the bitmap.
struct CoverageMask {
    x0: u32,
    y0: u32,
    w: u32,
    h: u32,
    cells: Vec<f32>,
}

impl CoverageMask {
    fn new(area: Rect, width: u32, height: u32) -> Option<Self> {
        // Degenerate (zero-width or zero-height) paths still need a one-pixel window.
        let grown = Rect::new(area.origin.x, area.origin.y, area.size.x.max(1.0), area.size.y.max(1.0));
        let (x0, y0, x1, y1) = grown.pixel_span(width, height)?;
        let (w, h) = (x1 - x0, y1 - y0);
        Some(Self { x0, y0, w, h, cells: vec![0.0; (w * h) as usize] })
    }

    #[inline]
    fn cell(&mut self, x: u32, y: u32) -> &mut f32 {
        &mut self.cells[((y - self.y0) * self.w + (x - self.x0)) as usize]
    }

    fn iter(&self) -> impl Iterator<Item = (u32, u32, f32)> + '_ {
        self.cells.iter().enumerate().filter(|(_, c)| **c > 0.0).map(|(i, c)| {
            let i = i as u32;
            (self.x0 + i % self.w, self.y0 + i / self.w, c.min(1.0))
        })
    }

    /// Max-combines the coverage of a thick segment; joins never double-blend.
    fn stroke_segment(&mut self, a: Vec2, b: Vec2, half_width: f32) {
        let reach = half_width + 0.5;
        let lo_x = (a.x.min(b.x) - reach).floor().max(self.x0 as f32) as u32;
        let hi_x = ((a.x.max(b.x) + reach).ceil().max(0.0) as u32).min(self.x0 + self.w);
        let lo_y = (a.y.min(b.y) - reach).floor().max(self.y0 as f32) as u32;
        let hi_y = ((a.y.max(b.y) + reach).ceil().max(0.0) as u32).min(self.y0 + self.h);

        for y in lo_y..hi_y {
            for x in lo_x..hi_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (reach - distance_to_segment(p, a, b)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    let c = self.cell(x, y);
                    *c = c.max(coverage);
                }
            }
        }
    }

    /// Scanline fill with the nonzero winding rule over every subpath, each implicitly closed.
    fn fill_nonzero(&mut self, path: &Path) {
        let mut crossings: Vec<(f32, i32)> = Vec::new();
        let weight = 1.0 / FILL_SUBSAMPLES as f32;

        for y in self.y0..self.y0 + self.h {
            for s in 0..FILL_SUBSAMPLES {
                let sy = y as f32 + (s as f32 + 0.5) * weight;
                crossings.clear();
                for sp in path.subpaths() {
                    for (a, b) in sp.edges(true) {
                        if (a.y <= sy) != (b.y <= sy) {
                            let t = (sy - a.y) / (b.y - a.y);
                            let dir = if b.y > a.y { 1 } else { -1 };
                            crossings.push((a.x + t * (b.x - a.x), dir));
                        }
                    }
                }
                crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

                let mut winding = 0;
                for pair in crossings.windows(2) {
                    winding += pair[0].1;
                    if winding == 0 {
                        continue;
                    }
                    // Pixels whose centers fall inside [left, right).
                    let left = (pair[0].0 - 0.5).ceil().max(self.x0 as f32);
                    let right = (pair[1].0 - 0.5).ceil().min((self.x0 + self.w) as f32);
                    let mut x = left;
                    while x < right {
                        *self.cell(x as u32, y) += weight;
                        x += 1.0;
                    }
                }
            }
        }
    }
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    let t = if len2 > 0.0 { ((p - a).dot(ab) / len2).clamp(0.0, 1.0) } else { 0.0 };
    (p - (a + ab * t)).length()
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn red() -> Color { Color::from_srgb_u8(255, 0, 0, 255) }
    fn blue() -> Color { Color::from_srgb_u8(0, 0, 255, 255) }

    #[test]
    fn new_context_is_blank_with_canvas_defaults() {
        let ctx = RasterContext::new(16, 8);
        assert_eq!(ctx.size(), (16, 8));
        assert!(ctx.is_blank());
        assert_eq!(ctx.stroke_style, Color::BLACK);
        assert_eq!(ctx.line_width, 1.0);
    }

    #[test]
    fn fill_rect_on_pixel_grid_is_exact() {
        let mut ctx = RasterContext::new(20, 20);
        ctx.set_fill_style(red());
        ctx.fill_rect(Rect::new(4.0, 5.0, 6.0, 3.0));
        assert_eq!(ctx.pixel(4, 5), RED);
        assert_eq!(ctx.pixel(9, 7), RED);
        assert_eq!(ctx.pixel(10, 7), [0; 4]);
        assert_eq!(ctx.pixel(9, 8), [0; 4]);
        assert_eq!(ctx.pixel(3, 5), [0; 4]);
    }

    #[test]
    fn fill_rect_half_pixel_edge_gets_half_coverage() {
        let mut ctx = RasterContext::new(4, 4);
        ctx.set_fill_style(red());
        ctx.fill_rect(Rect::new(0.0, 0.0, 1.5, 1.0));
        assert_eq!(ctx.pixel(0, 0), RED);
        assert_eq!(ctx.pixel(1, 0)[3], 128);
    }

    #[test]
    fn stroke_rect_outlines_without_filling() {
        let mut ctx = RasterContext::new(40, 40);
        ctx.set_stroke_style(red());
        ctx.stroke_rect(Rect::new(10.0, 10.0, 20.0, 20.0));
        // Both rows adjacent to the top edge are touched.
        assert!(ctx.pixel(20, 9)[3] > 0);
        assert!(ctx.pixel(20, 10)[3] > 0);
        // Interior and exterior stay clear.
        assert_eq!(ctx.pixel(20, 20), [0; 4]);
        assert_eq!(ctx.pixel(20, 5), [0; 4]);
        // stroke_rect leaves the current path alone.
        assert!(ctx.path().is_empty());
    }

    #[test]
    fn filled_circle_covers_center_not_outside() {
        let mut ctx = RasterContext::new(400, 400);
        ctx.set_fill_style(blue());
        ctx.begin_path();
        ctx.arc(Vec2::new(200.0, 200.0), 10.0, 0.0, 2.0 * PI, false);
        ctx.close_path();
        ctx.fill();
        assert_eq!(ctx.pixel(200, 200), BLUE);
        assert_eq!(ctx.pixel(195, 203), BLUE);
        assert_eq!(ctx.pixel(215, 200), [0; 4]);
        assert_eq!(ctx.pixel(200, 185), [0; 4]);
    }

    #[test]
    fn stroked_circle_is_a_ring() {
        let mut ctx = RasterContext::new(100, 100);
        ctx.set_stroke_style(red());
        ctx.begin_path();
        ctx.arc(Vec2::new(50.0, 50.0), 10.0, 0.0, 2.0 * PI, false);
        ctx.close_path();
        ctx.stroke();
        assert_eq!(ctx.pixel(50, 50), [0; 4]);
        assert!(ctx.pixel(59, 50)[3] > 0 || ctx.pixel(60, 50)[3] > 0);
        assert_eq!(ctx.pixel(65, 50), [0; 4]);
    }

    #[test]
    fn later_draws_cover_earlier_ones() {
        let mut ctx = RasterContext::new(20, 20);
        ctx.set_fill_style(red());
        ctx.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        ctx.set_fill_style(blue());
        ctx.fill_rect(Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(ctx.pixel(2, 2), RED);
        assert_eq!(ctx.pixel(7, 7), BLUE);
    }

    #[test]
    fn clear_rect_restores_transparency() {
        let mut ctx = RasterContext::new(10, 10);
        ctx.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        ctx.clear_rect(Rect::new(0.0, 0.0, 5.0, 10.0));
        assert_eq!(ctx.pixel(2, 2), [0; 4]);
        assert_eq!(ctx.pixel(7, 2), [0, 0, 0, 255]);
        ctx.clear();
        assert!(ctx.is_blank());
    }

    #[test]
    fn draw_image_scales_and_clips() {
        let src = RgbaImage::from_pixel(2, 2, Rgba(BLUE));
        let mut ctx = RasterContext::new(10, 10);
        ctx.draw_image(&src, Rect::new(6.0, 6.0, 8.0, 8.0));
        assert_eq!(ctx.pixel(6, 6), BLUE);
        assert_eq!(ctx.pixel(9, 9), BLUE);
        assert_eq!(ctx.pixel(5, 5), [0; 4]);
    }

    #[test]
    fn draw_image_only_samples_the_visible_part() {
        let src = RgbaImage::from_pixel(2, 2, Rgba(BLUE));
        let mut ctx = RasterContext::new(100, 100);
        ctx.draw_image(&src, Rect::new(-50_000.0, -50_000.0, 100_000.0, 100_000.0));
        assert_eq!(ctx.pixel(0, 0), BLUE);
        assert_eq!(ctx.pixel(50, 50), BLUE);
        assert_eq!(ctx.pixel(99, 99), BLUE);
    }

    #[test]
    fn draw_image_upscale_keeps_source_layout() {
        let mut src = RgbaImage::from_pixel(2, 2, Rgba(RED));
        src.put_pixel(1, 0, Rgba(BLUE));
        src.put_pixel(1, 1, Rgba(BLUE));
        let mut ctx = RasterContext::new(100, 100);
        ctx.draw_image(&src, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(ctx.pixel(5, 50), RED);
        assert_eq!(ctx.pixel(95, 50), BLUE);
        let mid = ctx.pixel(50, 50);
        assert!(mid[0] > 0 && mid[2] > 0, "{mid:?}");
    }

    #[test]
    fn translucent_fill_blends_over_existing_pixels() {
        let mut ctx = RasterContext::new(2, 2);
        ctx.set_fill_style(blue());
        ctx.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
        ctx.set_fill_style(Color::from_srgb_u8(255, 0, 0, 128));
        ctx.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
        let [r, g, b, a] = ctx.pixel(0, 0);
        assert_eq!((g, a), (0, 255));
        assert!((r as i32 - 128).abs() <= 1 && (b as i32 - 127).abs() <= 1);
    }
}
