use std::f32::consts::TAU;

use crate::coords::{Rect, Vec2};

/// Maximum distance between a flattened arc and the true circle, in pixels.
const ARC_TOLERANCE: f32 = 0.1;

/// Circular arc as passed to `Context2d::arc`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArcParams {
    pub center: Vec2,
    pub radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
    pub anticlockwise: bool,
}

impl ArcParams {
    /// Signed sweep angle following the canvas rules: a clockwise arc whose end is at
    /// least a full turn past its start sweeps exactly one turn; otherwise the sweep is
    /// reduced into `[0, TAU)` in the requested direction.
    pub fn sweep(&self) -> f32 {
        let delta = self.end_angle - self.start_angle;
        if self.anticlockwise {
            if -delta >= TAU { -TAU } else { -((-delta).rem_euclid(TAU)) }
        } else if delta >= TAU {
            TAU
        } else {
            delta.rem_euclid(TAU)
        }
    }

    #[inline]
    fn point_at(&self, angle: f32) -> Vec2 {
        Vec2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }
}

/// A run of connected points. Closed subpaths join their last point to their first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubPath {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl SubPath {
    /// Edges of the subpath; `force_close` adds the closing edge even when open (fill rule).
    pub fn edges(&self, force_close: bool) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.points.len();
        let closing = (self.closed || force_close) && n > 2;
        let extra = if closing { 1 } else { 0 };
        (0..n.saturating_sub(1) + extra).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

/// Current path of a canvas context, flattened to polylines as it is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.subpaths.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(|s| s.points.is_empty())
    }

    #[inline]
    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    pub fn move_to(&mut self, p: Vec2) {
        self.subpaths.push(SubPath { points: vec![p], closed: false });
    }

    pub fn line_to(&mut self, p: Vec2) {
        match self.subpaths.last_mut() {
            Some(sp) if !sp.closed => sp.points.push(p),
            _ => self.move_to(p),
        }
    }

    pub fn arc(&mut self, arc: ArcParams) {
        if !arc.center.is_finite() || !arc.radius.is_finite() || arc.radius < 0.0 {
            return;
        }
        let sweep = arc.sweep();
        self.line_to(arc.point_at(arc.start_angle));

        if arc.radius == 0.0 || sweep == 0.0 {
            return;
        }

        let step = 2.0 * (1.0 - ARC_TOLERANCE / arc.radius).max(-1.0).acos();
        let segments = if step > 0.0 {
            ((sweep.abs() / step).ceil() as usize).clamp(8, 1024)
        } else {
            8
        };

        for i in 1..=segments {
            let t = i as f32 / segments as f32;
            self.line_to(arc.point_at(arc.start_angle + sweep * t));
        }
    }

    /// Marks the current subpath closed and starts a new one at its first point.
    pub fn close_path(&mut self) {
        let Some(sp) = self.subpaths.last_mut() else { return };
        if sp.closed || sp.points.is_empty() {
            return;
        }
        sp.closed = true;
        let first = sp.points[0];
        self.move_to(first);
    }

    /// Appends a closed rectangle subpath.
    pub fn rect(&mut self, rect: Rect) {
        let min = rect.min();
        let max = rect.max();
        self.move_to(min);
        self.line_to(Vec2::new(max.x, min.y));
        self.line_to(max);
        self.line_to(Vec2::new(min.x, max.y));
        self.close_path();
    }

    /// Bounding box of all points, or `None` for an empty path.
    pub fn bounds(&self) -> Option<Rect> {
        let mut iter = self.subpaths.iter().flat_map(|s| s.points.iter().copied());
        let first = iter.next()?;
        let (mut lo, mut hi) = (first, first);
        for p in iter {
            lo = Vec2::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Vec2::new(hi.x.max(p.x), hi.y.max(p.y));
        }
        Some(Rect::from_origin_size(lo, hi - lo))
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;

    fn full_circle(cx: f32, cy: f32, r: f32) -> ArcParams {
        ArcParams {
            center: Vec2::new(cx, cy),
            radius: r,
            start_angle: 0.0,
            end_angle: 2.0 * PI,
            anticlockwise: false,
        }
    }

    #[test]
    fn sweep_follows_canvas_rules() {
        assert_eq!(full_circle(0.0, 0.0, 1.0).sweep(), TAU);

        let quarter = ArcParams { end_angle: PI / 2.0, ..full_circle(0.0, 0.0, 1.0) };
        assert!((quarter.sweep() - PI / 2.0).abs() < 1e-6);

        let back = ArcParams { anticlockwise: true, ..quarter };
        assert!((back.sweep() + 1.5 * PI).abs() < 1e-5);
    }

    #[test]
    fn full_arc_stays_on_the_circle() {
        let mut path = Path::new();
        path.arc(full_circle(200.0, 200.0, 10.0));
        let sp = &path.subpaths()[0];
        assert!(sp.points.len() >= 9);
        for p in &sp.points {
            let d = (*p - Vec2::new(200.0, 200.0)).length();
            assert!((d - 10.0).abs() < 1e-3, "point {p:?} off the circle");
        }
        let b = path.bounds().unwrap();
        assert!((b.origin.x - 190.0).abs() < 0.2 && (b.max().x - 210.0).abs() < 0.2);
    }

    #[test]
    fn close_path_starts_new_subpath_at_first_point() {
        let mut path = Path::new();
        path.arc(full_circle(0.0, 0.0, 5.0));
        path.close_path();
        assert_eq!(path.subpaths().len(), 2);
        assert!(path.subpaths()[0].closed);
        assert_eq!(path.subpaths()[1].points, vec![Vec2::new(5.0, 0.0)]);
    }

    #[test]
    fn rect_subpath_has_four_closing_edges() {
        let mut path = Path::new();
        path.rect(Rect::new(0.0, 0.0, 4.0, 2.0));
        assert_eq!(path.subpaths()[0].edges(false).count(), 4);
    }

    #[test]
    fn degenerate_arcs_are_ignored_or_collapse_to_a_point() {
        let mut path = Path::new();
        path.arc(ArcParams { radius: -1.0, ..full_circle(0.0, 0.0, 1.0) });
        assert!(path.is_empty());

        path.arc(ArcParams { radius: 0.0, ..full_circle(3.0, 4.0, 1.0) });
        assert_eq!(path.subpaths()[0].points, vec![Vec2::new(3.0, 4.0)]);
    }
}
