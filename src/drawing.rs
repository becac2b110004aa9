//! Shape primitives shared by every drawable surface.
//!
//! Everything here reaches the surface through `set_pixel` only, so the
//! primitives work identically on canvases, layers and framebuffers; writes
//! falling outside the surface are clipped by the surface itself. All entry
//! points return the surface for chaining.

use crate::surface::Surface;

/// Drawing primitives, available on every [`Surface`].
pub trait Draw: Surface {
    /// Bresenham line from `(x0, y0)` to `(x1, y1)`.
    ///
    /// Widths above one render a bundle of parallel lines offset in unit
    /// steps perpendicular to the direction; a zero-length thick line
    /// degenerates to a filled disc.
    fn draw_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        stroke: Self::Pixel,
        stroke_width: u32,
    ) -> &mut Self {
        if stroke_width <= 1 {
            bresenham(self, x0, y0, x1, y1, stroke);
            return self;
        }
        // ceil((w - 1) / 2) offsets on each side of the center line.
        let half = stroke_width as i32 / 2;
        if x0 == x1 && y0 == y1 {
            fill_circle_quads(self, x0, y0, half, stroke, [true; 4]);
            return self;
        }
        let (dx, dy) = ((x1 - x0) as f64, (y1 - y0) as f64);
        let len = (dx * dx + dy * dy).sqrt();
        let (ux, uy) = (-dy / len, dx / len);
        for k in -half..=half {
            let ox = (k as f64 * ux).round() as i32;
            let oy = (k as f64 * uy).round() as i32;
            bresenham(self, x0 + ox, y0 + oy, x1 + ox, y1 + oy, stroke);
        }
        self
    }

    /// Consecutive line segments through `points`; `closed` joins the last
    /// point back to the first.
    fn draw_polyline(
        &mut self,
        points: &[(i32, i32)],
        closed: bool,
        stroke: Self::Pixel,
    ) -> &mut Self {
        for pair in points.windows(2) {
            bresenham(self, pair[0].0, pair[0].1, pair[1].0, pair[1].1, stroke);
        }
        if closed && points.len() > 2 {
            let first = points[0];
            let last = points[points.len() - 1];
            bresenham(self, last.0, last.1, first.0, first.1, stroke);
        }
        self
    }

    /// Axis-aligned rectangle: fill first, then `stroke_width` concentric
    /// one-pixel outlines from the boundary inward.
    fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        stroke: Option<Self::Pixel>,
        fill: Option<Self::Pixel>,
        stroke_width: u32,
    ) -> &mut Self {
        let (w, h) = (w as i32, h as i32);
        if w <= 0 || h <= 0 {
            return self;
        }
        if let Some(fill) = fill {
            for yy in y..y + h {
                hline(self, x, x + w - 1, yy, fill);
            }
        }
        if let Some(stroke) = stroke {
            for i in 0..stroke_width as i32 {
                let (rx, ry) = (x + i, y + i);
                let (rw, rh) = (w - 2 * i, h - 2 * i);
                if rw <= 0 || rh <= 0 {
                    break;
                }
                hline(self, rx, rx + rw - 1, ry, stroke);
                hline(self, rx, rx + rw - 1, ry + rh - 1, stroke);
                for yy in ry + 1..ry + rh - 1 {
                    self.set_pixel(rx, yy, stroke);
                    self.set_pixel(rx + rw - 1, yy, stroke);
                }
            }
        }
        self
    }

    /// Rectangle with quarter-disc corners. The radius is clamped to half
    /// the short side.
    fn draw_rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        radius: u32,
        stroke: Option<Self::Pixel>,
        fill: Option<Self::Pixel>,
        stroke_width: u32,
    ) -> &mut Self {
        let (w, h) = (w as i32, h as i32);
        if w <= 0 || h <= 0 {
            return self;
        }
        let r = (radius as i32).min(w / 2).min(h / 2);
        if r == 0 {
            return self.draw_rect(x, y, w as u32, h as u32, stroke, fill, stroke_width);
        }
        // Corner centers.
        let (lx, rcx) = (x + r, x + w - 1 - r);
        let (ty, by) = (y + r, y + h - 1 - r);
        if let Some(fill) = fill {
            // Center strip spans the full width, edge strips sit between
            // the corner discs.
            for yy in ty..=by {
                hline(self, x, x + w - 1, yy, fill);
            }
            for yy in y..ty {
                hline(self, lx, rcx, yy, fill);
            }
            for yy in by + 1..y + h {
                hline(self, lx, rcx, yy, fill);
            }
            fill_circle_quads(self, lx, ty, r, fill, [false, true, false, false]);
            fill_circle_quads(self, rcx, ty, r, fill, [true, false, false, false]);
            fill_circle_quads(self, lx, by, r, fill, [false, false, true, false]);
            fill_circle_quads(self, rcx, by, r, fill, [false, false, false, true]);
        }
        if let Some(stroke) = stroke {
            for seg in [
                (lx, y, rcx, y),
                (lx, y + h - 1, rcx, y + h - 1),
                (x, ty, x, by),
                (x + w - 1, ty, x + w - 1, by),
            ] {
                self.draw_line(seg.0, seg.1, seg.2, seg.3, stroke, stroke_width);
            }
            use core::f64::consts::PI;
            self.draw_arc(rcx, ty, r as u32, 0.0, PI / 2.0, stroke, stroke_width);
            self.draw_arc(lx, ty, r as u32, PI / 2.0, PI, stroke, stroke_width);
            self.draw_arc(lx, by, r as u32, PI, 1.5 * PI, stroke, stroke_width);
            self.draw_arc(rcx, by, r as u32, 1.5 * PI, 2.0 * PI, stroke, stroke_width);
        }
        self
    }

    /// Midpoint circle. Outline widths above one render a filled annulus.
    fn draw_circle(
        &mut self,
        cx: i32,
        cy: i32,
        radius: u32,
        stroke: Option<Self::Pixel>,
        fill: Option<Self::Pixel>,
        stroke_width: u32,
    ) -> &mut Self {
        let r = radius as i32;
        if let Some(fill) = fill {
            fill_circle_quads(self, cx, cy, r, fill, [true; 4]);
        }
        if let Some(stroke) = stroke {
            if stroke_width <= 1 {
                outline_circle(self, cx, cy, r, stroke);
            } else {
                let outer = r + stroke_width as i32 / 2;
                let inner = (r - (stroke_width as i32 - 1) / 2).max(0);
                fill_annulus(self, cx, cy, inner, outer, stroke);
            }
        }
        self
    }

    /// Midpoint ellipse. Outline widths above one render a filled annulus
    /// from per-scanline x extents.
    fn draw_ellipse(
        &mut self,
        cx: i32,
        cy: i32,
        rx: u32,
        ry: u32,
        stroke: Option<Self::Pixel>,
        fill: Option<Self::Pixel>,
        stroke_width: u32,
    ) -> &mut Self {
        let (rx, ry) = (rx as i32, ry as i32);
        if rx <= 0 || ry <= 0 {
            return self;
        }
        if let Some(fill) = fill {
            for dy in -ry..=ry {
                let ext = ellipse_extent(rx, ry, dy);
                hline(self, cx - ext, cx + ext, cy + dy, fill);
            }
        }
        if let Some(stroke) = stroke {
            if stroke_width <= 1 {
                outline_ellipse(self, cx, cy, rx, ry, stroke);
            } else {
                let k_out = stroke_width as i32 / 2;
                let k_in = (stroke_width as i32 - 1) / 2;
                let (rxo, ryo) = (rx + k_out, ry + k_out);
                let (rxi, ryi) = ((rx - k_in).max(0), (ry - k_in).max(0));
                // The hole sits strictly inside the innermost painted ring.
                let has_hole = rxi > 1 && ryi > 1;
                for dy in -ryo..=ryo {
                    let outer = ellipse_extent(rxo, ryo, dy);
                    if has_hole && dy.abs() < ryi {
                        let inner = ellipse_extent(rxi - 1, ryi - 1, dy);
                        hline(self, cx - outer, cx - inner - 1, cy + dy, stroke);
                        hline(self, cx + inner + 1, cx + outer, cy + dy, stroke);
                    } else {
                        hline(self, cx - outer, cx + outer, cy + dy, stroke);
                    }
                }
            }
        }
        self
    }

    /// Circular arc between `start` and `end` radians, measured
    /// counter-clockwise from the positive x axis (y up). Angles wrap at
    /// two pi; thickness widens the radius range symmetrically.
    fn draw_arc(
        &mut self,
        cx: i32,
        cy: i32,
        radius: u32,
        start: f64,
        end: f64,
        stroke: Self::Pixel,
        stroke_width: u32,
    ) -> &mut Self {
        use core::f64::consts::TAU;
        let norm = |a: f64| a.rem_euclid(TAU);
        let (s, e) = (norm(start), norm(end));
        let full_turn = (start - end).abs() >= TAU - f64::EPSILON
            || ((e - s).abs() < f64::EPSILON && (start - end).abs() > f64::EPSILON);
        let r = radius as i32;
        let outer = r + stroke_width as i32 / 2;
        let inner = (r - (stroke_width as i32 - 1) / 2).max(0);
        for rr in inner..=outer {
            walk_circle(rr, |px, py| {
                for (dx, dy) in octant_points(px, py) {
                    let angle = norm((-dy as f64).atan2(dx as f64));
                    let hit = if full_turn {
                        true
                    } else if s <= e {
                        angle >= s && angle <= e
                    } else {
                        angle >= s || angle <= e
                    };
                    if hit {
                        self.set_pixel(cx + dx, cy + dy, stroke);
                    }
                }
            });
        }
        self
    }

    /// Polygon with scanline edge-intersection fill and a closed-polyline
    /// outline. Horizontal edges contribute no intersections.
    fn draw_polygon(
        &mut self,
        points: &[(i32, i32)],
        stroke: Option<Self::Pixel>,
        fill: Option<Self::Pixel>,
    ) -> &mut Self {
        if points.len() < 3 {
            return self;
        }
        if let Some(fill) = fill {
            let min_y = points.iter().map(|p| p.1).min().unwrap();
            let max_y = points.iter().map(|p| p.1).max().unwrap();
            let mut xs: Vec<f64> = Vec::with_capacity(points.len());
            for y in min_y..=max_y {
                xs.clear();
                for i in 0..points.len() {
                    let (x1, y1) = points[i];
                    let (x2, y2) = points[(i + 1) % points.len()];
                    if y1 == y2 {
                        continue;
                    }
                    // Each edge is open at its top end and closed at its
                    // bottom, so a vertex shared by two edges counts once.
                    let (top, bot) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
                    if y <= top || y > bot {
                        continue;
                    }
                    let t = (y - y1) as f64 / (y2 - y1) as f64;
                    xs.push(x1 as f64 + t * (x2 - x1) as f64);
                }
                xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
                for pair in xs.chunks_exact(2) {
                    hline(self, pair[0].round() as i32, pair[1].round() as i32, y, fill);
                }
            }
        }
        if let Some(stroke) = stroke {
            self.draw_polyline(points, true, stroke);
        }
        self
    }

    /// Scanline-span flood fill from `(x, y)`: spans of the seed's color
    /// are painted whole, then contiguous runs on the neighboring rows are
    /// pushed as new seeds.
    fn flood_fill(&mut self, x: i32, y: i32, color: Self::Pixel) -> &mut Self {
        let Some(target) = self.get_pixel(x, y) else {
            return self;
        };
        if target == color {
            return self;
        }
        let mut stack = vec![(x, y)];
        while let Some((sx, sy)) = stack.pop() {
            if self.get_pixel(sx, sy) != Some(target) {
                continue;
            }
            let mut x0 = sx;
            while self.get_pixel(x0 - 1, sy) == Some(target) {
                x0 -= 1;
            }
            let mut x1 = sx;
            while self.get_pixel(x1 + 1, sy) == Some(target) {
                x1 += 1;
            }
            for xi in x0..=x1 {
                self.set_pixel(xi, sy, color);
            }
            for ny in [sy - 1, sy + 1] {
                let mut xi = x0;
                while xi <= x1 {
                    if self.get_pixel(xi, ny) == Some(target) {
                        stack.push((xi, ny));
                        while xi <= x1 && self.get_pixel(xi, ny) == Some(target) {
                            xi += 1;
                        }
                    } else {
                        xi += 1;
                    }
                }
            }
        }
        self
    }
}

impl<S: Surface + ?Sized> Draw for S {}

fn bresenham<S: Surface + ?Sized>(s: &mut S, x0: i32, y0: i32, x1: i32, y1: i32, p: S::Pixel) {
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    loop {
        s.set_pixel(x, y, p);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn hline<S: Surface + ?Sized>(s: &mut S, x0: i32, x1: i32, y: i32, p: S::Pixel) {
    for x in x0..=x1 {
        s.set_pixel(x, y, p);
    }
}

/// Integer square root, rounding down.
fn isqrt(v: i64) -> i32 {
    if v <= 0 {
        return 0;
    }
    let mut x = (v as f64).sqrt() as i64;
    while (x + 1) * (x + 1) <= v {
        x += 1;
    }
    while x * x > v {
        x -= 1;
    }
    x as i32
}

/// Widest x offset inside a circle of radius `r` at height `dy`.
fn circle_extent(r: i32, dy: i32) -> i32 {
    isqrt(r as i64 * r as i64 - dy as i64 * dy as i64)
}

fn ellipse_extent(rx: i32, ry: i32, dy: i32) -> i32 {
    if dy.abs() > ry {
        return -1;
    }
    let t = 1.0 - (dy as f64 / ry as f64).powi(2);
    (rx as f64 * t.sqrt()).floor() as i32
}

/// Midpoint circle walk over one octant; `f` receives `(x, y)` with
/// `x >= y >= 0`.
fn walk_circle(r: i32, mut f: impl FnMut(i32, i32)) {
    if r <= 0 {
        f(0, 0);
        return;
    }
    let mut x = r;
    let mut y = 0;
    let mut err = 1 - r;
    while x >= y {
        f(x, y);
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// The eight symmetric reflections of an octant point.
fn octant_points(x: i32, y: i32) -> [(i32, i32); 8] {
    [
        (x, y),
        (y, x),
        (-x, y),
        (-y, x),
        (x, -y),
        (y, -x),
        (-x, -y),
        (-y, -x),
    ]
}

fn outline_circle<S: Surface + ?Sized>(s: &mut S, cx: i32, cy: i32, r: i32, p: S::Pixel) {
    walk_circle(r, |x, y| {
        for (dx, dy) in octant_points(x, y) {
            s.set_pixel(cx + dx, cy + dy, p);
        }
    });
}

/// Fills selected quarter discs; quads are `[+x-y, -x-y, -x+y, +x+y]`
/// (screen coordinates, so `-y` is up).
fn fill_circle_quads<S: Surface + ?Sized>(
    s: &mut S,
    cx: i32,
    cy: i32,
    r: i32,
    p: S::Pixel,
    quads: [bool; 4],
) {
    for dy in -r..=r {
        let ext = circle_extent(r, dy);
        let (left, right) = if dy <= 0 {
            (quads[1], quads[0])
        } else {
            (quads[2], quads[3])
        };
        if left {
            hline(s, cx - ext, cx, cy + dy, p);
        }
        if right {
            hline(s, cx, cx + ext, cy + dy, p);
        }
    }
}

fn fill_annulus<S: Surface + ?Sized>(
    s: &mut S,
    cx: i32,
    cy: i32,
    inner: i32,
    outer: i32,
    p: S::Pixel,
) {
    // The hole is the disc strictly inside the innermost painted radius.
    for dy in -outer..=outer {
        let out_ext = circle_extent(outer, dy);
        if inner > 0 && dy.abs() < inner {
            let in_ext = circle_extent(inner - 1, dy);
            hline(s, cx - out_ext, cx - in_ext - 1, cy + dy, p);
            hline(s, cx + in_ext + 1, cx + out_ext, cy + dy, p);
        } else {
            hline(s, cx - out_ext, cx + out_ext, cy + dy, p);
        }
    }
}

/// Midpoint ellipse outline, both regions.
fn outline_ellipse<S: Surface + ?Sized>(s: &mut S, cx: i32, cy: i32, rx: i32, ry: i32, p: S::Pixel) {
    let (rx2, ry2) = (rx as i64 * rx as i64, ry as i64 * ry as i64);
    let mut x = 0i64;
    let mut y = ry as i64;
    let mut d1 = ry2 - rx2 * y + rx2 / 4;
    let mut dx = 2 * ry2 * x;
    let mut dy = 2 * rx2 * y;
    while dx < dy {
        plot4(s, cx, cy, x as i32, y as i32, p);
        if d1 < 0 {
            x += 1;
            dx += 2 * ry2;
            d1 += dx + ry2;
        } else {
            x += 1;
            y -= 1;
            dx += 2 * ry2;
            dy -= 2 * rx2;
            d1 += dx - dy + ry2;
        }
    }
    let mut d2 = ry2 * (2 * x + 1) * (2 * x + 1) / 4 + rx2 * (y - 1) * (y - 1) - rx2 * ry2;
    while y >= 0 {
        plot4(s, cx, cy, x as i32, y as i32, p);
        if d2 > 0 {
            y -= 1;
            dy -= 2 * rx2;
            d2 += rx2 - dy;
        } else {
            y -= 1;
            x += 1;
            dx += 2 * ry2;
            dy -= 2 * rx2;
            d2 += dx - dy + rx2;
        }
    }
}

fn plot4<S: Surface + ?Sized>(s: &mut S, cx: i32, cy: i32, x: i32, y: i32, p: S::Pixel) {
    s.set_pixel(cx + x, cy + y, p);
    s.set_pixel(cx - x, cy + y, p);
    s.set_pixel(cx + x, cy - y, p);
    s.set_pixel(cx - x, cy - y, p);
}
