//! Geometry kernel: wall reference lines, visual rectangles, and projections.
//!
//! A wall is authored as a *reference line* (two endpoints) plus a thickness
//! and an [`Alignment`] saying which side of the line the thickness grows
//! from. It is stored like every other floor object, as an unrotated
//! rectangle (`x`, `y`, `width`, `height`) rotated clockwise by `rotation`
//! degrees about its own center. [`wall_from_points`] and [`wall_endpoints`]
//! convert between the two forms and are exact inverses of each other.
//!
//! Nothing here fails. Degenerate input is clamped: walls never get shorter
//! than [`MIN_WALL_LENGTH`], and projecting onto a zero-length segment lands
//! at its midpoint.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use crate::camera::Point;
use crate::consts::MIN_WALL_LENGTH;
use crate::doc::Alignment;

/// Position and extent of an object: top-left of the unrotated rectangle,
/// its size, and a clockwise rotation in degrees about the rectangle center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl Placement {
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Placement of the given size centered on `center`.
    #[must_use]
    pub fn centered(center: Point, width: f64, height: f64, rotation: f64) -> Self {
        Self { x: center.x - width / 2.0, y: center.y - height / 2.0, width, height, rotation }
    }

    /// The four corners after rotation, clockwise from the unrotated top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        let c = self.center();
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(lx, ly)| local_to_world(c, self.rotation, Point::new(lx, ly)))
    }

    /// Axis-aligned bounds of the rotated rectangle.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::around(&self.corners())
    }

    /// Express a world point in the rectangle's local frame (origin at center, unrotated axes).
    #[must_use]
    pub fn to_local(&self, world: Point) -> Point {
        let d = world.sub(self.center());
        let (sin, cos) = (-self.rotation).to_radians().sin_cos();
        Point::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Smallest box containing all `points`. An empty slice yields a zero box at the origin.
    #[must_use]
    pub fn around(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self { min_x: 0.0, min_y: 0.0, max_x: 0.0, max_y: 0.0 };
        };
        points.iter().skip(1).fold(
            Self { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y },
            |b, p| Self {
                min_x: b.min_x.min(p.x),
                min_y: b.min_y.min(p.y),
                max_x: b.max_x.max(p.x),
                max_y: b.max_y.max(p.y),
            },
        )
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    #[must_use]
    pub fn padded(self, pad: f64) -> Self {
        Self { min_x: self.min_x - pad, min_y: self.min_y - pad, max_x: self.max_x + pad, max_y: self.max_y + pad }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// A wall's reference line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn direction(&self) -> Point {
        self.end.sub(self.start)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point {
        self.start.lerp(self.end, t)
    }

    /// Clockwise angle of the segment in degrees; a zero-length segment has angle 0.
    #[must_use]
    pub fn angle_deg(&self) -> f64 {
        let d = self.direction();
        if d.x == 0.0 && d.y == 0.0 {
            return 0.0;
        }
        d.y.atan2(d.x).to_degrees()
    }
}

/// Result of projecting a point onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub point: Point,
    /// Fractional position along the segment, `0` at start and `1` at end.
    pub t: f64,
}

/// Signed offset from the reference line to the wall's visual centerline,
/// measured along the wall's normal.
#[must_use]
pub fn alignment_offset(thickness: f64, alignment: Alignment) -> f64 {
    match alignment {
        Alignment::Center => 0.0,
        Alignment::Left => -thickness / 2.0,
        Alignment::Right => thickness / 2.0,
    }
}

/// Build a wall's visual rectangle from its reference line.
///
/// The reference line keeps `start` fixed; when the two points are closer
/// than [`MIN_WALL_LENGTH`] the far end is pushed out along the same
/// direction (or along +x when the points coincide).
#[must_use]
pub fn wall_from_points(start: Point, end: Point, thickness: f64, alignment: Alignment) -> Placement {
    let seg = Segment::new(start, end);
    let length = seg.length().max(MIN_WALL_LENGTH);
    let rotation = seg.angle_deg();
    let (sin, cos) = rotation.to_radians().sin_cos();
    let dir = Point::new(cos, sin);
    let normal = Point::new(-sin, cos);

    let mid = start.add(dir.scale(length / 2.0));
    let center = mid.add(normal.scale(alignment_offset(thickness, alignment)));
    Placement::centered(center, length, thickness, rotation)
}

/// Recover a wall's reference line from its visual rectangle.
#[must_use]
pub fn wall_endpoints(placement: &Placement, alignment: Alignment) -> Segment {
    let (sin, cos) = placement.rotation.to_radians().sin_cos();
    let dir = Point::new(cos, sin);
    let normal = Point::new(-sin, cos);

    let mid = placement.center().sub(normal.scale(alignment_offset(placement.height, alignment)));
    let half = dir.scale(placement.width / 2.0);
    Segment::new(mid.sub(half), mid.add(half))
}

/// Fractional position of `point` along `seg`, unclamped.
///
/// Uses `((point - start) · dir) / |dir|²`; a zero-length segment yields `0.5`.
#[must_use]
pub fn fraction_along(point: Point, seg: &Segment) -> f64 {
    let dir = seg.direction();
    let len_sq = dir.dot(dir);
    if len_sq <= f64::EPSILON {
        return 0.5;
    }
    point.sub(seg.start).dot(dir) / len_sq
}

/// Clamp a fractional position so an object of `object_width` stays inside `seg`.
///
/// Without a width, `t` is clamped to `[0, 1]`. An object wider than the
/// segment is centered.
#[must_use]
pub fn clamp_fraction(t: f64, seg: &Segment, object_width: Option<f64>) -> f64 {
    let Some(width) = object_width else {
        return t.clamp(0.0, 1.0);
    };
    let len = seg.length();
    if len <= f64::EPSILON || width >= len {
        return 0.5;
    }
    let margin = (width / 2.0) / len;
    t.clamp(margin, 1.0 - margin)
}

/// Project `point` onto `seg`, optionally keeping an object of `object_width` within the span.
#[must_use]
pub fn project_point_onto_wall(point: Point, seg: &Segment, object_width: Option<f64>) -> Projection {
    let t = clamp_fraction(fraction_along(point, seg), seg, object_width);
    Projection { point: seg.point_at(t), t }
}

/// Transform a point from a rectangle's local frame into world space.
#[must_use]
pub fn local_to_world(center: Point, rotation_deg: f64, local: Point) -> Point {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    Point::new(center.x + local.x * cos - local.y * sin, center.y + local.x * sin + local.y * cos)
}

/// Normalize an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}
