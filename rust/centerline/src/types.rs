// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for line pairing and centerline synthesis

use nalgebra::{Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D point (simplified for serialization)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_nalgebra(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn from_nalgebra(p: &Point3<f64>) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }

    pub fn distance_to(&self, other: &Point3D) -> f64 {
        (other.to_nalgebra() - self.to_nalgebra()).norm()
    }
}

/// Line geometry as delivered by a drawing source, tagged with its layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawLine {
    pub layer: String,
    pub start: Point3D,
    pub end: Point3D,
}

impl RawLine {
    pub fn new(layer: impl Into<String>, start: Point3D, end: Point3D) -> Self {
        Self {
            layer: layer.into(),
            start,
            end,
        }
    }

    /// Line in the drawing plane (z = 0)
    pub fn planar(layer: impl Into<String>, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(layer, Point3D::new(x1, y1, 0.0), Point3D::new(x2, y2, 0.0))
    }
}

/// Which end of a segment an endpoint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndpointRole {
    Start,
    End,
}

/// Bounded straight segment with cached direction and length.
///
/// `direction` is always `normalize(end - start)` and `length` is strictly
/// positive; the only way to build one is through [`LineSegment::new`] or
/// [`LineSegment::from_raw`], which drop degenerate and non-finite input.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    start: Point3<f64>,
    end: Point3<f64>,
    direction: Unit<Vector3<f64>>,
    length: f64,
}

impl LineSegment {
    /// Build a segment, or `None` if it is shorter than `min_length` or has
    /// non-finite coordinates.
    pub fn new(start: Point3<f64>, end: Point3<f64>, min_length: f64) -> Option<Self> {
        if !start.coords.iter().chain(end.coords.iter()).all(|c| c.is_finite()) {
            return None;
        }

        let delta = end - start;
        let length = delta.norm();
        if length <= 0.0 || !length.is_finite() || length < min_length {
            return None;
        }

        Some(Self {
            start,
            end,
            direction: Unit::new_unchecked(delta / length),
            length,
        })
    }

    pub fn from_raw(raw: &RawLine, min_length: f64) -> Option<Self> {
        Self::new(raw.start.to_nalgebra(), raw.end.to_nalgebra(), min_length)
    }

    pub fn start(&self) -> Point3<f64> {
        self.start
    }

    pub fn end(&self) -> Point3<f64> {
        self.end
    }

    pub fn direction(&self) -> Unit<Vector3<f64>> {
        self.direction
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn endpoint(&self, role: EndpointRole) -> Point3<f64> {
        match role {
            EndpointRole::Start => self.start,
            EndpointRole::End => self.end,
        }
    }

    /// Point at parameter `t` (0 at `start`, 1 at `end`)
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.start + (self.end - self.start) * t
    }

    /// Copy of this segment with one endpoint pushed outward by `distance`.
    ///
    /// END moves forward along `direction`, START moves backward, so the
    /// segment only ever grows and keeps its direction.
    pub fn extended(&self, role: EndpointRole, distance: f64) -> Self {
        let offset = self.direction.into_inner() * distance;
        let (start, end) = match role {
            EndpointRole::Start => (self.start - offset, self.end),
            EndpointRole::End => (self.start, self.end + offset),
        };

        Self {
            start,
            end,
            direction: self.direction,
            length: self.length + distance,
        }
    }
}

/// Two segments accepted as opposite edges of one linear run
#[derive(Debug, Clone)]
pub struct ParallelPair {
    pub line1: LineSegment,
    pub line2: LineSegment,
    pub perpendicular_distance: f64,
    pub overlap_length: f64,
    /// `|dot(dir1, dir2)|`
    pub alignment: f64,
    /// `line1.end` touches `line2.start`
    pub is_coincident: bool,
}

/// Synthesized run axis with the width of the originating pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Centerline {
    pub start: Point3D,
    pub end: Point3D,
    pub width: f64,
}

impl Centerline {
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn midpoint(&self) -> Point3D {
        Point3D::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
            (self.start.z + self.end.z) / 2.0,
        )
    }

    /// Unit direction from `start` to `end`, `None` for a zero-length line
    pub fn direction(&self) -> Option<Unit<Vector3<f64>>> {
        Unit::try_new(self.end.to_nalgebra() - self.start.to_nalgebra(), 1e-12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn segment_caches_direction_and_length() {
        let seg = LineSegment::new(Point3::new(1.0, 1.0, 0.0), Point3::new(4.0, 5.0, 0.0), 0.01)
            .unwrap();

        assert_relative_eq!(seg.length(), 5.0);
        assert_relative_eq!(seg.direction().x, 0.6);
        assert_relative_eq!(seg.direction().y, 0.8);
    }

    #[test]
    fn short_and_non_finite_segments_are_rejected() {
        let origin = Point3::new(0.0, 0.0, 0.0);

        assert!(LineSegment::new(origin, origin, 0.0).is_none());
        assert!(LineSegment::new(origin, Point3::new(0.005, 0.0, 0.0), 0.01).is_none());
        assert!(LineSegment::new(origin, Point3::new(f64::NAN, 1.0, 0.0), 0.01).is_none());
        assert!(LineSegment::new(origin, Point3::new(f64::INFINITY, 0.0, 0.0), 0.01).is_none());
    }

    #[test]
    fn extended_moves_endpoints_outward() {
        let seg = LineSegment::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0), 0.01)
            .unwrap();

        let forward = seg.extended(EndpointRole::End, 0.5);
        assert_relative_eq!(forward.end().x, 2.5);
        assert_relative_eq!(forward.length(), 2.5);

        let backward = seg.extended(EndpointRole::Start, 0.5);
        assert_relative_eq!(backward.start().x, -0.5);
        assert_relative_eq!(backward.direction().x, 1.0);
    }

    #[test]
    fn planar_raw_line_lies_at_zero_elevation() {
        let raw = RawLine::planar("M-DUCT", 0.0, 0.0, 3.0, 4.0);
        let seg = LineSegment::from_raw(&raw, 0.01).unwrap();

        assert_eq!(seg.start().z, 0.0);
        assert_relative_eq!(seg.length(), 5.0);
    }

    #[test]
    fn centerline_helpers() {
        let line = Centerline {
            start: Point3D::new(0.0, 0.5, 0.0),
            end: Point3D::new(10.0, 0.5, 0.0),
            width: 1.0,
        };

        assert_relative_eq!(line.length(), 10.0);
        assert_eq!(line.midpoint(), Point3D::new(5.0, 0.5, 0.0));
        assert_relative_eq!(line.direction().unwrap().x, 1.0);
    }
}
