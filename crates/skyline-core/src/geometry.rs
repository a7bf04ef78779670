//! Geometry on the ground (XZ) plane.
//!
//! The layout only needs axis-aligned rectangles: a [`Point`] marks a
//! top-left corner, a [`Size`] gives the footprint, and a [`Rect`] joins them.
//! Rectangles are half-open, so two rectangles that merely share an edge do
//! not intersect.

/// A point on the ground plane.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    z: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the z-coordinate of the point
    pub fn z(self) -> f32 {
        self.z
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            z: self.z + other.z,
        }
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            z: self.z * factor,
        }
    }
}

/// A footprint on the ground plane.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    depth: f32,
}

impl Size {
    pub fn new(width: f32, depth: f32) -> Self {
        Self { width, depth }
    }

    /// Extent along the x axis
    pub fn width(self) -> f32 {
        self.width
    }

    /// Extent along the z axis
    pub fn depth(self) -> f32 {
        self.depth
    }

    /// Returns a new size grown by `inset` on every side.
    pub fn add_inset(self, inset: f32) -> Self {
        Self {
            width: self.width + 2.0 * inset,
            depth: self.depth + 2.0 * inset,
        }
    }

    /// Multiplies both extents by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            depth: self.depth * factor,
        }
    }

    /// Returns true if `other` fits inside this size.
    pub fn contains(self, other: Size) -> bool {
        other.width <= self.width && other.depth <= self.depth
    }
}

/// An axis-aligned rectangle given by its top-left corner and footprint.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    origin: Point,
    size: Size,
}

impl Rect {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn origin(self) -> Point {
        self.origin
    }

    pub fn size(self) -> Size {
        self.size
    }

    pub fn min_x(self) -> f32 {
        self.origin.x
    }

    pub fn min_z(self) -> f32 {
        self.origin.z
    }

    pub fn max_x(self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn max_z(self) -> f32 {
        self.origin.z + self.size.depth
    }

    /// Returns true if the interiors of the two rectangles overlap.
    pub fn intersects(self, other: Rect) -> bool {
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_z() < other.max_z()
            && other.min_z() < self.max_z()
    }

    /// Returns true if `other` lies entirely within this rectangle.
    pub fn contains_rect(self, other: Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.min_z() >= self.min_z()
            && other.max_x() <= self.max_x()
            && other.max_z() <= self.max_z()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn rect(x: f32, z: f32, width: f32, depth: f32) -> Rect {
        Rect::new(Point::new(x, z), Size::new(width, depth))
    }

    #[test]
    fn test_point_add_and_scale() {
        let p = Point::new(1.0, 2.0).add_point(Point::new(3.0, 4.0)).scale(0.5);
        assert_approx_eq!(f32, p.x(), 2.0);
        assert_approx_eq!(f32, p.z(), 3.0);
    }

    #[test]
    fn test_size_add_inset() {
        let size = Size::new(2.0, 3.0).add_inset(4.0);
        assert_approx_eq!(f32, size.width(), 10.0);
        assert_approx_eq!(f32, size.depth(), 11.0);
    }

    #[test]
    fn test_size_contains() {
        let canvas = Size::new(10.0, 10.0);
        assert!(canvas.contains(Size::new(10.0, 10.0)));
        assert!(!canvas.contains(Size::new(10.5, 1.0)));
        assert!(!canvas.scale(0.5).contains(Size::new(6.0, 1.0)));
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(10.0, 0.0, 10.0, 10.0);
        let c = rect(0.0, 10.0, 10.0, 10.0);
        assert!(!a.intersects(b));
        assert!(!a.intersects(c));
        assert!(a.intersects(rect(9.0, 9.0, 2.0, 2.0)));
    }

    #[test]
    fn test_contains_rect() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        assert!(outer.contains_rect(outer));
        assert!(outer.contains_rect(rect(2.0, 3.0, 8.0, 7.0)));
        assert!(!outer.contains_rect(rect(2.0, 3.0, 8.5, 7.0)));
        assert!(!outer.contains_rect(rect(-1.0, 0.0, 2.0, 2.0)));
    }
}
