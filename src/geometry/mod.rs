//! Geometric primitives for the overlay model.
//!
//! Overlay boxes live in display space: origin at the top-left corner of the
//! page, y growing downwards, units in PDF points. PDF content space has its
//! origin at the bottom-left; [`flip_y`] converts between the two.

/// A 2D point in display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_overlay::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_overlay::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if this rectangle overlaps another, counting touching edges.
    ///
    /// Marquee selection uses this inclusive test so a drag that ends exactly
    /// on a box edge still selects it.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_overlay::geometry::Rect;
    ///
    /// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    /// let b = Rect::new(10.0, 10.0, 5.0, 5.0);
    /// assert!(a.touches(&b));
    /// assert!(!a.touches(&Rect::new(11.0, 0.0, 5.0, 5.0)));
    /// ```
    pub fn touches(&self, other: &Rect) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.bottom() < other.top()
            || self.top() > other.bottom())
    }

    /// Area of the overlap between two rectangles (0 when disjoint).
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let ix = (self.right().min(other.right()) - self.left().max(other.left())).max(0.0);
        let iy = (self.bottom().min(other.bottom()) - self.top().max(other.top())).max(0.0);
        ix * iy
    }

    /// Intersection over union.
    ///
    /// Each area is floored at 1 square unit so degenerate boxes do not divide by zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_overlay::geometry::Rect;
    ///
    /// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    /// assert_eq!(a.iou(&a), 1.0);
    /// assert_eq!(a.iou(&Rect::new(20.0, 20.0, 10.0, 10.0)), 0.0);
    /// ```
    pub fn iou(&self, other: &Rect) -> f32 {
        let inter = self.intersection_area(other);
        let a = self.area().max(1.0);
        let b = other.area().max(1.0);
        inter / (a + b - inter)
    }

    /// Compute the union of this rectangle with another.
    ///
    /// Returns the smallest rectangle that contains both rectangles.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_overlay::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 50.0, 50.0);
    /// let r2 = Rect::new(25.0, 25.0, 50.0, 50.0);
    /// let union = r1.union(&r2);
    ///
    /// assert_eq!(union.x, 0.0);
    /// assert_eq!(union.right(), 75.0);
    /// assert_eq!(union.bottom(), 75.0);
    /// ```
    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.left().min(other.left());
        let y0 = self.top().min(other.top());
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::from_points(x0, y0, x1, y1)
    }

    /// Bounding rectangle of a set of rectangles, `None` when empty.
    pub fn bounding<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
        rects.into_iter().fold(None, |acc: Option<Rect>, r| match acc {
            Some(acc) => Some(acc.union(r)),
            None => Some(*r),
        })
    }

    /// Compute the area of the rectangle.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Check that the rectangle lies within a `page_width` × `page_height` page.
    pub fn is_within(&self, page_width: f32, page_height: f32) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= page_width + 1e-3
            && self.bottom() <= page_height + 1e-3
    }
}

/// Clamp `value` to `[min, max]` as `min(max(value, min), max)`.
///
/// Unlike [`f32::clamp`] this never panics: when `min > max` the upper bound
/// wins, which is what a box larger than its page needs.
///
/// # Examples
///
/// ```
/// use pdf_overlay::geometry::clamp;
///
/// assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
/// assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
/// assert_eq!(clamp(3.0, 0.0, -2.0), -2.0);
/// ```
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Convert a PDF-space y (bottom-left origin) to a display-space top.
///
/// The result is clamped to `[0, page_height]`; non-finite input yields 0.
///
/// # Examples
///
/// ```
/// use pdf_overlay::geometry::flip_y;
///
/// assert_eq!(flip_y(792.0, 700.0), 92.0);
/// assert_eq!(flip_y(792.0, f32::NAN), 0.0);
/// ```
pub fn flip_y(page_height: f32, y: f32) -> f32 {
    let top = page_height - y;
    if !top.is_finite() {
        return 0.0;
    }
    clamp(top, 0.0, page_height)
}
