//! Image/view coordinate mapping under pan and zoom.
//!
//! The view transform is a uniform scale followed by a translation:
//! `view = image * scale + offset`. All framing operations (zoom-to-cursor,
//! fit-to-window, focus-on-pose) only ever rewrite `scale` and `offset`.

use crate::constants::{
    FIT_MARGIN, FOCUS_MAX_SCALE, FOCUS_MIN_EXTENT, FOCUS_PADDING, MAX_SCALE, MIN_SCALE,
    ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};

/// A 2D point, in either image pixels or view pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Sum of the absolute axis differences.
    pub fn manhattan_distance(&self, other: Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Width and height of an image or a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned box given by its min and max corners (image pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Pan/zoom state mapping image coordinates to view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    scale: f64,
    offset: Point,
}

impl ViewTransform {
    /// Create a transform; the scale is clamped into the allowed range.
    pub fn new(scale: f64, offset: Point) -> Self {
        Self {
            scale: clamp_scale(scale),
            offset,
        }
    }

    /// Identity transform (scale 1, no offset).
    pub fn identity() -> Self {
        Self::new(1.0, Point::default())
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Map an image-space point into view space.
    pub fn image_to_view(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.offset.x,
            p.y * self.scale + self.offset.y,
        )
    }

    /// Map a view-space point back into image space.
    pub fn view_to_image(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset.x) / self.scale,
            (p.y - self.offset.y) / self.scale,
        )
    }

    /// Zoom by `factor` keeping the image point under `view_point` fixed.
    ///
    /// The new scale is clamped; the offset is corrected by the image point
    /// under the cursor times the scale delta, so anchoring holds even when
    /// the clamp shortens the step.
    pub fn zoom_at(&mut self, view_point: Point, factor: f64) {
        let anchor = self.view_to_image(view_point);
        let new_scale = clamp_scale(self.scale * factor);
        let delta = new_scale - self.scale;

        self.offset.x -= anchor.x * delta;
        self.offset.y -= anchor.y * delta;
        self.scale = new_scale;
    }

    /// Apply discrete wheel steps: positive steps zoom in, negative zoom out.
    pub fn wheel(&mut self, view_point: Point, steps: i32) {
        let factor = if steps > 0 {
            ZOOM_IN_FACTOR
        } else {
            ZOOM_OUT_FACTOR
        };
        for _ in 0..steps.unsigned_abs() {
            self.zoom_at(view_point, factor);
        }
    }

    /// Translate the view by a delta in view pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset.x += dx;
        self.offset.y += dy;
    }

    /// Show the whole image centered with a small margin.
    pub fn fit_to_window(&mut self, image: Size, viewport: Size) {
        if image.is_empty() || viewport.is_empty() {
            return;
        }

        let scale_x = viewport.width / image.width;
        let scale_y = viewport.height / image.height;
        self.scale = clamp_scale(scale_x.min(scale_y) * FIT_MARGIN);

        self.offset = Point::new(
            (viewport.width - image.width * self.scale) / 2.0,
            (viewport.height - image.height * self.scale) / 2.0,
        );
    }

    /// Frame a keypoint bounding box with padding.
    ///
    /// Boxes below the noise floor on either axis (or no box at all) mean
    /// there is no usable pose yet, and the whole image is shown instead.
    pub fn focus_on_bbox(&mut self, bbox: Option<BoundingBox>, image: Size, viewport: Size) {
        let Some(bbox) = bbox else {
            self.fit_to_window(image, viewport);
            return;
        };
        if bbox.width() < FOCUS_MIN_EXTENT || bbox.height() < FOCUS_MIN_EXTENT {
            self.fit_to_window(image, viewport);
            return;
        }
        if viewport.is_empty() {
            return;
        }

        let padding_x = bbox.width() * FOCUS_PADDING;
        let padding_y = bbox.height() * FOCUS_PADDING;
        let target_w = bbox.width() + padding_x;
        let target_h = bbox.height() + padding_y;
        let center_x = bbox.min_x - padding_x / 2.0 + target_w / 2.0;
        let center_y = bbox.min_y - padding_y / 2.0 + target_h / 2.0;

        let covering = (viewport.width / target_w).min(viewport.height / target_h);
        self.scale = clamp_scale(covering.min(FOCUS_MAX_SCALE));

        self.offset = Point::new(
            viewport.width / 2.0 - center_x * self.scale,
            viewport.height / 2.0 - center_y * self.scale,
        );
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn points_eq(a: Point, b: Point) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
    }

    #[test]
    fn test_identity_transform() {
        let t = ViewTransform::identity();
        assert_eq!(t.scale(), 1.0);
        assert_eq!(t.offset(), Point::default());
        assert_eq!(t.image_to_view(Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_image_to_view_applies_scale_then_offset() {
        let t = ViewTransform::new(2.0, Point::new(10.0, -5.0));
        assert_eq!(t.image_to_view(Point::new(3.0, 4.0)), Point::new(16.0, 3.0));
    }

    #[test]
    fn test_roundtrip_across_scale_range() {
        let p = Point::new(123.456, -78.9);
        for scale in [0.1, 0.37, 1.0, 4.2, 11.0, 20.0] {
            let t = ViewTransform::new(scale, Point::new(-312.5, 47.25));
            let back = t.view_to_image(t.image_to_view(p));
            assert!(points_eq(p, back), "scale {scale}: {back:?}");
        }
    }

    #[test]
    fn test_new_clamps_scale() {
        assert_eq!(ViewTransform::new(0.01, Point::default()).scale(), MIN_SCALE);
        assert_eq!(ViewTransform::new(50.0, Point::default()).scale(), MAX_SCALE);
    }

    #[test]
    fn test_zoom_at_keeps_cursor_anchor() {
        let mut t = ViewTransform::new(1.3, Point::new(40.0, 25.0));
        let cursor = Point::new(310.0, 207.0);
        let before = t.view_to_image(cursor);

        t.zoom_at(cursor, ZOOM_IN_FACTOR);
        assert!(approx_eq(t.scale(), 1.3 * ZOOM_IN_FACTOR));
        assert!(points_eq(t.view_to_image(cursor), before));

        t.zoom_at(cursor, ZOOM_OUT_FACTOR);
        assert!(points_eq(t.view_to_image(cursor), before));
    }

    #[test]
    fn test_zoom_at_clamped_still_anchors() {
        let mut t = ViewTransform::new(19.5, Point::new(-100.0, -80.0));
        let cursor = Point::new(50.0, 60.0);
        let before = t.view_to_image(cursor);

        t.zoom_at(cursor, ZOOM_IN_FACTOR);
        assert_eq!(t.scale(), MAX_SCALE);
        assert!(points_eq(t.view_to_image(cursor), before));
    }

    #[test]
    fn test_wheel_steps() {
        let mut t = ViewTransform::identity();
        t.wheel(Point::new(0.0, 0.0), 2);
        assert!(approx_eq(t.scale(), 1.21));
        t.wheel(Point::new(0.0, 0.0), -1);
        assert!(approx_eq(t.scale(), 1.21 * 0.9));
    }

    #[test]
    fn test_pan_by() {
        let mut t = ViewTransform::new(2.0, Point::new(10.0, 20.0));
        t.pan_by(5.0, -10.0);
        assert_eq!(t.offset(), Point::new(15.0, 10.0));
        assert_eq!(t.scale(), 2.0);
    }

    #[test]
    fn test_fit_to_window_centers_image() {
        let mut t = ViewTransform::identity();
        t.fit_to_window(Size::new(1000.0, 500.0), Size::new(800.0, 600.0));

        // Width-limited: 0.8 * 0.9
        assert!(approx_eq(t.scale(), 0.72));
        assert!(approx_eq(t.offset().x, (800.0 - 720.0) / 2.0));
        assert!(approx_eq(t.offset().y, (600.0 - 360.0) / 2.0));
    }

    #[test]
    fn test_fit_to_window_ignores_empty_sizes() {
        let mut t = ViewTransform::new(3.0, Point::new(1.0, 2.0));
        t.fit_to_window(Size::new(0.0, 100.0), Size::new(800.0, 600.0));
        assert_eq!(t, ViewTransform::new(3.0, Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_focus_on_bbox_centers_padded_box() {
        let mut t = ViewTransform::identity();
        let bbox = BoundingBox::new(100.0, 200.0, 300.0, 400.0);
        let viewport = Size::new(600.0, 600.0);
        t.focus_on_bbox(Some(bbox), Size::new(2000.0, 2000.0), viewport);

        // Padded box is 300x300, so the covering scale is 2.0
        assert!(approx_eq(t.scale(), 2.0));
        let center = t.image_to_view(Point::new(200.0, 300.0));
        assert!(points_eq(center, Point::new(300.0, 300.0)));
    }

    #[test]
    fn test_focus_on_bbox_caps_magnification() {
        let mut t = ViewTransform::identity();
        let bbox = BoundingBox::new(10.0, 10.0, 22.0, 22.0);
        t.focus_on_bbox(Some(bbox), Size::new(640.0, 480.0), Size::new(1000.0, 1000.0));
        assert_eq!(t.scale(), FOCUS_MAX_SCALE);
    }

    #[test]
    fn test_focus_on_tiny_bbox_falls_back_to_fit() {
        let image = Size::new(400.0, 300.0);
        let viewport = Size::new(800.0, 600.0);

        let mut focused = ViewTransform::identity();
        focused.focus_on_bbox(
            Some(BoundingBox::new(50.0, 50.0, 55.0, 200.0)),
            image,
            viewport,
        );

        let mut fitted = ViewTransform::identity();
        fitted.fit_to_window(image, viewport);
        assert_eq!(focused, fitted);

        let mut none = ViewTransform::identity();
        none.focus_on_bbox(None, image, viewport);
        assert_eq!(none, fitted);
    }
}
