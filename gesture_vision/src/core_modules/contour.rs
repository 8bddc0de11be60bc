// THEORY:
// The `contour` module finds the outline of the hand inside a `SkinMask`. Every
// border in the mask (outer borders and hole borders alike) is a candidate; the one
// enclosing the largest area is assumed to be the hand. Smaller regions are noise
// from lighting or skin-coloured background objects.
//
// A `HandContour` is a tick-local data container: the ordered boundary points and
// the enclosed area. The area is the absolute shoelace area of the boundary polygon,
// so a contour traced either way round gives the same value.

use imageproc::contours::find_contours;
use imageproc::point::Point;

use crate::core_modules::segmenter::SkinMask;

/// The dominant outline of the mask for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct HandContour {
    /// Boundary points in traversal order.
    pub points: Vec<Point<i32>>,
    /// Enclosed area in mask pixels.
    pub area: f64,
}

impl HandContour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        let area = polygon_area(&points);
        Self { points, area }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Extracts every border of the mask.
pub fn extract_contours(mask: &SkinMask) -> Vec<HandContour> {
    find_contours::<i32>(mask.as_gray())
        .into_iter()
        .filter(|contour| !contour.points.is_empty())
        .map(|contour| HandContour::new(contour.points))
        .collect()
}

/// Picks the contour with the largest enclosed area. Ties keep the first one seen.
pub fn dominant_contour(contours: Vec<HandContour>) -> Option<HandContour> {
    let mut best: Option<HandContour> = None;
    for contour in contours {
        let is_larger = best.as_ref().is_none_or(|b| contour.area > b.area);
        if is_larger {
            best = Some(contour);
        }
    }
    best
}

/// Absolute area of a closed polygon (shoelace formula). Fewer than three points
/// enclose nothing.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut twice_area = 0i64;
    for (i, current) in points.iter().enumerate() {
        let next = &points[(i + 1) % points.len()];
        twice_area += current.x as i64 * next.y as i64 - next.x as i64 * current.y as i64;
    }
    twice_area.abs() as f64 / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn rectangle(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<Point<i32>> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    #[test]
    fn shoelace_area_ignores_orientation() {
        let clockwise = rectangle(0, 0, 20, 50);
        let mut counter_clockwise = clockwise.clone();
        counter_clockwise.reverse();

        assert_eq!(polygon_area(&clockwise), 1000.0);
        assert_eq!(polygon_area(&counter_clockwise), 1000.0);
    }

    #[test]
    fn degenerate_polygons_have_no_area() {
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(polygon_area(&[Point::new(1, 1), Point::new(5, 5)]), 0.0);
        assert_eq!(
            polygon_area(&[Point::new(0, 0), Point::new(5, 5), Point::new(10, 10)]),
            0.0
        );
    }

    #[test]
    fn dominant_contour_is_the_largest() {
        let small = HandContour::new(rectangle(0, 0, 10, 10));
        let large = HandContour::new(rectangle(0, 0, 60, 60));
        let picked = dominant_contour(vec![small, large.clone()]).unwrap();
        assert_eq!(picked, large);
        assert!(dominant_contour(Vec::new()).is_none());
    }

    #[test]
    fn extraction_finds_each_blob() {
        let mut image = GrayImage::new(100, 100);
        for y in 10..30 {
            for x in 10..30 {
                image.put_pixel(x, y, Luma([255]));
            }
        }
        for y in 50..90 {
            for x in 40..90 {
                image.put_pixel(x, y, Luma([255]));
            }
        }

        let contours = extract_contours(&SkinMask::from_gray(image));
        assert_eq!(contours.len(), 2);

        let hand = dominant_contour(contours).unwrap();
        // Boundary pixels run from 40..=89 and 50..=89.
        assert_eq!(hand.area, 49.0 * 39.0);
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let contours = extract_contours(&SkinMask::from_gray(GrayImage::new(30, 30)));
        assert!(contours.is_empty());
    }
}
