// THEORY:
// The `DefectAnalyzer` counts raised fingers from the shape of the hand outline.
// It is a stateless utility: one contour in, one count out, no memory of previous
// frames.
//
// Algorithm steps:
// 1.  **Convex Hull**: `imageproc`'s hull over the contour points, mapped back to
//     indices into the contour and sorted in contour order, because the defect step
//     walks the contour between consecutive hull vertices. Collinear points are
//     dropped, so a straight palm edge contributes only its two ends.
// 2.  **Convexity Defects**: between every pair of consecutive hull vertices, the
//     contour point that strays furthest from the hull edge marks a concavity. Its
//     distance is stored as a fixed-point integer (x256) the way capture libraries
//     report it, and normalized back to pixels when read.
// 3.  **Finger Gaps**: a deep defect whose (start, far, end) triangle has an acute
//     angle at the far point is the valley between two fingers. N valleys mean N+1
//     fingers, clamped to five.
//
// Every degenerate shape (too few points, zero-length triangle sides, coincident hull
// vertices) quietly contributes nothing rather than failing.

use imageproc::geometry::convex_hull;
use imageproc::point::Point;

pub mod defect_analyzer {
    use super::*;

    /// Fixed-point scale of `ConvexityDefect::depth_fixed`.
    pub const DEPTH_SCALE: f32 = 256.0;

    /// A concavity between the convex hull and the contour: a candidate finger gap.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ConvexityDefect {
        /// Contour index of the hull vertex where the concavity starts.
        pub start: usize,
        /// Contour index of the hull vertex where the concavity ends.
        pub end: usize,
        /// Contour index of the point deepest inside the concavity.
        pub far: usize,
        /// Distance from the hull edge to `far`, scaled by 256 and rounded.
        pub depth_fixed: i32,
    }

    impl ConvexityDefect {
        /// Depth in contour pixels.
        pub fn depth(&self) -> f32 {
            self.depth_fixed as f32 / DEPTH_SCALE
        }
    }

    /// Thresholds for deciding which defects are finger gaps.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct GapCriteria {
        /// Defects must be strictly deeper than this (pixels).
        pub min_depth: f32,
        /// The angle at the far point must be at most this (degrees).
        pub max_angle_deg: f64,
    }

    /// Indices of the convex hull vertices of `points`, sorted ascending. A vertex
    /// the contour visits more than once maps to its first visit.
    pub fn convex_hull_indices(points: &[Point<i32>]) -> Vec<usize> {
        // Repeated points would give the hull sort an inconsistent ordering.
        let mut distinct = points.to_vec();
        distinct.sort_by_key(|p| (p.x, p.y));
        distinct.dedup();

        let mut hull: Vec<usize> = convex_hull(distinct)
            .into_iter()
            .filter_map(|vertex| points.iter().position(|&p| p == vertex))
            .collect();
        hull.sort_unstable();
        hull.dedup();
        hull
    }

    /// Convexity defects of `points` given its ascending hull indices.
    pub fn convexity_defects(points: &[Point<i32>], hull: &[usize]) -> Vec<ConvexityDefect> {
        let count = points.len();
        if hull.len() < 3 || count < 4 || hull.iter().any(|&i| i >= count) {
            return Vec::new();
        }

        let mut defects = Vec::new();
        for (k, &start) in hull.iter().enumerate() {
            let end = hull[(k + 1) % hull.len()];
            let start_point = points[start];
            let end_point = points[end];

            let edge_x = (end_point.x - start_point.x) as f64;
            let edge_y = (end_point.y - start_point.y) as f64;
            let edge_len = (edge_x * edge_x + edge_y * edge_y).sqrt();
            let scale = if edge_len == 0.0 { 0.0 } else { 1.0 / edge_len };

            let mut deepest: Option<(usize, f64)> = None;
            let mut j = (start + 1) % count;
            while j != end {
                let dx = (points[j].x - start_point.x) as f64;
                let dy = (points[j].y - start_point.y) as f64;
                let distance = (edge_x * dy - edge_y * dx).abs() * scale;
                if distance > deepest.map_or(0.0, |(_, d)| d) {
                    deepest = Some((j, distance));
                }
                j = (j + 1) % count;
            }

            if let Some((far, distance)) = deepest {
                defects.push(ConvexityDefect {
                    start,
                    end,
                    far,
                    depth_fixed: (distance * DEPTH_SCALE as f64).round() as i32,
                });
            }
        }
        defects
    }

    /// Interior angle (degrees) at `far` of the triangle (start, far, end), by the
    /// law of cosines. `None` when a side meeting at `far` has zero length.
    pub fn angle_at_far(start: Point<i32>, far: Point<i32>, end: Point<i32>) -> Option<f64> {
        let a = distance(end, start);
        let b = distance(far, start);
        let c = distance(far, end);
        if b == 0.0 || c == 0.0 {
            return None;
        }
        let cosine = ((b * b + c * c - a * a) / (2.0 * b * c)).clamp(-1.0, 1.0);
        Some(cosine.acos().to_degrees())
    }

    /// Number of defects that qualify as gaps between raised fingers.
    pub fn count_finger_gaps(
        points: &[Point<i32>],
        defects: &[ConvexityDefect],
        criteria: &GapCriteria,
    ) -> usize {
        defects
            .iter()
            .filter(|defect| defect.depth() > criteria.min_depth)
            .filter(|defect| {
                let (Some(&start), Some(&far), Some(&end)) = (
                    points.get(defect.start),
                    points.get(defect.far),
                    points.get(defect.end),
                ) else {
                    return false;
                };
                angle_at_far(start, far, end).is_some_and(|angle| angle <= criteria.max_angle_deg)
            })
            .count()
    }

    /// N finger gaps mean N + 1 raised fingers, capped at `max_fingers`.
    pub fn fingers_from_gaps(gaps: usize, max_fingers: u8) -> u8 {
        gaps.saturating_add(1).min(max_fingers as usize) as u8
    }

    fn distance(p: Point<i32>, q: Point<i32>) -> f64 {
        let dx = (p.x - q.x) as f64;
        let dy = (p.y - q.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}
