// THEORY:
// The `FingerCounter` is the per-frame half of the gesture classifier. It strings the
// contour and defect stages together and reports a `HandReading` describing what it
// saw in one mask: nothing, something too small to be a hand, a shape too degenerate
// to analyse, or a hand with a finger count.
//
// Each rejection is a legitimate reading whose finger count is 0. The counter never
// returns an error; a bad frame just means "no hand this tick".

use serde::{Deserialize, Serialize};

use crate::core_modules::contour::{HandContour, dominant_contour, extract_contours};
use crate::core_modules::defect_analyzer::defect_analyzer::{
    GapCriteria, convex_hull_indices, convexity_defects, count_finger_gaps, fingers_from_gaps,
};
use crate::core_modules::segmenter::SkinMask;

/// Largest finger count the classifier ever reports.
pub const MAX_FINGERS: u8 = 5;

/// The defect analysis needs at least this many hull vertices.
const MIN_HULL_POINTS: usize = 4;

/// Calibration for contour and defect analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// A hand must enclose more than this many mask pixels. Tuned for a 300x300 ROI.
    pub min_hand_area: f64,
    /// Defects no deeper than this (pixels) are treated as contour noise.
    pub min_defect_depth: f32,
    /// Widest angle at the far point that still counts as a gap between fingers.
    pub max_gap_angle_deg: f64,
    /// Upper clamp on the finger count.
    pub max_fingers: u8,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_hand_area: 3000.0,
            min_defect_depth: 10.0,
            max_gap_angle_deg: 90.0,
            max_fingers: MAX_FINGERS,
        }
    }
}

impl ClassifierConfig {
    pub fn gap_criteria(&self) -> GapCriteria {
        GapCriteria {
            min_depth: self.min_defect_depth,
            max_angle_deg: self.max_gap_angle_deg,
        }
    }
}

/// What the counter concluded from a single mask.
#[derive(Debug, Clone, PartialEq)]
pub enum HandReading {
    /// The mask contains no foreground at all.
    NoContour,
    /// The largest region does not exceed the area gate.
    TooSmall { area: f64 },
    /// The outline has too few hull vertices for defect analysis.
    DegenerateHull { area: f64, hull_points: usize },
    /// A hand with `fingers` raised.
    Hand {
        area: f64,
        finger_gaps: usize,
        fingers: u8,
    },
}

impl HandReading {
    /// The raw finger count for this tick, 0 when no hand was resolved.
    pub fn finger_count(&self) -> u8 {
        match self {
            HandReading::Hand { fingers, .. } => *fingers,
            _ => 0,
        }
    }
}

/// Stateless contour/defect classifier.
#[derive(Debug, Clone, Default)]
pub struct FingerCounter {
    config: ClassifierConfig,
}

impl FingerCounter {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn read_mask(&self, mask: &SkinMask) -> HandReading {
        match dominant_contour(extract_contours(mask)) {
            Some(contour) => self.read_contour(&contour),
            None => HandReading::NoContour,
        }
    }

    pub fn read_contour(&self, contour: &HandContour) -> HandReading {
        let area = contour.area;
        if area <= self.config.min_hand_area {
            return HandReading::TooSmall { area };
        }

        let hull = convex_hull_indices(&contour.points);
        if hull.len() < MIN_HULL_POINTS {
            return HandReading::DegenerateHull {
                area,
                hull_points: hull.len(),
            };
        }

        let defects = convexity_defects(&contour.points, &hull);
        let finger_gaps = count_finger_gaps(&contour.points, &defects, &self.config.gap_criteria());
        let max_fingers = self.config.max_fingers.min(MAX_FINGERS);

        HandReading::Hand {
            area,
            finger_gaps,
            fingers: fingers_from_gaps(finger_gaps, max_fingers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use imageproc::drawing::draw_polygon_mut;
    use imageproc::point::Point;

    fn four_finger_outline(scale: i32) -> Vec<Point<i32>> {
        [
            (0, 60),
            (10, 40),
            (30, 90),
            (50, 10),
            (70, 90),
            (90, 10),
            (110, 90),
            (130, 40),
            (140, 60),
            (140, 200),
            (0, 200),
        ]
        .iter()
        .map(|&(x, y)| Point::new(x * scale / 2 + 20, y * scale / 2 + 20))
        .collect()
    }

    #[test]
    fn area_gate_rejects_small_regions_whatever_their_shape() {
        let small = HandContour::new(vec![
            Point::new(0, 0),
            Point::new(20, 0),
            Point::new(20, 50),
            Point::new(0, 50),
        ]);
        assert_eq!(small.area, 1000.0);

        let reading = FingerCounter::default().read_contour(&small);
        assert_eq!(reading, HandReading::TooSmall { area: 1000.0 });
        assert_eq!(reading.finger_count(), 0);
    }

    #[test]
    fn a_region_of_exactly_the_minimum_area_is_rejected() {
        let block = HandContour::new(vec![
            Point::new(0, 0),
            Point::new(60, 0),
            Point::new(60, 50),
            Point::new(0, 50),
        ]);
        assert_eq!(block.area, 3000.0);
        assert_eq!(
            FingerCounter::default().read_contour(&block),
            HandReading::TooSmall { area: 3000.0 }
        );

        let just_larger = HandContour::new(vec![
            Point::new(0, 0),
            Point::new(61, 0),
            Point::new(61, 50),
            Point::new(0, 50),
        ]);
        assert_eq!(FingerCounter::default().read_contour(&just_larger).finger_count(), 1);
    }

    #[test]
    fn three_valleys_read_as_four_fingers() {
        let outline = HandContour::new(four_finger_outline(2));
        assert!(outline.area > 3000.0);

        let reading = FingerCounter::default().read_contour(&outline);
        assert!(matches!(reading, HandReading::Hand { finger_gaps: 3, fingers: 4, .. }));
    }

    #[test]
    fn a_large_triangle_has_too_few_hull_points() {
        let triangle = HandContour::new(vec![
            Point::new(0, 0),
            Point::new(200, 0),
            Point::new(100, 150),
        ]);
        let reading = FingerCounter::default().read_contour(&triangle);
        assert_eq!(
            reading,
            HandReading::DegenerateHull {
                area: 15000.0,
                hull_points: 3
            }
        );
        assert_eq!(reading.finger_count(), 0);
    }

    #[test]
    fn a_fist_reads_as_one_finger() {
        let fist = HandContour::new(vec![
            Point::new(0, 0),
            Point::new(100, 0),
            Point::new(100, 100),
            Point::new(0, 100),
        ]);
        let reading = FingerCounter::default().read_contour(&fist);
        assert_eq!(reading.finger_count(), 1);
    }

    #[test]
    fn empty_mask_reads_no_contour() {
        let mask = SkinMask::from_gray(GrayImage::new(64, 64));
        assert_eq!(FingerCounter::default().read_mask(&mask), HandReading::NoContour);
    }

    #[test]
    fn rasterized_hand_keeps_its_valleys() {
        let mut image = GrayImage::new(260, 340);
        draw_polygon_mut(&mut image, &four_finger_outline(3), Luma([255]));

        let reading = FingerCounter::default().read_mask(&SkinMask::from_gray(image));
        assert_eq!(reading.finger_count(), 4, "{reading:?}");
    }

    #[test]
    fn lower_max_fingers_clamps_the_count() {
        let counter = FingerCounter::new(ClassifierConfig {
            max_fingers: 2,
            ..ClassifierConfig::default()
        });
        let reading = counter.read_contour(&HandContour::new(four_finger_outline(2)));
        assert_eq!(reading.finger_count(), 2);
    }
}
