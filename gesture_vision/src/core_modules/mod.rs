pub mod capture;
pub mod contour;
pub mod defect_analyzer;
pub mod finger_counter;
pub mod frame;
pub mod hsv_pixel;
pub mod preview;
pub mod segmenter;
pub mod stability;
pub mod tracker;
