pub mod region;
pub mod report;
pub mod stats;
pub mod verdict;
pub mod view;

pub use region::{RegionLabel, SensitiveRegion, NORMALIZED_SCALE};
pub use report::{DraftReport, GeoPoint, Report, Venue};
pub use stats::{UserStats, DEFAULT_USERNAME};
pub use verdict::{RejectionReason, ViolationVerdict, MAX_REPORT_POINTS, MIN_CONFIDENCE};
pub use view::NextView;
