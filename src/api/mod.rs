pub mod error;
pub mod models;
pub mod session;

pub use error::{ParkingApiError, SessionError};
pub use session::{CaptureOutcome, LanguageOption, LevelProgress, LevelUpNotice, ParkingSession, PublishResult, RewardInfo};
