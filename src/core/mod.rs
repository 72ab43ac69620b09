pub mod analyzer;
pub mod capture;
pub mod config;
pub mod detector;
pub mod gemini;
pub mod i18n;
pub mod retry;
pub mod storage;
pub mod venues;
