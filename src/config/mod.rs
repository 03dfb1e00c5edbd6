mod loader;
mod patterns;

pub use loader::{Config, DetectionConfig, ReportConfig, DEFAULT_ENTRY_PATTERNS};
pub use patterns::PatternSet;
