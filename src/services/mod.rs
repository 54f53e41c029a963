pub mod activity_recorder;
pub mod code_extractor;
pub mod language_resolver;
pub mod notifier;
pub mod stats_extractor;

pub use activity_recorder::{ActivityEntry, ActivityKind, ActivityRecorder};
pub use code_extractor::CodeExtractor;
pub use language_resolver::LanguageResolver;
pub use notifier::Notifier;
pub use stats_extractor::StatsExtractor;
