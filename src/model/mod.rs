pub mod argument;
pub mod clash;
pub mod comment;
pub mod config;
pub mod issue;
pub mod speaker;
pub mod verdict;
pub mod wire;

pub use argument::{
    Argument, ArgumentEvaluation, ArgumentStatus, Position, Warrant, WarrantQuality, WarrantType,
};
pub use clash::{Clash, ClashType, ClashWinner};
pub use comment::{Comment, DebateRequest, PositionDefinitions, ThreadStats};
pub use config::{ConfigError, IssueWeights, ScoringConfig, SpeakerPointScale};
pub use issue::{Issue, Outcome};
pub use speaker::{BurdenAnalysis, SpeakerEvaluation};
pub use verdict::{DebateReport, DisplayScores, Verdict};
