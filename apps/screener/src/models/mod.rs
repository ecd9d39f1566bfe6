pub mod criteria;
pub mod record;

pub use criteria::{parse_skill_list, JobCriteria};
pub use record::{Decision, ExtractedDocument, ScoreRecord, ScreeningOutcome, ScreeningStatus};
