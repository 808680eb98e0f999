pub mod summarize;
pub mod tasks;

pub use summarize::{SummaryOutcome, SummaryPipeline, SummaryReport, SummarySource};
pub use tasks::TaskService;
