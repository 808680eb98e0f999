use crate::core::models::Task;

/// System instruction sent ahead of the task list.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes todo lists in a concise, \
organized, and actionable way. Group related items when possible, prioritize tasks, and keep the \
summary brief but complete.";

/// Max characters kept from a single title or description before it enters a prompt
pub const MAX_FIELD_LEN: usize = 500;

/// Remove control characters and hard-truncate a task field for prompt use.
pub fn sanitize_field(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control())
        .take(MAX_FIELD_LEN)
        .collect::<String>()
        .trim()
        .to_string()
}

/// One bullet per task, in the order given.
///
/// `- <title>` or `- <title>: <description>` when the description is non-empty.
pub fn format_task_list(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|task| {
            let title = sanitize_field(&task.title);
            let description = sanitize_field(&task.description);
            if description.is_empty() {
                format!("- {title}")
            } else {
                format!("- {title}: {description}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Role-tagged prompt handed to a summarizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPrompt {
    pub system: String,
    pub user: String,
}

impl SummaryPrompt {
    pub fn for_task_list(task_list: &str) -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            user: format!("Please summarize this todo list:\n\n{task_list}"),
        }
    }
}

/// Deterministic summary used when the summarizer is unavailable.
pub fn fallback_summary(pending_count: usize, task_list: &str) -> String {
    format!(
        "*Todo Summary*\n\nYou currently have {pending_count} pending task(s):\n\n{task_list}\n\nFocus on completing these tasks to stay productive!"
    )
}
