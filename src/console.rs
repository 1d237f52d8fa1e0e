//! Console front end — command parsing and plain-text rendering of views.

use std::str::FromStr;

use crate::state::{EmptyState, FetchStatus, InboxView, PriorityFilter};

const HIGHLIGHT_OPEN: &str = "[[";
const HIGHLIGHT_CLOSE: &str = "]]";

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch,
    Emails,
    Tasks,
    Search(String),
    Priority(PriorityFilter),
    ShowCompleted(bool),
    Toggle(String),
    Reset,
    SignOut,
    Json,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "fetch" | "refresh" => Ok(Self::Fetch),
            "emails" | "inbox" => Ok(Self::Emails),
            "tasks" => Ok(Self::Tasks),
            "search" | "/" => Ok(Self::Search(rest.to_string())),
            "priority" => rest.parse().map(Self::Priority),
            "completed" => match rest.to_lowercase().as_str() {
                "on" | "show" | "true" => Ok(Self::ShowCompleted(true)),
                "off" | "hide" | "false" => Ok(Self::ShowCompleted(false)),
                _ => Err("usage: completed <on|off>".to_string()),
            },
            "toggle" | "done" => {
                if rest.is_empty() {
                    Err("usage: toggle <task-id>".to_string())
                } else {
                    Ok(Self::Toggle(rest.to_string()))
                }
            }
            "reset" => Ok(Self::Reset),
            "signout" | "logout" => Ok(Self::SignOut),
            "json" => Ok(Self::Json),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "/quit" => Ok(Self::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

pub const HELP: &str = "\
Commands:
  fetch                     Fetch the inbox
  emails                    List emails matching the query
  tasks                     List tasks matching query and filters
  search <words>            Set the search query (empty clears it)
  priority <all|high|medium|low>
  completed <on|off>        Show or hide completed tasks
  toggle <task-id>          Mark a task done / not done
  reset                     Clear all completion marks
  signout                   Clear everything
  json                      Dump the current view as JSON
  quit";

/// One-line summary of fetch status and filters.
pub fn render_status(view: &InboxView) -> String {
    let status = match &view.fetch_status {
        FetchStatus::Idle => "idle".to_string(),
        FetchStatus::Loading => "loading...".to_string(),
        FetchStatus::Failed { reason } => format!("fetch failed: {reason}"),
    };
    format!(
        "{status} | {} emails | tasks {}/{} done | query {:?} | priority {} | completed {}",
        view.emails.len(),
        view.task_counts.completed,
        view.task_counts.total,
        view.filter.query,
        view.filter.priority_filter,
        if view.filter.show_completed { "shown" } else { "hidden" },
    )
}

/// Render the query-filtered email list.
pub fn render_emails(view: &InboxView) -> String {
    match view.email_empty_state {
        Some(EmptyState::Empty) => return "No emails.".to_string(),
        Some(EmptyState::NoMatches) => return "No matching emails.".to_string(),
        None => {}
    }

    let mut out = format!("Emails ({}/{})\n", view.visible_emails.len(), view.emails.len());
    for email in &view.visible_emails {
        out.push_str(&format!(
            "  {}  {}\n      {} · {}\n      {}\n",
            email.id,
            mark(view, &email.subject),
            mark(view, &email.from),
            email.date,
            mark(view, &email.snippet),
        ));
    }
    out
}

/// Render the fully filtered task list.
pub fn render_tasks(view: &InboxView) -> String {
    match view.task_empty_state {
        Some(EmptyState::Empty) => return "No tasks.".to_string(),
        Some(EmptyState::NoMatches) => return "No matching tasks.".to_string(),
        None => {}
    }

    let mut out = format!(
        "Tasks ({}/{})\n",
        view.visible_tasks.len(),
        view.tasks.len()
    );
    for task in &view.visible_tasks {
        let check = if view.is_completed(&task.id) { "x" } else { " " };
        out.push_str(&format!(
            "  [{check}] ({}) {}  {}\n      {}\n",
            task.priority.label,
            task.id,
            mark(view, &task.subject),
            mark(view, &task.from),
        ));
    }
    out
}

fn mark(view: &InboxView, text: &str) -> String {
    view.highlight(text).render(HIGHLIGHT_OPEN, HIGHLIGHT_CLOSE)
}
