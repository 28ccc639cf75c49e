use crate::toast::{Notification, NotificationQueue};
use crate::view::{self, SelectOption, SelectView, TableRow, TableView, Tone};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Operation {
    AddExercise,
    RemoveExercise,
    FilterExercises,
    LoadPlan,
    WeeklySummary,
    SessionSummary,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Debug)]
pub struct Screen {
    pub plan_table: TableView,
    pub exercise_select: SelectView,
    pub routine_select: SelectView,
    pub weekly_summary: TableView,
    pub session_summary: TableView,
    pub add_control: ControlState,
    pub notifications: NotificationQueue,
    requests: BTreeMap<Operation, RequestState>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            plan_table: TableView::default(),
            exercise_select: SelectView::default(),
            routine_select: view::render_routine_options(&[]),
            weekly_summary: TableView::default(),
            session_summary: TableView::default(),
            add_control: ControlState::Enabled,
            notifications: NotificationQueue::new(),
            requests: BTreeMap::new(),
        }
    }
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn request_state(&self, operation: Operation) -> RequestState {
        self.requests.get(&operation).copied().unwrap_or_default()
    }

    pub fn set_request_state(&mut self, operation: Operation, state: RequestState) {
        self.requests.insert(operation, state);
    }

    pub fn show_exercise_loading(&mut self) {
        self.exercise_select = SelectView::only(SelectOption::placeholder(view::LOADING_EXERCISES));
    }

    pub fn show_exercise_failure(&mut self) {
        self.exercise_select = SelectView::only(SelectOption::placeholder(view::EXERCISES_FAILED));
    }
}

pub fn table_to_html(table: &TableView) -> String {
    let mut html = String::new();
    for row in &table.rows {
        match row {
            TableRow::Data { cells, remove } => {
                html.push_str("<tr>");
                for cell in cells {
                    html.push_str(&format!("<td>{}</td>", escape_html(cell)));
                }
                if let Some(id) = remove {
                    html.push_str(&format!(
                        "<td><button class=\"btn btn-danger btn-sm remove-exercise\" data-id=\"{}\">Remove</button></td>",
                        escape_html(&id.to_string())
                    ));
                }
                html.push_str("</tr>\n");
            }
            TableRow::Placeholder {
                text,
                colspan,
                tone,
            } => {
                let class = match tone {
                    Tone::Muted => "text-center text-muted",
                    Tone::Danger => "text-center text-danger",
                };
                html.push_str(&format!(
                    "<tr><td colspan=\"{colspan}\" class=\"{class}\">{}</td></tr>\n",
                    escape_html(text)
                ));
            }
        }
    }
    html
}

pub fn select_to_html(select: &SelectView) -> String {
    select
        .options
        .iter()
        .map(|option| {
            format!(
                "<option value=\"{}\">{}</option>\n",
                escape_html(&option.value),
                escape_html(&option.label)
            )
        })
        .collect()
}

pub fn table_to_text(table: &TableView) -> String {
    let mut headers: Vec<String> = table.headers.iter().map(|h| h.to_string()).collect();
    let mut body: Vec<Vec<String>> = Vec::new();
    let mut notes: Vec<String> = Vec::new();

    for row in &table.rows {
        match row {
            TableRow::Data { cells, remove } => {
                let mut cells = cells.clone();
                if let Some(id) = remove {
                    cells.push(format!("#{id}"));
                }
                body.push(cells);
            }
            TableRow::Placeholder { text, .. } => notes.push(text.clone()),
        }
    }

    if body.is_empty() {
        headers.clear();
    }

    let columns = headers
        .len()
        .max(body.iter().map(Vec::len).max().unwrap_or(0));
    let mut widths = vec![0usize; columns];
    for line in std::iter::once(&headers).chain(body.iter()) {
        for (index, cell) in line.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for line in std::iter::once(&headers).chain(body.iter()) {
        if line.is_empty() {
            continue;
        }
        let padded: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(index, cell)| format!("{cell:<width$}", width = widths[index]))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    }
    for note in notes {
        out.push_str(&format!("{note}\n"));
    }
    out
}

pub fn select_to_text(select: &SelectView) -> String {
    select
        .options
        .iter()
        .map(|option| {
            if option.is_placeholder() {
                format!("({})\n", option.label)
            } else {
                format!("- {}\n", option.label)
            }
        })
        .collect()
}

pub fn notifications_to_text(queue: &NotificationQueue) -> String {
    queue
        .iter()
        .map(|item| format!("[{}] {} {}\n", item.level.label(), item.level.icon(), item.message))
        .collect()
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryId, ExercisePlanEntry};
    use crate::view::render_plan_table;

    #[test]
    fn placeholder_row_spans_all_columns() {
        let html = table_to_html(&render_plan_table(&[]));
        assert_eq!(
            html,
            "<tr><td colspan=\"11\" class=\"text-center text-muted\">No data available.</td></tr>\n"
        );
    }

    #[test]
    fn data_rows_escape_cells_and_bind_remove_control() {
        let entry = ExercisePlanEntry {
            id: EntryId::Number(42),
            routine: "<b>Push</b>".into(),
            exercise: "Dips".into(),
            primary_muscle_group: Some("Chest".into()),
            secondary_muscle_group: None,
            tertiary_muscle_group: None,
            sets: 3,
            min_rep_range: 8,
            max_rep_range: 12,
            rir: None,
            weight: 0.0,
        };
        let html = table_to_html(&render_plan_table(&[entry]));
        assert!(html.contains("<td>&lt;b&gt;Push&lt;/b&gt;</td>"));
        assert!(html.contains("data-id=\"42\""));
        assert_eq!(html.matches("<tr>").count(), 1);
    }

    #[test]
    fn text_table_prints_notes_without_headers() {
        let text = table_to_text(&render_plan_table(&[]));
        assert_eq!(text, "No data available.\n");
    }

    #[test]
    fn select_and_notification_text_list_one_line_each() {
        let select = view::render_routine_options(&["Push Day A".to_string()]);
        assert_eq!(select_to_text(&select), "(Select Routine)\n- Push Day A\n");
        assert_eq!(
            select_to_html(&select),
            "<option value=\"\">Select Routine</option>\n<option value=\"Push Day A\">Push Day A</option>\n"
        );

        let mut queue = NotificationQueue::new();
        queue.push(Notification::warning("Nothing sent"));
        assert_eq!(notifications_to_text(&queue), "[warning] ! Nothing sent\n");
    }

    #[test]
    fn request_state_defaults_to_idle() {
        let mut screen = Screen::new();
        assert_eq!(screen.request_state(Operation::LoadPlan), RequestState::Idle);
        screen.set_request_state(Operation::LoadPlan, RequestState::InFlight);
        assert_eq!(screen.request_state(Operation::LoadPlan), RequestState::InFlight);
        assert_eq!(screen.routine_select.options.len(), 1);
    }
}
