use crate::models::{EntryId, ExercisePlanEntry, SessionSummaryRow, WeeklySummaryRow};

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_DATA: &str = "No data available.";
pub const FETCH_FAILED: &str = "Unable to fetch data. Please try again later.";
pub const SELECT_ROUTINE: &str = "Select Routine";
pub const NO_EXERCISES: &str = "No exercises available";
pub const LOADING_EXERCISES: &str = "Loading...";
pub const EXERCISES_FAILED: &str = "Failed to load exercises";

pub const PLAN_HEADERS: [&str; 11] = [
    "Routine",
    "Exercise",
    "Primary Muscle",
    "Secondary Muscle",
    "Tertiary Muscle",
    "Sets",
    "Min Reps",
    "Max Reps",
    "RIR",
    "Weight",
    "Actions",
];
pub const WEEKLY_HEADERS: [&str; 4] = ["Muscle Group", "Total Sets", "Total Reps", "Total Weight"];
pub const SESSION_HEADERS: [&str; 3] = ["Routine", "Total Sets", "Total Reps"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Muted,
    Danger,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableRow {
    Data {
        cells: Vec<String>,
        /// Entry the row's remove control is bound to.
        remove: Option<EntryId>,
    },
    Placeholder {
        text: String,
        colspan: usize,
        tone: Tone,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableView {
    pub headers: Vec<&'static str>,
    pub rows: Vec<TableRow>,
}

impl TableView {
    fn with_headers(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    fn placeholder(headers: &[&'static str], text: &str, tone: Tone) -> Self {
        let mut table = Self::with_headers(headers);
        table.rows.push(TableRow::Placeholder {
            text: text.to_string(),
            colspan: headers.len(),
            tone,
        });
        table
    }

    pub fn data_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows
            .iter()
            .filter(|row| matches!(row, TableRow::Data { .. }))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.rows.as_slice(), [TableRow::Placeholder { .. }])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn named(name: &str) -> Self {
        Self {
            value: name.to_string(),
            label: name.to_string(),
        }
    }

    pub fn placeholder(label: &str) -> Self {
        Self {
            value: String::new(),
            label: label.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectView {
    pub options: Vec<SelectOption>,
}

impl SelectView {
    pub fn only(option: SelectOption) -> Self {
        Self {
            options: vec![option],
        }
    }

    pub fn values(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter(|option| !option.is_placeholder())
            .map(|option| option.value.as_str())
            .collect()
    }
}

pub fn render_plan_table(entries: &[ExercisePlanEntry]) -> TableView {
    if entries.is_empty() {
        return TableView::placeholder(&PLAN_HEADERS, NO_DATA, Tone::Muted);
    }

    let mut table = TableView::with_headers(&PLAN_HEADERS);
    table.rows = entries
        .iter()
        .map(|entry| TableRow::Data {
            cells: vec![
                entry.routine.clone(),
                entry.exercise.clone(),
                or_not_available(entry.primary_muscle_group.as_deref()),
                or_not_available(entry.secondary_muscle_group.as_deref()),
                or_not_available(entry.tertiary_muscle_group.as_deref()),
                entry.sets.to_string(),
                entry.min_rep_range.to_string(),
                entry.max_rep_range.to_string(),
                entry
                    .rir
                    .map(|rir| rir.to_string())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                entry.weight.to_string(),
            ],
            remove: Some(entry.id.clone()),
        })
        .collect();
    table
}

pub fn render_weekly_summary(rows: &[WeeklySummaryRow]) -> TableView {
    if rows.is_empty() {
        return TableView::placeholder(&WEEKLY_HEADERS, NO_DATA, Tone::Muted);
    }

    let mut table = TableView::with_headers(&WEEKLY_HEADERS);
    table.rows = rows
        .iter()
        .map(|row| TableRow::Data {
            cells: vec![
                or_not_available(row.muscle_group.as_deref()),
                format!("{:.1}", row.total_sets),
                format!("{:.1}", row.total_reps),
                format!("{:.1}", row.total_weight),
            ],
            remove: None,
        })
        .collect();
    table
}

pub fn render_session_summary(rows: &[SessionSummaryRow]) -> TableView {
    if rows.is_empty() {
        return TableView::placeholder(&SESSION_HEADERS, NO_DATA, Tone::Muted);
    }

    let mut table = TableView::with_headers(&SESSION_HEADERS);
    table.rows = rows
        .iter()
        .map(|row| TableRow::Data {
            cells: vec![
                row.routine.clone(),
                format!("{}", row.total_sets.round() as i64),
                format!("{}", row.total_reps.round() as i64),
            ],
            remove: None,
        })
        .collect();
    table
}

pub fn render_weekly_error() -> TableView {
    TableView::placeholder(&WEEKLY_HEADERS, FETCH_FAILED, Tone::Danger)
}

pub fn render_session_error() -> TableView {
    TableView::placeholder(&SESSION_HEADERS, FETCH_FAILED, Tone::Danger)
}

pub fn render_exercise_options(names: &[String]) -> SelectView {
    let options: Vec<SelectOption> = names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(SelectOption::named)
        .collect();

    if options.is_empty() {
        return SelectView::only(SelectOption::placeholder(NO_EXERCISES));
    }
    SelectView { options }
}

pub fn render_routine_options(routines: &[String]) -> SelectView {
    let mut options = Vec::with_capacity(routines.len() + 1);
    options.push(SelectOption::placeholder(SELECT_ROUTINE));
    options.extend(routines.iter().map(|routine| SelectOption::named(routine)));
    SelectView { options }
}

fn or_not_available(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, primary: Option<&str>) -> ExercisePlanEntry {
        ExercisePlanEntry {
            id: EntryId::Number(id),
            routine: "Push Day A".into(),
            exercise: "Bench Press".into(),
            primary_muscle_group: primary.map(Into::into),
            secondary_muscle_group: None,
            tertiary_muscle_group: Some("".into()),
            sets: 3,
            min_rep_range: 6,
            max_rep_range: 10,
            rir: Some(2),
            weight: 82.5,
        }
    }

    #[test]
    fn empty_plan_renders_single_spanning_placeholder() {
        let table = render_plan_table(&[]);
        assert_eq!(
            table.rows,
            vec![TableRow::Placeholder {
                text: NO_DATA.into(),
                colspan: PLAN_HEADERS.len(),
                tone: Tone::Muted,
            }]
        );
    }

    #[test]
    fn plan_rows_fill_missing_muscle_groups() {
        let table = render_plan_table(&[entry(1, Some("Chest")), entry(2, None)]);
        assert_eq!(table.data_rows().count(), 2);

        let TableRow::Data { cells, remove } = &table.rows[1] else {
            panic!("expected data row");
        };
        assert_eq!(cells.len(), PLAN_HEADERS.len() - 1);
        assert_eq!(&cells[2..5], [NOT_AVAILABLE, NOT_AVAILABLE, NOT_AVAILABLE]);
        assert_eq!(cells[9], "82.5");
        assert_eq!(remove, &Some(EntryId::Number(2)));
    }

    #[test]
    fn weekly_summary_uses_one_decimal() {
        let table = render_weekly_summary(&[WeeklySummaryRow {
            muscle_group: None,
            total_sets: 4.333,
            total_reps: 40.0,
            total_weight: 1200.26,
        }]);
        let TableRow::Data { cells, .. } = &table.rows[0] else {
            panic!("expected data row");
        };
        assert_eq!(cells, &["N/A", "4.3", "40.0", "1200.3"]);
    }

    #[test]
    fn session_summary_rounds_to_integers() {
        let table = render_session_summary(&[SessionSummaryRow {
            routine: "A1".into(),
            muscle_group: Some("Chest".into()),
            total_sets: 6.6,
            total_reps: 59.4,
        }]);
        let TableRow::Data { cells, .. } = &table.rows[0] else {
            panic!("expected data row");
        };
        assert_eq!(cells, &["A1", "7", "59"]);
    }

    #[test]
    fn summary_placeholders_span_their_tables() {
        assert!(render_weekly_summary(&[]).is_placeholder());
        assert_eq!(
            render_session_error().rows,
            vec![TableRow::Placeholder {
                text: FETCH_FAILED.into(),
                colspan: 3,
                tone: Tone::Danger,
            }]
        );
    }

    #[test]
    fn exercise_options_drop_blank_names_in_order() {
        let names = vec!["Squat".to_string(), "  ".to_string(), "".to_string(), "Deadlift".to_string()];
        assert_eq!(render_exercise_options(&names).values(), ["Squat", "Deadlift"]);

        let empty = render_exercise_options(&[]);
        assert_eq!(empty.options, vec![SelectOption::placeholder(NO_EXERCISES)]);
    }

    #[test]
    fn routine_options_start_with_prompt() {
        let view = render_routine_options(&["A".to_string(), "B".to_string()]);
        assert_eq!(view.options[0], SelectOption::placeholder(SELECT_ROUTINE));
        assert_eq!(view.values(), ["A", "B"]);
    }
}
