use crate::api::WorkoutApi;
use crate::config::{self, ClientConfig};
use crate::errors::ClientError;
use crate::models::{
    AddExerciseForm, EntryId, ExercisePlanEntry, FilterCriteria, MutationResponse, NewExercise,
    SummaryMethod,
};
use crate::routines::RoutineOptions;
use crate::toast::Notification;
use crate::ui::{ControlState, Operation, RequestState, Screen};
use crate::view;
use chrono::Local;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

const ADD_FAILED: &str = "Failed to add exercise.";
const ADD_SUCCEEDED: &str = "Exercise added successfully.";
const REMOVE_FAILED: &str = "Failed to remove exercise.";
const REMOVE_SUCCEEDED: &str = "Exercise removed successfully.";
const FILTER_FAILED: &str = "Failed to filter exercises.";
const FILTER_SUCCEEDED: &str = "Exercises filtered successfully.";
const LOAD_FAILED: &str = "Unable to load the workout plan. Please refresh the page to try again.";
const EXPORT_FAILED: &str = "Failed to export the workout plan.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    /// The request was sent and failed.
    Failed,
    /// Local validation failed; nothing was sent.
    Rejected,
    /// The operation does not apply here (e.g. not the plan page).
    Skipped,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Succeeded | Outcome::Skipped)
    }
}

pub struct WorkoutPlanClient {
    api: WorkoutApi,
    routines: RoutineOptions,
    plan_pages: Vec<String>,
    entries: Vec<ExercisePlanEntry>,
    pub screen: Screen,
}

impl WorkoutPlanClient {
    pub fn new(api: WorkoutApi, routines: RoutineOptions) -> Self {
        Self {
            api,
            routines,
            plan_pages: config::default_plan_pages(),
            entries: Vec::new(),
            screen: Screen::new(),
        }
    }

    pub fn from_config(config: &ClientConfig, routines: RoutineOptions) -> Self {
        Self::new(WorkoutApi::new(config.api_url.clone()), routines)
            .with_plan_pages(config.plan_pages.clone())
    }

    pub fn with_plan_pages(mut self, pages: Vec<String>) -> Self {
        self.plan_pages = pages;
        self
    }

    pub fn entries(&self) -> &[ExercisePlanEntry] {
        &self.entries
    }

    /// Validates the form and puts the add control into its in-flight state.
    /// A second submit while one is in flight is refused.
    pub fn begin_add(&mut self, form: &AddExerciseForm) -> Result<NewExercise, Outcome> {
        if self.screen.add_control == ControlState::Disabled {
            warn!("add exercise already in flight");
            return Err(Outcome::Rejected);
        }
        let payload = form.validate().map_err(|err| self.reject(err))?;
        self.screen.add_control = ControlState::Disabled;
        self.begin(Operation::AddExercise);
        Ok(payload)
    }

    pub async fn submit_add_exercise(&mut self, form: &AddExerciseForm) -> Outcome {
        let payload = match self.begin_add(form) {
            Ok(payload) => payload,
            Err(outcome) => return outcome,
        };

        let result = self.api.add_exercise(&payload).await;
        let outcome = match result {
            Ok(response) => {
                info!("added {} to {}", payload.exercise, payload.routine);
                self.apply_mutation(Operation::AddExercise, response, ADD_SUCCEEDED)
                    .await
            }
            Err(err) => self.fail(Operation::AddExercise, &err, ADD_FAILED),
        };
        self.screen.add_control = ControlState::Enabled;
        outcome
    }

    pub async fn submit_remove_exercise(&mut self, id: Option<&EntryId>) -> Outcome {
        let Some(id) = id.filter(|id| !id.is_blank()) else {
            return self.reject(ClientError::validation(
                "Invalid exercise id. Nothing was removed.",
            ));
        };

        self.begin(Operation::RemoveExercise);
        match self.api.remove_exercise(id).await {
            Ok(response) => {
                info!("removed plan entry {id}");
                self.apply_mutation(Operation::RemoveExercise, response, REMOVE_SUCCEEDED)
                    .await
            }
            Err(err) => self.fail(Operation::RemoveExercise, &err, REMOVE_FAILED),
        }
    }

    pub fn begin_filter(&mut self) {
        self.begin(Operation::FilterExercises);
        self.screen.show_exercise_loading();
    }

    pub async fn apply_filters(&mut self, criteria: FilterCriteria) -> Outcome {
        self.begin_filter();

        match self.api.filter_exercises(&criteria).await {
            Ok(names) => {
                info!("filter with {} constraint(s) matched {} exercise(s)", criteria.len(), names.len());
                self.screen.exercise_select = view::render_exercise_options(&names);
                self.screen.notify(Notification::success(FILTER_SUCCEEDED));
                self.finish(Operation::FilterExercises)
            }
            Err(err) => {
                self.screen.show_exercise_failure();
                self.fail(Operation::FilterExercises, &err, FILTER_FAILED)
            }
        }
    }

    /// Fetches and renders the full plan, but only on a plan page.
    pub async fn load_workout_plan(&mut self, location: &str) -> Outcome {
        if !self.is_plan_page(location) {
            return Outcome::Skipped;
        }

        self.begin(Operation::LoadPlan);
        match self.api.workout_plan().await {
            Ok(entries) => {
                self.replace_entries(entries);
                self.finish(Operation::LoadPlan)
            }
            Err(err) => {
                error!("failed to load workout plan: {err}");
                self.screen.set_request_state(Operation::LoadPlan, RequestState::Failed);
                self.screen
                    .notify(Notification::error(LOAD_FAILED).persistent());
                Outcome::Failed
            }
        }
    }

    pub fn populate_routine_options(&mut self, split_type: &str) -> Outcome {
        let routines = self.routines.routines(split_type);
        self.screen.routine_select = view::render_routine_options(routines);
        if routines.is_empty() {
            warn!("no routines configured for split type '{split_type}'");
            self.screen.notify(Notification::error(format!(
                "No routines available for '{split_type}'."
            )));
            return Outcome::Failed;
        }
        Outcome::Succeeded
    }

    pub async fn refresh_summary(&mut self, method: SummaryMethod) -> Outcome {
        self.begin(Operation::WeeklySummary);
        match self.api.weekly_summary(method).await {
            Ok(rows) => {
                self.screen.weekly_summary = view::render_weekly_summary(&rows);
                self.finish(Operation::WeeklySummary)
            }
            Err(err) => {
                error!("failed to fetch weekly summary ({method}): {err}");
                self.screen.weekly_summary = view::render_weekly_error();
                self.screen.set_request_state(Operation::WeeklySummary, RequestState::Failed);
                Outcome::Failed
            }
        }
    }

    pub async fn refresh_session_summary(
        &mut self,
        routine: Option<&str>,
        method: SummaryMethod,
    ) -> Outcome {
        self.begin(Operation::SessionSummary);
        match self.api.session_summary(routine, method).await {
            Ok(rows) => {
                self.screen.session_summary = view::render_session_summary(&rows);
                self.finish(Operation::SessionSummary)
            }
            Err(err) => {
                error!("failed to fetch session summary ({method}): {err}");
                self.screen.session_summary = view::render_session_error();
                self.screen.set_request_state(Operation::SessionSummary, RequestState::Failed);
                Outcome::Failed
            }
        }
    }

    /// Downloads the spreadsheet export into `dir` and returns the written path.
    pub async fn export_plan(&mut self, dir: &Path) -> Result<PathBuf, ClientError> {
        self.begin(Operation::Export);
        let result = self.download_export(dir).await;
        match &result {
            Ok(path) => {
                self.screen
                    .notify(Notification::success(format!("Exported to {}", path.display())));
                self.finish(Operation::Export);
            }
            Err(err) => {
                self.fail(Operation::Export, err, EXPORT_FAILED);
            }
        }
        result
    }

    async fn download_export(&self, dir: &Path) -> Result<PathBuf, ClientError> {
        let download = self.api.export_to_excel().await?;
        let filename = download
            .filename
            .unwrap_or_else(|| default_export_name(&Local::now().date_naive().to_string()));
        fs::create_dir_all(dir).await?;
        let path = dir.join(filename);
        fs::write(&path, &download.bytes).await?;
        info!("wrote {} bytes to {}", download.bytes.len(), path.display());
        Ok(path)
    }

    /// Applies a successful add/remove body. Without a `data` list the plan
    /// is fetched again.
    async fn apply_mutation(
        &mut self,
        operation: Operation,
        response: MutationResponse,
        default_message: &str,
    ) -> Outcome {
        let entries = match response.data {
            Some(entries) => entries,
            None => match self.api.workout_plan().await {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("mutation succeeded but reloading the plan failed: {err}");
                    let message = response.message.as_deref().unwrap_or(default_message);
                    self.screen.notify(Notification::success(message));
                    self.screen.notify(Notification::error(LOAD_FAILED).persistent());
                    self.screen.set_request_state(operation, RequestState::Succeeded);
                    return Outcome::Succeeded;
                }
            },
        };

        self.replace_entries(entries);
        let message = response
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| default_message.to_string());
        self.screen.notify(Notification::success(message));
        self.finish(operation)
    }

    fn replace_entries(&mut self, entries: Vec<ExercisePlanEntry>) {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(&entry.id) {
                warn!("server returned duplicate plan entry id {}", entry.id);
            }
        }
        self.screen.plan_table = view::render_plan_table(&entries);
        self.entries = entries;
    }

    fn is_plan_page(&self, location: &str) -> bool {
        config::is_plan_location(&self.plan_pages, location)
    }

    fn begin(&mut self, operation: Operation) {
        self.screen.set_request_state(operation, RequestState::InFlight);
    }

    fn finish(&mut self, operation: Operation) -> Outcome {
        self.screen.set_request_state(operation, RequestState::Succeeded);
        Outcome::Succeeded
    }

    fn reject(&mut self, err: ClientError) -> Outcome {
        warn!("{err}");
        self.screen
            .notify(Notification::warning(err.user_message("Invalid input.")));
        Outcome::Rejected
    }

    fn fail(&mut self, operation: Operation, err: &ClientError, fallback: &str) -> Outcome {
        match err {
            ClientError::Server { .. } => warn!("{operation:?} failed: {err}"),
            _ => error!("{operation:?} failed: {err}"),
        }
        self.screen.set_request_state(operation, RequestState::Failed);
        self.screen.notify(Notification::error(err.user_message(fallback)));
        Outcome::Failed
    }
}

fn default_export_name(date: &str) -> String {
    format!("workout_plan_{date}.xlsx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::Level;
    use reqwest::Url;

    fn offline_client() -> WorkoutPlanClient {
        // Port 9 (discard) is never served in tests; requests must not be sent anyway.
        let api = WorkoutApi::new(Url::parse("http://127.0.0.1:9").unwrap());
        WorkoutPlanClient::new(api, RoutineOptions::default())
    }

    #[test]
    fn routine_options_follow_configured_order() {
        let mut client = offline_client();
        assert_eq!(client.populate_routine_options("push"), Outcome::Succeeded);
        assert_eq!(client.screen.routine_select.values(), ["Push Day A", "Push Day B"]);
        assert_eq!(client.screen.routine_select.options.len(), 3);
    }

    #[test]
    fn unknown_split_leaves_only_prompt_and_errors() {
        let mut client = offline_client();
        client.populate_routine_options("push");
        assert_eq!(client.populate_routine_options("yoga"), Outcome::Failed);
        assert_eq!(client.screen.routine_select.options.len(), 1);
        assert!(client.screen.routine_select.options[0].is_placeholder());
        assert_eq!(client.screen.notifications.last().unwrap().level, Level::Error);
    }

    #[tokio::test]
    async fn off_plan_pages_skip_loading() {
        let mut client = offline_client();
        assert_eq!(client.load_workout_plan("/weekly_summary").await, Outcome::Skipped);
        assert_eq!(client.screen.request_state(Operation::LoadPlan), RequestState::Idle);
        assert!(client.screen.notifications.is_empty());
    }

    #[tokio::test]
    async fn blank_remove_id_is_rejected_locally() {
        let mut client = offline_client();
        let blank = EntryId::Text("  ".into());
        assert_eq!(client.submit_remove_exercise(Some(&blank)).await, Outcome::Rejected);
        assert_eq!(client.submit_remove_exercise(None).await, Outcome::Rejected);
        assert_eq!(client.screen.request_state(Operation::RemoveExercise), RequestState::Idle);
    }

    fn bench_press() -> AddExerciseForm {
        AddExerciseForm {
            routine: "Push Day A".into(),
            exercise: "Bench Press".into(),
            sets: "3".into(),
            min_rep_range: "6".into(),
            max_rep_range: "10".into(),
            rir: String::new(),
            weight: "60".into(),
        }
    }

    #[test]
    fn begin_add_disables_control_and_marks_in_flight() {
        let mut client = offline_client();
        let payload = client.begin_add(&bench_press()).unwrap();
        assert_eq!(payload.exercise, "Bench Press");
        assert_eq!(client.screen.add_control, ControlState::Disabled);
        assert_eq!(client.screen.request_state(Operation::AddExercise), RequestState::InFlight);
    }

    #[tokio::test]
    async fn add_is_refused_while_previous_add_is_in_flight() {
        let mut client = offline_client();
        client.begin_add(&bench_press()).unwrap();

        assert_eq!(client.begin_add(&bench_press()), Err(Outcome::Rejected));
        assert_eq!(client.submit_add_exercise(&bench_press()).await, Outcome::Rejected);
        assert_eq!(client.screen.add_control, ControlState::Disabled);
        assert_eq!(client.screen.request_state(Operation::AddExercise), RequestState::InFlight);
    }

    #[test]
    fn invalid_form_leaves_add_control_enabled() {
        let mut client = offline_client();
        let form = AddExerciseForm {
            routine: String::new(),
            ..bench_press()
        };
        assert_eq!(client.begin_add(&form), Err(Outcome::Rejected));
        assert_eq!(client.screen.add_control, ControlState::Enabled);
        assert_eq!(client.screen.request_state(Operation::AddExercise), RequestState::Idle);
        assert_eq!(client.screen.notifications.last().unwrap().level, Level::Warning);
    }

    #[test]
    fn begin_filter_shows_loading_placeholder() {
        let mut client = offline_client();
        client.begin_filter();
        assert_eq!(client.screen.exercise_select.options.len(), 1);
        assert!(client.screen.exercise_select.options[0].is_placeholder());
        assert_eq!(client.screen.exercise_select.options[0].label, view::LOADING_EXERCISES);
        assert_eq!(
            client.screen.request_state(Operation::FilterExercises),
            RequestState::InFlight
        );
    }

    #[test]
    fn export_name_carries_date() {
        assert_eq!(default_export_name("2026-10-19"), "workout_plan_2026-10-19.xlsx");
    }
}
