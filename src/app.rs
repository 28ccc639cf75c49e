use crate::client::{Outcome, WorkoutPlanClient};
use crate::config::ClientConfig;
use crate::models::{AddExerciseForm, EntryId, FilterCriteria, FilterField, SummaryMethod};
use crate::routines::load_routine_options;
use crate::ui::{self, Screen};
use crate::view::{SelectView, TableView};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "workout_client",
    version = env!("CARGO_PKG_VERSION"),
    about = "Manage a workout plan served by the workout tracker API"
)]
pub struct Cli {
    /// Base URL of the workout tracker server (overrides WORKOUT_API_URL)
    #[arg(global = true, long = "api-url")]
    pub api_url: Option<String>,

    /// Routine options JSON file (overrides WORKOUT_ROUTINES_PATH)
    #[arg(global = true, long = "routines")]
    pub routines: Option<PathBuf>,

    /// Print HTML fragments instead of text tables
    #[arg(global = true, long)]
    pub html: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the current workout plan
    Plan,

    /// Add an exercise to a routine
    Add(AddArgs),

    /// Remove a plan entry by id
    Remove {
        id: Option<String>,
    },

    /// List exercises matching the given filters
    Filter(FilterArgs),

    /// List the routines of a split type
    Routines {
        split_type: String,
    },

    /// Weekly per-muscle summary
    Weekly {
        #[arg(long, default_value = "total")]
        method: SummaryMethod,
    },

    /// Per-session summary
    Session {
        #[arg(long)]
        routine: Option<String>,

        #[arg(long, default_value = "total")]
        method: SummaryMethod,
    },

    /// Download the plan as a spreadsheet
    Export {
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long, default_value = "")]
    pub routine: String,
    #[arg(long, default_value = "")]
    pub exercise: String,
    #[arg(long, default_value = "")]
    pub sets: String,
    #[arg(long = "min-reps", default_value = "")]
    pub min_rep_range: String,
    #[arg(long = "max-reps", default_value = "")]
    pub max_rep_range: String,
    #[arg(long, default_value = "")]
    pub rir: String,
    #[arg(long, default_value = "")]
    pub weight: String,
}

impl From<AddArgs> for AddExerciseForm {
    fn from(args: AddArgs) -> Self {
        Self {
            routine: args.routine,
            exercise: args.exercise,
            sets: args.sets,
            min_rep_range: args.min_rep_range,
            max_rep_range: args.max_rep_range,
            rir: args.rir,
            weight: args.weight,
        }
    }
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    #[arg(long)]
    pub primary_muscle_group: Option<String>,
    #[arg(long)]
    pub secondary_muscle_group: Option<String>,
    #[arg(long)]
    pub tertiary_muscle_group: Option<String>,
    #[arg(long)]
    pub force: Option<String>,
    #[arg(long)]
    pub equipment: Option<String>,
    #[arg(long)]
    pub mechanic: Option<String>,
    #[arg(long)]
    pub difficulty: Option<String>,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_controls(FilterField::ALL.into_iter().map(|field| {
            let value = match field {
                FilterField::PrimaryMuscleGroup => &self.primary_muscle_group,
                FilterField::SecondaryMuscleGroup => &self.secondary_muscle_group,
                FilterField::TertiaryMuscleGroup => &self.tertiary_muscle_group,
                FilterField::Force => &self.force,
                FilterField::Equipment => &self.equipment,
                FilterField::Mechanic => &self.mechanic,
                FilterField::Difficulty => &self.difficulty,
            };
            (field, value.as_deref())
        }))
    }
}

/// Runs one command and returns its outcome plus everything to print.
pub async fn run(cli: Cli) -> Result<(Outcome, String), Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env(cli.api_url.as_deref())?;
    if let Some(path) = cli.routines {
        config.routines_path = path;
    }

    let routines = load_routine_options(&config.routines_path).await;
    let mut client = WorkoutPlanClient::from_config(&config, routines);
    let html = cli.html;

    let (outcome, mut output) = match cli.command {
        Command::Plan => {
            let page = config.plan_pages.first().map_or("/", String::as_str);
            let outcome = client.load_workout_plan(page).await;
            render_table(&client.screen, html, |screen| &screen.plan_table, outcome)
        }
        Command::Add(args) => {
            let outcome = client.submit_add_exercise(&args.into()).await;
            render_table(&client.screen, html, |screen| &screen.plan_table, outcome)
        }
        Command::Remove { id } => {
            let id = id.as_deref().map(EntryId::from);
            let outcome = client.submit_remove_exercise(id.as_ref()).await;
            render_table(&client.screen, html, |screen| &screen.plan_table, outcome)
        }
        Command::Filter(args) => {
            let outcome = client.apply_filters(args.criteria()).await;
            render_select(&client.screen, html, |screen| &screen.exercise_select, outcome)
        }
        Command::Routines { split_type } => {
            let outcome = client.populate_routine_options(&split_type);
            render_select(&client.screen, html, |screen| &screen.routine_select, outcome)
        }
        Command::Weekly { method } => {
            let outcome = client.refresh_summary(method).await;
            render_table(&client.screen, html, |screen| &screen.weekly_summary, outcome)
        }
        Command::Session { routine, method } => {
            let outcome = client.refresh_session_summary(routine.as_deref(), method).await;
            render_table(&client.screen, html, |screen| &screen.session_summary, outcome)
        }
        Command::Export { out } => {
            let outcome = match client.export_plan(&out).await {
                Ok(_) => Outcome::Succeeded,
                Err(_) => Outcome::Failed,
            };
            (outcome, String::new())
        }
    };

    output.push_str(&ui::notifications_to_text(&client.screen.notifications));
    Ok((outcome, output))
}

fn render_table(
    screen: &Screen,
    html: bool,
    table: impl Fn(&Screen) -> &TableView,
    outcome: Outcome,
) -> (Outcome, String) {
    let table = table(screen);
    if outcome == Outcome::Rejected || table.rows.is_empty() {
        return (outcome, String::new());
    }
    let rendered = if html {
        ui::table_to_html(table)
    } else {
        ui::table_to_text(table)
    };
    (outcome, rendered)
}

fn render_select(
    screen: &Screen,
    html: bool,
    select: impl Fn(&Screen) -> &SelectView,
    outcome: Outcome,
) -> (Outcome, String) {
    let select = select(screen);
    let rendered = if html {
        ui::select_to_html(select)
    } else {
        ui::select_to_text(select)
    };
    (outcome, rendered)
}
