pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod routines;
pub mod toast;
pub mod ui;
pub mod view;

pub use api::WorkoutApi;
pub use client::{Outcome, WorkoutPlanClient};
pub use config::ClientConfig;
pub use errors::ClientError;
pub use routines::{RoutineOptions, load_routine_options, resolve_routines_path};
