use crate::errors::ClientError;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Server-assigned identifier of a plan entry. The server emits integers,
/// but identifiers read back from rendered controls arrive as text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

impl EntryId {
    pub fn is_blank(&self) -> bool {
        match self {
            EntryId::Number(_) => false,
            EntryId::Text(text) => text.trim().is_empty(),
        }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Number(value) => write!(f, "{value}"),
            EntryId::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(number) => EntryId::Number(number),
            Err(_) => EntryId::Text(value.to_string()),
        }
    }
}

impl From<i64> for EntryId {
    fn from(value: i64) -> Self {
        EntryId::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePlanEntry {
    pub id: EntryId,
    pub routine: String,
    pub exercise: String,
    #[serde(default)]
    pub primary_muscle_group: Option<String>,
    #[serde(default)]
    pub secondary_muscle_group: Option<String>,
    #[serde(default)]
    pub tertiary_muscle_group: Option<String>,
    pub sets: i64,
    pub min_rep_range: i64,
    pub max_rep_range: i64,
    #[serde(default)]
    pub rir: Option<i64>,
    pub weight: f64,
}

/// Raw control values of the add-exercise form, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct AddExerciseForm {
    pub routine: String,
    pub exercise: String,
    pub sets: String,
    pub min_rep_range: String,
    pub max_rep_range: String,
    pub rir: String,
    pub weight: String,
}

/// Body of `POST /add_exercise`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
    pub routine: String,
    pub exercise: String,
    pub sets: i64,
    pub min_rep_range: i64,
    pub max_rep_range: i64,
    pub rir: Option<i64>,
    pub weight: f64,
}

impl AddExerciseForm {
    pub fn validate(&self) -> Result<NewExercise, ClientError> {
        let routine = self.routine.trim();
        let exercise = self.exercise.trim();
        if routine.is_empty() || exercise.is_empty() {
            return Err(ClientError::validation(
                "Please select both a routine and an exercise.",
            ));
        }

        let sets = parse_required::<i64>("Sets", &self.sets)?;
        let min_rep_range = parse_required::<i64>("Min rep range", &self.min_rep_range)?;
        let max_rep_range = parse_required::<i64>("Max rep range", &self.max_rep_range)?;
        let weight = parse_required::<f64>("Weight", &self.weight)?;
        let rir = match self.rir.trim() {
            "" => None,
            raw => Some(parse_required::<i64>("RIR", raw)?),
        };

        if min_rep_range > max_rep_range {
            return Err(ClientError::validation(
                "Min rep range cannot be greater than max rep range.",
            ));
        }

        Ok(NewExercise {
            routine: routine.to_string(),
            exercise: exercise.to_string(),
            sets,
            min_rep_range,
            max_rep_range,
            rir,
            weight,
        })
    }
}

fn parse_required<T: FromStr>(label: &str, raw: &str) -> Result<T, ClientError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ClientError::validation(format!("{label} is required.")));
    }
    raw.parse::<T>()
        .map_err(|_| ClientError::validation(format!("{label} must be a number.")))
}

#[derive(Debug, Serialize)]
pub struct RemoveRequest<'a> {
    pub id: &'a EntryId,
}

/// Success body of the mutating endpoints.
#[derive(Debug, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<ExercisePlanEntry>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    PrimaryMuscleGroup,
    SecondaryMuscleGroup,
    TertiaryMuscleGroup,
    Force,
    Equipment,
    Mechanic,
    Difficulty,
}

impl FilterField {
    pub const ALL: [FilterField; 7] = [
        FilterField::PrimaryMuscleGroup,
        FilterField::SecondaryMuscleGroup,
        FilterField::TertiaryMuscleGroup,
        FilterField::Force,
        FilterField::Equipment,
        FilterField::Mechanic,
        FilterField::Difficulty,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::PrimaryMuscleGroup => "primary_muscle_group",
            FilterField::SecondaryMuscleGroup => "secondary_muscle_group",
            FilterField::TertiaryMuscleGroup => "tertiary_muscle_group",
            FilterField::Force => "force",
            FilterField::Equipment => "equipment",
            FilterField::Mechanic => "mechanic",
            FilterField::Difficulty => "difficulty",
        }
    }
}

/// Selected filter values; an absent field means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterCriteria {
    fields: BTreeMap<FilterField, String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds criteria from control values; missing or blank controls are unset.
    pub fn from_controls<'a>(
        controls: impl IntoIterator<Item = (FilterField, Option<&'a str>)>,
    ) -> Self {
        let mut criteria = Self::new();
        for (field, value) in controls {
            if let Some(value) = value {
                criteria.set(field, value);
            }
        }
        criteria
    }

    pub fn set(&mut self, field: FilterField, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, value.to_string());
        }
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryMethod {
    #[default]
    Total,
    Fractional,
    Direct,
}

impl SummaryMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryMethod::Total => "Total",
            SummaryMethod::Fractional => "Fractional",
            SummaryMethod::Direct => "Direct",
        }
    }
}

impl fmt::Display for SummaryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "total" => Ok(SummaryMethod::Total),
            "fractional" => Ok(SummaryMethod::Fractional),
            "direct" => Ok(SummaryMethod::Direct),
            other => Err(format!(
                "unknown method '{other}', expected total, fractional or direct"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummaryRow {
    #[serde(default)]
    pub muscle_group: Option<String>,
    pub total_sets: f64,
    pub total_reps: f64,
    #[serde(default)]
    pub total_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummaryRow {
    pub routine: String,
    #[serde(default)]
    pub muscle_group: Option<String>,
    pub total_sets: f64,
    pub total_reps: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> AddExerciseForm {
        AddExerciseForm {
            routine: "Push Day".into(),
            exercise: "Bench Press".into(),
            sets: "3".into(),
            min_rep_range: "6".into(),
            max_rep_range: "10".into(),
            rir: "".into(),
            weight: "80.5".into(),
        }
    }

    #[test]
    fn form_requires_routine_and_exercise() {
        let mut form = filled_form();
        form.routine = "   ".into();
        assert!(matches!(form.validate(), Err(ClientError::Validation(_))));

        let mut form = filled_form();
        form.exercise.clear();
        assert!(matches!(form.validate(), Err(ClientError::Validation(_))));
    }

    #[test]
    fn form_parses_numbers_and_optional_rir() {
        let payload = filled_form().validate().expect("valid form");
        assert_eq!(payload.sets, 3);
        assert_eq!(payload.rir, None);
        assert_eq!(payload.weight, 80.5);

        let mut form = filled_form();
        form.rir = "2".into();
        assert_eq!(form.validate().unwrap().rir, Some(2));
    }

    #[test]
    fn form_rejects_inverted_rep_range() {
        let mut form = filled_form();
        form.min_rep_range = "12".into();
        assert!(form.validate().is_err());
    }

    #[test]
    fn entry_id_accepts_numbers_and_text() {
        let entry: ExercisePlanEntry = serde_json::from_value(serde_json::json!({
            "id": 7, "routine": "A1", "exercise": "Squat",
            "sets": 3, "min_rep_range": 5, "max_rep_range": 8, "weight": 100.0
        }))
        .unwrap();
        assert_eq!(entry.id, EntryId::Number(7));
        assert_eq!(entry.primary_muscle_group, None);
        assert_eq!(EntryId::from("12"), EntryId::Number(12));
        assert_eq!(EntryId::from("abc"), EntryId::Text("abc".into()));
        assert!(EntryId::from(" ").is_blank());
    }

    #[test]
    fn filter_criteria_skips_blank_controls() {
        let criteria = FilterCriteria::from_controls([
            (FilterField::PrimaryMuscleGroup, Some("Chest")),
            (FilterField::Force, Some("  ")),
            (FilterField::Equipment, None),
        ]);
        assert_eq!(criteria.len(), 1);
        let body = serde_json::to_value(&criteria).unwrap();
        assert_eq!(body, serde_json::json!({ "primary_muscle_group": "Chest" }));
    }

    #[test]
    fn summary_method_parses_case_insensitively() {
        assert_eq!("fractional".parse::<SummaryMethod>(), Ok(SummaryMethod::Fractional));
        assert_eq!("Direct".parse::<SummaryMethod>(), Ok(SummaryMethod::Direct));
        assert!("average".parse::<SummaryMethod>().is_err());
    }
}
