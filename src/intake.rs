use crate::config::AnalysisConfig;
use crate::errors::AppError;
use crate::models::{AppData, DailyObservation};
use std::collections::BTreeMap;

/// Cleans up observations before they reach the analysis: trims food
/// names, drops empty ones, orders by date and keeps the last submission
/// for a repeated date.
pub fn prepare_observations(observations: Vec<DailyObservation>) -> Vec<DailyObservation> {
    let mut by_date = BTreeMap::new();
    for observation in observations {
        by_date.insert(observation.date, normalize_observation(observation));
    }
    by_date.into_values().collect()
}

pub fn normalize_observation(mut observation: DailyObservation) -> DailyObservation {
    for foods in observation.meals.values_mut() {
        *foods = foods
            .iter()
            .map(|food| food.trim())
            .filter(|food| !food.is_empty())
            .map(str::to_string)
            .collect();
    }
    observation.meals.retain(|_, foods| !foods.is_empty());
    observation
}

pub fn validate_observation(observation: &DailyObservation) -> Result<(), AppError> {
    if let Some(level) = observation.stress_level {
        if !(1..=10).contains(&level) {
            return Err(AppError::bad_request("stress_level must be between 1 and 10"));
        }
    }
    Ok(())
}

pub fn ensure_min_days(days: usize, config: &AnalysisConfig) -> Result<(), AppError> {
    if days < config.min_days {
        return Err(AppError::insufficient_data(days, config.min_days));
    }
    Ok(())
}

/// Copy of the stored history in ascending date order.
pub fn stored_observations(data: &AppData) -> Vec<DailyObservation> {
    data.days.values().cloned().collect()
}
