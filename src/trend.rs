use crate::config::AnalysisConfig;
use crate::delta::DayDelta;
use crate::models::{DailyObservation, MealSlot, TrendEntry};

/// Per-day deltas for the most recent window, in the order supplied.
pub fn build_weekly_trend(observations: &[DailyObservation], config: &AnalysisConfig) -> Vec<TrendEntry> {
    let start = observations.len().saturating_sub(config.trend_window_days);

    observations[start..]
        .iter()
        .map(|observation| {
            let delta = DayDelta::of(observation);
            TrendEntry {
                date: observation.date,
                abdomen_delta: delta.abdomen,
                hips_delta: delta.hips,
                problematic_meals: problematic_meals(observation, config.problematic_meal_threshold_mm),
            }
        })
        .collect()
}

/// Slots whose raw post-meal readings average more than `threshold_mm`
/// above baseline across both regions. Unrecorded (zero) readings are
/// used as-is here.
pub fn problematic_meals(observation: &DailyObservation, threshold_mm: f64) -> Vec<MealSlot> {
    let abdomen = &observation.measurements.abdomen;
    let hips = &observation.measurements.hips;

    MealSlot::MEASURED
        .into_iter()
        .filter(|slot| {
            let (Some(abdomen_post), Some(hips_post)) = (abdomen.post_meal(*slot), hips.post_meal(*slot))
            else {
                return false;
            };
            let increase = ((abdomen_post - abdomen.baseline) + (hips_post - hips.baseline)) / 2.0;
            increase > threshold_mm
        })
        .collect()
}

/// True when the last few days show less bloating than the days right
/// before them. Short histories never count as improving.
pub fn is_improving_trend(observations: &[DailyObservation], config: &AnalysisConfig) -> bool {
    if observations.len() < config.improvement_min_days || config.improvement_window_days == 0 {
        return false;
    }

    let window = config.improvement_window_days;
    let recent_start = observations.len().saturating_sub(window);
    let older_start = recent_start.saturating_sub(window);

    let recent = &observations[recent_start..];
    let older = &observations[older_start..recent_start];
    if older.is_empty() {
        return false;
    }

    mean_total_delta(recent) < mean_total_delta(older)
}

/// Mean of the per-day regional average over every observation.
pub fn average_variability(observations: &[DailyObservation]) -> f64 {
    if observations.is_empty() {
        return 0.0;
    }

    let sum: f64 = observations
        .iter()
        .map(|observation| DayDelta::of(observation).average())
        .sum();
    sum / observations.len() as f64
}

fn mean_total_delta(observations: &[DailyObservation]) -> f64 {
    let sum: f64 = observations
        .iter()
        .map(|observation| DayDelta::of(observation).total())
        .sum();
    sum / observations.len() as f64
}
