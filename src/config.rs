use std::{env, str::FromStr};
use tracing::warn;

/// Tunable constants for the pattern analysis. All of them are
/// heuristics, not fitted against a population.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Below this many days the boundary refuses to run the analysis.
    pub min_days: usize,
    /// Foods must exceed this average increase (mm) to count as triggers.
    pub trigger_threshold_mm: f64,
    pub max_trigger_foods: usize,
    pub confidence_per_occurrence: u32,
    pub confidence_cap: u32,
    pub trend_window_days: usize,
    pub problematic_meal_threshold_mm: f64,
    pub improvement_min_days: usize,
    pub improvement_window_days: usize,
    pub advice_top_n: usize,
    pub avoid_threshold_mm: f64,
    pub limit_threshold_mm: f64,
    pub score_base: f64,
    pub score_penalty_per_mm: f64,
    pub default_food_score: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_days: 3,
            trigger_threshold_mm: 1.0,
            max_trigger_foods: 10,
            confidence_per_occurrence: 20,
            confidence_cap: 100,
            trend_window_days: 7,
            problematic_meal_threshold_mm: 3.0,
            improvement_min_days: 5,
            improvement_window_days: 3,
            advice_top_n: 5,
            avoid_threshold_mm: 5.0,
            limit_threshold_mm: 2.0,
            score_base: 100.0,
            score_penalty_per_mm: 10.0,
            default_food_score: 90,
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from `ANALYSIS_*` keys, keeping the default for
    /// any key that is missing or fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            min_days: read(&lookup, "ANALYSIS_MIN_DAYS", defaults.min_days),
            trigger_threshold_mm: read(
                &lookup,
                "ANALYSIS_TRIGGER_THRESHOLD_MM",
                defaults.trigger_threshold_mm,
            ),
            max_trigger_foods: read(&lookup, "ANALYSIS_MAX_TRIGGER_FOODS", defaults.max_trigger_foods),
            confidence_per_occurrence: read(
                &lookup,
                "ANALYSIS_CONFIDENCE_PER_OCCURRENCE",
                defaults.confidence_per_occurrence,
            ),
            confidence_cap: read(&lookup, "ANALYSIS_CONFIDENCE_CAP", defaults.confidence_cap),
            trend_window_days: read(&lookup, "ANALYSIS_TREND_WINDOW_DAYS", defaults.trend_window_days),
            problematic_meal_threshold_mm: read(
                &lookup,
                "ANALYSIS_PROBLEMATIC_MEAL_THRESHOLD_MM",
                defaults.problematic_meal_threshold_mm,
            ),
            improvement_min_days: read(
                &lookup,
                "ANALYSIS_IMPROVEMENT_MIN_DAYS",
                defaults.improvement_min_days,
            ),
            improvement_window_days: read(
                &lookup,
                "ANALYSIS_IMPROVEMENT_WINDOW_DAYS",
                defaults.improvement_window_days,
            ),
            advice_top_n: read(&lookup, "ANALYSIS_ADVICE_TOP_N", defaults.advice_top_n),
            avoid_threshold_mm: read(&lookup, "ANALYSIS_AVOID_THRESHOLD_MM", defaults.avoid_threshold_mm),
            limit_threshold_mm: read(&lookup, "ANALYSIS_LIMIT_THRESHOLD_MM", defaults.limit_threshold_mm),
            score_base: read(&lookup, "ANALYSIS_SCORE_BASE", defaults.score_base),
            score_penalty_per_mm: read(
                &lookup,
                "ANALYSIS_SCORE_PENALTY_PER_MM",
                defaults.score_penalty_per_mm,
            ),
            default_food_score: read(
                &lookup,
                "ANALYSIS_DEFAULT_FOOD_SCORE",
                defaults.default_food_score,
            ),
        }
    }
}

fn read<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("ignoring invalid value for {key}: {raw:?}");
                default
            }
        },
        None => default,
    }
}
