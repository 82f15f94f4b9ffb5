use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
    EveningSnack,
    AlcoholicDrinks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 7] = [
        MealSlot::Breakfast,
        MealSlot::MorningSnack,
        MealSlot::Lunch,
        MealSlot::AfternoonSnack,
        MealSlot::Dinner,
        MealSlot::EveningSnack,
        MealSlot::AlcoholicDrinks,
    ];

    /// Slots that carry a post-meal skinfold reading.
    pub const MEASURED: [MealSlot; 6] = [
        MealSlot::Breakfast,
        MealSlot::MorningSnack,
        MealSlot::Lunch,
        MealSlot::AfternoonSnack,
        MealSlot::Dinner,
        MealSlot::EveningSnack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::MorningSnack => "morning_snack",
            MealSlot::Lunch => "lunch",
            MealSlot::AfternoonSnack => "afternoon_snack",
            MealSlot::Dinner => "dinner",
            MealSlot::EveningSnack => "evening_snack",
            MealSlot::AlcoholicDrinks => "alcoholic_drinks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Abdomen,
    Hips,
}

/// Skinfold readings in millimetres for one body region on one day.
/// A post-meal value of 0 means "not recorded".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionReadings {
    #[serde(deserialize_with = "lenient_mm")]
    pub baseline: f64,
    #[serde(deserialize_with = "lenient_mm")]
    pub breakfast: f64,
    #[serde(deserialize_with = "lenient_mm")]
    pub morning_snack: f64,
    #[serde(deserialize_with = "lenient_mm")]
    pub lunch: f64,
    #[serde(deserialize_with = "lenient_mm")]
    pub afternoon_snack: f64,
    #[serde(deserialize_with = "lenient_mm")]
    pub dinner: f64,
    #[serde(deserialize_with = "lenient_mm")]
    pub evening_snack: f64,
}

impl RegionReadings {
    pub fn new(baseline: f64) -> Self {
        Self {
            baseline,
            ..Self::default()
        }
    }

    pub fn post_meal(&self, slot: MealSlot) -> Option<f64> {
        match slot {
            MealSlot::Breakfast => Some(self.breakfast),
            MealSlot::MorningSnack => Some(self.morning_snack),
            MealSlot::Lunch => Some(self.lunch),
            MealSlot::AfternoonSnack => Some(self.afternoon_snack),
            MealSlot::Dinner => Some(self.dinner),
            MealSlot::EveningSnack => Some(self.evening_snack),
            MealSlot::AlcoholicDrinks => None,
        }
    }

    pub fn post_meal_mut(&mut self, slot: MealSlot) -> Option<&mut f64> {
        match slot {
            MealSlot::Breakfast => Some(&mut self.breakfast),
            MealSlot::MorningSnack => Some(&mut self.morning_snack),
            MealSlot::Lunch => Some(&mut self.lunch),
            MealSlot::AfternoonSnack => Some(&mut self.afternoon_snack),
            MealSlot::Dinner => Some(&mut self.dinner),
            MealSlot::EveningSnack => Some(&mut self.evening_snack),
            MealSlot::AlcoholicDrinks => None,
        }
    }

    pub fn post_meal_values(&self) -> [f64; 6] {
        [
            self.breakfast,
            self.morning_snack,
            self.lunch,
            self.afternoon_snack,
            self.dinner,
            self.evening_snack,
        ]
    }

    /// Sets a post-meal reading; readings for unmeasured slots are ignored.
    pub fn with_post_meal(mut self, slot: MealSlot, value: f64) -> Self {
        if let Some(field) = self.post_meal_mut(slot) {
            *field = value;
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurements {
    pub abdomen: RegionReadings,
    pub hips: RegionReadings,
}

impl Measurements {
    pub fn region(&self, region: Region) -> &RegionReadings {
        match region {
            Region::Abdomen => &self.abdomen,
            Region::Hips => &self.hips,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    #[serde(default)]
    pub meals: BTreeMap<MealSlot, Vec<String>>,
    #[serde(default)]
    pub measurements: Measurements,
    #[serde(default)]
    pub hydration: Option<f64>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(default)]
    pub stress_level: Option<u8>,
    #[serde(default)]
    pub digestion_note: Option<String>,
    #[serde(default)]
    pub free_note: Option<String>,
}

impl DailyObservation {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            meals: BTreeMap::new(),
            measurements: Measurements::default(),
            hydration: None,
            sleep_hours: None,
            stress_level: None,
            digestion_note: None,
            free_note: None,
        }
    }

    pub fn with_food(mut self, slot: MealSlot, food: impl Into<String>) -> Self {
        self.meals.entry(slot).or_default().push(food.into());
        self
    }

    pub fn with_measurements(mut self, measurements: Measurements) -> Self {
        self.measurements = measurements;
        self
    }

    /// Every food occurrence of the day across all slots, duplicates included.
    pub fn foods(&self) -> impl Iterator<Item = &str> {
        self.meals.values().flatten().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerFood {
    pub food_name: String,
    pub average_increase_mm: f64,
    pub occurrence_count: u32,
    pub confidence_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub date: NaiveDate,
    pub abdomen_delta: f64,
    pub hips_delta: f64,
    pub problematic_meals: Vec<MealSlot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceCategory {
    Avoid,
    Limit,
    Prefer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub category: AdviceCategory,
    pub food: String,
    pub reason: String,
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetrics {
    pub days_analyzed: usize,
    pub average_variability: f64,
    pub is_improving_trend: bool,
    pub food_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub trigger_foods: Vec<TriggerFood>,
    pub weekly_trend: Vec<TrendEntry>,
    pub advice: Vec<Advice>,
    pub metrics: AnalysisMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub days: BTreeMap<NaiveDate, DailyObservation>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub observations: Vec<DailyObservation>,
}

/// Accepts numbers or numeric strings; anything else, including negative
/// or non-finite values, becomes 0.
fn lenient_mm<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };

    Ok(parsed.filter(|mm| mm.is_finite() && *mm >= 0.0).unwrap_or(0.0))
}
