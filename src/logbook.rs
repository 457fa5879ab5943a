//! Post-workout logbook: nutrition, hydration, notes, effort and equipment.
//!
//! A logbook is kept as the JSON object the backend sent, like [`RawActivity`]:
//! saving writes back exactly what was loaded or edited, key names and number
//! formats included. Typed accessors read through it leniently (numeric strings
//! are numbers, unreadable values are absent). Totals are never stored as
//! authoritative: they are recomputed from the items every time a logbook is
//! loaded or saved.
//!
//! ## Example
//! ```rust
//! use activity_metrics::logbook::{nutrition_totals, NutritionItem};
//!
//! let gel: NutritionItem =
//!     serde_json::from_str(r#"{"calories": 100, "carbs": "25", "quantity": 2}"#).unwrap();
//! let totals = nutrition_totals(&[gel]);
//! assert_eq!(totals.calories, 200.0);
//! assert_eq!(totals.carbs, 50.0);
//! assert_eq!(totals.caffeine, 0.0);
//! ```
//!
//! [`RawActivity`]: crate::raw::RawActivity

use crate::error::{MetricsError, Result};
use crate::raw::as_number;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::RwLock;

/// Valid effort ratings (RPE scale).
pub const EFFORT_RATING_RANGE: RangeInclusive<f64> = 1.0..=10.0;

// Accepted key names per field, canonical first. Edits go to whichever key
// the document already uses.
const TIMING_KEYS: &[&str] = &["timing_minutes", "timing"];
const VOLUME_KEYS: &[&str] = &["volume_ml", "volume"];
const EFFORT_KEYS: &[&str] = &["effort_rating", "rpe"];
const EQUIPMENT_KEYS: &[&str] = &["equipment_ids", "equipment"];
const NUTRITION_KEY: &str = "nutrition";
const HYDRATION_KEY: &str = "hydration";
const NOTES_KEY: &str = "notes";

fn find<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| fields.get(*key))
        .filter(|v| !v.is_null())
}

fn number(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    find(fields, keys).and_then(as_number)
}

fn text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    find(fields, &[key])
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Write `value` under the key already in use for this field, else the canonical one.
fn write(fields: &mut Map<String, Value>, keys: &[&str], value: Value) {
    let key = keys
        .iter()
        .find(|key| fields.contains_key(**key))
        .or_else(|| keys.first())
        .map(|key| key.to_string());
    if let Some(key) = key {
        fields.insert(key, value);
    }
}

fn remove(fields: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        fields.remove(*key);
    }
}

fn amount(value: f64) -> Value {
    // Whole amounts are written as integers
    if value.fract() == 0.0 && value.abs() < 1e15 {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

/// One food item taken during or around the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NutritionItem(Map<String, Value>);

impl NutritionItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for any field, e.g. `.with("calories", 100)`.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn brand(&self) -> Option<&str> {
        text(&self.0, "brand")
    }

    pub fn name(&self) -> Option<&str> {
        text(&self.0, "name")
    }

    pub fn item_type(&self) -> Option<&str> {
        text(&self.0, "type")
    }

    /// kcal per unit
    pub fn calories(&self) -> Option<f64> {
        number(&self.0, &["calories"])
    }

    /// grams per unit
    pub fn carbs(&self) -> Option<f64> {
        number(&self.0, &["carbs"])
    }

    /// mg per unit
    pub fn caffeine(&self) -> Option<f64> {
        number(&self.0, &["caffeine"])
    }

    /// Number of units; 0 when missing.
    pub fn quantity(&self) -> f64 {
        number(&self.0, &["quantity"]).unwrap_or(0.0)
    }

    /// Minutes from session start.
    pub fn timing_minutes(&self) -> Option<f64> {
        number(&self.0, TIMING_KEYS)
    }

    pub fn set_quantity(&mut self, quantity: f64) {
        write(&mut self.0, &["quantity"], amount(quantity));
    }

    pub fn set_timing_minutes(&mut self, timing: Option<f64>) {
        match timing {
            Some(t) => write(&mut self.0, TIMING_KEYS, amount(t)),
            None => remove(&mut self.0, TIMING_KEYS),
        }
    }

    fn label(&self) -> String {
        item_label(self.brand(), self.name(), self.item_type())
    }
}

/// One drink taken during or around the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HydrationItem(Map<String, Value>);

impl HydrationItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn brand(&self) -> Option<&str> {
        text(&self.0, "brand")
    }

    pub fn name(&self) -> Option<&str> {
        text(&self.0, "name")
    }

    pub fn drink_type(&self) -> Option<&str> {
        text(&self.0, "type")
    }

    /// ml per unit
    pub fn volume_ml(&self) -> Option<f64> {
        number(&self.0, VOLUME_KEYS)
    }

    /// Number of units; 0 when missing.
    pub fn quantity(&self) -> f64 {
        number(&self.0, &["quantity"]).unwrap_or(0.0)
    }

    pub fn timing_minutes(&self) -> Option<f64> {
        number(&self.0, TIMING_KEYS)
    }

    pub fn set_quantity(&mut self, quantity: f64) {
        write(&mut self.0, &["quantity"], amount(quantity));
    }

    pub fn set_timing_minutes(&mut self, timing: Option<f64>) {
        match timing {
            Some(t) => write(&mut self.0, TIMING_KEYS, amount(t)),
            None => remove(&mut self.0, TIMING_KEYS),
        }
    }

    fn label(&self) -> String {
        item_label(self.brand(), self.name(), self.drink_type())
    }
}

/// The logbook attached to one session, as the backend stores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Logbook(Map<String, Value>);

impl Logbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored logbook. The top level must be an object; anything
    /// inside it that cannot be read is treated as absent.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| MetricsError::InvalidPayload {
            what: "logbook",
            source,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    fn objects<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a Map<String, Value>> + 'a {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
    }

    fn push(&mut self, key: &str, item: Map<String, Value>) {
        match self.0.get_mut(key) {
            Some(Value::Array(items)) => items.push(Value::Object(item)),
            _ => {
                self.0
                    .insert(key.to_string(), Value::Array(vec![Value::Object(item)]));
            }
        }
    }

    /// Nutrition items, in list order. Entries that are not objects are skipped.
    pub fn nutrition(&self) -> Vec<NutritionItem> {
        self.objects(NUTRITION_KEY)
            .cloned()
            .map(NutritionItem)
            .collect()
    }

    pub fn hydration(&self) -> Vec<HydrationItem> {
        self.objects(HYDRATION_KEY)
            .cloned()
            .map(HydrationItem)
            .collect()
    }

    pub fn push_nutrition(&mut self, item: NutritionItem) {
        self.push(NUTRITION_KEY, item.0);
    }

    pub fn push_hydration(&mut self, item: HydrationItem) {
        self.push(HYDRATION_KEY, item.0);
    }

    /// Replace the nutrition list, e.g. after editing or removing items.
    pub fn set_nutrition(&mut self, items: Vec<NutritionItem>) {
        let items = items.into_iter().map(|i| Value::Object(i.0)).collect();
        self.0.insert(NUTRITION_KEY.to_string(), Value::Array(items));
    }

    pub fn set_hydration(&mut self, items: Vec<HydrationItem>) {
        let items = items.into_iter().map(|i| Value::Object(i.0)).collect();
        self.0.insert(HYDRATION_KEY.to_string(), Value::Array(items));
    }

    pub fn notes(&self) -> Option<&str> {
        text(&self.0, NOTES_KEY)
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        match notes {
            Some(n) => {
                self.0.insert(NOTES_KEY.to_string(), Value::String(n));
            }
            None => {
                self.0.remove(NOTES_KEY);
            }
        }
    }

    /// 1 (easy) to 10 (maximal). Also read from `rpe`.
    pub fn effort_rating(&self) -> Option<f64> {
        number(&self.0, EFFORT_KEYS)
    }

    pub fn set_effort_rating(&mut self, rating: Option<u32>) {
        match rating {
            Some(r) => write(&mut self.0, EFFORT_KEYS, Value::from(r)),
            None => remove(&mut self.0, EFFORT_KEYS),
        }
    }

    /// Equipment ids. Also read from `equipment`; a single id string is accepted.
    pub fn equipment_ids(&self) -> Vec<&str> {
        match find(&self.0, EQUIPMENT_KEYS) {
            Some(Value::Array(ids)) => ids.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(id)) if !id.trim().is_empty() => vec![id.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.objects(NUTRITION_KEY).next().is_none()
            && self.objects(HYDRATION_KEY).next().is_none()
            && self.notes().is_none()
            && self.effort_rating().is_none()
            && self.equipment_ids().is_empty()
    }

    pub fn totals(&self) -> LogbookTotals {
        let nutrition = self.nutrition();
        let hydration = self.hydration();
        LogbookTotals {
            nutrition: nutrition_totals(&nutrition),
            hydration_ml: hydration_total(&hydration),
            item_count: (nutrition.len() + hydration.len()) as u32,
        }
    }

    /// Items with a timing offset, earliest first.
    ///
    /// Items without a timing are left out. Ties keep list order, nutrition
    /// before hydration.
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        let nutrition = self.nutrition().into_iter().enumerate().filter_map(|(index, item)| {
            item.timing_minutes().map(|t| TimelineEntry {
                timing_minutes: t,
                kind: TimelineKind::Nutrition,
                index: index as u32,
                label: item.label(),
            })
        });
        let hydration = self.hydration().into_iter().enumerate().filter_map(|(index, item)| {
            item.timing_minutes().map(|t| TimelineEntry {
                timing_minutes: t,
                kind: TimelineKind::Hydration,
                index: index as u32,
                label: item.label(),
            })
        });

        let mut entries: Vec<TimelineEntry> = nutrition.chain(hydration).collect();
        entries.sort_by(|a, b| a.timing_minutes.total_cmp(&b.timing_minutes));
        entries
    }

    /// Reject content the backend would refuse. An unreadable rating is absent.
    pub fn validate(&self, session_id: &str) -> Result<()> {
        if let Some(rating) = self.effort_rating() {
            if !EFFORT_RATING_RANGE.contains(&rating) {
                return Err(MetricsError::InvalidLogbook {
                    session_id: session_id.to_string(),
                    message: format!("effort rating {} is outside 1..=10", rating),
                });
            }
        }
        Ok(())
    }
}

impl From<Map<String, Value>> for Logbook {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

fn item_label(brand: Option<&str>, name: Option<&str>, kind: Option<&str>) -> String {
    let parts: Vec<&str> = [brand, name].into_iter().flatten().collect();
    if parts.is_empty() {
        kind.unwrap_or("").to_string()
    } else {
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[serde(rename_all = "snake_case")]
pub enum TimelineKind {
    Nutrition,
    Hydration,
}

/// A timed logbook item, pointing back into its list by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct TimelineEntry {
    pub timing_minutes: f64,
    pub kind: TimelineKind,
    pub index: u32,
    pub label: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct NutritionTotals {
    /// kcal
    pub calories: f64,
    /// g
    pub carbs: f64,
    /// mg
    pub caffeine: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct LogbookTotals {
    pub nutrition: NutritionTotals,
    pub hydration_ml: f64,
    pub item_count: u32,
}

/// Sum of per-unit values times quantity. Missing values, quantity included, count as 0.
pub fn nutrition_totals(items: &[NutritionItem]) -> NutritionTotals {
    items.iter().fold(NutritionTotals::default(), |acc, item| {
        let quantity = item.quantity();
        NutritionTotals {
            calories: acc.calories + item.calories().unwrap_or(0.0) * quantity,
            carbs: acc.carbs + item.carbs().unwrap_or(0.0) * quantity,
            caffeine: acc.caffeine + item.caffeine().unwrap_or(0.0) * quantity,
        }
    })
}

/// Total volume in ml.
pub fn hydration_total(items: &[HydrationItem]) -> f64 {
    items
        .iter()
        .map(|item| item.volume_ml().unwrap_or(0.0) * item.quantity())
        .sum()
}

// ============================================================================
// Persistence boundary
// ============================================================================

/// The external persistence collaborator (usually the REST backend).
pub trait LogbookStore: Send + Sync {
    fn get_logbook(&self, user_id: &str, session_id: &str) -> Result<Option<Logbook>>;
    fn save_logbook(&self, user_id: &str, session_id: &str, logbook: &Logbook) -> Result<()>;
}

/// A loaded logbook together with its freshly computed totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedLogbook {
    pub logbook: Logbook,
    pub totals: LogbookTotals,
}

/// Load a logbook and recompute its totals. Totals found in storage are ignored.
pub fn load_logbook(
    store: &dyn LogbookStore,
    user_id: &str,
    session_id: &str,
) -> Result<Option<LoadedLogbook>> {
    let Some(logbook) = store.get_logbook(user_id, session_id)? else {
        debug!("[Logbook] No logbook for session {}", session_id);
        return Ok(None);
    };
    let totals = logbook.totals();
    debug!(
        "[Logbook] Loaded session {}: {} items, {:.0} kcal, {:.0} ml",
        session_id, totals.item_count, totals.nutrition.calories, totals.hydration_ml
    );
    Ok(Some(LoadedLogbook { logbook, totals }))
}

/// Validate and save a logbook exactly as given. Returns the recomputed totals.
pub fn store_logbook(
    store: &dyn LogbookStore,
    user_id: &str,
    session_id: &str,
    logbook: &Logbook,
) -> Result<LogbookTotals> {
    logbook.validate(session_id)?;
    store.save_logbook(user_id, session_id, logbook)?;
    let totals = logbook.totals();
    info!(
        "[Logbook] Saved session {} ({} items)",
        session_id, totals.item_count
    );
    Ok(totals)
}

/// In-process store keyed by (user, session).
#[derive(Debug, Default)]
pub struct MemoryLogbookStore {
    entries: RwLock<HashMap<(String, String), Logbook>>,
}

impl MemoryLogbookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogbookStore for MemoryLogbookStore {
    fn get_logbook(&self, user_id: &str, session_id: &str) -> Result<Option<Logbook>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| MetricsError::store(format!("lock poisoned: {}", e)))?;
        Ok(entries
            .get(&(user_id.to_string(), session_id.to_string()))
            .cloned())
    }

    fn save_logbook(&self, user_id: &str, session_id: &str, logbook: &Logbook) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| MetricsError::store(format!("lock poisoned: {}", e)))?;
        entries.insert(
            (user_id.to_string(), session_id.to_string()),
            logbook.clone(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn food(calories: f64, carbs: f64, caffeine: f64, quantity: f64) -> NutritionItem {
        NutritionItem::new()
            .with("calories", calories)
            .with("carbs", carbs)
            .with("caffeine", caffeine)
            .with("quantity", quantity)
    }

    fn logbook(value: Value) -> Logbook {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_nutrition_totals() {
        let items = vec![food(100.0, 25.0, 0.0, 2.0), food(50.0, 10.0, 20.0, 1.0)];
        let totals = nutrition_totals(&items);
        assert_eq!(
            totals,
            NutritionTotals {
                calories: 250.0,
                carbs: 60.0,
                caffeine: 20.0
            }
        );
    }

    #[test]
    fn test_missing_fields() {
        let items = vec![NutritionItem::new().with("calories", 90).with("quantity", 1)];
        let totals = nutrition_totals(&items);
        assert_eq!(totals.calories, 90.0);
        assert_eq!(totals.carbs, 0.0);
        assert_eq!(nutrition_totals(&[]), NutritionTotals::default());
    }

    #[test]
    fn test_missing_quantity_counts_as_zero() {
        let gel = NutritionItem::new().with("calories", 100);
        assert_eq!(gel.quantity(), 0.0);
        assert_eq!(nutrition_totals(&[gel]).calories, 0.0);

        let bottle = HydrationItem::new().with("volume_ml", 500);
        assert_eq!(hydration_total(&[bottle]), 0.0);
    }

    #[test]
    fn test_hydration_total() {
        let items = vec![
            HydrationItem::new().with("volume_ml", 500).with("quantity", 2),
            HydrationItem::new().with("volume", 250).with("quantity", 1),
            HydrationItem::default(),
        ];
        assert_eq!(hydration_total(&items), 1250.0);
    }

    #[test]
    fn test_lenient_numbers() {
        let book = logbook(json!({
            "nutrition": [
                { "calories": "100", "carbs": 25, "quantity": "2" },
                { "calories": "lots", "quantity": 1 },
                "not an item"
            ],
            "effort_rating": 7.5
        }));
        let totals = book.totals();
        assert_eq!(totals.nutrition.calories, 200.0);
        assert_eq!(totals.nutrition.carbs, 50.0);
        assert_eq!(totals.item_count, 2);
        assert_eq!(book.effort_rating(), Some(7.5));
        assert!(book.validate("s1").is_ok());

        let odd = Logbook::from_json(r#"{"effort_rating": "hard", "notes": 42}"#).unwrap();
        assert_eq!(odd.effort_rating(), None);
        assert_eq!(odd.notes(), None);
        assert!(odd.validate("s1").is_ok());
    }

    #[test]
    fn test_unknown_fields_roundtrip() {
        let payload = json!({
            "nutrition": [
                { "brand": "Acme", "name": "Gel", "calories": 100, "quantity": 2, "flavor": "lemon" }
            ],
            "hydration": [],
            "notes": "Felt good",
            "effort_rating": 7,
            "equipment_ids": ["bike-1"],
            "weather": { "temp": 18 }
        });
        let book = logbook(payload.clone());
        assert_eq!(book.nutrition()[0].fields()["flavor"], json!("lemon"));
        assert_eq!(book.fields()["weather"], json!({ "temp": 18 }));
        assert_eq!(book.equipment_ids(), vec!["bike-1"]);

        let back = serde_json::to_value(&book).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_alias_keys_read_and_kept() {
        let payload = json!({
            "hydration": [{ "name": "Water", "volume": 500, "quantity": 1, "timing": 30 }],
            "rpe": 6,
            "equipment": "shoes-3"
        });
        let mut book = logbook(payload.clone());
        assert_eq!(book.hydration()[0].volume_ml(), Some(500.0));
        assert_eq!(book.hydration()[0].timing_minutes(), Some(30.0));
        assert_eq!(book.effort_rating(), Some(6.0));
        assert_eq!(book.equipment_ids(), vec!["shoes-3"]);
        assert_eq!(serde_json::to_value(&book).unwrap(), payload);

        // Edits land on the key already in use
        let mut drinks = book.hydration();
        drinks[0].set_quantity(2.0);
        drinks[0].set_timing_minutes(Some(45.0));
        book.set_hydration(drinks);
        book.set_effort_rating(Some(8));
        assert_eq!(
            serde_json::to_value(&book).unwrap(),
            json!({
                "hydration": [{ "name": "Water", "volume": 500, "quantity": 2, "timing": 45 }],
                "rpe": 8,
                "equipment": "shoes-3"
            })
        );
        assert_eq!(book.totals().hydration_ml, 1000.0);
    }

    #[test]
    fn test_missing_lists_not_added() {
        let book = Logbook::from_json(r#"{"notes":"ok"}"#).unwrap();
        assert!(book.nutrition().is_empty());
        assert_eq!(book.to_json().unwrap(), r#"{"notes":"ok"}"#);
        let mut book = book;
        book.set_notes(None);
        assert_eq!(book.to_json().unwrap(), "{}");
    }

    #[test]
    fn test_timeline_order() {
        let mut book = Logbook::new();
        book.push_nutrition(
            NutritionItem::new()
                .with("name", "Bar")
                .with("timing_minutes", 60),
        );
        book.push_nutrition(NutritionItem::new().with("name", "Untimed"));
        book.push_hydration(
            HydrationItem::new()
                .with("brand", "Iso")
                .with("name", "Drink")
                .with("timing", 15),
        );
        let timeline = book.timeline();
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].kind, TimelineKind::Hydration);
        assert_eq!(timeline[0].label, "Iso Drink");
        assert_eq!(timeline[1].label, "Bar");
        assert_eq!(timeline[1].index, 0);
    }

    #[test]
    fn test_effort_validation() {
        let mut book = Logbook::new();
        book.set_effort_rating(Some(11));
        assert!(matches!(
            book.validate("s1"),
            Err(MetricsError::InvalidLogbook { .. })
        ));
        book.set_effort_rating(Some(10));
        assert!(book.validate("s1").is_ok());
        book.set_effort_rating(Some(0));
        assert!(book.validate("s1").is_err());
        book.set_effort_rating(None);
        assert!(book.fields().is_empty());
    }

    #[test]
    fn test_store_and_load() {
        let store = MemoryLogbookStore::new();
        assert!(load_logbook(&store, "u1", "s1").unwrap().is_none());

        let mut book = Logbook::new();
        book.push_nutrition(food(100.0, 25.0, 0.0, 2.0));
        book.set_effort_rating(Some(6));
        let totals = store_logbook(&store, "u1", "s1", &book).unwrap();
        assert_eq!(totals.nutrition.calories, 200.0);
        assert_eq!(store.len(), 1);

        let loaded = load_logbook(&store, "u1", "s1").unwrap().unwrap();
        assert_eq!(loaded.logbook, book);
        assert_eq!(loaded.totals, totals);
        assert!(load_logbook(&store, "u2", "s1").unwrap().is_none());
    }

    #[test]
    fn test_invalid_logbook_not_saved() {
        let store = MemoryLogbookStore::new();
        let mut book = Logbook::new();
        book.set_effort_rating(Some(42));
        assert!(store_logbook(&store, "u1", "s1", &book).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            Logbook::from_json("not json"),
            Err(MetricsError::InvalidPayload { what: "logbook", .. })
        ));
        assert!(Logbook::from_json("[1, 2]").is_err());
        let empty = Logbook::from_json("{}").unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.totals().item_count, 0);
    }
}
