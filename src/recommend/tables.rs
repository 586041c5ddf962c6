//! Per-activity layering tables
//!
//! The tables are plain data, embedded from `layering_tables.json`, so that
//! adjusting a temperature band or an item never touches the rule code.

use serde::{Deserialize, Serialize};

use crate::models::{Activity, LayerItem};
use crate::{LayerupError, Result};

const BUILTIN_TABLES: &str = include_str!("layering_tables.json");

/// Items for felt temperatures below `below` (°F); `None` closes the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub below: Option<f64>,
    pub items: Vec<LayerItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindRule {
    /// Items are added when the strongest wind exceeds this speed
    pub threshold_mph: f64,
    pub items: Vec<LayerItem>,
}

/// Layering rules for one activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayeringTable {
    /// Ordered by ascending `below`
    pub bands: Vec<Band>,
    pub wind: WindRule,
    pub rain: Vec<LayerItem>,
    /// Always added, whatever the weather
    #[serde(default)]
    pub safety: Vec<LayerItem>,
}

impl LayeringTable {
    /// Items for the given conditions: temperature band first, then wind,
    /// rain and safety items
    #[must_use]
    pub fn items_for(&self, felt_temperature_f: f64, max_wind_mph: f64, has_rain: bool) -> Vec<LayerItem> {
        let mut items: Vec<LayerItem> = self
            .bands
            .iter()
            .find(|band| band.below.is_none_or(|below| felt_temperature_f < below))
            .map(|band| band.items.clone())
            .unwrap_or_default();

        if max_wind_mph > self.wind.threshold_mph {
            items.extend(self.wind.items.iter().cloned());
        }
        if has_rain {
            items.extend(self.rain.iter().cloned());
        }
        items.extend(self.safety.iter().cloned());
        items
    }

    fn validate(&self, activity: Activity) -> Result<()> {
        let Some(last) = self.bands.last() else {
            return Err(LayerupError::config(format!(
                "Layering table '{activity}' has no temperature bands"
            )));
        };
        if last.below.is_some() {
            return Err(LayerupError::config(format!(
                "Last band of layering table '{activity}' must be unbounded"
            )));
        }

        let bounds: Vec<f64> = self.bands.iter().filter_map(|band| band.below).collect();
        if bounds.len() != self.bands.len() - 1 {
            return Err(LayerupError::config(format!(
                "Only the last band of layering table '{activity}' may be unbounded"
            )));
        }
        if bounds.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(LayerupError::config(format!(
                "Bands of layering table '{activity}' must be in ascending order"
            )));
        }
        Ok(())
    }
}

/// One table per activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayeringTables {
    pub run: LayeringTable,
    pub trail_run: LayeringTable,
    pub road_bike: LayeringTable,
    pub mountain_bike: LayeringTable,
    pub hike: LayeringTable,
    pub ski: LayeringTable,
}

impl LayeringTables {
    /// Tables shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TABLES)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let tables: LayeringTables = serde_json::from_str(json)
            .map_err(|e| LayerupError::config(format!("Invalid layering tables: {e}")))?;
        for activity in Activity::ALL {
            tables.table(activity).validate(activity)?;
        }
        Ok(tables)
    }

    #[must_use]
    pub fn table(&self, activity: Activity) -> &LayeringTable {
        match activity {
            Activity::Run => &self.run,
            Activity::TrailRun => &self.trail_run,
            Activity::RoadBike => &self.road_bike,
            Activity::MountainBike => &self.mountain_bike,
            Activity::Hike => &self.hike,
            Activity::Ski => &self.ski,
        }
    }
}
