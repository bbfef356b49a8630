//! Persistent user preferences and the namespaced settings lookup.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::{
        errors::ConfigError,
        utils::{ensure_dir, PathResolver},
    },
    domain::NutrimentSpec,
};

const TMP_SUFFIX: &str = "tmp";

pub const DIARY: &str = "diary";
pub const FOODLIST: &str = "foodlist";
pub const NUTRITION: &str = "nutrition";
pub const PROMPT_ADD_ITEMS: &str = "prompt-add-items";
pub const SHOW_NOTES: &str = "show-notes";
pub const EDIT_ITEMS: &str = "edit-items";
pub const NUTRIMENTS: &str = "nutriments";

/// Namespaced settings lookup.
pub trait SettingsSource {
    fn get(&self, namespace: &str, key: &str) -> Option<Value>;

    /// True only when the setting is stored as boolean `true`.
    fn flag(&self, namespace: &str, key: &str) -> bool {
        matches!(self.get(namespace, key), Some(Value::Bool(true)))
    }

    /// Nutrient display catalogue, or the built-in one when unset.
    fn nutriments(&self) -> Vec<NutrimentSpec> {
        self.get(NUTRITION, NUTRIMENTS)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_else(Config::default_nutriments)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiarySettings {
    #[serde(default)]
    pub prompt_add_items: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoodListSettings {
    #[serde(default)]
    pub show_notes: bool,
    #[serde(default = "FoodListSettings::default_edit_items")]
    pub edit_items: bool,
}

impl FoodListSettings {
    pub fn default_edit_items() -> bool {
        true
    }
}

impl Default for FoodListSettings {
    fn default() -> Self {
        Self {
            show_notes: false,
            edit_items: Self::default_edit_items(),
        }
    }
}

/// Stores user-configurable preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub diary: DiarySettings,
    #[serde(default)]
    pub foodlist: FoodListSettings,
    /// Nutrients shown in the editor, in display order.
    #[serde(default = "Config::default_nutriments")]
    pub nutriments: Vec<NutrimentSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            diary: DiarySettings::default(),
            foodlist: FoodListSettings::default(),
            nutriments: Self::default_nutriments(),
        }
    }
}

impl Config {
    pub fn default_nutriments() -> Vec<NutrimentSpec> {
        [
            ("calories", "kcal"),
            ("fat", "g"),
            ("saturated-fat", "g"),
            ("carbohydrates", "g"),
            ("sugars", "g"),
            ("fiber", "g"),
            ("proteins", "g"),
            ("salt", "g"),
            ("sodium", "mg"),
        ]
        .into_iter()
        .map(|(name, unit)| NutrimentSpec::new(name, unit))
        .collect()
    }
}

impl SettingsSource for Config {
    fn get(&self, namespace: &str, key: &str) -> Option<Value> {
        match (namespace, key) {
            (DIARY, PROMPT_ADD_ITEMS) => Some(Value::Bool(self.diary.prompt_add_items)),
            (FOODLIST, SHOW_NOTES) => Some(Value::Bool(self.foodlist.show_notes)),
            (FOODLIST, EDIT_ITEMS) => Some(Value::Bool(self.foodlist.edit_items)),
            (NUTRITION, NUTRIMENTS) => serde_json::to_value(&self.nutriments).ok(),
            _ => None,
        }
    }
}

/// Loads and saves [`Config`] as JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn with_base_dir(base: &Path) -> Result<Self, ConfigError> {
        ensure_dir(base)?;
        Ok(Self::new(PathResolver::config_file_in(base)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
