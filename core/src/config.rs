use crate::{
    achievement::{AchievementBook, AchievementDefinition},
    catalog::{Catalog, CatalogEntry},
    error::SimResult,
    types::Tick,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Static game content: what can be bought and what can be unlocked.
#[derive(Debug, Clone, PartialEq)]
pub struct GameContent {
    pub catalog:      Catalog,
    pub achievements: AchievementBook,
}

impl GameContent {
    pub fn new(
        entries: Vec<CatalogEntry>,
        achievements: Vec<AchievementDefinition>,
    ) -> SimResult<Self> {
        let catalog = Catalog::new(entries)?;
        let achievements = AchievementBook::new(achievements, &catalog)?;
        Ok(Self { catalog, achievements })
    }

    /// The built-in content.
    pub fn standard() -> Self {
        let catalog = Catalog::standard();
        // Built-in content is fixed; failing validation here is a programming error.
        let achievements = AchievementBook::standard(&catalog).expect("standard achievements are valid");
        Self { catalog, achievements }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Nominal wall-clock interval between ticks.
    pub tick_interval_ms:     u64,
    /// Persist a snapshot every N ticks. 0 disables autosave.
    pub autosave_every_ticks: Tick,
    /// Manual collections the headless player makes per tick.
    pub clicks_per_tick:      u32,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms:     100,
            autosave_every_ticks: 300, // every 30 s at the nominal cadence
            clicks_per_tick:      1,
        }
    }
}

impl RuntimeSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be positive".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct AchievementsFile {
    achievements: Vec<AchievementDefinition>,
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub settings: RuntimeSettings,
    pub content:  Arc<GameContent>,
}

impl GameConfig {
    /// Load from the data/ directory.
    /// In tests, use GameConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let settings_path = format!("{data_dir}/config.json");
        let settings_content = std::fs::read_to_string(&settings_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {settings_path}: {e}"))?;
        let settings: RuntimeSettings = serde_json::from_str(&settings_content)?;
        settings
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid {settings_path}: {e}"))?;

        let catalog_path = format!("{data_dir}/catalog.json");
        let catalog_content = std::fs::read_to_string(&catalog_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {catalog_path}: {e}"))?;
        let catalog_file: CatalogFile = serde_json::from_str(&catalog_content)?;

        let achievements_path = format!("{data_dir}/achievements.json");
        let achievements_content = std::fs::read_to_string(&achievements_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {achievements_path}: {e}"))?;
        let achievements_file: AchievementsFile = serde_json::from_str(&achievements_content)?;

        let content = GameContent::new(catalog_file.entries, achievements_file.achievements)?;
        log::info!(
            "loaded {} catalog entries and {} achievements from {data_dir}",
            content.catalog.entries().len(),
            content.achievements.definitions().len()
        );

        Ok(Self {
            settings,
            content: Arc::new(content),
        })
    }

    pub fn default_test() -> Self {
        Self {
            settings: RuntimeSettings::default(),
            content:  Arc::new(GameContent::standard()),
        }
    }
}
