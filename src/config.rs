use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::topics::N_MAX;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusCurve {
    #[default]
    Log,
    Sqrt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainScope {
    #[default]
    Period,
    Window,
    Dataset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleSettings {
    pub curve: RadiusCurve,
    pub domain_scope: DomainScope,
    pub min_radius: f32,
    pub max_radius: f32,
    pub colors: Vec<String>,
    pub cluster_inset: f32,
    pub cluster_padding: f32,
    pub sentiment_inset: f32,
    pub top_n: usize,
}

impl Default for ScaleSettings {
    fn default() -> Self {
        Self {
            curve: RadiusCurve::Log,
            domain_scope: DomainScope::Period,
            min_radius: 2.0,
            max_radius: 70.0,
            colors: vec![
                "#FCCFCD".to_string(),
                "#F88494".to_string(),
                "#E80000".to_string(),
            ],
            cluster_inset: 100.0,
            cluster_padding: 0.4,
            sentiment_inset: 100.0,
            top_n: N_MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub charge_scale: f32,
    pub charge_base: f32,
    pub x_strength: f32,
    pub y_strength: f32,
    pub collision_margin: f32,
    pub collision_strength: f32,
    pub collision_iterations: usize,
    pub velocity_decay: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub energy_threshold: f32,
    pub warm_start_ticks: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            charge_scale: 0.03,
            charge_base: 1.0,
            x_strength: 0.1,
            y_strength: 0.1,
            collision_margin: 2.0,
            collision_strength: 0.7,
            collision_iterations: 2,
            velocity_decay: 0.4,
            alpha_decay: 0.0228,
            alpha_min: 0.001,
            energy_threshold: 0.01,
            warm_start_ticks: 0,
        }
    }
}

impl LayoutSettings {
    pub fn clamped(self) -> Self {
        Self {
            charge_scale: self.charge_scale.clamp(0.0, 1.0),
            charge_base: self.charge_base.clamp(0.0, 100.0),
            x_strength: self.x_strength.clamp(0.0, 1.0),
            y_strength: self.y_strength.clamp(0.0, 1.0),
            collision_margin: self.collision_margin.clamp(0.0, 20.0),
            collision_strength: self.collision_strength.clamp(0.0, 1.0),
            collision_iterations: self.collision_iterations.clamp(1, 8),
            velocity_decay: self.velocity_decay.clamp(0.0, 1.0),
            alpha_decay: self.alpha_decay.clamp(0.0001, 1.0),
            alpha_min: self.alpha_min.clamp(0.0, 1.0),
            energy_threshold: self.energy_threshold.max(0.0),
            warm_start_ticks: self.warm_start_ticks.min(2_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlanceConfig {
    pub data_dir: PathBuf,
    pub categories: Vec<String>,
    pub seed: Option<u64>,
    pub scale: ScaleSettings,
    pub layout: LayoutSettings,
}

impl Default for GlanceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            categories: vec![
                "News".to_string(),
                "Politics".to_string(),
                "Technology".to_string(),
            ],
            seed: None,
            scale: ScaleSettings::default(),
            layout: LayoutSettings::default(),
        }
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "glance")?;
    Some(proj.config_dir().join("config.toml"))
}

pub fn load_or_default() -> GlanceConfig {
    let Some(path) = config_file_path() else {
        return GlanceConfig::default();
    };
    load_or_default_from_path(&path)
}

fn load_or_default_from_path(path: &Path) -> GlanceConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return GlanceConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|error| {
        warn!(path = %path.display(), %error, "ignoring invalid config file");
        GlanceConfig::default()
    })
}

/// Loads an explicitly requested config file; unlike the default location a
/// missing or invalid file here is an error.
pub fn load_from_path(path: &Path) -> anyhow::Result<GlanceConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("invalid config {}", path.display()))
}

pub fn save(cfg: &GlanceConfig) -> anyhow::Result<()> {
    let Some(path) = config_file_path() else {
        return Err(anyhow::anyhow!("no config directory available"));
    };
    save_to_path(cfg, &path)
}

pub fn save_to_path(cfg: &GlanceConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg).context("failed to serialize config")?;
    fs::write(path, data).with_context(|| format!("failed to write config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn config_roundtrip_save_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = GlanceConfig::default();
        cfg.seed = Some(7);
        cfg.scale.curve = RadiusCurve::Sqrt;
        cfg.scale.domain_scope = DomainScope::Dataset;

        save_to_path(&cfg, &path).expect("save config");

        assert_eq!(load_from_path(&path).expect("load config"), cfg);
        assert_eq!(load_or_default_from_path(&path), cfg);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let partial = r#"
data_dir = "/srv/glance"

[layout]
x_strength = 0.25

[scale]
domain_scope = "window"
"#;

        let cfg: GlanceConfig = toml::from_str(partial).expect("partial config");

        assert_eq!(cfg.data_dir, PathBuf::from("/srv/glance"));
        assert_eq!(cfg.layout.x_strength, 0.25);
        assert_eq!(cfg.layout.y_strength, LayoutSettings::default().y_strength);
        assert_eq!(cfg.scale.domain_scope, DomainScope::Window);
        assert_eq!(cfg.scale.top_n, N_MAX);
        assert_eq!(cfg.categories, GlanceConfig::default().categories);
    }

    #[test]
    fn invalid_default_location_falls_back() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "scale = 3").expect("write config");

        assert_eq!(load_or_default_from_path(&path), GlanceConfig::default());
        assert!(load_from_path(&path).is_err());
    }

    #[test]
    fn clamped_layout_keeps_a_collision_pass() {
        let settings = LayoutSettings {
            collision_iterations: 0,
            velocity_decay: 3.0,
            ..LayoutSettings::default()
        }
        .clamped();

        assert_eq!(settings.collision_iterations, 1);
        assert_eq!(settings.velocity_decay, 1.0);
    }
}
