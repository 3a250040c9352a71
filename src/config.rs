use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete simulation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    pub window: WindowConfigData,
    pub field: FieldConfig,
    pub camera: CameraConfigData,
    pub assets: AssetConfigData,
}

impl OrreryConfig {
    /// Load configuration from JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: OrreryConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to JSON file with pretty formatting
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Config loaded from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e:#}, using defaults");
                let config = Self::default();
                // Try to save the default config
                if let Err(e) = config.save(path) {
                    log::warn!("Could not write default config: {e:#}");
                }
                config
            }
        }
    }
}

/// Host window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfigData {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfigData {
    fn default() -> Self {
        Self {
            title: "Orrery".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

impl WindowConfigData {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Asteroid field parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of background asteroids created at start
    pub asteroid_count: usize,
    /// Radial band of the belt, in unscaled asteroid units
    pub min_distance: f32,
    pub max_distance: f32,
    /// Height band of the belt, in unscaled asteroid units
    pub min_height: f32,
    pub max_height: f32,
    /// Uniform scale applied to every belt asteroid (shrinks the belt too)
    pub asteroid_scale: f32,

    /// Most rogue asteroids alive at once
    pub max_rogue: usize,
    /// Chance per open rogue slot per tick of promoting an asteroid
    pub rogue_probability: f32,
    /// Inward speed of a rogue asteroid, units per second
    pub rogue_speed: f32,
    /// Rogues this close to the centre are consumed
    pub consume_radius: f32,

    /// Projectile-asteroid distance that counts as a hit
    pub hit_radius: f32,

    pub debris_min: u32,
    pub debris_max: u32,
    pub debris_min_speed: f32,
    pub debris_max_speed: f32,
    /// Seconds debris lives
    pub debris_lifetime: f32,
    pub debris_scale: f32,

    pub explosion_scale: f32,
    /// Scale of the puff left by a projectile that runs out of time
    pub fizzle_scale: f32,

    /// Fixed RNG seed; entropy is used when absent
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            asteroid_count: 900,
            min_distance: 150_000.0,
            max_distance: 200_000.0,
            min_height: -10_000.0,
            max_height: 60_000.0,
            asteroid_scale: 0.00008,
            max_rogue: 10,
            rogue_probability: 0.01,
            rogue_speed: 2.0,
            consume_radius: 2.0,
            hit_radius: 1.0,
            debris_min: 4,
            debris_max: 6,
            debris_min_speed: 2.0,
            debris_max_speed: 6.0,
            debris_lifetime: 3.0,
            debris_scale: 0.1,
            explosion_scale: 1.0,
            fizzle_scale: 0.3,
            seed: None,
        }
    }
}

/// Which camera rig drives the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    Static,
    Flying,
}

/// Camera configuration (serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfigData {
    pub mode: CameraMode,

    #[serde(with = "vec3_serde")]
    pub position: Vec3,

    #[serde(with = "vec3_serde")]
    pub target: Vec3,

    #[serde(with = "vec3_serde")]
    pub up: Vec3,

    /// Horizontal field of view in degrees
    pub fov: f32,
    pub near_plane: f32,
    pub far_plane: f32,

    pub yaw_speed: f32,
    pub pitch_speed: f32,
    pub move_speed: f32,
    /// Vertical look component beyond which pitch input is rejected
    pub pitch_limit: f32,
    pub min_height: f32,
    pub max_height: f32,

    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub projectile_scale: f32,
}

impl Default for CameraConfigData {
    fn default() -> Self {
        Self {
            mode: CameraMode::Flying,
            position: Vec3::new(0.0, 10.0, -20.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 90.0,
            near_plane: 1.0,
            far_plane: 1000.0,
            yaw_speed: 0.5,
            pitch_speed: 0.5,
            move_speed: 10.0,
            pitch_limit: 0.97,
            min_height: -20.0,
            max_height: 20.0,
            projectile_speed: 15.0,
            projectile_lifetime: 4.0,
            projectile_scale: 0.2,
        }
    }
}

/// Where assets come from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfigData {
    /// Asset directory; placeholder in-memory assets are used when absent
    pub root: Option<PathBuf>,
}

/// Custom serialization for Vec3
mod vec3_serde {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Vec3Data {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S>(vec: &Vec3, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Vec3Data {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec3, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = Vec3Data::deserialize(deserializer)?;
        Ok(Vec3::new(data.x, data.y, data.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrreryConfig::default();
        assert_eq!(config.field.asteroid_count, 900);
        assert_eq!(config.field.max_rogue, 10);
        assert_eq!(config.camera.projectile_speed, 15.0);
        assert_eq!(config.camera.mode, CameraMode::Flying);
    }

    #[test]
    fn test_save_load() {
        let mut config = OrreryConfig::default();
        config.field.seed = Some(7);
        config.camera.position = Vec3::new(1.0, 2.0, 3.0);
        let path = std::env::temp_dir().join(format!("orrery_test_config_{}.json", std::process::id()));

        config.save(&path).unwrap();
        let loaded = OrreryConfig::load(&path).unwrap();

        assert_eq!(loaded, config);

        // Cleanup
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let json = r#"{ "field": { "asteroid_count": 10, "rogue_probability": 1.0 },
                        "camera": { "mode": "static", "position": { "x": 0, "y": 5, "z": 5 } } }"#;
        let config: OrreryConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.field.asteroid_count, 10);
        assert_eq!(config.field.rogue_probability, 1.0);
        assert_eq!(config.field.max_rogue, 10);
        assert_eq!(config.camera.mode, CameraMode::Static);
        assert_eq!(config.camera.position, Vec3::new(0.0, 5.0, 5.0));
        assert_eq!(config.window.width, 1024);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = OrreryConfig::load("definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }
}
