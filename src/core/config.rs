//! Arena configuration with documented constants
//!
//! All tunables are collected here. A TOML file may override any subset of
//! them; missing keys fall back to the defaults below.

use crate::core::error::{BrainsError, Result};
use crate::core::types::ActorKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top level configuration for a simulation run
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawArenaConfig")]
pub struct ArenaConfig {
    pub world: WorldConfig,
    pub zombie: KindProfile,
    pub human: KindProfile,
    pub steering: SteeringConfig,
    pub population: PopulationConfig,
    pub ticks: TickConfig,
    pub decision: DecisionConfig,
    pub store: StoreConfig,
}

/// Arena dimensions and seeding
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Arena width in cells (x in `[0, width)`)
    pub width: i32,
    /// Arena height in cells (y in `[0, height)`)
    pub height: i32,
    /// RNG seed. `None` draws one from the OS at startup.
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            seed: None,
        }
    }
}

/// Per-kind combat and perception numbers
#[derive(Debug, Clone, PartialEq)]
pub struct KindProfile {
    /// Starting (and maximum) health
    pub max_health: u32,
    /// Euclidean reach of an attack
    pub attack_range: f64,
    /// Health removed by one successful attack
    pub damage: u32,
    /// Radius within which other actors are visible
    pub perception_radius: f64,
}

impl KindProfile {
    /// Zombies bite at close range and see a fair way
    pub fn zombie() -> Self {
        Self {
            max_health: 100,
            attack_range: 20.0,
            damage: 10,
            perception_radius: 150.0,
        }
    }

    /// Human-controlled actors shoot a 200 unit beam
    pub fn human() -> Self {
        Self {
            max_health: 100,
            attack_range: 200.0,
            damage: 25,
            perception_radius: 250.0,
        }
    }

    fn with(mut self, overrides: &ProfileOverrides) -> Self {
        if let Some(v) = overrides.max_health {
            self.max_health = v;
        }
        if let Some(v) = overrides.attack_range {
            self.attack_range = v;
        }
        if let Some(v) = overrides.damage {
            self.damage = v;
        }
        if let Some(v) = overrides.perception_radius {
            self.perception_radius = v;
        }
        self
    }
}

/// A `[zombie]` or `[human]` table; each key replaces the kind's default
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileOverrides {
    max_health: Option<u32>,
    attack_range: Option<f64>,
    damage: Option<u32>,
    perception_radius: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawArenaConfig {
    world: WorldConfig,
    zombie: ProfileOverrides,
    human: ProfileOverrides,
    steering: SteeringConfig,
    population: PopulationConfig,
    ticks: TickConfig,
    decision: DecisionConfig,
    store: StoreConfig,
}

impl From<RawArenaConfig> for ArenaConfig {
    fn from(raw: RawArenaConfig) -> Self {
        Self {
            world: raw.world,
            zombie: KindProfile::zombie().with(&raw.zombie),
            human: KindProfile::human().with(&raw.human),
            steering: raw.steering,
            population: raw.population,
            ticks: raw.ticks,
            decision: raw.decision,
            store: raw.store,
        }
    }
}

/// Autonomous steering tunables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Heading error (degrees) under which an actor advances instead of turning
    pub turn_threshold_deg: f64,
    /// Half-width of the square around a point target that counts as reached
    pub catchment: i32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            turn_threshold_deg: 5.0,
            catchment: 40,
        }
    }
}

/// Who gets spawned at startup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub zombie_count: usize,
    /// One human-controlled actor is spawned per name
    pub human_names: Vec<String>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            zombie_count: 10,
            human_names: vec!["Robot".into()],
        }
    }
}

/// Loop cadence
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Target ticks per second
    pub rate_hz: f64,
    /// Stop after this many ticks. `None` runs until shutdown.
    pub max_ticks: Option<u64>,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            rate_hz: 30.0,
            max_ticks: None,
        }
    }
}

impl TickConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate_hz)
    }
}

/// Remote decision service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub endpoint: String,
    /// Per-tick budget for every decision call, in milliseconds
    ///
    /// Should stay well under one tick period.
    pub timeout_ms: u64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4567".into(),
            timeout_ms: 20,
        }
    }
}

impl DecisionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Snapshot store location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory that receives one JSON record per actor
    pub directory: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("arena"),
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        RawArenaConfig::default().into()
    }
}

impl ArenaConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ArenaConfig =
            toml::from_str(content).map_err(|e| BrainsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BrainsError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn profile(&self, kind: ActorKind) -> &KindProfile {
        match kind {
            ActorKind::Zombie => &self.zombie,
            ActorKind::Human => &self.human,
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.world.width <= 0 || self.world.height <= 0 {
            return Err(BrainsError::Config(format!(
                "arena must have positive size, got {}x{}",
                self.world.width, self.world.height
            )));
        }

        let cells = self.world.width as usize * self.world.height as usize;
        let population = self.population.zombie_count + self.population.human_names.len();
        if population > cells {
            return Err(BrainsError::Config(format!(
                "{} actors do not fit in {} cells",
                population, cells
            )));
        }

        for (kind, profile) in [("zombie", &self.zombie), ("human", &self.human)] {
            if profile.max_health == 0 {
                return Err(BrainsError::Config(format!("{} max_health must be positive", kind)));
            }
            if profile.attack_range < 0.0 || profile.perception_radius < 0.0 {
                return Err(BrainsError::Config(format!("{} ranges must not be negative", kind)));
            }
        }

        if !(self.ticks.rate_hz.is_finite() && self.ticks.rate_hz > 0.0) {
            return Err(BrainsError::Config("tick rate must be positive".into()));
        }

        // A decision budget longer than a tick stalls the loop
        if self.decision.timeout() >= self.ticks.period() {
            return Err(BrainsError::Config(format!(
                "decision timeout ({}ms) must be shorter than the tick period ({:.1}ms)",
                self.decision.timeout_ms,
                self.ticks.period().as_secs_f64() * 1000.0
            )));
        }

        Ok(())
    }
}
