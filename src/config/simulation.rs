//! Simulation configuration, validation and duration clamping.

use std::fmt;
use std::num::IntErrorKind;
use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;
use crate::core::generator::GeneratorSettings;
use crate::core::resource_pool::{ResourceCounts, PARTY};

/// Maximum number of concurrent instances.
pub const MAX_INSTANCES: u32 = 100;
/// Maximum initial players per role.
pub const MAX_PLAYERS: u32 = 10_000;
/// Upper bound for dungeon durations in simulated seconds.
pub const MAX_DURATION: u32 = 15;

const fn default_tick_ms() -> u64 {
    1_000
}

const fn default_poll_interval_ms() -> u64 {
    500
}

const fn default_probability() -> f64 {
    0.3
}

const fn default_bonus_tanks() -> BatchRange {
    BatchRange { min: 0, max: 2 }
}

const fn default_bonus_healers() -> BatchRange {
    BatchRange { min: 0, max: 2 }
}

const fn default_bonus_dps() -> BatchRange {
    BatchRange { min: 0, max: 5 }
}

/// Inclusive bounds for one role in a generated batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRange {
    /// Smallest batch size.
    pub min: u32,
    /// Largest batch size.
    pub max: u32,
}

impl BatchRange {
    const fn range(self) -> RangeInclusive<u32> {
        self.min..=self.max
    }
}

/// Signed command-line values before range conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawArgs {
    /// Number of instances.
    pub instances: i64,
    /// Initial tanks.
    pub tanks: i64,
    /// Initial healers.
    pub healers: i64,
    /// Initial damage dealers.
    pub dps: i64,
    /// Minimum dungeon duration.
    pub t1: i64,
    /// Maximum dungeon duration.
    pub t2: i64,
    /// Generator lifetime in seconds; `None` or 0 is unbounded.
    pub bonus_duration: Option<i64>,
}

/// Full simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of concurrent dungeon instances.
    pub instances: u32,
    /// Initial tanks.
    pub tanks: u32,
    /// Initial healers.
    pub healers: u32,
    /// Initial damage dealers.
    pub dps: u32,
    /// Minimum dungeon duration in simulated seconds.
    pub min_duration: u32,
    /// Maximum dungeon duration in simulated seconds.
    pub max_duration: u32,
    /// Generator lifetime in simulated seconds; 0 is unbounded.
    #[serde(default)]
    pub bonus_duration_secs: u64,
    /// Real milliseconds per simulated second.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Real milliseconds between generator ticks.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Probability that a generator tick produces a batch.
    #[serde(default = "default_probability")]
    pub generation_probability: f64,
    /// Tanks per generated batch.
    #[serde(default = "default_bonus_tanks")]
    pub bonus_tanks: BatchRange,
    /// Healers per generated batch.
    #[serde(default = "default_bonus_healers")]
    pub bonus_healers: BatchRange,
    /// Damage dealers per generated batch.
    #[serde(default = "default_bonus_dps")]
    pub bonus_dps: BatchRange,
    /// Base seed for every random stream; unseeded runs use OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// A duration bound that was adjusted during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationClamp {
    /// `t1` or `t2`.
    pub field: &'static str,
    /// Value as configured.
    pub from: u32,
    /// Value in effect.
    pub to: u32,
}

impl fmt::Display for DurationClamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} clamped from {} to {}", self.field, self.from, self.to)?;
        if self.field == "t2" {
            write!(f, " (max: {MAX_DURATION})")?;
        }
        Ok(())
    }
}

/// Configuration that passed validation; the only input the core accepts.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    instances: usize,
    initial: ResourceCounts,
    durations: RangeInclusive<u32>,
    tick: Duration,
    bonus_duration_secs: u64,
    generator: GeneratorSettings,
    seed: Option<u64>,
    clamps: Vec<DurationClamp>,
}

impl ValidatedConfig {
    /// Number of instances.
    #[must_use]
    pub const fn instances(&self) -> usize {
        self.instances
    }

    /// Initial pool contents.
    #[must_use]
    pub const fn initial(&self) -> ResourceCounts {
        self.initial
    }

    /// Dungeon duration range after clamping.
    #[must_use]
    pub fn durations(&self) -> RangeInclusive<u32> {
        self.durations.clone()
    }

    /// Real time per simulated second.
    #[must_use]
    pub const fn tick(&self) -> Duration {
        self.tick
    }

    /// Generator lifetime in simulated seconds; 0 is unbounded.
    #[must_use]
    pub const fn bonus_duration_secs(&self) -> u64 {
        self.bonus_duration_secs
    }

    /// Generator settings derived from the configuration.
    #[must_use]
    pub fn generator(&self) -> GeneratorSettings {
        self.generator.clone()
    }

    /// Base random seed.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Duration adjustments applied during validation.
    #[must_use]
    pub fn clamps(&self) -> &[DurationClamp] {
        &self.clamps
    }

    /// True when the initial pool cannot form a single party.
    #[must_use]
    pub const fn starts_exhausted(&self) -> bool {
        !self.initial.covers(&PARTY)
    }
}

impl SimulationConfig {
    /// Configuration with the given core values and default tuning.
    #[must_use]
    pub const fn new(
        instances: u32,
        tanks: u32,
        healers: u32,
        dps: u32,
        min_duration: u32,
        max_duration: u32,
    ) -> Self {
        Self {
            instances,
            tanks,
            healers,
            dps,
            min_duration,
            max_duration,
            bonus_duration_secs: 0,
            tick_ms: default_tick_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            generation_probability: default_probability(),
            bonus_tanks: default_bonus_tanks(),
            bonus_healers: default_bonus_healers(),
            bonus_dps: default_bonus_dps(),
            seed: None,
        }
    }

    /// Set the generator lifetime in simulated seconds.
    #[must_use]
    pub const fn with_bonus_duration(mut self, secs: u64) -> Self {
        self.bonus_duration_secs = secs;
        self
    }

    /// Set the real milliseconds per simulated second.
    #[must_use]
    pub const fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    /// Set the generator poll interval in milliseconds.
    #[must_use]
    pub const fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the per-tick generation probability.
    #[must_use]
    pub const fn with_generation_probability(mut self, probability: f64) -> Self {
        self.generation_probability = probability;
        self
    }

    /// Set the base random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build a configuration from signed command-line values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for negative or oversized values.
    pub fn from_raw(raw: RawArgs) -> Result<Self, ConfigError> {
        if raw.instances < 1 || raw.tanks < 0 || raw.healers < 0 || raw.dps < 0 {
            return Err(ConfigError::Validation(
                "instances must be >= 1 and players must be >= 0".into(),
            ));
        }
        if raw.t1 < 1 || raw.t2 < 1 || raw.t1 > raw.t2 {
            return Err(invalid_time_range());
        }
        let bonus = raw.bonus_duration.unwrap_or(0);
        if bonus < 0 {
            return Err(ConfigError::Validation(
                "bonus_duration must be >= 0 (0 = infinite)".into(),
            ));
        }

        let instances = u32::try_from(raw.instances).map_err(|_| too_many_instances())?;
        let player = |v: i64| u32::try_from(v).map_err(|_| too_many_players());
        // oversized durations are clamped later, not rejected
        let duration = |v: i64| u32::try_from(v).unwrap_or(u32::MAX);

        Ok(Self::new(
            instances,
            player(raw.tanks)?,
            player(raw.healers)?,
            player(raw.dps)?,
            duration(raw.t1),
            duration(raw.t2),
        )
        .with_bonus_duration(bonus.unsigned_abs()))
    }

    /// Parse configuration from a JSON string. Validation is left to
    /// [`SimulationConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when the document is not a valid config.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate all values, clamp the duration range and produce the
    /// configuration the simulation core runs with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` describing the first rule violated.
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.instances < 1 {
            return Err(ConfigError::Validation("instances must be >= 1".into()));
        }
        if self.instances > MAX_INSTANCES {
            return Err(too_many_instances());
        }
        if [self.tanks, self.healers, self.dps]
            .iter()
            .any(|&count| count > MAX_PLAYERS)
        {
            return Err(too_many_players());
        }
        if self.min_duration < 1 || self.max_duration < 1 || self.min_duration > self.max_duration
        {
            return Err(invalid_time_range());
        }
        if !(0.0..=1.0).contains(&self.generation_probability) {
            return Err(ConfigError::Validation(
                "generation_probability must be within [0, 1]".into(),
            ));
        }
        for (role, range) in [
            ("bonus_tanks", self.bonus_tanks),
            ("bonus_healers", self.bonus_healers),
            ("bonus_dps", self.bonus_dps),
        ] {
            if range.min > range.max {
                return Err(ConfigError::Validation(format!(
                    "{role} min must not exceed max"
                )));
            }
        }
        if self.tick_ms == 0 || self.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "tick_ms and poll_interval_ms must be greater than 0".into(),
            ));
        }

        let (durations, clamps) = clamp_durations(self.min_duration, self.max_duration);
        for clamp in &clamps {
            tracing::warn!(
                field = clamp.field,
                from = clamp.from,
                to = clamp.to,
                "dungeon duration clamped"
            );
        }

        let initial = ResourceCounts::new(self.tanks, self.healers, self.dps);
        if !initial.covers(&PARTY) {
            tracing::warn!(
                tanks = initial.tanks,
                healers = initial.healers,
                dps = initial.dps,
                "not enough players to form even one party"
            );
        }

        let tick = Duration::from_millis(self.tick_ms);
        let budget = (self.bonus_duration_secs > 0).then(|| {
            Duration::from_millis(self.tick_ms.saturating_mul(self.bonus_duration_secs))
        });

        Ok(ValidatedConfig {
            instances: self.instances as usize,
            initial,
            durations,
            tick,
            bonus_duration_secs: self.bonus_duration_secs,
            generator: GeneratorSettings {
                poll_interval: Duration::from_millis(self.poll_interval_ms),
                probability: self.generation_probability,
                tanks: self.bonus_tanks.range(),
                healers: self.bonus_healers.range(),
                dps: self.bonus_dps.range(),
                budget,
            },
            seed: self.seed,
            clamps,
        })
    }
}

/// Parse a command-line integer, distinguishing malformed from oversized input.
///
/// # Errors
///
/// Returns `ConfigError::Malformed` or `ConfigError::TooLarge`.
pub fn parse_integer(field: &'static str, raw: &str) -> Result<i64, ConfigError> {
    raw.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ConfigError::TooLarge {
            field,
            value: raw.to_string(),
        },
        _ => ConfigError::Malformed {
            field,
            value: raw.to_string(),
        },
    })
}

fn clamp_durations(min: u32, max: u32) -> (RangeInclusive<u32>, Vec<DurationClamp>) {
    let clamped_max = max.clamp(1, MAX_DURATION);
    let clamped_min = min.clamp(1, clamped_max);
    let mut clamps = Vec::new();
    if clamped_min != min {
        clamps.push(DurationClamp {
            field: "t1",
            from: min,
            to: clamped_min,
        });
    }
    if clamped_max != max {
        clamps.push(DurationClamp {
            field: "t2",
            from: max,
            to: clamped_max,
        });
    }
    (clamped_min..=clamped_max, clamps)
}

fn invalid_time_range() -> ConfigError {
    ConfigError::Validation("invalid time range, need 1 <= t1 <= t2".into())
}

fn too_many_instances() -> ConfigError {
    ConfigError::Validation(format!("too many instances (max: {MAX_INSTANCES})"))
}

fn too_many_players() -> ConfigError {
    ConfigError::Validation(format!("player count exceeds maximum ({MAX_PLAYERS})"))
}
