//! Human-readable formatting of configuration, live events and final reports.

use std::fmt::{self, Write as _};

use crate::config::ValidatedConfig;
use crate::core::{InstanceStatus, SimulationEvent, SimulationReport, StatusSnapshot};

const LABEL_WIDTH: usize = 15;
const STATUS_WIDTH: usize = 12;

impl InstanceStatus {
    /// Short lowercase name used in status lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "empty",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `[Status] I0:active    I1:empty     ...` with every entry padded.
#[must_use]
pub fn status_line(statuses: &[InstanceStatus]) -> String {
    let mut line = String::from("[Status] ");
    for (id, status) in statuses.iter().enumerate() {
        let entry = format!("I{id}:{status}");
        let _ = write!(line, "{entry:<STATUS_WIDTH$}");
    }
    line
}

/// Status line followed by the pool contents.
#[must_use]
pub fn snapshot_line(snapshot: &StatusSnapshot) -> String {
    format!(
        "{}| Tanks = {}, Healers = {}, DPS = {}",
        status_line(&snapshot.statuses),
        snapshot.counts.tanks,
        snapshot.counts.healers,
        snapshot.counts.dps
    )
}

/// Start-up banner describing the run.
#[must_use]
pub fn banner(config: &ValidatedConfig) -> String {
    let initial = config.initial();
    let durations = config.durations();
    let bonus = match config.bonus_duration_secs() {
        0 => "Infinite".to_string(),
        secs => format!("{secs} seconds"),
    };
    let mut out = String::from("=== Starting LFG Simulation ===\n");
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{}", "Instances:", config.instances());
    let _ = writeln!(
        out,
        "{:<LABEL_WIDTH$}Tanks = {}, Healers = {}, DPS = {}",
        "Players:", initial.tanks, initial.healers, initial.dps
    );
    let _ = writeln!(
        out,
        "{:<LABEL_WIDTH$}[{},{}] seconds",
        "Clear time:",
        durations.start(),
        durations.end()
    );
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{bonus}", "Bonus mode:");
    out.push_str("================================\n");
    out
}

/// One or more output lines for a live event.
#[must_use]
pub fn describe(event: &SimulationEvent) -> String {
    match event {
        SimulationEvent::GeneratorActivated { .. } => {
            "\n[SYSTEM] Initial players exhausted. Activating bonus player generation...\n"
                .to_string()
        }
        SimulationEvent::DungeonStarted {
            instance,
            duration,
            statuses,
        } => format!(
            "[I{instance}] Dungeon started ({duration}s)\n{}",
            status_line(statuses)
        ),
        SimulationEvent::DungeonCompleted {
            instance,
            duration,
            statuses,
        } => format!(
            "[I{instance}] Dungeon completed ({duration}s)\n{}",
            status_line(statuses)
        ),
        SimulationEvent::PlayersAdded { batch } => format!(
            "[Player Generator] Added players - Tanks: {}, Healers: {}, DPS: {}",
            batch.tanks, batch.healers, batch.dps
        ),
        SimulationEvent::BonusExpired => {
            "\n[SYSTEM] Bonus duration ended. Finishing remaining dungeons...\n".to_string()
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation Summary ===")?;
        for instance in &self.instances {
            writeln!(
                f,
                "Instance {}: Served {} parties, Total time {} seconds",
                instance.id, instance.served, instance.busy_secs
            )?;
        }
        writeln!(f, "--------------------------")?;
        writeln!(f, "Total parties served: {}", self.total_served())?;
        writeln!(f, "Total time spent: {} seconds", self.total_busy_secs())?;
        writeln!(f)?;
        writeln!(f, "Bonus players generated:")?;
        writeln!(f, "  Tanks: {}", self.generated.tanks_added)?;
        writeln!(f, "  Healers: {}", self.generated.healers_added)?;
        writeln!(f, "  DPS: {}", self.generated.dps_added)?;
        writeln!(f, "  Total: {}", self.generated.total())?;
        writeln!(f)?;
        writeln!(f, "Remaining players:")?;
        writeln!(f, "  Tanks: {}", self.remaining.tanks)?;
        writeln!(f, "  Healers: {}", self.remaining.healers)?;
        writeln!(f, "  DPS: {}", self.remaining.dps)?;
        write!(f, "==========================")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::core::{GeneratorStats, InstanceRecord, ResourceCounts};
    use std::time::Duration;

    #[test]
    fn test_status_strings() {
        assert_eq!(InstanceStatus::Idle.as_str(), "empty");
        assert_eq!(InstanceStatus::Active.to_string(), "active");
    }

    #[test]
    fn test_status_line_pads_entries() {
        let line = status_line(&[InstanceStatus::Active, InstanceStatus::Idle]);
        assert_eq!(line, "[Status] I0:active   I1:empty    ");
    }

    #[test]
    fn test_snapshot_line_includes_counts() {
        let line = snapshot_line(&StatusSnapshot {
            counts: ResourceCounts::new(1, 2, 3),
            statuses: vec![InstanceStatus::Idle],
        });
        assert_eq!(line, "[Status] I0:empty    | Tanks = 1, Healers = 2, DPS = 3");
    }

    #[test]
    fn test_banner_mentions_bonus_mode() {
        let cfg = SimulationConfig::new(2, 1, 1, 3, 1, 4)
            .with_bonus_duration(9)
            .validate()
            .unwrap();
        let text = banner(&cfg);
        assert!(text.contains("Instances:     2"));
        assert!(text.contains("[1,4] seconds"));
        assert!(text.contains("Bonus mode:    9 seconds"));

        let unbounded = SimulationConfig::new(1, 1, 1, 3, 1, 1).validate().unwrap();
        assert!(banner(&unbounded).contains("Infinite"));
    }

    #[test]
    fn test_describe_players_added() {
        let text = describe(&SimulationEvent::PlayersAdded {
            batch: ResourceCounts::new(2, 0, 5),
        });
        assert_eq!(
            text,
            "[Player Generator] Added players - Tanks: 2, Healers: 0, DPS: 5"
        );
    }

    #[test]
    fn test_summary_lists_instances_and_totals() {
        let report = SimulationReport {
            run_id: uuid::Uuid::nil(),
            instances: vec![InstanceRecord {
                id: 0,
                served: 3,
                busy_secs: 12,
                ..InstanceRecord::default()
            }],
            remaining: ResourceCounts::new(0, 1, 2),
            generated: GeneratorStats {
                tanks_added: 1,
                healers_added: 1,
                dps_added: 4,
            },
            elapsed: Duration::from_secs(12),
        };
        let text = report.to_string();
        assert!(text.contains("Instance 0: Served 3 parties, Total time 12 seconds"));
        assert!(text.contains("Total parties served: 3"));
        assert!(text.contains("  Total: 6"));
        assert!(text.contains("  Healers: 1\n  DPS: 2"));
    }
}
