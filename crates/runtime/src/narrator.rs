//! Chat-style narration of rules outcomes.

use std::sync::{Arc, Mutex};

use ledger_core::{
    EventNarrator, LedgerEvent, LedgerTransition, RollGrade, Standing, StandingReading, UsageEvent,
};

/// Narrator that renders every event as an English line in a shared log.
///
/// Clones share the same log, so a host can keep one handle and give another
/// to the [`crate::Session`].
#[derive(Clone, Debug, Default)]
pub struct ChatLogNarrator {
    lines: Arc<Mutex<Vec<String>>>,
}

impl ChatLogNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the log so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn last(&self) -> Option<String> {
        self.lines().pop()
    }

    fn push(&self, line: String) {
        tracing::info!(target: "runtime::chat", "{}", line);
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line),
            Err(poisoned) => poisoned.into_inner().push(line),
        }
    }
}

impl EventNarrator for ChatLogNarrator {
    fn narrate(&mut self, event: &LedgerEvent<'_>) {
        self.push(render(event));
    }
}

/// Render one event as a chat line.
pub fn render(event: &LedgerEvent<'_>) -> String {
    match event {
        LedgerEvent::SceneCue {
            name,
            transition,
            standing,
        } => {
            let mut line = describe_usage(name, transition);
            if let Some(reading) = standing {
                line.push_str(&format!(" Social standing: {}.", describe_standing(reading)));
            }
            line
        }
        LedgerEvent::ClubUpgrade { name, transition } => describe_usage(name, transition),
        LedgerEvent::UpgradeAcquired {
            name,
            cost,
            funds_after,
        } => format!(
            "The club acquired {} for {} readies ({} left).",
            name, cost, funds_after
        ),
        LedgerEvent::StandingAdjusted { before, after } => format!(
            "Social standing moved from {} to {}.",
            describe_standing(before),
            describe_standing(after)
        ),
        LedgerEvent::RenownAdjusted { before, after } => {
            format!("Renown moved from {} to {}.", before, after)
        }
        LedgerEvent::TraitAdjusted(change) => format!(
            "{} moved from {} to {}.",
            change.key.as_ref().to_uppercase(),
            change.before,
            change.after
        ),
        LedgerEvent::TraitRolled(roll) => {
            let key = roll.key.as_ref().to_uppercase();
            match roll.grade {
                RollGrade::Fail => format!("{} roll: no success.", key),
                RollGrade::Success => format!("{} roll: 1 success.", key),
                RollGrade::Successes => format!("{} roll: {} successes.", key, roll.successes),
            }
        }
        LedgerEvent::StatusAdjusted { before, after } => {
            format!("Status moved from {} to {}.", before, after)
        }
        LedgerEvent::LuckCoinsAdjusted { before, after } => {
            format!("Luck coins moved from {} to {}.", before, after)
        }
        LedgerEvent::ArchetypeAssigned { name, cleared: 0 } => {
            format!("Took the {} archetype.", name)
        }
        LedgerEvent::ArchetypeAssigned { name, cleared } => format!(
            "Took the {} archetype, giving up {} item(s).",
            name, cleared
        ),
        LedgerEvent::FlawTaken {
            name,
            replaced: Some(old),
        } => format!("Traded the flaw {} for {}.", old, name),
        LedgerEvent::FlawTaken {
            name,
            replaced: None,
        } => format!("Took the flaw {}.", name),
        LedgerEvent::FlawRemoved { name } => format!("Shed the flaw {}.", name),
    }
}

fn describe_usage(name: &str, transition: &LedgerTransition) -> String {
    let after = transition.after;
    match transition.event {
        UsageEvent::Consume => format!(
            "{} was used ({} of {} uses spent).",
            name, after.used, after.available_usage
        ),
        UsageEvent::Grant => format!(
            "{} gained a use ({} of {} available).",
            name, after.available_usage, after.max_usage
        ),
        UsageEvent::Revoke => format!(
            "{} lost a use ({} of {} available).",
            name, after.available_usage, after.max_usage
        ),
    }
}

fn describe_standing(reading: &StandingReading) -> String {
    match reading.standing {
        Standing::Neutral => "neutral".to_owned(),
        standing => format!("{} {}", reading.magnitude(), standing),
    }
}
