//! Session orchestration: load a record, apply the rules, persist, narrate.
//!
//! Every operation follows the same order. The record is loaded from the
//! [`SheetRepository`], the rules in `ledger-core` mutate it, changed records
//! are saved, and only then is the outcome narrated and any table draw
//! forwarded. No-op transitions are neither saved nor narrated.

use std::sync::Arc;

use ledger_content::ContentFactory;
use ledger_core::{
    AcquisitionDecision, Archetype, CharacterSheet, ClubUpgrade, ClubUpgradeOutcome,
    EventNarrator, FixedConfirmer, Flaw, LedgerEvent, Nudge, NullDrawer, RenownTrack,
    RequirementConfirmer, RulesConfig, SceneCue, SceneCueOutcome, SheetFields, SilentNarrator,
    StandingReading, TableDrawer, TraitChange, TraitKey, TraitRoll, TraitScores, UsageEvent,
    UsagePip, renown_pips_within, scene_cue_order, standing_pips_within, usage_pips,
};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{Result, RuntimeError};
use crate::repository::{
    ActorId, CharacterRecord, ClubRecord, InMemorySheetRepository, ItemId, ItemRecord,
    SheetRepository,
};

/// What firing an event at a scene cue did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneCueReport {
    pub outcome: SceneCueOutcome,
    /// The owner's standing after the cue moved it.
    pub standing: Option<StandingReading>,
}

/// Result of a club trying to acquire an upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquisition {
    /// Paid for and stored under `item`.
    Acquired { item: ItemId, funds_after: i32 },
    /// The renown or funds check failed; nothing changed.
    Refused(AcquisitionDecision),
    /// The extra requirement was not confirmed; nothing changed.
    RequirementDeclined,
}

impl Acquisition {
    pub const fn is_acquired(&self) -> bool {
        matches!(self, Self::Acquired { .. })
    }
}

/// Result of giving a character a flaw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlawChange {
    /// Stored under `item`; `replaced` is the flaw it displaced.
    Taken { item: ItemId, replaced: Option<Flaw> },
    /// Replacing the current flaw was not confirmed; nothing changed.
    Declined,
}

/// Result of assigning an archetype to a character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArchetypeChange {
    /// `items` were handed out; `cleared` previously owned items were dropped.
    Assigned { items: Vec<ItemId>, cleared: usize },
    /// Replacing the current archetype was not confirmed; nothing changed.
    Declined,
}

/// Question put to the confirmer before a flaw is replaced.
pub const REPLACE_FLAW: &str = "replace the current flaw";

/// Question put to the confirmer before an archetype is replaced. Every item
/// the character owns is dropped with it.
pub const REPLACE_ARCHETYPE: &str = "replace the current archetype and drop every owned item";

/// One row of a character's scene cue list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneCueRow {
    pub id: ItemId,
    pub cue: SceneCue,
    pub pips: Vec<UsagePip>,
}

/// One row of a club's upgrade list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClubUpgradeRow {
    pub id: ItemId,
    pub upgrade: ClubUpgrade,
    pub can_use: bool,
}

/// Ties the rules to persistence and the host's collaborators.
pub struct Session {
    repository: Arc<dyn SheetRepository>,
    narrator: Box<dyn EventNarrator>,
    tables: Box<dyn TableDrawer>,
    confirmer: Box<dyn RequirementConfirmer>,
    config: RulesConfig,
    catalog: Catalog,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn repository(&self) -> &Arc<dyn SheetRepository> {
        &self.repository
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    /// Create and store a fresh character.
    pub fn create_character(&self, id: ActorId, name: &str) -> Result<CharacterRecord> {
        let record = CharacterRecord::new(id, name, CharacterSheet::new(&self.config));
        self.repository.save_character(&record)?;
        info!(target: "runtime::session", actor = %id, name, "character created");
        Ok(record)
    }

    /// Create and store a social club.
    pub fn create_club(&self, id: ActorId, name: &str, renown: i32, funds: i32) -> Result<ClubRecord> {
        let renown = RenownTrack::with_bounds(renown, self.config.renown);
        let record = ClubRecord::new(id, name, renown, funds);
        self.repository.save_club(&record)?;
        info!(target: "runtime::session", club = %id, name, "social club created");
        Ok(record)
    }

    /// Load a character with its counters bound to this session's rules.
    pub fn character(&self, id: ActorId) -> Result<CharacterRecord> {
        let mut record = self
            .repository
            .load_character(id)?
            .ok_or(RuntimeError::CharacterNotFound(id))?;
        record.sheet.rebind(&self.config);
        Ok(record)
    }

    /// Load a club with its renown bound to this session's rules.
    pub fn club(&self, id: ActorId) -> Result<ClubRecord> {
        let mut record = self
            .repository
            .load_club(id)?
            .ok_or(RuntimeError::ClubNotFound(id))?;
        record.renown = record.renown.rebind(self.config.renown);
        Ok(record)
    }

    /// Link a character to a social club, or unlink it with `None`.
    pub fn set_club(&self, actor: ActorId, club: Option<ActorId>) -> Result<()> {
        let mut character = self.character(actor)?;
        if let Some(club) = club {
            self.club(club)?;
        }
        character.club = club;
        self.repository.save_character(&character)?;
        debug!(target: "runtime::session", %actor, club = ?club, "club link updated");
        Ok(())
    }

    /// Give a character a new scene cue.
    ///
    /// The cue's capacity must not exceed the configured usage cap.
    pub fn add_scene_cue(&self, actor: ActorId, cue: SceneCue) -> Result<ItemId> {
        self.config.check_max_usage(cue.ledger().max_usage())?;
        let mut character = self.character(actor)?;
        let item = self.repository.next_item_id()?;
        self.repository.save_item(item, &ItemRecord::SceneCue(cue))?;
        character.scene_cues.push(item);
        self.repository.save_character(&character)?;
        debug!(target: "runtime::session", %actor, %item, "scene cue added");
        Ok(item)
    }

    /// Give a character a copy of a catalog scene cue.
    pub fn add_catalog_scene_cue(&self, actor: ActorId, name: &str) -> Result<ItemId> {
        let cue = self
            .catalog
            .scene_cue(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownCatalogEntry(name.to_owned()))?;
        self.add_scene_cue(actor, cue)
    }

    // ------------------------------------------------------------------
    // Usage ledgers
    // ------------------------------------------------------------------

    /// Fire a usage event at one of a character's scene cues.
    ///
    /// A consumed use moves the owner's social standing by the cue's delta and
    /// forwards the cue's influence table to the table drawer.
    pub fn fire_scene_cue(
        &mut self,
        actor: ActorId,
        item: ItemId,
        event: UsageEvent,
    ) -> Result<SceneCueReport> {
        let mut character = self.character(actor)?;
        if !character.owns(item) {
            return Err(RuntimeError::NotOwned { owner: actor, item });
        }
        let mut cue = self.scene_cue_item(item)?;

        let outcome = cue.apply(event);
        if outcome.is_noop() {
            debug!(
                target: "runtime::session",
                %actor,
                %item,
                %event,
                "scene cue event had no effect"
            );
            return Ok(SceneCueReport {
                outcome,
                standing: None,
            });
        }

        // The sheet goes first: a failed item save leaves the use unspent.
        let standing = match outcome.effects.as_ref().and_then(|e| e.standing_change()) {
            Some(delta) => {
                let reading = character.sheet.adjust_standing(delta);
                self.save_sheet(&character, SheetFields::SOCIAL_STANDING)?;
                Some(reading)
            }
            None => None,
        };
        self.repository
            .save_item(item, &ItemRecord::SceneCue(cue.clone()))?;

        let after = outcome.transition.after;
        info!(
            target: "runtime::session",
            %actor,
            %item,
            %event,
            fields = ?outcome.transition.changed_fields(),
            available = after.available_usage,
            used = after.used,
            "scene cue transition applied"
        );

        self.narrator.narrate(&LedgerEvent::SceneCue {
            name: &cue.name,
            transition: outcome.transition,
            standing,
        });
        if let Some(table) = outcome.effects.as_ref().and_then(|e| e.table.as_ref()) {
            self.tables.draw(table);
        }

        Ok(SceneCueReport { outcome, standing })
    }

    /// Fire a usage event at one of a club's upgrades.
    pub fn fire_club_upgrade(
        &mut self,
        club: ActorId,
        item: ItemId,
        event: UsageEvent,
    ) -> Result<ClubUpgradeOutcome> {
        let record = self.club(club)?;
        if !record.owns(item) {
            return Err(RuntimeError::NotOwned { owner: club, item });
        }
        let mut upgrade = self.club_upgrade_item(item)?;

        let outcome = upgrade.apply(event);
        let transition = match outcome {
            ClubUpgradeOutcome::NoUsage => {
                debug!(target: "runtime::session", %club, %item, "club upgrade has no usage ledger");
                return Ok(outcome);
            }
            ClubUpgradeOutcome::Transition(transition) if transition.is_noop() => {
                debug!(
                    target: "runtime::session",
                    %club,
                    %item,
                    %event,
                    "club upgrade event had no effect"
                );
                return Ok(outcome);
            }
            ClubUpgradeOutcome::Transition(transition) => transition,
        };

        self.repository
            .save_item(item, &ItemRecord::ClubUpgrade(upgrade.clone()))?;
        info!(
            target: "runtime::session",
            %club,
            %item,
            %event,
            fields = ?transition.changed_fields(),
            "club upgrade transition applied"
        );
        self.narrator.narrate(&LedgerEvent::ClubUpgrade {
            name: &upgrade.name,
            transition,
        });

        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Tracks
    // ------------------------------------------------------------------

    /// Move a character's social standing; the result is clamped.
    pub fn adjust_standing(&mut self, actor: ActorId, delta: i32) -> Result<StandingReading> {
        let mut character = self.character(actor)?;
        let before = character.sheet.social_standing().reading();
        let after = character.sheet.adjust_standing(delta);
        if before == after {
            return Ok(after);
        }

        self.save_sheet(&character, SheetFields::SOCIAL_STANDING)?;
        self.narrator
            .narrate(&LedgerEvent::StandingAdjusted { before, after });
        Ok(after)
    }

    /// Move a club's renown; the result is clamped.
    pub fn adjust_renown(&mut self, club: ActorId, delta: i32) -> Result<i32> {
        let mut record = self.club(club)?;
        let before = record.renown.value();
        let after = record.renown.adjust(delta);
        if before == after {
            return Ok(after);
        }

        self.repository.save_club(&record)?;
        info!(target: "runtime::session", %club, before, after, "renown adjusted");
        self.narrator
            .narrate(&LedgerEvent::RenownAdjusted { before, after });
        Ok(after)
    }

    /// Try to acquire `upgrade` for a club.
    ///
    /// An upgrade whose usage capacity exceeds the configured cap is
    /// rejected. Renown is checked before funds. An upgrade with an extra
    /// requirement also needs the confirmer's approval. On success the cost is
    /// debited and the upgrade is stored as a new item of the club.
    pub fn acquire_upgrade(&mut self, club: ActorId, upgrade: ClubUpgrade) -> Result<Acquisition> {
        if let Some(ledger) = upgrade.ledger() {
            self.config.check_max_usage(ledger.max_usage())?;
        }
        let mut record = self.club(club)?;

        let decision = record.renown.evaluate(&upgrade, record.funds);
        if !decision.is_approved() {
            warn!(
                target: "runtime::session",
                %club,
                upgrade = %upgrade.name,
                %decision,
                renown = record.renown.value(),
                funds = record.funds,
                "upgrade acquisition refused"
            );
            return Ok(Acquisition::Refused(decision));
        }

        if let Some(requirement) = upgrade.extra_requirement.as_deref() {
            if !self.confirmer.confirm(&upgrade.name, requirement) {
                info!(
                    target: "runtime::session",
                    %club,
                    upgrade = %upgrade.name,
                    "extra requirement not confirmed"
                );
                return Ok(Acquisition::RequirementDeclined);
            }
        }

        record.funds -= upgrade.cost;
        let item = self.repository.next_item_id()?;
        self.repository
            .save_item(item, &ItemRecord::ClubUpgrade(upgrade.clone()))?;
        record.upgrades.push(item);
        self.repository.save_club(&record)?;

        info!(
            target: "runtime::session",
            %club,
            %item,
            upgrade = %upgrade.name,
            funds = record.funds,
            "upgrade acquired"
        );
        self.narrator.narrate(&LedgerEvent::UpgradeAcquired {
            name: &upgrade.name,
            cost: upgrade.cost,
            funds_after: record.funds,
        });

        Ok(Acquisition::Acquired {
            item,
            funds_after: record.funds,
        })
    }

    /// [`Self::acquire_upgrade`] for a catalog entry.
    pub fn acquire_catalog_upgrade(&mut self, club: ActorId, name: &str) -> Result<Acquisition> {
        let upgrade = self
            .catalog
            .club_upgrade(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownCatalogEntry(name.to_owned()))?;
        self.acquire_upgrade(club, upgrade)
    }

    // ------------------------------------------------------------------
    // Sheet
    // ------------------------------------------------------------------

    /// Step a trait within `[min, max]`, where the club's caps set the max.
    pub fn nudge_trait(&mut self, actor: ActorId, key: TraitKey, nudge: Nudge) -> Result<TraitChange> {
        let mut character = self.character(actor)?;
        let caps = self.club_caps(&character)?;

        let change = character
            .sheet
            .nudge_trait(key, nudge, caps.as_ref(), &self.config);
        if !change.changed() {
            return Ok(change);
        }

        self.save_sheet(&character, SheetFields::TRAITS)?;
        self.narrator.narrate(&LedgerEvent::TraitAdjusted(change));
        Ok(change)
    }

    /// Number of dice the host should roll for `key`.
    pub fn dice_pool(&self, actor: ActorId, key: TraitKey) -> Result<u32> {
        Ok(self.character(actor)?.sheet.dice_pool(key))
    }

    /// Grade a trait roll from faces the host rolled.
    pub fn roll_trait(&mut self, actor: ActorId, key: TraitKey, faces: &[u8]) -> Result<TraitRoll> {
        let character = self.character(actor)?;
        let pool = character.sheet.dice_pool(key);
        if faces.len() != pool as usize {
            warn!(
                target: "runtime::session",
                %actor,
                %key,
                pool,
                rolled = faces.len(),
                "rolled dice do not match the trait's pool"
            );
        }

        let roll = character.sheet.trait_roll(key, faces);
        self.narrator.narrate(&LedgerEvent::TraitRolled(roll));
        Ok(roll)
    }

    /// Step status within its bounds. Returns `(before, after)`.
    pub fn nudge_status(&mut self, actor: ActorId, nudge: Nudge) -> Result<(i32, i32)> {
        let mut character = self.character(actor)?;
        let (before, after) = character.sheet.nudge_status(nudge);
        if before != after {
            self.save_sheet(&character, SheetFields::STATUS)?;
            self.narrator
                .narrate(&LedgerEvent::StatusAdjusted { before, after });
        }
        Ok((before, after))
    }

    /// Step luck coins within their bounds. Returns `(before, after)`.
    pub fn nudge_luck(&mut self, actor: ActorId, nudge: Nudge) -> Result<(i32, i32)> {
        let mut character = self.character(actor)?;
        let (before, after) = character.sheet.nudge_luck_coins(nudge);
        if before != after {
            self.save_sheet(&character, SheetFields::LUCK_COINS)?;
            self.narrator
                .narrate(&LedgerEvent::LuckCoinsAdjusted { before, after });
        }
        Ok((before, after))
    }

    /// Mark the nickname used, or clear it with `alt`.
    pub fn mark_nickname(&mut self, actor: ActorId, alt: bool) -> Result<bool> {
        let mut character = self.character(actor)?;
        let before = character.sheet.nickname_used;
        let used = character.sheet.mark_nickname(alt);
        if before != used {
            self.save_sheet(&character, SheetFields::NICKNAME)?;
        }
        Ok(used)
    }

    /// Give a character `archetype`: reset traits, take its readies and
    /// receive its scene cues and flaw.
    ///
    /// A character that already has an archetype only changes with the
    /// confirmer's approval, and then gives up every item it owns first.
    pub fn assign_archetype(
        &mut self,
        actor: ActorId,
        archetype: &Archetype,
    ) -> Result<ArchetypeChange> {
        let mut character = self.character(actor)?;
        for cue in &archetype.scene_cues {
            self.config.check_max_usage(cue.ledger().max_usage())?;
        }

        let replacing = character.sheet.has_archetype();
        if replacing && !self.confirmer.confirm(&archetype.name, REPLACE_ARCHETYPE) {
            info!(
                target: "runtime::session",
                %actor,
                archetype = %archetype.name,
                "archetype replacement not confirmed"
            );
            return Ok(ArchetypeChange::Declined);
        }

        let mut cleared = if replacing {
            let owned = character.owned_items();
            character.scene_cues.clear();
            character.flaw = None;
            owned
        } else {
            Vec::new()
        };

        character.sheet.adopt(archetype, &self.config);
        let mut items = Vec::with_capacity(archetype.scene_cues.len() + 1);
        for cue in &archetype.scene_cues {
            let item = self.repository.next_item_id()?;
            self.repository
                .save_item(item, &ItemRecord::SceneCue(cue.clone()))?;
            character.scene_cues.push(item);
            items.push(item);
        }
        if let Some(flaw) = &archetype.flaw {
            let item = self.repository.next_item_id()?;
            self.repository
                .save_item(item, &ItemRecord::Flaw(flaw.clone()))?;
            // The archetype's flaw displaces a hand-picked one.
            cleared.extend(character.flaw.replace(item));
            items.push(item);
        }
        self.save_sheet(&character, SheetFields::ARCHETYPE | SheetFields::TRAITS)?;
        for &item in &cleared {
            self.repository.delete_item(item)?;
        }

        info!(
            target: "runtime::session",
            %actor,
            archetype = %archetype.name,
            added = items.len(),
            cleared = cleared.len(),
            "archetype assigned"
        );
        self.narrator.narrate(&LedgerEvent::ArchetypeAssigned {
            name: &archetype.name,
            cleared: cleared.len(),
        });

        Ok(ArchetypeChange::Assigned {
            items,
            cleared: cleared.len(),
        })
    }

    /// [`Self::assign_archetype`] for a catalog entry.
    pub fn assign_catalog_archetype(
        &mut self,
        actor: ActorId,
        name: &str,
    ) -> Result<ArchetypeChange> {
        let archetype = self
            .catalog
            .archetype(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownCatalogEntry(name.to_owned()))?;
        self.assign_archetype(actor, &archetype)
    }

    // ------------------------------------------------------------------
    // Flaw
    // ------------------------------------------------------------------

    /// The character's flaw, if any.
    pub fn flaw(&self, actor: ActorId) -> Result<Option<(ItemId, Flaw)>> {
        let character = self.character(actor)?;
        self.current_flaw(&character)
    }

    /// Give a character `flaw`. An existing flaw is replaced only with the
    /// confirmer's approval.
    pub fn add_flaw(&mut self, actor: ActorId, flaw: Flaw) -> Result<FlawChange> {
        let mut character = self.character(actor)?;
        let current = self.current_flaw(&character)?;

        if current.is_some() && !self.confirmer.confirm(&flaw.name, REPLACE_FLAW) {
            info!(
                target: "runtime::session",
                %actor,
                flaw = %flaw.name,
                "flaw replacement not confirmed"
            );
            return Ok(FlawChange::Declined);
        }

        let item = self.repository.next_item_id()?;
        self.repository
            .save_item(item, &ItemRecord::Flaw(flaw.clone()))?;
        character.flaw = Some(item);
        self.repository.save_character(&character)?;

        let replaced = match current {
            Some((old, old_flaw)) => {
                self.repository.delete_item(old)?;
                Some(old_flaw)
            }
            None => None,
        };

        debug!(target: "runtime::session", %actor, %item, flaw = %flaw.name, "flaw taken");
        self.narrator.narrate(&LedgerEvent::FlawTaken {
            name: &flaw.name,
            replaced: replaced.as_ref().map(|old| old.name.as_str()),
        });
        Ok(FlawChange::Taken { item, replaced })
    }

    /// [`Self::add_flaw`] for a catalog entry.
    pub fn add_catalog_flaw(&mut self, actor: ActorId, name: &str) -> Result<FlawChange> {
        let flaw = self
            .catalog
            .flaw(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownCatalogEntry(name.to_owned()))?;
        self.add_flaw(actor, flaw)
    }

    /// Remove the character's flaw. Returns the removed flaw, if there was one.
    pub fn delete_flaw(&mut self, actor: ActorId) -> Result<Option<Flaw>> {
        let mut character = self.character(actor)?;
        let Some((item, flaw)) = self.current_flaw(&character)? else {
            return Ok(None);
        };

        character.flaw = None;
        self.repository.save_character(&character)?;
        self.repository.delete_item(item)?;

        debug!(target: "runtime::session", %actor, %item, flaw = %flaw.name, "flaw removed");
        self.narrator
            .narrate(&LedgerEvent::FlawRemoved { name: &flaw.name });
        Ok(Some(flaw))
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// A character's scene cues, available ones first, then by name.
    pub fn scene_cue_rows(&self, actor: ActorId) -> Result<Vec<SceneCueRow>> {
        let character = self.character(actor)?;
        let mut rows = Vec::with_capacity(character.scene_cues.len());
        for (id, item) in self.repository.load_items(&character.scene_cues)? {
            let cue = match item {
                ItemRecord::SceneCue(cue) => cue,
                other => return Err(kind_mismatch(id, "scene_cue", &other)),
            };
            rows.push(SceneCueRow {
                id,
                pips: usage_pips(cue.ledger()),
                cue,
            });
        }
        rows.sort_by(|a, b| scene_cue_order(&a.cue, &b.cue));
        Ok(rows)
    }

    /// Standing pips over this session's standing range.
    pub fn standing_pips(&self, actor: ActorId) -> Result<Vec<Option<u8>>> {
        let character = self.character(actor)?;
        Ok(standing_pips_within(
            character.sheet.social_standing().value(),
            self.config.social_standing,
        ))
    }

    /// Renown pips up to this session's renown maximum.
    pub fn renown_pips(&self, club: ActorId) -> Result<Vec<Option<u8>>> {
        let record = self.club(club)?;
        Ok(renown_pips_within(record.renown.value(), self.config.renown))
    }

    /// A club's upgrades in acquisition order.
    pub fn club_upgrade_rows(&self, club: ActorId) -> Result<Vec<ClubUpgradeRow>> {
        let record = self.club(club)?;
        let mut rows = Vec::with_capacity(record.upgrades.len());
        for (id, item) in self.repository.load_items(&record.upgrades)? {
            let upgrade = match item {
                ItemRecord::ClubUpgrade(upgrade) => upgrade,
                other => return Err(kind_mismatch(id, "club_upgrade", &other)),
            };
            rows.push(ClubUpgradeRow {
                id,
                can_use: upgrade.can_use(),
                upgrade,
            });
        }
        Ok(rows)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn scene_cue_item(&self, id: ItemId) -> Result<SceneCue> {
        match self.repository.load_item(id)? {
            Some(ItemRecord::SceneCue(cue)) => Ok(cue),
            Some(other) => Err(kind_mismatch(id, "scene_cue", &other)),
            None => Err(RuntimeError::ItemNotFound(id)),
        }
    }

    fn club_upgrade_item(&self, id: ItemId) -> Result<ClubUpgrade> {
        match self.repository.load_item(id)? {
            Some(ItemRecord::ClubUpgrade(upgrade)) => Ok(upgrade),
            Some(other) => Err(kind_mismatch(id, "club_upgrade", &other)),
            None => Err(RuntimeError::ItemNotFound(id)),
        }
    }

    /// The character's flaw. A dangling flaw link counts as no flaw.
    fn current_flaw(&self, character: &CharacterRecord) -> Result<Option<(ItemId, Flaw)>> {
        let Some(item) = character.flaw else {
            return Ok(None);
        };
        match self.repository.load_item(item)? {
            Some(ItemRecord::Flaw(flaw)) => Ok(Some((item, flaw))),
            Some(other) => Err(kind_mismatch(item, "flaw", &other)),
            None => {
                warn!(
                    target: "runtime::session",
                    actor = %character.id,
                    %item,
                    "character links to a missing flaw"
                );
                Ok(None)
            }
        }
    }

    /// Trait caps of the character's club. A dangling club link falls back
    /// to the configured trait maximum.
    fn club_caps(&self, character: &CharacterRecord) -> Result<Option<TraitScores>> {
        let Some(club) = character.club else {
            return Ok(None);
        };
        match self.repository.load_club(club)? {
            Some(record) => Ok(record.trait_caps),
            None => {
                warn!(
                    target: "runtime::session",
                    actor = %character.id,
                    %club,
                    "character links to a missing club"
                );
                Ok(None)
            }
        }
    }

    fn save_sheet(&self, character: &CharacterRecord, fields: SheetFields) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }
        self.repository.save_character(character)?;
        debug!(
            target: "runtime::session",
            actor = %character.id,
            fields = ?fields,
            "character sheet saved"
        );
        Ok(())
    }
}

fn kind_mismatch(item: ItemId, expected: &'static str, found: &ItemRecord) -> RuntimeError {
    RuntimeError::ItemKindMismatch {
        item,
        expected,
        found: found.kind(),
    }
}

/// Builder for [`Session`].
///
/// Without explicit collaborators a session stores records in memory, stays
/// silent, ignores tables and declines every extra requirement.
pub struct SessionBuilder {
    repository: Option<Arc<dyn SheetRepository>>,
    narrator: Option<Box<dyn EventNarrator>>,
    tables: Option<Box<dyn TableDrawer>>,
    confirmer: Option<Box<dyn RequirementConfirmer>>,
    config: RulesConfig,
    catalog: Catalog,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            repository: None,
            narrator: None,
            tables: None,
            confirmer: None,
            config: RulesConfig::default(),
            catalog: Catalog::default(),
        }
    }

    pub fn repository(mut self, repository: impl SheetRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Use a repository the host keeps a handle to.
    pub fn shared_repository(mut self, repository: Arc<dyn SheetRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn narrator(mut self, narrator: impl EventNarrator + 'static) -> Self {
        self.narrator = Some(Box::new(narrator));
        self
    }

    pub fn table_drawer(mut self, tables: impl TableDrawer + 'static) -> Self {
        self.tables = Some(Box::new(tables));
        self
    }

    pub fn confirmer(mut self, confirmer: impl RequirementConfirmer + 'static) -> Self {
        self.confirmer = Some(Box::new(confirmer));
        self
    }

    pub fn config(mut self, config: RulesConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Load rules and catalogs from a content directory.
    pub fn content(mut self, factory: &ContentFactory) -> Result<Self> {
        self.config = factory.load_config()?;
        self.catalog = Catalog::load(factory, &self.config)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Session> {
        self.config.validate()?;

        Ok(Session {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(InMemorySheetRepository::new())),
            narrator: self.narrator.unwrap_or_else(|| Box::new(SilentNarrator)),
            tables: self.tables.unwrap_or_else(|| Box::new(NullDrawer)),
            confirmer: self
                .confirmer
                .unwrap_or_else(|| Box::new(FixedConfirmer(false))),
            config: self.config,
            catalog: self.catalog,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use ledger_core::{ConfigError, StandingDelta, TableRef};

    use super::*;
    use crate::repository::RepositoryError;

    fn session() -> Session {
        Session::builder().build().unwrap()
    }

    /// In-memory repository whose character saves can be made to fail.
    #[derive(Default)]
    struct FlakyCharacters {
        inner: InMemorySheetRepository,
        failing: AtomicBool,
    }

    impl SheetRepository for FlakyCharacters {
        fn load_character(&self, id: ActorId) -> crate::repository::Result<Option<CharacterRecord>> {
            self.inner.load_character(id)
        }

        fn save_character(&self, record: &CharacterRecord) -> crate::repository::Result<()> {
            if self.failing.load(Ordering::Relaxed) {
                return Err(RepositoryError::CorruptedData("disk full".to_owned()));
            }
            self.inner.save_character(record)
        }

        fn load_club(&self, id: ActorId) -> crate::repository::Result<Option<ClubRecord>> {
            self.inner.load_club(id)
        }

        fn save_club(&self, record: &ClubRecord) -> crate::repository::Result<()> {
            self.inner.save_club(record)
        }

        fn load_item(&self, id: ItemId) -> crate::repository::Result<Option<ItemRecord>> {
            self.inner.load_item(id)
        }

        fn save_item(&self, id: ItemId, item: &ItemRecord) -> crate::repository::Result<()> {
            self.inner.save_item(id, item)
        }

        fn delete_item(&self, id: ItemId) -> crate::repository::Result<()> {
            self.inner.delete_item(id)
        }

        fn next_item_id(&self) -> crate::repository::Result<ItemId> {
            self.inner.next_item_id()
        }
    }

    #[test]
    fn failed_sheet_save_leaves_the_use_unspent() {
        let repository = Arc::new(FlakyCharacters::default());
        let mut session = Session::builder()
            .shared_repository(repository.clone())
            .build()
            .unwrap();
        session.create_character(ActorId(1), "Agatha").unwrap();
        let cue = SceneCue::new("Swoon", 2)
            .unwrap()
            .with_standing_delta(StandingDelta::Scandal);
        let item = session.add_scene_cue(ActorId(1), cue).unwrap();
        session
            .fire_scene_cue(ActorId(1), item, UsageEvent::Grant)
            .unwrap();

        repository.failing.store(true, Ordering::Relaxed);
        let error = session
            .fire_scene_cue(ActorId(1), item, UsageEvent::Consume)
            .unwrap_err();
        assert!(matches!(error, RuntimeError::Repository(_)));

        let cue = session.scene_cue_item(item).unwrap();
        assert_eq!(cue.ledger().used(), 0);
        assert_eq!(cue.ledger().available_usage(), 1);
        let character = session.character(ActorId(1)).unwrap();
        assert_eq!(character.sheet.social_standing().value(), 0);
    }

    #[test]
    fn scene_cues_above_the_usage_cap_are_rejected() {
        let session = session();
        session.create_character(ActorId(1), "Agatha").unwrap();

        let error = session
            .add_scene_cue(ActorId(1), SceneCue::new("Encore", 4).unwrap())
            .unwrap_err();
        assert!(matches!(
            error,
            RuntimeError::Config(ConfigError::InvalidConfiguration {
                field: "max_usage",
                value: 4,
                ..
            })
        ));
        assert!(session.character(ActorId(1)).unwrap().scene_cues.is_empty());
        assert!(session.add_scene_cue(ActorId(1), SceneCue::new("Encore", 3).unwrap()).is_ok());
    }

    #[test]
    fn upgrades_above_the_usage_cap_are_rejected() {
        let mut session = session();
        session.create_club(ActorId(9), "The Aero Club", 5, 10).unwrap();
        let upgrade = ClubUpgrade::new("Hangar", 1, 2)
            .unwrap()
            .with_usage(4)
            .unwrap();

        let error = session.acquire_upgrade(ActorId(9), upgrade).unwrap_err();
        assert!(matches!(error, RuntimeError::Config(_)));
        let club = session.club(ActorId(9)).unwrap();
        assert_eq!(club.funds, 10);
        assert!(club.upgrades.is_empty());
    }

    #[test]
    fn loaded_records_follow_the_session_ranges() {
        let config = RulesConfig {
            social_standing: ledger_core::CounterBounds::new(-3, 3).unwrap(),
            renown: ledger_core::CounterBounds::new(0, 6).unwrap(),
            ..RulesConfig::default()
        };
        let mut session = Session::builder().config(config).build().unwrap();

        let mut character = CharacterRecord::new(ActorId(1), "Agatha", CharacterSheet::default());
        character.sheet.adjust_standing(8);
        session.repository().save_character(&character).unwrap();
        let club = ClubRecord::new(ActorId(9), "The Aero Club", RenownTrack::new(12), 0);
        session.repository().save_club(&club).unwrap();

        assert_eq!(session.character(ActorId(1)).unwrap().sheet.social_standing().value(), 3);
        assert_eq!(session.adjust_standing(ActorId(1), 4).unwrap().value, 3);
        assert_eq!(session.club(ActorId(9)).unwrap().renown.value(), 6);
        assert_eq!(session.adjust_renown(ActorId(9), 1).unwrap(), 6);
        assert_eq!(session.standing_pips(ActorId(1)).unwrap().len(), 7);
        assert_eq!(session.renown_pips(ActorId(9)).unwrap().len(), 6);
    }

    #[test]
    fn unknown_character_is_reported() {
        let mut session = session();
        let error = session
            .fire_scene_cue(ActorId(1), ItemId(1), UsageEvent::Consume)
            .unwrap_err();
        assert!(matches!(error, RuntimeError::CharacterNotFound(ActorId(1))));
    }

    #[test]
    fn items_of_other_characters_are_rejected() {
        let mut session = session();
        session.create_character(ActorId(1), "Agatha").unwrap();
        session.create_character(ActorId(2), "Basil").unwrap();
        let item = session
            .add_scene_cue(ActorId(2), SceneCue::new("Swoon", 1).unwrap())
            .unwrap();

        let error = session
            .fire_scene_cue(ActorId(1), item, UsageEvent::Grant)
            .unwrap_err();
        assert!(matches!(error, RuntimeError::NotOwned { .. }));
    }

    #[test]
    fn noop_consume_leaves_standing_alone() {
        let mut session = session();
        session.create_character(ActorId(1), "Agatha").unwrap();
        let cue = SceneCue::new("Swoon", 1)
            .unwrap()
            .with_standing_delta(StandingDelta::Scandal)
            .with_influence(TableRef::parse("gossip").unwrap());
        let item = session.add_scene_cue(ActorId(1), cue).unwrap();

        let report = session
            .fire_scene_cue(ActorId(1), item, UsageEvent::Consume)
            .unwrap();
        assert!(report.outcome.is_noop());
        assert_eq!(report.standing, None);
        let character = session.character(ActorId(1)).unwrap();
        assert_eq!(character.sheet.social_standing().value(), 0);
    }

    #[test]
    fn consume_moves_standing_of_owner() {
        let mut session = session();
        session.create_character(ActorId(1), "Agatha").unwrap();
        let cue = SceneCue::new("Swoon", 2)
            .unwrap()
            .with_standing_delta(StandingDelta::Dignity);
        let item = session.add_scene_cue(ActorId(1), cue).unwrap();

        session
            .fire_scene_cue(ActorId(1), item, UsageEvent::Grant)
            .unwrap();
        let report = session
            .fire_scene_cue(ActorId(1), item, UsageEvent::Consume)
            .unwrap();

        assert!(report.outcome.is_fired());
        assert_eq!(report.standing, Some(StandingReading::of(-1)));
        let character = session.character(ActorId(1)).unwrap();
        assert_eq!(character.sheet.social_standing().value(), -1);
    }

    #[test]
    fn firing_an_upgrade_as_a_scene_cue_is_a_kind_mismatch() {
        let mut session = session();
        session.create_club(ActorId(9), "The Aero Club", 3, 10).unwrap();
        let Acquisition::Acquired { item, .. } = session
            .acquire_upgrade(ActorId(9), ClubUpgrade::new("Hangar", 1, 2).unwrap())
            .unwrap()
        else {
            panic!("expected the upgrade to be acquired");
        };

        session.create_character(ActorId(1), "Agatha").unwrap();
        let mut character = session.character(ActorId(1)).unwrap();
        character.scene_cues.push(item);
        session.repository().save_character(&character).unwrap();

        let error = session
            .fire_scene_cue(ActorId(1), item, UsageEvent::Consume)
            .unwrap_err();
        assert!(matches!(
            error,
            RuntimeError::ItemKindMismatch {
                expected: "scene_cue",
                found: "club_upgrade",
                ..
            }
        ));
    }

    #[test]
    fn default_confirmer_declines_extra_requirements() {
        let mut session = session();
        session.create_club(ActorId(9), "The Aero Club", 5, 10).unwrap();
        let upgrade = ClubUpgrade::new("Airship", 2, 4)
            .unwrap()
            .with_extra_requirement("Cross the Channel");

        let acquisition = session.acquire_upgrade(ActorId(9), upgrade).unwrap();
        assert_eq!(acquisition, Acquisition::RequirementDeclined);
        assert_eq!(session.club(ActorId(9)).unwrap().funds, 10);
    }

    #[test]
    fn invalid_config_fails_the_build() {
        let mut config = RulesConfig::default();
        config.max_usage_cap = -1;
        assert!(Session::builder().config(config).build().is_err());
    }

    #[test]
    fn unknown_catalog_entry_is_reported() {
        let mut session = session();
        session.create_club(ActorId(9), "The Aero Club", 5, 10).unwrap();
        let error = session
            .acquire_catalog_upgrade(ActorId(9), "Zeppelin")
            .unwrap_err();
        assert!(matches!(error, RuntimeError::UnknownCatalogEntry(_)));
    }
}
