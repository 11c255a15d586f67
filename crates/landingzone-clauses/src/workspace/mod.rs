//! The editable clause/tier view of a profile.
//!
//! Every mutator is a silent no-op on unknown ids: the workspace is edited
//! interactively and a stale id (a double click racing a removal) must never
//! take the session down. Mutators report through their return value whether
//! anything changed.

mod summary;
mod sync;


use landingzone_core::{CriterionId, Importance, Tier};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::chip::Chip;
use crate::clause::{Clause, OrGroup, RenderItem, RenderableItems};
use crate::ids::{ChipId, ClauseId, OrGroupId};

pub use summary::EMPTY_LOGIC_SUMMARY;

/// One tier's ordered clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct TierBucket {
    tier: Tier,
    clauses: Vec<Clause>,
}

impl TierBucket {
    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Chips of every clause, in clause order.
    pub fn chips(&self) -> impl Iterator<Item = &Chip> + '_ {
        self.clauses.iter().flat_map(|c| c.chips.iter())
    }

    pub fn has_chips(&self) -> bool {
        self.clauses.iter().any(|c| !c.is_empty())
    }
}

/// Tiered clause workspace for one editing session.
///
/// Owns every chip, clause and OR-group. Each bucket always holds at least
/// one clause. Structural edits set a dirty flag which the owner clears with
/// [`Workspace::clear_dirty`] once it has synced the profile.
#[derive(Debug, Clone)]
pub struct Workspace {
    buckets: Vec<TierBucket>,
    next_chip: u32,
    next_clause: u32,
    next_group: u32,
    dirty: bool,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Creates a workspace with one empty clause per tier.
    pub fn new() -> Self {
        let mut ws = Self {
            buckets: Tier::ALL
                .iter()
                .map(|&tier| TierBucket {
                    tier,
                    clauses: Vec::new(),
                })
                .collect(),
            next_chip: 1,
            next_clause: 1,
            next_group: 1,
            dirty: false,
        };
        for tier in Tier::ALL {
            let id = ws.fresh_clause_id();
            ws.buckets[tier.index()].clauses.push(Clause::new(id, tier));
        }
        ws
    }

    fn fresh_clause_id(&mut self) -> ClauseId {
        let id = ClauseId::new(self.next_clause);
        self.next_clause += 1;
        id
    }

    fn fresh_chip_id(&mut self) -> ChipId {
        let id = ChipId::new(self.next_chip);
        self.next_chip += 1;
        id
    }

    fn fresh_group_id(&mut self) -> OrGroupId {
        let id = OrGroupId::new(self.next_group);
        self.next_group += 1;
        id
    }

    // ------------------------------------------------------------------
    // Dirty tracking
    // ------------------------------------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    // ------------------------------------------------------------------
    // Clause edits
    // ------------------------------------------------------------------

    /// Appends an empty clause to a tier's bucket.
    pub fn add_clause(&mut self, tier: Tier) -> ClauseId {
        let id = self.fresh_clause_id();
        self.buckets[tier.index()].clauses.push(Clause::new(id, tier));
        self.dirty = true;
        debug!(event = "clause_added", clause = %id, tier = %tier);
        id
    }

    /// Detaches every chip of a clause and removes it.
    ///
    /// The last clause of a bucket is emptied instead of removed.
    pub fn remove_clause(&mut self, id: ClauseId) -> bool {
        let Some((b, c)) = self.locate_clause(id) else {
            trace!(event = "remove_clause_missing", clause = %id);
            return false;
        };
        let bucket = &mut self.buckets[b];
        let detached = bucket.clauses[c].drain();
        let removed = bucket.clauses.len() > 1;
        if removed {
            bucket.clauses.remove(c);
        }
        self.dirty = true;
        debug!(
            event = "clause_removed",
            clause = %id,
            chips = detached.len(),
            kept_empty = !removed,
        );
        true
    }

    // ------------------------------------------------------------------
    // Chip edits
    // ------------------------------------------------------------------

    /// Creates a detached chip with a fresh id.
    pub fn new_chip(&mut self, criterion: CriterionId, value: impl Into<String>) -> Chip {
        let id = self.fresh_chip_id();
        Chip::new(id, criterion, value)
    }

    /// Places a criterion in a tier, reusing its chip if one exists.
    ///
    /// A new chip goes to the end of the tier's first clause; an existing chip
    /// in another tier is moved there. The chip's value is updated either way.
    pub fn add_criterion(
        &mut self,
        criterion: CriterionId,
        tier: Tier,
        value: impl Into<String>,
    ) -> ChipId {
        let value = value.into();
        if let Some(id) = self.find_chip_by_criterion(&criterion).map(Chip::id) {
            self.move_chip(id, tier);
            if let Some((b, c, i)) = self.locate_chip(id) {
                self.buckets[b].clauses[c].chips[i].value = value;
            }
            return id;
        }
        let chip = self.new_chip(criterion, value);
        let id = chip.id;
        let target = self.buckets[tier.index()].clauses[0].id;
        self.add_chip_to_clause(chip, target);
        id
    }

    /// Moves `chip` into a clause, first removing it from wherever it lives.
    ///
    /// Any OR-group membership is dropped. Returns false, leaving the chip
    /// where it was, if the target clause does not exist.
    ///
    /// A criterion has at most one chip: if another chip already carries
    /// `chip`'s criterion, that chip moves to the clause and takes `chip`'s
    /// value instead, and `chip` is dropped.
    pub fn add_chip_to_clause(&mut self, mut chip: Chip, clause_id: ClauseId) -> bool {
        if self.locate_clause(clause_id).is_none() {
            trace!(event = "add_chip_missing_clause", clause = %clause_id);
            return false;
        }
        let existing = self
            .find_chip_by_criterion(&chip.criterion)
            .map(Chip::id)
            .filter(|id| *id != chip.id);
        if let Some(existing) = existing {
            debug!(event = "chip_merged", chip = %chip.id, into = %existing, clause = %clause_id);
            self.move_chip_to_clause(existing, clause_id);
            if let Some((b, c, i)) = self.locate_chip(existing) {
                self.buckets[b].clauses[c].chips[i].value = chip.value;
            }
            self.dirty = true;
            return true;
        }
        self.detach_chip(chip.id);
        chip.or_group = None;
        let Some((b, c)) = self.locate_clause(clause_id) else {
            return false;
        };
        debug!(event = "chip_added", chip = %chip.id, clause = %clause_id);
        self.buckets[b].clauses[c].chips.push(chip);
        self.dirty = true;
        true
    }

    /// Removes a chip from the workspace and returns it.
    pub fn remove_chip(&mut self, chip_id: ChipId) -> Option<Chip> {
        let chip = self.detach_chip(chip_id)?;
        debug!(event = "chip_removed", chip = %chip_id);
        Some(chip)
    }

    /// Moves a chip to the first clause of another tier.
    ///
    /// Moving to the tier the chip already lives in does nothing.
    pub fn move_chip(&mut self, chip_id: ChipId, tier: Tier) -> bool {
        match self.chip_tier(chip_id) {
            Some(current) if current != tier => {
                let target = self.buckets[tier.index()].clauses[0].id;
                self.move_chip_to_clause(chip_id, target)
            }
            _ => false,
        }
    }

    /// Moves a chip to a specific clause, dropping its OR-group membership.
    pub fn move_chip_to_clause(&mut self, chip_id: ChipId, clause_id: ClauseId) -> bool {
        match (self.chip_clause_id(chip_id), self.locate_clause(clause_id)) {
            (Some(current), Some(_)) if current != clause_id => {}
            _ => return false,
        }
        let Some(chip) = self.detach_chip(chip_id) else {
            return false;
        };
        self.add_chip_to_clause(chip, clause_id)
    }

    // ------------------------------------------------------------------
    // OR-groups
    // ------------------------------------------------------------------

    /// Groups chips of one clause with OR.
    ///
    /// The clause of the first chip found decides; chips living in any other
    /// clause are skipped. Chips already in a group leave it first. Returns
    /// `None` when fewer than two chips are accepted.
    pub fn create_or_group(&mut self, chip_ids: &[ChipId]) -> Option<OrGroupId> {
        let mut home: Option<(usize, usize)> = None;
        let mut accepted: SmallVec<[ChipId; 4]> = SmallVec::new();
        for &id in chip_ids {
            let Some((b, c, _)) = self.locate_chip(id) else {
                continue;
            };
            match home {
                None => home = Some((b, c)),
                Some(loc) if loc != (b, c) => {
                    trace!(event = "or_group_skip_foreign_chip", chip = %id);
                    continue;
                }
                Some(_) => {}
            }
            if !accepted.contains(&id) {
                accepted.push(id);
            }
        }
        if accepted.len() < 2 {
            return None;
        }
        let (b, c) = home?;

        let group_id = self.fresh_group_id();
        let clause = &mut self.buckets[b].clauses[c];
        for &id in &accepted {
            if let Some(old) = clause.chip(id).and_then(Chip::or_group) {
                clause.leave_group(old, id);
            }
        }
        let mut members: SmallVec<[ChipId; 4]> = SmallVec::new();
        for chip in clause.chips.iter_mut() {
            if accepted.contains(&chip.id) {
                chip.or_group = Some(group_id);
                members.push(chip.id);
            }
        }
        clause.groups.push(OrGroup {
            id: group_id,
            members,
        });
        self.dirty = true;
        debug!(event = "or_group_created", group = %group_id, members = accepted.len());
        Some(group_id)
    }

    /// Takes one chip out of its OR-group; a group left with at most one
    /// member is dissolved.
    pub fn remove_from_or_group(&mut self, chip_id: ChipId) -> bool {
        let Some((b, c, i)) = self.locate_chip(chip_id) else {
            return false;
        };
        let clause = &mut self.buckets[b].clauses[c];
        let Some(group) = clause.chips[i].or_group else {
            return false;
        };
        clause.leave_group(group, chip_id);
        self.dirty = true;
        true
    }

    /// Ungroups every member of an OR-group.
    pub fn dissolve_or_group(&mut self, group_id: OrGroupId) -> bool {
        for bucket in &mut self.buckets {
            for clause in &mut bucket.clauses {
                let Some(pos) = clause.groups.iter().position(|g| g.id == group_id) else {
                    continue;
                };
                clause.groups.remove(pos);
                for chip in clause.chips.iter_mut() {
                    if chip.or_group == Some(group_id) {
                        chip.or_group = None;
                    }
                }
                self.dirty = true;
                debug!(event = "or_group_dissolved", group = %group_id);
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn buckets(&self) -> &[TierBucket] {
        &self.buckets
    }

    pub fn bucket(&self, tier: Tier) -> &TierBucket {
        &self.buckets[tier.index()]
    }

    pub fn clauses_in_bucket(&self, tier: Tier) -> &[Clause] {
        &self.buckets[tier.index()].clauses
    }

    pub fn chips_in_bucket(&self, tier: Tier) -> Vec<&Chip> {
        self.bucket(tier).chips().collect()
    }

    /// Chips of a clause; empty for an unknown clause.
    pub fn chips_in_clause(&self, clause_id: ClauseId) -> &[Chip] {
        self.clause(clause_id).map(Clause::chips).unwrap_or(&[])
    }

    pub fn clause(&self, clause_id: ClauseId) -> Option<&Clause> {
        let (b, c) = self.locate_clause(clause_id)?;
        Some(&self.buckets[b].clauses[c])
    }

    /// Looks a chip up by id.
    ///
    /// Linear in the number of chips, which stays in the tens.
    pub fn find_chip(&self, chip_id: ChipId) -> Option<&Chip> {
        let (b, c, i) = self.locate_chip(chip_id)?;
        Some(&self.buckets[b].clauses[c].chips[i])
    }

    pub fn find_chip_by_criterion(&self, criterion: &CriterionId) -> Option<&Chip> {
        self.all_chips().find(|chip| &chip.criterion == criterion)
    }

    pub fn contains_chip(&self, chip_id: ChipId) -> bool {
        self.locate_chip(chip_id).is_some()
    }

    /// Importance implied by the chip's tier; `Ignored` for unknown chips.
    pub fn chip_importance(&self, chip_id: ChipId) -> Importance {
        self.chip_tier(chip_id)
            .map(Tier::importance)
            .unwrap_or_default()
    }

    pub fn chip_tier(&self, chip_id: ChipId) -> Option<Tier> {
        let (b, _, _) = self.locate_chip(chip_id)?;
        Some(self.buckets[b].tier)
    }

    pub fn chip_clause_id(&self, chip_id: ChipId) -> Option<ClauseId> {
        let (b, c, _) = self.locate_chip(chip_id)?;
        Some(self.buckets[b].clauses[c].id)
    }

    /// Every chip, tier by tier in strictness order.
    pub fn all_chips(&self) -> impl Iterator<Item = &Chip> + '_ {
        self.buckets.iter().flat_map(TierBucket::chips)
    }

    pub fn chip_count(&self) -> usize {
        self.all_chips().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| !b.has_chips())
    }

    /// Display items of one clause. Empty for an unknown clause.
    pub fn renderable_items_in_clause(&self, clause_id: ClauseId) -> RenderableItems<'_> {
        RenderableItems::new(self.clause(clause_id))
    }

    /// Display items of every clause in a tier, tagged with their clause.
    pub fn renderable_items(&self, tier: Tier) -> impl Iterator<Item = (ClauseId, RenderItem<'_>)> + '_ {
        self.clauses_in_bucket(tier).iter().flat_map(|clause| {
            RenderableItems::new(Some(clause)).map(move |item| (clause.id, item))
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn locate_clause(&self, clause_id: ClauseId) -> Option<(usize, usize)> {
        self.buckets.iter().enumerate().find_map(|(b, bucket)| {
            bucket
                .clauses
                .iter()
                .position(|c| c.id == clause_id)
                .map(|c| (b, c))
        })
    }

    fn locate_chip(&self, chip_id: ChipId) -> Option<(usize, usize, usize)> {
        for (b, bucket) in self.buckets.iter().enumerate() {
            for (c, clause) in bucket.clauses.iter().enumerate() {
                if let Some(i) = clause.chips.iter().position(|chip| chip.id == chip_id) {
                    return Some((b, c, i));
                }
            }
        }
        None
    }

    /// Removes a chip from its clause, cleaning up its OR-group.
    fn detach_chip(&mut self, chip_id: ChipId) -> Option<Chip> {
        let (b, c, i) = self.locate_chip(chip_id)?;
        let clause = &mut self.buckets[b].clauses[c];
        if let Some(group) = clause.chips[i].or_group {
            clause.leave_group(group, chip_id);
        }
        let mut chip = clause.chips.remove(i);
        chip.or_group = None;
        self.dirty = true;
        Some(chip)
    }

    /// Drops every chip and extra clause, keeping id counters.
    pub(crate) fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clauses.truncate(1);
            if let Some(first) = bucket.clauses.first_mut() {
                first.drain();
            }
        }
        self.dirty = true;
    }
}
