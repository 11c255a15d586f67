//! Two-way mapping between a workspace and a criteria profile.
//!
//! The profile is flat: one importance per criterion plus a combinator per
//! multi-item attribute. The workspace adds clause structure on top. The
//! mapping below is the only place the two representations meet.

use std::collections::BTreeMap;

use landingzone_core::{
    Attribute, AttributeKind, CriteriaProfile, CriterionId, Importance, LogicMode, Tier,
};
use tracing::{debug, warn};

use crate::chip::Chip;
use crate::ids::{ChipId, ClauseId, OrGroupId};

use super::Workspace;

impl Workspace {
    /// Builds a workspace showing `profile`.
    ///
    /// Every active criterion becomes a chip in the first clause of its tier.
    /// `MustHave` items of an OR-combined attribute are placed in one
    /// OR-group. The result starts clean.
    pub fn load_from(profile: &CriteriaProfile) -> Self {
        let mut ws = Self::new();
        ws.reload(profile);
        ws
    }

    /// Replaces the workspace contents with `profile`. Ids keep counting up.
    pub fn reload(&mut self, profile: &CriteriaProfile) {
        self.clear();
        for (criterion, importance) in profile.active_criteria() {
            let Some(tier) = importance.tier() else {
                continue;
            };
            let value = chip_value(profile, &criterion);
            let chip = self.new_chip(criterion, value);
            let target = self.buckets[tier.index()].clauses[0].id;
            self.add_chip_to_clause(chip, target);
        }

        for attribute in Attribute::of_kind(AttributeKind::Set) {
            let Some(container) = profile.items(attribute) else {
                continue;
            };
            if container.mode() != LogicMode::Or {
                continue;
            }
            let ids: Vec<ChipId> = container
                .items_at(Importance::MustHave)
                .filter_map(|name| {
                    let id = CriterionId::Item(attribute, name.to_string());
                    self.find_chip_by_criterion(&id).map(Chip::id)
                })
                .collect();
            if ids.len() >= 2 {
                self.create_or_group(&ids);
            }
        }

        self.dirty = false;
        debug!(event = "workspace_loaded", chips = self.chip_count());
    }

    /// Writes the workspace's tiers back onto `profile`.
    ///
    /// Criteria with a chip take their chip's tier as importance; criteria
    /// without one become `Ignored`. A multi-item attribute with two or more
    /// `MustHave` chips is set to `Or` when every clause holding them holds
    /// them as a single term (one chip, or chips sharing one OR-group), since
    /// clauses are OR-ed; otherwise to `And`. With fewer than two such chips
    /// its combinator is left alone. Range bounds are not touched: chips
    /// carry only a display value.
    pub fn sync_to(&self, profile: &mut CriteriaProfile) {
        for (criterion, _) in profile.active_criteria() {
            if self.find_chip_by_criterion(&criterion).is_none() {
                apply(profile, &criterion, Importance::Ignored);
            }
        }

        for bucket in &self.buckets {
            for chip in bucket.chips() {
                apply(profile, &chip.criterion, bucket.tier.importance());
            }
        }

        // attribute -> clause -> OR-group of each MustHave item chip
        let mut placements: BTreeMap<Attribute, BTreeMap<ClauseId, Vec<Option<OrGroupId>>>> =
            BTreeMap::new();
        for clause in &self.bucket(Tier::MustHave).clauses {
            for chip in &clause.chips {
                if let CriterionId::Item(attribute, _) = &chip.criterion {
                    placements
                        .entry(*attribute)
                        .or_default()
                        .entry(clause.id)
                        .or_default()
                        .push(chip.or_group);
                }
            }
        }

        for (attribute, clauses) in placements {
            if clauses.values().map(Vec::len).sum::<usize>() < 2 {
                continue;
            }
            let mode = if clauses.values().all(|groups| is_single_term(groups)) {
                LogicMode::Or
            } else {
                LogicMode::And
            };
            if let Some(container) = profile.items_mut(attribute) {
                container.set_mode(mode);
            }
        }
        debug!(event = "workspace_synced", chips = self.chip_count());
    }
}

fn is_single_term(groups: &[Option<OrGroupId>]) -> bool {
    match groups {
        [_] => true,
        [first, rest @ ..] => first.is_some() && rest.iter().all(|g| g == first),
        [] => false,
    }
}

fn apply(profile: &mut CriteriaProfile, criterion: &CriterionId, importance: Importance) {
    if let Err(err) = profile.set_importance(criterion, importance) {
        warn!(event = "sync_skipped", criterion = %criterion, error = %err);
    }
}

fn chip_value(profile: &CriteriaProfile, criterion: &CriterionId) -> String {
    match criterion {
        CriterionId::Range(attribute) => profile
            .range(*attribute)
            .map(|r| r.range.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}
