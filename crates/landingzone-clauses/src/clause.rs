//! Clauses, OR-groups and clause iteration.

use landingzone_core::Tier;
use smallvec::SmallVec;

use crate::chip::Chip;
use crate::ids::{ChipId, ClauseId, OrGroupId};

/// A same-clause set of chips combined with OR.
#[derive(Debug, Clone, PartialEq)]
pub struct OrGroup {
    pub(crate) id: OrGroupId,
    pub(crate) members: SmallVec<[ChipId; 4]>,
}

impl OrGroup {
    pub fn id(&self) -> OrGroupId {
        self.id
    }

    pub fn members(&self) -> &[ChipId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// AND-combined chips living in one tier bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub(crate) id: ClauseId,
    pub(crate) tier: Tier,
    pub(crate) chips: Vec<Chip>,
    pub(crate) groups: Vec<OrGroup>,
}

impl Clause {
    pub(crate) fn new(id: ClauseId, tier: Tier) -> Self {
        Self {
            id,
            tier,
            chips: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn id(&self) -> ClauseId {
        self.id
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    pub fn or_groups(&self) -> &[OrGroup] {
        &self.groups
    }

    pub fn or_group(&self, id: OrGroupId) -> Option<&OrGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn chip(&self, id: ChipId) -> Option<&Chip> {
        self.chips.iter().find(|c| c.id == id)
    }

    /// The AND-ed terms of this clause, in chip order.
    ///
    /// Ungrouped chips are single terms; each OR-group is one term placed at
    /// its first member's position.
    pub fn terms(&self) -> Vec<Term<'_>> {
        RenderableItems::new(Some(self))
            .map(|item| match item {
                RenderItem::Chip(chip) => Term::Single(chip),
                RenderItem::OrGroup { chips, .. } => Term::AnyOf(chips),
            })
            .collect()
    }

    /// Removes every chip and group, returning the chips.
    pub(crate) fn drain(&mut self) -> Vec<Chip> {
        self.groups.clear();
        let mut chips = std::mem::take(&mut self.chips);
        for chip in &mut chips {
            chip.or_group = None;
        }
        chips
    }

    /// Drops `chip_id` from the group `group_id`, dissolving the group when at
    /// most one member remains.
    pub(crate) fn leave_group(&mut self, group_id: OrGroupId, chip_id: ChipId) {
        let Some(pos) = self.groups.iter().position(|g| g.id == group_id) else {
            return;
        };
        self.groups[pos].members.retain(|m| *m != chip_id);
        if let Some(chip) = self.chips.iter_mut().find(|c| c.id == chip_id) {
            chip.or_group = None;
        }
        if self.groups[pos].members.len() <= 1 {
            let group = self.groups.remove(pos);
            for member in group.members {
                if let Some(chip) = self.chips.iter_mut().find(|c| c.id == member) {
                    chip.or_group = None;
                }
            }
        }
    }
}

/// One AND-ed term of a clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Term<'a> {
    Single(&'a Chip),
    AnyOf(Vec<&'a Chip>),
}

impl<'a> Term<'a> {
    /// The chips making up this term.
    pub fn chips(&self) -> Vec<&'a Chip> {
        match self {
            Term::Single(chip) => vec![*chip],
            Term::AnyOf(chips) => chips.clone(),
        }
    }
}

/// A display item: a standalone chip or a whole OR-group.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderItem<'a> {
    Chip(&'a Chip),
    OrGroup {
        group: &'a OrGroup,
        chips: Vec<&'a Chip>,
    },
}

/// Lazy iterator over the display items of one clause.
///
/// Each OR-group is yielded once, where its first member sits in the clause.
#[derive(Debug, Clone)]
pub struct RenderableItems<'a> {
    clause: Option<&'a Clause>,
    pos: usize,
    emitted: SmallVec<[OrGroupId; 4]>,
}

impl<'a> RenderableItems<'a> {
    pub(crate) fn new(clause: Option<&'a Clause>) -> Self {
        Self {
            clause,
            pos: 0,
            emitted: SmallVec::new(),
        }
    }
}

impl<'a> Iterator for RenderableItems<'a> {
    type Item = RenderItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let clause = self.clause?;
        while let Some(chip) = clause.chips.get(self.pos) {
            self.pos += 1;
            let Some(group_id) = chip.or_group else {
                return Some(RenderItem::Chip(chip));
            };
            if self.emitted.contains(&group_id) {
                continue;
            }
            let Some(group) = clause.or_group(group_id) else {
                // Stale reference; show the chip on its own.
                return Some(RenderItem::Chip(chip));
            };
            self.emitted.push(group_id);
            let chips = clause
                .chips
                .iter()
                .filter(|c| c.or_group == Some(group_id))
                .collect();
            return Some(RenderItem::OrGroup { group, chips });
        }
        None
    }
}
