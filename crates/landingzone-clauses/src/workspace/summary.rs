use crate::clause::{Clause, Term};

use super::{TierBucket, Workspace};

/// Summary returned when no tier holds any chip.
pub const EMPTY_LOGIC_SUMMARY: &str = "(no criteria)";

impl Workspace {
    /// Renders the workspace as a boolean expression, one line per tier.
    ///
    /// Clauses of a tier are joined with `OR`, terms of a clause with `AND`,
    /// and OR-groups appear parenthesised. Tiers without chips are omitted.
    ///
    /// # Example
    ///
    /// ```
    /// use landingzone_clauses::{Workspace, EMPTY_LOGIC_SUMMARY};
    /// use landingzone_core::{Attribute, CriterionId, Tier};
    ///
    /// let mut ws = Workspace::new();
    /// assert_eq!(ws.logic_summary(), EMPTY_LOGIC_SUMMARY);
    ///
    /// ws.add_criterion(CriterionId::Flag(Attribute::Coastal), Tier::MustHave, "");
    /// let second = ws.add_clause(Tier::MustHave);
    /// let chip = ws.new_chip(CriterionId::Flag(Attribute::LakeCoastal), "");
    /// ws.add_chip_to_clause(chip, second);
    /// assert_eq!(ws.logic_summary(), "Must Have: Coastal OR Lake Coastal");
    /// ```
    pub fn logic_summary(&self) -> String {
        let lines: Vec<String> = self
            .buckets
            .iter()
            .filter(|b| b.has_chips())
            .map(bucket_summary)
            .collect();
        if lines.is_empty() {
            EMPTY_LOGIC_SUMMARY.to_string()
        } else {
            lines.join("\n")
        }
    }
}

fn bucket_summary(bucket: &TierBucket) -> String {
    let clauses: Vec<&Clause> = bucket.clauses.iter().filter(|c| !c.is_empty()).collect();
    let wrap = clauses.len() > 1;
    let body = clauses
        .iter()
        .map(|clause| clause_summary(clause, wrap))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("{}: {}", bucket.tier, body)
}

fn clause_summary(clause: &Clause, wrap: bool) -> String {
    let terms = clause.terms();
    let multiple = terms.len() > 1;
    let text = terms.iter().map(term_summary).collect::<Vec<_>>().join(" AND ");
    if wrap && multiple {
        format!("({text})")
    } else {
        text
    }
}

fn term_summary(term: &Term<'_>) -> String {
    match term {
        Term::Single(chip) => chip.display(),
        Term::AnyOf(chips) => {
            let inner = chips
                .iter()
                .map(|c| c.display())
                .collect::<Vec<_>>()
                .join(" OR ");
            format!("({inner})")
        }
    }
}
