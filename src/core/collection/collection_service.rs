// Role collection progress - how many of the guild's managed roles a member holds.

use crate::core::managed::{managed_roles_by_hierarchy, GuildManaged, RoleSummary};
use std::collections::HashSet;

pub const BAR_LENGTH: usize = 20;
const FILLED_CELL: &str = "■";
const EMPTY_CELL: &str = "·";

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionProgress {
    /// Managed roles the member holds, highest first.
    pub held: Vec<u64>,
    /// Managed roles the member lacks, highest first.
    pub missing: Vec<u64>,
    /// Percentage rounded to two decimals.
    pub percent: f64,
}

impl CollectionProgress {
    pub fn percent_label(&self) -> String {
        format!("{:.2}", self.percent)
    }

    pub fn bar(&self) -> String {
        progress_bar(self.percent)
    }
}

/// Split the guild's managed roles into held and missing for one member.
///
/// A guild with no managed roles reports 0%.
pub fn compute_progress(
    roles: &[RoleSummary],
    member_roles: &HashSet<u64>,
    guild: &GuildManaged,
) -> CollectionProgress {
    let (held, missing): (Vec<u64>, Vec<u64>) = managed_roles_by_hierarchy(roles, guild)
        .into_iter()
        .map(|role| role.id)
        .partition(|id| member_roles.contains(id));

    let total = held.len() + missing.len();
    let percent = if total == 0 {
        0.0
    } else {
        round_to_hundredths(held.len() as f64 / total as f64 * 100.0)
    };

    CollectionProgress {
        held,
        missing,
        percent,
    }
}

/// `BAR_LENGTH` cells, `round(percent / 100 * BAR_LENGTH)` of them filled.
pub fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_LENGTH as f64).round();
    let filled = (filled.max(0.0) as usize).min(BAR_LENGTH);
    FILLED_CELL.repeat(filled) + &EMPTY_CELL.repeat(BAR_LENGTH - filled)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: u64, position: u16) -> RoleSummary {
        RoleSummary {
            id,
            position,
            managed: false,
        }
    }

    fn guild_managing(role_ids: &[u64]) -> GuildManaged {
        let mut guild = GuildManaged::default();
        for id in role_ids {
            guild.role_managers.insert(*id, vec![1]);
        }
        guild
    }

    #[test]
    fn test_one_of_three_roles() {
        let roles = vec![role(1, 3), role(2, 2), role(3, 1), role(4, 4)];
        let guild = guild_managing(&[1, 2, 3]);
        let member: HashSet<u64> = [2, 4].into_iter().collect();

        let progress = compute_progress(&roles, &member, &guild);
        assert_eq!(progress.held, vec![2]);
        assert_eq!(progress.missing, vec![1, 3]);
        assert_eq!(progress.percent_label(), "33.33");
        // 33.33% of 20 cells rounds to 7.
        assert_eq!(progress.bar().chars().filter(|c| *c == '■').count(), 7);
        assert_eq!(progress.bar().chars().count(), BAR_LENGTH);
    }

    #[test]
    fn test_no_managed_roles_is_zero() {
        let roles = vec![role(1, 1)];
        let progress = compute_progress(&roles, &HashSet::new(), &GuildManaged::default());
        assert_eq!(progress.percent_label(), "0.00");
        assert_eq!(progress.bar(), "·".repeat(BAR_LENGTH));
    }

    #[test]
    fn test_full_collection() {
        let roles = vec![role(1, 1), role(2, 2)];
        let guild = guild_managing(&[1, 2]);
        let member: HashSet<u64> = [1, 2].into_iter().collect();

        let progress = compute_progress(&roles, &member, &guild);
        assert_eq!(progress.percent_label(), "100.00");
        assert_eq!(progress.bar(), "■".repeat(BAR_LENGTH));
    }

    #[test]
    fn test_bar_rounding() {
        assert_eq!(progress_bar(5.0).chars().filter(|c| *c == '■').count(), 1);
        assert_eq!(progress_bar(2.0).chars().filter(|c| *c == '■').count(), 0);
        assert_eq!(progress_bar(66.67).chars().filter(|c| *c == '■').count(), 13);
    }
}
