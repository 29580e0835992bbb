use std::collections::BTreeSet;

/// Minimal role change for one member.
///
/// `to_add` and `to_remove` are always disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleDiff {
    pub member_id: u64,
    pub to_add: BTreeSet<u64>,
    pub to_remove: BTreeSet<u64>,
}

impl RoleDiff {
    pub fn empty(member_id: u64) -> Self {
        Self {
            member_id,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Roles the member holds once the diff is applied to `current`.
    pub fn apply_to(&self, current: &BTreeSet<u64>) -> BTreeSet<u64> {
        current
            .iter()
            .filter(|role| !self.to_remove.contains(role))
            .chain(self.to_add.iter())
            .copied()
            .collect()
    }
}
