//! Pure role reconciliation.

use std::collections::BTreeSet;

use crate::model::{
    affiliation::Affiliation, mapping::RoleMappings, member::Member, role_diff::RoleDiff,
};

/// Roles an affiliation entitles a member to.
///
/// Nation and town resolve independently and combine as a union. Allied roles come from
/// the nations the member's nation lists as allies, never the reverse.
pub fn resolved_roles(affiliation: &Affiliation, mappings: &RoleMappings) -> BTreeSet<u64> {
    let mut roles = BTreeSet::new();
    let nation = affiliation.nation.as_deref();

    if let Some(nation) = nation {
        roles.extend(mappings.nation_role(nation));
        roles.extend(
            mappings
                .allies(nation)
                .filter_map(|ally| mappings.allied_role(ally)),
        );
    }

    if let Some(town_id) = affiliation.town_id.as_deref() {
        roles.extend(mappings.town_role(town_id));
    }

    roles.extend(mappings.status_role(nation));

    roles
}

/// Computes the minimal role change for a member.
///
/// `affiliation` is `None` when the lookup failed definitively (unlinked or not found);
/// every managed role the member holds is then removed. Members on the exception list
/// always get an empty diff.
///
/// # Arguments
/// - `member` - Member with their current roles
/// - `affiliation` - Current affiliation, or `None` for a failed lookup
/// - `mappings` - Mapping snapshot of the run
///
/// # Returns
/// - `RoleDiff` - Disjoint sets of roles to add and remove
pub fn reconcile(
    member: &Member,
    affiliation: Option<&Affiliation>,
    mappings: &RoleMappings,
) -> RoleDiff {
    if mappings.is_exception(member.id) {
        return RoleDiff::empty(member.id);
    }

    let resolved = affiliation
        .map(|a| resolved_roles(a, mappings))
        .unwrap_or_default();

    let to_add = resolved
        .difference(&member.current_roles)
        .copied()
        .collect();
    let to_remove = member
        .current_roles
        .iter()
        .filter(|role| mappings.is_managed(**role) && !resolved.contains(role))
        .copied()
        .collect();

    RoleDiff {
        member_id: member.id,
        to_add,
        to_remove,
    }
}
