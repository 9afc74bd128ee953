//! Permission resolution
//!
//! Pure reads over a borrowed snapshot. Nothing here errors: missing
//! snapshots, unknown organizations or teams and empty queries all come
//! back as "not authorized".
//!
//! Two decision paths coexist and are deliberately kept apart:
//! - [`PermissionResolver::has_capability`] works on identities, folds in
//!   global capabilities and never lets a private team inherit.
//! - [`PermissionResolver::check_permission`] works on names and keeps the
//!   older precedence rule: no global folding, no private-team override.

use crate::caps::Capability;
use crate::set::CapabilitySet;
use crate::snapshot::PrincipalPermissionSnapshot;

/// Treat empty identities and names as not supplied
#[inline]
fn supplied(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Read-only view answering authorization questions for one principal
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionResolver<'a> {
    snapshot: Option<&'a PrincipalPermissionSnapshot>,
}

impl<'a> From<Option<&'a PrincipalPermissionSnapshot>> for PermissionResolver<'a> {
    fn from(snapshot: Option<&'a PrincipalPermissionSnapshot>) -> Self {
        PermissionResolver { snapshot }
    }
}

impl<'a> From<&'a PrincipalPermissionSnapshot> for PermissionResolver<'a> {
    fn from(snapshot: &'a PrincipalPermissionSnapshot) -> Self {
        PermissionResolver::new(snapshot)
    }
}

impl<'a> PermissionResolver<'a> {
    pub fn new(snapshot: &'a PrincipalPermissionSnapshot) -> Self {
        PermissionResolver { snapshot: Some(snapshot) }
    }

    /// Resolver for a principal with no snapshot at all
    pub fn absent() -> Self {
        PermissionResolver { snapshot: None }
    }

    pub fn snapshot(&self) -> Option<&'a PrincipalPermissionSnapshot> {
        self.snapshot
    }

    /// True iff the global set holds `GLOBAL_ADMIN`
    #[inline]
    pub fn is_global_admin(&self) -> bool {
        self.snapshot
            .map_or(false, |s| s.global().contains(Capability::GLOBAL_ADMIN))
    }

    /// Capabilities in force for an organization/team context.
    ///
    /// Global capabilities always count. With no team entry the
    /// organization's capabilities apply directly. With a team entry its own
    /// capabilities apply, plus the organization's when the team inherits,
    /// is not private, and actually belongs to that organization.
    pub fn effective_capabilities(
        &self,
        organization_id: Option<&str>,
        team_id: Option<&str>,
    ) -> CapabilitySet {
        let Some(s) = self.snapshot else {
            return CapabilitySet::new();
        };

        let team = supplied(team_id).and_then(|id| s.team(id));
        // A private team is judged on its own entry only
        let org = match team {
            Some(t) if t.is_private() => None,
            _ => supplied(organization_id).and_then(|id| s.organization(id)),
        };

        let mut effective = s.global();
        match team {
            Some(t) => {
                effective = effective.union(t.capabilities);
                if t.organization_inherited {
                    // Only the team's own organization is inherited from,
                    // never whichever one the caller happened to query.
                    if let Some(o) = org.filter(|o| t.belongs_to(&o.resource_id)) {
                        effective = effective.union(o.capabilities);
                    }
                }
            }
            None => {
                if let Some(o) = org {
                    effective = effective.union(o.capabilities);
                }
            }
        }
        effective
    }

    /// Identity-based check: does the principal hold any of `required`
    /// in this organization/team?
    pub fn has_capability(
        &self,
        required: &[Capability],
        organization_id: Option<&str>,
        team_id: Option<&str>,
    ) -> bool {
        let wanted: CapabilitySet = required.iter().collect();
        let allowed = if wanted.is_empty() {
            false
        } else if self.is_global_admin() {
            true
        } else {
            self.effective_capabilities(organization_id, team_id)
                .intersects(wanted)
        };
        tracing::trace!(
            organization_id = ?organization_id,
            team_id = ?team_id,
            required = ?wanted,
            allowed,
            "has_capability"
        );
        allowed
    }

    /// Name-based check kept for existing call sites.
    ///
    /// When no team entry matches, or the team inherits, the organization's
    /// own capabilities decide; otherwise the team's do. Global capabilities
    /// and team visibility are not consulted.
    pub fn check_permission(
        &self,
        organization_name: &str,
        team_name: Option<&str>,
        required: &[Capability],
    ) -> bool {
        let wanted: CapabilitySet = required.iter().collect();
        let allowed = self.check_permission_inner(organization_name, team_name, wanted);
        tracing::trace!(
            organization = organization_name,
            team = ?team_name,
            required = ?wanted,
            allowed,
            "check_permission"
        );
        allowed
    }

    fn check_permission_inner(
        &self,
        organization_name: &str,
        team_name: Option<&str>,
        wanted: CapabilitySet,
    ) -> bool {
        if wanted.is_empty() {
            return false;
        }
        let Some(s) = self.snapshot.filter(|s| s.has_capability_data()) else {
            return false;
        };
        let Some(org) = supplied(Some(organization_name)).and_then(|n| s.organization_named(n)) else {
            return false;
        };
        let team = supplied(team_name).and_then(|n| s.team_named(n));

        let in_organization = org.capabilities.intersects(wanted);
        match team {
            None => in_organization,
            Some(t) if t.organization_inherited => in_organization,
            Some(t) => t.capabilities.intersects(wanted),
        }
    }

    /// Membership gate, independent of which capabilities are held
    pub fn belongs_to_organization(&self, organization_name: &str) -> bool {
        self.snapshot
            .zip(supplied(Some(organization_name)))
            .map_or(false, |(s, n)| s.organization_named(n).is_some())
    }

    /// The team must be found under the named organization, not merely
    /// somewhere in the snapshot.
    pub fn belongs_to_team(&self, organization_name: &str, team_name: &str) -> bool {
        let Some(s) = self.snapshot else {
            return false;
        };
        let (Some(org_name), Some(team_name)) = (supplied(Some(organization_name)), supplied(Some(team_name))) else {
            return false;
        };
        s.organization_named(org_name)
            .and_then(|org| s.team_named_in(&org.resource_id, team_name))
            .is_some()
    }
}
