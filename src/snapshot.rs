//! Principal permission snapshots
//!
//! A snapshot is the point-in-time view of one principal's capabilities,
//! produced by an external fetch and never mutated afterwards. Each of its
//! three parts may be absent (an anonymous visitor has none of them);
//! absence and emptiness resolve the same way.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::caps::Capability;
use crate::error::{Error, Result};
use crate::set::CapabilitySet;

/// Whether organization capabilities may ever flow into a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamVisibility {
    Public,
    Private,
}

/// Capabilities held within one organization or team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedPermissionEntry {
    pub resource_id: String,
    /// Empty when the producer omits it; an empty name matches no lookup
    #[serde(default)]
    pub resource_name: String,
    #[serde(default)]
    pub capabilities: CapabilitySet,
    /// Owning organization (teams only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Teams only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_visibility: Option<TeamVisibility>,
    /// Teams only: merge the owning organization's capabilities, unless private
    #[serde(default)]
    pub organization_inherited: bool,
}

impl ScopedPermissionEntry {
    pub fn organization<I>(id: impl Into<String>, name: impl Into<String>, caps: I) -> Self
    where
        I: IntoIterator<Item = Capability>,
    {
        ScopedPermissionEntry {
            resource_id: id.into(),
            resource_name: name.into(),
            capabilities: caps.into_iter().collect(),
            organization_id: None,
            team_visibility: None,
            organization_inherited: false,
        }
    }

    pub fn team<I>(
        id: impl Into<String>,
        name: impl Into<String>,
        organization_id: impl Into<String>,
        caps: I,
    ) -> Self
    where
        I: IntoIterator<Item = Capability>,
    {
        ScopedPermissionEntry {
            resource_id: id.into(),
            resource_name: name.into(),
            capabilities: caps.into_iter().collect(),
            organization_id: Some(organization_id.into()),
            team_visibility: Some(TeamVisibility::Public),
            organization_inherited: false,
        }
    }

    pub fn with_visibility(mut self, visibility: TeamVisibility) -> Self {
        self.team_visibility = Some(visibility);
        self
    }

    pub fn with_organization_inherited(mut self, inherited: bool) -> Self {
        self.organization_inherited = inherited;
        self
    }

    /// Only an explicit `PRIVATE` counts; a missing visibility does not.
    #[inline]
    pub fn is_private(&self) -> bool {
        self.team_visibility == Some(TeamVisibility::Private)
    }

    #[inline]
    pub fn belongs_to(&self, organization_id: &str) -> bool {
        self.organization_id.as_deref() == Some(organization_id)
    }
}

/// Immutable view of one principal's global, organization and team capabilities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct PrincipalPermissionSnapshot {
    global: Option<CapabilitySet>,
    organizations: Option<Vec<ScopedPermissionEntry>>,
    teams: Option<Vec<ScopedPermissionEntry>>,
}

/// Wire shape before the uniqueness check
#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    global: Option<CapabilitySet>,
    #[serde(default)]
    organizations: Option<Vec<ScopedPermissionEntry>>,
    #[serde(default)]
    teams: Option<Vec<ScopedPermissionEntry>>,
}

impl TryFrom<RawSnapshot> for PrincipalPermissionSnapshot {
    type Error = Error;

    fn try_from(raw: RawSnapshot) -> Result<Self> {
        if let Some(orgs) = &raw.organizations {
            ensure_unique("organization", orgs)?;
        }
        if let Some(teams) = &raw.teams {
            ensure_unique("team", teams)?;
        }
        Ok(PrincipalPermissionSnapshot {
            global: raw.global,
            organizations: raw.organizations,
            teams: raw.teams,
        })
    }
}

fn ensure_unique(scope: &'static str, entries: &[ScopedPermissionEntry]) -> Result<()> {
    let mut seen = HashSet::with_capacity(entries.len());
    for e in entries {
        if !seen.insert(e.resource_id.as_str()) {
            return Err(Error::DuplicateResource { scope, id: e.resource_id.clone() });
        }
    }
    Ok(())
}

impl PrincipalPermissionSnapshot {
    /// Snapshot of an unauthenticated principal: no data at all
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    /// Parse the producer's JSON payload
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str::<RawSnapshot>(json)?.try_into()
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice::<RawSnapshot>(bytes)?.try_into()
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value::<RawSnapshot>(value)?.try_into()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Global capabilities, empty when absent
    #[inline]
    pub fn global(&self) -> CapabilitySet {
        self.global.unwrap_or_default()
    }

    #[inline]
    pub fn organizations(&self) -> &[ScopedPermissionEntry] {
        self.organizations.as_deref().unwrap_or(&[])
    }

    #[inline]
    pub fn teams(&self) -> &[ScopedPermissionEntry] {
        self.teams.as_deref().unwrap_or(&[])
    }

    /// False for a snapshot where every part is absent
    pub fn has_capability_data(&self) -> bool {
        self.global.is_some() || self.organizations.is_some() || self.teams.is_some()
    }

    pub fn organization(&self, id: &str) -> Option<&ScopedPermissionEntry> {
        self.organizations().iter().find(|e| e.resource_id == id)
    }

    pub fn organization_named(&self, name: &str) -> Option<&ScopedPermissionEntry> {
        self.organizations().iter().find(|e| e.resource_name == name)
    }

    pub fn team(&self, id: &str) -> Option<&ScopedPermissionEntry> {
        self.teams().iter().find(|e| e.resource_id == id)
    }

    /// First team with this name in any organization
    pub fn team_named(&self, name: &str) -> Option<&ScopedPermissionEntry> {
        self.teams().iter().find(|e| e.resource_name == name)
    }

    /// Team names are only unique within their organization
    pub fn team_named_in(&self, organization_id: &str, name: &str) -> Option<&ScopedPermissionEntry> {
        self.teams()
            .iter()
            .find(|e| e.resource_name == name && e.belongs_to(organization_id))
    }
}

/// Incremental construction with the uniqueness check at the end
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    global: Option<CapabilitySet>,
    organizations: Option<Vec<ScopedPermissionEntry>>,
    teams: Option<Vec<ScopedPermissionEntry>>,
}

impl SnapshotBuilder {
    pub fn global<I: IntoIterator<Item = Capability>>(mut self, caps: I) -> Self {
        self.global.get_or_insert_with(CapabilitySet::new).extend(caps);
        self
    }

    pub fn organization(mut self, entry: ScopedPermissionEntry) -> Self {
        self.organizations.get_or_insert_with(Vec::new).push(entry);
        self
    }

    pub fn team(mut self, entry: ScopedPermissionEntry) -> Self {
        self.teams.get_or_insert_with(Vec::new).push(entry);
        self
    }

    /// Mark all three parts present even if nothing was added to them
    pub fn present(mut self) -> Self {
        self.global.get_or_insert_with(CapabilitySet::new);
        self.organizations.get_or_insert_with(Vec::new);
        self.teams.get_or_insert_with(Vec::new);
        self
    }

    pub fn build(self) -> Result<PrincipalPermissionSnapshot> {
        RawSnapshot {
            global: self.global,
            organizations: self.organizations,
            teams: self.teams,
        }
        .try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::{Report, Team};

    #[test]
    fn anonymous_has_no_data() {
        let s = PrincipalPermissionSnapshot::anonymous();
        assert!(!s.has_capability_data());
        assert!(s.global().is_empty());
        assert!(s.organizations().is_empty());
        assert!(s.teams().is_empty());
    }

    #[test]
    fn builder_rejects_duplicate_ids() {
        let r = PrincipalPermissionSnapshot::builder()
            .organization(ScopedPermissionEntry::organization("o1", "acme", []))
            .organization(ScopedPermissionEntry::organization("o1", "acme-2", []))
            .build();
        assert!(matches!(r, Err(Error::DuplicateResource { scope: "organization", .. })));

        let r = PrincipalPermissionSnapshot::builder()
            .team(ScopedPermissionEntry::team("t1", "ops", "o1", []))
            .team(ScopedPermissionEntry::team("t1", "ops", "o2", []))
            .build();
        assert!(matches!(r, Err(Error::DuplicateResource { scope: "team", .. })));
    }

    #[test]
    fn same_id_across_scopes_is_fine() {
        let s = PrincipalPermissionSnapshot::builder()
            .organization(ScopedPermissionEntry::organization("x", "acme", []))
            .team(ScopedPermissionEntry::team("x", "ops", "x", []))
            .build()
            .unwrap();
        assert!(s.organization("x").is_some());
        assert!(s.team("x").is_some());
    }

    #[test]
    fn parses_producer_json() {
        let s = PrincipalPermissionSnapshot::from_json(
            r#"{
                "global": ["GLOBAL_READ_ALL"],
                "organizations": [
                    {"resource_id": "o1", "resource_name": "acme", "capabilities": ["REPORT_EDIT", "LEGACY_THING"]}
                ],
                "teams": [
                    {"resource_id": "t1", "resource_name": "ops", "organization_id": "o1",
                     "team_visibility": "PRIVATE", "organization_inherited": true, "capabilities": []}
                ]
            }"#,
        )
        .unwrap();
        assert!(s.has_capability_data());
        assert_eq!(s.organization("o1").unwrap().capabilities.names(), vec!["REPORT_EDIT"]);
        let t = s.team_named("ops").unwrap();
        assert!(t.is_private());
        assert!(t.organization_inherited);
        assert!(t.belongs_to("o1"));
    }

    #[test]
    fn json_duplicate_is_typed_error() {
        let r = PrincipalPermissionSnapshot::from_json(
            r#"{"teams": [
                {"resource_id": "t1", "resource_name": "a"},
                {"resource_id": "t1", "resource_name": "b"}
            ]}"#,
        );
        assert!(matches!(r, Err(Error::DuplicateResource { scope: "team", .. })));
    }

    #[test]
    fn missing_resource_name_loads_as_unnamed() {
        let s = PrincipalPermissionSnapshot::from_json(
            r#"{"teams": [{"resource_id": "t1", "organization_id": "o1", "capabilities": ["REPORT_EDIT"]}]}"#,
        )
        .unwrap();
        let t = s.team("t1").unwrap();
        assert_eq!(t.resource_name, "");
        assert!(t.capabilities.contains(Report::Edit.into()));
    }

    #[test]
    fn null_parts_are_absent() {
        let s = PrincipalPermissionSnapshot::from_json(r#"{"global": null, "organizations": null}"#).unwrap();
        assert!(!s.has_capability_data());
        let s = PrincipalPermissionSnapshot::from_json("{}").unwrap();
        assert_eq!(s, PrincipalPermissionSnapshot::anonymous());
    }

    #[test]
    fn missing_visibility_is_not_private() {
        let e: ScopedPermissionEntry =
            serde_json::from_str(r#"{"resource_id": "t1", "resource_name": "ops", "organization_inherited": true}"#)
                .unwrap();
        assert!(!e.is_private());
        assert_eq!(e.team_visibility, None);
    }

    #[test]
    fn team_named_in_scopes_by_organization() {
        let s = PrincipalPermissionSnapshot::builder()
            .team(ScopedPermissionEntry::team("t1", "ops", "o1", [Team::Read.into()]))
            .team(ScopedPermissionEntry::team("t2", "ops", "o2", [Report::Edit.into()]))
            .build()
            .unwrap();
        assert_eq!(s.team_named_in("o2", "ops").unwrap().resource_id, "t2");
        assert_eq!(s.team_named("ops").unwrap().resource_id, "t1");
        assert!(s.team_named_in("o3", "ops").is_none());
    }

    #[test]
    fn json_round_trip_preserves_absence() {
        let s = PrincipalPermissionSnapshot::builder()
            .organization(ScopedPermissionEntry::organization("o1", "acme", [Report::Read.into()]))
            .build()
            .unwrap();
        let back = PrincipalPermissionSnapshot::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
        assert!(back.teams().is_empty());
    }
}
