//! Name-based resolution tests
//!
//! `check_permission` keeps its own precedence rule. These tests pin the
//! places where it differs from `has_capability` so neither path drifts
//! into the other.

use capscope::caps::{Global, Report, Team};
use capscope::{Capability, PermissionResolver, PrincipalPermissionSnapshot, ScopedPermissionEntry, TeamVisibility};

fn acme() -> PrincipalPermissionSnapshot {
    PrincipalPermissionSnapshot::builder()
        .organization(ScopedPermissionEntry::organization("o1", "acme", [Report::Edit.into()]))
        .team(ScopedPermissionEntry::team("t1", "ops", "o1", [Team::Admin.into()]))
        .team(
            ScopedPermissionEntry::team("t2", "sales", "o1", [])
                .with_visibility(TeamVisibility::Private)
                .with_organization_inherited(true),
        )
        .build()
        .unwrap()
}

// ============================================================================
// Organization Gate
// ============================================================================

/// Unknown organization name denies regardless of team data
#[test]
fn unknown_organization_denies() {
    let s = acme();
    let r = PermissionResolver::new(&s);
    assert!(!r.check_permission("globex", Some("ops"), &[Team::Admin.into()]));
    assert!(!r.check_permission("globex", None, &[Report::Edit.into()]));
    assert!(!r.check_permission("", None, &[Report::Edit.into()]));
}

/// Names match exactly, case included
#[test]
fn names_are_case_sensitive() {
    let s = acme();
    let r = PermissionResolver::new(&s);
    assert!(r.check_permission("acme", None, &[Report::Edit.into()]));
    assert!(!r.check_permission("ACME", None, &[Report::Edit.into()]));
}

/// No snapshot data at all denies
#[test]
fn absent_or_anonymous_denies() {
    let anon = PrincipalPermissionSnapshot::anonymous();
    assert!(!PermissionResolver::new(&anon).check_permission("acme", None, &[Report::Edit.into()]));
    assert!(!PermissionResolver::absent().check_permission("acme", None, &[Report::Edit.into()]));
}

/// Empty requirement list denies
#[test]
fn empty_query_denies() {
    let s = acme();
    assert!(!PermissionResolver::new(&s).check_permission("acme", Some("ops"), &[]));
}

// ============================================================================
// Precedence
// ============================================================================

/// Without a team context the organization decides
#[test]
fn organization_decides_without_team() {
    let s = acme();
    let r = PermissionResolver::new(&s);
    assert!(r.check_permission("acme", None, &[Report::Edit.into()]));
    assert!(r.check_permission("acme", Some(""), &[Report::Edit.into()]));
    assert!(!r.check_permission("acme", None, &[Team::Admin.into()]));
}

/// A team name with no entry falls back to the organization
#[test]
fn unknown_team_name_uses_organization() {
    let s = acme();
    assert!(PermissionResolver::new(&s).check_permission("acme", Some("legal"), &[Report::Edit.into()]));
}

/// A non-inheriting team decides on its own capabilities alone
#[test]
fn non_inheriting_team_decides_alone() {
    let s = acme();
    let r = PermissionResolver::new(&s);
    assert!(r.check_permission("acme", Some("ops"), &[Team::Admin.into()]));
    assert!(!r.check_permission("acme", Some("ops"), &[Report::Edit.into()]));
}

/// An inheriting team defers entirely to the organization, even when private
#[test]
fn inheriting_team_defers_to_organization_even_if_private() {
    let s = acme();
    let r = PermissionResolver::new(&s);
    assert!(r.check_permission("acme", Some("sales"), &[Report::Edit.into()]));
    // The identity-based path refuses the same question
    assert!(!r.has_capability(&[Report::Edit.into()], Some("o1"), Some("t2")));
}

/// An inheriting team's own capabilities are not consulted
#[test]
fn inheriting_team_own_capabilities_ignored() {
    let s = PrincipalPermissionSnapshot::builder()
        .organization(ScopedPermissionEntry::organization("o1", "acme", []))
        .team(ScopedPermissionEntry::team("t1", "ops", "o1", [Team::Admin.into()]).with_organization_inherited(true))
        .build()
        .unwrap();
    assert!(!PermissionResolver::new(&s).check_permission("acme", Some("ops"), &[Team::Admin.into()]));
}

// ============================================================================
// No Global Folding
// ============================================================================

/// Global capabilities, GLOBAL_ADMIN included, do not count here
#[test]
fn global_capabilities_are_not_folded() {
    let s = PrincipalPermissionSnapshot::builder()
        .global([Capability::GLOBAL_ADMIN, Global::ReadAll.into()])
        .organization(ScopedPermissionEntry::organization("o1", "acme", []))
        .build()
        .unwrap();
    let r = PermissionResolver::new(&s);
    assert!(!r.check_permission("acme", None, &[Report::Read.into()]));
    assert!(!r.check_permission("acme", None, &[Global::ReadAll.into()]));
    assert!(r.has_capability(&[Report::Read.into()], Some("o1"), None));
}

/// A global admin with no organization entry is still refused by name
#[test]
fn global_admin_without_membership_denied() {
    let s = PrincipalPermissionSnapshot::builder()
        .global([Capability::GLOBAL_ADMIN])
        .build()
        .unwrap();
    assert!(!PermissionResolver::new(&s).check_permission("acme", None, &[Report::Read.into()]));
}
