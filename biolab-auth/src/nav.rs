//! Navigation renderer — the visible menu as a pure function of role
//!
//! Unauthenticated visitors see no application entries at all (the page
//! shell offers sign-in/sign-up instead). Each entry declares the roles it
//! is visible to; membership is the whole check.

use crate::session::Role;

/// One navigation menu entry
#[derive(Debug, PartialEq, Eq)]
pub struct NavEntry {
    pub label: &'static str,
    pub route: &'static str,
    pub allowed_roles: &'static [Role],
}

/// The full menu, in display order
pub const NAV_ENTRIES: &[NavEntry] = &[
    NavEntry {
        label: "Labs",
        route: "/labs",
        allowed_roles: &[Role::Student, Role::Teacher, Role::Admin],
    },
    NavEntry {
        label: "STEAM",
        route: "/steam",
        allowed_roles: &[Role::Student, Role::Teacher, Role::Admin],
    },
    NavEntry {
        label: "Teachers",
        route: "/teachers",
        allowed_roles: &[Role::Teacher, Role::Admin],
    },
    NavEntry {
        label: "Students",
        route: "/students",
        allowed_roles: &[Role::Student, Role::Admin],
    },
    NavEntry {
        label: "Admin",
        route: "/admin",
        allowed_roles: &[Role::Admin],
    },
];

/// Entries visible to a visitor with the given resolved role.
///
/// Stateless and referentially derived from `role` alone; `None` (no
/// session, missing profile, or an unrecognized role string) yields the
/// empty set.
pub fn visible_entries(role: Option<Role>) -> Vec<&'static NavEntry> {
    match role {
        Some(role) => NAV_ENTRIES
            .iter()
            .filter(|entry| entry.allowed_roles.contains(&role))
            .collect(),
        None => Vec::new(),
    }
}
