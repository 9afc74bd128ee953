//! Capability vocabulary
//!
//! Capabilities are a closed set, grouped by the resource kind they act on.
//! Each one owns a single bit so sets can be evaluated as masks, and a
//! canonical name that is what snapshot producers put on the wire.
//! Matching is plain equality: there is no hierarchy between names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

macro_rules! capability_domain {
    (
        $(#[$meta:meta])*
        $name:ident at $offset:literal {
            $($variant:ident => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Canonical wire name
            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            #[inline]
            pub const fn bit(self) -> u64 {
                1u64 << ($offset + self as u32)
            }
        }

        impl From<$name> for Capability {
            fn from(c: $name) -> Self {
                Capability::$name(c)
            }
        }
    };
}

capability_domain! {
    /// Capabilities that hold everywhere, independent of organization or team
    Global at 0 {
        Admin => "GLOBAL_ADMIN",
        ReadAll => "GLOBAL_READ_ALL",
        OrganizationCreate => "GLOBAL_ORGANIZATION_CREATE",
    }
}

capability_domain! {
    Organization at 8 {
        Admin => "ORGANIZATION_ADMIN",
        Read => "ORGANIZATION_READ",
        Edit => "ORGANIZATION_EDIT",
        MemberInvite => "ORGANIZATION_MEMBER_INVITE",
        MemberManage => "ORGANIZATION_MEMBER_MANAGE",
        TeamCreate => "ORGANIZATION_TEAM_CREATE",
    }
}

capability_domain! {
    Team at 16 {
        Admin => "TEAM_ADMIN",
        Read => "TEAM_READ",
        Edit => "TEAM_EDIT",
        MemberInvite => "TEAM_MEMBER_INVITE",
        MemberManage => "TEAM_MEMBER_MANAGE",
    }
}

capability_domain! {
    Report at 24 {
        Read => "REPORT_READ",
        Create => "REPORT_CREATE",
        Edit => "REPORT_EDIT",
        Delete => "REPORT_DELETE",
        Share => "REPORT_SHARE",
    }
}

capability_domain! {
    Comment at 32 {
        Read => "COMMENT_READ",
        Create => "COMMENT_CREATE",
        Edit => "COMMENT_EDIT",
        Delete => "COMMENT_DELETE",
        Resolve => "COMMENT_RESOLVE",
    }
}

capability_domain! {
    Task at 40 {
        Read => "TASK_READ",
        Create => "TASK_CREATE",
        Edit => "TASK_EDIT",
        Delete => "TASK_DELETE",
        Assign => "TASK_ASSIGN",
    }
}

/// One allowed action on one resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    Global(Global),
    Organization(Organization),
    Team(Team),
    Report(Report),
    Comment(Comment),
    Task(Task),
}

impl Capability {
    /// Super-user capability: holding it globally authorizes any query
    pub const GLOBAL_ADMIN: Capability = Capability::Global(Global::Admin);

    pub const fn name(self) -> &'static str {
        match self {
            Capability::Global(c) => c.name(),
            Capability::Organization(c) => c.name(),
            Capability::Team(c) => c.name(),
            Capability::Report(c) => c.name(),
            Capability::Comment(c) => c.name(),
            Capability::Task(c) => c.name(),
        }
    }

    #[inline]
    pub const fn bit(self) -> u64 {
        match self {
            Capability::Global(c) => c.bit(),
            Capability::Organization(c) => c.bit(),
            Capability::Team(c) => c.bit(),
            Capability::Report(c) => c.bit(),
            Capability::Comment(c) => c.bit(),
            Capability::Task(c) => c.bit(),
        }
    }

    /// Every capability, grouped by domain in declaration order
    pub fn all() -> impl Iterator<Item = Capability> {
        Global::ALL.iter().copied().map(Capability::from)
            .chain(Organization::ALL.iter().copied().map(Capability::from))
            .chain(Team::ALL.iter().copied().map(Capability::from))
            .chain(Report::ALL.iter().copied().map(Capability::from))
            .chain(Comment::ALL.iter().copied().map(Capability::from))
            .chain(Task::ALL.iter().copied().map(Capability::from))
    }

    /// Parse a list of names, dropping the ones that are not capabilities
    pub fn parse_lossy<S: AsRef<str>>(names: &[S]) -> Vec<Capability> {
        names
            .iter()
            .filter_map(|n| match n.as_ref().parse::<Capability>() {
                Ok(c) => Some(c),
                Err(_) => {
                    tracing::warn!(name = n.as_ref(), "ignoring unknown capability");
                    None
                }
            })
            .collect()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::all()
            .find(|c| c.name() == s)
            .ok_or_else(|| Error::UnknownCapability(s.to_string()))
    }
}

impl Serialize for Capability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
