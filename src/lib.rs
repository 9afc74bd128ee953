//! capscope - fail-closed permission resolution
//!
//! Decides whether a principal may do something, given an immutable
//! snapshot of its capabilities at three scopes:
//! - global capabilities, which apply everywhere (`GLOBAL_ADMIN` allows anything)
//! - organization capabilities
//! - team capabilities, optionally inheriting the owning organization's
//!   unless the team is private
//!
//! Resolution never errors. Missing data, unknown names and empty queries
//! all answer `false`.
//!
//! ```
//! use capscope::{PermissionResolver, PrincipalPermissionSnapshot, ScopedPermissionEntry};
//! use capscope::caps::Report;
//!
//! let snapshot = PrincipalPermissionSnapshot::builder()
//!     .organization(ScopedPermissionEntry::organization("o1", "acme", [Report::Edit.into()]))
//!     .build()
//!     .unwrap();
//! let resolver = PermissionResolver::new(&snapshot);
//! assert!(resolver.has_capability(&[Report::Edit.into()], Some("o1"), None));
//! assert!(!resolver.has_capability(&[], Some("o1"), None));
//! ```

pub mod caps;
pub mod config;
pub mod error;
pub mod resolver;
pub mod session;
pub mod set;
pub mod snapshot;

#[cfg(feature = "server")]
pub mod server;

pub use caps::Capability;
pub use error::{Error, Result};
pub use resolver::PermissionResolver;
pub use session::SharedSnapshot;
pub use set::CapabilitySet;
pub use snapshot::{PrincipalPermissionSnapshot, ScopedPermissionEntry, SnapshotBuilder, TeamVisibility};
