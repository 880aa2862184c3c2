//! Various types associated with libraries.
//!
//! A library is anything that can appear as a node in a restore graph: a package from a feed,
//! a project from the build, or an external reference standing in for a project.

mod name;
pub use name::LibraryName;

mod version;
pub use version::Version;

mod version_range;
pub use version_range::VersionRange;

mod framework;
pub use framework::Framework;
pub use framework::FrameworkFamily;
pub use framework::Target;
pub use framework::get_nearest;

mod asset_flags;
pub use asset_flags::AssetFlags;

mod kind;
pub use kind::LibraryKind;
pub use kind::LibraryKindHint;

mod dependency;
pub use dependency::LibraryIdentity;
pub use dependency::LibraryRange;
pub use dependency::DependencyEdge;
