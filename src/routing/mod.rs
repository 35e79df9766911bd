//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Declaration (any time, no server needed):
//!     router.get(path, handler)
//!     → path.rs (validate shape, then handler; build PathMatcher)
//!     → table.rs (append to the method's bucket)
//!
//! Application:
//!     router.apply_routes(&mut server, prefix)
//!     → prefix.rs (join prefix onto literal paths)
//!     → apply.rs (call the server's registration for each verb)
//! ```
//!
//! # Design Decisions
//! - Declaring routes and binding them are separate steps
//! - Declaration order is preserved end to end
//! - Pattern routes ignore the mount prefix

pub mod apply;
pub mod method;
pub mod path;
pub mod prefix;
pub mod router;
pub mod table;

pub use apply::{RouteServer, RouteTarget};
pub use method::Method;
pub use path::{normalize, PathArg, PathExpr, PathMatcher, Pattern, RouteDescriptor};
pub use router::Router;
pub use table::{RouteEntry, RouteSpec, RouteTable};
