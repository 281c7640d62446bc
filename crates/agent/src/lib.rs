//! Action handling for the booking agents.
//!
//! - `dispatcher` - validates one invocation against a domain's operation
//!   table and performs at most one store call
//! - `registry` - maps action-group names to dispatchers
//! - `clock` - date source for server-stamped fields

pub mod clock;
pub mod dispatcher;
pub mod registry;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dispatcher::ActionDispatcher;
pub use registry::{ActionGroupRegistry, ActionHandler};
