//! List coordination layer.
//!
//! This module contains the coordinators and the sub-states they own:
//!
//! - [`state`]: [`ListCoordinator`], the flat-list owner
//! - [`sectioned`]: [`SectionedCoordinator`], the grouped-list owner
//! - [`pagination`]: Page counter and full-page heuristic
//! - [`fetch`]: Fetch-more gate
//! - [`refresh`]: Pull-to-refresh lifecycle
//! - [`search`]: Search query and filter functions
//! - [`changes`]: Change notifications
//! - [`binding`]: View binding interface
//! - [`handler`]: View intent dispatch
//! - [`modes`]: Fetch status and has-more strategy enums

pub mod binding;
pub mod changes;
pub mod fetch;
pub mod handler;
pub mod modes;
pub mod pagination;
pub mod refresh;
pub mod search;
pub mod sectioned;
pub mod state;

pub use binding::{ChangeLog, ViewBinding};
pub use changes::ListChange;
pub use fetch::FetchMore;
pub use handler::{handle_event, Event};
pub use modes::{FetchStatus, MoreDataStrategy};
pub use pagination::Pagination;
pub use refresh::Refresh;
pub use search::{FilterFn, SearchFilter};
pub use sectioned::{SectionChange, SectionListener, SectionedCoordinator};
pub use state::{BindingId, ListCoordinator, PageHandler, RefreshHandler};
