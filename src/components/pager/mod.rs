//! Switching between dashboard pages.

mod component;
mod state;

pub use component::{DashboardPage, PageSwitcher};
pub use state::{Direction, PageSet};
