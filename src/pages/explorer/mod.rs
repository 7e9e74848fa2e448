pub mod navigation;
pub mod overlay;
pub mod pane;
pub mod session;
pub mod types;

pub use navigation::{Applied, FileAccessTicket, NavigationState, Selection};
pub use overlay::PaneMode;
pub use pane::PaneLayout;
pub use session::ExplorerSession;
pub use types::{BuildTicket, LoadOutcome, TreeRow};
