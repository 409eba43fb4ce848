//! Collaborator traits consumed by the dashboard core.

pub mod clock;
pub mod collection;
pub mod navigation;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collection::CollectionAdapter;
pub use navigation::{NavigationMode, Navigator, RecordingNavigator};
pub use storage::KeyValueStore;
