pub mod change;
pub mod diff;
pub mod normalize;
pub mod page_url;
pub mod snapshot;

pub use change::*;
pub use diff::*;
pub use normalize::*;
pub use page_url::*;
pub use snapshot::*;
