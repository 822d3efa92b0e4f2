mod acquisition;
mod handle;

pub use acquisition::{Acquisition, Warden};
pub use handle::ReleaseHandle;
