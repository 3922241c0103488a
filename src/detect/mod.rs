mod backend;
mod backends;
mod filter;
mod result;

pub use backend::DetectorBackend;
pub use backends::{ReplayBackend, ReplayScript};
pub use filter::{ClassFilter, FramePartition};
pub use result::{resolve_label, BoundingBox, Detection, RawDetection};
