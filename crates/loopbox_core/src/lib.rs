//! Pure timeline computation for the Loopbox video editor: segment/offset
//! arithmetic, drag payload codec, list reordering, and image-group range
//! reconciliation. Everything here is synchronous and side-effect free;
//! mutating operations return new collections rather than editing in place.

pub mod drag;
pub mod error;
pub mod groups;
pub mod reorder;
pub mod timing;
pub mod types;
