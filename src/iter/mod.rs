mod overlaps;
mod ref_iter;

pub use overlaps::*;
pub use ref_iter::*;
