pub mod abstract_range;
pub mod containment;
pub mod contents;
pub mod insertion;
pub mod live_range;
pub mod range;
pub mod static_range;

pub use abstract_range::*;
pub use containment::*;
pub use range::*;
pub use static_range::*;
