pub mod collection;
pub mod distance;
pub mod error;
pub mod neighbor;

pub use collection::{Collection, DegeneratePolicy, Options};
pub use distance::weighted_euclidean;
pub use error::{AbundanceError, Result};
pub use neighbor::{Neighbor, Subject, DEFAULT_LIMIT};
