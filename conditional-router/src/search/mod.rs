//! Point-to-point fastest path search.
//!
//! [`BidirectionalSearch`] runs A* from both ends. Which termination rule it
//! uses is a [`StoppingPolicy`]: [`StandardStopping`] for graphs without
//! time-dependent access, [`ConditionalStopping`] when edges may open and
//! close over time.

mod approximator;
mod bidir;
mod path;
mod stopping;


pub use approximator::{BeelineApproximator, WeightApproximator, ZeroApproximator};
pub use bidir::{BidirectionalSearch, ConditionalAStarBidirection};
pub use path::Path;
pub use stopping::{ConditionalStopping, Progress, StandardStopping, StoppingPolicy};
