//! Time-dependent road routing.
//!
//! Answers "what is the fastest way from A to B if I leave at this instant?"
//! on a road graph whose edges carry conditional restrictions such as
//! `no @ (Mo-Fr 07:00-09:00)` or `30 @ (22:00-06:00)`. Restrictions are
//! evaluated in the local time of the edge, at the moment the route
//! actually reaches it.

pub mod conditional;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod routing;
pub mod search;
pub mod storage;

pub use config::RoutingConfig;
pub use error::RoutingError;
pub use routing::TimeDependentContext;
pub use search::{BidirectionalSearch, ConditionalAStarBidirection, Path};
