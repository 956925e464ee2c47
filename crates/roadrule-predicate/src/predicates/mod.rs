//! Built-in predicates.
//!
//! | Name | Level | Forms |
//! |------|-------|-------|
//! | `safe_distance` | obstacle | boolean, robust, constraint |
//! | `in_front_of` | obstacle | boolean, robust, constraint |
//! | `in_same_lane` | obstacle | boolean |
//! | `in_standstill` | obstacle | boolean, robust |
//! | `in_lane` | lane | boolean |

pub mod in_front_of;
pub mod in_lane;
pub mod in_same_lane;
pub mod in_standstill;
pub mod safe_distance;

pub use in_front_of::InFrontOf;
pub use in_lane::InLane;
pub use in_same_lane::InSameLane;
pub use in_standstill::InStandstill;
pub use safe_distance::SafeDistance;
