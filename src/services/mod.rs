mod planner;

pub use planner::{Plan, Planner, Step};
