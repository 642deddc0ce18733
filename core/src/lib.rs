pub mod bridge;
pub mod engines;
pub mod perf;
pub mod val;
