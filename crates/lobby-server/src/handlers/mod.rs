//! Request handlers, grouped by resource.

pub mod employees;
pub mod prereg;
pub mod visits;
