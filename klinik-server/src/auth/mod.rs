//! Authentication and authorization

pub mod policy;
pub mod staff_auth;
