//! Entity Module

pub mod identity;
