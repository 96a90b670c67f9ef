//! Outbound adapters: concrete implementations of the domain's ports.

pub mod persistence;
