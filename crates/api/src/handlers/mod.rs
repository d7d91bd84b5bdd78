//! Request handlers for the exchange protocol endpoint.

pub mod exchange;
