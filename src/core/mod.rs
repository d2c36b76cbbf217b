// src/core/mod.rs

/// Typed report structures decoded from the service's JSON, such as `Report`
/// and `Scan`, plus read-only views over them.
pub mod models;

/// The `Client` configuration and the report fetch operation.
pub mod client;

/// The closed set of failures a fetch can end in.
pub mod error;

/// The HTTP seam: the `Transport` trait and its `reqwest` implementation.
pub mod transport;
