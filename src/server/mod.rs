//! Server layer: typed wire requests, endpoint routing, and TCP transport.

pub mod request;
pub mod router;
pub mod transport;
