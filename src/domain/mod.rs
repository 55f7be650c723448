// Domain layer: wire models, request descriptors and ports.

pub mod model;
pub mod ports;
pub mod request;
