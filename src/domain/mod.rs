// Domain layer: request parameter models and the ports (traits) the client depends on.

pub mod model;
pub mod ports;
