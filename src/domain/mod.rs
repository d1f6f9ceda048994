// Domain layer: pricing models, contract lifecycle and ports (interfaces).

pub mod contract;
pub mod model;
pub mod ports;
