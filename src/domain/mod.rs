// Domain layer: record models, summary types and the ports the engine depends on.

pub mod model;
pub mod ports;
