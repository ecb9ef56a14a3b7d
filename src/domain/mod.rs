// Domain layer: session entities and ports. Nothing here performs IO.

pub mod model;
pub mod ports;
