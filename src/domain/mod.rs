// Domain layer: inventory records, model claims and the ports the core talks through.

pub mod model;
pub mod ports;
