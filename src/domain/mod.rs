// Domain layer: core models and ports (interfaces) shared by the pipelines and adapters.

pub mod model;
pub mod ports;
