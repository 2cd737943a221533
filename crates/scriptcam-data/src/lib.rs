pub mod model;
pub mod presets;

pub use model::{
    CameraPath, CameraSegment, CameraWaypoint, CoordinateSystem, DriftParams, EaseType,
    FunctionId, PathError, Position, Rotation,
};
pub use presets::{builtin_presets, clone_preset, find_preset};
