pub mod beats;
pub mod codec;
pub mod easing;
pub mod export;
pub mod interpolate;
pub mod registry;

pub use beats::{
    annotate_beats, beat_to_normalized, calculate_beat_duration, normalized_to_beat,
    path_beat_duration, waypoint_beat,
};
pub use codec::{
    dpos_to_q, extract_easing_from_bookmark_name, format_easing_command,
    format_short_easing_command, parse_easing_command, q_to_dpos, validate_command, CommandError,
    EasingCommand, PositionCommand, ScriptMapperCodec,
};
pub use easing::{calculate, sample_curve};
pub use export::{
    from_bookmarks, to_bookmarks, to_level_json, Bookmark, ExportError, ExportOptions, ImportError,
};
pub use interpolate::{
    interpolate_camera_path, interpolate_camera_path_with, segment_boundaries,
    InterpolationOptions, InterpolationResult, RotationMode,
};
pub use registry::{EasingFunctionInfo, EasingRegistry};

/// Re-exported so callers only need one dependency for the data model.
pub use scriptcam_data as data;
