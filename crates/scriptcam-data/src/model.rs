use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Direction modifier applied uniformly to every easing shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EaseType {
    #[default]
    EaseIn,
    EaseOut,
    EaseBoth,
}

impl EaseType {
    pub const ALL: [EaseType; 3] = [EaseType::EaseIn, EaseType::EaseOut, EaseType::EaseBoth];

    pub fn as_str(self) -> &'static str {
        match self {
            EaseType::EaseIn => "easein",
            EaseType::EaseOut => "easeout",
            EaseType::EaseBoth => "easeboth",
        }
    }
}

impl fmt::Display for EaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easein" => Ok(EaseType::EaseIn),
            "easeout" => Ok(EaseType::EaseOut),
            "easeboth" => Ok(EaseType::EaseBoth),
            other => Err(format!(
                "unknown ease type `{other}` (expected easein, easeout or easeboth)"
            )),
        }
    }
}

/// Identifier of an easing curve.
///
/// The string id is the wire representation; anything not in the catalog is
/// carried through as `Unknown` so externally authored paths survive a
/// load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FunctionId {
    #[default]
    Linear,
    Quadratic,
    Cubic,
    Quartic,
    Quintic,
    Exponential,
    Circular,
    Sqrt,
    Back,
    Elastic,
    Bounce,
    Hermite,
    Bezier,
    Parabolic,
    Trigonometric,
    Drift,
    Unknown(String),
}

impl FunctionId {
    /// Every catalogued id, in display order.
    pub const KNOWN: [FunctionId; 16] = [
        FunctionId::Linear,
        FunctionId::Quadratic,
        FunctionId::Cubic,
        FunctionId::Quartic,
        FunctionId::Quintic,
        FunctionId::Exponential,
        FunctionId::Circular,
        FunctionId::Sqrt,
        FunctionId::Back,
        FunctionId::Elastic,
        FunctionId::Bounce,
        FunctionId::Hermite,
        FunctionId::Bezier,
        FunctionId::Parabolic,
        FunctionId::Trigonometric,
        FunctionId::Drift,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            FunctionId::Linear => "linear",
            FunctionId::Quadratic => "quadratic",
            FunctionId::Cubic => "cubic",
            FunctionId::Quartic => "quartic",
            FunctionId::Quintic => "quintic",
            FunctionId::Exponential => "exponential",
            FunctionId::Circular => "circular",
            FunctionId::Sqrt => "sqrt",
            FunctionId::Back => "back",
            FunctionId::Elastic => "elastic",
            FunctionId::Bounce => "bounce",
            FunctionId::Hermite => "hermite",
            FunctionId::Bezier => "bezier",
            FunctionId::Parabolic => "parabolic",
            FunctionId::Trigonometric => "trigonometric",
            FunctionId::Drift => "drift",
            FunctionId::Unknown(id) => id,
        }
    }

    /// Resolves a string id. Never fails; unrecognised ids become `Unknown`.
    pub fn from_id(id: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|known| known.as_str() == id)
            .unwrap_or_else(|| FunctionId::Unknown(id.to_string()))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FunctionId::Unknown(_))
    }

    pub fn is_parametric(&self) -> bool {
        matches!(self, FunctionId::Drift)
    }
}

impl From<String> for FunctionId {
    fn from(id: String) -> Self {
        FunctionId::from_id(&id)
    }
}

impl From<&str> for FunctionId {
    fn from(id: &str) -> Self {
        FunctionId::from_id(id)
    }
}

impl From<FunctionId> for String {
    fn from(id: FunctionId) -> Self {
        match id {
            FunctionId::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of the two-parameter drift curve, each in `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftParams {
    pub x: f64, // Breakpoint, scaled by 1/10
    pub y: f64, // Value at the breakpoint, scaled by 1/10
}

impl DriftParams {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(Self::MIN, Self::MAX),
            y: self.y.clamp(Self::MIN, Self::MAX),
        }
    }

    pub fn in_range(&self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.x) && (Self::MIN..=Self::MAX).contains(&self.y)
    }
}

impl Default for DriftParams {
    fn default() -> Self {
        Self { x: 6.0, y: 6.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Euler rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl Rotation {
    pub fn new(rx: f64, ry: f64, rz: f64) -> Self {
        Self { rx, ry, rz }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinateSystem {
    #[default]
    LeftHanded,
    RightHanded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraWaypoint {
    pub id: String,
    pub time: f64, // Normalized [0, 1]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beat: Option<f64>, // Display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark_command: Option<String>, // Raw q_/dpos_ command, overrides position/rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark_commands: Option<String>, // Compound string for legends
}

impl CameraWaypoint {
    pub fn new(id: impl Into<String>, time: f64, position: Position) -> Self {
        Self {
            id: id.into(),
            time,
            position,
            rotation: None,
            name: None,
            beat: None,
            bookmark_command: None,
            bookmark_commands: None,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_bookmark_command(mut self, command: impl Into<String>) -> Self {
        self.bookmark_command = Some(command.into());
        self
    }
}

fn default_true() -> bool {
    true
}

/// Transition between two adjacent waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSegment {
    pub id: String,
    pub from_waypoint_id: String,
    pub to_waypoint_id: String,
    #[serde(default)]
    pub function_id: FunctionId,
    #[serde(default)]
    pub ease_type: EaseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drift_params: Option<DriftParams>,
    #[serde(default = "default_true")]
    pub easing_enabled: bool, // false = linear
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_command: Option<String>, // Externally authored command, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark_commands: Option<String>,
}

impl CameraSegment {
    pub fn new(
        id: impl Into<String>,
        from_waypoint_id: impl Into<String>,
        to_waypoint_id: impl Into<String>,
        function_id: FunctionId,
        ease_type: EaseType,
    ) -> Self {
        Self {
            id: id.into(),
            from_waypoint_id: from_waypoint_id.into(),
            to_waypoint_id: to_waypoint_id.into(),
            function_id,
            ease_type,
            drift_params: None,
            easing_enabled: true,
            raw_command: None,
            bookmark_commands: None,
        }
    }

    pub fn linear(
        id: impl Into<String>,
        from_waypoint_id: impl Into<String>,
        to_waypoint_id: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            from_waypoint_id,
            to_waypoint_id,
            FunctionId::Linear,
            EaseType::EaseIn,
        )
    }

    pub fn with_drift(mut self, params: DriftParams) -> Self {
        self.function_id = FunctionId::Drift;
        self.drift_params = Some(params);
        self
    }
}

/// A structural invariant violation reported by [`CameraPath::check_invariants`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("path has no waypoints")]
    Empty,
    #[error("first waypoint `{id}` starts at {time}, expected 0")]
    FirstNotZero { id: String, time: f64 },
    #[error("last waypoint `{id}` ends at {time}, expected 1")]
    LastNotOne { id: String, time: f64 },
    #[error("waypoint `{id}` time {time} is outside [0, 1]")]
    TimeOutOfRange { id: String, time: f64 },
    #[error("waypoint `{id}` at {time} does not come after the previous waypoint at {previous}")]
    NotIncreasing { id: String, time: f64, previous: f64 },
    #[error("expected {expected} segments for {waypoints} waypoints, found {found}")]
    SegmentCount {
        waypoints: usize,
        expected: usize,
        found: usize,
    },
    #[error("segment {index} (`{id}`) does not connect `{expected_from}` to `{expected_to}`")]
    SegmentMismatch {
        index: usize,
        id: String,
        expected_from: String,
        expected_to: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPath {
    pub id: String,
    pub name: String,
    pub waypoints: Vec<CameraWaypoint>,
    #[serde(default)]
    pub segments: Vec<CameraSegment>,
    pub total_duration: f64, // Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beat_offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beat_duration: Option<f64>,
    #[serde(default)]
    pub coordinate_system: CoordinateSystem,
}

impl CameraPath {
    pub fn new(id: impl Into<String>, name: impl Into<String>, total_duration: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            waypoints: Vec::new(),
            segments: Vec::new(),
            total_duration,
            bpm: None,
            beat_offset: None,
            beat_duration: None,
            coordinate_system: CoordinateSystem::default(),
        }
    }

    /// Appends a waypoint and re-derives the segment list.
    pub fn push_waypoint(&mut self, waypoint: CameraWaypoint) {
        self.waypoints.push(waypoint);
        self.rebuild_segments();
    }

    pub fn with_waypoints(mut self, waypoints: Vec<CameraWaypoint>) -> Self {
        self.waypoints = waypoints;
        self.rebuild_segments();
        self
    }

    /// Re-derives the N-1 contiguous segments from the waypoint list.
    ///
    /// Segments whose index still exists keep their easing configuration and
    /// are re-pointed at the waypoints now on either side of them.
    pub fn rebuild_segments(&mut self) {
        let mut previous = std::mem::take(&mut self.segments).into_iter();

        self.segments = self
            .waypoints
            .windows(2)
            .enumerate()
            .map(|(index, pair)| {
                let (from, to) = (&pair[0], &pair[1]);
                match previous.next() {
                    Some(mut segment) => {
                        segment.from_waypoint_id = from.id.clone();
                        segment.to_waypoint_id = to.id.clone();
                        segment
                    }
                    None => CameraSegment::linear(format!("segment-{index}"), &from.id, &to.id),
                }
            })
            .collect();
    }

    pub fn waypoint(&self, id: &str) -> Option<&CameraWaypoint> {
        self.waypoints.iter().find(|wp| wp.id == id)
    }

    pub fn segment_mut(&mut self, index: usize) -> Option<&mut CameraSegment> {
        self.segments.get_mut(index)
    }

    /// Reports every violated structural invariant. An empty list means the
    /// path is well formed.
    pub fn check_invariants(&self) -> Vec<PathError> {
        let mut errors = Vec::new();

        let (first, last) = match (self.waypoints.first(), self.waypoints.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                errors.push(PathError::Empty);
                return errors;
            }
        };

        if self.waypoints.len() > 1 {
            if first.time != 0.0 {
                errors.push(PathError::FirstNotZero {
                    id: first.id.clone(),
                    time: first.time,
                });
            }
            if last.time != 1.0 {
                errors.push(PathError::LastNotOne {
                    id: last.id.clone(),
                    time: last.time,
                });
            }
        }

        for wp in &self.waypoints {
            if !(0.0..=1.0).contains(&wp.time) {
                errors.push(PathError::TimeOutOfRange {
                    id: wp.id.clone(),
                    time: wp.time,
                });
            }
        }

        for pair in self.waypoints.windows(2) {
            if pair[1].time <= pair[0].time {
                errors.push(PathError::NotIncreasing {
                    id: pair[1].id.clone(),
                    time: pair[1].time,
                    previous: pair[0].time,
                });
            }
        }

        let expected = self.waypoints.len() - 1;
        if self.segments.len() != expected {
            errors.push(PathError::SegmentCount {
                waypoints: self.waypoints.len(),
                expected,
                found: self.segments.len(),
            });
        }

        for (index, (segment, pair)) in self
            .segments
            .iter()
            .zip(self.waypoints.windows(2))
            .enumerate()
        {
            if segment.from_waypoint_id != pair[0].id || segment.to_waypoint_id != pair[1].id {
                errors.push(PathError::SegmentMismatch {
                    index,
                    id: segment.id.clone(),
                    expected_from: pair[0].id.clone(),
                    expected_to: pair[1].id.clone(),
                });
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn three_point_path() -> CameraPath {
        CameraPath::new("p1", "Test", 4000.0).with_waypoints(vec![
            CameraWaypoint::new("a", 0.0, Position::new(0.0, 1.0, -5.0)),
            CameraWaypoint::new("b", 0.3, Position::new(1.0, 1.5, -4.0)),
            CameraWaypoint::new("c", 1.0, Position::new(2.0, 2.0, -3.0)),
        ])
    }

    #[test]
    fn test_function_id_wire_format() {
        assert_eq!(FunctionId::from_id("bounce"), FunctionId::Bounce);
        assert_eq!(
            FunctionId::from_id("wobble"),
            FunctionId::Unknown("wobble".to_string())
        );

        let json = serde_json::to_value(FunctionId::Trigonometric).unwrap();
        assert_eq!(json, json!("trigonometric"));

        let unknown: FunctionId = serde_json::from_value(json!("wobble")).unwrap();
        assert_eq!(unknown.as_str(), "wobble");
        assert_eq!(serde_json::to_value(&unknown).unwrap(), json!("wobble"));
    }

    #[test]
    fn test_known_ids_are_unique() {
        for (i, a) in FunctionId::KNOWN.iter().enumerate() {
            for b in FunctionId::KNOWN.iter().skip(i + 1) {
                assert_ne!(a.as_str(), b.as_str());
            }
            assert_eq!(&FunctionId::from_id(a.as_str()), a);
        }
    }

    #[test]
    fn test_ease_type_round_trip() {
        for ease in EaseType::ALL {
            assert_eq!(ease.as_str().parse::<EaseType>(), Ok(ease));
        }
        assert!("easeinout".parse::<EaseType>().is_err());
    }

    #[test]
    fn test_rebuild_segments_is_contiguous() {
        let path = three_point_path();
        assert_eq!(path.segments.len(), 2);
        assert_eq!(path.segments[0].from_waypoint_id, "a");
        assert_eq!(path.segments[0].to_waypoint_id, "b");
        assert_eq!(path.segments[1].from_waypoint_id, "b");
        assert_eq!(path.segments[1].to_waypoint_id, "c");
        assert!(path.check_invariants().is_empty());
    }

    #[test]
    fn test_rebuild_keeps_easing_of_surviving_segments() {
        let mut path = three_point_path();
        path.segments[0].function_id = FunctionId::Back;
        path.segments[0].ease_type = EaseType::EaseOut;

        path.waypoints.insert(
            1,
            CameraWaypoint::new("mid", 0.1, Position::new(0.5, 1.0, -5.0)),
        );
        path.rebuild_segments();

        assert_eq!(path.segments.len(), 3);
        assert_eq!(path.segments[0].function_id, FunctionId::Back);
        assert_eq!(path.segments[0].to_waypoint_id, "mid");
        assert_eq!(path.segments[2].function_id, FunctionId::Linear);
        assert!(path.check_invariants().is_empty());
    }

    #[test]
    fn test_check_invariants_reports_violations() {
        let mut path = three_point_path();
        path.waypoints[1].time = 1.2;
        path.segments.pop();

        let errors = path.check_invariants();
        assert!(errors.contains(&PathError::TimeOutOfRange {
            id: "b".to_string(),
            time: 1.2
        }));
        assert!(errors.iter().any(|e| matches!(e, PathError::NotIncreasing { id, .. } if id == "c")));
        assert!(errors.contains(&PathError::SegmentCount {
            waypoints: 3,
            expected: 2,
            found: 1
        }));

        let empty = CameraPath::new("e", "Empty", 1000.0);
        assert_eq!(empty.check_invariants(), vec![PathError::Empty]);
    }

    #[test]
    fn test_path_json_uses_camel_case() {
        let mut path = three_point_path();
        path.bpm = Some(120.0);
        path.segments[1] = path.segments[1].clone().with_drift(DriftParams::new(3.0, 7.0));

        let value = serde_json::to_value(&path).unwrap();
        assert_eq!(value["totalDuration"], json!(4000.0));
        assert_eq!(value["coordinateSystem"], json!("left-handed"));
        assert_eq!(value["segments"][1]["functionId"], json!("drift"));
        assert_eq!(value["segments"][1]["driftParams"], json!({"x": 3.0, "y": 7.0}));
        assert_eq!(value["segments"][0]["easingEnabled"], json!(true));

        let back: CameraPath = serde_json::from_value(value).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn test_segment_defaults_when_fields_missing() {
        let segment: CameraSegment = serde_json::from_value(json!({
            "id": "s",
            "fromWaypointId": "a",
            "toWaypointId": "b"
        }))
        .unwrap();

        assert_eq!(segment.function_id, FunctionId::Linear);
        assert_eq!(segment.ease_type, EaseType::EaseIn);
        assert!(segment.easing_enabled);
    }
}
