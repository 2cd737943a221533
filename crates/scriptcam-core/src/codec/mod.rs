//! # ScriptMapper Command Codec
//!
//! Converts between easing configurations and ScriptMapper bookmark commands.
//!
//! ## Responsibilities
//! - **Easing commands**: `InQuad`, `IOSine`, `ease_6_4` and friends, both ways.
//! - **Position commands**: `q_` and `dpos_` parsing and conversion (see [`position`]).
//! - **Validation**: human-readable reasons for rejected input (see [`validate`]).
//!
//! Parsing never panics and never errors on easing commands: text that does
//! not decode yields `None`, because callers feed it half-typed input.

pub mod position;
pub mod validate;

use crate::registry::EasingRegistry;
use scriptcam_data::{DriftParams, EaseType, FunctionId};
use thiserror::Error;

pub use position::{dpos_to_q, q_to_dpos, PositionCommand};
pub use validate::{validate_command, CONTROL_COMMANDS};

/// Recognised prefixes, longest first so `InOut` wins over `In`.
const PREFIXES: [(&str, EaseType); 6] = [
    ("InOut", EaseType::EaseBoth),
    ("Out", EaseType::EaseOut),
    ("IO", EaseType::EaseBoth),
    ("In", EaseType::EaseIn),
    ("I", EaseType::EaseIn),
    ("O", EaseType::EaseOut),
];

const DRIFT_PREFIX: &str = "ease_";

pub fn long_prefix(ease_type: EaseType) -> &'static str {
    match ease_type {
        EaseType::EaseIn => "In",
        EaseType::EaseOut => "Out",
        EaseType::EaseBoth => "InOut",
    }
}

pub fn short_prefix(ease_type: EaseType) -> &'static str {
    match ease_type {
        EaseType::EaseIn => "I",
        EaseType::EaseOut => "O",
        EaseType::EaseBoth => "IO",
    }
}

/// A decoded easing command.
#[derive(Debug, Clone, PartialEq)]
pub struct EasingCommand {
    pub function_id: FunctionId,
    pub ease_type: EaseType,
    pub params: Option<DriftParams>,
}

/// Reasons a command is rejected by [`validate_command`] or
/// [`PositionCommand::parse`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("command is empty")]
    Empty,
    #[error("part {index} of the command is empty")]
    EmptyPart { index: usize },
    #[error("`{prefix}` needs {expected} numeric fields ({layout}), found {found}")]
    TooFewFields {
        prefix: &'static str,
        layout: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("`{prefix}` takes {expected} numeric fields ({layout}), found {found}")]
    TooManyFields {
        prefix: &'static str,
        layout: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("field {index} of `{prefix}` is not a number: `{value}`")]
    NotNumeric {
        prefix: &'static str,
        index: usize,
        value: String,
    },
    #[error("unknown command `{0}`")]
    Unknown(String),
}

/// Codec bound to an easing registry.
#[derive(Clone, Copy)]
pub struct ScriptMapperCodec<'r> {
    registry: &'r EasingRegistry,
}

impl<'r> ScriptMapperCodec<'r> {
    pub fn new(registry: &'r EasingRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r EasingRegistry {
        self.registry
    }

    /// Full-form command (`InOutSine`, `ease_6_4`). `None` when the function
    /// has no ScriptMapper equivalent.
    pub fn format(
        &self,
        function_id: &FunctionId,
        ease_type: EaseType,
        params: Option<DriftParams>,
    ) -> Option<String> {
        self.format_with(function_id, ease_type, params, long_prefix)
    }

    /// Short-form command (`IOSine`, `ease_6_4`).
    pub fn format_short(
        &self,
        function_id: &FunctionId,
        ease_type: EaseType,
        params: Option<DriftParams>,
    ) -> Option<String> {
        self.format_with(function_id, ease_type, params, short_prefix)
    }

    fn format_with(
        &self,
        function_id: &FunctionId,
        ease_type: EaseType,
        params: Option<DriftParams>,
        prefix: fn(EaseType) -> &'static str,
    ) -> Option<String> {
        let info = self.registry.get(function_id)?;
        let base_name = info.script_mapper_name?;

        if info.is_parametric {
            // Drift carries its shape in the parameters, never in a prefix.
            let params = params.or(info.default_params).unwrap_or_default().clamped();
            return Some(format!(
                "{DRIFT_PREFIX}{}_{}",
                params.x.round() as i64,
                params.y.round() as i64
            ));
        }

        Some(format!("{}{}", prefix(ease_type), base_name))
    }

    /// Decodes a prefixed or drift command. Surrounding whitespace is ignored.
    pub fn parse(&self, input: &str) -> Option<EasingCommand> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Some(body) = input.strip_prefix(DRIFT_PREFIX) {
            return parse_drift(body);
        }

        PREFIXES.iter().find_map(|&(prefix, ease_type)| {
            let base_name = input.strip_prefix(prefix)?;
            let info = self.registry.by_script_mapper_name(base_name)?;
            Some(EasingCommand {
                function_id: info.id.clone(),
                ease_type,
                params: None,
            })
        })
    }

    /// Finds the easing part of a compound bookmark command.
    ///
    /// Parts are scanned from the last one backwards; the first that decodes
    /// as an easing command is returned, trimmed.
    pub fn extract_easing<'a>(&self, compound: &'a str) -> Option<&'a str> {
        compound
            .split(',')
            .rev()
            .map(str::trim)
            .find(|part| self.parse(part).is_some())
    }
}

impl Default for ScriptMapperCodec<'static> {
    fn default() -> Self {
        Self::new(EasingRegistry::global())
    }
}

fn parse_drift(body: &str) -> Option<EasingCommand> {
    let (x, y) = body.split_once('_')?;
    let x = parse_drift_param(x)?;
    let y = parse_drift_param(y)?;

    Some(EasingCommand {
        function_id: FunctionId::Drift,
        ease_type: EaseType::EaseIn,
        params: Some(DriftParams::new(x, y)),
    })
}

fn parse_drift_param(field: &str) -> Option<f64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u32 = field.parse().ok()?;
    (value <= DriftParams::MAX as u32).then_some(value as f64)
}

/// Full-form command using the global registry.
pub fn format_easing_command(
    function_id: &FunctionId,
    ease_type: EaseType,
    params: Option<DriftParams>,
) -> Option<String> {
    ScriptMapperCodec::default().format(function_id, ease_type, params)
}

/// Short-form command using the global registry.
pub fn format_short_easing_command(
    function_id: &FunctionId,
    ease_type: EaseType,
    params: Option<DriftParams>,
) -> Option<String> {
    ScriptMapperCodec::default().format_short(function_id, ease_type, params)
}

pub fn parse_easing_command(input: &str) -> Option<EasingCommand> {
    ScriptMapperCodec::default().parse(input)
}

pub fn extract_easing_from_bookmark_name(compound: &str) -> Option<&str> {
    ScriptMapperCodec::default().extract_easing(compound)
}
