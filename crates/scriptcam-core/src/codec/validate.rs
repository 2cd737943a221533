//! Bookmark command validation.

use super::position::{numeric_fields, DPOS_LAYOUT, DPOS_PREFIX, Q_LAYOUT, Q_PREFIX};
use super::{CommandError, PositionCommand, ScriptMapperCodec};

/// Preset and control commands accepted without further checks.
///
/// Word commands may carry a numeric suffix (`spin60`, `spin-30`).
pub const CONTROL_COMMANDS: [&str; 15] = [
    "spin", "stop", "next", "center", "side", "top", "diagf", "diagb", "orbit", "shake", "dolly",
    "pan", "tilt", "->", "|",
];

/// Checks a (possibly compound) bookmark command.
///
/// The error's `Display` is the reason to show next to the input field.
pub fn validate_command(input: &str) -> Result<(), CommandError> {
    if input.trim().is_empty() {
        return Err(CommandError::Empty);
    }

    let codec = ScriptMapperCodec::default();
    for (index, part) in input.split(',').enumerate() {
        let part = part.trim();
        if part.is_empty() {
            return Err(CommandError::EmptyPart { index: index + 1 });
        }
        validate_part(&codec, part)?;
    }
    Ok(())
}

fn validate_part(codec: &ScriptMapperCodec<'_>, part: &str) -> Result<(), CommandError> {
    if let Some(body) = part.strip_prefix(Q_PREFIX) {
        numeric_fields(Q_PREFIX, Q_LAYOUT, body, PositionCommand::Q_FIELDS)?;
        return Ok(());
    }
    if let Some(body) = part.strip_prefix(DPOS_PREFIX) {
        numeric_fields(DPOS_PREFIX, DPOS_LAYOUT, body, PositionCommand::DPOS_FIELDS)?;
        return Ok(());
    }

    if is_control_command(part) || is_easing_shorthand(part) || codec.parse(part).is_some() {
        return Ok(());
    }

    Err(CommandError::Unknown(part.to_string()))
}

fn is_control_command(part: &str) -> bool {
    CONTROL_COMMANDS.iter().any(|&name| {
        if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return part == name;
        }
        match part.strip_prefix(name) {
            Some("") => true,
            Some(suffix) => suffix.parse::<f64>().map_or(false, f64::is_finite),
            None => false,
        }
    })
}

/// `In`/`Out`/`InOut` followed by a capitalised name, known or not.
fn is_easing_shorthand(part: &str) -> bool {
    ["InOut", "Out", "In"].iter().any(|prefix| {
        part.strip_prefix(prefix).map_or(false, |name| {
            name.starts_with(|c: char| c.is_ascii_uppercase())
                && name.chars().all(|c| c.is_ascii_alphanumeric())
        })
    })
}
