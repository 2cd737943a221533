//! `q_` and `dpos_` camera position commands.
//!
//! `q_X_Y_Z_RX_RY_RZ_FOV` places the camera with an explicit rotation;
//! `dpos_X_Y_Z_FOV` places it and lets the game aim it at the player.

use super::CommandError;
use scriptcam_data::{Position, Rotation};
use std::fmt;
use tracing::debug;

pub(crate) const Q_PREFIX: &str = "q_";
pub(crate) const DPOS_PREFIX: &str = "dpos_";
pub(crate) const Q_LAYOUT: &str = "X_Y_Z_RX_RY_RZ_FOV";
pub(crate) const DPOS_LAYOUT: &str = "X_Y_Z_FOV";
const DPOS_SHORT_LAYOUT: &str = "X_Y_Z";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionCommand {
    Q {
        position: Position,
        rotation: Rotation,
        fov: f64,
    },
    Dpos {
        position: Position,
        fov: f64,
    },
}

impl PositionCommand {
    pub const Q_FIELDS: usize = 7;
    pub const DPOS_FIELDS: usize = 4;

    /// Parses a single (non-compound) position command.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(CommandError::Empty);
        }

        if let Some(body) = input.strip_prefix(Q_PREFIX) {
            let f = numeric_fields(Q_PREFIX, Q_LAYOUT, body, Self::Q_FIELDS)?;
            return Ok(PositionCommand::Q {
                position: Position::new(f[0], f[1], f[2]),
                rotation: Rotation::new(f[3], f[4], f[5]),
                fov: f[6],
            });
        }

        if let Some(body) = input.strip_prefix(DPOS_PREFIX) {
            let f = numeric_fields(DPOS_PREFIX, DPOS_LAYOUT, body, Self::DPOS_FIELDS)?;
            return Ok(PositionCommand::Dpos {
                position: Position::new(f[0], f[1], f[2]),
                fov: f[3],
            });
        }

        Err(CommandError::Unknown(input.to_string()))
    }

    /// The first part of a compound command that parses as a position command.
    pub fn find_in(compound: &str) -> Option<Self> {
        compound
            .split(',')
            .map(str::trim)
            .filter(|part| is_position_command(part))
            .find_map(|part| Self::parse(part).ok())
    }

    /// Like [`Self::find_in`], but also takes the FOV-less `dpos_X_Y_Z` form
    /// older bookmark lists use, filling in `default_fov`.
    pub fn find_in_lenient(compound: &str, default_fov: f64) -> Option<Self> {
        compound
            .split(',')
            .map(str::trim)
            .filter(|part| is_position_command(part))
            .find_map(|part| match Self::parse(part) {
                Ok(command) => Some(command),
                Err(err) => {
                    let short = part.strip_prefix(DPOS_PREFIX).and_then(|body| {
                        numeric_fields(DPOS_PREFIX, DPOS_SHORT_LAYOUT, body, 3).ok()
                    });
                    if short.is_none() {
                        debug!("Ignoring position part '{}': {}", part, err);
                    }
                    short.map(|f| PositionCommand::Dpos {
                        position: Position::new(f[0], f[1], f[2]),
                        fov: default_fov,
                    })
                }
            })
    }

    pub fn position(&self) -> Position {
        match self {
            PositionCommand::Q { position, .. } | PositionCommand::Dpos { position, .. } => {
                *position
            }
        }
    }

    /// Explicit rotation; `None` for `dpos_`, which looks at the player.
    pub fn rotation(&self) -> Option<Rotation> {
        match self {
            PositionCommand::Q { rotation, .. } => Some(*rotation),
            PositionCommand::Dpos { .. } => None,
        }
    }

    pub fn fov(&self) -> f64 {
        match self {
            PositionCommand::Q { fov, .. } | PositionCommand::Dpos { fov, .. } => *fov,
        }
    }

    pub fn to_dpos(self) -> Self {
        PositionCommand::Dpos {
            position: self.position(),
            fov: self.fov(),
        }
    }

    pub fn to_q(self) -> Self {
        PositionCommand::Q {
            position: self.position(),
            rotation: self.rotation().unwrap_or_default(),
            fov: self.fov(),
        }
    }
}

impl fmt::Display for PositionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionCommand::Q {
                position: p,
                rotation: r,
                fov,
            } => write!(
                f,
                "{Q_PREFIX}{}_{}_{}_{}_{}_{}_{}",
                p.x, p.y, p.z, r.rx, r.ry, r.rz, fov
            ),
            PositionCommand::Dpos { position: p, fov } => {
                write!(f, "{DPOS_PREFIX}{}_{}_{}_{}", p.x, p.y, p.z, fov)
            }
        }
    }
}

pub(crate) fn is_position_command(part: &str) -> bool {
    part.starts_with(Q_PREFIX) || part.starts_with(DPOS_PREFIX)
}

/// Splits `body` on `_` and parses exactly `expected` finite numbers.
pub(crate) fn numeric_fields(
    prefix: &'static str,
    layout: &'static str,
    body: &str,
    expected: usize,
) -> Result<Vec<f64>, CommandError> {
    let fields: Vec<&str> = if body.is_empty() {
        Vec::new()
    } else {
        body.split('_').collect()
    };

    if fields.len() < expected {
        return Err(CommandError::TooFewFields {
            prefix,
            layout,
            expected,
            found: fields.len(),
        });
    }
    if fields.len() > expected {
        return Err(CommandError::TooManyFields {
            prefix,
            layout,
            expected,
            found: fields.len(),
        });
    }

    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| CommandError::NotNumeric {
                    prefix,
                    index: i + 1,
                    value: field.to_string(),
                })
        })
        .collect()
}

/// Rewrites every well-formed `q_` part of a compound command as `dpos_`,
/// dropping the rotation fields. Field text and other parts are kept as written.
pub fn q_to_dpos(command: &str) -> String {
    rewrite_parts(command, |part| {
        let body = part.strip_prefix(Q_PREFIX)?;
        numeric_fields(Q_PREFIX, Q_LAYOUT, body, PositionCommand::Q_FIELDS).ok()?;
        let f: Vec<&str> = body.split('_').collect();
        Some(format!("{DPOS_PREFIX}{}_{}_{}_{}", f[0], f[1], f[2], f[6]))
    })
}

/// Rewrites every well-formed `dpos_` part of a compound command as `q_`
/// with zero rotation.
pub fn dpos_to_q(command: &str) -> String {
    rewrite_parts(command, |part| {
        let body = part.strip_prefix(DPOS_PREFIX)?;
        numeric_fields(DPOS_PREFIX, DPOS_LAYOUT, body, PositionCommand::DPOS_FIELDS).ok()?;
        let f: Vec<&str> = body.split('_').collect();
        Some(format!("{Q_PREFIX}{}_{}_{}_0_0_0_{}", f[0], f[1], f[2], f[3]))
    })
}

fn rewrite_parts(command: &str, rewrite: impl Fn(&str) -> Option<String>) -> String {
    command
        .split(',')
        .map(|part| {
            let trimmed = part.trim();
            match rewrite(trimmed) {
                Some(replacement) => part.replacen(trimmed, &replacement, 1),
                None => part.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
