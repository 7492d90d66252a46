//! Time-driven tweens.
//!
//! A tween track maps global elapsed seconds to a value inside a range and
//! writes it into one axis of one part's pose override. Tracks hold no state:
//! evaluating the same set at the same time always yields the same pose.

use std::f32::consts::TAU;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    data_structures::{
        pose::{Axis, PoseTable, TransformKind},
        rig::PartId,
    },
    error::RigError,
};

/// Periodic driver of a track, returning values in `[-1, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Wave {
    Sin { speed: f32, phase: f32 },
    Cos { speed: f32, phase: f32 },
    /// Always 0, which pins a track to the middle of its range.
    Zero,
}

impl Wave {
    pub fn sin(speed: f32) -> Self {
        Wave::Sin { speed, phase: 0.0 }
    }

    pub fn cos(speed: f32, phase: f32) -> Self {
        Wave::Cos { speed, phase }
    }

    pub fn eval(&self, seconds: f32) -> f32 {
        match *self {
            Wave::Sin { speed, phase } => (speed * seconds + phase).sin(),
            Wave::Cos { speed, phase } => (speed * seconds + phase).cos(),
            Wave::Zero => 0.0,
        }
    }

    /// Seconds until the wave repeats, `None` for constant waves.
    pub fn period(&self) -> Option<f32> {
        match *self {
            Wave::Sin { speed, .. } | Wave::Cos { speed, .. } if speed != 0.0 => {
                Some(TAU / speed.abs())
            }
            _ => None,
        }
    }
}

/// One animated axis of one part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenTrack<P: PartId> {
    pub part: P,
    pub kind: TransformKind,
    pub axis: Axis,
    pub min: f32,
    pub max: f32,
    pub wave: Wave,
}

impl<P: PartId> TweenTrack<P> {
    pub fn rotation(part: P, axis: Axis, min: f32, max: f32, wave: Wave) -> Self {
        Self {
            part,
            kind: TransformKind::Rotation,
            axis,
            min,
            max,
            wave,
        }
    }

    pub fn translation(part: P, axis: Axis, min: f32, max: f32, wave: Wave) -> Self {
        Self {
            part,
            kind: TransformKind::Translation,
            axis,
            min,
            max,
            wave,
        }
    }

    /// `(min + half) + half * wave(t)` with `half = (max - min) / 2`.
    pub fn value_at(&self, seconds: f32) -> f32 {
        let half = (self.max - self.min) / 2.0;
        let begin = self.min + half;
        begin + half * self.wave.eval(seconds)
    }
}

/// Evaluates every track at `seconds` and writes the results into `pose`.
pub fn tween<P: PartId>(pose: &mut PoseTable<P>, tracks: &[TweenTrack<P>], seconds: f32) {
    for track in tracks {
        pose.set(track.part, track.kind, track.axis, track.value_at(seconds));
    }
}

/// Serialisable form of a track that names its part by string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackSpec {
    pub part: String,
    pub kind: TransformKind,
    pub axis: Axis,
    pub min: f32,
    pub max: f32,
    pub wave: Wave,
}

impl TrackSpec {
    pub fn resolve<P: PartId>(&self) -> Result<TweenTrack<P>, RigError> {
        let part = P::from_name(&self.part).inspect_err(|_| {
            warn!("animation track targets unknown part `{}`", self.part);
        })?;
        Ok(TweenTrack {
            part,
            kind: self.kind,
            axis: self.axis,
            min: self.min,
            max: self.max,
            wave: self.wave,
        })
    }
}

/// Parses a JSON array of [`TrackSpec`]s and resolves them against the rig `P`.
pub fn load_tracks<P: PartId>(json: &str) -> anyhow::Result<Vec<TweenTrack<P>>> {
    let specs: Vec<TrackSpec> = serde_json::from_str(json)?;
    let tracks = specs
        .iter()
        .map(TrackSpec::resolve::<P>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tracks)
}
