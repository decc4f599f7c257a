//! Stream-frame normaliser.
//!
//! Each WebSocket text frame carries one JSON object. The shapes are
//! duck-typed — the firmware-era clients send several variants — so
//! decoding works over `serde_json::Value` with one branch per
//! recognised shape. Unknown top-level shapes are accepted as no-ops:
//! tolerating unrecognised payloads keeps old and future clients from
//! killing the connection. A recognised key with a malformed value is
//! still a hard `ParseError`.

use serde_json::Value;

use crate::app::commands::{Axis, Command, PartialRgb8, Rgb8};
use crate::error::ParseError;

/// Parse one stream frame into commands.
///
/// Returns an empty vec for tolerated-but-unrecognised shapes (non-object
/// top level, object without `servo`/`led` keys, unknown axis names).
pub fn parse(text: &str) -> Result<Vec<Command>, ParseError> {
    let doc: Value = serde_json::from_str(text).map_err(|_| ParseError::InvalidJson)?;
    let Some(obj) = doc.as_object() else {
        return Ok(Vec::new());
    };

    let mut commands = Vec::new();

    match obj.get("servo") {
        // {"servo": "top", "angle": 45}
        Some(Value::String(name)) => {
            // "servo" without "angle" is tolerated (firmware contract).
            if let Some(raw) = obj.get("angle") {
                let angle = as_angle(raw, "angle")?;
                if let Some(axis) = Axis::from_wire(name) {
                    commands.push(Command::Servo {
                        axis,
                        angle_deg: angle,
                    });
                }
            }
        }
        // {"servo": [{"servo": "base", "angle": 10}, ...]}
        Some(Value::Array(entries)) => {
            for entry in entries {
                let Some(pair) = entry.as_object() else {
                    return Err(ParseError::InvalidValue { key: "servo" });
                };
                let name = pair
                    .get("servo")
                    .and_then(Value::as_str)
                    .ok_or(ParseError::InvalidValue { key: "servo" })?;
                let angle = as_angle(
                    pair.get("angle")
                        .ok_or(ParseError::InvalidValue { key: "angle" })?,
                    "angle",
                )?;
                if let Some(axis) = Axis::from_wire(name) {
                    commands.push(Command::Servo {
                        axis,
                        angle_deg: angle,
                    });
                }
            }
        }
        Some(_) => return Err(ParseError::InvalidValue { key: "servo" }),
        None => {}
    }

    if let Some(led) = obj.get("led") {
        let color = rgb_from(led, "led")?;

        if let Some(raw) = obj.get("flicker") {
            commands.push(Command::LedFlicker {
                color,
                duration_ms: as_duration(raw, "flicker")?,
            });
        } else if let Some(raw) = obj.get("fade") {
            let from = match obj.get("from") {
                Some(f) => partial_rgb_from(f)?,
                None => (None, None, None),
            };
            commands.push(Command::LedFade {
                to: color,
                from,
                duration_ms: as_duration(raw, "fade")?,
            });
        } else {
            commands.push(Command::LedSet { color });
        }
    }

    Ok(commands)
}

// ── Field decoding ────────────────────────────────────────────

fn as_angle(raw: &Value, key: &'static str) -> Result<f32, ParseError> {
    raw.as_f64()
        .map(|a| a as f32)
        .filter(|a| a.is_finite())
        .ok_or(ParseError::InvalidValue { key })
}

fn as_duration(raw: &Value, key: &'static str) -> Result<u32, ParseError> {
    let ms = raw.as_f64().ok_or(ParseError::InvalidValue { key })?;
    if !ms.is_finite() || ms < 0.0 || ms > f64::from(u32::MAX) {
        return Err(ParseError::InvalidValue { key });
    }
    Ok(ms as u32)
}

fn channel_from(
    obj: &serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<Option<u8>, ParseError> {
    match obj.get(key) {
        None => Ok(None),
        Some(raw) => {
            let value = raw.as_i64().ok_or(ParseError::InvalidValue { key })?;
            u8::try_from(value)
                .map(Some)
                .map_err(|_| ParseError::ChannelOutOfRange { key, value })
        }
    }
}

/// LED colour object; absent channels default to 0 (firmware contract).
fn rgb_from(raw: &Value, key: &'static str) -> Result<Rgb8, ParseError> {
    let obj = raw.as_object().ok_or(ParseError::InvalidValue { key })?;
    Ok((
        channel_from(obj, "r")?.unwrap_or(0),
        channel_from(obj, "g")?.unwrap_or(0),
        channel_from(obj, "b")?.unwrap_or(0),
    ))
}

/// Fade "from" object; absent channels stay unset and fall back to the
/// steady colour when the fade is applied.
fn partial_rgb_from(raw: &Value) -> Result<PartialRgb8, ParseError> {
    let obj = raw.as_object().ok_or(ParseError::InvalidValue { key: "from" })?;
    Ok((
        channel_from(obj, "r")?,
        channel_from(obj, "g")?,
        channel_from(obj, "b")?,
    ))
}
