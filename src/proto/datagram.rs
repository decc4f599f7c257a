//! Datagram normaliser.
//!
//! Packet format: `<packetID>;<key>=<value>;<key>=<value>;...`
//!
//! Recognised keys:
//! - `bS` / `tS` — base / top servo angle in degrees, each optional
//! - `r`, `g`, `b` — LED colour, only acted on when all three are present
//! - `fl` — flicker duration (ms); takes precedence over `fa`
//! - `fa` — fade duration (ms)
//! - `fr`, `fg`, `fb` — fade "from" colour, each channel optional
//!
//! Unknown keys and tokens without `=` are ignored; a repeated key's last
//! occurrence wins. Values for recognised keys must parse, and colour
//! channels must be integers in 0..=255.

use crate::app::commands::{Axis, Command};
use crate::error::ParseError;

/// Parse one datagram into its packet ID and commands.
///
/// A packet with a valid ID and no recognised args is valid and yields
/// zero commands — it still consumes its ID and earns an ACK.
pub fn parse(text: &str) -> Result<(u32, Vec<Command>), ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::EmptyDatagram);
    }

    let mut tokens = text.split(';');
    let packet_id: u32 = tokens
        .next()
        .unwrap_or_default()
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidPacketId)?;

    // Later occurrences of a key overwrite earlier ones.
    let args: Vec<(&str, &str)> = tokens
        .filter_map(|tok| tok.split_once('='))
        .collect();
    let get = |key: &str| {
        args.iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    };

    let mut commands = Vec::new();

    if let Some(raw) = get("bS") {
        commands.push(Command::Servo {
            axis: Axis::Base,
            angle_deg: parse_angle(raw, "bS")?,
        });
    }
    if let Some(raw) = get("tS") {
        commands.push(Command::Servo {
            axis: Axis::Top,
            angle_deg: parse_angle(raw, "tS")?,
        });
    }

    // The colour triple only acts when complete (firmware contract);
    // a partial triple is silently ignored.
    if let (Some(r), Some(g), Some(b)) = (get("r"), get("g"), get("b")) {
        let color = (
            parse_channel(r, "r")?,
            parse_channel(g, "g")?,
            parse_channel(b, "b")?,
        );

        if let Some(raw) = get("fl") {
            commands.push(Command::LedFlicker {
                color,
                duration_ms: parse_duration(raw, "fl")?,
            });
        } else if let Some(raw) = get("fa") {
            let from = (
                get("fr").map(|v| parse_channel(v, "fr")).transpose()?,
                get("fg").map(|v| parse_channel(v, "fg")).transpose()?,
                get("fb").map(|v| parse_channel(v, "fb")).transpose()?,
            );
            commands.push(Command::LedFade {
                to: color,
                from,
                duration_ms: parse_duration(raw, "fa")?,
            });
        } else {
            commands.push(Command::LedSet { color });
        }
    }

    Ok((packet_id, commands))
}

fn parse_angle(raw: &str, key: &'static str) -> Result<f32, ParseError> {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|a| a.is_finite())
        .ok_or(ParseError::InvalidValue { key })
}

fn parse_duration(raw: &str, key: &'static str) -> Result<u32, ParseError> {
    raw.trim()
        .parse()
        .map_err(|_| ParseError::InvalidValue { key })
}

fn parse_channel(raw: &str, key: &'static str) -> Result<u8, ParseError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidValue { key })?;
    u8::try_from(value).map_err(|_| ParseError::ChannelOutOfRange { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_servo_commands() {
        let (id, cmds) = parse("5;bS=45;tS=120").unwrap();
        assert_eq!(id, 5);
        assert_eq!(
            cmds,
            vec![
                Command::Servo {
                    axis: Axis::Base,
                    angle_deg: 45.0
                },
                Command::Servo {
                    axis: Axis::Top,
                    angle_deg: 120.0
                },
            ]
        );
    }

    #[test]
    fn single_servo_is_fine() {
        let (_, cmds) = parse("9;tS=10.5").unwrap();
        assert_eq!(
            cmds,
            vec![Command::Servo {
                axis: Axis::Top,
                angle_deg: 10.5
            }]
        );
    }

    #[test]
    fn plain_led_set() {
        let (_, cmds) = parse("1;r=255;g=128;b=0").unwrap();
        assert_eq!(
            cmds,
            vec![Command::LedSet {
                color: (255, 128, 0)
            }]
        );
    }

    #[test]
    fn flicker_with_duration() {
        let (_, cmds) = parse("1;r=255;g=0;b=0;fl=500").unwrap();
        assert_eq!(
            cmds,
            vec![Command::LedFlicker {
                color: (255, 0, 0),
                duration_ms: 500
            }]
        );
    }

    #[test]
    fn flicker_wins_over_fade_when_both_present() {
        let (_, cmds) = parse("1;r=1;g=2;b=3;fl=100;fa=900").unwrap();
        assert!(matches!(cmds[0], Command::LedFlicker { .. }));
    }

    #[test]
    fn fade_with_partial_from() {
        let (_, cmds) = parse("2;r=0;g=0;b=255;fa=1000;fr=255").unwrap();
        assert_eq!(
            cmds,
            vec![Command::LedFade {
                to: (0, 0, 255),
                from: (Some(255), None, None),
                duration_ms: 1000
            }]
        );
    }

    #[test]
    fn servo_and_led_in_one_packet() {
        let (_, cmds) = parse("7;bS=30;r=10;g=20;b=30").unwrap();
        assert_eq!(cmds.len(), 2);
        assert!(matches!(cmds[0], Command::Servo { .. }));
        assert!(matches!(cmds[1], Command::LedSet { .. }));
    }

    #[test]
    fn partial_colour_triple_is_ignored() {
        let (_, cmds) = parse("3;r=255;g=0").unwrap();
        assert!(cmds.is_empty());
    }

    #[test]
    fn id_only_packet_is_valid_and_empty() {
        let (id, cmds) = parse("42").unwrap();
        assert_eq!(id, 42);
        assert!(cmds.is_empty());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let (_, cmds) = parse("4;strobe=1;bS=90").unwrap();
        assert_eq!(cmds.len(), 1);
    }

    #[test]
    fn tokens_without_equals_are_skipped() {
        let (_, cmds) = parse("4;garbage;bS=90").unwrap();
        assert_eq!(cmds.len(), 1);
    }

    #[test]
    fn repeated_key_last_wins() {
        let (_, cmds) = parse("4;bS=10;bS=20").unwrap();
        assert_eq!(
            cmds,
            vec![Command::Servo {
                axis: Axis::Base,
                angle_deg: 20.0
            }]
        );
    }

    #[test]
    fn empty_payload_rejected() {
        assert_eq!(parse(""), Err(ParseError::EmptyDatagram));
        assert_eq!(parse("   "), Err(ParseError::EmptyDatagram));
    }

    #[test]
    fn bad_packet_id_rejected() {
        assert_eq!(parse("abc;bS=45"), Err(ParseError::InvalidPacketId));
        assert_eq!(parse("-1;bS=45"), Err(ParseError::InvalidPacketId));
        assert_eq!(parse(";bS=45"), Err(ParseError::InvalidPacketId));
    }

    #[test]
    fn bad_angle_rejected() {
        assert_eq!(
            parse("1;bS=fast"),
            Err(ParseError::InvalidValue { key: "bS" })
        );
    }

    #[test]
    fn colour_out_of_range_rejected() {
        assert_eq!(
            parse("1;r=300;g=0;b=0"),
            Err(ParseError::ChannelOutOfRange {
                key: "r",
                value: 300
            })
        );
        assert_eq!(
            parse("1;r=0;g=-5;b=0"),
            Err(ParseError::ChannelOutOfRange {
                key: "g",
                value: -5
            })
        );
    }

    #[test]
    fn bad_duration_rejected() {
        assert_eq!(
            parse("1;r=0;g=0;b=0;fl=soon"),
            Err(ParseError::InvalidValue { key: "fl" })
        );
    }
}
