// Engine.IO v4 / Socket.IO v5 text framing.
//
// Only the subset the relay needs: text frames over a WebSocket transport,
// the default namespace, no binary attachments.

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

pub(crate) const PONG: &str = "3";
pub(crate) const SOCKET_DISCONNECT: &str = "41";

/// Body of the Engine.IO `0` open packet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Handshake {
    #[serde(default)]
    pub sid: String,
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
}

fn default_ping_interval() -> u64 {
    25_000
}

fn default_ping_timeout() -> u64 {
    20_000
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EnginePacket {
    Open(String),
    Close,
    Ping,
    Pong,
    Message(String),
    Noop,
}

pub(crate) fn decode_engine(frame: &str) -> Result<EnginePacket, Error> {
    let mut chars = frame.chars();
    let kind = chars
        .next()
        .ok_or_else(|| Error::Protocol("empty Engine.IO frame".into()))?;
    let rest = chars.as_str();
    Ok(match kind {
        '0' => EnginePacket::Open(rest.to_owned()),
        '1' => EnginePacket::Close,
        '2' => EnginePacket::Ping,
        '3' => EnginePacket::Pong,
        '4' => EnginePacket::Message(rest.to_owned()),
        '5' | '6' => EnginePacket::Noop,
        other => {
            return Err(Error::Protocol(format!(
                "unknown Engine.IO packet type {other:?}"
            )));
        }
    })
}

pub(crate) fn parse_handshake(body: &str) -> Result<Handshake, Error> {
    serde_json::from_str(body)
        .map_err(|e| Error::Protocol(format!("invalid Engine.IO handshake: {e}")))
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SocketPacket {
    Connect { sid: Option<String> },
    Disconnect,
    Event { name: String, payload: Value },
    Ack,
    ConnectError { message: String },
}

/// Decode the Socket.IO packet carried inside an Engine.IO `4` message.
///
/// Layout: `<type>[<attachments>-][/<namespace>,][<ack id>][<json>]`.
pub(crate) fn decode_socket(body: &str) -> Result<SocketPacket, Error> {
    let mut chars = body.chars();
    let kind = chars
        .next()
        .ok_or_else(|| Error::Protocol("empty Socket.IO packet".into()))?;
    let mut rest = chars.as_str();

    if matches!(kind, '5' | '6') {
        return Err(Error::Protocol("binary Socket.IO packets are not supported".into()));
    }

    if rest.starts_with('/') {
        rest = rest.split_once(',').map_or("", |(_, tail)| tail);
    }
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());
    let json = || -> Result<Value, Error> {
        if rest.is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str(rest)
                .map_err(|e| Error::Protocol(format!("invalid Socket.IO payload: {e}")))
        }
    };

    Ok(match kind {
        '0' => SocketPacket::Connect {
            sid: json()?
                .get("sid")
                .and_then(Value::as_str)
                .map(String::from),
        },
        '1' => SocketPacket::Disconnect,
        '2' => {
            let Value::Array(mut items) = json()? else {
                return Err(Error::Protocol("event packet is not an array".into()));
            };
            if items.is_empty() {
                return Err(Error::Protocol("event packet without a name".into()));
            }
            let name = match items.remove(0) {
                Value::String(name) => name,
                other => {
                    return Err(Error::Protocol(format!("event name is not a string: {other}")));
                }
            };
            let payload = match items.len() {
                0 => Value::Null,
                1 => items.remove(0),
                _ => Value::Array(items),
            };
            SocketPacket::Event { name, payload }
        }
        '3' => SocketPacket::Ack,
        '4' => {
            let value = json()?;
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .map(String::from)
                .or_else(|| value.as_str().map(String::from))
                .unwrap_or_else(|| "connection refused".into());
            SocketPacket::ConnectError { message }
        }
        other => {
            return Err(Error::Protocol(format!(
                "unknown Socket.IO packet type {other:?}"
            )));
        }
    })
}

/// `40` namespace connect, carrying the auth object when there is one.
pub(crate) fn encode_connect(auth: Option<&Value>) -> String {
    match auth {
        Some(auth) => format!("40{auth}"),
        None => "40".to_owned(),
    }
}

/// `42["name",payload]`
pub(crate) fn encode_event(name: &str, payload: &Value) -> String {
    format!("42{}", Value::Array(vec![Value::String(name.to_owned()), payload.clone()]))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn engine_frames() {
        assert_eq!(decode_engine("2").unwrap(), EnginePacket::Ping);
        assert_eq!(
            decode_engine("42[\"x\"]").unwrap(),
            EnginePacket::Message("2[\"x\"]".into())
        );
        assert!(decode_engine("").is_err());
        assert!(decode_engine("9").is_err());
    }

    #[test]
    fn handshake_defaults() {
        let hs = parse_handshake(r#"{"sid":"abc","pingInterval":1000,"upgrades":[]}"#).unwrap();
        assert_eq!(hs.sid, "abc");
        assert_eq!(hs.ping_interval, 1000);
        assert_eq!(hs.ping_timeout, 20_000);
    }

    #[test]
    fn event_with_single_payload() {
        let packet = decode_socket(r#"2["guest.checked_in",{"id":4}]"#).unwrap();
        assert_eq!(
            packet,
            SocketPacket::Event {
                name: "guest.checked_in".into(),
                payload: json!({ "id": 4 }),
            }
        );
    }

    #[test]
    fn event_with_namespace_and_ack_id() {
        let packet = decode_socket(r#"2/admin,17["sessions.cleared"]"#).unwrap();
        assert_eq!(
            packet,
            SocketPacket::Event {
                name: "sessions.cleared".into(),
                payload: Value::Null,
            }
        );
    }

    #[test]
    fn connect_and_connect_error() {
        assert_eq!(
            decode_socket(r#"0{"sid":"s1"}"#).unwrap(),
            SocketPacket::Connect { sid: Some("s1".into()) }
        );
        assert_eq!(
            decode_socket(r#"4{"message":"invalid token"}"#).unwrap(),
            SocketPacket::ConnectError { message: "invalid token".into() }
        );
    }

    #[test]
    fn encoders() {
        assert_eq!(encode_connect(None), "40");
        assert_eq!(encode_connect(Some(&json!({ "token": "t" }))), r#"40{"token":"t"}"#);
        assert_eq!(
            encode_event("join_property", &json!("12")),
            r#"42["join_property","12"]"#
        );
    }
}
