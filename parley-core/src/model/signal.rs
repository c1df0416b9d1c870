use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// Network-path candidate record, exchanged out-of-band over the control
/// channel. Field names match the browser-side RTCIceCandidateInit shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateInit {
    pub candidate: String,
    #[serde(rename = "sdpMid")]
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_mline_index: Option<u16>,
}

/// Messages a client sends to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientSignal {
    Join {
        room_id: RoomId,
    },
    Offer {
        target_peer_id: PeerId,
        #[serde(rename = "offer")]
        sdp: String,
    },
    Answer {
        target_peer_id: PeerId,
        #[serde(rename = "answer")]
        sdp: String,
    },
    IceCandidate {
        target_peer_id: PeerId,
        candidate: CandidateInit,
    },
    Leave,
    Chat {
        message: String,
    },
}

/// Messages the server sends to a client. Relayed offers, answers and
/// candidates carry the sender's peer id in place of the original target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerSignal {
    Welcome {
        peer_id: PeerId,
    },
    RoomJoined {
        room_id: RoomId,
        peer_id: PeerId,
        peers: Vec<PeerId>,
    },
    PeerJoined {
        peer_id: PeerId,
    },
    PeerLeft {
        peer_id: PeerId,
    },
    Offer {
        peer_id: PeerId,
        #[serde(rename = "offer")]
        sdp: String,
    },
    Answer {
        peer_id: PeerId,
        #[serde(rename = "answer")]
        sdp: String,
    },
    IceCandidate {
        peer_id: PeerId,
        candidate: CandidateInit,
    },
    Left {
        room_id: RoomId,
    },
    Chat {
        peer_id: PeerId,
        message: String,
        timestamp: i64,
    },
    Error {
        message: String,
    },
}

const CLIENT_SIGNAL_TYPES: &[&str] = &["join", "offer", "answer", "ice-candidate", "leave", "chat"];

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid JSON")]
    InvalidJson(#[source] serde_json::Error),
    #[error("Unknown message type: {0}")]
    UnknownType(String),
    #[error("Malformed {0} message")]
    MalformedPayload(String),
    #[error("Message has no type")]
    MissingType,
}

impl ClientSignal {
    /// Decode an inbound text record, classifying failures so the server
    /// can answer with a precise error: unknown `type` values are reported
    /// by name, known types with bad fields as malformed payloads.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(DecodeError::InvalidJson)?;

        let Some(kind) = value.get("type").and_then(|t| t.as_str()) else {
            return Err(DecodeError::MissingType);
        };

        if !CLIENT_SIGNAL_TYPES.contains(&kind) {
            return Err(DecodeError::UnknownType(kind.to_string()));
        }

        let kind = kind.to_string();
        serde_json::from_value(value).map_err(|_| DecodeError::MalformedPayload(kind))
    }
}

impl ServerSignal {
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
