//! # Wire Messages
//!
//! Every message kind a node can send or receive. [`Message`] is adjacently
//! tagged: on the wire it is `{"type": "<tag>", "payload": {...}}`, the tag
//! being the [`MessageKind`] string used for dispatch.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::{Address, Block, PaxosValue};

/// Number of rumors known per origin.
///
/// Ordered by origin so that comparisons scan origins deterministically.
pub type StatusVector = BTreeMap<Address, u64>;

/// One disseminated message, identified by `(origin, sequence)`.
///
/// Sequences start at 1 and are gapless per origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rumor {
    pub origin: Address,
    pub sequence: u64,
    pub msg: Message,
}

/// Batch of rumors relayed together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RumorsMessage {
    pub rumors: Vec<Rumor>,
}

/// Acknowledges a received packet and carries the sender's status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckMessage {
    pub acked_packet_id: String,
    pub status: StatusVector,
}

/// Anti-entropy status exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusMessage(pub StatusVector);

/// Heartbeat payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyMessage {}

/// Free-text chat payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message: String,
}

/// Broadcastable envelope only processed by the listed recipients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivateMessage {
    pub recipients: BTreeSet<Address>,
    pub msg: Box<Message>,
}

/// Phase 1a: a proposer asks acceptors to promise `id` for `step`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaxosPrepareMessage {
    pub step: u64,
    pub id: u64,
    pub source: Address,
}

/// Phase 1b: an acceptor promises `id`, reporting any value it already
/// accepted in this step (`accepted_id` is 0 when none).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaxosPromiseMessage {
    pub step: u64,
    pub id: u64,
    pub accepted_id: u64,
    pub accepted_value: Option<PaxosValue>,
}

/// Phase 2a: a proposer asks acceptors to accept `value` under `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaxosProposeMessage {
    pub step: u64,
    pub id: u64,
    pub value: PaxosValue,
}

/// Phase 2b: an acceptor announces it accepted `value` under `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaxosAcceptMessage {
    pub step: u64,
    pub id: u64,
    pub value: PaxosValue,
}

/// Threshold logical clock tick: `block` was finalized for `step`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlcMessage {
    pub step: u64,
    pub block: Block,
}

/// Every message kind exchanged between nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Message {
    #[serde(rename = "chat")]
    Chat(ChatMessage),
    #[serde(rename = "rumor")]
    Rumors(RumorsMessage),
    #[serde(rename = "ack")]
    Ack(AckMessage),
    #[serde(rename = "status")]
    Status(StatusMessage),
    #[serde(rename = "empty")]
    Empty(EmptyMessage),
    #[serde(rename = "private")]
    Private(PrivateMessage),
    #[serde(rename = "paxosprepare")]
    PaxosPrepare(PaxosPrepareMessage),
    #[serde(rename = "paxospromise")]
    PaxosPromise(PaxosPromiseMessage),
    #[serde(rename = "paxospropose")]
    PaxosPropose(PaxosProposeMessage),
    #[serde(rename = "paxosaccept")]
    PaxosAccept(PaxosAcceptMessage),
    #[serde(rename = "tlc")]
    Tlc(TlcMessage),
}

/// Discriminant of [`Message`], used as the handler registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    Chat,
    Rumors,
    Ack,
    Status,
    Empty,
    Private,
    PaxosPrepare,
    PaxosPromise,
    PaxosPropose,
    PaxosAccept,
    Tlc,
}

impl MessageKind {
    /// Wire type tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Chat => "chat",
            MessageKind::Rumors => "rumor",
            MessageKind::Ack => "ack",
            MessageKind::Status => "status",
            MessageKind::Empty => "empty",
            MessageKind::Private => "private",
            MessageKind::PaxosPrepare => "paxosprepare",
            MessageKind::PaxosPromise => "paxospromise",
            MessageKind::PaxosPropose => "paxospropose",
            MessageKind::PaxosAccept => "paxosaccept",
            MessageKind::Tlc => "tlc",
        }
    }

    /// Kinds handled by the consensus subsystem.
    pub const CONSENSUS: [MessageKind; 5] = [
        MessageKind::PaxosPrepare,
        MessageKind::PaxosPromise,
        MessageKind::PaxosPropose,
        MessageKind::PaxosAccept,
        MessageKind::Tlc,
    ];
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Chat(_) => MessageKind::Chat,
            Message::Rumors(_) => MessageKind::Rumors,
            Message::Ack(_) => MessageKind::Ack,
            Message::Status(_) => MessageKind::Status,
            Message::Empty(_) => MessageKind::Empty,
            Message::Private(_) => MessageKind::Private,
            Message::PaxosPrepare(_) => MessageKind::PaxosPrepare,
            Message::PaxosPromise(_) => MessageKind::PaxosPromise,
            Message::PaxosPropose(_) => MessageKind::PaxosPropose,
            Message::PaxosAccept(_) => MessageKind::PaxosAccept,
            Message::Tlc(_) => MessageKind::Tlc,
        }
    }

    /// Wire type tag of this message.
    pub fn type_name(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn chat(text: impl Into<String>) -> Self {
        Message::Chat(ChatMessage {
            message: text.into(),
        })
    }

    pub fn empty() -> Self {
        Message::Empty(EmptyMessage {})
    }

    pub fn status(status: StatusVector) -> Self {
        Message::Status(StatusMessage(status))
    }

    /// Wrap `msg` so that only `recipients` process it.
    pub fn private<I>(recipients: I, msg: Message) -> Self
    where
        I: IntoIterator<Item = Address>,
    {
        Message::Private(PrivateMessage {
            recipients: recipients.into_iter().collect(),
            msg: Box::new(msg),
        })
    }
}
