//! Decoding of the daemon's tabular JSON responses
//!
//! List endpoints answer with `{"header": [...], "rows": [[...], ...]}`.
//! Rows are decoded by column name, so extra or reordered columns from
//! other daemon versions are harmless.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::Value;

/// Raw `{header, rows}` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestTable {
    pub header: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl RestTable {
    pub fn column(&self, name: &str) -> Result<usize> {
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("Response has no `{}` column", name))
    }

    /// Decode every row into `T`
    pub fn decode<T: FromRow>(&self) -> Result<Vec<T>> {
        let columns = T::columns(self)?;
        self.rows
            .iter()
            .map(|row| T::from_row(&columns, row))
            .collect()
    }
}

/// A typed row decodable from a [`RestTable`]
pub trait FromRow: Sized {
    /// Column indices this row type reads, resolved once per table
    type Columns;

    fn columns(table: &RestTable) -> Result<Self::Columns>;
    fn from_row(columns: &Self::Columns, row: &[Value]) -> Result<Self>;
}

fn cell(row: &[Value], index: usize) -> &Value {
    row.get(index).unwrap_or(&Value::Null)
}

fn text(row: &[Value], index: usize) -> Option<String> {
    match cell(row, index) {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn required_text(row: &[Value], index: usize, name: &str) -> Result<String> {
    text(row, index).ok_or_else(|| anyhow!("Row is missing `{}`", name))
}

fn optional_column(table: &RestTable, name: &str) -> Option<usize> {
    table.column(name).ok()
}

/// Identity from the keyring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub sid: String,
    pub did: Option<String>,
    pub name: Option<String>,
}

pub struct IdentityColumns {
    sid: usize,
    did: Option<usize>,
    name: Option<usize>,
}

impl FromRow for Identity {
    type Columns = IdentityColumns;

    fn columns(table: &RestTable) -> Result<Self::Columns> {
        Ok(IdentityColumns {
            sid: table.column("sid")?,
            did: optional_column(table, "did"),
            name: optional_column(table, "name"),
        })
    }

    fn from_row(columns: &Self::Columns, row: &[Value]) -> Result<Self> {
        Ok(Self {
            sid: required_text(row, columns.sid, "sid")?,
            did: columns.did.and_then(|i| text(row, i)),
            name: columns.name.and_then(|i| text(row, i)),
        })
    }
}

/// Rhizome bundle summary from the bundle list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub service: String,
    /// Bundle id (BID)
    pub id: String,
    /// Payload size in bytes (0 for bundles without payload)
    pub filesize: u64,
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub name: Option<String>,
}

pub struct BundleColumns {
    service: usize,
    id: usize,
    filesize: usize,
    sender: Option<usize>,
    recipient: Option<usize>,
    name: Option<usize>,
}

impl FromRow for Bundle {
    type Columns = BundleColumns;

    fn columns(table: &RestTable) -> Result<Self::Columns> {
        Ok(BundleColumns {
            service: table.column("service")?,
            id: table.column("id")?,
            filesize: table.column("filesize")?,
            sender: optional_column(table, "sender"),
            recipient: optional_column(table, "recipient"),
            name: optional_column(table, "name"),
        })
    }

    fn from_row(columns: &Self::Columns, row: &[Value]) -> Result<Self> {
        Ok(Self {
            service: text(row, columns.service).unwrap_or_default(),
            id: required_text(row, columns.id, "id")?,
            filesize: cell(row, columns.filesize).as_u64().unwrap_or(0),
            sender: columns.sender.and_then(|i| text(row, i)),
            recipient: columns.recipient.and_then(|i| text(row, i)),
            name: columns.name.and_then(|i| text(row, i)),
        })
    }
}

/// MeshMS conversation with one remote SID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub their_sid: String,
    pub read: bool,
}

pub struct ConversationColumns {
    their_sid: usize,
    read: usize,
}

impl FromRow for Conversation {
    type Columns = ConversationColumns;

    fn columns(table: &RestTable) -> Result<Self::Columns> {
        Ok(ConversationColumns {
            their_sid: table.column("their_sid")?,
            read: table.column("read")?,
        })
    }

    fn from_row(columns: &Self::Columns, row: &[Value]) -> Result<Self> {
        Ok(Self {
            their_sid: required_text(row, columns.their_sid, "their_sid")?,
            read: cell(row, columns.read).as_bool().unwrap_or(false),
        })
    }
}

/// Direction/type of a MeshMS list entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// `>`: sent by us
    Sent,
    /// `<`: received
    Received,
    /// `ACK` and anything else the daemon adds
    Other(String),
}

impl MessageKind {
    pub fn parse(s: &str) -> Self {
        match s {
            ">" => MessageKind::Sent,
            "<" => MessageKind::Received,
            other => MessageKind::Other(other.to_string()),
        }
    }

    pub fn marker(&self) -> &str {
        match self {
            MessageKind::Sent => ">",
            MessageKind::Received => "<",
            MessageKind::Other(s) => s,
        }
    }

    /// Whether the entry carries message text
    pub fn is_text(&self) -> bool {
        matches!(self, MessageKind::Sent | MessageKind::Received)
    }
}

/// MeshMS message list entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: Option<String>,
    /// Unix seconds, when the daemon reports one
    pub timestamp: Option<i64>,
}

pub struct MessageColumns {
    kind: usize,
    text: usize,
    timestamp: Option<usize>,
}

impl FromRow for Message {
    type Columns = MessageColumns;

    fn columns(table: &RestTable) -> Result<Self::Columns> {
        Ok(MessageColumns {
            kind: table.column("type")?,
            text: table.column("text")?,
            timestamp: optional_column(table, "timestamp"),
        })
    }

    fn from_row(columns: &Self::Columns, row: &[Value]) -> Result<Self> {
        Ok(Self {
            kind: MessageKind::parse(&text(row, columns.kind).unwrap_or_default()),
            text: text(row, columns.text),
            timestamp: columns.timestamp.and_then(|i| cell(row, i).as_i64()),
        })
    }
}
