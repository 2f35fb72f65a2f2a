//! Wire format selection for an ingestion session.

use serde::{Deserialize, Serialize};

/// Wire format of a telemetry stream.
///
/// The format selects both the framing strategy that locates frame
/// boundaries in the byte stream and the decode strategy applied to each
/// payload. Exactly one format is active per session; they are never
/// mixed on one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    /// 4-byte big-endian length prefix followed by a MessagePack
    /// map-keyed payload, repeated per frame.
    MsgPack,

    /// UTF-8 text, one JSON object per line, each terminated by `\n`.
    JsonLines,
}

impl WireFormat {
    /// Short name used in log output and error context.
    pub fn name(self) -> &'static str {
        match self {
            WireFormat::MsgPack => "msgpack",
            WireFormat::JsonLines => "json_lines",
        }
    }
}

impl std::fmt::Display for WireFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_are_stable() {
        assert_eq!(serde_json::to_string(&WireFormat::MsgPack).unwrap(), "\"msg_pack\"");
        assert_eq!(serde_json::to_string(&WireFormat::JsonLines).unwrap(), "\"json_lines\"");
    }
}
