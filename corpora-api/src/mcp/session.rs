//! SSE session bookkeeping for the MCP Streamable-HTTP-over-SSE transport
//! (spec §4.10): each GET /mcp connection gets a session id, and POSTs to
//! `/mcp/message?session_id=...` are delivered back as `event: message`
//! frames on that connection rather than as a direct HTTP response.

use dashmap::DashMap;
use tokio::sync::mpsc;

#[derive(Default)]
pub struct McpSessions {
    channels: DashMap<String, mpsc::UnboundedSender<String>>,
}

impl McpSessions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, session_id: String) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.channels.insert(session_id, tx);
        rx
    }

    /// Returns `false` if the session is unknown (closed, expired, or never
    /// existed) — callers surface that as a 404 to the POSTing client.
    pub fn send(&self, session_id: &str, message: String) -> bool {
        match self.channels.get(session_id) {
            Some(tx) => tx.send(message).is_ok(),
            None => false,
        }
    }

    pub fn remove(&self, session_id: &str) {
        self.channels.remove(session_id);
    }
}
