//! MCP connection stack: protocol types, transports, the connection
//! cache, and the connector adapter.

pub mod client;
pub mod connector;
pub mod error;
pub mod manager;
pub mod protocol;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory scripted server for transport-free tests.

    use serde_json::{Value, json};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

    use super::client::McpClient;
    use super::transport::Transport;

    /// Build a handshaken client talking to an in-memory scripted
    /// server. With `respond_pings` false the server hangs up on the
    /// first `ping`, which is how a dead connection looks to a probe.
    pub async fn scripted_client(respond_pings: bool) -> McpClient {
        let (ours, theirs) = tokio::io::duplex(8192);
        tokio::spawn(run_scripted_server(theirs, respond_pings));

        let (read, write) = tokio::io::split(ours);
        McpClient::initialize(Transport::from_io(read, write), "fake")
            .await
            .expect("handshake against scripted server")
    }

    async fn run_scripted_server(io: DuplexStream, respond_pings: bool) {
        let (read, mut write) = tokio::io::split(io);
        let mut reader = BufReader::new(read);
        let mut line = String::new();

        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) | Err(_) => return,
                Ok(_) => {}
            }
            let Ok(frame) = serde_json::from_str::<Value>(line.trim()) else {
                continue;
            };
            // Notifications (no id) need no reply.
            let Some(id) = frame.get("id").and_then(|i| i.as_u64()) else {
                continue;
            };
            let method = frame.get("method").and_then(|m| m.as_str()).unwrap_or("");

            let body = match method {
                "initialize" => json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "serverInfo": {"name": "fake", "version": "0.0.1"}
                }),
                "ping" => {
                    if respond_pings {
                        json!({})
                    } else {
                        return; // hang up: a dead server from the probe's view
                    }
                }
                "tools/list" => {
                    // Interleave a notification so clients must skip it.
                    let notice =
                        json!({"jsonrpc": "2.0", "method": "notifications/progress", "params": {}});
                    send_line(&mut write, &notice).await;
                    json!({
                        "tools": [{
                            "name": "get_weather",
                            "description": "Current weather for a city",
                            "inputSchema": {
                                "type": "object",
                                "properties": {
                                    "city": {"type": "string", "description": "City name"}
                                },
                                "required": ["city"]
                            }
                        }]
                    })
                }
                "tools/call" => json!({"content": [{"type": "text", "text": "sunny"}]}),
                "resources/list" => {
                    json!({"resources": [{"uri": "mem://greeting", "name": "Greeting"}]})
                }
                "resources/read" => {
                    json!({"contents": [{"uri": "mem://greeting", "text": "hello"}]})
                }
                _ => {
                    let error = json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "error": {"code": -32601, "message": "Method not found"}
                    });
                    send_line(&mut write, &error).await;
                    continue;
                }
            };

            let response = json!({"jsonrpc": "2.0", "id": id, "result": body});
            send_line(&mut write, &response).await;
        }
    }

    async fn send_line(write: &mut (impl AsyncWriteExt + Unpin), value: &Value) {
        let mut payload = value.to_string();
        payload.push('\n');
        let _ = write.write_all(payload.as_bytes()).await;
        let _ = write.flush().await;
    }
}
