//! JSON-RPC session over a spawned vault server process.
//!
//! # Responsibility
//! - Spawn the remote-control server and run the initialize handshake.
//! - Exchange newline-delimited JSON-RPC 2.0 frames over its stdio.
//!
//! # Invariants
//! - Request ids are strictly increasing; replies are matched by id.
//! - Frames without the awaited id (notifications, stale replies) are
//!   skipped, never treated as the answer.
//! - The child process is reaped on drop.

use crate::vault::session::{
    PatchOperation, PatchTargetType, VaultError, VaultResult, VaultSession,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// Remote error code the server uses for missing vault files.
const FILE_NOT_FOUND_CODE: i64 = -32002;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: i64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcFrame {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Stdio-attached session with the vault's remote-control server.
pub struct StdioVaultSession {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_request_id: i64,
}

impl StdioVaultSession {
    /// Spawns the server command and performs the initialize handshake.
    pub fn connect(command: &str, args: &[String]) -> VaultResult<Self> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| VaultError::Protocol("server stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VaultError::Protocol("server stdout unavailable".to_string()))?;

        let mut session = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            next_request_id: 0,
        };
        session.call(
            "initialize",
            json!({
                "client": { "name": "inkbridge", "version": env!("CARGO_PKG_VERSION") },
            }),
        )?;
        info!("event=vault_connect module=vault status=ok command={command}");
        Ok(session)
    }

    fn call(&mut self, method: &str, params: Value) -> VaultResult<Value> {
        self.next_request_id += 1;
        let id = self.next_request_id;
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        let mut frame = serde_json::to_string(&request)
            .map_err(|err| VaultError::Protocol(format!("request encoding failed: {err}")))?;
        frame.push('\n');
        self.stdin.write_all(frame.as_bytes())?;
        self.stdin.flush()?;
        debug!("event=vault_call module=vault status=sent method={method} id={id}");

        loop {
            let mut line = String::new();
            let read = self.stdout.read_line(&mut line)?;
            if read == 0 {
                return Err(VaultError::Protocol(format!(
                    "server closed stream before answering request {id}"
                )));
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(result) = decode_frame(trimmed, id)? {
                return Ok(result);
            }
        }
    }
}

impl VaultSession for StdioVaultSession {
    fn get_file_contents(&mut self, path: &str) -> VaultResult<String> {
        let result = self.call("get_file_contents", json!({ "path": path }))?;
        result_as_text(result)
    }

    fn append_content(&mut self, path: &str, content: &str) -> VaultResult<()> {
        self.call(
            "append_content",
            json!({ "path": path, "content": content }),
        )?;
        Ok(())
    }

    fn patch_content(
        &mut self,
        path: &str,
        target_type: PatchTargetType,
        target: &str,
        operation: PatchOperation,
        content: &str,
    ) -> VaultResult<()> {
        self.call(
            "patch_content",
            json!({
                "path": path,
                "target_type": target_type.as_wire(),
                "target": target,
                "operation": operation.as_wire(),
                "content": content,
            }),
        )?;
        Ok(())
    }
}

impl Drop for StdioVaultSession {
    fn drop(&mut self) {
        // Why: reap the spawned server so repeated runs do not leak
        // processes; the server keeps no session state worth a handshake.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Decodes one frame. `Ok(None)` means the frame is not the reply for
/// `request_id` and the caller should keep reading.
fn decode_frame(line: &str, request_id: i64) -> VaultResult<Option<Value>> {
    let frame: RpcFrame = serde_json::from_str(line)
        .map_err(|err| VaultError::Protocol(format!("unparseable server frame: {err}")))?;
    if frame.id != Some(request_id) {
        return Ok(None);
    }
    if let Some(error) = frame.error {
        return Err(remote_error(error));
    }
    match frame.result {
        Some(result) => Ok(Some(result)),
        None => Err(VaultError::Protocol(format!(
            "reply {request_id} carries neither result nor error"
        ))),
    }
}

fn remote_error(body: RpcErrorBody) -> VaultError {
    if body.code == FILE_NOT_FOUND_CODE {
        VaultError::FileNotFound(body.message)
    } else {
        VaultError::Remote {
            code: body.code,
            message: body.message,
        }
    }
}

fn result_as_text(result: Value) -> VaultResult<String> {
    match result {
        Value::String(text) => Ok(text),
        other => Err(VaultError::Protocol(format!(
            "expected text result, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_frame, result_as_text};
    use crate::vault::session::VaultError;
    use serde_json::json;

    #[test]
    fn skips_frames_with_other_ids() {
        let skipped = decode_frame(r#"{"jsonrpc":"2.0","id":7,"result":"x"}"#, 8)
            .expect("foreign frame should not error");
        assert!(skipped.is_none());

        let notification = decode_frame(r#"{"jsonrpc":"2.0","method":"log"}"#, 8)
            .expect("notification should not error");
        assert!(notification.is_none());
    }

    #[test]
    fn returns_matching_result() {
        let result = decode_frame(r#"{"jsonrpc":"2.0","id":3,"result":"body"}"#, 3)
            .expect("matching frame should decode")
            .expect("matching frame should carry the result");
        assert_eq!(result, json!("body"));
    }

    #[test]
    fn maps_file_not_found_code() {
        let err = decode_frame(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32002,"message":"Daily/x.md"}}"#,
            1,
        )
        .expect_err("error frame should fail");
        assert!(matches!(err, VaultError::FileNotFound(path) if path == "Daily/x.md"));
    }

    #[test]
    fn keeps_other_remote_errors_generic() {
        let err = decode_frame(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32600,"message":"bad request"}}"#,
            1,
        )
        .expect_err("error frame should fail");
        assert!(matches!(err, VaultError::Remote { code: -32600, .. }));
    }

    #[test]
    fn rejects_reply_without_result_or_error() {
        let err = decode_frame(r#"{"jsonrpc":"2.0","id":5}"#, 5)
            .expect_err("empty reply should fail");
        assert!(matches!(err, VaultError::Protocol(_)));
    }

    #[test]
    fn rejects_non_text_file_contents() {
        let err = result_as_text(json!({"k": 1})).expect_err("object result should fail");
        assert!(matches!(err, VaultError::Protocol(_)));
    }
}
