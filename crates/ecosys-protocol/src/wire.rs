use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::{InitResponse, OracleCall, TickResponse};

#[derive(Debug, Error)]
pub enum WireError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("empty message")]
    Empty,
}

/// Encode a call as a single JSON line (no trailing newline).
pub fn encode_call(call: &OracleCall) -> Result<String, WireError> {
    encode_line(call)
}

pub fn decode_call(line: &str) -> Result<OracleCall, WireError> {
    decode_line(line)
}

pub fn encode_init_response(response: &InitResponse) -> Result<String, WireError> {
    encode_line(response)
}

pub fn decode_init_response(line: &str) -> Result<InitResponse, WireError> {
    decode_line(line)
}

pub fn encode_tick_response(response: &TickResponse) -> Result<String, WireError> {
    encode_line(response)
}

pub fn decode_tick_response(line: &str) -> Result<TickResponse, WireError> {
    decode_line(line)
}

fn encode_line<T: Serialize>(value: &T) -> Result<String, WireError> {
    // serde_json never emits raw newlines in compact mode, so one value is one line.
    Ok(serde_json::to_string(value)?)
}

fn decode_line<T: DeserializeOwned>(line: &str) -> Result<T, WireError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(WireError::Empty);
    }
    Ok(serde_json::from_str(trimmed)?)
}
