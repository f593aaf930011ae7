//! Wire contract between the ecosystem simulation and an external decision oracle.
//!
//! The simulation never depends on how an oracle is built; it only exchanges the
//! messages defined here. Any transport that preserves these fields is acceptable,
//! the bundled codec uses one JSON document per line.

#![forbid(unsafe_code)]

pub mod message;
pub mod types;
pub mod wire;

pub use message::{
    Decision, InitRequest, InitResponse, OracleCall, RewardEvent, TickRequest, TickResponse,
};
pub use types::{Bounds, CoinView, PlayerView, ZoneRect};
pub use wire::{
    decode_call, decode_init_response, decode_tick_response, encode_call, encode_init_response,
    encode_tick_response, WireError,
};
