//! Client-side checks that run before anything is sent.

use serde_json::{Map, Value};
use thiserror::Error;

/// Dabba in one packet.
pub const DABBA_PER_PACKET: u32 = 16;

/// Largest dabba count the fractional part may encode.
pub const MAX_DABBA: u32 = 15;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Dabba count cannot exceed 15. Please use format: packets.dabbas (e.g., 5.15 for 5 packets and 15 dabbas)")]
    DabbaOverflow { dabba: u32 },

    #[error("`{0}` is not a number")]
    NotANumber(String),

    #[error("New passwords do not match!")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}

/// A packet quantity split into whole packets and dabba.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketCount {
    pub packets: i64,
    pub dabba: u32,
}

impl PacketCount {
    /// Two fractional digits are the dabba count: `5.15` is 5 packets, 15 dabba.
    pub fn from_decimal(value: f64) -> Self {
        let packets = value.floor();
        let dabba = ((value - packets) * 100.0).round() as u32;
        Self {
            packets: packets as i64,
            dabba,
        }
    }

    /// Quantity expressed in dabba.
    pub fn total_dabba(&self) -> i64 {
        self.packets * DABBA_PER_PACKET as i64 + self.dabba as i64
    }
}

/// Accepts `packets.dabba` input when the dabba part is at most 15.
pub fn validate_packet_input(input: &str) -> Result<f64, ValidationError> {
    let value: f64 = input
        .trim()
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| ValidationError::NotANumber(input.to_string()))?;

    let count = PacketCount::from_decimal(value);
    if count.dabba > MAX_DABBA {
        return Err(ValidationError::DabbaOverflow { dabba: count.dabba });
    }
    Ok(value)
}

/// Check `field` of a request body with [`validate_packet_input`]. A missing field passes.
pub fn validate_packet_field(body: &Map<String, Value>, field: &str) -> Result<(), ValidationError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(s)) => validate_packet_input(s).map(|_| ()),
        Some(other) => validate_packet_input(&other.to_string()).map(|_| ()),
    }
}

pub fn validate_password_change(new_password: &str, confirm: &str) -> Result<(), ValidationError> {
    if new_password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}
