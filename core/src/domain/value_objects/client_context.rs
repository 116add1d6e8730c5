//! Request metadata captured at the API boundary and stored with each session.

use serde::{Deserialize, Serialize};

/// Maximum stored length of `device_info`, in characters
pub const MAX_DEVICE_INFO_LENGTH: usize = 500;

/// Maximum stored length of `ip_address`, in characters (fits IPv6 text form)
pub const MAX_IP_ADDRESS_LENGTH: usize = 45;

/// Optional client description attached to a refresh token
///
/// Values are truncated on construction so they always fit their columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContext {
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
}

impl ClientContext {
    pub fn new(device_info: Option<&str>, ip_address: Option<&str>) -> Self {
        Self {
            device_info: device_info.and_then(|v| clip(v, MAX_DEVICE_INFO_LENGTH)),
            ip_address: ip_address.and_then(|v| clip(v, MAX_IP_ADDRESS_LENGTH)),
        }
    }

    /// Re-applies the length bounds, for contexts built field by field
    pub fn sanitized(&self) -> Self {
        Self::new(self.device_info.as_deref(), self.ip_address.as_deref())
    }
}

// Blank values are stored as NULL.
fn clip(value: &str, max_chars: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(max_chars).collect())
}
