// SPDX-License-Identifier: Apache-2.0

//! Scan target value object and host validation.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, WaspError};

/// Host used when a request omits one.
pub const DEFAULT_HOST: &str = "localhost";

/// Port used when a request passes 0.
pub const DEFAULT_PORT: u16 = 80;

/// The target of one scan: host, port, and an optional virtual host
/// override. Immutable once constructed and cloned into every scanner
/// invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    /// Hostname or IP address.
    pub host: String,
    /// TCP port. Never 0 after construction.
    pub port: u16,
    /// Virtual host header override.
    pub vhost: Option<String>,
}

impl ScanTarget {
    /// Build a target, substituting defaults for an empty host or port 0.
    #[must_use]
    pub fn new(host: &str, port: u16, vhost: Option<String>) -> Self {
        Self {
            host: if host.is_empty() {
                DEFAULT_HOST.to_string()
            } else {
                host.to_string()
            },
            port: if port == 0 { DEFAULT_PORT } else { port },
            vhost: vhost.filter(|v| !v.is_empty()),
        }
    }

    /// The `http://host:port` URL for this target.
    ///
    /// IPv6 literals are bracketed so the port separator stays unambiguous.
    #[must_use]
    pub fn url(&self) -> String {
        if self.host.contains(':') {
            format!("http://[{}]:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

impl Default for ScanTarget {
    fn default() -> Self {
        Self::new("", 0, None)
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

fn host_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Hostname labels, IPv4 dotted quads, or IPv6 hex groups.
        Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9.-]*[A-Za-z0-9])?$|^[0-9A-Fa-f:]+$")
            .expect("valid host pattern")
    })
}

/// Validate a request host field.
///
/// An empty host is accepted (the default applies). Anything else must look
/// like a hostname or IP literal; shell metacharacters and whitespace are
/// rejected before a host ever reaches a scanner argument list.
pub fn validate_host(host: &str) -> Result<()> {
    if host.is_empty() {
        return Ok(());
    }
    if host.len() > 253 {
        return Err(WaspError::Validation {
            message: format!("host too long: {} characters", host.len()),
        });
    }
    if !host_pattern().is_match(host) {
        return Err(WaspError::Validation {
            message: format!("invalid host: {host:?}"),
        });
    }
    Ok(())
}
