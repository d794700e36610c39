// Built-in checks

use crate::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

// Common regex patterns
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<scheme>[a-zA-Z][a-zA-Z0-9+.-]*)://(?:[^\s/?#@]+@)?(?P<host>\[[0-9a-fA-F:.]+\]|[a-zA-Z0-9](?:[a-zA-Z0-9.-]*[a-zA-Z0-9])?)(?::\d{1,5})?(?P<path>/[^\s?#]*)?(?:\?(?P<query>[^\s#]*))?(?:#\S*)?$",
    )
    .unwrap()
});

static FLOAT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").unwrap());

static FLOAT_THOUSAND_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d*)?(?:[eE][+-]?\d+)?$").unwrap()
});

static INT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?(?:0|[1-9]\d*)$").unwrap());

/// Valid email address
pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// URL options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlFlags {
    /// Require a path after the host
    pub path_required: bool,
    /// Require a query string
    pub query_required: bool,
}

impl UrlFlags {
    pub fn path_required(mut self) -> Self {
        self.path_required = true;
        self
    }

    pub fn query_required(mut self) -> Self {
        self.query_required = true;
        self
    }
}

/// Valid `scheme://host[:port][/path][?query][#fragment]` URL
pub fn is_url(value: &str, flags: UrlFlags) -> bool {
    let Some(caps) = URL_REGEX.captures(value) else {
        return false;
    };
    if flags.path_required && caps.name("path").is_none() {
        return false;
    }
    if flags.query_required && caps.name("query").is_none_or(|q| q.as_str().is_empty()) {
        return false;
    }
    true
}

/// IP address options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IpFlags {
    /// Accept IPv4 only
    pub ipv4: bool,
    /// Accept IPv6 only
    pub ipv6: bool,
    /// Reject private ranges
    pub no_private_range: bool,
    /// Reject reserved ranges
    pub no_reserved_range: bool,
}

impl IpFlags {
    pub fn ipv4() -> Self {
        Self {
            ipv4: true,
            ..Self::default()
        }
    }

    pub fn ipv6() -> Self {
        Self {
            ipv6: true,
            ..Self::default()
        }
    }

    pub fn no_private_range(mut self) -> Self {
        self.no_private_range = true;
        self
    }

    pub fn no_reserved_range(mut self) -> Self {
        self.no_reserved_range = true;
        self
    }
}

/// Valid IPv4 or IPv6 address under `flags`.
///
/// Setting both `ipv4` and `ipv6`, or neither, accepts either family.
pub fn is_ip(value: &str, flags: IpFlags) -> bool {
    let Ok(addr) = value.parse::<IpAddr>() else {
        return false;
    };

    let family_ok = match addr {
        IpAddr::V4(_) => flags.ipv4 || !flags.ipv6,
        IpAddr::V6(_) => flags.ipv6 || !flags.ipv4,
    };
    if !family_ok {
        return false;
    }

    match addr {
        IpAddr::V4(v4) => {
            !(flags.no_private_range && v4.is_private())
                && !(flags.no_reserved_range && is_reserved_v4(&v4))
        }
        IpAddr::V6(v6) => {
            !(flags.no_private_range && is_unique_local_v6(&v6))
                && !(flags.no_reserved_range && is_reserved_v6(&v6))
        }
    }
}

fn is_reserved_v4(addr: &Ipv4Addr) -> bool {
    let [first, ..] = addr.octets();
    first == 0 || first >= 240 || addr.is_loopback() || addr.is_link_local()
}

fn is_unique_local_v6(addr: &Ipv6Addr) -> bool {
    addr.segments()[0] & 0xfe00 == 0xfc00
}

fn is_reserved_v6(addr: &Ipv6Addr) -> bool {
    addr.is_unspecified()
        || addr.is_loopback()
        || addr.segments()[0] & 0xffc0 == 0xfe80
        || addr.to_ipv4_mapped().is_some()
}

/// Float options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatFlags {
    /// Accept `,` thousand separators (`1,234.5`)
    pub allow_thousand: bool,
}

/// Decimal or scientific float literal
pub fn is_float(value: &str, flags: FloatFlags) -> bool {
    let value = value.trim();
    if flags.allow_thousand {
        FLOAT_THOUSAND_REGEX.is_match(value)
    } else {
        FLOAT_REGEX.is_match(value)
    }
}

/// Interpret `1/true/yes/on` and `0/false/no/off` (case-insensitive)
pub fn parse_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Int(1) => Some(true),
        Value::Int(0) => Some(false),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Parse an integer literal without leading zeros
pub fn parse_int(value: &str) -> Option<i64> {
    let value = value.trim();
    if INT_REGEX.is_match(value) {
        value.parse().ok()
    } else {
        None
    }
}
