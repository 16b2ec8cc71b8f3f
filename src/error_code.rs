//! 请求失败分类：连接失败、服务端错误、未找到、其他客户端错误。
//!
//! Request failure classes.
//!
//! Every failed exchange with the Crossref API falls into one of these classes.
//! Each class has its own notification and logging behavior in the client.
//! Only 2xx counts as success.
//!
//! | Class                | Trigger                          | Notified | Logged |
//! |----------------------|----------------------------------|----------|--------|
//! | `connect_failure`    | DNS, TCP, TLS or socket failure, or a body cut short | error | yes |
//! | `server_failure`     | HTTP 5xx                         | error    | yes    |
//! | `not_found`          | HTTP 404                         | warning* | no     |
//! | `other_client_failure` | any other HTTP 4xx             | no       | no     |
//! | `unexpected_status`  | 1xx, unfollowed 3xx, 600+        | no       | no     |
//!
//! \* only on DOI lookups; the existence check treats 404 as a plain `false`.
//!
//! ## Example
//!
//! ```rust
//! use crossref_client::error_code::FailureClass;
//!
//! let class = FailureClass::from_http_status(503).unwrap();
//! assert_eq!(class, FailureClass::ServerFailure);
//! assert_eq!(class.name(), "server_failure");
//! assert!(FailureClass::from_http_status(200).is_none());
//! assert_eq!(FailureClass::from_http_status(304), Some(FailureClass::UnexpectedStatus));
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// The request never produced an HTTP response
    ConnectFailure,
    /// HTTP 5xx
    ServerFailure,
    /// HTTP 404
    NotFound,
    /// HTTP 4xx other than 404
    OtherClientFailure,
    /// Any other non-2xx status
    UnexpectedStatus,
}

impl FailureClass {
    /// Returns the stable name (e.g., `"server_failure"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConnectFailure => "connect_failure",
            Self::ServerFailure => "server_failure",
            Self::NotFound => "not_found",
            Self::OtherClientFailure => "other_client_failure",
            Self::UnexpectedStatus => "unexpected_status",
        }
    }

    /// Whether the user should be told to try again later.
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectFailure | Self::ServerFailure)
    }

    /// Maps an HTTP status code to its failure class.
    ///
    /// Only 2xx statuses are not failures and return `None`.
    pub fn from_http_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            404 => Some(Self::NotFound),
            400..=499 => Some(Self::OtherClientFailure),
            500..=599 => Some(Self::ServerFailure),
            _ => Some(Self::UnexpectedStatus),
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
