//! Gemini status codes as a typed enum.
//!
//! Every Gemini response starts with a two-digit status. The first digit is
//! the [`Category`]; the second refines it. Use [`Status`] anywhere a status
//! is accepted: [`ResponseWriter::write_status`](crate::ResponseWriter::write_status),
//! [`ResponseWriter::redirect`](crate::ResponseWriter::redirect), or
//! [`RequestError::status`](crate::RequestError::status).
//!
//! ```rust
//! use ursa::{Category, Status};
//!
//! assert_eq!(u8::from(Status::NotFound), 51);
//! assert_eq!(Status::Redirect.category(), Category::Redirect);
//! ```

use std::fmt;

/// All status codes defined by the Gemini specification.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Status {
    // ── 1x Input ──────────────────────────────────────────────────────────────
    Input,                     // 10
    SensitiveInput,            // 11

    // ── 2x Success ────────────────────────────────────────────────────────────
    Success,                   // 20

    // ── 3x Redirect ───────────────────────────────────────────────────────────
    Redirect,                  // 30
    PermanentRedirect,         // 31

    // ── 4x Temporary failure ──────────────────────────────────────────────────
    TemporaryFailure,          // 40
    ServerUnavailable,         // 41
    CgiError,                  // 42
    ProxyError,                // 43
    SlowDown,                  // 44

    // ── 5x Permanent failure ──────────────────────────────────────────────────
    PermanentFailure,          // 50
    NotFound,                  // 51
    Gone,                      // 52
    ProxyRequestRefused,       // 53
    BadRequest,                // 59

    // ── 6x Client certificates ────────────────────────────────────────────────
    ClientCertificateRequired, // 60
    CertificateNotAuthorised,  // 61
    CertificateNotValid,       // 62
}

/// The status class, i.e. the first digit of the code.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Category {
    Input,
    Success,
    Redirect,
    TemporaryFailure,
    PermanentFailure,
    ClientCertificate,
}

impl Status {
    pub fn category(self) -> Category {
        match u8::from(self) / 10 {
            1 => Category::Input,
            2 => Category::Success,
            3 => Category::Redirect,
            4 => Category::TemporaryFailure,
            5 => Category::PermanentFailure,
            _ => Category::ClientCertificate,
        }
    }

    /// Default meta text for statuses written without a caller-supplied
    /// message (failures and certificate requests).
    pub fn text(self) -> &'static str {
        match self {
            Self::Input                     => "input",
            Self::SensitiveInput            => "sensitive input",
            Self::Success                   => "success",
            Self::Redirect                  => "redirect",
            Self::PermanentRedirect         => "permanent redirect",
            Self::TemporaryFailure          => "temporary failure",
            Self::ServerUnavailable         => "server unavailable",
            Self::CgiError                  => "cgi error",
            Self::ProxyError                => "proxy error",
            Self::SlowDown                  => "slow down",
            Self::PermanentFailure          => "permanent failure",
            Self::NotFound                  => "not found",
            Self::Gone                      => "gone",
            Self::ProxyRequestRefused       => "proxy request refused",
            Self::BadRequest                => "bad request",
            Self::ClientCertificateRequired => "client certificate required",
            Self::CertificateNotAuthorised  => "certificate not authorised",
            Self::CertificateNotValid       => "certificate not valid",
        }
    }
}

impl From<Status> for u8 {
    fn from(s: Status) -> u8 {
        match s {
            Status::Input                     => 10,
            Status::SensitiveInput            => 11,
            Status::Success                   => 20,
            Status::Redirect                  => 30,
            Status::PermanentRedirect         => 31,
            Status::TemporaryFailure          => 40,
            Status::ServerUnavailable         => 41,
            Status::CgiError                  => 42,
            Status::ProxyError                => 43,
            Status::SlowDown                  => 44,
            Status::PermanentFailure          => 50,
            Status::NotFound                  => 51,
            Status::Gone                      => 52,
            Status::ProxyRequestRefused       => 53,
            Status::BadRequest                => 59,
            Status::ClientCertificateRequired => 60,
            Status::CertificateNotAuthorised  => 61,
            Status::CertificateNotValid       => 62,
        }
    }
}

/// Formats as the two-digit wire code, e.g. `51`.
impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", u8::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_the_protocol() {
        assert_eq!(u8::from(Status::Input), 10);
        assert_eq!(u8::from(Status::Success), 20);
        assert_eq!(u8::from(Status::Redirect), 30);
        assert_eq!(u8::from(Status::NotFound), 51);
        assert_eq!(u8::from(Status::BadRequest), 59);
        assert_eq!(u8::from(Status::CertificateNotValid), 62);
    }

    #[test]
    fn categories_follow_first_digit() {
        assert_eq!(Status::SensitiveInput.category(), Category::Input);
        assert_eq!(Status::Success.category(), Category::Success);
        assert_eq!(Status::PermanentRedirect.category(), Category::Redirect);
        assert_eq!(Status::SlowDown.category(), Category::TemporaryFailure);
        assert_eq!(Status::NotFound.category(), Category::PermanentFailure);
        assert_eq!(Status::CertificateNotAuthorised.category(), Category::ClientCertificate);
    }

    #[test]
    fn display_is_two_digits() {
        assert_eq!(Status::Input.to_string(), "10");
        assert_eq!(Status::ProxyRequestRefused.to_string(), "53");
    }
}
