use axum::http::StatusCode;
use thiserror::Error;

/// Errors raised while loading a channel.
///
/// Markup problems never show up here: a post that cannot be understood is
/// skipped instead.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel name is required")]
    ChannelRequired,
    #[error("Failed to fetch channel {channel}: HTTP {status}")]
    Fetch { channel: String, status: u16 },
    /// Telegram redirects handles it does not know to a generic page.
    #[error("Unknown channel: {channel}")]
    UnknownChannel { channel: String },
    #[error("Failed to fetch channel: {0}")]
    Http(#[from] reqwest::Error),
}

impl ChannelError {
    /// HTTP status to answer with when this error ends a feed request.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ChannelRequired => StatusCode::BAD_REQUEST,
            Self::UnknownChannel { .. } => StatusCode::NOT_FOUND,
            Self::Fetch { .. } | Self::Http(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_distinguish_unknown_from_failed() {
        assert_eq!(
            ChannelError::ChannelRequired.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ChannelError::UnknownChannel {
                channel: "nope".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ChannelError::Fetch {
                channel: "durov".to_string(),
                status: 500
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ChannelError::UnknownChannel {
                channel: "nope".to_string()
            }
            .to_string(),
            "Unknown channel: nope"
        );
        assert_eq!(
            ChannelError::ChannelRequired.to_string(),
            "Channel name is required"
        );
    }
}
