//! Reply delivery over a chat transport.

use async_trait::async_trait;
use tracing::{debug, warn};

/// Notice sent after the text fallback when the QR image could not be sent.
pub const QR_DELIVERY_FAILED_NOTICE: &str = "Khong gui duoc anh QR. Vui long thu lai.";

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("delivery failed: {0}")]
    Transport(String),
}

/// How a text body should be interpreted by the chat client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    Plain,
    /// Legacy Markdown; text must be escaped with `escape_markdown`.
    Markdown,
}

/// Outbound side of a chat, bound to the message that triggered the command.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Send an image by URL with a legacy Markdown caption.
    async fn send_photo(&self, url: &str, caption: &str) -> Result<(), DeliveryError>;
    async fn send_text(&self, text: &str, markup: Markup) -> Result<(), DeliveryError>;
    /// Delete the message that triggered the command.
    async fn delete_command(&self) -> Result<(), DeliveryError>;
}

/// A bill reply: QR image location plus Markdown caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillReply {
    pub qr_url: String,
    pub caption: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStrategy {
    PhotoWithCaption,
    /// Caption as a text message, followed by a failure notice.
    TextWithNotice,
}

pub const DELIVERY_STRATEGIES: [DeliveryStrategy; 2] = [
    DeliveryStrategy::PhotoWithCaption,
    DeliveryStrategy::TextWithNotice,
];

impl DeliveryStrategy {
    async fn attempt(self, sink: &dyn ReplySink, reply: &BillReply) -> Result<(), DeliveryError> {
        match self {
            DeliveryStrategy::PhotoWithCaption => sink.send_photo(&reply.qr_url, &reply.caption).await,
            DeliveryStrategy::TextWithNotice => {
                sink.send_text(&reply.caption, Markup::Markdown).await?;
                sink.send_text(QR_DELIVERY_FAILED_NOTICE, Markup::Plain).await
            }
        }
    }
}

/// Try each strategy in order; return the one that succeeded.
///
/// Only the last strategy's error is returned.
pub async fn deliver(
    sink: &dyn ReplySink,
    reply: &BillReply,
    strategies: &[DeliveryStrategy],
) -> Result<DeliveryStrategy, DeliveryError> {
    let mut last_err = DeliveryError::Transport("no delivery strategy configured".into());
    for strategy in strategies {
        match strategy.attempt(sink, reply).await {
            Ok(()) => return Ok(*strategy),
            Err(e) => {
                warn!("Reply delivery via {:?} failed: {}", strategy, e);
                last_err = e;
            }
        }
    }
    Err(last_err)
}

/// Best-effort removal of the triggering message. Failures are logged and
/// discarded.
pub async fn cleanup_command_message(sink: &dyn ReplySink) {
    if let Err(e) = sink.delete_command().await {
        debug!("Ignoring failed command message deletion: {}", e);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Sent {
        Photo { url: String, caption: String },
        Text { text: String, markup: Markup },
        Deleted,
    }

    /// In-memory sink that records every call and fails on demand.
    #[derive(Default)]
    pub struct RecordingSink {
        pub sent: Mutex<Vec<Sent>>,
        pub fail_photo: bool,
        pub fail_text: bool,
        pub fail_delete: bool,
    }

    impl RecordingSink {
        pub fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReplySink for RecordingSink {
        async fn send_photo(&self, url: &str, caption: &str) -> Result<(), DeliveryError> {
            if self.fail_photo {
                return Err(DeliveryError::Transport("image host unreachable".into()));
            }
            self.sent.lock().unwrap().push(Sent::Photo {
                url: url.to_string(),
                caption: caption.to_string(),
            });
            Ok(())
        }

        async fn send_text(&self, text: &str, markup: Markup) -> Result<(), DeliveryError> {
            if self.fail_text {
                return Err(DeliveryError::Transport("chat unreachable".into()));
            }
            self.sent.lock().unwrap().push(Sent::Text {
                text: text.to_string(),
                markup,
            });
            Ok(())
        }

        async fn delete_command(&self) -> Result<(), DeliveryError> {
            if self.fail_delete {
                return Err(DeliveryError::Transport("not enough rights".into()));
            }
            self.sent.lock().unwrap().push(Sent::Deleted);
            Ok(())
        }
    }

    fn reply() -> BillReply {
        BillReply {
            qr_url: "https://img.example/qr.png?amount=1".into(),
            caption: "Thong tin chia bill".into(),
        }
    }

    #[tokio::test]
    async fn test_deliver_photo_first() {
        let sink = RecordingSink::default();
        let used = deliver(&sink, &reply(), &DELIVERY_STRATEGIES).await.unwrap();
        assert_eq!(used, DeliveryStrategy::PhotoWithCaption);
        assert_eq!(
            sink.sent(),
            vec![Sent::Photo {
                url: "https://img.example/qr.png?amount=1".into(),
                caption: "Thong tin chia bill".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_deliver_falls_back_to_text_and_notice() {
        let sink = RecordingSink {
            fail_photo: true,
            ..Default::default()
        };
        let used = deliver(&sink, &reply(), &DELIVERY_STRATEGIES).await.unwrap();
        assert_eq!(used, DeliveryStrategy::TextWithNotice);
        assert_eq!(
            sink.sent(),
            vec![
                Sent::Text {
                    text: "Thong tin chia bill".into(),
                    markup: Markup::Markdown,
                },
                Sent::Text {
                    text: QR_DELIVERY_FAILED_NOTICE.into(),
                    markup: Markup::Plain,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_deliver_fallback_failure_propagates() {
        let sink = RecordingSink {
            fail_photo: true,
            fail_text: true,
            ..Default::default()
        };
        let err = deliver(&sink, &reply(), &DELIVERY_STRATEGIES).await.unwrap_err();
        assert!(err.to_string().contains("chat unreachable"));
    }

    #[tokio::test]
    async fn test_deliver_without_strategies_fails() {
        let sink = RecordingSink::default();
        assert!(deliver(&sink, &reply(), &[]).await.is_err());
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_ignores_failure() {
        let sink = RecordingSink {
            fail_delete: true,
            ..Default::default()
        };
        cleanup_command_message(&sink).await;
        assert!(sink.sent().is_empty());
    }
}
