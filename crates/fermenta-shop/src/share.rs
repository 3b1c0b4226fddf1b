//! # Order Channel
//!
//! The outbound side of an order: a formatted summary string handed to
//! whatever channel the platform offers (deep link, clipboard, native share
//! sheet). The session only ever sees the [`MessageSink`] trait; the one
//! contract is "accepts a string".

/// Anything that can carry the order message to the store's contact
/// channel. Delivery is fire-and-forget: the session does not wait on, or
/// react to, the transport.
pub trait MessageSink {
    fn deliver(&mut self, message: &str);
}

/// Builds the direct-message deep link for the store's contact number, with
/// the order message percent-encoded into the text parameter.
///
/// ## Example
/// ```rust
/// use fermenta_shop::share::direct_message_link;
///
/// let link = direct_message_link("56912345678", "Hi! 2 kits & 1 barrel");
/// assert_eq!(
///     link,
///     "https://wa.me/56912345678?text=Hi%21%202%20kits%20%26%201%20barrel"
/// );
/// ```
pub fn direct_message_link(phone: &str, message: &str) -> String {
    format!("https://wa.me/{}?text={}", phone, urlencoding::encode(message))
}

/// Captures delivered messages instead of sending them. Used by tests and
/// by shells that preview the message before handing it off.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub delivered: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink::default()
    }
}

impl MessageSink for RecordingSink {
    fn deliver(&mut self, message: &str) {
        self.delivered.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_encodes_message() {
        let link = direct_message_link("56912345678", "Total: $37.800\nThanks!");
        assert_eq!(
            link,
            "https://wa.me/56912345678?text=Total%3A%20%2437.800%0AThanks%21"
        );
    }

    #[test]
    fn test_recording_sink_captures_messages() {
        let mut sink = RecordingSink::new();
        sink.deliver("first");
        sink.deliver("second");
        assert_eq!(sink.delivered, vec!["first", "second"]);
    }
}
