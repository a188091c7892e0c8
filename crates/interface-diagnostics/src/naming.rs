//! Names diagnostic registrations are filed under.
//!
//! Registration names are unique per aggregator. Two endpoints on the same
//! topic and role collide, so these functions are the single place the
//! convention lives.

use diagnostic_updater::topic_status_name;

/// `"<topic> subscriber"`; empty for an empty topic.
#[must_use]
pub fn subscriber_diagnostic_name(topic: &str) -> String {
    if topic.is_empty() {
        return String::new();
    }
    format!("{topic} subscriber")
}

/// `"<topic> topic status"`, the name the upstream diagnosed publisher
/// registers under.
#[must_use]
pub fn publisher_diagnostic_name(topic: &str) -> String {
    topic_status_name(topic)
}
