//! Topic filters with MQTT-style wildcards.
//!
//! Levels are separated by `/`. A `+` level matches exactly one level and a
//! trailing `#` matches the parent level and every subtopic beneath it.

const SEPARATOR: char = '/';
const SINGLE_LEVEL: &str = "+";
const MULTI_LEVEL: &str = "#";

/// Whether `topic` is addressed by the subscription `filter`.
#[must_use]
pub fn matches(filter: &str, topic: &str) -> bool {
    let mut filter_levels = filter.split(SEPARATOR);
    let mut topic_levels = topic.split(SEPARATOR);

    loop {
        match (filter_levels.next(), topic_levels.next()) {
            (Some(MULTI_LEVEL), _) => return filter_levels.next().is_none(),
            (Some(SINGLE_LEVEL), Some(_)) => {}
            (Some(expected), Some(actual)) if expected == actual => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// Whether `filter` is a well-formed subscription filter.
///
/// `#` must be the last level and wildcards must occupy a whole level.
#[must_use]
pub fn is_valid_filter(filter: &str) -> bool {
    if filter.is_empty() {
        return false;
    }
    let levels: Vec<&str> = filter.split(SEPARATOR).collect();
    let last = levels.len() - 1;
    levels.iter().enumerate().all(|(idx, level)| match *level {
        MULTI_LEVEL => idx == last,
        SINGLE_LEVEL => true,
        other => !other.contains(['+', '#']),
    })
}
