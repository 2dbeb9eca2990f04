//! Immutable, timestamp-ordered message table.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::message::{Message, MessageId};

/// All messages of one dataset, sorted by timestamp, with lookup indexes.
///
/// The table is built once and never mutated. Reply references stay raw
/// [`MessageId`] keys on each message and are resolved through the id index
/// on demand, so a reply may point into any export part.
///
/// # Example
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use tgstats::core::MessageTable;
/// use tgstats::{Message, MessageId};
///
/// let tz = FixedOffset::east_opt(0).unwrap();
/// let table = MessageTable::new(vec![
///     Message::new(MessageId(2), tz.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(), "Bob", "hi")
///         .with_reply_to(MessageId(1)),
///     Message::new(MessageId(1), tz.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap(), "Alice", "hey"),
/// ]);
///
/// assert_eq!(table.messages()[0].sender, "Alice");
/// let reply = &table.messages()[1];
/// assert_eq!(table.resolve_reply(reply).unwrap().sender, "Alice");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageTable {
    messages: Vec<Message>,
    by_id: HashMap<MessageId, usize>,
    by_sender: HashMap<String, Vec<usize>>,
    sender_order: Vec<String>,
}

impl MessageTable {
    /// Builds a table, stable-sorting the messages by timestamp.
    pub fn new(mut messages: Vec<Message>) -> Self {
        messages.sort_by_key(|m| m.timestamp);
        Self::from_sorted(messages)
    }

    /// Builds a table from messages already in timestamp order.
    pub(crate) fn from_sorted(messages: Vec<Message>) -> Self {
        let mut by_id = HashMap::with_capacity(messages.len());
        let mut by_sender: HashMap<String, Vec<usize>> = HashMap::new();
        let mut sender_order = Vec::new();

        for (pos, msg) in messages.iter().enumerate() {
            by_id.entry(msg.id).or_insert(pos);
            by_sender
                .entry(msg.sender.clone())
                .or_insert_with(|| {
                    sender_order.push(msg.sender.clone());
                    Vec::new()
                })
                .push(pos);
        }

        Self {
            messages,
            by_id,
            by_sender,
            sender_order,
        }
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the table holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages in timestamp order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterates over messages in timestamp order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Looks up a message by id. With repeated ids the earliest wins.
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.by_id.get(&id).map(|&pos| &self.messages[pos])
    }

    /// The message `msg` replies to, if it is in the table.
    pub fn resolve_reply(&self, msg: &Message) -> Option<&Message> {
        msg.reply_to.and_then(|id| self.get(id))
    }

    /// Number of replies whose target is not in the table.
    pub fn unresolved_replies(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.is_reply() && self.resolve_reply(m).is_none())
            .count()
    }

    /// Distinct senders in order of first appearance.
    pub fn senders(&self) -> impl Iterator<Item = &str> {
        self.sender_order.iter().map(String::as_str)
    }

    /// Number of distinct senders.
    pub fn sender_count(&self) -> usize {
        self.sender_order.len()
    }

    /// Messages written by `sender`, in timestamp order.
    pub fn by_sender<'a>(&'a self, sender: &str) -> impl Iterator<Item = &'a Message> + 'a {
        self.by_sender
            .get(sender)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&pos| &self.messages[pos])
    }

    /// First and last local calendar dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.messages.iter().map(Message::date).min()?;
        let last = self.messages.iter().map(Message::date).max()?;
        Some((first, last))
    }
}

impl<'a> IntoIterator for &'a MessageTable {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn msg(id: i64, day: u32, hour: u32, sender: &str) -> Message {
        let ts = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, day, hour, 0, 0)
            .unwrap();
        Message::new(MessageId(id), ts, sender, "text")
    }

    #[test]
    fn test_new_sorts_by_timestamp() {
        let table = MessageTable::new(vec![msg(3, 2, 9, "C"), msg(1, 1, 9, "A"), msg(2, 1, 10, "B")]);
        let ids: Vec<i64> = table.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_timestamps() {
        let table = MessageTable::new(vec![msg(5, 1, 9, "A"), msg(4, 1, 9, "B")]);
        let ids: Vec<i64> = table.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, [5, 4]);
    }

    #[test]
    fn test_sender_index() {
        let table = MessageTable::new(vec![
            msg(1, 1, 9, "Bob"),
            msg(2, 1, 10, "Alice"),
            msg(3, 1, 11, "Bob"),
        ]);

        assert_eq!(table.sender_count(), 2);
        assert_eq!(table.senders().collect::<Vec<_>>(), ["Bob", "Alice"]);
        assert_eq!(table.by_sender("Bob").count(), 2);
        assert_eq!(table.by_sender("Nobody").count(), 0);
    }

    #[test]
    fn test_reply_resolution() {
        let table = MessageTable::new(vec![
            msg(1, 1, 9, "Alice"),
            msg(2, 1, 10, "Bob").with_reply_to(MessageId(1)),
            msg(3, 1, 11, "Bob").with_reply_to(MessageId(99)),
        ]);

        assert_eq!(table.resolve_reply(&table.messages()[1]).unwrap().id, MessageId(1));
        assert!(table.resolve_reply(&table.messages()[2]).is_none());
        assert!(table.resolve_reply(&table.messages()[0]).is_none());
        assert_eq!(table.unresolved_replies(), 1);
    }

    #[test]
    fn test_date_range() {
        let table = MessageTable::new(vec![msg(1, 3, 9, "A"), msg(2, 10, 9, "A")]);
        let (first, last) = table.date_range().unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert!(MessageTable::default().date_range().is_none());
    }
}
