use crate::error;
use crate::status;
use crate::tag;

use ndef_parser::payload_value::{AsciiText, Utf8Text, WellKnownText};
use ndef_parser::{NdefRecord, Tnf};

use error::*;
use status::{Operation, Status};
use tag::{Connection, NdefTag};

pub const DEFAULT_MIME_TYPE: &str = "text/plain";

pub type StatusListener = Box<dyn Fn(&Status)>;

/// Writes one text record to a tag or reads the first one back
///
/// Every call is independent: the tag is connected, used once and closed
/// again on every exit path.
pub struct TagSession {
    mime_type: String,
    status_listener: Option<StatusListener>,
}

impl TagSession {
    pub fn new() -> Self {
        Self {
            mime_type: DEFAULT_MIME_TYPE.to_owned(),
            status_listener: None,
        }
    }

    pub fn set_mime_type(&mut self, mime_type: &str) {
        self.mime_type = mime_type.to_owned();
    }

    pub fn get_mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn set_status_listener(&mut self, listener: StatusListener) {
        self.status_listener = Some(listener);
    }

    pub fn write_text<T>(&self, tag: Option<&mut T>, message: &str) -> Status
    where
        T: NdefTag,
    {
        let status = if message.is_empty() {
            Status::EnterMessage
        } else {
            match tag {
                Some(tag) => {
                    self.report(&Status::InProgress);
                    match self.try_write_text(tag, message) {
                        Ok(()) => Status::Success,
                        Err(e) => {
                            log::error!("write failed: {}", e);
                            Status::Error
                        }
                    }
                }
                None => Status::NoTag(Operation::Write),
            }
        };

        self.report(&status);
        status
    }

    pub fn read_text<T>(&self, tag: Option<&mut T>) -> Status
    where
        T: NdefTag,
    {
        let status = match tag {
            Some(tag) => match self.try_read_text(tag) {
                Ok(Some(message)) => Status::Message(message),
                Ok(None) => Status::Empty,
                Err(e) => {
                    log::error!("read failed: {}", e);
                    Status::Error
                }
            },
            None => Status::NoTag(Operation::Read),
        };

        self.report(&status);
        status
    }

    /// Replaces the tag content with a single MIME record carrying the
    /// ASCII bytes of `message`
    pub fn try_write_text<T>(&self, tag: &mut T, message: &str) -> Result<(), TagError>
    where
        T: NdefTag,
    {
        let text = AsciiText::new(message)?;
        let record = NdefRecord::create_mime_value(&self.mime_type, &text)?;

        let mut connection = Connection::open(tag)?;
        connection.write_records(&[record])?;
        connection.close()?;

        log::info!("wrote {} bytes of {}", text.len(), self.mime_type);
        Ok(())
    }

    /// Returns text of the first record, `None` when the tag holds no records
    pub fn try_read_text<T>(&self, tag: &mut T) -> Result<Option<String>, TagError>
    where
        T: NdefTag,
    {
        let mut connection = Connection::open(tag)?;
        let records = connection.read_records()?;
        connection.close()?;

        let record = match records.first() {
            Some(record) if record.tnf() != Tnf::Empty => record,
            _ => {
                log::info!("tag holds no records");
                return Ok(None);
            }
        };

        let message = if record.is_text() {
            record.payload_ext::<WellKnownText>()?.into_text()
        } else {
            record.payload_ext::<Utf8Text>()?.into_string()
        };

        log::info!("read first of {} records: {}", records.len(), record);
        Ok(Some(message))
    }

    fn report(&self, status: &Status) {
        if let Some(listener) = &self.status_listener {
            listener(status);
        }
    }
}

impl Default for TagSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_tag::FakeTag;

    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn round_trip_test() {
        let session = TagSession::new();
        let mut tag = FakeTag::new();

        for message in &["Hello", "a", "The quick brown fox; 0123456789 ~!@#"] {
            assert_eq!(session.write_text(Some(&mut tag), message), Status::Success);
            assert_eq!(
                session.read_text(Some(&mut tag)),
                Status::Message(message.to_string())
            );
        }

        assert_eq!(tag.records.len(), 1);
        assert_eq!(tag.records[0].mime_type().unwrap(), "text/plain");
    }

    #[test]
    fn no_tag_test() {
        let session = TagSession::new();

        assert_eq!(
            session.write_text::<FakeTag>(None, "Hello"),
            Status::NoTag(Operation::Write)
        );
        assert_eq!(
            session.read_text::<FakeTag>(None),
            Status::NoTag(Operation::Read)
        );
    }

    #[test]
    fn empty_message_test() {
        let session = TagSession::new();
        let mut tag = FakeTag::new();

        assert_eq!(session.write_text::<FakeTag>(None, ""), Status::EnterMessage);
        assert_eq!(session.write_text(Some(&mut tag), ""), Status::EnterMessage);
        assert_eq!(tag.calls, 0);
    }

    #[test]
    fn empty_tag_test() {
        let session = TagSession::new();

        let mut tag = FakeTag::new();
        assert_eq!(session.read_text(Some(&mut tag)), Status::Empty);
        assert_eq!(tag.opened, tag.closed);

        let mut tag = FakeTag::with_records(vec![NdefRecord::empty()]);
        assert_eq!(session.read_text(Some(&mut tag)), Status::Empty);
    }

    #[test]
    fn close_on_failure_test() {
        let session = TagSession::new();

        let mut tag = FakeTag::new();
        tag.fail_write = true;
        assert_eq!(session.write_text(Some(&mut tag), "Hello"), Status::Error);
        assert_eq!(tag.opened, 1);
        assert_eq!(tag.closed, 1);

        let mut tag = FakeTag::new();
        tag.fail_read = true;
        assert_eq!(session.read_text(Some(&mut tag)), Status::Error);
        assert_eq!(tag.opened, 1);
        assert_eq!(tag.closed, 1);

        let mut tag = FakeTag::new();
        tag.fail_connect = true;
        assert_eq!(session.write_text(Some(&mut tag), "Hello"), Status::Error);
        assert_eq!(tag.opened, 0);
        assert_eq!(tag.closed, 0);

        let mut tag = FakeTag::new();
        tag.fail_close = true;
        assert_eq!(session.write_text(Some(&mut tag), "Hello"), Status::Error);
        assert_eq!(tag.opened, 1);
        assert_eq!(tag.closed, 1);
    }

    #[test]
    fn close_on_success_test() {
        let session = TagSession::new();
        let mut tag = FakeTag::new();

        session.write_text(Some(&mut tag), "Hello");
        session.read_text(Some(&mut tag));

        assert_eq!(tag.opened, 2);
        assert_eq!(tag.closed, 2);
        assert!(!tag.is_connected());
    }

    #[test]
    fn non_ascii_test() {
        let session = TagSession::new();
        let mut tag = FakeTag::with_records(vec![NdefRecord::create_mime(
            "text/plain",
            b"old".to_vec(),
        )
        .unwrap()]);

        assert!(matches!(
            session.try_write_text(&mut tag, "héllo"),
            Err(TagError::Format(_))
        ));
        assert_eq!(session.write_text(Some(&mut tag), "Grüße"), Status::Error);

        assert_eq!(tag.calls, 0);
        assert_eq!(tag.records[0].payload(), b"old");
    }

    #[test]
    fn read_text_record_test() {
        let session = TagSession::new();
        let mut tag = FakeTag::with_records(vec![
            NdefRecord::create_text("en", "from another writer").unwrap(),
            NdefRecord::create_mime("text/plain", b"second".to_vec()).unwrap(),
        ]);

        assert_eq!(
            session.try_read_text(&mut tag).unwrap(),
            Some(format!("from another writer"))
        );
    }

    #[test]
    fn status_listener_test() {
        let reported = Rc::new(RefCell::new(Vec::new()));
        let sink = reported.clone();

        let mut session = TagSession::new();
        session.set_status_listener(Box::new(move |x| sink.borrow_mut().push(x.clone())));

        let mut tag = FakeTag::new();
        session.write_text(Some(&mut tag), "Hello");
        session.read_text(Some(&mut tag));

        assert_eq!(
            *reported.borrow(),
            vec![
                Status::InProgress,
                Status::Success,
                Status::Message(format!("Hello"))
            ]
        );
    }
}
