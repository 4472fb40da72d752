use crate::error;
use crate::session;
use crate::status;

use ndef_parser::NdefRecord;

use error::*;
use session::TagSession;
use status::Status;

pub struct TagSessionBuilder {
    session: TagSession,
}

impl TagSessionBuilder {
    pub fn new() -> Self {
        Self {
            session: TagSession::new(),
        }
    }

    pub fn set_mime_type(mut self, mime_type: &str) -> Self {
        self.session.set_mime_type(mime_type);
        self
    }

    pub fn set_status_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&Status) + 'static,
    {
        self.session.set_status_listener(Box::new(listener));
        self
    }

    pub fn finish(self) -> Result<TagSession, TagError> {
        NdefRecord::create_mime(self.session.get_mime_type(), vec![])?;
        Ok(self.session)
    }
}

impl Default for TagSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
