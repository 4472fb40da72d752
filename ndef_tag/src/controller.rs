use crate::session;
use crate::status;
use crate::tag;

use session::TagSession;
use status::Status;
use tag::NdefTag;

/// Pending message, last seen tag and the mode the next tag is handled in
pub struct NfcController<T>
where
    T: NdefTag,
{
    session: TagSession,
    tag: Option<T>,
    write_mode: bool,
    message: String,
}

impl<T> NfcController<T>
where
    T: NdefTag,
{
    pub fn new(session: TagSession) -> Self {
        Self {
            session,
            tag: None,
            write_mode: false,
            message: String::new(),
        }
    }

    pub fn set_message(&mut self, message: &str) {
        self.message = message.to_owned();
    }

    pub fn get_message(&self) -> &str {
        &self.message
    }

    pub fn is_write_mode(&self) -> bool {
        self.write_mode
    }

    pub fn tag(&self) -> Option<&T> {
        self.tag.as_ref()
    }

    pub fn write_pressed(&mut self) -> Status {
        self.write_mode = true;
        self.session.write_text(self.tag.as_mut(), &self.message)
    }

    pub fn read_pressed(&mut self) -> Status {
        self.write_mode = false;
        self.session.read_text(self.tag.as_mut())
    }

    /// Keeps the tag and handles it in the current mode
    pub fn tag_discovered(&mut self, tag: T) -> Status {
        self.tag = Some(tag);

        match self.write_mode {
            true => self.session.write_text(self.tag.as_mut(), &self.message),
            false => self.session.read_text(self.tag.as_mut()),
        }
    }

    pub fn tag_lost(&mut self) -> Option<T> {
        self.tag.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_tag::FakeTag;
    use crate::status::Operation;

    #[test]
    fn buttons_without_tag_test() {
        let mut controller = NfcController::<FakeTag>::new(TagSession::new());

        assert_eq!(controller.write_pressed(), Status::EnterMessage);
        assert!(controller.is_write_mode());

        controller.set_message("Hello");
        assert_eq!(controller.write_pressed(), Status::NoTag(Operation::Write));
        assert_eq!(controller.read_pressed(), Status::NoTag(Operation::Read));
        assert!(!controller.is_write_mode());
    }

    #[test]
    fn write_mode_test() {
        let mut controller = NfcController::new(TagSession::new());
        controller.set_message("Hello");
        controller.write_pressed();

        assert_eq!(controller.tag_discovered(FakeTag::new()), Status::Success);
        assert_eq!(controller.read_pressed(), Status::Message(format!("Hello")));

        let tag = controller.tag_lost().unwrap();
        assert_eq!(tag.opened, tag.closed);
        assert_eq!(controller.read_pressed(), Status::NoTag(Operation::Read));
    }

    #[test]
    fn read_mode_test() {
        let mut controller = NfcController::new(TagSession::new());

        assert_eq!(controller.tag_discovered(FakeTag::new()), Status::Empty);

        controller.set_message("");
        controller.write_pressed();
        assert_eq!(controller.tag().unwrap().calls, 3);
    }
}
