use crate::error;

use std::ops::{Deref, DerefMut};

use ndef_parser::NdefRecord;

use error::*;

/// Handle to a tag in the field that can exchange NDEF messages
///
/// Handles are owned by whoever discovered the tag. Read and write are only
/// valid between `connect` and `close`.
pub trait NdefTag {
    fn connect(&mut self) -> Result<(), TagError>;

    fn is_connected(&self) -> bool;

    fn read_records(&mut self) -> Result<Vec<NdefRecord>, TagError>;

    fn write_records(&mut self, records: &[NdefRecord]) -> Result<(), TagError>;

    fn close(&mut self) -> Result<(), TagError>;
}

/// Connected tag, closed on `close` or when dropped
pub struct Connection<'a, T>
where
    T: NdefTag,
{
    tag: &'a mut T,
    closed: bool,
}

impl<'a, T> Connection<'a, T>
where
    T: NdefTag,
{
    pub fn open(tag: &'a mut T) -> Result<Self, TagError> {
        tag.connect()?;
        log::debug!("tag connected");

        Ok(Self { tag, closed: false })
    }

    pub fn close(mut self) -> Result<(), TagError> {
        self.closed = true;
        let result = self.tag.close();
        log::debug!("tag closed");
        result
    }
}

impl<'a, T> Deref for Connection<'a, T>
where
    T: NdefTag,
{
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &*self.tag
    }
}

impl<'a, T> DerefMut for Connection<'a, T>
where
    T: NdefTag,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.tag
    }
}

impl<'a, T> Drop for Connection<'a, T>
where
    T: NdefTag,
{
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        match self.tag.close() {
            Ok(()) => log::debug!("tag closed"),
            Err(e) => log::warn!("failed to close tag: {}", e),
        }
    }
}
