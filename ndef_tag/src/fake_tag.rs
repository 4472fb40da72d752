use crate::error::TagError;
use crate::tag::NdefTag;

use ndef_parser::NdefRecord;

/// Tag double that counts every call and fails on request
#[derive(Default)]
pub struct FakeTag {
    pub records: Vec<NdefRecord>,
    pub opened: usize,
    pub closed: usize,
    pub calls: usize,
    pub fail_connect: bool,
    pub fail_read: bool,
    pub fail_write: bool,
    pub fail_close: bool,
    connected: bool,
}

impl FakeTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<NdefRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    fn check_connected(&self) -> Result<(), TagError> {
        match self.connected {
            true => Ok(()),
            false => Err(TagError::Transport(format!("not connected"))),
        }
    }
}

impl NdefTag for FakeTag {
    fn connect(&mut self) -> Result<(), TagError> {
        self.calls += 1;
        if self.fail_connect {
            return Err(TagError::Transport(format!("connect failed")));
        }
        self.connected = true;
        self.opened += 1;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn read_records(&mut self) -> Result<Vec<NdefRecord>, TagError> {
        self.calls += 1;
        self.check_connected()?;
        if self.fail_read {
            return Err(TagError::Format(format!("read failed")));
        }
        Ok(self.records.clone())
    }

    fn write_records(&mut self, records: &[NdefRecord]) -> Result<(), TagError> {
        self.calls += 1;
        self.check_connected()?;
        if self.fail_write {
            return Err(TagError::Transport(format!("tag was lost")));
        }
        self.records = records.to_vec();
        Ok(())
    }

    fn close(&mut self) -> Result<(), TagError> {
        self.calls += 1;
        self.connected = false;
        self.closed += 1;
        if self.fail_close {
            return Err(TagError::Transport(format!("close failed")));
        }
        Ok(())
    }
}
