use crate::block_channel;
use crate::error;

use block_channel::{BlockChannel, PAGE_SIZE, READ_SIZE};
use error::*;

const NTAG213_PAGES: usize = 45;

/// Type 2 tag memory kept in a page vector
///
/// READ wraps around to page 0 past the last page, as real tags do.
pub struct MemoryBlockChannel {
    pages: Vec<[u8; PAGE_SIZE]>,
    present: bool,
    write_count: usize,
}

impl MemoryBlockChannel {
    pub fn new(pages: Vec<[u8; PAGE_SIZE]>) -> Self {
        Self {
            pages,
            present: true,
            write_count: 0,
        }
    }

    /// Blank NTAG213: 144 bytes of user memory holding an empty NDEF TLV
    pub fn ntag213() -> Self {
        let mut pages = vec![[0; PAGE_SIZE]; NTAG213_PAGES];
        pages[0] = [0x04, 0x12, 0x34, 0xA2];
        pages[1] = [0x56, 0x78, 0x9A, 0xBC];
        pages[2] = [0x3E, 0x48, 0x00, 0x00];
        pages[3] = [0xE1, 0x10, 0x12, 0x00];
        pages[4] = [0x03, 0x00, 0xFE, 0x00];
        Self::new(pages)
    }

    /// `false` makes every following call fail as if the tag left the field
    pub fn set_present(&mut self, present: bool) {
        self.present = present;
    }

    pub fn page(&self, page: u8) -> Option<&[u8; PAGE_SIZE]> {
        self.pages.get(page as usize)
    }

    pub fn set_page(&mut self, page: u8, data: [u8; PAGE_SIZE]) {
        if let Some(x) = self.pages.get_mut(page as usize) {
            *x = data;
        }
    }

    pub fn get_write_count(&self) -> usize {
        self.write_count
    }

    fn check(&self, page: u8) -> Result<(), TagError> {
        if !self.present {
            return Err(TagError::Transport(format!("tag was lost")));
        }
        if page as usize >= self.pages.len() {
            return Err(TagError::Transport(format!(
                "page {} out of range",
                page
            )));
        }
        Ok(())
    }
}

impl BlockChannel for MemoryBlockChannel {
    fn read(&mut self, page: u8) -> Result<[u8; READ_SIZE], TagError> {
        self.check(page)?;

        let mut out = [0; READ_SIZE];
        for (i, chunk) in out.chunks_mut(PAGE_SIZE).enumerate() {
            let index = (page as usize + i) % self.pages.len();
            chunk.copy_from_slice(&self.pages[index]);
        }

        log::debug!("read {}: {:02X?}", page, out);
        Ok(out)
    }

    fn write(&mut self, page: u8, data: &[u8; PAGE_SIZE]) -> Result<(), TagError> {
        self.check(page)?;

        log::debug!("write {}: {:02X?}", page, data);
        self.pages[page as usize] = *data;
        self.write_count += 1;
        Ok(())
    }
}
