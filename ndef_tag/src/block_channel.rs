use crate::error::TagError;

pub const PAGE_SIZE: usize = 4;
pub const READ_SIZE: usize = 16;

/// Page-addressed memory of a Type 2 tag
pub trait BlockChannel {
    /// Reads four consecutive pages starting at `page`
    fn read(&mut self, page: u8) -> Result<[u8; READ_SIZE], TagError>;
    fn write(&mut self, page: u8, data: &[u8; PAGE_SIZE]) -> Result<(), TagError>;
}
