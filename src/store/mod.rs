pub mod disk;
pub mod memory;
pub mod records;

pub use records::RecordStore;
