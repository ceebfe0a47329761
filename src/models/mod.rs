pub mod file_entry;
pub mod outcome;
pub mod storage;
