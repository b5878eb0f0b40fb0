//! Shared error types for the competitor pricing subsystem

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Unknown room type: {input} (expected 'private' or 'dorm')")]
    InvalidRoomType { input: String },

    #[error("Invalid job id: {input}")]
    InvalidJobId { input: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
