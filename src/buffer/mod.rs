mod byte_buffer;
mod storage;

pub use byte_buffer::ByteBuffer;
pub use storage::{FileStorage, Storage};

use thiserror::Error;

/// バッファ操作のエラー
#[derive(Debug, Error)]
pub enum BufferError {
    /// 範囲外アクセス（カーソル不変条件が守られていれば発生しない）
    #[error("offset {offset} out of range (length {len})")]
    OutOfRange { offset: usize, len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
