use super::BufferError;

/// 固定長のバイトバッファ
///
/// 読み込み時のファイルサイズで長さが決まり、以降は上書きのみ。
pub struct ByteBuffer {
    /// バッファデータ
    data: Vec<u8>,
    /// 変更フラグ
    modified: bool,
}

impl ByteBuffer {
    /// バイト列から作成
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data,
            modified: false,
        }
    }

    /// データの長さを取得
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// データが空かどうか
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 指定位置のバイトを取得
    pub fn read_byte(&self, offset: usize) -> Result<u8, BufferError> {
        self.data.get(offset).copied().ok_or(BufferError::OutOfRange {
            offset,
            len: self.data.len(),
        })
    }

    /// 指定位置のバイトを上書き（サイズは変わらない）
    pub fn write_byte(&mut self, offset: usize, value: u8) -> Result<(), BufferError> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(offset)
            .ok_or(BufferError::OutOfRange { offset, len })?;
        if *slot != value {
            *slot = value;
            self.modified = true;
        }
        Ok(())
    }

    /// 保存用のバイト列
    pub fn serialize(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// 生データへの参照を取得
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 変更されているかどうか
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// 保存成功後に変更フラグを落とす
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_write_in_place() {
        let mut buf = ByteBuffer::from_bytes(vec![0x10, 0x20, 0x30]);
        assert_eq!(buf.read_byte(1).unwrap(), 0x20);

        buf.write_byte(1, 0xAB).unwrap();
        assert_eq!(buf.read_byte(1).unwrap(), 0xAB);
        assert_eq!(buf.len(), 3);
        assert!(buf.is_modified());
    }

    #[test]
    fn out_of_range_access_fails() {
        let mut buf = ByteBuffer::from_bytes(vec![0; 4]);
        assert!(matches!(
            buf.read_byte(4),
            Err(BufferError::OutOfRange { offset: 4, len: 4 })
        ));
        assert!(buf.write_byte(10, 1).is_err());
        assert_eq!(buf.len(), 4);
        assert!(!buf.is_modified());
    }

    #[test]
    fn identical_write_keeps_clean_flag() {
        let mut buf = ByteBuffer::from_bytes(vec![7]);
        buf.write_byte(0, 7).unwrap();
        assert!(!buf.is_modified());
    }

    #[test]
    fn mark_saved_clears_flag() {
        let mut buf = ByteBuffer::from_bytes(vec![0, 0]);
        buf.write_byte(0, 1).unwrap();
        buf.mark_saved();
        assert!(!buf.is_modified());
        assert_eq!(buf.serialize(), vec![1, 0]);
    }
}
