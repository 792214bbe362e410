use std::fs;
use std::io;
use std::path::Path;

/// ファイルの読み書きを担当する外部コラボレータ
///
/// エディタ本体はファイルシステムを直接触らない。
pub trait Storage {
    /// ファイル全体を読み込む
    fn load(&mut self, path: &Path) -> io::Result<Vec<u8>>;

    /// バイト列を書き出す
    fn store(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// 実ファイルシステムを使う実装
#[derive(Debug, Default, Clone, Copy)]
pub struct FileStorage;

impl Storage for FileStorage {
    fn load(&mut self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn store(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes)
    }
}
