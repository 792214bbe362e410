use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// 明示指定がないときに探す設定ファイル名
pub const DEFAULT_CONFIG_FILE: &str = "hexed.toml";

/// 設定読み込みのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// エディタ設定（全項目に既定値があり、部分的なファイルでもよい）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// まとめて表示するバイト数
    pub group_size: usize,
    /// 1行あたりのバイト数の上限（None なら端末幅いっぱい）
    pub bytes_per_row: Option<usize>,
    /// エスケープシーケンスの待ち時間（ミリ秒）
    pub escape_timeout_ms: u64,
    /// マウス入力を有効にするか
    pub mouse: bool,
    /// ログ出力先ディレクトリ（None ならログ無効）
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            group_size: 1,
            bytes_per_row: None,
            escape_timeout_ms: 50,
            mouse: true,
            log_dir: None,
        }
    }
}

impl Config {
    /// TOML文字列から読み込み
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 設定ファイルを読み込む
    ///
    /// 明示指定されたファイルは必須。指定がなければカレントディレクトリの
    /// `hexed.toml` を探し、なければ既定値を使う。
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&text, &path)
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }
}
