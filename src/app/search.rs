use thiserror::Error;

/// 検索パターンの最大バイト数
pub const MAX_PATTERN_LEN: usize = 32;

/// 検索エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("invalid pattern: {0:?}")]
    InvalidPattern(String),

    #[error("pattern longer than {MAX_PATTERN_LEN} bytes")]
    PatternTooLong,

    #[error("pattern not found")]
    NotFound,
}

/// 検索方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// 検索パターン（空なら検索無効）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
    bytes: Vec<u8>,
}

impl Pattern {
    /// 空白区切りの2桁HEXグループをパース
    ///
    /// 1つでも不正なグループがあればパターン全体を拒否する。
    pub fn parse(input: &str) -> Result<Self, SearchError> {
        let mut bytes = Vec::new();
        for group in input.split_whitespace() {
            if group.len() != 2 || !group.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(SearchError::InvalidPattern(group.to_string()));
            }
            let byte = u8::from_str_radix(group, 16)
                .map_err(|_| SearchError::InvalidPattern(group.to_string()))?;
            bytes.push(byte);
        }
        if bytes.len() > MAX_PATTERN_LEN {
            return Err(SearchError::PatternTooLong);
        }
        Ok(Self { bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// 候補となる開始位置の数（0 なら検索不能）
fn candidate_count(data: &[u8], pattern: &Pattern) -> usize {
    if pattern.is_empty() || pattern.len() > data.len() {
        0
    } else {
        data.len() - pattern.len() + 1
    }
}

fn matches_at(data: &[u8], pattern: &Pattern, start: usize) -> bool {
    data[start..start + pattern.len()] == *pattern.bytes()
}

/// 前方検索（from の次から、末尾で先頭に折り返す）
pub fn find_next(data: &[u8], pattern: &Pattern, from: usize) -> Result<usize, SearchError> {
    let count = candidate_count(data, pattern);
    if count == 0 {
        return Err(SearchError::NotFound);
    }
    let base = if from + 1 < count { from + 1 } else { 0 };
    for step in 0..count {
        let candidate = (base + step) % count;
        if candidate == from {
            break;
        }
        if matches_at(data, pattern, candidate) {
            return Ok(candidate);
        }
    }
    Err(SearchError::NotFound)
}

/// 後方検索（from の前から、先頭で末尾に折り返す）
pub fn find_previous(data: &[u8], pattern: &Pattern, from: usize) -> Result<usize, SearchError> {
    let count = candidate_count(data, pattern);
    if count == 0 {
        return Err(SearchError::NotFound);
    }
    let base = if from >= 1 && from - 1 < count {
        from - 1
    } else {
        count - 1
    };
    for step in 0..count {
        let candidate = (base + count - step) % count;
        if candidate == from {
            break;
        }
        if matches_at(data, pattern, candidate) {
            return Ok(candidate);
        }
    }
    Err(SearchError::NotFound)
}

/// 方向を指定して検索
pub fn find(
    data: &[u8],
    pattern: &Pattern,
    from: usize,
    direction: Direction,
) -> Result<usize, SearchError> {
    match direction {
        Direction::Forward => find_next(data, pattern, from),
        Direction::Backward => find_previous(data, pattern, from),
    }
}
