use super::Action;

/// コマンドラインの最大文字数
pub const COMMAND_CAPACITY: usize = 64;

/// 10進数のみで構成されたトークンをオフセットとして解釈
fn parse_offset(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// コマンド文字列をアクションに変換（不明なものは None）
///
/// ```text
/// /<hex pairs>   検索パターンを設定して前方検索
/// :q             終了
/// :w [path]      保存
/// :wq [path]     保存して終了
/// :<n> | <n>     10進オフセットへジャンプ
/// ```
///
/// パスの後ろのトークンは捨てる。
pub fn parse(line: &str) -> Option<Action> {
    if let Some(pattern) = line.strip_prefix('/') {
        return Some(Action::Search(pattern.to_string()));
    }

    let Some(body) = line.strip_prefix(':') else {
        return parse_offset(line).map(Action::GotoOffset);
    };

    if let Some(offset) = parse_offset(body) {
        return Some(Action::GotoOffset(offset));
    }

    if body.starts_with(char::is_whitespace) {
        return None;
    }

    let mut tokens = body.split_whitespace();
    let verb = tokens.next()?;
    let path = tokens.next().map(str::to_string);

    match verb {
        "q" => Some(Action::Quit),
        "w" => Some(Action::Write { path, quit: false }),
        "wq" => Some(Action::Write { path, quit: true }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_command_keeps_raw_pattern() {
        assert_eq!(parse("/de ad"), Some(Action::Search("de ad".to_string())));
        assert_eq!(parse("/"), Some(Action::Search(String::new())));
    }

    #[test]
    fn quit_and_write() {
        assert_eq!(parse(":q"), Some(Action::Quit));
        assert_eq!(
            parse(":w"),
            Some(Action::Write {
                path: None,
                quit: false
            })
        );
        assert_eq!(
            parse(":wq"),
            Some(Action::Write {
                path: None,
                quit: true
            })
        );
    }

    #[test]
    fn write_with_path_drops_trailing_tokens() {
        assert_eq!(
            parse(":w out.bin"),
            Some(Action::Write {
                path: Some("out.bin".to_string()),
                quit: false
            })
        );
        assert_eq!(
            parse(":wq  copy.bin extra junk"),
            Some(Action::Write {
                path: Some("copy.bin".to_string()),
                quit: true
            })
        );
    }

    #[test]
    fn offsets_must_be_pure_decimal() {
        assert_eq!(parse(":100"), Some(Action::GotoOffset(100)));
        assert_eq!(parse("42"), Some(Action::GotoOffset(42)));
        assert_eq!(parse(":+5"), None);
        assert_eq!(parse(":0x10"), None);
        assert_eq!(parse(":12a"), None);
        assert_eq!(parse(":99999999999999999999999999"), None);
    }

    #[test]
    fn unknown_forms_are_ignored() {
        assert_eq!(parse(":"), None);
        assert_eq!(parse(":x"), None);
        assert_eq!(parse(":wx"), None);
        assert_eq!(parse(": w"), None);
        assert_eq!(parse("hello"), None);
        assert_eq!(parse(""), None);
    }
}
