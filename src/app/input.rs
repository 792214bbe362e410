use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use super::command::{self, COMMAND_CAPACITY};
use super::cursor::Motion;
use super::{Action, KeyMod};

/// ESC の後に続くバイト数（`[` + 識別バイト）
pub const ESCAPE_SEQUENCE_LEN: usize = 2;

/// エスケープシーケンスの既定タイムアウト
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(50);

/// 入力モード
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// コマンドライン入力中（cursor_pos は文字単位）
    CommandEntry { buffer: String, cursor_pos: usize },
    /// `g` を押した状態
    ChordPending,
    /// ESC を受け取り、続くバイトを収集中
    EscapeSequencePending { collected: Vec<u8>, started: Instant },
}

/// 入力状態機械（1キーにつき最大1アクション）
#[derive(Debug, Clone)]
pub struct InputStateMachine {
    mode: InputMode,
    escape_timeout: Duration,
}

impl InputStateMachine {
    pub fn new(escape_timeout: Duration) -> Self {
        Self {
            mode: InputMode::Normal,
            escape_timeout,
        }
    }

    /// 現在のモード
    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    /// 保留中の状態を捨ててノーマルモードに戻る
    pub fn reset(&mut self) {
        self.mode = InputMode::Normal;
    }

    /// タイムアウトしたエスケープシーケンスを破棄（入力待ちの合間に呼ぶ）
    pub fn expire(&mut self, now: Instant) {
        if let InputMode::EscapeSequencePending { started, .. } = &self.mode {
            if now.saturating_duration_since(*started) >= self.escape_timeout {
                tracing::debug!("escape sequence timed out while idle");
                self.mode = InputMode::Normal;
            }
        }
    }

    /// キーを1つ処理する
    ///
    /// F1 はどのモードでも保留中の入力を捨てて終了する。
    pub fn feed(&mut self, key: KeyCode, mods: KeyMod, now: Instant) -> Option<Action> {
        let mode = std::mem::take(&mut self.mode);
        if key == KeyCode::F(1) {
            tracing::trace!(?mode, "quit key");
            return Some(Action::Quit);
        }
        let action = match mode {
            InputMode::Normal => self.feed_normal(key, mods, now),
            InputMode::ChordPending => Self::feed_chord(key, mods),
            InputMode::EscapeSequencePending { collected, started } => {
                self.feed_escape(collected, started, key, mods, now)
            }
            InputMode::CommandEntry { buffer, cursor_pos } => {
                self.feed_command(buffer, cursor_pos, key, mods)
            }
        };
        tracing::trace!(mode = ?self.mode, ?action, "input");
        action
    }

    fn feed_normal(&mut self, key: KeyCode, mods: KeyMod, now: Instant) -> Option<Action> {
        if mods.ctrl || mods.alt {
            return Action::from_key(key, mods);
        }
        match key {
            KeyCode::Esc => {
                self.mode = InputMode::EscapeSequencePending {
                    collected: Vec::with_capacity(ESCAPE_SEQUENCE_LEN),
                    started: now,
                };
                None
            }
            KeyCode::Char('g') => {
                self.mode = InputMode::ChordPending;
                None
            }
            KeyCode::Char(prefix @ ('/' | ':')) => {
                self.mode = InputMode::CommandEntry {
                    buffer: prefix.to_string(),
                    cursor_pos: 1,
                };
                None
            }
            _ => Action::from_key(key, mods),
        }
    }

    /// 2打鍵目。一致しなければ何もせず、そのキー自体も捨てる
    fn feed_chord(key: KeyCode, mods: KeyMod) -> Option<Action> {
        match key {
            KeyCode::Char('g') if !mods.ctrl && !mods.alt => Some(Action::Move(Motion::Start)),
            _ => None,
        }
    }

    fn feed_escape(
        &mut self,
        mut collected: Vec<u8>,
        started: Instant,
        key: KeyCode,
        mods: KeyMod,
        now: Instant,
    ) -> Option<Action> {
        let elapsed = now.saturating_duration_since(started);
        let byte = match key {
            KeyCode::Char(ch) if ch.is_ascii() && elapsed < self.escape_timeout => ch as u8,
            _ => {
                // シーケンスの一部ではないのでノーマルモードで処理し直す
                tracing::debug!(?elapsed, ?collected, "escape sequence aborted");
                return self.feed_normal(key, mods, now);
            }
        };

        collected.push(byte);
        if collected.len() < ESCAPE_SEQUENCE_LEN {
            self.mode = InputMode::EscapeSequencePending { collected, started };
            return None;
        }

        let motion = match collected[ESCAPE_SEQUENCE_LEN - 1] {
            b'H' => Motion::LineStart,
            b'F' => Motion::LineEnd,
            b'A' => Motion::Up,
            b'B' => Motion::Down,
            b'C' => Motion::Right,
            b'D' => Motion::Left,
            _ => {
                tracing::debug!(?collected, "unknown escape sequence");
                return None;
            }
        };
        Some(Action::Move(motion))
    }

    fn feed_command(
        &mut self,
        mut buffer: String,
        mut cursor_pos: usize,
        key: KeyCode,
        mods: KeyMod,
    ) -> Option<Action> {
        match key {
            KeyCode::Esc => return None,
            KeyCode::Enter => {
                let action = command::parse(&buffer);
                if action.is_none() {
                    tracing::debug!(command = %buffer, "ignored command");
                }
                return action;
            }
            KeyCode::Backspace => {
                if cursor_pos > 0 {
                    cursor_pos -= 1;
                    buffer.remove(byte_index(&buffer, cursor_pos));
                }
                if buffer.is_empty() {
                    return None;
                }
            }
            KeyCode::Delete => {
                if cursor_pos < buffer.chars().count() {
                    buffer.remove(byte_index(&buffer, cursor_pos));
                }
                if buffer.is_empty() {
                    return None;
                }
            }
            KeyCode::Left => cursor_pos = cursor_pos.saturating_sub(1),
            KeyCode::Right => cursor_pos = (cursor_pos + 1).min(buffer.chars().count()),
            KeyCode::Home => cursor_pos = 0,
            KeyCode::End => cursor_pos = buffer.chars().count(),
            KeyCode::Char(ch) if !mods.ctrl && !mods.alt && !ch.is_control() => {
                // 容量を超えた入力は黙って捨てる
                if buffer.chars().count() < COMMAND_CAPACITY {
                    buffer.insert(byte_index(&buffer, cursor_pos), ch);
                    cursor_pos += 1;
                }
            }
            _ => {}
        }
        self.mode = InputMode::CommandEntry { buffer, cursor_pos };
        None
    }
}

impl Default for InputStateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_ESCAPE_TIMEOUT)
    }
}

/// 文字位置をバイト位置に変換
fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map_or(s.len(), |(index, _)| index)
}
