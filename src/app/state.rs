use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::cursor::{self, Cursor, Motion};
use super::edit;
use super::input::{InputMode, InputStateMachine};
use super::inspect;
use super::render::{self, CommandLine, RenderModel};
use super::search::{self, Direction, Pattern, SearchError};
use super::viewport::{Geometry, Scroll};
use super::{Action, InputEvent, Pane};
use crate::buffer::{BufferError, ByteBuffer, Storage};

/// エディタセッション
///
/// バッファ・カーソル・スクロール・入力モードを1つにまとめて所有する。
/// すべての状態変更は [`Editor::handle`] を通る。
pub struct Editor {
    /// 編集中のバッファ
    buffer: ByteBuffer,
    /// 元ファイルのパス（`:w` の既定の保存先）
    path: Option<PathBuf>,
    /// 読み書き担当
    storage: Box<dyn Storage>,
    /// ペインの幾何情報
    geometry: Geometry,
    /// スクロール位置
    scroll: Scroll,
    /// カーソル位置
    cursor: Cursor,
    /// 入力状態
    input: InputStateMachine,
    /// 現在の検索パターン
    pattern: Pattern,
    /// ステータスメッセージ（イベントごとにクリア）
    status_message: Option<String>,
    /// 終了フラグ
    should_quit: bool,
}

impl Editor {
    /// 読み込み済みのバッファからセッションを作成
    pub fn new(
        buffer: ByteBuffer,
        path: Option<PathBuf>,
        storage: Box<dyn Storage>,
        geometry: Geometry,
        escape_timeout: Duration,
    ) -> Self {
        Self {
            buffer,
            path,
            storage,
            geometry,
            scroll: Scroll::default(),
            cursor: Cursor::default(),
            input: InputStateMachine::new(escape_timeout),
            pattern: Pattern::default(),
            status_message: None,
            should_quit: false,
        }
    }

    /// ファイルを読み込んでセッションを作成
    pub fn open(
        path: impl Into<PathBuf>,
        mut storage: Box<dyn Storage>,
        geometry: Geometry,
        escape_timeout: Duration,
    ) -> Result<Self, BufferError> {
        let path = path.into();
        let data = storage.load(&path)?;
        tracing::info!(path = %path.display(), len = data.len(), "loaded");
        Ok(Self::new(
            ByteBuffer::from_bytes(data),
            Some(path),
            storage,
            geometry,
            escape_timeout,
        ))
    }

    /// 終了すべきかどうか
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn buffer(&self) -> &ByteBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn scroll(&self) -> Scroll {
        self.scroll
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn mode(&self) -> &InputMode {
        self.input.mode()
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// ファイル名を取得
    pub fn filename(&self) -> Option<&str> {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
    }

    /// 変更されているかどうか
    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    /// イベントを1つ処理する
    ///
    /// 状態遷移のあと必ずカーソルとスクロールの不変条件を回復する。
    pub fn handle(&mut self, event: InputEvent, now: Instant) {
        self.status_message = None;

        match event {
            InputEvent::Key(code, mods) => {
                if let Some(action) = self.input.feed(code, mods, now) {
                    self.execute(action);
                }
            }
            InputEvent::Mouse { pane, x, y } => {
                if !matches!(self.input.mode(), InputMode::CommandEntry { .. }) {
                    self.input.reset();
                    self.place_pointer(pane, x, y);
                }
            }
            InputEvent::Resize(geometry) => {
                tracing::debug!(?geometry, "resize");
                self.geometry = geometry;
            }
        }

        cursor::settle(
            &mut self.cursor,
            &mut self.scroll,
            &self.geometry,
            self.buffer.len(),
        );
    }

    /// 入力待ちがタイムアウトしたときに呼ぶ
    pub fn tick(&mut self, now: Instant) {
        self.input.expire(now);
    }

    /// アクションを実行
    fn execute(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Write { path, quit } => self.write(path, quit),
            Action::Move(motion) => self.move_cursor(motion),
            Action::GotoOffset(offset) => self.move_cursor(Motion::Offset(offset)),
            Action::InputHex(ch) => self.input_hex(ch),
            Action::Search(text) => self.set_pattern(&text),
            Action::SearchNext => self.search(Direction::Forward),
            Action::SearchPrev => self.search(Direction::Backward),
        }
    }

    fn move_cursor(&mut self, motion: Motion) {
        self.cursor.apply(
            motion,
            &mut self.scroll,
            &self.geometry,
            self.buffer.len(),
        );
    }

    /// HEX入力処理
    fn input_hex(&mut self, ch: char) {
        let result = edit::overwrite_nibble(
            &mut self.buffer,
            &mut self.cursor,
            &mut self.scroll,
            &self.geometry,
            ch,
        );
        if let Err(e) = result {
            // カーソル不変条件が壊れている
            tracing::error!(error = %e, cursor = ?self.cursor, "edit outside buffer");
            self.status_message = Some(format!("Internal error: {}", e));
        }
    }

    /// 検索パターンを設定して前方検索
    ///
    /// パースに失敗したら以前のパターンを残す。空パターンは検索を無効にする。
    fn set_pattern(&mut self, text: &str) {
        match Pattern::parse(text) {
            Ok(pattern) if pattern.is_empty() => {
                self.pattern = pattern;
                self.status_message = Some("Search cleared".to_string());
            }
            Ok(pattern) => {
                self.pattern = pattern;
                self.search(Direction::Forward);
            }
            Err(e) => {
                tracing::debug!(error = %e, "rejected search pattern");
                self.status_message = Some(format!("Invalid pattern: {}", text.trim()));
            }
        }
    }

    /// 現在のパターンで検索（見つからなければカーソルはそのまま）
    fn search(&mut self, direction: Direction) {
        if self.pattern.is_empty() {
            self.status_message = Some("No search pattern".to_string());
            return;
        }

        match search::find(self.buffer.data(), &self.pattern, self.cursor.offset, direction) {
            Ok(pos) => {
                tracing::debug!(pos, ?direction, "search hit");
                self.cursor = Cursor::new(pos, Default::default());
                self.status_message = Some(format!("Found at {:08X}", pos));
            }
            Err(SearchError::NotFound) => {
                tracing::debug!(from = self.cursor.offset, ?direction, "search miss");
                self.status_message = Some("Pattern not found".to_string());
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    /// ファイルに保存
    ///
    /// 失敗してもバッファは保持し、メッセージを出すだけ。
    fn write(&mut self, path: Option<String>, quit: bool) {
        let Some(target) = path.map(PathBuf::from).or_else(|| self.path.clone()) else {
            self.status_message = Some("No file name".to_string());
            return;
        };

        let bytes = self.buffer.serialize();
        match self.storage.store(&target, &bytes) {
            Ok(()) => {
                tracing::info!(path = %target.display(), len = bytes.len(), "saved");
                self.buffer.mark_saved();
                self.status_message =
                    Some(format!("Wrote {} bytes to {}", bytes.len(), target.display()));
                if quit {
                    self.should_quit = true;
                }
            }
            Err(e) => {
                tracing::warn!(path = %target.display(), error = %e, "save failed");
                self.status_message = Some(format!("Write failed: {}", e));
            }
        }
    }

    /// ペイン内座標にカーソルを置く（範囲外・区切りカラムは無視）
    fn place_pointer(&mut self, pane: Pane, x: usize, y: usize) {
        if y >= self.geometry.pane_height() {
            return;
        }
        let (column, nibble) = match pane {
            Pane::Hex => match self.geometry.hex_column_to_byte(x) {
                Some(hit) => hit,
                None => return,
            },
            Pane::Ascii => match self.geometry.ascii_column_to_byte(x) {
                Some(column) => (column, Default::default()),
                None => return,
            },
        };

        let offset = self.geometry.first_offset_of_line(self.scroll.start_line + y) + column;
        if offset < self.buffer.len() {
            self.cursor = Cursor::new(offset, nibble);
        }
    }

    /// 描画用のスナップショットを作成
    pub fn render(&self) -> RenderModel {
        let data = self.buffer.data();
        let command_line = match self.input.mode() {
            InputMode::CommandEntry { buffer, cursor_pos } => Some(CommandLine {
                text: buffer.clone(),
                cursor: *cursor_pos,
            }),
            _ => None,
        };

        RenderModel {
            rows: render::visible_rows(data, &self.geometry, &self.scroll),
            cursor: render::screen_cursor(&self.cursor, &self.geometry, &self.scroll, data.len()),
            command_line,
            status: self.status_message.clone(),
            detail: inspect::inspect(data, self.cursor.offset),
            file_name: self.filename().unwrap_or("[No Name]").to_string(),
            modified: self.buffer.is_modified(),
            length: data.len(),
        }
    }
}
