pub mod command;
pub mod cursor;
pub mod edit;
pub mod input;
pub mod inspect;
pub mod render;
pub mod search;
mod state;
pub mod viewport;

pub use state::Editor;

use crossterm::event::KeyCode;

use cursor::Motion;
use viewport::Geometry;

/// 入力イベント（描画層・イベント源から渡される）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// キー入力
    Key(KeyCode, KeyMod),
    /// ペイン内座標でのポインタ押下
    Mouse { pane: Pane, x: usize, y: usize },
    /// ペインサイズの変更
    Resize(Geometry),
}

impl InputEvent {
    /// 修飾キーなしのキー入力
    pub fn key(code: KeyCode) -> Self {
        InputEvent::Key(code, KeyMod::default())
    }

    /// 修飾キーなしの文字入力
    pub fn char(ch: char) -> Self {
        InputEvent::key(KeyCode::Char(ch))
    }
}

/// ポインタで指せるペイン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Hex,
    Ascii,
}

/// アプリケーションアクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// 保存（パス省略時は元のファイル）。quit なら保存後に終了
    Write {
        path: Option<String>,
        quit: bool,
    },

    // カーソル移動
    Move(Motion),
    GotoOffset(usize),

    // 編集
    InputHex(char),

    // 検索
    Search(String),
    SearchNext,
    SearchPrev,
}

/// キー修飾子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyMod {
    pub ctrl: bool,
    pub alt: bool,
}

impl Action {
    /// ノーマルモードのキーからアクションに変換
    ///
    /// モード遷移を伴うキー（`g`, `/`, `:`, Esc）は入力状態機械が先に処理する。
    pub fn from_key(key: KeyCode, mods: KeyMod) -> Option<Self> {
        let KeyMod { ctrl, alt, .. } = mods;

        let action = match (key, ctrl, alt) {
            // F1: 即終了
            (KeyCode::F(1), _, _) => Action::Quit,

            // Ctrl+F / Ctrl+B: ページ送り
            (KeyCode::Char('f'), true, false) => Action::Move(Motion::PageDown),
            (KeyCode::Char('b'), true, false) => Action::Move(Motion::PageUp),

            // 矢印キー / hjkl
            (KeyCode::Left | KeyCode::Char('h'), false, false) => Action::Move(Motion::Left),
            (KeyCode::Right | KeyCode::Char('l'), false, false) => Action::Move(Motion::Right),
            (KeyCode::Up | KeyCode::Char('k'), false, false) => Action::Move(Motion::Up),
            (KeyCode::Down | KeyCode::Char('j'), false, false) => Action::Move(Motion::Down),

            // バイト単位の移動
            (KeyCode::Tab, false, false) => Action::Move(Motion::NextByte),
            (KeyCode::BackTab, _, false) => Action::Move(Motion::PreviousByte),

            (KeyCode::PageUp, _, _) => Action::Move(Motion::PageUp),
            (KeyCode::PageDown, _, _) => Action::Move(Motion::PageDown),
            (KeyCode::Home | KeyCode::Char('^'), false, false) => Action::Move(Motion::LineStart),
            (KeyCode::End | KeyCode::Char('$'), false, false) => Action::Move(Motion::LineEnd),
            (KeyCode::Char('G'), false, false) => Action::Move(Motion::End),

            // 検索の繰り返し
            (KeyCode::Char('n'), false, false) => Action::SearchNext,
            (KeyCode::Char('N'), false, false) => Action::SearchPrev,

            // HEX入力
            (KeyCode::Char(ch), false, false) if ch.is_ascii_hexdigit() => Action::InputHex(ch),

            _ => return None,
        };
        Some(action)
    }
}
