use super::cursor::{Cursor, Nibble};
use super::inspect::Field;
use super::viewport::{Geometry, Scroll};

/// 1バイト分の表示内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub offset: usize,
    pub byte: u8,
    /// HEXペインの2文字
    pub hex: [char; 2],
    /// ASCIIペインの1文字（非表示文字は '.'）
    pub ascii: char,
    /// HEXペイン内のカラム
    pub column: usize,
    /// ASCIIペイン内のカラム
    pub ascii_column: usize,
}

/// 1行分の表示内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 行頭オフセット
    pub offset: usize,
    pub cells: Vec<Cell>,
}

/// ペイン内のカーソル位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCursor {
    pub offset: usize,
    pub nibble: Nibble,
    /// 表示行（スクロール位置からの相対）
    pub row: usize,
    /// HEXペイン内のカラム（ニブル込み）
    pub hex_column: usize,
    pub ascii_column: usize,
}

/// 入力中のコマンドライン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub text: String,
    /// 文字単位のカーソル位置
    pub cursor: usize,
}

/// 描画層に渡すスナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    pub rows: Vec<Row>,
    pub cursor: Option<ScreenCursor>,
    pub command_line: Option<CommandLine>,
    /// 一時的なステータスメッセージ（次のイベントで消える）
    pub status: Option<String>,
    pub detail: Vec<Field>,
    pub file_name: String,
    pub modified: bool,
    pub length: usize,
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// バイトをHEX2文字に変換
pub fn hex_glyphs(byte: u8) -> [char; 2] {
    [
        HEX_DIGITS[(byte >> 4) as usize] as char,
        HEX_DIGITS[(byte & 0x0F) as usize] as char,
    ]
}

/// ASCIIペイン用の文字（表示可能文字以外はプレースホルダ）
pub fn ascii_glyph(byte: u8) -> char {
    match byte {
        0x20..=0x7E => byte as char,
        _ => '.',
    }
}

/// 表示範囲の行を組み立てる
pub fn visible_rows(data: &[u8], geometry: &Geometry, scroll: &Scroll) -> Vec<Row> {
    let mut rows = Vec::new();
    if data.is_empty() {
        return rows;
    }
    let first = scroll.first_visible_offset(geometry);
    let last = scroll.last_visible_offset(geometry, data.len());
    if first > last {
        return rows;
    }

    for row_start in (first..=last).step_by(geometry.bytes_per_line()) {
        let row_end = (row_start + geometry.bytes_per_line()).min(last + 1);
        let cells = (row_start..row_end)
            .map(|offset| Cell {
                offset,
                byte: data[offset],
                hex: hex_glyphs(data[offset]),
                ascii: ascii_glyph(data[offset]),
                column: geometry.column_of(offset),
                ascii_column: geometry.ascii_column_of(offset),
            })
            .collect();
        rows.push(Row {
            offset: row_start,
            cells,
        });
    }
    rows
}

/// カーソルの画面位置（表示範囲外・空バッファなら None）
pub fn screen_cursor(
    cursor: &Cursor,
    geometry: &Geometry,
    scroll: &Scroll,
    len: usize,
) -> Option<ScreenCursor> {
    if len == 0 {
        return None;
    }
    let row = geometry.row_of(cursor.offset).checked_sub(scroll.start_line)?;
    if row >= geometry.pane_height() {
        return None;
    }
    Some(ScreenCursor {
        offset: cursor.offset,
        nibble: cursor.nibble,
        row,
        hex_column: geometry.column_of(cursor.offset) + cursor.nibble.index(),
        ascii_column: geometry.ascii_column_of(cursor.offset),
    })
}
