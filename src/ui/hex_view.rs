use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use super::{Colors, ScreenLayout};
use crate::app::render::{Cell, RenderModel, Row};

/// HEX/ASCII表示ウィジェット
///
/// [`RenderModel`] の内容をそのまま画面に写すだけで、座標計算はしない。
pub struct HexView<'a> {
    /// 表示するスナップショット
    model: &'a RenderModel,
    /// 画面配置
    layout: Option<ScreenLayout>,
}

impl<'a> HexView<'a> {
    pub fn new(model: &'a RenderModel) -> Self {
        Self {
            model,
            layout: None,
        }
    }

    pub fn layout(mut self, layout: ScreenLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// バイト値に応じた色を取得
    fn byte_color(byte: u8) -> Color {
        match byte {
            0x00 => Colors::HEX_ZERO,
            0xFF => Colors::HEX_HIGH,
            0x20..=0x7E => Colors::HEX_PRINTABLE,
            _ => Colors::HEX_NORMAL,
        }
    }

    /// カーソルのあるバイトか
    fn is_cursor(&self, cell: &Cell) -> bool {
        self.model.cursor.is_some_and(|c| c.offset == cell.offset)
    }

    /// ヘッダー行を描画
    fn render_header(&self, layout: &ScreenLayout, buf: &mut Buffer) {
        let style = Style::default()
            .fg(Colors::HEADER)
            .add_modifier(Modifier::BOLD);
        let geometry = layout.geometry();
        let y = layout.header.y;

        put(buf, layout.header.x, y, "Offset", style);
        for i in 0..geometry.bytes_per_line() {
            let x = layout.hex.x as usize + geometry.column_of(i);
            put(buf, x as u16, y, &format!("{:02X}", i), style);
        }
        put(buf, layout.ascii.x, y, "ASCII", style);
    }

    /// 1行分のデータを描画
    fn render_row(&self, index: usize, row: &Row, layout: &ScreenLayout, buf: &mut Buffer) {
        let y = layout.hex.y + index as u16;

        // アドレス表示
        put(
            buf,
            layout.address.x,
            y,
            &format!("{:08X}", row.offset),
            Style::default().fg(Colors::ADDR),
        );

        for cell in &row.cells {
            let base = Style::default().fg(Self::byte_color(cell.byte));
            let x = layout.hex.x + cell.column as u16;

            // HEX表示（カーソル位置は選択中のニブルを強調）
            for (i, glyph) in cell.hex.iter().enumerate() {
                let style = match self.model.cursor {
                    Some(c) if c.offset == cell.offset && c.nibble.index() == i => {
                        base.bg(Colors::CURSOR_BG).fg(Colors::CURSOR)
                    }
                    Some(c) if c.offset == cell.offset => base.bg(Colors::CURSOR_SHADOW_BG),
                    _ => base,
                };
                put(buf, x + i as u16, y, &glyph.to_string(), style);
            }

            // ASCII表示
            let mut style = Style::default().fg(Colors::ASCII_NORMAL);
            if self.is_cursor(cell) {
                style = style.bg(Colors::CURSOR_SHADOW_BG);
            }
            put(
                buf,
                layout.ascii.x + cell.ascii_column as u16,
                y,
                &cell.ascii.to_string(),
                style,
            );
        }
    }
}

impl Widget for HexView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self
            .layout
            .unwrap_or_else(|| ScreenLayout::compute(area, 1, None));

        self.render_header(&layout, buf);

        for (index, row) in self.model.rows.iter().enumerate() {
            if index >= layout.hex.height as usize {
                break;
            }
            self.render_row(index, row, &layout, buf);
        }
    }
}

/// バッファ外にはみ出す部分を切り捨てて文字列を書く
fn put(buf: &mut Buffer, x: u16, y: u16, text: &str, style: Style) {
    let area = buf.area;
    if x < area.left() || x >= area.right() || y < area.top() || y >= area.bottom() {
        return;
    }
    let max_width = (area.right() - x) as usize;
    buf.set_stringn(x, y, text, max_width, style);
}
