mod hex_view;
mod layout;

pub use hex_view::HexView;
pub use layout::{ADDRESS_WIDTH, ScreenLayout};

use ratatui::{
    Frame,
    layout::Position,
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};

use crate::app::inspect;
use crate::app::render::RenderModel;

/// 配色
pub struct Colors;

impl Colors {
    pub const ADDR: Color = Color::DarkGray;
    pub const HEADER: Color = Color::Cyan;
    pub const HEX_ZERO: Color = Color::DarkGray;
    pub const HEX_HIGH: Color = Color::Red;
    pub const HEX_PRINTABLE: Color = Color::Green;
    pub const HEX_NORMAL: Color = Color::Blue;
    pub const ASCII_NORMAL: Color = Color::Gray;
    pub const CURSOR: Color = Color::Black;
    pub const CURSOR_BG: Color = Color::Yellow;
    /// カーソルのあるバイトのうち、選択されていない側のニブルとASCII
    pub const CURSOR_SHADOW_BG: Color = Color::DarkGray;
    pub const DETAIL: Color = Color::Magenta;
    pub const STATUS_FG: Color = Color::White;
    pub const STATUS_BG: Color = Color::DarkGray;
}

/// 画面全体を描画
pub fn draw(frame: &mut Frame, model: &RenderModel, layout: &ScreenLayout) {
    let area = frame.area();

    let hex_view = HexView::new(model).layout(*layout);
    frame.render_widget(hex_view, area);

    let detail = Paragraph::new(inspect::format_fields(&model.detail))
        .style(Style::default().fg(Colors::DETAIL));
    frame.render_widget(detail, layout.detail.intersection(area));

    // ステータスバー（コマンド入力中はコマンドライン）
    let status_area = layout.status.intersection(area);
    let status = match &model.command_line {
        Some(command) => {
            let x = status_area.x + command.text.chars().take(command.cursor).count() as u16;
            if x < status_area.right() {
                frame.set_cursor_position(Position::new(x, status_area.y));
            }
            command.text.clone()
        }
        None => status_line(model),
    };
    let status_widget = Paragraph::new(Line::from(status))
        .style(Style::default().bg(Colors::STATUS_BG).fg(Colors::STATUS_FG));
    frame.render_widget(status_widget, status_area);
}

/// ステータスバーの文字列
fn status_line(model: &RenderModel) -> String {
    let modified = if model.modified { "[+]" } else { "" };
    let position = model.cursor.map_or(0, |c| c.offset);
    match &model.status {
        Some(msg) => format!(" {}{} | {}", model.file_name, modified, msg),
        None => format!(
            " {}{} | {:08X}/{:08X}",
            model.file_name, modified, position, model.length
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cursor::Nibble;
    use crate::app::render::ScreenCursor;

    fn model() -> RenderModel {
        RenderModel {
            rows: Vec::new(),
            cursor: Some(ScreenCursor {
                offset: 0x20,
                nibble: Nibble::High,
                row: 0,
                hex_column: 0,
                ascii_column: 0,
            }),
            command_line: None,
            status: None,
            detail: Vec::new(),
            file_name: "a.bin".to_string(),
            modified: true,
            length: 0x100,
        }
    }

    #[test]
    fn status_line_shows_position() {
        assert_eq!(status_line(&model()), " a.bin[+] | 00000020/00000100");
    }

    #[test]
    fn status_line_prefers_message() {
        let mut m = model();
        m.modified = false;
        m.status = Some("Pattern not found".to_string());
        assert_eq!(status_line(&m), " a.bin | Pattern not found");
    }
}
