use ratatui::layout::{Position, Rect};

use crate::app::Pane;
use crate::app::viewport::Geometry;

/// アドレス欄の幅（8桁 + 空白2つ）
pub const ADDRESS_WIDTH: u16 = 10;

/// HEXペインとASCIIペインの間隔
const PANE_GAP: u16 = 1;

/// ヘッダー・詳細・ステータスの3行
const CHROME_ROWS: u16 = 3;

/// 画面上の各領域
///
/// ```text
/// Offset    00 01 02 ...   ASCII      <- header
/// 00000000  48 65 6c ...   Hel...     <- address | hex | ascii
/// hex 48 | u8 72 | ...                <- detail
///  file.bin | 00000000/00000100       <- status / command line
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub address: Rect,
    pub hex: Rect,
    pub ascii: Rect,
    pub detail: Rect,
    pub status: Rect,
    group_size: usize,
}

impl ScreenLayout {
    /// 端末サイズから各領域を計算
    ///
    /// 1グループは HEX `2g+1` カラムと ASCII `g` カラムを使う。
    /// `bytes_per_row` があれば1行のバイト数をそれ以下に抑える。
    pub fn compute(area: Rect, group_size: usize, bytes_per_row: Option<usize>) -> Self {
        let available = area.width.saturating_sub(ADDRESS_WIDTH + PANE_GAP) as usize;

        // 1グループ（3g+1 カラム）が画面幅に収まる大きさに抑える
        let group_size = group_size.clamp(1, (available.saturating_sub(1) / 3).max(1));
        let group_width = group_size * 2 + 1;

        let mut groups = (available / (group_width + group_size)).max(1);
        if let Some(limit) = bytes_per_row {
            groups = groups.min((limit / group_size).max(1));
        }

        let hex_width = u16::try_from(groups * group_width).unwrap_or(u16::MAX);
        let ascii_width = u16::try_from(groups * group_size).unwrap_or(u16::MAX);
        let body_height = area.height.saturating_sub(CHROME_ROWS).max(1);

        let body_y = area.y.saturating_add(1);
        let hex_x = area.x.saturating_add(ADDRESS_WIDTH);
        let ascii_x = hex_x.saturating_add(hex_width).saturating_add(PANE_GAP);
        let detail_y = body_y.saturating_add(body_height);

        Self {
            header: Rect::new(area.x, area.y, area.width, 1),
            address: Rect::new(area.x, body_y, ADDRESS_WIDTH, body_height),
            hex: Rect::new(hex_x, body_y, hex_width, body_height),
            ascii: Rect::new(ascii_x, body_y, ascii_width, body_height),
            detail: Rect::new(area.x, detail_y, area.width, 1),
            status: Rect::new(area.x, detail_y.saturating_add(1), area.width, 1),
            group_size,
        }
    }

    /// この配置に対応するペイン幾何
    pub fn geometry(&self) -> Geometry {
        Geometry::new(
            self.hex.width as usize,
            self.hex.height as usize,
            self.group_size,
        )
    }

    /// 画面座標をペイン内座標に変換
    pub fn hit_test(&self, column: u16, row: u16) -> Option<(Pane, usize, usize)> {
        let position = Position::new(column, row);
        for (pane, rect) in [(Pane::Hex, self.hex), (Pane::Ascii, self.ascii)] {
            if rect.contains(position) {
                return Some((
                    pane,
                    (column - rect.x) as usize,
                    (row - rect.y) as usize,
                ));
            }
        }
        None
    }
}
