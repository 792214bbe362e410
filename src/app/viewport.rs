use super::cursor::Nibble;

/// ペインの幾何情報
///
/// HEXペインは `group_size` バイトごとに `2 * group_size` 桁 + 区切り1カラム。
/// ASCIIペインは1バイト1カラム。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// HEXペインの幅（カラム数）
    pane_width: usize,
    /// ペインの高さ（行数）
    pane_height: usize,
    /// まとめて表示するバイト数
    group_size: usize,
}

impl Geometry {
    /// 幅・高さ・グループサイズは最低1に丸める
    pub fn new(pane_width: usize, pane_height: usize, group_size: usize) -> Self {
        Self {
            pane_width,
            pane_height: pane_height.max(1),
            group_size: group_size.max(1),
        }
    }

    pub fn pane_width(&self) -> usize {
        self.pane_width
    }

    /// 常に1以上
    pub fn pane_height(&self) -> usize {
        self.pane_height
    }

    /// 常に1以上
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// 1グループが占めるカラム数（区切りスペース込み）
    pub fn group_width(&self) -> usize {
        self.group_size * 2 + 1
    }

    /// 1行に表示できるグループ数（最低1）
    pub fn groups_per_line(&self) -> usize {
        (self.pane_width / self.group_width()).max(1)
    }

    /// 1行あたりのバイト数
    pub fn bytes_per_line(&self) -> usize {
        self.groups_per_line() * self.group_size
    }

    /// 1ページ分のバイト数
    pub fn page_size(&self) -> usize {
        self.pane_height * self.bytes_per_line()
    }

    pub fn row_of(&self, offset: usize) -> usize {
        offset / self.bytes_per_line()
    }

    /// HEXペイン上のカラム（上位ニブルの位置）
    pub fn column_of(&self, offset: usize) -> usize {
        let in_line = offset % self.bytes_per_line();
        (in_line / self.group_size) * self.group_width() + (in_line % self.group_size) * 2
    }

    /// ASCIIペイン上のカラム
    pub fn ascii_column_of(&self, offset: usize) -> usize {
        offset % self.bytes_per_line()
    }

    pub fn first_offset_of_line(&self, row: usize) -> usize {
        row * self.bytes_per_line()
    }

    pub fn last_offset_of_line(&self, row: usize) -> usize {
        self.first_offset_of_line(row + 1) - 1
    }

    /// HEXペインのカラムから行内バイト位置とニブルを逆算
    ///
    /// 区切りカラムや行末の余白は None。
    pub fn hex_column_to_byte(&self, x: usize) -> Option<(usize, Nibble)> {
        let group = x / self.group_width();
        let within = x % self.group_width();
        if group >= self.groups_per_line() || within == self.group_size * 2 {
            return None;
        }
        let nibble = if within % 2 == 0 {
            Nibble::High
        } else {
            Nibble::Low
        };
        Some((group * self.group_size + within / 2, nibble))
    }

    /// ASCIIペインのカラムから行内バイト位置を逆算
    pub fn ascii_column_to_byte(&self, x: usize) -> Option<usize> {
        (x < self.bytes_per_line()).then_some(x)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(48, 16, 1)
    }
}

/// スクロール状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scroll {
    /// 先頭に表示している行
    pub start_line: usize,
}

impl Scroll {
    pub fn first_visible_offset(&self, geometry: &Geometry) -> usize {
        geometry.first_offset_of_line(self.start_line)
    }

    /// 表示範囲の最終オフセット（空バッファでは 0）
    pub fn last_visible_offset(&self, geometry: &Geometry, buffer_len: usize) -> usize {
        let last_row = self.start_line + geometry.pane_height() - 1;
        geometry
            .last_offset_of_line(last_row)
            .min(buffer_len.saturating_sub(1))
    }

    /// 指定行が表示範囲に収まるようにスクロール位置を決める
    ///
    /// 反復せず、比較1回で決まる。
    pub fn contain_row(&mut self, row: usize, geometry: &Geometry) {
        let last_row = self.start_line + geometry.pane_height() - 1;
        if row < self.start_line {
            self.start_line = row;
        } else if row > last_row {
            self.start_line = row + 1 - geometry.pane_height();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_per_line_single_group() {
        let g = Geometry::new(48, 10, 1);
        assert_eq!(g.bytes_per_line(), 16);
        assert_eq!(g.page_size(), 160);
    }

    #[test]
    fn bytes_per_line_never_zero() {
        let g = Geometry::new(0, 0, 1);
        assert_eq!(g.bytes_per_line(), 1);
        assert_eq!(g.pane_height(), 1);

        let g = Geometry::new(2, 5, 4);
        assert_eq!(g.bytes_per_line(), 4);
    }

    #[test]
    fn grouped_layout() {
        // "0011 2233 " -> 2 groups of 2 bytes
        let g = Geometry::new(10, 4, 2);
        assert_eq!(g.bytes_per_line(), 4);
        assert_eq!(g.column_of(0), 0);
        assert_eq!(g.column_of(1), 2);
        assert_eq!(g.column_of(2), 5);
        assert_eq!(g.column_of(3), 7);
        assert_eq!(g.column_of(4), 0);
    }

    #[test]
    fn row_and_column() {
        let g = Geometry::new(48, 16, 1);
        assert_eq!(g.row_of(255), 15);
        assert_eq!(g.column_of(255), 45);
        assert_eq!(g.column_of(10), 30);
        assert_eq!(g.ascii_column_of(255), 15);
    }

    #[test]
    fn offset_lies_within_its_line() {
        for width in 1..40 {
            for group in 1..4 {
                let g = Geometry::new(width, 3, group);
                for offset in 0..200 {
                    let row = g.row_of(offset);
                    assert!(g.first_offset_of_line(row) <= offset);
                    assert!(offset <= g.last_offset_of_line(row));
                }
            }
        }
    }

    #[test]
    fn hex_column_inverse() {
        let g = Geometry::new(48, 16, 1);
        assert_eq!(g.hex_column_to_byte(0), Some((0, Nibble::High)));
        assert_eq!(g.hex_column_to_byte(1), Some((0, Nibble::Low)));
        assert_eq!(g.hex_column_to_byte(2), None); // 区切り
        assert_eq!(g.hex_column_to_byte(31), Some((10, Nibble::Low)));
        assert_eq!(g.hex_column_to_byte(48), None);

        for offset in 0..16 {
            let col = g.column_of(offset);
            assert_eq!(g.hex_column_to_byte(col), Some((offset, Nibble::High)));
            assert_eq!(g.hex_column_to_byte(col + 1), Some((offset, Nibble::Low)));
        }
    }

    #[test]
    fn hex_column_inverse_grouped() {
        let g = Geometry::new(10, 4, 2);
        assert_eq!(g.hex_column_to_byte(3), Some((1, Nibble::Low)));
        assert_eq!(g.hex_column_to_byte(4), None);
        assert_eq!(g.hex_column_to_byte(5), Some((2, Nibble::High)));
    }

    #[test]
    fn ascii_column_inverse() {
        let g = Geometry::new(24, 4, 1);
        assert_eq!(g.ascii_column_to_byte(7), Some(7));
        assert_eq!(g.ascii_column_to_byte(8), None);
    }

    #[test]
    fn visible_range() {
        let g = Geometry::new(48, 4, 1);
        let scroll = Scroll { start_line: 2 };
        assert_eq!(scroll.first_visible_offset(&g), 32);
        assert_eq!(scroll.last_visible_offset(&g, 1000), 95);
        assert_eq!(scroll.last_visible_offset(&g, 50), 49);
    }

    #[test]
    fn contain_row_closed_form() {
        let g = Geometry::new(48, 4, 1);
        let mut scroll = Scroll { start_line: 10 };
        scroll.contain_row(3, &g);
        assert_eq!(scroll.start_line, 3);

        scroll.contain_row(20, &g);
        assert_eq!(scroll.start_line, 17);

        scroll.contain_row(18, &g);
        assert_eq!(scroll.start_line, 17);
    }
}
