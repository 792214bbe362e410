use super::viewport::{Geometry, Scroll};

/// ニブル選択（0 = 上位, 1 = 下位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nibble {
    #[default]
    High,
    Low,
}

impl Nibble {
    /// 0 = 上位, 1 = 下位
    pub fn index(self) -> usize {
        match self {
            Nibble::High => 0,
            Nibble::Low => 1,
        }
    }
}

/// カーソル移動の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    PreviousByte,
    NextByte,
    PageUp,
    PageDown,
    /// バッファ先頭
    Start,
    /// バッファ末尾
    End,
    LineStart,
    LineEnd,
    /// 絶対オフセットへジャンプ
    Offset(usize),
}

/// カーソル位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub offset: usize,
    pub nibble: Nibble,
}

impl Cursor {
    pub fn new(offset: usize, nibble: Nibble) -> Self {
        Self { offset, nibble }
    }

    /// 符号付きの目標位置をバッファ範囲に収めて設定
    ///
    /// 下限を割ったら上位ニブル、上限を超えたら下位ニブルに固定。
    fn place(&mut self, target: isize, nibble: Nibble, len: usize) {
        if target < 0 {
            self.offset = 0;
            self.nibble = Nibble::High;
        } else if target as usize >= len {
            self.offset = len.saturating_sub(1);
            self.nibble = Nibble::Low;
        } else {
            self.offset = target as usize;
            self.nibble = nibble;
        }
    }

    /// 移動を適用（スクロール調整は [`settle`] で行う）
    pub fn apply(&mut self, motion: Motion, scroll: &mut Scroll, geometry: &Geometry, len: usize) {
        let here = self.offset as isize;
        let line = geometry.bytes_per_line();
        let page = geometry.page_size() as isize;

        match motion {
            Motion::Left => match self.nibble {
                Nibble::Low => self.nibble = Nibble::High,
                Nibble::High => self.place(here - 1, Nibble::Low, len),
            },
            Motion::Right => match self.nibble {
                Nibble::High => self.nibble = Nibble::Low,
                Nibble::Low => self.place(here + 1, Nibble::High, len),
            },
            Motion::Up => {
                if let Some(offset) = self.offset.checked_sub(line) {
                    self.offset = offset;
                }
            }
            Motion::Down => {
                let offset = self.offset + line;
                if offset < len {
                    self.offset = offset;
                }
            }
            Motion::PreviousByte => self.place(here - 1, self.nibble, len),
            Motion::NextByte => self.place(here + 1, self.nibble, len),
            // ページアップはスクロール位置を巻き戻さない（settle に任せる）
            Motion::PageUp => self.place(here - page, self.nibble, len),
            Motion::PageDown => {
                scroll.start_line += geometry.pane_height();
                self.place(here + page, self.nibble, len);
            }
            Motion::Start => self.place(0, Nibble::High, len),
            Motion::End => self.place(len as isize - 1, Nibble::Low, len),
            Motion::LineStart => {
                let row = geometry.row_of(self.offset);
                self.place(geometry.first_offset_of_line(row) as isize, self.nibble, len);
            }
            Motion::LineEnd => {
                let row = geometry.row_of(self.offset);
                self.place(geometry.last_offset_of_line(row) as isize, self.nibble, len);
            }
            Motion::Offset(offset) => {
                let target = isize::try_from(offset).unwrap_or(isize::MAX);
                self.place(target, Nibble::High, len);
            }
        }
    }
}

/// イベント処理後の不変条件の回復
///
/// カーソルをバッファ範囲に収め、カーソル行が表示範囲に入るように
/// スクロール位置を決める。何度呼んでも結果は同じ。
pub fn settle(cursor: &mut Cursor, scroll: &mut Scroll, geometry: &Geometry, len: usize) {
    if len == 0 {
        *cursor = Cursor::default();
        scroll.start_line = 0;
        return;
    }
    if cursor.offset > len - 1 {
        cursor.offset = len - 1;
        cursor.nibble = Nibble::Low;
    }
    scroll.contain_row(geometry.row_of(cursor.offset), geometry);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> Geometry {
        Geometry::new(48, 4, 1) // 16 bytes x 4 rows
    }

    fn step(cursor: &mut Cursor, scroll: &mut Scroll, motion: Motion, len: usize) {
        let g = geometry();
        cursor.apply(motion, scroll, &g, len);
        settle(cursor, scroll, &g, len);
    }

    #[test]
    fn left_right_walk_nibbles() {
        let mut c = Cursor::new(5, Nibble::High);
        let mut s = Scroll::default();

        step(&mut c, &mut s, Motion::Right, 256);
        assert_eq!(c, Cursor::new(5, Nibble::Low));
        step(&mut c, &mut s, Motion::Right, 256);
        assert_eq!(c, Cursor::new(6, Nibble::High));
        step(&mut c, &mut s, Motion::Left, 256);
        assert_eq!(c, Cursor::new(5, Nibble::Low));
        step(&mut c, &mut s, Motion::Left, 256);
        assert_eq!(c, Cursor::new(5, Nibble::High));
    }

    #[test]
    fn left_at_floor_stays_on_high_nibble() {
        let mut c = Cursor::default();
        let mut s = Scroll::default();
        step(&mut c, &mut s, Motion::Left, 10);
        assert_eq!(c, Cursor::new(0, Nibble::High));
    }

    #[test]
    fn right_at_ceiling_forces_low_nibble() {
        let mut c = Cursor::new(255, Nibble::High);
        let mut s = Scroll::default();
        step(&mut c, &mut s, Motion::Right, 256);
        assert_eq!(c, Cursor::new(255, Nibble::Low));
        step(&mut c, &mut s, Motion::Right, 256);
        assert_eq!(c, Cursor::new(255, Nibble::Low));
    }

    #[test]
    fn vertical_moves_refuse_to_leave_buffer() {
        let mut c = Cursor::new(3, Nibble::Low);
        let mut s = Scroll::default();
        step(&mut c, &mut s, Motion::Up, 40);
        assert_eq!(c, Cursor::new(3, Nibble::Low));

        step(&mut c, &mut s, Motion::Down, 40);
        step(&mut c, &mut s, Motion::Down, 40);
        assert_eq!(c.offset, 35);
        step(&mut c, &mut s, Motion::Down, 40);
        assert_eq!(c.offset, 35);
    }

    #[test]
    fn byte_steps_keep_nibble() {
        let mut c = Cursor::new(3, Nibble::Low);
        let mut s = Scroll::default();
        step(&mut c, &mut s, Motion::NextByte, 40);
        assert_eq!(c, Cursor::new(4, Nibble::Low));
        step(&mut c, &mut s, Motion::PreviousByte, 40);
        step(&mut c, &mut s, Motion::PreviousByte, 40);
        assert_eq!(c, Cursor::new(2, Nibble::Low));
    }

    #[test]
    fn page_down_advances_scroll() {
        let mut c = Cursor::default();
        let mut s = Scroll::default();
        step(&mut c, &mut s, Motion::PageDown, 1024);
        assert_eq!(c.offset, 64);
        assert_eq!(s.start_line, 4);
    }

    #[test]
    fn page_up_leaves_scroll_to_clamp_pass() {
        let g = geometry();
        let mut c = Cursor::new(200, Nibble::High);
        let mut s = Scroll { start_line: 10 };

        c.apply(Motion::PageUp, &mut s, &g, 1024);
        assert_eq!(c.offset, 136);
        assert_eq!(s.start_line, 10);

        settle(&mut c, &mut s, &g, 1024);
        assert_eq!(s.start_line, 8);
    }

    #[test]
    fn page_up_past_start_clamps_to_floor() {
        let mut c = Cursor::new(10, Nibble::Low);
        let mut s = Scroll::default();
        step(&mut c, &mut s, Motion::PageUp, 1024);
        assert_eq!(c, Cursor::new(0, Nibble::High));
    }

    #[test]
    fn page_down_near_end_clamps_to_ceiling() {
        let mut c = Cursor::new(90, Nibble::High);
        let mut s = Scroll { start_line: 3 };
        step(&mut c, &mut s, Motion::PageDown, 100);
        assert_eq!(c, Cursor::new(99, Nibble::Low));
        assert_eq!(s.start_line, 6);
    }

    #[test]
    fn start_end_and_line_bounds() {
        let mut c = Cursor::new(20, Nibble::High);
        let mut s = Scroll::default();

        step(&mut c, &mut s, Motion::LineEnd, 100);
        assert_eq!(c.offset, 31);
        step(&mut c, &mut s, Motion::LineStart, 100);
        assert_eq!(c.offset, 16);
        step(&mut c, &mut s, Motion::End, 100);
        assert_eq!(c, Cursor::new(99, Nibble::Low));
        step(&mut c, &mut s, Motion::LineEnd, 100);
        assert_eq!(c, Cursor::new(99, Nibble::Low));
        step(&mut c, &mut s, Motion::Start, 100);
        assert_eq!(c, Cursor::new(0, Nibble::High));
    }

    #[test]
    fn jump_to_offset_clamps() {
        let mut c = Cursor::default();
        let mut s = Scroll::default();
        step(&mut c, &mut s, Motion::Offset(50), 100);
        assert_eq!(c, Cursor::new(50, Nibble::High));
        assert_eq!(s.start_line, 0);
        step(&mut c, &mut s, Motion::Offset(5000), 100);
        assert_eq!(c, Cursor::new(99, Nibble::Low));
    }

    #[test]
    fn settle_is_idempotent() {
        let g = geometry();
        let mut c = Cursor::new(500, Nibble::High);
        let mut s = Scroll { start_line: 0 };
        settle(&mut c, &mut s, &g, 300);
        let first = (c, s);
        settle(&mut c, &mut s, &g, 300);
        assert_eq!((c, s), first);
        assert_eq!(c, Cursor::new(299, Nibble::Low));
    }

    #[test]
    fn empty_buffer_pins_cursor() {
        let mut c = Cursor::new(4, Nibble::Low);
        let mut s = Scroll { start_line: 3 };
        step(&mut c, &mut s, Motion::Right, 0);
        assert_eq!(c, Cursor::default());
        assert_eq!(s.start_line, 0);
    }

    #[test]
    fn containment_holds_for_any_motion_sequence() {
        const MOTIONS: [Motion; 12] = [
            Motion::Left,
            Motion::Right,
            Motion::Up,
            Motion::Down,
            Motion::PreviousByte,
            Motion::NextByte,
            Motion::PageUp,
            Motion::PageDown,
            Motion::Start,
            Motion::End,
            Motion::LineStart,
            Motion::LineEnd,
        ];

        // 線形合同法で決定的な疑似乱数列を作る
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as usize
        };

        for width in [1, 3, 7, 48, 100] {
            for height in [1, 2, 5] {
                for len in [1, 2, 17, 300] {
                    let g = Geometry::new(width, height, 1);
                    let mut c = Cursor::default();
                    let mut s = Scroll::default();
                    for _ in 0..200 {
                        let motion = MOTIONS[next() % MOTIONS.len()];
                        c.apply(motion, &mut s, &g, len);
                        settle(&mut c, &mut s, &g, len);

                        assert!(c.offset < len);
                        assert!(s.first_visible_offset(&g) <= c.offset);
                        assert!(c.offset <= s.last_visible_offset(&g, len));
                    }
                }
            }
        }
    }
}
