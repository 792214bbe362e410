use crate::buffer::{BufferError, ByteBuffer};

use super::cursor::{Cursor, Motion, Nibble};
use super::viewport::{Geometry, Scroll};

/// カーソル位置のニブルをHEX1桁で上書きし、カーソルを1ニブル進める
///
/// HEX以外の文字や空バッファでは何もせず `Ok(false)` を返す。
pub fn overwrite_nibble(
    buffer: &mut ByteBuffer,
    cursor: &mut Cursor,
    scroll: &mut Scroll,
    geometry: &Geometry,
    digit: char,
) -> Result<bool, BufferError> {
    let Some(value) = digit.to_digit(16).map(|d| d as u8) else {
        return Ok(false);
    };
    if buffer.is_empty() {
        return Ok(false);
    }

    let old = buffer.read_byte(cursor.offset)?;
    let new = match cursor.nibble {
        Nibble::High => (value << 4) | (old & 0x0F),
        Nibble::Low => (old & 0xF0) | value,
    };
    buffer.write_byte(cursor.offset, new)?;

    cursor.apply(Motion::Right, scroll, geometry, buffer.len());
    Ok(true)
}
