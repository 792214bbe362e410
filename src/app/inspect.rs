/// 詳細ペインの1項目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

/// カーソル位置から始まるバイト列を数値として解釈
///
/// 残りバイト数が足りない型は省略する。
pub fn inspect(data: &[u8], offset: usize) -> Vec<Field> {
    let Some(rest) = data.get(offset..) else {
        return Vec::new();
    };
    let Some(&byte) = rest.first() else {
        return Vec::new();
    };

    let mut fields = vec![
        Field::new("hex", format!("{:02X}", byte)),
        Field::new("u8", byte.to_string()),
        Field::new("i8", (byte as i8).to_string()),
        Field::new("oct", format!("{:03o}", byte)),
        Field::new("bin", format!("{:08b}", byte)),
    ];

    if let Some(bytes) = rest.get(..2) {
        let pair = [bytes[0], bytes[1]];
        fields.push(Field::new(
            "u16",
            format!("LE:{} BE:{}", u16::from_le_bytes(pair), u16::from_be_bytes(pair)),
        ));
    }

    if let Some(bytes) = rest.get(..4) {
        let quad = [bytes[0], bytes[1], bytes[2], bytes[3]];
        fields.push(Field::new(
            "u32",
            format!("LE:{} BE:{}", u32::from_le_bytes(quad), u32::from_be_bytes(quad)),
        ));
    }

    fields
}

/// 1行表示用に連結
pub fn format_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| format!("{} {}", f.label, f.value))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_byte_fields() {
        let fields = inspect(&[0xFF], 0);
        let labels: Vec<_> = fields.iter().map(|f| f.label).collect();
        assert_eq!(labels, ["hex", "u8", "i8", "oct", "bin"]);
        assert_eq!(fields[1].value, "255");
        assert_eq!(fields[2].value, "-1");
        assert_eq!(fields[3].value, "377");
        assert_eq!(fields[4].value, "11111111");
    }

    #[test]
    fn multi_byte_fields_respect_endianness() {
        let fields = inspect(&[0x00, 0x01, 0x00, 0x00, 0x02], 1);
        assert_eq!(fields[5], Field::new("u16", "LE:1 BE:256".to_string()));
        assert_eq!(fields[6], Field::new("u32", "LE:33554433 BE:16777218".to_string()));
    }

    #[test]
    fn out_of_range_offset_is_empty() {
        assert!(inspect(&[1, 2], 2).is_empty());
        assert!(inspect(&[], 0).is_empty());
        assert!(inspect(&[1, 2], 9).is_empty());
    }

    #[test]
    fn formatted_line() {
        let line = format_fields(&inspect(&[0x41], 0));
        assert_eq!(line, "hex 41 | u8 65 | i8 65 | oct 101 | bin 01000001");
    }
}
