use super::frame::Frame;

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
const ADVANCE: u32 = GLYPH_W + 1;

/// Битовые строки 5x7, старший из пяти битов соответствует левому столбцу
fn glyph(ch: char) -> Option<[u8; 7]> {
    let rows = match ch.to_ascii_uppercase() {
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        ' ' => [0; 7],
        _ => return None,
    };
    Some(rows)
}

/// Крупный текст по центру кадра; ширина не больше `width_fraction` кадра.
///
/// Символы без глифа рисуются пробелом.
pub fn draw_text_centered(frame: &mut Frame, text: &str, color: u32, width_fraction: f32) {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return;
    }

    let text_units = chars * ADVANCE - 1;
    let by_width = (frame.width() as f32 * width_fraction) as u32 / text_units;
    let by_height = frame.height() / 2 / GLYPH_H;
    let scale = by_width.min(by_height).max(1);

    let total_w = text_units * scale;
    let total_h = GLYPH_H * scale;
    let left = (frame.width() as i64 - total_w as i64) / 2;
    let top = (frame.height() as i64 - total_h as i64) / 2;

    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch) else { continue };
        let origin_x = left + (i as u32 * ADVANCE * scale) as i64;

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                    continue;
                }
                frame.fill_rect(
                    origin_x + (col * scale) as i64,
                    top + (row as u32 * scale) as i64,
                    scale,
                    scale,
                    color,
                );
            }
        }
    }
}
