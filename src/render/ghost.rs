use image::{Rgba, RgbaImage};

/// Процедурный призрак на случай, если в папке нет ни одной картинки:
/// полупрозрачное бледное тело с волнистым низом и тёмными глазами.
pub fn placeholder_ghost(size: u32) -> RgbaImage {
    let size = size.max(8);
    let s = size as f32;
    let cx = s / 2.0;
    let head_r = s * 0.38;
    let head_cy = s * 0.42;
    let hem = s * 0.9;

    RgbaImage::from_fn(size, size, |x, y| {
        let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
        let dx = fx - cx;

        // Тело: полукруг сверху и прямоугольник до волнистого края
        let in_head = dx * dx + (fy - head_cy).powi(2) <= head_r * head_r;
        let wave = (fx / s * std::f32::consts::TAU * 3.0).sin() * s * 0.04;
        let in_body = dx.abs() <= head_r && fy >= head_cy && fy <= hem + wave;
        if !(in_head || in_body) {
            return Rgba([0, 0, 0, 0]);
        }

        let eye_r = s * 0.06;
        let eye_y = head_cy - s * 0.02;
        let in_eye = [cx - s * 0.13, cx + s * 0.13]
            .iter()
            .any(|ex| (fx - ex).powi(2) + (fy - eye_y).powi(2) <= eye_r * eye_r);
        if in_eye {
            return Rgba([10, 10, 20, 255]);
        }

        Rgba([230, 235, 245, 220])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_has_body_and_transparent_corners() {
        let ghost = placeholder_ghost(64);
        assert_eq!(ghost.dimensions(), (64, 64));
        assert_eq!(ghost.get_pixel(0, 0)[3], 0);
        assert!(ghost.get_pixel(32, 40)[3] > 0);
    }

    #[test]
    fn test_minimum_size() {
        assert_eq!(placeholder_ghost(0).dimensions(), (8, 8));
    }
}
