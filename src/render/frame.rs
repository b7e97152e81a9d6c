use image::RgbaImage;

pub const BLACK: u32 = 0x000000;
/// Почти чёрный: отличим от «пустого» оверлея
pub const NEAR_BLACK: u32 = 0x050505;
pub const RED: u32 = 0xFF0000;

/// Кадр оверлея в формате 0x00RRGGBB (как у softbuffer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Frame {
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    /// Цвет фона: левый верхний пиксель
    pub fn background(&self) -> u32 {
        self.pixels.first().copied().unwrap_or(BLACK)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Прямоугольник с обрезкой по краям кадра
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w as i64).min(self.width as i64);
        let y1 = (y + h as i64).min(self.height as i64);

        for py in y0..y1 {
            for px in x0..x1 {
                let i = self.index(px as u32, py as u32);
                self.pixels[i] = color;
            }
        }
    }

    /// Наложить RGBA-изображение с дополнительной прозрачностью `opacity` (0..=1)
    pub fn blend_image(&mut self, image: &RgbaImage, x: i64, y: i64, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }

        for (ix, iy, src) in image.enumerate_pixels() {
            let px = x + ix as i64;
            let py = y + iy as i64;
            if px < 0 || py < 0 || px >= self.width as i64 || py >= self.height as i64 {
                continue;
            }

            let alpha = src[3] as f32 / 255.0 * opacity;
            if alpha <= 0.0 {
                continue;
            }

            let i = self.index(px as u32, py as u32);
            self.pixels[i] = mix(self.pixels[i], [src[0], src[1], src[2]], alpha);
        }
    }

    /// Изображение по центру кадра, непрозрачное
    pub fn draw_centered(&mut self, image: &RgbaImage) {
        let x = (self.width as i64 - image.width() as i64) / 2;
        let y = (self.height as i64 - image.height() as i64) / 2;
        self.blend_image(image, x, y, 1.0);
    }
}

fn mix(dst: u32, src: [u8; 3], alpha: f32) -> u32 {
    let channel = |shift: u32, value: u8| -> u32 {
        let d = ((dst >> shift) & 0xFF) as f32;
        let blended = d + (value as f32 - d) * alpha;
        (blended.round().clamp(0.0, 255.0) as u32) << shift
    };
    channel(16, src[0]) | channel(8, src[1]) | channel(0, src[2])
}
