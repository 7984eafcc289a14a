use crate::utils::vector::Vec2;

/// Inclusive pixel rectangle touched by a dab, already clipped to the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DabBounds {
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32,
    pub end_y: u32,
}

/// Hard-edged circular dab. A pixel is covered when its centre lies within
/// `radius` of `center`; there is no anti-aliasing so a repeated dab with the
/// same parameters covers exactly the same pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dab {
    pub center: Vec2,
    pub radius: f32,
}

impl Dab {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Pixel bounds of the dab clipped to a `width` x `height` target, or
    /// `None` when the dab misses it entirely.
    pub fn bounds(&self, width: u32, height: u32) -> Option<DabBounds> {
        if width == 0 || height == 0 || !self.center.x.is_finite() || !self.center.y.is_finite()
        {
            return None;
        }
        let r_ceil = self.radius.ceil() as i64;
        let min_x = self.center.x.floor() as i64 - r_ceil;
        let max_x = self.center.x.floor() as i64 + r_ceil;
        let min_y = self.center.y.floor() as i64 - r_ceil;
        let max_y = self.center.y.floor() as i64 + r_ceil;

        let (w, h) = (width as i64, height as i64);
        if max_x < 0 || max_y < 0 || min_x >= w || min_y >= h {
            return None;
        }

        Some(DabBounds {
            start_x: min_x.max(0) as u32,
            start_y: min_y.max(0) as u32,
            end_x: max_x.min(w - 1) as u32,
            end_y: max_y.min(h - 1) as u32,
        })
    }

    #[inline]
    pub fn covers(&self, x: u32, y: u32) -> bool {
        let dx = x as f32 + 0.5 - self.center.x;
        let dy = y as f32 + 0.5 - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Visit every covered pixel of a `width` x `height` target, row by row.
    pub fn for_each_pixel(&self, width: u32, height: u32, mut f: impl FnMut(u32, u32)) {
        let Some(b) = self.bounds(width, height) else {
            return;
        };
        for y in b.start_y..=b.end_y {
            for x in b.start_x..=b.end_x {
                if self.covers(x, y) {
                    f(x, y);
                }
            }
        }
    }
}
