use crate::utils::vector::Vec2;

/// Tracks per-stroke state like the last position and spacing accumulator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeState {
    pub last_pos: Option<Vec2>,
    dist_until_next_dab: f32,
}

impl StrokeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new sample to the stroke, emitting evenly spaced dab centres
    /// between the previous sample and `pos`.
    ///
    /// `spacing` is measured in the same space as `pos`. The first sample of
    /// a stroke always produces a dab.
    pub fn add_point(&mut self, pos: Vec2, spacing: f32, mut dab: impl FnMut(Vec2)) {
        let spacing = spacing.max(0.01);

        if let Some(prev) = self.last_pos {
            let delta = pos - prev;
            let mut dist_left = delta.length();

            if dist_left == 0.0 {
                return;
            }

            let unit_step = delta / dist_left;
            let mut cur_pos = prev;

            while dist_left >= self.dist_until_next_dab {
                // Take a step to the next dab point.
                cur_pos = cur_pos + unit_step * self.dist_until_next_dab;
                dist_left -= self.dist_until_next_dab;
                dab(cur_pos);
                self.dist_until_next_dab = spacing;
            }

            // Take the partial step to land at the sample.
            self.dist_until_next_dab -= dist_left;
        } else {
            dab(pos);
            self.dist_until_next_dab = spacing;
        }

        self.last_pos = Some(pos);
    }

    /// Reset the stroke state.
    pub fn end(&mut self) {
        self.last_pos = None;
        self.dist_until_next_dab = 0.0;
    }
}
