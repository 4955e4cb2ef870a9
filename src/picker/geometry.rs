/// Where the host measures vertical touch coordinates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// y = 0 at the top edge of the viewport, growing downwards.
    #[default]
    Top,
    /// y = 0 at the bottom edge, growing upwards.
    Bottom,
}

/// Layout of a value wheel.
///
/// Content is padded above and below by `(viewport - row) / 2` so the first
/// and last rows can sit on the centre line. Scroll offsets are normalised:
/// 0.0 shows the top of the content (first row centred), 1.0 the bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub viewport_height: f64,
    pub row_height: f64,
    pub rows: usize,
    pub origin: Origin,
}

impl WheelGeometry {
    pub fn new(viewport_height: f64, row_height: f64, rows: usize, origin: Origin) -> Self {
        WheelGeometry {
            viewport_height,
            row_height,
            rows,
            origin,
        }
    }

    pub fn pad(&self) -> f64 {
        ((self.viewport_height - self.row_height) / 2.0).max(0.0)
    }

    pub fn content_height(&self) -> f64 {
        2.0 * self.pad() + self.rows as f64 * self.row_height
    }

    /// Scrollable distance in pixels. Zero or negative means nothing scrolls.
    pub fn scroll_span(&self) -> f64 {
        self.content_height() - self.viewport_height
    }

    fn usable(&self) -> bool {
        self.rows > 0 && self.row_height > 0.0 && self.scroll_span() > 0.0
    }

    /// Pixels scrolled past the top of the content for a normalised offset.
    pub fn scroll_px(&self, offset: f64) -> f64 {
        offset.clamp(0.0, 1.0) * self.scroll_span().max(0.0)
    }

    pub fn offset_for_px(&self, px: f64) -> f64 {
        let span = self.scroll_span();
        if span <= 0.0 {
            return 0.0;
        }
        (px / span).clamp(0.0, 1.0)
    }

    fn clamp_index(&self, raw: f64) -> usize {
        let last = self.rows.saturating_sub(1) as f64;
        raw.clamp(0.0, last) as usize
    }

    /// Row whose centre is nearest the viewport's centre line. Returns
    /// `current` unchanged when the geometry cannot scroll.
    pub fn index_for_offset(&self, offset: f64, current: usize) -> usize {
        if !self.usable() {
            return current;
        }
        let center_y = self.scroll_px(offset) + self.viewport_height / 2.0;
        let raw = ((center_y - self.pad() - self.row_height / 2.0) / self.row_height).round();
        self.clamp_index(raw)
    }

    /// Offset that puts row `index` on the centre line.
    pub fn offset_for_index(&self, index: usize) -> f64 {
        if !self.usable() {
            return 0.0;
        }
        let center_y = self.pad() + self.row_height / 2.0 + index as f64 * self.row_height;
        self.offset_for_px(center_y - self.viewport_height / 2.0)
    }

    /// Distance of a touch from the viewport's top edge.
    pub fn depth_from_top(&self, touch_y: f64) -> f64 {
        match self.origin {
            Origin::Top => touch_y,
            Origin::Bottom => self.viewport_height - touch_y,
        }
    }

    /// Row rendered under a touch at viewport-local `touch_y`.
    pub fn index_at(&self, offset: f64, touch_y: f64) -> Option<usize> {
        if self.rows == 0 || self.row_height <= 0.0 {
            return None;
        }
        let content_y = self.scroll_px(offset) + self.depth_from_top(touch_y);
        let raw = ((content_y - self.pad()) / self.row_height).floor();
        Some(self.clamp_index(raw))
    }

    /// Viewport-local y of the centre of row `index` at `offset`, in the
    /// host's coordinate convention.
    pub fn row_center_y(&self, offset: f64, index: usize) -> f64 {
        let content_y = self.pad() + (index as f64 + 0.5) * self.row_height;
        let depth = content_y - self.scroll_px(offset);
        match self.origin {
            Origin::Top => depth,
            Origin::Bottom => self.viewport_height - depth,
        }
    }
}
