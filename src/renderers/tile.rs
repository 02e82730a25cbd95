// Copyright @yucwang 2026

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tile {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Tile {
    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    pub fn height(&self) -> usize {
        self.y1 - self.y0
    }

    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Row-major index of `(x, y)` inside the tile.
    pub fn local_index(&self, x: usize, y: usize) -> usize {
        (x - self.x0) + self.width() * (y - self.y0)
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> {
        let (x0, x1) = (self.x0, self.x1);
        (self.y0..self.y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

/// Splits a `width x height` frame into square tiles, row by row. Edge tiles
/// are clipped to the frame.
pub fn split_into_tiles(width: usize, height: usize, tile_size: usize) -> Vec<Tile> {
    let size = tile_size.max(1);
    let mut tiles = Vec::new();
    for y0 in (0..height).step_by(size) {
        for x0 in (0..width).step_by(size) {
            tiles.push(Tile {
                x0,
                y0,
                x1: (x0 + size).min(width),
                y1: (y0 + size).min(height),
            });
        }
    }
    tiles
}
