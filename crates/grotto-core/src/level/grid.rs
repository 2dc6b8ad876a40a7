//! The level's tile grid: display cells plus the collision layer.
//!
//! Tiles are stored in row-major order with y = 0 at the bottom of the
//! level. The grid is immutable during gameplay; entities and the physics
//! system only ever read it.

use glam::Vec2;

use crate::api::types::Rect;

/// A single tile: its atlas cell and whether it blocks movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileCell {
    pub col: f32,
    pub row: f32,
    pub solid: bool,
}

impl TileCell {
    pub fn solid(col: f32, row: f32) -> Self {
        Self {
            col,
            row,
            solid: true,
        }
    }

    pub fn decor(col: f32, row: f32) -> Self {
        Self {
            col,
            row,
            solid: false,
        }
    }
}

/// 2D grid of tiles with a fixed square tile size, anchored at the world
/// origin. `None` is an empty cell.
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: f32,
    cells: Vec<Option<TileCell>>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tile_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size,
            cells: vec![None; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Level extent in world units.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    pub fn get(&self, tx: u32, ty: u32) -> Option<&TileCell> {
        if tx >= self.width || ty >= self.height {
            return None;
        }
        self.cells[(ty * self.width + tx) as usize].as_ref()
    }

    pub fn set(&mut self, tx: u32, ty: u32, cell: Option<TileCell>) {
        if tx < self.width && ty < self.height {
            self.cells[(ty * self.width + tx) as usize] = cell;
        }
    }

    /// Whether the cell at grid coordinates is solid. Out of bounds reads
    /// as empty, so entities can leave the stage and fall.
    pub fn is_solid(&self, tx: u32, ty: u32) -> bool {
        self.get(tx, ty).map(|c| c.solid).unwrap_or(false)
    }

    pub fn solid_at_world(&self, pos: Vec2) -> bool {
        match self.world_to_tile(pos) {
            Some((tx, ty)) => self.is_solid(tx, ty),
            None => false,
        }
    }

    pub fn world_to_tile(&self, pos: Vec2) -> Option<(u32, u32)> {
        if pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let tx = (pos.x / self.tile_size) as u32;
        let ty = (pos.y / self.tile_size) as u32;
        if tx >= self.width || ty >= self.height {
            return None;
        }
        Some((tx, ty))
    }

    /// World-space center of a tile.
    pub fn tile_center(&self, tx: u32, ty: u32) -> Vec2 {
        let half = self.tile_size / 2.0;
        Vec2::new(
            tx as f32 * self.tile_size + half,
            ty as f32 * self.tile_size + half,
        )
    }

    /// World-space rectangle of a tile.
    pub fn tile_rect(&self, tx: u32, ty: u32) -> Rect {
        Rect::new(
            tx as f32 * self.tile_size,
            ty as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Grid-coordinate range of tiles touching `rect`, clamped to the
    /// grid. Returns `(min_tx, min_ty, max_tx_exclusive, max_ty_exclusive)`.
    fn tile_range(&self, rect: &Rect) -> (u32, u32, u32, u32) {
        let min_tx = ((rect.x / self.tile_size).floor().max(0.0)) as u32;
        let min_ty = ((rect.y / self.tile_size).floor().max(0.0)) as u32;
        let max_tx = (((rect.right() / self.tile_size).ceil()).max(0.0) as u32).min(self.width);
        let max_ty = (((rect.top() / self.tile_size).ceil()).max(0.0) as u32).min(self.height);
        (min_tx, min_ty, max_tx, max_ty)
    }

    /// World rects of all solid tiles overlapping `rect`.
    pub fn solid_rects_in(&self, rect: &Rect) -> Vec<Rect> {
        let (min_tx, min_ty, max_tx, max_ty) = self.tile_range(rect);
        let mut rects = Vec::new();
        for ty in min_ty..max_ty {
            for tx in min_tx..max_tx {
                if self.is_solid(tx, ty) {
                    let tile = self.tile_rect(tx, ty);
                    if tile.overlaps(rect) {
                        rects.push(tile);
                    }
                }
            }
        }
        rects
    }

    /// World rects of every solid tile in the column containing `world_x`,
    /// ordered bottom-up. Used by the off-screen respawn scan.
    pub fn solid_column(&self, world_x: f32) -> Vec<Rect> {
        if world_x < 0.0 {
            return Vec::new();
        }
        let tx = (world_x / self.tile_size) as u32;
        if tx >= self.width {
            return Vec::new();
        }
        (0..self.height)
            .filter(|&ty| self.is_solid(tx, ty))
            .map(|ty| self.tile_rect(tx, ty))
            .collect()
    }

    /// All non-empty cells with centers inside the query rect, for render
    /// culling.
    pub fn cells_in(&self, rect: &Rect) -> Vec<(Vec2, TileCell)> {
        let (min_tx, min_ty, max_tx, max_ty) = self.tile_range(rect);
        let mut cells = Vec::new();
        for ty in min_ty..max_ty {
            for tx in min_tx..max_tx {
                if let Some(cell) = self.get(tx, ty) {
                    cells.push((self.tile_center(tx, ty), *cell));
                }
            }
        }
        cells
    }

    pub fn solid_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.map(|c| c.solid).unwrap_or(false))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_floor() -> TileGrid {
        // 10x6 grid, 16px tiles, solid floor along the bottom row.
        let mut g = TileGrid::new(10, 6, 16.0);
        for tx in 0..10 {
            g.set(tx, 0, Some(TileCell::solid(0.0, 0.0)));
        }
        g
    }

    #[test]
    fn out_of_bounds_is_empty() {
        let g = grid_with_floor();
        assert!(!g.is_solid(50, 0));
        assert!(!g.solid_at_world(Vec2::new(-5.0, 8.0)));
        assert!(!g.solid_at_world(Vec2::new(5.0, -8.0)));
    }

    #[test]
    fn world_queries_hit_the_floor() {
        let g = grid_with_floor();
        assert!(g.solid_at_world(Vec2::new(40.0, 8.0)));
        assert!(!g.solid_at_world(Vec2::new(40.0, 24.0)));
    }

    #[test]
    fn solid_rects_in_returns_overlaps_only() {
        let g = grid_with_floor();
        // A rect dipping 2 units into the floor across two tiles.
        let probe = Rect::new(14.0, 14.0, 20.0, 20.0);
        let rects = g.solid_rects_in(&probe);
        assert_eq!(rects.len(), 3);
        for r in &rects {
            assert!(r.overlaps(&probe));
        }

        // Fully above the floor: nothing.
        assert!(g.solid_rects_in(&Rect::new(14.0, 20.0, 20.0, 20.0)).is_empty());
    }

    #[test]
    fn solid_column_is_bottom_up() {
        let mut g = grid_with_floor();
        g.set(3, 1, Some(TileCell::solid(0.0, 0.0)));
        g.set(3, 4, Some(TileCell::solid(0.0, 0.0)));

        let col = g.solid_column(3.5 * 16.0);
        assert_eq!(col.len(), 3);
        assert_eq!(col[0].y, 0.0);
        assert_eq!(col[1].y, 16.0);
        assert_eq!(col[2].y, 64.0);
    }

    #[test]
    fn bounds_cover_the_grid() {
        let g = grid_with_floor();
        let b = g.bounds();
        assert_eq!(b.w, 160.0);
        assert_eq!(b.h, 96.0);
    }

    #[test]
    fn cells_in_culls_by_rect() {
        let g = grid_with_floor();
        let cells = g.cells_in(&Rect::new(0.0, 0.0, 33.0, 16.0));
        assert_eq!(cells.len(), 3);
    }
}
