use std::borrow::Borrow;

use crate::effects::composite;
use crate::foundation::core::{BlendOp, Gravity, Offset, Position, Rgba8};
use crate::foundation::error::{FoundryError, FoundryResult};
use crate::surface::Surface;

/// Tile `tiles` row-major into a grid `columns` wide.
///
/// Every cell takes the size of the largest tile and each tile is centered in its cell over
/// `background`. The grid has as many rows as needed to hold every tile. Tiles may be owned
/// or borrowed, so one surface can fill many cells without being copied.
pub fn montage<S: Borrow<Surface>>(
    tiles: &[S],
    columns: u32,
    background: Rgba8,
) -> FoundryResult<Surface> {
    if tiles.is_empty() {
        return Err(FoundryError::config("montage needs at least one tile"));
    }
    if columns == 0 {
        return Err(FoundryError::config("montage needs at least one column"));
    }

    let cell_w = tiles.iter().map(|t| t.borrow().width()).max().unwrap_or(1);
    let cell_h = tiles.iter().map(|t| t.borrow().height()).max().unwrap_or(1);
    let count = u32::try_from(tiles.len())
        .map_err(|_| FoundryError::config("too many montage tiles"))?;
    let cols = columns.min(count);
    let rows = count.div_ceil(cols);

    let width = cell_w
        .checked_mul(cols)
        .ok_or_else(|| FoundryError::config("montage width overflow"))?;
    let height = cell_h
        .checked_mul(rows)
        .ok_or_else(|| FoundryError::config("montage height overflow"))?;

    let mut out = Surface::filled(width, height, background)?.with_hints_from(tiles[0].borrow());
    for (i, tile) in tiles.iter().enumerate() {
        let tile = tile.borrow();
        let i = i as u32;
        let (cx, cy) = ((i % cols) * cell_w, (i / cols) * cell_h);
        let (dx, dy) = Gravity::Center.place((cell_w, cell_h), tile.dimensions(), Offset::ZERO);
        let at = Offset::new(
            i32::try_from(i64::from(cx) + dx).unwrap_or(i32::MAX),
            i32::try_from(i64::from(cy) + dy).unwrap_or(i32::MAX),
        );
        composite::composite(&mut out, tile, BlendOp::Over, Position::At(at));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/montage.rs"]
mod tests;
