//! Sprite registry and compositor
//!
//! A registry is an ordered list of sprite ids. Rendering groups the
//! registered sprites by screen origin, orders each group by z, and
//! resolves the shared background color as transparency within the group:
//!
//! 1. Sprites with the same `(x, y)` form a compositing group. Groups never
//!    affect each other, even when their footprints overlap.
//! 2. A group is drawn in ascending z. Equal-z sprites keep registration
//!    order, but callers should not rely on it.
//! 3. A composite grid sized to the group footprint records, per local
//!    position, the top-most pixel that is not the background color.
//! 4. Each sprite streams its own pixel, except where its pixel is the
//!    background color: there the composite color shows through (or the
//!    background, if no sprite in the group painted that position).
//!
//! Nothing is buffered beyond one group's composite grid; each sprite is
//! pushed to the panel through its own window as soon as it is resolved.

use heapless::{FnvIndexMap, Vec};

use super::color::Color;
use super::geometry::{Point, SCREEN};
use super::sprite::{Sprite, SpriteArena, SpriteError, SpriteId, MAX_SPRITES, MAX_SPRITE_PIXELS};
use crate::traits::{DisplayExt, DisplayTransport};

/// Members of one compositing group: (z, registration position, id)
type Group = Vec<(u8, u8, SpriteId), MAX_SPRITES>;

/// Ordered set of sprites rendered together
#[derive(Debug, Clone, Default)]
pub struct SpriteRegistry {
    sprites: Vec<SpriteId, MAX_SPRITES>,
}

impl SpriteRegistry {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            sprites: Vec::new(),
        }
    }

    /// Register a sprite
    ///
    /// Registering an id that is already present is a no-op.
    pub fn register(&mut self, id: SpriteId) -> Result<(), SpriteError> {
        if self.contains(id) {
            return Ok(());
        }
        self.sprites
            .push(id)
            .map_err(|_| SpriteError::RegistryFull)
    }

    /// Remove a sprite from this registry only
    ///
    /// Returns false if the sprite was not registered.
    pub fn unregister(&mut self, id: SpriteId) -> bool {
        match self.sprites.iter().position(|&s| s == id) {
            Some(pos) => {
                self.sprites.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Check if a sprite is registered
    pub fn contains(&self, id: SpriteId) -> bool {
        self.sprites.contains(&id)
    }

    /// Registered ids in registration order
    pub fn ids(&self) -> &[SpriteId] {
        &self.sprites
    }

    /// Number of registered sprites
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Composite and draw every registered sprite
    ///
    /// Ids not present in `arena` and sprites with an empty grid are
    /// skipped. Sprite state is never modified.
    pub fn render_all<T: DisplayTransport + ?Sized>(
        &self,
        arena: &SpriteArena,
        background: Color,
        transport: &mut T,
    ) {
        for group in self.groups(arena).values_mut() {
            group.sort_unstable_by_key(|&(z, seq, _)| (z, seq));
            render_group(group, arena, background, transport);
        }
    }

    /// Partition registered sprites by origin, groups in first-seen order
    fn groups(&self, arena: &SpriteArena) -> FnvIndexMap<Point, Group, MAX_SPRITES> {
        let mut groups: FnvIndexMap<Point, Group, MAX_SPRITES> = FnvIndexMap::new();

        for (seq, &id) in self.sprites.iter().enumerate() {
            let Some(sprite) = arena.get(id) else {
                continue;
            };
            if sprite.is_empty() {
                continue;
            }

            let member = (sprite.z, seq as u8, id);
            let origin = sprite.origin();
            if let Some(group) = groups.get_mut(&origin) {
                // Capacities match the registry, so neither push can fail
                let _ = group.push(member);
            } else {
                let mut group = Group::new();
                let _ = group.push(member);
                let _ = groups.insert(origin, group);
            }
        }

        groups
    }
}

/// Top-most non-background color per local position of one group
struct Composite {
    width: usize,
    height: usize,
    cells: Vec<Option<Color>, MAX_SPRITE_PIXELS>,
}

impl Composite {
    /// Build the composite for a z-sorted group
    fn build<'a>(sprites: impl Iterator<Item = &'a Sprite> + Clone, background: Color) -> Self {
        let width = sprites.clone().map(|s| s.width() as usize).max().unwrap_or(0);
        let height = sprites.clone().map(|s| s.height() as usize).max().unwrap_or(0);

        let mut cells = Vec::new();
        // Sprite edges are capped at MAX_SPRITE_DIM, so the footprint fits
        let _ = cells.resize(width * height, None);

        for sprite in sprites {
            let sprite_width = sprite.width() as usize;
            for (i, &color) in sprite.pixels().iter().enumerate() {
                if color == background {
                    continue;
                }
                let (col, row) = (i % sprite_width, i / sprite_width);
                if let Some(cell) = cells.get_mut(row * width + col) {
                    *cell = Some(color);
                }
            }
        }

        Self {
            width,
            height,
            cells,
        }
    }

    fn get(&self, col: usize, row: usize) -> Option<Color> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row * self.width + col).copied().flatten()
    }
}

fn render_group<T: DisplayTransport + ?Sized>(
    group: &Group,
    arena: &SpriteArena,
    background: Color,
    transport: &mut T,
) {
    let sprites = group.iter().filter_map(|&(_, _, id)| arena.get(id));
    let composite = Composite::build(sprites.clone(), background);

    for sprite in sprites {
        render_sprite(sprite, &composite, background, transport);
    }
}

fn render_sprite<T: DisplayTransport + ?Sized>(
    sprite: &Sprite,
    composite: &Composite,
    background: Color,
    transport: &mut T,
) {
    let Some(visible) = sprite.bounds().intersect(&SCREEN) else {
        return;
    };

    let col_start = (visible.x as i32 - sprite.x as i32) as u16;
    let row_start = (visible.y as i32 - sprite.y as i32) as u16;

    let mut window = transport.window(visible);
    for row in row_start..row_start + visible.height {
        for col in col_start..col_start + visible.width {
            let own = sprite.pixel(col, row).unwrap_or(background);
            let color = if own == background {
                composite
                    .get(col as usize, row as usize)
                    .unwrap_or(background)
            } else {
                own
            };
            window.push(color);
        }
    }
}
