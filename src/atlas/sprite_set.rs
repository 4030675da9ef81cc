use std::collections::HashSet;
use std::ops::{Index, IndexMut};

use crate::foundation::core::Rectanglei;
use crate::foundation::error::{StyleError, StyleResult};

const NULL_INDEX: u32 = u32::MAX;

/// Leftover shelf height or slot width below this is handed out with the allocation instead of
/// being split off.
const SPLIT_THRESHOLD: u32 = 8;

const INITIAL_POOL_SIZE: usize = 16;

/// Keeps page coordinates representable as `i32` for dirty rectangles.
const MAX_PAGE_SIZE: u32 = 1 << 15;

/// Byte written over removed sprites in debug builds.
const REMOVED_SPRITE_FILL: u8 = 0xCD;

/// Atlas configuration.
#[derive(Debug, Clone, Copy)]
pub struct SpriteSetOpts {
    pub bytes_per_pixel: u32,
    /// Width and height of every page, in pixels.
    pub page_size: u32,
    /// Zeroed border kept around each sprite so sampling never bleeds into a neighbour.
    pub sprite_padding: u32,
    /// Compaction budget for one [`SpriteSet::tick`].
    pub max_changed_pixels_per_tick: u32,
}

impl Default for SpriteSetOpts {
    fn default() -> Self {
        Self {
            bytes_per_pixel: 4,
            page_size: 1024,
            sprite_padding: 1,
            max_changed_pixels_per_tick: 128 * 128,
        }
    }
}

/// Stable reference to a sprite. Stale once the sprite is removed or migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle {
    pub slot_index: u32,
    pub epoch: u32,
}

/// Location of a sprite's pixels, excluding padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteData {
    pub texture_id: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One page's pixels, with the region written since the last [`SpriteSet::clear_dirty`].
#[derive(Debug, Clone, Copy)]
pub struct PageTexture<'a> {
    pub texture_id: u32,
    pub size: u32,
    pub data: &'a [u8],
    pub dirty: Option<Rectanglei>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSetStats {
    pub pages: usize,
    pub sprites: usize,
    /// Padded sprite area.
    pub allocated_pixels: u64,
    pub page_pool_capacity: usize,
    pub shelf_pool_capacity: usize,
    pub slot_pool_capacity: usize,
}

/// Fixed-size entries with an index free list; capacity doubles when exhausted.
#[derive(Debug)]
struct Pool<T> {
    entries: Vec<T>,
    free: Vec<u32>,
}

impl<T: Default> Pool<T> {
    fn new() -> Self {
        let mut pool = Self {
            entries: Vec::new(),
            free: Vec::new(),
        };
        pool.grow();
        pool
    }

    fn grow(&mut self) {
        let old_len = self.entries.len();
        let new_len = (old_len * 2).max(INITIAL_POOL_SIZE);
        self.entries.resize_with(new_len, T::default);
        self.free.extend((old_len as u32..new_len as u32).rev());
    }

    fn allocate(&mut self) -> u32 {
        if self.free.is_empty() {
            self.grow();
        }
        self.free.pop().unwrap_or(NULL_INDEX)
    }

    fn release(&mut self, index: u32) {
        self.free.push(index);
    }

    fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn contains(&self, index: u32) -> bool {
        (index as usize) < self.entries.len()
    }
}

impl<T> Index<u32> for Pool<T> {
    type Output = T;

    fn index(&self, index: u32) -> &T {
        &self.entries[index as usize]
    }
}

impl<T> IndexMut<u32> for Pool<T> {
    fn index_mut(&mut self, index: u32) -> &mut T {
        &mut self.entries[index as usize]
    }
}

#[derive(Debug, Default)]
struct Page {
    texture_id: u32,
    data: Vec<u8>,
    dirty: Option<Rectanglei>,
    first_shelf: u32,
    previous: u32,
    next: u32,
}

/// Horizontal band of a page. Unallocated shelves hold exactly one free slot spanning the page.
#[derive(Debug, Default, Clone, Copy)]
struct Shelf {
    page: u32,
    y: u32,
    height: u32,
    previous: u32,
    next: u32,
    first_slot: u32,
    first_free_slot: u32,
    allocated: bool,
}

/// Horizontal span of a shelf. `epoch` survives reuse of the pool entry.
#[derive(Debug, Default, Clone, Copy)]
struct Slot {
    shelf: u32,
    x: u32,
    width: u32,
    sprite_width: u32,
    sprite_height: u32,
    previous: u32,
    next: u32,
    previous_free: u32,
    next_free: u32,
    epoch: u32,
    allocated: bool,
}

/// Shelf-packing texture atlas for small sprites such as glyphs.
///
/// Pages are square pixel buffers divided into shelves (rows) and slots (columns within a
/// shelf). Free neighbours are merged on removal; empty pages other than the first are released.
/// [`tick`](Self::tick) gradually moves sprites from the last page into the first.
#[derive(Debug)]
pub struct SpriteSet {
    opts: SpriteSetOpts,
    pages: Pool<Page>,
    shelves: Pool<Shelf>,
    slots: Pool<Slot>,
    first_page: u32,
    last_page: u32,
    next_texture_id: u32,
}

impl SpriteSet {
    pub fn new(opts: SpriteSetOpts) -> Self {
        let opts = SpriteSetOpts {
            bytes_per_pixel: opts.bytes_per_pixel.max(1),
            page_size: opts.page_size.clamp(1, MAX_PAGE_SIZE),
            ..opts
        };
        Self {
            opts,
            pages: Pool::new(),
            shelves: Pool::new(),
            slots: Pool::new(),
            first_page: NULL_INDEX,
            last_page: NULL_INDEX,
            next_texture_id: 0,
        }
    }

    pub fn opts(&self) -> &SpriteSetOpts {
        &self.opts
    }

    /// Copies a `width` x `height` sprite into the atlas.
    ///
    /// `row_stride` is the distance between rows of `data`, in pixels.
    pub fn add(
        &mut self,
        width: u32,
        height: u32,
        data: &[u8],
        row_stride: u32,
    ) -> StyleResult<SpriteHandle> {
        let padding = self.opts.sprite_padding;
        let padded_width = width.saturating_add(padding.saturating_mul(2));
        let padded_height = height.saturating_add(padding.saturating_mul(2));
        if padded_width == 0 || padded_height == 0 {
            return Err(atlas_error("sprite has no area"));
        }
        if padded_width > self.opts.page_size || padded_height > self.opts.page_size {
            return Err(atlas_error(format!(
                "sprite {width}x{height} does not fit a {0}x{0} page",
                self.opts.page_size
            )));
        }
        if row_stride < width {
            return Err(atlas_error("row stride is shorter than the sprite width"));
        }

        let bpp = self.opts.bytes_per_pixel as usize;
        let required = if height == 0 {
            0
        } else {
            ((height as usize - 1) * row_stride as usize + width as usize) * bpp
        };
        if data.len() < required {
            return Err(atlas_error(format!(
                "sprite data has {} bytes, expected at least {required}",
                data.len()
            )));
        }

        let slot_index = self
            .allocate(padded_width, padded_height)
            .ok_or_else(|| atlas_error("could not allocate sprite slot"))?;
        let slot = self.slots[slot_index];
        let shelf = self.shelves[slot.shelf];
        let page_size = self.opts.page_size as usize;
        let pad = padding as usize;
        let (width, height) = (width as usize, height as usize);
        let page = &mut self.pages[shelf.page];

        for row in 0..padded_height as usize {
            let start = ((shelf.y as usize + row) * page_size + slot.x as usize) * bpp;
            let dst = &mut page.data[start..start + padded_width as usize * bpp];
            if row < pad || row >= pad + height {
                dst.fill(0);
                continue;
            }
            let src_start = (row - pad) * row_stride as usize * bpp;
            dst[..pad * bpp].fill(0);
            dst[(pad + width) * bpp..].fill(0);
            dst[pad * bpp..(pad + width) * bpp]
                .copy_from_slice(&data[src_start..src_start + width * bpp]);
        }
        mark_dirty(page, slot.x, shelf.y, padded_width, padded_height);

        Ok(SpriteHandle {
            slot_index,
            epoch: slot.epoch,
        })
    }

    /// `None` for stale handles.
    pub fn get(&self, handle: SpriteHandle) -> Option<SpriteData> {
        let slot = self.live_slot(handle)?;
        let shelf = self.shelves[slot.shelf];
        let padding = self.opts.sprite_padding;
        Some(SpriteData {
            texture_id: self.pages[shelf.page].texture_id,
            x: slot.x + padding,
            y: shelf.y + padding,
            width: slot.sprite_width - padding * 2,
            height: slot.sprite_height - padding * 2,
        })
    }

    /// Tightly packed copy of a sprite's pixels.
    pub fn sprite_pixels(&self, handle: SpriteHandle) -> Option<Vec<u8>> {
        let slot = self.live_slot(handle)?;
        let shelf = self.shelves[slot.shelf];
        let page = &self.pages[shelf.page];
        let bpp = self.opts.bytes_per_pixel as usize;
        let page_size = self.opts.page_size as usize;
        let pad = self.opts.sprite_padding as usize;
        let width = slot.sprite_width as usize - pad * 2;
        let height = slot.sprite_height as usize - pad * 2;

        let mut out = Vec::with_capacity(width * height * bpp);
        for row in 0..height {
            let start = ((shelf.y as usize + pad + row) * page_size + slot.x as usize + pad) * bpp;
            out.extend_from_slice(&page.data[start..start + width * bpp]);
        }
        Some(out)
    }

    /// Frees a sprite. Returns `false` for a stale handle, which is otherwise ignored.
    pub fn remove(&mut self, handle: SpriteHandle) -> bool {
        if self.live_slot(handle).is_none() {
            tracing::debug!(?handle, "ignoring removal of a stale sprite handle");
            return false;
        }
        self.remove_slot(handle.slot_index);
        true
    }

    /// Moves sprites from the last page into the first until the pixel budget is spent.
    ///
    /// `on_migrate(old, new)` is called for every moved sprite; `old` is stale afterwards.
    /// Returns the number of sprites moved.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn tick(&mut self, mut on_migrate: impl FnMut(SpriteHandle, SpriteHandle)) -> usize {
        let budget = u64::from(self.opts.max_changed_pixels_per_tick);
        let mut changed_pixels = 0u64;
        let mut migrated = 0;

        while changed_pixels <= budget && self.first_page != self.last_page {
            let source_page = self.last_page;
            let Some(source_index) = self.first_allocated_slot(source_page) else {
                tracing::error!(page = source_page, "non-first page holds no sprites");
                break;
            };
            let source = self.slots[source_index];
            let source_y = self.shelves[source.shelf].y;

            let Some(destination_index) = self.try_allocate_in_page(
                self.first_page,
                source.sprite_width,
                source.sprite_height,
            ) else {
                break;
            };
            let destination = self.slots[destination_index];
            let destination_y = self.shelves[destination.shelf].y;

            self.copy_region(
                source_page,
                (source.x, source_y),
                self.first_page,
                (destination.x, destination_y),
                (source.sprite_width, source.sprite_height),
            );

            let old = SpriteHandle {
                slot_index: source_index,
                epoch: source.epoch,
            };
            changed_pixels += self.remove_slot(source_index);
            on_migrate(
                old,
                SpriteHandle {
                    slot_index: destination_index,
                    epoch: destination.epoch,
                },
            );
            migrated += 1;
        }

        if migrated > 0 {
            tracing::trace!(migrated, changed_pixels, "compacted sprite atlas");
        }
        migrated
    }

    /// Pages in order, first page first.
    pub fn get_textures(&self) -> Vec<PageTexture<'_>> {
        let mut out = Vec::new();
        let mut page_index = self.first_page;
        while page_index != NULL_INDEX {
            let page = &self.pages[page_index];
            out.push(PageTexture {
                texture_id: page.texture_id,
                size: self.opts.page_size,
                data: &page.data,
                dirty: page.dirty,
            });
            page_index = page.next;
        }
        out
    }

    /// Forgets dirty regions, typically after uploading them.
    pub fn clear_dirty(&mut self) {
        let mut page_index = self.first_page;
        while page_index != NULL_INDEX {
            self.pages[page_index].dirty = None;
            page_index = self.pages[page_index].next;
        }
    }

    pub fn stats(&self) -> SpriteSetStats {
        let mut stats = SpriteSetStats {
            page_pool_capacity: self.pages.capacity(),
            shelf_pool_capacity: self.shelves.capacity(),
            slot_pool_capacity: self.slots.capacity(),
            ..SpriteSetStats::default()
        };
        let mut page_index = self.first_page;
        while page_index != NULL_INDEX {
            stats.pages += 1;
            self.for_each_slot(page_index, |slot| {
                if slot.allocated {
                    stats.sprites += 1;
                    stats.allocated_pixels +=
                        u64::from(slot.sprite_width) * u64::from(slot.sprite_height);
                }
            });
            page_index = self.pages[page_index].next;
        }
        stats
    }

    /// Checks the page, shelf and slot links: shelves tile each page, slots tile each shelf, and
    /// every free slot is in its shelf's free list exactly once.
    pub fn verify_integrity(&self) -> StyleResult<()> {
        let page_size = self.opts.page_size;
        let page_bytes = (page_size as usize).pow(2) * self.opts.bytes_per_pixel as usize;

        let mut previous_page = NULL_INDEX;
        let mut page_index = self.first_page;
        while page_index != NULL_INDEX {
            let page = &self.pages[page_index];
            ensure(page.previous == previous_page, "broken page back link")?;
            ensure(
                page.data.len() == page_bytes,
                "page buffer has the wrong size",
            )?;

            let mut y = 0;
            let mut previous_shelf = NULL_INDEX;
            let mut previous_shelf_free = false;
            let mut shelf_index = page.first_shelf;
            while shelf_index != NULL_INDEX {
                let shelf = self.shelves[shelf_index];
                ensure(shelf.page == page_index, "shelf points at another page")?;
                ensure(shelf.previous == previous_shelf, "broken shelf back link")?;
                ensure(shelf.y == y, "shelves do not tile the page")?;
                ensure(
                    !(previous_shelf_free && !shelf.allocated),
                    "adjacent free shelves were not merged",
                )?;
                self.verify_shelf(shelf_index, &shelf)?;

                y += shelf.height;
                previous_shelf_free = !shelf.allocated;
                previous_shelf = shelf_index;
                shelf_index = shelf.next;
            }
            ensure(y == page_size, "shelves do not cover the page")?;

            previous_page = page_index;
            page_index = page.next;
        }
        ensure(
            self.last_page == previous_page,
            "last page is not the list tail",
        )
    }

    fn verify_shelf(&self, shelf_index: u32, shelf: &Shelf) -> StyleResult<()> {
        let mut x = 0;
        let mut free_in_chain = 0;
        let mut any_allocated = false;
        let mut previous_free = false;
        let mut previous = NULL_INDEX;
        let mut slot_index = shelf.first_slot;
        while slot_index != NULL_INDEX {
            let slot = self.slots[slot_index];
            ensure(slot.shelf == shelf_index, "slot points at another shelf")?;
            ensure(slot.previous == previous, "broken slot back link")?;
            ensure(slot.x == x, "slots do not tile the shelf")?;
            if slot.allocated {
                any_allocated = true;
                ensure(
                    slot.sprite_width <= slot.width && slot.sprite_height <= shelf.height,
                    "sprite overflows its slot",
                )?;
            } else {
                ensure(!previous_free, "adjacent free slots were not merged")?;
                free_in_chain += 1;
            }
            previous_free = !slot.allocated;
            x += slot.width;
            previous = slot_index;
            slot_index = slot.next;
        }
        ensure(x == self.opts.page_size, "slots do not cover the shelf")?;
        ensure(
            shelf.allocated == any_allocated,
            "shelf allocation flag disagrees with its slots",
        )?;

        let mut seen = HashSet::new();
        let mut previous = NULL_INDEX;
        let mut free_index = shelf.first_free_slot;
        while free_index != NULL_INDEX {
            let slot = self.slots[free_index];
            ensure(seen.insert(free_index), "free list has a cycle")?;
            ensure(!slot.allocated, "allocated slot in free list")?;
            ensure(slot.shelf == shelf_index, "free list crosses shelves")?;
            ensure(slot.previous_free == previous, "broken free list back link")?;
            previous = free_index;
            free_index = slot.next_free;
        }
        ensure(
            seen.len() == free_in_chain,
            "free list and free slots disagree",
        )
    }

    fn live_slot(&self, handle: SpriteHandle) -> Option<Slot> {
        if !self.slots.contains(handle.slot_index) {
            return None;
        }
        let slot = self.slots[handle.slot_index];
        (slot.allocated && slot.epoch == handle.epoch).then_some(slot)
    }

    fn for_each_slot(&self, page_index: u32, mut f: impl FnMut(&Slot)) {
        let mut shelf_index = self.pages[page_index].first_shelf;
        while shelf_index != NULL_INDEX {
            let shelf = &self.shelves[shelf_index];
            let mut slot_index = shelf.first_slot;
            while slot_index != NULL_INDEX {
                let slot = &self.slots[slot_index];
                f(slot);
                slot_index = slot.next;
            }
            shelf_index = shelf.next;
        }
    }

    fn first_allocated_slot(&self, page_index: u32) -> Option<u32> {
        let mut shelf_index = self.pages[page_index].first_shelf;
        while shelf_index != NULL_INDEX {
            let shelf = &self.shelves[shelf_index];
            if shelf.allocated {
                let mut slot_index = shelf.first_slot;
                while slot_index != NULL_INDEX {
                    if self.slots[slot_index].allocated {
                        return Some(slot_index);
                    }
                    slot_index = self.slots[slot_index].next;
                }
            }
            shelf_index = shelf.next;
        }
        None
    }

    fn allocate(&mut self, width: u32, height: u32) -> Option<u32> {
        let mut page_index = self.first_page;
        while page_index != NULL_INDEX {
            if let Some(slot) = self.try_allocate_in_page(page_index, width, height) {
                return Some(slot);
            }
            page_index = self.pages[page_index].next;
        }
        let page_index = self.push_page();
        self.try_allocate_in_page(page_index, width, height)
    }

    /// Appends an empty page holding one free shelf with one free slot.
    fn push_page(&mut self) -> u32 {
        let page_size = self.opts.page_size;
        let page_index = self.pages.allocate();
        let shelf_index = self.shelves.allocate();
        let slot_index = self.slots.allocate();

        self.init_free_slot(
            slot_index,
            shelf_index,
            0,
            page_size,
            NULL_INDEX,
            NULL_INDEX,
        );
        self.shelves[shelf_index] = Shelf {
            page: page_index,
            y: 0,
            height: page_size,
            previous: NULL_INDEX,
            next: NULL_INDEX,
            first_slot: slot_index,
            first_free_slot: slot_index,
            allocated: false,
        };

        let bytes = (page_size as usize).pow(2) * self.opts.bytes_per_pixel as usize;
        self.pages[page_index] = Page {
            texture_id: self.next_texture_id,
            data: vec![0; bytes],
            dirty: None,
            first_shelf: shelf_index,
            previous: self.last_page,
            next: NULL_INDEX,
        };
        self.next_texture_id = self.next_texture_id.wrapping_add(1);

        if self.last_page == NULL_INDEX {
            self.first_page = page_index;
        } else {
            self.pages[self.last_page].next = page_index;
        }
        self.last_page = page_index;
        tracing::debug!(
            texture_id = self.pages[page_index].texture_id,
            "allocated atlas page"
        );
        page_index
    }

    fn init_free_slot(
        &mut self,
        slot_index: u32,
        shelf_index: u32,
        x: u32,
        width: u32,
        previous: u32,
        next: u32,
    ) {
        let epoch = self.slots[slot_index].epoch;
        self.slots[slot_index] = Slot {
            shelf: shelf_index,
            x,
            width,
            sprite_width: 0,
            sprite_height: 0,
            previous,
            next,
            previous_free: NULL_INDEX,
            next_free: NULL_INDEX,
            epoch,
            allocated: false,
        };
    }

    /// Picks the shortest shelf that fits (allocated shelves only up to 1.5x the requested
    /// height), then splits off the unused shelf height and slot width.
    fn try_allocate_in_page(&mut self, page_index: u32, width: u32, height: u32) -> Option<u32> {
        let mut selected = None;
        let mut selected_height = u32::MAX;

        let mut shelf_index = self.pages[page_index].first_shelf;
        while shelf_index != NULL_INDEX {
            let shelf = self.shelves[shelf_index];
            let too_tall = shelf.allocated && u64::from(shelf.height) * 2 > u64::from(height) * 3;
            if shelf.height >= height && shelf.height < selected_height && !too_tall {
                let mut slot_index = shelf.first_free_slot;
                while slot_index != NULL_INDEX {
                    if self.slots[slot_index].width >= width {
                        selected = Some((shelf_index, slot_index));
                        selected_height = shelf.height;
                        break;
                    }
                    slot_index = self.slots[slot_index].next_free;
                }
                if selected_height == height {
                    break;
                }
            }
            shelf_index = shelf.next;
        }

        let (shelf_index, slot_index) = selected?;

        if !self.shelves[shelf_index].allocated {
            self.shelves[shelf_index].allocated = true;
            let shelf = self.shelves[shelf_index];
            if shelf.height - height >= SPLIT_THRESHOLD {
                let new_shelf = self.shelves.allocate();
                let new_slot = self.slots.allocate();
                let page_size = self.opts.page_size;
                self.init_free_slot(new_slot, new_shelf, 0, page_size, NULL_INDEX, NULL_INDEX);
                self.shelves[new_shelf] = Shelf {
                    page: page_index,
                    y: shelf.y + height,
                    height: shelf.height - height,
                    previous: shelf_index,
                    next: shelf.next,
                    first_slot: new_slot,
                    first_free_slot: new_slot,
                    allocated: false,
                };
                if shelf.next != NULL_INDEX {
                    self.shelves[shelf.next].previous = new_shelf;
                }
                self.shelves[shelf_index].next = new_shelf;
                self.shelves[shelf_index].height = height;
            }
        }

        let slot = self.slots[slot_index];
        if slot.width - width >= SPLIT_THRESHOLD {
            // The remainder takes the slot's place in the free list.
            let remainder = self.slots.allocate();
            self.init_free_slot(
                remainder,
                shelf_index,
                slot.x + width,
                slot.width - width,
                slot_index,
                slot.next,
            );
            self.slots[remainder].previous_free = slot.previous_free;
            self.slots[remainder].next_free = slot.next_free;
            if slot.next != NULL_INDEX {
                self.slots[slot.next].previous = remainder;
            }
            if slot.previous_free == NULL_INDEX {
                self.shelves[shelf_index].first_free_slot = remainder;
            } else {
                self.slots[slot.previous_free].next_free = remainder;
            }
            if slot.next_free != NULL_INDEX {
                self.slots[slot.next_free].previous_free = remainder;
            }
            self.slots[slot_index].next = remainder;
            self.slots[slot_index].width = width;
        } else {
            self.unlink_free_slot(shelf_index, slot_index);
        }

        let slot = &mut self.slots[slot_index];
        slot.allocated = true;
        slot.sprite_width = width;
        slot.sprite_height = height;
        slot.previous_free = NULL_INDEX;
        slot.next_free = NULL_INDEX;
        Some(slot_index)
    }

    fn unlink_free_slot(&mut self, shelf_index: u32, slot_index: u32) {
        let slot = self.slots[slot_index];
        if slot.previous_free == NULL_INDEX {
            self.shelves[shelf_index].first_free_slot = slot.next_free;
        } else {
            self.slots[slot.previous_free].next_free = slot.next_free;
        }
        if slot.next_free != NULL_INDEX {
            self.slots[slot.next_free].previous_free = slot.previous_free;
        }
    }

    /// Frees an allocated slot, merging free neighbours, and returns the sprite's padded area.
    fn remove_slot(&mut self, slot_index: u32) -> u64 {
        let slot = self.slots[slot_index];
        let shelf_index = slot.shelf;
        let shelf = self.shelves[shelf_index];
        let page_index = shelf.page;
        let pixels = u64::from(slot.sprite_width) * u64::from(slot.sprite_height);

        if cfg!(debug_assertions) {
            self.fill_region(
                page_index,
                (slot.x, shelf.y),
                (slot.sprite_width, slot.sprite_height),
                REMOVED_SPRITE_FILL,
            );
        }

        {
            let s = &mut self.slots[slot_index];
            s.allocated = false;
            s.epoch = s.epoch.wrapping_add(1);
            s.previous_free = NULL_INDEX;
            s.next_free = shelf.first_free_slot;
        }
        if shelf.first_free_slot != NULL_INDEX {
            self.slots[shelf.first_free_slot].previous_free = slot_index;
        }
        self.shelves[shelf_index].first_free_slot = slot_index;

        let next = self.slots[slot_index].next;
        if next != NULL_INDEX && !self.slots[next].allocated {
            let n = self.slots[next];
            self.unlink_free_slot(shelf_index, next);
            self.slots[slot_index].width += n.width;
            self.slots[slot_index].next = n.next;
            if n.next != NULL_INDEX {
                self.slots[n.next].previous = slot_index;
            }
            self.slots.release(next);
        }

        let previous = self.slots[slot_index].previous;
        if previous != NULL_INDEX && !self.slots[previous].allocated {
            let p = self.slots[previous];
            self.unlink_free_slot(shelf_index, previous);
            self.slots[slot_index].x = p.x;
            self.slots[slot_index].width += p.width;
            self.slots[slot_index].previous = p.previous;
            if p.previous == NULL_INDEX {
                self.shelves[shelf_index].first_slot = slot_index;
            } else {
                self.slots[p.previous].next = slot_index;
            }
            self.slots.release(previous);
        }

        let merged = self.slots[slot_index];
        if merged.previous != NULL_INDEX || merged.next != NULL_INDEX {
            return pixels;
        }
        self.shelves[shelf_index].allocated = false;

        let next_shelf = self.shelves[shelf_index].next;
        if next_shelf != NULL_INDEX && !self.shelves[next_shelf].allocated {
            let n = self.shelves[next_shelf];
            self.shelves[shelf_index].height += n.height;
            self.shelves[shelf_index].next = n.next;
            if n.next != NULL_INDEX {
                self.shelves[n.next].previous = shelf_index;
            }
            self.slots.release(n.first_slot);
            self.shelves.release(next_shelf);
        }

        let previous_shelf = self.shelves[shelf_index].previous;
        if previous_shelf != NULL_INDEX && !self.shelves[previous_shelf].allocated {
            let p = self.shelves[previous_shelf];
            self.shelves[shelf_index].y = p.y;
            self.shelves[shelf_index].height += p.height;
            self.shelves[shelf_index].previous = p.previous;
            if p.previous == NULL_INDEX {
                self.pages[page_index].first_shelf = shelf_index;
            } else {
                self.shelves[p.previous].next = shelf_index;
            }
            self.slots.release(p.first_slot);
            self.shelves.release(previous_shelf);
        }

        // The first page is the compaction target and is kept even when empty.
        if page_index == self.first_page || self.shelves[shelf_index].height != self.opts.page_size
        {
            return pixels;
        }
        self.slots.release(slot_index);
        self.shelves.release(shelf_index);
        self.release_page(page_index);
        pixels
    }

    fn release_page(&mut self, page_index: u32) {
        let (previous, next) = {
            let page = &mut self.pages[page_index];
            page.data = Vec::new();
            page.dirty = None;
            (page.previous, page.next)
        };
        if previous == NULL_INDEX {
            self.first_page = next;
        } else {
            self.pages[previous].next = next;
        }
        if next == NULL_INDEX {
            self.last_page = previous;
        } else {
            self.pages[next].previous = previous;
        }
        self.pages.release(page_index);
        tracing::debug!(page = page_index, "released empty atlas page");
    }

    fn copy_region(
        &mut self,
        source_page: u32,
        (source_x, source_y): (u32, u32),
        destination_page: u32,
        (destination_x, destination_y): (u32, u32),
        (width, height): (u32, u32),
    ) {
        let bpp = self.opts.bytes_per_pixel as usize;
        let page_size = self.opts.page_size as usize;
        let row_bytes = width as usize * bpp;
        let mut destination = std::mem::take(&mut self.pages[destination_page].data);
        {
            let source = &self.pages[source_page].data;
            for row in 0..height as usize {
                let from = ((source_y as usize + row) * page_size + source_x as usize) * bpp;
                let to =
                    ((destination_y as usize + row) * page_size + destination_x as usize) * bpp;
                destination[to..to + row_bytes].copy_from_slice(&source[from..from + row_bytes]);
            }
        }
        let page = &mut self.pages[destination_page];
        page.data = destination;
        mark_dirty(page, destination_x, destination_y, width, height);
    }

    fn fill_region(
        &mut self,
        page_index: u32,
        (x, y): (u32, u32),
        (width, height): (u32, u32),
        value: u8,
    ) {
        let bpp = self.opts.bytes_per_pixel as usize;
        let page_size = self.opts.page_size as usize;
        let page = &mut self.pages[page_index];
        for row in 0..height as usize {
            let start = ((y as usize + row) * page_size + x as usize) * bpp;
            page.data[start..start + width as usize * bpp].fill(value);
        }
        mark_dirty(page, x, y, width, height);
    }
}

fn mark_dirty(page: &mut Page, x: u32, y: u32, width: u32, height: u32) {
    let rect = Rectanglei::from_position_size(x as i32, y as i32, width as i32, height as i32);
    page.dirty = Some(page.dirty.map_or(rect, |d| d.join(rect)));
}

fn atlas_error(msg: impl Into<String>) -> StyleError {
    StyleError::Other(anyhow::anyhow!("sprite atlas: {}", msg.into()))
}

fn ensure(condition: bool, msg: &str) -> StyleResult<()> {
    if condition {
        Ok(())
    } else {
        Err(atlas_error(msg))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/atlas/sprite_set.rs"]
mod tests;
