//! The runtime memory image: the parts of RAM that must be established before
//! any Rust code may touch a `static`.
//!
//! The linker hands us bare addresses.  We wrap them up as `Region`s so the
//! copy and zero loops below are described by a length, not by a pair of
//! pointers that could be walked past each other.

use core::ptr;
use core::sync::atomic::{compiler_fence, Ordering};

/// A half-open range of addresses, `start..end`.
///
/// A `Region` whose `end` lies below its `start` is a linkage defect.  It is
/// treated as empty everywhere at run time so that nothing can underflow;
/// `validate` reports it at build or test time.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    start: usize,
    end: usize,
}

impl Region {
    pub const fn new(start: usize, end: usize) -> Region {
        Region { start, end }
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn end(&self) -> usize {
        self.end
    }

    /// Byte length.  Never negative: an inverted region is zero bytes long.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    pub const fn contains(&self, addr: usize) -> bool {
        self.start <= addr && addr < self.end
    }

    /// Checks whether `other` lies entirely within `self`.  Empty regions are
    /// within anything.
    pub const fn encloses(&self, other: &Region) -> bool {
        other.is_empty()
            || (self.start <= other.start && other.end <= self.end)
    }

    /// Checks whether the two regions share at least one byte.  Empty regions
    /// overlap nothing.
    pub const fn overlaps(&self, other: &Region) -> bool {
        !self.is_empty() && !other.is_empty()
            && self.start < other.end && other.start < self.end
    }
}

/// A construction defect in a `MemoryLayout`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// A region's end precedes its start.
    InvertedRegion,
    /// Two regions that must be disjoint share bytes.
    Overlap,
    /// The initial stack pointer isn't 8-byte aligned, as AAPCS requires at
    /// public interfaces.
    Misaligned,
    /// A RAM region extends outside RAM.
    OutOfRam,
    /// The `.data` load image extends outside flash, or past the end of the
    /// address space.
    OutOfFlash,
}

/// Where initialized data comes from and goes to, and what must be zeroed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemoryLayout {
    /// Address of the load image of `.data` in flash.
    pub data_load: usize,
    /// Destination of `.data` in RAM.
    pub data: Region,
    /// `.bss`, to be zero-filled.
    pub bss: Region,
}

impl MemoryLayout {
    /// The flash bytes that `copy_data` reads from, or `None` if they would
    /// run off the end of the address space.
    pub const fn data_image(&self) -> Option<Region> {
        match self.data_load.checked_add(self.data.len()) {
            Some(end) => Some(Region::new(self.data_load, end)),
            None => None,
        }
    }

    /// Copies the `.data` load image into RAM, one byte at a time.
    ///
    /// # Safety
    ///
    /// `data_load` must be readable for `data.len()` bytes and `data` must be
    /// writable; the two must not overlap.  Nothing may hold a reference into
    /// `data` while this runs.
    pub unsafe fn copy_data(&self) {
        let src = self.data_load as *const u8;
        let dst = self.data.start as *mut u8;
        for i in 0..self.data.len() {
            ptr::write_volatile(dst.add(i), ptr::read_volatile(src.add(i)));
        }
    }

    /// Writes zero to every byte of `.bss`.
    ///
    /// # Safety
    ///
    /// `bss` must be writable, and nothing may hold a reference into it while
    /// this runs.
    pub unsafe fn zero_bss(&self) {
        let dst = self.bss.start as *mut u8;
        for i in 0..self.bss.len() {
            ptr::write_volatile(dst.add(i), 0);
        }
    }

    /// Establishes the memory image: `.data` holds its initial values and
    /// `.bss` is zero.  Running it again produces the same image.
    ///
    /// # Safety
    ///
    /// As for `copy_data` and `zero_bss`.  On the target this must only be
    /// called from the reset path, before anything reads a `static`.
    pub unsafe fn initialize(&self) {
        self.copy_data();
        self.zero_bss();
        // Keep any later access to statics from being hoisted above the
        // stores.
        compiler_fence(Ordering::SeqCst);
    }

    /// Checks the layout against the rest of the memory map.  This is a
    /// construction check for tests and `const` contexts; the reset path
    /// never calls it.
    ///
    /// `stack` runs from the lowest stack address up to the initial stack
    /// pointer, which is `stack.end()`.
    pub const fn validate(&self,
                          flash: Region,
                          ram: Region,
                          vectors: Region,
                          stack: Region) -> Result<(), LayoutError> {
        if self.data.is_inverted() || self.bss.is_inverted()
            || stack.is_inverted()
        {
            return Err(LayoutError::InvertedRegion)
        }
        if stack.end() % 8 != 0 {
            return Err(LayoutError::Misaligned)
        }
        if !ram.encloses(&self.data) || !ram.encloses(&self.bss)
            || !ram.encloses(&stack)
        {
            return Err(LayoutError::OutOfRam)
        }

        let image = match self.data_image() {
            Some(image) if flash.encloses(&image) => image,
            _ => return Err(LayoutError::OutOfFlash),
        };
        let ram_regions = [self.data, self.bss];
        let mut i = 0;
        while i < ram_regions.len() {
            let r = &ram_regions[i];
            if r.overlaps(&vectors) || r.overlaps(&stack) || r.overlaps(&image)
            {
                return Err(LayoutError::Overlap)
            }
            i += 1;
        }
        if self.data.overlaps(&self.bss) || vectors.overlaps(&image) {
            return Err(LayoutError::Overlap)
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLASH: Region = Region::new(0x0800_0000, 0x0820_0000);
    const RAM: Region = Region::new(0x2000_0000, 0x2003_0000);
    const VECTORS: Region = Region::new(0x0800_0000, 0x0800_01ac);
    const STACK: Region = Region::new(0x2002_e000, 0x2003_0000);

    fn layout(data: (usize, usize), bss: (usize, usize)) -> MemoryLayout {
        MemoryLayout {
            data_load: 0x0800_4000,
            data: Region::new(data.0, data.1),
            bss: Region::new(bss.0, bss.1),
        }
    }

    #[test]
    fn length_is_difference() {
        assert_eq!(Region::new(100, 200).len(), 100);
        assert_eq!(Region::new(7, 7).len(), 0);
        assert!(Region::new(7, 7).is_empty());
    }

    #[test]
    fn inverted_region_is_empty() {
        let r = Region::new(200, 100);
        assert!(r.is_inverted());
        assert_eq!(r.len(), 0);
        assert!(!r.contains(150));
    }

    #[test]
    fn overlap_is_half_open() {
        let a = Region::new(0, 10);
        assert!(a.overlaps(&Region::new(9, 20)));
        assert!(!a.overlaps(&Region::new(10, 20)));
        assert!(!a.overlaps(&Region::new(5, 5)));
    }

    #[test]
    fn typical_layout_validates() {
        let l = layout((0x2000_0000, 0x2000_0100), (0x2000_0100, 0x2000_0400));
        assert_eq!(l.validate(FLASH, RAM, VECTORS, STACK), Ok(()));
    }

    #[test]
    fn empty_sections_validate() {
        let l = layout((0x2000_0000, 0x2000_0000), (0x2000_0000, 0x2000_0000));
        assert_eq!(l.validate(FLASH, RAM, VECTORS, STACK), Ok(()));
    }

    #[test]
    fn overlapping_data_and_bss_rejected() {
        let l = layout((0x2000_0000, 0x2000_0100), (0x2000_00f0, 0x2000_0400));
        assert_eq!(l.validate(FLASH, RAM, VECTORS, STACK),
                   Err(LayoutError::Overlap));
    }

    #[test]
    fn bss_running_into_stack_rejected() {
        let l = layout((0x2000_0000, 0x2000_0100), (0x2000_0100, 0x2002_e004));
        assert_eq!(l.validate(FLASH, RAM, VECTORS, STACK),
                   Err(LayoutError::Overlap));
    }

    #[test]
    fn data_image_over_vectors_rejected() {
        let l = MemoryLayout {
            data_load: 0x0800_0100,
            ..layout((0x2000_0000, 0x2000_0100), (0x2000_0100, 0x2000_0200))
        };
        assert_eq!(l.validate(FLASH, RAM, VECTORS, STACK),
                   Err(LayoutError::Overlap));
    }

    #[test]
    fn inverted_bss_rejected() {
        let l = layout((0x2000_0000, 0x2000_0100), (0x2000_0400, 0x2000_0100));
        assert_eq!(l.validate(FLASH, RAM, VECTORS, STACK),
                   Err(LayoutError::InvertedRegion));
    }

    #[test]
    fn misaligned_stack_top_rejected() {
        let l = layout((0x2000_0000, 0x2000_0100), (0x2000_0100, 0x2000_0200));
        let stack = Region::new(0x2002_e000, 0x2002_fffc);
        assert_eq!(l.validate(FLASH, RAM, VECTORS, stack),
                   Err(LayoutError::Misaligned));
    }

    #[test]
    fn data_outside_ram_rejected() {
        let l = layout((0x1fff_fff0, 0x2000_0100), (0x2000_0100, 0x2000_0200));
        assert_eq!(l.validate(FLASH, RAM, VECTORS, STACK),
                   Err(LayoutError::OutOfRam));
    }

    #[test]
    fn load_address_at_top_of_memory_rejected() {
        let l = MemoryLayout {
            data_load: usize::MAX - 4,
            ..layout((0x2000_0000, 0x2000_0010), (0x2000_0010, 0x2000_0020))
        };
        assert_eq!(l.data_image(), None);
        assert_eq!(l.validate(FLASH, RAM, VECTORS, STACK),
                   Err(LayoutError::OutOfFlash));
    }

    #[test]
    fn image_running_off_flash_rejected() {
        let l = MemoryLayout {
            data_load: 0x081f_fff8,
            ..layout((0x2000_0000, 0x2000_0010), (0x2000_0010, 0x2000_0020))
        };
        assert_eq!(l.validate(FLASH, RAM, VECTORS, STACK),
                   Err(LayoutError::OutOfFlash));
    }

    #[test]
    fn empty_image_may_sit_anywhere() {
        let l = MemoryLayout {
            data_load: usize::MAX,
            ..layout((0x2000_0000, 0x2000_0000), (0x2000_0000, 0x2000_0020))
        };
        assert_eq!(l.validate(FLASH, RAM, VECTORS, STACK), Ok(()));
    }

    #[test]
    fn initialize_copies_and_zeroes() {
        let image = [0xde_u8, 0xad, 0xbe, 0xef];
        let mut ram = [0x55_u8; 12];
        let base = ram.as_mut_ptr() as usize;
        let l = MemoryLayout {
            data_load: image.as_ptr() as usize,
            data: Region::new(base, base + 4),
            bss: Region::new(base + 4, base + 12),
        };
        unsafe { l.initialize() }
        assert_eq!(&ram[..4], &image);
        assert!(ram[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn inverted_regions_touch_nothing() {
        let image = [1_u8; 4];
        let mut ram = [0xaa_u8; 8];
        let base = ram.as_mut_ptr() as usize;
        let l = MemoryLayout {
            data_load: image.as_ptr() as usize,
            data: Region::new(base + 4, base),
            bss: Region::new(base + 8, base + 4),
        };
        unsafe { l.initialize() }
        assert_eq!(ram, [0xaa; 8]);
    }
}
