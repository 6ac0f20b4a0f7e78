//! Runs the memory image setup against ordinary heap buffers standing in for
//! flash and SRAM.

use f429rt::arm_m::image::{MemoryLayout, Region};
use quickcheck::{quickcheck, TestResult};

/// One SRAM stand-in holding `.data` then `.bss`, with guard bytes either side
/// that must never be written.
struct Sram {
    bytes: Vec<u8>,
    data_len: usize,
    bss_len: usize,
}

const GUARD: usize = 16;
const GUARD_BYTE: u8 = 0xa5;

impl Sram {
    fn new(data_len: usize, bss_len: usize, fill: u8) -> Sram {
        let mut bytes = vec![fill; GUARD + data_len + bss_len + GUARD];
        bytes[..GUARD].fill(GUARD_BYTE);
        let tail = bytes.len() - GUARD;
        bytes[tail..].fill(GUARD_BYTE);
        Sram { bytes, data_len, bss_len }
    }

    fn layout(&mut self, flash: &[u8]) -> MemoryLayout {
        assert_eq!(flash.len(), self.data_len);
        let base = self.bytes.as_mut_ptr() as usize + GUARD;
        let data_end = base + self.data_len;
        MemoryLayout {
            data_load: flash.as_ptr() as usize,
            data: Region::new(base, data_end),
            bss: Region::new(data_end, data_end + self.bss_len),
        }
    }

    fn data(&self) -> &[u8] {
        &self.bytes[GUARD..GUARD + self.data_len]
    }

    fn bss(&self) -> &[u8] {
        let start = GUARD + self.data_len;
        &self.bytes[start..start + self.bss_len]
    }

    fn guards_intact(&self) -> bool {
        let tail = self.bytes.len() - GUARD;
        self.bytes[..GUARD].iter().chain(&self.bytes[tail..])
            .all(|&b| b == GUARD_BYTE)
    }
}

#[test]
fn hundred_byte_data_image_is_copied_exactly() {
    let flash: Vec<u8> = (0x01..=0x64).collect();
    let mut sram = Sram::new(100, 0, 0x00);
    let layout = sram.layout(&flash);
    assert_eq!(layout.data.len(), 100);

    unsafe { layout.initialize() }

    assert_eq!(sram.data(), &flash[..]);
    assert!(sram.guards_intact());
}

#[test]
fn fifty_byte_bss_reads_back_zero() {
    let mut sram = Sram::new(0, 50, 0xff);
    let layout = sram.layout(&[]);
    assert_eq!(layout.bss.len(), 50);

    unsafe { layout.initialize() }

    assert!(sram.bss().iter().all(|&b| b == 0));
    assert!(sram.guards_intact());
}

#[test]
fn data_and_bss_together() {
    let flash: Vec<u8> = (0..32).map(|i| 0x80 | i).collect();
    let mut sram = Sram::new(32, 64, 0x3c);
    let layout = sram.layout(&flash);

    unsafe { layout.initialize() }

    assert_eq!(sram.data(), &flash[..]);
    assert!(sram.bss().iter().all(|&b| b == 0));
    assert!(sram.guards_intact());
}

#[test]
fn rerunning_gives_the_same_image() {
    let flash: Vec<u8> = (0..40).collect();
    let mut sram = Sram::new(40, 40, 0xee);
    let layout = sram.layout(&flash);

    unsafe { layout.initialize() }
    let first = sram.bytes.clone();

    // Scribble over the live image, as the application would.
    let base = GUARD;
    sram.bytes[base..base + 80].fill(0x77);
    unsafe { layout.initialize() }

    assert_eq!(sram.bytes, first);
}

#[test]
fn empty_regions_touch_nothing() {
    let mut sram = Sram::new(0, 0, 0x00);
    let layout = sram.layout(&[]);
    assert!(layout.data.is_empty());
    assert!(layout.bss.is_empty());

    unsafe { layout.initialize() }

    assert!(sram.guards_intact());
}

#[test]
fn steps_can_run_separately() {
    let flash = [9u8; 8];
    let mut sram = Sram::new(8, 8, 0xff);
    let layout = sram.layout(&flash);

    unsafe { layout.copy_data() }
    assert_eq!(sram.data(), &flash);
    assert!(sram.bss().iter().all(|&b| b == 0xff));

    unsafe { layout.zero_bss() }
    assert!(sram.bss().iter().all(|&b| b == 0));
}

#[test]
fn length_is_end_minus_start() {
    fn prop(start: u32, span: u16) -> bool {
        let start = start as usize;
        let end = start + span as usize;
        Region::new(start, end).len() == end - start
            && Region::new(start, end).is_empty() == (span == 0)
    }
    quickcheck(prop as fn(u32, u16) -> bool);
}

#[test]
fn length_never_underflows() {
    fn prop(start: usize, end: usize) -> TestResult {
        if end >= start {
            return TestResult::discard();
        }
        TestResult::from_bool(Region::new(start, end).len() == 0)
    }
    quickcheck(prop as fn(usize, usize) -> TestResult);
}

#[test]
fn any_image_round_trips() {
    fn prop(image: Vec<u8>, bss_len: u8, fill: u8) -> bool {
        let mut sram = Sram::new(image.len(), bss_len as usize, fill);
        let layout = sram.layout(&image);
        unsafe { layout.initialize() }
        sram.data() == &image[..]
            && sram.bss().iter().all(|&b| b == 0)
            && sram.guards_intact()
    }
    quickcheck(prop as fn(Vec<u8>, u8, u8) -> bool);
}
