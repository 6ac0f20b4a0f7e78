//! ARMv7-M System Control Block support.
//!
//! Only the coprocessor access control register is modeled; it's all the
//! reset path needs to turn the FPU on.

use crate::arm_m;
use crate::arm_m::reg::Reg;

const CPACR_ADDRESS: usize = 0xe000_ed88;

/// Coprocessor Access Control Register contents.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Cpacr(pub u32);

/// Access granted to a coprocessor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CpAccess {
    None = 0b00,
    Privileged = 0b01,
    Full = 0b11,
}

impl Cpacr {
    #[inline]
    fn with_field(self, lo: u32, access: CpAccess) -> Self {
        Cpacr((self.0 & !(0b11 << lo)) | ((access as u32) << lo))
    }

    /// CP10, the single-precision half of the FPU, lives at bits 21:20.
    pub fn with_cp10(self, access: CpAccess) -> Self {
        self.with_field(20, access)
    }

    /// CP11, which must agree with CP10, lives at bits 23:22.
    pub fn with_cp11(self, access: CpAccess) -> Self {
        self.with_field(22, access)
    }
}

pub struct Scb {
    cpacr: *const Reg<u32>,
}

pub static SCB: Scb = Scb { cpacr: CPACR_ADDRESS as *const Reg<u32> };

unsafe impl Sync for Scb {}

impl Scb {
    /// A driver for a register in ordinary memory.
    pub const fn at(cpacr: *const Reg<u32>) -> Scb {
        Scb { cpacr }
    }

    fn cpacr(&self) -> &Reg<u32> {
        unsafe { &*self.cpacr }
    }

    pub fn read_cpacr(&self) -> Cpacr {
        Cpacr(self.cpacr().get())
    }

    pub fn write_cpacr(&self, v: Cpacr) {
        self.cpacr().set(v.0)
    }

    pub fn update_cpacr<F: FnOnce(Cpacr) -> Cpacr>(&self, f: F) {
        self.write_cpacr(f(self.read_cpacr()))
    }

    /// Grants full access to the FPU (CP10 and CP11).  The barriers make sure
    /// the next instruction can already be a floating point one.
    #[inline]
    pub fn enable_fpu(&self) {
        self.update_cpacr(|v| v.with_cp11(CpAccess::Full)
                          .with_cp10(CpAccess::Full));
        arm_m::data_synchronization_barrier();
        arm_m::instruction_synchronization_barrier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_fpu_access_sets_cp10_and_cp11() {
        let reg = Reg::new(0x0000_0003u32);
        let scb = Scb::at(&reg);
        scb.update_cpacr(|v| v.with_cp11(CpAccess::Full)
                         .with_cp10(CpAccess::Full));
        assert_eq!(reg.get(), 0x00f0_0003);
    }

    #[test]
    fn enable_fpu_preserves_other_coprocessors() {
        let reg = Reg::new(0x0f00_000cu32);
        Scb::at(&reg).enable_fpu();
        assert_eq!(reg.get(), 0x0ff0_000c);
    }

    #[test]
    fn narrowing_access_clears_high_bit() {
        let v = Cpacr(0x00f0_0000).with_cp10(CpAccess::Privileged);
        assert_eq!(v.0, 0x00d0_0000);
    }
}
