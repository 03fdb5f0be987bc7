bitflags! {
    #[derive(Debug, Clone, Copy)]
    pub struct PpuCtrl: u8 {
        const NAME_TABLE_X   = 0b00000001;
        const NAME_TABLE_Y   = 0b00000010;
        const VRAM_ADDR_INC  = 0b00000100;
        const SPR_TABLE_ADDR = 0b00001000;
        const BG_TABLE_ADDR  = 0b00010000;
        const SPR_SIZE       = 0b00100000;
        const MASTER_SELECT  = 0b01000000;
        const NMI_ENABLED    = 0b10000000;
    }

    #[derive(Debug, Clone, Copy)]
    pub struct PpuMask: u8 {
        const GREYSCALE_ON  = 0b00000001;
        const SHOW_BG_LEFT  = 0b00000010;
        const SHOW_SPR_LEFT = 0b00000100;
        const SHOW_BG       = 0b00001000;
        const SHOW_SPR      = 0b00010000;
        const EMP_RED       = 0b00100000;
        const EMP_GREEN     = 0b01000000;
        const EMP_BLUE      = 0b10000000;
    }

    #[derive(Debug, Clone, Copy)]
    pub struct PpuStatus: u8 {
        const SPR_OVERFLOW = 0b00100000;
        const SPR_0_HIT    = 0b01000000;
        const IN_VBLANK    = 0b10000000;
    }
}

impl PpuCtrl {
    /// VRAM pointer delta applied by the data port: 1 or 32
    #[inline]
    pub fn vram_addr_inc(&self) -> u16 {
        if self.contains(PpuCtrl::VRAM_ADDR_INC) {
            32
        } else {
            1
        }
    }

    #[inline]
    pub fn bg_pattern_addr(&self) -> usize {
        (self.contains(PpuCtrl::BG_TABLE_ADDR) as usize) << 12
    }

    #[inline]
    pub fn spr_pattern_addr(&self) -> usize {
        (self.contains(PpuCtrl::SPR_TABLE_ADDR) as usize) << 12
    }
}

impl PpuMask {
    #[inline]
    pub fn show_bg(&self) -> bool {
        self.contains(PpuMask::SHOW_BG)
    }

    #[inline]
    pub fn show_spr(&self) -> bool {
        self.contains(PpuMask::SHOW_SPR)
    }
}

impl PpuStatus {
    #[inline]
    pub fn spr_overflow(&self) -> bool {
        self.contains(PpuStatus::SPR_OVERFLOW)
    }

    #[inline]
    pub fn spr_0_hit(&self) -> bool {
        self.contains(PpuStatus::SPR_0_HIT)
    }

    #[inline]
    pub fn in_vblank(&self) -> bool {
        self.contains(PpuStatus::IN_VBLANK)
    }
}
