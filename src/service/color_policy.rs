use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorTier {
    Low,
    Medium,
    High,
}

impl ColorTier {
    pub fn hex(self) -> &'static str {
        match self {
            ColorTier::Low => "#52616b",
            ColorTier::Medium => "#1e2022",
            ColorTier::High => "#0f4c81",
        }
    }
}

impl ColorTier {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            ColorTier::Low => (0x52, 0x61, 0x6b),
            ColorTier::Medium => (0x1e, 0x20, 0x22),
            ColorTier::High => (0x0f, 0x4c, 0x81),
        }
    }
}

impl fmt::Display for ColorTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

pub fn color_for_count(count: usize) -> ColorTier {
    if count < 3 {
        ColorTier::Low
    } else if count < 7 {
        ColorTier::Medium
    } else {
        ColorTier::High
    }
}
