use bitflags::bitflags;

bitflags! {
    /// Count modifiers attached to a `:resize` command.
    ///
    /// `SET` means a bare count, `INCREASE` a `+` count; a `-` count is
    /// encoded as `INCREASE | DECREASE`, an increase made negative.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResizeModifiers: u8 {
        const SET = 1 << 0;
        const INCREASE = 1 << 1;
        const DECREASE = 1 << 2;
    }
}

/// How the display should interpret an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustMode {
    Set,
    Increase,
    Decrease,
}

/// Signed row adjustment passed to the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    /// Absolute rows for [`AdjustMode::Set`], otherwise a signed delta.
    pub delta: i64,
    pub mode: AdjustMode,
}

impl Adjustment {
    /// Decode a count and its modifiers.
    ///
    /// Returns `None` for any combination other than exactly one of
    /// set, increase, or increase-made-negative.
    pub fn from_modifiers(count: u32, modifiers: ResizeModifiers) -> Option<Self> {
        let count = i64::from(count);
        let (delta, mode) = if modifiers == ResizeModifiers::SET {
            (count, AdjustMode::Set)
        } else if modifiers == ResizeModifiers::INCREASE {
            (count, AdjustMode::Increase)
        } else if modifiers == ResizeModifiers::INCREASE | ResizeModifiers::DECREASE {
            (-count, AdjustMode::Decrease)
        } else {
            return None;
        };
        Some(Self { delta, mode })
    }

    /// Row count after applying this adjustment to `rows`, before clamping.
    pub fn apply(self, rows: u16) -> i64 {
        match self.mode {
            AdjustMode::Set => self.delta,
            AdjustMode::Increase | AdjustMode::Decrease => i64::from(rows) + self.delta,
        }
    }
}
