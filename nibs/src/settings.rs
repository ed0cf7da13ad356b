use crate::buffer::BUFFER_SIZE;
use crate::log::lwarn;

/// Settings for a [`Nibs`](crate::Nibs) reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NibsSettings {
    /// The byte index at which the reader refills its buffer ahead of time,
    /// before it has run out of buffered bits.
    ///
    /// Must be in `1..=BUFFER_SIZE`; other values are clamped into that range.
    pub low_water_mark: usize,
}

impl Default for NibsSettings {
    fn default() -> Self {
        Self {
            low_water_mark: BUFFER_SIZE - 8,
        }
    }
}

impl NibsSettings {
    pub(crate) fn clamped(self) -> Self {
        let low_water_mark = self.low_water_mark.clamp(1, BUFFER_SIZE);

        if low_water_mark != self.low_water_mark {
            lwarn!(
                "low-water mark {} is out of range, using {} instead",
                self.low_water_mark,
                low_water_mark
            );
        }

        Self { low_water_mark }
    }
}
