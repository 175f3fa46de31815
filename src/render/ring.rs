use crate::foundation::core::FrameSize;
use crate::foundation::error::{DelayError, DelayResult};
use crate::render::frame::Frame;

/// Fixed-capacity circular store of the most recent captured frames.
///
/// Capacity is `max_delay + 2`. Slots are allocated once and overwritten in place as the write
/// cursor wraps; there is no eviction beyond that. Callers pass indices already wrapped into
/// `[0, capacity)` (see [`FrameRing::wrap`]).
#[derive(Debug)]
pub struct FrameRing {
    slots: Vec<Frame>,
    size: FrameSize,
}

impl FrameRing {
    /// Allocate `max_delay + 2` black slots of `size`.
    pub fn new(max_delay: usize, size: FrameSize) -> DelayResult<Self> {
        if max_delay == 0 {
            return Err(DelayError::validation("max_delay must be >= 1"));
        }
        let capacity = max_delay + 2;
        Ok(Self {
            slots: (0..capacity).map(|_| Frame::black(size)).collect(),
            size,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Deepest look-back supported by this ring.
    pub fn max_delay(&self) -> usize {
        self.slots.len() - 2
    }

    pub fn frame_size(&self) -> FrameSize {
        self.size
    }

    /// Wrap any index into `[0, capacity)`.
    pub fn wrap(&self, index: usize) -> usize {
        index % self.slots.len()
    }

    /// Non-owning view of slot `index`.
    pub fn read(&self, index: usize) -> &Frame {
        &self.slots[index]
    }

    /// The slot at `index`, to be filled by acquisition.
    pub fn write(&mut self, index: usize) -> &mut Frame {
        &mut self.slots[index]
    }

    /// Split the ring into the slot being written this cycle and a read-only view of the rest.
    ///
    /// Acquisition gets the `&mut Frame`; the compositor gets the [`RingView`], which refuses to
    /// hand out the write slot. Both borrows can live on different threads at the same time.
    pub fn split_for_write(&mut self, index: usize) -> (&mut Frame, RingView<'_>) {
        let capacity = self.slots.len();
        let (before, rest) = self.slots.split_at_mut(index);
        let (slot, after) = rest
            .split_first_mut()
            .unwrap_or_else(|| panic!("ring write index {index} out of range 0..{capacity}"));
        (
            slot,
            RingView {
                before,
                after,
                hole: index,
            },
        )
    }
}

/// Read access to every ring slot except the one currently being written.
#[derive(Clone, Copy)]
pub struct RingView<'a> {
    before: &'a [Frame],
    after: &'a [Frame],
    hole: usize,
}

impl<'a> RingView<'a> {
    /// Slot `index`, or `None` when it is the in-flight write slot (or out of range).
    pub fn get(&self, index: usize) -> Option<&'a Frame> {
        if index < self.hole {
            self.before.get(index)
        } else if index == self.hole {
            None
        } else {
            self.after.get(index - self.hole - 1)
        }
    }

    pub fn capacity(&self) -> usize {
        self.before.len() + 1 + self.after.len()
    }

    /// Index of the slot excluded from this view.
    pub fn write_index(&self) -> usize {
        self.hole
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/ring.rs"]
mod tests;
