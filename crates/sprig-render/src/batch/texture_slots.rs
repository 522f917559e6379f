//! Per-frame texture slot table.

use sprig_test_utils::GpuTexture;

/// Number of texture units the sprite shader samples from.
///
/// Matches wgpu's default `max_sampled_textures_per_shader_stage`.
pub const MAX_TEXTURES: usize = 16;

/// Result of looking up a texture in the slot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAcquire {
    /// Texture already had this slot this frame.
    Existing(u32),
    /// Texture was given this new slot.
    Assigned(u32),
    /// Texture is new and every slot is taken.
    Full,
}

impl SlotAcquire {
    /// Slot index, if the texture got one.
    pub fn slot(self) -> Option<u32> {
        match self {
            SlotAcquire::Existing(slot) | SlotAcquire::Assigned(slot) => Some(slot),
            SlotAcquire::Full => None,
        }
    }
}

/// Fixed-capacity mapping from texture identity to sampler slot.
///
/// Slots are handed out in first-use order and compared by handle identity,
/// never by contents. The table never holds the same identity twice.
#[derive(Debug, Default)]
pub struct TextureSlots {
    slots: [Option<GpuTexture>; MAX_TEXTURES],
    len: usize,
}

impl TextureSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every assignment.
    pub fn clear(&mut self) {
        for slot in &mut self.slots[..self.len] {
            *slot = None;
        }
        self.len = 0;
    }

    /// Find the slot of `texture`, assigning the next free one if needed.
    pub fn acquire(&mut self, texture: &GpuTexture) -> SlotAcquire {
        if let Some(slot) = self.find(texture) {
            return SlotAcquire::Existing(slot);
        }

        if self.len >= MAX_TEXTURES {
            return SlotAcquire::Full;
        }

        let slot = self.len;
        self.slots[slot] = Some(texture.clone());
        self.len += 1;
        SlotAcquire::Assigned(slot as u32)
    }

    /// Slot currently assigned to `texture`, if any.
    pub fn find(&self, texture: &GpuTexture) -> Option<u32> {
        self.iter()
            .position(|assigned| assigned.id() == texture.id())
            .map(|slot| slot as u32)
    }

    /// Assigned textures in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &GpuTexture> {
        self.slots[..self.len].iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len >= MAX_TEXTURES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_identity_reuses_slot() {
        let mut slots = TextureSlots::new();
        let a = GpuTexture::mock(16, 16);
        let b = GpuTexture::mock(16, 16);

        assert_eq!(slots.acquire(&a), SlotAcquire::Assigned(0));
        assert_eq!(slots.acquire(&b), SlotAcquire::Assigned(1));
        assert_eq!(slots.acquire(&a.clone()), SlotAcquire::Existing(0));
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn test_full_table_rejects_new_identities_only() {
        let mut slots = TextureSlots::new();
        let textures: Vec<_> = (0..MAX_TEXTURES).map(|_| GpuTexture::mock(4, 4)).collect();
        for (i, texture) in textures.iter().enumerate() {
            assert_eq!(slots.acquire(texture), SlotAcquire::Assigned(i as u32));
        }
        assert!(slots.is_full());

        assert_eq!(slots.acquire(&GpuTexture::mock(4, 4)), SlotAcquire::Full);
        assert_eq!(
            slots.acquire(&textures[MAX_TEXTURES - 1]),
            SlotAcquire::Existing(MAX_TEXTURES as u32 - 1)
        );
        assert_eq!(slots.len(), MAX_TEXTURES);
    }

    #[test]
    fn test_clear_restarts_assignment() {
        let mut slots = TextureSlots::new();
        let a = GpuTexture::mock(4, 4);
        let b = GpuTexture::mock(4, 4);
        slots.acquire(&a);

        slots.clear();
        assert!(slots.is_empty());
        assert_eq!(slots.find(&a), None);
        assert_eq!(slots.acquire(&b), SlotAcquire::Assigned(0));
    }

    #[test]
    fn test_iter_in_slot_order() {
        let mut slots = TextureSlots::new();
        let a = GpuTexture::mock(4, 4);
        let b = GpuTexture::mock(4, 4);
        slots.acquire(&b);
        slots.acquire(&a);

        let ids: Vec<_> = slots.iter().map(GpuTexture::id).collect();
        assert_eq!(ids, vec![b.id(), a.id()]);
        assert_eq!(SlotAcquire::Full.slot(), None);
    }
}
