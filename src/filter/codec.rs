//! Packing of per-shape filter descriptors into simulation filter words.
//!
//! `word0` carries the owner id, `word1` the interaction mask and the low
//! nibble of `word2` the capability flags. The rest of `word2` and all of
//! `word3` belong to the backend and are carried through untouched.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Bits of `word2` owned by the capability flags.
pub const CAPABILITY_BITS: u32 = 0b1111;

bitflags! {
    /// Capability flags of a shape.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Capabilities: u32 {
        /// The shape takes part in filtering at all.
        const ENABLED = 0b0001;
        /// The shape is solved as a solid collider.
        const COLLIDES = 0b0010;
        /// Touches involving the shape are reported.
        const SENSOR = 0b0100;
    }
}

/// Fixed-width filter words attached to every shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FilterData {
    pub word0: u32,
    pub word1: u32,
    pub word2: u32,
    pub word3: u32,
}

impl FilterData {
    pub fn owner_id(&self) -> u32 {
        self.word0
    }

    pub fn interaction_mask(&self) -> u32 {
        self.word1
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::from_bits_truncate(self.word2 & CAPABILITY_BITS)
    }

    pub fn has_capability(&self, flag: Capabilities) -> bool {
        self.capabilities().contains(flag)
    }

    /// Replaces the capability nibble, keeping the reserved bits of `word2`.
    pub fn set_capabilities(&mut self, flags: Capabilities) {
        self.word2 = (self.word2 & !CAPABILITY_BITS) | (flags.bits() & CAPABILITY_BITS);
    }

    /// Clears the given capabilities, leaving every other bit alone.
    pub fn clear_capabilities(&mut self, flags: Capabilities) {
        self.word2 &= !(flags.bits() & CAPABILITY_BITS);
    }

    /// Backend-owned bits of `word2`.
    pub fn reserved_bits(&self) -> u32 {
        self.word2 & !CAPABILITY_BITS
    }

    /// Whether this side's mask accepts the other side's owner id.
    pub fn accepts(&self, other: &FilterData) -> bool {
        self.interaction_mask() & other.owner_id() != 0
    }
}

/// Owner id, interaction mask and capabilities of a shape category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub owner_id: u32,
    pub interaction_mask: u32,
    pub capabilities: Capabilities,
}

impl FilterDescriptor {
    pub fn new(owner_id: u32, interaction_mask: u32, capabilities: Capabilities) -> Self {
        Self {
            owner_id,
            interaction_mask,
            capabilities,
        }
    }

    /// Encodes into fresh filter words.
    pub fn encode(&self) -> FilterData {
        let mut data = FilterData::default();
        self.encode_into(&mut data);
        data
    }

    /// Encodes into existing filter words, preserving backend bookkeeping bits.
    pub fn encode_into(&self, data: &mut FilterData) {
        data.word0 = self.owner_id;
        data.word1 = self.interaction_mask;
        data.set_capabilities(self.capabilities);
    }

    pub fn decode(data: &FilterData) -> Self {
        Self {
            owner_id: data.owner_id(),
            interaction_mask: data.interaction_mask(),
            capabilities: data.capabilities(),
        }
    }
}

pub fn encode(owner_id: u32, interaction_mask: u32, capabilities: Capabilities) -> FilterData {
    FilterDescriptor::new(owner_id, interaction_mask, capabilities).encode()
}

pub fn decode(data: &FilterData) -> (u32, u32, Capabilities) {
    let descriptor = FilterDescriptor::decode(data);
    (
        descriptor.owner_id,
        descriptor.interaction_mask,
        descriptor.capabilities,
    )
}

pub fn has_capability(data: &FilterData, flag: Capabilities) -> bool {
    data.has_capability(flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_capabilities_replaces_only_the_nibble() {
        let mut data = FilterData {
            word2: 0xABCD_0000 | Capabilities::SENSOR.bits(),
            ..FilterData::default()
        };
        data.set_capabilities(Capabilities::ENABLED | Capabilities::COLLIDES);
        assert_eq!(data.word2, 0xABCD_0003);
    }

    #[test]
    fn clear_capabilities_keeps_other_flags() {
        let mut data = encode(1, 1, Capabilities::all());
        data.word2 |= 0x8000_0000;
        data.clear_capabilities(Capabilities::SENSOR);
        assert!(data.has_capability(Capabilities::ENABLED | Capabilities::COLLIDES));
        assert!(!data.has_capability(Capabilities::SENSOR));
        assert_eq!(data.reserved_bits(), 0x8000_0000);
    }

    #[test]
    fn decode_ignores_unknown_nibble_bit() {
        let data = FilterData {
            word0: 2,
            word1: 7,
            word2: 0b1001,
            word3: 0,
        };
        assert_eq!(decode(&data), (2, 7, Capabilities::ENABLED));
    }
}
