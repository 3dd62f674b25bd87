//! Pair filtering evaluated for every broad-phase candidate.

use bitflags::bitflags;

use super::codec::{Capabilities, FilterData};

bitflags! {
    /// Backend-owned attributes of the object on one side of a pair.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FilterObjectAttributes: u32 {
        const STATIC = 0b0001;
        const DYNAMIC = 0b0010;
        /// The shape is a trigger volume.
        const TRIGGER = 0b1_0000;
    }
}

impl FilterObjectAttributes {
    pub fn is_trigger(self) -> bool {
        self.contains(Self::TRIGGER)
    }
}

bitflags! {
    /// What the simulation should do with a kept pair.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PairFlags: u32 {
        const SOLVE_CONTACT = 0b0001;
        const DETECT_DISCRETE_CONTACT = 0b0010;
        const NOTIFY_TOUCH_FOUND = 0b0100;
        const NOTIFY_TOUCH_LOST = 0b1000;
        /// Overlap tracking only, no solving.
        const TRIGGER_DEFAULT = Self::NOTIFY_TOUCH_FOUND.bits()
            | Self::NOTIFY_TOUCH_LOST.bits()
            | Self::DETECT_DISCRETE_CONTACT.bits();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterAction {
    /// Drop the pair for this step: no detection, no notification, no solving.
    Suppress,
    /// Process the pair according to its [`PairFlags`].
    Keep,
}

/// Outcome of filtering one candidate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairFilter {
    pub action: FilterAction,
    pub flags: PairFlags,
}

impl PairFilter {
    pub const SUPPRESS: Self = Self {
        action: FilterAction::Suppress,
        flags: PairFlags::empty(),
    };

    pub fn keep(flags: PairFlags) -> Self {
        Self {
            action: FilterAction::Keep,
            flags,
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.action == FilterAction::Suppress
    }

    pub fn solves(&self) -> bool {
        !self.is_suppressed() && self.flags.contains(PairFlags::SOLVE_CONTACT)
    }

    pub fn notifies(&self) -> bool {
        !self.is_suppressed() && self.flags.contains(PairFlags::NOTIFY_TOUCH_FOUND)
    }
}

/// Signature of a pair filter the scene calls from its worker threads.
pub type FilterShader =
    fn(FilterObjectAttributes, FilterData, FilterObjectAttributes, FilterData) -> PairFilter;

/// Default pair policy.
///
/// Triggers pass with trigger handling. Otherwise both sides must be enabled
/// and accept each other's owner id. Solving needs `COLLIDES` on both sides;
/// a `SENSOR` on either side asks for touch-found notification.
pub fn contact_report_filter_shader(
    attributes_0: FilterObjectAttributes,
    filter_data_0: FilterData,
    attributes_1: FilterObjectAttributes,
    filter_data_1: FilterData,
) -> PairFilter {
    if attributes_0.is_trigger() || attributes_1.is_trigger() {
        return PairFilter::keep(PairFlags::TRIGGER_DEFAULT);
    }

    if !filter_data_0.has_capability(Capabilities::ENABLED)
        || !filter_data_1.has_capability(Capabilities::ENABLED)
    {
        return PairFilter::SUPPRESS;
    }

    if !(filter_data_0.accepts(&filter_data_1) && filter_data_1.accepts(&filter_data_0)) {
        return PairFilter::SUPPRESS;
    }

    let collides = filter_data_0.has_capability(Capabilities::COLLIDES)
        && filter_data_1.has_capability(Capabilities::COLLIDES);
    let senses = filter_data_0.has_capability(Capabilities::SENSOR)
        || filter_data_1.has_capability(Capabilities::SENSOR);
    if !collides && !senses {
        return PairFilter::SUPPRESS;
    }

    let mut flags = PairFlags::DETECT_DISCRETE_CONTACT;
    if collides {
        flags |= PairFlags::SOLVE_CONTACT;
    }
    if senses {
        flags |= PairFlags::NOTIFY_TOUCH_FOUND;
    }
    PairFilter::keep(flags)
}
