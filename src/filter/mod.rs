//! Collision filtering: the filter word codec and the pair policy shader.

pub mod codec;
pub mod shader;

pub use codec::{decode, encode, has_capability, Capabilities, FilterData, FilterDescriptor};
pub use shader::{
    contact_report_filter_shader, FilterAction, FilterObjectAttributes, FilterShader, PairFilter,
    PairFlags,
};
