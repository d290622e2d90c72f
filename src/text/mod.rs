pub(crate) mod shaper;
pub(crate) mod wrap;
