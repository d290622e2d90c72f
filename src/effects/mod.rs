pub(crate) mod gradient;
