pub(crate) mod branding;
