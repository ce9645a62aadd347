pub(crate) mod iter;
pub(crate) mod owned;
pub(crate) mod ref_;
