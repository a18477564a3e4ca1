pub(crate) mod escape;
pub(crate) mod itime;
pub(crate) mod prefix;
