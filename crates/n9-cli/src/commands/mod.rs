//! CLI subcommand implementations.

pub(crate) mod export;
pub(crate) mod inspect;
pub(crate) mod train;
