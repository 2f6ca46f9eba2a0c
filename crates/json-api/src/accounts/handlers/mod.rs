//! Account Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod me;
pub(crate) mod orders;
pub(crate) mod update;
