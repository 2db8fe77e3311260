//! HTTP request handlers.

pub(crate) mod pages;
