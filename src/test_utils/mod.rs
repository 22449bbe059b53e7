#![allow(missing_docs)]

pub(crate) mod seed;
pub(crate) mod store;

pub(crate) use seed::StaticSeedSource;
pub(crate) use store::{FailingStore, StoreCall, get_test_state, get_test_store, insert};
