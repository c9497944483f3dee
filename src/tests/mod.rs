//! Scenario tests driving a full `Annotator` through in-memory fakes

pub(crate) mod support;
