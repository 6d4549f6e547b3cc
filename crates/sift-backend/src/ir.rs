//! The pass-through backend.

use sift_ir::BooleanQuery;

use crate::{error::BackendError, Backend, CompiledQuery};

/// A backend that hands the intermediate representation back untouched; the
/// string forms are its JSON encoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct IrBackend;

impl IrBackend {
    /// A new pass-through backend.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for IrBackend {
    fn compile(&self, query: &BooleanQuery) -> Result<CompiledQuery, BackendError> {
        Ok(CompiledQuery::Ir(query.clone()))
    }
}
