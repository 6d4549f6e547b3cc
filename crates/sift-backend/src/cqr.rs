//! Emitter for the CQR interchange form.

use sift_ir::{cqr::CqrNode, BooleanQuery, Keyword};

use crate::{error::BackendError, Backend, CompiledQuery};

/// The CQR emitter.
///
/// The canonical tree and CQR differ only in depth bookkeeping: CQR has no
/// separate keyword list, so keywords become leaf children, and pass-through
/// wrappers dissolve into their parent.
#[derive(Debug, Default, Clone, Copy)]
pub struct CqrBackend;

impl CqrBackend {
    /// A new CQR emitter.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for CqrBackend {
    fn compile(&self, query: &BooleanQuery) -> Result<CompiledQuery, BackendError> {
        Ok(CompiledQuery::Cqr(compile_node(query)))
    }
}

fn compile_node(query: &BooleanQuery) -> CqrNode {
    // A wrapper around a single group unwraps to that group, keeping the
    // wrapper's own annotations when it has any.
    if query.is_wrapper() && query.children.len() == 1 {
        let child = &query.children[0];
        let options = if query.options.is_empty() {
            child.options.clone()
        } else {
            query.options.clone()
        };
        return CqrNode::Boolean {
            operator: child.operator.clone(),
            children: node_children(child),
            options,
        };
    }

    CqrNode::Boolean {
        operator: query.operator.clone(),
        children: node_children(query),
        options: query.options.clone(),
    }
}

/// Collects a node's operands: keyword leaves first, then compiled children,
/// with operator-less children spliced in place.
fn node_children(query: &BooleanQuery) -> Vec<CqrNode> {
    let mut children: Vec<CqrNode> = query.keywords.iter().map(leaf).collect();
    for child in &query.children {
        if child.operator.is_empty() {
            children.extend(node_children(child));
        } else {
            children.push(CqrNode::Boolean {
                operator: child.operator.clone(),
                children: node_children(child),
                options: child.options.clone(),
            });
        }
    }
    children
}

fn leaf(keyword: &Keyword) -> CqrNode {
    CqrNode::keyword(
        keyword.query_string.clone(),
        keyword.fields.clone(),
        keyword.exploded,
        keyword.truncated,
    )
}
