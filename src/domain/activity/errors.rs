// ============================================================================
// Activity Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivityError {
    #[error("Comment body cannot be empty")]
    EmptyCommentBody,
}
