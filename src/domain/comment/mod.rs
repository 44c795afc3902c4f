// ============================================================================
// Comment Feature
// ============================================================================
//
// CreateComment → CreateCommentValidator → CreateCommentHandler → CommentDto
//
// ============================================================================

pub mod command_handler;
pub mod commands;
pub mod dto;
pub mod validator;

pub use command_handler::CreateCommentHandler;
pub use commands::CreateComment;
pub use dto::CommentDto;
pub use validator::CreateCommentValidator;
