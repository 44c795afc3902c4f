//! Entity to output-shape translation.

use crate::domain::activity::Comment;
use crate::domain::comment::CommentDto;

/// Pure, side-effect-free translation of entities into DTOs.
pub trait Mapper: Send + Sync {
    fn comment_to_dto(&self, comment: &Comment) -> CommentDto;
}

/// Flattens the comment author into profile fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileMapper;

impl Mapper for ProfileMapper {
    fn comment_to_dto(&self, comment: &Comment) -> CommentDto {
        CommentDto {
            id: comment.id,
            created_at: comment.created_at,
            body: comment.body.clone(),
            username: comment.author.username.clone(),
            display_name: comment.author.display_name.clone(),
            image: comment.author.main_photo().map(|p| p.url.clone()),
        }
    }
}
