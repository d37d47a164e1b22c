//! Forum domain models, reply threading and soft delete markers.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use entity::user::Role;

use crate::model::forum::{ForumPostDto, ForumReplyDto, PaginatedPostsDto};

/// Deepest reply level, counting top-level replies as level 1.
pub const MAX_REPLY_DEPTH: usize = 3;

pub const POST_DELETED_BY_TEACHER: &str = "The post is deleted by the teacher";
pub const POST_DELETED_BY_OWNER: &str = "The post is deleted by owner";
pub const REPLY_DELETED_BY_TEACHER: &str = "The reply is deleted by the teacher";
pub const REPLY_DELETED_BY_OWNER: &str = "The reply is deleted by owner";

/// Content written over a soft deleted post.
pub fn post_deleted_marker(deleter_role: Role) -> &'static str {
    match deleter_role {
        Role::Teacher => POST_DELETED_BY_TEACHER,
        _ => POST_DELETED_BY_OWNER,
    }
}

/// Content written over a soft deleted reply.
pub fn reply_deleted_marker(deleter_role: Role) -> &'static str {
    match deleter_role {
        Role::Teacher => REPLY_DELETED_BY_TEACHER,
        _ => REPLY_DELETED_BY_OWNER,
    }
}

/// Discussion thread opener.
#[derive(Debug, Clone, PartialEq)]
pub struct ForumPost {
    pub id: i32,
    pub course_id: i32,
    pub user_id: i32,
    pub author_name: Option<String>,
    pub author_role: Option<Role>,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    pub reply_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ForumPost {
    pub fn from_entity(entity: entity::forum_post::Model) -> Self {
        Self {
            id: entity.id,
            course_id: entity.course_id,
            user_id: entity.user_id,
            author_name: None,
            author_role: None,
            title: entity.title,
            content: entity.content,
            is_pinned: entity.is_pinned,
            reply_count: entity.reply_count,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    /// Converts to the API shape.
    ///
    /// # Arguments
    /// - `can_delete` - Whether the viewing user may modify this post
    pub fn into_dto(self, can_delete: bool) -> ForumPostDto {
        ForumPostDto {
            id: self.id,
            course_id: self.course_id,
            user_id: self.user_id,
            author_name: self.author_name,
            author_role: self.author_role,
            title: self.title,
            content: self.content,
            is_pinned: self.is_pinned,
            reply_count: self.reply_count,
            can_delete,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Reply to a post, optionally nested under another reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ForumReply {
    pub id: i32,
    pub post_id: i32,
    pub user_id: i32,
    pub author_name: Option<String>,
    pub author_role: Option<Role>,
    pub content: String,
    pub parent_reply_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ForumReply {
    pub fn from_entity(entity: entity::forum_reply::Model) -> Self {
        Self {
            id: entity.id,
            post_id: entity.post_id,
            user_id: entity.user_id,
            author_name: None,
            author_role: None,
            content: entity.content,
            parent_reply_id: entity.parent_reply_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    /// Converts a single reply with no children.
    pub fn into_dto(self, can_delete: bool) -> ForumReplyDto {
        ForumReplyDto {
            id: self.id,
            post_id: self.post_id,
            user_id: self.user_id,
            author_name: self.author_name,
            author_role: self.author_role,
            content: self.content,
            parent_reply_id: self.parent_reply_id,
            can_delete,
            created_at: self.created_at,
            updated_at: self.updated_at,
            child_replies: Vec::new(),
        }
    }
}

/// Arranges a post's replies into a tree keyed by `parent_reply_id`.
///
/// Siblings are ordered by creation time. Replies whose parent is missing from the input
/// are treated as top level.
///
/// # Arguments
/// - `replies` - Every reply of one post
/// - `can_delete` - Decides the `can_delete` flag for a reply author
///
/// # Returns
/// - `Vec<ForumReplyDto>` - Top-level replies with nested `child_replies`
pub fn build_reply_tree(
    replies: Vec<ForumReply>,
    can_delete: impl Fn(i32) -> bool,
) -> Vec<ForumReplyDto> {
    let known: HashSet<i32> = replies.iter().map(|r| r.id).collect();
    let mut by_parent: HashMap<Option<i32>, Vec<ForumReply>> = HashMap::new();

    for reply in replies {
        let parent = reply.parent_reply_id.filter(|id| known.contains(id));
        by_parent.entry(parent).or_default().push(reply);
    }

    collect_children(&mut by_parent, None, &can_delete)
}

fn collect_children(
    by_parent: &mut HashMap<Option<i32>, Vec<ForumReply>>,
    parent: Option<i32>,
    can_delete: &dyn Fn(i32) -> bool,
) -> Vec<ForumReplyDto> {
    let mut replies = by_parent.remove(&parent).unwrap_or_default();
    replies.sort_by_key(|r| (r.created_at, r.id));

    replies
        .into_iter()
        .map(|reply| {
            let id = reply.id;
            let flag = can_delete(reply.user_id);
            let mut dto = reply.into_dto(flag);
            dto.child_replies = collect_children(by_parent, Some(id), can_delete);
            dto
        })
        .collect()
}

/// Page of posts in a course forum.
#[derive(Debug, Clone)]
pub struct PaginatedPosts {
    pub posts: Vec<ForumPost>,
    pub total: u64,
    pub per_page: u64,
    /// 1-based page number.
    pub page: u64,
}

impl PaginatedPosts {
    /// Number of pages, at least 0 when there are no posts.
    pub fn pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page)
    }

    pub fn into_dto(self, can_delete: impl Fn(i32) -> bool) -> PaginatedPostsDto {
        let pages = self.pages();
        let page = self.page;

        PaginatedPostsDto {
            posts: self
                .posts
                .into_iter()
                .map(|post| {
                    let flag = can_delete(post.user_id);
                    post.into_dto(flag)
                })
                .collect(),
            total: self.total,
            pages,
            current_page: page,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}

/// Parameters for creating a post.
#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub course_id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePostParams {
    pub id: i32,
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_pinned: Option<bool>,
}

/// Parameters for inserting a reply.
#[derive(Debug, Clone)]
pub struct CreateReplyParams {
    pub post_id: i32,
    pub user_id: i32,
    pub content: String,
    pub parent_reply_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn reply(id: i32, parent: Option<i32>, user_id: i32, minutes: i64) -> ForumReply {
        let at = Utc::now() + Duration::minutes(minutes);
        ForumReply {
            id,
            post_id: 1,
            user_id,
            author_name: None,
            author_role: None,
            content: format!("reply {}", id),
            parent_reply_id: parent,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn nests_replies_by_parent() {
        let replies = vec![
            reply(1, None, 10, 0),
            reply(2, Some(1), 11, 1),
            reply(3, Some(2), 10, 2),
            reply(4, None, 11, 3),
            reply(5, Some(1), 12, 4),
        ];

        let tree = build_reply_tree(replies, |user_id| user_id == 10);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, 1);
        assert!(tree[0].can_delete);
        assert_eq!(
            tree[0].child_replies.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![2, 5]
        );
        assert!(!tree[0].child_replies[0].can_delete);
        assert_eq!(tree[0].child_replies[0].child_replies[0].id, 3);
        assert_eq!(tree[1].id, 4);
        assert!(tree[1].child_replies.is_empty());
    }

    #[test]
    fn orphaned_reply_becomes_top_level() {
        let tree = build_reply_tree(vec![reply(7, Some(99), 1, 0)], |_| false);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, 7);
    }

    #[test]
    fn deletion_marker_depends_on_role() {
        assert_eq!(post_deleted_marker(Role::Teacher), POST_DELETED_BY_TEACHER);
        assert_eq!(post_deleted_marker(Role::Student), POST_DELETED_BY_OWNER);
        assert_eq!(reply_deleted_marker(Role::Teacher), REPLY_DELETED_BY_TEACHER);
        assert_eq!(reply_deleted_marker(Role::Admin), REPLY_DELETED_BY_OWNER);
    }

    #[test]
    fn pagination_flags() {
        let page = PaginatedPosts {
            posts: Vec::new(),
            total: 45,
            per_page: 20,
            page: 2,
        };

        let dto = page.into_dto(|_| false);

        assert_eq!(dto.pages, 3);
        assert!(dto.has_next);
        assert!(dto.has_prev);
    }
}
