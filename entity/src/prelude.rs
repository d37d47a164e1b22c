pub use super::activity::Entity as Activity;
pub use super::activity_analytics::Entity as ActivityAnalytics;
pub use super::activity_response::Entity as ActivityResponse;
pub use super::course::Entity as Course;
pub use super::course_enrollment::Entity as CourseEnrollment;
pub use super::document::Entity as Document;
pub use super::forum_post::Entity as ForumPost;
pub use super::forum_reply::Entity as ForumReply;
pub use super::user::Entity as User;
pub use super::user_forum_read::Entity as UserForumRead;
