//! Cache key and invalidation tag catalogue
//!
//! All services build keys through these helpers so formats stay
//! consistent. Operation format: `{service}:{entity}:{id}:{view}`.
//!
//! Invalidation tags are id fragments with a trailing delimiter
//! (`post:{id}:`), and every id segment in an operation is followed by
//! another segment, so substring matching on a tag can never confuse
//! `post:P1` with `post:P12`.

/// Comments list for a post. Format: `comments:post:{post_id}:list`
pub fn comments_list(post_id: &str) -> String {
    format!("comments:post:{}:list", post_id)
}

/// Comment statistics for a post. Format: `comments:post:{post_id}:stats`
pub fn comment_stats(post_id: &str) -> String {
    format!("comments:post:{}:stats", post_id)
}

/// Replies to a comment. Format: `comments:comment:{comment_id}:replies`
pub fn comment_replies(comment_id: &str) -> String {
    format!("comments:comment:{}:replies", comment_id)
}

/// Follow relationship with a user. Format: `follows:user:{user_id}:status`
pub fn follow_status(user_id: &str) -> String {
    format!("follows:user:{}:status", user_id)
}

/// Followers of a user. Format: `follows:user:{user_id}:followers`
pub fn followers(user_id: &str) -> String {
    format!("follows:user:{}:followers", user_id)
}

/// Users a user follows. Format: `follows:user:{user_id}:following`
pub fn following(user_id: &str) -> String {
    format!("follows:user:{}:following", user_id)
}

/// Mutual connection count. Format: `follows:user:{user_id}:mutual`
pub fn mutual_count(user_id: &str) -> String {
    format!("follows:user:{}:mutual", user_id)
}

/// Full search results. Format: `search:results`
pub fn search_results() -> String {
    "search:results".to_string()
}

/// Trending hashtags. Format: `search:trending`
pub fn trending() -> String {
    "search:trending".to_string()
}

/// Tag matching every cached read about a post
pub fn post_tag(post_id: &str) -> String {
    format!("post:{}:", post_id)
}

/// Tag matching every cached read about a comment
pub fn comment_tag(comment_id: &str) -> String {
    format!("comment:{}:", comment_id)
}

/// Tag matching every cached read about a user
pub fn user_tag(user_id: &str) -> String {
    format!("user:{}:", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_formats() {
        assert_eq!(comments_list("P1"), "comments:post:P1:list");
        assert_eq!(comment_replies("C9"), "comments:comment:C9:replies");
        assert_eq!(follow_status("U3"), "follows:user:U3:status");
    }

    #[test]
    fn test_tags_match_their_operations() {
        assert!(comments_list("P1").contains(&post_tag("P1")));
        assert!(comment_stats("P1").contains(&post_tag("P1")));
        assert!(comment_replies("C9").contains(&comment_tag("C9")));
        assert!(followers("U3").contains(&user_tag("U3")));
    }

    #[test]
    fn test_tags_do_not_match_prefix_sharing_ids() {
        // "P1" must not sweep away "P12" entries.
        assert!(!comments_list("P12").contains(&post_tag("P1")));
        assert!(!follow_status("U12").contains(&user_tag("U1")));
    }
}
