/// Database row types — these map directly to SQLite rows.
/// Distinct from darkroom-types API models to keep the store independent.

pub struct UserRow {
    pub username: String,
    pub token: String,
    pub created_at: String,
}

pub struct PhotoRow {
    pub id: String,
    pub author: String,
    pub created_at: String,
    pub likes: u64,
    pub comments: u64,
}

pub struct CommentRow {
    pub id: String,
    pub post_id: String,
    pub author: String,
    pub body: String,
    pub created_at: String,
}
