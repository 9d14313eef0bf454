//! Embedded SQL migrations

/// Migration metadata
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// All embedded migrations in order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_draft_articles",
            sql: include_str!("../../migrations/001_draft_articles.sql"),
        },
        Migration {
            id: "002_published_articles",
            sql: include_str!("../../migrations/002_published_articles.sql"),
        },
    ]
}
