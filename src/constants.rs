pub mod roles {

    pub const DEFAULT_ROLE: &str = "user";

    pub const ADMIN_ROLE: &str = "admin";
}

pub mod limits {

    pub const FEATURED_LIMIT: u64 = 10;

    pub const TOP_LIKED_LIMIT: u64 = 10;

    pub const NEWEST_LIMIT: u64 = 10;

    pub const MAX_COMMENT_LENGTH: usize = 1000;

    pub const MAX_NAME_LENGTH: usize = 200;
}

pub mod session {

    pub const USER_ID_KEY: &str = "user_id";
}

/// Seeded by the `m20240103_seed_roles` migration. Rotate it after first login.
pub const BOOTSTRAP_API_KEY: &str = "anicat_bootstrap_api_key_please_regenerate";
