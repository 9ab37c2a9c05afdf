use super::UserStatus;

/// Filters for listing users; `None` fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct GetUserDto {
    /// Substring of username or email
    pub search: Option<String>,
    pub status: Option<UserStatus>,
}
