//! Input limits shared by request validation and the domain layer.

/// Minimum username length accepted at registration.
pub const MIN_USERNAME_LENGTH: u64 = 3;

/// Maximum username length accepted at registration.
pub const MAX_USERNAME_LENGTH: u64 = 64;

/// Minimum password length for registration and password changes.
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Maximum length of an item name.
pub const MAX_ITEM_NAME_LENGTH: u64 = 100;

/// Maximum length of an item category.
pub const MAX_CATEGORY_LENGTH: u64 = 50;

/// Maximum length of an item memo.
pub const MAX_MEMO_LENGTH: u64 = 500;
