//! User-facing messages in the supported locales.

use std::str::FromStr;

/// Language used for messages returned to users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Ja,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            "ja" | "ja-jp" => Ok(Self::Ja),
            other => Err(format!("Unsupported locale '{other}'. Expected 'en' or 'ja'")),
        }
    }
}

/// Every message the service shows to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    InvalidInput,
    InvalidCredentials,
    FamilyIdMismatch,
    FamilyIdRequired,
    NotAuthenticated,
    AdminRequired,
    UsernameTaken,
    SignupDisabled,
    DemoItemLimit { limit: i64 },
    CannotDeleteSelf,
    PasswordTooShort { min: u64 },
    PasswordConfirmationMismatch,
    CurrentPasswordIncorrect,
    ItemNotFound,
    UserNotFound,
}

impl Message {
    pub fn text(&self, locale: Locale) -> String {
        match locale {
            Locale::En => self.en(),
            Locale::Ja => self.ja(),
        }
    }

    fn en(&self) -> String {
        match self {
            Self::InvalidInput => "The submitted form is invalid".into(),
            Self::InvalidCredentials => "Incorrect username or password".into(),
            Self::FamilyIdMismatch => "Family ID does not match".into(),
            Self::FamilyIdRequired => "Family ID is required".into(),
            Self::NotAuthenticated => "Not authenticated".into(),
            Self::AdminRequired => "Administrator access required".into(),
            Self::UsernameTaken => "That username is already in use".into(),
            Self::SignupDisabled => "Sign-up is disabled".into(),
            Self::DemoItemLimit { limit } => {
                format!("The demo account can hold at most {limit} items")
            }
            Self::CannotDeleteSelf => "You cannot delete your own account".into(),
            Self::PasswordTooShort { min } => {
                format!("Password must be at least {min} characters long")
            }
            Self::PasswordConfirmationMismatch => "New passwords do not match".into(),
            Self::CurrentPasswordIncorrect => "Current password is incorrect".into(),
            Self::ItemNotFound => "Item not found".into(),
            Self::UserNotFound => "User not found".into(),
        }
    }

    fn ja(&self) -> String {
        match self {
            Self::InvalidInput => "入力内容が正しくありません".into(),
            Self::InvalidCredentials => "ユーザー名またはパスワードが違います".into(),
            Self::FamilyIdMismatch => "家族IDが一致しません".into(),
            Self::FamilyIdRequired => "家族IDを入力してください".into(),
            Self::NotAuthenticated => "認証されていません".into(),
            Self::AdminRequired => "管理者権限が必要です".into(),
            Self::UsernameTaken => "そのユーザー名は既に使用されています".into(),
            Self::SignupDisabled => "新規登録は無効になっています".into(),
            Self::DemoItemLimit { limit } => {
                format!("デモアカウントで登録できるアイテムは{limit}件までです")
            }
            Self::CannotDeleteSelf => "自分自身は削除できません".into(),
            Self::PasswordTooShort { min } => {
                format!("パスワードは{min}文字以上で入力してください")
            }
            Self::PasswordConfirmationMismatch => "新しいパスワードが一致しません".into(),
            Self::CurrentPasswordIncorrect => "現在のパスワードが違います".into(),
            Self::ItemNotFound => "アイテムが見つかりません".into(),
            Self::UserNotFound => "ユーザーが見つかりません".into(),
        }
    }
}
