//! Username/password form.

use walletdesk_core::Result;
use walletdesk_core::models::AdminUser;

use super::Request;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct LoginPage {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    /// Shown under the form after a failed attempt.
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    pub const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    /// Check the form and request a login. `None` while a request is in
    /// flight or when a field is empty.
    pub fn start_submit(&mut self) -> Option<Request> {
        if self.submitting {
            return None;
        }
        if self.username.trim().is_empty() || self.password.is_empty() {
            self.error = Some("Username and password are required".into());
            return None;
        }
        self.submitting = true;
        Some(Request::Login {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }

    /// On success the form is reset. Returns whether the login went through.
    pub fn finish_submit(&mut self, result: &Result<AdminUser>) -> bool {
        self.submitting = false;
        match result {
            Ok(_) => {
                *self = Self::default();
                true
            }
            Err(e) => {
                self.error = Some(e.user_message());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_focused_field() {
        let mut page = LoginPage::new();
        for c in "admin".chars() {
            page.insert_char(c);
        }
        page.toggle_focus();
        for c in "pw".chars() {
            page.insert_char(c);
        }
        page.backspace();
        assert_eq!(page.username, "admin");
        assert_eq!(page.password, "p");
        assert_eq!(page.masked_password(), "*");
    }

    #[test]
    fn submit_requires_both_fields_and_one_request_at_a_time() {
        let mut page = LoginPage::new();
        page.username = "admin".into();
        assert!(page.start_submit().is_none());
        assert_eq!(page.error.as_deref(), Some("Username and password are required"));

        page.password = "secret".into();
        assert_eq!(
            page.start_submit(),
            Some(Request::Login {
                username: "admin".into(),
                password: "secret".into(),
            })
        );
        assert!(page.start_submit().is_none());

        let failed = Err(walletdesk_core::Error::Auth("Invalid credentials".into()));
        assert!(!page.finish_submit(&failed));
        assert!(!page.submitting);
        assert_eq!(page.error.as_deref(), Some("Invalid credentials"));
    }
}
