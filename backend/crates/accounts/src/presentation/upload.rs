//! Multipart Profile Forms
//!
//! Create and update arrive as `multipart/form-data`: text fields for the
//! profile plus an optional avatar in the `files` field.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::application::profile::ProfileInput;
use crate::domain::value_object::avatar::UploadedFile;
use crate::error::AccountResult;

/// Form field carrying the avatar
pub const AVATAR_FIELD: &str = "files";

/// Upper bound for a profile form, avatar included
pub const MAX_FORM_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Default)]
pub struct ProfileForm {
    fields: HashMap<String, String>,
    pub avatar: Option<UploadedFile>,
}

impl ProfileForm {
    /// Drain a multipart body
    pub async fn read(mut multipart: Multipart) -> AccountResult<Self> {
        let mut form = ProfileForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == AVATAR_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;

                // browsers send an empty part when no file was picked
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }

                form.avatar = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Remove a text field, empty if it was not sent
    pub fn take(&mut self, name: &str) -> String {
        self.fields.remove(name).unwrap_or_default()
    }

    pub fn profile_input(&mut self) -> ProfileInput {
        ProfileInput {
            first_name: self.take("firstName"),
            last_name: self.take("lastName"),
            email: self.take("email"),
            phone_number: self.take("phoneNumber"),
            created_by: self.take("createdBy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_input_from_fields() {
        let mut form = ProfileForm::default();
        for (k, v) in [
            ("firstName", "Jane"),
            ("lastName", "Doe"),
            ("email", "jane@example.com"),
            ("phoneNumber", "1234567890"),
            ("createdBy", "admin"),
            ("password", "password123"),
        ] {
            form.fields.insert(k.to_string(), v.to_string());
        }

        let input = form.profile_input();
        assert_eq!(input.first_name, "Jane");
        assert_eq!(input.created_by, "admin");
        assert_eq!(form.take("password"), "password123");
        assert_eq!(form.take("password"), "");
        assert_eq!(form.take("id"), "");
    }
}
