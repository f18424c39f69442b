//! Form binding and validation.
//!
//! Forms hold raw submitted values. `clean` either produces typed input for
//! the service layer or a set of per-field messages to show next to the
//! redisplayed form. Checks that need storage (does the group exist?) happen
//! in the service, which appends to the same `FieldErrors`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub const EMPTY_FILE: &str = "The submitted file is empty.";
pub const INVALID_SLUG: &str =
    "Enter a valid \u{201c}slug\u{201d} consisting of letters, numbers, underscores or hyphens.";
pub const INVALID_USERNAME: &str = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const PASSWORD_TOO_SHORT: &str =
    "This password is too short. It must contain at least 8 characters.";

/// Messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.0.iter().map(|(field, msgs)| (*field, msgs.as_slice()))
    }

    /// Flatten into `field: message` lines.
    pub fn messages(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(field, msgs)| msgs.iter().map(move |m| format!("{}: {}", field, m)))
            .collect()
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Strip surrounding whitespace; blank input counts as missing.
fn required(errors: &mut FieldErrors, field: &'static str, value: Option<&str>) -> String {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    }
    value.to_string()
}

fn max_length(errors: &mut FieldErrors, field: &'static str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.add(
            field,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max, len
            ),
        );
    }
}

/// Image formats accepted for uploads, detected from the file signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Gif,
    Png,
    Jpeg,
    Webp,
    Bmp,
}

impl ImageFormat {
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else if bytes.len() >= 14 && bytes.starts_with(b"BM") {
            Some(Self::Bmp)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
        }
    }
}

/// An uploaded file as received from the client.
#[derive(Clone, Default)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// A file input left empty by the browser.
    pub fn is_blank(&self) -> bool {
        self.file_name.is_empty() && self.bytes.is_empty()
    }

    /// The client's file name reduced to a safe basename.
    pub fn safe_file_name(&self, format: ImageFormat) -> String {
        let base = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();
        let cleaned: String = base
            .chars()
            .map(|c| match c {
                c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => c,
                _ => '_',
            })
            .collect();
        let cleaned = cleaned.trim_start_matches('.');
        if cleaned.is_empty() {
            format!("image.{}", format.extension())
        } else {
            cleaned.to_string()
        }
    }
}

/// A validated image, ready to be stored.
#[derive(Debug, Clone)]
pub struct CleanImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

fn clean_image(errors: &mut FieldErrors, upload: Option<ImageUpload>) -> Option<CleanImage> {
    let upload = upload.filter(|u| !u.is_blank())?;
    if upload.bytes.is_empty() {
        errors.add("image", EMPTY_FILE);
        return None;
    }
    match ImageFormat::sniff(&upload.bytes) {
        Some(format) => Some(CleanImage {
            file_name: upload.safe_file_name(format),
            bytes: upload.bytes,
            format,
        }),
        None => {
            errors.add("image", INVALID_IMAGE);
            None
        }
    }
}

/// Submitted post fields, shared by creation and editing.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub text: Option<String>,
    /// Group id as submitted; blank means no group.
    pub group: Option<String>,
    pub image: Option<ImageUpload>,
    /// Drop the current image when editing.
    pub clear_image: bool,
}

/// Post input after syntactic validation.
#[derive(Debug, Clone)]
pub struct CleanPost {
    pub text: String,
    pub group_id: Option<i32>,
    pub image: Option<CleanImage>,
    pub clear_image: bool,
}

impl PostForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_group(mut self, group_id: i32) -> Self {
        self.group = Some(group_id.to_string());
        self
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    pub fn clean(self) -> Result<CleanPost, FieldErrors> {
        let mut errors = FieldErrors::default();
        let text = required(&mut errors, "text", self.text.as_deref());

        let group_id = match self.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<i32>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("group", INVALID_CHOICE);
                    None
                }
            },
        };

        let image = clean_image(&mut errors, self.image);

        errors.into_result(CleanPost {
            text,
            group_id,
            image,
            clear_image: self.clear_image,
        })
    }
}

/// Submitted comment fields.
#[derive(Debug, Clone, Default)]
pub struct CommentForm {
    pub text: Option<String>,
}

impl CommentForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn clean(self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::default();
        let text = required(&mut errors, "text", self.text.as_deref());
        errors.into_result(text)
    }
}

/// Group fields edited from the administrative console.
#[derive(Debug, Clone, Default)]
pub struct GroupForm {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl GroupForm {
    pub fn clean(self) -> Result<CleanGroup, FieldErrors> {
        let mut errors = FieldErrors::default();

        let title = required(&mut errors, "title", self.title.as_deref());
        max_length(&mut errors, "title", &title, 200);

        let slug = required(&mut errors, "slug", self.slug.as_deref());
        if !slug.is_empty() && !is_valid_slug(&slug) {
            errors.add("slug", INVALID_SLUG);
        }
        max_length(&mut errors, "slug", &slug, 50);

        let description = required(&mut errors, "description", self.description.as_deref());

        errors.into_result(CleanGroup {
            title,
            slug,
            description,
        })
    }
}

/// Account registration fields.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CleanSignup {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn clean(self) -> Result<CleanSignup, FieldErrors> {
        let mut errors = FieldErrors::default();

        let username = required(&mut errors, "username", self.username.as_deref());
        let username_ok = username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'));
        if !username.is_empty() && !username_ok {
            errors.add("username", INVALID_USERNAME);
        }
        max_length(&mut errors, "username", &username, 150);

        let email = self.email.as_deref().map(str::trim).unwrap_or_default();
        if !email.is_empty() {
            let valid = email
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
            if !valid {
                errors.add("email", INVALID_EMAIL);
            }
        }

        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            errors.add("password", REQUIRED);
        } else if password.chars().count() < 8 {
            errors.add("password", PASSWORD_TOO_SHORT);
        }

        errors.into_result(CleanSignup {
            username,
            email: email.to_string(),
            password,
        })
    }
}
